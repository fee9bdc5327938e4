//! Course Library Example
//!
//! Serves a small seeded library of authors and courses and shows the
//! representation engine at work:
//! - Field shaping with `?fields=`
//! - Multi-key sorting with `?orderBy=`
//! - Negotiated projections and hypermedia links through `Accept`

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use course_library::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("course_library=debug,tower_http=info")),
        )
        .init();

    let (authors, courses) = seed_data()?;

    let mut builder = match std::env::var("COURSE_LIBRARY_CONFIG") {
        Ok(path) => ServerBuilder::new().with_config_file(&path)?,
        Err(_) => ServerBuilder::new().with_config(ShapingConfig::default_config()),
    };
    builder = builder
        .with_author_store(InMemoryStore::with_items(authors))
        .with_course_store(InMemoryStore::with_items(courses))
        .with_global_registry()
        .with_cors();

    println!("🚀 Course Library on http://127.0.0.1:3000");
    println!("\n📚 Routes:");
    println!("    GET    /api                                        - Root links");
    println!("    GET    /api/authors                                - Paged author collection");
    println!("    GET    /api/authors/{{authorId}}                     - A single author");
    println!("    GET    /api/authors/{{authorId}}/courses             - Courses of an author");
    println!("    GET    /api/authors/{{authorId}}/courses/{{courseId}}  - A single course");
    println!("\n🔎 Try:");
    println!("    curl '127.0.0.1:3000/api/authors?orderBy=age desc&fields=name,age'");
    println!(
        "    curl -H 'Accept: application/vnd.marvin.author.full.hateoas+json' 127.0.0.1:3000/api/authors"
    );

    builder.serve("127.0.0.1:3000").await
}

fn date(year: i32, month: u32, day: u32) -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .ok_or_else(|| anyhow::anyhow!("invalid date {year}-{month}-{day}"))
}

/// Authors and their courses
fn seed_data() -> Result<(Vec<Author>, Vec<Course>)> {
    let authors = vec![
        Author::new("Berry", "Griffin Beak Eldritch", date(1650, 7, 23)?, "Ships")
            .with_date_of_death(date(1720, 3, 2)?),
        Author::new("Nancy", "Swashbuckler Rye", date(1668, 5, 21)?, "Rum"),
        Author::new("Eli", "Ivory Bones Sweet", date(1701, 12, 16)?, "Singing"),
        Author::new("Arnold", "The Unseen Stafford", date(1702, 3, 6)?, "Singing"),
        Author::new("Seabury", "Toxic Reyes", date(1690, 11, 23)?, "Maps"),
        Author::new("Rutherford", "Fearless Cloven", date(1723, 4, 5)?, "General debauchery"),
        Author::new("Atherton", "Bloodthirsty Nash", date(1721, 10, 11)?, "Rum"),
        Author::new("Huxford", "The Hawk Morris", date(1675, 9, 3)?, "Maps"),
    ];

    let courses = vec![
        Course::new(
            authors[0].id,
            "Commandeering a Ship Without Getting Caught",
            Some("Commandeering a ship in rough waters isn't easy."),
        ),
        Course::new(
            authors[0].id,
            "Overthrowing Mutiny",
            Some("In this course, the author provides tips to avoid, or, if needed, overthrow pirate mutiny."),
        ),
        Course::new(
            authors[1].id,
            "Avoiding Brawls While Drinking as Much Rum as You Desire",
            Some("Every good pirate loves rum, but it also has a tendency to get you into trouble."),
        ),
        Course::new(authors[2].id, "Singalong Pirate Hits", None),
        Course::new(
            authors[4].id,
            "Reading Maps by Moonlight",
            Some("Navigating without the sun, one star at a time."),
        ),
    ];

    Ok((authors, courses))
}
