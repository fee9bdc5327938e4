//! Authors

use crate::core::query::ResourceParameters;
use crate::core::representation::Represent;
use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const AUTHOR_KIND: &str = "Author";

/// Stored author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: DateTime<Utc>,
    pub date_of_death: Option<DateTime<Utc>>,
    pub main_category: String,
}

crate::impl_record!(Author, {
    "Id" => id,
    "FirstName" => first_name,
    "LastName" => last_name,
    "DateOfBirth" => date_of_birth,
    "DateOfDeath" => date_of_death,
    "MainCategory" => main_category,
});

impl Author {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: DateTime<Utc>,
        main_category: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            date_of_birth,
            date_of_death: None,
            main_category: main_category.into(),
        }
    }

    pub fn with_date_of_death(mut self, date_of_death: DateTime<Utc>) -> Self {
        self.date_of_death = Some(date_of_death);
        self
    }

    /// Age in completed years, at death or today
    pub fn age(&self) -> i64 {
        age_at(self.date_of_birth, self.date_of_death, Utc::now())
    }

    /// Whether the author passes the collection filters
    ///
    /// `main_category` matches exactly after trimming; `search_query` is a
    /// substring of the category or either name. Both ignore case and are
    /// skipped when blank.
    pub fn matches(&self, main_category: Option<&str>, search_query: Option<&str>) -> bool {
        let category = main_category.map(str::trim).filter(|c| !c.is_empty());
        if let Some(category) = category {
            if !self.main_category.eq_ignore_ascii_case(category) {
                return false;
            }
        }

        let query = search_query.map(str::trim).filter(|q| !q.is_empty());
        if let Some(query) = query {
            let query = query.to_lowercase();
            return [&self.main_category, &self.first_name, &self.last_name]
                .iter()
                .any(|value| value.to_lowercase().contains(&query));
        }

        true
    }
}

/// Build the collection filter for a set of query parameters
pub fn filter(params: &ResourceParameters) -> impl Fn(&Author) -> bool + Send + Sync + use<> {
    let main_category = params.main_category.clone();
    let search_query = params.search_query.clone();
    move |author: &Author| author.matches(main_category.as_deref(), search_query.as_deref())
}

/// Completed years between birth and death, or `now` for the living
pub fn age_at(
    date_of_birth: DateTime<Utc>,
    date_of_death: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> i64 {
    let end = date_of_death.unwrap_or(now);
    let mut age = i64::from(end.year() - date_of_birth.year());

    let end_in_year = (end.month(), end.day(), end.num_seconds_from_midnight());
    let birthday = (
        date_of_birth.month(),
        date_of_birth.day(),
        date_of_birth.num_seconds_from_midnight(),
    );
    if end_in_year < birthday {
        age -= 1;
    }
    age
}

/// Default projection of an author
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
    pub id: Uuid,
    pub name: String,
    pub age: i64,
    pub main_category: String,
}

crate::impl_shapeable!(AuthorDto, AUTHOR_KIND, {
    "id" => id,
    "name" => name,
    "age" => age,
    "mainCategory" => main_category,
});

/// Full projection of an author
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorFullDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: DateTime<Utc>,
    pub date_of_death: Option<DateTime<Utc>>,
    pub main_category: String,
}

crate::impl_shapeable!(AuthorFullDto, AUTHOR_KIND, {
    "id" => id,
    "firstName" => first_name,
    "lastName" => last_name,
    "dateOfBirth" => date_of_birth,
    "dateOfDeath" => date_of_death,
    "mainCategory" => main_category,
});

impl Represent for Author {
    type Friendly = AuthorDto;
    type Full = AuthorFullDto;

    fn to_friendly(&self) -> AuthorDto {
        AuthorDto {
            id: self.id,
            name: format!("{} {}", self.first_name, self.last_name),
            age: self.age(),
            main_category: self.main_category.clone(),
        }
    }

    fn to_full(&self) -> AuthorFullDto {
        AuthorFullDto {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            date_of_birth: self.date_of_birth,
            date_of_death: self.date_of_death,
            main_category: self.main_category.clone(),
        }
    }
}
