//! Courses

use crate::core::representation::Represent;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const COURSE_KIND: &str = "Course";

/// Stored course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub author_id: Uuid,
}

crate::impl_record!(Course, {
    "Id" => id,
    "Title" => title,
    "Description" => description,
    "AuthorId" => author_id,
});

impl Course {
    pub fn new(author_id: Uuid, title: impl Into<String>, description: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.map(str::to_string),
            author_id,
        }
    }
}

/// Client projection of a course
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDto {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub author_id: Uuid,
}

crate::impl_shapeable!(CourseDto, COURSE_KIND, {
    "id" => id,
    "title" => title,
    "description" => description,
    "authorId" => author_id,
});

impl From<&Course> for CourseDto {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            title: course.title.clone(),
            description: course.description.clone(),
            author_id: course.author_id,
        }
    }
}

/// Courses have a single projection; the full variant falls back to it.
impl Represent for Course {
    type Friendly = CourseDto;
    type Full = CourseDto;

    fn to_friendly(&self) -> CourseDto {
        CourseDto::from(self)
    }

    fn to_full(&self) -> CourseDto {
        CourseDto::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::FieldValue;
    use crate::core::shape::shape;

    #[test]
    fn test_shape_course() {
        let author_id = Uuid::new_v4();
        let course = Course::new(author_id, "Commandeering a Ship", None);
        let record = shape(&course.to_friendly(), "authorid,description").unwrap();

        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["id", "authorId", "description"]);
        assert_eq!(record.get("authorId"), Some(&FieldValue::Uuid(author_id)));
        assert_eq!(record.get("description"), Some(&FieldValue::Null));
    }
}
