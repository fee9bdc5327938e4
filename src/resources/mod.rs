//! Resources of the course library
//!
//! Each resource pairs a backing entity (stored, sortable by backing field)
//! with the projections clients see.

pub mod author;
pub mod course;
pub mod macros;

pub use author::{Author, AuthorDto, AuthorFullDto, age_at};
pub use course::{Course, CourseDto};

/// Resource kind of the root document
pub const ROOT_KIND: &str = "Root";

/// Resource kind of an author's course collection
pub const COURSE_COLLECTION_KIND: &str = "CourseCollection";
