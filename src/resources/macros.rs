//! Macros for reducing boilerplate when declaring resources
//!
//! These macros generate the per-type name tables the engine works from:
//! public output fields for projections, backing fields for storage.

/// Implement [`Shapeable`](crate::core::shape::Shapeable) for a projection type
///
/// Output fields are listed in declaration order, each mapped to a struct
/// field whose value converts into a `FieldValue`.
///
/// # Example
/// ```rust,ignore
/// impl_shapeable!(CourseDto, "Course", {
///     "id" => id,
///     "title" => title,
///     "authorId" => author_id,
/// });
/// ```
#[macro_export]
macro_rules! impl_shapeable {
    ($type:ty, $kind:expr, { $($name:literal => $field:ident),* $(,)? }) => {
        impl $crate::core::shape::Shapeable for $type {
            fn resource_kind() -> &'static str {
                $kind
            }

            fn field_names() -> &'static [&'static str] {
                &[$($name),*]
            }

            fn field_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                match field {
                    $($name => Some($crate::core::field::FieldValue::from(self.$field.clone())),)*
                    _ => None,
                }
            }
        }
    };
}

/// Implement [`Record`](crate::storage::Record) for a backing entity
///
/// Backing field names are matched case-insensitively; the entity must carry
/// an `id: Uuid` field.
///
/// # Example
/// ```rust,ignore
/// impl_record!(Author, {
///     "Id" => id,
///     "FirstName" => first_name,
///     "DateOfBirth" => date_of_birth,
/// });
/// ```
#[macro_export]
macro_rules! impl_record {
    ($type:ty, { $($name:literal => $field:ident),* $(,)? }) => {
        impl $crate::storage::Sortable for $type {
            fn backing_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                $(
                    if field.eq_ignore_ascii_case($name) {
                        return Some($crate::core::field::FieldValue::from(self.$field.clone()));
                    }
                )*
                None
            }
        }

        impl $crate::storage::Record for $type {
            fn id(&self) -> ::uuid::Uuid {
                self.id
            }
        }
    };
}
