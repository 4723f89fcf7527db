//! Macros for reducing boilerplate when declaring records
//!
//! These macros generate the field catalog implementations needed for
//! each record or DTO type that takes part in sorting and data shaping.

/// Implement [`Record`](crate::core::record::Record) for a struct
///
/// Each entry maps a canonical attribute name to a struct field. The
/// catalog is built lazily, once per type, and shared process-wide.
///
/// # Example
///
/// ```rust,ignore
/// use roster::prelude::*;
///
/// #[derive(Debug, Clone, Serialize)]
/// pub struct EmployeeDto {
///     pub id: Uuid,
///     pub name: String,
///     pub age: u32,
/// }
///
/// impl_record!(EmployeeDto, {
///     "Id" => id,
///     "Name" => name,
///     "Age" => age,
/// });
///
/// assert_eq!(EmployeeDto::catalog().canonical_name("age"), Some("Age"));
/// ```
#[macro_export]
macro_rules! impl_record {
    (
        $type:ty,
        {
            $( $name:literal => $field:ident ),+ $(,)?
        }
    ) => {
        impl $crate::core::record::Record for $type {
            fn catalog() -> &'static $crate::core::record::FieldCatalog<Self> {
                static CATALOG: ::std::sync::OnceLock<$crate::core::record::FieldCatalog<$type>> =
                    ::std::sync::OnceLock::new();

                CATALOG.get_or_init(|| {
                    $crate::core::record::FieldCatalog::new(vec![
                        $(
                            (
                                $name,
                                (|record: &$type| {
                                    $crate::core::field::FieldValue::from(
                                        ::std::clone::Clone::clone(&record.$field),
                                    )
                                }) as $crate::core::record::Accessor<$type>,
                            )
                        ),+
                    ])
                })
            }
        }
    };
}
