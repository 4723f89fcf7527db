//! Core module containing the record catalog, the sort/page/shape pipeline
//! and the repository traits

pub mod entity;
pub mod error;
pub mod extractors;
pub mod field;
pub mod links;
pub mod paging;
pub mod patch;
pub mod query;
pub mod record;
pub mod service;
pub mod shaping;
pub mod sort;

pub use entity::Entity;
pub use error::{ApiError, ApiResult};
pub use field::FieldValue;
pub use links::{HATEOAS_MEDIA_TYPE, Link, LinkedEntity};
pub use paging::{MetaData, PAGINATION_HEADER, PageSource, PagedList};
pub use patch::{PatchDocument, PatchOperation};
pub use query::{AgeRange, EmployeeParameters, RequestParameters};
pub use record::{FieldCatalog, FieldDescriptor, Record};
pub use service::{CompanyRepository, EmployeeRepository, RepositoryManager, RepositoryProvider};
pub use shaping::{FieldShaper, ShapedEntity};
pub use sort::{SortDirection, SortKey, SortSpec};
