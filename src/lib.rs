//! # Roster
//!
//! A company/employee REST backend built around a sort, page and shape
//! pipeline for collection endpoints.
//!
//! ## Features
//!
//! - **Field catalogs**: each record type exposes its attributes once, with
//!   case-insensitive name resolution and compiled accessors
//! - **Safe sorting**: `orderBy=age desc,name` becomes a typed multi-key
//!   comparator; unknown tokens are dropped, never injected
//! - **Paging**: one-indexed page windows with `X-Pagination` metadata
//! - **Data shaping**: `fields=name,age` projects DTOs to the requested
//!   attributes, always keeping `Id`
//! - **Unit of work**: repository writes are staged and applied on save
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use roster::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     ServerBuilder::new()
//!         .with_config(AppConfig::default())
//!         .with_repository(InMemoryStore::with_seed_data())
//!         .serve(None)
//!         .await
//! }
//! ```
//!
//! The pipeline can also be driven directly:
//!
//! ```rust,ignore
//! let spec = SortSpec::parse::<Employee>(Some("age desc,name"), "Name");
//! spec.apply(&mut employees);
//!
//! let page = PagedList::to_paged_list(employees, 1, 10).map(EmployeeDto::from);
//! let shaped = FieldShaper::<EmployeeDto>::new().shape_data(&page, Some("name, age"));
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Pipeline ===
    pub use crate::core::{
        field::FieldValue,
        links::{HATEOAS_MEDIA_TYPE, Link, LinkedEntity},
        paging::{MetaData, PAGINATION_HEADER, PageSource, PagedList},
        query::{AgeRange, EmployeeParameters, RequestParameters},
        record::{FieldCatalog, FieldDescriptor, Record},
        shaping::{FieldShaper, ShapedEntity},
        sort::{SortDirection, SortKey, SortSpec},
    };

    // === Core Traits ===
    pub use crate::core::{
        entity::Entity,
        service::{CompanyRepository, EmployeeRepository, RepositoryManager, RepositoryProvider},
    };

    // === Errors ===
    pub use crate::core::error::{
        ApiError, ApiResult, ConfigError, EntityError, RequestError, StorageError,
        ValidationError,
    };

    // === Patch ===
    pub use crate::core::patch::{PatchDocument, PatchOperation};

    // === Macros ===
    pub use crate::impl_record;

    // === Domain ===
    pub use crate::entities::{
        Company, CompanyDto, CompanyForCreationDto, Employee, EmployeeDto,
        EmployeeForCreationDto, EmployeeForUpdateDto,
    };

    // === Storage ===
    pub use crate::storage::{InMemoryRepository, InMemoryStore};

    // === Config ===
    pub use crate::config::{AppConfig, CorsConfig, LoggingConfig, PagingConfig, ServerConfig};

    // === Server ===
    pub use crate::server::{AppState, EntityDescriptor, EntityRegistry, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
