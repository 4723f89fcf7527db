//! HTTP handlers for companies and their employees

pub mod companies;
pub mod employees;

use crate::config::PagingConfig;
use crate::core::error::{ApiResult, EntityError};
use crate::core::query::RequestParameters;
use crate::core::service::{RepositoryManager, RepositoryProvider};
use crate::core::{Entity, PAGINATION_HEADER, PagedList};
use crate::entities::Company;
use axum::http::{HeaderName, HeaderValue};
use std::sync::Arc;
use uuid::Uuid;

pub use companies::CompanyDescriptor;
pub use employees::EmployeeDescriptor;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub repositories: Arc<dyn RepositoryProvider>,
    pub paging: PagingConfig,
}

impl AppState {
    pub fn new(repositories: Arc<dyn RepositoryProvider>, paging: PagingConfig) -> Self {
        Self {
            repositories,
            paging,
        }
    }

    /// Open the unit of work for one request
    pub fn repository(&self) -> Arc<dyn RepositoryManager> {
        self.repositories.manager()
    }

    /// Apply the configured page size bounds to extracted parameters
    pub fn bound(&self, parameters: RequestParameters) -> RequestParameters {
        parameters.with_paging(&self.paging)
    }
}

/// Load a company or fail with a not-found error
pub(crate) async fn require_company(
    repository: &dyn RepositoryManager,
    company_id: Uuid,
) -> ApiResult<Company> {
    match repository.company().get_company(&company_id).await? {
        Some(company) => Ok(company),
        None => {
            tracing::info!(%company_id, "company doesn't exist in the database");
            Err(EntityError::not_found(Company::entity_type(), company_id).into())
        }
    }
}

/// Path of a single resource, used for `Location` headers
pub(crate) fn location(base: &str, id: Uuid) -> ApiResult<[(HeaderName, HeaderValue); 1]> {
    let value = HeaderValue::try_from(format!("{base}/{id}"))
        .map_err(|e| crate::core::ApiError::Internal(e.to_string()))?;
    Ok([(axum::http::header::LOCATION, value)])
}

/// `X-Pagination` header describing a page
pub(crate) fn pagination_header<T>(page: &PagedList<T>) -> ApiResult<[(HeaderName, HeaderValue); 1]> {
    let name = HeaderName::try_from(PAGINATION_HEADER)
        .map_err(|e| crate::core::ApiError::Internal(e.to_string()))?;
    let value = HeaderValue::try_from(page.meta().to_header_value()?)
        .map_err(|e| crate::core::ApiError::Internal(e.to_string()))?;
    Ok([(name, value)])
}
