//! Company endpoints

use super::{AppState, location, require_company};
use crate::core::error::{ApiResult, EntityError, RequestError};
use crate::core::extractors::{PathParams, Validated, parse_id_list};
use crate::core::Entity;
use crate::entities::{Company, CompanyDto, CompanyForCreationDto};
use crate::server::entity_registry::EntityDescriptor;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

/// Base path of the company resource
pub const COMPANIES_PATH: &str = "/api/companies";

/// GET /api/companies
pub async fn get_companies(State(state): State<AppState>) -> ApiResult<Json<Vec<CompanyDto>>> {
    let repository = state.repository();
    let companies = repository.company().get_all_companies().await?;

    Ok(Json(companies.iter().map(CompanyDto::from).collect()))
}

/// GET /api/companies/{company_id}
pub async fn get_company(
    State(state): State<AppState>,
    PathParams(company_id): PathParams<Uuid>,
) -> ApiResult<Json<CompanyDto>> {
    let repository = state.repository();
    let company = require_company(repository.as_ref(), company_id).await?;

    Ok(Json(CompanyDto::from(&company)))
}

/// GET /api/companies/collection/{ids}
///
/// Every id must exist; a partial match is a not-found error.
pub async fn get_company_collection(
    State(state): State<AppState>,
    PathParams(raw_ids): PathParams<String>,
) -> ApiResult<Json<Vec<CompanyDto>>> {
    let ids = parse_id_list(&raw_ids)?;
    if ids.is_empty() {
        tracing::warn!("company collection requested without ids");
        return Err(RequestError::InvalidEntityId { id: raw_ids }.into());
    }

    let repository = state.repository();
    let companies = repository.company().get_by_ids(&ids).await?;
    if companies.len() != ids.len() {
        tracing::warn!(
            requested = ids.len(),
            found = companies.len(),
            "some ids are not valid in the collection"
        );
        return Err(EntityError::MissingIds {
            entity_type: Company::entity_type().to_string(),
            requested: ids.len(),
            found: companies.len(),
        }
        .into());
    }

    Ok(Json(companies.iter().map(CompanyDto::from).collect()))
}

/// POST /api/companies
pub async fn create_company(
    State(state): State<AppState>,
    Validated(payload): Validated<CompanyForCreationDto>,
) -> ApiResult<impl IntoResponse> {
    let repository = state.repository();
    let (company, employees) = Company::from_creation(payload);

    repository.company().create_company(company.clone())?;
    for employee in employees {
        repository
            .employee()
            .create_employee_for_company(&company.id, employee)?;
    }
    repository.save().await?;

    tracing::info!(company_id = %company.id, "company created");

    let headers = location(COMPANIES_PATH, company.id)?;
    Ok((StatusCode::CREATED, headers, Json(CompanyDto::from(&company))))
}

/// DELETE /api/companies/{company_id}
pub async fn delete_company(
    State(state): State<AppState>,
    PathParams(company_id): PathParams<Uuid>,
) -> ApiResult<StatusCode> {
    let repository = state.repository();
    let company = require_company(repository.as_ref(), company_id).await?;

    repository.company().delete_company(&company)?;
    repository.save().await?;

    tracing::info!(%company_id, "company deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Routes of the company resource
pub struct CompanyDescriptor;

impl EntityDescriptor for CompanyDescriptor {
    fn entity_type(&self) -> &str {
        Company::resource_name_singular()
    }

    fn plural(&self) -> &str {
        Company::resource_name()
    }

    fn build_routes(&self, state: AppState) -> Router {
        Router::new()
            .route(COMPANIES_PATH, get(get_companies).post(create_company))
            .route(
                &format!("{COMPANIES_PATH}/collection/{{ids}}"),
                get(get_company_collection),
            )
            .route(
                &format!("{COMPANIES_PATH}/{{company_id}}"),
                get(get_company).delete(delete_company),
            )
            .with_state(state)
    }
}
