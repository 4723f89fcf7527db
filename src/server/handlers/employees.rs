//! Employee endpoints, nested under their company
//!
//! The collection endpoint runs the full pipeline: age filter, sort, page
//! window, mapping to [`EmployeeDto`] and field shaping, plus per-employee
//! links when the client negotiates a `hateoas+json` media type. The
//! single-employee endpoint shares the mapping and shaping steps.

use super::{AppState, location, pagination_header, require_company};
use crate::core::error::{ApiResult, EntityError, ValidationError};
use crate::core::extractors::{AcceptMediaType, JsonBody, PathParams, QueryParams, Validated};
use crate::core::links::{Link, LinkedEntity};
use crate::core::patch::PatchDocument;
use crate::core::query::{AgeRange, EmployeeParameters, RequestParameters};
use crate::core::service::RepositoryManager;
use crate::core::shaping::{FieldShaper, ShapedEntity};
use crate::core::Entity;
use crate::entities::{Employee, EmployeeDto, EmployeeForCreationDto, EmployeeForUpdateDto};
use crate::server::entity_registry::EntityDescriptor;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use uuid::Uuid;
use validator::Validate;

use super::companies::COMPANIES_PATH;

const EMPLOYEE_SHAPER: FieldShaper<EmployeeDto> = FieldShaper::new();

fn employees_path(company_id: Uuid) -> String {
    format!("{COMPANIES_PATH}/{company_id}/{}", Employee::resource_name())
}

/// Actions available on one employee of a collection
fn employee_links(company_id: Uuid, id: Uuid) -> Vec<Link> {
    let href = format!("{}/{id}", employees_path(company_id));
    vec![
        Link::new(href.clone(), "self", "GET"),
        Link::new(href.clone(), "delete_employee", "DELETE"),
        Link::new(href, "update_employee", "PUT"),
    ]
}

fn require_employee(
    repository: &dyn RepositoryManager,
    company_id: Uuid,
    id: Uuid,
) -> ApiResult<Employee> {
    match repository.employee().get_employee(&company_id, &id)? {
        Some(employee) => Ok(employee),
        None => {
            tracing::info!(employee_id = %id, %company_id, "employee doesn't exist in the database");
            Err(EntityError::not_found(Employee::entity_type(), id).into())
        }
    }
}

/// GET /api/companies/{company_id}/employees
pub async fn get_employees_for_company(
    State(state): State<AppState>,
    PathParams(company_id): PathParams<Uuid>,
    media_type: AcceptMediaType,
    QueryParams(request): QueryParams<RequestParameters>,
    QueryParams(ages): QueryParams<AgeRange>,
) -> ApiResult<Response> {
    let parameters = EmployeeParameters::new(state.bound(request), ages);
    if !parameters.valid_age_range() {
        return Err(ValidationError::InvalidRange {
            message: "Max age should be greater than min age.".to_string(),
        }
        .into());
    }

    let repository = state.repository();
    require_company(repository.as_ref(), company_id).await?;

    let page = repository
        .employee()
        .get_employees(&company_id, &parameters)
        .await?;
    let headers = pagination_header(&page)?;

    let dtos = page.map(EmployeeDto::from);
    let shaped = EMPLOYEE_SHAPER.shape_data(&dtos, parameters.request.fields());

    tracing::debug!(
        %company_id,
        media_type = media_type.as_str(),
        returned = shaped.len(),
        "employees listed"
    );

    if !media_type.wants_links() {
        return Ok((headers, Json(shaped)).into_response());
    }

    let linked: Vec<LinkedEntity> = dtos
        .items()
        .iter()
        .zip(shaped)
        .map(|(dto, entity)| LinkedEntity::new(entity, employee_links(company_id, dto.id)))
        .collect();
    Ok((headers, Json(linked)).into_response())
}

/// GET /api/companies/{company_id}/employees/{id}
pub async fn get_employee_for_company(
    State(state): State<AppState>,
    PathParams((company_id, id)): PathParams<(Uuid, Uuid)>,
    QueryParams(request): QueryParams<RequestParameters>,
) -> ApiResult<Json<ShapedEntity>> {
    let repository = state.repository();
    require_company(repository.as_ref(), company_id).await?;
    let employee = require_employee(repository.as_ref(), company_id, id)?;

    let dto = EmployeeDto::from(employee);
    Ok(Json(EMPLOYEE_SHAPER.shape_one(&dto, request.fields())))
}

/// POST /api/companies/{company_id}/employees
pub async fn create_employee_for_company(
    State(state): State<AppState>,
    PathParams(company_id): PathParams<Uuid>,
    Validated(payload): Validated<EmployeeForCreationDto>,
) -> ApiResult<impl IntoResponse> {
    let repository = state.repository();
    require_company(repository.as_ref(), company_id).await?;

    let employee = Employee::from_creation(company_id, payload);
    repository
        .employee()
        .create_employee_for_company(&company_id, employee.clone())?;
    repository.save().await?;

    tracing::info!(%company_id, employee_id = %employee.id, "employee created");

    let headers = location(&employees_path(company_id), employee.id)?;
    Ok((StatusCode::CREATED, headers, Json(EmployeeDto::from(employee))))
}

/// PUT /api/companies/{company_id}/employees/{id}
pub async fn update_employee_for_company(
    State(state): State<AppState>,
    PathParams((company_id, id)): PathParams<(Uuid, Uuid)>,
    Validated(payload): Validated<EmployeeForUpdateDto>,
) -> ApiResult<StatusCode> {
    let repository = state.repository();
    require_company(repository.as_ref(), company_id).await?;
    let mut employee = require_employee(repository.as_ref(), company_id, id)?;

    employee.apply_update(payload);
    repository.employee().update_employee(employee)?;
    repository.save().await?;

    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/companies/{company_id}/employees/{id}
///
/// The document is applied to the current values and the result must pass
/// the same validation as a full update.
pub async fn partially_update_employee_for_company(
    State(state): State<AppState>,
    PathParams((company_id, id)): PathParams<(Uuid, Uuid)>,
    JsonBody(document): JsonBody<PatchDocument>,
) -> ApiResult<StatusCode> {
    let repository = state.repository();
    require_company(repository.as_ref(), company_id).await?;
    let mut employee = require_employee(repository.as_ref(), company_id, id)?;

    let patched = document.apply_to(&employee.to_update_dto())?;
    if let Err(errors) = patched.validate() {
        tracing::warn!(%errors, "invalid model state for the patch document");
        return Err(errors.into());
    }

    employee.apply_update(patched);
    repository.employee().update_employee(employee)?;
    repository.save().await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/companies/{company_id}/employees/{id}
pub async fn delete_employee_for_company(
    State(state): State<AppState>,
    PathParams((company_id, id)): PathParams<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let repository = state.repository();
    require_company(repository.as_ref(), company_id).await?;
    let employee = require_employee(repository.as_ref(), company_id, id)?;

    repository.employee().delete_employee(&employee)?;
    repository.save().await?;

    tracing::info!(%company_id, employee_id = %id, "employee deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Routes of the employee resource
pub struct EmployeeDescriptor;

impl EntityDescriptor for EmployeeDescriptor {
    fn entity_type(&self) -> &str {
        Employee::resource_name_singular()
    }

    fn plural(&self) -> &str {
        Employee::resource_name()
    }

    fn build_routes(&self, state: AppState) -> Router {
        let collection = format!("{COMPANIES_PATH}/{{company_id}}/{}", self.plural());
        let item = format!("{collection}/{{id}}");

        Router::new()
            .route(
                &collection,
                get(get_employees_for_company).post(create_employee_for_company),
            )
            .route(
                &item,
                get(get_employee_for_company)
                    .put(update_employee_for_company)
                    .patch(partially_update_employee_for_company)
                    .delete(delete_employee_for_company),
            )
            .with_state(state)
    }
}
