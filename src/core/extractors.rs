//! Axum extractors for request bodies, paths, query strings, media types
//! and id lists
//!
//! Every rejection is an [`ApiError`], so extraction failures share the
//! JSON error body produced by handlers.

use crate::core::error::{ApiError, RequestError, ValidationError};
use axum::Json;
use axum::extract::path::ErrorKind;
use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::header::ACCEPT;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

/// JSON body whose parse failures map to [`ValidationError::InvalidJson`]
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ValidationError::InvalidJson {
                message: rejection.body_text(),
            }
            .into()),
        }
    }
}

/// Path parameters whose parse failures map to [`RequestError::InvalidEntityId`]
///
/// Every path parameter of the API is an entity id.
#[derive(Debug, Clone)]
pub struct PathParams<T>(pub T);

impl<S, T> FromRequestParts<S> for PathParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejected_id(&rejection).into()),
        }
    }
}

fn rejected_id(rejection: &PathRejection) -> RequestError {
    let id = match rejection {
        PathRejection::FailedToDeserializePathParams(e) => match e.kind() {
            ErrorKind::DeserializeError { value, .. }
            | ErrorKind::ParseErrorAtKey { value, .. }
            | ErrorKind::ParseErrorAtIndex { value, .. }
            | ErrorKind::ParseError { value, .. } => value.clone(),
            _ => rejection.body_text(),
        },
        _ => rejection.body_text(),
    };
    RequestError::InvalidEntityId { id }
}

/// Query string whose parse failures map to [`RequestError::InvalidQuery`]
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::warn!(error = %rejection.body_text(), "invalid query string");
                Err(RequestError::InvalidQuery {
                    message: rejection.body_text(),
                }
                .into())
            }
        }
    }
}

/// JSON body that has passed its `validator` rules
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_company(
///     Validated(payload): Validated<CompanyForCreationDto>,
/// ) -> ApiResult<impl IntoResponse> {
///     // payload is already validated
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Validated<T>(pub T);

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let JsonBody(payload) = JsonBody::<T>::from_request(req, state).await?;
        if let Err(errors) = payload.validate() {
            tracing::warn!(%errors, "invalid request body");
            return Err(errors.into());
        }
        Ok(Self(payload))
    }
}

/// The first media type named by the `Accept` header
///
/// Rejects requests without an `Accept` header or whose first entry is not
/// of the form `type/subtype[;params]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptMediaType(pub String);

impl AcceptMediaType {
    /// Parse the first entry of an `Accept` header value
    pub fn parse(value: &str) -> Result<Self, RequestError> {
        let invalid = || RequestError::InvalidMediaType {
            value: value.to_string(),
        };

        let first = value.split(',').next().unwrap_or_default();
        let essence = first.split(';').next().unwrap_or_default().trim();
        let (kind, subtype) = essence.split_once('/').ok_or_else(invalid)?;

        let is_token = |s: &str| {
            !s.is_empty()
                && s.chars()
                    .all(|c| c.is_ascii_alphanumeric() || "!#$&^_.+-*".contains(c))
        };
        if !is_token(kind) || !is_token(subtype) {
            return Err(invalid());
        }

        Ok(Self(essence.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the client asked for hypermedia links (`*/*hateoas+json`)
    pub fn wants_links(&self) -> bool {
        self.0
            .split_once('/')
            .is_some_and(|(_, subtype)| subtype.ends_with("hateoas+json"))
    }
}

impl<S> FromRequestParts<S> for AcceptMediaType
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(ACCEPT) else {
            return Err(RequestError::MissingHeader {
                header: "Accept".to_string(),
            }
            .into());
        };

        let value = value.to_str().map_err(|_| RequestError::InvalidMediaType {
            value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
        })?;

        Ok(Self::parse(value)?)
    }
}

/// Parse a comma separated list of ids such as `/collection/(id1,id2)`
///
/// Surrounding parentheses and blank entries are ignored.
pub fn parse_id_list(raw: &str) -> Result<Vec<Uuid>, RequestError> {
    raw.trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Uuid::parse_str(s).map_err(|_| RequestError::InvalidEntityId { id: s.to_string() })
        })
        .collect()
}
