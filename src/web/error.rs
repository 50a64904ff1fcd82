use std::collections::BTreeMap;

use axum::{Json, extract::rejection::QueryRejection, http::StatusCode, response::IntoResponse};
use thiserror::Error;
use validator::ValidationErrors;

use crate::{
    error::log_error,
    model::{DatabaseError, ResourceType},
};

pub type WebResult<T> = std::result::Result<T, WebError>;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("ResourceNotFound: {resource_type:?}")]
    ResourceNotFound { resource_type: ResourceType },

    #[error("ResourceNotFoundInParent: {resource_type:?} in {parent_type:?}")]
    ResourceNotFoundInParent {
        resource_type: ResourceType,
        parent_type: ResourceType,
    },

    #[error("ResourceFetchError: {resource_type:?}. Error: {error}")]
    ResourceFetchError {
        resource_type: ResourceType,
        error: DatabaseError,
    },

    #[error("ResourceBadRequest: {resource_type:?}. {details}")]
    ResourceBadRequest {
        resource_type: ResourceType,
        details: String,
    },

    #[error("ResourceValidationError: {resource_type:?}. {errors}")]
    ResourceValidationError {
        resource_type: ResourceType,
        errors: ValidationErrors,
    },
}

impl ResourceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            Self::ResourceNotFoundInParent { .. } => StatusCode::NOT_FOUND,
            Self::ResourceFetchError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ResourceBadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::ResourceValidationError { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ResourceNotFound { resource_type } => {
                format!("{} Not Found.", resource_type.label())
            }
            Self::ResourceNotFoundInParent {
                resource_type,
                parent_type,
            } => format!(
                "{} not found for this {}.",
                resource_type.label(),
                parent_type.label().to_lowercase()
            ),
            Self::ResourceFetchError { .. } => {
                String::from("Resource error, unable to fetch resource.")
            }
            Self::ResourceBadRequest { details, .. } => {
                format!("Resource error, bad request: {details}")
            }
            Self::ResourceValidationError { .. } => {
                String::from("Resource error, validation failed.")
            }
        }
    }

    /// Field name to messages, only for validation failures.
    pub fn field_errors(&self) -> Option<BTreeMap<String, Vec<String>>> {
        let Self::ResourceValidationError { errors, .. } = self else {
            return None;
        };

        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let messages = errors
                    .iter()
                    .map(|e| match &e.message {
                        Some(message) => message.to_string(),
                        None => e.code.to_string(),
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        Some(fields)
    }
}

#[derive(Debug, Error)]
pub enum WebError {
    #[error("ResourceError - {0}")]
    ResourceError(#[from] ResourceError),
}

impl WebError {
    pub fn resource_not_found(r#type: ResourceType) -> Self {
        Self::ResourceError(ResourceError::ResourceNotFound {
            resource_type: r#type,
        })
    }

    pub fn resource_not_found_in(r#type: ResourceType, parent: ResourceType) -> Self {
        Self::ResourceError(ResourceError::ResourceNotFoundInParent {
            resource_type: r#type,
            parent_type: parent,
        })
    }

    pub fn resource_fetch_error(r#type: ResourceType, error: DatabaseError) -> Self {
        Self::ResourceError(ResourceError::ResourceFetchError {
            resource_type: r#type,
            error,
        })
    }

    pub fn resource_bad_request<S: Into<String>>(r#type: ResourceType, details: S) -> Self {
        Self::ResourceError(ResourceError::ResourceBadRequest {
            resource_type: r#type,
            details: details.into(),
        })
    }

    /// Query string that failed to deserialize into the expected filter.
    pub fn resource_bad_query(r#type: ResourceType, rejection: QueryRejection) -> Self {
        Self::resource_bad_request(r#type, rejection.body_text())
    }

    pub fn resource_validation(r#type: ResourceType, errors: ValidationErrors) -> Self {
        Self::ResourceError(ResourceError::ResourceValidationError {
            resource_type: r#type,
            errors,
        })
    }

    pub fn status_code(&self) -> axum::http::StatusCode {
        match self {
            Self::ResourceError(e) => e.status_code(),
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ResourceError(e) => e.client_display(),
        }
    }

    pub fn field_errors(&self) -> Option<BTreeMap<String, Vec<String>>> {
        match self {
            Self::ResourceError(e) => e.field_errors(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message for the client
    pub message: String,
    /// HTTP status code (stringified)
    pub status_code: String,
    /// Optional debug details (only in debug mode)
    pub details: Option<String>,
    /// Field name to messages, present on validation failures
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl IntoResponse for WebError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            log_error(&self);
        } else {
            tracing::debug!("request rejected: {}", self);
        }

        let body = ErrorResponse {
            message: self.client_display(),
            status_code: status_code.as_str().to_string(),
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
            errors: self.field_errors(),
        };

        (status_code, Json(body)).into_response()
    }
}
