use serde::{Deserialize, Serialize};

use crate::model::FetchMode;

pub mod courses;
pub mod modules;

/// Plain confirmation body, e.g. after a delete.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FetchQuery {
    /// `eager` also returns the direct children
    pub fetch: Option<FetchMode>,
}

impl FetchQuery {
    pub fn mode(&self) -> FetchMode {
        self.fetch.unwrap_or_default()
    }
}
