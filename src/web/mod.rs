mod error;
pub use error::{ErrorResponse, ResourceError, WebError, WebResult};

pub mod dto;

mod state;
pub use state::AppState;

pub mod routes;

pub mod doc;
