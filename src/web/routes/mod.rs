use std::time::Duration;

use crate::{
    Config,
    web::{AppState, doc::ApiDoc},
};
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod courses;
pub mod lessons;
pub mod modules;

pub fn build_app<S: Send + Sync + Clone + 'static>(state: AppState, config: &Config) -> Router<S> {
    let mut router = Router::new()
        .merge(courses::routes(state.clone()))
        .merge(modules::routes(state.clone()))
        .merge(lessons::routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive().max_age(Duration::from_secs(3600)))
        .with_state(state);

    if config.app().docs() {
        let openapi = ApiDoc::openapi();

        router = router.merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", openapi));
    }

    router
}
