use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    model::{
        ChildRepository, FetchMode, Page, PageRequest, Repository, ResourceTyped,
        entity::{Course, Module, ModuleDto, ModuleWithLessonsRow},
        filter::ContentFilter,
    },
    web::{
        AppState, WebError, WebResult,
        dto::{FetchQuery, MessageResponse, modules::ModuleWithLessons},
        error::ErrorResponse,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route(
            "/courses/{course_id}/modules",
            get(modules_list_handler).post(modules_create_handler),
        )
        .route(
            "/courses/{course_id}/modules/{module_id}",
            get(modules_get_handler)
                .put(modules_update_handler)
                .delete(modules_delete_handler),
        )
        .with_state(state)
}

async fn find_module(state: &AppState, course_id: Uuid, module_id: Uuid) -> WebResult<Module> {
    Module::find_in_parent(state.mm(), course_id, module_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Module::get_resource_type(), e))?
        .ok_or(WebError::resource_not_found_in(
            Module::get_resource_type(),
            Course::get_resource_type(),
        ))
}

#[utoipa::path(
    post,
    path = "/courses/{course_id}/modules",
    request_body = ModuleDto,
    description = "Creates a module inside the course",
    params(
        ("course_id" = Uuid, Path, description = "ID of the owning course")
    ),
    responses(
        (status = 201, description = "Module created", body = Module),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "modules"
)]
async fn modules_create_handler(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    Json(payload): Json<ModuleDto>,
) -> WebResult<impl IntoResponse> {
    tracing::debug!("POST module in course {} payload received {:?}", course_id, payload);
    payload
        .validate()
        .map_err(|e| WebError::resource_validation(Module::get_resource_type(), e))?;

    let course = Course::find_by_id(state.mm(), course_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?
        .ok_or(WebError::resource_not_found(Course::get_resource_type()))?;

    let created = Module::new(course.course_id(), payload)
        .save(state.mm())
        .await
        .map_err(|e| WebError::resource_fetch_error(Module::get_resource_type(), e))?;

    tracing::info!("module saved successfully module_id {}", created.module_id());
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/courses/{course_id}/modules",
    description = "Page through the modules of a course",
    params(
        ("course_id" = Uuid, Path, description = "ID of the owning course"),
        ContentFilter,
        PageRequest,
    ),
    responses(
        (status = 200, description = "Requested page", body = Page<Module>),
        (status = 400, description = "Invalid filter or paging parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "modules"
)]
async fn modules_list_handler(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    filter: Result<Query<ContentFilter>, QueryRejection>,
    page: Result<Query<PageRequest>, QueryRejection>,
) -> WebResult<impl IntoResponse> {
    let Query(filter) =
        filter.map_err(|e| WebError::resource_bad_query(Module::get_resource_type(), e))?;
    let Query(page) =
        page.map_err(|e| WebError::resource_bad_query(Module::get_resource_type(), e))?;
    let page = page
        .resolve_for::<Module>()
        .map_err(|e| WebError::resource_bad_request(Module::get_resource_type(), e))?;

    let predicate = Module::parent_predicate(course_id).and(filter.predicate());
    let modules = Module::find_all(state.mm(), &predicate, &page)
        .await
        .map_err(|e| WebError::resource_fetch_error(Module::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(modules)))
}

#[utoipa::path(
    get,
    path = "/courses/{course_id}/modules/{module_id}",
    description = "Fetch one module of the course, `fetch=eager` includes its lessons",
    params(
        ("course_id" = Uuid, Path, description = "ID of the owning course"),
        ("module_id" = Uuid, Path, description = "ID of the module"),
        FetchQuery,
    ),
    responses(
        (status = 200, description = "Module found", body = ModuleWithLessons),
        (status = 404, description = "Module not found for this course", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "modules"
)]
async fn modules_get_handler(
    State(state): State<AppState>,
    Path((course_id, module_id)): Path<(Uuid, Uuid)>,
    fetch: Result<Query<FetchQuery>, QueryRejection>,
) -> WebResult<Response> {
    let Query(fetch) =
        fetch.map_err(|e| WebError::resource_bad_query(Module::get_resource_type(), e))?;
    match fetch.mode() {
        FetchMode::Lazy => {
            let module = find_module(&state, course_id, module_id).await?;
            Ok((StatusCode::OK, Json(module)).into_response())
        }
        FetchMode::Eager => {
            let module = ModuleWithLessonsRow::find_in_course(state.mm(), course_id, module_id)
                .await
                .and_then(|row| row.map(ModuleWithLessons::try_from).transpose())
                .map_err(|e| WebError::resource_fetch_error(Module::get_resource_type(), e))?
                .ok_or(WebError::resource_not_found_in(
                    Module::get_resource_type(),
                    Course::get_resource_type(),
                ))?;
            Ok((StatusCode::OK, Json(module)).into_response())
        }
    }
}

#[utoipa::path(
    put,
    path = "/courses/{course_id}/modules/{module_id}",
    request_body = ModuleDto,
    description = "Overwrites title and description of the module",
    params(
        ("course_id" = Uuid, Path, description = "ID of the owning course"),
        ("module_id" = Uuid, Path, description = "ID of the module to update"),
    ),
    responses(
        (status = 200, description = "Module updated", body = Module),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 404, description = "Module not found for this course", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "modules"
)]
async fn modules_update_handler(
    State(state): State<AppState>,
    Path((course_id, module_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ModuleDto>,
) -> WebResult<impl IntoResponse> {
    tracing::debug!("PUT module {} payload received {:?}", module_id, payload);
    payload
        .validate()
        .map_err(|e| WebError::resource_validation(Module::get_resource_type(), e))?;

    let mut module = find_module(&state, course_id, module_id).await?;
    module.apply(payload);

    let updated = module
        .save(state.mm())
        .await
        .map_err(|e| WebError::resource_fetch_error(Module::get_resource_type(), e))?;

    tracing::info!("module updated successfully module_id {}", module_id);
    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    delete,
    path = "/courses/{course_id}/modules/{module_id}",
    description = "Deletes the module together with its lessons",
    params(
        ("course_id" = Uuid, Path, description = "ID of the owning course"),
        ("module_id" = Uuid, Path, description = "ID of the module to delete"),
    ),
    responses(
        (status = 200, description = "Module deleted", body = MessageResponse),
        (status = 404, description = "Module not found for this course", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "modules"
)]
async fn modules_delete_handler(
    State(state): State<AppState>,
    Path((course_id, module_id)): Path<(Uuid, Uuid)>,
) -> WebResult<impl IntoResponse> {
    tracing::debug!("DELETE module {} received", module_id);
    let module = find_module(&state, course_id, module_id).await?;

    module
        .delete(state.mm())
        .await
        .map_err(|e| WebError::resource_fetch_error(Module::get_resource_type(), e))?;

    tracing::info!("module deleted successfully module_id {}", module_id);
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Module deleted successfully.")),
    ))
}
