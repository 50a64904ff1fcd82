use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    model::{
        ChildRepository, Page, PageRequest, Repository, ResourceTyped,
        entity::{Lesson, LessonDto, Module},
        filter::ContentFilter,
    },
    web::{AppState, WebError, WebResult, dto::MessageResponse, error::ErrorResponse},
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route(
            "/modules/{module_id}/lessons",
            get(lessons_list_handler).post(lessons_create_handler),
        )
        .route(
            "/modules/{module_id}/lessons/{lesson_id}",
            get(lessons_get_handler)
                .put(lessons_update_handler)
                .delete(lessons_delete_handler),
        )
        .with_state(state)
}

async fn find_lesson(state: &AppState, module_id: Uuid, lesson_id: Uuid) -> WebResult<Lesson> {
    Lesson::find_in_parent(state.mm(), module_id, lesson_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?
        .ok_or(WebError::resource_not_found_in(
            Lesson::get_resource_type(),
            Module::get_resource_type(),
        ))
}

#[utoipa::path(
    post,
    path = "/modules/{module_id}/lessons",
    request_body = LessonDto,
    description = "Creates a lesson inside the module",
    params(
        ("module_id" = Uuid, Path, description = "ID of the owning module")
    ),
    responses(
        (status = 201, description = "Lesson created", body = Lesson),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons"
)]
async fn lessons_create_handler(
    State(state): State<AppState>,
    Path(module_id): Path<Uuid>,
    Json(payload): Json<LessonDto>,
) -> WebResult<impl IntoResponse> {
    tracing::debug!("POST lesson in module {} payload received {:?}", module_id, payload);
    payload
        .validate()
        .map_err(|e| WebError::resource_validation(Lesson::get_resource_type(), e))?;

    let module = Module::find_by_id(state.mm(), module_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Module::get_resource_type(), e))?
        .ok_or(WebError::resource_not_found(Module::get_resource_type()))?;

    let created = Lesson::new(module.module_id(), payload)
        .save(state.mm())
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    tracing::info!("lesson saved successfully lesson_id {}", created.lesson_id());
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/modules/{module_id}/lessons",
    description = "Page through the lessons of a module",
    params(
        ("module_id" = Uuid, Path, description = "ID of the owning module"),
        ContentFilter,
        PageRequest,
    ),
    responses(
        (status = 200, description = "Requested page", body = Page<Lesson>),
        (status = 400, description = "Invalid filter or paging parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons"
)]
async fn lessons_list_handler(
    State(state): State<AppState>,
    Path(module_id): Path<Uuid>,
    filter: Result<Query<ContentFilter>, QueryRejection>,
    page: Result<Query<PageRequest>, QueryRejection>,
) -> WebResult<impl IntoResponse> {
    let Query(filter) =
        filter.map_err(|e| WebError::resource_bad_query(Lesson::get_resource_type(), e))?;
    let Query(page) =
        page.map_err(|e| WebError::resource_bad_query(Lesson::get_resource_type(), e))?;
    let page = page
        .resolve_for::<Lesson>()
        .map_err(|e| WebError::resource_bad_request(Lesson::get_resource_type(), e))?;

    let predicate = Lesson::parent_predicate(module_id).and(filter.predicate());
    let lessons = Lesson::find_all(state.mm(), &predicate, &page)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(lessons)))
}

#[utoipa::path(
    get,
    path = "/modules/{module_id}/lessons/{lesson_id}",
    description = "Fetch one lesson of the module",
    params(
        ("module_id" = Uuid, Path, description = "ID of the owning module"),
        ("lesson_id" = Uuid, Path, description = "ID of the lesson"),
    ),
    responses(
        (status = 200, description = "Lesson found", body = Lesson),
        (status = 404, description = "Lesson not found for this module", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons"
)]
async fn lessons_get_handler(
    State(state): State<AppState>,
    Path((module_id, lesson_id)): Path<(Uuid, Uuid)>,
) -> WebResult<impl IntoResponse> {
    let lesson = find_lesson(&state, module_id, lesson_id).await?;
    Ok((StatusCode::OK, Json(lesson)))
}

#[utoipa::path(
    put,
    path = "/modules/{module_id}/lessons/{lesson_id}",
    request_body = LessonDto,
    description = "Overwrites title, description and video of the lesson",
    params(
        ("module_id" = Uuid, Path, description = "ID of the owning module"),
        ("lesson_id" = Uuid, Path, description = "ID of the lesson to update"),
    ),
    responses(
        (status = 200, description = "Lesson updated", body = Lesson),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 404, description = "Lesson not found for this module", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons"
)]
async fn lessons_update_handler(
    State(state): State<AppState>,
    Path((module_id, lesson_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<LessonDto>,
) -> WebResult<impl IntoResponse> {
    tracing::debug!("PUT lesson {} payload received {:?}", lesson_id, payload);
    payload
        .validate()
        .map_err(|e| WebError::resource_validation(Lesson::get_resource_type(), e))?;

    let mut lesson = find_lesson(&state, module_id, lesson_id).await?;
    lesson.apply(payload);

    let updated = lesson
        .save(state.mm())
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    tracing::info!("lesson updated successfully lesson_id {}", lesson_id);
    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    delete,
    path = "/modules/{module_id}/lessons/{lesson_id}",
    description = "Deletes the lesson",
    params(
        ("module_id" = Uuid, Path, description = "ID of the owning module"),
        ("lesson_id" = Uuid, Path, description = "ID of the lesson to delete"),
    ),
    responses(
        (status = 200, description = "Lesson deleted", body = MessageResponse),
        (status = 404, description = "Lesson not found for this module", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons"
)]
async fn lessons_delete_handler(
    State(state): State<AppState>,
    Path((module_id, lesson_id)): Path<(Uuid, Uuid)>,
) -> WebResult<impl IntoResponse> {
    tracing::debug!("DELETE lesson {} received", lesson_id);
    let lesson = find_lesson(&state, module_id, lesson_id).await?;

    lesson
        .delete(state.mm())
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    tracing::info!("lesson deleted successfully lesson_id {}", lesson_id);
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Lesson deleted successfully.")),
    ))
}
