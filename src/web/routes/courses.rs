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
        FetchMode, Page, PageRequest, Repository, ResourceTyped,
        entity::{Course, CourseDto, CourseWithModulesRow},
        filter::CourseFilter,
    },
    web::{
        AppState, WebError, WebResult,
        dto::{FetchQuery, MessageResponse, courses::CourseWithModules},
        error::ErrorResponse,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route(
            "/courses",
            get(courses_list_handler).post(courses_create_handler),
        )
        .route(
            "/courses/{course_id}",
            get(courses_get_handler)
                .put(courses_update_handler)
                .delete(courses_delete_handler),
        )
        .with_state(state)
}

async fn find_course(state: &AppState, course_id: Uuid) -> WebResult<Course> {
    Course::find_by_id(state.mm(), course_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?
        .ok_or(WebError::resource_not_found(Course::get_resource_type()))
}

#[utoipa::path(
    post,
    path = "/courses",
    request_body = CourseDto,
    description = "Creates a new course",
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses"
)]
async fn courses_create_handler(
    State(state): State<AppState>,
    Json(payload): Json<CourseDto>,
) -> WebResult<impl IntoResponse> {
    tracing::debug!("POST course payload received {:?}", payload);
    payload
        .validate()
        .map_err(|e| WebError::resource_validation(Course::get_resource_type(), e))?;

    let created = Course::new(payload)
        .save(state.mm())
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;

    tracing::info!("course saved successfully course_id {}", created.course_id());
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/courses",
    description = "Page through courses, optionally filtered",
    params(CourseFilter, PageRequest),
    responses(
        (status = 200, description = "Requested page", body = Page<Course>),
        (status = 400, description = "Invalid filter or paging parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses"
)]
async fn courses_list_handler(
    State(state): State<AppState>,
    filter: Result<Query<CourseFilter>, QueryRejection>,
    page: Result<Query<PageRequest>, QueryRejection>,
) -> WebResult<impl IntoResponse> {
    let Query(filter) =
        filter.map_err(|e| WebError::resource_bad_query(Course::get_resource_type(), e))?;
    let Query(page) =
        page.map_err(|e| WebError::resource_bad_query(Course::get_resource_type(), e))?;
    let page = page
        .resolve_for::<Course>()
        .map_err(|e| WebError::resource_bad_request(Course::get_resource_type(), e))?;

    let courses = Course::find_all(state.mm(), &filter.predicate(), &page)
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(courses)))
}

#[utoipa::path(
    get,
    path = "/courses/{course_id}",
    description = "Fetch one course, `fetch=eager` includes its modules",
    params(
        ("course_id" = Uuid, Path, description = "ID of the course"),
        FetchQuery,
    ),
    responses(
        (status = 200, description = "Course found", body = CourseWithModules),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses"
)]
async fn courses_get_handler(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    fetch: Result<Query<FetchQuery>, QueryRejection>,
) -> WebResult<Response> {
    let Query(fetch) =
        fetch.map_err(|e| WebError::resource_bad_query(Course::get_resource_type(), e))?;
    match fetch.mode() {
        FetchMode::Lazy => {
            let course = find_course(&state, course_id).await?;
            Ok((StatusCode::OK, Json(course)).into_response())
        }
        FetchMode::Eager => {
            let course = CourseWithModulesRow::find_by_id(state.mm(), course_id)
                .await
                .and_then(|row| row.map(CourseWithModules::try_from).transpose())
                .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?
                .ok_or(WebError::resource_not_found(Course::get_resource_type()))?;
            Ok((StatusCode::OK, Json(course)).into_response())
        }
    }
}

#[utoipa::path(
    put,
    path = "/courses/{course_id}",
    request_body = CourseDto,
    description = "Overwrites the course fields present in the payload",
    params(
        ("course_id" = Uuid, Path, description = "ID of the course to update")
    ),
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses"
)]
async fn courses_update_handler(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    Json(payload): Json<CourseDto>,
) -> WebResult<impl IntoResponse> {
    tracing::debug!("PUT course {} payload received {:?}", course_id, payload);
    payload
        .validate()
        .map_err(|e| WebError::resource_validation(Course::get_resource_type(), e))?;

    let mut course = find_course(&state, course_id).await?;
    course.apply(payload);

    let updated = course
        .save(state.mm())
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;

    tracing::info!("course updated successfully course_id {}", course_id);
    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    delete,
    path = "/courses/{course_id}",
    description = "Deletes the course together with its modules and lessons",
    params(
        ("course_id" = Uuid, Path, description = "ID of the course to delete")
    ),
    responses(
        (status = 200, description = "Course deleted", body = MessageResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses"
)]
async fn courses_delete_handler(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    tracing::debug!("DELETE course {} received", course_id);
    let course = find_course(&state, course_id).await?;

    course
        .delete(state.mm())
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;

    tracing::info!("course deleted successfully course_id {}", course_id);
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Course deleted successfully.")),
    ))
}
