use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::routes::courses::courses_create_handler,
        crate::web::routes::courses::courses_list_handler,
        crate::web::routes::courses::courses_get_handler,
        crate::web::routes::courses::courses_update_handler,
        crate::web::routes::courses::courses_delete_handler,
        crate::web::routes::modules::modules_create_handler,
        crate::web::routes::modules::modules_list_handler,
        crate::web::routes::modules::modules_get_handler,
        crate::web::routes::modules::modules_update_handler,
        crate::web::routes::modules::modules_delete_handler,
        crate::web::routes::lessons::lessons_create_handler,
        crate::web::routes::lessons::lessons_list_handler,
        crate::web::routes::lessons::lessons_get_handler,
        crate::web::routes::lessons::lessons_update_handler,
        crate::web::routes::lessons::lessons_delete_handler,
    ),
    tags(
        (name = "courses", description = "Course catalog"),
        (name = "modules", description = "Modules of a course"),
        (name = "lessons", description = "Lessons of a module"),
    ),
)]
pub struct ApiDoc;
