use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::model::entity::Module;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, Repository, date_format, error::DatabaseResult};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, utoipa::ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "course_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseStatus {
    #[default]
    InProgress,
    Concluded,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, utoipa::ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "course_level", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    course_id: Uuid,
    title: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    image_url: Option<String>,
    status: CourseStatus,
    course_level: CourseLevel,
    #[serde(with = "date_format")]
    #[schema(value_type = String, example = "17-10-2026 12:00:00")]
    creation_date: NaiveDateTime,
    #[serde(with = "date_format")]
    #[schema(value_type = String, example = "17-10-2026 12:00:00")]
    update_date: NaiveDateTime,
}

/// Request body for creating and updating a course.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseDto {
    #[validate(length(min = 1, max = 150, message = "title must be 1 to 150 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 250, message = "description must be 1 to 250 characters"))]
    pub description: String,
    #[validate(url(message = "imageUrl must be a valid URL"))]
    pub image_url: Option<String>,
    pub status: Option<CourseStatus>,
    pub course_level: Option<CourseLevel>,
}

impl ResourceTyped for Course {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Course
    }
}

impl Course {
    /// Fresh course with a generated id, both dates set to now.
    pub fn new(data: CourseDto) -> Self {
        let now = date_format::now();
        Self {
            course_id: Uuid::new_v4(),
            title: data.title,
            description: data.description,
            image_url: data.image_url,
            status: data.status.unwrap_or_default(),
            course_level: data.course_level.unwrap_or_default(),
            creation_date: now,
            update_date: now,
        }
    }

    /// Copies the request onto this course, id and creation date stay.
    /// An absent status or level keeps the stored one.
    pub fn apply(&mut self, data: CourseDto) {
        self.title = data.title;
        self.description = data.description;
        self.image_url = data.image_url;
        if let Some(status) = data.status {
            self.status = status;
        }
        if let Some(course_level) = data.course_level {
            self.course_level = course_level;
        }
        self.update_date = date_format::now();
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn status(&self) -> CourseStatus {
        self.status
    }

    pub fn course_level(&self) -> CourseLevel {
        self.course_level
    }

    pub fn creation_date(&self) -> NaiveDateTime {
        self.creation_date
    }

    pub fn update_date(&self) -> NaiveDateTime {
        self.update_date
    }
}

#[async_trait]
impl Repository for Course {
    const TABLE: &'static str = "courses";
    const PRIMARY_KEY: &'static str = "course_id";
    const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("courseId", "course_id"),
        ("title", "title"),
        ("status", "status"),
        ("courseLevel", "course_level"),
        ("creationDate", "creation_date"),
        ("updateDate", "update_date"),
    ];

    fn id(&self) -> Uuid {
        self.course_id
    }

    async fn save(self, mm: &ModelManager) -> DatabaseResult<Self> {
        let saved = sqlx::query_as(
            r#"
            INSERT INTO courses
                (course_id, title, description, image_url, status, course_level, creation_date, update_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (course_id) DO UPDATE SET
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                image_url = EXCLUDED.image_url,
                status = EXCLUDED.status,
                course_level = EXCLUDED.course_level,
                update_date = EXCLUDED.update_date
            RETURNING *
            "#,
        )
        .bind(self.course_id)
        .bind(&self.title)
        .bind(&self.description)
        .bind(&self.image_url)
        .bind(self.status)
        .bind(self.course_level)
        .bind(self.creation_date)
        .bind(self.update_date)
        .fetch_one(mm.executor())
        .await?;

        Ok(saved)
    }

    /// Removes the course with all of its modules and their lessons.
    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        let mut tx = mm.executor().begin().await?;

        sqlx::query(
            "DELETE FROM lessons WHERE module_id IN (SELECT module_id FROM modules WHERE course_id = $1)",
        )
        .bind(self.course_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM modules WHERE course_id = $1")
            .bind(self.course_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM courses WHERE course_id = $1")
            .bind(self.course_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

// Utils

#[derive(sqlx::FromRow)]
pub struct CourseWithModulesRow {
    #[sqlx(flatten)]
    pub course: Course,
    pub modules: serde_json::Value,
}

impl CourseWithModulesRow {
    pub async fn find_by_id(mm: &ModelManager, course_id: Uuid) -> DatabaseResult<Option<Self>> {
        let row = sqlx::query_as(
            r#"
            SELECT
            c.*,
            COALESCE(
                json_agg(
                    json_build_object(
                        'moduleId', m.module_id,
                        'courseId', m.course_id,
                        'title', m.title,
                        'description', m.description,
                        'creationDate', to_char(m.creation_date, 'DD-MM-YYYY HH24:MI:SS')
                    )
                    ORDER BY m.module_id
                ) FILTER (WHERE m.module_id IS NOT NULL),
                '[]'
            ) AS modules
            FROM courses c
            LEFT JOIN modules m ON m.course_id = c.course_id
            WHERE c.course_id = $1
            GROUP BY c.course_id
            "#,
        )
        .bind(course_id)
        .fetch_optional(mm.executor())
        .await?;

        Ok(row)
    }

    pub fn modules(&self) -> DatabaseResult<Vec<Module>> {
        Ok(serde_json::from_value(self.modules.clone())?)
    }
}
