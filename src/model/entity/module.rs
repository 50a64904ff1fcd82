use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::model::entity::Lesson;
use crate::model::repo::ResourceTyped;
use crate::model::{ChildRepository, ModelManager, Repository, date_format, error::DatabaseResult};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    module_id: Uuid,
    course_id: Uuid,
    title: String,
    description: String,
    #[serde(with = "date_format")]
    #[schema(value_type = String, example = "17-10-2026 12:00:00")]
    creation_date: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDto {
    #[validate(length(min = 1, max = 150, message = "title must be 1 to 150 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 250, message = "description must be 1 to 250 characters"))]
    pub description: String,
}

impl ResourceTyped for Module {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Module
    }
}

impl Module {
    pub fn new(course_id: Uuid, data: ModuleDto) -> Self {
        Self {
            module_id: Uuid::new_v4(),
            course_id,
            title: data.title,
            description: data.description,
            creation_date: date_format::now(),
        }
    }

    pub fn apply(&mut self, data: ModuleDto) {
        self.title = data.title;
        self.description = data.description;
    }

    pub fn module_id(&self) -> Uuid {
        self.module_id
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

    pub fn creation_date(&self) -> NaiveDateTime {
        self.creation_date
    }
}

#[async_trait]
impl Repository for Module {
    const TABLE: &'static str = "modules";
    const PRIMARY_KEY: &'static str = "module_id";
    const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("moduleId", "module_id"),
        ("title", "title"),
        ("creationDate", "creation_date"),
    ];

    fn id(&self) -> Uuid {
        self.module_id
    }

    async fn save(self, mm: &ModelManager) -> DatabaseResult<Self> {
        let saved = sqlx::query_as(
            r#"
            INSERT INTO modules (module_id, course_id, title, description, creation_date)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (module_id) DO UPDATE SET
                title = EXCLUDED.title,
                description = EXCLUDED.description
            RETURNING *
            "#,
        )
        .bind(self.module_id)
        .bind(self.course_id)
        .bind(&self.title)
        .bind(&self.description)
        .bind(self.creation_date)
        .fetch_one(mm.executor())
        .await?;

        Ok(saved)
    }

    /// Removes the module together with its lessons.
    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        let mut tx = mm.executor().begin().await?;

        sqlx::query("DELETE FROM lessons WHERE module_id = $1")
            .bind(self.module_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM modules WHERE module_id = $1")
            .bind(self.module_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl ChildRepository for Module {
    const PARENT_KEY: &'static str = "course_id";

    fn parent_id(&self) -> Uuid {
        self.course_id
    }
}

// Utils

#[derive(sqlx::FromRow)]
pub struct ModuleWithLessonsRow {
    #[sqlx(flatten)]
    pub module: Module,
    pub lessons: serde_json::Value,
}

impl ModuleWithLessonsRow {
    pub async fn find_in_course(
        mm: &ModelManager,
        course_id: Uuid,
        module_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let row = sqlx::query_as(
            r#"
            SELECT
            m.*,
            COALESCE(
                json_agg(
                    json_build_object(
                        'lessonId', l.lesson_id,
                        'moduleId', l.module_id,
                        'title', l.title,
                        'description', l.description,
                        'videoUrl', l.video_url,
                        'creationDate', to_char(l.creation_date, 'DD-MM-YYYY HH24:MI:SS')
                    )
                    ORDER BY l.lesson_id
                ) FILTER (WHERE l.lesson_id IS NOT NULL),
                '[]'
            ) AS lessons
            FROM modules m
            LEFT JOIN lessons l ON l.module_id = m.module_id
            WHERE m.module_id = $1 AND m.course_id = $2
            GROUP BY m.module_id
            "#,
        )
        .bind(module_id)
        .bind(course_id)
        .fetch_optional(mm.executor())
        .await?;

        Ok(row)
    }

    pub fn lessons(&self) -> DatabaseResult<Vec<Lesson>> {
        Ok(serde_json::from_value(self.lessons.clone())?)
    }
}
