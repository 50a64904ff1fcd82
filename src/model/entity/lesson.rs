use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::model::repo::ResourceTyped;
use crate::model::{ChildRepository, ModelManager, Repository, date_format, error::DatabaseResult};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    lesson_id: Uuid,
    module_id: Uuid,
    title: String,
    description: String,
    video_url: String,
    #[serde(with = "date_format")]
    #[schema(value_type = String, example = "17-10-2026 12:00:00")]
    creation_date: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonDto {
    #[validate(length(min = 1, max = 150, message = "title must be 1 to 150 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 250, message = "description must be 1 to 250 characters"))]
    pub description: String,
    #[validate(url(message = "videoUrl must be a valid URL"))]
    pub video_url: String,
}

impl ResourceTyped for Lesson {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Lesson
    }
}

impl Lesson {
    pub fn new(module_id: Uuid, data: LessonDto) -> Self {
        Self {
            lesson_id: Uuid::new_v4(),
            module_id,
            title: data.title,
            description: data.description,
            video_url: data.video_url,
            creation_date: date_format::now(),
        }
    }

    pub fn apply(&mut self, data: LessonDto) {
        self.title = data.title;
        self.description = data.description;
        self.video_url = data.video_url;
    }

    pub fn lesson_id(&self) -> Uuid {
        self.lesson_id
    }

    pub fn module_id(&self) -> Uuid {
        self.module_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn video_url(&self) -> &str {
        &self.video_url
    }

    pub fn creation_date(&self) -> NaiveDateTime {
        self.creation_date
    }
}

#[async_trait]
impl Repository for Lesson {
    const TABLE: &'static str = "lessons";
    const PRIMARY_KEY: &'static str = "lesson_id";
    const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("lessonId", "lesson_id"),
        ("title", "title"),
        ("creationDate", "creation_date"),
    ];

    fn id(&self) -> Uuid {
        self.lesson_id
    }

    async fn save(self, mm: &ModelManager) -> DatabaseResult<Self> {
        let saved = sqlx::query_as(
            r#"
            INSERT INTO lessons (lesson_id, module_id, title, description, video_url, creation_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (lesson_id) DO UPDATE SET
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                video_url = EXCLUDED.video_url
            RETURNING *
            "#,
        )
        .bind(self.lesson_id)
        .bind(self.module_id)
        .bind(&self.title)
        .bind(&self.description)
        .bind(&self.video_url)
        .bind(self.creation_date)
        .fetch_one(mm.executor())
        .await?;

        Ok(saved)
    }
}

#[async_trait]
impl ChildRepository for Lesson {
    const PARENT_KEY: &'static str = "module_id";

    fn parent_id(&self) -> Uuid {
        self.module_id
    }
}
