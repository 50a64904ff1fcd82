use serde::{Deserialize, Serialize};

use crate::model::{
    DatabaseError,
    entity::{Lesson, Module, ModuleWithLessonsRow},
};

/// A module with its lessons, returned for `?fetch=eager`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ModuleWithLessons {
    #[serde(flatten)]
    pub module: Module,
    pub lessons: Vec<Lesson>,
}

impl TryFrom<ModuleWithLessonsRow> for ModuleWithLessons {
    type Error = DatabaseError;

    fn try_from(value: ModuleWithLessonsRow) -> Result<Self, Self::Error> {
        let lessons = value.lessons()?;
        Ok(Self {
            module: value.module,
            lessons,
        })
    }
}
