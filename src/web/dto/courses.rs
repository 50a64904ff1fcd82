use serde::{Deserialize, Serialize};

use crate::model::{
    DatabaseError,
    entity::{Course, CourseWithModulesRow, Module},
};

/// A course with its modules, returned for `?fetch=eager`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CourseWithModules {
    #[serde(flatten)]
    pub course: Course,
    pub modules: Vec<Module>,
}

impl TryFrom<CourseWithModulesRow> for CourseWithModules {
    type Error = DatabaseError;

    fn try_from(value: CourseWithModulesRow) -> Result<Self, Self::Error> {
        let modules = value.modules()?;
        Ok(Self {
            course: value.course,
            modules,
        })
    }
}
