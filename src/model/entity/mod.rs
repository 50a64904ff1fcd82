mod course;
pub use course::{Course, CourseDto, CourseLevel, CourseStatus, CourseWithModulesRow};

mod module;
pub use module::{Module, ModuleDto, ModuleWithLessonsRow};

mod lesson;
pub use lesson::{Lesson, LessonDto};
