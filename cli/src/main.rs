use clap::{Parser, Subcommand, ValueEnum};
use coursehub::model::entity::{
    Course, CourseDto, CourseLevel, CourseStatus, Lesson, LessonDto, Module, ModuleDto,
};
use coursehub::model::filter::CourseFilter;
use coursehub::model::{DatabaseError, DbConnection, ModelManager, PageRequest, Repository};
use validator::Validate;

#[derive(Parser, Debug)]
#[command(about = "CLI tool for filling the course catalog DB", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage courses
    Course {
        #[command(subcommand)]
        action: CourseCommands,
    },

    /// Manage modules
    Module {
        #[command(subcommand)]
        action: ModuleCommands,
    },

    /// Manage lessons
    Lesson {
        #[command(subcommand)]
        action: LessonCommands,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum StatusArg {
    InProgress,
    Concluded,
}

impl From<StatusArg> for CourseStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::InProgress => CourseStatus::InProgress,
            StatusArg::Concluded => CourseStatus::Concluded,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LevelArg {
    Beginner,
    Intermediate,
    Advanced,
}

impl From<LevelArg> for CourseLevel {
    fn from(value: LevelArg) -> Self {
        match value {
            LevelArg::Beginner => CourseLevel::Beginner,
            LevelArg::Intermediate => CourseLevel::Intermediate,
            LevelArg::Advanced => CourseLevel::Advanced,
        }
    }
}

/// Course management
#[derive(Subcommand, Debug)]
pub enum CourseCommands {
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        image_url: Option<String>,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        #[arg(long, value_enum)]
        level: Option<LevelArg>,
    },
    List {
        /// Only courses whose title contains this text
        #[arg(long)]
        title: Option<String>,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        size: u32,
    },
}

/// Module management
#[derive(Subcommand, Debug)]
pub enum ModuleCommands {
    Add {
        /// Course title to attach the module to
        #[arg(long)]
        course_title: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
    },
}

/// Lesson management
#[derive(Subcommand, Debug)]
pub enum LessonCommands {
    Add {
        /// Module title to attach the lesson to
        #[arg(long)]
        module_title: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        video_url: String,
    },
}

fn check<T: Validate>(what: &str, dto: &T) {
    if let Err(e) = dto.validate() {
        eprintln!("invalid {what}: {e}");
        std::process::exit(2);
    }
}

/// The single id among `ids` matched by `title`, an error when none or several match.
fn single_match(what: &str, title: &str, ids: &[uuid::Uuid]) -> Result<uuid::Uuid, String> {
    match ids {
        [id] => Ok(*id),
        [] => Err(format!("no {what} titled `{title}`")),
        _ => Err(format!(
            "{} {what}s are titled `{title}`, rename one first",
            ids.len()
        )),
    }
}

async fn id_by_title(
    mm: &ModelManager,
    what: &str,
    query: &'static str,
    title: &str,
) -> Result<uuid::Uuid, DatabaseError> {
    let ids: Vec<uuid::Uuid> = sqlx::query_scalar(query)
        .bind(title)
        .fetch_all(mm.executor())
        .await
        .map_err(DatabaseError::SqlxError)?;

    match single_match(what, title, &ids) {
        Ok(id) => Ok(id),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    }
}

#[tokio::main]
async fn main() -> coursehub::error::AppResult<()> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    let url = std::env::var("DATABASE_URL").map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::NotFound, format!("DATABASE_URL: {e}"))
    })?;
    let mm = ModelManager::new(DbConnection::connect(&url)?);

    match args.command {
        Commands::Course { action } => match action {
            CourseCommands::Add {
                title,
                description,
                image_url,
                status,
                level,
            } => {
                let dto = CourseDto {
                    title,
                    description,
                    image_url,
                    status: status.map(Into::into),
                    course_level: level.map(Into::into),
                };
                check("course", &dto);
                let course = Course::new(dto).save(&mm).await?;
                println!("Course created: {:?}", course);
            }
            CourseCommands::List { title, page, size } => {
                let filter = CourseFilter {
                    title,
                    ..Default::default()
                };
                let page = match PageRequest::new(page, size).resolve_for::<Course>() {
                    Ok(page) => page,
                    Err(e) => {
                        eprintln!("{e}");
                        std::process::exit(2);
                    }
                };
                let courses = Course::find_all(&mm, &filter.predicate(), &page).await?;
                for course in &courses.items {
                    println!("{} {}", course.course_id(), course.title());
                }
                println!(
                    "page {} of {} ({} total)",
                    courses.page + 1,
                    courses.total_pages.max(1),
                    courses.total
                );
            }
        },

        Commands::Module { action } => match action {
            ModuleCommands::Add {
                course_title,
                title,
                description,
            } => {
                let dto = ModuleDto { title, description };
                check("module", &dto);
                let course_id = id_by_title(
                    &mm,
                    "course",
                    "SELECT course_id FROM courses WHERE title = $1",
                    &course_title,
                )
                .await?;

                let module = Module::new(course_id, dto).save(&mm).await?;
                println!("Module created: {:?}", module);
            }
        },

        Commands::Lesson { action } => match action {
            LessonCommands::Add {
                module_title,
                title,
                description,
                video_url,
            } => {
                let dto = LessonDto {
                    title,
                    description,
                    video_url,
                };
                check("lesson", &dto);
                let module_id = id_by_title(
                    &mm,
                    "module",
                    "SELECT module_id FROM modules WHERE title = $1",
                    &module_title,
                )
                .await?;

                let lesson = Lesson::new(module_id, dto).save(&mm).await?;
                println!("Lesson created: {:?}", lesson);
            }
        },
    }

    Ok(())
}
