mod database;
pub use database::DbConnection;

pub mod date_format;
pub mod entity;

mod error;
pub use error::{DatabaseError, DatabaseResult};

pub mod filter;
pub use filter::{Condition, Predicate};

mod repo;
pub use repo::{
    ChildRepository, DEFAULT_PAGE_SIZE, FetchMode, MAX_PAGE_SIZE, Page, PageRequest, Repository,
    ResolvedPage, ResourceType, ResourceTyped, SortDirection,
};

use sqlx::PgPool;

#[derive(Debug, Clone)]
pub struct ModelManager {
    database: DbConnection,
}

impl ModelManager {
    pub fn new(conn: DbConnection) -> Self {
        Self { database: conn }
    }

    pub fn executor(&self) -> &PgPool {
        self.database.pool()
    }
}
