use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Postgres, QueryBuilder, postgres::PgRow};
use uuid::Uuid;

use crate::model::{ModelManager, Predicate, error::DatabaseResult};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResourceType {
    Course,
    Module,
    Lesson,
}

impl ResourceType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Course => "Course",
            Self::Module => "Module",
            Self::Lesson => "Lesson",
        }
    }
}

pub trait ResourceTyped {
    fn get_resource_type() -> ResourceType;
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub size: u32,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, page: u32, size: u32) -> Self {
        let size_i = i64::from(size.max(1));
        Self {
            items,
            total,
            page,
            size,
            total_pages: (total + size_i - 1) / size_i,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// `?page=0&size=10&sort=title,desc`, `page` is zero-based.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageRequest {
    /// Zero-based page index, defaults to 0
    pub page: Option<u32>,
    /// Page size, 1..=100, defaults to 10
    pub size: Option<u32>,
    /// `field` or `field,asc|desc`, defaults to the primary key
    pub sort: Option<String>,
}

/// A page request checked against an entity's sortable columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPage {
    pub page: u32,
    pub size: u32,
    pub sort_column: &'static str,
    pub direction: SortDirection,
}

impl ResolvedPage {
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page: Some(page),
            size: Some(size),
            sort: None,
        }
    }

    pub fn resolve_for<T: Repository>(&self) -> Result<ResolvedPage, String> {
        self.resolve(T::SORTABLE, T::PRIMARY_KEY)
    }

    /// `sortable` maps public field names to columns, `primary_key` is the
    /// default sort and the tie breaker.
    pub fn resolve(
        &self,
        sortable: &[(&'static str, &'static str)],
        primary_key: &'static str,
    ) -> Result<ResolvedPage, String> {
        let page = self.page.unwrap_or(0);
        let size = self.size.unwrap_or(DEFAULT_PAGE_SIZE);

        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            return Err(format!("Page size must be between 1 and {MAX_PAGE_SIZE}"));
        }

        let raw = self.sort.as_deref().map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Ok(ResolvedPage {
                page,
                size,
                sort_column: primary_key,
                direction: SortDirection::Asc,
            });
        }

        let (field, direction) = match raw.split_once(',') {
            Some((field, dir)) => (field.trim(), dir.trim()),
            None => (raw, "asc"),
        };

        let direction = match direction.to_ascii_lowercase().as_str() {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            other => return Err(format!("Unknown sort direction `{other}`")),
        };

        let sort_column = sortable
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
            .ok_or_else(|| format!("Unknown sort field `{field}`"))?;

        Ok(ResolvedPage {
            page,
            size,
            sort_column,
            direction,
        })
    }
}

/// How much of an entity's hierarchy a lookup returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Only the entity itself
    #[default]
    Lazy,
    /// The entity with its direct children
    Eager,
}

/// Persistence for an entity keyed by a UUID primary key.
///
/// `TABLE`, `PRIMARY_KEY` and `SORTABLE` are interpolated into SQL, they must
/// stay compile-time constants.
#[async_trait::async_trait]
pub trait Repository:
    ResourceTyped + Sized + Send + Sync + Unpin + for<'r> FromRow<'r, PgRow>
{
    const TABLE: &'static str;
    const PRIMARY_KEY: &'static str;
    /// Public field name to column.
    const SORTABLE: &'static [(&'static str, &'static str)];

    fn id(&self) -> Uuid;

    /// Inserts, or updates the mutable columns when the id already exists.
    async fn save(self, mm: &ModelManager) -> DatabaseResult<Self>;

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        let sql = format!("DELETE FROM {} WHERE {} = $1", Self::TABLE, Self::PRIMARY_KEY);
        sqlx::query(&sql)
            .bind(self.id())
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let sql = format!("SELECT * FROM {} WHERE {} = $1", Self::TABLE, Self::PRIMARY_KEY);
        let result = sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager, predicate: &Predicate) -> DatabaseResult<i64> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {}", Self::TABLE));
        predicate.push_where(&mut qb);

        let result: i64 = qb
            .build_query_scalar::<i64>()
            .fetch_one(mm.executor())
            .await?;
        Ok(result)
    }

    async fn find_all(
        mm: &ModelManager,
        predicate: &Predicate,
        page: &ResolvedPage,
    ) -> DatabaseResult<Page<Self>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT * FROM {}", Self::TABLE));
        predicate.push_where(&mut qb);

        qb.push(" ORDER BY ")
            .push(page.sort_column)
            .push(" ")
            .push(page.direction.sql());
        if page.sort_column != Self::PRIMARY_KEY {
            qb.push(", ").push(Self::PRIMARY_KEY).push(" ASC");
        }
        qb.push(" LIMIT ")
            .push_bind(i64::from(page.size))
            .push(" OFFSET ")
            .push_bind(page.offset());

        let items = qb.build_query_as::<Self>().fetch_all(mm.executor()).await?;
        let total = Self::count(mm, predicate).await?;

        Ok(Page::new(items, total, page.page, page.size))
    }
}

/// An entity that always belongs to a parent row.
#[async_trait::async_trait]
pub trait ChildRepository: Repository {
    const PARENT_KEY: &'static str;

    fn parent_id(&self) -> Uuid;

    fn parent_predicate(parent_id: Uuid) -> Predicate {
        Predicate::child_of(Self::PARENT_KEY, parent_id)
    }

    /// Single lookup on both keys, a child of another parent is `None`.
    async fn find_in_parent(
        mm: &ModelManager,
        parent_id: Uuid,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let sql = format!(
            "SELECT * FROM {} WHERE {} = $1 AND {} = $2",
            Self::TABLE,
            Self::PRIMARY_KEY,
            Self::PARENT_KEY
        );
        let result = sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .bind(parent_id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}
