//! Dynamic filter predicates.
//!
//! Every optional query parameter becomes an `Option<Condition>`, the present
//! ones are folded with AND into a [`Predicate`] which renders itself into an
//! `sqlx::QueryBuilder`. Values are always bound, column names only ever come
//! from the constants below or from `Repository` impls.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::model::date_format;
use crate::model::entity::{CourseLevel, CourseStatus};

pub const TITLE_COLUMN: &str = "title";
pub const CREATION_DATE_COLUMN: &str = "creation_date";
pub const STATUS_COLUMN: &str = "status";
pub const LEVEL_COLUMN: &str = "course_level";

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Uuid(Uuid),
    Status(CourseStatus),
    Level(CourseLevel),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Case-insensitive substring match.
    Contains { column: &'static str, needle: String },
    OnOrAfter { column: &'static str, at: NaiveDateTime },
    Before { column: &'static str, at: NaiveDateTime },
    Equals { column: &'static str, value: Value },
}

impl Condition {
    /// Blank needles impose no constraint.
    pub fn contains(column: &'static str, needle: Option<&str>) -> Option<Self> {
        let needle = needle.map(str::trim).filter(|n| !n.is_empty())?;
        Some(Self::Contains {
            column,
            needle: needle.to_string(),
        })
    }

    pub fn equals(column: &'static str, value: Option<Value>) -> Option<Self> {
        value.map(|value| Self::Equals { column, value })
    }

    /// Inclusive lower bound at the start of `day`.
    pub fn from_day(column: &'static str, day: Option<NaiveDate>) -> Option<Self> {
        let at = day?.and_hms_opt(0, 0, 0)?;
        Some(Self::OnOrAfter { column, at })
    }

    /// Inclusive upper bound through the end of `day`.
    pub fn through_day(column: &'static str, day: Option<NaiveDate>) -> Option<Self> {
        let at = day?.succ_opt()?.and_hms_opt(0, 0, 0)?;
        Some(Self::Before { column, at })
    }

    fn push<'a>(&self, qb: &mut QueryBuilder<'a, Postgres>) {
        match self {
            Self::Contains { column, needle } => {
                qb.push(*column)
                    .push(" ILIKE '%' || ")
                    .push_bind(escape_like(needle))
                    .push(" || '%'");
            }
            Self::OnOrAfter { column, at } => {
                qb.push(*column).push(" >= ").push_bind(*at);
            }
            Self::Before { column, at } => {
                qb.push(*column).push(" < ").push_bind(*at);
            }
            Self::Equals { column, value } => {
                qb.push(*column).push(" = ");
                match value {
                    Value::Uuid(id) => qb.push_bind(*id),
                    Value::Status(status) => qb.push_bind(*status),
                    Value::Level(level) => qb.push_bind(*level),
                };
            }
        }
    }
}

/// Escapes LIKE wildcards so user input matches literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Conjunction of conditions. An empty predicate matches every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    conditions: Vec<Condition>,
}

impl Predicate {
    pub fn all() -> Self {
        Self::default()
    }

    /// Folds the present conditions with AND, absent ones are dropped.
    pub fn from_optional<I>(conditions: I) -> Self
    where
        I: IntoIterator<Item = Option<Condition>>,
    {
        Self {
            conditions: conditions.into_iter().flatten().collect(),
        }
    }

    /// Restricts rows to those whose `parent_column` equals `parent_id`.
    pub fn child_of(parent_column: &'static str, parent_id: Uuid) -> Self {
        Self {
            conditions: vec![Condition::Equals {
                column: parent_column,
                value: Value::Uuid(parent_id),
            }],
        }
    }

    pub fn and(mut self, other: Predicate) -> Self {
        self.conditions.extend(other.conditions);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Appends ` WHERE c1 AND c2 ...`, nothing at all when empty.
    pub fn push_where<'a>(&self, qb: &mut QueryBuilder<'a, Postgres>) {
        for (i, condition) in self.conditions.iter().enumerate() {
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            condition.push(qb);
        }
    }
}

fn creation_date_conditions(
    on: Option<NaiveDate>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> [Option<Condition>; 4] {
    [
        Condition::from_day(CREATION_DATE_COLUMN, on),
        Condition::through_day(CREATION_DATE_COLUMN, on),
        Condition::from_day(CREATION_DATE_COLUMN, from),
        Condition::through_day(CREATION_DATE_COLUMN, to),
    ]
}

/// Query string filter for `GET /courses`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct CourseFilter {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Exact creation day, `dd-MM-yyyy`
    #[serde(default, with = "date_format::optional_date")]
    #[param(value_type = Option<String>, example = "17-10-2026")]
    pub creation_date: Option<NaiveDate>,
    /// Created on or after this day, `dd-MM-yyyy`
    #[serde(default, with = "date_format::optional_date")]
    #[param(value_type = Option<String>, example = "01-10-2026")]
    pub creation_date_from: Option<NaiveDate>,
    /// Created on or before this day, `dd-MM-yyyy`
    #[serde(default, with = "date_format::optional_date")]
    #[param(value_type = Option<String>, example = "31-10-2026")]
    pub creation_date_to: Option<NaiveDate>,
    pub status: Option<CourseStatus>,
    pub course_level: Option<CourseLevel>,
}

impl CourseFilter {
    pub fn predicate(&self) -> Predicate {
        let dates = creation_date_conditions(
            self.creation_date,
            self.creation_date_from,
            self.creation_date_to,
        );

        Predicate::from_optional(
            [
                Condition::contains(TITLE_COLUMN, self.title.as_deref()),
                Condition::equals(STATUS_COLUMN, self.status.map(Value::Status)),
                Condition::equals(LEVEL_COLUMN, self.course_level.map(Value::Level)),
            ]
            .into_iter()
            .chain(dates),
        )
    }
}

/// Query string filter for module and lesson listings.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ContentFilter {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Exact creation day, `dd-MM-yyyy`
    #[serde(default, with = "date_format::optional_date")]
    #[param(value_type = Option<String>, example = "17-10-2026")]
    pub creation_date: Option<NaiveDate>,
    /// Created on or after this day, `dd-MM-yyyy`
    #[serde(default, with = "date_format::optional_date")]
    #[param(value_type = Option<String>, example = "01-10-2026")]
    pub creation_date_from: Option<NaiveDate>,
    /// Created on or before this day, `dd-MM-yyyy`
    #[serde(default, with = "date_format::optional_date")]
    #[param(value_type = Option<String>, example = "31-10-2026")]
    pub creation_date_to: Option<NaiveDate>,
}

impl ContentFilter {
    pub fn predicate(&self) -> Predicate {
        let dates = creation_date_conditions(
            self.creation_date,
            self.creation_date_from,
            self.creation_date_to,
        );

        Predicate::from_optional(
            std::iter::once(Condition::contains(TITLE_COLUMN, self.title.as_deref())).chain(dates),
        )
    }
}
