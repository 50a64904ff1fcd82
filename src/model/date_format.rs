//! Wire formats for dates.
//!
//! Timestamps travel as `dd-MM-yyyy HH:mm:ss`, filter dates as `dd-MM-yyyy`.

use chrono::{NaiveDate, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serializer};

pub const DATETIME_FORMAT: &str = "%d-%m-%Y %H:%M:%S";
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Current UTC time truncated to whole seconds, the precision we expose.
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(0)
}

pub fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
}

pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&value.format(DATETIME_FORMAT))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    NaiveDateTime::parse_from_str(&raw, DATETIME_FORMAT).map_err(serde::de::Error::custom)
}

/// `Option<NaiveDate>` in `dd-MM-yyyy`, used by query string filters.
pub mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt: Option<String> = Option::deserialize(deserializer)?;
        match opt {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => super::parse_date(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod test {
    use chrono::{NaiveDate, Timelike};
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Serialize, Deserialize)]
    struct Stamped {
        #[serde(with = "crate::model::date_format")]
        at: NaiveDateTime,
    }

    #[derive(Deserialize)]
    struct DateQuery {
        #[serde(default, with = "optional_date")]
        day: Option<NaiveDate>,
    }

    #[test]
    fn timestamp_uses_day_first_format() {
        let at = NaiveDate::from_ymd_opt(2026, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 1)
            .unwrap();
        let json = serde_json::to_string(&Stamped { at }).unwrap();
        assert_eq!(json, r#"{"at":"07-03-2026 09:05:01"}"#);

        let back: Stamped = serde_json::from_str(&json).unwrap();
        assert_eq!(back.at, at);
    }

    #[test]
    fn timestamp_rejects_iso_format() {
        assert!(serde_json::from_str::<Stamped>(r#"{"at":"2026-03-07T09:05:01"}"#).is_err());
    }

    #[test]
    fn now_has_no_subseconds() {
        assert_eq!(now().nanosecond(), 0);
    }

    #[test]
    fn optional_date_parses_or_skips() {
        let q: DateQuery = serde_json::from_str(r#"{"day":"31-12-2025"}"#).unwrap();
        assert_eq!(q.day, NaiveDate::from_ymd_opt(2025, 12, 31));

        let q: DateQuery = serde_json::from_str("{}").unwrap();
        assert!(q.day.is_none());

        let q: DateQuery = serde_json::from_str(r#"{"day":""}"#).unwrap();
        assert!(q.day.is_none());
    }

    #[test]
    fn optional_date_rejects_garbage() {
        assert!(serde_json::from_str::<DateQuery>(r#"{"day":"2025-12-31"}"#).is_err());
        assert!(serde_json::from_str::<DateQuery>(r#"{"day":"32-01-2025"}"#).is_err());
    }
}
