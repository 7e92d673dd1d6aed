//! Locale-independent text formatting of cell values
//!
//! All text rendering of typed values goes through a [`FormatPolicy`] passed
//! in by the caller. Nothing here reads process locale.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::schema::CellType;
use super::table::CellValue;

/// Fallback formats tried when parsing date/time text
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
];

/// Text formatting profile for cell values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatPolicy {
    /// chrono format string for date/time values
    pub datetime_format: Cow<'static, str>,
    pub true_text: Cow<'static, str>,
    pub false_text: Cow<'static, str>,
}

impl Default for FormatPolicy {
    fn default() -> Self {
        Self::invariant()
    }
}

impl FormatPolicy {
    /// The fixed invariant profile: ISO 8601 date/times, lowercase booleans
    pub fn invariant() -> Self {
        Self {
            datetime_format: Cow::Borrowed("%Y-%m-%dT%H:%M:%S%.f"),
            true_text: Cow::Borrowed("true"),
            false_text: Cow::Borrowed("false"),
        }
    }

    /// Set the date/time format
    pub fn with_datetime_format(mut self, format: impl Into<String>) -> Self {
        self.datetime_format = Cow::Owned(format.into());
        self
    }

    /// Render a value as text. Null renders as the empty string.
    pub fn format<'a>(&self, value: &'a CellValue) -> Cow<'a, str> {
        match value {
            CellValue::Null => Cow::Borrowed(""),
            CellValue::Bool(true) => Cow::Owned(self.true_text.to_string()),
            CellValue::Bool(false) => Cow::Owned(self.false_text.to_string()),
            CellValue::Int(i) => Cow::Owned(i.to_string()),
            CellValue::Float(f) => Cow::Owned(f.to_string()),
            CellValue::String(s) | CellValue::Other(s) => Cow::Borrowed(s.as_str()),
            CellValue::DateTime(dt) => Cow::Owned(dt.format(&self.datetime_format).to_string()),
        }
    }

    /// Materialize text as a value of the given type.
    ///
    /// Empty text is null. Text that does not parse for the type is kept as a
    /// string value rather than rejected.
    pub fn parse(&self, text: &str, cell_type: CellType) -> CellValue {
        if text.is_empty() {
            return CellValue::Null;
        }

        let trimmed = text.trim();
        let parsed = match cell_type {
            CellType::String => return CellValue::String(text.to_string()),
            CellType::Other => return CellValue::Other(text.to_string()),
            CellType::Int => trimmed.parse::<i64>().ok().map(CellValue::Int),
            CellType::Float => trimmed.parse::<f64>().ok().map(CellValue::Float),
            CellType::Bool => self.parse_bool(trimmed).map(CellValue::Bool),
            CellType::DateTime => self.parse_datetime(trimmed).map(CellValue::DateTime),
        };

        parsed.unwrap_or_else(|| {
            log::debug!("Keeping {:?} as text: not a valid {}", text, cell_type);
            CellValue::String(text.to_string())
        })
    }

    fn parse_bool(&self, text: &str) -> Option<bool> {
        if text.eq_ignore_ascii_case(&self.true_text) || text.eq_ignore_ascii_case("true") {
            Some(true)
        } else if text.eq_ignore_ascii_case(&self.false_text) || text.eq_ignore_ascii_case("false")
        {
            Some(false)
        } else {
            None
        }
    }

    fn parse_datetime(&self, text: &str) -> Option<NaiveDateTime> {
        std::iter::once(self.datetime_format.as_ref())
            .chain(DATETIME_FORMATS.iter().copied())
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
            .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.naive_local()))
            .or_else(|| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_invariant_format() {
        let policy = FormatPolicy::invariant();
        assert_eq!(policy.format(&CellValue::Null), "");
        assert_eq!(policy.format(&CellValue::Float(1.0)), "1");
        assert_eq!(policy.format(&CellValue::Float(2.5)), "2.5");
        assert_eq!(policy.format(&CellValue::Bool(true)), "true");
        assert_eq!(
            policy.format(&CellValue::DateTime(datetime("2024-03-01 08:30:00"))),
            "2024-03-01T08:30:00"
        );
    }

    #[test]
    fn test_parse_round_trip() {
        let policy = FormatPolicy::invariant();
        let dt = CellValue::DateTime(datetime("2024-03-01 08:30:00"));
        let text = policy.format(&dt).into_owned();
        assert_eq!(policy.parse(&text, CellType::DateTime), dt);
        assert_eq!(policy.parse("42", CellType::Int), CellValue::Int(42));
        assert_eq!(policy.parse("FALSE", CellType::Bool), CellValue::Bool(false));
        assert_eq!(policy.parse("", CellType::String), CellValue::Null);
    }

    #[test]
    fn test_parse_accepts_date_only_and_rfc3339() {
        let policy = FormatPolicy::invariant();
        assert_eq!(
            policy.parse("2024-03-01", CellType::DateTime),
            CellValue::DateTime(datetime("2024-03-01 00:00:00"))
        );
        assert_eq!(
            policy.parse("2024-03-01T08:30:00+02:00", CellType::DateTime),
            CellValue::DateTime(datetime("2024-03-01 08:30:00"))
        );
    }

    #[test]
    fn test_unparseable_kept_as_text() {
        let policy = FormatPolicy::invariant();
        assert_eq!(
            policy.parse("n/a", CellType::Int),
            CellValue::String("n/a".to_string())
        );
    }

    #[test]
    fn test_custom_datetime_format() {
        let policy = FormatPolicy::invariant().with_datetime_format("%d.%m.%Y %H:%M");
        let dt = CellValue::DateTime(datetime("2024-03-01 08:30:00"));
        assert_eq!(policy.format(&dt), "01.03.2024 08:30");
        assert_eq!(policy.parse("01.03.2024 08:30", CellType::DateTime), dt);
    }
}
