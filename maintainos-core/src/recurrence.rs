//! Recurrence rules for work orders.
//!
//! The backend hands rules over loosely typed: a JSON object, a string holding
//! serialized JSON, or nothing at all. `RecurrenceRule::from_value` normalizes
//! that into a closed set of variants, and `Schedule` decides what a work order
//! does on a given day when the rule can't be read.
//!
//! Weekday indices follow `Date.getDay()` numbering: Sunday = 0, Monday = 1 ...
//! Saturday = 6. Index 7 is read as Sunday so ISO-numbered payloads agree.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::work_item::WorkItem;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// How often a work order repeats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceRule {
    DoNotRepeat,
    Daily,
    /// Sunday-based weekday indices (0..=6).
    Weekly { days: BTreeSet<u8> },
    MonthlyByDate { day: u32 },
    /// Same month and day as the start date.
    Yearly,
}

/// Why a raw recurrence rule could not be normalized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleParseError {
    #[error("malformed rule: {0}")]
    Malformed(String),

    #[error("expected a rule object, found {0}")]
    NotAnObject(&'static str),

    #[error("'{rule}' rule is missing '{field}'")]
    MissingField {
        rule: &'static str,
        field: &'static str,
    },

    #[error("{field} value {value} is out of range")]
    OutOfRange { field: &'static str, value: i64 },

    #[error("unknown recurrence type '{0}'")]
    UnknownType(String),
}

/// The rule as it travels over the wire.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRule {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,

    #[serde(default, alias = "days_of_week", skip_serializing_if = "Option::is_none")]
    days_of_week: Option<Vec<i64>>,

    #[serde(default, alias = "day_of_month", skip_serializing_if = "Option::is_none")]
    day_of_month: Option<i64>,
}

impl RecurrenceRule {
    /// Normalize a raw `recurrenceRule` value.
    ///
    /// `null` and the empty string mean the work order doesn't repeat. A string is
    /// parsed as JSON once and must hold an object.
    pub fn from_value(value: &Value) -> Result<Self, RuleParseError> {
        match value {
            Value::Null => Ok(Self::DoNotRepeat),
            Value::String(text) if text.trim().is_empty() => Ok(Self::DoNotRepeat),
            Value::String(text) => {
                let inner: Value = serde_json::from_str(text)
                    .map_err(|e| RuleParseError::Malformed(e.to_string()))?;
                match &inner {
                    Value::Null => Ok(Self::DoNotRepeat),
                    Value::Object(_) => Self::from_object(&inner),
                    other => Err(RuleParseError::NotAnObject(json_kind(other))),
                }
            }
            Value::Object(_) => Self::from_object(value),
            other => Err(RuleParseError::NotAnObject(json_kind(other))),
        }
    }

    fn from_object(value: &Value) -> Result<Self, RuleParseError> {
        let wire = WireRule::deserialize(value).map_err(|e| RuleParseError::Malformed(e.to_string()))?;
        Self::try_from(wire)
    }

    /// Whether `day` matches this rule for a work order starting on `start`.
    ///
    /// Callers check `day >= start` first; this only looks at the rule itself.
    pub fn matches(&self, start: NaiveDate, day: NaiveDate) -> bool {
        match self {
            RecurrenceRule::DoNotRepeat => day == start,
            RecurrenceRule::Daily => true,
            RecurrenceRule::Weekly { days } => days.contains(&sunday_index(day.weekday())),
            RecurrenceRule::MonthlyByDate { day: day_of_month } => day.day() == *day_of_month,
            RecurrenceRule::Yearly => day.month() == start.month() && day.day() == start.day(),
        }
    }

    /// Weekdays of a weekly rule, Sunday first. Empty for other rules.
    pub fn weekdays(&self) -> Vec<Weekday> {
        match self {
            RecurrenceRule::Weekly { days } => days
                .iter()
                .filter_map(|&d| WEEKDAYS.get(usize::from(d)).copied())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// The `type` tag used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            RecurrenceRule::DoNotRepeat => "do_not_repeat",
            RecurrenceRule::Daily => "daily",
            RecurrenceRule::Weekly { .. } => "weekly",
            RecurrenceRule::MonthlyByDate { .. } => "monthly_by_date",
            RecurrenceRule::Yearly => "yearly",
        }
    }
}

impl TryFrom<WireRule> for RecurrenceRule {
    type Error = RuleParseError;

    fn try_from(wire: WireRule) -> Result<Self, Self::Error> {
        match wire.kind.as_deref() {
            None | Some("do_not_repeat") => Ok(RecurrenceRule::DoNotRepeat),
            Some("daily") => Ok(RecurrenceRule::Daily),
            Some("weekly") => {
                let raw = wire.days_of_week.ok_or(RuleParseError::MissingField {
                    rule: "weekly",
                    field: "daysOfWeek",
                })?;
                let days = raw
                    .into_iter()
                    .map(weekday_index)
                    .collect::<Result<BTreeSet<_>, _>>()?;
                Ok(RecurrenceRule::Weekly { days })
            }
            Some("monthly_by_date") => {
                let value = wire.day_of_month.ok_or(RuleParseError::MissingField {
                    rule: "monthly_by_date",
                    field: "dayOfMonth",
                })?;
                let day = u32::try_from(value)
                    .ok()
                    .filter(|d| (1..=31).contains(d))
                    .ok_or(RuleParseError::OutOfRange {
                        field: "dayOfMonth",
                        value,
                    })?;
                Ok(RecurrenceRule::MonthlyByDate { day })
            }
            Some("yearly") => Ok(RecurrenceRule::Yearly),
            Some(other) => Err(RuleParseError::UnknownType(other.to_string())),
        }
    }
}

impl From<&RecurrenceRule> for WireRule {
    fn from(rule: &RecurrenceRule) -> Self {
        let mut wire = WireRule {
            kind: Some(rule.kind().to_string()),
            days_of_week: None,
            day_of_month: None,
        };
        match rule {
            RecurrenceRule::Weekly { days } => {
                wire.days_of_week = Some(days.iter().map(|&d| i64::from(d)).collect());
            }
            RecurrenceRule::MonthlyByDate { day } => wire.day_of_month = Some(i64::from(*day)),
            _ => {}
        }
        wire
    }
}

impl Serialize for RecurrenceRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireRule::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RecurrenceRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        RecurrenceRule::from_value(&value).map_err(serde::de::Error::custom)
    }
}

impl FromStr for RecurrenceRule {
    type Err = RuleParseError;

    /// Parse a rule from its JSON text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecurrenceRule::from_value(&Value::String(s.to_string()))
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrenceRule::DoNotRepeat => write!(f, "Does not repeat"),
            RecurrenceRule::Daily => write!(f, "Daily"),
            RecurrenceRule::Weekly { days } => {
                // Indices outside 0..=6 never match a day, so they aren't listed.
                let labels: Vec<_> = days
                    .iter()
                    .filter_map(|&d| WEEKDAY_LABELS.get(usize::from(d)).copied())
                    .collect();
                if labels.is_empty() {
                    write!(f, "Weekly (no days selected)")
                } else {
                    write!(f, "Weekly on {}", labels.join(", "))
                }
            }
            RecurrenceRule::MonthlyByDate { day } => write!(f, "Monthly on day {}", day),
            RecurrenceRule::Yearly => write!(f, "Yearly"),
        }
    }
}

fn weekday_index(value: i64) -> Result<u8, RuleParseError> {
    match value {
        0..=6 => Ok(value as u8),
        7 => Ok(0),
        _ => Err(RuleParseError::OutOfRange {
            field: "daysOfWeek",
            value,
        }),
    }
}

fn sunday_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_sunday() as u8
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// What a work order's rule turned into after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulePolicy {
    Rule(RecurrenceRule),
    /// The rule couldn't be read; only the start date itself matches.
    ExactDate(RuleParseError),
    /// A readable rule with an unrecognized type; never matches.
    Never(String),
}

/// A work order's start date and normalized rule, ready for per-day checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    start: Option<NaiveDate>,
    policy: RulePolicy,
}

impl Schedule {
    pub fn of(item: &WorkItem) -> Self {
        let policy = match item.rule() {
            Ok(rule) => RulePolicy::Rule(rule),
            Err(RuleParseError::UnknownType(kind)) => {
                tracing::debug!(item = %item.id, kind = %kind, "unknown recurrence type, work order never occurs");
                RulePolicy::Never(kind)
            }
            Err(err) => {
                tracing::debug!(item = %item.id, error = %err, "unreadable recurrence rule, matching start date only");
                RulePolicy::ExactDate(err)
            }
        };

        Schedule {
            start: item.start_date,
            policy,
        }
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn policy(&self) -> &RulePolicy {
        &self.policy
    }

    /// The parse error behind an exact-date fallback, if there was one.
    pub fn fallback_reason(&self) -> Option<&RuleParseError> {
        match &self.policy {
            RulePolicy::ExactDate(err) => Some(err),
            _ => None,
        }
    }

    pub fn occurs_on(&self, day: NaiveDate) -> bool {
        let Some(start) = self.start else {
            return false;
        };
        if day < start {
            return false;
        }

        match &self.policy {
            RulePolicy::Rule(rule) => rule.matches(start, day),
            RulePolicy::ExactDate(_) => day == start,
            RulePolicy::Never(_) => false,
        }
    }
}

/// Whether `item` occurs on `day`. Time of day plays no part.
pub fn occurs_on(item: &WorkItem, day: NaiveDate) -> bool {
    Schedule::of(item).occurs_on(day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item(start: NaiveDate, rule: Option<Value>) -> WorkItem {
        let mut item = WorkItem::new("wo-1", "Inspect boiler").starting(start);
        item.recurrence_rule = rule;
        item
    }

    // --- parsing ---

    #[test]
    fn parse_object_rules() {
        assert_eq!(
            RecurrenceRule::from_value(&json!({"type": "daily"})).unwrap(),
            RecurrenceRule::Daily
        );
        assert_eq!(
            RecurrenceRule::from_value(&json!({"type": "weekly", "daysOfWeek": [5, 1, 3]})).unwrap(),
            RecurrenceRule::Weekly {
                days: BTreeSet::from([1, 3, 5])
            }
        );
        assert_eq!(
            RecurrenceRule::from_value(&json!({"type": "monthly_by_date", "dayOfMonth": 15})).unwrap(),
            RecurrenceRule::MonthlyByDate { day: 15 }
        );
        assert_eq!(
            RecurrenceRule::from_value(&json!({"type": "yearly"})).unwrap(),
            RecurrenceRule::Yearly
        );
    }

    #[test]
    fn parse_serialized_string_rule() {
        let raw = json!("{\"type\":\"weekly\",\"days_of_week\":[0,6]}");
        assert_eq!(
            RecurrenceRule::from_value(&raw).unwrap(),
            RecurrenceRule::Weekly {
                days: BTreeSet::from([0, 6])
            }
        );
    }

    #[test]
    fn parse_missing_rule_means_no_repeat() {
        assert_eq!(RecurrenceRule::from_value(&Value::Null).unwrap(), RecurrenceRule::DoNotRepeat);
        assert_eq!(RecurrenceRule::from_value(&json!("")).unwrap(), RecurrenceRule::DoNotRepeat);
        assert_eq!(RecurrenceRule::from_value(&json!({})).unwrap(), RecurrenceRule::DoNotRepeat);
    }

    #[test]
    fn parse_iso_sunday_as_zero() {
        let rule: RecurrenceRule = r#"{"type":"weekly","daysOfWeek":[7]}"#.parse().unwrap();
        assert_eq!(rule, RecurrenceRule::Weekly { days: BTreeSet::from([0]) });
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            RecurrenceRule::from_value(&json!("{not json")),
            Err(RuleParseError::Malformed(_))
        ));
        assert_eq!(
            RecurrenceRule::from_value(&json!(42)),
            Err(RuleParseError::NotAnObject("a number"))
        );
        assert_eq!(
            RecurrenceRule::from_value(&json!("[1,2]")),
            Err(RuleParseError::NotAnObject("an array"))
        );
        assert_eq!(
            RecurrenceRule::from_value(&json!({"type": "weekly"})),
            Err(RuleParseError::MissingField {
                rule: "weekly",
                field: "daysOfWeek"
            })
        );
        assert_eq!(
            RecurrenceRule::from_value(&json!({"type": "monthly_by_date", "dayOfMonth": 32})),
            Err(RuleParseError::OutOfRange {
                field: "dayOfMonth",
                value: 32
            })
        );
        assert_eq!(
            RecurrenceRule::from_value(&json!({"type": "weekly", "daysOfWeek": [8]})),
            Err(RuleParseError::OutOfRange {
                field: "daysOfWeek",
                value: 8
            })
        );
        assert_eq!(
            RecurrenceRule::from_value(&json!({"type": "hourly"})),
            Err(RuleParseError::UnknownType("hourly".into()))
        );
    }

    #[test]
    fn serialize_writes_wire_shape() {
        let rule = RecurrenceRule::Weekly {
            days: BTreeSet::from([1, 3]),
        };
        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            json!({"type": "weekly", "daysOfWeek": [1, 3]})
        );
        assert_eq!(
            serde_json::to_value(RecurrenceRule::Daily).unwrap(),
            json!({"type": "daily"})
        );
    }

    #[test]
    fn display_describes_rule() {
        let weekly = RecurrenceRule::Weekly {
            days: BTreeSet::from([1, 3, 5]),
        };
        assert_eq!(weekly.to_string(), "Weekly on Mon, Wed, Fri");
        assert_eq!(RecurrenceRule::MonthlyByDate { day: 31 }.to_string(), "Monthly on day 31");
        assert_eq!(weekly.weekdays(), vec![Weekday::Mon, Weekday::Wed, Weekday::Fri]);
    }

    #[test]
    fn hand_built_weekly_skips_unknown_indices() {
        let weekly = RecurrenceRule::Weekly {
            days: BTreeSet::from([1, 9]),
        };
        assert_eq!(weekly.to_string(), "Weekly on Mon");
        assert_eq!(weekly.weekdays(), vec![Weekday::Mon]);

        let only_bad = RecurrenceRule::Weekly {
            days: BTreeSet::from([7, 200]),
        };
        assert_eq!(only_bad.to_string(), "Weekly (no days selected)");
        assert!(only_bad.weekdays().is_empty());
        assert!(!only_bad.matches(date(2024, 1, 1), date(2024, 1, 7)));
    }

    // --- evaluation ---

    #[test]
    fn nothing_before_start() {
        let start = date(2024, 6, 10);
        for rule in [
            json!({"type": "daily"}),
            json!({"type": "weekly", "daysOfWeek": [0, 1, 2, 3, 4, 5, 6]}),
            json!({"type": "monthly_by_date", "dayOfMonth": 9}),
            json!({"type": "yearly"}),
            json!({"type": "do_not_repeat"}),
        ] {
            let item = item(start, Some(rule));
            assert!(!occurs_on(&item, date(2024, 6, 9)));
            assert!(!occurs_on(&item, date(2023, 6, 10)));
        }
    }

    #[test]
    fn no_start_date_never_occurs() {
        let mut item = item(date(2024, 1, 1), Some(json!({"type": "daily"})));
        item.start_date = None;
        assert!(!occurs_on(&item, date(2024, 1, 1)));
    }

    #[test]
    fn daily_every_day_from_start() {
        let item = item(date(2024, 2, 27), Some(json!({"type": "daily"})));
        for day in date(2024, 2, 27).iter_days().take(60) {
            assert!(occurs_on(&item, day));
        }
    }

    #[test]
    fn weekly_matches_listed_weekdays() {
        let item = item(date(2024, 1, 1), Some(json!({"type": "weekly", "daysOfWeek": [1, 3, 5]})));
        for day in date(2024, 1, 1).iter_days().take(28) {
            let expected = matches!(day.weekday(), Weekday::Mon | Weekday::Wed | Weekday::Fri);
            assert_eq!(occurs_on(&item, day), expected, "{}", day);
        }
    }

    #[test]
    fn monthly_day_31_skips_short_months() {
        let item = item(date(2024, 1, 1), Some(json!({"type": "monthly_by_date", "dayOfMonth": 31})));
        let hits: Vec<_> = date(2024, 1, 1)
            .iter_days()
            .take(366)
            .filter(|d| occurs_on(&item, *d))
            .map(|d| d.month())
            .collect();
        assert_eq!(hits, vec![1, 3, 5, 7, 8, 10, 12]);
    }

    #[test]
    fn yearly_matches_anniversary() {
        let item = item(date(2023, 3, 15), Some(json!({"type": "yearly"})));
        assert!(occurs_on(&item, date(2023, 3, 15)));
        assert!(occurs_on(&item, date(2026, 3, 15)));
        assert!(!occurs_on(&item, date(2026, 3, 16)));
        assert!(!occurs_on(&item, date(2026, 4, 15)));
    }

    #[test]
    fn yearly_leap_day_only_in_leap_years() {
        let item = item(date(2024, 2, 29), Some(json!({"type": "yearly"})));
        assert!(!occurs_on(&item, date(2025, 2, 28)));
        assert!(!occurs_on(&item, date(2025, 3, 1)));
        assert!(occurs_on(&item, date(2028, 2, 29)));
    }

    #[test]
    fn no_rule_only_on_start_date() {
        let item = item(date(2024, 3, 15), None);
        assert!(occurs_on(&item, date(2024, 3, 15)));
        assert!(!occurs_on(&item, date(2024, 3, 16)));
        assert!(!occurs_on(&item, date(2025, 3, 15)));
    }

    #[test]
    fn malformed_rule_behaves_like_do_not_repeat() {
        let start = date(2024, 5, 10);
        let malformed = item(start, Some(json!("{\"type\": \"daily\"")));
        let plain = item(start, Some(json!({"type": "do_not_repeat"})));

        for day in date(2024, 5, 1).iter_days().take(40) {
            assert_eq!(occurs_on(&malformed, day), occurs_on(&plain, day), "{}", day);
        }
        assert!(occurs_on(&malformed, start));

        let schedule = Schedule::of(&malformed);
        assert!(matches!(schedule.fallback_reason(), Some(RuleParseError::Malformed(_))));
    }

    #[test]
    fn unknown_type_never_occurs() {
        let item = item(date(2024, 5, 10), Some(json!({"type": "fortnightly"})));
        assert!(!occurs_on(&item, date(2024, 5, 10)));
        assert_eq!(Schedule::of(&item).policy(), &RulePolicy::Never("fortnightly".into()));
    }
}
