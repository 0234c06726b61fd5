//! Work orders as the maintainOS backend exports them.
//!
//! The calendar only reads these. Field names follow the backend's camelCase
//! JSON, and the loosely typed parts (`startDate`, `recurrenceRule`) are kept
//! lenient here and normalized later.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::recurrence::{RecurrenceRule, RuleParseError};

/// A work order shown on the calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub id: String,
    pub title: String,

    #[serde(default)]
    pub status: WorkItemStatus,

    #[serde(default)]
    pub priority: Priority,

    /// Date only; a timestamp's time of day is dropped on load.
    #[serde(default, deserialize_with = "deserialize_start_date")]
    pub start_date: Option<NaiveDate>,

    /// Raw rule: an object, a string of serialized JSON, or null.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_rule: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<Assignee>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Assignee {
    /// Name if there is one, otherwise the id.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum WorkItemStatus {
    #[default]
    Open,
    InProgress,
    OnHold,
    Completed,
    Cancelled,
    /// Any status this build doesn't know about, kept verbatim.
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl WorkItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        WorkItem {
            id: id.into(),
            title: title.into(),
            status: WorkItemStatus::default(),
            priority: Priority::default(),
            start_date: None,
            recurrence_rule: None,
            assignee: None,
        }
    }

    pub fn starting(mut self, start: NaiveDate) -> Self {
        self.start_date = Some(start);
        self
    }

    pub fn with_rule(mut self, rule: &RecurrenceRule) -> Self {
        self.recurrence_rule = serde_json::to_value(rule).ok();
        self
    }

    /// The normalized recurrence rule. A missing rule means no repeat.
    pub fn rule(&self) -> Result<RecurrenceRule, RuleParseError> {
        match &self.recurrence_rule {
            Some(value) => RecurrenceRule::from_value(value),
            None => Ok(RecurrenceRule::DoNotRepeat),
        }
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

impl WorkItemStatus {
    pub fn as_str(&self) -> &str {
        match self {
            WorkItemStatus::Open => "open",
            WorkItemStatus::InProgress => "in_progress",
            WorkItemStatus::OnHold => "on_hold",
            WorkItemStatus::Completed => "completed",
            WorkItemStatus::Cancelled => "cancelled",
            WorkItemStatus::Other(s) => s,
        }
    }
}

impl FromStr for WorkItemStatus {
    type Err = std::convert::Infallible;

    /// Accepts the backend spellings ("in_progress", "In Progress", "on-hold", "done").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        Ok(match normalized.as_str() {
            "open" => WorkItemStatus::Open,
            "in_progress" => WorkItemStatus::InProgress,
            "on_hold" => WorkItemStatus::OnHold,
            "completed" | "complete" | "done" => WorkItemStatus::Completed,
            "cancelled" | "canceled" => WorkItemStatus::Cancelled,
            _ => WorkItemStatus::Other(s.trim().to_string()),
        })
    }
}

impl fmt::Display for WorkItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for WorkItemStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WorkItemStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw {
            Some(raw) => {
                let Ok(status) = raw.parse::<WorkItemStatus>();
                status
            }
            None => WorkItemStatus::default(),
        })
    }
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::None => "none",
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Priority::None),
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(CoreError::Config(format!(
                "Unknown priority '{}'. Expected none, low, medium or high",
                other
            ))),
        }
    }
}

impl Serialize for Priority {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Unknown or missing priorities read as `None` rather than failing the whole export.
impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|s| s.parse().ok()).unwrap_or_default())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `YYYY-MM-DD` or an RFC 3339 timestamp; anything else, including non-string
/// JSON such as epoch milliseconds, is treated as absent.
fn deserialize_start_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Value::deserialize(deserializer)? {
        Value::Null => return Ok(None),
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => s,
        other => {
            tracing::warn!(start_date = %other, "ignoring non-string work order start date");
            return Ok(None);
        }
    };

    let parsed = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw.trim()).ok().map(|dt| dt.date_naive()));

    if parsed.is_none() {
        tracing::warn!(start_date = %raw, "ignoring unparseable work order start date");
    }
    Ok(parsed)
}

/// Response envelope used by the work order list endpoint.
#[derive(Deserialize)]
struct Envelope {
    data: Vec<WorkItem>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WorkItemList {
    Bare(Vec<WorkItem>),
    Wrapped(Envelope),
}

/// Parse a work order export: a bare array or `{ "data": [...] }`.
pub fn parse_work_items(json: &str) -> CoreResult<Vec<WorkItem>> {
    let list: WorkItemList =
        serde_json::from_str(json).map_err(|e| CoreError::Serialization(e.to_string()))?;

    Ok(match list {
        WorkItemList::Bare(items) => items,
        WorkItemList::Wrapped(envelope) => envelope.data,
    })
}

/// Load a work order export from disk.
pub fn load_work_items(path: &Path) -> CoreResult<Vec<WorkItem>> {
    let content = std::fs::read_to_string(path)?;
    let items = parse_work_items(&content)?;
    tracing::debug!(path = %path.display(), count = items.len(), "loaded work orders");
    Ok(items)
}
