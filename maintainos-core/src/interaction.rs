//! What happens when someone hovers, clicks a day, or opens an occurrence.
//!
//! Occurrences dated after today are locked: they stay visible on the grid,
//! but opening one yields a notice instead of the work order.

use chrono::NaiveDate;

use crate::constants::FUTURE_LOCK_NOTICE;
use crate::error::{CoreError, CoreResult};
use crate::grid::{CalendarDay, Occurrence};
use crate::recurrence::RuleParseError;
use crate::work_item::{Priority, WorkItem, WorkItemStatus};

pub fn is_future_locked(day: NaiveDate, today: NaiveDate) -> bool {
    day > today
}

/// Result of clicking an occurrence.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction<'a> {
    OpenDetails(&'a WorkItem),
    Locked { date: NaiveDate, notice: &'static str },
}

pub fn select<'a>(occurrence: &Occurrence<'a>) -> Interaction<'a> {
    if occurrence.locked {
        tracing::debug!(item = %occurrence.item.id, date = %occurrence.date, "occurrence is future-locked");
        Interaction::Locked {
            date: occurrence.date,
            notice: FUTURE_LOCK_NOTICE,
        }
    } else {
        Interaction::OpenDetails(occurrence.item)
    }
}

/// Find the occurrence of work order `id` on `date` in a grid.
pub fn find_occurrence<'g, 'a>(
    days: &'g [CalendarDay<'a>],
    id: &str,
    date: NaiveDate,
) -> CoreResult<&'g Occurrence<'a>> {
    days.iter()
        .filter(|day| day.date == date)
        .flat_map(|day| day.events.iter())
        .find(|occurrence| occurrence.item.id == id)
        .ok_or_else(|| CoreError::WorkItemNotFound(format!("{} on {}", id, date)))
}

/// The popover shown when hovering an event.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverCard {
    pub id: String,
    pub title: String,
    pub status: WorkItemStatus,
    pub priority: Priority,
    pub assignee: Option<String>,
    pub start_date: Option<NaiveDate>,
    /// Rule description, or a note that the stored rule couldn't be read.
    pub repeats: String,
}

impl HoverCard {
    pub fn of(item: &WorkItem) -> Self {
        let repeats = match item.rule() {
            Ok(rule) => rule.to_string(),
            Err(RuleParseError::UnknownType(kind)) => format!("Unknown repeat type '{}'", kind),
            Err(_) => "Does not repeat (unreadable rule)".to_string(),
        };

        HoverCard {
            id: item.id.clone(),
            title: item.title.clone(),
            status: item.status.clone(),
            priority: item.priority,
            assignee: item.assignee.as_ref().map(|a| a.label().to_string()),
            start_date: item.start_date,
            repeats,
        }
    }
}

/// The day-detail modal: a day's events split by whether they can be opened.
#[derive(Debug, Clone, PartialEq)]
pub struct DayDetail<'a> {
    pub date: NaiveDate,
    pub actionable: Vec<&'a WorkItem>,
    pub locked: Vec<&'a WorkItem>,
}

impl<'a> DayDetail<'a> {
    pub fn of(day: &CalendarDay<'a>) -> Self {
        let (locked, actionable): (Vec<_>, Vec<_>) = day.events.iter().partition(|o| o.locked);

        DayDetail {
            date: day.date,
            actionable: actionable.into_iter().map(|o| o.item).collect(),
            locked: locked.into_iter().map(|o| o.item).collect(),
        }
    }

    pub fn total(&self) -> usize {
        self.actionable.len() + self.locked.len()
    }
}
