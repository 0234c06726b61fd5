//! Status, priority and assignee filters for the calendar.

use crate::work_item::{Priority, WorkItem, WorkItemStatus};

/// Work order filter. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkItemFilter {
    pub statuses: Vec<WorkItemStatus>,
    pub priorities: Vec<Priority>,
    /// Matched case-insensitively against assignee id or name.
    pub assignee: Option<String>,
}

impl WorkItemFilter {
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty() && self.priorities.is_empty() && self.assignee.is_none()
    }

    pub fn matches(&self, item: &WorkItem) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&item.status) {
            return false;
        }
        if !self.priorities.is_empty() && !self.priorities.contains(&item.priority) {
            return false;
        }
        if let Some(wanted) = &self.assignee {
            let Some(assignee) = &item.assignee else {
                return false;
            };
            let matches_id = assignee.id.eq_ignore_ascii_case(wanted);
            let matches_name = assignee
                .name
                .as_deref()
                .is_some_and(|name| name.to_lowercase() == wanted.to_lowercase());
            if !matches_id && !matches_name {
                return false;
            }
        }
        true
    }

    /// Matching work orders, in their original order.
    pub fn apply(&self, items: &[WorkItem]) -> Vec<WorkItem> {
        if self.is_empty() {
            return items.to_vec();
        }
        let kept: Vec<WorkItem> = items.iter().filter(|item| self.matches(item)).cloned().collect();
        tracing::debug!(before = items.len(), after = kept.len(), "filtered work orders");
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::work_item::Assignee;

    fn items() -> Vec<WorkItem> {
        let mut a = WorkItem::new("wo-1", "Check boiler");
        a.status = WorkItemStatus::Open;
        a.priority = Priority::High;
        a.assignee = Some(Assignee {
            id: "u-1".into(),
            name: Some("Dana Reyes".into()),
        });

        let mut b = WorkItem::new("wo-2", "Repaint rails");
        b.status = WorkItemStatus::Completed;
        b.priority = Priority::Low;

        vec![a, b]
    }

    #[test]
    fn empty_filter_keeps_all() {
        assert_eq!(WorkItemFilter::default().apply(&items()).len(), 2);
    }

    #[test]
    fn filter_by_status_and_priority() {
        let filter = WorkItemFilter {
            statuses: vec![WorkItemStatus::Completed],
            ..Default::default()
        };
        let kept = filter.apply(&items());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "wo-2");

        let filter = WorkItemFilter {
            statuses: vec![WorkItemStatus::Completed],
            priorities: vec![Priority::High],
            assignee: None,
        };
        assert!(filter.apply(&items()).is_empty());
    }

    #[test]
    fn filter_by_assignee_name_or_id() {
        for wanted in ["dana reyes", "U-1"] {
            let filter = WorkItemFilter {
                assignee: Some(wanted.into()),
                ..Default::default()
            };
            let kept = filter.apply(&items());
            assert_eq!(kept.len(), 1, "{}", wanted);
            assert_eq!(kept[0].id, "wo-1");
        }
    }
}
