//! Everything a command needs: configuration, the filtered work orders and a clock.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use clap::Args;
use maintainos_core::config::MaintainConfig;
use maintainos_core::date_range::parse_date;
use maintainos_core::filter::WorkItemFilter;
use maintainos_core::work_item::load_work_items;
use maintainos_core::{Clock, FixedClock, Priority, SystemClock, WeekStart, WorkItem, WorkItemStatus};

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Only show work orders with this status (repeatable)
    #[arg(long = "status", global = true)]
    pub statuses: Vec<String>,

    /// Only show work orders with this priority (repeatable)
    #[arg(long = "priority", global = true)]
    pub priorities: Vec<String>,

    /// Only show work orders assigned to this person (id or name)
    #[arg(long, global = true)]
    pub assignee: Option<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> Result<WorkItemFilter> {
        let statuses = self
            .statuses
            .iter()
            .map(|s| {
                let Ok(status) = s.parse::<WorkItemStatus>();
                status
            })
            .collect();
        let priorities = self
            .priorities
            .iter()
            .map(|s| s.parse::<Priority>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(WorkItemFilter {
            statuses,
            priorities,
            assignee: self.assignee.clone(),
        })
    }
}

pub struct Context {
    pub items: Vec<WorkItem>,
    pub week_start: WeekStart,
    clock: Box<dyn Clock>,
}

impl Context {
    pub fn load(items_path: Option<PathBuf>, today: Option<&str>, filters: &FilterArgs) -> Result<Self> {
        let config = MaintainConfig::load()?;
        let path = items_path.unwrap_or_else(|| config.items_path());

        let items = load_work_items(&path)
            .with_context(|| format!("Could not read work orders from {}", path.display()))?;
        tracing::debug!(path = %path.display(), count = items.len(), "loaded work orders");
        let items = filters.to_filter()?.apply(&items);

        let clock: Box<dyn Clock> = match today {
            Some(s) => {
                let today = parse_date(s)?;
                tracing::debug!(%today, "using fixed clock from --today");
                Box::new(FixedClock(today))
            }
            None => {
                tracing::debug!("using system clock");
                Box::new(SystemClock)
            }
        };

        Ok(Context::new(items, config.week_start, clock))
    }

    pub fn new(items: Vec<WorkItem>, week_start: WeekStart, clock: Box<dyn Clock>) -> Self {
        Context {
            items,
            week_start,
            clock,
        }
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}
