//! Terminal rendering for calendar types.
//!
//! Extension traits that add colored output to maintainos-core types using
//! owo_colors.

use chrono::{Datelike, NaiveDate};
use maintainos_core::grid::{CalendarDay, Occurrence};
use maintainos_core::interaction::{DayDetail, HoverCard};
use maintainos_core::{Priority, WeekStart, WorkItem, WorkItemStatus};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for WorkItemStatus {
    fn render(&self) -> String {
        let label = self.as_str();
        match self {
            WorkItemStatus::Open => label.blue().to_string(),
            WorkItemStatus::InProgress => label.yellow().to_string(),
            WorkItemStatus::OnHold => label.magenta().to_string(),
            WorkItemStatus::Completed => label.green().to_string(),
            WorkItemStatus::Cancelled | WorkItemStatus::Other(_) => label.dimmed().to_string(),
        }
    }
}

impl Render for Priority {
    fn render(&self) -> String {
        match self {
            Priority::High => "!!!".red().to_string(),
            Priority::Medium => "!!".yellow().to_string(),
            Priority::Low => "!".dimmed().to_string(),
            Priority::None => String::new(),
        }
    }
}

impl Render for Occurrence<'_> {
    fn render(&self) -> String {
        if self.locked {
            let text = format!("🔒 {}", self.item.title);
            return format!("{} {}", text.dimmed(), format!("[{}]", self.item.id).dimmed());
        }

        let mut line = format!("● {}", self.item.title);
        let priority = self.item.priority.render();
        if !priority.is_empty() {
            line = format!("{} {}", line, priority);
        }
        format!(
            "{} {} {}",
            line,
            self.item.status.render(),
            format!("[{}]", self.item.id).dimmed()
        )
    }
}

impl Render for HoverCard {
    fn render(&self) -> String {
        let mut lines = vec![
            format!("{} {}", self.title.bold(), format!("[{}]", self.id).dimmed()),
            format!("   {}: {}", "status".dimmed(), self.status.render()),
            format!("   {}: {}", "priority".dimmed(), self.priority),
        ];
        if let Some(assignee) = &self.assignee {
            lines.push(format!("   {}: {}", "assignee".dimmed(), assignee));
        }
        let start = self
            .start_date
            .map(|d| d.format("%a %b %-d, %Y").to_string())
            .unwrap_or_else(|| "(none)".to_string());
        lines.push(format!("   {}: {}", "starts".dimmed(), start));
        lines.push(format!("   {}: {}", "repeats".dimmed(), self.repeats));
        lines.join("\n")
    }
}

impl Render for DayDetail<'_> {
    fn render(&self) -> String {
        let mut lines = vec![self.date.format("%A, %B %-d, %Y").to_string().bold().to_string()];

        if self.total() == 0 {
            lines.push("   No work orders".dimmed().to_string());
            return lines.join("\n");
        }

        for item in &self.actionable {
            lines.push(format!("   {}", render_item_line(item)));
        }
        if !self.locked.is_empty() {
            lines.push(format!("   {}", "Scheduled (locked until the day arrives):".dimmed()));
            for item in &self.locked {
                lines.push(format!("   {}", format!("🔒 {} [{}]", item.title, item.id).dimmed()));
            }
        }
        lines.join("\n")
    }
}

fn render_item_line(item: &WorkItem) -> String {
    format!(
        "● {} {} {}",
        item.title,
        item.status.render(),
        format!("[{}]", item.id).dimmed()
    )
}

/// Width of one month-grid cell.
const CELL_WIDTH: usize = 6;

/// Plain text of a month-grid cell: day number and event count.
fn cell_text(day: &CalendarDay<'_>) -> String {
    let count = match day.events.len() {
        0 => String::new(),
        n if n > 9 => "9+".to_string(),
        n => n.to_string(),
    };
    format!("{:>3} {:<2}", day.date.day(), count)
}

/// Weekday labels in grid column order.
fn weekday_header(week_start: WeekStart) -> Vec<&'static str> {
    const SUNDAY_FIRST: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
    let skip = match week_start {
        WeekStart::Sunday => 0,
        WeekStart::Monday => 1,
    };
    SUNDAY_FIRST.iter().cycle().skip(skip).take(7).copied().collect()
}

/// Render a month grid, padding days dimmed and today highlighted.
pub fn render_month(days: &[CalendarDay<'_>], year: i32, month: u32, week_start: WeekStart) -> String {
    let mut lines = Vec::new();

    let title = NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_default();
    lines.push(format!("{:^width$}", title, width = CELL_WIDTH * 7).bold().to_string());

    let header: String = weekday_header(week_start)
        .iter()
        .map(|label| format!("{:>4}  ", label))
        .collect();
    lines.push(header.dimmed().to_string());

    for week in days.chunks(7) {
        let row: String = week
            .iter()
            .map(|day| {
                let text = cell_text(day);
                if day.is_today {
                    text.reversed().to_string()
                } else if !day.is_in_month(year, month) {
                    text.dimmed().to_string()
                } else if day.events.iter().any(|o| !o.locked) {
                    text.cyan().to_string()
                } else {
                    text
                }
            })
            .collect();
        lines.push(row);
    }

    lines.join("\n")
}

/// Human label for a date relative to today ("Today", "Tomorrow", "Wed Feb 25").
pub fn format_date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        -1 => "Yesterday".to_string(),
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

/// Render days with their events, one block per day.
pub fn render_day_list(days: &[CalendarDay<'_>], today: NaiveDate, skip_empty: bool) -> String {
    let mut blocks = Vec::new();

    for day in days {
        if skip_empty && day.is_empty() {
            continue;
        }

        let mut lines = Vec::new();
        let label = format_date_label(day.date, today);
        lines.push(if day.is_today {
            label.bold().underline().to_string()
        } else {
            label.bold().to_string()
        });

        if day.is_empty() {
            lines.push(format!("  {}", "-".dimmed()));
        }
        for occurrence in &day.events {
            lines.push(format!("  {}", occurrence.render()));
        }
        blocks.push(lines.join("\n"));
    }

    blocks.join("\n\n")
}
