//! Month and week grids.
//!
//! A grid is rebuilt from the work order list every time it's asked for; nothing
//! here is cached. Days keep chronological order and each day's events keep
//! the order of the input slice.

use chrono::{Datelike, NaiveDate};

use crate::clock::Clock;
use crate::date_range::{DateRange, WeekStart};
use crate::error::CoreResult;
use crate::interaction::is_future_locked;
use crate::recurrence::Schedule;
use crate::work_item::WorkItem;

/// One work order falling on one day.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence<'a> {
    pub item: &'a WorkItem,
    pub date: NaiveDate,
    /// Dated after today; shown but not openable.
    pub locked: bool,
}

/// A grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay<'a> {
    pub date: NaiveDate,
    pub is_today: bool,
    pub events: Vec<Occurrence<'a>>,
}

impl CalendarDay<'_> {
    /// False for the padding days a month grid borrows from neighbouring months.
    pub fn is_in_month(&self, year: i32, month: u32) -> bool {
        self.date.year() == year && self.date.month() == month
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Place every work order on the days of `range` it occurs on.
pub fn build_grid<'a>(items: &'a [WorkItem], range: &DateRange, clock: &dyn Clock) -> Vec<CalendarDay<'a>> {
    let today = clock.today();
    let schedules: Vec<(&WorkItem, Schedule)> = items.iter().map(|item| (item, Schedule::of(item))).collect();

    tracing::debug!(from = %range.from, to = %range.to, items = items.len(), "building calendar grid");

    range
        .days()
        .map(|date| {
            let locked = is_future_locked(date, today);
            let events = schedules
                .iter()
                .filter(|(_, schedule)| schedule.occurs_on(date))
                .map(|&(item, _)| Occurrence { item, date, locked })
                .collect();

            CalendarDay {
                date,
                is_today: date == today,
                events,
            }
        })
        .collect()
}

/// Grid for a month view, padded to whole weeks.
pub fn build_month<'a>(
    items: &'a [WorkItem],
    year: i32,
    month: u32,
    week_start: WeekStart,
    clock: &dyn Clock,
) -> CoreResult<Vec<CalendarDay<'a>>> {
    let range = DateRange::month_grid(year, month, week_start)?;
    Ok(build_grid(items, &range, clock))
}

/// Grid for the week containing `day`.
pub fn build_week<'a>(
    items: &'a [WorkItem],
    day: NaiveDate,
    week_start: WeekStart,
    clock: &dyn Clock,
) -> CoreResult<Vec<CalendarDay<'a>>> {
    let range = DateRange::week_of(day, week_start)?;
    Ok(build_grid(items, &range, clock))
}

/// All occurrences of a grid, day by day.
pub fn occurrences<'g, 'a>(days: &'g [CalendarDay<'a>]) -> impl Iterator<Item = &'g Occurrence<'a>> {
    days.iter().flat_map(|day| day.events.iter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::recurrence::RecurrenceRule;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ids<'a>(day: &'a CalendarDay<'_>) -> Vec<&'a str> {
        day.events.iter().map(|o| o.item.id.as_str()).collect()
    }

    #[test]
    fn weekly_mon_wed_fri_week_view() {
        let items = vec![
            WorkItem::new("wo-1", "Lubricate conveyor")
                .starting(date(2024, 1, 1))
                .with_rule(&RecurrenceRule::Weekly {
                    days: BTreeSet::from([1, 3, 5]),
                }),
        ];
        let clock = FixedClock(date(2024, 1, 1));

        let grid = build_week(&items, date(2024, 1, 1), WeekStart::Monday, &clock).unwrap();
        assert_eq!(grid.len(), 7);

        let hits: Vec<_> = grid.iter().filter(|d| !d.is_empty()).map(|d| d.date).collect();
        assert_eq!(hits, vec![date(2024, 1, 1), date(2024, 1, 3), date(2024, 1, 5)]);
    }

    #[test]
    fn one_off_shows_only_on_its_date() {
        let items = vec![WorkItem::new("wo-2", "Fire drill").starting(date(2024, 3, 15))];
        let clock = FixedClock(date(2024, 3, 1));

        let grid = build_month(&items, 2024, 3, WeekStart::Sunday, &clock).unwrap();
        let hits: Vec<_> = grid.iter().filter(|d| !d.is_empty()).map(|d| d.date).collect();
        assert_eq!(hits, vec![date(2024, 3, 15)]);
    }

    #[test]
    fn month_grid_is_whole_weeks_in_order() {
        let clock = FixedClock(date(2024, 1, 1));
        for month in 1..=12 {
            let grid = build_month(&[], 2025, month, WeekStart::Monday, &clock).unwrap();
            assert_eq!(grid.len() % 7, 0);
            assert!(grid.windows(2).all(|w| w[0].date.succ_opt() == Some(w[1].date)));
        }
    }

    #[test]
    fn events_keep_input_order() {
        let start = date(2024, 1, 1);
        let items = vec![
            WorkItem::new("b", "Second alphabetically").starting(start).with_rule(&RecurrenceRule::Daily),
            WorkItem::new("a", "First alphabetically").starting(start).with_rule(&RecurrenceRule::Daily),
            WorkItem::new("c", "One-off").starting(date(2024, 1, 2)),
        ];
        let clock = FixedClock(start);

        let grid = build_week(&items, start, WeekStart::Monday, &clock).unwrap();
        assert_eq!(ids(&grid[0]), vec!["b", "a"]);
        assert_eq!(ids(&grid[1]), vec!["b", "a", "c"]);
    }

    #[test]
    fn future_days_are_locked() {
        let start = date(2024, 1, 1);
        let items = vec![WorkItem::new("wo-1", "Daily walkdown").starting(start).with_rule(&RecurrenceRule::Daily)];
        let clock = FixedClock(date(2024, 1, 3));

        let grid = build_week(&items, start, WeekStart::Monday, &clock).unwrap();
        let locked: Vec<_> = occurrences(&grid).map(|o| o.locked).collect();
        assert_eq!(locked, vec![false, false, false, true, true, true, true]);
        assert!(grid[2].is_today);
        assert!(!grid[3].is_today);
    }

    #[test]
    fn lock_marks_follow_selection_policy() {
        let start = date(2024, 2, 1);
        let items = vec![WorkItem::new("wo-1", "Daily walkdown").starting(start).with_rule(&RecurrenceRule::Daily)];
        let clock = FixedClock(date(2024, 2, 14));

        let grid = build_month(&items, 2024, 2, WeekStart::Sunday, &clock).unwrap();
        for occurrence in occurrences(&grid) {
            assert_eq!(occurrence.locked, is_future_locked(occurrence.date, clock.today()));
        }
    }

    #[test]
    fn week_past_last_representable_date_is_an_error() {
        let items = vec![WorkItem::new("wo-1", "x")];
        let clock = FixedClock(date(2024, 1, 1));
        assert!(build_week(&items, NaiveDate::MAX, WeekStart::Monday, &clock).is_err());
    }

    #[test]
    fn malformed_rule_in_grid_falls_back_to_start_date() {
        let mut item = WorkItem::new("wo-5", "Calibrate sensors").starting(date(2024, 5, 10));
        item.recurrence_rule = Some(json!("{oops"));
        let items = vec![item];
        let clock = FixedClock(date(2024, 5, 1));

        let grid = build_month(&items, 2024, 5, WeekStart::Monday, &clock).unwrap();
        let hits: Vec<_> = occurrences(&grid).map(|o| o.date).collect();
        assert_eq!(hits, vec![date(2024, 5, 10)]);
    }

    #[test]
    fn padding_days_are_outside_month() {
        let clock = FixedClock(date(2024, 1, 1));
        let grid = build_month(&[], 2024, 1, WeekStart::Sunday, &clock).unwrap();
        assert!(!grid[0].is_in_month(2024, 1));
        assert!(grid[1].is_in_month(2024, 1));
    }
}
