use anyhow::Result;
use maintainos_core::recurrence::RulePolicy;
use maintainos_core::{Schedule, WorkItem};
use owo_colors::OwoColorize;

use crate::context::Context;

/// Surface rules the calendar silently works around: unreadable rules (shown on
/// the start date only), unknown rule types (never shown) and missing start dates.
pub fn run(ctx: &Context) -> Result<()> {
    let problems = scheduling_problems(&ctx.items);

    for (item, issue) in &problems {
        println!("{} {} {}", "!".red(), item.title, format!("[{}]", item.id).dimmed());
        println!("   {}", issue.dimmed());
    }

    if !problems.is_empty() {
        anyhow::bail!(
            "{} of {} work orders have scheduling problems",
            problems.len(),
            ctx.items.len()
        );
    }

    println!("{} {} work orders checked", "✓".green(), ctx.items.len());
    Ok(())
}

fn scheduling_problems(items: &[WorkItem]) -> Vec<(&WorkItem, String)> {
    items
        .iter()
        .filter_map(|item| {
            let schedule = Schedule::of(item);
            let issue = match schedule.policy() {
                RulePolicy::Rule(_) => None,
                RulePolicy::ExactDate(err) => Some(format!("{} (shown on start date only)", err)),
                RulePolicy::Never(kind) => Some(format!("unknown recurrence type '{}' (never shown)", kind)),
            };
            let issue = issue.or_else(|| {
                schedule
                    .start()
                    .is_none()
                    .then(|| "no start date (never shown)".to_string())
            });
            issue.map(|issue| (item, issue))
        })
        .collect()
}
