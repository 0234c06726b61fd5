use anyhow::Result;
use chrono::NaiveDate;
use maintainos_core::DateRange;
use maintainos_core::grid::build_grid;
use maintainos_core::interaction::{HoverCard, Interaction, find_occurrence, select};
use owo_colors::OwoColorize;

use crate::context::Context;
use crate::render::Render;

pub fn run(ctx: &Context, id: &str, date: NaiveDate) -> Result<()> {
    println!("{}", open_occurrence(ctx, id, date)?);
    Ok(())
}

/// The hover card for an openable occurrence, or the lock notice for a future one.
fn open_occurrence(ctx: &Context, id: &str, date: NaiveDate) -> Result<String> {
    let range = DateRange::new(date, date)?;
    let days = build_grid(&ctx.items, &range, ctx.clock());

    let occurrence = find_occurrence(&days, id, date)?;

    let text = match select(occurrence) {
        Interaction::OpenDetails(item) => HoverCard::of(item).render(),
        Interaction::Locked { date, notice } => format!(
            "{} {}\n   {}",
            "🔒".yellow(),
            notice.yellow(),
            format!("{} opens on {}", occurrence.item.title, date).dimmed()
        ),
    };
    Ok(text)
}
