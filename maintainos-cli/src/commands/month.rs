use anyhow::Result;
use chrono::Datelike;
use maintainos_core::date_range::parse_month;
use maintainos_core::grid::build_month;

use crate::context::Context;
use crate::render::{render_day_list, render_month};

pub fn run(ctx: &Context, month: Option<&str>) -> Result<()> {
    let today = ctx.today();
    let (year, month) = match month {
        Some(s) => parse_month(s)?,
        None => (today.year(), today.month()),
    };

    let days = build_month(&ctx.items, year, month, ctx.week_start, ctx.clock())?;
    println!("{}", render_month(&days, year, month, ctx.week_start));

    let in_month: Vec<_> = days
        .into_iter()
        .filter(|day| day.is_in_month(year, month))
        .collect();
    let list = render_day_list(&in_month, today, true);
    if !list.is_empty() {
        println!();
        println!("{}", list);
    }

    Ok(())
}
