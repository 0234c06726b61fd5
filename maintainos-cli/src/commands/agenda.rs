use anyhow::Result;
use maintainos_core::DateRange;
use maintainos_core::grid::build_grid;
use owo_colors::OwoColorize;

use crate::context::Context;
use crate::render::render_day_list;

pub fn run(ctx: &Context, from: Option<&str>, to: Option<&str>) -> Result<()> {
    let today = ctx.today();
    let range = DateRange::from_args(from, to, today)?;
    let days = build_grid(&ctx.items, &range, ctx.clock());

    if days.iter().all(|day| day.is_empty()) {
        println!("{}", "No work orders scheduled".dimmed());
        return Ok(());
    }

    println!("{}", render_day_list(&days, today, true));
    Ok(())
}
