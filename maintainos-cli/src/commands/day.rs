use anyhow::Result;
use chrono::NaiveDate;
use maintainos_core::DateRange;
use maintainos_core::grid::build_grid;
use maintainos_core::interaction::DayDetail;

use crate::context::Context;
use crate::render::Render;

pub fn run(ctx: &Context, date: NaiveDate) -> Result<()> {
    let range = DateRange::new(date, date)?;
    let days = build_grid(&ctx.items, &range, ctx.clock());

    for day in &days {
        println!("{}", DayDetail::of(day).render());
    }

    Ok(())
}
