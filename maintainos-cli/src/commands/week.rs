use anyhow::Result;
use maintainos_core::date_range::parse_date;
use maintainos_core::grid::build_week;

use crate::context::Context;
use crate::render::render_day_list;

pub fn run(ctx: &Context, date: Option<&str>) -> Result<()> {
    let today = ctx.today();
    let anchor = match date {
        Some(s) => parse_date(s)?,
        None => today,
    };

    let days = build_week(&ctx.items, anchor, ctx.week_start, ctx.clock())?;
    println!("{}", render_day_list(&days, today, false));

    Ok(())
}
