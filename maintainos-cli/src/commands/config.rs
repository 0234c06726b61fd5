use std::path::PathBuf;

use anyhow::Result;
use maintainos_core::WeekStart;
use maintainos_core::config::MaintainConfig;
use owo_colors::OwoColorize;

pub fn path() -> Result<()> {
    println!("{}", MaintainConfig::config_path()?.display());
    Ok(())
}

pub fn show() -> Result<()> {
    let config = MaintainConfig::load()?;
    println!("{}: {}", "items_path".dimmed(), config.items_path().display());
    println!("{}: {:?}", "week_start".dimmed(), config.week_start);
    Ok(())
}

pub fn set(items_path: Option<PathBuf>, week_start: Option<&str>) -> Result<()> {
    let mut config = MaintainConfig::load()?;

    if let Some(path) = items_path {
        config.items_path = path;
    }
    if let Some(week_start) = week_start {
        config.week_start = match week_start.to_lowercase().as_str() {
            "monday" | "mon" => WeekStart::Monday,
            "sunday" | "sun" => WeekStart::Sunday,
            other => anyhow::bail!("Unknown week start '{}'. Use monday or sunday", other),
        };
    }

    config.save()?;
    println!("{} Saved {}", "✓".green(), MaintainConfig::config_path()?.display());
    Ok(())
}
