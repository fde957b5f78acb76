//! Dates subcommand - list available edition dates for a paper

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use pressline_pagesuite::Scraper;

use crate::config::Config;

/// How many dates to show before truncating.
const PREVIEW_LIMIT: usize = 30;

#[derive(Args, Debug)]
pub struct DatesArgs {
    /// Paper slug (e.g. ajc, dmn)
    #[arg(short, long)]
    pub paper: String,
}

pub fn run(args: DatesArgs, config: &Config) -> Result<()> {
    let paper = config.paper(&args.paper)?;
    let mut scraper = Scraper::new(
        paper.clone(),
        config.endpoints.clone(),
        config.output.dir.clone(),
    );

    let dates = scraper.available_dates()?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![Cell::new(format!(
            "{} — {} available dates",
            paper.name,
            dates.len()
        ))
        .fg(Color::Cyan)]);
    for date in dates.iter().take(PREVIEW_LIMIT) {
        table.add_row(vec![Cell::new(date)]);
    }
    if dates.len() > PREVIEW_LIMIT {
        table.add_row(vec![Cell::new(format!(
            "... and {} more",
            dates.len() - PREVIEW_LIMIT
        ))]);
    }
    eprintln!("\n{table}");
    Ok(())
}
