//! Fetch subcommand - acquire editions for one date or a date range

use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::Args;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use indicatif::MultiProgress;
use pressline_pagesuite::Scraper;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Paper slug (e.g. ajc, dmn) or "all"
    #[arg(short, long)]
    pub paper: String,

    /// Single date to fetch (YYYY-MM-DD)
    #[arg(short, long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Start of a date range (YYYY-MM-DD, inclusive)
    #[arg(long, value_parser = parse_date, requires = "to")]
    pub from: Option<NaiveDate>,

    /// End of a date range (YYYY-MM-DD, inclusive)
    #[arg(long, value_parser = parse_date, requires = "from")]
    pub to: Option<NaiveDate>,
}

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("Invalid date format: {e}"))
}

/// Inclusive list of dates from the CLI arguments.
fn resolve_dates(args: &FetchArgs) -> Result<Vec<NaiveDate>> {
    match (args.date, args.from, args.to) {
        (Some(date), None, None) => Ok(vec![date]),
        (None, Some(from), Some(to)) => {
            if to < from {
                bail!("--to must not be before --from");
            }
            Ok(from.iter_days().take_while(|d| *d <= to).collect())
        }
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
            bail!("use either --date or --from/--to, not both")
        }
        _ => bail!("specify --date or --from/--to"),
    }
}

pub fn run(args: FetchArgs, config: &Config, multi: &MultiProgress) -> Result<()> {
    let dates = resolve_dates(&args)?;
    let papers: Vec<_> = if args.paper == "all" {
        config.papers.iter().collect()
    } else {
        vec![config.paper(&args.paper)?]
    };
    if papers.is_empty() {
        bail!("no papers configured; add [[papers]] entries to pressline.toml");
    }

    let mut rows: Vec<(String, String, usize)> = Vec::new();
    let mut failures = 0usize;

    for paper in papers {
        if !paper.is_configured() {
            log::warn!("Skipping {}: no GUIDs configured", paper.name);
            continue;
        }
        log::info!("Processing {} ({})", paper.name, paper.slug);

        let mut scraper = Scraper::new(
            paper.clone(),
            config.endpoints.clone(),
            config.output.dir.clone(),
        )
        .with_progress(multi.clone());

        // One bad date must not sink the rest of the batch.
        for date in &dates {
            let date_str = date.format("%Y-%m-%d").to_string();
            match scraper.page_images(*date) {
                Ok(images) => {
                    if images.is_empty() {
                        log::info!("{}: no pages for {date_str}", paper.slug);
                    }
                    rows.push((paper.slug.clone(), date_str, images.len()));
                }
                Err(e) => {
                    failures += 1;
                    log::error!("{} {date_str}: {e:#}", paper.slug);
                }
            }
        }
    }

    print_summary(&rows);
    if failures > 0 {
        bail!("{failures} date(s) failed");
    }
    Ok(())
}

fn print_summary(rows: &[(String, String, usize)]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Paper").fg(Color::Cyan),
            Cell::new("Date").fg(Color::Cyan),
            Cell::new("Pages").fg(Color::Cyan),
        ]);
    for (slug, date, pages) in rows {
        table.add_row(vec![
            Cell::new(slug),
            Cell::new(date),
            Cell::new(pages.to_string()),
        ]);
    }
    eprintln!("\n{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(date: Option<&str>, from: Option<&str>, to: Option<&str>) -> FetchArgs {
        FetchArgs {
            paper: "ajc".to_string(),
            date: date.map(|s| parse_date(s).unwrap()),
            from: from.map(|s| parse_date(s).unwrap()),
            to: to.map(|s| parse_date(s).unwrap()),
        }
    }

    #[test]
    fn single_date() {
        let dates = resolve_dates(&args(Some("2026-01-26"), None, None)).unwrap();
        assert_eq!(dates.len(), 1);
    }

    #[test]
    fn inclusive_range() {
        let dates = resolve_dates(&args(None, Some("2026-01-01"), Some("2026-01-03"))).unwrap();
        assert_eq!(dates.len(), 3);
        assert_eq!(dates[0].to_string(), "2026-01-01");
        assert_eq!(dates[2].to_string(), "2026-01-03");
    }

    #[test]
    fn range_spanning_month_boundary() {
        let dates = resolve_dates(&args(None, Some("2026-01-30"), Some("2026-02-02"))).unwrap();
        assert_eq!(dates.len(), 4);
    }

    #[test]
    fn reversed_range_rejected() {
        assert!(resolve_dates(&args(None, Some("2026-01-03"), Some("2026-01-01"))).is_err());
    }

    #[test]
    fn date_and_range_conflict() {
        assert!(resolve_dates(&args(Some("2026-01-01"), Some("2026-01-01"), Some("2026-01-02")))
            .is_err());
    }

    #[test]
    fn no_dates_rejected() {
        assert!(resolve_dates(&args(None, None, None)).is_err());
    }

    #[test]
    fn bad_date_format_rejected() {
        assert!(parse_date("01/26/2026").is_err());
    }
}
