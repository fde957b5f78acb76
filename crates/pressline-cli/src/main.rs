//! pressline - e-paper edition acquisition CLI
//!
//! Downloads newspaper editions from their e-paper publishing backend
//! and reconstructs each one as an ordered set of page images on disk.

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::MultiProgress;

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "pressline")]
#[command(about = "E-paper edition acquisition and page reconstruction")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./pressline.toml or ~/.config/pressline/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch editions for one date or a date range
    Fetch(cmd::fetch::FetchArgs),
    /// List available edition dates for a paper
    Dates(cmd::dates::DatesArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let multi = MultiProgress::new();
    pressline_core::init_logging(cli.debug, Some(&multi));

    let config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    match cli.command {
        Command::Fetch(args) => cmd::fetch::run(args, &config, &multi),
        Command::Dates(args) => cmd::dates::run(args, &config),
        Command::Config => {
            use comfy_table::{
                Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
            };

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec![
                    Cell::new("Paper").fg(Color::Cyan),
                    Cell::new("Slug").fg(Color::Cyan),
                    Cell::new("Mode").fg(Color::Cyan),
                    Cell::new("Configured").fg(Color::Cyan),
                ]);
            for paper in &config.papers {
                table.add_row(vec![
                    Cell::new(&paper.name),
                    Cell::new(&paper.slug),
                    Cell::new(paper.mode.to_string()),
                    Cell::new(if paper.is_configured() { "yes" } else { "no" }),
                ]);
            }
            eprintln!("\nOutput directory: {}", config.output.dir.display());
            eprintln!("{table}");
            Ok(())
        }
    }
}
