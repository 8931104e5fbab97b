// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use loshu_numerology::{
    generate_reading, render_text_chart, AppConfig, BirthRecord, CalculationOptions, Gender,
    HttpNarrativeClient, NumerologyChart,
};

/// Lo Shu grid numerology calculator
#[derive(Parser)]
#[command(name = "loshu")]
#[command(about = "Lo Shu grid numerology: core numbers, grid, planes and readings", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (overrides $LOSHU_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print core numbers, the grid and the planes
    Chart {
        #[command(flatten)]
        person: PersonArgs,

        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// Print the chart followed by a narrative reading from the language model
    Reading {
        #[command(flatten)]
        person: PersonArgs,
    },

    /// Browse the chart in the terminal UI
    Tui {
        #[command(flatten)]
        person: PersonArgs,

        /// Fetch a narrative reading before opening the UI
        #[arg(long)]
        reading: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Args)]
struct PersonArgs {
    /// First name
    #[arg(long)]
    name: String,

    /// Day of birth (1-31)
    #[arg(long)]
    day: u32,

    /// Month of birth (1-12)
    #[arg(long)]
    month: u32,

    /// Year of birth
    #[arg(long)]
    year: i32,

    /// male or female
    #[arg(long)]
    gender: Gender,

    /// Remap a Kua of 5 to 2 (male) / 8 (female)
    #[arg(long)]
    legacy_kua: bool,
}

impl PersonArgs {
    fn chart(&self, config: &AppConfig) -> Result<NumerologyChart> {
        let record = BirthRecord::new(
            &self.name,
            self.day,
            self.month,
            self.year,
            self.gender,
            &config.validation,
        )?;

        let mut options = CalculationOptions::from(&config.calculation);
        options.apply_kua5_legacy_remap |= self.legacy_kua;

        Ok(NumerologyChart::compute_now(record, &options))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Chart { person, json } => run_chart(&person, json, &config),
        Commands::Reading { person } => run_reading(&person, &config),
        Commands::Tui { person, reading } => run_ui_mode(&person, reading, &config),
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

fn run_chart(person: &PersonArgs, json: bool, config: &AppConfig) -> Result<()> {
    let chart = person.chart(config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&chart)?);
    } else {
        print!("{}", render_text_chart(&chart, &config.grid.empty_placeholder));
    }

    Ok(())
}

fn run_reading(person: &PersonArgs, config: &AppConfig) -> Result<()> {
    let chart = person.chart(config)?;
    print!("{}", render_text_chart(&chart, &config.grid.empty_placeholder));
    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let client = HttpNarrativeClient::from_config(&config.narrative)
        .context("Narrative backend unavailable")?;

    match generate_reading(&client, &chart) {
        Ok(reading) => println!("\n{}", reading),
        Err(e) => {
            // The chart above stays valid without a reading
            eprintln!("\n❌ Could not generate a reading: {}", e);
            std::process::exit(2);
        }
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(person: &PersonArgs, with_reading: bool, config: &AppConfig) -> Result<()> {
    let chart = person.chart(config)?;

    let reading = if with_reading {
        println!("🔮 Requesting reading...");
        match HttpNarrativeClient::from_config(&config.narrative)
            .and_then(|client| generate_reading(&client, &chart))
        {
            Ok(text) => ui::ReadingState::Ready(text),
            Err(e) => ui::ReadingState::Failed(e.to_string()),
        }
    } else {
        ui::ReadingState::NotRequested
    };

    let mut app = ui::App::new(chart, config.grid.empty_placeholder.clone(), reading);
    ui::run_ui(&mut app)
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_person: &PersonArgs, _with_reading: bool, _config: &AppConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: loshu chart --name ... --day ... --month ... --year ... --gender ...");
    std::process::exit(1);
}
