use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use dashboard_core::{
    Aggregate, ChartKind, Config, Dashboard, Key, Suggestion, SuggestionPhase, ViewState,
};
use inquire::{Select, Text};
use std::{fmt, time::Duration};
use tracing::debug;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dashboard", version, about = "Weather dashboard in the terminal")]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the backend URL interactively.
    Configure,

    /// Show current weather, averages, forecast and one chart for a city.
    Show {
        /// City name as you would type it into the search box.
        city: String,

        /// Chart to print: temperature, wind, conditions or overview.
        #[arg(long, default_value = "temperature")]
        chart: ChartKind,
    },

    /// Print autocomplete suggestions for a partial city name.
    Suggest {
        query: String,
    },

    /// Type a city, pick a suggestion, see the dashboard.
    Search {
        #[arg(long, default_value = "temperature")]
        chart: ChartKind,
    },
}

/// Entry in the interactive suggestion picker.
enum Choice {
    Suggested(usize, Suggestion),
    AsTyped(String),
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Suggested(_, s) if s.display.is_empty() => f.write_str(&s.name),
            Choice::Suggested(_, s) => write!(f, "{} ({})", s.name, s.display),
            Choice::AsTyped(text) => write!(f, "Search for \"{text}\""),
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;
        debug!(backend = %config.backend_url, debounce_ms = config.debounce_ms, "Loaded configuration");

        match self.command {
            Command::Configure => configure(config),
            Command::Show { city, chart } => {
                let mut dashboard = Dashboard::from_config(&config)?;
                dashboard.type_text(&city);
                dashboard.press(Key::Enter).await?;
                print_outcome(&dashboard, chart)
            }
            Command::Suggest { query } => {
                let mut dashboard = Dashboard::from_config(&config)?;
                let list = wait_for_suggestions(&mut dashboard, &query, &config).await;
                if list.is_empty() {
                    println!("No suggestions for \"{query}\".");
                }
                for s in list {
                    println!("{}\t{}", s.name, s.display);
                }
                Ok(())
            }
            Command::Search { chart } => search(config, chart).await,
        }
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let url = Text::new("Backend URL:")
        .with_default(&config.backend_url)
        .prompt()
        .context("Failed to read backend URL")?;

    config.set_backend_url(&url)?;
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn search(config: Config, chart: ChartKind) -> anyhow::Result<()> {
    let mut dashboard = Dashboard::from_config(&config)?;

    let text = Text::new("City:").prompt().context("Failed to read city")?;
    let list = wait_for_suggestions(&mut dashboard, &text, &config).await;

    let mut choices: Vec<Choice> =
        list.into_iter().enumerate().map(|(i, s)| Choice::Suggested(i, s)).collect();
    choices.push(Choice::AsTyped(text));

    let picked = Select::new("Pick a location:", choices)
        .prompt()
        .context("Failed to read selection")?;

    match picked {
        Choice::Suggested(index, _) => {
            if !dashboard.select(index).await? {
                return Err(anyhow!("Suggestion list changed before the selection was made"));
            }
        }
        Choice::AsTyped(_) => dashboard.press(Key::Enter).await?,
    }

    print_outcome(&dashboard, chart)
}

/// Type `query` and wait out the debounce plus the request.
async fn wait_for_suggestions(
    dashboard: &mut Dashboard,
    query: &str,
    config: &Config,
) -> Vec<Suggestion> {
    dashboard.type_text(query);

    let deadline = tokio::time::Instant::now() + config.debounce() + config.timeout();
    tokio::time::sleep(config.debounce()).await;

    loop {
        let engine = dashboard.suggestions();
        let settled = !matches!(engine.phase(), SuggestionPhase::Pending | SuggestionPhase::Fetching);
        if settled || tokio::time::Instant::now() >= deadline {
            return engine.suggestions();
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
}

fn print_outcome(dashboard: &Dashboard, chart: ChartKind) -> anyhow::Result<()> {
    match dashboard.controller().state() {
        ViewState::Loaded(snapshot) => {
            let aggregate = Aggregate::from_snapshot(snapshot);
            let today = chrono::Local::now().date_naive();
            println!("{}", render::dashboard(&aggregate, today));
            println!("{}", render::chart(&aggregate.series.chart(chart)));
            Ok(())
        }
        ViewState::Error(message) => Err(anyhow!(message)),
        ViewState::Idle | ViewState::Loading => Err(anyhow!("No weather data was loaded")),
    }
}
