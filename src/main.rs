use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use supper_core::Config;
use supper::session::{FinderSession, FinderState};
use supper::{messages, render};
use supper_places::{resolve_provider, RecommendationFetcher};

#[derive(Parser, Debug)]
#[command(name = "supper")]
#[command(about = "Recommend dinner restaurants near you")]
struct Args {
    /// Latitude of the search position (skips location lookup)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude of the search position
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Gemini model to use instead of the configured one
    #[arg(long)]
    model: Option<String>,

    /// Path to the config file
    #[arg(long, env = "SUPPER_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    supper_core::init()?;

    let (mut config, _) = Config::load_validated(args.config.as_deref())?;
    if let Some(model) = args.model {
        config.gemini.model = model;
    }

    let locale = config.ui.locale;
    let fetcher = RecommendationFetcher::new(&config)
        .context("Failed to create recommendation fetcher")?;
    let position = resolve_provider(&config.location, args.lat.zip(args.lon));

    let quiet = args.json;
    let session = FinderSession::new(locale).with_status_listener(move |status| {
        if !quiet {
            eprintln!("{}", status);
        }
    });

    if !args.json {
        println!("{}\n", messages::title(locale));
    }

    let outcome = session.find(&position, &fetcher).await?;

    match outcome {
        FinderState::Loaded(places) => {
            if args.json {
                println!("{}", render::json(&places)?);
            } else {
                print!("{}", render::cards(&places));
            }
            Ok(ExitCode::SUCCESS)
        }
        FinderState::Empty => {
            if args.json {
                println!("[]");
            } else {
                println!("{}", messages::nothing_found(locale));
            }
            Ok(ExitCode::SUCCESS)
        }
        FinderState::Failed(message) => {
            eprintln!("{}", render::error(locale, &message));
            Ok(ExitCode::FAILURE)
        }
        other => {
            tracing::error!("Search ended in unexpected state {:?}", other);
            Ok(ExitCode::FAILURE)
        }
    }
}
