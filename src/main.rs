use clap::{CommandFactory, Parser};
use serde_json::{Map, Value, json};
use sleeper_fetch::cli::{Args, is_config_operation, is_fetch_operation};
use sleeper_fetch::config::Config;
use sleeper_fetch::data_fetcher::{Caches, SleeperApi};
use sleeper_fetch::error::AppError;
use sleeper_fetch::logging::setup_logging;
use sleeper_fetch::version::{self, CURRENT_VERSION};
use std::path::Path;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode, AppError> {
    let args = Args::parse();

    if args.version {
        println!("{} {CURRENT_VERSION}", sleeper_fetch::NAME);
        return Ok(ExitCode::SUCCESS);
    }

    if is_config_operation(&args) {
        handle_config_operation(&args).await?;
        return Ok(ExitCode::SUCCESS);
    }

    if !is_fetch_operation(&args) && !args.check_version {
        Args::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    }

    // Load config first to fail early if there's an issue
    let config = Config::load().await?;
    let (log_file_path, _guard) = setup_logging(&args, &config).await?;
    tracing::info!("Logs are being written to: {log_file_path}");

    let api = SleeperApi::from_config(&config, Caches::new())?;
    let mut output = Map::new();
    let mut failed = false;

    if !args.leagues.is_empty() {
        let mut leagues = Map::new();
        for league_id in &args.leagues {
            let value = match api.get_league_data(league_id).await {
                Ok(league) => serde_json::to_value(league)?,
                Err(envelope) => {
                    failed = true;
                    serde_json::to_value(envelope)?
                }
            };
            leagues.insert(league_id.clone(), value);
        }
        output.insert("leagues".to_string(), Value::Object(leagues));
    }

    if args.nfl_state {
        let value = match api.get_nfl_state().await {
            Ok(state) => serde_json::to_value(state)?,
            Err(envelope) => {
                failed = true;
                serde_json::to_value(envelope)?
            }
        };
        output.insert("nfl_state".to_string(), value);
    }

    if args.check_version {
        let needs_update =
            version::check_for_update(api.fetcher(), &config.version_check_url, CURRENT_VERSION)
                .await;
        output.insert("needs_update".to_string(), json!(needs_update));
    }

    println!("{}", serde_json::to_string_pretty(&Value::Object(output))?);

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

async fn handle_config_operation(args: &Args) -> Result<(), AppError> {
    if args.list_config {
        return Config::display().await;
    }

    let config_path = Config::get_config_path();
    let mut config = if Path::new(&config_path).exists() {
        Config::load_from_path(&config_path).await?
    } else {
        Config::default()
    };

    if let Some(new_base) = &args.new_api_base {
        config.api_base_url = new_base.clone();
    }

    if let Some(new_log_path) = &args.new_log_file_path {
        config.log_file_path = Some(new_log_path.clone());
    } else if args.clear_log_file_path {
        config.log_file_path = None;
        println!("Custom log file path cleared. Using default location.");
    }

    config.validate()?;
    config.save().await?;
    println!("Config updated successfully!");
    Ok(())
}
