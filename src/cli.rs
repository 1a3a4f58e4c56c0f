use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// True when the invocation only touches the config file.
pub fn is_config_operation(args: &Args) -> bool {
    args.new_api_base.is_some()
        || args.new_log_file_path.is_some()
        || args.clear_log_file_path
        || args.list_config
}

/// True when the invocation asks for data from the Sleeper API.
pub fn is_fetch_operation(args: &Args) -> bool {
    !args.leagues.is_empty() || args.nfl_state
}

/// Sleeper API fetcher
///
/// Fetches league metadata and the current NFL season state from the Sleeper
/// API and prints them as JSON. Transient network failures are retried with
/// exponential backoff; every failure is printed as an error envelope with
/// `"error": true`.
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
#[command(disable_version_flag = true)]
#[command(styles = get_styles())]
pub struct Args {
    /// Fetch metadata for a league. Can be given several times.
    #[arg(long = "league", value_name = "LEAGUE_ID", help_heading = "Data")]
    pub leagues: Vec<String>,

    /// Fetch the current NFL season state.
    #[arg(long = "nfl-state", help_heading = "Data")]
    pub nfl_state: bool,

    /// Ask the version endpoint whether a newer release exists.
    #[arg(long = "check-version", help_heading = "Data")]
    pub check_version: bool,

    /// Update the API base URL in config.
    #[arg(long = "set-api-base", value_name = "URL", help_heading = "Configuration")]
    pub new_api_base: Option<String>,

    /// Update log file path in config. This sets a persistent custom log file location.
    #[arg(long = "set-log-file", value_name = "PATH", help_heading = "Configuration")]
    pub new_log_file_path: Option<String>,

    /// Clear the custom log file path from config. This reverts to using the default log location.
    #[arg(long = "clear-log-file", help_heading = "Configuration")]
    pub clear_log_file_path: bool,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Show version information
    #[arg(short = 'V', long = "version", help_heading = "Info")]
    pub version: bool,

    /// Enable debug logging. Logs are also written to stdout.
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", value_name = "PATH", help_heading = "Debug")]
    pub log_file: Option<String>,
}
