use std::path::PathBuf;

use clap::Parser;

use crate::selection::{PayloadRange, ALL_SITES};

/// Command-line configuration.
#[derive(Parser, Debug)]
#[command(name = "launch-dashboard")]
#[command(about = "Interactive dashboard of launch outcomes by site and payload mass")]
#[command(version)]
pub struct Args {
    /// Launch records file (.csv, .json or .parquet)
    #[arg(env = "LAUNCH_DASHBOARD_DATASET", default_value = "spacex_launch_dash.csv")]
    pub dataset: PathBuf,

    /// Initial site selection: ALL or a launch site name
    #[arg(long, default_value = ALL_SITES)]
    pub site: String,

    /// Initial payload range in kg, defaults to the dataset's own bounds
    #[arg(long, value_name = "LOW,HIGH", value_parser = parse_payload_range)]
    pub payload_range: Option<PayloadRange>,

    /// Initial window width
    #[arg(long, default_value_t = 1200.0)]
    pub width: f32,

    /// Initial window height
    #[arg(long, default_value_t = 900.0)]
    pub height: f32,

    /// Print the chart specifications as JSON and exit without opening a window
    #[arg(long)]
    pub print_charts: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn parse_payload_range(s: &str) -> Result<PayloadRange, String> {
    PayloadRange::parse(s).map_err(|e| e.to_string())
}

impl Args {
    /// Default `env_logger` filter; `RUST_LOG` still takes precedence.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
