//=========================================================================
// xr_stage desktop runner
//
// Usage: xr_stage [config.toml]
//
// Without an argument, `xr_stage.toml` in the working directory is used
// when present; otherwise the built-in defaults apply.
//
//=========================================================================

use std::path::Path;
use std::process::ExitCode;

use log::{error, info};

use xr_stage::core::config::AppConfig;
use xr_stage::platform::DesktopHost;

const DEFAULT_CONFIG: &str = "xr_stage.toml";

fn load_config() -> Result<AppConfig, xr_stage::core::error::ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => AppConfig::load_from_file(path),
        None if Path::new(DEFAULT_CONFIG).exists() => AppConfig::load_from_file(DEFAULT_CONFIG),
        None => {
            info!("No configuration file, using defaults");
            Ok(AppConfig::default())
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match DesktopHost::new(config).run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
