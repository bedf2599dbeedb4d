// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Prints per-day energy consumption as JSON.
//!
//! Configuration comes from the environment (and a `.env` file, if present);
//! `NUM_DAYS_BACK` selects the range (default 0, today only) and
//! `LOG_FORMAT=json` switches logs to JSON lines. Logs go to stderr so
//! stdout stays machine-readable.

use std::process::ExitCode;

use blockwatt::{BlockwattError, ConfigError, DayEnergyRecord, ExplorerConfig, ExplorerContext};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if dotenvy::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn num_days_back() -> Result<u64, ConfigError> {
    match dotenvy::var("NUM_DAYS_BACK") {
        Err(_) => Ok(0),
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: std::num::ParseIntError| {
                ConfigError::invalid_value("NUM_DAYS_BACK", raw.clone(), e.to_string())
            }),
    }
}

async fn run() -> Result<Vec<DayEnergyRecord>, BlockwattError> {
    let config = ExplorerConfig::from_env()?;
    let days_back = num_days_back()?;
    info!(days_back, base_url = %config.base_url, "Computing per-day consumption");

    let context = ExplorerContext::new(config)?;
    let records = context.energy().consumption_per_day(days_back).await?;

    let stats = context.cache().stats().await;
    info!(cache = %stats, "Done");
    Ok(records.into_values().collect())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let records = match run().await {
        Ok(records) => records,
        Err(e) => {
            error!(error = %e, "Failed");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&records) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Failed to encode records");
            ExitCode::FAILURE
        }
    }
}
