//! CLI Config Check Command
//!
//! Runs the full load pipeline and prints the effective config.

use anyhow::Result;
use callhub_config::HubConfig;

pub fn run(raw: HubConfig) -> Result<()> {
    let config = callhub_config::prepare(raw)?;
    print!("{}", callhub_config::to_yaml(&config)?);
    Ok(())
}
