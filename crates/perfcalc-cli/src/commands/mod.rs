//! CLI command implementations.

pub mod ratio;
pub mod xirr;

pub use ratio::RatioArgs;
pub use xirr::XirrArgs;

use std::path::Path;

use perfcalc_analytics::ratios::RatioConfig;

use crate::error::{CliError, CliResult};

/// Loads a [`RatioConfig`] from a TOML file.
///
/// Missing keys take their defaults, so an empty file is valid.
pub fn load_ratio_config(path: &Path) -> CliResult<RatioConfig> {
    let text = std::fs::read_to_string(path)?;
    let config: RatioConfig = toml::from_str(&text).map_err(|e| CliError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    tracing::debug!(?config, path = %path.display(), "loaded ratio config");
    Ok(config)
}
