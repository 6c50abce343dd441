//! Command handlers -- one module per subcommand

pub mod config;
pub mod evinse;
pub mod index;

use std::path::Path;

use tracing::debug;

use purlscope_core::config::PurlscopeConfig;

use crate::error::CliError;

/// Load the effective configuration for a run.
///
/// A missing file is not an error here: defaults plus env overrides are used.
/// `config validate` calls [`PurlscopeConfig::load`] directly so that a missing file is reported.
pub async fn load_config(path: &Path) -> Result<PurlscopeConfig, CliError> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Ok(PurlscopeConfig::load(path).await?);
    }

    debug!(path = %path.display(), "config file not found, using defaults");
    let mut config = PurlscopeConfig::default();
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Pick the namespace index path: an explicit flag wins over `[evidence].db_path`.
pub(crate) fn resolve_db_path(flag: Option<String>, config: &PurlscopeConfig) -> Option<String> {
    flag.or_else(|| {
        let configured = config.evidence.db_path.trim();
        if configured.is_empty() {
            None
        } else {
            Some(configured.to_owned())
        }
    })
}
