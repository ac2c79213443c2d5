//! Environment variable source: FOLIO_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Add environment variable overlay to builder.
/// `FOLIO_GITHUB__TOKEN` maps to `github.token`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix("FOLIO")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );
    Ok(builder)
}
