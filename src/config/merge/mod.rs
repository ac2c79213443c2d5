//! Config merge: default layer and source composition.

pub mod service;

pub(crate) mod merge_policy {
    use crate::config::FolioConfig;
    use config::builder::DefaultState;
    use config::{Config, ConfigBuilder, ConfigError};

    /// Builder seeded with the serialized defaults as the lowest layer.
    pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let defaults = Config::try_from(&FolioConfig::default())?;
        Ok(Config::builder().add_source(defaults))
    }
}
