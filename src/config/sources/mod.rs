//! Configuration sources, lowest precedence first.

pub mod environment;

pub mod global_file {
    use crate::config::paths::xdg_root;
    use config::builder::DefaultState;
    use config::{ConfigBuilder, ConfigError, File};

    /// Add `$XDG_CONFIG_HOME/folio/config.toml` when it exists.
    pub fn add_to_builder(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        match xdg_root::global_config_path() {
            Some(path) => Ok(builder.add_source(File::from(path).required(false))),
            None => Ok(builder),
        }
    }
}

pub mod explicit_file {
    use config::builder::DefaultState;
    use config::{ConfigBuilder, ConfigError, File};
    use std::path::Path;

    /// Add a file named on the command line; it must exist.
    pub fn add_to_builder(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(builder.add_source(File::from(path).required(true)))
    }
}
