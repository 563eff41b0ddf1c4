//! Base builder. Field defaults live on the serde structs, so the builder
//! starts empty and later sources override earlier ones key by key.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};

pub(crate) fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(config::Config::builder())
}
