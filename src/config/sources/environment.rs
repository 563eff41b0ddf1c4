//! Environment variable source: MAA_ASSETS prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Add environment variable overlay to builder.
/// Uses MAA_ASSETS prefix and __ as separator for nested keys,
/// e.g. `MAA_ASSETS__PATHS__IMAGE_DIR`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix("MAA_ASSETS")
            .separator("__")
            .try_parsing(true),
    );
    Ok(builder)
}
