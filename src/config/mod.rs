mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./overcast.toml",
        "~/.config/overcast/config.toml",
        "/etc/overcast/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // Return default config if no file found
    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    for (name, base_url) in [
        ("store", &config.store.base_url),
        ("relay", &config.relay.base_url),
    ] {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            anyhow::bail!("{} base_url must be an HTTP(S) URL: {}", name, base_url);
        }
    }

    if config.store.timeout_secs == 0 || config.relay.timeout_secs == 0 {
        anyhow::bail!("Request timeout cannot be 0");
    }

    if !config.relay.manifest_path.starts_with('/') {
        anyhow::bail!(
            "Relay manifest_path must be absolute: {}",
            config.relay.manifest_path
        );
    }

    Ok(())
}
