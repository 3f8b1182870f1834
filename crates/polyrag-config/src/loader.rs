//! Configuration loader.
//!
//! Three layers, weakest first: built-in defaults, an optional TOML
//! file, then `POLYRAG_`-prefixed environment variables (`_` splits
//! section nesting, so `POLYRAG_SERVER_PORT` targets `server.port`).

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use thiserror::Error;

use crate::schema::PolyragConfig;

const ENV_PREFIX: &str = "POLYRAG_";

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A layer failed to parse, or the merged tree did not fit the
    /// schema.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] figment::Error),
}

/// Loads and validates the merged configuration.
pub fn load_config(config_path: Option<&str>) -> Result<PolyragConfig, ConfigError> {
    let config = layers(config_path).extract()?;
    Ok(config)
}

/// Stacks the providers; extraction is the caller's problem.
fn layers(config_path: Option<&str>) -> Figment {
    let defaults = Figment::from(Serialized::defaults(PolyragConfig::default()));
    let with_file = match config_path {
        Some(path) => defaults.merge(Toml::file(path)),
        None => defaults,
    };
    with_file.merge(Env::prefixed(ENV_PREFIX).split("_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_without_file() {
        let config = load_config(None).expect("load");
        assert_eq!(config.pool.max_capacity, 10);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(
            file,
            "[pool]\nmax_capacity = 3\n\n[server]\nport = 9000\ntoken = \"s3cret\""
        )
        .expect("write");

        let config = load_config(file.path().to_str()).expect("load");
        assert_eq!(config.pool.max_capacity, 3);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.token.as_deref(), Some("s3cret"));
        // Untouched sections keep their defaults.
        assert_eq!(config.engine.chunk_token_size, 1200);
    }

    #[test]
    fn unknown_top_level_section_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "[nonsense]\nfoo = 1").expect("write");
        assert!(load_config(file.path().to_str()).is_err());
    }

    #[test]
    fn malformed_file_surfaces_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "this is [ not toml").expect("write");
        let err = load_config(file.path().to_str()).expect_err("parse failure");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        // figment's Toml::file provider skips absent files.
        let config = load_config(Some("/definitely/not/here.toml")).expect("load");
        assert_eq!(config.pool.max_capacity, 10);
    }
}
