//! Configuration file resolution and loading

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "PODPLAYER_CONFIG";

/// Where a resolved config path came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given on the command line
    CommandLine(PathBuf),
    /// Named by the environment variable
    Environment(PathBuf),
    /// Found in the platform config directory
    PlatformDefault(PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> &Path {
        match self {
            ConfigSource::CommandLine(p)
            | ConfigSource::Environment(p)
            | ConfigSource::PlatformDefault(p) => p,
        }
    }

    /// Explicitly requested sources must exist; the platform default may not
    fn is_explicit(&self) -> bool {
        !matches!(self, ConfigSource::PlatformDefault(_))
    }
}

/// Config file resolution, priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. `<platform config dir>/<app_name>/config.toml`, if it exists
///
/// Returns `None` when nothing applies; callers fall back to built-in defaults.
pub fn resolve_config_path(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    app_name: &str,
) -> Option<ConfigSource> {
    if let Some(path) = cli_arg {
        return Some(ConfigSource::CommandLine(path.to_path_buf()));
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return Some(ConfigSource::Environment(PathBuf::from(path)));
        }
    }

    dirs::config_dir()
        .map(|d| d.join(app_name).join("config.toml"))
        .filter(|p| p.exists())
        .map(ConfigSource::PlatformDefault)
}

/// Load a TOML config, falling back to `T::default()` when no file applies
///
/// A file named explicitly (command line or environment) that cannot be read
/// is an error. A platform default that vanished between resolution and
/// reading only produces a warning.
pub fn load_toml_or_default<T>(source: Option<&ConfigSource>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let Some(source) = source else {
        debug!("No config file found, using built-in defaults");
        return Ok(T::default());
    };

    let path = source.path();
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if !source.is_explicit() => {
            warn!("Config file {} unreadable ({}), using defaults", path.display(), e);
            return Ok(T::default());
        }
        Err(e) => {
            return Err(Error::Config(format!(
                "Cannot read config file {}: {}",
                path.display(),
                e
            )))
        }
    };

    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serial_test::serial;
    use std::io::Write;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Sample {
        #[serde(default)]
        name: String,
        #[serde(default)]
        count: u32,
    }

    #[test]
    #[serial]
    fn test_cli_arg_wins_over_env() {
        std::env::set_var("PODPLAYER_TEST_CONFIG", "/tmp/from-env.toml");
        let source = resolve_config_path(
            Some(Path::new("/tmp/from-cli.toml")),
            "PODPLAYER_TEST_CONFIG",
            "podplayer-test",
        );
        std::env::remove_var("PODPLAYER_TEST_CONFIG");

        assert_eq!(
            source,
            Some(ConfigSource::CommandLine(PathBuf::from("/tmp/from-cli.toml")))
        );
    }

    #[test]
    #[serial]
    fn test_env_var_used_without_cli_arg() {
        std::env::set_var("PODPLAYER_TEST_CONFIG", "/tmp/from-env.toml");
        let source = resolve_config_path(None, "PODPLAYER_TEST_CONFIG", "podplayer-test");
        std::env::remove_var("PODPLAYER_TEST_CONFIG");

        assert_eq!(
            source,
            Some(ConfigSource::Environment(PathBuf::from("/tmp/from-env.toml")))
        );
    }

    #[test]
    fn test_no_source_yields_default() {
        let loaded: Sample = load_toml_or_default(None).unwrap();
        assert_eq!(loaded, Sample::default());
    }

    #[test]
    fn test_loads_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name = \"demo\"\ncount = 3").unwrap();

        let source = ConfigSource::CommandLine(file.path().to_path_buf());
        let loaded: Sample = load_toml_or_default(Some(&source)).unwrap();
        assert_eq!(
            loaded,
            Sample {
                name: "demo".to_string(),
                count: 3
            }
        );
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let source = ConfigSource::Environment(PathBuf::from("/nonexistent/podplayer.toml"));
        let result: Result<Sample> = load_toml_or_default(Some(&source));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_platform_default_falls_back() {
        let source = ConfigSource::PlatformDefault(PathBuf::from("/nonexistent/podplayer.toml"));
        let loaded: Sample = load_toml_or_default(Some(&source)).unwrap();
        assert_eq!(loaded, Sample::default());
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "count = \"not a number\"").unwrap();

        let source = ConfigSource::CommandLine(file.path().to_path_buf());
        let result: Result<Sample> = load_toml_or_default(Some(&source));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
