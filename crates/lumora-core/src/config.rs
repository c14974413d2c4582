//! Configuration for the Lumora material layer.

use std::path::{Path, PathBuf};

use crate::logging::DEFAULT_FILTER;

/// Environment variable overriding [`Config::asset_root`].
pub const ASSET_ROOT_ENV: &str = "LUMORA_ASSET_ROOT";
/// Environment variable overriding [`Config::log_filter`].
pub const LOG_ENV: &str = "LUMORA_LOG";
/// Environment variable overriding [`Config::profiling`].
pub const PROFILING_ENV: &str = "LUMORA_PROFILING";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory that relative shader and texture paths are resolved against.
    pub asset_root: PathBuf,
    /// Directive string handed to the tracing subscriber.
    pub log_filter: String,
    pub profiling: ProfilingMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            asset_root: PathBuf::from("."),
            log_filter: DEFAULT_FILTER.to_string(),
            profiling: ProfilingMode::Off,
        }
    }
}

impl Config {
    /// Defaults overridden by `LUMORA_ASSET_ROOT`, `LUMORA_LOG` and `LUMORA_PROFILING`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();

        if let Some(root) = lookup(ASSET_ROOT_ENV) {
            config.asset_root = PathBuf::from(root);
        }
        if let Some(filter) = lookup(LOG_ENV) {
            config.log_filter = filter;
        }
        if let Some(mode) = lookup(PROFILING_ENV) {
            match ProfilingMode::parse(&mode) {
                Some(mode) => config.profiling = mode,
                None => tracing::warn!("ignoring unknown {} value '{}'", PROFILING_ENV, mode),
            }
        }

        config
    }

    /// Use `root` as the asset directory.
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    /// Resolve an asset path. Absolute paths are returned unchanged.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.asset_root.join(path)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfilingMode {
    /// Profiling is disabled
    #[default]
    Off,
    /// Scopes are recorded but not served
    On,
    /// Scopes are recorded and served to `puffin_viewer` over HTTP
    WithWebserver,
}

impl ProfilingMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "off" | "0" | "false" => Some(ProfilingMode::Off),
            "on" | "1" | "true" => Some(ProfilingMode::On),
            "server" | "webserver" | "http" => Some(ProfilingMode::WithWebserver),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.asset_root, PathBuf::from("."));
        assert_eq!(config.log_filter, DEFAULT_FILTER);
        assert_eq!(config.profiling, ProfilingMode::Off);
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup(&[
            (ASSET_ROOT_ENV, "/opt/game"),
            (LOG_ENV, "info"),
            (PROFILING_ENV, "server"),
        ]));

        assert_eq!(config.asset_root, PathBuf::from("/opt/game"));
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.profiling, ProfilingMode::WithWebserver);
    }

    #[test]
    fn test_unknown_profiling_value_is_ignored() {
        let config = Config::from_lookup(lookup(&[(PROFILING_ENV, "sometimes")]));
        assert_eq!(config.profiling, ProfilingMode::Off);
    }

    #[test]
    fn test_resolve() {
        let config = Config::default().with_asset_root("assets");
        assert_eq!(
            config.resolve("shaders/default_vertex.wgsl"),
            PathBuf::from("assets").join("shaders/default_vertex.wgsl")
        );

        let absolute = std::env::temp_dir().join("brick.png");
        assert_eq!(config.resolve(&absolute), absolute);
    }
}
