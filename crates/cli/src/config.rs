use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Harness configuration. Only logging and presentation live here; the
/// calculator engine takes no configuration at all.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub presentation: PresentationConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LoggingFormatConfig,
    #[serde(default)]
    pub levels: LoggingLevelsConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LoggingFormatConfig {
    #[serde(default)]
    pub show_time: bool,
    #[serde(default)]
    pub json: bool,
    #[serde(default)]
    pub location: LoggingLocationConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LoggingLocationConfig {
    #[serde(default)]
    pub show_file: bool,
    #[serde(default)]
    pub show_line: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingLevelsConfig {
    pub debug: bool,
    pub info: bool,
    pub warning: bool,
    pub error: bool,
    pub critical: bool,
}

impl Default for LoggingLevelsConfig {
    fn default() -> Self {
        Self {
            debug: false,
            info: false,
            warning: true,
            error: true,
            critical: true,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PresentationConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "true_default")]
    pub show_mode: bool,
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            show_mode: true,
            prompt: default_prompt(),
        }
    }
}

fn default_width() -> usize {
    20
}

fn default_prompt() -> String {
    "calc".to_string()
}

fn true_default() -> bool {
    true
}

static CONFIG: RwLock<Option<&'static AppConfig>> = RwLock::new(None);

/// Process-wide configuration. Falls back to defaults (with a warning on
/// stderr) when the files cannot be read.
pub fn get_config() -> &'static AppConfig {
    if let Some(cfg) = *CONFIG.read().unwrap_or_else(|e| e.into_inner()) {
        return cfg;
    }

    let mut write = CONFIG.write().unwrap_or_else(|e| e.into_inner());
    if let Some(cfg) = *write {
        return cfg;
    }

    let loaded = load_config().unwrap_or_else(|e| {
        eprintln!("warning: failed to load configuration, using defaults: {}", e);
        AppConfig::default()
    });
    let cfg: &'static AppConfig = Box::leak(Box::new(loaded));
    *write = Some(cfg);
    cfg
}

#[cfg(test)]
pub fn reset_config() {
    let mut write = CONFIG.write().unwrap_or_else(|e| e.into_inner());
    *write = None;
}

/// Prefer the crate directory (cargo run / cargo test), then the workspace
/// root layout, then the working directory.
fn locate(name: &str) -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let candidates = [
        Path::new(&manifest_dir).join(name),
        Path::new("crates").join("cli").join(name),
        PathBuf::from(name),
    ];
    candidates
        .iter()
        .find(|p| p.exists())
        .cloned()
        .unwrap_or_else(|| PathBuf::from(name))
}

fn load_config() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        // Shipped defaults
        .add_source(File::from(locate("calcctl.yaml")).required(false))
        // Local override
        .add_source(File::from(locate(".calcctl.yaml")).required(false))
        // Map nested env vars like CALC__PRESENTATION__WIDTH=30
        .add_source(Environment::with_prefix("CALC").separator("__"));

    builder.build()?.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    struct EnvGuard(&'static str);
    impl EnvGuard {
        fn new(key: &'static str, val: &str) -> Self {
            reset_config();
            env::set_var(key, val);
            Self(key)
        }
    }
    impl Drop for EnvGuard {
        fn drop(&mut self) {
            env::remove_var(self.0);
            reset_config();
        }
    }

    #[test]
    #[serial]
    fn test_load_config() {
        let config = load_config();
        assert!(config.is_ok(), "Failed to load config: {:?}", config.err());

        let config = config.unwrap();
        // Values from calcctl.yaml
        assert_eq!(config.presentation.width, 20);
        assert_eq!(config.presentation.prompt, "calc");
        assert!(config.logging.levels.warning);
        assert!(!config.logging.levels.debug);
    }

    #[test]
    #[serial]
    fn test_env_var_override_precedence() {
        let _guard = EnvGuard::new("CALC__PRESENTATION__PROMPT", "sci");
        let config = load_config().expect("Should load config");
        assert_eq!(config.presentation.prompt, "sci");
    }

    #[test]
    #[serial]
    fn test_type_coercion() {
        {
            let _guard = EnvGuard::new("CALC__PRESENTATION__WIDTH", "32");
            let config = load_config().expect("Should load config");
            assert_eq!(config.presentation.width, 32);
        }
        {
            let _guard = EnvGuard::new("CALC__LOGGING__FORMAT__JSON", "true");
            let config = load_config().expect("Should load config");
            assert!(config.logging.format.json);
        }
    }

    #[test]
    #[serial]
    fn test_get_config_is_cached() {
        reset_config();
        let a = get_config() as *const AppConfig;
        let b = get_config() as *const AppConfig;
        assert_eq!(a, b);
        reset_config();
    }

    #[test]
    fn test_defaults_without_files() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.presentation.width, 20);
        assert!(config.presentation.show_mode);
        assert!(config.logging.levels.error);
    }
}
