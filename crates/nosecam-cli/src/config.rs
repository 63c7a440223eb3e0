use anyhow::{Context, Result};
use nosecam_core::TriggerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration: built-in defaults, then an optional TOML file, then
/// `NOSECAM_*` environment overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub trigger: TriggerConfig,
}

impl Config {
    /// Load configuration from the process environment.
    /// `file` takes precedence over `NOSECAM_CONFIG`.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_with(file, |key| std::env::var(key).ok())
    }

    /// Like [`Config::load`], reading variables through `var`.
    pub fn load_with(file: Option<&Path>, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let file = file
            .map(Path::to_path_buf)
            .or_else(|| var("NOSECAM_CONFIG").map(PathBuf::from));

        let mut config = match &file {
            Some(path) => {
                let config = Self::from_file(path)?;
                tracing::info!(path = %path.display(), "loaded configuration file");
                config
            }
            None => Self::default(),
        };
        config.apply_env(var);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Override fields from `NOSECAM_*` variables. Unparseable values are ignored.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let region = &mut self.trigger.region;
        region.x = env_f32(&var, "NOSECAM_REGION_X", region.x);
        region.y = env_f32(&var, "NOSECAM_REGION_Y", region.y);
        region.width = env_f32(&var, "NOSECAM_REGION_WIDTH", region.width);
        region.height = env_f32(&var, "NOSECAM_REGION_HEIGHT", region.height);
        self.trigger.debounce_ms = env_u64(&var, "NOSECAM_DEBOUNCE_MS", self.trigger.debounce_ms);
    }
}

fn env_f32(var: &impl Fn(&str) -> Option<String>, key: &str, default: f32) -> f32 {
    var(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u64(var: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> u64 {
    var(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nosecam_core::Rect;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.trigger, TriggerConfig::default());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = Config::from_toml("[trigger]\ndebounce_ms = 250\n").unwrap();
        assert_eq!(config.trigger.debounce_ms, 250);
        assert_eq!(config.trigger.region, TriggerConfig::default().region);
    }

    #[test]
    fn test_from_toml_region() {
        let text = r#"
            [trigger.region]
            x = 10.0
            y = 20.0
            width = 30.0
            height = 40.0
        "#;
        let config = Config::from_toml(text).unwrap();
        assert_eq!(config.trigger.region, Rect::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(config.trigger.debounce_ms, 1000);
    }

    #[test]
    fn test_from_toml_rejects_bad_type() {
        assert!(Config::from_toml("[trigger]\ndebounce_ms = \"soon\"\n").is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = Config::default();
        config.trigger.debounce_ms = 42;
        let text = config.to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }

    fn write_temp(name: &str, text: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("nosecam-{}-{name}", std::process::id()));
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_flag_file_wins_over_env_file() {
        let flag = write_temp("flag.toml", "[trigger]\ndebounce_ms = 11\n");
        let env = write_temp("env.toml", "[trigger]\ndebounce_ms = 22\n");
        let env_str = env.to_string_lossy().into_owned();
        let var = |k: &str| (k == "NOSECAM_CONFIG").then(|| env_str.clone());

        let config = Config::load_with(Some(flag.as_path()), var).unwrap();
        assert_eq!(config.trigger.debounce_ms, 11);

        let config = Config::load_with(None, var).unwrap();
        assert_eq!(config.trigger.debounce_ms, 22);

        std::fs::remove_file(flag).unwrap();
        std::fs::remove_file(env).unwrap();
    }

    #[test]
    fn test_env_vars_override_file() {
        let file = write_temp("override.toml", "[trigger]\ndebounce_ms = 11\n");
        let config = Config::load_with(Some(file.as_path()), |k| {
            (k == "NOSECAM_DEBOUNCE_MS").then(|| "77".to_string())
        })
        .unwrap();
        assert_eq!(config.trigger.debounce_ms, 77);
        std::fs::remove_file(file).unwrap();
    }

    #[test]
    fn test_load_without_sources_is_default() {
        let config = Config::load_with(None, |_| None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_missing_file_fails() {
        let missing = std::env::temp_dir().join("nosecam-does-not-exist.toml");
        let err = Config::load_with(Some(missing.as_path()), |_| None).unwrap_err();
        assert!(format!("{err:#}").contains("reading config"), "{err:#}");
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("NOSECAM_REGION_X", "5"),
            ("NOSECAM_REGION_WIDTH", "12.5"),
            ("NOSECAM_DEBOUNCE_MS", "300"),
            ("NOSECAM_REGION_HEIGHT", "tall"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|k| vars.get(k).map(|v| v.to_string()));

        let region = config.trigger.region;
        assert_eq!(region.x, 5.0);
        assert_eq!(region.y, 250.0);
        assert_eq!(region.width, 12.5);
        // Unparseable value keeps the previous setting.
        assert_eq!(region.height, 100.0);
        assert_eq!(config.trigger.debounce_ms, 300);
    }
}
