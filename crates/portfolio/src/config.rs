use std::path::{Path, PathBuf};
use std::{env, fs};

use directories::ProjectDirs;
use lazy_static::lazy_static;
use serde::Deserialize;
use tracing::warn;

/// Where the contact form gets relayed to.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RelayConfig {
    /// Base URL of the form-relay provider; the form id is appended.
    pub endpoint: String,
    /// Opaque provider-side form identifier.
    pub form_id: String,
    pub timeout_ms: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://formspree.io/f".into(),
            form_id: "mrbnyvlp".into(),
            timeout_ms: 15_000,
        }
    }
}

impl RelayConfig {
    pub fn url(&self) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), self.form_id)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CelebrationConfig {
    pub enabled: bool,
    pub particles: usize,
    pub duration_ms: u64,
    pub spread_degrees: f32,
}

impl Default for CelebrationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            particles: 100,
            duration_ms: 2_500,
            spread_degrees: 70.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    /// Ticks per second (status polling, animation steps).
    pub tick_rate: f64,
    /// Frames per second.
    pub frame_rate: f64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate: 20.0,
            frame_rate: 30.0,
        }
    }
}

impl UiConfig {
    fn validate(&self) -> Result<(), config::ConfigError> {
        for (key, rate) in [("ui.tick_rate", self.tick_rate), ("ui.frame_rate", self.frame_rate)] {
            check_rate(rate).map_err(|e| config::ConfigError::Message(format!("{key}: {e}")))?;
        }
        Ok(())
    }
}

/// Tick and frame rates must be finite and greater than zero.
pub fn check_rate(rate: f64) -> Result<f64, String> {
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(format!("expected a positive rate, got {rate}"))
    }
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub config_dir: PathBuf,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub celebration: CelebrationConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

impl Config {
    /// Load defaults, config files from the config dir and `PORTFOLIO_*` env overrides.
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::load(&get_config_dir(), &get_data_dir(), true)
    }

    /// Same as [`Config::new`] but for explicit directories. `with_env`
    /// toggles the environment layer (tests keep it off).
    pub fn load(
        config_dir: &Path,
        data_dir: &Path,
        with_env: bool,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?;

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.toml", config::FileFormat::Toml),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
            if config_dir.join(file).exists() {
                found_config = true
            }
        }
        if !found_config {
            warn!(
                "No configuration file found in {}, using defaults",
                config_dir.display()
            );
        }

        if with_env {
            builder = builder.add_source(
                config::Environment::with_prefix(&PROJECT_NAME)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.ui.validate()?;
        Ok(cfg)
    }
}

pub fn get_data_dir() -> PathBuf {
    if let Some(s) = DATA_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "portfolio", env!("CARGO_PKG_NAME"))
}

pub fn ensure_data_and_config_dirs_exist() -> std::io::Result<()> {
    let data_dir = get_data_dir();
    let config_dir = get_config_dir();

    if !data_dir.exists() {
        fs::create_dir_all(&data_dir)?;
    }
    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_config_dir_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(dir.path(), dir.path(), false).unwrap();
        assert_eq!(cfg.relay, RelayConfig::default());
        assert_eq!(cfg.celebration, CelebrationConfig::default());
        assert_eq!(cfg.ui, UiConfig::default());
        assert_eq!(cfg.config.config_dir, dir.path());
    }

    #[test]
    fn toml_file_overrides_selected_keys() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            "[relay]\nform_id = \"abc123\"\ntimeout_ms = 500\n\n[celebration]\nenabled = false\n",
        )
        .unwrap();

        let cfg = Config::load(dir.path(), dir.path(), false).unwrap();
        assert_eq!(cfg.relay.form_id, "abc123");
        assert_eq!(cfg.relay.timeout_ms, 500);
        assert_eq!(cfg.relay.endpoint, RelayConfig::default().endpoint);
        assert!(!cfg.celebration.enabled);
        assert_eq!(cfg.celebration.particles, 100);
    }

    #[test]
    fn json5_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.json5"),
            "{ ui: { tick_rate: 10.0, frame_rate: 60.0 }, // comment\n }",
        )
        .unwrap();

        let cfg = Config::load(dir.path(), dir.path(), false).unwrap();
        assert_eq!(cfg.ui.tick_rate, 10.0);
        assert_eq!(cfg.ui.frame_rate, 60.0);
    }

    #[test]
    fn non_positive_rates_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.toml"), "[ui]\ntick_rate = 0.0\n").unwrap();

        let err = Config::load(dir.path(), dir.path(), false).unwrap_err();
        assert!(err.to_string().contains("ui.tick_rate"));

        fs::write(dir.path().join("config.toml"), "[ui]\nframe_rate = -5.0\n").unwrap();
        let err = Config::load(dir.path(), dir.path(), false).unwrap_err();
        assert!(err.to_string().contains("ui.frame_rate"));
    }

    #[test]
    fn check_rate_accepts_only_finite_positive_values() {
        assert_eq!(check_rate(0.5), Ok(0.5));
        assert!(check_rate(0.0).is_err());
        assert!(check_rate(-1.0).is_err());
        assert!(check_rate(f64::NAN).is_err());
        assert!(check_rate(f64::INFINITY).is_err());
    }

    #[test]
    fn relay_url_tolerates_trailing_slash() {
        let relay = RelayConfig {
            endpoint: "https://formspree.io/f/".into(),
            ..RelayConfig::default()
        };
        assert_eq!(relay.url(), "https://formspree.io/f/mrbnyvlp");
    }
}
