//! Configuration management for deluge-docs.
//!
//! Configuration is loaded with figment from defaults, an optional TOML file
//! and `DLGDOC_` environment variables.

use std::path::PathBuf;
use std::sync::OnceLock;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::screen::{MAX_DENSITY, MAX_PADDING, MAX_SCALE};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory under the user config dir holding the config file.
const CONFIG_DIR_NAME: &str = "deluge-docs";

/// Environment variable prefix.
const ENV_PREFIX: &str = "DLGDOC_";

/// Colours are written as `#rrggbb`.
const COLOR_PATTERN: &str = r"^#[0-9a-fA-F]{6}$";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (`DLGDOC_SCREEN__DEFAULT_SCALE=3`)
/// 2. TOML config file at `~/.config/deluge-docs/config.toml` or `--config`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Icon asset configuration.
    pub icons: IconConfig,
    /// OLED screen rendering configuration.
    pub screen: ScreenConfig,
}

/// Where icon assets live and how they are referenced from HTML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    /// Directory scanned for icon files. The file stem is the icon id.
    pub dir: PathBuf,
    /// Prefix prepended to the file name to form the asset URL.
    pub url_prefix: String,
    /// File extensions recognised as icons.
    pub extensions: Vec<String>,
}

/// OLED screen rasterizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Scale used when a `:screen` directive has no `scale` attribute.
    pub default_scale: u32,
    /// Extra pixel density multiplier applied on top of the scale.
    pub density: u32,
    /// Border around the screen, in screen pixels.
    pub padding: u32,
    /// Fraction of each pixel left empty between neighbours.
    pub gap: f32,
    /// Background colour (`#rrggbb`).
    pub background: String,
    /// Lit pixel colour (`#rrggbb`).
    pub foreground: String,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("src/assets/icons"),
            url_prefix: "/icons/".to_string(),
            extensions: vec!["svg".to_string(), "png".to_string()],
        }
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            default_scale: 2,
            density: 2,
            padding: 4,
            gap: 0.1,
            background: "#000000".to_string(),
            foreground: "#ffffff".to_string(),
        }
    }
}

impl ScreenConfig {
    /// Background colour as RGB bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the colour is not `#rrggbb`.
    pub fn background_rgb(&self) -> Result<[u8; 3]> {
        parse_color("background", &self.background)
    }

    /// Foreground colour as RGB bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the colour is not `#rrggbb`.
    pub fn foreground_rgb(&self) -> Result<[u8; 3]> {
        parse_color("foreground", &self.foreground)
    }
}

/// # Panics
///
/// Panics if the built-in colour pattern fails to compile.
fn color_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(COLOR_PATTERN).expect("Invalid colour pattern"))
}

fn parse_color(field: &str, value: &str) -> Result<[u8; 3]> {
    let invalid = || Error::ConfigValidation {
        message: format!("screen.{field} must be a #rrggbb colour, got {value:?}"),
    };
    if !color_pattern().is_match(value) {
        return Err(invalid());
    }

    let mut rgb = [0u8; 3];
    for (i, channel) in rgb.iter_mut().enumerate() {
        let start = 1 + i * 2;
        *channel = u8::from_str_radix(&value[start..start + 2], 16).map_err(|_| invalid())?;
    }
    Ok(rgb)
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_SCALE).contains(&self.screen.default_scale) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "screen.default_scale must be between 1 and {MAX_SCALE}, got {}",
                    self.screen.default_scale
                ),
            });
        }

        if !(1..=MAX_DENSITY).contains(&self.screen.density) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "screen.density must be between 1 and {MAX_DENSITY}, got {}",
                    self.screen.density
                ),
            });
        }

        if self.screen.padding > MAX_PADDING {
            return Err(Error::ConfigValidation {
                message: format!(
                    "screen.padding must be at most {MAX_PADDING}, got {}",
                    self.screen.padding
                ),
            });
        }

        if !(0.0..1.0).contains(&self.screen.gap) {
            return Err(Error::ConfigValidation {
                message: format!("screen.gap must be in [0, 1), got {}", self.screen.gap),
            });
        }

        self.screen.background_rgb()?;
        self.screen.foreground_rgb()?;

        if self.icons.extensions.is_empty() {
            return Err(Error::ConfigValidation {
                message: "icons.extensions must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.screen.default_scale, 2);
        assert_eq!(config.screen.density, 2);
        assert_eq!(config.icons.url_prefix, "/icons/");
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_scale() {
        let mut config = Config::default();
        config.screen.default_scale = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("default_scale"));
    }

    #[test]
    fn test_validate_zero_density() {
        let mut config = Config::default();
        config.screen.density = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("density"));
    }

    #[test]
    fn test_validate_scale_above_max() {
        let mut config = Config::default();
        config.screen.default_scale = 100;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("default_scale"));

        config.screen.default_scale = MAX_SCALE;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_density_and_padding_bounds() {
        let mut config = Config::default();
        config.screen.density = u32::MAX / 2;
        assert!(matches!(
            config.validate(),
            Err(Error::ConfigValidation { .. })
        ));

        let mut config = Config::default();
        config.screen.padding = MAX_PADDING + 1;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("padding"));
    }

    #[test]
    fn test_color_pattern_is_shared() {
        assert!(std::ptr::eq(color_pattern(), color_pattern()));
    }

    #[test]
    fn test_validate_gap_out_of_range() {
        let mut config = Config::default();
        config.screen.gap = 1.0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("gap"));
    }

    #[test]
    fn test_validate_bad_color() {
        let mut config = Config::default();
        config.screen.foreground = "white".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("foreground"));
    }

    #[test]
    fn test_validate_empty_extensions() {
        let mut config = Config::default();
        config.icons.extensions.clear();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_color_parsing() {
        let screen = ScreenConfig {
            background: "#0a1B2c".to_string(),
            ..ScreenConfig::default()
        };
        assert_eq!(screen.background_rgb().unwrap(), [0x0a, 0x1b, 0x2c]);
        assert_eq!(screen.foreground_rgb().unwrap(), [0xff, 0xff, 0xff]);
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("deluge-docs"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[screen]\ndefault_scale = 3\nforeground = \"#88ccff\"\n\n[icons]\nurl_prefix = \"/img/\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.screen.default_scale, 3);
        assert_eq!(config.screen.foreground, "#88ccff");
        assert_eq!(config.screen.density, 2);
        assert_eq!(config.icons.url_prefix, "/img/");
    }

    #[test]
    fn test_load_invalid_values_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[screen]\ndensity = 0\n").unwrap();

        assert!(matches!(
            Config::load_from(Some(path)),
            Err(Error::ConfigValidation { .. })
        ));
    }

    #[test]
    fn test_screen_config_serialize() {
        let json = serde_json::to_string(&ScreenConfig::default()).unwrap();
        assert!(json.contains("default_scale"));
        assert!(json.contains("foreground"));
    }
}
