use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigError,
    logging::{Channel, LogChannel},
    process::TextEncoding,
};

/// Tool configuration for a run
///
/// Built once at startup from the compiled-in defaults, with an optional
/// TOML override file merged on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Locations of the external tools
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Level name per log channel
    #[serde(default)]
    pub debug: DebugConfig,

    /// Clip export policy
    #[serde(default)]
    pub clip: ClipConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tools: ToolsConfig::default(),
            debug: DebugConfig::default(),
            clip: ClipConfig::default(),
        }
    }
}

impl Config {
    /// Build the effective configuration
    ///
    /// When `path` exists its sections are merged key by key over the
    /// defaults. When it does not, the defaults are written there as a
    /// template; failing to write it is only a warning.
    pub fn resolve<P: AsRef<Path>>(path: P, log: &LogChannel) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log.debug(format!("No configuration at {}, using defaults", path.display()));
            let config = Config::default();
            match config.save_to_file(path) {
                Ok(()) => log.info(format!("Wrote configuration template to {}", path.display())),
                Err(e) => log.warning(e),
            }
            return Ok(config);
        }

        log.debug(format!("Loading configuration from {}", path.display()));
        Self::from_file(path)
    }

    /// Load a TOML override file and merge it over the defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let malformed = |reason: String| ConfigError::Malformed {
            path: path.display().to_string(),
            reason,
        };

        let content = std::fs::read_to_string(path).map_err(|e| malformed(e.to_string()))?;
        let overlay: toml::Table = content.parse().map_err(|e: toml::de::Error| malformed(e.to_string()))?;

        Self::merged_with(overlay).map_err(malformed)
    }

    /// Merge an override table over the defaults and validate the result
    pub fn merged_with(overlay: toml::Table) -> Result<Self, String> {
        let mut merged = match toml::Value::try_from(Config::default()) {
            Ok(toml::Value::Table(table)) => table,
            Ok(_) => return Err("default configuration is not a table".to_string()),
            Err(e) => return Err(e.to_string()),
        };
        merge_sections(&mut merged, overlay);

        let config: Config = toml::Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| e.to_string())?;
        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let template_error = |reason: String| ConfigError::TemplateWrite {
            path: path.display().to_string(),
            reason,
        };

        let content = toml::to_string_pretty(self).map_err(|e| template_error(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| template_error(e.to_string()))?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tools.validate()?;
        self.clip.validate()?;
        Ok(())
    }
}

/// Overlay `overlay` onto `base` one section at a time
///
/// Keys present in an overlay section replace the base key of the same
/// name; everything else in the base is left alone. A section that is not a
/// table on either side is replaced whole.
fn merge_sections(base: &mut toml::Table, overlay: toml::Table) {
    for (section, value) in overlay {
        match (base.get_mut(&section), value) {
            (Some(toml::Value::Table(base_section)), toml::Value::Table(overlay_section)) => {
                for (key, value) in overlay_section {
                    base_section.insert(key, value);
                }
            }
            (_, value) => {
                base.insert(section, value);
            }
        }
    }
}

/// External tool locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Extraction tool, looked up on `PATH` unless absolute
    pub ffmpeg: String,

    /// Probe tool, looked up on `PATH` unless absolute
    pub ffprobe: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }
}

impl ToolsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [("tools.ffmpeg", &self.ffmpeg), ("tools.ffprobe", &self.ffprobe)] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Verbosity per log channel, as level names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugConfig {
    pub clipper: String,
    pub ffmpeg: String,
    pub ffprobe: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            clipper: "INFO".to_string(),
            ffmpeg: "INFO".to_string(),
            ffprobe: "WARNING".to_string(),
        }
    }
}

impl DebugConfig {
    pub fn entries(&self) -> [(Channel, &str); 3] {
        [
            (Channel::Clipper, self.clipper.as_str()),
            (Channel::Ffmpeg, self.ffmpeg.as_str()),
            (Channel::Ffprobe, self.ffprobe.as_str()),
        ]
    }
}

/// Clip export policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipConfig {
    /// Replace existing output files instead of skipping them
    pub overwrite: bool,

    /// Text encoding of the tools' output; UTF-8 when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            overwrite: true,
            encoding: None,
        }
    }
}

impl ClipConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.text_encoding().map(|_| ())
    }

    pub fn text_encoding(&self) -> Result<TextEncoding, ConfigError> {
        match &self.encoding {
            None => Ok(TextEncoding::default()),
            Some(name) => name.parse().map_err(|_| ConfigError::InvalidValue {
                key: "clip.encoding".to_string(),
                value: name.clone(),
            }),
        }
    }
}
