use karigar_ingest::{IngestConfig, SheetScanMode};
use std::env;
use std::path::Path;

#[derive(Clone, Debug, Default)]
pub struct Config {
    pub ingest: IngestConfig,
}

impl Config {
    /// Reads the optional JSON config file, then applies `KARIGAR_*`
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;
        let ingest: IngestConfig = serde_json::from_str(&raw)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;
        Ok(Config { ingest })
    }

    pub fn apply_overrides<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = var("KARIGAR_GENERIC_NAME_REQUIRED") {
            self.ingest.mapping.columns.generic_name_required =
                parse_bool(&v).ok_or(ConfigError::InvalidValue("KARIGAR_GENERIC_NAME_REQUIRED"))?;
        }
        if let Some(v) = var("KARIGAR_SHEET_SCAN_MODE") {
            self.ingest.mapping.sheet_scan_mode = v
                .parse::<SheetScanMode>()
                .map_err(|_| ConfigError::InvalidValue("KARIGAR_SHEET_SCAN_MODE"))?;
        }
        if let Some(v) = var("KARIGAR_FOLD_DESIGN_SEPARATORS") {
            self.ingest.design_keys.fold_separators =
                parse_bool(&v).ok_or(ConfigError::InvalidValue("KARIGAR_FOLD_DESIGN_SEPARATORS"))?;
        }
        if let Some(v) = var("KARIGAR_SAMPLE_SIZE") {
            self.ingest.diagnostics_sample_size = v
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("KARIGAR_SAMPLE_SIZE"))?;
        }
        Ok(())
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read(String),
    Parse(String),
    InvalidValue(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read(msg) => write!(f, "Could not read config file {}", msg),
            ConfigError::Parse(msg) => write!(f, "Invalid config file {}", msg),
            ConfigError::InvalidValue(var) => write!(f, "Invalid value for: {}", var),
        }
    }
}

impl std::error::Error for ConfigError {}
