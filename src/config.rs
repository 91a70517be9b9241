use config as config_rs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::driver::Header;
use crate::table::DuplicatePolicy;

pub const DEFAULT_INPUT: &str = "projects/dev/src/main/java/net/minecraft/src/mod_LibShapeDraw.java";
pub const DEFAULT_OUTPUT: &str = "projects/main/src/main/java/mod_LibShapeDraw.java";
pub const DEFAULT_GENERATOR: &str = "source-obfuscator";
pub const ENV_PREFIX: &str = "SOURCE_OBFUSCATOR";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Directory that relative `input`, `output` and `mappings` resolve against.
    /// Defaults to the caller's working directory, not the binary's location.
    pub root: PathBuf,
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(default)]
    pub mappings: Option<PathBuf>,
    pub generator: String,
    #[serde(default)]
    pub editable_source: Option<String>,
    pub strict: bool,
}

/// Values supplied on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub root: Option<PathBuf>,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub mappings: Option<PathBuf>,
    pub generator: Option<String>,
    pub editable_source: Option<String>,
    pub strict: Option<bool>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Config(#[from] config_rs::ConfigError),
    #[error("invalid path: {0}")]
    Path(String),
}

impl AppConfig {
    pub fn input_path(&self) -> PathBuf {
        self.root.join(&self.input)
    }

    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.output)
    }

    pub fn mappings_path(&self) -> Option<PathBuf> {
        self.mappings.as_ref().map(|m| self.root.join(m))
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        if self.strict {
            DuplicatePolicy::Reject
        } else {
            DuplicatePolicy::LastWins
        }
    }

    pub fn header(&self) -> Header {
        let editable = self
            .editable_source
            .clone()
            .unwrap_or_else(|| self.input.to_string_lossy().replace('\\', "/"));
        Header::new(editable, self.generator.clone())
    }
}

fn path_value(path: &Path) -> Result<String, ConfigError> {
    path.to_str()
        .map(str::to_string)
        .ok_or_else(|| ConfigError::Path(path.to_string_lossy().into_owned()))
}

/// Defaults, then `SOURCE_OBFUSCATOR_*` environment variables, then CLI flags.
pub fn load_config(overrides: &ConfigOverrides) -> Result<AppConfig, ConfigError> {
    let mut builder = config_rs::Config::builder()
        .set_default("root", ".")?
        .set_default("input", DEFAULT_INPUT)?
        .set_default("output", DEFAULT_OUTPUT)?
        .set_default("generator", DEFAULT_GENERATOR)?
        .set_default("strict", false)?
        .add_source(config_rs::Environment::with_prefix(ENV_PREFIX).try_parsing(true));

    // CLI flags take precedence
    if let Some(root) = &overrides.root {
        builder = builder.set_override("root", path_value(root)?)?;
    }
    if let Some(input) = &overrides.input {
        builder = builder.set_override("input", path_value(input)?)?;
    }
    if let Some(output) = &overrides.output {
        builder = builder.set_override("output", path_value(output)?)?;
    }
    if let Some(mappings) = &overrides.mappings {
        builder = builder.set_override("mappings", path_value(mappings)?)?;
    }
    if let Some(generator) = &overrides.generator {
        builder = builder.set_override("generator", generator.as_str())?;
    }
    if let Some(editable) = &overrides.editable_source {
        builder = builder.set_override("editable_source", editable.as_str())?;
    }
    if let Some(strict) = overrides.strict {
        builder = builder.set_override("strict", strict)?;
    }

    let cfg = builder.build()?;
    Ok(cfg.try_deserialize::<AppConfig>()?)
}
