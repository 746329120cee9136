use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use log::warn;
use crate::{
    error::{BuilderError, BuilderResult},
    toolchains::Language,
};

/// Build description read from `Config.json`. Every key is optional.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(deserialize_with = "null_as_default")]
    pub include_dir: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub lib_dir: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub linkers: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub flags: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub src: Vec<String>,
    /// Accepted for compatibility; no phase reads it.
    #[serde(deserialize_with = "null_as_default")]
    pub exclude_src: Vec<String>,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub build_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub run: bool,
}

/// `null` reads the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Config {
    pub fn load(path: &Path) -> BuilderResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| BuilderError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        Self::parse(&content).map_err(|e| BuilderError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(content)?;
        if !config.exclude_src.is_empty() {
            warn!("exclude_src is not supported and will be ignored");
        }
        Ok(config)
    }

    pub fn language(&self) -> BuilderResult<Language> {
        self.kind.parse()
    }

    pub fn starter(name: &str, language: Language) -> Self {
        Self {
            include_dir: vec!["include".to_string()],
            flags: vec!["-Wall".to_string()],
            src: vec!["./src".to_string()],
            kind: language.to_string(),
            build_name: name.to_string(),
            run: true,
            ..Self::default()
        }
    }

    pub fn to_json(&self) -> BuilderResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BuilderError::Config(format!("Failed to serialize config: {}", e)))
    }
}
