use crate::error::{BuilderError, BuilderResult};
use std::fmt;
use std::str::FromStr;

/// Source language of a project, selected by the `type` config key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    C,
    Cpp,
}

impl Language {
    /// Front end that both compiles and links for this language.
    pub fn compiler(&self) -> &'static str {
        match self {
            Language::C => "gcc",
            Language::Cpp => "g++",
        }
    }

    pub fn source_suffix(&self) -> &'static str {
        match self {
            Language::C => ".c",
            Language::Cpp => ".cpp",
        }
    }
}

impl FromStr for Language {
    type Err = BuilderError;

    fn from_str(s: &str) -> BuilderResult<Self> {
        match s {
            "c" => Ok(Language::C),
            "cpp" => Ok(Language::Cpp),
            other => Err(BuilderError::UnknownType(other.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::C => write!(f, "c"),
            Language::Cpp => write!(f, "cpp"),
        }
    }
}
