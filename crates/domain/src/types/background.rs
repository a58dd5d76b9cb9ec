use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Upbringing chosen during creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Background {
    Noble,
    Commoner,
    Wild,
}

impl Background {
    pub fn all() -> &'static [Background] {
        &[Background::Noble, Background::Commoner, Background::Wild]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Background::Noble => "noble",
            Background::Commoner => "commoner",
            Background::Wild => "wild",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Background::Noble => "Noble",
            Background::Commoner => "Commoner",
            Background::Wild => "Wild",
        }
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Background {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "noble" => Ok(Background::Noble),
            "commoner" => Ok(Background::Commoner),
            "wild" => Ok(Background::Wild),
            _ => Err(DomainError::parse(format!("Unknown background: {}", s))),
        }
    }
}
