use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Runtime the binary is hosted in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// AWS Lambda behind an HTTP trigger
    Lambda,
    /// Long-running HTTP server
    Server,
}

impl FromStr for Platform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lambda" => Ok(Platform::Lambda),
            "server" => Ok(Platform::Server),
            _ => Err(anyhow::anyhow!("Invalid platform: {}", s)),
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Platform::Lambda => write!(f, "lambda"),
            Platform::Server => write!(f, "server"),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}
