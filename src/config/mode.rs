use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Execution mode of the process.
///
/// Failure diagnostics are only emitted in [`ExecutionMode::Development`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    Development,
    #[default]
    Production,
    Test,
}

impl ExecutionMode {
    pub fn is_development(self) -> bool {
        self == ExecutionMode::Development
    }
}

impl FromStr for ExecutionMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(ExecutionMode::Development),
            "production" | "prod" => Ok(ExecutionMode::Production),
            "test" => Ok(ExecutionMode::Test),
            other => Err(AppError::config_error(format!(
                "Unknown execution mode '{other}'"
            ))),
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutionMode::Development => "development",
            ExecutionMode::Production => "production",
            ExecutionMode::Test => "test",
        };
        f.write_str(name)
    }
}
