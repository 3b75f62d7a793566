//! Module scope - the closed set of business modules an admin may manage.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

use crate::config::{
    MODULE_ALL, MODULE_DWAR, MODULE_FRESH_SERVE, MODULE_SAMMILAN, MODULE_SANDESH, MODULE_SANGRAH,
    VALID_MODULE_SCOPES,
};
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModuleScope {
    Dwar,
    Sangrah,
    Sammilan,
    Sandesh,
    FreshServe,
    /// Access to every module
    All,
}

impl ModuleScope {
    /// Parse user input, normalizing case and surrounding whitespace.
    pub fn parse(input: &str) -> AppResult<Self> {
        input.parse()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleScope::Dwar => MODULE_DWAR,
            ModuleScope::Sangrah => MODULE_SANGRAH,
            ModuleScope::Sammilan => MODULE_SAMMILAN,
            ModuleScope::Sandesh => MODULE_SANDESH,
            ModuleScope::FreshServe => MODULE_FRESH_SERVE,
            ModuleScope::All => MODULE_ALL,
        }
    }
}

impl FromStr for ModuleScope {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            MODULE_DWAR => Ok(ModuleScope::Dwar),
            MODULE_SANGRAH => Ok(ModuleScope::Sangrah),
            MODULE_SAMMILAN => Ok(ModuleScope::Sammilan),
            MODULE_SANDESH => Ok(ModuleScope::Sandesh),
            MODULE_FRESH_SERVE => Ok(ModuleScope::FreshServe),
            MODULE_ALL => Ok(ModuleScope::All),
            _ => Err(AppError::validation(format!(
                "Invalid module_scope. Must be one of: {}",
                VALID_MODULE_SCOPES.join(", ")
            ))),
        }
    }
}

impl std::fmt::Display for ModuleScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
