//! MCP `create_capsule` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `create_capsule` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateCapsuleParams {
    #[schemars(description = "Message to the user's future self")]
    pub message: String,

    /// Calendar date in `YYYY-MM-DD` form; must be after today.
    #[schemars(description = "Unlock date as YYYY-MM-DD. Must be after today.")]
    pub unlock_date: String,
}
