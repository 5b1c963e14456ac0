//! MCP `recall_memories` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `recall_memories` MCP tool. All filters are optional.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct RecallMemoriesParams {
    /// Case-insensitive text matched against memory text and tags.
    #[schemars(description = "Text to look for in memory text and tags (case-insensitive)")]
    pub query: Option<String>,

    /// Tags that must all be present.
    #[schemars(description = "Only return memories carrying all of these tags")]
    pub tags: Option<Vec<String>>,

    #[schemars(
        description = "Only return memories with this mood: 'happy', 'sad', 'excited', 'calm', 'grateful', 'proud'"
    )]
    pub mood: Option<String>,

    /// Maximum number of results, newest first. Defaults to 20.
    #[schemars(description = "Maximum number of results, newest first. Defaults to 20.")]
    pub limit: Option<usize>,
}
