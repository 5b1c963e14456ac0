use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CaptureMemoryParams {
    #[schemars(description = "What happened, in the user's own words")]
    pub text: String,

    #[schemars(
        description = "Optional mood: 'happy', 'sad', 'excited', 'calm', 'grateful', 'proud'"
    )]
    pub mood: Option<String>,

    #[schemars(description = "Optional free-text tags, e.g. ['family', 'travel']")]
    pub tags: Option<Vec<String>>,
}
