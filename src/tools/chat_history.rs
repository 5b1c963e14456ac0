use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ChatHistoryParams {
    #[schemars(description = "Only return the most recent N messages")]
    pub limit: Option<usize>,
}
