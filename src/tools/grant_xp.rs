use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GrantXpParams {
    #[schemars(description = "XP to add to the profile")]
    pub amount: u32,
}
