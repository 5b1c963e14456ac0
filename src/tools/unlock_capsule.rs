use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UnlockCapsuleParams {
    #[schemars(description = "ID of the capsule to open")]
    pub id: String,
}
