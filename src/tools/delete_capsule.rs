use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DeleteCapsuleParams {
    #[schemars(description = "ID of the capsule to delete")]
    pub id: String,
}
