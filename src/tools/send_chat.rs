use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SendChatParams {
    #[schemars(description = "The user's chat message")]
    pub message: String,

    #[schemars(description = "Name to address the user by. Defaults to the profile name.")]
    pub name: Option<String>,
}
