use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{PlayerId, WordId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub registered_at: String, // ISO 8601 string
}

/// Body of player create/update requests
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerInput {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Word {
    pub id: WordId,
    pub text: String,
    pub used: bool,
}
