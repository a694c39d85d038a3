//! Identity data models.

use serde::{Deserialize, Serialize};

use crate::session::{Chips, PlayerId};

/// The device's own participant record.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LocalIdentity {
    pub id: PlayerId,
    pub nickname: String,
    pub balance: Chips,
}
