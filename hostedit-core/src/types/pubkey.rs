//! Public key selector choices

use serde::{Deserialize, Serialize};

/// Use whichever unlocked key authenticates first
pub const PUBKEY_ID_ANY: i64 = -1;

/// Never offer public keys for this host
pub const PUBKEY_ID_NEVER: i64 = -2;

/// One entry of the editor's key selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PubkeyChoice {
    pub display_name: String,
    /// Stored as a string because the selector mixes built-ins and row ids
    pub value: String,
}

impl PubkeyChoice {
    #[must_use]
    pub fn new(display_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            value: value.into(),
        }
    }

    /// Choices that precede the stored keys
    #[must_use]
    pub fn builtin() -> Vec<Self> {
        vec![
            Self::new("Use any unlocked key", PUBKEY_ID_ANY.to_string()),
            Self::new("Don't use keys", PUBKEY_ID_NEVER.to_string()),
        ]
    }
}
