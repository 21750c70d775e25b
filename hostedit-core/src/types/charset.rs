//! Charset catalog types

use std::collections::BTreeMap;

/// Display name -> canonical charset identifier
pub type CharsetMap = BTreeMap<String, String>;

/// What an encoding source reports about one installed encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingInfo {
    /// Canonical identifier stored in host records
    pub name: String,
    /// Human readable name shown in the selector
    pub display_name: String,
    /// Other labels the platform accepts for this encoding
    pub aliases: Vec<String>,
    /// Publicly registered (not a private `x-` encoding)
    pub registered: bool,
    /// Text can be encoded into this charset, not only decoded
    pub can_encode: bool,
}

impl EncodingInfo {
    /// Encoding whose display name is its canonical name
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            aliases: Vec::new(),
            registered: true,
            can_encode: true,
        }
    }

    #[must_use]
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the catalog should list this encoding
    #[must_use]
    pub const fn is_selectable(&self) -> bool {
        self.registered && self.can_encode
    }
}
