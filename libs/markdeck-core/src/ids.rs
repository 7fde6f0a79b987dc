//! Card id assignment.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::types::{CardOption, CardType};

/// How the parser assigns card ids.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardIdStrategy {
    /// Derived from the card's content. Unchanged cards keep their id (and
    /// their review history) when the deck is re-parsed.
    #[default]
    ContentHash,
    /// A fresh UUID v4 on every parse.
    Random,
    /// `prefix-1`, `prefix-2`, ... in document order.
    Sequential { prefix: String },
}

impl CardIdStrategy {
    /// Parse from a configuration string.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "content-hash" => Some(Self::ContentHash),
            "random" => Some(Self::Random),
            "sequential" => Some(Self::Sequential {
                prefix: "card".to_string(),
            }),
            _ => None,
        }
    }
}

/// Id generator for one parse run.
#[derive(Debug)]
pub(crate) struct IdGenerator<'a> {
    strategy: &'a CardIdStrategy,
    issued: usize,
    seen_hashes: HashMap<String, usize>,
}

impl<'a> IdGenerator<'a> {
    pub(crate) fn new(strategy: &'a CardIdStrategy) -> Self {
        Self {
            strategy,
            issued: 0,
            seen_hashes: HashMap::new(),
        }
    }

    pub(crate) fn next_id(
        &mut self,
        card_type: CardType,
        front: &str,
        back: &str,
        options: Option<&[CardOption]>,
    ) -> String {
        self.issued += 1;
        match self.strategy {
            CardIdStrategy::Random => Uuid::new_v4().to_string(),
            CardIdStrategy::Sequential { prefix } => format!("{}-{}", prefix, self.issued),
            CardIdStrategy::ContentHash => {
                let hash = content_hash(card_type, front, back, options);
                let count = self.seen_hashes.entry(hash.clone()).or_insert(0);
                *count += 1;
                if *count == 1 {
                    hash
                } else {
                    format!("{}-{}", hash, count)
                }
            }
        }
    }
}

/// First 16 hex characters of the SHA-256 of the card's content.
pub fn content_hash(
    card_type: CardType,
    front: &str,
    back: &str,
    options: Option<&[CardOption]>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(card_type.as_str().as_bytes());
    hasher.update([0]);
    hasher.update(front.as_bytes());
    hasher.update([0]);
    hasher.update(back.as_bytes());
    for option in options.unwrap_or_default() {
        hasher.update([0, u8::from(option.is_correct)]);
        hasher.update(option.text.as_bytes());
    }
    let digest = format!("{:x}", hasher.finalize());
    digest[..16].to_string()
}
