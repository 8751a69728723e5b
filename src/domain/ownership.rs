use super::tag::TagId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A user identity.
///
/// Equality and hashing use the case-folded key; the original spelling is
/// kept as the bare display name.
#[derive(Debug, Clone)]
pub struct Identity {
    key: String,
    name: String,
}

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            key: name.to_lowercase(),
            name,
        }
    }

    /// Case-folded key used for storage and equality.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The identity as originally spelled.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Identity {}

impl Hash for Identity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A persisted ownership row.
///
/// Only identities that currently own a tag have a row; selling a tag removes
/// it, which is how "no tag" is represented at rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipRecord {
    /// Case-folded identity key.
    pub identity: String,
    pub tag_id: TagId,
}

impl OwnershipRecord {
    pub fn new(identity: &Identity, tag_id: TagId) -> Self {
        Self {
            identity: identity.key().to_string(),
            tag_id,
        }
    }
}
