use super::coins::Coins;
use crate::error::ShopError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Formatting marker understood by the display layer.
pub const FORMAT_MARKER: char = '§';
/// Alternate escape accepted in catalog sources, rewritten to [`FORMAT_MARKER`].
pub const ALT_FORMAT_ESCAPE: char = '&';

/// Position of a tag in catalog order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TagId(pub u32);

impl TagId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for TagId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDefinition {
    pub id: TagId,
    /// Display text with formatting markers normalized and a trailing reset.
    pub display_text: String,
    pub price: Coins,
}

impl TagDefinition {
    /// Parses a `"displayText:price"` entry, splitting at the first colon.
    ///
    /// The price runs up to the next colon; anything after it is ignored.
    pub fn parse(id: TagId, entry: &str) -> Result<Self, ShopError> {
        let mut fields = entry.split(':');
        let text = fields.next().unwrap_or_default();
        let price = fields.next().ok_or_else(|| {
            ShopError::Config(format!("tag entry {id} ({entry:?}) has no price"))
        })?;
        let price = price.trim().parse::<u64>().map_err(|e| {
            ShopError::Config(format!("tag entry {id} ({entry:?}) has an invalid price: {e}"))
        })?;

        Ok(Self {
            id,
            display_text: normalize_display_text(text),
            price: Coins::new(price),
        })
    }
}

fn normalize_display_text(text: &str) -> String {
    let mut normalized: String = text
        .chars()
        .map(|c| if c == ALT_FORMAT_ESCAPE { FORMAT_MARKER } else { c })
        .collect();
    normalized.push(FORMAT_MARKER);
    normalized.push('r');
    normalized
}

/// Ordered, immutable list of purchasable tags.
///
/// Ids are indices into the source order, so an id outside the list is simply
/// "not found" and never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    tags: Vec<TagDefinition>,
}

impl Catalog {
    pub fn parse<I, S>(entries: I) -> Result<Self, ShopError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let id = u32::try_from(index)
                    .map(TagId)
                    .map_err(|_| ShopError::Config("too many tags in catalog".to_string()))?;
                TagDefinition::parse(id, entry.as_ref())
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { tags })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn all_tags(&self) -> &[TagDefinition] {
        &self.tags
    }

    pub fn get(&self, id: TagId) -> Option<&TagDefinition> {
        self.tags.get(id.index())
    }

    pub fn exists(&self, id: TagId) -> bool {
        self.get(id).is_some()
    }

    pub fn price(&self, id: TagId) -> Option<Coins> {
        self.get(id).map(|tag| tag.price)
    }

    pub fn name(&self, id: TagId) -> Option<&str> {
        self.get(id).map(|tag| tag.display_text.as_str())
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
