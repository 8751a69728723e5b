use crate::domain::tag::TagId;
use crate::error::{Result, ShopError};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum RequestAction {
    Buy,
    Sell,
}

/// One row of a request file: `action, identity, tag`.
///
/// `tag` is required for `buy` and ignored for `sell`.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct ShopRequest {
    pub action: RequestAction,
    pub identity: String,
    pub tag: Option<TagId>,
}

/// Reads shop requests from a CSV source.
///
/// Wraps `csv::Reader`, trimming whitespace and tolerating a missing trailing
/// `tag` column on `sell` rows.
pub struct RequestReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> RequestReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes requests; a bad row yields an error and the
    /// iterator moves on to the next one.
    pub fn requests(self) -> impl Iterator<Item = Result<ShopRequest>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(ShopError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_valid_stream() {
        let data = "action, identity, tag\nbuy, Alice, 0\nsell, Alice,\nsell, bob";
        let reader = RequestReader::new(data.as_bytes());
        let results: Vec<Result<ShopRequest>> = reader.requests().collect();

        assert_eq!(results.len(), 3);
        let buy = results[0].as_ref().unwrap();
        assert_eq!(buy.action, RequestAction::Buy);
        assert_eq!(buy.identity, "Alice");
        assert_eq!(buy.tag, Some(TagId(0)));

        assert_eq!(results[1].as_ref().unwrap().tag, None);
        assert_eq!(results[2].as_ref().unwrap().action, RequestAction::Sell);
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = "action, identity, tag\ngift, alice, 1\nbuy, alice, minus-one";
        let reader = RequestReader::new(data.as_bytes());
        let results: Vec<Result<ShopRequest>> = reader.requests().collect();

        assert!(results[0].is_err());
        assert!(results[1].is_err());
    }
}
