use crate::domain::tag::TagId;
use crate::error::Result;
use std::collections::BTreeMap;
use std::io::Write;

/// Writes the ownership export as `identity,tag_id` rows.
pub struct OwnershipWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> OwnershipWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_all(&mut self, data: &BTreeMap<String, TagId>) -> Result<()> {
        self.writer.write_record(["identity", "tag_id"])?;
        for (identity, tag_id) in data {
            self.writer
                .write_record([identity.as_str(), tag_id.to_string().as_str()])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
