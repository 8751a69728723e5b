use crate::domain::ownership::{Identity, OwnershipRecord};
use crate::domain::ports::OwnershipStore;
use crate::domain::tag::TagId;
use crate::error::{AdapterError, AdapterResult};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family holding one ownership row per identity.
pub const CF_OWNERSHIP: &str = "ownership";

/// A persistent ownership store backed by RocksDB.
///
/// Rows are keyed by the case-folded identity and stored as JSON
/// `{"identity": .., "tag_id": ..}`. Selling a tag deletes the row.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbOwnershipStore {
    db: Arc<DB>,
}

impl RocksDbOwnershipStore {
    /// Opens or creates a RocksDB instance at `path`, creating the ownership
    /// column family when missing.
    pub fn open<P: AsRef<Path>>(path: P) -> AdapterResult<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_ownership = ColumnFamilyDescriptor::new(CF_OWNERSHIP, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_ownership])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn ownership_cf(&self) -> AdapterResult<&ColumnFamily> {
        self.db
            .cf_handle(CF_OWNERSHIP)
            .ok_or_else(|| AdapterError::Store("ownership column family not found".to_string()))
    }

    fn decode(bytes: &[u8]) -> AdapterResult<OwnershipRecord> {
        serde_json::from_slice(bytes).map_err(|e| {
            AdapterError::UnexpectedShape(format!("undecodable ownership row: {e}"))
        })
    }
}

#[async_trait]
impl OwnershipStore for RocksDbOwnershipStore {
    async fn get_tag(&self, identity: &Identity) -> AdapterResult<Option<TagId>> {
        let cf = self.ownership_cf()?;
        match self.db.get_cf(cf, identity.key().as_bytes())? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?.tag_id)),
            None => Ok(None),
        }
    }

    async fn set_tag(&self, identity: &Identity, tag_id: TagId) -> AdapterResult<()> {
        let cf = self.ownership_cf()?;
        let value = serde_json::to_vec(&OwnershipRecord::new(identity, tag_id))
            .map_err(|e| AdapterError::Internal(Box::new(e)))?;
        self.db.put_cf(cf, identity.key().as_bytes(), value)?;
        Ok(())
    }

    async fn clear_tag(&self, identity: &Identity) -> AdapterResult<()> {
        let cf = self.ownership_cf()?;
        self.db.delete_cf(cf, identity.key().as_bytes())?;
        Ok(())
    }

    async fn all_records(&self) -> AdapterResult<Vec<OwnershipRecord>> {
        let cf = self.ownership_cf()?;
        let mut records = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            records.push(Self::decode(&value)?);
        }
        Ok(records)
    }
}
