//! Transaction capability.
//!
//! A `Trx` carries an id and an access mode. Operators pass it unchanged down
//! the tree; the storage layer uses it to decide which records a scan may see
//! and to stamp newly inserted records.

use shoal_core::{Error, Result};
use std::sync::atomic::{AtomicU64, Ordering};

/// Global transaction id counter. Id 0 is reserved for "no transaction".
static NEXT_TRX_ID: AtomicU64 = AtomicU64::new(1);

pub type TrxId = u64;

/// Access mode of a transaction or a record scanner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReadWriteMode {
    ReadOnly,
    #[default]
    ReadWrite,
}

#[derive(Clone, Debug)]
pub struct Trx {
    id: TrxId,
    mode: ReadWriteMode,
}

impl Trx {
    /// Starts a read-write transaction.
    pub fn begin() -> Self {
        Self::begin_with(ReadWriteMode::ReadWrite)
    }

    pub fn begin_with(mode: ReadWriteMode) -> Self {
        let id = NEXT_TRX_ID.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(trx = id, ?mode, "transaction started");
        Self { id, mode }
    }

    #[inline]
    pub fn id(&self) -> TrxId {
        self.id
    }

    #[inline]
    pub fn mode(&self) -> ReadWriteMode {
        self.mode
    }

    /// Record version stamp for this transaction. Fails once the id no longer
    /// fits the 4-byte stamp columns.
    pub fn xid(&self) -> Result<i32> {
        i32::try_from(self.id).map_err(|_| {
            Error::internal(format!(
                "transaction id {} exceeds record stamp range",
                self.id
            ))
        })
    }

    /// Visibility of a record version created by `begin` and ended by `end`
    /// (0 while the version is live).
    pub fn is_visible(&self, begin: i32, end: i32) -> Result<bool> {
        let id = self.xid()?;
        Ok(begin != 0 && begin <= id && (end == 0 || end > id))
    }

    /// Checks that a scanner or write in `mode` is allowed.
    pub fn check_mode(&self, mode: ReadWriteMode) -> Result<()> {
        if mode == ReadWriteMode::ReadWrite && self.mode == ReadWriteMode::ReadOnly {
            return Err(Error::invalid_argument(format!(
                "transaction {} is read-only",
                self.id
            )));
        }
        Ok(())
    }
}
