//! Physical record identifiers and buffers.

use std::fmt;

/// Physical record identifier: page and slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rid {
    pub page_num: u32,
    pub slot_num: u32,
}

impl Rid {
    #[inline]
    pub fn new(page_num: u32, slot_num: u32) -> Self {
        Self { page_num, slot_num }
    }
}

impl fmt::Display for Rid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.page_num, self.slot_num)
    }
}

/// A record image together with its location.
///
/// The storage layer owns the authoritative bytes; scanners copy them into a
/// caller-owned `Record` that stays valid until the next call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    rid: Rid,
    data: Vec<u8>,
}

impl Record {
    pub fn new(rid: Rid, data: Vec<u8>) -> Self {
        Self { rid, data }
    }

    #[inline]
    pub fn rid(&self) -> Rid {
        self.rid
    }

    #[inline]
    pub fn set_rid(&mut self, rid: Rid) {
        self.rid = rid;
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Replaces this record's image with `other`'s, reusing the allocation.
    pub fn copy_from(&mut self, other: &Record) {
        self.rid = other.rid;
        self.copy_data_from(&other.data);
    }

    /// Replaces the bytes of this record, keeping its rid.
    pub fn copy_data_from(&mut self, data: &[u8]) {
        self.data.clear();
        self.data.extend_from_slice(data);
    }

    /// Consumes the record, returning its bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}
