//! In-memory slotted record heap.
//!
//! Records are fixed-size byte images stored in pages of `slots_per_page`
//! slots. A deleted slot stays empty; new records always append, so a rid is
//! never reused.

use shoal_core::{Error, Result, Rid};

/// Nominal page size used to derive the slot count.
pub const PAGE_SIZE: usize = 8192;

#[derive(Debug)]
pub struct RecordHeap {
    record_size: usize,
    slots_per_page: usize,
    pages: Vec<Vec<Option<Vec<u8>>>>,
    live: usize,
}

impl RecordHeap {
    pub fn new(record_size: usize) -> Self {
        Self {
            record_size,
            slots_per_page: (PAGE_SIZE / record_size.max(1)).max(1),
            pages: Vec::new(),
            live: 0,
        }
    }

    #[inline]
    pub fn record_size(&self) -> usize {
        self.record_size
    }

    /// Number of live records.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn insert(&mut self, data: Vec<u8>) -> Result<Rid> {
        if data.len() != self.record_size {
            return Err(Error::invalid_argument(format!(
                "record of {} bytes does not match record size {}",
                data.len(),
                self.record_size
            )));
        }
        let full = self.pages.last().map_or(true, |p| p.len() >= self.slots_per_page);
        if full {
            self.pages.push(Vec::with_capacity(self.slots_per_page));
        }
        let page_num = self.pages.len() - 1;
        let page = &mut self.pages[page_num];
        page.push(Some(data));
        self.live += 1;
        Ok(Rid::new(page_num as u32, (page.len() - 1) as u32))
    }

    pub fn get(&self, rid: Rid) -> Option<&[u8]> {
        self.pages
            .get(rid.page_num as usize)?
            .get(rid.slot_num as usize)?
            .as_deref()
    }

    pub fn get_mut(&mut self, rid: Rid) -> Option<&mut Vec<u8>> {
        self.pages
            .get_mut(rid.page_num as usize)?
            .get_mut(rid.slot_num as usize)?
            .as_mut()
    }

    pub fn delete(&mut self, rid: Rid) -> Result<Vec<u8>> {
        let slot = self
            .pages
            .get_mut(rid.page_num as usize)
            .and_then(|p| p.get_mut(rid.slot_num as usize))
            .and_then(Option::take)
            .ok_or_else(|| Error::not_found(format!("record {rid}")))?;
        self.live -= 1;
        Ok(slot)
    }

    /// Rids of every live record in physical order.
    pub fn rids(&self) -> Vec<Rid> {
        let mut out = Vec::with_capacity(self.live);
        for (page_num, page) in self.pages.iter().enumerate() {
            for (slot_num, slot) in page.iter().enumerate() {
                if slot.is_some() {
                    out.push(Rid::new(page_num as u32, slot_num as u32));
                }
            }
        }
        out
    }
}
