//! Bit vectors over borrowed bytes, used for record NULL bitmaps.

/// Read-only bit view over a byte slice.
#[derive(Clone, Copy, Debug)]
pub struct Bitmap<'a> {
    bits: &'a [u8],
}

impl<'a> Bitmap<'a> {
    pub fn new(bits: &'a [u8]) -> Self {
        Self { bits }
    }

    /// Returns bit `index`; bits past the end read as clear.
    #[inline]
    pub fn get_bit(&self, index: usize) -> bool {
        self.bits
            .get(index / 8)
            .map(|byte| byte & (1 << (index % 8)) != 0)
            .unwrap_or(false)
    }
}

/// Mutable bit view over a byte slice.
#[derive(Debug)]
pub struct BitmapMut<'a> {
    bits: &'a mut [u8],
}

impl<'a> BitmapMut<'a> {
    pub fn new(bits: &'a mut [u8]) -> Self {
        Self { bits }
    }

    #[inline]
    pub fn get_bit(&self, index: usize) -> bool {
        Bitmap::new(self.bits).get_bit(index)
    }

    #[inline]
    pub fn set_bit(&mut self, index: usize) {
        if let Some(byte) = self.bits.get_mut(index / 8) {
            *byte |= 1 << (index % 8);
        }
    }

    #[inline]
    pub fn clear_bit(&mut self, index: usize) {
        if let Some(byte) = self.bits.get_mut(index / 8) {
            *byte &= !(1 << (index % 8));
        }
    }

    /// Sets or clears bit `index`.
    #[inline]
    pub fn assign(&mut self, index: usize, value: bool) {
        if value {
            self.set_bit(index)
        } else {
            self.clear_bit(index)
        }
    }
}
