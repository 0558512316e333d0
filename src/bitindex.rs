/// Number of slots covered by one bit word.
pub const BLOCK_BITS: u32 = 64;

/// Per-type, per-group presence index: one bit per entity slot, packed into
/// 64-slot blocks, plus a block-level running count of all set bits strictly
/// before each block.
///
/// The prefix cache turns "dense offset of slot s" into one array read plus
/// one popcount, and keeps insert/remove at O(blocks) instead of O(slots):
/// setting or clearing a bit only sweeps the prefix entries after its block.
///
/// Invariant, maintained after every mutation:
/// `prefix[0] == 0` and `prefix[k] == prefix[k-1] + popcount(bits[k-1])`.
pub struct BitIndex {
    bits: Vec<u64>,
    prefix: Vec<u32>,
}

impl BitIndex {
    pub fn new() -> Self {
        BitIndex {
            bits: Vec::new(),
            prefix: Vec::new(),
        }
    }

    /// Appends one empty block.
    ///
    /// The new prefix entry is the total set-bit count so far, which is
    /// exactly what the invariant requires for a block whose predecessors
    /// may already hold bits. All stores of a group call this in lockstep,
    /// so block indices stay aligned across component types.
    pub fn grow(&mut self) {
        let total = self.count() as u32;
        self.bits.push(0);
        self.prefix.push(total);
    }

    /// Pre-extends capacity to cover `slots` without changing the block
    /// count. Growth itself stays driven by the group's high-water mark.
    pub fn reserve(&mut self, slots: u32) {
        let blocks = slots.div_ceil(BLOCK_BITS) as usize;
        let current = self.bits.len();
        if blocks > current {
            self.bits.reserve(blocks - current);
            self.prefix.reserve(blocks - current);
        }
    }

    pub fn block_count(&self) -> usize {
        self.bits.len()
    }

    /// Total number of set bits.
    pub fn count(&self) -> usize {
        match (self.prefix.last(), self.bits.last()) {
            (Some(&p), Some(&w)) => p as usize + w.count_ones() as usize,
            _ => 0,
        }
    }

    /// Returns whether `slot` is set. Slots beyond the grown range read as
    /// unset.
    pub fn test(&self, slot: u16) -> bool {
        let block = (slot / BLOCK_BITS as u16) as usize;

        match self.bits.get(block) {
            Some(&word) => (word >> (slot % BLOCK_BITS as u16)) & 1 != 0,
            None => false,
        }
    }

    /// Dense offset of a set slot: the number of set bits strictly before it.
    pub fn offset_of(&self, slot: u16) -> usize {
        debug_assert!(self.test(slot), "slot {} is not set", slot);

        let block = (slot / BLOCK_BITS as u16) as usize;
        let bit = (slot % BLOCK_BITS as u16) as u32;
        let below = self.bits[block] & ((1u64 << bit) - 1);

        self.prefix[block] as usize + below.count_ones() as usize
    }

    /// Sets the bit for `slot` and returns the dense offset the new element
    /// takes. Every prefix entry after the slot's block is incremented.
    pub fn set_bit(&mut self, slot: u16) -> usize {
        let block = (slot / BLOCK_BITS as u16) as usize;
        let bit = (slot % BLOCK_BITS as u16) as u32;

        assert!(
            block < self.bits.len(),
            "slot {} is beyond the grown index ({} blocks)",
            slot,
            self.bits.len()
        );

        let word = self.bits[block];
        assert!((word >> bit) & 1 == 0, "slot {} already set", slot);

        let offset =
            self.prefix[block] as usize + (word & ((1u64 << bit) - 1)).count_ones() as usize;

        self.bits[block] = word | (1 << bit);

        for count in &mut self.prefix[block + 1..] {
            *count += 1;
        }

        offset
    }

    /// Clears the bit for `slot` and returns the dense offset the removed
    /// element occupied. Symmetric to `set_bit`: later prefix entries are
    /// decremented.
    pub fn clear_bit(&mut self, slot: u16) -> usize {
        let block = (slot / BLOCK_BITS as u16) as usize;
        let bit = (slot % BLOCK_BITS as u16) as u32;

        assert!(
            block < self.bits.len(),
            "slot {} is beyond the grown index ({} blocks)",
            slot,
            self.bits.len()
        );

        let word = self.bits[block];
        assert!((word >> bit) & 1 != 0, "slot {} is not set", slot);

        let offset =
            self.prefix[block] as usize + (word & ((1u64 << bit) - 1)).count_ones() as usize;

        self.bits[block] = word & !(1 << bit);

        for count in &mut self.prefix[block + 1..] {
            *count -= 1;
        }

        offset
    }

    /// Raw bit word of one block. The iteration engine walks these directly.
    pub fn word(&self, block: usize) -> u64 {
        self.bits[block]
    }

    pub fn words(&self) -> &[u64] {
        &self.bits
    }

    pub(crate) fn prefix(&self) -> &[u32] {
        &self.prefix
    }
}

impl Default for BitIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "bitindex.tests.rs"]
mod tests;
