//! Block synchronisation and group framing.
//!
//! RDS protects each 16-bit information word with a 10-bit checkword, offset
//! by one of five offset words (A, B, C, C', D) that also label the block's
//! position within a group. The framer slides a 26-bit window over the bit
//! stream, identifies blocks by their syndrome, locks onto the block rhythm,
//! and assembles groups of four blocks.
//!
//! Synchronisation follows EN 50067 annex C: acquisition requires three
//! valid blocks in the correct cyclic rhythm, and sync is dropped when too
//! many of the last 50 blocks fail their syndrome check. While synced,
//! short burst errors are repaired with a precomputed syndrome lookup.

use std::sync::OnceLock;

use tracing::{debug, trace};

use crate::bits::BitSource;
use crate::error::Result;
use crate::groups::Group;

const BLOCK_LENGTH: u32 = 26;
const WORD_MASK: u32 = 0x03FF_FFFF;

/// Offset words d9..d0 (EN 50067 annex A, table A.1), indexed by [`Offset`].
const OFFSET_WORDS: [u32; 5] = [
    0b0011111100, // A
    0b0110011000, // B
    0b0101101000, // C
    0b1101010000, // C'
    0b0110110100, // D
];

/// Expected syndromes for error-free blocks.
const SYNDROME_A: u16 = 0b1111011000;
const SYNDROME_B: u16 = 0b1111010100;
const SYNDROME_C: u16 = 0b1001011100;
const SYNDROME_C_PRIME: u16 = 0b1111001100;
const SYNDROME_D: u16 = 0b1001011000;

/// Sync is dropped when more than this many of the last 50 blocks failed.
const MAX_ERRORS_OVER_50: usize = 42;

/// Parity check matrix for syndrome calculation (EN 50067 annex B). Rows are
/// 10-bit values; the syndrome is the modulo-two sum of the rows selected by
/// the set bits of the received word.
const PARITY_CHECK_MATRIX: [u16; 26] = [
    0b1000000000, // bit 25
    0b0100000000,
    0b0010000000,
    0b0001000000,
    0b0000100000,
    0b0000010000,
    0b0000001000,
    0b0000000100,
    0b0000000010,
    0b0000000001, // bit 16
    0b1011011100, // bit 15
    0b0101101110,
    0b0010110111,
    0b1010000111,
    0b1110011111,
    0b1100010011,
    0b1101010101,
    0b1101110110,
    0b0110111011,
    0b1000000001, // bit 6
    0b1111011100, // bit 5
    0b0111101110,
    0b0011110111,
    0b1010100111,
    0b1110001111,
    0b1100011011, // bit 0
];

/// Block position label within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offset {
    A,
    B,
    C,
    CPrime,
    D,
}

impl Offset {
    /// Index of the block this offset labels.
    fn block_index(self) -> usize {
        match self {
            Offset::A => 0,
            Offset::B => 1,
            Offset::C | Offset::CPrime => 2,
            Offset::D => 3,
        }
    }

    /// The offset expected to follow this one in the group cycle.
    fn next(self) -> Offset {
        match self {
            Offset::A => Offset::B,
            Offset::B => Offset::C,
            Offset::C | Offset::CPrime => Offset::D,
            Offset::D => Offset::A,
        }
    }
}

/// Syndrome of a 26-bit block, MSB transmitted first.
fn syndrome(word26: u32) -> u16 {
    let mut result = 0u16;
    for (k, &row) in PARITY_CHECK_MATRIX.iter().enumerate() {
        if (word26 >> (25 - k)) & 1 != 0 {
            result ^= row;
        }
    }
    result
}

fn offset_for_syndrome(s: u16) -> Option<Offset> {
    match s {
        SYNDROME_A => Some(Offset::A),
        SYNDROME_B => Some(Offset::B),
        SYNDROME_C => Some(Offset::C),
        SYNDROME_C_PRIME => Some(Offset::CPrime),
        SYNDROME_D => Some(Offset::D),
        _ => None,
    }
}

/// Information word: the upper 16 bits of the protected block.
fn data_word(word26: u32) -> u16 {
    ((word26 >> 10) & 0xFFFF) as u16
}

/// Lookup from syndrome to correctable error pattern, one table per offset.
/// Covers 1- and 2-bit burst errors at every position.
struct ErrorLookup {
    tables: [Vec<(u16, u32)>; 5],
}

impl ErrorLookup {
    fn build() -> Self {
        let mut tables: [Vec<(u16, u32)>; 5] = Default::default();
        for (idx, &offset_word) in OFFSET_WORDS.iter().enumerate() {
            for &burst in &[0b1u32, 0b11u32] {
                for shift in 0..BLOCK_LENGTH {
                    let error = (burst << shift) & WORD_MASK;
                    tables[idx].push((syndrome(error ^ offset_word), error));
                }
            }
        }
        ErrorLookup { tables }
    }

    /// Try to repair `raw` assuming it should carry `expected`'s offset word.
    fn try_correct(&self, raw: u32, expected: Offset) -> Option<u32> {
        let s = syndrome(raw);
        self.tables[expected as usize]
            .iter()
            .find(|&&(synd, _)| synd == s)
            .map(|&(_, error)| raw ^ error)
    }
}

fn error_lookup() -> &'static ErrorLookup {
    static LOOKUP: OnceLock<ErrorLookup> = OnceLock::new();
    LOOKUP.get_or_init(ErrorLookup::build)
}

/// Sliding count of block errors over the last `N` blocks.
#[derive(Debug, Clone)]
struct ErrorWindow<const N: usize> {
    slots: [bool; N],
    pos: usize,
    sum: usize,
}

impl<const N: usize> ErrorWindow<N> {
    fn new() -> Self {
        ErrorWindow {
            slots: [false; N],
            pos: 0,
            sum: 0,
        }
    }

    fn push(&mut self, error: bool) {
        if self.slots[self.pos] {
            self.sum -= 1;
        }
        self.slots[self.pos] = error;
        if error {
            self.sum += 1;
        }
        self.pos = (self.pos + 1) % N;
    }

    fn sum(&self) -> usize {
        self.sum
    }

    fn clear(&mut self) {
        self.slots = [false; N];
        self.pos = 0;
        self.sum = 0;
    }
}

/// A valid block seen while hunting for sync.
#[derive(Debug, Clone, Copy, Default)]
struct SyncPulse {
    offset: Option<Offset>,
    bit_position: u32,
}

impl SyncPulse {
    /// Whether this pulse could plausibly follow `other` in the block
    /// rhythm: a whole number of blocks apart (at most six, allowing missed
    /// blocks) with the offsets in cyclic order.
    fn could_follow(&self, other: &SyncPulse) -> bool {
        let (Some(this), Some(prev)) = (self.offset, other.offset) else {
            return false;
        };
        let distance = self.bit_position.wrapping_sub(other.bit_position);
        if distance % BLOCK_LENGTH != 0 {
            return false;
        }
        let blocks_apart = distance / BLOCK_LENGTH;
        if blocks_apart == 0 || blocks_apart > 6 {
            return false;
        }
        (prev.block_index() as u32 + blocks_apart) % 4 == this.block_index() as u32
    }
}

/// The last four valid blocks seen while unsynced.
#[derive(Debug, Clone, Default)]
struct SyncPulseBuffer {
    pulses: [SyncPulse; 4],
}

impl SyncPulseBuffer {
    fn push(&mut self, offset: Offset, bit_position: u32) {
        self.pulses.rotate_left(1);
        self.pulses[3] = SyncPulse {
            offset: Some(offset),
            bit_position,
        };
    }

    /// Look for three pulses in the correct rhythm, not necessarily
    /// consecutive.
    fn sequence_found(&self) -> bool {
        let third = &self.pulses[3];
        for first in 0..2 {
            for second in (first + 1)..3 {
                if third.could_follow(&self.pulses[second])
                    && self.pulses[second].could_follow(&self.pulses[first])
                {
                    return true;
                }
            }
        }
        false
    }

    fn clear(&mut self) {
        self.pulses = [SyncPulse::default(); 4];
    }
}

/// Assembles the raw bit stream into [`Group`]s.
pub struct GroupFramer {
    shift: u32,
    shift_len: u32,
    bitcount: u32,
    synced: bool,
    expected: Offset,
    bits_until_boundary: u32,
    current: [Option<u16>; 4],
    errors: ErrorWindow<50>,
    pulses: SyncPulseBuffer,
}

impl GroupFramer {
    pub fn new() -> Self {
        GroupFramer {
            shift: 0,
            shift_len: 0,
            bitcount: 0,
            synced: false,
            expected: Offset::A,
            bits_until_boundary: BLOCK_LENGTH,
            current: [None; 4],
            errors: ErrorWindow::new(),
            pulses: SyncPulseBuffer::default(),
        }
    }

    pub fn is_synced(&self) -> bool {
        self.synced
    }

    /// Pull bits from `source` until a group completes or the source ends.
    pub fn next_group<S: BitSource>(&mut self, source: &mut S) -> Result<Option<Group>> {
        loop {
            if source.is_eof() {
                return Ok(None);
            }
            let bit = source.next_bit()?;
            if let Some(group) = self.push_bit(bit) {
                return Ok(Some(group));
            }
        }
    }

    /// Feed one bit; returns a group when the fourth block of one has just
    /// been processed.
    pub fn push_bit(&mut self, bit: bool) -> Option<Group> {
        self.shift = ((self.shift << 1) & WORD_MASK) | u32::from(bit);
        self.bitcount = self.bitcount.wrapping_add(1);
        if self.shift_len < BLOCK_LENGTH {
            self.shift_len += 1;
            if self.shift_len < BLOCK_LENGTH {
                return None;
            }
        }

        if self.synced {
            self.bits_until_boundary -= 1;
            if self.bits_until_boundary == 0 {
                self.bits_until_boundary = BLOCK_LENGTH;
                return self.block_boundary();
            }
            None
        } else {
            self.acquire()
        }
    }

    /// Unsynced: test every bit position for a valid block and lock on when
    /// three blocks line up in rhythm.
    fn acquire(&mut self) -> Option<Group> {
        let offset = offset_for_syndrome(syndrome(self.shift))?;
        self.pulses.push(offset, self.bitcount);
        if !self.pulses.sequence_found() {
            return None;
        }

        self.synced = true;
        self.bits_until_boundary = BLOCK_LENGTH;
        self.errors.clear();
        self.expected = offset.next();
        self.current[offset.block_index()] = Some(data_word(self.shift));
        debug!(?offset, "block sync acquired");

        if offset == Offset::D {
            self.finish_group()
        } else {
            None
        }
    }

    /// Synced: the shift register holds a full block aligned to the
    /// boundary. Validate it, attempt repair, and advance the cycle.
    fn block_boundary(&mut self) -> Option<Group> {
        let detected = offset_for_syndrome(syndrome(self.shift));
        let matches = match detected {
            Some(offset) => {
                offset == self.expected
                    || (self.expected == Offset::C && offset == Offset::CPrime)
            }
            None => false,
        };

        self.errors.push(!matches);
        if self.errors.sum() > MAX_ERRORS_OVER_50 {
            debug!(errors = self.errors.sum(), "block sync lost");
            self.synced = false;
            self.errors.clear();
            self.pulses.clear();
            self.current = [None; 4];
            return None;
        }

        let index = self.expected.block_index();
        if matches {
            self.current[index] = Some(data_word(self.shift));
        } else if let Some(repaired) = error_lookup().try_correct(self.shift, self.expected) {
            // Accept the repair only if it lands on the expected offset.
            let repaired_offset = offset_for_syndrome(syndrome(repaired));
            let valid = repaired_offset == Some(self.expected)
                || (self.expected == Offset::C && repaired_offset == Some(Offset::CPrime));
            if valid {
                trace!(
                    expected = ?self.expected,
                    raw = format_args!("0x{:07x}", self.shift),
                    repaired = format_args!("0x{:07x}", repaired),
                    "burst error corrected"
                );
                self.current[index] = Some(data_word(repaired));
            } else {
                self.current[index] = None;
            }
        } else {
            self.current[index] = None;
        }

        let completed = self.expected == Offset::D;
        self.expected = self.expected.next();
        if completed {
            self.finish_group()
        } else {
            None
        }
    }

    /// Close out the current group. Block 1 and block 2 are required; the
    /// delivered block count is the length of the valid prefix, and blocks
    /// past it are zeroed.
    fn finish_group(&mut self) -> Option<Group> {
        let current = std::mem::take(&mut self.current);
        let (Some(block1), Some(block2)) = (current[0], current[1]) else {
            return None;
        };

        let mut num_blocks: u8 = 2;
        if current[2].is_some() {
            num_blocks = 3;
            if current[3].is_some() {
                num_blocks = 4;
            }
        }
        if num_blocks < 4 {
            trace!(num_blocks, "partial group");
        }

        Some(Group::new(
            [
                block1,
                block2,
                current[2].unwrap_or(0),
                current[3].unwrap_or(0),
            ],
            num_blocks,
        ))
    }
}

impl Default for GroupFramer {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
#[path = "framer_tests.rs"]
mod tests;
