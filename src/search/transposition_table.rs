//! Fixed-capacity transposition table keyed by the board's Zobrist hash.
//!
//! A position maps to its home slot (`hash % capacity`) and may live in any of
//! the next `EXTRA_PROBES` slots, wrapping around. Deeper results replace
//! shallower ones; shallower results never replace deeper ones.

use crate::game_state::board::Board;

/// Slots probed after the home slot.
pub const EXTRA_PROBES: usize = 3;

pub const DEFAULT_CAPACITY: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// The true value is at least the stored one (a beta cutoff happened).
    Lower,
    /// The true value is at most the stored one (nothing beat alpha).
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranspositionEntry {
    pub key: u32,
    pub bound: Bound,
    pub depth: u8,
    pub value: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TTStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    entries: Vec<Option<TranspositionEntry>>,
    occupied: usize,
    stats: TTStats,
}

impl TranspositionTable {
    /// # Panics
    /// Panics when `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "transposition table needs at least one slot");
        Self {
            entries: vec![None; capacity],
            occupied: 0,
            stats: TTStats::default(),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn stats(&self) -> TTStats {
        self.stats
    }

    /// Number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.occupied
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Empty every slot, keeping the allocation.
    pub fn clear(&mut self) {
        self.entries.fill(None);
        self.occupied = 0;
        self.stats = TTStats::default();
    }

    #[inline]
    fn slots(&self, key: u32) -> impl Iterator<Item = usize> {
        let capacity = self.entries.len();
        let home = key as usize % capacity;
        (0..=EXTRA_PROBES.min(capacity - 1)).map(move |offset| (home + offset) % capacity)
    }

    /// Store the search result `value` for `board` searched `depth` plies deep
    /// inside the window `[alpha, beta]`.
    pub fn put(&mut self, board: &Board, depth: u8, alpha: i32, beta: i32, value: i32) {
        let key = board.hash();
        let slot = self
            .slots(key)
            .find(|&idx| match self.entries[idx] {
                None => true,
                Some(entry) => entry.key == key,
            })
            .unwrap_or(key as usize % self.entries.len());

        match self.entries[slot] {
            Some(existing) if depth < existing.depth => return,
            Some(_) => {}
            None => self.occupied += 1,
        }

        let bound = if depth == 0 {
            Bound::Exact
        } else if value > beta {
            Bound::Lower
        } else if value < alpha {
            Bound::Upper
        } else {
            Bound::Exact
        };

        self.entries[slot] = Some(TranspositionEntry {
            key,
            bound,
            depth,
            value,
        });
        self.stats.stores += 1;
    }

    /// Cached value for `board` when an entry at least `depth` plies deep
    /// exists and its bound is usable for `[alpha, beta]`.
    pub fn get(&mut self, board: &Board, depth: u8, alpha: i32, beta: i32) -> Option<i32> {
        self.stats.probes += 1;
        let entry = self.entry(board)?;
        if entry.depth < depth {
            return None;
        }

        let usable = match entry.bound {
            Bound::Exact => true,
            Bound::Upper => entry.value <= alpha,
            Bound::Lower => entry.value >= beta,
        };
        if usable {
            self.stats.hits += 1;
            Some(entry.value)
        } else {
            None
        }
    }

    /// The raw entry stored for `board`, regardless of depth or bound.
    pub fn entry(&self, board: &Board) -> Option<TranspositionEntry> {
        let key = board.hash();
        self.slots(key)
            .filter_map(|idx| self.entries[idx])
            .find(|entry| entry.key == key)
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
