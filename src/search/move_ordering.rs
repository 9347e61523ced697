//! Move ordering for the search.
//!
//! Every sorter shares the same base priority: captures first (most valuable
//! victim, then least valuable attacker), then quiet moves by the value of the
//! moving piece. Stateful sorters add a flat bonus for moves they have seen
//! cause cutoffs and expose that through the `CutoffRecorder` capability.

use std::cmp::Reverse;

use crate::moves::chess_move::Move;

pub const CAPTURE_BASE: i32 = 20_000;

/// Bonus for moves a stateful sorter has recorded.
pub const RECORDED_MOVE_BONUS: i32 = 50_000;

pub const KILLER_SLOTS: usize = 5;

/// Capability of sorters that learn from beta cutoffs.
pub trait CutoffRecorder {
    fn record_cutoff(&mut self, mv: Move);
}

pub trait MoveSorter: Send {
    fn priority(&self, mv: Move) -> i32;

    /// Sort `moves` by descending priority; equal priorities keep their
    /// generation order.
    fn sort(&self, moves: &mut [Move]) {
        moves.sort_by_key(|mv| Reverse(self.priority(*mv)));
    }

    /// Forget everything learned so far.
    fn clear(&mut self) {}

    fn cutoff_recorder(&mut self) -> Option<&mut dyn CutoffRecorder> {
        None
    }

    fn name(&self) -> &'static str;
}

/// MVV-LVA for captures, piece value for quiet moves.
#[inline]
pub fn base_priority(mv: Move) -> i32 {
    match mv.captured {
        Some(victim) => CAPTURE_BASE + victim.value() * 10 - mv.piece.value() / 10,
        None => mv.piece.value(),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSorter;

impl MoveSorter for StaticSorter {
    fn priority(&self, mv: Move) -> i32 {
        base_priority(mv)
    }

    fn name(&self) -> &'static str {
        "Static"
    }
}

/// From/to counters bumped on every recorded move.
#[derive(Debug, Clone)]
pub struct HistorySorter {
    counters: Box<[[u32; 64]; 64]>,
}

impl HistorySorter {
    pub fn new() -> Self {
        Self {
            counters: Box::new([[0; 64]; 64]),
        }
    }

    pub fn put(&mut self, mv: Move) {
        let entry = &mut self.counters[mv.from.index()][mv.to.index()];
        *entry = entry.saturating_add(1);
    }

    pub fn count(&self, mv: Move) -> u32 {
        self.counters[mv.from.index()][mv.to.index()]
    }
}

impl Default for HistorySorter {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveSorter for HistorySorter {
    fn priority(&self, mv: Move) -> i32 {
        let count = self.count(mv);
        if count == 0 {
            base_priority(mv)
        } else {
            // Counts only separate moves within the same bonus band.
            let tiebreak = count.min(RECORDED_MOVE_BONUS as u32 / 10) as i32;
            base_priority(mv) + RECORDED_MOVE_BONUS + tiebreak
        }
    }

    fn clear(&mut self) {
        self.counters.iter_mut().for_each(|row| row.fill(0));
    }

    fn cutoff_recorder(&mut self) -> Option<&mut dyn CutoffRecorder> {
        Some(self)
    }

    fn name(&self) -> &'static str {
        "History"
    }
}

impl CutoffRecorder for HistorySorter {
    fn record_cutoff(&mut self, mv: Move) {
        self.put(mv);
    }
}

/// Ring buffer of the most recent cutoff moves.
#[derive(Debug, Clone, Default)]
pub struct KillerSorter {
    slots: [Option<Move>; KILLER_SLOTS],
    next: usize,
}

impl KillerSorter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `mv`, overwriting the oldest slot. A move already held is not
    /// stored twice.
    pub fn put(&mut self, mv: Move) {
        if self.contains(mv) {
            return;
        }
        self.slots[self.next] = Some(mv);
        self.next = (self.next + 1) % KILLER_SLOTS;
    }

    pub fn contains(&self, mv: Move) -> bool {
        self.slots.contains(&Some(mv))
    }
}

impl MoveSorter for KillerSorter {
    fn priority(&self, mv: Move) -> i32 {
        if self.contains(mv) {
            base_priority(mv) + RECORDED_MOVE_BONUS
        } else {
            base_priority(mv)
        }
    }

    fn clear(&mut self) {
        self.slots = [None; KILLER_SLOTS];
        self.next = 0;
    }

    fn cutoff_recorder(&mut self) -> Option<&mut dyn CutoffRecorder> {
        Some(self)
    }

    fn name(&self) -> &'static str {
        "Killer"
    }
}

impl CutoffRecorder for KillerSorter {
    fn record_cutoff(&mut self, mv: Move) {
        self.put(mv);
    }
}
