//! Generation-keyed timer queue
//!
//! Cooperative replacement for "post a callback after N ms" on a UI-thread
//! message loop. The owner polls [`TimerQueue::pop_due`] with the current
//! time and executes the returned actions itself.
//!
//! ## Cancellation
//!
//! [`TimerQueue::cancel_all`] removes every pending entry and advances the
//! generation. An action that is being executed when cancellation happens
//! still holds its [`Expired`] record; re-arming through
//! [`TimerQueue::reschedule`] checks that record's generation, so a periodic
//! callback from a cancelled activation can never install itself again.

use core::fmt;
use heapless::Vec;

/// Timer queue failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerError {
    /// No room for another pending entry
    QueueFull,
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerError::QueueFull => write!(f, "timer queue full"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry<A> {
    due_ms: u64,
    seq: u32,
    generation: u32,
    action: A,
}

/// A due entry removed from the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expired<A> {
    /// Time the entry was scheduled for (may be earlier than "now")
    pub due_ms: u64,
    /// Generation the entry was scheduled in
    pub generation: u32,
    pub action: A,
}

/// Fixed-capacity queue of delayed actions
#[derive(Debug)]
pub struct TimerQueue<A, const N: usize> {
    entries: Vec<Entry<A>, N>,
    generation: u32,
    next_seq: u32,
}

impl<A: Copy, const N: usize> TimerQueue<A, N> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            generation: 0,
            next_seq: 0,
        }
    }

    /// Current generation
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Schedule `action` at absolute time `due_ms` in the current generation
    pub fn schedule_at(&mut self, due_ms: u64, action: A) -> Result<(), SchedulerError> {
        let entry = Entry {
            due_ms,
            seq: self.next_seq,
            generation: self.generation,
            action,
        };
        self.entries
            .push(entry)
            .map_err(|_| SchedulerError::QueueFull)?;
        self.next_seq = self.next_seq.wrapping_add(1);
        Ok(())
    }

    /// Schedule a follow-up of an expired entry
    ///
    /// Returns `Ok(false)` without scheduling when `origin` belongs to a
    /// cancelled generation.
    pub fn reschedule(
        &mut self,
        origin: &Expired<A>,
        due_ms: u64,
        action: A,
    ) -> Result<bool, SchedulerError> {
        if origin.generation != self.generation {
            return Ok(false);
        }
        self.schedule_at(due_ms, action)?;
        Ok(true)
    }

    /// Drop every pending entry and start a new generation
    ///
    /// Returns the number of entries removed.
    pub fn cancel_all(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.generation = self.generation.wrapping_add(1);
        removed
    }

    /// Remove and return the earliest entry due at or before `now_ms`
    ///
    /// Entries with equal due time come out in scheduling order.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Expired<A>> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_ms <= now_ms)
            .min_by_key(|(_, e)| (e.due_ms, e.seq.wrapping_sub(self.next_seq)))
            .map(|(i, _)| i)?;

        let entry = self.entries.swap_remove(idx);
        Some(Expired {
            due_ms: entry.due_ms,
            generation: entry.generation,
            action: entry.action,
        })
    }

    /// Earliest pending due time
    pub fn next_due_ms(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.due_ms).min()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A: Copy, const N: usize> Default for TimerQueue<A, N> {
    fn default() -> Self {
        Self::new()
    }
}
