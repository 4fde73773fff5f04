use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::PixelGrid;

/// Edits landing within this window of the previous one are merged into a
/// single undo step, so a continuous pen drag does not produce one history
/// entry per pixel.
pub const COALESCE_WINDOW_MS: u64 = 300;

/// One undo step: a full grid snapshot and when it was taken (epoch ms)
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub grid: PixelGrid,
    pub timestamp: u64,
}

/// Append-only undo/redo log with a movable cursor.
///
/// Entries beyond the cursor are the redo branch; any new push discards them.
/// Grids stored here are snapshots and must never be mutated in place.
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

pub(crate) fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all history and start over from `grid`. Used on canvas init and
    /// resize; the reset itself is not undoable.
    pub fn reset(&mut self, grid: PixelGrid) {
        self.reset_at(grid, epoch_ms());
    }

    pub(crate) fn reset_at(&mut self, grid: PixelGrid, now_ms: u64) {
        self.entries = vec![HistoryEntry {
            grid,
            timestamp: now_ms,
        }];
        self.cursor = 0;
    }

    /// Record an edit. Truncates the redo branch, then either coalesces into
    /// the last entry (cursor at tip and within the time window) or appends.
    pub fn push(&mut self, grid: PixelGrid) {
        self.push_at(grid, epoch_ms());
    }

    /// `push` with an explicit clock, so the coalescing window is testable
    /// without sleeping.
    pub(crate) fn push_at(&mut self, grid: PixelGrid, now_ms: u64) {
        // The entry at index 0 is the init/reset snapshot, never a push; it
        // stays intact as the undo floor and is never coalesced into.
        let at_tip = self.cursor > 0 && self.cursor == self.entries.len() - 1;
        if at_tip {
            let last = &mut self.entries[self.cursor];
            if now_ms.saturating_sub(last.timestamp) < COALESCE_WINDOW_MS {
                last.grid = grid;
                last.timestamp = now_ms;
                return;
            }
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(HistoryEntry {
            grid,
            timestamp: now_ms,
        });
        self.cursor = self.entries.len() - 1;
    }

    /// Step back one entry. None when already at the oldest entry.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Step forward one entry. None when already at the newest entry.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}
