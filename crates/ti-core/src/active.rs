//! Which row accrues time, and which row a pause will resume.

use serde::{Deserialize, Serialize};

use crate::row::RowId;

/// Timer state across all rows.
///
/// At most one row is ever `Active`. `Paused` remembers the row that was
/// active when the pause began.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "row", rename_all = "snake_case")]
pub enum ActiveState {
    #[default]
    Idle,
    Active(RowId),
    Paused(RowId),
}

impl ActiveState {
    /// The row currently accruing time.
    pub const fn active_id(self) -> Option<RowId> {
        match self {
            Self::Active(id) => Some(id),
            _ => None,
        }
    }

    /// The row a resume would reactivate.
    pub const fn paused_from(self) -> Option<RowId> {
        match self {
            Self::Paused(id) => Some(id),
            _ => None,
        }
    }

    /// True if `id` is either the active or the paused-from row.
    pub fn references(self, id: RowId) -> bool {
        matches!(self, Self::Active(a) | Self::Paused(a) if a == id)
    }

    /// A row's own timer control was pressed.
    ///
    /// Pressing the active row stops it; pressing any other row makes it the
    /// only active row and drops pause memory.
    pub fn toggle(&mut self, id: RowId) {
        *self = match *self {
            Self::Active(current) if current == id => Self::Idle,
            Self::Idle | Self::Active(_) | Self::Paused(_) => Self::Active(id),
        };
    }

    pub fn pause(&mut self) {
        if let Self::Active(id) = *self {
            *self = Self::Paused(id);
        }
    }

    /// Reactivates the paused-from row if it still exists, otherwise goes idle.
    pub fn resume(&mut self, exists: impl FnOnce(RowId) -> bool) {
        if let Self::Paused(id) = *self {
            *self = if exists(id) { Self::Active(id) } else { Self::Idle };
        }
    }

    /// Stops the timer outright.
    pub fn stop(&mut self) {
        *self = Self::Idle;
    }

    pub fn on_row_removed(&mut self, id: RowId) {
        if self.references(id) {
            *self = Self::Idle;
        }
    }

    /// A zero-time row must not read as in progress.
    pub fn on_row_time_reached_zero(&mut self, id: RowId) {
        if self.references(id) {
            *self = Self::Idle;
        }
    }
}
