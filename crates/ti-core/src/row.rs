//! Row identity and per-row state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Label shown for a row whose user name is empty, before its position is known.
pub const UNTITLED_ACTIVITY: &str = "Untitled Activity";

/// Stable identifier for an activity row.
///
/// Ids are issued by [`ActivityRegistry`](crate::ActivityRegistry) from a
/// monotonic counter and are never reused after the row is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(u64);

impl RowId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One tracked activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRow {
    id: RowId,
    name: String,
    elapsed_ms: u64,
}

impl ActivityRow {
    pub(crate) const fn new(id: RowId, name: String) -> Self {
        Self {
            id,
            name,
            elapsed_ms: 0,
        }
    }

    pub const fn id(&self) -> RowId {
        self.id
    }

    /// The user-entered name. Empty means the positional placeholder applies.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Sets elapsed time, clamping negative values to zero. Returns the stored value.
    pub(crate) fn set_elapsed_ms(&mut self, millis: i64) -> u64 {
        self.elapsed_ms = u64::try_from(millis).unwrap_or(0);
        self.elapsed_ms
    }

    /// Adds a signed delta with saturation at both ends. Returns the stored value.
    pub(crate) fn add_elapsed_ms(&mut self, delta: i64) -> u64 {
        self.elapsed_ms = self.elapsed_ms.saturating_add_signed(delta);
        self.elapsed_ms
    }

    /// Name for the window caption: the user name, or a generic label.
    pub fn caption_name(&self) -> &str {
        if self.name.is_empty() {
            UNTITLED_ACTIVITY
        } else {
            &self.name
        }
    }
}

/// Derives the label shown for a row from its user name and display position.
///
/// `position` is zero-based; the placeholder is numbered from one.
pub fn display_name(user_name: &str, position: usize) -> String {
    if user_name.is_empty() {
        format!("Activity {}", position + 1)
    } else {
        user_name.to_string()
    }
}
