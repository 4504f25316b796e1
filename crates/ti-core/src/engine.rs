//! Time accrual and bounded time edits.
//!
//! Accrual uses the real wall-clock delta between ticks rather than a fixed
//! increment, so irregular tick scheduling (or a suspended process) does not
//! cause drift. Every edit clamps at zero, and a row whose time lands on
//! exactly zero is taken out of the active/paused state.

use tracing::{debug, trace};

use crate::active::ActiveState;
use crate::registry::ActivityRegistry;
use crate::row::RowId;

/// Advances the active row on each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeEngine {
    last_seen_ms: i64,
}

impl TimeEngine {
    /// Starts measuring from `now_ms`.
    pub const fn new(now_ms: i64) -> Self {
        Self {
            last_seen_ms: now_ms,
        }
    }

    pub const fn last_seen_ms(&self) -> i64 {
        self.last_seen_ms
    }

    /// Credits the time since the previous tick to the active row.
    ///
    /// A clock that moves backwards yields a zero delta. Returns the credited
    /// milliseconds (zero when nothing is active).
    pub fn tick(
        &mut self,
        now_ms: i64,
        registry: &mut ActivityRegistry,
        state: ActiveState,
    ) -> u64 {
        let delta = now_ms.saturating_sub(self.last_seen_ms).max(0);
        self.last_seen_ms = now_ms;

        let Some(row) = state.active_id().and_then(|id| registry.row_mut(id)) else {
            return 0;
        };
        let elapsed = row.add_elapsed_ms(delta);
        trace!(row = %row.id(), delta, elapsed, "tick");
        delta.unsigned_abs()
    }

    /// Sets a row's time to `millis`, clamped at zero.
    ///
    /// Returns the stored value, or `None` for an unknown row.
    pub fn set_time(
        registry: &mut ActivityRegistry,
        state: &mut ActiveState,
        id: RowId,
        millis: i64,
    ) -> Option<u64> {
        let row = registry.row_mut(id)?;
        let elapsed = row.set_elapsed_ms(millis);
        Self::after_edit(state, id, elapsed);
        Some(elapsed)
    }

    /// Adds a signed delta to a row's time, clamped at zero.
    pub fn add_time(
        registry: &mut ActivityRegistry,
        state: &mut ActiveState,
        id: RowId,
        delta_ms: i64,
    ) -> Option<u64> {
        let row = registry.row_mut(id)?;
        let elapsed = row.add_elapsed_ms(delta_ms);
        Self::after_edit(state, id, elapsed);
        Some(elapsed)
    }

    /// Moves `delta_ms` from one row to another.
    ///
    /// Both rows are checked before either changes. Without a distinct, live
    /// source this is a plain [`add_time`](Self::add_time) on the target.
    /// Returns `false` if the target does not exist.
    pub fn transfer_time(
        registry: &mut ActivityRegistry,
        state: &mut ActiveState,
        from: Option<RowId>,
        to: RowId,
        delta_ms: i64,
    ) -> bool {
        if !registry.contains(to) {
            return false;
        }

        match from.filter(|from| *from != to && registry.contains(*from)) {
            Some(from) => {
                Self::add_time(registry, state, from, delta_ms.saturating_neg());
                Self::add_time(registry, state, to, delta_ms);
                debug!(%from, %to, delta_ms, "transferred time");
            }
            None => {
                Self::add_time(registry, state, to, delta_ms);
            }
        }
        true
    }

    pub fn reset_time(
        registry: &mut ActivityRegistry,
        state: &mut ActiveState,
        id: RowId,
    ) -> Option<u64> {
        Self::set_time(registry, state, id, 0)
    }

    fn after_edit(state: &mut ActiveState, id: RowId, elapsed: u64) {
        if elapsed == 0 && state.references(id) {
            debug!(row = %id, "row time reached zero, stopping");
            state.on_row_time_reached_zero(id);
        }
    }
}
