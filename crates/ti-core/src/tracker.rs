//! The single entry point that serializes every read and write.
//!
//! `Tracker` owns the registry, the active state, the time engine, and any
//! drag in progress, and applies the side effects that cross them: removing a
//! row clears it from the active state and aborts a drag of that row, and a
//! row edited down to zero is stopped. Stale ids are ignored rather than
//! reported, since a UI may deliver an action for a row that was removed a
//! moment earlier.

use tracing::debug;

use crate::active::ActiveState;
use crate::clock::{Clock, SystemClock};
use crate::drag::{DragReorderSession, ListGeometry};
use crate::edit::{EditRequest, ParseMinutesError};
use crate::engine::TimeEngine;
use crate::format::format_elapsed;
use crate::registry::{ActivityRegistry, RowSlot};
use crate::row::RowId;
use crate::snapshot::{TrackerSnapshot, caption};

/// Startup settings for a [`Tracker`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Number of empty rows created up front.
    pub initial_rows: usize,
    pub geometry: ListGeometry,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            initial_rows: 5,
            geometry: ListGeometry::default(),
        }
    }
}

/// An activity list with at most one running timer.
#[derive(Debug)]
pub struct Tracker<C: Clock = SystemClock> {
    clock: C,
    registry: ActivityRegistry,
    state: ActiveState,
    engine: TimeEngine,
    drag: Option<DragReorderSession>,
    geometry: ListGeometry,
}

impl Tracker<SystemClock> {
    pub fn with_system_clock(config: &TrackerConfig) -> Self {
        Self::new(SystemClock, config)
    }
}

impl<C: Clock> Tracker<C> {
    pub fn new(clock: C, config: &TrackerConfig) -> Self {
        let mut registry = ActivityRegistry::new();
        for _ in 0..config.initial_rows {
            registry.add_row(None);
        }
        let engine = TimeEngine::new(clock.now_ms());

        Self {
            clock,
            registry,
            state: ActiveState::Idle,
            engine,
            drag: None,
            geometry: config.geometry,
        }
    }

    // ========== Time ==========

    /// Reads the clock and credits the elapsed time to the active row.
    pub fn tick(&mut self) -> u64 {
        let now = self.clock.now_ms();
        self.tick_at(now)
    }

    /// Same as [`tick`](Self::tick) with an explicit clock reading.
    pub fn tick_at(&mut self, now_ms: i64) -> u64 {
        self.engine.tick(now_ms, &mut self.registry, self.state)
    }

    pub fn set_time(&mut self, id: RowId, millis: i64) -> Option<u64> {
        let elapsed = TimeEngine::set_time(&mut self.registry, &mut self.state, id, millis);
        log_ignored(elapsed.is_some(), "set_time", id);
        elapsed
    }

    pub fn add_time(&mut self, id: RowId, delta_ms: i64) -> Option<u64> {
        let elapsed = TimeEngine::add_time(&mut self.registry, &mut self.state, id, delta_ms);
        log_ignored(elapsed.is_some(), "add_time", id);
        elapsed
    }

    pub fn transfer_time(&mut self, from: Option<RowId>, to: RowId, delta_ms: i64) -> bool {
        let applied =
            TimeEngine::transfer_time(&mut self.registry, &mut self.state, from, to, delta_ms);
        log_ignored(applied, "transfer_time", to);
        applied
    }

    pub fn reset_time(&mut self, id: RowId) -> Option<u64> {
        let elapsed = TimeEngine::reset_time(&mut self.registry, &mut self.state, id);
        log_ignored(elapsed.is_some(), "reset_time", id);
        elapsed
    }

    /// Applies a confirmed edit dialog.
    pub fn apply_edit(&mut self, request: EditRequest) -> bool {
        self.transfer_time(request.source, request.target, request.delta.millis())
    }

    /// Parses dialog text and applies it. Malformed text changes nothing.
    pub fn edit_minutes(
        &mut self,
        target: RowId,
        source: Option<RowId>,
        minutes: &str,
    ) -> Result<bool, ParseMinutesError> {
        let request = EditRequest::parse(target, source, minutes).inspect_err(|err| {
            debug!(row = %target, %err, "edit discarded");
        })?;
        Ok(self.apply_edit(request))
    }

    // ========== Rows ==========

    pub fn add_row(&mut self, name: Option<&str>) -> RowId {
        let id = self.registry.add_row(name);
        debug!(row = %id, "row added");
        id
    }

    pub fn remove_row(&mut self, id: RowId) -> bool {
        if self.registry.remove_row(id).is_none() {
            log_ignored(false, "remove_row", id);
            return false;
        }

        self.state.on_row_removed(id);
        if let Some(drag) = self.drag.take_if(|drag| drag.dragged_id() == id) {
            drag.abort(&mut self.registry);
        }
        debug!(row = %id, state = ?self.state, "row removed");
        true
    }

    pub fn rename_row(&mut self, id: RowId, text: &str) -> bool {
        let renamed = self.registry.rename_row(id, text);
        log_ignored(renamed, "rename_row", id);
        renamed
    }

    // ========== Active state ==========

    /// Presses a row's own timer control.
    pub fn toggle(&mut self, id: RowId) -> bool {
        if !self.registry.contains(id) {
            log_ignored(false, "toggle", id);
            return false;
        }
        self.state.toggle(id);
        debug!(row = %id, state = ?self.state, "toggled");
        true
    }

    pub fn pause(&mut self) {
        self.state.pause();
        debug!(state = ?self.state, "pause");
    }

    pub fn resume(&mut self) {
        let registry = &self.registry;
        self.state.resume(|id| registry.contains(id));
        debug!(state = ?self.state, "resume");
    }

    /// Pause when running, resume when paused.
    pub fn toggle_pause(&mut self) {
        match self.state {
            ActiveState::Active(_) => self.pause(),
            ActiveState::Paused(_) => self.resume(),
            ActiveState::Idle => {}
        }
    }

    // ========== Drag ==========

    /// Picks up a row by its drag handle.
    pub fn begin_drag(&mut self, id: RowId) -> bool {
        if self.drag.is_some() {
            debug!(row = %id, "drag already in progress");
            return false;
        }
        self.drag = DragReorderSession::begin(&self.registry, id);
        log_ignored(self.drag.is_some(), "begin_drag", id);
        self.drag.is_some()
    }

    /// Moves the placeholder under the pointer. Returns the slot index.
    pub fn update_drag(&mut self, pointer_y: f64) -> Option<usize> {
        let drag = self.drag.as_mut()?;
        Some(drag.update_target_index(&mut self.registry, &self.geometry, pointer_y))
    }

    /// Releases the dragged row. Returns `false` if nothing was being dragged.
    pub fn end_drag(&mut self) -> bool {
        match self.drag.take() {
            Some(drag) => {
                drag.end(&mut self.registry);
                true
            }
            None => false,
        }
    }

    pub fn cancel_drag(&mut self) -> bool {
        match self.drag.take() {
            Some(drag) => {
                drag.abort(&mut self.registry);
                true
            }
            None => false,
        }
    }

    pub fn dragged_id(&self) -> Option<RowId> {
        self.drag.as_ref().map(DragReorderSession::dragged_id)
    }

    /// The live order while a drag is in progress.
    pub fn drag_candidate(&self) -> Option<Vec<RowSlot>> {
        self.drag.as_ref().map(|_| self.registry.order().to_vec())
    }

    // ========== Reads ==========

    pub const fn state(&self) -> ActiveState {
        self.state
    }

    pub const fn registry(&self) -> &ActivityRegistry {
        &self.registry
    }

    pub const fn geometry(&self) -> &ListGeometry {
        &self.geometry
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn order(&self) -> Vec<RowSlot> {
        self.registry.order().to_vec()
    }

    pub fn row_ids(&self) -> Vec<RowId> {
        self.registry.row_ids().collect()
    }

    /// Row at a zero-based display position.
    pub fn row_at(&self, position: usize) -> Option<RowId> {
        self.registry.row_at(position)
    }

    pub fn display_name(&self, id: RowId) -> Option<String> {
        self.registry.display_name(id)
    }

    pub fn elapsed_ms(&self, id: RowId) -> Option<u64> {
        self.registry.elapsed_ms(id)
    }

    /// Elapsed time as `H:MM:SS`.
    pub fn elapsed_text(&self, id: RowId) -> Option<String> {
        self.registry.elapsed_ms(id).map(format_elapsed)
    }

    pub fn caption(&self) -> String {
        caption(&self.registry, self.state)
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot::capture(&self.registry, self.state, self.dragged_id())
    }
}

fn log_ignored(applied: bool, operation: &'static str, id: RowId) {
    if !applied {
        debug!(operation, row = %id, "ignored operation on unknown row");
    }
}
