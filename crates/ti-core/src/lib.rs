//! Core state machine for the TimeIt activity timer.
//!
//! This crate contains:
//! - Rows and the registry that owns their identity and display order
//! - The active/paused state shared by all rows
//! - Time accrual from wall-clock ticks and bounded time edits
//! - Drag-to-reorder sessions driven by pointer geometry
//!
//! Everything is synchronous and render-agnostic; callers serialize ticks and
//! user input through a single [`Tracker`].

mod active;
pub mod clock;
mod drag;
pub mod edit;
mod engine;
pub mod format;
mod registry;
mod row;
pub mod snapshot;
mod tracker;

pub use active::ActiveState;
pub use clock::{Clock, ManualClock, SystemClock};
pub use drag::{DragReorderSession, ListGeometry};
pub use edit::{EditRequest, MinuteDelta, ParseMinutesError};
pub use engine::TimeEngine;
pub use format::{Elapsed, format_elapsed};
pub use registry::{ActivityRegistry, OrderError, RowSlot};
pub use row::{ActivityRow, RowId, display_name};
pub use snapshot::{PauseControl, RowStatus, RowView, TrackerSnapshot};
pub use tracker::{Tracker, TrackerConfig};
