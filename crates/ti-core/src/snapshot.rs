//! Copy-out views of tracker state for rendering.

use serde::Serialize;

use crate::active::ActiveState;
use crate::format::format_elapsed;
use crate::registry::{ActivityRegistry, RowSlot};
use crate::row::{RowId, display_name};

pub const WINDOW_TITLE: &str = "TimeIt";
pub const PAUSED_TEXT: &str = "Paused";

/// What a row's timer control shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    /// Accruing time.
    Running,
    /// Will resume when the pause ends.
    Held,
    Stopped,
}

/// What the global pause control offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseControl {
    Disabled,
    Pause,
    Resume,
}

impl From<ActiveState> for PauseControl {
    fn from(state: ActiveState) -> Self {
        match state {
            ActiveState::Idle => Self::Disabled,
            ActiveState::Active(_) => Self::Pause,
            ActiveState::Paused(_) => Self::Resume,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub id: RowId,
    /// Zero-based display position.
    pub position: usize,
    pub name: String,
    pub user_name: String,
    pub elapsed_ms: u64,
    pub elapsed: String,
    pub status: RowStatus,
    /// No time recorded yet.
    pub empty: bool,
    /// Held by a drag and drawn outside the list.
    pub floating: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackerSnapshot {
    /// Every row, sorted by display position.
    pub rows: Vec<RowView>,
    pub order: Vec<RowSlot>,
    pub state: ActiveState,
    pub dragging: Option<RowId>,
    pub pause_control: PauseControl,
    pub caption: String,
}

impl TrackerSnapshot {
    pub(crate) fn capture(
        registry: &ActivityRegistry,
        state: ActiveState,
        dragging: Option<RowId>,
    ) -> Self {
        let dragging = dragging.filter(|id| registry.contains(*id));
        let floating = dragging.filter(|id| !registry.row_ids().any(|row| row == *id));
        let mut rows: Vec<RowView> = registry
            .row_ids()
            .chain(floating)
            .filter_map(|id| {
                let row = registry.row(id)?;
                let position = registry.position(id)?;
                Some(RowView {
                    id,
                    position,
                    name: display_name(row.name(), position),
                    user_name: row.name().to_string(),
                    elapsed_ms: row.elapsed_ms(),
                    elapsed: format_elapsed(row.elapsed_ms()),
                    status: row_status(state, id),
                    empty: row.elapsed_ms() == 0,
                    floating: Some(id) == floating,
                })
            })
            .collect();
        rows.sort_by_key(|row| row.position);

        Self {
            rows,
            order: registry.order().to_vec(),
            state,
            dragging,
            pause_control: state.into(),
            caption: caption(registry, state),
        }
    }
}

fn row_status(state: ActiveState, id: RowId) -> RowStatus {
    match state {
        ActiveState::Active(active) if active == id => RowStatus::Running,
        ActiveState::Paused(held) if held == id => RowStatus::Held,
        _ => RowStatus::Stopped,
    }
}

/// Window caption: `TimeIt [<name> ~ H:MM:SS]` while running, `TimeIt [Paused]` otherwise.
pub fn caption(registry: &ActivityRegistry, state: ActiveState) -> String {
    let active = state.active_id().and_then(|id| registry.row(id));
    match active {
        Some(row) => format!(
            "{WINDOW_TITLE} [{} ~ {}]",
            row.caption_name(),
            format_elapsed(row.elapsed_ms())
        ),
        None => format!("{WINDOW_TITLE} [{PAUSED_TEXT}]"),
    }
}
