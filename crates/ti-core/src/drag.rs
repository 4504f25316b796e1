//! Drag-to-reorder sessions.
//!
//! While a row is held, the order shows a placeholder slot at the hovered
//! position and the dragged row floats outside the order. Releasing puts the
//! row into the placeholder's slot. Nothing the pointer does can leave the
//! committed order in an invalid state: every candidate goes through
//! [`ActivityRegistry::reorder`] validation, and an aborted drag restores the
//! order captured when it began.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::registry::{ActivityRegistry, RowSlot};
use crate::row::RowId;

/// Vertical layout of the list, in the same coordinates as the pointer
/// (y grows downward, scroll offset already applied).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ListGeometry {
    /// Y coordinate of the first row's top edge.
    pub top: f64,
    pub row_height: f64,
    /// Gap between consecutive rows.
    pub spacing: f64,
}

impl Default for ListGeometry {
    fn default() -> Self {
        Self {
            top: 0.0,
            row_height: 40.0,
            spacing: 4.0,
        }
    }
}

impl ListGeometry {
    /// Maps a pointer y coordinate to a slot index clamped to `[0, row_count - 1]`.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        reason = "raw is positive and compared against last before casting"
    )]
    pub fn slot_at(&self, pointer_y: f64, row_count: usize) -> usize {
        let pitch = self.row_height + self.spacing;
        let last = row_count.saturating_sub(1);
        if !pointer_y.is_finite() || !pitch.is_finite() || pitch <= 0.0 {
            return 0;
        }

        let raw = ((pointer_y - self.top) / pitch).floor();
        if raw <= 0.0 {
            return 0;
        }
        if raw >= last as f64 { last } else { raw as usize }
    }
}

/// A row being dragged to a new position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragReorderSession {
    dragged: RowId,
    committed: Vec<RowId>,
    target: Option<usize>,
}

impl DragReorderSession {
    /// Picks up a row. Returns `None` if the row does not exist or another
    /// drag already holds a placeholder.
    pub fn begin(registry: &ActivityRegistry, id: RowId) -> Option<Self> {
        if !registry.contains(id) || registry.placeholder_index().is_some() {
            return None;
        }
        Some(Self {
            dragged: id,
            committed: registry.row_ids().collect(),
            target: None,
        })
    }

    pub const fn dragged_id(&self) -> RowId {
        self.dragged
    }

    /// Slot index resolved by the last pointer update.
    pub const fn target_index(&self) -> Option<usize> {
        self.target
    }

    /// Moves the placeholder under the pointer and returns its slot index.
    ///
    /// Cheap enough for every pointer-move event; an unchanged pointer
    /// produces the same order.
    pub fn update_target_index(
        &mut self,
        registry: &mut ActivityRegistry,
        geometry: &ListGeometry,
        pointer_y: f64,
    ) -> usize {
        let slot = geometry.slot_at(pointer_y, registry.len());

        let mut candidate: Vec<RowSlot> = registry
            .row_ids()
            .filter(|id| *id != self.dragged)
            .map(RowSlot::Row)
            .collect();
        let slot = slot.min(candidate.len());
        candidate.insert(slot, RowSlot::Placeholder);

        if let Err(err) = registry.reorder(candidate) {
            warn!(%err, dragged = %self.dragged, "drag candidate rejected");
        } else {
            self.target = Some(slot);
        }
        slot
    }

    /// Drops the row into the placeholder slot and commits that order.
    ///
    /// With no placeholder in place the row returns to where it was when the
    /// drag began.
    pub fn end(self, registry: &mut ActivityRegistry) {
        if registry.placeholder_index().is_none() {
            debug!(dragged = %self.dragged, "drag released without a target");
            self.restore(registry);
            return;
        }

        let dragged = self.dragged;
        let final_order: Vec<RowSlot> = registry
            .order()
            .iter()
            .map(|slot| match slot {
                RowSlot::Placeholder => RowSlot::Row(dragged),
                row => *row,
            })
            .collect();

        if let Err(err) = registry.reorder(final_order) {
            warn!(%err, %dragged, "drop rejected, restoring order");
            self.restore(registry);
        } else {
            debug!(%dragged, position = ?registry.position(dragged), "drag committed");
        }
    }

    /// Abandons the drag without committing the hovered position.
    pub fn abort(self, registry: &mut ActivityRegistry) {
        debug!(dragged = %self.dragged, "drag aborted");
        self.restore(registry);
    }

    /// Restores the order captured at [`begin`](Self::begin). Rows removed
    /// since are skipped; rows added since stay at the end.
    fn restore(self, registry: &mut ActivityRegistry) {
        let mut order: Vec<RowSlot> = self
            .committed
            .iter()
            .copied()
            .filter(|id| registry.contains(*id))
            .map(RowSlot::Row)
            .collect();
        let added: Vec<RowSlot> = registry
            .row_ids()
            .filter(|id| !self.committed.contains(id))
            .map(RowSlot::Row)
            .collect();
        order.extend(added);

        if let Err(err) = registry.reorder(order) {
            warn!(%err, "could not restore order after drag");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(n: usize) -> (ActivityRegistry, Vec<RowId>) {
        let mut registry = ActivityRegistry::new();
        let ids = (0..n).map(|_| registry.add_row(None)).collect();
        (registry, ids)
    }

    fn rows(ids: &[RowId]) -> Vec<RowSlot> {
        ids.iter().copied().map(RowSlot::Row).collect()
    }

    const GEOMETRY: ListGeometry = ListGeometry {
        top: 100.0,
        row_height: 40.0,
        spacing: 4.0,
    };

    #[test]
    fn slot_at_divides_by_row_pitch() {
        assert_eq!(GEOMETRY.slot_at(100.0, 5), 0);
        assert_eq!(GEOMETRY.slot_at(143.9, 5), 0);
        assert_eq!(GEOMETRY.slot_at(144.0, 5), 1);
        assert_eq!(GEOMETRY.slot_at(100.0 + 44.0 * 3.5, 5), 3);
    }

    #[test]
    fn slot_at_clamps_into_range() {
        assert_eq!(GEOMETRY.slot_at(-500.0, 5), 0);
        assert_eq!(GEOMETRY.slot_at(10_000.0, 5), 4);
        assert_eq!(GEOMETRY.slot_at(f64::NAN, 5), 0);
        assert_eq!(GEOMETRY.slot_at(f64::INFINITY, 5), 0);
        assert_eq!(GEOMETRY.slot_at(300.0, 0), 0);
    }

    #[test]
    fn begin_requires_live_row() {
        let (mut registry, ids) = setup(2);
        registry.remove_row(ids[1]);
        assert!(DragReorderSession::begin(&registry, ids[1]).is_none());
        assert!(DragReorderSession::begin(&registry, ids[0]).is_some());
    }

    #[test]
    fn begin_refused_while_placeholder_present() {
        let (mut registry, ids) = setup(2);
        let mut session = DragReorderSession::begin(&registry, ids[0]).unwrap();
        session.update_target_index(&mut registry, &GEOMETRY, 100.0);
        assert!(DragReorderSession::begin(&registry, ids[1]).is_none());
    }

    #[test]
    fn drag_second_row_to_top() {
        let (mut registry, ids) = setup(2);
        let mut session = DragReorderSession::begin(&registry, ids[1]).unwrap();

        assert_eq!(session.update_target_index(&mut registry, &GEOMETRY, 110.0), 0);
        assert_eq!(registry.order(), &[RowSlot::Placeholder, RowSlot::Row(ids[0])]);

        session.end(&mut registry);
        assert_eq!(registry.order(), rows(&[ids[1], ids[0]]).as_slice());
    }

    #[test]
    fn drag_to_bottom_appends() {
        let (mut registry, ids) = setup(3);
        let mut session = DragReorderSession::begin(&registry, ids[0]).unwrap();

        assert_eq!(session.update_target_index(&mut registry, &GEOMETRY, 9_999.0), 2);
        assert_eq!(
            registry.order(),
            &[RowSlot::Row(ids[1]), RowSlot::Row(ids[2]), RowSlot::Placeholder]
        );

        session.end(&mut registry);
        assert_eq!(registry.order(), rows(&[ids[1], ids[2], ids[0]]).as_slice());
    }

    #[test]
    fn update_is_idempotent_for_same_pointer() {
        let (mut registry, ids) = setup(4);
        let mut session = DragReorderSession::begin(&registry, ids[3]).unwrap();

        session.update_target_index(&mut registry, &GEOMETRY, 150.0);
        let first = registry.order().to_vec();
        session.update_target_index(&mut registry, &GEOMETRY, 150.0);
        assert_eq!(registry.order(), first.as_slice());
        assert_eq!(session.target_index(), Some(1));
    }

    #[test]
    fn hover_moves_placeholder_back_and_forth() {
        let (mut registry, ids) = setup(3);
        let mut session = DragReorderSession::begin(&registry, ids[1]).unwrap();

        session.update_target_index(&mut registry, &GEOMETRY, 200.0);
        session.update_target_index(&mut registry, &GEOMETRY, 100.0);
        session.update_target_index(&mut registry, &GEOMETRY, 150.0);
        assert_eq!(registry.placeholder_index(), Some(1));

        session.end(&mut registry);
        assert_eq!(registry.order(), rows(&ids).as_slice());
    }

    #[test]
    fn release_without_hover_keeps_order() {
        let (mut registry, ids) = setup(3);
        let session = DragReorderSession::begin(&registry, ids[2]).unwrap();
        session.end(&mut registry);
        assert_eq!(registry.order(), rows(&ids).as_slice());
    }

    #[test]
    fn abort_restores_committed_order() {
        let (mut registry, ids) = setup(3);
        let mut session = DragReorderSession::begin(&registry, ids[2]).unwrap();
        session.update_target_index(&mut registry, &GEOMETRY, 100.0);

        session.abort(&mut registry);
        assert_eq!(registry.order(), rows(&ids).as_slice());
    }

    #[test]
    fn abort_after_dragged_row_removed() {
        let (mut registry, ids) = setup(3);
        let mut session = DragReorderSession::begin(&registry, ids[0]).unwrap();
        session.update_target_index(&mut registry, &GEOMETRY, 9_999.0);

        registry.remove_row(ids[0]);
        session.abort(&mut registry);
        assert_eq!(registry.order(), rows(&[ids[1], ids[2]]).as_slice());
    }

    #[test]
    fn other_row_removed_mid_drag_still_commits() {
        let (mut registry, ids) = setup(3);
        let mut session = DragReorderSession::begin(&registry, ids[2]).unwrap();
        session.update_target_index(&mut registry, &GEOMETRY, 100.0);

        registry.remove_row(ids[0]);
        session.end(&mut registry);
        assert_eq!(registry.order(), rows(&[ids[2], ids[1]]).as_slice());
    }

    #[test]
    fn row_added_mid_drag_is_kept() {
        let (mut registry, ids) = setup(2);
        let mut session = DragReorderSession::begin(&registry, ids[0]).unwrap();
        session.update_target_index(&mut registry, &GEOMETRY, 9_999.0);
        let added = registry.add_row(None);

        session.end(&mut registry);
        assert_eq!(registry.order(), rows(&[ids[1], ids[0], added]).as_slice());
    }

    #[test]
    fn end_always_yields_permutation() {
        for n in 1..6 {
            for dragged in 0..n {
                for y in [-50.0, 100.0, 130.0, 190.0, 260.0, 330.0, 5_000.0] {
                    let (mut registry, ids) = setup(n);
                    let mut session = DragReorderSession::begin(&registry, ids[dragged]).unwrap();
                    session.update_target_index(&mut registry, &GEOMETRY, y);
                    session.end(&mut registry);

                    let mut after: Vec<RowId> = registry.row_ids().collect();
                    assert_eq!(registry.order().len(), n);
                    assert_eq!(registry.placeholder_index(), None);
                    after.sort();
                    assert_eq!(after, ids);
                }
            }
        }
    }
}
