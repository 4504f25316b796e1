//! Row ownership, display order, and id lifecycle.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::row::{ActivityRow, RowId, display_name};

/// One entry of the display order.
///
/// `Placeholder` marks where a dragged row would land and only appears while a
/// drag is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum RowSlot {
    Row(RowId),
    Placeholder,
}

impl RowSlot {
    /// Returns the row id, or `None` for the placeholder.
    #[must_use]
    pub const fn row_id(self) -> Option<RowId> {
        match self {
            Self::Row(id) => Some(id),
            Self::Placeholder => None,
        }
    }
}

/// Reasons a proposed order is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// The order has a different number of slots than there are rows.
    #[error("order has {actual} slots but the registry holds {expected} rows")]
    LengthMismatch { expected: usize, actual: usize },

    /// The order names a row that does not exist.
    #[error("order references unknown row {0}")]
    UnknownRow(RowId),

    /// The order names the same row twice.
    #[error("order lists row {0} more than once")]
    DuplicateRow(RowId),

    /// The order holds more than one placeholder.
    #[error("order holds {0} placeholders, at most one is allowed")]
    TooManyPlaceholders(usize),
}

/// Owns every row and the order they are displayed in.
#[derive(Debug, Clone, Default)]
pub struct ActivityRegistry {
    rows: HashMap<RowId, ActivityRow>,
    order: Vec<RowSlot>,
    next_id: u64,
}

impl ActivityRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a row with zero elapsed time and appends it to the order.
    pub fn add_row(&mut self, name: Option<&str>) -> RowId {
        let id = RowId::new(self.next_id);
        self.next_id += 1;

        let row = ActivityRow::new(id, name.unwrap_or_default().to_string());
        self.rows.insert(id, row);
        self.order.push(RowSlot::Row(id));
        id
    }

    /// Deletes a row. Returns the removed row, or `None` if it did not exist.
    ///
    /// A row that is absent from the order is the one being dragged; its
    /// placeholder goes with it so the order length keeps matching.
    pub fn remove_row(&mut self, id: RowId) -> Option<ActivityRow> {
        let row = self.rows.remove(&id)?;
        let slot = self
            .order
            .iter()
            .position(|slot| *slot == RowSlot::Row(id))
            .or_else(|| self.placeholder_index());
        if let Some(index) = slot {
            self.order.remove(index);
        }
        Some(row)
    }

    /// Sets the user name. Returns `false` if the row does not exist.
    pub fn rename_row(&mut self, id: RowId, text: &str) -> bool {
        match self.rows.get_mut(&id) {
            Some(row) => {
                row.set_name(text);
                true
            }
            None => false,
        }
    }

    /// The label shown for a row: its user name, or "Activity N" from its position.
    pub fn display_name(&self, id: RowId) -> Option<String> {
        let row = self.rows.get(&id)?;
        let position = self.position(id)?;
        Some(display_name(row.name(), position))
    }

    /// Replaces the order wholesale after validating it.
    pub fn reorder(&mut self, new_order: Vec<RowSlot>) -> Result<(), OrderError> {
        self.validate_order(&new_order)?;
        self.order = new_order;
        Ok(())
    }

    fn validate_order(&self, new_order: &[RowSlot]) -> Result<(), OrderError> {
        if new_order.len() != self.rows.len() {
            return Err(OrderError::LengthMismatch {
                expected: self.rows.len(),
                actual: new_order.len(),
            });
        }

        let mut seen = HashSet::with_capacity(new_order.len());
        let mut placeholders = 0;
        for slot in new_order {
            match slot {
                RowSlot::Row(id) => {
                    if !self.rows.contains_key(id) {
                        return Err(OrderError::UnknownRow(*id));
                    }
                    if !seen.insert(*id) {
                        return Err(OrderError::DuplicateRow(*id));
                    }
                }
                RowSlot::Placeholder => placeholders += 1,
            }
        }

        if placeholders > 1 {
            return Err(OrderError::TooManyPlaceholders(placeholders));
        }
        Ok(())
    }

    /// Zero-based display position of a row.
    ///
    /// The dragged row is not in the order; it reports the placeholder's slot.
    pub fn position(&self, id: RowId) -> Option<usize> {
        if !self.rows.contains_key(&id) {
            return None;
        }
        self.order
            .iter()
            .position(|slot| *slot == RowSlot::Row(id))
            .or_else(|| self.placeholder_index())
    }

    /// Row id shown at a display position, if that slot holds a row.
    pub fn row_at(&self, position: usize) -> Option<RowId> {
        self.order.get(position).and_then(|slot| slot.row_id())
    }

    pub fn placeholder_index(&self) -> Option<usize> {
        self.order.iter().position(|slot| *slot == RowSlot::Placeholder)
    }

    /// The current order, including a placeholder during a drag.
    pub fn order(&self) -> &[RowSlot] {
        &self.order
    }

    /// Row ids in display order, skipping any placeholder.
    pub fn row_ids(&self) -> impl Iterator<Item = RowId> + '_ {
        self.order.iter().filter_map(|slot| slot.row_id())
    }

    pub fn row(&self, id: RowId) -> Option<&ActivityRow> {
        self.rows.get(&id)
    }

    pub(crate) fn row_mut(&mut self, id: RowId) -> Option<&mut ActivityRow> {
        self.rows.get_mut(&id)
    }

    pub fn elapsed_ms(&self, id: RowId) -> Option<u64> {
        self.rows.get(&id).map(ActivityRow::elapsed_ms)
    }

    pub fn contains(&self, id: RowId) -> bool {
        self.rows.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(n: usize) -> (ActivityRegistry, Vec<RowId>) {
        let mut registry = ActivityRegistry::new();
        let ids = (0..n).map(|_| registry.add_row(None)).collect();
        (registry, ids)
    }

    #[test]
    fn ids_are_monotonic_and_never_reused() {
        let (mut registry, ids) = registry_with(3);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));

        registry.remove_row(ids[2]);
        let fresh = registry.add_row(None);
        assert!(fresh > ids[2]);
        assert!(!registry.contains(ids[2]));
    }

    #[test]
    fn added_rows_append_with_zero_time() {
        let (registry, ids) = registry_with(2);
        assert_eq!(registry.order(), &[RowSlot::Row(ids[0]), RowSlot::Row(ids[1])]);
        assert_eq!(registry.elapsed_ms(ids[1]), Some(0));
    }

    #[test]
    fn add_row_keeps_given_name() {
        let mut registry = ActivityRegistry::new();
        let id = registry.add_row(Some("Email"));
        assert_eq!(registry.display_name(id).as_deref(), Some("Email"));
    }

    #[test]
    fn placeholder_names_follow_position() {
        let (mut registry, ids) = registry_with(3);
        assert_eq!(registry.display_name(ids[2]).as_deref(), Some("Activity 3"));

        registry.remove_row(ids[0]);
        assert_eq!(registry.display_name(ids[1]).as_deref(), Some("Activity 1"));
        assert_eq!(registry.display_name(ids[2]).as_deref(), Some("Activity 2"));
    }

    #[test]
    fn empty_rename_restores_placeholder() {
        let (mut registry, ids) = registry_with(2);
        assert!(registry.rename_row(ids[1], "Meetings"));
        assert_eq!(registry.display_name(ids[1]).as_deref(), Some("Meetings"));

        assert!(registry.rename_row(ids[1], ""));
        assert_eq!(registry.display_name(ids[1]).as_deref(), Some("Activity 2"));
    }

    #[test]
    fn rename_unknown_row_is_ignored() {
        let (mut registry, ids) = registry_with(1);
        registry.remove_row(ids[0]);
        assert!(!registry.rename_row(ids[0], "gone"));
    }

    #[test]
    fn remove_unknown_row_is_noop() {
        let (mut registry, ids) = registry_with(2);
        registry.remove_row(ids[0]);
        assert!(registry.remove_row(ids[0]).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn reorder_updates_placeholder_names() {
        let (mut registry, ids) = registry_with(2);
        registry
            .reorder(vec![RowSlot::Row(ids[1]), RowSlot::Row(ids[0])])
            .unwrap();
        assert_eq!(registry.display_name(ids[1]).as_deref(), Some("Activity 1"));
        assert_eq!(registry.display_name(ids[0]).as_deref(), Some("Activity 2"));
    }

    #[test]
    fn reorder_rejects_invalid_orders() {
        let (mut registry, ids) = registry_with(2);
        let before = registry.order().to_vec();

        assert_eq!(
            registry.reorder(vec![RowSlot::Row(ids[0])]),
            Err(OrderError::LengthMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            registry.reorder(vec![RowSlot::Row(ids[0]), RowSlot::Row(ids[0])]),
            Err(OrderError::DuplicateRow(ids[0]))
        );
        assert_eq!(
            registry.reorder(vec![RowSlot::Placeholder, RowSlot::Placeholder]),
            Err(OrderError::TooManyPlaceholders(2))
        );

        registry.remove_row(ids[1]);
        registry.add_row(None);
        assert_eq!(
            registry.reorder(vec![RowSlot::Row(ids[0]), RowSlot::Row(ids[1])]),
            Err(OrderError::UnknownRow(ids[1]))
        );
        assert_eq!(registry.order().len(), before.len());
    }

    #[test]
    fn dragged_row_reports_placeholder_position() {
        let (mut registry, ids) = registry_with(3);
        registry
            .reorder(vec![
                RowSlot::Placeholder,
                RowSlot::Row(ids[0]),
                RowSlot::Row(ids[1]),
            ])
            .unwrap();

        assert_eq!(registry.position(ids[2]), Some(0));
        assert_eq!(registry.display_name(ids[2]).as_deref(), Some("Activity 1"));
        assert_eq!(registry.row_at(0), None);
        assert_eq!(registry.row_at(1), Some(ids[0]));
    }

    #[test]
    fn removing_dragged_row_drops_placeholder() {
        let (mut registry, ids) = registry_with(3);
        registry
            .reorder(vec![
                RowSlot::Row(ids[1]),
                RowSlot::Placeholder,
                RowSlot::Row(ids[2]),
            ])
            .unwrap();

        registry.remove_row(ids[0]);
        assert_eq!(registry.order(), &[RowSlot::Row(ids[1]), RowSlot::Row(ids[2])]);
        assert_eq!(registry.placeholder_index(), None);
    }

    #[test]
    fn row_slot_serializes_tagged() {
        let (_, ids) = registry_with(1);
        let json = serde_json::to_string(&[RowSlot::Row(ids[0]), RowSlot::Placeholder]).unwrap();
        assert_eq!(json, r#"[{"kind":"row","id":0},{"kind":"placeholder"}]"#);
    }
}
