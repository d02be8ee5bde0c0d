use std::collections::BTreeMap;

use crate::q_learning::keys::{ActionKey, StateKey};

pub type QValue = f32;

pub type ActionValues = BTreeMap<ActionKey, QValue>;
pub type Entries = BTreeMap<StateKey, ActionValues>;

/// Two-level value table: state key, then action key, then the estimated return.
///
/// Reading a pair that was never written yields the table's default value,
/// rows and entries only appear once something is written to them.
#[derive(Clone, Debug, PartialEq)]
pub struct QTable {
    values: Entries,
    default: QValue,
}

impl Default for QTable {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl QTable {
    pub fn new(default: QValue) -> Self {
        Self {
            values: Entries::new(),
            default,
        }
    }

    pub(crate) fn from_entries(values: Entries, default: QValue) -> Self {
        Self { values, default }
    }

    pub(crate) fn entries(&self) -> &Entries {
        &self.values
    }

    pub fn default_value(&self) -> QValue {
        self.default
    }

    pub fn get(&self, state: &StateKey, action: &ActionKey) -> QValue {
        self.values
            .get(state)
            .and_then(|row| row.get(action))
            .copied()
            .unwrap_or(self.default)
    }

    pub fn set(&mut self, state: StateKey, action: ActionKey, value: QValue) {
        *self.entry(state, action) = value;
    }

    /// Returns a mutable reference to the value, inserting the default first if it's missing.
    pub fn entry(&mut self, state: StateKey, action: ActionKey) -> &mut QValue {
        let default = self.default;
        self.values
            .entry(state)
            .or_default()
            .entry(action)
            .or_insert(default)
    }

    /// Maximum value over `actions` in `state`, `0.0` if there are no actions.
    pub fn max_value(&self, state: &StateKey, actions: &[ActionKey]) -> QValue {
        actions
            .iter()
            .map(|action| self.get(state, action))
            .reduce(QValue::max)
            .unwrap_or(0.0)
    }

    pub fn row(&self, state: &StateKey) -> Option<&ActionValues> {
        self.values.get(state)
    }

    /// Number of stored (state, action) values.
    pub fn len(&self) -> usize {
        self.values.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn state_count(&self) -> usize {
        self.values.len()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use game_environment::game::{Board, Position};

    fn state() -> StateKey {
        StateKey::from(&Board::new())
    }

    fn action(row: usize, col: usize) -> ActionKey {
        ActionKey::from(Position::new(row, col))
    }

    #[test]
    fn test_missing_values_default() {
        let table = QTable::default();
        assert_eq!(table.get(&state(), &action(1, 1)), 0.0);
        assert!(table.is_empty());
        assert!(table.row(&state()).is_none());

        let table = QTable::new(0.5);
        assert_eq!(table.get(&state(), &action(0, 2)), 0.5);
        // reading doesn't create entries
        assert!(table.is_empty());
    }

    #[test]
    fn test_set_get() {
        let mut table = QTable::default();
        table.set(state(), action(1, 1), 1.5);
        table.set(state(), action(0, 0), -0.5);
        assert_eq!(table.get(&state(), &action(1, 1)), 1.5);
        assert_eq!(table.get(&state(), &action(0, 0)), -0.5);
        assert_eq!(table.get(&state(), &action(2, 2)), 0.0);
        assert_eq!(table.len(), 2);
        assert_eq!(table.state_count(), 1);

        table.clear();
        assert!(table.is_empty());
    }

    #[test]
    fn test_entry_creates_default() {
        let mut table = QTable::new(0.25);
        let value = table.entry(state(), action(2, 0));
        assert_eq!(*value, 0.25);
        *value += 1.0;
        assert_eq!(table.get(&state(), &action(2, 0)), 1.25);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_max_value() {
        let mut table = QTable::default();
        table.set(state(), action(0, 0), -0.5);
        table.set(state(), action(0, 1), -0.2);
        table.set(state(), action(0, 2), 0.8);

        assert_eq!(
            table.max_value(&state(), &[action(0, 0), action(0, 1), action(0, 2)]),
            0.8
        );
        // max over negative values only
        assert_eq!(table.max_value(&state(), &[action(0, 0), action(0, 1)]), -0.2);
        // unknown actions count as the default
        assert_eq!(table.max_value(&state(), &[action(0, 0), action(1, 1)]), 0.0);
        // no actions at all
        assert_eq!(table.max_value(&state(), &[]), 0.0);
    }
}
