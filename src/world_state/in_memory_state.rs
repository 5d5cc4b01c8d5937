use std::{collections::BTreeMap, ops::Bound};

use super::{StateEntry, StateRange, WorldState, WorldStateError};

/// World state kept in an ordered map. Writes are visible immediately,
/// which gives read-your-writes within and across invocations.
#[derive(Debug, Default, Clone)]
pub struct InMemoryWorldState {
    states: BTreeMap<String, Vec<u8>>,
}

impl InMemoryWorldState {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl WorldState for InMemoryWorldState {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, WorldStateError> {
        Ok(self.states.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), WorldStateError> {
        if key.is_empty() {
            return Err(WorldStateError::EmptyKey);
        }
        self.states.insert(key.to_owned(), value);
        Ok(())
    }

    fn state_by_range(&self, start: &str, end: &str) -> Result<StateRange<'_>, WorldStateError> {
        if !start.is_empty() && !end.is_empty() && start > end {
            return Err(WorldStateError::InvalidRange {
                start: start.to_owned(),
                end: end.to_owned(),
            });
        }
        let lower = if start.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start)
        };
        let upper = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end)
        };
        let iter = self
            .states
            .range::<str, _>((lower, upper))
            .map(|(key, value)| {
                Ok(StateEntry {
                    key: key.clone(),
                    value: value.clone(),
                })
            });
        Ok(Box::new(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(state: &InMemoryWorldState, start: &str, end: &str) -> Vec<String> {
        state
            .state_by_range(start, end)
            .unwrap()
            .map(|entry| entry.unwrap().key)
            .collect()
    }

    fn populated() -> InMemoryWorldState {
        let mut state = InMemoryWorldState::default();
        for key in ["b", "a", "d", "c"] {
            state.put_state(key, key.as_bytes().to_vec()).unwrap();
        }
        state
    }

    #[test]
    fn read_your_writes() {
        let mut state = InMemoryWorldState::default();
        assert_eq!(state.get_state("ACCT1").unwrap(), None);

        state.put_state("ACCT1", b"first".to_vec()).unwrap();
        assert_eq!(state.get_state("ACCT1").unwrap(), Some(b"first".to_vec()));

        // last write wins
        state.put_state("ACCT1", b"second".to_vec()).unwrap();
        assert_eq!(state.get_state("ACCT1").unwrap(), Some(b"second".to_vec()));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn empty_key_is_rejected() {
        let mut state = InMemoryWorldState::default();
        let err = state.put_state("", b"x".to_vec()).unwrap_err();
        assert!(matches!(err, WorldStateError::EmptyKey));
        assert!(state.is_empty());
    }

    #[test]
    fn range_scan_bounds() {
        let state = populated();
        assert_eq!(keys(&state, "", ""), ["a", "b", "c", "d"]);
        assert_eq!(keys(&state, "b", "d"), ["b", "c"]);
        assert_eq!(keys(&state, "b", ""), ["b", "c", "d"]);
        assert_eq!(keys(&state, "", "c"), ["a", "b"]);
        assert!(keys(&state, "c", "c").is_empty());

        let err = state.state_by_range("d", "a").err().unwrap();
        assert!(matches!(err, WorldStateError::InvalidRange { .. }));
    }
}
