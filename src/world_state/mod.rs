use thiserror::Error;

pub mod in_memory_state;

#[derive(Debug, Error)]
pub enum WorldStateError {
    #[error("Key must not be empty")]
    EmptyKey,
    #[error("Invalid range: start key `{start}` is after end key `{end}`")]
    InvalidRange { start: String, end: String },
    #[error("World state backend failed: {0}")]
    Backend(String),
}

/// A single `(key, value)` pair produced by a range scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateEntry {
    pub key: String,
    pub value: Vec<u8>,
}

/// Lazy, single-use iterator over a range of the world state.
pub type StateRange<'s> = Box<dyn Iterator<Item = Result<StateEntry, WorldStateError>> + 's>;

/// Ordered key-value store the ledger runs on top of.
///
/// Persistence, commit ordering and isolation between concurrent invocations
/// belong to the implementor. The ledger only requires that `get_state` sees
/// writes previously issued through the same handle.
pub trait WorldState {
    /// Returns the last payload written at `key`, or `None` if it was never written.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, WorldStateError>;

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), WorldStateError>;

    /// Scans `[start, end)` in ascending key order.
    ///
    /// An empty `start` is unbounded below and an empty `end` is unbounded above,
    /// so `("", "")` covers the whole namespace.
    fn state_by_range(&self, start: &str, end: &str) -> Result<StateRange<'_>, WorldStateError>;
}
