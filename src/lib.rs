/// Account record stored in the world state, plus balance changes applied to it.
/// Records are mutated using events, which are created by validating a requested change
pub mod account;

/// Invocation surface: function names and positional string arguments
/// parsed into [`command::LedgerCommand`], and amount coercion.
pub mod command;

/// Ledger operations executed against a [`world_state::WorldState`] handle.
pub mod ledger;

/// Ordered key-value world state interface, plus "in memory" implementation.
///
/// NOTE: The ledger only needs get, put and range scan. Commit ordering and
/// isolation between concurrent invocations are left to the implementor.
pub mod world_state;

/// Replays a CSV file of invocations. Lives here rather than in the binary
/// so it can be used from integration tests.
pub mod bin_utils;
