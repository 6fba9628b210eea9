/// Ledger record types ([`record::Asset`], [`record::Investor`]) and the
/// validated trade transition applied to them.
pub mod record;

/// Named operations with ordered string arguments, parsed into typed
/// commands that are later executed by [`contract`].
pub mod command;

/// The accounting contract: the capability interface injected by the ledger
/// host, the error taxonomy, and the stateless operation dispatcher.
/// Includes an "in memory" context implementation used by tests and the
/// driver binary.
pub mod contract;

/// Ideally this would live in its own crate that bootstraps the contract
/// into a binary, but keeping it here lets the integration test reuse it.
pub mod bin_utils;
