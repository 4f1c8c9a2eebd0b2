use soroban_sdk::contracterror;

/// Failure kinds surfaced by every strategy adapter.
///
/// The calling vault reacts differently per kind (e.g. pause deposits to a
/// backend on `SuspiciousActivity`, retry later on `BackendUnavailable`), so
/// guard failures must never collapse into a generic error.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum StrategyError {
    /// Caller is not the role the operation is gated to.
    Unauthorized = 1,
    /// Zero or otherwise invalid amount argument.
    InvalidAmount = 2,
    /// Received value fell below the fixed tolerance on deposit or withdraw.
    SlippageExceeded = 3,
    /// Backend's reported value is materially below its claim-implied value.
    BackendInsolvent = 4,
    /// Backend's price per claim unit dropped abruptly since last observed.
    SuspiciousActivity = 5,
    /// Backend call failed where no zero-fallback exists (emergency path).
    BackendUnavailable = 6,
    /// Construction-time asset mismatch or out-of-range parameter.
    ConfigurationInvalid = 7,
}
