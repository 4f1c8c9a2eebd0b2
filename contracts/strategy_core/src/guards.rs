//! Guard math shared by all adapters.
//!
//! The thresholds are fixed constants, not configuration: changing any of
//! them changes the protocol's risk posture and must be a redeploy, not a
//! runtime toggle.

use crate::error::StrategyError;

/// Maximum acceptable shortfall between expected and actual outcome of a
/// deposit or withdrawal, in basis points (2%).
pub const SLIPPAGE_TOLERANCE_BPS: i128 = 200;

/// A backend whose reported value sits more than this far below its
/// claim-implied value is treated as impaired (5%).
pub const INSOLVENCY_THRESHOLD_BPS: i128 = 500;

/// A price-per-claim drop larger than this since the last observed value
/// trips the exploit heuristic (5%).
pub const DRIFT_THRESHOLD_BPS: i128 = 500;

pub const BPS_DENOMINATOR: i128 = 10_000;

/// Sample size for price-per-claim observations: one whole claim unit at
/// Stellar's 7 decimals.
pub const PRICE_SAMPLE: i128 = 10_000_000;

/// Smallest acceptable outcome for an expectation of `expected`, i.e.
/// `expected` shaved by the slippage tolerance. The boundary itself passes.
pub fn min_after_tolerance(expected: i128) -> i128 {
    expected * (BPS_DENOMINATOR - SLIPPAGE_TOLERANCE_BPS) / BPS_DENOMINATOR
}

/// Deposit-side slippage: actual claims received must reach the previewed
/// claims minus tolerance.
pub fn check_deposit_slippage(expected_claims: i128, actual_claims: i128) -> Result<(), StrategyError> {
    if actual_claims < min_after_tolerance(expected_claims) {
        return Err(StrategyError::SlippageExceeded);
    }
    Ok(())
}

/// Withdraw-side slippage: value received must reach the (clamped) request
/// minus tolerance.
pub fn check_withdraw_slippage(requested: i128, received: i128) -> Result<(), StrategyError> {
    if received < min_after_tolerance(requested) {
        return Err(StrategyError::SlippageExceeded);
    }
    Ok(())
}

/// Solvency guard: the backend's self-reported total value must not sit more
/// than the threshold below the value implied by converting its total claim
/// supply at its own rate. An empty backend has nothing to be insolvent
/// about.
pub fn check_solvency(reported: i128, implied: i128) -> Result<(), StrategyError> {
    if implied <= 0 {
        return Ok(());
    }
    if reported < implied * (BPS_DENOMINATOR - INSOLVENCY_THRESHOLD_BPS) / BPS_DENOMINATOR {
        return Err(StrategyError::BackendInsolvent);
    }
    Ok(())
}

/// Exploit/drift guard: the live price per claim unit must not have dropped
/// more than the threshold since the cached observation. A zero cache means
/// no prior observation exists yet.
pub fn check_price_drift(cached: i128, live: i128) -> Result<(), StrategyError> {
    if cached <= 0 {
        return Ok(());
    }
    if live < cached * (BPS_DENOMINATOR - DRIFT_THRESHOLD_BPS) / BPS_DENOMINATOR {
        return Err(StrategyError::SuspiciousActivity);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deposit_slippage_boundary_passes() {
        // 990_000 expected -> floor is 970_200
        assert_eq!(check_deposit_slippage(990_000, 990_000), Ok(()));
        assert_eq!(check_deposit_slippage(990_000, 970_200), Ok(()));
    }

    #[test]
    fn deposit_slippage_below_boundary_fails() {
        assert_eq!(
            check_deposit_slippage(990_000, 970_000),
            Err(StrategyError::SlippageExceeded)
        );
        assert_eq!(
            check_deposit_slippage(990_000, 970_199),
            Err(StrategyError::SlippageExceeded)
        );
    }

    #[test]
    fn withdraw_slippage_mirrors_deposit_side() {
        assert_eq!(check_withdraw_slippage(1_000_000, 980_000), Ok(()));
        assert_eq!(
            check_withdraw_slippage(1_000_000, 979_999),
            Err(StrategyError::SlippageExceeded)
        );
    }

    #[test]
    fn zero_expectation_always_passes() {
        assert_eq!(check_deposit_slippage(0, 0), Ok(()));
        assert_eq!(check_withdraw_slippage(0, 0), Ok(()));
    }

    #[test]
    fn solvency_boundary() {
        // 95% of implied is the floor; the floor itself passes
        assert_eq!(check_solvency(950_000, 1_000_000), Ok(()));
        assert_eq!(
            check_solvency(949_999, 1_000_000),
            Err(StrategyError::BackendInsolvent)
        );
        assert_eq!(check_solvency(1_000_000, 1_000_000), Ok(()));
    }

    #[test]
    fn solvency_empty_backend_passes() {
        assert_eq!(check_solvency(0, 0), Ok(()));
        assert_eq!(check_solvency(123, 0), Ok(()));
    }

    #[test]
    fn drift_boundary() {
        let cached = PRICE_SAMPLE; // 1.0
        assert_eq!(check_price_drift(cached, cached), Ok(()));
        assert_eq!(check_price_drift(cached, cached * 95 / 100), Ok(()));
        assert_eq!(
            check_price_drift(cached, cached * 95 / 100 - 1),
            Err(StrategyError::SuspiciousActivity)
        );
    }

    #[test]
    fn drift_without_prior_observation_passes() {
        assert_eq!(check_price_drift(0, PRICE_SAMPLE / 2), Ok(()));
    }

    #[test]
    fn price_rise_never_trips_drift() {
        assert_eq!(check_price_drift(PRICE_SAMPLE, PRICE_SAMPLE * 2), Ok(()));
    }
}
