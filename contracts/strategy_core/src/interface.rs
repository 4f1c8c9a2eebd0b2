use soroban_sdk::{contractclient, contracttype, Address, Env, String};

use crate::error::StrategyError;

/// Human-readable identity reported by `get_metadata`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StrategyMetadata {
    /// Display name chosen at construction.
    pub name: String,
    /// Label of the backend protocol family.
    pub protocol: String,
    /// Static risk score, 1 (safest) to 10, fixed at construction.
    pub risk_score: u32,
    /// Operational-status flag, settable by the operator.
    pub active: bool,
    /// Market tier the adapter is bound to, when the backend is
    /// tier-segmented; `None` for single-market backends.
    pub tier: Option<u32>,
}

/// The capability contract every adapter satisfies.
///
/// Mutating operations take the caller address explicitly, `require_auth` it
/// and compare it against the stored role, so a wrong caller surfaces as the
/// typed `Unauthorized` error rather than a bare auth trap.
#[contractclient(name = "StrategyClient")]
pub trait Strategy {
    /// Pull `amount` of the underlying asset from the owning vault and place
    /// it in the backend. Returns the backend-issued claim units received.
    /// Vault-only. Runs solvency, drift and slippage guards; any guard
    /// failure aborts the whole deposit.
    fn deposit(env: Env, caller: Address, amount: i128) -> Result<i128, StrategyError>;

    /// Redeem up to `amount` of underlying value back to the vault. The
    /// request is clamped to the position's live value, never rejected for
    /// over-asking. A failing backend degrades to `Ok(0)` ("nothing
    /// recovered this call"), it is not an error.
    fn withdraw(env: Env, caller: Address, amount: i128) -> Result<i128, StrategyError>;

    /// Redeem the entire claim balance back to the vault. `Ok(0)` if the
    /// balance is already zero. Same degradation contract as `withdraw`.
    fn withdraw_all(env: Env, caller: Address) -> Result<i128, StrategyError>;

    /// The backend's liquidity-limited maximum for the adapter's position.
    /// The `owner` argument is ignored: the adapter holds exactly one
    /// position, its own. Returns 0 if the backend query fails.
    fn max_withdraw(env: Env, owner: Address) -> i128;

    /// Current claim balance converted at the backend's live exchange rate.
    fn total_assets(env: Env) -> i128;

    /// Cached advisory APY estimate in basis points. Operator-set, never
    /// derived on-chain; 0 before the first update.
    fn current_apy(env: Env) -> u32;

    /// Update the cached APY estimate. Operator-only.
    fn set_apy(env: Env, caller: Address, apy_bps: u32) -> Result<(), StrategyError>;

    /// Redeem the full position directly to the vault's custody, bypassing
    /// the ordinary guards. Operator-only; a backend failure here is fatal
    /// (`BackendUnavailable`) since no further fallback exists below it.
    fn emergency_withdraw(env: Env, caller: Address) -> Result<i128, StrategyError>;

    /// Display name, protocol label, risk score, active flag and, for
    /// tier-segmented backends, the bound tier.
    fn get_metadata(env: Env) -> StrategyMetadata;

    /// Flip the operational-status flag. Operator-only.
    fn set_active(env: Env, caller: Address, active: bool) -> Result<(), StrategyError>;
}

/// Query/command surface of a standards-compliant tokenized-vault backend.
///
/// Claim units are the backend's own share token; value conversion goes
/// through the backend's exchange-rate functions. Any of these calls may
/// fail at any time and the adapter must tolerate that on withdrawal paths.
#[contractclient(name = "VaultBackendClient")]
pub trait VaultBackend {
    /// Address of the underlying asset the backend accounts in.
    fn asset(env: Env) -> Address;

    /// Deposit `amount` pulled from `from` (requires an allowance); returns
    /// claim units minted to `from`.
    fn deposit(env: Env, from: Address, amount: i128) -> i128;

    /// Burn `claims` held by `from` and send the underlying to `to`;
    /// returns the asset amount paid out.
    fn redeem(env: Env, from: Address, claims: i128, to: Address) -> i128;

    /// Claim units a deposit of `amount` would mint right now.
    fn preview_deposit(env: Env, amount: i128) -> i128;

    /// Claim units a withdrawal of `amount` would burn right now.
    fn preview_withdraw(env: Env, amount: i128) -> i128;

    /// Claim units held by `of`.
    fn balance(env: Env, of: Address) -> i128;

    /// Value of `claims` at the live exchange rate.
    fn convert_to_assets(env: Env, claims: i128) -> i128;

    /// Backend's self-reported total asset value.
    fn total_assets(env: Env) -> i128;

    /// Total claim units outstanding.
    fn total_supply(env: Env) -> i128;

    /// Liquidity-limited maximum `of` could withdraw right now.
    fn max_withdraw(env: Env, of: Address) -> i128;
}

/// Query/command surface of a tiered (risk-segmented) lending market.
///
/// Same accounting concepts as [`VaultBackend`] but every call is scoped to
/// a market tier; one adapter instance binds to exactly one tier.
#[contractclient(name = "TieredMarketClient")]
pub trait TieredMarket {
    /// Underlying asset of the given tier.
    fn market_asset(env: Env, tier: u32) -> Address;

    /// Supply `amount` pulled from `from` into the tier; returns units.
    fn supply(env: Env, tier: u32, from: Address, amount: i128) -> i128;

    /// Burn `units` held by `from` in the tier and pay the underlying to
    /// `to`; returns the amount paid out.
    fn redeem_units(env: Env, tier: u32, from: Address, units: i128, to: Address) -> i128;

    /// Units a supply of `amount` would mint right now.
    fn preview_supply(env: Env, tier: u32, amount: i128) -> i128;

    /// Value redeeming `units` would pay out right now.
    fn preview_redeem(env: Env, tier: u32, units: i128) -> i128;

    /// Units held by `of` in the tier.
    fn units_of(env: Env, tier: u32, of: Address) -> i128;

    /// Value of `units` at the tier's live rate.
    fn units_to_value(env: Env, tier: u32, units: i128) -> i128;

    /// Tier's self-reported total value.
    fn market_value(env: Env, tier: u32) -> i128;

    /// Total units outstanding in the tier.
    fn total_units(env: Env, tier: u32) -> i128;

    /// Liquidity-limited maximum `of` could redeem from the tier right now.
    fn max_redeemable(env: Env, tier: u32, of: Address) -> i128;
}
