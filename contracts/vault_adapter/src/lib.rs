#![no_std]

//! Strategy adapter for a standards-compliant tokenized-vault backend.
//!
//! The adapter owns a single position of backend claim units. The owning
//! vault drives deposits and withdrawals through the uniform [`Strategy`]
//! interface; the privileged operator owns the APY estimate, the active
//! flag and the emergency recovery path. Emergency proceeds always land in
//! the vault's custody, never the operator's.

use soroban_sdk::{contract, contractimpl, contracttype, token, Address, Env, String};
use strategy_core::{
    events, guards, Strategy, StrategyError, StrategyMetadata, VaultBackendClient,
};

/// Instance storage. Everything except `CachedApy`, `LastPrice` and
/// `Active` is immutable after `initialize`.
#[contracttype]
#[derive(Clone)]
enum DataKey {
    Vault,
    Operator,
    Asset,
    Backend,
    Name,
    RiskScore,
    Active,
    CachedApy,
    LastPrice,
}

#[contract]
pub struct VaultAdapter;

#[contractimpl]
impl VaultAdapter {
    /// Bind the adapter to its owning vault, operator, underlying asset and
    /// backend. Fails with `ConfigurationInvalid` if the backend's declared
    /// asset does not match `asset` or `risk_score` is outside `1..=10`; the
    /// adapter must never come into existence in a bad configuration.
    pub fn initialize(
        env: Env,
        vault: Address,
        operator: Address,
        asset: Address,
        backend: Address,
        name: String,
        risk_score: u32,
    ) -> Result<(), StrategyError> {
        if env.storage().instance().has(&DataKey::Vault) {
            panic!("already initialized");
        }
        if risk_score == 0 || risk_score > 10 {
            return Err(StrategyError::ConfigurationInvalid);
        }
        let declared = VaultBackendClient::new(&env, &backend).asset();
        if declared != asset {
            return Err(StrategyError::ConfigurationInvalid);
        }

        env.storage().instance().set(&DataKey::Vault, &vault);
        env.storage().instance().set(&DataKey::Operator, &operator);
        env.storage().instance().set(&DataKey::Asset, &asset);
        env.storage().instance().set(&DataKey::Backend, &backend);
        env.storage().instance().set(&DataKey::Name, &name);
        env.storage().instance().set(&DataKey::RiskScore, &risk_score);
        env.storage().instance().set(&DataKey::Active, &true);

        events::initialized(&env, &vault, &backend);
        Ok(())
    }

    fn vault(env: &Env) -> Address {
        env.storage().instance().get(&DataKey::Vault).expect("not initialized")
    }

    fn operator(env: &Env) -> Address {
        env.storage().instance().get(&DataKey::Operator).expect("not initialized")
    }

    fn asset(env: &Env) -> Address {
        env.storage().instance().get(&DataKey::Asset).expect("not initialized")
    }

    fn backend_address(env: &Env) -> Address {
        env.storage().instance().get(&DataKey::Backend).expect("not initialized")
    }

    fn backend<'a>(env: &'a Env) -> VaultBackendClient<'a> {
        VaultBackendClient::new(env, &Self::backend_address(env))
    }

    fn require_vault(env: &Env, caller: &Address) -> Result<(), StrategyError> {
        caller.require_auth();
        if *caller != Self::vault(env) {
            return Err(StrategyError::Unauthorized);
        }
        Ok(())
    }

    fn require_operator(env: &Env, caller: &Address) -> Result<(), StrategyError> {
        caller.require_auth();
        if *caller != Self::operator(env) {
            return Err(StrategyError::Unauthorized);
        }
        Ok(())
    }
}

#[contractimpl]
impl Strategy for VaultAdapter {
    fn deposit(env: Env, caller: Address, amount: i128) -> Result<i128, StrategyError> {
        Self::require_vault(&env, &caller)?;
        if amount <= 0 {
            return Err(StrategyError::InvalidAmount);
        }

        let backend = Self::backend(&env);

        // Both guards run before any funds move. A failing backend call on
        // this path aborts the deposit as a whole.
        let implied = backend.convert_to_assets(&backend.total_supply());
        guards::check_solvency(backend.total_assets(), implied)?;

        let live_price = backend.convert_to_assets(&guards::PRICE_SAMPLE);
        let cached: i128 = env.storage().instance().get(&DataKey::LastPrice).unwrap_or(0);
        guards::check_price_drift(cached, live_price)?;
        // The observation updates on every passed check, whether or not the
        // deposit itself goes through.
        env.storage().instance().set(&DataKey::LastPrice, &live_price);

        let expected = backend.preview_deposit(&amount);

        let this = env.current_contract_address();
        let backend_addr = Self::backend_address(&env);
        let asset = token::Client::new(&env, &Self::asset(&env));
        asset.transfer(&caller, &this, &amount);

        // Temporary allowance for the backend's pull, revoked right after
        // the call so no standing allowance survives the deposit.
        let expiry = env.ledger().sequence() + 1;
        asset.approve(&this, &backend_addr, &amount, &expiry);
        let received = backend.deposit(&this, &amount);
        asset.approve(&this, &backend_addr, &0, &0);

        guards::check_deposit_slippage(expected, received)?;

        events::deposit(&env, amount, received);
        Ok(received)
    }

    fn withdraw(env: Env, caller: Address, amount: i128) -> Result<i128, StrategyError> {
        Self::require_vault(&env, &caller)?;
        if amount <= 0 {
            return Err(StrategyError::InvalidAmount);
        }

        let backend = Self::backend(&env);
        let this = env.current_contract_address();

        // Every backend call below may fail (paused backend); each failure
        // degrades to "nothing recovered this call" so the vault can fall
        // back to other backends.
        let held = match backend.try_balance(&this) {
            Ok(Ok(v)) => v,
            _ => return Ok(0),
        };
        if held == 0 {
            return Ok(0);
        }
        let total = match backend.try_convert_to_assets(&held) {
            Ok(Ok(v)) => v,
            _ => return Ok(0),
        };
        let want = amount.min(total);
        if want <= 0 {
            return Ok(0);
        }

        let mut claims = match backend.try_preview_withdraw(&want) {
            Ok(Ok(v)) => v,
            _ => return Ok(0),
        };
        if claims > held {
            claims = held;
        }

        let vault = Self::vault(&env);
        let received = match backend.try_redeem(&this, &claims, &vault) {
            Ok(Ok(v)) => v,
            _ => return Ok(0),
        };

        // A backend that answered but shorted us is a guard failure, not an
        // availability failure.
        guards::check_withdraw_slippage(want, received)?;

        events::withdraw(&env, received, claims);
        Ok(received)
    }

    fn withdraw_all(env: Env, caller: Address) -> Result<i128, StrategyError> {
        Self::require_vault(&env, &caller)?;

        let backend = Self::backend(&env);
        let this = env.current_contract_address();

        let held = match backend.try_balance(&this) {
            Ok(Ok(v)) => v,
            _ => return Ok(0),
        };
        if held == 0 {
            return Ok(0);
        }
        let expected = match backend.try_convert_to_assets(&held) {
            Ok(Ok(v)) => v,
            _ => return Ok(0),
        };

        let vault = Self::vault(&env);
        let received = match backend.try_redeem(&this, &held, &vault) {
            Ok(Ok(v)) => v,
            _ => return Ok(0),
        };

        guards::check_withdraw_slippage(expected, received)?;

        events::withdraw(&env, received, held);
        Ok(received)
    }

    fn max_withdraw(env: Env, _owner: Address) -> i128 {
        let this = env.current_contract_address();
        match Self::backend(&env).try_max_withdraw(&this) {
            Ok(Ok(v)) => v,
            _ => 0,
        }
    }

    fn total_assets(env: Env) -> i128 {
        let backend = Self::backend(&env);
        let held = backend.balance(&env.current_contract_address());
        backend.convert_to_assets(&held)
    }

    fn current_apy(env: Env) -> u32 {
        env.storage().instance().get(&DataKey::CachedApy).unwrap_or(0)
    }

    fn set_apy(env: Env, caller: Address, apy_bps: u32) -> Result<(), StrategyError> {
        Self::require_operator(&env, &caller)?;
        let old: u32 = env.storage().instance().get(&DataKey::CachedApy).unwrap_or(0);
        env.storage().instance().set(&DataKey::CachedApy, &apy_bps);
        events::apy_updated(&env, old, apy_bps);
        Ok(())
    }

    fn emergency_withdraw(env: Env, caller: Address) -> Result<i128, StrategyError> {
        Self::require_operator(&env, &caller)?;

        let backend = Self::backend(&env);
        let this = env.current_contract_address();

        let held = match backend.try_balance(&this) {
            Ok(Ok(v)) => v,
            _ => return Err(StrategyError::BackendUnavailable),
        };
        if held == 0 {
            return Ok(0);
        }

        let vault = Self::vault(&env);
        let received = match backend.try_redeem(&this, &held, &vault) {
            Ok(Ok(v)) => v,
            _ => return Err(StrategyError::BackendUnavailable),
        };

        events::emergency(&env, received);
        Ok(received)
    }

    fn get_metadata(env: Env) -> StrategyMetadata {
        StrategyMetadata {
            name: env.storage().instance().get(&DataKey::Name).expect("not initialized"),
            protocol: String::from_str(&env, "Tokenized Vault"),
            risk_score: env
                .storage()
                .instance()
                .get(&DataKey::RiskScore)
                .expect("not initialized"),
            active: env.storage().instance().get(&DataKey::Active).unwrap_or(false),
            tier: None,
        }
    }

    fn set_active(env: Env, caller: Address, active: bool) -> Result<(), StrategyError> {
        Self::require_operator(&env, &caller)?;
        env.storage().instance().set(&DataKey::Active, &active);
        events::status(&env, active);
        Ok(())
    }
}
