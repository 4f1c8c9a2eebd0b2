#![no_std]

//! Strategy adapter for a tiered (risk-segmented) lending market.
//!
//! One adapter instance binds to exactly one tier of the market at
//! construction; the tier id is immutable configuration. Apart from how
//! claim-to-value conversion, liquidity limits and metadata are queried,
//! the contract is identical to the tokenized-vault adapter: same guards,
//! same access gating, same events, same degradation behavior. That
//! uniformity is what lets the owning vault swap backends freely.

use soroban_sdk::{contract, contractimpl, contracttype, token, Address, Env, String};
use strategy_core::{
    events, guards, Strategy, StrategyError, StrategyMetadata, TieredMarketClient,
};

#[contracttype]
#[derive(Clone)]
enum DataKey {
    Vault,
    Operator,
    Asset,
    Market,
    Tier,
    Name,
    RiskScore,
    Active,
    CachedApy,
    LastPrice,
}

#[contract]
pub struct TieredAdapter;

#[contractimpl]
impl TieredAdapter {
    /// Bind the adapter to one tier of a tiered market. Fails with
    /// `ConfigurationInvalid` if the tier's declared asset does not match
    /// `asset` or `risk_score` is outside `1..=10`.
    pub fn initialize(
        env: Env,
        vault: Address,
        operator: Address,
        asset: Address,
        market: Address,
        tier: u32,
        name: String,
        risk_score: u32,
    ) -> Result<(), StrategyError> {
        if env.storage().instance().has(&DataKey::Vault) {
            panic!("already initialized");
        }
        if risk_score == 0 || risk_score > 10 {
            return Err(StrategyError::ConfigurationInvalid);
        }
        let declared = TieredMarketClient::new(&env, &market).market_asset(&tier);
        if declared != asset {
            return Err(StrategyError::ConfigurationInvalid);
        }

        env.storage().instance().set(&DataKey::Vault, &vault);
        env.storage().instance().set(&DataKey::Operator, &operator);
        env.storage().instance().set(&DataKey::Asset, &asset);
        env.storage().instance().set(&DataKey::Market, &market);
        env.storage().instance().set(&DataKey::Tier, &tier);
        env.storage().instance().set(&DataKey::Name, &name);
        env.storage().instance().set(&DataKey::RiskScore, &risk_score);
        env.storage().instance().set(&DataKey::Active, &true);

        events::initialized(&env, &vault, &market);
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

    fn market_address(env: &Env) -> Address {
        env.storage().instance().get(&DataKey::Market).expect("not initialized")
    }

    fn tier(env: &Env) -> u32 {
        env.storage().instance().get(&DataKey::Tier).expect("not initialized")
    }

    fn market<'a>(env: &'a Env) -> TieredMarketClient<'a> {
        TieredMarketClient::new(env, &Self::market_address(env))
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
impl Strategy for TieredAdapter {
    fn deposit(env: Env, caller: Address, amount: i128) -> Result<i128, StrategyError> {
        Self::require_vault(&env, &caller)?;
        if amount <= 0 {
            return Err(StrategyError::InvalidAmount);
        }

        let market = Self::market(&env);
        let tier = Self::tier(&env);

        let implied = market.units_to_value(&tier, &market.total_units(&tier));
        guards::check_solvency(market.market_value(&tier), implied)?;

        let live_price = market.units_to_value(&tier, &guards::PRICE_SAMPLE);
        let cached: i128 = env.storage().instance().get(&DataKey::LastPrice).unwrap_or(0);
        guards::check_price_drift(cached, live_price)?;
        env.storage().instance().set(&DataKey::LastPrice, &live_price);

        let expected = market.preview_supply(&tier, &amount);

        let this = env.current_contract_address();
        let market_addr = Self::market_address(&env);
        let asset = token::Client::new(&env, &Self::asset(&env));
        asset.transfer(&caller, &this, &amount);

        let expiry = env.ledger().sequence() + 1;
        asset.approve(&this, &market_addr, &amount, &expiry);
        let received = market.supply(&tier, &this, &amount);
        asset.approve(&this, &market_addr, &0, &0);

        guards::check_deposit_slippage(expected, received)?;

        events::deposit(&env, amount, received);
        Ok(received)
    }

    fn withdraw(env: Env, caller: Address, amount: i128) -> Result<i128, StrategyError> {
        Self::require_vault(&env, &caller)?;
        if amount <= 0 {
            return Err(StrategyError::InvalidAmount);
        }

        let market = Self::market(&env);
        let tier = Self::tier(&env);
        let this = env.current_contract_address();

        let held = match market.try_units_of(&tier, &this) {
            Ok(Ok(v)) => v,
            _ => return Ok(0),
        };
        if held == 0 {
            return Ok(0);
        }
        let total = match market.try_units_to_value(&tier, &held) {
            Ok(Ok(v)) => v,
            _ => return Ok(0),
        };
        let want = amount.min(total);
        if want <= 0 {
            return Ok(0);
        }

        // Tiered markets preview in the redeem direction: probe how much a
        // full redemption pays, then scale units to the clamped request.
        // Units round up so coarse unit values still cover the request.
        let mut units = match market.try_preview_redeem(&tier, &held) {
            Ok(Ok(full_value)) if full_value > 0 => (held * want + full_value - 1) / full_value,
            Ok(Ok(_)) => return Ok(0),
            _ => return Ok(0),
        };
        if units > held {
            units = held;
        }
        if units == 0 {
            return Ok(0);
        }

        let vault = Self::vault(&env);
        let received = match market.try_redeem_units(&tier, &this, &units, &vault) {
            Ok(Ok(v)) => v,
            _ => return Ok(0),
        };

        guards::check_withdraw_slippage(want, received)?;

        events::withdraw(&env, received, units);
        Ok(received)
    }

    fn withdraw_all(env: Env, caller: Address) -> Result<i128, StrategyError> {
        Self::require_vault(&env, &caller)?;

        let market = Self::market(&env);
        let tier = Self::tier(&env);
        let this = env.current_contract_address();

        let held = match market.try_units_of(&tier, &this) {
            Ok(Ok(v)) => v,
            _ => return Ok(0),
        };
        if held == 0 {
            return Ok(0);
        }
        let expected = match market.try_units_to_value(&tier, &held) {
            Ok(Ok(v)) => v,
            _ => return Ok(0),
        };

        let vault = Self::vault(&env);
        let received = match market.try_redeem_units(&tier, &this, &held, &vault) {
            Ok(Ok(v)) => v,
            _ => return Ok(0),
        };

        guards::check_withdraw_slippage(expected, received)?;

        events::withdraw(&env, received, held);
        Ok(received)
    }

    fn max_withdraw(env: Env, _owner: Address) -> i128 {
        let tier = Self::tier(&env);
        let this = env.current_contract_address();
        match Self::market(&env).try_max_redeemable(&tier, &this) {
            Ok(Ok(v)) => v,
            _ => 0,
        }
    }

    fn total_assets(env: Env) -> i128 {
        let market = Self::market(&env);
        let tier = Self::tier(&env);
        let held = market.units_of(&tier, &env.current_contract_address());
        market.units_to_value(&tier, &held)
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

        let market = Self::market(&env);
        let tier = Self::tier(&env);
        let this = env.current_contract_address();

        let held = match market.try_units_of(&tier, &this) {
            Ok(Ok(v)) => v,
            _ => return Err(StrategyError::BackendUnavailable),
        };
        if held == 0 {
            return Ok(0);
        }

        let vault = Self::vault(&env);
        let received = match market.try_redeem_units(&tier, &this, &held, &vault) {
            Ok(Ok(v)) => v,
            _ => return Err(StrategyError::BackendUnavailable),
        };

        events::emergency(&env, received);
        Ok(received)
    }

    fn get_metadata(env: Env) -> StrategyMetadata {
        StrategyMetadata {
            name: env.storage().instance().get(&DataKey::Name).expect("not initialized"),
            protocol: String::from_str(&env, "Tiered Lending Market"),
            risk_score: env
                .storage()
                .instance()
                .get(&DataKey::RiskScore)
                .expect("not initialized"),
            active: env.storage().instance().get(&DataKey::Active).unwrap_or(false),
            tier: Some(Self::tier(&env)),
        }
    }

    fn set_active(env: Env, caller: Address, active: bool) -> Result<(), StrategyError> {
        Self::require_operator(&env, &caller)?;
        env.storage().instance().set(&DataKey::Active, &active);
        events::status(&env, active);
        Ok(())
    }
}
