//! Configurable in-process backends for adapter tests.
//!
//! Both mocks account value as `units * rate / SCALE` with `SCALE = 10^7`
//! (rate 10^7 means 1:1). Knobs:
//! - `set_rate` moves the live exchange rate;
//! - `set_reported` overrides the self-reported total value (insolvency
//!   scenarios) without touching the real accounting;
//! - `set_mint_skew_bps` shaves actually-minted units below the preview
//!   (slippage scenarios);
//! - `set_fail_*` makes the matching entry points panic ("paused" backend).
//!
//! Deposits pull the underlying via `transfer_from`, so they exercise the
//! adapter's temporary-allowance handling. Redemptions pay from the mock's
//! own token balance; tests simulating yield mint extra tokens to the mock
//! and raise the rate.

use soroban_sdk::{contract, contractimpl, contracttype, token, Address, Env};

use crate::interface::{TieredMarket, VaultBackend};

pub const SCALE: i128 = 10_000_000;

pub use tier_mock::{MockTieredMarket, MockTieredMarketClient};
pub use vault_mock::{MockVaultBackend, MockVaultBackendClient};

// The two mocks live in separate submodules because `#[contractimpl]`
// generates module-level symbols named after each method, and the mocks
// share method names (`init`, `set_rate`, ...).
mod vault_mock {
    use super::*;

#[contracttype]
#[derive(Clone)]
enum MockKey {
    Asset,
    Rate,
    Reported,
    MintSkewBps,
    NextMint,
    TotalUnits,
    MaxCap,
    FailDeposit,
    FailRedeem,
    FailPreview,
    FailQueries,
    FailMax,
    Units(Address),
}

fn flag(env: &Env, key: &MockKey) -> bool {
    env.storage().instance().get(key).unwrap_or(false)
}

#[contract]
pub struct MockVaultBackend;

#[contractimpl]
impl MockVaultBackend {
    pub fn init(env: Env, asset: Address) {
        env.storage().instance().set(&MockKey::Asset, &asset);
        env.storage().instance().set(&MockKey::Rate, &SCALE);
        env.storage().instance().set(&MockKey::TotalUnits, &0i128);
    }

    pub fn set_rate(env: Env, rate: i128) {
        env.storage().instance().set(&MockKey::Rate, &rate);
    }

    pub fn set_reported(env: Env, reported: i128) {
        env.storage().instance().set(&MockKey::Reported, &reported);
    }

    pub fn set_mint_skew_bps(env: Env, bps: u32) {
        env.storage().instance().set(&MockKey::MintSkewBps, &bps);
    }

    /// Exact unit count the next deposit mints, overriding the rate-derived
    /// amount once. Lets tests hit precise slippage boundaries.
    pub fn set_next_mint(env: Env, units: i128) {
        env.storage().instance().set(&MockKey::NextMint, &units);
    }

    pub fn set_max_cap(env: Env, cap: i128) {
        env.storage().instance().set(&MockKey::MaxCap, &cap);
    }

    pub fn set_fail_deposit(env: Env, fail: bool) {
        env.storage().instance().set(&MockKey::FailDeposit, &fail);
    }

    pub fn set_fail_redeem(env: Env, fail: bool) {
        env.storage().instance().set(&MockKey::FailRedeem, &fail);
    }

    pub fn set_fail_preview(env: Env, fail: bool) {
        env.storage().instance().set(&MockKey::FailPreview, &fail);
    }

    pub fn set_fail_queries(env: Env, fail: bool) {
        env.storage().instance().set(&MockKey::FailQueries, &fail);
    }

    pub fn set_fail_max(env: Env, fail: bool) {
        env.storage().instance().set(&MockKey::FailMax, &fail);
    }

    fn rate(env: &Env) -> i128 {
        env.storage().instance().get(&MockKey::Rate).unwrap_or(SCALE)
    }

    fn units(env: &Env, of: &Address) -> i128 {
        env.storage()
            .instance()
            .get(&MockKey::Units(of.clone()))
            .unwrap_or(0)
    }
}

#[contractimpl]
impl VaultBackend for MockVaultBackend {
    fn asset(env: Env) -> Address {
        env.storage().instance().get(&MockKey::Asset).unwrap()
    }

    fn deposit(env: Env, from: Address, amount: i128) -> i128 {
        if flag(&env, &MockKey::FailDeposit) {
            panic!("backend deposit disabled");
        }
        let asset: Address = env.storage().instance().get(&MockKey::Asset).unwrap();
        let this = env.current_contract_address();
        token::Client::new(&env, &asset).transfer_from(&this, &from, &this, &amount);

        let minted = if let Some(next) = env.storage().instance().get(&MockKey::NextMint) {
            env.storage().instance().remove(&MockKey::NextMint);
            next
        } else {
            let ideal = amount * SCALE / Self::rate(&env);
            let skew: u32 = env
                .storage()
                .instance()
                .get(&MockKey::MintSkewBps)
                .unwrap_or(0);
            ideal * (10_000 - skew as i128) / 10_000
        };

        env.storage()
            .instance()
            .set(&MockKey::Units(from.clone()), &(Self::units(&env, &from) + minted));
        let total: i128 = env.storage().instance().get(&MockKey::TotalUnits).unwrap_or(0);
        env.storage().instance().set(&MockKey::TotalUnits, &(total + minted));
        minted
    }

    fn redeem(env: Env, from: Address, claims: i128, to: Address) -> i128 {
        if flag(&env, &MockKey::FailRedeem) {
            panic!("backend redeem disabled");
        }
        let held = Self::units(&env, &from);
        if claims > held {
            panic!("insufficient units");
        }
        env.storage()
            .instance()
            .set(&MockKey::Units(from.clone()), &(held - claims));
        let total: i128 = env.storage().instance().get(&MockKey::TotalUnits).unwrap_or(0);
        env.storage().instance().set(&MockKey::TotalUnits, &(total - claims));

        let amount = claims * Self::rate(&env) / SCALE;
        let asset: Address = env.storage().instance().get(&MockKey::Asset).unwrap();
        token::Client::new(&env, &asset).transfer(&env.current_contract_address(), &to, &amount);
        amount
    }

    fn preview_deposit(env: Env, amount: i128) -> i128 {
        if flag(&env, &MockKey::FailPreview) {
            panic!("backend preview disabled");
        }
        amount * SCALE / Self::rate(&env)
    }

    fn preview_withdraw(env: Env, amount: i128) -> i128 {
        if flag(&env, &MockKey::FailPreview) {
            panic!("backend preview disabled");
        }
        let rate = Self::rate(&env);
        (amount * SCALE + rate - 1) / rate
    }

    fn balance(env: Env, of: Address) -> i128 {
        if flag(&env, &MockKey::FailQueries) {
            panic!("backend queries disabled");
        }
        Self::units(&env, &of)
    }

    fn convert_to_assets(env: Env, claims: i128) -> i128 {
        if flag(&env, &MockKey::FailQueries) {
            panic!("backend queries disabled");
        }
        claims * Self::rate(&env) / SCALE
    }

    fn total_assets(env: Env) -> i128 {
        if flag(&env, &MockKey::FailQueries) {
            panic!("backend queries disabled");
        }
        if let Some(reported) = env.storage().instance().get(&MockKey::Reported) {
            return reported;
        }
        let total: i128 = env.storage().instance().get(&MockKey::TotalUnits).unwrap_or(0);
        total * Self::rate(&env) / SCALE
    }

    fn total_supply(env: Env) -> i128 {
        if flag(&env, &MockKey::FailQueries) {
            panic!("backend queries disabled");
        }
        env.storage().instance().get(&MockKey::TotalUnits).unwrap_or(0)
    }

    fn max_withdraw(env: Env, of: Address) -> i128 {
        if flag(&env, &MockKey::FailMax) {
            panic!("backend max disabled");
        }
        let held_value = Self::units(&env, &of) * Self::rate(&env) / SCALE;
        match env.storage().instance().get::<_, i128>(&MockKey::MaxCap) {
            Some(cap) if cap < held_value => cap,
            _ => held_value,
        }
    }
}
}

mod tier_mock {
    use super::*;

#[contracttype]
#[derive(Clone)]
enum TierKey {
    Asset,
    Rate(u32),
    Reported(u32),
    MintSkewBps,
    NextMint,
    TotalUnits(u32),
    MaxCap(u32),
    FailSupply,
    FailRedeem,
    FailPreview,
    FailQueries,
    FailMax,
    Units(u32, Address),
}

fn tier_flag(env: &Env, key: &TierKey) -> bool {
    env.storage().instance().get(key).unwrap_or(false)
}

#[contract]
pub struct MockTieredMarket;

#[contractimpl]
impl MockTieredMarket {
    pub fn init(env: Env, asset: Address) {
        env.storage().instance().set(&TierKey::Asset, &asset);
    }

    pub fn set_rate(env: Env, tier: u32, rate: i128) {
        env.storage().instance().set(&TierKey::Rate(tier), &rate);
    }

    pub fn set_reported(env: Env, tier: u32, reported: i128) {
        env.storage().instance().set(&TierKey::Reported(tier), &reported);
    }

    pub fn set_mint_skew_bps(env: Env, bps: u32) {
        env.storage().instance().set(&TierKey::MintSkewBps, &bps);
    }

    /// Exact unit count the next supply mints, overriding the rate-derived
    /// amount once.
    pub fn set_next_mint(env: Env, units: i128) {
        env.storage().instance().set(&TierKey::NextMint, &units);
    }

    pub fn set_max_cap(env: Env, tier: u32, cap: i128) {
        env.storage().instance().set(&TierKey::MaxCap(tier), &cap);
    }

    pub fn set_fail_supply(env: Env, fail: bool) {
        env.storage().instance().set(&TierKey::FailSupply, &fail);
    }

    pub fn set_fail_redeem(env: Env, fail: bool) {
        env.storage().instance().set(&TierKey::FailRedeem, &fail);
    }

    pub fn set_fail_preview(env: Env, fail: bool) {
        env.storage().instance().set(&TierKey::FailPreview, &fail);
    }

    pub fn set_fail_queries(env: Env, fail: bool) {
        env.storage().instance().set(&TierKey::FailQueries, &fail);
    }

    pub fn set_fail_max(env: Env, fail: bool) {
        env.storage().instance().set(&TierKey::FailMax, &fail);
    }

    fn rate(env: &Env, tier: u32) -> i128 {
        env.storage().instance().get(&TierKey::Rate(tier)).unwrap_or(SCALE)
    }

    fn units(env: &Env, tier: u32, of: &Address) -> i128 {
        env.storage()
            .instance()
            .get(&TierKey::Units(tier, of.clone()))
            .unwrap_or(0)
    }
}

#[contractimpl]
impl TieredMarket for MockTieredMarket {
    fn market_asset(env: Env, _tier: u32) -> Address {
        env.storage().instance().get(&TierKey::Asset).unwrap()
    }

    fn supply(env: Env, tier: u32, from: Address, amount: i128) -> i128 {
        if tier_flag(&env, &TierKey::FailSupply) {
            panic!("market supply disabled");
        }
        let asset: Address = env.storage().instance().get(&TierKey::Asset).unwrap();
        let this = env.current_contract_address();
        token::Client::new(&env, &asset).transfer_from(&this, &from, &this, &amount);

        let minted = if let Some(next) = env.storage().instance().get(&TierKey::NextMint) {
            env.storage().instance().remove(&TierKey::NextMint);
            next
        } else {
            let ideal = amount * SCALE / Self::rate(&env, tier);
            let skew: u32 = env
                .storage()
                .instance()
                .get(&TierKey::MintSkewBps)
                .unwrap_or(0);
            ideal * (10_000 - skew as i128) / 10_000
        };

        env.storage().instance().set(
            &TierKey::Units(tier, from.clone()),
            &(Self::units(&env, tier, &from) + minted),
        );
        let total: i128 = env
            .storage()
            .instance()
            .get(&TierKey::TotalUnits(tier))
            .unwrap_or(0);
        env.storage()
            .instance()
            .set(&TierKey::TotalUnits(tier), &(total + minted));
        minted
    }

    fn redeem_units(env: Env, tier: u32, from: Address, units: i128, to: Address) -> i128 {
        if tier_flag(&env, &TierKey::FailRedeem) {
            panic!("market redeem disabled");
        }
        let held = Self::units(&env, tier, &from);
        if units > held {
            panic!("insufficient units");
        }
        env.storage()
            .instance()
            .set(&TierKey::Units(tier, from.clone()), &(held - units));
        let total: i128 = env
            .storage()
            .instance()
            .get(&TierKey::TotalUnits(tier))
            .unwrap_or(0);
        env.storage()
            .instance()
            .set(&TierKey::TotalUnits(tier), &(total - units));

        let amount = units * Self::rate(&env, tier) / SCALE;
        let asset: Address = env.storage().instance().get(&TierKey::Asset).unwrap();
        token::Client::new(&env, &asset).transfer(&env.current_contract_address(), &to, &amount);
        amount
    }

    fn preview_supply(env: Env, tier: u32, amount: i128) -> i128 {
        if tier_flag(&env, &TierKey::FailPreview) {
            panic!("market preview disabled");
        }
        amount * SCALE / Self::rate(&env, tier)
    }

    fn preview_redeem(env: Env, tier: u32, units: i128) -> i128 {
        if tier_flag(&env, &TierKey::FailPreview) {
            panic!("market preview disabled");
        }
        units * Self::rate(&env, tier) / SCALE
    }

    fn units_of(env: Env, tier: u32, of: Address) -> i128 {
        if tier_flag(&env, &TierKey::FailQueries) {
            panic!("market queries disabled");
        }
        Self::units(&env, tier, &of)
    }

    fn units_to_value(env: Env, tier: u32, units: i128) -> i128 {
        if tier_flag(&env, &TierKey::FailQueries) {
            panic!("market queries disabled");
        }
        units * Self::rate(&env, tier) / SCALE
    }

    fn market_value(env: Env, tier: u32) -> i128 {
        if tier_flag(&env, &TierKey::FailQueries) {
            panic!("market queries disabled");
        }
        if let Some(reported) = env.storage().instance().get(&TierKey::Reported(tier)) {
            return reported;
        }
        let total: i128 = env
            .storage()
            .instance()
            .get(&TierKey::TotalUnits(tier))
            .unwrap_or(0);
        total * Self::rate(&env, tier) / SCALE
    }

    fn total_units(env: Env, tier: u32) -> i128 {
        if tier_flag(&env, &TierKey::FailQueries) {
            panic!("market queries disabled");
        }
        env.storage()
            .instance()
            .get(&TierKey::TotalUnits(tier))
            .unwrap_or(0)
    }

    fn max_redeemable(env: Env, tier: u32, of: Address) -> i128 {
        if tier_flag(&env, &TierKey::FailMax) {
            panic!("market max disabled");
        }
        let held_value = Self::units(&env, tier, &of) * Self::rate(&env, tier) / SCALE;
        match env
            .storage()
            .instance()
            .get::<_, i128>(&TierKey::MaxCap(tier))
        {
            Some(cap) if cap < held_value => cap,
            _ => held_value,
        }
    }
}
}
