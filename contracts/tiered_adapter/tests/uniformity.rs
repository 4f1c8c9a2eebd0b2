//! The owning vault drives every adapter through the same opaque client,
//! never branching on which concrete backend sits behind it. This exercises
//! both adapter contracts through `StrategyClient` alone.

use soroban_sdk::{
    testutils::Address as _,
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env, String,
};
use strategy_core::testutils::{MockTieredMarket, MockTieredMarketClient, MockVaultBackend, MockVaultBackendClient};
use strategy_core::{StrategyClient, StrategyError};
use tiered_adapter::TieredAdapter;
use vault_adapter::VaultAdapter;

const FUNDING: i128 = 1_000_000_000;
const DEPOSIT: i128 = 2_500_000;

fn setup() -> (Env, Address, Address, Address, [Address; 2]) {
    let env = Env::default();
    env.mock_all_auths();

    let vault = Address::generate(&env);
    let operator = Address::generate(&env);
    let token_admin = Address::generate(&env);

    let token = env
        .register_stellar_asset_contract_v2(token_admin.clone())
        .address();
    StellarAssetClient::new(&env, &token).mint(&vault, &FUNDING);

    let backend_id = env.register(MockVaultBackend, ());
    MockVaultBackendClient::new(&env, &backend_id).init(&token);

    let market_id = env.register(MockTieredMarket, ());
    MockTieredMarketClient::new(&env, &market_id).init(&token);

    let tokenized_id = env.register(VaultAdapter, ());
    vault_adapter::VaultAdapterClient::new(&env, &tokenized_id).initialize(
        &vault,
        &operator,
        &token,
        &backend_id,
        &String::from_str(&env, "Tokenized Backend"),
        &3u32,
    );

    let tiered_id = env.register(TieredAdapter, ());
    tiered_adapter::TieredAdapterClient::new(&env, &tiered_id).initialize(
        &vault,
        &operator,
        &token,
        &market_id,
        &1u32,
        &String::from_str(&env, "Tiered Backend"),
        &6u32,
    );

    (env, token, vault, operator, [tokenized_id, tiered_id])
}

#[test]
fn full_cycle_is_identical_across_adapters() {
    let (env, token, vault, operator, adapters) = setup();

    for id in adapters.iter() {
        let strategy = StrategyClient::new(&env, id);
        let before = TokenClient::new(&env, &token).balance(&vault);

        let claims = strategy.deposit(&vault, &DEPOSIT);
        assert!(claims > 0);
        assert_eq!(strategy.total_assets(), DEPOSIT);
        assert_eq!(strategy.max_withdraw(&vault), DEPOSIT);

        assert_eq!(strategy.withdraw(&vault, &1_000_000), 1_000_000);
        assert_eq!(strategy.withdraw_all(&vault), DEPOSIT - 1_000_000);
        assert_eq!(strategy.total_assets(), 0);
        assert_eq!(TokenClient::new(&env, &token).balance(&vault), before);

        strategy.set_apy(&operator, &375);
        assert_eq!(strategy.current_apy(), 375);
    }
}

#[test]
fn error_taxonomy_is_identical_across_adapters() {
    let (env, _token, vault, _operator, adapters) = setup();
    let stranger = Address::generate(&env);

    for id in adapters.iter() {
        let strategy = StrategyClient::new(&env, id);
        assert_eq!(
            strategy.try_deposit(&stranger, &DEPOSIT),
            Err(Ok(StrategyError::Unauthorized))
        );
        assert_eq!(
            strategy.try_deposit(&vault, &0),
            Err(Ok(StrategyError::InvalidAmount))
        );
        assert_eq!(
            strategy.try_emergency_withdraw(&vault),
            Err(Ok(StrategyError::Unauthorized))
        );
    }
}

#[test]
fn metadata_distinguishes_backends_behind_one_interface() {
    let (env, _token, _vault, _operator, adapters) = setup();

    let tokenized = StrategyClient::new(&env, &adapters[0]).get_metadata();
    let tiered = StrategyClient::new(&env, &adapters[1]).get_metadata();

    assert_eq!(tokenized.protocol, String::from_str(&env, "Tokenized Vault"));
    assert_eq!(tiered.protocol, String::from_str(&env, "Tiered Lending Market"));
    assert_eq!(tokenized.tier, None);
    assert_eq!(tiered.tier, Some(1));
    assert!(tokenized.active && tiered.active);
}
