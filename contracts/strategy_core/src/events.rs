//! Fixed event vocabulary, shared so every adapter looks identical to
//! off-chain observers. Topics are `("strategy", <op>)`.

use soroban_sdk::{symbol_short, Address, Env, Symbol};

const STRATEGY: Symbol = symbol_short!("strategy");

pub fn initialized(env: &Env, vault: &Address, backend: &Address) {
    env.events().publish(
        (STRATEGY, symbol_short!("init")),
        (vault.clone(), backend.clone()),
    );
}

pub fn deposit(env: &Env, amount: i128, claims: i128) {
    env.events()
        .publish((STRATEGY, symbol_short!("deposit")), (amount, claims));
}

pub fn withdraw(env: &Env, amount: i128, claims: i128) {
    env.events()
        .publish((STRATEGY, symbol_short!("withdraw")), (amount, claims));
}

pub fn emergency(env: &Env, amount: i128) {
    env.events()
        .publish((STRATEGY, symbol_short!("emergency")), amount);
}

pub fn apy_updated(env: &Env, old_bps: u32, new_bps: u32) {
    env.events()
        .publish((STRATEGY, symbol_short!("apy")), (old_bps, new_bps));
}

pub fn status(env: &Env, active: bool) {
    env.events()
        .publish((STRATEGY, symbol_short!("status")), active);
}
