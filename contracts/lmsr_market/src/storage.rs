//! Persisted layout and typed accessors.
//!
//! The market keeps one immutable `MarketConfig` record written at setup,
//! three mutable instance entries (outstanding quantities, the pool, and
//! the winner), and a persistent position map keyed by (trader, outcome).
//! The winner entry doubles as the resolution flag: it exists if and only
//! if the oracle has resolved. Required reads that come back empty surface
//! `Error::StorageCorrupted`; a missing position reads as zero.

use soroban_sdk::{contracttype, Address, Env, String};

use crate::error::Error;

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    /// Immutable market configuration, written once at setup
    Config,
    /// Net outcome tokens in circulation, keyed by outcome index
    Outstanding(u32),
    /// Collateral units held by the contract
    Pool,
    /// Winning outcome; present only after resolution
    Winner,
    /// A trader's holdings of one outcome: Position(trader, outcome)
    Position(Address, u32),
}

/// Everything fixed at initialization. Stored as a single record so the
/// trade handlers read it in one storage access.
#[derive(Clone)]
#[contracttype]
pub struct MarketConfig {
    pub oracle: Address,
    pub collateral_token: Address,
    pub liquidity_param: i128,
    pub claim_fee_bps: u32,
    pub metadata_hash: String,
}

/// Outcome indices on the wire.
pub const OUTCOME_YES: u32 = 0;
pub const OUTCOME_NO: u32 = 1;

/// Wire-format fixed-point scale: every monetary or probability integer
/// carries seven decimal places, the precision Stellar assets use
/// on-ledger, so contract amounts and token amounts line up one-to-one.
pub const SCALE_FACTOR: i128 = 10_000_000;

/// Denominator for basis-point fees (10_000 bp = 100%).
pub const BPS_DENOMINATOR: i128 = 10_000;

/// Hard ceiling on the claim fee a market can be created with (10%).
pub const MAX_CLAIM_FEE_BPS: u32 = 1_000;

/// Funding amounts above this are refused to keep pool sums well inside
/// i128 range.
pub const MAX_FUNDING: i128 = i128::MAX / 2;

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn config(env: &Env) -> Result<MarketConfig, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::StorageCorrupted)
}

pub fn set_config(env: &Env, config: &MarketConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

/// Net tokens in circulation for one outcome.
pub fn outstanding(env: &Env, outcome: u32) -> Result<i128, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Outstanding(outcome))
        .ok_or(Error::StorageCorrupted)
}

pub fn set_outstanding(env: &Env, outcome: u32, amount: i128) {
    env.storage()
        .instance()
        .set(&DataKey::Outstanding(outcome), &amount);
}

/// The declared winner, or None while the market is still open.
pub fn winner(env: &Env) -> Option<u32> {
    env.storage().instance().get(&DataKey::Winner)
}

pub fn set_winner(env: &Env, outcome: u32) {
    env.storage().instance().set(&DataKey::Winner, &outcome);
}

pub fn is_resolved(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Winner)
}

/// Outcome tokens held by `trader`. Missing entries are zero.
pub fn position(env: &Env, trader: &Address, outcome: u32) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Position(trader.clone(), outcome))
        .unwrap_or(0)
}

pub fn set_position(env: &Env, trader: &Address, outcome: u32, amount: i128) {
    env.storage()
        .persistent()
        .set(&DataKey::Position(trader.clone(), outcome), &amount);
}
