//! Collateral pool accountant.
//!
//! Every read and write of the pool goes through this module, so the
//! pool >= 0 invariant is enforced at a single call site per direction.

use soroban_sdk::Env;

use crate::error::Error;
use crate::storage::DataKey;

pub fn balance(env: &Env) -> Result<i128, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Pool)
        .ok_or(Error::StorageCorrupted)
}

/// Set the pool to the initial funding amount. Called once, from initialize.
pub fn fund(env: &Env, amount: i128) {
    env.storage().instance().set(&DataKey::Pool, &amount);
}

pub fn deposit(env: &Env, amount: i128) -> Result<(), Error> {
    let pool = balance(env)?;
    let updated = pool.checked_add(amount).ok_or(Error::Overflow)?;
    env.storage().instance().set(&DataKey::Pool, &updated);
    Ok(())
}

/// Deduct `amount` from the pool, failing rather than going below zero.
pub fn withdraw(env: &Env, amount: i128) -> Result<(), Error> {
    let pool = balance(env)?;
    if pool < amount {
        return Err(Error::InsufficientPool);
    }
    env.storage().instance().set(&DataKey::Pool, &(pool - amount));
    Ok(())
}

/// Empty the pool, returning the swept amount.
pub fn drain(env: &Env) -> Result<i128, Error> {
    let pool = balance(env)?;
    if pool <= 0 {
        return Err(Error::NothingToClaim);
    }
    env.storage().instance().set(&DataKey::Pool, &0i128);
    Ok(pool)
}
