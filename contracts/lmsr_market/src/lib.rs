#![no_std]

mod error;
mod events;
mod fixed_math;
mod lmsr;
mod pool;
mod storage;

use error::Error;
use events::{
    MarketInitialized, MarketResolved, RemainingWithdrawn, TokensPurchased, TokensSold,
    WinningsClaimed,
};
use soroban_sdk::{
    contract, contractimpl, contracttype, panic_with_error, token, Address, Env, String,
};
use storage::{
    MarketConfig, BPS_DENOMINATOR, MAX_CLAIM_FEE_BPS, MAX_FUNDING, OUTCOME_NO, OUTCOME_YES,
};

/// Snapshot of the market's trading state.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarketState {
    pub q_yes: i128,
    pub q_no: i128,
    pub liquidity_param: i128,
    pub collateral_pool: i128,
    pub resolved: bool,
}

/// Binary prediction market with an always-on LMSR market maker.
///
/// Traders exchange collateral for YES/NO outcome tokens at prices that
/// follow the scoring rule deterministically. A designated oracle declares
/// the winning outcome; winners then redeem one unit of collateral per
/// token, less the claim fee the market was created with, and the oracle
/// sweeps whatever the pool still holds.
#[contract]
pub struct LmsrMarket;

#[contractimpl]
impl LmsrMarket {
    /// Constructor: called automatically when deployed via the factory.
    ///
    /// Delegates to initialize() so a failed setup reverts the deploy.
    pub fn __constructor(
        env: Env,
        oracle: Address,
        collateral_token: Address,
        liquidity_param: i128,
        claim_fee_bps: u32,
        metadata_hash: String,
        initial_funding: i128,
    ) {
        if let Err(err) = Self::initialize(
            env.clone(),
            oracle,
            collateral_token,
            liquidity_param,
            claim_fee_bps,
            metadata_hash,
            initial_funding,
        ) {
            panic_with_error!(&env, err);
        }
    }

    /// Initialize the market.
    ///
    /// Can be called directly for manual deployment, or via the constructor
    /// for factory deployment. All configuration is frozen afterwards.
    ///
    /// # Arguments
    /// * `oracle` - Address that can resolve the market; provides the funding
    /// * `collateral_token` - Token contract used as collateral
    /// * `liquidity_param` - LMSR b parameter (scaled by 10^7)
    /// * `claim_fee_bps` - Fee withheld from claims, in basis points
    /// * `metadata_hash` - Content hash of the off-chain market description
    /// * `initial_funding` - Collateral to fund the market; must exceed
    ///   ceil(b * ln 2), the LMSR worst-case loss bound
    pub fn initialize(
        env: Env,
        oracle: Address,
        collateral_token: Address,
        liquidity_param: i128,
        claim_fee_bps: u32,
        metadata_hash: String,
        initial_funding: i128,
    ) -> Result<(), Error> {
        if storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        if liquidity_param <= 0 {
            return Err(Error::InvalidLiquidity);
        }
        if claim_fee_bps > MAX_CLAIM_FEE_BPS {
            return Err(Error::InvalidFee);
        }

        let required = lmsr::minimum_funding(liquidity_param)?;
        if initial_funding < required {
            return Err(Error::InvalidAmount);
        }
        if initial_funding > MAX_FUNDING {
            return Err(Error::Overflow);
        }

        // Oracle must authorize: the initial funding is pulled from them.
        oracle.require_auth();
        let token_client = token::Client::new(&env, &collateral_token);
        token_client.transfer(&oracle, &env.current_contract_address(), &initial_funding);

        storage::set_config(
            &env,
            &MarketConfig {
                oracle: oracle.clone(),
                collateral_token: collateral_token.clone(),
                liquidity_param,
                claim_fee_bps,
                metadata_hash: metadata_hash.clone(),
            },
        );
        storage::set_outstanding(&env, OUTCOME_YES, 0);
        storage::set_outstanding(&env, OUTCOME_NO, 0);
        pool::fund(&env, initial_funding);

        MarketInitialized {
            oracle,
            collateral_token,
            liquidity_param,
            claim_fee_bps,
            initial_funding,
            metadata_hash,
        }
        .publish(&env);

        Ok(())
    }

    /// Buy outcome tokens.
    ///
    /// # Arguments
    /// * `user` - Buyer (must authorize)
    /// * `outcome` - 0 for YES, 1 for NO
    /// * `amount` - Tokens to buy (scaled by 10^7)
    /// * `max_cost` - Slippage bound; the call fails if the computed cost
    ///   exceeds it, protecting against state changes between quote and fill
    ///
    /// # Returns
    /// Actual collateral paid
    pub fn buy(
        env: Env,
        user: Address,
        outcome: u32,
        amount: i128,
        max_cost: i128,
    ) -> Result<i128, Error> {
        Self::require_open(&env)?;
        Self::require_valid_outcome(outcome)?;
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        user.require_auth();

        let config = storage::config(&env)?;
        let q_yes = storage::outstanding(&env, OUTCOME_YES)?;
        let q_no = storage::outstanding(&env, OUTCOME_NO)?;

        let cost = lmsr::buy_cost(q_yes, q_no, amount, outcome, config.liquidity_param)?;
        if cost > max_cost {
            return Err(Error::SlippageExceeded);
        }

        // Pull collateral, then commit the ledger updates.
        let token_client = token::Client::new(&env, &config.collateral_token);
        token_client.transfer(&user, &env.current_contract_address(), &cost);

        let q_outcome = if outcome == OUTCOME_YES { q_yes } else { q_no };
        let updated = q_outcome.checked_add(amount).ok_or(Error::Overflow)?;
        storage::set_outstanding(&env, outcome, updated);
        pool::deposit(&env, cost)?;

        let position = storage::position(&env, &user, outcome);
        let credited = position.checked_add(amount).ok_or(Error::Overflow)?;
        storage::set_position(&env, &user, outcome, credited);

        TokensPurchased { user, outcome, amount, cost }.publish(&env);

        Ok(cost)
    }

    /// Sell outcome tokens back to the market.
    ///
    /// # Arguments
    /// * `user` - Seller (must authorize)
    /// * `outcome` - 0 for YES, 1 for NO
    /// * `amount` - Tokens to sell (scaled by 10^7)
    /// * `min_return` - Slippage bound; the call fails if the computed
    ///   return falls below it
    ///
    /// # Returns
    /// Actual collateral received
    pub fn sell(
        env: Env,
        user: Address,
        outcome: u32,
        amount: i128,
        min_return: i128,
    ) -> Result<i128, Error> {
        Self::require_open(&env)?;
        Self::require_valid_outcome(outcome)?;
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        user.require_auth();

        let position = storage::position(&env, &user, outcome);
        if position < amount {
            return Err(Error::InsufficientBalance);
        }

        let config = storage::config(&env)?;
        let q_yes = storage::outstanding(&env, OUTCOME_YES)?;
        let q_no = storage::outstanding(&env, OUTCOME_NO)?;

        let return_amount = lmsr::sell_return(q_yes, q_no, amount, outcome, config.liquidity_param)?;
        if return_amount < min_return {
            return Err(Error::ReturnTooLow);
        }

        let q_outcome = if outcome == OUTCOME_YES { q_yes } else { q_no };
        let updated = q_outcome.checked_sub(amount).ok_or(Error::Overflow)?;
        storage::set_outstanding(&env, outcome, updated);
        pool::withdraw(&env, return_amount)?;
        storage::set_position(&env, &user, outcome, position - amount);

        // Collateral leaves last, after every ledger update.
        let token_client = token::Client::new(&env, &config.collateral_token);
        token_client.transfer(&env.current_contract_address(), &user, &return_amount);

        TokensSold { user, outcome, amount, return_amount }.publish(&env);

        Ok(return_amount)
    }

    /// Resolve the market (oracle only).
    ///
    /// # Arguments
    /// * `oracle` - Must match the oracle set at initialization
    /// * `winning_outcome` - 0 for YES, 1 for NO
    pub fn resolve(env: Env, oracle: Address, winning_outcome: u32) -> Result<(), Error> {
        Self::require_open(&env)?;
        Self::require_valid_outcome(winning_outcome)?;

        let config = storage::config(&env)?;
        if oracle != config.oracle {
            return Err(Error::Unauthorized);
        }
        oracle.require_auth();

        storage::set_winner(&env, winning_outcome);

        MarketResolved { winning_outcome, oracle }.publish(&env);

        Ok(())
    }

    /// Claim winnings after resolution.
    ///
    /// Each winning token redeems for one unit of collateral, minus the
    /// claim fee fixed at initialization. The fee stays in the pool and is
    /// recovered by the oracle via withdraw_remaining. Losing tokens have
    /// zero value and cannot be claimed.
    ///
    /// # Returns
    /// Collateral paid out (after fee)
    pub fn claim(env: Env, user: Address) -> Result<i128, Error> {
        Self::require_initialized(&env)?;
        let winning_outcome = Self::require_resolved(&env)?;

        user.require_auth();

        let gross = storage::position(&env, &user, winning_outcome);
        if gross <= 0 {
            return Err(Error::NothingToClaim);
        }

        // Floor division truncates the fee to zero on dust-level amounts.
        let config = storage::config(&env)?;
        let fee = gross
            .checked_mul(config.claim_fee_bps as i128)
            .ok_or(Error::Overflow)?
            .checked_div(BPS_DENOMINATOR)
            .ok_or(Error::Overflow)?;
        let payout = gross.checked_sub(fee).ok_or(Error::Overflow)?;

        storage::set_position(&env, &user, winning_outcome, 0);
        pool::withdraw(&env, payout)?;

        let token_client = token::Client::new(&env, &config.collateral_token);
        token_client.transfer(&env.current_contract_address(), &user, &payout);

        WinningsClaimed { user, gross, fee, payout }.publish(&env);

        Ok(payout)
    }

    /// Withdraw the remaining pool after resolution (oracle only).
    ///
    /// After winners claim, the pool still holds losers' premia, accumulated
    /// claim fees, and leftover initial funding. The oracle sweeps it here.
    ///
    /// # Returns
    /// Amount of collateral withdrawn
    pub fn withdraw_remaining(env: Env, oracle: Address) -> Result<i128, Error> {
        Self::require_initialized(&env)?;
        Self::require_resolved(&env)?;

        let config = storage::config(&env)?;
        if oracle != config.oracle {
            return Err(Error::Unauthorized);
        }
        oracle.require_auth();

        let amount = pool::drain(&env)?;

        let token_client = token::Client::new(&env, &config.collateral_token);
        token_client.transfer(&env.current_contract_address(), &oracle, &amount);

        RemainingWithdrawn { oracle, amount }.publish(&env);

        Ok(amount)
    }

    /// Get the current price of an outcome.
    ///
    /// # Returns
    /// Price scaled by 10^7 (5_000_000 = 0.5 = 50%)
    pub fn get_price(env: Env, outcome: u32) -> Result<i128, Error> {
        Self::require_initialized(&env)?;

        let config = storage::config(&env)?;
        let q_yes = storage::outstanding(&env, OUTCOME_YES)?;
        let q_no = storage::outstanding(&env, OUTCOME_NO)?;

        lmsr::price(q_yes, q_no, outcome, config.liquidity_param)
    }

    /// Quote a buy without mutating state.
    ///
    /// # Returns
    /// (cost, price_after) both scaled by 10^7
    pub fn get_quote(env: Env, outcome: u32, amount: i128) -> Result<(i128, i128), Error> {
        Self::require_open(&env)?;
        Self::require_valid_outcome(outcome)?;
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let config = storage::config(&env)?;
        let q_yes = storage::outstanding(&env, OUTCOME_YES)?;
        let q_no = storage::outstanding(&env, OUTCOME_NO)?;

        let cost = lmsr::buy_cost(q_yes, q_no, amount, outcome, config.liquidity_param)?;

        let (new_q_yes, new_q_no) = if outcome == OUTCOME_YES {
            (q_yes.checked_add(amount).ok_or(Error::Overflow)?, q_no)
        } else {
            (q_yes, q_no.checked_add(amount).ok_or(Error::Overflow)?)
        };
        let price_after = lmsr::price(new_q_yes, new_q_no, outcome, config.liquidity_param)?;

        Ok((cost, price_after))
    }

    /// Quote a sell without mutating state.
    ///
    /// # Returns
    /// (return_amount, price_after) both scaled by 10^7
    pub fn get_sell_quote(env: Env, outcome: u32, amount: i128) -> Result<(i128, i128), Error> {
        Self::require_open(&env)?;
        Self::require_valid_outcome(outcome)?;
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let config = storage::config(&env)?;
        let q_yes = storage::outstanding(&env, OUTCOME_YES)?;
        let q_no = storage::outstanding(&env, OUTCOME_NO)?;

        let return_amount = lmsr::sell_return(q_yes, q_no, amount, outcome, config.liquidity_param)?;

        let (new_q_yes, new_q_no) = if outcome == OUTCOME_YES {
            (q_yes - amount, q_no)
        } else {
            (q_yes, q_no - amount)
        };
        let price_after = lmsr::price(new_q_yes, new_q_no, outcome, config.liquidity_param)?;

        Ok((return_amount, price_after))
    }

    /// Get user's token balance for an outcome.
    pub fn get_balance(env: Env, user: Address, outcome: u32) -> i128 {
        storage::position(&env, &user, outcome)
    }

    /// Get the market's trading state, including the liquidity parameter.
    pub fn get_state(env: Env) -> Result<MarketState, Error> {
        Self::require_initialized(&env)?;

        Ok(MarketState {
            q_yes: storage::outstanding(&env, OUTCOME_YES)?,
            q_no: storage::outstanding(&env, OUTCOME_NO)?,
            liquidity_param: storage::config(&env)?.liquidity_param,
            collateral_pool: pool::balance(&env)?,
            resolved: storage::is_resolved(&env),
        })
    }

    /// Get the oracle address.
    pub fn get_oracle(env: Env) -> Result<Address, Error> {
        Self::require_initialized(&env)?;
        Ok(storage::config(&env)?.oracle)
    }

    /// Get the liquidity parameter.
    pub fn get_liquidity_param(env: Env) -> Result<i128, Error> {
        Self::require_initialized(&env)?;
        Ok(storage::config(&env)?.liquidity_param)
    }

    /// Get the claim fee in basis points.
    pub fn get_claim_fee_bps(env: Env) -> Result<u32, Error> {
        Self::require_initialized(&env)?;
        Ok(storage::config(&env)?.claim_fee_bps)
    }

    /// Get the winning outcome (only valid after resolution).
    pub fn get_winning_outcome(env: Env) -> Result<u32, Error> {
        Self::require_initialized(&env)?;
        Self::require_resolved(&env)
    }

    /// Get the metadata hash (content address of the market description).
    pub fn get_metadata_hash(env: Env) -> Result<String, Error> {
        Self::require_initialized(&env)?;
        Ok(storage::config(&env)?.metadata_hash)
    }

    /// Get the collateral token address.
    pub fn get_collateral_token(env: Env) -> Result<Address, Error> {
        Self::require_initialized(&env)?;
        Ok(storage::config(&env)?.collateral_token)
    }

    // --- Internal helpers ---

    fn require_initialized(env: &Env) -> Result<(), Error> {
        if !storage::is_initialized(env) {
            return Err(Error::NotInitialized);
        }
        Ok(())
    }

    fn require_open(env: &Env) -> Result<(), Error> {
        Self::require_initialized(env)?;
        if storage::is_resolved(env) {
            return Err(Error::AlreadyResolved);
        }
        Ok(())
    }

    /// The winning outcome, or NotResolved while the market is open.
    fn require_resolved(env: &Env) -> Result<u32, Error> {
        storage::winner(env).ok_or(Error::NotResolved)
    }

    fn require_valid_outcome(outcome: u32) -> Result<(), Error> {
        if outcome != OUTCOME_YES && outcome != OUTCOME_NO {
            return Err(Error::InvalidOutcome);
        }
        Ok(())
    }
}
