//! Contract events, one per state-changing entry point.

use soroban_sdk::{contractevent, Address, String};

#[contractevent]
pub struct MarketInitialized {
    #[topic]
    pub oracle: Address,
    pub collateral_token: Address,
    pub liquidity_param: i128,
    pub claim_fee_bps: u32,
    pub initial_funding: i128,
    pub metadata_hash: String,
}

#[contractevent]
pub struct TokensPurchased {
    #[topic]
    pub user: Address,
    #[topic]
    pub outcome: u32,
    pub amount: i128,
    pub cost: i128,
}

#[contractevent]
pub struct TokensSold {
    #[topic]
    pub user: Address,
    #[topic]
    pub outcome: u32,
    pub amount: i128,
    pub return_amount: i128,
}

#[contractevent]
pub struct MarketResolved {
    #[topic]
    pub winning_outcome: u32,
    pub oracle: Address,
}

#[contractevent]
pub struct WinningsClaimed {
    #[topic]
    pub user: Address,
    pub gross: i128,
    pub fee: i128,
    pub payout: i128,
}

#[contractevent]
pub struct RemainingWithdrawn {
    #[topic]
    pub oracle: Address,
    pub amount: i128,
}
