#![no_std]

use soroban_sdk::{
    contract, contracterror, contractevent, contractimpl, contracttype, Address, BytesN, Env,
    String, Vec,
};

/// Hard ceiling on the default claim fee handed to new markets (10%).
pub const MAX_CLAIM_FEE_BPS: u32 = 1_000;

/// Failure codes surfaced to the host.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum FactoryError {
    /// Setup was already performed
    AlreadyInitialized = 1,
    /// Factory has not been set up yet
    NotInitialized = 2,
    /// Caller is not the factory admin
    Unauthorized = 3,
    /// No market registered at the requested index
    IndexOutOfBounds = 4,
    /// Default claim fee above the allowed maximum
    InvalidFee = 5,
}

/// Template settings applied to every market this factory deploys.
/// Stored as one record; the admin edits fields through the setters below.
#[derive(Clone)]
#[contracttype]
pub struct DeployDefaults {
    pub market_wasm_hash: BytesN<32>,
    pub collateral_token: Address,
    pub claim_fee_bps: u32,
}

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    /// Principal allowed to deploy markets and edit the defaults
    Admin,
    /// The DeployDefaults record
    Defaults,
    /// Append-only list of markets this factory instantiated
    Registry,
}

#[contractevent]
pub struct FactoryInitialized {
    #[topic]
    pub admin: Address,
    pub default_collateral_token: Address,
    pub default_claim_fee_bps: u32,
}

#[contractevent]
pub struct MarketDeployed {
    #[topic]
    pub market: Address,
    pub oracle: Address,
    pub liquidity_param: i128,
    pub initial_funding: i128,
    pub index: u32,
}

#[contractevent]
pub struct MarketWasmHashUpdated {
    pub new_wasm_hash: BytesN<32>,
}

#[contractevent]
pub struct DefaultCollateralUpdated {
    pub new_token: Address,
}

#[contractevent]
pub struct DefaultClaimFeeUpdated {
    pub new_fee_bps: u32,
}

/// Market Factory Contract
///
/// Instantiates prediction markets at addresses deterministic in
/// (factory, salt) and keeps an on-chain registry of everything it has
/// deployed. The market's constructor runs inside the deploy, so a market
/// that fails to initialize never lands in the registry.
#[contract]
pub struct MarketFactory;

#[contractimpl]
impl MarketFactory {
    /// Initialize the factory.
    ///
    /// # Arguments
    /// * `admin` - Address that can deploy markets and update defaults
    /// * `market_wasm_hash` - WASM hash of the market contract
    /// * `default_collateral_token` - Collateral token given to new markets
    /// * `default_claim_fee_bps` - Claim fee given to new markets
    pub fn initialize(
        env: Env,
        admin: Address,
        market_wasm_hash: BytesN<32>,
        default_collateral_token: Address,
        default_claim_fee_bps: u32,
    ) -> Result<(), FactoryError> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(FactoryError::AlreadyInitialized);
        }
        if default_claim_fee_bps > MAX_CLAIM_FEE_BPS {
            return Err(FactoryError::InvalidFee);
        }

        admin.require_auth();

        let defaults = DeployDefaults {
            market_wasm_hash,
            collateral_token: default_collateral_token.clone(),
            claim_fee_bps: default_claim_fee_bps,
        };
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Defaults, &defaults);
        env.storage()
            .instance()
            .set(&DataKey::Registry, &Vec::<Address>::new(&env));

        FactoryInitialized {
            admin,
            default_collateral_token,
            default_claim_fee_bps,
        }
        .publish(&env);

        Ok(())
    }

    /// Deploy a new prediction market (admin only).
    ///
    /// The market address is deterministic in (factory, salt). The market's
    /// constructor runs as part of the deploy with the factory's default
    /// collateral token and claim fee, so a failed initialization reverts
    /// the entire call. The oracle funds the market and must also authorize
    /// the transaction.
    ///
    /// # Arguments
    /// * `oracle` - Address that can resolve the market
    /// * `liquidity_param` - LMSR b parameter (scaled by 10^7)
    /// * `metadata_hash` - Content hash of the market description
    /// * `initial_funding` - Collateral to fund the market
    /// * `salt` - Unique salt for deterministic address generation
    ///
    /// # Returns
    /// Address of the deployed market contract
    pub fn deploy_market(
        env: Env,
        oracle: Address,
        liquidity_param: i128,
        metadata_hash: String,
        initial_funding: i128,
        salt: BytesN<32>,
    ) -> Result<Address, FactoryError> {
        let admin = Self::admin(&env)?;
        admin.require_auth();

        let defaults = Self::defaults(&env)?;

        let market = env.deployer().with_current_contract(salt).deploy_v2(
            defaults.market_wasm_hash,
            (
                oracle.clone(),
                defaults.collateral_token,
                liquidity_param,
                defaults.claim_fee_bps,
                metadata_hash,
                initial_funding,
            ),
        );

        let mut registry = Self::registry(&env)?;
        registry.push_back(market.clone());
        env.storage().instance().set(&DataKey::Registry, &registry);

        MarketDeployed {
            market: market.clone(),
            oracle,
            liquidity_param,
            initial_funding,
            index: registry.len() - 1,
        }
        .publish(&env);

        Ok(market)
    }

    /// Every market this factory has deployed, oldest first.
    pub fn list_markets(env: Env) -> Result<Vec<Address>, FactoryError> {
        Self::registry(&env)
    }

    /// How many markets have been deployed.
    pub fn market_count(env: Env) -> Result<u32, FactoryError> {
        Ok(Self::registry(&env)?.len())
    }

    /// Look up a deployed market by its position in the registry.
    pub fn get_market(env: Env, index: u32) -> Result<Address, FactoryError> {
        Self::registry(&env)?
            .get(index)
            .ok_or(FactoryError::IndexOutOfBounds)
    }

    /// The admin principal.
    pub fn get_admin(env: Env) -> Result<Address, FactoryError> {
        Self::admin(&env)
    }

    /// WASM hash new markets are instantiated from.
    pub fn get_market_wasm_hash(env: Env) -> Result<BytesN<32>, FactoryError> {
        Ok(Self::defaults(&env)?.market_wasm_hash)
    }

    /// Collateral token handed to new markets.
    pub fn get_default_collateral_token(env: Env) -> Result<Address, FactoryError> {
        Ok(Self::defaults(&env)?.collateral_token)
    }

    /// Claim fee handed to new markets.
    pub fn get_default_claim_fee_bps(env: Env) -> Result<u32, FactoryError> {
        Ok(Self::defaults(&env)?.claim_fee_bps)
    }

    /// Point the factory at a new market build (admin only).
    pub fn set_market_wasm_hash(
        env: Env,
        admin: Address,
        new_wasm_hash: BytesN<32>,
    ) -> Result<(), FactoryError> {
        Self::require_admin(&env, &admin)?;

        let mut defaults = Self::defaults(&env)?;
        defaults.market_wasm_hash = new_wasm_hash.clone();
        env.storage().instance().set(&DataKey::Defaults, &defaults);

        MarketWasmHashUpdated { new_wasm_hash }.publish(&env);

        Ok(())
    }

    /// Change the collateral token for future markets (admin only).
    pub fn set_default_collateral_token(
        env: Env,
        admin: Address,
        new_token: Address,
    ) -> Result<(), FactoryError> {
        Self::require_admin(&env, &admin)?;

        let mut defaults = Self::defaults(&env)?;
        defaults.collateral_token = new_token.clone();
        env.storage().instance().set(&DataKey::Defaults, &defaults);

        DefaultCollateralUpdated { new_token }.publish(&env);

        Ok(())
    }

    /// Change the claim fee for future markets (admin only).
    pub fn set_default_claim_fee(
        env: Env,
        admin: Address,
        new_fee_bps: u32,
    ) -> Result<(), FactoryError> {
        Self::require_admin(&env, &admin)?;

        if new_fee_bps > MAX_CLAIM_FEE_BPS {
            return Err(FactoryError::InvalidFee);
        }

        let mut defaults = Self::defaults(&env)?;
        defaults.claim_fee_bps = new_fee_bps;
        env.storage().instance().set(&DataKey::Defaults, &defaults);

        DefaultClaimFeeUpdated { new_fee_bps }.publish(&env);

        Ok(())
    }

    // --- Typed storage reads; a missing entry means no setup happened ---

    fn admin(env: &Env) -> Result<Address, FactoryError> {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(FactoryError::NotInitialized)
    }

    fn defaults(env: &Env) -> Result<DeployDefaults, FactoryError> {
        env.storage()
            .instance()
            .get(&DataKey::Defaults)
            .ok_or(FactoryError::NotInitialized)
    }

    fn registry(env: &Env) -> Result<Vec<Address>, FactoryError> {
        env.storage()
            .instance()
            .get(&DataKey::Registry)
            .ok_or(FactoryError::NotInitialized)
    }

    /// Caller must be the stored admin and must have signed.
    fn require_admin(env: &Env, caller: &Address) -> Result<(), FactoryError> {
        if *caller != Self::admin(env)? {
            return Err(FactoryError::Unauthorized);
        }
        caller.require_auth();
        Ok(())
    }
}
