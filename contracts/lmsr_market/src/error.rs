use soroban_sdk::contracterror;

/// Failure codes surfaced to the host. Grouped by phase: lifecycle gates,
/// argument checks, trade settlement, authorization, then arithmetic and
/// storage faults.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// Setup was already performed on this instance
    AlreadyInitialized = 1,
    /// Call arrived before setup
    NotInitialized = 2,
    /// Trading is closed; the winning outcome is fixed
    AlreadyResolved = 3,
    /// No winning outcome has been declared yet
    NotResolved = 4,

    /// Outcome index is neither YES (0) nor NO (1)
    InvalidOutcome = 5,
    /// Non-positive amount, or funding under the worst-case-loss floor
    InvalidAmount = 6,
    /// Liquidity parameter b must be strictly positive
    InvalidLiquidity = 7,
    /// Claim fee above the allowed maximum
    InvalidFee = 8,

    /// Seller holds fewer outcome tokens than requested
    InsufficientBalance = 9,
    /// Computed cost rose above the buyer's max_cost bound
    SlippageExceeded = 10,
    /// Computed return fell below the seller's min_return bound
    ReturnTooLow = 11,
    /// Caller holds no tokens of the winning outcome
    NothingToClaim = 12,

    /// Caller is not the principal this operation is reserved for
    Unauthorized = 13,

    /// A checked arithmetic step left the representable range
    Overflow = 14,
    /// Payout would drive the collateral pool negative
    InsufficientPool = 15,
    /// A required storage entry is missing
    StorageCorrupted = 16,
}
