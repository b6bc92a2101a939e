//! Logarithmic Market Scoring Rule pricing.
//!
//! The market maker keeps the potential C(q) = b * ln(e^(q_yes/b) + e^(q_no/b))
//! over the outstanding quantities; a trade settles at the change in C it
//! causes, and the quoted probability of an outcome is the corresponding
//! partial derivative of C. Inputs and results use the 10^7 wire scale;
//! the evaluation itself runs at the guard scale of `fixed_math` and is
//! brought back to wire units at the end.

use crate::error::Error;
use crate::fixed_math::{self, LN2, MAX_EXP_ARG, PRECISION};
use crate::storage::{OUTCOME_NO, OUTCOME_YES, SCALE_FACTOR};

/// Ratio between the guard scale and the wire scale (10^5).
const GUARD: i128 = PRECISION / SCALE_FACTOR;

/// q/b as a PRECISION-scaled ratio, gated at the exp argument cap.
fn exponent(q: i128, b: i128) -> Result<i128, Error> {
    let ratio = q
        .checked_mul(PRECISION)
        .ok_or(Error::Overflow)?
        .checked_div(b)
        .ok_or(Error::Overflow)?;
    if ratio > MAX_EXP_ARG {
        return Err(Error::Overflow);
    }
    Ok(ratio)
}

/// The LMSR cost function C(q) in collateral units.
///
/// Evaluated as M + ln(e^(a-M) + e^(c-M)) with M = max(a, c), so the
/// exponent arguments are never positive and e^x stays in (0, 1].
pub fn cost(q_yes: i128, q_no: i128, b: i128) -> Result<i128, Error> {
    if b <= 0 {
        return Err(Error::InvalidLiquidity);
    }

    let a = exponent(q_yes, b)?;
    let c = exponent(q_no, b)?;

    let max = a.max(c);
    let spread = fixed_math::exp(a.min(c) - max)?;
    let log_sum = fixed_math::ln(PRECISION.checked_add(spread).ok_or(Error::Overflow)?)?;
    let inside = max.checked_add(log_sum).ok_or(Error::Overflow)?;

    b.checked_mul(inside)
        .ok_or(Error::Overflow)?
        .checked_div(PRECISION)
        .ok_or(Error::Overflow)
}

/// Cost in collateral to buy `amount` of `outcome` tokens.
pub fn buy_cost(
    q_yes: i128,
    q_no: i128,
    amount: i128,
    outcome: u32,
    b: i128,
) -> Result<i128, Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }

    let cost_before = cost(q_yes, q_no, b)?;
    let cost_after = match outcome {
        OUTCOME_YES => cost(q_yes.checked_add(amount).ok_or(Error::Overflow)?, q_no, b)?,
        OUTCOME_NO => cost(q_yes, q_no.checked_add(amount).ok_or(Error::Overflow)?, b)?,
        _ => return Err(Error::InvalidOutcome),
    };

    cost_after.checked_sub(cost_before).ok_or(Error::Overflow)
}

/// Collateral returned by selling `amount` of `outcome` tokens.
pub fn sell_return(
    q_yes: i128,
    q_no: i128,
    amount: i128,
    outcome: u32,
    b: i128,
) -> Result<i128, Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }

    let cost_before = cost(q_yes, q_no, b)?;
    let cost_after = match outcome {
        OUTCOME_YES => {
            if q_yes < amount {
                return Err(Error::InsufficientBalance);
            }
            cost(q_yes - amount, q_no, b)?
        }
        OUTCOME_NO => {
            if q_no < amount {
                return Err(Error::InsufficientBalance);
            }
            cost(q_yes, q_no - amount, b)?
        }
        _ => return Err(Error::InvalidOutcome),
    };

    cost_before.checked_sub(cost_after).ok_or(Error::Overflow)
}

/// Current price (probability) of an outcome, in [0, SCALE_FACTOR].
///
/// The dominant side is computed by division and the other side as its
/// complement, so price(YES) + price(NO) == SCALE_FACTOR exactly.
pub fn price(q_yes: i128, q_no: i128, outcome: u32, b: i128) -> Result<i128, Error> {
    if b <= 0 {
        return Err(Error::InvalidLiquidity);
    }

    let a = exponent(q_yes, b)?;
    let c = exponent(q_no, b)?;

    let price_yes = if a >= c {
        dominant_price(c - a)?
    } else {
        SCALE_FACTOR - dominant_price(a - c)?
    };

    match outcome {
        OUTCOME_YES => Ok(price_yes),
        OUTCOME_NO => Ok(SCALE_FACTOR - price_yes),
        _ => Err(Error::InvalidOutcome),
    }
}

/// 1 / (1 + e^diff) for diff <= 0, rounded to wire scale.
/// Always lands in [SCALE_FACTOR / 2, SCALE_FACTOR].
fn dominant_price(diff: i128) -> Result<i128, Error> {
    let denominator = PRECISION
        .checked_add(fixed_math::exp(diff)?)
        .ok_or(Error::Overflow)?;
    let scaled = PRECISION
        .checked_mul(PRECISION)
        .ok_or(Error::Overflow)?
        .checked_div(denominator)
        .ok_or(Error::Overflow)?;
    Ok((scaled + GUARD / 2) / GUARD)
}

/// Smallest acceptable initial funding: ceil(b * ln 2) + 1.
///
/// b * ln(2) is the worst-case market-maker loss for a binary LMSR market;
/// the extra unit absorbs integer rounding in the cost bookkeeping.
pub fn minimum_funding(b: i128) -> Result<i128, Error> {
    if b <= 0 {
        return Err(Error::InvalidLiquidity);
    }
    let worst_case = b.checked_mul(LN2).ok_or(Error::Overflow)?;
    let ceiled = worst_case
        .checked_add(PRECISION - 1)
        .ok_or(Error::Overflow)?
        .checked_div(PRECISION)
        .ok_or(Error::Overflow)?;
    ceiled.checked_add(1).ok_or(Error::Overflow)
}
