//! Checked fixed-point exponential and natural logarithm on i128.
//!
//! Both routines run at an internal scale of 10^12, five guard digits above
//! the contract's 10^7 wire scale, so cost deltas derived from them land
//! within one wire unit of the real-valued answer. Deterministic integer
//! math only: any step that cannot be represented fails with
//! `Error::Overflow` instead of wrapping or saturating.

use crate::error::Error;

/// Internal fixed-point scale (10^12).
pub const PRECISION: i128 = 1_000_000_000_000;

/// ln(2) at PRECISION scale.
pub const LN2: i128 = 693_147_180_560;

/// Largest argument magnitude accepted by `exp`. Exponents of q/b beyond
/// this are far outside economically reachable states for any realistic b,
/// and the cap keeps the 2^k scale-back and the cost function's
/// b-multiplication inside i128 range.
pub const MAX_EXP_ARG: i128 = 40 * PRECISION;

const EXP_TAYLOR_TERMS: i128 = 12;

/// e^x at PRECISION scale.
///
/// The argument is reduced by the nearest integer multiple of ln(2) so the
/// Taylor series runs on |r| <= ln(2)/2, then the result is scaled back by
/// 2^k. Arguments above `MAX_EXP_ARG` fail with `Overflow`; arguments below
/// `-MAX_EXP_ARG` underflow to zero.
pub fn exp(x: i128) -> Result<i128, Error> {
    if x > MAX_EXP_ARG {
        return Err(Error::Overflow);
    }
    if x < -MAX_EXP_ARG {
        return Ok(0);
    }

    let half = LN2 / 2;
    let k = if x >= 0 { (x + half) / LN2 } else { (x - half) / LN2 };
    let r = x - k * LN2;

    // e^r = 1 + r + r^2/2! + ... with |r| <= ln(2)/2; twelve terms leave
    // the truncation tail far below one unit at PRECISION scale.
    let mut sum = PRECISION;
    let mut term = PRECISION;
    let mut n: i128 = 1;
    while n <= EXP_TAYLOR_TERMS {
        term = term
            .checked_mul(r)
            .ok_or(Error::Overflow)?
            .checked_div(n.checked_mul(PRECISION).ok_or(Error::Overflow)?)
            .ok_or(Error::Overflow)?;
        if term == 0 {
            break;
        }
        sum = sum.checked_add(term).ok_or(Error::Overflow)?;
        n += 1;
    }

    if k >= 0 {
        if k > 100 {
            return Err(Error::Overflow);
        }
        sum.checked_mul(1i128 << k).ok_or(Error::Overflow)
    } else {
        let shift = -k;
        if shift > 126 {
            return Ok(0);
        }
        Ok(sum >> (shift as u32))
    }
}

/// ln(x) at PRECISION scale. Fails with `Overflow` for x <= 0.
///
/// Powers of two are factored out until the mantissa m lies in [1, 2),
/// then ln(m) = 2 * atanh((m - 1) / (m + 1)) is evaluated by series and
/// the k * ln(2) contribution added back.
pub fn ln(x: i128) -> Result<i128, Error> {
    if x <= 0 {
        return Err(Error::Overflow);
    }

    let mut m = x;
    let mut k: i128 = 0;
    while m >= 2 * PRECISION {
        m /= 2;
        k += 1;
    }
    while m < PRECISION {
        m = m.checked_mul(2).ok_or(Error::Overflow)?;
        k -= 1;
    }

    // z = (m - 1) / (m + 1) lies in [0, 1/3); odd powers through z^19
    // bound the truncation tail below a handful of units.
    let z = (m - PRECISION)
        .checked_mul(PRECISION)
        .ok_or(Error::Overflow)?
        .checked_div(m + PRECISION)
        .ok_or(Error::Overflow)?;
    let z_sq = z
        .checked_mul(z)
        .ok_or(Error::Overflow)?
        .checked_div(PRECISION)
        .ok_or(Error::Overflow)?;

    let mut sum = z;
    let mut power = z;
    let mut n: i128 = 3;
    while n <= 19 {
        power = power
            .checked_mul(z_sq)
            .ok_or(Error::Overflow)?
            .checked_div(PRECISION)
            .ok_or(Error::Overflow)?;
        sum = sum.checked_add(power / n).ok_or(Error::Overflow)?;
        n += 2;
    }

    let series = sum.checked_mul(2).ok_or(Error::Overflow)?;
    let scaled_k = k.checked_mul(LN2).ok_or(Error::Overflow)?;
    series.checked_add(scaled_k).ok_or(Error::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exp_of_zero_is_one() {
        assert_eq!(exp(0).unwrap(), PRECISION);
    }

    #[test]
    fn exp_of_one() {
        // e = 2.718281828459...
        let e = exp(PRECISION).unwrap();
        assert!((e - 2_718_281_828_459).abs() < 1_000, "e^1 = {}", e);
    }

    #[test]
    fn exp_of_ln2_is_exactly_two() {
        assert_eq!(exp(LN2).unwrap(), 2 * PRECISION);
        assert_eq!(exp(-LN2).unwrap(), PRECISION / 2);
    }

    #[test]
    fn exp_of_ten() {
        // e^10 = 22026.4657948...
        let e10 = exp(10 * PRECISION).unwrap();
        assert!(
            (e10 - 22_026_465_794_806_718).abs() < 5_000_000,
            "e^10 = {}",
            e10
        );
    }

    #[test]
    fn exp_underflows_to_zero() {
        assert_eq!(exp(-MAX_EXP_ARG - 1).unwrap(), 0);
    }

    #[test]
    fn exp_overflow_above_cap() {
        assert_eq!(exp(MAX_EXP_ARG + 1), Err(Error::Overflow));
    }

    #[test]
    fn ln_of_one_is_zero() {
        assert_eq!(ln(PRECISION).unwrap(), 0);
    }

    #[test]
    fn ln_of_two_is_ln2() {
        assert_eq!(ln(2 * PRECISION).unwrap(), LN2);
    }

    #[test]
    fn ln_of_e() {
        let ln_e = ln(2_718_281_828_459).unwrap();
        assert!((ln_e - PRECISION).abs() < 1_000, "ln(e) = {}", ln_e);
    }

    #[test]
    fn ln_rejects_nonpositive() {
        assert_eq!(ln(0), Err(Error::Overflow));
        assert_eq!(ln(-PRECISION), Err(Error::Overflow));
    }

    #[test]
    fn ln_exp_round_trip() {
        for &x in &[-5 * PRECISION, -PRECISION / 3, 0, PRECISION / 7, 3 * PRECISION] {
            let back = ln(exp(x).unwrap().max(1)).unwrap();
            assert!((back - x).abs() < 10_000, "round trip of {} gave {}", x, back);
        }
    }
}
