use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::AuctionFinanceError;
use crate::types::{pct, Money, Months, Percent};
use crate::AuctionFinanceResult;

/// Monthly periodic rate from an annual percentage: 7.1 -> 0.071 / 12
pub fn monthly_rate(annual_rate: Percent) -> Decimal {
    pct(annual_rate) / dec!(12)
}

/// Level (annuity) payment: P * r(1+r)^n / ((1+r)^n - 1), or P / n when r = 0.
///
/// A non-positive principal is not rejected; the payment simply carries its sign.
pub fn level_payment(principal: Money, rate: Decimal, nper: Months) -> AuctionFinanceResult<Money> {
    if nper == 0 {
        return Err(AuctionFinanceError::DivisionByZero {
            context: "level payment over zero periods".into(),
        });
    }

    let n = Decimal::from(nper);
    if rate.is_zero() {
        return Ok(principal / n);
    }

    let factor = (Decimal::ONE + rate)
        .checked_powi(i64::from(nper))
        .ok_or_else(|| AuctionFinanceError::NonFinite {
            context: format!("compounding factor (1 + {rate})^{nper}"),
        })?;
    let denominator = factor - Decimal::ONE;

    if denominator.is_zero() {
        return Err(AuctionFinanceError::DivisionByZero {
            context: "level payment annuity factor".into(),
        });
    }

    (rate * factor)
        .checked_div(denominator)
        .and_then(|annuity| principal.checked_mul(annuity))
        .ok_or_else(|| AuctionFinanceError::NonFinite {
            context: format!("level payment on {principal} over {nper} periods"),
        })
}

/// `numerator / denominator * 100`, failing instead of overflowing.
pub fn percent_of(numerator: Decimal, denominator: Decimal, context: &str) -> AuctionFinanceResult<Percent> {
    if denominator.is_zero() {
        return Err(AuctionFinanceError::DivisionByZero {
            context: context.to_string(),
        });
    }

    numerator
        .checked_div(denominator)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .ok_or_else(|| AuctionFinanceError::NonFinite {
            context: context.to_string(),
        })
}

/// Discount a future amount over fractional years at an annual percentage rate.
/// Non-positive rates leave the amount unchanged.
pub fn present_value(future_value: Money, annual_rate: Percent, years: Decimal) -> AuctionFinanceResult<Money> {
    if annual_rate <= Decimal::ZERO {
        return Ok(future_value);
    }

    let factor = (Decimal::ONE + pct(annual_rate))
        .checked_powd(years)
        .ok_or_else(|| AuctionFinanceError::NonFinite {
            context: format!("discount factor over {years} years"),
        })?;

    if factor.is_zero() {
        return Err(AuctionFinanceError::DivisionByZero {
            context: "present value discount factor".into(),
        });
    }

    Ok(future_value / factor)
}

/// Compound a holding-period growth ratio into an annual rate (as a fraction).
///
/// `ratio` is ending wealth over starting wealth. A ratio at or below zero means
/// the whole stake was lost and annualises to -100%.
pub fn annualize(ratio: Decimal, months: Months) -> AuctionFinanceResult<Decimal> {
    if months == 0 {
        return Err(AuctionFinanceError::DivisionByZero {
            context: "annualisation over a zero-month holding period".into(),
        });
    }

    if ratio <= Decimal::ZERO {
        return Ok(Decimal::NEGATIVE_ONE);
    }

    let exponent = dec!(12) / Decimal::from(months);
    let grown = ratio
        .checked_powd(exponent)
        .ok_or_else(|| AuctionFinanceError::NonFinite {
            context: format!("annualisation {ratio}^{exponent}"),
        })?;

    Ok(grown - Decimal::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_level_payment_standard_mortgage() {
        // 181,200 at 7.1% over 30 years ≈ 1,217.72
        let pmt = level_payment(dec!(181200), monthly_rate(dec!(7.1)), 360).unwrap();
        assert!((pmt - dec!(1217.72)).abs() < dec!(0.01), "got {pmt}");
    }

    #[test]
    fn test_level_payment_zero_rate() {
        let pmt = level_payment(dec!(120000), Decimal::ZERO, 240).unwrap();
        assert_eq!(pmt, dec!(500));
    }

    #[test]
    fn test_level_payment_zero_periods() {
        assert!(level_payment(dec!(1000), dec!(0.01), 0).is_err());
    }

    #[test]
    fn test_level_payment_negative_principal_keeps_sign() {
        let pmt = level_payment(dec!(-1000), dec!(0.01), 12).unwrap();
        assert!(pmt < Decimal::ZERO);
    }

    #[test]
    fn test_present_value_one_year() {
        let pv = present_value(dec!(110), dec!(10), Decimal::ONE).unwrap();
        assert!((pv - dec!(100)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_present_value_zero_rate_unchanged() {
        assert_eq!(present_value(dec!(250), Decimal::ZERO, dec!(2)).unwrap(), dec!(250));
    }

    #[test]
    fn test_annualize_doubling_over_two_years() {
        // 2x over 24 months ≈ 41.42% a year
        let r = annualize(dec!(2), 24).unwrap();
        assert!((r - dec!(0.41421)).abs() < dec!(0.0001), "got {r}");
    }

    #[test]
    fn test_annualize_total_loss() {
        assert_eq!(annualize(dec!(-0.5), 12).unwrap(), dec!(-1));
    }

    #[test]
    fn test_annualize_zero_months() {
        assert!(annualize(dec!(1.1), 0).is_err());
    }

    #[test]
    fn test_annualize_extreme_ratio_over_one_month_is_non_finite() {
        // 1272x in a month compounds past Decimal's range over a year
        let err = annualize(dec!(1272.79), 1).unwrap_err();
        assert!(matches!(err, AuctionFinanceError::NonFinite { .. }), "got {err:?}");
    }

    #[test]
    fn test_level_payment_overflowing_factor_is_non_finite() {
        // 1000% a year over 50 years
        let err = level_payment(dec!(100000), monthly_rate(dec!(1000)), 600).unwrap_err();
        assert!(matches!(err, AuctionFinanceError::NonFinite { .. }), "got {err:?}");
    }

    #[test]
    fn test_percent_of_guards() {
        assert_eq!(percent_of(dec!(1), dec!(4), "ratio").unwrap(), dec!(25));
        assert!(matches!(
            percent_of(dec!(1), Decimal::ZERO, "ratio"),
            Err(AuctionFinanceError::DivisionByZero { .. })
        ));
        assert!(matches!(
            percent_of(dec!(1000000000000000), dec!(0.0000000000000000000001), "ratio"),
            Err(AuctionFinanceError::NonFinite { .. })
        ));
    }
}
