//! Saturating arithmetic for engine quantities
//!
//! `Decimal` panics when a product or sum leaves its range. Records reach the
//! engine from HTTP and JS callers, so quantities pin to the range limits
//! instead.

use rust_decimal::Decimal;

fn limit_for(negative: bool) -> Decimal {
    if negative {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

pub(crate) fn saturating_mul(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b)
        .unwrap_or_else(|| limit_for(a.is_sign_negative() != b.is_sign_negative()))
}

pub(crate) fn saturating_sum<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().fold(Decimal::ZERO, |total, value| {
        total
            .checked_add(value)
            .unwrap_or_else(|| limit_for(value.is_sign_negative()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_matches_plain_arithmetic() {
        let a = Decimal::new(62, 1);
        let b = Decimal::from(3);
        assert_eq!(saturating_mul(a, b), a * b);
        assert_eq!(saturating_sum([a, b, Decimal::ONE]), a + b + Decimal::ONE);
        assert_eq!(saturating_sum(Vec::new()), Decimal::ZERO);
    }

    #[test]
    fn test_overflow_pins_to_limits() {
        let two = Decimal::from(2);
        assert_eq!(saturating_mul(Decimal::MAX, two), Decimal::MAX);
        assert_eq!(saturating_mul(Decimal::MAX, -two), Decimal::MIN);
        assert_eq!(saturating_mul(Decimal::MIN, -two), Decimal::MAX);
        assert_eq!(saturating_sum([Decimal::MAX, Decimal::ONE]), Decimal::MAX);
        assert_eq!(saturating_sum([Decimal::MIN, -Decimal::ONE]), Decimal::MIN);
    }
}
