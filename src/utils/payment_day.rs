/// Last-resort due day when neither the member nor the company settings
/// provide one.
pub const FALLBACK_PAYMENT_DAY: u8 = 10;

/// Which tier of the fallback chain supplied the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentDayTier {
    Member,
    CompanyDefault,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPaymentDay {
    pub day: u8,
    pub tier: PaymentDayTier,
}

/// Precedence: member's own payment_day, then the company's
/// default_payment_day, then [`FALLBACK_PAYMENT_DAY`]. Out-of-range values
/// (outside 1–31) are treated as absent and fall through to the next tier.
pub fn resolve_payment_day(
    member_day: Option<u8>,
    company_default: Option<u8>,
) -> ResolvedPaymentDay {
    if let Some(day) = member_day.filter(|d| in_range(*d)) {
        return ResolvedPaymentDay {
            day,
            tier: PaymentDayTier::Member,
        };
    }

    if let Some(day) = company_default.filter(|d| in_range(*d)) {
        return ResolvedPaymentDay {
            day,
            tier: PaymentDayTier::CompanyDefault,
        };
    }

    ResolvedPaymentDay {
        day: FALLBACK_PAYMENT_DAY,
        tier: PaymentDayTier::Fallback,
    }
}

fn in_range(day: u8) -> bool {
    (1..=31).contains(&day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_day_wins() {
        let resolved = resolve_payment_day(Some(5), Some(20));
        assert_eq!(resolved.day, 5);
        assert_eq!(resolved.tier, PaymentDayTier::Member);
    }

    #[test]
    fn company_default_is_second() {
        let resolved = resolve_payment_day(None, Some(20));
        assert_eq!(resolved.day, 20);
        assert_eq!(resolved.tier, PaymentDayTier::CompanyDefault);
    }

    #[test]
    fn literal_fallback_is_last() {
        let resolved = resolve_payment_day(None, None);
        assert_eq!(resolved.day, FALLBACK_PAYMENT_DAY);
        assert_eq!(resolved.tier, PaymentDayTier::Fallback);
    }

    #[test]
    fn out_of_range_values_fall_through() {
        let resolved = resolve_payment_day(Some(0), Some(32));
        assert_eq!(resolved.day, FALLBACK_PAYMENT_DAY);
        assert_eq!(resolved.tier, PaymentDayTier::Fallback);

        let resolved = resolve_payment_day(Some(40), Some(15));
        assert_eq!(resolved.day, 15);
        assert_eq!(resolved.tier, PaymentDayTier::CompanyDefault);
    }
}
