use crate::model::payable::BillingCycle;
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use strum_macros::{Display, EnumString};

/// Named reporting periods accepted by the dashboard endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Period {
    #[strum(serialize = "7_days")]
    SevenDays,
    #[strum(serialize = "30_days")]
    ThirtyDays,
    #[strum(serialize = "90_days")]
    NinetyDays,
    #[strum(serialize = "this_month")]
    ThisMonth,
    #[strum(serialize = "this_year")]
    ThisYear,
    #[strum(serialize = "all")]
    All,
}

impl Period {
    /// Unknown tokens fall back to the 30-day window.
    pub fn parse(token: &str) -> Self {
        token.trim().parse().unwrap_or(Period::ThirtyDays)
    }
}

/// Half-open interval ending "now". Both bounds are `None` for the
/// all-time period, and every dependent computation must then skip date
/// filtering entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn is_all_time(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Calendar-date bounds for binding against DATE columns.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start, self.end) {
            (Some(s), Some(e)) => Some((s.date_naive(), e.date_naive())),
            _ => None,
        }
    }
}

pub fn calculate_date_range(period: Period, now: DateTime<Utc>) -> DateRange {
    let start = match period {
        Period::SevenDays => Some(now - Duration::days(7)),
        Period::ThirtyDays => Some(now - Duration::days(30)),
        Period::NinetyDays => Some(now - Duration::days(90)),
        Period::ThisMonth => Some(month_start(now.date_naive()).and_hms_opt(0, 0, 0).unwrap().and_utc()),
        Period::ThisYear => Some(
            NaiveDate::from_ymd_opt(now.year(), 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
                .and_utc(),
        ),
        Period::All => None,
    };

    DateRange {
        start,
        end: start.map(|_| now),
    }
}

/// The immediately preceding interval of identical length, for
/// period-over-period deltas. All-time has no comparison range.
pub fn calculate_comparison_range(range: &DateRange) -> Option<DateRange> {
    let (start, end) = match (range.start, range.end) {
        (Some(s), Some(e)) => (s, e),
        _ => return None,
    };

    let len = end - start;
    Some(DateRange {
        start: Some(start - len),
        end: Some(start),
    })
}

/// How many billing anchors of `cycle` fall inside `[start, end]`
/// inclusive. Monthly anchors are first-of-month dates, annual anchors are
/// January 1st; one-time charges always count once. Used to approximate
/// recurring-charge totals inside a window without materializing every
/// occurrence row.
pub fn count_recurrence_in_period(cycle: BillingCycle, start: NaiveDate, end: NaiveDate) -> u32 {
    if end < start {
        return 0;
    }

    match cycle {
        BillingCycle::OneTime => 1,
        BillingCycle::Monthly => {
            let mut anchor = month_start(start);
            if anchor < start {
                anchor = anchor + Months::new(1);
            }
            let mut count = 0;
            while anchor <= end {
                count += 1;
                anchor = anchor + Months::new(1);
            }
            count
        }
        BillingCycle::Annual => {
            let mut anchor = NaiveDate::from_ymd_opt(start.year(), 1, 1).unwrap();
            if anchor < start {
                anchor = NaiveDate::from_ymd_opt(start.year() + 1, 1, 1).unwrap();
            }
            let mut count = 0;
            while anchor <= end {
                count += 1;
                anchor = NaiveDate::from_ymd_opt(anchor.year() + 1, 1, 1).unwrap();
            }
            count
        }
    }
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 20, 15, 30, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn every_bounded_period_orders_start_before_end() {
        for period in [
            Period::SevenDays,
            Period::ThirtyDays,
            Period::NinetyDays,
            Period::ThisMonth,
            Period::ThisYear,
        ] {
            let range = calculate_date_range(period, now());
            assert!(range.start.unwrap() <= range.end.unwrap(), "{period}");
        }
    }

    #[test]
    fn all_time_has_no_bounds() {
        let range = calculate_date_range(Period::All, now());
        assert!(range.is_all_time());
        assert_eq!(range.date_bounds(), None);
        assert_eq!(calculate_comparison_range(&range), None);
    }

    #[test]
    fn unknown_tokens_default_to_thirty_days() {
        assert_eq!(Period::parse("7_days"), Period::SevenDays);
        assert_eq!(Period::parse("this_month"), Period::ThisMonth);
        assert_eq!(Period::parse(""), Period::ThirtyDays);
        assert_eq!(Period::parse("fortnight"), Period::ThirtyDays);
    }

    #[test]
    fn this_month_starts_on_the_first() {
        let range = calculate_date_range(Period::ThisMonth, now());
        assert_eq!(range.start.unwrap().date_naive(), date(2026, 5, 1));
        assert_eq!(range.end, Some(now()));
    }

    #[test]
    fn comparison_range_immediately_precedes_with_same_length() {
        let range = calculate_date_range(Period::SevenDays, now());
        let prior = calculate_comparison_range(&range).unwrap();

        assert_eq!(prior.end, range.start);
        let len = range.end.unwrap() - range.start.unwrap();
        let prior_len = prior.end.unwrap() - prior.start.unwrap();
        assert_eq!(len, prior_len);
        assert_eq!(len, Duration::days(7));
    }

    #[test]
    fn monthly_recurrence_counts_first_of_month_anchors() {
        let count =
            count_recurrence_in_period(BillingCycle::Monthly, date(2024, 1, 1), date(2024, 3, 1));
        assert_eq!(count, 3);
    }

    #[test]
    fn monthly_recurrence_skips_partial_leading_month() {
        // Window opens after Jan 1, so only Feb 1 falls inside.
        let count =
            count_recurrence_in_period(BillingCycle::Monthly, date(2024, 1, 15), date(2024, 2, 20));
        assert_eq!(count, 1);
    }

    #[test]
    fn sub_month_window_can_have_zero_anchors() {
        let count =
            count_recurrence_in_period(BillingCycle::Monthly, date(2024, 1, 2), date(2024, 1, 30));
        assert_eq!(count, 0);
    }

    #[test]
    fn annual_recurrence_counts_january_firsts() {
        let count =
            count_recurrence_in_period(BillingCycle::Annual, date(2024, 1, 1), date(2026, 1, 1));
        assert_eq!(count, 3);

        let count =
            count_recurrence_in_period(BillingCycle::Annual, date(2024, 2, 1), date(2026, 1, 1));
        assert_eq!(count, 2);
    }

    #[test]
    fn one_time_always_counts_once() {
        let count =
            count_recurrence_in_period(BillingCycle::OneTime, date(2024, 1, 1), date(2026, 12, 31));
        assert_eq!(count, 1);
    }

    #[test]
    fn inverted_window_counts_nothing() {
        let count =
            count_recurrence_in_period(BillingCycle::Monthly, date(2024, 3, 1), date(2024, 1, 1));
        assert_eq!(count, 0);
    }
}
