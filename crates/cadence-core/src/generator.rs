//! Pure occurrence generation.
//!
//! The n-th occurrence of a rule is always computed from the anchor as
//! `anchor + n * every * unit`; it is never derived from the (n-1)-th one.
//! For `day` and `week` this is exact duration arithmetic in UTC. For `month`
//! the calendar month is advanced and the day of month is clamped to the last
//! day of the target month:
//!
//! | anchor     | +1 month   | +2 months  | +3 months  |
//! |------------|------------|------------|------------|
//! | 2024-01-31 | 2024-02-29 | 2024-03-31 | 2024-04-30 |
//! | 2023-01-31 | 2023-02-28 | 2023-03-31 | 2023-04-30 |
//!
//! Because each step restarts from the anchor a clamped month never drags the
//! rest of the series to an earlier day. The time of day is preserved.

use chrono::{DateTime, Datelike, Duration, Months, Utc};

use crate::rule::{RecurrenceRule, RepeatUnit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccurrenceGenerator {
    anchor: DateTime<Utc>,
    rule: RecurrenceRule,
}

impl OccurrenceGenerator {
    pub fn new(anchor: DateTime<Utc>, rule: RecurrenceRule) -> Self {
        Self { anchor, rule }
    }

    pub fn anchor(&self) -> DateTime<Utc> {
        self.anchor
    }

    pub fn rule(&self) -> RecurrenceRule {
        self.rule
    }

    /// The n-th occurrence (0 is the anchor), or `None` once the calendar
    /// range representable by chrono is exhausted.
    pub fn nth(&self, n: u32) -> Option<DateTime<Utc>> {
        let steps = n.checked_mul(self.rule.every())?;
        match self.rule.unit() {
            RepeatUnit::Day => self
                .anchor
                .checked_add_signed(Duration::try_days(i64::from(steps))?),
            RepeatUnit::Week => self
                .anchor
                .checked_add_signed(Duration::try_weeks(i64::from(steps))?),
            RepeatUnit::Month => self.anchor.checked_add_months(Months::new(steps)),
        }
    }

    /// Unbounded, strictly increasing sequence of occurrences from the anchor.
    pub fn iter(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.iter_from_index(0)
    }

    fn iter_from_index(&self, start: u32) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        (start..=u32::MAX).map_while(move |n| self.nth(n))
    }

    /// Index of the first occurrence at or after `at`.
    pub fn index_at_or_after(&self, at: DateTime<Utc>) -> Option<u32> {
        if at <= self.anchor {
            return Some(0);
        }

        let mut n = self.estimate_index_before(at);
        loop {
            if self.nth(n)? >= at {
                return Some(n);
            }
            n = n.checked_add(1)?;
        }
    }

    /// First occurrence at or after `at`.
    pub fn first_at_or_after(&self, at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.index_at_or_after(at).and_then(|n| self.nth(n))
    }

    /// First occurrence strictly after `at`.
    pub fn first_after(&self, at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let n = self.index_at_or_after(at)?;
        let candidate = self.nth(n)?;
        if candidate > at {
            Some(candidate)
        } else {
            self.nth(n.checked_add(1)?)
        }
    }

    /// Occurrences inside the closed window `[from, to]`, ascending, at most
    /// `limit` of them. Identical inputs always yield identical output.
    pub fn between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: usize,
    ) -> Vec<DateTime<Utc>> {
        if to < from {
            return Vec::new();
        }
        let Some(start) = self.index_at_or_after(from) else {
            return Vec::new();
        };

        self.iter_from_index(start)
            .take_while(|at| *at <= to)
            .take(limit)
            .collect()
    }

    /// An index whose occurrence is guaranteed not to be after `at`, close
    /// enough that the caller only walks a step or two forward.
    fn estimate_index_before(&self, at: DateTime<Utc>) -> u32 {
        let every = i64::from(self.rule.every());
        let estimate = match self.rule.unit() {
            RepeatUnit::Day | RepeatUnit::Week => {
                let period_days = if self.rule.unit() == RepeatUnit::Week { 7 } else { 1 };
                let period_secs = every * period_days * 86_400;
                (at - self.anchor).num_seconds() / period_secs
            }
            RepeatUnit::Month => {
                let months = |d: DateTime<Utc>| i64::from(d.year()) * 12 + i64::from(d.month0());
                (months(at) - months(self.anchor)) / every - 1
            }
        };
        u32::try_from(estimate.max(0)).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn generator(anchor: DateTime<Utc>, every: i64, unit: RepeatUnit) -> OccurrenceGenerator {
        OccurrenceGenerator::new(anchor, RecurrenceRule::new(every, unit).unwrap())
    }

    #[test]
    fn test_daily_week_window_is_inclusive() {
        let g = generator(utc(2024, 1, 1), 1, RepeatUnit::Day);
        let dates = g.between(utc(2024, 1, 1), utc(2024, 1, 8), 1000);
        assert_eq!(dates.len(), 8);
        assert_eq!(dates.first(), Some(&utc(2024, 1, 1)));
        assert_eq!(dates.last(), Some(&utc(2024, 1, 8)));
    }

    #[test]
    fn test_window_before_anchor_is_clipped() {
        let g = generator(utc(2024, 1, 10), 1, RepeatUnit::Day);
        let dates = g.between(utc(2024, 1, 1), utc(2024, 1, 12), 1000);
        assert_eq!(dates, vec![utc(2024, 1, 10), utc(2024, 1, 11), utc(2024, 1, 12)]);
    }

    #[test]
    fn test_window_entirely_before_anchor_is_empty() {
        let g = generator(utc(2024, 1, 10), 1, RepeatUnit::Day);
        assert!(g.between(utc(2024, 1, 1), utc(2024, 1, 9), 1000).is_empty());
    }

    #[test]
    fn test_inverted_window_is_empty() {
        let g = generator(utc(2024, 1, 1), 1, RepeatUnit::Day);
        assert!(g.between(utc(2024, 1, 5), utc(2024, 1, 4), 1000).is_empty());
    }

    #[test]
    fn test_limit_caps_output() {
        let g = generator(utc(2024, 1, 1), 1, RepeatUnit::Day);
        let dates = g.between(utc(2024, 1, 1), utc(2030, 1, 1), 5);
        assert_eq!(dates.len(), 5);
        assert_eq!(dates[4], utc(2024, 1, 5));
    }

    #[test]
    fn test_weekly_with_interval() {
        let g = generator(utc(2024, 1, 1), 2, RepeatUnit::Week);
        let dates = g.between(utc(2024, 1, 2), utc(2024, 2, 15), 1000);
        assert_eq!(dates, vec![utc(2024, 1, 15), utc(2024, 1, 29), utc(2024, 2, 12)]);
    }

    #[test]
    fn test_month_end_clamps_without_drift() {
        let g = generator(utc(2024, 1, 31), 1, RepeatUnit::Month);
        let dates: Vec<_> = g.iter().take(5).collect();
        assert_eq!(
            dates,
            vec![
                utc(2024, 1, 31),
                utc(2024, 2, 29),
                utc(2024, 3, 31),
                utc(2024, 4, 30),
                utc(2024, 5, 31),
            ]
        );
    }

    #[test]
    fn test_month_end_clamps_in_common_year() {
        let g = generator(utc(2023, 1, 31), 1, RepeatUnit::Month);
        assert_eq!(g.nth(1), Some(utc(2023, 2, 28)));
    }

    #[test]
    fn test_bimonthly_from_mid_month() {
        let g = generator(utc(2023, 1, 15), 2, RepeatUnit::Month);
        let dates = g.between(utc(2023, 1, 1), utc(2023, 6, 1), 1000);
        assert_eq!(dates, vec![utc(2023, 1, 15), utc(2023, 3, 15), utc(2023, 5, 15)]);
    }

    #[test]
    fn test_time_of_day_is_preserved() {
        let anchor = Utc.with_ymd_and_hms(2024, 3, 9, 14, 30, 5).unwrap();
        let g = generator(anchor, 1, RepeatUnit::Day);
        assert_eq!(g.nth(2), Some(Utc.with_ymd_and_hms(2024, 3, 11, 14, 30, 5).unwrap()));
    }

    #[test]
    fn test_first_at_or_after_and_first_after() {
        let g = generator(utc(2024, 1, 1), 1, RepeatUnit::Week);
        assert_eq!(g.first_at_or_after(utc(2023, 6, 1)), Some(utc(2024, 1, 1)));
        assert_eq!(g.first_at_or_after(utc(2024, 1, 8)), Some(utc(2024, 1, 8)));
        assert_eq!(g.first_at_or_after(utc(2024, 1, 9)), Some(utc(2024, 1, 15)));
        assert_eq!(g.first_after(utc(2024, 1, 8)), Some(utc(2024, 1, 15)));
        assert_eq!(g.first_after(utc(2023, 12, 31)), Some(utc(2024, 1, 1)));
    }

    #[test]
    fn test_far_window_skips_directly() {
        let g = generator(utc(2000, 1, 1), 1, RepeatUnit::Day);
        let n = g.index_at_or_after(utc(2024, 1, 1)).unwrap();
        assert_eq!(g.nth(n), Some(utc(2024, 1, 1)));
        assert_eq!(n, 8766);
    }

    #[test]
    fn test_sequence_ends_at_calendar_limit() {
        let g = generator(utc(2024, 1, 1), i64::from(u32::MAX), RepeatUnit::Month);
        assert_eq!(g.nth(0), Some(utc(2024, 1, 1)));
        assert_eq!(g.nth(1), None);
        assert_eq!(g.iter().count(), 1);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let g = generator(utc(2024, 1, 31), 1, RepeatUnit::Month);
        let a = g.between(utc(2024, 1, 1), utc(2026, 1, 1), 1000);
        let b = g.between(utc(2024, 1, 1), utc(2026, 1, 1), 1000);
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_daily_spacing_is_exactly_one_day(
            offset_secs in 0i64..10 * 365 * 86_400,
            from_days in 0i64..400,
            span_days in 1i64..60,
        ) {
            let anchor = utc(2020, 1, 1) + Duration::seconds(offset_secs);
            let g = generator(anchor, 1, RepeatUnit::Day);
            let from = anchor + Duration::days(from_days);
            let dates = g.between(from, from + Duration::days(span_days), 1000);

            prop_assert!(!dates.is_empty());
            prop_assert!(dates[0] >= from);
            prop_assert!(dates[0] - from < Duration::days(1));
            for pair in dates.windows(2) {
                prop_assert_eq!(pair[1] - pair[0], Duration::hours(24));
            }
        }

        #[test]
        fn prop_monthly_day_is_clamped_to_month_length(
            day in 1u32..=31,
            every in 1i64..=12,
            n in 0u32..240,
        ) {
            let anchor = Utc.with_ymd_and_hms(2020, 1, day, 9, 0, 0).unwrap();
            let g = generator(anchor, every, RepeatUnit::Month);
            let at = g.nth(n).unwrap();

            let next_month_first = if at.month() == 12 {
                Utc.with_ymd_and_hms(at.year() + 1, 1, 1, 0, 0, 0).unwrap()
            } else {
                Utc.with_ymd_and_hms(at.year(), at.month() + 1, 1, 0, 0, 0).unwrap()
            };
            let month_len = (next_month_first - Duration::days(1)).day();

            prop_assert_eq!(at.day(), anchor.day().min(month_len));
            prop_assert_eq!(at.time(), anchor.time());
        }

        #[test]
        fn prop_index_at_or_after_is_tight(
            every in 1i64..=5,
            unit_idx in 0usize..3,
            probe_secs in 0i64..5 * 365 * 86_400,
        ) {
            let unit = [RepeatUnit::Day, RepeatUnit::Week, RepeatUnit::Month][unit_idx];
            let g = generator(utc(2021, 3, 31), every, unit);
            let probe = utc(2021, 3, 31) + Duration::seconds(probe_secs);
            let n = g.index_at_or_after(probe).unwrap();

            prop_assert!(g.nth(n).unwrap() >= probe);
            if n > 0 {
                prop_assert!(g.nth(n - 1).unwrap() < probe);
            }
        }
    }
}
