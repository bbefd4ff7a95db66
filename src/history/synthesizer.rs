//! Bill history synthesis from a seed record

use bigdecimal::{BigDecimal, FromPrimitive};
use chrono::{Datelike, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::traits::RandomSource;
use crate::types::*;

/// Window length used when the caller does not ask for one
pub const DEFAULT_HISTORY_MONTHS: u32 = 12;

/// Tunables for synthesized history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Units assumed when the seed reports none
    pub default_units: u64,
    /// Floor for synthesized units
    pub min_units: u64,
    /// Meter reading assumed when the seed reports none
    pub default_meter_reading: u64,
    /// Meter reading increment per month step
    pub meter_step: u64,
    /// Consumption spread, scaled by the month offset
    pub units_variation: f64,
    /// Spread applied to each amount
    pub amount_variation: f64,
    /// Chance that a past month is overdue rather than paid
    pub overdue_probability: f64,
    /// Day of month bills fall due
    pub due_day: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            default_units: 250,
            min_units: 50,
            default_meter_reading: 1000,
            meter_step: 20,
            units_variation: 0.1,
            amount_variation: 0.2,
            overdue_probability: 0.2,
            due_day: 25,
        }
    }
}

/// A seed record together with the number of months to synthesize
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryWindow {
    pub seed: BillingRecord,
    pub month_count: u32,
}

impl HistoryWindow {
    /// Create a window, rejecting an empty month count
    pub fn new(seed: BillingRecord, month_count: u32) -> LookupResult<Self> {
        validate_month_count(month_count)?;
        Ok(Self { seed, month_count })
    }

    /// Pick the template from the rows stored for one identity
    pub fn from_rows(
        consumer_identifier: &str,
        rows: Vec<BillingRecord>,
        month_count: u32,
    ) -> LookupResult<Self> {
        validate_month_count(month_count)?;
        let seed = rows
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::NoHistoryAvailable(consumer_identifier.to_string()))?;
        Ok(Self { seed, month_count })
    }
}

/// Derives an ordered run of monthly bills from one seed record
#[derive(Debug, Clone, Default)]
pub struct HistorySynthesizer {
    config: HistoryConfig,
}

impl HistorySynthesizer {
    /// Create a synthesizer with default tunables
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a synthesizer with custom tunables
    pub fn with_config(config: HistoryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Synthesize history ending at the current calendar month
    pub fn synthesize(
        &self,
        seed: &BillingRecord,
        month_count: u32,
        rng: &mut dyn RandomSource,
    ) -> LookupResult<Vec<BillingRecord>> {
        self.synthesize_as_of(seed, month_count, Local::now().date_naive(), rng)
    }

    /// Synthesize a window
    pub fn synthesize_window(
        &self,
        window: &HistoryWindow,
        as_of: NaiveDate,
        rng: &mut dyn RandomSource,
    ) -> LookupResult<Vec<BillingRecord>> {
        self.synthesize_as_of(&window.seed, window.month_count, as_of, rng)
    }

    /// Synthesize history ending at the month containing `as_of`
    ///
    /// Entry `i` covers the month `i` steps before that month. The result
    /// has exactly `month_count` entries, newest first, one per month. The
    /// random source is drawn in a fixed order per month (units, base
    /// amount, total amount, then status for past months), so a scripted
    /// source gives exact output.
    pub fn synthesize_as_of(
        &self,
        seed: &BillingRecord,
        month_count: u32,
        as_of: NaiveDate,
        rng: &mut dyn RandomSource,
    ) -> LookupResult<Vec<BillingRecord>> {
        validate_month_count(month_count)?;

        let current_month = first_of_month(as_of)?;
        let base_units = if seed.units_consumed == 0 {
            self.config.default_units
        } else {
            seed.units_consumed
        };
        let base_meter = if seed.meter_reading == 0 {
            self.config.default_meter_reading
        } else {
            seed.meter_reading
        };

        let mut history = Vec::with_capacity(month_count as usize);
        for i in 0..month_count {
            let billing_month = current_month
                .checked_sub_months(Months::new(i))
                .ok_or_else(|| {
                    LookupError::InvalidArgument(format!(
                        "{month_count} months before {current_month} is out of range"
                    ))
                })?;
            let due_date = billing_month.with_day(self.config.due_day).ok_or_else(|| {
                LookupError::InvalidArgument(format!(
                    "Due day {} does not exist in {}",
                    self.config.due_day,
                    billing_month.format("%Y-%m")
                ))
            })?;

            let units_factor =
                1.0 + rng.uniform(-0.5, 0.5) * f64::from(i) * self.config.units_variation;
            let units = (base_units as f64 * units_factor).round().max(0.0) as u64;
            let units_consumed = units.max(self.config.min_units);

            let base_amount = self.perturb(&seed.base_amount, rng);
            let total_amount = self.perturb(&seed.total_amount, rng);

            let status = if i == 0 {
                BillStatus::Unpaid
            } else if rng.uniform(0.0, 1.0) < self.config.overdue_probability {
                BillStatus::Overdue
            } else {
                BillStatus::Paid
            };

            let meter_reading = u64::from(i)
                .checked_mul(self.config.meter_step)
                .and_then(|advance| base_meter.checked_add(advance))
                .ok_or_else(|| {
                    LookupError::InvalidArgument(format!(
                        "Meter reading {base_meter} cannot advance {i} months"
                    ))
                })?;

            history.push(BillingRecord {
                billing_month,
                due_date,
                base_amount,
                total_amount,
                units_consumed,
                meter_reading,
                status,
                ..seed.clone()
            });
        }

        history.sort_by(|a, b| b.billing_month.cmp(&a.billing_month));

        tracing::debug!(
            "Synthesized {} months of history for {}",
            history.len(),
            seed.consumer_identifier
        );

        Ok(history)
    }

    /// Scale an amount by a random factor around 1, rounded to paise
    fn perturb(&self, amount: &BigDecimal, rng: &mut dyn RandomSource) -> BigDecimal {
        let factor = 1.0 + rng.uniform(-0.5, 0.5) * self.config.amount_variation;
        let factor = BigDecimal::from_f64(factor).unwrap_or_else(|| BigDecimal::from(1));
        (amount * &factor).round(2)
    }
}

/// Find the synthesized bill for a given calendar month
pub fn bill_for_month(history: &[BillingRecord], year: i32, month: u32) -> Option<&BillingRecord> {
    history
        .iter()
        .find(|bill| bill.billing_month.year() == year && bill.billing_month.month() == month)
}

fn validate_month_count(month_count: u32) -> LookupResult<()> {
    if month_count == 0 {
        return Err(LookupError::InvalidArgument(
            "Month count must be positive".to_string(),
        ));
    }
    Ok(())
}

fn first_of_month(date: NaiveDate) -> LookupResult<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .ok_or_else(|| LookupError::InvalidArgument(format!("Invalid anchor date {date}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::RngSource;

    /// Always returns the same fraction of the requested range
    struct Fraction(f64);

    impl RandomSource for Fraction {
        fn uniform(&mut self, min: f64, max: f64) -> f64 {
            min + (max - min) * self.0
        }
    }

    fn seed() -> BillingRecord {
        BillingRecord::new(
            "1234567890".to_string(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            BigDecimal::from(1000),
            BigDecimal::from(1180),
            300,
            4000,
            BillStatus::Paid,
        )
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()
    }

    #[test]
    fn test_twelve_months_descending() {
        let synthesizer = HistorySynthesizer::new();
        let mut rng = RngSource::seeded(2024);
        let history = synthesizer
            .synthesize_as_of(&seed(), 12, as_of(), &mut rng)
            .unwrap();

        assert_eq!(history.len(), 12);
        assert_eq!(history[0].status, BillStatus::Unpaid);
        assert_eq!(
            history[0].billing_month,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert_eq!(
            history[11].billing_month,
            NaiveDate::from_ymd_opt(2023, 4, 1).unwrap()
        );
        for pair in history.windows(2) {
            assert!(pair[0].billing_month > pair[1].billing_month);
        }
    }

    #[test]
    fn test_due_dates_and_meter_readings() {
        let synthesizer = HistorySynthesizer::new();
        let history = synthesizer
            .synthesize_as_of(&seed(), 4, as_of(), &mut Fraction(0.5))
            .unwrap();

        for (i, bill) in history.iter().enumerate() {
            assert_eq!(bill.due_date.day(), 25);
            assert_eq!(bill.due_date.month(), bill.billing_month.month());
            assert_eq!(bill.meter_reading, 4000 + i as u64 * 20);
            assert_eq!(bill.consumer_identifier, "1234567890");
        }
    }

    #[test]
    fn test_midpoint_source_keeps_seed_values() {
        let synthesizer = HistorySynthesizer::new();
        let history = synthesizer
            .synthesize_as_of(&seed(), 3, as_of(), &mut Fraction(0.5))
            .unwrap();

        for bill in &history {
            assert_eq!(bill.units_consumed, 300);
            assert_eq!(bill.base_amount, BigDecimal::from(1000));
            assert_eq!(bill.total_amount, BigDecimal::from(1180));
        }
        // 0.5 is above the overdue probability
        assert_eq!(history[1].status, BillStatus::Paid);
        assert_eq!(history[2].status, BillStatus::Paid);
    }

    #[test]
    fn test_low_source_lowers_values_and_marks_overdue() {
        let synthesizer = HistorySynthesizer::new();
        let history = synthesizer
            .synthesize_as_of(&seed(), 3, as_of(), &mut Fraction(0.0))
            .unwrap();

        // 300 * (1 - 0.5 * i * 0.1)
        assert_eq!(history[0].units_consumed, 300);
        assert_eq!(history[1].units_consumed, 285);
        assert_eq!(history[2].units_consumed, 270);
        // amounts scaled by 0.9
        assert_eq!(history[1].base_amount, BigDecimal::from(900));
        assert_eq!(history[1].total_amount, "1062".parse::<BigDecimal>().unwrap());

        assert_eq!(history[0].status, BillStatus::Unpaid);
        assert_eq!(history[1].status, BillStatus::Overdue);
        assert_eq!(history[2].status, BillStatus::Overdue);
    }

    #[test]
    fn test_units_floor() {
        let mut low_usage = seed();
        low_usage.units_consumed = 60;
        let synthesizer = HistorySynthesizer::new();
        let history = synthesizer
            .synthesize_as_of(&low_usage, 6, as_of(), &mut Fraction(0.0))
            .unwrap();

        // month 5: 60 * 0.75 = 45, floored to 50
        assert_eq!(history[5].units_consumed, 50);
        assert!(history.iter().all(|bill| bill.units_consumed >= 50));
    }

    #[test]
    fn test_missing_seed_values_use_defaults() {
        let mut sparse = seed();
        sparse.units_consumed = 0;
        sparse.meter_reading = 0;
        let synthesizer = HistorySynthesizer::new();
        let history = synthesizer
            .synthesize_as_of(&sparse, 2, as_of(), &mut Fraction(0.5))
            .unwrap();

        assert_eq!(history[0].units_consumed, 250);
        assert_eq!(history[0].meter_reading, 1000);
        assert_eq!(history[1].meter_reading, 1020);
    }

    #[test]
    fn test_zero_months_rejected() {
        let synthesizer = HistorySynthesizer::new();
        let result = synthesizer.synthesize(&seed(), 0, &mut RngSource::seeded(1));
        assert!(matches!(result, Err(LookupError::InvalidArgument(_))));
        assert!(HistoryWindow::new(seed(), 0).is_err());
    }

    #[test]
    fn test_synthesize_ends_at_current_month() {
        let synthesizer = HistorySynthesizer::new();
        let history = synthesizer
            .synthesize(&seed(), 12, &mut RngSource::seeded(11))
            .unwrap();

        assert_eq!(history.len(), 12);
        assert_eq!(history[0].status, BillStatus::Unpaid);
        assert_eq!(history[0].billing_month.day(), 1);
        for pair in history.windows(2) {
            assert!(pair[0].billing_month > pair[1].billing_month);
        }
    }

    #[test]
    fn test_meter_reading_overflow_is_rejected() {
        let mut worn_meter = seed();
        worn_meter.meter_reading = u64::MAX - 5;
        let synthesizer = HistorySynthesizer::new();
        let result = synthesizer.synthesize_as_of(&worn_meter, 3, as_of(), &mut Fraction(0.5));
        assert!(matches!(result, Err(LookupError::InvalidArgument(_))));

        // a single month never advances the meter
        let history = synthesizer
            .synthesize_as_of(&worn_meter, 1, as_of(), &mut Fraction(0.5))
            .unwrap();
        assert_eq!(history[0].meter_reading, u64::MAX - 5);
    }

    #[test]
    fn test_same_seed_same_history() {
        let synthesizer = HistorySynthesizer::new();
        let first = synthesizer
            .synthesize_as_of(&seed(), 12, as_of(), &mut RngSource::seeded(99))
            .unwrap();
        let second = synthesizer
            .synthesize_as_of(&seed(), 12, as_of(), &mut RngSource::seeded(99))
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_window_from_rows() {
        let mut other = seed();
        other.units_consumed = 999;
        let window = HistoryWindow::from_rows("1234567890", vec![seed(), other], 6).unwrap();
        assert_eq!(window.seed, seed());

        assert!(matches!(
            HistoryWindow::from_rows("1234567890", Vec::new(), 6),
            Err(LookupError::NoHistoryAvailable(_))
        ));

        let history = HistorySynthesizer::new()
            .synthesize_window(&window, as_of(), &mut Fraction(0.5))
            .unwrap();
        assert_eq!(history.len(), 6);
    }

    #[test]
    fn test_bill_for_month() {
        let history = HistorySynthesizer::new()
            .synthesize_as_of(&seed(), 12, as_of(), &mut Fraction(0.5))
            .unwrap();

        let december = bill_for_month(&history, 2023, 12).unwrap();
        assert_eq!(december.due_date, NaiveDate::from_ymd_opt(2023, 12, 25).unwrap());
        assert!(bill_for_month(&history, 2022, 12).is_none());
    }

    #[test]
    fn test_invalid_due_day() {
        let synthesizer = HistorySynthesizer::with_config(HistoryConfig {
            due_day: 31,
            ..HistoryConfig::default()
        });
        // February has no 31st
        let result = synthesizer.synthesize_as_of(
            &seed(),
            2,
            NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
            &mut Fraction(0.5),
        );
        assert!(matches!(result, Err(LookupError::InvalidArgument(_))));
    }
}
