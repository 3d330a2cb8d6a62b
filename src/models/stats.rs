//! Savings and rollup statistics.
//!
//! Everything in this module is a pure transformation from (baseline
//! parameters, event counts) to derived figures. Nothing here is persisted;
//! each endpoint recomputes from the event log on every request.
//!
//! Amounts and percentages keep full `f64` precision so records compose;
//! rounding to 2 / 1 decimal places happens only when building API responses.

use chrono::{DateTime, Duration, Utc};

use crate::models::user::User;

/// Fixed lookback horizons compared against the baseline rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizon {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Horizon {
    /// Horizon length in days.
    pub fn days(&self) -> u32 {
        match self {
            Horizon::Daily => 1,
            Horizon::Weekly => 7,
            Horizon::Monthly => 30,
            Horizon::Yearly => 365,
        }
    }
}

/// Price of a single cigarette.
///
/// Profile validation rejects `cigarettes_per_pack == 0` at input, so the
/// division is always defined for stored profiles.
pub fn per_cigarette_cost(profile: &User) -> f64 {
    profile.price_per_pack / profile.cigarettes_per_pack as f64
}

/// Expected number of cigarettes over a horizon at the baseline rate.
pub fn expected_count(baseline_daily_rate: u32, horizon_days: u32) -> f64 {
    baseline_daily_rate as f64 * horizon_days as f64
}

/// Yearly *actual* count is an estimate extrapolated from the last 30 days,
/// not a measured total: `(monthly_count / 30) * 365`. This linear projection
/// is intentional product behavior.
pub fn projected_yearly_count(monthly_count: u32) -> f64 {
    monthly_count as f64 / 30.0 * 365.0
}

/// Savings over one horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavingsRecord {
    /// Expected cost minus actual cost. Negative when the user smoked
    /// more than the baseline.
    pub amount_saved: f64,
    /// Share of the expected cost that was saved, in percent. Negative
    /// values report excess and are never clamped.
    pub percentage_saved: f64,
    /// `amount_saved > 0`
    pub improved: bool,
}

/// Compare an actual count against the expected baseline count.
///
/// `expected_cost == 0` (zero baseline rate or zero elapsed time) yields a
/// defined zero percentage rather than an error.
pub fn savings_for(actual_count: f64, expected_count: f64, per_cigarette_cost: f64) -> SavingsRecord {
    let actual_cost = actual_count * per_cigarette_cost;
    let expected_cost = expected_count * per_cigarette_cost;
    let amount_saved = expected_cost - actual_cost;
    let percentage_saved = if expected_cost > 0.0 {
        amount_saved / expected_cost * 100.0
    } else {
        0.0
    };

    SavingsRecord {
        amount_saved,
        percentage_saved,
        improved: amount_saved > 0.0,
    }
}

/// Event counts per nested time window.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct WindowCounts {
    pub today: u32,
    pub week: u32,
    pub month: u32,
}

impl WindowCounts {
    /// Classify events into nested windows in a single pass.
    ///
    /// The caller supplies events already filtered to the trailing 30 days.
    /// A single conditional chain guarantees today ⊆ week ⊆ month even when
    /// "start of today" and "now − 7×24h" land on surprising boundaries.
    pub fn classify<'a, I>(timestamps: I, now: DateTime<Utc>, start_of_today: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a DateTime<Utc>>,
    {
        let week_ago = now - Duration::days(7);
        let mut counts = WindowCounts::default();

        for ts in timestamps {
            counts.month += 1;
            if *ts >= week_ago {
                counts.week += 1;
                if *ts >= start_of_today {
                    counts.today += 1;
                }
            }
        }

        counts
    }
}

/// Savings per horizon for the dashboard cards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardSavings {
    pub daily: SavingsRecord,
    pub weekly: SavingsRecord,
    pub monthly: SavingsRecord,
    pub yearly: SavingsRecord,
}

/// Derive all four horizon records from the window counts.
pub fn dashboard_savings(profile: &User, counts: WindowCounts) -> DashboardSavings {
    let cost = per_cigarette_cost(profile);
    let rate = profile.avg_cigarettes_per_day;

    DashboardSavings {
        daily: savings_for(
            counts.today as f64,
            expected_count(rate, Horizon::Daily.days()),
            cost,
        ),
        weekly: savings_for(
            counts.week as f64,
            expected_count(rate, Horizon::Weekly.days()),
            cost,
        ),
        monthly: savings_for(
            counts.month as f64,
            expected_count(rate, Horizon::Monthly.days()),
            cost,
        ),
        yearly: savings_for(
            projected_yearly_count(counts.month),
            expected_count(rate, Horizon::Yearly.days()),
            cost,
        ),
    }
}

/// Savings since account creation, measured against a first-year target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifetimeSavings {
    /// Whole days since account creation
    pub days_since_creation: i64,
    /// Expected cost minus actual cost since creation
    pub total_saved: f64,
    /// Cost of a full baseline year (the first-year savings target)
    pub yearly_target: f64,
    /// Progress toward the day-adjusted target, capped at 100 but
    /// unbounded below (excess smoking drives it negative)
    pub progress_percentage: f64,
}

/// Compute lifetime savings for the profile screen.
///
/// `days_since_creation == 0` defines progress as 0 instead of dividing
/// by zero.
pub fn lifetime_savings(
    profile: &User,
    created_at: DateTime<Utc>,
    actual_count: u32,
    now: DateTime<Utc>,
) -> LifetimeSavings {
    let cost = per_cigarette_cost(profile);
    let rate = profile.avg_cigarettes_per_day;

    let days_since_creation = (now - created_at).num_days().max(0);
    let expected = expected_count(rate, days_since_creation as u32);
    let total_saved = (expected - actual_count as f64) * cost;
    let yearly_target = expected_count(rate, Horizon::Yearly.days()) * cost;

    // Pro-rate the yearly target to the days actually elapsed.
    let adjusted_target = yearly_target / Horizon::Yearly.days() as f64 * days_since_creation as f64;
    let progress_percentage = if days_since_creation == 0 || adjusted_target <= 0.0 {
        0.0
    } else {
        (total_saved / adjusted_target * 100.0).min(100.0)
    };

    LifetimeSavings {
        days_since_creation,
        total_saved,
        yearly_target,
        progress_percentage,
    }
}

/// Build the fixed-template share summary.
pub fn share_text(
    profile: &User,
    created_at: DateTime<Utc>,
    actual_count: u32,
    now: DateTime<Utc>,
) -> String {
    let cost = per_cigarette_cost(profile);
    let days_since_start = (now - created_at).num_days().max(0);
    let expected_total = expected_count(profile.avg_cigarettes_per_day, days_since_start as u32);
    let money_saved = (expected_total - actual_count as f64) * cost;

    let current_daily_avg = if days_since_start > 0 {
        format!("{:.1}", actual_count as f64 / days_since_start as f64)
    } else {
        "0".to_string()
    };

    format!(
        "🎉 My Smoking Reduction Progress:\n\n \
         📅 Days since starting: {days}\n \
         💰 Money saved: {currency} {saved:.2}\n \
         🎯 Earlier Daily Average: {baseline} cigarettes\n \
         📉 Current Daily Average: {current} cigarettes\n \
         \n \
         Track your progress too! Join QuitPuff",
        days = days_since_start,
        currency = profile.currency.code(),
        saved = money_saved,
        baseline = profile.avg_cigarettes_per_day,
        current = current_daily_avg,
    )
}

/// Round to 2 decimal places for presenting amounts.
pub fn round_amount(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to 1 decimal place for presenting percentages.
pub fn round_percentage(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
