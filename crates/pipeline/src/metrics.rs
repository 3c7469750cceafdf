//! Period-over-period pipeline metrics.
//!
//! Pure functions over in-memory deal slices: no clock, no storage. Callers
//! pass the reference instant explicitly, so identical inputs always produce
//! identical output.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::deal::{Deal, DealStatus};

/// Reporting granularity selecting the window span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
}

/// Aggregates over one reporting window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    /// Sum of closed-won deal amounts, smallest currency unit.
    pub total_revenue: u64,
    /// Count of closed-won deals.
    pub deals_closed: u64,
    /// Whole-number percentage of created deals that closed won; 0 when
    /// nothing was created in the window.
    pub conversion_rate: u8,
}

/// Whole-number growth percentages, current window vs previous.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthRates {
    pub revenue_pct: i32,
    pub deals_pct: i32,
    pub conversion_pct: i32,
}

/// Result of one metrics computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthStats {
    pub current: MetricSnapshot,
    pub previous: MetricSnapshot,
    pub growth: GrowthRates,
}

/// The two adjacent reporting windows around a reference instant.
///
/// The current window is `[current_start, now]` (closed); the previous is
/// `[previous_start, current_start)` (half-open). The shared boundary
/// belongs to the current window only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindows {
    pub previous_start: DateTime<Utc>,
    pub current_start: DateTime<Utc>,
    pub now: DateTime<Utc>,
}

impl PeriodWindows {
    pub fn for_granularity(granularity: Granularity, now: DateTime<Utc>) -> PeriodWindows {
        PeriodWindows {
            previous_start: subtract_span(now, granularity, 2),
            current_start: subtract_span(now, granularity, 1),
            now,
        }
    }

    pub fn in_current(&self, at: DateTime<Utc>) -> bool {
        self.current_start <= at && at <= self.now
    }

    pub fn in_previous(&self, at: DateTime<Utc>) -> bool {
        self.previous_start <= at && at < self.current_start
    }
}

/// Reference instant minus `periods` spans. Day and week spans are fixed
/// durations; month spans use calendar arithmetic (same day-of-month,
/// clamped at short month ends).
fn subtract_span(now: DateTime<Utc>, granularity: Granularity, periods: u32) -> DateTime<Utc> {
    let fallback = DateTime::<Utc>::MIN_UTC;
    match granularity {
        Granularity::Day => now
            .checked_sub_signed(Duration::days(periods as i64))
            .unwrap_or(fallback),
        Granularity::Week => now
            .checked_sub_signed(Duration::days(7 * periods as i64))
            .unwrap_or(fallback),
        Granularity::Month => now.checked_sub_months(Months::new(periods)).unwrap_or(fallback),
    }
}

/// Compute current and previous window snapshots plus growth percentages.
///
/// Deals are assigned to windows by `created_at`. Revenue counts only
/// `closed_won` deals; the conversion denominator counts every deal created
/// in the window regardless of stage.
pub fn compute_growth_stats(
    deals: &[Deal],
    granularity: Granularity,
    now: DateTime<Utc>,
) -> GrowthStats {
    let windows = PeriodWindows::for_granularity(granularity, now);

    let current = snapshot(deals.iter().filter(|d| windows.in_current(d.created_at)));
    let previous = snapshot(deals.iter().filter(|d| windows.in_previous(d.created_at)));

    let growth = GrowthRates {
        revenue_pct: growth_pct(current.total_revenue, previous.total_revenue),
        deals_pct: growth_pct(current.deals_closed, previous.deals_closed),
        conversion_pct: growth_pct(
            current.conversion_rate as u64,
            previous.conversion_rate as u64,
        ),
    };

    GrowthStats {
        current,
        previous,
        growth,
    }
}

fn snapshot<'a>(deals: impl Iterator<Item = &'a Deal>) -> MetricSnapshot {
    let mut created: u64 = 0;
    let mut closed: u64 = 0;
    let mut revenue: u64 = 0;

    for deal in deals {
        created += 1;
        if deal.status == DealStatus::ClosedWon {
            closed += 1;
            revenue = revenue.saturating_add(deal.amount);
        }
    }

    let conversion_rate = if created > 0 {
        ((closed as f64 / created as f64) * 100.0).round() as u8
    } else {
        0
    };

    MetricSnapshot {
        total_revenue: revenue,
        deals_closed: closed,
        conversion_rate,
    }
}

/// Whole-number growth percentage of `current` over `previous`, rounded
/// half away from zero. A zero baseline reports 0, whatever the current
/// value is.
pub fn growth_pct(current: u64, previous: u64) -> i32 {
    if previous == 0 {
        return 0;
    }
    let delta = current as f64 - previous as f64;
    ((delta / previous as f64) * 100.0).round() as i32
}
