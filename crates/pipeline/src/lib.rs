//! `blackbox-pipeline` — sales pipeline deals, kanban grouping and the
//! period-over-period metrics engine.

pub mod deal;
pub mod metrics;

pub use deal::{Deal, DealBoard, DealColumn, DealId, DealPatch, DealStatus, NewDeal};
pub use metrics::{
    Granularity, GrowthRates, GrowthStats, MetricSnapshot, PeriodWindows, compute_growth_stats,
    growth_pct,
};
