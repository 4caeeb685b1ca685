//! Stats module - summaries, distributions and correlations

mod calculator;
pub mod correlation;
pub mod density;
mod summary;

pub use calculator::{BoxStats, DescriptiveStats, GroupCount, Histogram, StatsCalculator};
pub use correlation::CorrelationMatrix;
pub use density::DensityCurve;
pub use summary::{DatasetSummary, NumericSummary};
