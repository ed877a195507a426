pub mod electricity;
mod engine;
mod error;
pub mod gas;
mod period;
pub mod reference;
mod report;
pub mod tables;
mod types;

pub use engine::{compare, simulate};
pub use error::SimulationError;
pub use period::{MONTH_NAMES, Month, Period, resolve_period};
pub use report::{Report, ReportRow, format_currency};
pub use types::{
    Advisory, CostBreakdown, ExtraCharges, LineItem, LineKind, LineTag, Region, SavingsOutcome,
    ServiceInput, ServiceType, SimulationInput, SimulationResult,
};
