//! Reports module for budgetwise
//!
//! Monthly dashboard and annual spending summaries.

pub mod annual;
pub mod dashboard;

pub use annual::{AnnualCategoryTotal, AnnualReport};
pub use dashboard::{CategorySpend, DashboardReport, RecentTransaction};
