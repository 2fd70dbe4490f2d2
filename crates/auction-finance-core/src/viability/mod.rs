pub mod investment;
pub mod report;
pub mod strategy;

pub use investment::{investment_total, InvestmentBreakdown};
pub use report::{viability_report, viability_report_with, ViabilityReport, ViabilityReportInput};
pub use strategy::{compare_strategies, rent_sensitivity, rental_roi, resale_roi, Strategy};
