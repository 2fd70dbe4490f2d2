pub mod amortization;
pub mod calculator;
pub mod inputs;
pub mod quick_estimate;
pub mod risk;
pub mod sensitivity;

pub use calculator::{calculate_financing, calculate_financing_with, FinancingResults};
pub use inputs::FinancingInputs;
pub use sensitivity::{analyze_sensitivity, analyze_sensitivity_with, SensitivityAnalysis};
