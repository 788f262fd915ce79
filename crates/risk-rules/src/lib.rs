//! Red-flag rules over financial statement tables.
//!
//! Each rule is an independent, pure evaluator implementing
//! [`screener_core::RiskRule`]. Rules fail closed: any missing line item or
//! unparseable cell yields an `InsufficientData` verdict instead of an error.
//! The full checklist names twelve rules; three are implemented, the rest
//! slot into [`default_rules`] when written.

use screener_core::RiskRule;

mod growth;
mod liquidity;
mod solvency;

pub use growth::GrowthStabilityRule;
pub use liquidity::LiquidityRule;
pub use solvency::SolvencyRule;

/// Shared label for the data-quality verdict.
pub(crate) const MISSING_DATA_LABEL: &str = "⚠️ 数据不足";

/// The built-in rules in their fixed evaluation order.
pub fn default_rules() -> Vec<Box<dyn RiskRule>> {
    vec![
        Box::new(GrowthStabilityRule),
        Box::new(LiquidityRule),
        Box::new(SolvencyRule),
    ]
}
