use screener_core::{RiskRule, ScreenerError, StatementSet, StatementTable, Verdict};

use crate::MISSING_DATA_LABEL;

/// Largest tolerated single-period decline for revenue and net profit.
const MAX_SINGLE_PERIOD_DECLINE: f64 = -0.20;

/// Checks whether total operating revenue and net profit grow without a
/// single-period decline of more than 20%.
pub struct GrowthStabilityRule;

impl GrowthStabilityRule {
    fn check(&self, income: &StatementTable) -> Result<Verdict, ScreenerError> {
        let revenue = income.values_f64("营业总收入")?;
        let net_profit = income.values_f64("净利润")?;

        if revenue.len() < 2 || net_profit.len() < 2 {
            return Err(ScreenerError::MalformedStatement(
                "fewer than two reporting periods".to_string(),
            ));
        }

        if is_stable(&revenue) && is_stable(&net_profit) {
            Ok(Verdict::pass("✅ 稳定增长"))
        } else {
            Ok(Verdict::fail("❌ 波动过大"))
        }
    }
}

/// Period-over-period changes across adjacent columns in source order.
/// Pairs with a zero base are skipped (the change is not finite).
fn is_stable(values: &[f64]) -> bool {
    values
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .all(|change| change > MAX_SINGLE_PERIOD_DECLINE)
}

impl RiskRule for GrowthStabilityRule {
    fn name(&self) -> &'static str {
        "业绩趋势"
    }

    fn evaluate(&self, statements: &StatementSet) -> Verdict {
        match self.check(&statements.income) {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::debug!("{}: {}", self.name(), e);
                Verdict::insufficient_data(MISSING_DATA_LABEL)
            }
        }
    }
}
