use screener_core::{RiskRule, ScreenerError, StatementSet, StatementTable, Verdict};

use crate::MISSING_DATA_LABEL;

/// Compares total current assets against total current liabilities for the
/// most recent reporting period.
pub struct LiquidityRule;

impl LiquidityRule {
    fn check(&self, balance: &StatementTable) -> Result<Verdict, ScreenerError> {
        let current_assets = balance.latest_f64("流动资产合计")?;
        let current_liabilities = balance.latest_f64("流动负债合计")?;

        if current_assets < current_liabilities {
            Ok(Verdict::fail("❌ 流动性风险"))
        } else {
            Ok(Verdict::pass("✅ 正常"))
        }
    }
}

impl RiskRule for LiquidityRule {
    fn name(&self) -> &'static str {
        "流动性"
    }

    fn evaluate(&self, statements: &StatementSet) -> Verdict {
        match self.check(&statements.balance) {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::debug!("{}: {}", self.name(), e);
                Verdict::insufficient_data(MISSING_DATA_LABEL)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{statements, table};
    use screener_core::{StatementTable, VerdictTier};

    fn balance(ca: &str, cl: &str) -> StatementTable {
        table(
            1,
            &[("流动资产合计", &[ca][..]), ("流动负债合计", &[cl][..])],
        )
    }

    #[test]
    fn assets_below_liabilities_fails() {
        let set = statements(StatementTable::default(), balance("80", "100"));
        assert_eq!(LiquidityRule.evaluate(&set).tier, VerdictTier::Fail);
    }

    #[test]
    fn assets_above_liabilities_passes() {
        let set = statements(StatementTable::default(), balance("120", "100"));
        assert_eq!(LiquidityRule.evaluate(&set).tier, VerdictTier::Pass);
    }

    #[test]
    fn uses_most_recent_period_only() {
        // Older period would fail; latest passes
        let set = statements(
            StatementTable::default(),
            table(
                2,
                &[
                    ("流动资产合计", &["120", "50"][..]),
                    ("流动负债合计", &["100", "100"][..]),
                ],
            ),
        );
        assert_eq!(LiquidityRule.evaluate(&set).tier, VerdictTier::Pass);
    }

    #[test]
    fn missing_row_is_insufficient_data() {
        let set = statements(
            StatementTable::default(),
            table(1, &[("流动资产合计", &["120"][..])]),
        );
        assert_eq!(
            LiquidityRule.evaluate(&set).tier,
            VerdictTier::InsufficientData
        );
    }
}
