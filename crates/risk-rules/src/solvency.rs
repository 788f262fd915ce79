use screener_core::{RiskRule, ScreenerError, StatementSet, StatementTable, Verdict};

use crate::MISSING_DATA_LABEL;

/// Compares liquid funds against short- and long-term debt for the most
/// recent reporting period.
///
/// A = cash + trading financial assets, B = short-term borrowings + current
/// portion of non-current liabilities, C = long-term borrowings + bonds
/// payable. A < B means immediate funding strain; A < B + C means elevated
/// repayment pressure, a computed risk signal kept distinct from the
/// data-quality tier.
pub struct SolvencyRule;

impl SolvencyRule {
    fn check(&self, balance: &StatementTable) -> Result<Verdict, ScreenerError> {
        let cash = balance.latest_f64("货币资金")?;
        let trading_assets = balance.latest_f64("交易性金融资产")?;
        let liquid_funds = cash + trading_assets;

        let short_debt = balance.latest_f64("短期借款")?;
        let current_noncurrent = balance.latest_f64("一年内到期的非流动负债")?;
        let short_term_due = short_debt + current_noncurrent;

        let long_debt = balance.latest_f64("长期借款")?;
        let bonds = balance.latest_f64("应付债券")?;
        let long_term_due = long_debt + bonds;

        if liquid_funds < short_term_due {
            Ok(Verdict::fail("❌ 资金链紧张"))
        } else if liquid_funds < short_term_due + long_term_due {
            Ok(Verdict::warning("⚠️ 偿债压力大"))
        } else {
            Ok(Verdict::pass("✅ 安全"))
        }
    }
}

impl RiskRule for SolvencyRule {
    fn name(&self) -> &'static str {
        "偿债能力"
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
