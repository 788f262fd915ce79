//! Orchestrates one screening run: fetch the three statements, evaluate the
//! rule registry, aggregate the verdicts into a classification.

use chrono::Utc;
use screener_core::{
    Classification, ReportEntry, RiskReport, RiskRule, StatementKind, StatementProvider,
    StatementSet, Verdict,
};
use std::sync::Arc;

mod aggregate;
pub use aggregate::classify;

/// Fixed key of the single entry emitted when the fetch fails.
pub const FETCH_ERROR_KEY: &str = "错误";

pub struct RiskChecker {
    provider: Arc<dyn StatementProvider>,
    rules: Vec<Box<dyn RiskRule>>,
    /// Classification reported when statement retrieval fails outright.
    /// A failed, unanalyzed stock defaults to medium risk.
    fetch_failure_policy: Classification,
}

impl RiskChecker {
    pub fn new(provider: Arc<dyn StatementProvider>) -> Self {
        Self {
            provider,
            rules: risk_rules::default_rules(),
            fetch_failure_policy: Classification::MediumRisk,
        }
    }

    /// Replace the default rule registry. Rules run in the order given.
    pub fn with_rules(mut self, rules: Vec<Box<dyn RiskRule>>) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_fetch_failure_policy(mut self, classification: Classification) -> Self {
        self.fetch_failure_policy = classification;
        self
    }

    /// Screen one stock identifier. Never fails: a provider error produces a
    /// degenerate report with a single fetch-error entry.
    pub async fn check_risks(&self, symbol: &str) -> RiskReport {
        tracing::info!("Screening {} against {} rules", symbol, self.rules.len());

        // The three statements are independent reads; fetch them together.
        // All must arrive before evaluation starts — there is no
        // partial-evaluation mode.
        let (income, balance, cash_flow) = tokio::join!(
            self.provider.fetch(symbol, StatementKind::Income),
            self.provider.fetch(symbol, StatementKind::Balance),
            self.provider.fetch(symbol, StatementKind::CashFlow),
        );

        let statements = match (income, balance, cash_flow) {
            (Ok(income), Ok(balance), Ok(cash_flow)) => StatementSet {
                income,
                balance,
                cash_flow,
            },
            (income, balance, cash_flow) => {
                let cause = income
                    .err()
                    .or(balance.err())
                    .or(cash_flow.err())
                    .map(|e| e.to_string())
                    .unwrap_or_default();
                tracing::warn!("Statement fetch failed for {}: {}", symbol, cause);
                return self.fetch_failure_report(symbol, &cause);
            }
        };

        let entries: Vec<ReportEntry> = self
            .rules
            .iter()
            .map(|rule| ReportEntry {
                check: rule.name().to_string(),
                verdict: rule.evaluate(&statements),
            })
            .collect();

        let classification = classify(entries.iter().map(|e| e.verdict.tier));
        tracing::info!("Screening {} done: {:?}", symbol, classification);

        RiskReport {
            symbol: symbol.to_string(),
            generated_at: Utc::now(),
            entries,
            classification,
        }
    }

    fn fetch_failure_report(&self, symbol: &str, cause: &str) -> RiskReport {
        RiskReport {
            symbol: symbol.to_string(),
            generated_at: Utc::now(),
            entries: vec![ReportEntry {
                check: FETCH_ERROR_KEY.to_string(),
                verdict: Verdict::insufficient_data(format!("数据抓取失败: {cause}")),
            }],
            classification: self.fetch_failure_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use screener_core::{ScreenerError, StatementRow, StatementTable, VerdictTier};

    fn row(item: &str, values: &[&str]) -> StatementRow {
        StatementRow {
            item: item.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Provider serving fixed healthy statements for every symbol.
    struct FixtureProvider;

    #[async_trait]
    impl StatementProvider for FixtureProvider {
        async fn fetch(
            &self,
            _symbol: &str,
            kind: StatementKind,
        ) -> Result<StatementTable, ScreenerError> {
            let rows = match kind {
                StatementKind::Income => vec![
                    row("营业总收入", &["110", "100"]),
                    row("净利润", &["55", "50"]),
                ],
                StatementKind::Balance => vec![
                    row("流动资产合计", &["120"]),
                    row("流动负债合计", &["100"]),
                    row("货币资金", &["60"]),
                    row("交易性金融资产", &["0"]),
                    row("短期借款", &["10"]),
                    row("一年内到期的非流动负债", &["10"]),
                    row("长期借款", &["10"]),
                    row("应付债券", &["10"]),
                ],
                StatementKind::CashFlow => vec![row("经营活动产生的现金流量净额", &["30"])],
            };
            Ok(StatementTable {
                periods: vec!["20231231".to_string(), "20221231".to_string()],
                rows,
            })
        }
    }

    /// Provider that always fails.
    struct FailingProvider;

    #[async_trait]
    impl StatementProvider for FailingProvider {
        async fn fetch(
            &self,
            _symbol: &str,
            _kind: StatementKind,
        ) -> Result<StatementTable, ScreenerError> {
            Err(ScreenerError::FetchFailed("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn healthy_stock_is_low_risk() {
        let checker = RiskChecker::new(Arc::new(FixtureProvider));
        let report = checker.check_risks("600519").await;

        assert_eq!(report.classification, Classification::LowRisk);
        let checks: Vec<&str> = report.entries.iter().map(|e| e.check.as_str()).collect();
        assert_eq!(checks, vec!["业绩趋势", "流动性", "偿债能力"]);
        assert!(report
            .entries
            .iter()
            .all(|e| e.verdict.tier == VerdictTier::Pass));
    }

    #[tokio::test]
    async fn report_table_ends_with_conclusion() {
        let checker = RiskChecker::new(Arc::new(FixtureProvider));
        let report = checker.check_risks("600519").await;

        let rows = report.table();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows.last().unwrap().0, screener_core::CONCLUSION_KEY);
    }

    #[tokio::test]
    async fn fetch_failure_gives_single_error_entry() {
        let checker = RiskChecker::new(Arc::new(FailingProvider));
        let report = checker.check_risks("600519").await;

        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].check, FETCH_ERROR_KEY);
        assert!(report.entries[0]
            .verdict
            .label
            .contains("数据抓取失败: data fetch failed: connection refused"));
        assert_eq!(report.classification, Classification::MediumRisk);
    }

    #[tokio::test]
    async fn fetch_failure_policy_is_configurable() {
        let checker = RiskChecker::new(Arc::new(FailingProvider))
            .with_fetch_failure_policy(Classification::HighRisk);
        let report = checker.check_risks("600519").await;
        assert_eq!(report.classification, Classification::HighRisk);
    }

    #[tokio::test]
    async fn empty_symbol_still_yields_a_report() {
        let checker = RiskChecker::new(Arc::new(FailingProvider));
        let report = checker.check_risks("").await;
        assert_eq!(report.entries.len(), 1);
    }

    /// Provider whose balance sheet leaves liquid funds short of total debt.
    struct StrainedProvider;

    #[async_trait]
    impl StatementProvider for StrainedProvider {
        async fn fetch(
            &self,
            _symbol: &str,
            kind: StatementKind,
        ) -> Result<StatementTable, ScreenerError> {
            let rows = match kind {
                StatementKind::Income => vec![
                    row("营业总收入", &["110", "100"]),
                    row("净利润", &["55", "50"]),
                ],
                StatementKind::Balance => vec![
                    row("流动资产合计", &["120"]),
                    row("流动负债合计", &["100"]),
                    row("货币资金", &["30"]),
                    row("交易性金融资产", &["0"]),
                    row("短期借款", &["10"]),
                    row("一年内到期的非流动负债", &["10"]),
                    row("长期借款", &["15"]),
                    row("应付债券", &["5"]),
                ],
                StatementKind::CashFlow => vec![],
            };
            Ok(StatementTable {
                periods: vec!["20231231".to_string(), "20221231".to_string()],
                rows,
            })
        }
    }

    #[tokio::test]
    async fn solvency_warning_drives_medium_risk() {
        let checker = RiskChecker::new(Arc::new(StrainedProvider));
        let report = checker.check_risks("000001").await;

        assert_eq!(report.classification, Classification::MediumRisk);
        let solvency = report
            .entries
            .iter()
            .find(|e| e.check == "偿债能力")
            .unwrap();
        assert_eq!(solvency.verdict.tier, VerdictTier::Warning);
    }
}
