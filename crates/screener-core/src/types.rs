use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScreenerError;

/// The three standard financial statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    Income,
    Balance,
    CashFlow,
}

impl StatementKind {
    pub fn name(&self) -> &'static str {
        match self {
            StatementKind::Income => "income statement",
            StatementKind::Balance => "balance sheet",
            StatementKind::CashFlow => "cash flow statement",
        }
    }
}

/// One line item of a statement: a label plus one cell per reporting period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementRow {
    pub item: String,
    pub values: Vec<String>,
}

/// A financial statement as a label-keyed table over reporting periods.
///
/// Column order is preserved exactly as the source returned it (Sina reports
/// latest period first). Period-over-period comparisons depend on that order,
/// so the table is never re-sorted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatementTable {
    /// Reporting period headers, one per value column.
    pub periods: Vec<String>,
    pub rows: Vec<StatementRow>,
}

impl StatementTable {
    /// Look up a row by exact label match.
    pub fn row(&self, item: &str) -> Option<&StatementRow> {
        self.rows.iter().find(|r| r.item == item)
    }

    /// All period values of a line item, parsed as numbers.
    pub fn values_f64(&self, item: &str) -> Result<Vec<f64>, ScreenerError> {
        let row = self
            .row(item)
            .ok_or_else(|| ScreenerError::RowNotFound(item.to_string()))?;
        row.values.iter().map(|v| parse_cell(item, v)).collect()
    }

    /// The most recent period's value of a line item (first data column).
    pub fn latest_f64(&self, item: &str) -> Result<f64, ScreenerError> {
        let row = self
            .row(item)
            .ok_or_else(|| ScreenerError::RowNotFound(item.to_string()))?;
        let cell = row
            .values
            .first()
            .ok_or_else(|| ScreenerError::RowNotFound(item.to_string()))?;
        parse_cell(item, cell)
    }
}

fn parse_cell(item: &str, value: &str) -> Result<f64, ScreenerError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ScreenerError::NotNumeric {
            item: item.to_string(),
            value: value.to_string(),
        })
}

/// The three statements of one company, fetched together for one check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementSet {
    pub income: StatementTable,
    pub balance: StatementTable,
    pub cash_flow: StatementTable,
}

/// Severity tier of a single rule outcome.
///
/// `Warning` is a computed risk signal (e.g. elevated repayment pressure);
/// `InsufficientData` is a data-quality signal. Both aggregate to medium
/// severity but they mean different things and are kept distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerdictTier {
    Pass,
    Warning,
    Fail,
    InsufficientData,
}

/// Outcome of one rule: a severity tier plus a display label.
///
/// Aggregation switches on the tier only; the label is purely cosmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub tier: VerdictTier,
    pub label: String,
}

impl Verdict {
    pub fn pass(label: impl Into<String>) -> Self {
        Self { tier: VerdictTier::Pass, label: label.into() }
    }

    pub fn warning(label: impl Into<String>) -> Self {
        Self { tier: VerdictTier::Warning, label: label.into() }
    }

    pub fn fail(label: impl Into<String>) -> Self {
        Self { tier: VerdictTier::Fail, label: label.into() }
    }

    pub fn insufficient_data(label: impl Into<String>) -> Self {
        Self { tier: VerdictTier::InsufficientData, label: label.into() }
    }
}

/// Overall risk classification for one stock, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Classification {
    LowRisk,
    MediumRisk,
    HighRisk,
}

impl Classification {
    /// Human-readable conclusion shown in the report's final row.
    pub fn label(&self) -> &'static str {
        match self {
            Classification::LowRisk => "低风险，可进一步研究",
            Classification::MediumRisk => "中风险，需谨慎",
            Classification::HighRisk => "高风险，建议排除",
        }
    }
}

/// One labeled check result in a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    pub check: String,
    pub verdict: Verdict,
}

/// Completed screening report for one stock identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    pub symbol: String,
    pub generated_at: DateTime<Utc>,
    /// Per-check entries in evaluation order (or a single fetch-error entry).
    pub entries: Vec<ReportEntry>,
    pub classification: Classification,
}

/// Fixed key of the synthesized conclusion row.
pub const CONCLUSION_KEY: &str = "最终结论";

impl RiskReport {
    /// Two-column view for presentation layers: every check entry followed
    /// by the conclusion row. Always contains at least the conclusion.
    pub fn table(&self) -> Vec<(String, String)> {
        let mut rows: Vec<(String, String)> = self
            .entries
            .iter()
            .map(|e| (e.check.clone(), e.verdict.label.clone()))
            .collect();
        rows.push((CONCLUSION_KEY.to_string(), self.classification.label().to_string()));
        rows
    }
}
