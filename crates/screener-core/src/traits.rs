use async_trait::async_trait;

use crate::{ScreenerError, StatementKind, StatementSet, StatementTable, Verdict};

/// Trait for statement data sources.
///
/// A provider returns one statement table per (symbol, kind) request. All of
/// its failure modes (network error, unknown identifier, schema drift) are
/// opaque to the checker and surface as a `ScreenerError`.
#[async_trait]
pub trait StatementProvider: Send + Sync {
    async fn fetch(
        &self,
        symbol: &str,
        kind: StatementKind,
    ) -> Result<StatementTable, ScreenerError>;
}

/// Trait for red-flag rules.
///
/// Rules are pure functions over the statement set: no side effects, no
/// mutation, and `evaluate` must always produce a verdict — a rule that
/// cannot find or parse its required line items fails closed to
/// `InsufficientData` rather than returning an error.
pub trait RiskRule: Send + Sync {
    /// Fixed check name this rule's verdict is recorded under.
    fn name(&self) -> &'static str;

    fn evaluate(&self, statements: &StatementSet) -> Verdict;
}
