use screener_core::{ScreenerError, StatementRow, StatementTable};

/// Header label of the period row in Sina statement downloads.
const PERIOD_HEADER: &str = "报表日期";

/// Parse a Sina statement download body into a table.
///
/// The body is tab-separated text: a period header row ("报表日期" followed
/// by one column per reporting period, latest first), then one line per line
/// item. Column order is kept exactly as received.
pub fn parse_statement(body: &str) -> Result<StatementTable, ScreenerError> {
    let mut periods: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for line in body.lines() {
        let mut cells: Vec<&str> = line.trim_end_matches('\r').split('\t').collect();
        // Sina lines often carry a trailing empty field
        while cells.last().is_some_and(|c| c.trim().is_empty()) {
            cells.pop();
        }
        if cells.is_empty() {
            continue;
        }

        let label = cells[0].trim();
        if label.is_empty() {
            continue;
        }

        if label == PERIOD_HEADER {
            periods = Some(cells[1..].iter().map(|c| c.trim().to_string()).collect());
            continue;
        }

        // Ignore preamble lines (e.g. the unit note) before the header row
        if periods.is_none() && cells.len() < 2 {
            continue;
        }

        rows.push(StatementRow {
            item: label.to_string(),
            values: cells[1..].iter().map(|c| c.trim().to_string()).collect(),
        });
    }

    let periods = periods.ok_or_else(|| {
        ScreenerError::MalformedStatement("missing 报表日期 header row".to_string())
    })?;

    Ok(StatementTable { periods, rows })
}
