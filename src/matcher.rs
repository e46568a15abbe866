//! Header matching against a single scheme.
//!
//! Cells are scanned left to right. Each cell binds to the first column, in
//! authoring order, whose pattern matches the start of the cell text and
//! that has not been bound to an earlier cell. Cells that match nothing are
//! skipped.
//!
//! Matching never writes into the scheme: bound columns are returned as
//! copies carrying their 1-based `position`, so a catalogue can be matched
//! against concurrently and repeatedly without stale positions.

use log::trace;
use serde::Serialize;

use crate::catalogue::CompiledScheme;
use crate::scheme::ColumnDefinition;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeaderMatch {
    /// Bound columns in header order, each with its resolved position.
    pub columns: Vec<ColumnDefinition>,
    pub missing_required: Vec<String>,
    pub missing_optional: Vec<String>,
}

impl HeaderMatch {
    pub fn matched_count(&self) -> usize {
        self.columns.len()
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.position)
    }

    /// Column name to header position, in header order.
    pub fn positions(&self) -> Vec<(&str, usize)> {
        self.columns
            .iter()
            .map(|c| (c.name.as_str(), c.position))
            .collect()
    }
}

pub fn match_header<S: AsRef<str>>(scheme: &CompiledScheme, cells: &[S]) -> HeaderMatch {
    let columns = scheme.scheme().columns();
    let patterns = scheme.patterns();
    let mut bound = vec![false; columns.len()];
    let mut matched = Vec::with_capacity(cells.len().min(columns.len()));

    for (idx, cell) in cells.iter().enumerate() {
        let position = idx + 1;
        let text = cell.as_ref();
        let hit = patterns
            .iter()
            .enumerate()
            .find(|(col_idx, pattern)| !bound[*col_idx] && pattern.is_match(text))
            .map(|(col_idx, _)| col_idx);
        match hit {
            Some(col_idx) => {
                bound[col_idx] = true;
                let mut column = columns[col_idx].clone();
                column.position = position;
                trace!(
                    "{}: cell {} '{}' -> column '{}'",
                    scheme.name(),
                    position,
                    text,
                    column.name
                );
                matched.push(column);
            }
            None => trace!("{}: cell {} '{}' unmatched", scheme.name(), position, text),
        }
    }

    let (missing_optional, missing_required): (Vec<_>, Vec<_>) = columns
        .iter()
        .zip(&bound)
        .filter(|(_, is_bound)| !**is_bound)
        .map(|(column, _)| column)
        .partition(|column| column.optional);

    HeaderMatch {
        columns: matched,
        missing_required: missing_required.into_iter().map(|c| c.name.clone()).collect(),
        missing_optional: missing_optional.into_iter().map(|c| c.name.clone()).collect(),
    }
}
