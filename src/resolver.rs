//! Resolution of a header row against the whole catalogue.

use log::{debug, info};

use crate::catalogue::Catalogue;
use crate::error::SchemeResult;
use crate::matcher::{HeaderMatch, match_header};
use crate::scheme::Workbook;
use crate::validator::{ValidationPolicy, VerificationReport, validate};

/// Outcome of walking the catalogue: the first scheme accounting for every
/// header cell, with its match, or nothing at all.
#[derive(Debug, Clone, Default)]
pub struct Resolution<'a> {
    pub scheme: Option<&'a Workbook>,
    pub header_match: HeaderMatch,
}

impl Resolution<'_> {
    pub fn is_resolved(&self) -> bool {
        self.scheme.is_some()
    }
}

/// Returns the first scheme, in catalogue order, whose matched column count
/// equals the number of header cells. Partial matches are discarded.
///
/// An empty header matches zero columns and so resolves to the first scheme.
pub fn resolve<'a, S: AsRef<str>>(catalogue: &'a Catalogue, cells: &[S]) -> Resolution<'a> {
    for compiled in catalogue.iter() {
        let header_match = match_header(compiled, cells);
        debug!(
            "Scheme '{}' matched {} of {} cell(s)",
            compiled.name(),
            header_match.matched_count(),
            cells.len()
        );
        if header_match.matched_count() == cells.len() {
            info!("Header resolved to scheme '{}'", compiled.name());
            return Resolution {
                scheme: Some(compiled.scheme()),
                header_match,
            };
        }
    }
    Resolution::default()
}

/// Resolves `cells` against `catalogue` and validates the result.
pub fn verify<S: AsRef<str>>(
    catalogue: &Catalogue,
    cells: &[S],
    policy: ValidationPolicy,
) -> SchemeResult<VerificationReport> {
    validate(resolve(catalogue, cells), policy)
}
