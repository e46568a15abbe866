//! Compiled scheme catalogue.
//!
//! Patterns are compiled once when the catalogue is built; the catalogue is
//! immutable afterwards and can be shared freely between threads.

use std::collections::HashSet;

use log::{debug, warn};
use regex::Regex;

use crate::error::{SchemeError, SchemeResult};
use crate::scheme::Workbook;

#[derive(Debug, Clone)]
pub struct CompiledScheme {
    scheme: Workbook,
    patterns: Vec<Regex>,
}

impl CompiledScheme {
    pub fn compile(mut scheme: Workbook) -> SchemeResult<Self> {
        let patterns = scheme.compile_patterns()?;
        // Positions stored in scheme files are stale; only a match assigns them.
        for column in &mut scheme.header.columns {
            column.position = 0;
        }
        let mut seen = HashSet::new();
        for column in scheme.columns() {
            if !seen.insert(column.name.as_str()) {
                warn!(
                    "Scheme '{}' defines column '{}' more than once",
                    scheme.name, column.name
                );
            }
        }
        Ok(Self { scheme, patterns })
    }

    pub fn scheme(&self) -> &Workbook {
        &self.scheme
    }

    pub fn name(&self) -> &str {
        &self.scheme.name
    }

    pub(crate) fn patterns(&self) -> &[Regex] {
        &self.patterns
    }
}

/// Every scheme available for one source, in catalogue order.
#[derive(Debug, Clone)]
pub struct Catalogue {
    schemes: Vec<CompiledScheme>,
}

impl Catalogue {
    /// Builds a catalogue, keeping the order of `schemes`.
    ///
    /// An empty list, or a scheme whose patterns do not compile, surfaces as
    /// [`SchemeError::SchemeNotLoaded`].
    pub fn new(schemes: Vec<Workbook>) -> SchemeResult<Self> {
        if schemes.is_empty() {
            return Err(SchemeError::SchemeNotLoaded(
                "no schemes available".to_string(),
            ));
        }
        let schemes = schemes
            .into_iter()
            .map(|scheme| {
                let name = scheme.name.clone();
                CompiledScheme::compile(scheme).map_err(|err| {
                    SchemeError::SchemeNotLoaded(format!("scheme '{name}': {err}"))
                })
            })
            .collect::<SchemeResult<Vec<_>>>()?;
        debug!("Compiled catalogue of {} scheme(s)", schemes.len());
        Ok(Self { schemes })
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledScheme> {
        self.schemes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::ColumnDefinition;

    #[test]
    fn empty_catalogue_is_not_loaded() {
        let err = Catalogue::new(Vec::new()).unwrap_err();
        assert!(matches!(err, SchemeError::SchemeNotLoaded(_)));
    }

    #[test]
    fn compile_resets_stored_positions() {
        let mut column = ColumnDefinition::new("id", "^ID$", false);
        column.position = 7;
        let compiled = CompiledScheme::compile(Workbook::new("s", vec![column])).expect("compile");
        assert_eq!(compiled.scheme().columns()[0].position, 0);
    }

    #[test]
    fn invalid_pattern_fails_catalogue_naming_the_scheme() {
        let scheme = Workbook::new("s", vec![ColumnDefinition::new("bad", "(?P<", false)]);
        match Catalogue::new(vec![scheme]).unwrap_err() {
            SchemeError::SchemeNotLoaded(reason) => {
                assert!(reason.starts_with("scheme 's': Column 'bad' has an invalid pattern"));
                assert!(!reason.contains("^(?:"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn catalogue_keeps_input_order() {
        let catalogue = Catalogue::new(vec![
            Workbook::new("first", vec![ColumnDefinition::new("a", "^A$", false)]),
            Workbook::new("second", vec![ColumnDefinition::new("b", "^B$", false)]),
        ])
        .expect("catalogue");
        assert_eq!(catalogue.len(), 2);
        let names = catalogue.iter().map(|s| s.name()).collect::<Vec<_>>();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn catalogue_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Catalogue>();
    }
}
