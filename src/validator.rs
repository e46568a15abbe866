//! Integrity and policy checks over a resolution, and report assembly.
//!
//! Checks run in order: a scheme must have resolved, no column name may be
//! bound twice, and under [`ValidationPolicy::Strict`] no required column may
//! be missing. The first failing check decides the error.

use clap::ValueEnum;
use itertools::Itertools;
use log::warn;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{SchemeError, SchemeResult};
use crate::resolver::Resolution;
use crate::scheme::{ColumnDefinition, Workbook};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "kebab-case")]
pub enum ValidationPolicy {
    /// Missing required columns are reported but do not fail validation
    #[default]
    Lenient,
    /// Missing required columns fail validation
    Strict,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MissingColumns {
    pub required: Vec<String>,
    pub optional: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    #[serde(rename = "schema", serialize_with = "serialize_scheme_name")]
    pub scheme: Workbook,
    pub columns: Vec<ColumnDefinition>,
    pub missing: MissingColumns,
}

fn serialize_scheme_name<S: Serializer>(scheme: &Workbook, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&scheme.name)
}

impl VerificationReport {
    pub fn scheme_name(&self) -> &str {
        &self.scheme.name
    }
}

pub fn validate(
    resolution: Resolution<'_>,
    policy: ValidationPolicy,
) -> SchemeResult<VerificationReport> {
    let Resolution {
        scheme,
        header_match,
    } = resolution;
    let scheme = scheme.ok_or(SchemeError::SchemeNotFound)?;

    let duplicates = header_match
        .columns
        .iter()
        .map(|c| c.name.clone())
        .duplicates()
        .collect::<Vec<_>>();
    if !duplicates.is_empty() {
        warn!(
            "Scheme '{}' bound columns {:?} more than once",
            scheme.name, duplicates
        );
        return Err(SchemeError::DuplicateColumns(duplicates));
    }

    if !header_match.missing_required.is_empty() {
        match policy {
            ValidationPolicy::Strict => {
                return Err(SchemeError::MissingRequiredColumns(
                    header_match.missing_required,
                ));
            }
            ValidationPolicy::Lenient => warn!(
                "Scheme '{}' resolved without required column(s): {}",
                scheme.name,
                header_match.missing_required.join(", ")
            ),
        }
    }

    Ok(VerificationReport {
        scheme: scheme.clone(),
        columns: header_match.columns,
        missing: MissingColumns {
            required: header_match.missing_required,
            optional: header_match.missing_optional,
        },
    })
}

/// Caller-facing envelope: `{"data": report}` or `{"error": message}`.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<VerificationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<SchemeResult<VerificationReport>> for ValidationResponse {
    fn from(result: SchemeResult<VerificationReport>) -> Self {
        match result {
            Ok(report) => Self {
                data: Some(report),
                error: None,
            },
            Err(err) => Self {
                data: None,
                error: Some(err.to_string()),
            },
        }
    }
}
