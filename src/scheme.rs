//! Scheme model: workbook, header, columns, and header attributes.
//!
//! A [`Workbook`] describes one column-oriented document. Its
//! [`Header`] holds the [`ColumnDefinition`]s matched against a document's
//! header row, plus optional [`Attribute`]s (merged title cells and similar)
//! that are carried through untouched.
//!
//! ## Document shapes
//!
//! Scheme files have drifted over time. Parsing accepts:
//!
//! - the canonical nested shape `{name, header: {columns, attributes}}`
//! - the flat shape `{name, columns, attributes}`
//! - the legacy column keys `regex` (for `pattern`) and `index`
//!   (for `position`)
//!
//! Everything is migrated into the canonical type once, at parse time, and
//! serialized back out in the nested shape.

use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{SchemeError, SchemeResult};

pub const CURRENT_SCHEME_VERSION: &str = "1";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormatRule {
    pub formatter: String,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub name: String,
    #[serde(alias = "regex")]
    pub pattern: String,
    #[serde(default)]
    pub optional: bool,
    /// 1-based header cell index, `0` while unmatched.
    #[serde(default, alias = "index")]
    pub position: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Vec<FormatRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_attribute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output: Vec<String>,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>, optional: bool) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            optional,
            position: 0,
            format: None,
            model: None,
            model_attribute: None,
            mapping: None,
            output: Vec::new(),
        }
    }

    /// Compiles the column pattern so that it only matches at the start of a cell.
    ///
    /// Anchoring the end is left to the pattern author (`^ID$`).
    pub fn compile_pattern(&self) -> SchemeResult<Regex> {
        Regex::new(&format!("^(?:{})", self.pattern)).map_err(|err| {
            // Prefer the error for the pattern as written over the anchored form.
            let reason = Regex::new(&self.pattern).err().unwrap_or(err);
            SchemeError::InvalidPattern {
                column: self.name.clone(),
                reason: reason.to_string(),
            }
        })
    }
}

/// Header cell described by a fixed index rather than a pattern.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub index: usize,
    #[serde(default)]
    pub optional: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Header {
    pub columns: Vec<ColumnDefinition>,
    #[serde(default)]
    pub attributes: Option<Vec<Attribute>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "SchemeDocument")]
pub struct Workbook {
    pub name: String,
    pub header: Header,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SchemeDocument {
    Nested {
        name: String,
        header: Header,
        #[serde(default)]
        schema_version: Option<String>,
    },
    Flat {
        name: String,
        columns: Vec<ColumnDefinition>,
        #[serde(default)]
        attributes: Option<Vec<Attribute>>,
        #[serde(default)]
        schema_version: Option<String>,
    },
}

impl From<SchemeDocument> for Workbook {
    fn from(document: SchemeDocument) -> Self {
        match document {
            SchemeDocument::Nested {
                name,
                header,
                schema_version,
            } => Workbook {
                name,
                header,
                schema_version,
            },
            SchemeDocument::Flat {
                name,
                columns,
                attributes,
                schema_version,
            } => Workbook {
                name,
                header: Header {
                    columns,
                    attributes,
                },
                schema_version,
            },
        }
    }
}

/// Partial column update keyed by `name`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnPatch {
    pub name: String,
    #[serde(default, alias = "regex", skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Vec<FormatRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_attribute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttributePatch {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
}

impl Workbook {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDefinition>) -> Self {
        Self {
            name: name.into(),
            header: Header {
                columns,
                attributes: None,
            },
            schema_version: None,
        }
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.header.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.header.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.header.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn required_count(&self) -> usize {
        self.header.columns.iter().filter(|c| !c.optional).count()
    }

    pub fn attributes(&self) -> &[Attribute] {
        self.header.attributes.as_deref().unwrap_or_default()
    }

    pub fn add_column(&mut self, column: ColumnDefinition) -> SchemeResult<()> {
        if self.column(&column.name).is_some() {
            return Err(SchemeError::DuplicateColumnName(column.name));
        }
        column.compile_pattern()?;
        self.header.columns.push(column);
        Ok(())
    }

    pub fn update_column(&mut self, patch: ColumnPatch) -> SchemeResult<&ColumnDefinition> {
        let column = self
            .header
            .columns
            .iter_mut()
            .find(|c| c.name == patch.name)
            .ok_or_else(|| SchemeError::ColumnNotFound(patch.name.clone()))?;
        if let Some(pattern) = patch.pattern {
            let mut candidate = column.clone();
            candidate.pattern = pattern;
            candidate.compile_pattern()?;
            column.pattern = candidate.pattern;
        }
        if let Some(optional) = patch.optional {
            column.optional = optional;
        }
        if let Some(format) = patch.format {
            column.format = Some(format);
        }
        if let Some(model) = patch.model {
            column.model = Some(model);
        }
        if let Some(model_attribute) = patch.model_attribute {
            column.model_attribute = Some(model_attribute);
        }
        if let Some(mapping) = patch.mapping {
            column.mapping = Some(mapping);
        }
        if let Some(output) = patch.output {
            column.output = output;
        }
        Ok(column)
    }

    pub fn delete_column(&mut self, name: &str) -> SchemeResult<ColumnDefinition> {
        let idx = self
            .header
            .columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| SchemeError::ColumnNotFound(name.to_string()))?;
        Ok(self.header.columns.remove(idx))
    }

    pub fn add_attribute(&mut self, attribute: Attribute) -> SchemeResult<()> {
        let attributes = self
            .header
            .attributes
            .as_mut()
            .ok_or(SchemeError::MissingAttributes)?;
        attributes.push(attribute);
        Ok(())
    }

    pub fn update_attribute(&mut self, patch: AttributePatch) -> SchemeResult<&Attribute> {
        let attributes = self
            .header
            .attributes
            .as_mut()
            .ok_or(SchemeError::MissingAttributes)?;
        let attribute = attributes
            .iter_mut()
            .find(|a| a.name == patch.name)
            .ok_or_else(|| SchemeError::AttributeNotFound(patch.name.clone()))?;
        if let Some(index) = patch.index {
            attribute.index = index;
        }
        if let Some(optional) = patch.optional {
            attribute.optional = optional;
        }
        Ok(attribute)
    }

    /// Removes an attribute by name. A scheme without attributes is left as is.
    pub fn delete_attribute(&mut self, name: &str) -> SchemeResult<Option<Attribute>> {
        let Some(attributes) = self.header.attributes.as_mut() else {
            return Ok(None);
        };
        let idx = attributes
            .iter()
            .position(|a| a.name == name)
            .ok_or_else(|| SchemeError::AttributeNotFound(name.to_string()))?;
        Ok(Some(attributes.remove(idx)))
    }

    /// Fails with the first column name defined more than once.
    pub fn ensure_unique_column_names(&self) -> SchemeResult<()> {
        match self.header.columns.iter().map(|c| &c.name).duplicates().next() {
            Some(name) => Err(SchemeError::DuplicateColumnName(name.clone())),
            None => Ok(()),
        }
    }

    /// Compiles every column pattern, failing on the first invalid one.
    pub fn compile_patterns(&self) -> SchemeResult<Vec<Regex>> {
        self.header
            .columns
            .iter()
            .map(ColumnDefinition::compile_pattern)
            .collect()
    }
}
