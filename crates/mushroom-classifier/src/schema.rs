//! Canonical binary indicator columns derived from a training corpus.
//!
//! Columns are laid out attribute by attribute in catalog order. Within an
//! attribute, values appear in the order they are first observed in the
//! corpus. Catalog values that never occur get no column.
use std::fmt;
use std::ops::Range;

use crate::catalog::{Assignment, FeatureCatalog};
use crate::error::ClassifierError;

/// One `(attribute, value)` indicator column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    pub attribute: String,
    pub value: String,
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}_{}", self.attribute, self.value)
    }
}

/// Contiguous run of columns that belong to a single attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeBlock {
    pub attribute: String,
    pub columns: Range<usize>,
}

/// Frozen, ordered column layout. Only `build` creates one, and nothing
/// mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<Column>,
    blocks: Vec<AttributeBlock>,
}

impl Schema {
    /// Derive the schema from the attribute values present in `corpus`.
    ///
    /// Every row must set every catalog attribute and nothing else.
    pub fn build(catalog: &FeatureCatalog, corpus: &[Assignment]) -> Result<Self, ClassifierError> {
        for (i, row) in corpus.iter().enumerate() {
            if let Some(name) = row.attributes().find(|name| !catalog.contains(name)) {
                return Err(ClassifierError::InvalidCorpus(format!(
                    "row {} names unknown attribute '{}'",
                    i, name
                )));
            }
        }

        let mut columns = Vec::new();
        let mut blocks = Vec::with_capacity(catalog.len());

        for attribute in catalog.attributes() {
            let start = columns.len();
            let mut observed: Vec<&str> = Vec::new();

            for (i, row) in corpus.iter().enumerate() {
                let value = row.get(attribute.name()).ok_or_else(|| {
                    ClassifierError::InvalidCorpus(format!(
                        "row {} does not set attribute '{}'",
                        i,
                        attribute.name()
                    ))
                })?;
                if !observed.contains(&value) {
                    if !attribute.is_legal(value) {
                        log::warn!(
                            "Training value '{}' for '{}' is not in the catalog",
                            value,
                            attribute.name()
                        );
                    }
                    observed.push(value);
                }
            }

            columns.extend(observed.into_iter().map(|value| Column {
                attribute: attribute.name().to_string(),
                value: value.to_string(),
            }));
            blocks.push(AttributeBlock {
                attribute: attribute.name().to_string(),
                columns: start..columns.len(),
            });
        }

        log::debug!(
            "Built schema with {} columns over {} attributes",
            columns.len(),
            blocks.len()
        );

        Ok(Schema { columns, blocks })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn blocks(&self) -> &[AttributeBlock] {
        &self.blocks
    }

    pub fn block(&self, attribute: &str) -> Option<&AttributeBlock> {
        self.blocks.iter().find(|b| b.attribute == attribute)
    }

    /// Column index of `(attribute, value)`, if the value was observed in training.
    pub fn column_index(&self, attribute: &str, value: &str) -> Option<usize> {
        let block = self.block(attribute)?;
        block
            .columns
            .clone()
            .find(|&idx| self.columns[idx].value == value)
    }

    /// Column names in `ATTRIBUTE_value` form.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.to_string()).collect()
    }
}
