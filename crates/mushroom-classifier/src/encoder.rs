//! Schema-driven one-hot encoding.
//!
//! `encode` only looks at the assignment and the schema it is given. Training
//! rows and inference queries go through the exact same function, so a row
//! encoded at fit time and the same row encoded at query time are identical.
use ndarray::Array2;

use crate::catalog::Assignment;
use crate::error::ClassifierError;
use crate::schema::Schema;

/// Why an attribute contributed no signal to an encoded vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// The assignment leaves the attribute unset.
    Unset,
    /// The value has no schema column because training never observed it.
    UnseenValue(String),
}

/// Non-fatal note about an attribute whose block was left all-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    pub attribute: String,
    pub reason: UnresolvedReason,
}

/// An assignment laid out against a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedVector {
    values: Vec<f32>,
    ambiguous: Vec<bool>,
    unresolved: Vec<Unresolved>,
}

impl EncodedVector {
    /// Indicator values, one per schema column, in schema order.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Per-column flag marking the blocks of unresolved attributes.
    pub fn ambiguous(&self) -> &[bool] {
        &self.ambiguous
    }

    pub fn unresolved(&self) -> &[Unresolved] {
        &self.unresolved
    }

    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fail with `SchemaMismatch` unless the vector spans exactly `expected` columns.
    pub fn check_len(&self, expected: usize) -> Result<(), ClassifierError> {
        if self.values.len() != expected || self.ambiguous.len() != expected {
            return Err(ClassifierError::SchemaMismatch {
                expected,
                actual: self.values.len(),
            });
        }
        Ok(())
    }

    pub fn into_values(self) -> Vec<f32> {
        self.values
    }
}

/// Encode one assignment against `schema`.
///
/// A column is `1` when the assignment selects exactly that value and `0`
/// otherwise. An attribute that is unset, or set to a value without a column,
/// leaves its whole block at zero and flags it as ambiguous for the imputer.
/// Attributes the schema does not know are ignored here; rejecting them is the
/// caller's job.
pub fn encode(assignment: &Assignment, schema: &Schema) -> EncodedVector {
    let mut values = vec![0.0f32; schema.len()];
    let mut ambiguous = vec![false; schema.len()];
    let mut unresolved = Vec::new();

    for block in schema.blocks() {
        let selected = assignment.get(&block.attribute);
        let hit = selected.and_then(|value| {
            block
                .columns
                .clone()
                .find(|&idx| schema.columns()[idx].value == value)
        });

        match (selected, hit) {
            (Some(_), Some(idx)) => values[idx] = 1.0,
            (selected, _) => {
                for idx in block.columns.clone() {
                    ambiguous[idx] = true;
                }
                let reason = match selected {
                    Some(value) => UnresolvedReason::UnseenValue(value.to_string()),
                    None => UnresolvedReason::Unset,
                };
                log::debug!("No signal for '{}': {:?}", block.attribute, reason);
                unresolved.push(Unresolved {
                    attribute: block.attribute.clone(),
                    reason,
                });
            }
        }
    }

    EncodedVector {
        values,
        ambiguous,
        unresolved,
    }
}

/// Encode a whole training corpus into a `(rows, schema.len())` matrix.
pub fn encode_corpus(rows: &[Assignment], schema: &Schema) -> Result<Array2<f32>, ClassifierError> {
    let ncols = schema.len();
    let mut data = Vec::with_capacity(rows.len() * ncols);
    for (i, row) in rows.iter().enumerate() {
        let encoded = encode(row, schema);
        encoded.check_len(ncols)?;
        if let Some(note) = encoded.unresolved().first() {
            return Err(ClassifierError::InvalidCorpus(format!(
                "row {} leaves attribute '{}' unresolved",
                i, note.attribute
            )));
        }
        data.extend(encoded.into_values());
    }

    Array2::from_shape_vec((rows.len(), ncols), data).map_err(|e| {
        ClassifierError::InvalidCorpus(format!("could not assemble feature matrix: {}", e))
    })
}
