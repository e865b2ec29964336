//! Missing-value imputation for encoded indicator matrices.
//!
//! The imputer learns one fallback per column from the training matrix and
//! later backfills the columns an encoding flagged as ambiguous.

use ndarray::{Array2, ArrayView1};

use crate::config::ImputerStrategy;
use crate::error::ClassifierError;

/// Per-column fallback values.
#[derive(Clone, Debug, PartialEq)]
pub struct SimpleImputer {
    pub fill: Vec<f32>,
    pub strategy: ImputerStrategy,
}

/// Most frequent value in a column. Ties go to the smaller value.
fn most_frequent(column: ArrayView1<f32>) -> f32 {
    let mut counts: Vec<(f32, usize)> = Vec::new();
    for &v in column.iter().filter(|v| v.is_finite()) {
        match counts.iter_mut().find(|(value, _)| *value == v) {
            Some((_, count)) => *count += 1,
            None => counts.push((v, 1)),
        }
    }

    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.total_cmp(&a.0)))
        .map(|(value, _)| value)
        .unwrap_or(0.0)
}

/// Fit a `SimpleImputer` from an `Array2<f32>` where rows are samples and
/// columns are schema columns.
pub fn fit_imputer(
    x: &Array2<f32>,
    strategy: &ImputerStrategy,
) -> Result<SimpleImputer, ClassifierError> {
    let (nrows, _) = x.dim();
    if nrows == 0 {
        return Err(ClassifierError::EmptyTrainingCorpus);
    }

    let fill = match strategy {
        ImputerStrategy::MostFrequent => x.columns().into_iter().map(most_frequent).collect(),
        ImputerStrategy::Constant { fill_value } => vec![*fill_value; x.ncols()],
    };

    Ok(SimpleImputer {
        fill,
        strategy: strategy.clone(),
    })
}

impl SimpleImputer {
    pub fn n_columns(&self) -> usize {
        self.fill.len()
    }

    /// Replace every value whose `ambiguous` flag is set with the column fallback.
    pub fn transform(&self, values: &[f32], ambiguous: &[bool]) -> Result<Vec<f32>, ClassifierError> {
        if values.len() != self.fill.len() || ambiguous.len() != self.fill.len() {
            return Err(ClassifierError::SchemaMismatch {
                expected: self.fill.len(),
                actual: values.len(),
            });
        }

        Ok(values
            .iter()
            .zip(ambiguous)
            .zip(&self.fill)
            .map(|((&v, &missing), &fill)| if missing || !v.is_finite() { fill } else { v })
            .collect())
    }

    /// Replace non-finite entries of a whole matrix with the column fallback.
    pub fn transform_matrix(&self, x: &Array2<f32>) -> Result<Array2<f32>, ClassifierError> {
        if x.ncols() != self.fill.len() {
            return Err(ClassifierError::SchemaMismatch {
                expected: self.fill.len(),
                actual: x.ncols(),
            });
        }
        let mut out = x.clone();
        for (mut column, &fill) in out.columns_mut().into_iter().zip(&self.fill) {
            column.mapv_inplace(|v| if v.is_finite() { v } else { fill });
        }
        Ok(out)
    }
}
