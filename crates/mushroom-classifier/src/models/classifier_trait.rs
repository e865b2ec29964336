use ndarray::{Array2, ArrayView2};

use crate::error::ClassifierError;

/// Contract shared by the tree models. Class labels are indices into
/// `0..n_classes`; `predict_proba` returns one row per sample and one column
/// per class.
///
/// Fitted models are only ever read afterwards, so implementations must be
/// shareable across threads.
pub trait ClassifierModel: Send + Sync {
    fn fit(&mut self, x: &Array2<f32>, y: &[usize]) -> Result<(), ClassifierError>;

    /// Per-class probabilities; every row sums to one.
    fn predict_proba(&self, x: ArrayView2<f32>) -> Result<Array2<f64>, ClassifierError>;

    /// Most probable class per row. Ties go to the lower class index.
    fn predict(&self, x: ArrayView2<f32>) -> Result<Vec<usize>, ClassifierError> {
        let proba = self.predict_proba(x)?;
        Ok(proba
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .fold((0, f64::MIN), |best, (idx, &p)| if p > best.1 { (idx, p) } else { best })
                    .0
            })
            .collect())
    }

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
