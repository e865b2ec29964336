use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::{Array1, Array2, ArrayView2};

use crate::error::ClassifierError;
use crate::models::classifier_trait::ClassifierModel;

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        TreeParams {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

/// Check labels against `n_classes` and the row count of `x`.
pub(crate) fn check_training_input(
    x: &Array2<f32>,
    y: &[usize],
    n_classes: usize,
) -> Result<(), ClassifierError> {
    if x.nrows() != y.len() {
        return Err(ClassifierError::InvalidCorpus(format!(
            "{} feature rows but {} labels",
            x.nrows(),
            y.len()
        )));
    }
    if y.is_empty() {
        return Err(ClassifierError::EmptyTrainingCorpus);
    }
    if x.ncols() == 0 {
        return Err(ClassifierError::InvalidCorpus(
            "feature matrix has no columns".to_string(),
        ));
    }
    if let Some(&bad) = y.iter().find(|&&label| label >= n_classes) {
        return Err(ClassifierError::InvalidCorpus(format!(
            "label index {} outside 0..{}",
            bad, n_classes
        )));
    }
    Ok(())
}

/// Fit one Gini tree. Every row carries unit weight, so the sample-count
/// limits map directly onto linfa's weight limits.
pub(crate) fn fit_tree(
    params: &TreeParams,
    records: Array2<f64>,
    targets: Array1<usize>,
) -> Result<DecisionTree<f64, usize>, ClassifierError> {
    let dataset = Dataset::new(records, targets);
    let tree_params = DecisionTree::<f64, usize>::params()
        .split_quality(SplitQuality::Gini)
        .max_depth(params.max_depth)
        .min_weight_split(params.min_samples_split as f32)
        .min_weight_leaf(params.min_samples_leaf as f32);
    let fitted: Result<DecisionTree<f64, usize>, linfa::Error> = tree_params.fit(&dataset);
    Ok(fitted?)
}

/// Add one vote per row for the predicted class.
pub(crate) fn add_votes(out: &mut Array2<f64>, labels: &Array1<usize>) {
    for (row, &label) in labels.iter().enumerate() {
        if let Some(cell) = out.get_mut((row, label)) {
            *cell += 1.0;
        }
    }
}

/// Single CART tree.
///
/// `predict_proba` is the one-hot vote of the tree, so a lone tree always
/// reports probability 0 or 1.
pub struct DecisionTreeClassifier {
    params: TreeParams,
    n_classes: usize,
    model: Option<DecisionTree<f64, usize>>,
    n_features: usize,
}

impl DecisionTreeClassifier {
    pub fn new(params: TreeParams, n_classes: usize) -> Self {
        DecisionTreeClassifier {
            params,
            n_classes,
            model: None,
            n_features: 0,
        }
    }

    fn fitted(&self, x: &ArrayView2<f32>) -> Result<&DecisionTree<f64, usize>, ClassifierError> {
        let model = self
            .model
            .as_ref()
            .ok_or(ClassifierError::NotFitted("decision tree"))?;
        if x.ncols() != self.n_features {
            return Err(ClassifierError::SchemaMismatch {
                expected: self.n_features,
                actual: x.ncols(),
            });
        }
        Ok(model)
    }
}

impl ClassifierModel for DecisionTreeClassifier {
    fn fit(&mut self, x: &Array2<f32>, y: &[usize]) -> Result<(), ClassifierError> {
        check_training_input(x, y, self.n_classes)?;
        let model = fit_tree(&self.params, x.mapv(f64::from), Array1::from(y.to_vec()))?;
        self.model = Some(model);
        self.n_features = x.ncols();
        Ok(())
    }

    fn predict_proba(&self, x: ArrayView2<f32>) -> Result<Array2<f64>, ClassifierError> {
        let model = self.fitted(&x)?;
        let labels: Array1<usize> = model.predict(&x.mapv(f64::from));
        let mut out = Array2::zeros((x.nrows(), self.n_classes));
        add_votes(&mut out, &labels);
        Ok(out)
    }

    fn name(&self) -> &str {
        "decision_tree"
    }
}
