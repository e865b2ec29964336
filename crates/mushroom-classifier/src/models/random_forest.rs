use linfa::traits::Predict;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::config::MaxFeatures;
use crate::error::ClassifierError;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::decision_tree::{add_votes, check_training_input, fit_tree, TreeParams};

/// A fitted tree and the feature columns it was trained on.
struct SubspaceTree {
    features: Vec<usize>,
    model: DecisionTree<f64, usize>,
}

/// Bagged ensemble of linfa decision trees.
///
/// Each tree sees its own bootstrap sample and its own random subset of
/// `max_features` columns, both drawn from an RNG seeded from a master RNG in
/// tree order. Trees can therefore be fitted in parallel and still come out
/// identical for a given seed. Probabilities are per-class vote shares.
pub struct RandomForestClassifier {
    n_trees: usize,
    tree_params: TreeParams,
    max_features: MaxFeatures,
    bootstrap: bool,
    n_classes: usize,
    seed: u64,
    trees: Vec<SubspaceTree>,
    n_features: Option<usize>,
}

impl RandomForestClassifier {
    pub fn new(
        n_trees: usize,
        tree_params: TreeParams,
        max_features: MaxFeatures,
        bootstrap: bool,
        n_classes: usize,
        seed: u64,
    ) -> Self {
        RandomForestClassifier {
            n_trees,
            tree_params,
            max_features,
            bootstrap,
            n_classes,
            seed,
            trees: Vec::new(),
            n_features: None,
        }
    }

    pub fn n_fitted_trees(&self) -> usize {
        self.trees.len()
    }
}

impl ClassifierModel for RandomForestClassifier {
    fn fit(&mut self, x: &Array2<f32>, y: &[usize]) -> Result<(), ClassifierError> {
        check_training_input(x, y, self.n_classes)?;
        if self.n_trees == 0 {
            return Err(ClassifierError::InvalidConfig(
                "n_trees must be at least 1".to_string(),
            ));
        }

        let (n_samples, n_features) = x.dim();
        let n_subspace = self.max_features.resolve(n_features);
        let records = x.mapv(f64::from);
        let targets = Array1::from(y.to_vec());

        let mut master = StdRng::seed_from_u64(self.seed);
        let tree_seeds: Vec<u64> = (0..self.n_trees).map(|_| master.gen()).collect();

        let trees = tree_seeds
            .into_par_iter()
            .map(|tree_seed| -> Result<SubspaceTree, ClassifierError> {
                let mut rng = StdRng::seed_from_u64(tree_seed);
                let rows: Vec<usize> = if self.bootstrap {
                    (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
                } else {
                    (0..n_samples).collect()
                };
                let mut features = index::sample(&mut rng, n_features, n_subspace).into_vec();
                features.sort_unstable();

                let sample = records.select(Axis(0), &rows).select(Axis(1), &features);
                let model = fit_tree(&self.tree_params, sample, targets.select(Axis(0), &rows))?;
                Ok(SubspaceTree { features, model })
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "Fitted {} trees on {} of {} features each",
            trees.len(),
            n_subspace,
            n_features
        );

        self.trees = trees;
        self.n_features = Some(n_features);
        Ok(())
    }

    fn predict_proba(&self, x: ArrayView2<f32>) -> Result<Array2<f64>, ClassifierError> {
        let Some(expected) = self.n_features else {
            return Err(ClassifierError::NotFitted("random forest"));
        };
        if expected != x.ncols() {
            return Err(ClassifierError::SchemaMismatch {
                expected,
                actual: x.ncols(),
            });
        }

        let records = x.mapv(f64::from);
        let mut out = Array2::<f64>::zeros((x.nrows(), self.n_classes));
        for tree in &self.trees {
            let labels: Array1<usize> = tree.model.predict(&records.select(Axis(1), &tree.features));
            add_votes(&mut out, &labels);
        }
        out.mapv_inplace(|votes| votes / self.trees.len() as f64);
        Ok(out)
    }

    fn name(&self) -> &str {
        "random_forest"
    }
}
