use crate::config::{ModelConfig, ModelType};
use crate::models::classifier_trait::ClassifierModel;
use crate::models::decision_tree::{DecisionTreeClassifier, TreeParams};
use crate::models::random_forest::RandomForestClassifier;

/// Build a boxed, unfitted classifier from a `ModelConfig`.
pub fn build_model(params: &ModelConfig, n_classes: usize) -> Box<dyn ClassifierModel> {
    match &params.model_type {
        ModelType::RandomForest {
            n_trees,
            max_depth,
            min_samples_split,
            min_samples_leaf,
            max_features,
            bootstrap,
        } => {
            let tree_params = TreeParams {
                max_depth: *max_depth,
                min_samples_split: *min_samples_split,
                min_samples_leaf: *min_samples_leaf,
            };
            Box::new(RandomForestClassifier::new(
                *n_trees,
                tree_params,
                *max_features,
                *bootstrap,
                n_classes,
                params.seed,
            ))
        }

        ModelType::DecisionTree {
            max_depth,
            min_samples_split,
            min_samples_leaf,
        } => {
            let tree_params = TreeParams {
                max_depth: *max_depth,
                min_samples_split: *min_samples_split,
                min_samples_leaf: *min_samples_leaf,
            };
            Box::new(DecisionTreeClassifier::new(tree_params, n_classes))
        }
    }
}
