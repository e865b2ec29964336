pub mod classifier_trait;
pub mod decision_tree;
pub mod factory;
pub mod random_forest;
