/// Machine learning module for protocol recommendation
///
/// Provides the uniform model contract (train / predict / evaluate /
/// save / load), the decision tree and random forest variants built on
/// smartcore, the string-keyed model factory, weighted evaluation
/// metrics, and the fixed-schema incident feature encoder.

pub mod classifier;
pub mod factory;
pub mod features;
pub mod metrics;

pub use classifier::{
    DecisionTreeModel, DecisionTreeParams, Model, RandomForestModel, RandomForestParams,
};
pub use factory::{create_model, create_model_from_config, MODEL_TYPES};
pub use features::FeatureEncoder;
pub use metrics::EvaluationReport;
