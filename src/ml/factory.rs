use crate::config::ModelConfig;
use crate::error::{AppError, Result};
use crate::ml::classifier::{DecisionTreeModel, Model, RandomForestModel};

/// Keys accepted by [`create_model`], in registry order
pub const MODEL_TYPES: &[&str] = &["decision_tree", "random_forest"];

/// Construct a fresh, untrained model for `model_type` with default
/// hyperparameters.
///
/// The registry is compiled in; adding a variant means a new match arm and
/// a new entry in [`MODEL_TYPES`].
pub fn create_model(model_type: &str) -> Result<Box<dyn Model>> {
    match model_type {
        "decision_tree" => Ok(Box::new(DecisionTreeModel::default())),
        "random_forest" => Ok(Box::new(RandomForestModel::default())),
        other => Err(AppError::UnknownModelType {
            requested: other.to_string(),
            known: MODEL_TYPES,
        }),
    }
}

/// Construct the variant selected by `config.model_type` with the configured
/// hyperparameters. Used by server and CLI startup.
pub fn create_model_from_config(config: &ModelConfig) -> Result<Box<dyn Model>> {
    match config.model_type.as_str() {
        "decision_tree" => Ok(Box::new(DecisionTreeModel::new(config.decision_tree))),
        "random_forest" => Ok(Box::new(RandomForestModel::new(config.random_forest))),
        other => Err(AppError::UnknownModelType {
            requested: other.to_string(),
            known: MODEL_TYPES,
        }),
    }
}
