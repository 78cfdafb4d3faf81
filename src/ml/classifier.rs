use crate::error::{AppError, Result};
use crate::ml::metrics::{self, EvaluationReport};
use ndarray::Array2;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::{
    DecisionTreeClassifier, DecisionTreeClassifierParameters, SplitCriterion,
};
use std::path::Path;

type TreeEstimator = DecisionTreeClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>;
type ForestEstimator = RandomForestClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>;

/// Uniform contract for protocol classifiers.
///
/// An instance starts untrained; `train` or `load` moves it to trained, and
/// only then do `predict`, `evaluate`, and `save` succeed. The underlying
/// estimator is owned exclusively by the instance and replaced wholesale on
/// every `train`/`load`.
pub trait Model: Send + Sync + std::fmt::Debug {
    /// Human-readable variant name
    fn model_name(&self) -> &'static str;

    /// Whether a fitted estimator is present
    fn is_trained(&self) -> bool;

    /// Fit the underlying estimator on labeled data.
    ///
    /// `labels` must be one class label per feature row. Shape problems are
    /// not pre-validated here; they surface as the backend's own error.
    fn train(&mut self, features: &Array2<f64>, labels: &[i32]) -> Result<()>;

    /// Predict one class label per feature row, in input order
    fn predict(&self, features: &Array2<f64>) -> Result<Vec<i32>>;

    /// Predict on `features` and score against `labels`.
    ///
    /// Computed fresh on every call; nothing is cached on the instance.
    fn evaluate(&self, features: &Array2<f64>, labels: &[i32]) -> Result<EvaluationReport> {
        let predicted = self.predict(features)?;
        Ok(metrics::weighted_report(labels, &predicted))
    }

    /// Serialize the underlying estimator to `path`, overwriting
    fn save(&self, path: &Path) -> Result<()>;

    /// Replace the underlying estimator with one decoded from `path`.
    ///
    /// Succeeds regardless of prior state. The artifact carries no shape
    /// information; an incompatible one fails later, at predict time.
    fn load(&mut self, path: &Path) -> Result<()>;
}

/// Decision tree hyperparameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DecisionTreeParams {
    /// Maximum tree depth
    #[serde(default = "default_max_depth")]
    pub max_depth: u16,

    /// Seed for split tie-breaking
    #[serde(default = "default_random_state")]
    pub random_state: u64,
}

impl Default for DecisionTreeParams {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            random_state: default_random_state(),
        }
    }
}

/// Random forest hyperparameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RandomForestParams {
    /// Ensemble size
    #[serde(default = "default_n_estimators")]
    pub n_estimators: u16,

    /// Maximum per-tree depth
    #[serde(default = "default_max_depth")]
    pub max_depth: u16,

    /// Seed for bootstrap sampling and split tie-breaking
    #[serde(default = "default_random_state")]
    pub random_state: u64,
}

impl Default for RandomForestParams {
    fn default() -> Self {
        Self {
            n_estimators: default_n_estimators(),
            max_depth: default_max_depth(),
            random_state: default_random_state(),
        }
    }
}

fn default_max_depth() -> u16 {
    10
}

fn default_n_estimators() -> u16 {
    100
}

fn default_random_state() -> u64 {
    42
}

fn to_dense_matrix(features: &Array2<f64>) -> DenseMatrix<f64> {
    let shape = features.shape();
    let data: Vec<f64> = features.iter().copied().collect();
    DenseMatrix::new(shape[0], shape[1], data, false)
}

fn write_artifact<T: Serialize>(estimator: &T, model: &'static str, path: &Path) -> Result<()> {
    let bytes = bincode::serialize(estimator)
        .map_err(|e| AppError::Serialization(format!("failed to encode {model} artifact: {e}")))?;
    std::fs::write(path, bytes).map_err(|e| AppError::Artifact {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn read_artifact<T: DeserializeOwned>(model: &'static str, path: &Path) -> Result<T> {
    let bytes = std::fs::read(path).map_err(|e| AppError::Artifact {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    bincode::deserialize(&bytes).map_err(|e| {
        AppError::Serialization(format!(
            "invalid {model} artifact at {}: {e}",
            path.display()
        ))
    })
}

/// Decision tree classifier
#[derive(Debug)]
pub struct DecisionTreeModel {
    params: DecisionTreeParams,
    estimator: Option<TreeEstimator>,
}

impl DecisionTreeModel {
    pub const NAME: &'static str = "DecisionTree";

    pub fn new(params: DecisionTreeParams) -> Self {
        Self {
            params,
            estimator: None,
        }
    }

    pub fn params(&self) -> &DecisionTreeParams {
        &self.params
    }
}

impl Default for DecisionTreeModel {
    fn default() -> Self {
        Self::new(DecisionTreeParams::default())
    }
}

impl Model for DecisionTreeModel {
    fn model_name(&self) -> &'static str {
        Self::NAME
    }

    fn is_trained(&self) -> bool {
        self.estimator.is_some()
    }

    fn train(&mut self, features: &Array2<f64>, labels: &[i32]) -> Result<()> {
        let x = to_dense_matrix(features);
        let y = labels.to_vec();

        let mut params = DecisionTreeClassifierParameters::default()
            .with_criterion(SplitCriterion::Gini)
            .with_max_depth(self.params.max_depth);
        params.seed = Some(self.params.random_state);

        let estimator = DecisionTreeClassifier::fit(&x, &y, params).map_err(|e| {
            AppError::Training {
                model: Self::NAME,
                message: e.to_string(),
            }
        })?;

        self.estimator = Some(estimator);
        Ok(())
    }

    fn predict(&self, features: &Array2<f64>) -> Result<Vec<i32>> {
        let estimator = self
            .estimator
            .as_ref()
            .ok_or(AppError::ModelNotTrained { model: Self::NAME })?;

        let x = to_dense_matrix(features);
        estimator.predict(&x).map_err(|e| AppError::Prediction {
            model: Self::NAME,
            message: e.to_string(),
        })
    }

    fn save(&self, path: &Path) -> Result<()> {
        let estimator = self
            .estimator
            .as_ref()
            .ok_or(AppError::ModelNotInitialized { model: Self::NAME })?;
        write_artifact(estimator, Self::NAME, path)
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        self.estimator = Some(read_artifact::<TreeEstimator>(Self::NAME, path)?);
        Ok(())
    }
}

/// Random forest classifier
#[derive(Debug)]
pub struct RandomForestModel {
    params: RandomForestParams,
    estimator: Option<ForestEstimator>,
}

impl RandomForestModel {
    pub const NAME: &'static str = "RandomForest";

    pub fn new(params: RandomForestParams) -> Self {
        Self {
            params,
            estimator: None,
        }
    }

    pub fn params(&self) -> &RandomForestParams {
        &self.params
    }
}

impl Default for RandomForestModel {
    fn default() -> Self {
        Self::new(RandomForestParams::default())
    }
}

impl Model for RandomForestModel {
    fn model_name(&self) -> &'static str {
        Self::NAME
    }

    fn is_trained(&self) -> bool {
        self.estimator.is_some()
    }

    fn train(&mut self, features: &Array2<f64>, labels: &[i32]) -> Result<()> {
        let x = to_dense_matrix(features);
        let y = labels.to_vec();

        let mut params = RandomForestClassifierParameters::default()
            .with_n_trees(self.params.n_estimators)
            .with_max_depth(self.params.max_depth);
        params.seed = self.params.random_state;

        let estimator = RandomForestClassifier::fit(&x, &y, params).map_err(|e| {
            AppError::Training {
                model: Self::NAME,
                message: e.to_string(),
            }
        })?;

        self.estimator = Some(estimator);
        Ok(())
    }

    fn predict(&self, features: &Array2<f64>) -> Result<Vec<i32>> {
        let estimator = self
            .estimator
            .as_ref()
            .ok_or(AppError::ModelNotTrained { model: Self::NAME })?;

        let x = to_dense_matrix(features);
        estimator.predict(&x).map_err(|e| AppError::Prediction {
            model: Self::NAME,
            message: e.to_string(),
        })
    }

    fn save(&self, path: &Path) -> Result<()> {
        let estimator = self
            .estimator
            .as_ref()
            .ok_or(AppError::ModelNotInitialized { model: Self::NAME })?;
        write_artifact(estimator, Self::NAME, path)
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        self.estimator = Some(read_artifact::<ForestEstimator>(Self::NAME, path)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two well-separated clusters, deterministic
    fn binary_dataset(n_rows: usize) -> (Array2<f64>, Vec<i32>) {
        let mut features = Array2::zeros((n_rows, 3));
        let mut labels = Vec::with_capacity(n_rows);
        for i in 0..n_rows {
            let class = (i % 2) as i32;
            for j in 0..3 {
                features[[i, j]] = class as f64 * 10.0 + ((i * 7 + j * 3) % 5) as f64 * 0.1;
            }
            labels.push(class);
        }
        (features, labels)
    }

    #[test]
    fn test_decision_tree_train_predict() {
        let (features, labels) = binary_dataset(40);
        let mut model = DecisionTreeModel::default();

        assert!(!model.is_trained());
        model.train(&features, &labels).unwrap();
        assert!(model.is_trained());

        let predicted = model.predict(&features).unwrap();
        assert_eq!(predicted.len(), 40);
        assert_eq!(predicted, labels);
    }

    #[test]
    fn test_random_forest_train_predict() {
        let (features, labels) = binary_dataset(40);
        let mut model = RandomForestModel::new(RandomForestParams {
            n_estimators: 10,
            ..Default::default()
        });

        model.train(&features, &labels).unwrap();
        let predicted = model.predict(&features).unwrap();
        assert_eq!(predicted.len(), 40);
    }

    #[test]
    fn test_predict_untrained_fails() {
        let (features, _) = binary_dataset(4);
        let model = DecisionTreeModel::default();

        match model.predict(&features) {
            Err(AppError::ModelNotTrained { model }) => {
                assert_eq!(model, DecisionTreeModel::NAME)
            }
            other => panic!("expected ModelNotTrained, got {other:?}"),
        }
    }

    #[test]
    fn test_evaluate_trained_model() {
        let (features, labels) = binary_dataset(40);
        let mut model = DecisionTreeModel::default();
        model.train(&features, &labels).unwrap();

        let report = model.evaluate(&features, &labels).unwrap();
        assert!(report.precision > 0.9);
        assert!(report.recall > 0.9);
        assert!(report.f1_score > 0.9);
    }

    #[test]
    fn test_save_untrained_fails() {
        let model = RandomForestModel::default();
        let dir = tempfile::tempdir().unwrap();

        match model.save(&dir.path().join("forest.bin")) {
            Err(AppError::ModelNotInitialized { .. }) => {}
            other => panic!("expected ModelNotInitialized, got {other:?}"),
        }
    }

    #[test]
    fn test_save_load_round_trip() {
        let (features, labels) = binary_dataset(40);
        let mut model = DecisionTreeModel::default();
        model.train(&features, &labels).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.bin");
        model.save(&path).unwrap();

        let mut restored = DecisionTreeModel::default();
        assert!(!restored.is_trained());
        restored.load(&path).unwrap();
        assert!(restored.is_trained());

        assert_eq!(
            restored.predict(&features).unwrap(),
            model.predict(&features).unwrap()
        );
    }

    #[test]
    fn test_load_missing_file_fails_with_path() {
        let mut model = DecisionTreeModel::default();
        let err = model.load(Path::new("/nonexistent/tree.bin")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/tree.bin"));
    }

    #[test]
    fn test_load_corrupt_artifact_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.bin");
        std::fs::write(&path, b"not a model").unwrap();

        let mut model = DecisionTreeModel::default();
        match model.load(&path) {
            Err(AppError::Serialization(_)) => {}
            other => panic!("expected Serialization error, got {other:?}"),
        }
    }
}
