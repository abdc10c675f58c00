//! Marine condition classifier.
//!
//! Loads the trained model artifact once and exposes single-row inference
//! over the fixed seven-feature vector.

pub mod error;
pub mod forest;
pub mod predictor;
pub mod training;
pub mod vector;

pub use error::ModelError;
pub use forest::{ForestClassifier, RandomForestClassifierParameters};
pub use predictor::{ConditionModel, PredictionResult, Predictor};
pub use training::TrainingSample;
pub use vector::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
