//! Random-forest condition classifier.
//!
//! The artifact is a JSON document holding the feature and label metadata
//! the dashboard checks, plus a smartcore `RandomForestClassifier`
//! serialized with serde_json:
//!
//! ```json
//! {
//!   "name": "marine-condition-forest",
//!   "version": "2.0.0",
//!   "features": ["wave_height", "wind_speed", "swell_height", "swell_period",
//!                "wind_x", "wind_y", "wave_energy"],
//!   "labels": ["Calm", "Moderate", "Rough", "Hazardous"],
//!   "forest": { "trees": [ ... ], "classes": [0, 1, 2, 3], "samples": null }
//! }
//! ```
//!
//! The forest predicts class ids and `labels[id]` names the condition.
//! smartcore indexes nodes, features and votes without bounds checks, so the
//! tree structure is checked before a forest is accepted.

use std::path::Path;

use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::RandomForestClassifier;
pub use smartcore::ensemble::random_forest_classifier::RandomForestClassifierParameters;
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::error::ModelError;
use crate::training::TrainingSample;
use crate::vector::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};

type Forest = RandomForestClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>;

/// On-disk layout; the forest stays undecoded until its shape is checked.
#[derive(Deserialize)]
struct RawArtifact {
    name: String,
    version: String,
    features: Vec<String>,
    labels: Vec<String>,
    forest: serde_json::Value,
}

#[derive(Serialize)]
struct ArtifactRef<'a> {
    name: &'a str,
    version: &'a str,
    features: &'a [String],
    labels: &'a [String],
    forest: &'a Forest,
}

/// The parts of a serialized forest that inference indexes with.
#[derive(Deserialize)]
struct ForestShape {
    trees: Option<Vec<TreeShape>>,
    classes: Option<Vec<u32>>,
}

#[derive(Deserialize)]
struct TreeShape {
    nodes: Vec<NodeShape>,
    num_features: usize,
}

#[derive(Deserialize)]
struct NodeShape {
    output: usize,
    split_feature: usize,
    split_value: Option<f64>,
    true_child: Option<usize>,
    false_child: Option<usize>,
}

impl ForestShape {
    fn check(&self, label_count: usize) -> Result<(), ModelError> {
        let classes = match self.classes.as_deref() {
            Some(classes) if !classes.is_empty() => classes,
            _ => return Err(ModelError::Invalid("forest has no classes".to_string())),
        };
        if let Some(id) = classes.iter().find(|id| **id as usize >= label_count) {
            return Err(ModelError::Invalid(format!(
                "forest class {} has no label ({} labels)",
                id, label_count
            )));
        }

        let trees = match self.trees.as_deref() {
            Some(trees) if !trees.is_empty() => trees,
            _ => return Err(ModelError::Invalid("forest has no trees".to_string())),
        };
        for (i, tree) in trees.iter().enumerate() {
            tree.check(i, classes.len())?;
        }
        Ok(())
    }
}

impl TreeShape {
    /// Children must point strictly forward, so every walk terminates.
    fn check(&self, tree: usize, class_count: usize) -> Result<(), ModelError> {
        if self.num_features != FEATURE_COUNT {
            return Err(ModelError::Invalid(format!(
                "tree {} was trained on {} features, expected {}",
                tree, self.num_features, FEATURE_COUNT
            )));
        }
        if self.nodes.is_empty() {
            return Err(ModelError::Invalid(format!("tree {} has no nodes", tree)));
        }

        let node_count = self.nodes.len();
        for (i, node) in self.nodes.iter().enumerate() {
            let invalid = |what: String| {
                ModelError::Invalid(format!("tree {} node {} {}", tree, i, what))
            };
            match (node.true_child, node.false_child) {
                (None, None) => {
                    if node.output >= class_count {
                        return Err(invalid(format!("predicts unknown class {}", node.output)));
                    }
                }
                (Some(left), Some(right)) => {
                    if node.split_feature >= FEATURE_COUNT {
                        return Err(invalid(format!(
                            "splits on unknown feature {}",
                            node.split_feature
                        )));
                    }
                    if !node.split_value.is_some_and(f64::is_finite) {
                        return Err(invalid("has no usable split value".to_string()));
                    }
                    if let Some(child) = [left, right]
                        .into_iter()
                        .find(|child| *child <= i || *child >= node_count)
                    {
                        return Err(invalid(format!("has invalid child {}", child)));
                    }
                }
                _ => return Err(invalid("has a single child".to_string())),
            }
        }
        Ok(())
    }
}

/// A trained forest with the labels its class ids stand for.
#[derive(Debug)]
pub struct ForestClassifier {
    name: String,
    version: String,
    features: Vec<String>,
    labels: Vec<String>,
    forest: Forest,
}

impl ForestClassifier {
    /// Load and check an artifact from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] when the file is missing, unreadable, not valid
    /// JSON, or structurally inconsistent.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        if !path.exists() {
            return Err(ModelError::NotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let model = Self::from_json(&contents)?;
        tracing::info!(
            "Loaded model {} v{} ({} labels) from {}",
            model.name,
            model.version,
            model.labels.len(),
            path.display()
        );
        Ok(model)
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let raw: RawArtifact = serde_json::from_str(json)?;

        if raw.features.len() != FEATURE_COUNT
            || raw
                .features
                .iter()
                .zip(FEATURE_NAMES.iter())
                .any(|(actual, expected)| actual != expected)
        {
            return Err(ModelError::Invalid(format!(
                "expected features {:?}, found {:?}",
                FEATURE_NAMES, raw.features
            )));
        }
        if raw.labels.is_empty() {
            return Err(ModelError::Invalid("model has no labels".to_string()));
        }

        ForestShape::deserialize(&raw.forest)?.check(raw.labels.len())?;
        let forest: Forest = serde_json::from_value(raw.forest)?;

        Ok(Self {
            name: raw.name,
            version: raw.version,
            features: raw.features,
            labels: raw.labels,
            forest,
        })
    }

    /// Fit a forest on labelled samples. Labels are numbered in order of
    /// first appearance.
    ///
    /// # Errors
    ///
    /// [`ModelError::Invalid`] with fewer than two distinct labels,
    /// [`ModelError::Training`] when smartcore rejects the data.
    pub fn fit(
        name: &str,
        version: &str,
        samples: &[TrainingSample],
        parameters: RandomForestClassifierParameters,
    ) -> Result<Self, ModelError> {
        let mut labels: Vec<String> = Vec::new();
        let mut rows = Vec::with_capacity(samples.len());
        let mut targets = Vec::with_capacity(samples.len());

        for sample in samples {
            let id = match labels.iter().position(|label| *label == sample.label) {
                Some(id) => id,
                None => {
                    labels.push(sample.label.clone());
                    labels.len() - 1
                }
            };
            rows.push(sample.features().as_array().to_vec());
            targets.push(id as u32);
        }

        if labels.len() < 2 {
            return Err(ModelError::Invalid(format!(
                "training needs at least two labels, found {}",
                labels.len()
            )));
        }

        let x = DenseMatrix::from_2d_vec(&rows).map_err(ModelError::Training)?;
        let forest = Forest::fit(&x, &targets, parameters).map_err(ModelError::Training)?;
        tracing::info!(
            "Trained {} on {} samples ({} labels)",
            name,
            samples.len(),
            labels.len()
        );

        Ok(Self {
            name: name.to_string(),
            version: version.to_string(),
            features: FEATURE_NAMES.iter().map(|f| f.to_string()).collect(),
            labels,
            forest,
        })
    }

    pub fn to_json(&self) -> Result<String, ModelError> {
        let artifact = ArtifactRef {
            name: &self.name,
            version: &self.version,
            features: &self.features,
            labels: &self.labels,
            forest: &self.forest,
        };
        Ok(serde_json::to_string_pretty(&artifact)?)
    }

    /// Write the artifact to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let io_error = |source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(path, self.to_json()?).map_err(io_error)
    }

    /// Predict the condition label for one row.
    pub fn classify(&self, features: &FeatureVector) -> Result<&str, ModelError> {
        let row = DenseMatrix::from_2d_vec(&vec![features.as_array().to_vec()])
            .map_err(ModelError::Prediction)?;
        let predicted = self.forest.predict(&row).map_err(ModelError::Prediction)?;

        let id = predicted
            .first()
            .copied()
            .ok_or_else(|| ModelError::Invalid("forest returned no prediction".to_string()))?;
        self.labels
            .get(id as usize)
            .map(String::as_str)
            .ok_or_else(|| ModelError::Invalid(format!("forest predicted unknown class {}", id)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::io::Write;

    const LABELS: [&str; 4] = ["Calm", "Moderate", "Rough", "Hazardous"];

    /// Per-label ranges of wave height, wind speed, swell height and period.
    const RANGES: [[(f64, f64); 4]; 4] = [
        [(0.1, 0.5), (0.5, 3.5), (0.1, 0.4), (6.0, 9.2)],
        [(0.9, 1.6), (5.0, 9.0), (0.6, 1.1), (9.6, 11.0)],
        [(2.2, 3.5), (11.0, 16.0), (1.6, 2.8), (11.5, 13.0)],
        [(4.5, 7.0), (19.0, 28.0), (3.5, 5.5), (13.5, 17.0)],
    ];

    fn sample(wave: f64, wind: f64, swell: f64, period: f64, label: &str) -> TrainingSample {
        TrainingSample {
            wave_height: wave,
            wind_speed: wind,
            swell_height: swell,
            swell_period: period,
            label: label.to_string(),
        }
    }

    fn samples() -> Vec<TrainingSample> {
        let mut samples = Vec::new();
        for (label, ranges) in LABELS.iter().zip(RANGES.iter()) {
            for step in 0..8 {
                let at = |(lo, hi): (f64, f64)| lo + (hi - lo) * step as f64 / 7.0;
                samples.push(sample(
                    at(ranges[0]),
                    at(ranges[1]),
                    at(ranges[2]),
                    at(ranges[3]),
                    label,
                ));
            }
        }
        samples
    }

    fn fitted() -> ForestClassifier {
        let parameters = RandomForestClassifierParameters::default()
            .with_n_trees(10)
            .with_seed(7);
        ForestClassifier::fit("test-forest", "0.1.0", &samples(), parameters).unwrap()
    }

    fn fitted_value() -> Value {
        serde_json::from_str(&fitted().to_json().unwrap()).unwrap()
    }

    fn reject(value: &Value) -> ModelError {
        ForestClassifier::from_json(&value.to_string()).unwrap_err()
    }

    #[test]
    fn test_fit_classifies_cluster_centres() {
        let model = fitted();
        assert_eq!(model.labels(), &LABELS);

        let centres = [
            sample(0.3, 2.0, 0.25, 7.6, "Calm"),
            sample(1.25, 7.0, 0.85, 10.3, "Moderate"),
            sample(2.85, 13.5, 2.2, 12.25, "Rough"),
            sample(5.75, 23.5, 4.5, 15.25, "Hazardous"),
        ];
        for centre in &centres {
            assert_eq!(model.classify(&centre.features()).unwrap(), centre.label);
        }
    }

    #[test]
    fn test_fit_requires_two_labels() {
        let single: Vec<TrainingSample> = samples()
            .into_iter()
            .filter(|s| s.label == "Calm")
            .collect();
        let result = ForestClassifier::fit(
            "single",
            "0",
            &single,
            RandomForestClassifierParameters::default(),
        );
        assert!(matches!(result, Err(ModelError::Invalid(_))));
    }

    #[test]
    fn test_json_round_trip_predicts_the_same() {
        let model = fitted();
        let reloaded = ForestClassifier::from_json(&model.to_json().unwrap()).unwrap();

        assert_eq!(reloaded.name(), "test-forest");
        assert_eq!(reloaded.version(), "0.1.0");
        for s in samples() {
            let features = s.features();
            assert_eq!(
                reloaded.classify(&features).unwrap(),
                model.classify(&features).unwrap()
            );
        }
    }

    #[test]
    fn test_rejects_feature_mismatch() {
        let mut value = fitted_value();
        value["features"][4] = Value::from("wind_y");
        value["features"][5] = Value::from("wind_x");
        assert!(matches!(reject(&value), ModelError::Invalid(_)));
    }

    #[test]
    fn test_rejects_empty_forest() {
        let mut value = fitted_value();
        value["forest"]["trees"] = serde_json::json!([]);
        assert!(matches!(reject(&value), ModelError::Invalid(_)));

        let mut value = fitted_value();
        value["forest"]["classes"] = serde_json::json!([]);
        assert!(matches!(reject(&value), ModelError::Invalid(_)));

        let mut value = fitted_value();
        value["labels"] = serde_json::json!([]);
        assert!(matches!(reject(&value), ModelError::Invalid(_)));
    }

    #[test]
    fn test_rejects_class_without_label() {
        let mut value = fitted_value();
        value["labels"] = serde_json::json!(["Calm", "Moderate"]);
        assert!(matches!(reject(&value), ModelError::Invalid(_)));
    }

    #[test]
    fn test_rejects_backward_child() {
        let mut value = fitted_value();
        value["forest"]["trees"][0]["nodes"][0]["true_child"] = Value::from(0);
        assert!(matches!(reject(&value), ModelError::Invalid(_)));
    }

    #[test]
    fn test_rejects_single_child() {
        let mut value = fitted_value();
        value["forest"]["trees"][0]["nodes"][0]["false_child"] = Value::Null;
        assert!(matches!(reject(&value), ModelError::Invalid(_)));
    }

    #[test]
    fn test_rejects_unknown_feature_and_class() {
        let mut value = fitted_value();
        value["forest"]["trees"][0]["nodes"][0]["split_feature"] = Value::from(FEATURE_COUNT);
        assert!(matches!(reject(&value), ModelError::Invalid(_)));

        let mut value = fitted_value();
        let nodes = value["forest"]["trees"][0]["nodes"].as_array_mut().unwrap();
        let leaf = nodes
            .iter_mut()
            .find(|node| node["true_child"].is_null())
            .unwrap();
        leaf["output"] = Value::from(LABELS.len());
        assert!(matches!(reject(&value), ModelError::Invalid(_)));
    }

    #[test]
    fn test_rejects_wrong_feature_count() {
        let mut value = fitted_value();
        value["forest"]["trees"][0]["num_features"] = Value::from(3);
        assert!(matches!(reject(&value), ModelError::Invalid(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ForestClassifier::load(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(ModelError::NotFound(_))));
    }

    #[test]
    fn test_load_corrupt_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\x80not a model").unwrap();

        let result = ForestClassifier::load(file.path());
        assert!(matches!(
            result,
            Err(ModelError::Io { .. }) | Err(ModelError::Parse(_))
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("model.json");

        let model = fitted();
        model.save(&path).unwrap();
        let loaded = ForestClassifier::load(&path).unwrap();

        assert_eq!(loaded.labels(), model.labels());
        let centre = sample(5.75, 23.5, 4.5, 15.25, "Hazardous");
        assert_eq!(loaded.classify(&centre.features()).unwrap(), "Hazardous");
    }
}
