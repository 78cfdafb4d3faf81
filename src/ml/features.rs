use crate::models::{IncidentCategory, IncidentRecord};
use chrono::{Datelike, Timelike};
use ndarray::Array2;

/// Keywords scanned in incident descriptions, one flag column each
const KEYWORDS: &[&str] = &[
    "fire",
    "smoke",
    "fuel",
    "injured",
    "pedestrian",
    "highway",
    "multiple",
];

// severity, hour, weekday, night flag, weekend flag, latitude, longitude,
// token count
const BASE_FEATURES: usize = 8;

/// Encodes incident records into fixed-width numeric feature vectors.
///
/// The column schema is compiled in rather than fitted, so vectors produced
/// at serving time line up with the columns the classifier was trained on.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEncoder;

impl FeatureEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Width of every encoded vector
    pub fn n_features(&self) -> usize {
        BASE_FEATURES + KEYWORDS.len() + IncidentCategory::ALL.len()
    }

    /// Column names, in encoding order
    pub fn column_names(&self) -> Vec<String> {
        let mut names = vec![
            "severity".to_string(),
            "hour_of_day".to_string(),
            "day_of_week".to_string(),
            "is_night".to_string(),
            "is_weekend".to_string(),
            "latitude".to_string(),
            "longitude".to_string(),
            "description_tokens".to_string(),
        ];
        names.extend(KEYWORDS.iter().map(|k| format!("mentions_{k}")));
        names.extend(
            IncidentCategory::ALL
                .iter()
                .map(|c| format!("category_{c}")),
        );
        names
    }

    /// Encode one record into a feature vector
    pub fn encode(&self, record: &IncidentRecord) -> Vec<f64> {
        let mut features = Vec::with_capacity(self.n_features());

        features.push(record.severity.ordinal());

        let hour = record.occurred_at.hour();
        let weekday = record.occurred_at.weekday();
        features.push(hour as f64);
        features.push(weekday.num_days_from_monday() as f64);
        features.push(if !(6..22).contains(&hour) { 1.0 } else { 0.0 });
        features.push(if weekday.num_days_from_monday() >= 5 {
            1.0
        } else {
            0.0
        });

        features.push(record.latitude);
        features.push(record.longitude);

        let tokens = tokenize(&record.description);
        features.push(tokens.len() as f64);
        for keyword in KEYWORDS {
            let hit = tokens.iter().any(|t| t == keyword);
            features.push(if hit { 1.0 } else { 0.0 });
        }

        for category in IncidentCategory::ALL {
            features.push(if record.category == category { 1.0 } else { 0.0 });
        }

        features
    }

    /// Encode a batch of records into a feature matrix, one row per record
    pub fn encode_batch(&self, records: &[IncidentRecord]) -> Array2<f64> {
        let mut matrix = Array2::zeros((records.len(), self.n_features()));
        for (i, record) in records.iter().enumerate() {
            for (j, value) in self.encode(record).into_iter().enumerate() {
                matrix[[i, j]] = value;
            }
        }
        matrix
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_string())
        .collect()
}
