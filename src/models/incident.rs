use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::Validate;

/// Severity reported for an incident
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Ordinal encoding used by the feature pipeline
    pub fn ordinal(&self) -> f64 {
        match self {
            Severity::Low => 0.0,
            Severity::Medium => 1.0,
            Severity::High => 2.0,
        }
    }
}

/// Category of a reported road incident
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IncidentCategory {
    RearEndCollision,
    ObstacleCollision,
    PedestrianStruck,
    VehicleFire,
}

impl IncidentCategory {
    /// All categories, in one-hot column order
    pub const ALL: [IncidentCategory; 4] = [
        IncidentCategory::RearEndCollision,
        IncidentCategory::ObstacleCollision,
        IncidentCategory::PedestrianStruck,
        IncidentCategory::VehicleFire,
    ];
}

/// A single incident report submitted for protocol recommendation
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IncidentRecord {
    /// Reported severity
    pub severity: Severity,

    /// When the incident occurred (UTC)
    pub occurred_at: DateTime<Utc>,

    /// Incident latitude
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    /// Incident longitude
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    /// Free-text description from the reporter
    #[validate(length(min = 1, max = 2000))]
    pub description: String,

    /// Incident category
    pub category: IncidentCategory,
}

impl IncidentRecord {
    /// Create a new incident record
    pub fn new(
        severity: Severity,
        occurred_at: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
        description: String,
        category: IncidentCategory,
    ) -> Self {
        Self {
            severity,
            occurred_at,
            latitude,
            longitude,
            description,
            category,
        }
    }
}
