pub mod incident;

pub use incident::{IncidentCategory, IncidentRecord, Severity};
