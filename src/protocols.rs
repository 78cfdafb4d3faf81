use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// An operational response protocol recommended for an incident
#[derive(Debug, Clone, Serialize)]
pub struct Protocol {
    /// Class label produced by the classifier for this protocol
    pub label: i32,

    /// Stable machine-readable code
    pub code: &'static str,

    /// Human-readable name
    pub name: &'static str,

    /// What the response involves
    pub description: &'static str,

    /// Units dispatched under this protocol
    pub units: &'static [&'static str],
}

static PROTOCOLS: &[Protocol] = &[
    Protocol {
        label: 0,
        code: "standard_patrol",
        name: "Standard Patrol Response",
        description: "Single patrol dispatch for minor incidents with no reported injuries.",
        units: &["patrol"],
    },
    Protocol {
        label: 1,
        code: "heavy_rescue",
        name: "Heavy Rescue Response",
        description: "Extrication equipment and multi-vehicle response for major collisions.",
        units: &["patrol", "heavy_rescue", "ambulance"],
    },
    Protocol {
        label: 2,
        code: "medical_priority",
        name: "Medical Priority Response",
        description: "Ambulance-first dispatch when people are reported injured.",
        units: &["ambulance", "patrol"],
    },
    Protocol {
        label: 3,
        code: "fire_suppression",
        name: "Fire Suppression Response",
        description: "Fire brigade dispatch for vehicle fires and smoke reports.",
        units: &["fire_brigade", "patrol"],
    },
    Protocol {
        label: 4,
        code: "hazmat_containment",
        name: "Hazmat Containment Response",
        description: "Containment crew for fuel spills and dangerous goods.",
        units: &["hazmat", "fire_brigade"],
    },
];

static BY_LABEL: Lazy<HashMap<i32, &'static Protocol>> =
    Lazy::new(|| PROTOCOLS.iter().map(|p| (p.label, p)).collect());

/// Compiled-in catalog of operational protocols, keyed by classifier label.
///
/// Extension means adding a protocol entry here and retraining against the
/// new label set; the catalog is not configurable at runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtocolCatalog;

impl ProtocolCatalog {
    pub fn new() -> Self {
        Self
    }

    /// Look up the protocol for a predicted class label
    pub fn get(&self, label: i32) -> Option<&'static Protocol> {
        BY_LABEL.get(&label).copied()
    }

    /// All registered protocols, in label order
    pub fn all(&self) -> &'static [Protocol] {
        PROTOCOLS
    }

    /// Registered class labels
    pub fn labels(&self) -> Vec<i32> {
        PROTOCOLS.iter().map(|p| p.label).collect()
    }

    pub fn len(&self) -> usize {
        PROTOCOLS.len()
    }

    pub fn is_empty(&self) -> bool {
        PROTOCOLS.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_label() {
        let catalog = ProtocolCatalog::new();
        let protocol = catalog.get(3).unwrap();
        assert_eq!(protocol.code, "fire_suppression");
        assert!(protocol.units.contains(&"fire_brigade"));
    }

    #[test]
    fn test_lookup_unknown_label() {
        let catalog = ProtocolCatalog::new();
        assert!(catalog.get(99).is_none());
        assert!(catalog.get(-1).is_none());
    }

    #[test]
    fn test_labels_are_unique() {
        let catalog = ProtocolCatalog::new();
        let labels = catalog.labels();
        let unique: std::collections::HashSet<_> = labels.iter().collect();
        assert_eq!(unique.len(), labels.len());
        assert_eq!(catalog.len(), labels.len());
    }
}
