//! Mapping from the classifier's technical category flags to display
//! categories with severity tiers.
//!
//! The table is fixed and mirrors the backend's flag vocabulary. Unknown
//! flags pass through untranslated at the default severity, so a backend
//! that grows new categories keeps working without a client update.

use serde::{Deserialize, Serialize};

/// Severity tier assigned to a toxicity category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Bajo,
    Medio,
    Alto,
    #[serde(rename = "crítico")]
    Critico,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Bajo => write!(f, "bajo"),
            Severity::Medio => write!(f, "medio"),
            Severity::Alto => write!(f, "alto"),
            Severity::Critico => write!(f, "crítico"),
        }
    }
}

/// A technical category flag resolved to its display form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToxicCategory {
    pub technical: String,
    pub friendly: String,
    pub severity: Severity,
}

/// technical key → (friendly name, severity). One entry per flag the
/// classifier emits today.
const CATEGORY_TABLE: &[(&str, &str, Severity)] = &[
    ("IsToxic", "Contenido Tóxico", Severity::Medio),
    ("IsAbusive", "Lenguaje Abusivo", Severity::Alto),
    ("IsThreat", "Amenazas", Severity::Critico),
    ("IsProvocative", "Provocativo", Severity::Bajo),
    ("IsObscene", "Lenguaje Obsceno", Severity::Medio),
    ("IsHatespeech", "Discurso de Odio", Severity::Critico),
    ("IsRacist", "Racismo", Severity::Critico),
    ("IsNationalist", "Nacionalismo Extremo", Severity::Alto),
    ("IsSexist", "Sexismo", Severity::Alto),
    ("IsHomophobic", "Homofobia", Severity::Critico),
    ("IsReligiousHate", "Odio Religioso", Severity::Critico),
    ("IsRadicalism", "Radicalismo", Severity::Critico),
];

/// Look up a single technical key. Unknown keys resolve to the key itself
/// at `Severity::Medio`.
pub fn resolve(technical: &str) -> ToxicCategory {
    for (key, friendly, severity) in CATEGORY_TABLE {
        if *key == technical {
            return ToxicCategory {
                technical: technical.to_string(),
                friendly: (*friendly).to_string(),
                severity: *severity,
            };
        }
    }
    ToxicCategory {
        technical: technical.to_string(),
        friendly: technical.to_string(),
        severity: Severity::Medio,
    }
}

/// The backend has emitted both booleans and 0/1 integers for flags.
fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_i64() == Some(1),
        _ => false,
    }
}

/// Map a set of raw category flags to display categories.
///
/// Emits one `ToxicCategory` per truthy flag, in the map's insertion order.
/// Pure and deterministic — no flag ever fails the mapping.
pub fn map_categories(flags: &serde_json::Map<String, serde_json::Value>) -> Vec<ToxicCategory> {
    flags
        .iter()
        .filter(|(_, value)| is_truthy(value))
        .map(|(key, _)| resolve(key))
        .collect()
}
