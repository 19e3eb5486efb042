use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::{Crop, Fertilizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(Uuid);

impl FieldId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A recorded farm plot. Only [`FieldDraft::validate`] can build one, so every
/// `Field` has a non-empty name, a positive area and a known crop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    id: FieldId,
    name: String,
    area: f64,
    crop: Crop,
    yield_per_ha: f64,
    fertilizers: BTreeSet<Fertilizer>,
}

impl Field {
    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hectares.
    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn crop(&self) -> Crop {
        self.crop
    }

    pub fn yield_per_ha(&self) -> f64 {
        self.yield_per_ha
    }

    pub fn fertilizers(&self) -> &BTreeSet<Fertilizer> {
        &self.fertilizers
    }
}

/// Raw form input for a new field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub crop: String,
    #[serde(default)]
    pub fertilizers: Vec<String>,
}

impl FieldDraft {
    pub fn new(name: impl Into<String>, area: f64, crop: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            area: Some(area),
            crop: crop.into(),
            fertilizers: Vec::new(),
        }
    }

    pub fn with_fertilizer(mut self, id: impl Into<String>) -> Self {
        self.fertilizers.push(id.into());
        self
    }

    /// Checks every input and reports all problems at once.
    pub fn validate(&self) -> Result<Field, ValidationError> {
        let mut issues = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            issues.push(InputIssue::new("name", "name is required"));
        }

        let area = match self.area {
            None => {
                issues.push(InputIssue::new("area", "area is required"));
                0.0
            }
            Some(area) if !area.is_finite() || area <= 0.0 => {
                issues.push(InputIssue::new("area", "area must be greater than 0"));
                0.0
            }
            Some(area) => area,
        };

        let crop = if self.crop.trim().is_empty() {
            issues.push(InputIssue::new("crop", "crop is required"));
            None
        } else {
            match self.crop.parse::<Crop>() {
                Ok(crop) => Some(crop),
                Err(err) => {
                    issues.push(InputIssue::new("crop", err.to_string()));
                    None
                }
            }
        };

        let mut fertilizers = BTreeSet::new();
        for raw in &self.fertilizers {
            match raw.parse::<Fertilizer>() {
                Ok(fertilizer) => {
                    fertilizers.insert(fertilizer);
                }
                Err(err) => issues.push(InputIssue::new("fertilizers", err.to_string())),
            }
        }

        match crop {
            Some(crop) if issues.is_empty() => Ok(Field {
                id: FieldId::generate(),
                name: name.to_string(),
                area,
                crop,
                yield_per_ha: crop.yield_per_ha(),
                fertilizers,
            }),
            _ => Err(ValidationError { issues }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputIssue {
    pub input: &'static str,
    pub message: String,
}

impl InputIssue {
    fn new(input: &'static str, message: impl Into<String>) -> Self {
        Self {
            input,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid field input: {}", join_messages(.issues))]
pub struct ValidationError {
    pub issues: Vec<InputIssue>,
}

impl ValidationError {
    pub fn issue_for(&self, input: &str) -> Option<&InputIssue> {
        self.issues.iter().find(|issue| issue.input == input)
    }
}

fn join_messages(issues: &[InputIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
