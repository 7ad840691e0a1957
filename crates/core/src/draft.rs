//! The in-progress car listing authored by the configuration wizard.
//!
//! A [`CarDraft`] accumulates the output of each wizard stage. Stages hand
//! back a [`DraftPatch`] which is merged shallowly: present top-level fields
//! replace the draft's, and list fields are replaced wholesale.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Default color code for a freshly added color entry.
pub const DEFAULT_COLOR_CODE: &str = "#000000";

// ---------------------------------------------------------------------------
// Specification
// ---------------------------------------------------------------------------

/// Free-form specification mapping plus an ordered feature list.
///
/// Serialized as a flat JSON object, e.g.
/// `{"engine": "2.0L I4", "horsepower": "255", "features": ["Sunroof"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specification {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(flatten)]
    pub values: BTreeMap<String, String>,
}

impl Specification {
    /// Decode a specification stored as JSON.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }

    /// Encode for storage in a JSONB column.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({}))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.features.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Draft entities
// ---------------------------------------------------------------------------

/// An image uploaded during the wizard and staged until submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingImage {
    /// Path of the staged file on the server.
    pub staged_path: String,
    /// Original file name as sent by the client.
    pub file_name: String,
    pub content_type: String,
}

impl PendingImage {
    /// Final component of the staged path; unique within a session.
    pub fn staged_name(&self) -> &str {
        std::path::Path::new(&self.staged_path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

/// A purchasable configuration variant of the car.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimDraft {
    pub name: String,
    pub price: String,
    /// The trim's own specification; nothing is inherited from the car.
    #[serde(default)]
    pub specification: Specification,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorDraft {
    pub name: String,
    pub code: String,
    /// Image already published for this color (edit mode).
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub pending_image: Option<PendingImage>,
}

impl Default for ColorDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            code: DEFAULT_COLOR_CODE.to_string(),
            image_url: None,
            pending_image: None,
        }
    }
}

impl ColorDraft {
    /// Colors are only persisted when both a name and a code are present.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.code.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteriorDraft {
    pub name: String,
}

impl InteriorDraft {
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

impl TrimDraft {
    /// Trims are only persisted when both a name and a price are present.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.price.trim().is_empty()
    }
}

/// Client-local representation of a car being authored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarDraft {
    /// Present only when editing an existing car.
    #[serde(default)]
    pub id: Option<DbId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub base_price: String,
    #[serde(default)]
    pub specification: Specification,
    #[serde(default)]
    pub trims: Vec<TrimDraft>,
    #[serde(default)]
    pub colors: Vec<ColorDraft>,
    #[serde(default)]
    pub interiors: Vec<InteriorDraft>,
    /// Primary image already published for this car (edit mode).
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub pending_image: Option<PendingImage>,
}

impl CarDraft {
    pub fn is_editing(&self) -> bool {
        self.id.is_some()
    }

    /// Every staged file referenced by this draft.
    pub fn staged_paths(&self) -> Vec<&str> {
        self.pending_images().map(|p| p.staged_path.as_str()).collect()
    }

    /// The staged upload whose [`PendingImage::staged_name`] is `name`.
    pub fn find_pending(&self, name: &str) -> Option<&PendingImage> {
        self.pending_images().find(|p| p.staged_name() == name)
    }

    fn pending_images(&self) -> impl Iterator<Item = &PendingImage> {
        self.pending_image
            .iter()
            .chain(self.colors.iter().filter_map(|c| c.pending_image.as_ref()))
    }
}

// ---------------------------------------------------------------------------
// Patch
// ---------------------------------------------------------------------------

/// Partial draft produced by a completed wizard stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftPatch {
    pub name: Option<String>,
    pub base_price: Option<String>,
    pub specification: Option<Specification>,
    pub trims: Option<Vec<TrimDraft>>,
    pub colors: Option<Vec<ColorDraft>>,
    pub interiors: Option<Vec<InteriorDraft>>,
    pub pending_image: Option<PendingImage>,
}

impl DraftPatch {
    /// Shallow-merge into `draft`. Lists replace, they never append.
    pub fn merge_into(self, draft: &mut CarDraft) {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(base_price) = self.base_price {
            draft.base_price = base_price;
        }
        if let Some(specification) = self.specification {
            draft.specification = specification;
        }
        if let Some(trims) = self.trims {
            draft.trims = trims;
        }
        if let Some(colors) = self.colors {
            draft.colors = colors;
        }
        if let Some(interiors) = self.interiors {
            draft.interiors = interiors;
        }
        if let Some(pending_image) = self.pending_image {
            draft.pending_image = Some(pending_image);
        }
    }
}
