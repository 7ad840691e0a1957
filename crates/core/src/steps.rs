//! Per-stage field editors of the car configuration wizard.
//!
//! Every editor has a form type that is both what the client edits and what
//! it submits. `seeded` builds the form from the current draft; `complete`
//! validates a submitted form and turns it into a [`StageOutput`].

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::draft::{
    CarDraft, ColorDraft, DraftPatch, InteriorDraft, PendingImage, Specification, TrimDraft,
    DEFAULT_COLOR_CODE,
};
use crate::error::CoreError;
use crate::spec_keys::SpecKey;
use crate::wizard::{StageOutput, WizardStage};

/// Accepted color code shapes: `#rgb` or `#rrggbb`.
static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid hex color regex")
});

/// Check a color code is `#rgb` or `#rrggbb`.
pub fn validate_color_code(owner: &str, code: &str) -> Result<(), CoreError> {
    if HEX_COLOR.is_match(code) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Color '{owner}' has an invalid code '{code}'. Expected #rgb or #rrggbb"
        )))
    }
}

// ---------------------------------------------------------------------------
// Specification entries
// ---------------------------------------------------------------------------

/// One key/value row of a specification editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecEntry {
    pub key: String,
    pub value: String,
}

/// Spec rows for `spec`, in catalogue order.
fn entries_from(spec: &Specification) -> Vec<SpecEntry> {
    let mut entries: Vec<SpecEntry> = spec
        .values
        .iter()
        .map(|(k, v)| SpecEntry {
            key: k.clone(),
            value: v.clone(),
        })
        .collect();
    entries.sort_by_key(|e| {
        SpecKey::parse(&e.key)
            .map(SpecKey::position)
            .unwrap_or(usize::MAX)
    });
    entries
}

/// Build a specification from editor rows.
///
/// Keys must come from the catalogue and may appear once. With
/// `require_values`, an empty value is an error naming `owner`; otherwise
/// empty rows are dropped.
fn specification_from(
    entries: &[SpecEntry],
    features: &[String],
    owner: &str,
    require_values: bool,
) -> Result<Specification, CoreError> {
    let mut seen = BTreeSet::new();
    let mut values = BTreeMap::new();

    for entry in entries {
        let key = SpecKey::parse(entry.key.trim())?;
        if !seen.insert(key) {
            return Err(CoreError::Validation(format!(
                "{owner} declares specification '{}' more than once",
                key.label()
            )));
        }
        let value = entry.value.trim();
        if value.is_empty() {
            if require_values {
                return Err(CoreError::Validation(format!(
                    "{owner} has an empty value for specification '{}'",
                    key.label()
                )));
            }
            continue;
        }
        values.insert(key.as_str().to_string(), value.to_string());
    }

    let features = features
        .iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect();

    Ok(Specification { features, values })
}

/// Check a stored-shape specification only uses catalogue keys.
pub fn validate_specification(spec: &Specification, owner: &str) -> Result<(), CoreError> {
    for key in spec.values.keys() {
        SpecKey::parse(key).map_err(|_| {
            CoreError::Validation(format!("{owner} uses unknown specification '{key}'"))
        })?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Stage 1: Basic info
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimForm {
    pub name: String,
    pub price: String,
    #[serde(default)]
    pub specs: Vec<SpecEntry>,
}

/// Name, base price, base specification, and trims.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicInfoForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub base_price: String,
    #[serde(default)]
    pub specs: Vec<SpecEntry>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub trims: Vec<TrimForm>,
}

impl BasicInfoForm {
    /// Form seeded from the draft; a draft without trims gets one empty trim.
    pub fn seeded(draft: &CarDraft) -> Self {
        let mut trims: Vec<TrimForm> = draft
            .trims
            .iter()
            .map(|t| TrimForm {
                name: t.name.clone(),
                price: t.price.clone(),
                specs: entries_from(&t.specification),
            })
            .collect();
        if trims.is_empty() {
            trims.push(TrimForm::default());
        }

        Self {
            name: draft.name.clone(),
            base_price: draft.base_price.clone(),
            specs: entries_from(&draft.specification),
            features: draft.specification.features.clone(),
            trims,
        }
    }

    /// Validate and produce the stage output.
    ///
    /// Every trim needs a name, a price, and a value for each specification
    /// it declares.
    pub fn complete(&self) -> Result<StageOutput, CoreError> {
        let specification = specification_from(&self.specs, &self.features, "The car", false)?;

        let mut trims = Vec::with_capacity(self.trims.len());
        for (i, trim) in self.trims.iter().enumerate() {
            let owner = if trim.name.trim().is_empty() {
                format!("Trim #{}", i + 1)
            } else {
                format!("Trim '{}'", trim.name.trim())
            };
            if trim.name.trim().is_empty() {
                return Err(CoreError::Validation(format!("{owner} is missing a name")));
            }
            if trim.price.trim().is_empty() {
                return Err(CoreError::Validation(format!("{owner} is missing a price")));
            }
            trims.push(TrimDraft {
                name: trim.name.trim().to_string(),
                price: trim.price.trim().to_string(),
                specification: specification_from(&trim.specs, &[], &owner, true)?,
            });
        }

        Ok(StageOutput {
            stage: WizardStage::BasicInfo,
            patch: DraftPatch {
                name: Some(self.name.trim().to_string()),
                base_price: Some(self.base_price.trim().to_string()),
                specification: Some(specification),
                trims: Some(trims),
                ..DraftPatch::default()
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Stage 2: Customization
// ---------------------------------------------------------------------------

fn default_color_code() -> String {
    DEFAULT_COLOR_CODE.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorForm {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_color_code")]
    pub code: String,
    /// Position of the draft color this entry was seeded from. Its images
    /// carry over, whatever the entry is renamed to.
    #[serde(default)]
    pub draft_index: Option<usize>,
    /// Published image of that color; informational only.
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Default for ColorForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            code: default_color_code(),
            draft_index: None,
            image_url: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteriorForm {
    #[serde(default)]
    pub name: String,
}

/// Exterior colors and interior variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomizationForm {
    #[serde(default)]
    pub colors: Vec<ColorForm>,
    #[serde(default)]
    pub interiors: Vec<InteriorForm>,
}

impl CustomizationForm {
    /// Form seeded from the draft, always with at least one entry of each.
    pub fn seeded(draft: &CarDraft) -> Self {
        let mut colors: Vec<ColorForm> = draft
            .colors
            .iter()
            .enumerate()
            .map(|(index, c)| ColorForm {
                name: c.name.clone(),
                code: c.code.clone(),
                draft_index: Some(index),
                image_url: c.image_url.clone(),
            })
            .collect();
        if colors.is_empty() {
            colors.push(ColorForm::default());
        }

        let mut interiors: Vec<InteriorForm> = draft
            .interiors
            .iter()
            .map(|i| InteriorForm {
                name: i.name.clone(),
            })
            .collect();
        if interiors.is_empty() {
            interiors.push(InteriorForm::default());
        }

        Self { colors, interiors }
    }

    /// Validate color codes and produce the stage output.
    ///
    /// Entries seeded from a draft color keep that color's images, looked up
    /// by `draft_index`. Empty lists are accepted.
    pub fn complete(&self, draft: &CarDraft) -> Result<StageOutput, CoreError> {
        let mut colors = Vec::with_capacity(self.colors.len());
        for color in &self.colors {
            let name = color.name.trim();
            let code = color.code.trim();
            if !code.is_empty() {
                validate_color_code(name, code)?;
            }
            let previous = color.draft_index.and_then(|i| draft.colors.get(i));
            colors.push(ColorDraft {
                name: name.to_string(),
                code: code.to_string(),
                image_url: previous.and_then(|c| c.image_url.clone()),
                pending_image: previous.and_then(|c| c.pending_image.clone()),
            });
        }

        let interiors = self
            .interiors
            .iter()
            .map(|i| InteriorDraft {
                name: i.name.trim().to_string(),
            })
            .collect();

        Ok(StageOutput {
            stage: WizardStage::Customization,
            patch: DraftPatch {
                colors: Some(colors),
                interiors: Some(interiors),
                ..DraftPatch::default()
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Stage 3: Images
// ---------------------------------------------------------------------------

/// An image file received from the client, not yet staged.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    /// Detect the image format from the file header.
    pub fn sniff_content_type(&self) -> Result<&'static str, CoreError> {
        image::guess_format(&self.bytes)
            .map(|format| format.to_mime_type())
            .map_err(|_| {
                CoreError::Validation(format!(
                    "'{}' is not a supported image (png, jpeg, webp)",
                    self.file_name
                ))
            })
    }
}

/// Primary image plus optional per-color images keyed by color index.
#[derive(Debug, Clone, Default)]
pub struct ImagesInput {
    pub primary: Option<UploadedImage>,
    pub colors: BTreeMap<usize, UploadedImage>,
}

/// Image slots the client may fill, derived from the draft.
#[derive(Debug, Clone, Serialize)]
pub struct ImagesForm {
    pub primary_image_url: Option<String>,
    pub has_pending_primary: bool,
    pub colors: Vec<ColorImageSlot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColorImageSlot {
    pub index: usize,
    pub name: String,
    pub image_url: Option<String>,
    pub has_pending_image: bool,
}

impl ImagesForm {
    pub fn seeded(draft: &CarDraft) -> Self {
        Self {
            primary_image_url: draft.image_url.clone(),
            has_pending_primary: draft.pending_image.is_some(),
            colors: draft
                .colors
                .iter()
                .enumerate()
                .map(|(index, c)| ColorImageSlot {
                    index,
                    name: c.name.clone(),
                    image_url: c.image_url.clone(),
                    has_pending_image: c.pending_image.is_some(),
                })
                .collect(),
        }
    }
}

impl ImagesInput {
    /// Check every upload is an image and every color index exists.
    pub fn validate(&self, draft: &CarDraft) -> Result<(), CoreError> {
        if let Some(primary) = &self.primary {
            primary.sniff_content_type()?;
        }
        for (index, upload) in &self.colors {
            if *index >= draft.colors.len() {
                return Err(CoreError::Validation(format!(
                    "No color at index {index}; the draft has {} color(s)",
                    draft.colors.len()
                )));
            }
            upload.sniff_content_type()?;
        }
        Ok(())
    }
}

/// Produce the images stage output from already staged uploads.
pub fn complete_images(
    draft: &CarDraft,
    primary: Option<PendingImage>,
    colors: Vec<(usize, PendingImage)>,
) -> StageOutput {
    let colors_patch = if colors.is_empty() {
        None
    } else {
        let mut updated = draft.colors.clone();
        for (index, pending) in colors {
            if let Some(color) = updated.get_mut(index) {
                color.pending_image = Some(pending);
            }
        }
        Some(updated)
    };

    StageOutput {
        stage: WizardStage::Images,
        patch: DraftPatch {
            colors: colors_patch,
            pending_image: primary,
            ..DraftPatch::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn entry(key: &str, value: &str) -> SpecEntry {
        SpecEntry {
            key: key.into(),
            value: value.into(),
        }
    }

    fn trim(name: &str, price: &str, specs: Vec<SpecEntry>) -> TrimForm {
        TrimForm {
            name: name.into(),
            price: price.into(),
            specs,
        }
    }

    fn basic(trims: Vec<TrimForm>) -> BasicInfoForm {
        BasicInfoForm {
            name: "Meridian".into(),
            base_price: "42000".into(),
            specs: vec![entry("engine", "2.0L I4")],
            features: vec!["Sunroof".into(), "  ".into()],
            trims,
        }
    }

    // -- BasicInfo --

    #[test]
    fn basic_info_accepts_complete_trims() {
        let form = basic(vec![trim("Base", "100", vec![entry("horsepower", "250")])]);
        let out = form.complete().unwrap();

        assert_eq!(out.stage, WizardStage::BasicInfo);
        let trims = out.patch.trims.unwrap();
        assert_eq!(trims.len(), 1);
        assert_eq!(trims[0].specification.values["horsepower"], "250");

        let spec = out.patch.specification.unwrap();
        assert_eq!(spec.values["engine"], "2.0L I4");
        assert_eq!(spec.features, vec!["Sunroof".to_string()]);
    }

    #[test]
    fn basic_info_accepts_zero_trims() {
        assert!(basic(vec![]).complete().is_ok());
    }

    #[test]
    fn basic_info_rejects_trim_without_name() {
        let result = basic(vec![trim(" ", "100", vec![])]).complete();
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("Trim #1"));
    }

    #[test]
    fn basic_info_rejects_trim_without_price() {
        let result = basic(vec![trim("Base", "", vec![])]).complete();
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("price"));
    }

    #[test]
    fn basic_info_rejects_empty_trim_spec_value() {
        let result = basic(vec![trim("Sport", "200", vec![entry("torque", " ")])]).complete();
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("Sport"));
    }

    #[test]
    fn basic_info_rejects_unknown_key() {
        let mut form = basic(vec![]);
        form.specs.push(entry("wheelbase", "110 in"));
        assert!(form.complete().is_err());
    }

    #[test]
    fn basic_info_rejects_duplicate_keys() {
        let mut form = basic(vec![]);
        form.specs.push(entry("engine", "V8"));
        assert!(form.complete().is_err());

        let form = basic(vec![trim(
            "Base",
            "1",
            vec![entry("seating", "5"), entry("seating", "7")],
        )]);
        assert!(form.complete().is_err());
    }

    #[test]
    fn basic_info_drops_empty_base_values() {
        let mut form = basic(vec![]);
        form.specs.push(entry("warranty", ""));
        let spec = form.complete().unwrap().patch.specification.unwrap();
        assert!(!spec.values.contains_key("warranty"));
    }

    #[test]
    fn basic_info_seed_roundtrips_draft() {
        let out = basic(vec![trim("Base", "100", vec![entry("range", "300 mi")])])
            .complete()
            .unwrap();
        let mut draft = CarDraft::default();
        out.patch.merge_into(&mut draft);

        let seeded = BasicInfoForm::seeded(&draft);
        assert_eq!(seeded.name, "Meridian");
        assert_eq!(seeded.trims.len(), 1);
        assert_eq!(seeded.trims[0].specs, vec![entry("range", "300 mi")]);
    }

    #[test]
    fn basic_info_seed_adds_empty_trim() {
        let seeded = BasicInfoForm::seeded(&CarDraft::default());
        assert_eq!(seeded.trims, vec![TrimForm::default()]);
    }

    #[test]
    fn seeded_specs_follow_catalogue_order() {
        let mut draft = CarDraft::default();
        draft.specification.values.insert("warranty".into(), "4yr".into());
        draft.specification.values.insert("engine".into(), "V6".into());
        let keys: Vec<_> = BasicInfoForm::seeded(&draft)
            .specs
            .into_iter()
            .map(|e| e.key)
            .collect();
        assert_eq!(keys, vec!["engine", "warranty"]);
    }

    // -- Customization --

    #[test]
    fn customization_seed_has_one_of_each() {
        let form = CustomizationForm::seeded(&CarDraft::default());
        assert_eq!(form.colors.len(), 1);
        assert_eq!(form.colors[0].code, DEFAULT_COLOR_CODE);
        assert_eq!(form.interiors.len(), 1);
    }

    #[test]
    fn customization_rejects_bad_hex() {
        let form = CustomizationForm {
            colors: vec![ColorForm {
                name: "Red".into(),
                code: "red".into(),
                ..ColorForm::default()
            }],
            interiors: vec![],
        };
        assert!(form.complete(&CarDraft::default()).is_err());
    }

    #[test]
    fn customization_accepts_short_hex_and_empty_lists() {
        let form = CustomizationForm {
            colors: vec![ColorForm {
                name: "White".into(),
                code: "#fff".into(),
                ..ColorForm::default()
            }],
            interiors: vec![],
        };
        assert!(form.complete(&CarDraft::default()).is_ok());
        assert!(CustomizationForm::default()
            .complete(&CarDraft::default())
            .is_ok());
    }

    #[test]
    fn customization_keeps_existing_color_images() {
        let draft = CarDraft {
            colors: vec![ColorDraft {
                name: "Black".into(),
                code: "#000000".into(),
                image_url: Some("https://cdn/black.png".into()),
                pending_image: None,
            }],
            ..CarDraft::default()
        };
        let mut form = CustomizationForm::seeded(&draft);
        assert_eq!(form.colors[0].draft_index, Some(0));
        assert_eq!(form.colors[0].image_url.as_deref(), Some("https://cdn/black.png"));
        form.colors[0].code = "#111111".into();

        let colors = form.complete(&draft).unwrap().patch.colors.unwrap();
        assert_eq!(colors[0].code, "#111111");
        assert_eq!(colors[0].image_url.as_deref(), Some("https://cdn/black.png"));
    }

    #[test]
    fn renamed_color_keeps_its_image() {
        let draft = CarDraft {
            colors: vec![ColorDraft {
                name: "Black".into(),
                code: "#000000".into(),
                image_url: Some("https://cdn/black.png".into()),
                pending_image: None,
            }],
            ..CarDraft::default()
        };
        let mut form = CustomizationForm::seeded(&draft);
        form.colors[0].name = "Jet Black".into();

        let colors = form.complete(&draft).unwrap().patch.colors.unwrap();
        assert_eq!(colors[0].name, "Jet Black");
        assert_eq!(colors[0].image_url.as_deref(), Some("https://cdn/black.png"));
    }

    #[test]
    fn same_named_colors_keep_their_own_images() {
        let red = |url: &str| ColorDraft {
            name: "Red".into(),
            code: "#ff0000".into(),
            image_url: Some(url.into()),
            pending_image: None,
        };
        let draft = CarDraft {
            colors: vec![red("https://cdn/a.png"), red("https://cdn/b.png")],
            ..CarDraft::default()
        };

        let colors = CustomizationForm::seeded(&draft)
            .complete(&draft)
            .unwrap()
            .patch
            .colors
            .unwrap();
        assert_eq!(colors[0].image_url.as_deref(), Some("https://cdn/a.png"));
        assert_eq!(colors[1].image_url.as_deref(), Some("https://cdn/b.png"));
    }

    #[test]
    fn new_color_entries_start_without_images() {
        let draft = CarDraft {
            colors: vec![ColorDraft {
                name: "Black".into(),
                code: "#000000".into(),
                image_url: Some("https://cdn/black.png".into()),
                pending_image: None,
            }],
            ..CarDraft::default()
        };
        // Same name, but not seeded from the draft color.
        let form = CustomizationForm {
            colors: vec![ColorForm {
                name: "Black".into(),
                code: "#000000".into(),
                ..ColorForm::default()
            }],
            interiors: vec![],
        };
        let colors = form.complete(&draft).unwrap().patch.colors.unwrap();
        assert!(colors[0].image_url.is_none());
    }

    #[test]
    fn color_form_defaults_code_when_missing() {
        let form: ColorForm = serde_json::from_str(r#"{"name": "Blue"}"#).unwrap();
        assert_eq!(form.code, DEFAULT_COLOR_CODE);
    }

    // -- Images --

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    fn upload(bytes: &[u8]) -> UploadedImage {
        UploadedImage {
            file_name: "photo.png".into(),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn sniff_detects_png() {
        assert_eq!(upload(PNG_HEADER).sniff_content_type().unwrap(), "image/png");
    }

    #[test]
    fn sniff_rejects_non_images() {
        assert!(upload(b"hello world").sniff_content_type().is_err());
    }

    #[test]
    fn images_reject_unknown_color_index() {
        let mut input = ImagesInput::default();
        input.colors.insert(0, upload(PNG_HEADER));
        assert!(input.validate(&CarDraft::default()).is_err());
    }

    #[test]
    fn complete_images_attaches_pending_files() {
        let draft = CarDraft {
            colors: vec![ColorDraft::default(), ColorDraft::default()],
            ..CarDraft::default()
        };
        let pending = |p: &str| PendingImage {
            staged_path: p.into(),
            file_name: "f.png".into(),
            content_type: "image/png".into(),
        };
        let out = complete_images(&draft, Some(pending("/s/primary")), vec![(1, pending("/s/c1"))]);

        assert_eq!(out.stage, WizardStage::Images);
        assert_eq!(out.patch.pending_image.unwrap().staged_path, "/s/primary");
        let colors = out.patch.colors.unwrap();
        assert!(colors[0].pending_image.is_none());
        assert_eq!(colors[1].pending_image.as_ref().unwrap().staged_path, "/s/c1");
    }

    #[test]
    fn complete_images_without_uploads_changes_nothing() {
        let out = complete_images(&CarDraft::default(), None, vec![]);
        assert_eq!(out.patch, DraftPatch::default());
    }

    #[test]
    fn standalone_validators() {
        assert!(validate_color_code("Red", "#f00").is_ok());
        assert!(validate_color_code("Red", "red").is_err());

        let mut spec = Specification::default();
        spec.values.insert("torque".into(), "300 Nm".into());
        assert!(validate_specification(&spec, "Trim 'Base'").is_ok());
        spec.values.insert("flux_capacitor".into(), "1.21 GW".into());
        assert_matches!(
            validate_specification(&spec, "Trim 'Base'"),
            Err(CoreError::Validation(m)) if m.contains("flux_capacitor")
        );
    }
}
