//! Car configuration wizard: stage definitions and the session state machine.
//!
//! A [`WizardSession`] walks `BasicInfo → Customization → Images → Preview`.
//! Each completed stage hands back a [`DraftPatch`] that is merged into the
//! session's draft before the cursor moves forward by exactly one. There is no
//! backward navigation; a session ends at `Preview` with either a submit or a
//! discard, after which it is closed and its stored state removed.

use serde::{Deserialize, Serialize};

use crate::draft::{CarDraft, DraftPatch};
use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// The four stages of the car configuration wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStage {
    BasicInfo,
    Customization,
    Images,
    Preview,
}

/// Minimum stage number (1-based).
pub const MIN_STAGE: u8 = 1;

/// Maximum stage number (1-based).
pub const MAX_STAGE: u8 = 4;

impl WizardStage {
    /// Convert a 1-based stage number to a `WizardStage`.
    pub fn from_number(n: u8) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Self::BasicInfo),
            2 => Ok(Self::Customization),
            3 => Ok(Self::Images),
            4 => Ok(Self::Preview),
            _ => Err(CoreError::Validation(format!(
                "Invalid stage number {n}. Must be between {MIN_STAGE} and {MAX_STAGE}"
            ))),
        }
    }

    /// Convert to a 1-based stage number.
    pub fn to_number(self) -> u8 {
        match self {
            Self::BasicInfo => 1,
            Self::Customization => 2,
            Self::Images => 3,
            Self::Preview => 4,
        }
    }

    /// Human-readable label for the stage.
    pub fn label(self) -> &'static str {
        match self {
            Self::BasicInfo => "Basic Info",
            Self::Customization => "Customization",
            Self::Images => "Images",
            Self::Preview => "Preview",
        }
    }

    /// The stage that follows this one, or `None` for `Preview`.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::BasicInfo => Some(Self::Customization),
            Self::Customization => Some(Self::Images),
            Self::Images => Some(Self::Preview),
            Self::Preview => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Whether the wizard authors a new car or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WizardMode {
    Create,
    Edit { car_id: DbId },
}

impl WizardMode {
    pub fn car_id(self) -> Option<DbId> {
        match self {
            Self::Create => None,
            Self::Edit { car_id } => Some(car_id),
        }
    }
}

/// Terminal action taken on the preview stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewAction {
    Submit,
    Discard,
}

/// A stage's validated output, tagged with the stage that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct StageOutput {
    pub stage: WizardStage,
    pub patch: DraftPatch,
}

/// One authoring run of the configuration wizard.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardSession {
    pub mode: WizardMode,
    pub stage: WizardStage,
    pub draft: CarDraft,
}

impl WizardSession {
    /// A fresh create-mode session with an empty draft.
    pub fn new_create() -> Self {
        Self {
            mode: WizardMode::Create,
            stage: WizardStage::BasicInfo,
            draft: CarDraft::default(),
        }
    }

    /// An edit-mode session seeded from the persisted car.
    pub fn new_edit(car_id: DbId, mut draft: CarDraft) -> Self {
        draft.id = Some(car_id);
        Self {
            mode: WizardMode::Edit { car_id },
            stage: WizardStage::BasicInfo,
            draft,
        }
    }

    /// Rebuild a session from stored state.
    pub fn resume(mode: WizardMode, stored: StoredDraft) -> Result<Self, CoreError> {
        Ok(Self {
            mode,
            stage: WizardStage::from_number(stored.stage)?,
            draft: stored.form_data,
        })
    }

    /// Merge a completed stage's output and advance by one stage.
    ///
    /// The output must come from the current stage. `Preview` is never
    /// completed this way; it ends with a [`PreviewAction`].
    pub fn complete_stage(&mut self, output: StageOutput) -> Result<WizardStage, CoreError> {
        if output.stage != self.stage {
            return Err(CoreError::Validation(format!(
                "Cannot complete stage '{}' while the wizard is on stage '{}'",
                output.stage.label(),
                self.stage.label()
            )));
        }
        let next = self.stage.next().ok_or_else(|| {
            CoreError::Validation(
                "The preview stage ends with submit or discard, not a step completion".into(),
            )
        })?;

        output.patch.merge_into(&mut self.draft);
        self.stage = next;
        Ok(next)
    }

    /// Check that a preview action may be taken now.
    pub fn ensure_on_preview(&self) -> Result<(), CoreError> {
        if self.stage != WizardStage::Preview {
            return Err(CoreError::Validation(format!(
                "Cannot finish the wizard from stage '{}'; complete every stage first",
                self.stage.label()
            )));
        }
        Ok(())
    }

    /// Serializable snapshot persisted after every stage.
    pub fn to_stored(&self) -> StoredDraft {
        StoredDraft {
            stage: self.stage.to_number(),
            form_data: self.draft.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Stored draft
// ---------------------------------------------------------------------------

/// Persisted `{ stage, formData }` payload of a wizard session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDraft {
    pub stage: u8,
    #[serde(rename = "formData")]
    pub form_data: CarDraft,
}

impl StoredDraft {
    /// Parse stored state, treating anything malformed as "no draft".
    pub fn parse(value: &serde_json::Value) -> Option<Self> {
        let stored = Self::deserialize(value).ok()?;
        WizardStage::from_number(stored.stage).ok()?;
        Some(stored)
    }

    /// Assemble from the separate `stage` / `form_data` columns of a stored row.
    pub fn from_parts(stage: i32, form_data: &serde_json::Value) -> Option<Self> {
        let stage = u8::try_from(stage).ok()?;
        WizardStage::from_number(stage).ok()?;
        let form_data = CarDraft::deserialize(form_data).ok()?;
        Some(Self { stage, form_data })
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{ColorDraft, InteriorDraft, TrimDraft};
    use assert_matches::assert_matches;
    use serde_json::json;

    fn output(stage: WizardStage) -> StageOutput {
        StageOutput {
            stage,
            patch: DraftPatch::default(),
        }
    }

    fn sample_draft() -> CarDraft {
        let mut draft = CarDraft {
            name: "Meridian GT".into(),
            base_price: "48000".into(),
            trims: vec![TrimDraft {
                name: "Base".into(),
                price: "100".into(),
                ..TrimDraft::default()
            }],
            colors: vec![ColorDraft {
                name: "Black".into(),
                code: "#000000".into(),
                ..ColorDraft::default()
            }],
            interiors: vec![InteriorDraft {
                name: "Standard".into(),
            }],
            ..CarDraft::default()
        };
        draft
            .specification
            .values
            .insert("engine".into(), "3.0L I6".into());
        draft.specification.features.push("Heated seats".into());
        draft
    }

    // -- WizardStage --

    #[test]
    fn stage_number_roundtrip() {
        for n in MIN_STAGE..=MAX_STAGE {
            assert_eq!(WizardStage::from_number(n).unwrap().to_number(), n);
        }
    }

    #[test]
    fn stage_from_number_invalid() {
        assert!(WizardStage::from_number(0).is_err());
        assert!(WizardStage::from_number(5).is_err());
    }

    #[test]
    fn stage_labels_are_nonempty() {
        for n in MIN_STAGE..=MAX_STAGE {
            assert!(!WizardStage::from_number(n).unwrap().label().is_empty());
        }
    }

    // -- complete_stage --

    #[test]
    fn each_completion_advances_exactly_one() {
        let mut session = WizardSession::new_create();
        for expected in [
            WizardStage::Customization,
            WizardStage::Images,
            WizardStage::Preview,
        ] {
            let before = session.stage.to_number();
            let next = session.complete_stage(output(session.stage)).unwrap();
            assert_eq!(next, expected);
            assert_eq!(session.stage.to_number(), before + 1);
        }
    }

    #[test]
    fn output_from_other_stage_is_rejected() {
        let mut session = WizardSession::new_create();
        let result = session.complete_stage(output(WizardStage::Images));
        assert_matches!(result, Err(CoreError::Validation(_)));
        assert_eq!(session.stage, WizardStage::BasicInfo);
    }

    #[test]
    fn preview_cannot_be_completed_as_a_step() {
        let mut session = WizardSession::new_create();
        session.stage = WizardStage::Preview;
        assert!(session.complete_stage(output(WizardStage::Preview)).is_err());
        assert!(session.ensure_on_preview().is_ok());
    }

    #[test]
    fn rejected_completion_leaves_draft_untouched() {
        let mut session = WizardSession::new_create();
        let patch = DraftPatch {
            name: Some("Skipped".into()),
            ..DraftPatch::default()
        };
        let _ = session.complete_stage(StageOutput {
            stage: WizardStage::Customization,
            patch,
        });
        assert!(session.draft.name.is_empty());
    }

    #[test]
    fn completion_merges_patch() {
        let mut session = WizardSession::new_create();
        session
            .complete_stage(StageOutput {
                stage: WizardStage::BasicInfo,
                patch: DraftPatch {
                    name: Some("Coupe".into()),
                    ..DraftPatch::default()
                },
            })
            .unwrap();
        assert_eq!(session.draft.name, "Coupe");
    }

    #[test]
    fn submit_requires_preview() {
        let session = WizardSession::new_create();
        assert!(session.ensure_on_preview().is_err());
    }

    #[test]
    fn edit_session_stamps_car_id() {
        let session = WizardSession::new_edit(7, sample_draft());
        assert_eq!(session.mode, WizardMode::Edit { car_id: 7 });
        assert_eq!(session.draft.id, Some(7));
        assert_eq!(session.stage, WizardStage::BasicInfo);
    }

    // -- StoredDraft --

    #[test]
    fn stored_draft_roundtrip_reproduces_session() {
        let mut session = WizardSession::new_create();
        session.draft = sample_draft();
        session.stage = WizardStage::Images;

        let json = session.to_stored().to_json();
        let parsed = StoredDraft::parse(&json).expect("stored draft should parse");
        let resumed = WizardSession::resume(WizardMode::Create, parsed).unwrap();

        assert_eq!(resumed, session);
    }

    #[test]
    fn stored_draft_uses_form_data_key() {
        let json = WizardSession::new_create().to_stored().to_json();
        assert_eq!(json["stage"], 1);
        assert!(json.get("formData").is_some());
    }

    #[test]
    fn malformed_stored_draft_is_none() {
        assert!(StoredDraft::parse(&json!("garbage")).is_none());
        assert!(StoredDraft::parse(&json!({"stage": 9, "formData": {}})).is_none());
        assert!(StoredDraft::parse(&json!({"stage": 2})).is_none());
        assert!(StoredDraft::parse(&json!({"stage": 2, "formData": {"trims": "nope"}})).is_none());
    }

    #[test]
    fn from_parts_validates_stage_and_shape() {
        let form = serde_json::to_value(sample_draft()).unwrap();
        assert!(StoredDraft::from_parts(3, &form).is_some());
        assert!(StoredDraft::from_parts(0, &form).is_none());
        assert!(StoredDraft::from_parts(-1, &form).is_none());
        assert!(StoredDraft::from_parts(2, &json!([1, 2, 3])).is_none());
    }
}
