//! Handlers for the car configuration wizard (`/admin/wizard-sessions`).
//!
//! Each admin owns their sessions. Stage completions are validated by the
//! step editors, merged into the session draft and persisted before the
//! response is sent, so a browser refresh resumes exactly where it left off.
//! A session ends with submit (the draft is published) or close (discarded).

use std::collections::BTreeMap;
use std::path::PathBuf;

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use showroom_core::draft::{CarDraft, PendingImage};
use showroom_core::error::CoreError;
use showroom_core::steps::{
    self, BasicInfoForm, CustomizationForm, ImagesForm, ImagesInput, UploadedImage,
};
use showroom_core::storage::{discard_staged, read_staged, stage_upload};
use showroom_core::types::{DbId, Timestamp};
use showroom_core::views::{render_preview, Preview};
use showroom_core::wizard::{PreviewAction, WizardMode, WizardSession, WizardStage};
use showroom_db::models::wizard_session::{form_data_json, CreateWizardSession, WizardSessionRow};
use showroom_db::repositories::{CarRepo, WizardSessionRepo};

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::submission::{self, SubmissionReport};

const CREATE_SLOT_CONSTRAINT: &str = "uq_wizard_sessions_create_slot";
const EDIT_CAR_CONSTRAINT: &str = "uq_wizard_sessions_edit_car";

/// Multipart field carrying the primary image.
const PRIMARY_FIELD: &str = "primary";
/// Prefix of multipart fields carrying a color image, e.g. `color_0`.
const COLOR_FIELD_PREFIX: &str = "color_";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenMode {
    Create,
    Edit,
}

/// Request body for `POST /admin/wizard-sessions`.
#[derive(Debug, Deserialize)]
pub struct OpenSessionRequest {
    pub mode: OpenMode,
    /// Required in edit mode.
    pub car_id: Option<DbId>,
    /// Create mode: continue the saved draft instead of failing with 409.
    #[serde(default)]
    pub resume: bool,
}

/// Request body for `POST /admin/wizard-sessions/{id}/preview`.
#[derive(Debug, Deserialize)]
pub struct PreviewDecision {
    pub action: PreviewAction,
}

/// A wizard session as returned to the client.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: DbId,
    #[serde(flatten)]
    pub mode: WizardMode,
    pub stage: WizardStage,
    pub stage_number: u8,
    pub stage_label: &'static str,
    pub draft: CarDraft,
    pub submitting: bool,
    pub updated_at: Timestamp,
}

impl SessionResponse {
    fn new(row: &WizardSessionRow, session: WizardSession) -> Self {
        Self {
            id: row.id,
            mode: session.mode,
            stage: session.stage,
            stage_number: session.stage.to_number(),
            stage_label: session.stage.label(),
            draft: session.draft,
            submitting: row.submitting,
            updated_at: row.updated_at,
        }
    }
}

/// The resume offer for a saved create-mode draft.
#[derive(Debug, Serialize)]
pub struct DraftSummary {
    pub id: DbId,
    pub stage: WizardStage,
    pub stage_label: &'static str,
    pub name: String,
    pub updated_at: Timestamp,
}

/// Seeded editor for the session's current stage.
#[derive(Debug, Serialize)]
#[serde(tag = "stage", content = "form", rename_all = "snake_case")]
pub enum StageForm {
    BasicInfo(BasicInfoForm),
    Customization(CustomizationForm),
    Images(ImagesForm),
    Preview(Preview),
}

type SessionJson = Json<DataResponse<SessionResponse>>;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn session_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "WizardSession",
        id,
    })
}

fn session_busy() -> AppError {
    AppError::Core(CoreError::Conflict(
        "The wizard session is being submitted".into(),
    ))
}

fn respond(row: &WizardSessionRow, session: WizardSession) -> SessionJson {
    Json(DataResponse {
        data: SessionResponse::new(row, session),
    })
}

/// Directory holding the staged uploads of one session.
fn staging_dir(state: &AppState, session_id: DbId) -> PathBuf {
    state
        .config
        .storage
        .staging_dir
        .join(format!("session-{session_id}"))
}

/// Remove a session's staged files together with its staging directory.
///
/// Uploads the draft no longer references (replaced before the session
/// ended) live in the same directory and go with it.
async fn discard_session_files(state: &AppState, session_id: DbId, draft: Option<&CarDraft>) {
    if let Some(draft) = draft {
        discard_staged(draft.staged_paths()).await;
    }
    let dir = staging_dir(state, session_id);
    if let Err(e) = tokio::fs::remove_dir_all(&dir).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(dir = %dir.display(), error = %e, "Failed to remove staging directory");
        }
    }
}

/// URL under which a session serves one of its staged uploads.
fn staged_url(session_id: DbId) -> impl Fn(&PendingImage) -> String {
    move |pending: &PendingImage| {
        format!(
            "/api/v1/admin/wizard-sessions/{session_id}/staged/{}",
            pending.staged_name()
        )
    }
}

/// Load a session owned by `user_id`.
///
/// A row whose stored state no longer decodes is deleted and reported as
/// missing.
async fn load_session(
    state: &AppState,
    id: DbId,
    user_id: DbId,
) -> AppResult<(WizardSessionRow, WizardSession)> {
    let row = WizardSessionRepo::find_for_user(&state.pool, id, user_id)
        .await?
        .ok_or_else(|| session_not_found(id))?;
    match row.to_session() {
        Some(session) => Ok((row, session)),
        None => {
            tracing::warn!(session_id = id, "Stored wizard session is malformed; discarding");
            if !row.submitting {
                WizardSessionRepo::delete(&state.pool, id).await?;
                discard_session_files(state, id, None).await;
            }
            Err(session_not_found(id))
        }
    }
}

/// Load a session that is open for editing (not submitting).
async fn load_editable(
    state: &AppState,
    id: DbId,
    user_id: DbId,
) -> AppResult<(WizardSessionRow, WizardSession)> {
    let (row, session) = load_session(state, id, user_id).await?;
    if row.submitting {
        return Err(session_busy());
    }
    Ok((row, session))
}

/// Persist the session's stage cursor and draft.
async fn save_progress(state: &AppState, id: DbId, session: &WizardSession) -> AppResult<WizardSessionRow> {
    let stored = session.to_stored();
    WizardSessionRepo::save_progress(
        &state.pool,
        id,
        i32::from(stored.stage),
        &form_data_json(&stored),
    )
    .await?
    .ok_or_else(session_busy)
}

/// Insert a new session row, mapping slot collisions to 409.
async fn insert_session(
    state: &AppState,
    user_id: DbId,
    session: &WizardSession,
) -> AppResult<WizardSessionRow> {
    WizardSessionRepo::create(&state.pool, &CreateWizardSession::from_session(user_id, session))
        .await
        .map_err(|e| {
            if is_unique_violation(&e, CREATE_SLOT_CONSTRAINT) {
                AppError::Core(CoreError::Conflict(
                    "A saved draft already exists; resume or discard it first".into(),
                ))
            } else if is_unique_violation(&e, EDIT_CAR_CONSTRAINT) {
                AppError::Core(CoreError::Conflict(
                    "This car is already open in another wizard session".into(),
                ))
            } else {
                AppError::Database(e)
            }
        })
}

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/wizard-sessions
///
/// Create mode uses the admin's single draft slot: an existing draft is
/// returned with `resume: true` and is a 409 otherwise. Edit mode always
/// starts fresh from the persisted car, replacing any earlier edit session
/// for it.
pub async fn open_session(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<OpenSessionRequest>,
) -> AppResult<(StatusCode, SessionJson)> {
    let user_id = admin.user_id;

    let session = match input.mode {
        OpenMode::Create => {
            if let Some(row) = WizardSessionRepo::find_create_draft(&state.pool, user_id).await? {
                match row.to_session() {
                    Some(session) if input.resume => {
                        tracing::info!(session_id = row.id, user_id, "Resuming saved draft");
                        return Ok((StatusCode::OK, respond(&row, session)));
                    }
                    Some(_) => {
                        return Err(AppError::Core(CoreError::Conflict(
                            "A saved draft already exists; resume or discard it first".into(),
                        )));
                    }
                    None if row.submitting => return Err(session_busy()),
                    None => {
                        tracing::warn!(session_id = row.id, "Saved draft is malformed; discarding");
                        WizardSessionRepo::delete(&state.pool, row.id).await?;
                        discard_session_files(&state, row.id, None).await;
                    }
                }
            }
            WizardSession::new_create()
        }
        OpenMode::Edit => {
            let car_id = input.car_id.ok_or_else(|| {
                AppError::Core(CoreError::Validation(
                    "car_id is required to edit a car".into(),
                ))
            })?;
            let detail = CarRepo::find_detail(&state.pool, car_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound { entity: "Car", id: car_id }))?;

            if let Some(previous) =
                WizardSessionRepo::find_edit_session(&state.pool, user_id, car_id).await?
            {
                let removed = WizardSessionRepo::delete_if_idle(&state.pool, previous.id, user_id)
                    .await?
                    .ok_or_else(session_busy)?;
                let draft = removed.to_session().map(|s| s.draft);
                discard_session_files(&state, removed.id, draft.as_ref()).await;
                tracing::debug!(session_id = removed.id, car_id, "Replaced earlier edit session");
            }
            WizardSession::new_edit(car_id, detail.to_draft())
        }
    };

    let row = insert_session(&state, user_id, &session).await?;
    tracing::info!(session_id = row.id, user_id, mode = ?session.mode, "Wizard session opened");
    Ok((StatusCode::CREATED, respond(&row, session)))
}

/// GET /api/v1/admin/wizard-sessions/draft
///
/// The admin's saved create-mode draft, or `null`.
pub async fn get_draft(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Option<DraftSummary>>>> {
    let Some(row) = WizardSessionRepo::find_create_draft(&state.pool, admin.user_id).await? else {
        return Ok(Json(DataResponse { data: None }));
    };

    let Some(session) = row.to_session() else {
        if !row.submitting {
            tracing::warn!(session_id = row.id, "Saved draft is malformed; discarding");
            WizardSessionRepo::delete(&state.pool, row.id).await?;
            discard_session_files(&state, row.id, None).await;
        }
        return Ok(Json(DataResponse { data: None }));
    };

    Ok(Json(DataResponse {
        data: Some(DraftSummary {
            id: row.id,
            stage: session.stage,
            stage_label: session.stage.label(),
            name: session.draft.name,
            updated_at: row.updated_at,
        }),
    }))
}

/// DELETE /api/v1/admin/wizard-sessions/draft
///
/// Discard the saved create-mode draft ("start over"). Idempotent.
pub async fn discard_draft(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<StatusCode> {
    if let Some(row) = WizardSessionRepo::find_create_draft(&state.pool, admin.user_id).await? {
        let removed = WizardSessionRepo::delete_if_idle(&state.pool, row.id, admin.user_id)
            .await?
            .ok_or_else(session_busy)?;
        let draft = removed.to_session().map(|s| s.draft);
        discard_session_files(&state, removed.id, draft.as_ref()).await;
        tracing::info!(session_id = removed.id, user_id = admin.user_id, "Saved draft discarded");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/wizard-sessions/{id}
pub async fn get_session(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<SessionJson> {
    let (row, session) = load_session(&state, id, admin.user_id).await?;
    Ok(respond(&row, session))
}

/// DELETE /api/v1/admin/wizard-sessions/{id}
///
/// Close without submitting. Nothing is written to the catalog.
pub async fn close_session(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    close(&state, id, admin.user_id).await
}

async fn close(state: &AppState, id: DbId, user_id: DbId) -> AppResult<StatusCode> {
    let Some(removed) = WizardSessionRepo::delete_if_idle(&state.pool, id, user_id).await? else {
        return match WizardSessionRepo::find_for_user(&state.pool, id, user_id).await? {
            Some(_) => Err(session_busy()),
            None => Err(session_not_found(id)),
        };
    };
    let draft = removed.to_session().map(|s| s.draft);
    discard_session_files(state, id, draft.as_ref()).await;
    tracing::info!(session_id = id, user_id, "Wizard session closed");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/wizard-sessions/{id}/form
pub async fn get_form(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<StageForm>>> {
    let (_, session) = load_session(&state, id, admin.user_id).await?;
    let form = match session.stage {
        WizardStage::BasicInfo => StageForm::BasicInfo(BasicInfoForm::seeded(&session.draft)),
        WizardStage::Customization => {
            StageForm::Customization(CustomizationForm::seeded(&session.draft))
        }
        WizardStage::Images => StageForm::Images(ImagesForm::seeded(&session.draft)),
        WizardStage::Preview => StageForm::Preview(render_preview(&session.draft, staged_url(id))),
    };
    Ok(Json(DataResponse { data: form }))
}

/// PUT /api/v1/admin/wizard-sessions/{id}/basic-info
pub async fn complete_basic_info(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(form): Json<BasicInfoForm>,
) -> AppResult<SessionJson> {
    let (_, mut session) = load_editable(&state, id, admin.user_id).await?;
    let next = session.complete_stage(form.complete()?)?;
    let row = save_progress(&state, id, &session).await?;
    tracing::info!(session_id = id, stage = next.label(), "Basic info completed");
    Ok(respond(&row, session))
}

/// PUT /api/v1/admin/wizard-sessions/{id}/customization
pub async fn complete_customization(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(form): Json<CustomizationForm>,
) -> AppResult<SessionJson> {
    let (_, mut session) = load_editable(&state, id, admin.user_id).await?;
    let output = form.complete(&session.draft)?;
    let next = session.complete_stage(output)?;
    let row = save_progress(&state, id, &session).await?;
    tracing::info!(session_id = id, stage = next.label(), "Customization completed");
    Ok(respond(&row, session))
}

/// Read the images stage multipart body.
///
/// Field `primary` is the car's main image; `color_{index}` attaches an image
/// to the color at that index. Empty file parts are ignored.
async fn read_images(mut multipart: Multipart) -> AppResult<ImagesInput> {
    let mut input = ImagesInput::default();
    let mut colors = BTreeMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or("image").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if bytes.is_empty() {
            continue;
        }
        let upload = UploadedImage {
            file_name,
            bytes: bytes.to_vec(),
        };

        if name == PRIMARY_FIELD {
            input.primary = Some(upload);
        } else if let Some(index) = name.strip_prefix(COLOR_FIELD_PREFIX) {
            let index: usize = index
                .parse()
                .map_err(|_| AppError::BadRequest(format!("Invalid color field '{name}'")))?;
            colors.insert(index, upload);
        } else {
            return Err(AppError::BadRequest(format!(
                "Unexpected multipart field '{name}'"
            )));
        }
    }

    input.colors = colors;
    Ok(input)
}

/// POST /api/v1/admin/wizard-sessions/{id}/images
///
/// Uploads are checked and staged on disk; they are published to the object
/// store only on submit.
pub async fn complete_images(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<SessionJson> {
    let (_, mut session) = load_editable(&state, id, admin.user_id).await?;
    if session.stage != WizardStage::Images {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Cannot upload images while the wizard is on stage '{}'",
            session.stage.label()
        ))));
    }

    let input = read_images(multipart).await?;
    input.validate(&session.draft)?;

    let dir = staging_dir(&state, id);
    let mut staged: Vec<PendingImage> = Vec::new();
    let result = stage_all(&dir, &input, &mut staged).await;
    let (primary, colors) = match result {
        Ok(parts) => parts,
        Err(e) => {
            discard_staged(staged.iter().map(|p| p.staged_path.as_str()).collect::<Vec<_>>()).await;
            return Err(e);
        }
    };

    let output = steps::complete_images(&session.draft, primary, colors);
    let persisted = match session.complete_stage(output) {
        Ok(_) => save_progress(&state, id, &session).await,
        Err(e) => Err(e.into()),
    };
    let row = match persisted {
        Ok(row) => row,
        Err(e) => {
            discard_staged(staged.iter().map(|p| p.staged_path.as_str()).collect::<Vec<_>>()).await;
            return Err(e);
        }
    };

    tracing::info!(session_id = id, staged = staged.len(), "Images completed");
    Ok(respond(&row, session))
}

/// Stage every upload of `input`, recording each staged file in `staged`.
async fn stage_all(
    dir: &std::path::Path,
    input: &ImagesInput,
    staged: &mut Vec<PendingImage>,
) -> AppResult<(Option<PendingImage>, Vec<(usize, PendingImage)>)> {
    let primary = match &input.primary {
        Some(upload) => {
            let pending = stage_upload(dir, upload, upload.sniff_content_type()?).await?;
            staged.push(pending.clone());
            Some(pending)
        }
        None => None,
    };

    let mut colors = Vec::with_capacity(input.colors.len());
    for (index, upload) in &input.colors {
        let pending = stage_upload(dir, upload, upload.sniff_content_type()?).await?;
        staged.push(pending.clone());
        colors.push((*index, pending));
    }
    Ok((primary, colors))
}

/// GET /api/v1/admin/wizard-sessions/{id}/preview
///
/// The draft rendered with the public catalog's card and spec sheet.
pub async fn get_preview(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Preview>>> {
    let (_, session) = load_session(&state, id, admin.user_id).await?;
    Ok(Json(DataResponse {
        data: render_preview(&session.draft, staged_url(id)),
    }))
}

/// GET /api/v1/admin/wizard-sessions/{id}/staged/{name}
///
/// Serve an upload staged by this session and still referenced by its draft.
pub async fn get_staged_image(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((id, name)): Path<(DbId, String)>,
) -> AppResult<Response> {
    let (_, session) = load_session(&state, id, admin.user_id).await?;
    let pending = session
        .draft
        .find_pending(&name)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "StagedImage",
            id,
        }))?;
    let bytes = read_staged(pending).await?;
    Ok(([(header::CONTENT_TYPE, pending.content_type.clone())], bytes).into_response())
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/wizard-sessions/{id}/submit
///
/// Claims the session, publishes the draft and removes the session. A second
/// submit while one is running is a 409. If the car row cannot be written
/// the session is released and kept for another attempt.
pub async fn submit_session(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<SubmissionReport>>)> {
    submit(&state, id, admin.user_id).await
}

/// POST /api/v1/admin/wizard-sessions/{id}/preview
///
/// Ends the preview stage: `submit` publishes the draft, `discard` closes the
/// session without writing anything.
pub async fn finish_preview(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<PreviewDecision>,
) -> AppResult<Response> {
    match input.action {
        PreviewAction::Submit => Ok(submit(&state, id, admin.user_id).await?.into_response()),
        PreviewAction::Discard => {
            let (_, session) = load_editable(&state, id, admin.user_id).await?;
            session.ensure_on_preview()?;
            Ok(close(&state, id, admin.user_id).await?.into_response())
        }
    }
}

async fn submit(
    state: &AppState,
    id: DbId,
    user_id: DbId,
) -> AppResult<(StatusCode, Json<DataResponse<SubmissionReport>>)> {
    let Some(row) = WizardSessionRepo::try_claim_submit(&state.pool, id, user_id).await? else {
        return match WizardSessionRepo::find_for_user(&state.pool, id, user_id).await? {
            Some(_) => Err(session_busy()),
            None => Err(session_not_found(id)),
        };
    };

    let Some(session) = row.to_session() else {
        tracing::warn!(session_id = id, "Stored wizard session is malformed; discarding");
        WizardSessionRepo::delete(&state.pool, id).await?;
        discard_session_files(state, id, None).await;
        return Err(session_not_found(id));
    };

    if let Err(e) = session.ensure_on_preview() {
        WizardSessionRepo::release_submit(&state.pool, id).await?;
        return Err(e.into());
    }

    let report =
        match submission::submit(&state.pool, state.store.as_ref(), session.mode, &session.draft)
            .await
        {
            Ok(report) => report,
            Err(e) => {
                if let Err(release_err) = WizardSessionRepo::release_submit(&state.pool, id).await {
                    tracing::error!(session_id = id, error = %release_err, "Failed to release submit claim");
                }
                tracing::warn!(session_id = id, error = %e, "Submission failed; session kept");
                return Err(e);
            }
        };

    if let Err(e) = WizardSessionRepo::delete(&state.pool, id).await {
        tracing::warn!(session_id = id, error = %e, "Failed to remove submitted wizard session");
    }
    discard_session_files(state, id, Some(&session.draft)).await;

    tracing::info!(
        session_id = id,
        car_id = report.car.id,
        user_id,
        warnings = report.warnings.len(),
        "Wizard session submitted"
    );

    let status = match session.mode {
        WizardMode::Create => StatusCode::CREATED,
        WizardMode::Edit { .. } => StatusCode::OK,
    };
    Ok((status, Json(DataResponse { data: report })))
}
