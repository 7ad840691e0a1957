//! Writes a wizard draft to the catalog tables.
//!
//! The car row is the only fatal write. Image uploads and child-row writes
//! that fail are logged, recorded in [`SubmissionReport::warnings`], and the
//! batch carries on, so a submission can succeed partially.

use futures::future::join_all;
use serde::Serialize;
use showroom_core::draft::{CarDraft, ColorDraft, PendingImage};
use showroom_core::error::CoreError;
use showroom_core::storage::{
    object_key, read_staged, ObjectStore, StorageError, CAR_IMAGES_PREFIX, COLOR_IMAGES_PREFIX,
};
use showroom_core::wizard::WizardMode;
use showroom_db::models::car::{Car, SaveCar};
use showroom_db::models::car_color::CreateCarColor;
use showroom_db::models::car_interior::CreateCarInterior;
use showroom_db::models::car_trim::CreateCarTrim;
use showroom_db::repositories::{CarColorRepo, CarInteriorRepo, CarRepo, CarTrimRepo};
use showroom_db::DbPool;

use crate::error::{AppError, AppResult};

/// Outcome of a submission whose car row was written.
#[derive(Debug, Serialize)]
pub struct SubmissionReport {
    pub car: Car,
    pub colors_inserted: usize,
    pub trims_inserted: usize,
    pub interiors_inserted: usize,
    /// Non-fatal failures, in the order they happened.
    pub warnings: Vec<String>,
}

/// Read a staged file and publish it under `prefix`, returning its public URL.
async fn publish(
    store: &dyn ObjectStore,
    prefix: &str,
    pending: &PendingImage,
) -> Result<String, StorageError> {
    let bytes = read_staged(pending).await?;
    let key = object_key(prefix, &pending.file_name);
    store.upload(&key, bytes, &pending.content_type).await?;
    Ok(store.public_url(&key))
}

/// Resolve the image URL of one color, uploading its pending file if any.
///
/// `Err` carries the warning for a color that must be skipped.
async fn resolve_color(store: &dyn ObjectStore, color: &ColorDraft) -> Result<CreateCarColor, String> {
    let image_url = match &color.pending_image {
        Some(pending) => match publish(store, COLOR_IMAGES_PREFIX, pending).await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(color = %color.name, error = %e, "Color image upload failed; skipping color");
                return Err(format!(
                    "Image upload for color '{}' failed; the color was not saved: {e}",
                    color.name
                ));
            }
        },
        None => color.image_url.clone(),
    };
    Ok(CreateCarColor {
        name: color.name.trim().to_string(),
        code: color.code.trim().to_string(),
        image_url,
    })
}

/// Write `draft` as a new car (`Create`) or over an existing one (`Edit`).
///
/// Steps run strictly in order: primary image, car row, child cleanup (edit
/// only), colors, trims, interiors. Only a failed car-row write returns an
/// error.
pub async fn submit(
    pool: &DbPool,
    store: &dyn ObjectStore,
    mode: WizardMode,
    draft: &CarDraft,
) -> AppResult<SubmissionReport> {
    let mut warnings = Vec::new();

    // 1. Primary image.
    let image_url = match &draft.pending_image {
        Some(pending) => match publish(store, CAR_IMAGES_PREFIX, pending).await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(error = %e, "Primary image upload failed; saving car without image");
                warnings.push(format!(
                    "Primary image upload failed; the car was saved without an image: {e}"
                ));
                None
            }
        },
        None => draft.image_url.clone(),
    };

    // 2. Car row.
    let save = SaveCar::from_draft(draft, image_url);
    let car = match mode {
        WizardMode::Create => CarRepo::create(pool, &save).await?,
        WizardMode::Edit { car_id } => CarRepo::update(pool, car_id, &save)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Car",
                id: car_id,
            }))?,
    };
    tracing::info!(car_id = car.id, mode = ?mode, "Car row written");

    // 3. Full replace of children when editing.
    if let WizardMode::Edit { car_id } = mode {
        if let Err(e) = CarColorRepo::delete_by_car(pool, car_id).await {
            tracing::warn!(car_id, error = %e, "Failed to remove previous colors");
            warnings.push(format!("Previous colors could not be removed: {e}"));
        }
        if let Err(e) = CarTrimRepo::delete_by_car(pool, car_id).await {
            tracing::warn!(car_id, error = %e, "Failed to remove previous trims");
            warnings.push(format!("Previous trims could not be removed: {e}"));
        }
        if let Err(e) = CarInteriorRepo::delete_by_car(pool, car_id).await {
            tracing::warn!(car_id, error = %e, "Failed to remove previous interiors");
            warnings.push(format!("Previous interiors could not be removed: {e}"));
        }
    }

    // 4. Colors, uploads in parallel.
    let resolved = join_all(
        draft
            .colors
            .iter()
            .filter(|c| c.is_complete())
            .map(|c| resolve_color(store, c)),
    )
    .await;
    let mut colors = Vec::with_capacity(resolved.len());
    for result in resolved {
        match result {
            Ok(color) => colors.push(color),
            Err(warning) => warnings.push(warning),
        }
    }
    let colors_inserted = match CarColorRepo::create_batch(pool, car.id, &colors).await {
        Ok(rows) => rows.len(),
        Err(e) => {
            tracing::warn!(car_id = car.id, error = %e, "Failed to insert colors");
            warnings.push(format!("Colors could not be saved: {e}"));
            0
        }
    };

    // 5. Trims.
    let trims: Vec<CreateCarTrim> = draft
        .trims
        .iter()
        .filter(|t| t.is_complete())
        .map(CreateCarTrim::from)
        .collect();
    let trims_inserted = match CarTrimRepo::create_batch(pool, car.id, &trims).await {
        Ok(rows) => rows.len(),
        Err(e) => {
            tracing::warn!(car_id = car.id, error = %e, "Failed to insert trims");
            warnings.push(format!("Trims could not be saved: {e}"));
            0
        }
    };

    // 6. Interiors.
    let interiors: Vec<CreateCarInterior> = draft
        .interiors
        .iter()
        .filter(|i| i.is_complete())
        .map(|i| CreateCarInterior {
            name: i.name.trim().to_string(),
        })
        .collect();
    let interiors_inserted = match CarInteriorRepo::create_batch(pool, car.id, &interiors).await {
        Ok(rows) => rows.len(),
        Err(e) => {
            tracing::warn!(car_id = car.id, error = %e, "Failed to insert interiors");
            warnings.push(format!("Interiors could not be saved: {e}"));
            0
        }
    };

    tracing::info!(
        car_id = car.id,
        colors_inserted,
        trims_inserted,
        interiors_inserted,
        warnings = warnings.len(),
        "Submission finished"
    );

    Ok(SubmissionReport {
        car,
        colors_inserted,
        trims_inserted,
        interiors_inserted,
        warnings,
    })
}
