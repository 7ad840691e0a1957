//! Repository tests for stored wizard sessions.

use showroom_core::draft::CarDraft;
use showroom_core::wizard::{WizardMode, WizardSession, WizardStage};
use showroom_db::models::car::SaveCar;
use showroom_db::models::user::CreateUser;
use showroom_db::models::wizard_session::CreateWizardSession;
use showroom_db::repositories::{CarRepo, UserRepo, WizardSessionRepo};
use sqlx::PgPool;

async fn admin(pool: &PgPool, name: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: name.to_string(),
            password_hash: "not-a-real-hash".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

fn named_draft(name: &str) -> WizardSession {
    let mut session = WizardSession::new_create();
    session.draft.name = name.to_string();
    session
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_slot_is_single_per_user(pool: PgPool) {
    let alice = admin(&pool, "alice").await;
    let bob = admin(&pool, "bob").await;

    WizardSessionRepo::create(&pool, &CreateWizardSession::from_session(alice, &named_draft("a")))
        .await
        .unwrap();
    let second = WizardSessionRepo::create(
        &pool,
        &CreateWizardSession::from_session(alice, &named_draft("b")),
    )
    .await;
    let err = second.unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("uq_wizard_sessions_create_slot"));

    // Another admin has their own slot.
    WizardSessionRepo::create(&pool, &CreateWizardSession::from_session(bob, &named_draft("c")))
        .await
        .unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_progress_round_trips(pool: PgPool) {
    let user = admin(&pool, "carol").await;
    let row = WizardSessionRepo::create(
        &pool,
        &CreateWizardSession::from_session(user, &named_draft("Draft")),
    )
    .await
    .unwrap();

    let mut session = row.to_session().expect("fresh row decodes");
    assert_eq!(session.stage, WizardStage::BasicInfo);
    session.stage = WizardStage::Images;
    session.draft.base_price = "100".into();
    let stored = session.to_stored();

    WizardSessionRepo::save_progress(
        &pool,
        row.id,
        i32::from(stored.stage),
        &serde_json::to_value(&stored.form_data).unwrap(),
    )
    .await
    .unwrap()
    .unwrap();

    let reloaded = WizardSessionRepo::find_create_draft(&pool, user)
        .await
        .unwrap()
        .unwrap()
        .to_session()
        .unwrap();
    assert_eq!(reloaded, session);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_malformed_row_decodes_as_none(pool: PgPool) {
    let user = admin(&pool, "dave").await;
    let row = WizardSessionRepo::create(
        &pool,
        &CreateWizardSession {
            user_id: user,
            mode: "create",
            car_id: None,
            stage: 9,
            form_data: serde_json::json!({"trims": "not a list"}),
        },
    )
    .await
    .unwrap();
    assert!(row.to_session().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_claim_is_exclusive(pool: PgPool) {
    let user = admin(&pool, "erin").await;
    let row = WizardSessionRepo::create(
        &pool,
        &CreateWizardSession::from_session(user, &named_draft("Busy")),
    )
    .await
    .unwrap();

    assert!(WizardSessionRepo::try_claim_submit(&pool, row.id, user).await.unwrap().is_some());
    assert!(WizardSessionRepo::try_claim_submit(&pool, row.id, user).await.unwrap().is_none());

    // Neither progress saves nor discards touch a submitting session.
    let saved = WizardSessionRepo::save_progress(&pool, row.id, 2, &row.form_data)
        .await
        .unwrap();
    assert!(saved.is_none());
    assert!(WizardSessionRepo::delete_if_idle(&pool, row.id, user).await.unwrap().is_none());

    WizardSessionRepo::release_submit(&pool, row.id).await.unwrap();
    assert!(WizardSessionRepo::delete_if_idle(&pool, row.id, user).await.unwrap().is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sessions_are_scoped_to_owner(pool: PgPool) {
    let owner = admin(&pool, "frank").await;
    let intruder = admin(&pool, "grace").await;
    let row = WizardSessionRepo::create(
        &pool,
        &CreateWizardSession::from_session(owner, &named_draft("Mine")),
    )
    .await
    .unwrap();

    assert!(WizardSessionRepo::find_for_user(&pool, row.id, intruder).await.unwrap().is_none());
    assert!(WizardSessionRepo::try_claim_submit(&pool, row.id, intruder).await.unwrap().is_none());
    assert!(WizardSessionRepo::delete_if_idle(&pool, row.id, intruder).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_edit_sessions_are_removed_with_car(pool: PgPool) {
    let user = admin(&pool, "heidi").await;
    let car = CarRepo::create(
        &pool,
        &SaveCar {
            name: "Edited".into(),
            base_price: "1".into(),
            specification: serde_json::json!({}),
            image_url: None,
        },
    )
    .await
    .unwrap();

    let session = WizardSession::new_edit(car.id, CarDraft::default());
    assert_eq!(session.mode, WizardMode::Edit { car_id: car.id });
    WizardSessionRepo::create(&pool, &CreateWizardSession::from_session(user, &session))
        .await
        .unwrap();
    assert_eq!(WizardSessionRepo::list_by_car(&pool, car.id).await.unwrap().len(), 1);

    CarRepo::delete_with_children(&pool, car.id).await.unwrap();
    assert!(WizardSessionRepo::find_edit_session(&pool, user, car.id)
        .await
        .unwrap()
        .is_none());
}
