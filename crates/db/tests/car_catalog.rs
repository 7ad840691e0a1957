//! Repository tests for cars and their option rows.

use serde_json::json;
use showroom_db::models::car::SaveCar;
use showroom_db::models::car_color::{CreateCarColor, UpdateCarColor};
use showroom_db::models::car_interior::CreateCarInterior;
use showroom_db::models::car_trim::CreateCarTrim;
use showroom_db::repositories::{CarColorRepo, CarInteriorRepo, CarRepo, CarTrimRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_car(name: &str) -> SaveCar {
    SaveCar {
        name: name.to_string(),
        base_price: "42000".to_string(),
        specification: json!({"engine": "2.0L I4", "features": ["Sunroof"]}),
        image_url: None,
    }
}

fn trim(name: &str, price: &str) -> CreateCarTrim {
    CreateCarTrim {
        name: name.to_string(),
        price: price.to_string(),
        specification: json!({"horsepower": "255"}),
    }
}

fn color(name: &str, code: &str) -> CreateCarColor {
    CreateCarColor {
        name: name.to_string(),
        code: code.to_string(),
        image_url: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_and_update_car(pool: PgPool) {
    let car = CarRepo::create(&pool, &new_car("Meridian")).await.unwrap();
    assert_eq!(car.name, "Meridian");
    assert_eq!(car.specification["engine"], "2.0L I4");

    let mut replacement = new_car("Meridian GT");
    replacement.image_url = Some("http://cdn/x.png".into());
    let updated = CarRepo::update(&pool, car.id, &replacement)
        .await
        .unwrap()
        .expect("car exists");
    assert_eq!(updated.name, "Meridian GT");
    assert_eq!(updated.image_url.as_deref(), Some("http://cdn/x.png"));

    // Full replacement clears the image.
    let cleared = CarRepo::update(&pool, car.id, &new_car("Meridian GT"))
        .await
        .unwrap()
        .unwrap();
    assert!(cleared.image_url.is_none());

    assert!(CarRepo::update(&pool, 999_999, &new_car("x")).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_batch_children_keep_order(pool: PgPool) {
    let car = CarRepo::create(&pool, &new_car("Orbit")).await.unwrap();

    let trims = CarTrimRepo::create_batch(
        &pool,
        car.id,
        &[trim("Base", "100"), trim("Sport", "200"), trim("Touring", "300")],
    )
    .await
    .unwrap();
    assert_eq!(trims.len(), 3);

    CarColorRepo::create_batch(&pool, car.id, &[color("Black", "#000000"), color("Red", "#ff0000")])
        .await
        .unwrap();
    CarInteriorRepo::create_batch(
        &pool,
        car.id,
        &[CreateCarInterior {
            name: "Standard".into(),
        }],
    )
    .await
    .unwrap();

    let detail = CarRepo::find_detail(&pool, car.id).await.unwrap().unwrap();
    let names: Vec<_> = detail.trims.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Base", "Sport", "Touring"]);
    assert_eq!(detail.colors[1].code, "#ff0000");
    assert_eq!(detail.interiors.len(), 1);

    // Empty batches are a no-op.
    assert!(CarTrimRepo::create_batch(&pool, car.id, &[]).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_detail_round_trips_to_draft(pool: PgPool) {
    let car = CarRepo::create(&pool, &new_car("Vela")).await.unwrap();
    CarTrimRepo::create_batch(&pool, car.id, &[trim("Base", "100")])
        .await
        .unwrap();
    CarColorRepo::create_batch(&pool, car.id, &[color("Black", "#000000")])
        .await
        .unwrap();

    let detail = CarRepo::find_detail(&pool, car.id).await.unwrap().unwrap();
    let draft = detail.to_draft();
    assert_eq!(draft.id, Some(car.id));
    assert_eq!(draft.specification.values["engine"], "2.0L I4");
    assert_eq!(draft.specification.features, vec!["Sunroof".to_string()]);
    assert_eq!(draft.trims[0].specification.values["horsepower"], "255");
    assert_eq!(draft.colors[0].code, "#000000");
    assert!(draft.interiors.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_details_groups_children(pool: PgPool) {
    let a = CarRepo::create(&pool, &new_car("A")).await.unwrap();
    let b = CarRepo::create(&pool, &new_car("B")).await.unwrap();
    CarTrimRepo::create_batch(&pool, a.id, &[trim("A1", "1")]).await.unwrap();
    CarTrimRepo::create_batch(&pool, b.id, &[trim("B1", "1"), trim("B2", "2")])
        .await
        .unwrap();

    let details = CarRepo::list_details(&pool, 50, 0).await.unwrap();
    assert_eq!(details.len(), 2);
    for detail in &details {
        assert!(detail.trims.iter().all(|t| t.car_id == detail.car.id));
    }
    let b_detail = details.iter().find(|d| d.car.id == b.id).unwrap();
    assert_eq!(b_detail.trims.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_single_child_crud_is_scoped_to_car(pool: PgPool) {
    let car = CarRepo::create(&pool, &new_car("Scope")).await.unwrap();
    let other = CarRepo::create(&pool, &new_car("Other")).await.unwrap();

    let first = CarColorRepo::create(&pool, car.id, &color("Blue", "#0000ff")).await.unwrap();
    let second = CarColorRepo::create(&pool, car.id, &color("Green", "#00ff00")).await.unwrap();
    assert_eq!(first.sort_order, 0);
    assert_eq!(second.sort_order, 1);

    let patch = UpdateCarColor {
        name: Some("Navy".into()),
        code: None,
        image_url: None,
    };
    assert!(CarColorRepo::update(&pool, other.id, first.id, &patch).await.unwrap().is_none());
    let renamed = CarColorRepo::update(&pool, car.id, first.id, &patch)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.name, "Navy");
    assert_eq!(renamed.code, "#0000ff");

    assert!(!CarColorRepo::delete(&pool, other.id, first.id).await.unwrap());
    assert!(CarColorRepo::delete(&pool, car.id, first.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_car_delete_requires_children_gone(pool: PgPool) {
    let car = CarRepo::create(&pool, &new_car("Keeper")).await.unwrap();
    CarTrimRepo::create_batch(&pool, car.id, &[trim("Base", "1")]).await.unwrap();

    // No cascade: a bare delete is refused by the foreign key.
    let bare = sqlx::query("DELETE FROM cars WHERE id = $1")
        .bind(car.id)
        .execute(&pool)
        .await;
    assert!(bare.is_err());

    assert!(CarRepo::delete_with_children(&pool, car.id).await.unwrap());
    assert!(CarRepo::find_by_id(&pool, car.id).await.unwrap().is_none());
    assert!(CarTrimRepo::list_by_car(&pool, car.id).await.unwrap().is_empty());
    assert!(!CarRepo::delete_with_children(&pool, car.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_by_car_clears_only_that_car(pool: PgPool) {
    let a = CarRepo::create(&pool, &new_car("A")).await.unwrap();
    let b = CarRepo::create(&pool, &new_car("B")).await.unwrap();
    CarTrimRepo::create_batch(&pool, a.id, &[trim("A1", "1"), trim("A2", "2")])
        .await
        .unwrap();
    CarTrimRepo::create_batch(&pool, b.id, &[trim("B1", "1")]).await.unwrap();

    assert_eq!(CarTrimRepo::delete_by_car(&pool, a.id).await.unwrap(), 2);
    assert_eq!(CarTrimRepo::list_by_car(&pool, b.id).await.unwrap().len(), 1);
}
