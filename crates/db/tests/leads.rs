//! Repository tests for contact submissions, orders and support tickets.

use showroom_db::models::contact_submission::CreateContactSubmission;
use showroom_db::models::order::CreateOrder;
use showroom_db::models::support_ticket::CreateSupportTicket;
use showroom_db::repositories::{ContactSubmissionRepo, OrderRepo, SupportTicketRepo};
use sqlx::PgPool;

fn ticket(subject: &str) -> CreateSupportTicket {
    CreateSupportTicket {
        name: "Sam".into(),
        email: "sam@example.com".into(),
        subject: subject.into(),
        message: "Help".into(),
        priority: "normal".into(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_contact_submissions_list_newest_first(pool: PgPool) {
    for name in ["first", "second"] {
        ContactSubmissionRepo::create(
            &pool,
            &CreateContactSubmission {
                name: name.into(),
                email: "x@example.com".into(),
                phone: None,
                preferred_contact: "email".into(),
                car_id: None,
                message: "hi".into(),
            },
        )
        .await
        .unwrap();
    }
    let rows = ContactSubmissionRepo::list(&pool, 10, 0).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "second");

    let page = ContactSubmissionRepo::list(&pool, 1, 1).await.unwrap();
    assert_eq!(page[0].name, "first");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_preferred_contact_is_rejected(pool: PgPool) {
    let result = ContactSubmissionRepo::create(
        &pool,
        &CreateContactSubmission {
            name: "x".into(),
            email: "x@example.com".into(),
            phone: None,
            preferred_contact: "pigeon".into(),
            car_id: None,
            message: "hi".into(),
        },
    )
    .await;
    assert!(result.is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tickets_open_and_change_status(pool: PgPool) {
    let created = SupportTicketRepo::create(&pool, &ticket("Brakes")).await.unwrap();
    assert_eq!(created.status, "open");
    SupportTicketRepo::create(&pool, &ticket("Paint")).await.unwrap();

    let updated = SupportTicketRepo::update_status(&pool, created.id, "resolved")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, "resolved");

    let open = SupportTicketRepo::list(&pool, Some("open"), 10, 0).await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].subject, "Paint");
    assert_eq!(SupportTicketRepo::list(&pool, None, 10, 0).await.unwrap().len(), 2);

    assert!(SupportTicketRepo::update_status(&pool, 424242, "open")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_order_snapshot_survives_car_delete(pool: PgPool) {
    let (car_id,): (i64,) =
        sqlx::query_as("INSERT INTO cars (name, base_price) VALUES ('Vela', '1') RETURNING id")
            .fetch_one(&pool)
            .await
            .unwrap();

    let order = OrderRepo::create(
        &pool,
        &CreateOrder {
            customer_name: "Lee".into(),
            email: "lee@example.com".into(),
            phone: "555".into(),
            car_id,
            trim_id: None,
            color_id: None,
            interior_id: None,
            car_name: "Vela".into(),
            trim_name: None,
            color_name: None,
            interior_name: None,
            notes: Some("Weekend delivery".into()),
        },
    )
    .await
    .unwrap();
    assert_eq!(order.car_id, Some(car_id));

    sqlx::query("DELETE FROM cars WHERE id = $1")
        .bind(car_id)
        .execute(&pool)
        .await
        .unwrap();

    let orders = OrderRepo::list(&pool, 10, 0).await.unwrap();
    assert_eq!(orders[0].car_id, None);
    assert_eq!(orders[0].car_name, "Vela");
}
