//! Integration-style tests for the clinic module.
//!
//! Key points:
//! - Each test runs on a fresh in-memory SQLite DB and applies migrations.
//! - The service is constructed with a SeaORM-backed repository
//!   (Domain Port + Adapter).
//! - The web layer is exercised via an axum Router through the real routes.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Days, Local, NaiveDate};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tower::ServiceExt;

use clinic::domain::error::DomainError;
use clinic::domain::model::PetSubmission;
use clinic::domain::service::{ClinicService, SubmitOutcome};
use clinic::infra::storage::{migrations::Migrator, repo::SeaOrmClinicRepository};

// The initial migration seeds owner 1 (George Franklin) and the six
// classic pet types, "cat" being the second inserted.
const OWNER_ID: i32 = 1;
const CAT_TYPE_ID: i32 = 2;
const DOG_TYPE_ID: i32 = 3;

/// Create a fresh test database for each test (in-memory SQLite) and run migrations.
async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Build the domain service with a SeaORM-backed repository.
async fn create_test_service() -> Arc<ClinicService> {
    let db = create_test_db().await;
    let repo = SeaOrmClinicRepository::new(db);
    Arc::new(ClinicService::new(Arc::new(repo)))
}

/// Build an axum router through the real route registration.
async fn create_test_router() -> Router {
    clinic::web::routes::router(create_test_service().await)
}

fn submission(name: &str, birth_date: Option<NaiveDate>, type_id: Option<i32>) -> PetSubmission {
    PetSubmission {
        name: name.to_string(),
        birth_date,
        type_id,
    }
}

async fn add_pet_named(service: &ClinicService, name: &str) {
    match service
        .create_pet(OWNER_ID, submission(name, None, Some(CAT_TYPE_ID)))
        .await
        .expect("create_pet failed")
    {
        SubmitOutcome::Saved(_) => {}
        SubmitOutcome::Invalid(errors) => panic!("unexpected validation errors: {errors:?}"),
    }
}

// --- service-level properties ---

#[tokio::test]
async fn create_pet_persists_and_grows_the_aggregate() -> Result<()> {
    let service = create_test_service().await;
    let before = service.owner(OWNER_ID).await?.pets.len();

    let outcome = service
        .create_pet(
            OWNER_ID,
            submission(
                "Rex",
                NaiveDate::from_ymd_opt(2020, 5, 1),
                Some(DOG_TYPE_ID),
            ),
        )
        .await?;

    let pet = match outcome {
        SubmitOutcome::Saved(pet) => pet,
        SubmitOutcome::Invalid(errors) => panic!("unexpected errors: {errors:?}"),
    };
    assert!(pet.id.is_some(), "persisted pet must carry an id");
    assert_eq!(pet.name, "Rex");
    assert_eq!(pet.pet_type.as_ref().map(|t| t.name.as_str()), Some("dog"));

    let owner = service.owner(OWNER_ID).await?;
    assert_eq!(owner.pets.len(), before + 1);
    Ok(())
}

#[tokio::test]
async fn duplicate_name_is_rejected_without_persistence() -> Result<()> {
    let service = create_test_service().await;
    add_pet_named(&service, "Rex").await;
    let before = service.owner(OWNER_ID).await?.pets.len();

    // Same name, different case: the comparison is case-insensitive.
    let outcome = service
        .create_pet(OWNER_ID, submission("REX", None, Some(CAT_TYPE_ID)))
        .await?;

    match outcome {
        SubmitOutcome::Invalid(errors) => {
            assert_eq!(
                errors.message_for("name"),
                Some("This pet name already exists for this owner.")
            );
        }
        SubmitOutcome::Saved(_) => panic!("duplicate name must be rejected"),
    }

    assert_eq!(service.owner(OWNER_ID).await?.pets.len(), before);
    Ok(())
}

#[tokio::test]
async fn future_birth_date_is_rejected_without_persistence() -> Result<()> {
    let service = create_test_service().await;
    let before = service.owner(OWNER_ID).await?.pets.len();

    let tomorrow = Local::now()
        .date_naive()
        .checked_add_days(Days::new(1))
        .unwrap();
    let outcome = service
        .create_pet(OWNER_ID, submission("Rex", Some(tomorrow), Some(CAT_TYPE_ID)))
        .await?;

    match outcome {
        SubmitOutcome::Invalid(errors) => {
            assert_eq!(
                errors.message_for("birth_date"),
                Some("Birth date cannot be in the future.")
            );
        }
        SubmitOutcome::Saved(_) => panic!("future birth date must be rejected"),
    }

    assert_eq!(service.owner(OWNER_ID).await?.pets.len(), before);
    Ok(())
}

#[tokio::test]
async fn today_is_a_valid_birth_date() -> Result<()> {
    let service = create_test_service().await;
    let today = Local::now().date_naive();

    let outcome = service
        .create_pet(OWNER_ID, submission("Rex", Some(today), Some(CAT_TYPE_ID)))
        .await?;

    assert!(matches!(outcome, SubmitOutcome::Saved(_)));
    Ok(())
}

#[tokio::test]
async fn editing_a_pet_keeps_its_own_name_without_duplicate_error() -> Result<()> {
    let service = create_test_service().await;
    add_pet_named(&service, "Rex").await;
    let owner = service.owner(OWNER_ID).await?;
    let pet_id = owner.pets[0].id.unwrap();

    // Resubmit the unchanged name: the self-match must be excluded.
    let outcome = service
        .update_pet(
            OWNER_ID,
            pet_id,
            submission("Rex", NaiveDate::from_ymd_opt(2019, 3, 9), Some(DOG_TYPE_ID)),
        )
        .await?;

    let pet = match outcome {
        SubmitOutcome::Saved(pet) => pet,
        SubmitOutcome::Invalid(errors) => panic!("unexpected errors: {errors:?}"),
    };
    assert_eq!(pet.id, Some(pet_id), "edit must preserve the pet id");
    assert_eq!(pet.birth_date, NaiveDate::from_ymd_opt(2019, 3, 9));
    assert_eq!(pet.pet_type.as_ref().map(|t| t.name.as_str()), Some("dog"));
    Ok(())
}

#[tokio::test]
async fn editing_to_another_pets_name_is_rejected() -> Result<()> {
    let service = create_test_service().await;
    add_pet_named(&service, "Rex").await;
    add_pet_named(&service, "Whiskers").await;
    let owner = service.owner(OWNER_ID).await?;
    let whiskers_id = owner
        .pets
        .iter()
        .find(|p| p.name == "Whiskers")
        .and_then(|p| p.id)
        .unwrap();

    let outcome = service
        .update_pet(OWNER_ID, whiskers_id, submission("Rex", None, Some(CAT_TYPE_ID)))
        .await?;

    match outcome {
        SubmitOutcome::Invalid(errors) => {
            assert!(errors.message_for("name").is_some());
        }
        SubmitOutcome::Saved(_) => panic!("renaming onto another pet must be rejected"),
    }
    Ok(())
}

#[tokio::test]
async fn missing_name_and_type_accumulate_field_errors() -> Result<()> {
    let service = create_test_service().await;

    let outcome = service
        .create_pet(OWNER_ID, submission("", None, None))
        .await?;

    match outcome {
        SubmitOutcome::Invalid(errors) => {
            assert_eq!(errors.message_for("name"), Some("required"));
            assert_eq!(errors.message_for("type"), Some("required"));
        }
        SubmitOutcome::Saved(_) => panic!("empty submission must be rejected"),
    }
    Ok(())
}

#[tokio::test]
async fn unknown_owner_fails_with_owner_not_found() {
    let service = create_test_service().await;

    let err = service.owner(999).await.unwrap_err();
    assert!(matches!(err, DomainError::OwnerNotFound { id: 999 }));

    let err = service
        .create_pet(999, submission("Rex", None, Some(CAT_TYPE_ID)))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::OwnerNotFound { id: 999 }));
}

#[tokio::test]
async fn unknown_pet_fails_with_pet_not_found() {
    let service = create_test_service().await;

    let err = service.pet_for_edit(OWNER_ID, 42).await.unwrap_err();
    assert!(matches!(err, DomainError::PetNotFound { id: 42 }));

    let err = service
        .update_pet(OWNER_ID, 42, submission("Rex", None, Some(CAT_TYPE_ID)))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::PetNotFound { id: 42 }));
}

// --- router-level behavior ---

async fn get(router: &Router, uri: &str) -> (StatusCode, String) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

async fn post_form(router: &Router, uri: &str, body: &str) -> (StatusCode, Option<String>, String) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, location, String::from_utf8_lossy(&bytes).into_owned())
}

#[tokio::test]
async fn creation_form_renders_with_types() {
    let router = create_test_router().await;

    let (status, body) = get(&router, "/owners/1/pets/new").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<form"));
    assert!(body.contains("dog"));
    assert!(body.contains("hamster"));
}

#[tokio::test]
async fn successful_creation_redirects_to_owner_detail() {
    let router = create_test_router().await;

    let (status, location, _) = post_form(
        &router,
        "/owners/1/pets/new",
        "name=Rex&birth_date=2020-05-01&type_id=3",
    )
    .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    let location = location.expect("redirect must carry a Location header");
    assert!(location.starts_with("/owners/1"));
    assert!(location.contains("message="));

    // Follow the redirect: the detail page shows the pet and the message.
    let (status, body) = get(&router, &location).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Rex"));
    assert!(body.contains("New Pet has been Added"));
}

#[tokio::test]
async fn rejected_creation_rerenders_the_form_with_input_preserved() {
    let router = create_test_router().await;

    // Create "Rex", then submit it again.
    let _ = post_form(&router, "/owners/1/pets/new", "name=Rex&type_id=2").await;
    let (status, location, body) =
        post_form(&router, "/owners/1/pets/new", "name=Rex&type_id=2").await;

    assert_eq!(status, StatusCode::OK, "validation failure re-renders, no redirect");
    assert!(location.is_none());
    assert!(body.contains(r#"value="Rex""#), "submitted input is preserved");
    assert!(body.contains("This pet name already exists for this owner."));
}

#[tokio::test]
async fn edit_form_is_prefilled() {
    let router = create_test_router().await;
    let _ = post_form(
        &router,
        "/owners/1/pets/new",
        "name=Rex&birth_date=2020-05-01&type_id=3",
    )
    .await;

    let (status, body) = get(&router, "/owners/1/pets/1/edit").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"value="Rex""#));
    assert!(body.contains("2020-05-01"));
    assert!(body.contains(r#"<option value="3" selected>"#));
}

#[tokio::test]
async fn successful_edit_updates_fields_and_redirects() {
    let router = create_test_router().await;
    let _ = post_form(&router, "/owners/1/pets/new", "name=Rex&type_id=3").await;

    let (status, location, _) = post_form(
        &router,
        "/owners/1/pets/1/edit",
        "name=Rexy&birth_date=2019-03-09&type_id=2",
    )
    .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert!(location.unwrap().starts_with("/owners/1"));

    let (_, body) = get(&router, "/owners/1").await;
    assert!(body.contains("Rexy"));
    assert!(!body.contains(">Rex (")); // old name gone
    assert!(body.contains("cat"));
}

#[tokio::test]
async fn unknown_owner_yields_404_page_with_id_in_message() {
    let router = create_test_router().await;

    for uri in [
        "/owners/999",
        "/owners/999/pets/new",
        "/owners/999/pets/1/edit",
    ] {
        let (status, body) = get(&router, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert!(
            body.contains("Owner not found with id: 999"),
            "{uri}: {body}"
        );
    }
}

#[tokio::test]
async fn unknown_pet_yields_404_page() {
    let router = create_test_router().await;

    let (status, body) = get(&router, "/owners/1/pets/42/edit").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Pet not found with id: 42"));
}
