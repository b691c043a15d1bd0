use std::sync::Arc;

use axum::{
    extract::{Form, Path, Query},
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};
use serde::Deserialize;
use tracing::info;

use crate::domain::service::{ClinicService, SubmitOutcome};
use crate::domain::validate::FieldErrors;
use crate::web::error::WebError;
use crate::web::forms::PetForm;
use crate::web::views;

const MSG_PET_ADDED: &str = "New Pet has been Added";
const MSG_PET_EDITED: &str = "Pet details has been edited";

#[derive(Debug, Deserialize, Default)]
pub struct DetailQuery {
    pub message: Option<String>,
}

/// 303 back to the owner's detail page, carrying the success message.
fn redirect_to_owner(owner_id: i32, message: &str) -> Response {
    let target = format!(
        "/owners/{}?message={}",
        owner_id,
        urlencoding::encode(message)
    );
    Redirect::to(&target).into_response()
}

fn new_pet_action(owner_id: i32) -> String {
    format!("/owners/{owner_id}/pets/new")
}

fn edit_pet_action(owner_id: i32, pet_id: i32) -> String {
    format!("/owners/{owner_id}/pets/{pet_id}/edit")
}

/// Owner detail page; the redirect target after a successful submission.
pub async fn owner_detail(
    Extension(svc): Extension<Arc<ClinicService>>,
    Path(owner_id): Path<i32>,
    Query(query): Query<DetailQuery>,
) -> Result<Html<String>, WebError> {
    let owner = svc.owner(owner_id).await?;
    Ok(Html(views::owner_detail(&owner, query.message.as_deref())))
}

/// Blank creation form: an empty pet bound against the resolved owner.
pub async fn show_create_form(
    Extension(svc): Extension<Arc<ClinicService>>,
    Path(owner_id): Path<i32>,
) -> Result<Html<String>, WebError> {
    let owner = svc.owner(owner_id).await?;
    let types = svc.pet_types().await?;
    Ok(Html(views::pet_form(
        &owner,
        &PetForm::default(),
        &types,
        &FieldErrors::new(),
        &new_pet_action(owner_id),
    )))
}

pub async fn submit_create_form(
    Extension(svc): Extension<Arc<ClinicService>>,
    Path(owner_id): Path<i32>,
    Form(form): Form<PetForm>,
) -> Result<Response, WebError> {
    info!(owner_id, "Pet creation submitted");

    match svc.create_pet(owner_id, form.clone().into()).await? {
        SubmitOutcome::Saved(_) => Ok(redirect_to_owner(owner_id, MSG_PET_ADDED)),
        SubmitOutcome::Invalid(errors) => {
            // Re-render with the submitted data preserved; nothing was saved.
            let owner = svc.owner(owner_id).await?;
            let types = svc.pet_types().await?;
            Ok(Html(views::pet_form(
                &owner,
                &form,
                &types,
                &errors,
                &new_pet_action(owner_id),
            ))
            .into_response())
        }
    }
}

/// Prefilled edit form for an existing pet of the owner.
pub async fn show_edit_form(
    Extension(svc): Extension<Arc<ClinicService>>,
    Path((owner_id, pet_id)): Path<(i32, i32)>,
) -> Result<Html<String>, WebError> {
    let (owner, pet) = svc.pet_for_edit(owner_id, pet_id).await?;
    let types = svc.pet_types().await?;
    Ok(Html(views::pet_form(
        &owner,
        &PetForm::from_pet(&pet),
        &types,
        &FieldErrors::new(),
        &edit_pet_action(owner_id, pet_id),
    )))
}

pub async fn submit_edit_form(
    Extension(svc): Extension<Arc<ClinicService>>,
    Path((owner_id, pet_id)): Path<(i32, i32)>,
    Form(form): Form<PetForm>,
) -> Result<Response, WebError> {
    info!(owner_id, pet_id, "Pet edit submitted");

    match svc.update_pet(owner_id, pet_id, form.clone().into()).await? {
        SubmitOutcome::Saved(_) => Ok(redirect_to_owner(owner_id, MSG_PET_EDITED)),
        SubmitOutcome::Invalid(errors) => {
            let owner = svc.owner(owner_id).await?;
            let types = svc.pet_types().await?;
            Ok(Html(views::pet_form(
                &owner,
                &form,
                &types,
                &errors,
                &edit_pet_action(owner_id, pet_id),
            ))
            .into_response())
        }
    }
}
