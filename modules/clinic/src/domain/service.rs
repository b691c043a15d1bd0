use std::sync::Arc;

use crate::domain::error::DomainError;
use crate::domain::model::{Owner, Pet, PetSubmission, PetType};
use crate::domain::repo::ClinicRepository;
use crate::domain::validate::{self, FieldErrors};
use chrono::Local;
use tracing::{debug, info, instrument};

/// Outcome of a form submission: either the pet was persisted, or the
/// accumulated field errors to re-render the form with.
#[derive(Debug)]
pub enum SubmitOutcome {
    Saved(Pet),
    Invalid(FieldErrors),
}

/// Domain service with the business rules for pet registration.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct ClinicService {
    repo: Arc<dyn ClinicRepository>,
}

impl ClinicService {
    pub fn new(repo: Arc<dyn ClinicRepository>) -> Self {
        Self { repo }
    }

    /// Resolve an owner or fail with `OwnerNotFound`.
    #[instrument(name = "clinic.service.owner", skip(self), fields(owner_id = %id))]
    pub async fn owner(&self, id: i32) -> Result<Owner, DomainError> {
        debug!("Resolving owner");
        self.repo
            .find_owner(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::owner_not_found(id))
    }

    /// The full pet type set for the form's selection field. An empty
    /// result is valid.
    pub async fn pet_types(&self) -> Result<Vec<PetType>, DomainError> {
        self.repo
            .pet_types()
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    /// Resolve the owner, then the pet on its collection, for the edit
    /// form. A missing pet is `PetNotFound`, distinct from the owner case.
    #[instrument(name = "clinic.service.pet_for_edit", skip(self))]
    pub async fn pet_for_edit(&self, owner_id: i32, pet_id: i32) -> Result<(Owner, Pet), DomainError> {
        let owner = self.owner(owner_id).await?;
        let pet = owner
            .pet_by_id(pet_id)
            .cloned()
            .ok_or_else(|| DomainError::pet_not_found(pet_id))?;
        Ok((owner, pet))
    }

    /// Create a pet on the owner aggregate.
    ///
    /// Reads happen before validation, validation before writes: the owner
    /// is resolved first, then field and business rules run, and only a
    /// clean submission is appended to the aggregate and saved.
    #[instrument(
        name = "clinic.service.create_pet",
        skip(self, submission),
        fields(pet_name = %submission.name)
    )]
    pub async fn create_pet(
        &self,
        owner_id: i32,
        submission: PetSubmission,
    ) -> Result<SubmitOutcome, DomainError> {
        info!("Creating new pet");

        let mut owner = self.owner(owner_id).await?;

        let mut errors = FieldErrors::new();
        validate::validate_pet(&submission, &mut errors);

        // Duplicate check runs against all of the owner's pets.
        if !submission.name.trim().is_empty() && owner.pet_by_name(&submission.name).is_some() {
            errors.reject("name", validate::DUPLICATE_NAME);
        }
        reject_future_birth_date(&submission, &mut errors);

        let pet_type = self.resolve_type(submission.type_id, &mut errors).await?;

        if !errors.is_empty() {
            debug!("Pet submission rejected by validation");
            return Ok(SubmitOutcome::Invalid(errors));
        }

        owner.add_pet(Pet {
            id: None,
            name: submission.name,
            birth_date: submission.birth_date,
            pet_type,
        });
        let saved = self
            .repo
            .save_owner(&owner)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        // The new pet is the last one of the stored aggregate.
        let pet = saved
            .pets
            .last()
            .cloned()
            .ok_or_else(|| DomainError::database("saved owner has no pets"))?;

        info!(pet_id = ?pet.id, "Successfully created pet");
        Ok(SubmitOutcome::Saved(pet))
    }

    /// Edit a persisted pet. Same rules as creation, except the
    /// duplicate-name check excludes the pet being edited itself.
    #[instrument(
        name = "clinic.service.update_pet",
        skip(self, submission),
        fields(pet_name = %submission.name)
    )]
    pub async fn update_pet(
        &self,
        owner_id: i32,
        pet_id: i32,
        submission: PetSubmission,
    ) -> Result<SubmitOutcome, DomainError> {
        info!("Updating pet");

        let owner = self.owner(owner_id).await?;

        let mut errors = FieldErrors::new();
        validate::validate_pet(&submission, &mut errors);

        // Match by name, then compare ids: only a different pet with the
        // same name is a duplicate.
        if !submission.name.trim().is_empty() {
            if let Some(existing) = owner.pet_by_name(&submission.name) {
                if existing.id != Some(pet_id) {
                    errors.reject("name", validate::DUPLICATE_NAME);
                }
            }
        }
        reject_future_birth_date(&submission, &mut errors);

        let pet_type = self.resolve_type(submission.type_id, &mut errors).await?;

        if !errors.is_empty() {
            debug!("Pet submission rejected by validation");
            return Ok(SubmitOutcome::Invalid(errors));
        }

        // Copy the submitted fields onto the persisted pet and save it.
        let mut pet = self
            .repo
            .find_pet(pet_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::pet_not_found(pet_id))?;

        pet.name = submission.name;
        pet.birth_date = submission.birth_date;
        pet.pet_type = pet_type;

        self.repo
            .save_pet(&pet)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Successfully updated pet");
        Ok(SubmitOutcome::Saved(pet))
    }

    /// Resolve the submitted type id against the lookup set. An unknown id
    /// is reported as a missing type rather than surfaced as an error page.
    async fn resolve_type(
        &self,
        type_id: Option<i32>,
        errors: &mut FieldErrors,
    ) -> Result<Option<PetType>, DomainError> {
        let Some(type_id) = type_id else {
            return Ok(None);
        };
        let found = self
            .pet_types()
            .await?
            .into_iter()
            .find(|t| t.id == type_id);
        if found.is_none() {
            errors.reject("type", validate::REQUIRED);
        }
        Ok(found)
    }
}

fn reject_future_birth_date(submission: &PetSubmission, errors: &mut FieldErrors) {
    let today = Local::now().date_naive();
    if let Some(birth_date) = submission.birth_date {
        if birth_date > today {
            errors.reject("birth_date", validate::FUTURE_BIRTH_DATE);
        }
    }
}
