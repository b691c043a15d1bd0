//! Form DTOs for the pet create/edit pages.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

use crate::domain::model::{Pet, PetSubmission};

/// The pet form as the browser submits it. Empty selections and empty
/// date fields arrive as empty strings and bind to `None`.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct PetForm {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub type_id: Option<i32>,
}

impl PetForm {
    /// Prefill the form from a persisted pet (edit path).
    pub fn from_pet(pet: &Pet) -> Self {
        Self {
            name: pet.name.clone(),
            birth_date: pet.birth_date,
            type_id: pet.pet_type.as_ref().map(|t| t.id),
        }
    }
}

impl From<PetForm> for PetSubmission {
    fn from(form: PetForm) -> Self {
        Self {
            name: form.name,
            birth_date: form.birth_date,
            type_id: form.type_id,
        }
    }
}

fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let opt = Option::<String>::deserialize(de)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}
