use chrono::NaiveDate;

/// Reference data: a pet type is shared by many pets and never owned by one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetType {
    pub id: i32,
    pub name: String,
}

/// A pet. Transient until first saved (`id` is None), then mutated in place
/// on edit. The type is optional only while the pet is a form candidate;
/// validation requires it before anything is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pet {
    pub id: Option<i32>,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub pet_type: Option<PetType>,
}

impl Pet {
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

/// The owner aggregate: the owner row plus its pets, in insertion (id)
/// order. New pets are persisted through the aggregate; existing pets can
/// also be updated directly by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub pets: Vec<Pet>,
}

impl Owner {
    pub fn add_pet(&mut self, pet: Pet) {
        self.pets.push(pet);
    }

    pub fn pet_by_id(&self, pet_id: i32) -> Option<&Pet> {
        self.pets.iter().find(|p| p.id == Some(pet_id))
    }

    /// Find a pet by name, ASCII-case-insensitively, across all pets of
    /// the owner (persisted or not).
    pub fn pet_by_name(&self, name: &str) -> Option<&Pet> {
        self.pets.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

/// Form-bound candidate for a pet create or edit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PetSubmission {
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub type_id: Option<i32>,
}
