use crate::domain::model::{Owner, Pet, PetType};
use crate::infra::storage::entity::{owner, pet, pet_type};

/// Convert a pet type row to the domain model
pub fn type_to_domain(row: pet_type::Model) -> PetType {
    PetType {
        id: row.id,
        name: row.name,
    }
}

/// Convert a pet row (with its joined type, if loaded) to the domain model
pub fn pet_to_domain(row: pet::Model, kind: Option<pet_type::Model>) -> Pet {
    Pet {
        id: Some(row.id),
        name: row.name,
        birth_date: row.birth_date,
        pet_type: kind.map(type_to_domain),
    }
}

/// Assemble the owner aggregate from its row and already-mapped pets
pub fn owner_to_domain(row: owner::Model, pets: Vec<Pet>) -> Owner {
    Owner {
        id: row.id,
        first_name: row.first_name,
        last_name: row.last_name,
        pets,
    }
}
