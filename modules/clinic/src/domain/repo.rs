use crate::domain::model::{Owner, Pet, PetType};
use async_trait::async_trait;

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait ClinicRepository: Send + Sync {
    /// Load an owner with its pets (id order) and their resolved types.
    async fn find_owner(&self, id: i32) -> anyhow::Result<Option<Owner>>;
    /// Load a single pet by id, independent of its owner.
    async fn find_pet(&self, id: i32) -> anyhow::Result<Option<Pet>>;
    /// The full pet type lookup set, in name order.
    async fn pet_types(&self) -> anyhow::Result<Vec<PetType>>;
    /// Persist the aggregate: owner fields plus its pets. Pets without an
    /// id are inserted, pets with one are updated. Returns the stored
    /// aggregate with assigned ids.
    async fn save_owner(&self, owner: &Owner) -> anyhow::Result<Owner>;
    /// Update a persisted pet's name/birth date/type by primary key.
    async fn save_pet(&self, pet: &Pet) -> anyhow::Result<()>;
}
