//! SeaORM-backed repository implementation for the domain port.
//!
//! The struct is generic over `C: ConnectionTrait`, so it can be
//! constructed with a `DatabaseConnection` or a transactional connection.

use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::domain::model::{Owner, Pet, PetType};
use crate::domain::repo::ClinicRepository;
use crate::infra::storage::entity::{owner, pet, pet_type};
use crate::infra::storage::mapper;

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmClinicRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmClinicRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    /// Pets of one owner with their types, in id (insertion) order.
    async fn pets_of_owner(&self, owner_id: i32) -> anyhow::Result<Vec<Pet>> {
        let rows = pet::Entity::find()
            .filter(pet::Column::OwnerId.eq(owner_id))
            .find_also_related(pet_type::Entity)
            .order_by_asc(pet::Column::Id)
            .all(&self.conn)
            .await
            .context("loading owner pets failed")?;
        Ok(rows
            .into_iter()
            .map(|(p, t)| mapper::pet_to_domain(p, t))
            .collect())
    }
}

#[async_trait::async_trait]
impl<C> ClinicRepository for SeaOrmClinicRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_owner(&self, id: i32) -> anyhow::Result<Option<Owner>> {
        let Some(row) = owner::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_owner failed")?
        else {
            return Ok(None);
        };
        let pets = self.pets_of_owner(id).await?;
        Ok(Some(mapper::owner_to_domain(row, pets)))
    }

    async fn find_pet(&self, id: i32) -> anyhow::Result<Option<Pet>> {
        let found = pet::Entity::find_by_id(id)
            .find_also_related(pet_type::Entity)
            .one(&self.conn)
            .await
            .context("find_pet failed")?;
        Ok(found.map(|(p, t)| mapper::pet_to_domain(p, t)))
    }

    async fn pet_types(&self) -> anyhow::Result<Vec<PetType>> {
        let rows = pet_type::Entity::find()
            .order_by_asc(pet_type::Column::Name)
            .all(&self.conn)
            .await
            .context("pet_types failed")?;
        Ok(rows.into_iter().map(mapper::type_to_domain).collect())
    }

    async fn save_owner(&self, o: &Owner) -> anyhow::Result<Owner> {
        let m = owner::ActiveModel {
            id: Set(o.id),
            first_name: Set(o.first_name.clone()),
            last_name: Set(o.last_name.clone()),
        };
        let _ = m.update(&self.conn).await.context("owner update failed")?;

        // Cascade: insert the pets that have no id yet, update the others.
        for p in &o.pets {
            let type_id = p
                .pet_type
                .as_ref()
                .map(|t| t.id)
                .context("pet has no type at save time")?;
            match p.id {
                None => {
                    let m = pet::ActiveModel {
                        id: NotSet,
                        name: Set(p.name.clone()),
                        birth_date: Set(p.birth_date),
                        type_id: Set(type_id),
                        owner_id: Set(o.id),
                    };
                    let _ = m.insert(&self.conn).await.context("pet insert failed")?;
                }
                Some(pet_id) => {
                    let m = pet::ActiveModel {
                        id: Set(pet_id),
                        name: Set(p.name.clone()),
                        birth_date: Set(p.birth_date),
                        type_id: Set(type_id),
                        owner_id: Set(o.id),
                    };
                    let _ = m.update(&self.conn).await.context("pet update failed")?;
                }
            }
        }

        // Re-read so the caller sees the assigned ids.
        let row = owner::Entity::find_by_id(o.id)
            .one(&self.conn)
            .await
            .context("owner reload failed")?
            .context("owner vanished during save")?;
        let pets = self.pets_of_owner(o.id).await?;
        Ok(mapper::owner_to_domain(row, pets))
    }

    async fn save_pet(&self, p: &Pet) -> anyhow::Result<()> {
        let pet_id = p.id.context("save_pet requires a persisted pet")?;
        let type_id = p
            .pet_type
            .as_ref()
            .map(|t| t.id)
            .context("pet has no type at save time")?;
        let m = pet::ActiveModel {
            id: Set(pet_id),
            name: Set(p.name.clone()),
            birth_date: Set(p.birth_date),
            type_id: Set(type_id),
            owner_id: NotSet, // ownership never changes on edit
        };
        let _ = m.update(&self.conn).await.context("save_pet failed")?;
        Ok(())
    }
}
