//! SeaORM entities for the clinic schema.

pub mod owner {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "owners")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub first_name: String,
        pub last_name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::pet::Entity")]
        Pet,
    }

    impl Related<super::pet::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Pet.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod pet_type {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "types")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        #[sea_orm(unique)]
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::pet::Entity")]
        Pet,
    }

    impl Related<super::pet::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Pet.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod pet {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "pets")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
        pub birth_date: Option<Date>,
        pub type_id: i32,
        pub owner_id: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::owner::Entity",
            from = "Column::OwnerId",
            to = "super::owner::Column::Id"
        )]
        Owner,
        #[sea_orm(
            belongs_to = "super::pet_type::Entity",
            from = "Column::TypeId",
            to = "super::pet_type::Column::Id"
        )]
        PetType,
    }

    impl Related<super::owner::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Owner.def()
        }
    }

    impl Related<super::pet_type::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::PetType.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}
