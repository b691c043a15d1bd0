use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Owners::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Owners::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Owners::FirstName).string().not_null())
                    .col(ColumnDef::new(Owners::LastName).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Types::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Types::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Types::Name).string().not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Pets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Pets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Pets::Name).string().not_null())
                    .col(ColumnDef::new(Pets::BirthDate).date())
                    .col(ColumnDef::new(Pets::TypeId).integer().not_null())
                    .col(ColumnDef::new(Pets::OwnerId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pets_type_id")
                            .from(Pets::Table, Pets::TypeId)
                            .to(Types::Table, Types::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pets_owner_id")
                            .from(Pets::Table, Pets::OwnerId)
                            .to(Owners::Table, Owners::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Reference data and a couple of demo owners, as in the classic
        // sample data set.
        let mut seed_types = Query::insert()
            .into_table(Types::Table)
            .columns([Types::Name])
            .to_owned();
        for name in ["bird", "cat", "dog", "hamster", "lizard", "snake"] {
            seed_types.values_panic([name.into()]);
        }
        manager.exec_stmt(seed_types).await?;

        let mut seed_owners = Query::insert()
            .into_table(Owners::Table)
            .columns([Owners::FirstName, Owners::LastName])
            .to_owned();
        for (first, last) in [("George", "Franklin"), ("Betty", "Davis")] {
            seed_owners.values_panic([first.into(), last.into()]);
        }
        manager.exec_stmt(seed_owners).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Pets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Types::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Owners::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Owners {
    Table,
    Id,
    FirstName,
    LastName,
}

#[derive(DeriveIden)]
enum Types {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Pets {
    Table,
    Id,
    Name,
    BirthDate,
    TypeId,
    OwnerId,
}
