use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Pets::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Pets::Name).string().not_null())
                    .col(ColumnDef::new(Pets::Species).string_len(16).not_null())
                    .col(ColumnDef::new(Pets::Breed).string().null())
                    .col(ColumnDef::new(Pets::Age).double().null())
                    .col(ColumnDef::new(Pets::Gender).string_len(16).null())
                    .col(ColumnDef::new(Pets::SizeHeight).double().null())
                    .col(ColumnDef::new(Pets::SizeWeight).double().null())
                    .col(ColumnDef::new(Pets::Description).string_len(1000).not_null())
                    .col(
                        ColumnDef::new(Pets::Vaccinated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Pets::SpecialNeeds)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Pets::AdoptionFee)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Pets::LocationCity).string().not_null())
                    .col(ColumnDef::new(Pets::LocationState).string().null())
                    .col(ColumnDef::new(Pets::LocationCountry).string().not_null())
                    .col(
                        ColumnDef::new(Pets::Images)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(ColumnDef::new(Pets::ListedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(Pets::Status)
                            .string_len(16)
                            .not_null()
                            .default("available"),
                    )
                    .col(
                        ColumnDef::new(Pets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Pets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Pets::Table, Pets::ListedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("pets_listed_by_idx")
                    .table(Pets::Table)
                    .col(Pets::ListedBy)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Browse listing sorts newest first.
        manager
            .create_index(
                Index::create()
                    .name("pets_created_at_idx")
                    .table(Pets::Table)
                    .col((Pets::CreatedAt, IndexOrder::Desc))
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Pets::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Pets {
    Table,
    Id,
    Name,
    Species,
    Breed,
    Age,
    Gender,
    SizeHeight,
    SizeWeight,
    Description,
    Vaccinated,
    SpecialNeeds,
    AdoptionFee,
    LocationCity,
    LocationState,
    LocationCountry,
    Images,
    ListedBy,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
