use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_transport_records_table::Migration)]
    }
}

mod m20240101_000001_create_transport_records_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_transport_records_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Aligned with entities::transport_record Model
            manager
                .create_table(
                    Table::create()
                        .table(TransportRecords::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TransportRecords::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TransportRecords::Date)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TransportRecords::VehicleNo)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(TransportRecords::DriverName).string().null())
                        .col(
                            ColumnDef::new(TransportRecords::DriverMobile)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(TransportRecords::Place).string().null())
                        .col(
                            ColumnDef::new(TransportRecords::TransportName)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(TransportRecords::RentAmount)
                                .double()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TransportRecords::AdvanceAmount)
                                .double()
                                .not_null()
                                .default(0.0),
                        )
                        .col(
                            ColumnDef::new(TransportRecords::AdvanceDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TransportRecords::AdvanceType)
                                .string_len(16)
                                .not_null()
                                .default("cash"),
                        )
                        .col(
                            ColumnDef::new(TransportRecords::BalanceAmount)
                                .double()
                                .not_null()
                                .default(0.0),
                        )
                        .col(
                            ColumnDef::new(TransportRecords::BalanceStatus)
                                .string_len(16)
                                .not_null()
                                .default("UNPAID"),
                        )
                        .col(
                            ColumnDef::new(TransportRecords::BalanceDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(TransportRecords::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TransportRecords::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            // List endpoint sorts by date
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_transport_records_date")
                        .table(TransportRecords::Table)
                        .col(TransportRecords::Date)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(TransportRecords::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum TransportRecords {
        Table,
        Id,
        Date,
        VehicleNo,
        DriverName,
        DriverMobile,
        Place,
        TransportName,
        RentAmount,
        AdvanceAmount,
        AdvanceDate,
        AdvanceType,
        BalanceAmount,
        BalanceStatus,
        BalanceDate,
        CreatedAt,
        UpdatedAt,
    }
}
