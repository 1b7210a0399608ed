use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240501_000001_create_inventory_batches_table::Migration),
            Box::new(m20240501_000002_create_pricing_controls_table::Migration),
            Box::new(m20240501_000003_create_discounts_table::Migration),
            Box::new(m20240501_000004_create_transaction_discounts_table::Migration),
            Box::new(m20240501_000005_create_price_override_requests_table::Migration),
            Box::new(m20240501_000006_create_audit_log_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240501_000001_create_inventory_batches_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240501_000001_create_inventory_batches_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryBatches::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryBatches::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryBatches::ProductId).uuid().not_null())
                        .col(ColumnDef::new(InventoryBatches::BranchId).uuid().not_null())
                        .col(
                            ColumnDef::new(InventoryBatches::BatchNumber)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryBatches::OriginalQuantity)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryBatches::CurrentQuantity)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryBatches::PurchasePrice)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryBatches::SellingPrice)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryBatches::ReceivedDate).date().not_null())
                        .col(ColumnDef::new(InventoryBatches::ExpiryDate).date().null())
                        .col(
                            ColumnDef::new(InventoryBatches::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(InventoryBatches::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryBatches::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_inventory_batches_product_branch")
                        .table(InventoryBatches::Table)
                        .col(InventoryBatches::ProductId)
                        .col(InventoryBatches::BranchId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryBatches::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum InventoryBatches {
        Table,
        Id,
        ProductId,
        BranchId,
        BatchNumber,
        OriginalQuantity,
        CurrentQuantity,
        PurchasePrice,
        SellingPrice,
        ReceivedDate,
        ExpiryDate,
        Active,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240501_000002_create_pricing_controls_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240501_000002_create_pricing_controls_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PricingControls::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PricingControls::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PricingControls::ProductId).uuid().not_null())
                        .col(ColumnDef::new(PricingControls::BranchId).uuid().null())
                        .col(
                            ColumnDef::new(PricingControls::DefaultSellingPrice)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PricingControls::MinSellingPrice)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PricingControls::MaxSellingPrice)
                                .decimal_len(19, 4)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PricingControls::MaxDiscountPercentage)
                                .decimal_len(5, 2)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PricingControls::MaxDiscountAmount)
                                .decimal_len(19, 4)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PricingControls::AllowManualPrice)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(PricingControls::RequiresApprovalBelowMin)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(PricingControls::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PricingControls::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_pricing_controls_product_branch")
                        .table(PricingControls::Table)
                        .col(PricingControls::ProductId)
                        .col(PricingControls::BranchId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PricingControls::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum PricingControls {
        Table,
        Id,
        ProductId,
        BranchId,
        DefaultSellingPrice,
        MinSellingPrice,
        MaxSellingPrice,
        MaxDiscountPercentage,
        MaxDiscountAmount,
        AllowManualPrice,
        RequiresApprovalBelowMin,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240501_000003_create_discounts_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240501_000003_create_discounts_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Discounts::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Discounts::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Discounts::Name).string().not_null())
                        .col(ColumnDef::new(Discounts::Scope).string_len(16).not_null())
                        .col(
                            ColumnDef::new(Discounts::DiscountType)
                                .string_len(16)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Discounts::Value).decimal_len(19, 4).not_null())
                        .col(
                            ColumnDef::new(Discounts::Priority)
                                .integer()
                                .not_null()
                                .default(100),
                        )
                        .col(
                            ColumnDef::new(Discounts::CashierCanApply)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Discounts::RequiresApproval)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Discounts::ValidFrom)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Discounts::ValidUntil)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Discounts::MinPurchaseAmount)
                                .decimal_len(19, 4)
                                .null(),
                        )
                        .col(ColumnDef::new(Discounts::ProductId).uuid().null())
                        .col(ColumnDef::new(Discounts::Category).string().null())
                        .col(ColumnDef::new(Discounts::BranchId).uuid().null())
                        .col(
                            ColumnDef::new(Discounts::IsPeriodBased)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Discounts::DaysOfWeek).string().null())
                        .col(ColumnDef::new(Discounts::StartTime).time().null())
                        .col(ColumnDef::new(Discounts::EndTime).time().null())
                        .col(
                            ColumnDef::new(Discounts::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Discounts::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Discounts::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Discounts::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Discounts {
        Table,
        Id,
        Name,
        Scope,
        DiscountType,
        Value,
        Priority,
        CashierCanApply,
        RequiresApproval,
        ValidFrom,
        ValidUntil,
        MinPurchaseAmount,
        ProductId,
        Category,
        BranchId,
        IsPeriodBased,
        DaysOfWeek,
        StartTime,
        EndTime,
        Active,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240501_000004_create_transaction_discounts_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240501_000004_create_transaction_discounts_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(TransactionDiscounts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TransactionDiscounts::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TransactionDiscounts::TransactionId)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(TransactionDiscounts::DiscountId).uuid().null())
                        .col(
                            ColumnDef::new(TransactionDiscounts::AppliedTo)
                                .string_len(8)
                                .not_null(),
                        )
                        .col(ColumnDef::new(TransactionDiscounts::ProductId).uuid().null())
                        .col(
                            ColumnDef::new(TransactionDiscounts::ItemIndex)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(TransactionDiscounts::DiscountType)
                                .string_len(16)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TransactionDiscounts::DiscountValue)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TransactionDiscounts::DiscountAmount)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TransactionDiscounts::OriginalAmount)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TransactionDiscounts::FinalAmount)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TransactionDiscounts::RequiredApproval)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(TransactionDiscounts::ApprovedBy)
                                .uuid()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(TransactionDiscounts::AppliedBy)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(TransactionDiscounts::Reason).string().null())
                        .col(
                            ColumnDef::new(TransactionDiscounts::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_transaction_discounts_transaction")
                        .table(TransactionDiscounts::Table)
                        .col(TransactionDiscounts::TransactionId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(TransactionDiscounts::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum TransactionDiscounts {
        Table,
        Id,
        TransactionId,
        DiscountId,
        AppliedTo,
        ProductId,
        ItemIndex,
        DiscountType,
        DiscountValue,
        DiscountAmount,
        OriginalAmount,
        FinalAmount,
        RequiredApproval,
        ApprovedBy,
        AppliedBy,
        Reason,
        CreatedAt,
    }
}

mod m20240501_000005_create_price_override_requests_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240501_000005_create_price_override_requests_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PriceOverrideRequests::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PriceOverrideRequests::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PriceOverrideRequests::ProductId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PriceOverrideRequests::BatchId).uuid().null())
                        .col(
                            ColumnDef::new(PriceOverrideRequests::OriginalPrice)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PriceOverrideRequests::RequestedPrice)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PriceOverrideRequests::MinAllowedPrice)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PriceOverrideRequests::Quantity)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(PriceOverrideRequests::Reason).string().not_null())
                        .col(
                            ColumnDef::new(PriceOverrideRequests::BranchId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PriceOverrideRequests::RequestedBy)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PriceOverrideRequests::Status)
                                .string_len(16)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PriceOverrideRequests::ExpiresAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PriceOverrideRequests::ApprovedBy)
                                .uuid()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PriceOverrideRequests::DecidedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PriceOverrideRequests::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PriceOverrideRequests::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_price_override_requests_status")
                        .table(PriceOverrideRequests::Table)
                        .col(PriceOverrideRequests::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(
                    Table::drop()
                        .table(PriceOverrideRequests::Table)
                        .to_owned(),
                )
                .await
        }
    }

    #[derive(Iden)]
    enum PriceOverrideRequests {
        Table,
        Id,
        ProductId,
        BatchId,
        OriginalPrice,
        RequestedPrice,
        MinAllowedPrice,
        Quantity,
        Reason,
        BranchId,
        RequestedBy,
        Status,
        ExpiresAt,
        ApprovedBy,
        DecidedAt,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240501_000006_create_audit_log_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240501_000006_create_audit_log_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(AuditLog::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(AuditLog::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(AuditLog::Action).string_len(32).not_null())
                        .col(ColumnDef::new(AuditLog::EntityType).string().not_null())
                        .col(ColumnDef::new(AuditLog::EntityId).string().not_null())
                        .col(ColumnDef::new(AuditLog::ActorId).uuid().null())
                        .col(ColumnDef::new(AuditLog::OldValue).json_binary().null())
                        .col(ColumnDef::new(AuditLog::NewValue).json_binary().null())
                        .col(
                            ColumnDef::new(AuditLog::AmountImpact)
                                .decimal_len(19, 4)
                                .null(),
                        )
                        .col(ColumnDef::new(AuditLog::Details).string().null())
                        .col(
                            ColumnDef::new(AuditLog::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_audit_log_entity")
                        .table(AuditLog::Table)
                        .col(AuditLog::EntityType)
                        .col(AuditLog::EntityId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(AuditLog::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum AuditLog {
        Table,
        Id,
        Action,
        EntityType,
        EntityId,
        ActorId,
        OldValue,
        NewValue,
        AmountImpact,
        Details,
        CreatedAt,
    }
}
