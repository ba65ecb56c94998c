use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Projects {
    Table,
    UserId,
    Status,
    Position,
}

#[derive(DeriveIden)]
enum CalendarEvents {
    Table,
    UserId,
    Start,
}

#[derive(DeriveIden)]
enum Invoices {
    Table,
    UserId,
    ProjectId,
}

#[derive(DeriveIden)]
enum PaymentMethods {
    Table,
    UserId,
}

#[derive(DeriveIden)]
enum Meetings {
    Table,
    UserId,
    Date,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Board columns are read per owner, grouped by status, ordered by position
        manager
            .create_index(
                Index::create()
                    .name("idx_projects_user_status_position")
                    .table(Projects::Table)
                    .col(Projects::UserId)
                    .col(Projects::Status)
                    .col(Projects::Position)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_calendar_events_user_start")
                    .table(CalendarEvents::Table)
                    .col(CalendarEvents::UserId)
                    .col(CalendarEvents::Start)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_invoices_user_id")
                    .table(Invoices::Table)
                    .col(Invoices::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_invoices_project_id")
                    .table(Invoices::Table)
                    .col(Invoices::ProjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payment_methods_user_id")
                    .table(PaymentMethods::Table)
                    .col(PaymentMethods::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_meetings_user_date")
                    .table(Meetings::Table)
                    .col(Meetings::UserId)
                    .col(Meetings::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_projects_user_status_position",
            "idx_calendar_events_user_start",
            "idx_invoices_user_id",
            "idx_invoices_project_id",
            "idx_payment_methods_user_id",
            "idx_meetings_user_date",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}
