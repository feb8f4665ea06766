//! Database migrations for the campus events module
//!
//! The unique indexes and check constraints here are the last line of the
//! lifecycle invariants: capacity bounds, one registration per student and
//! event, one attendance and one feedback row per registration.

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_colleges::Migration),
            Box::new(m20250301_000002_create_students::Migration),
            Box::new(m20250301_000003_create_events::Migration),
            Box::new(m20250301_000004_create_registrations::Migration),
            Box::new(m20250301_000005_create_attendance::Migration),
            Box::new(m20250301_000006_create_feedback::Migration),
        ]
    }
}

#[derive(DeriveIden)]
enum Colleges {
    Table,
    Id,
    Name,
    Location,
    ContactEmail,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Students {
    Table,
    Id,
    CollegeId,
    StudentCode,
    Name,
    Email,
    Phone,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
    CollegeId,
    Title,
    Description,
    EventType,
    StartTime,
    EndTime,
    Location,
    MaxCapacity,
    CurrentRegistrations,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Registrations {
    Table,
    Id,
    StudentId,
    EventId,
    RegisteredAt,
    Status,
}

#[derive(DeriveIden)]
enum Attendance {
    Table,
    Id,
    RegistrationId,
    CheckInTime,
    CheckOutTime,
    Status,
}

#[derive(DeriveIden)]
enum Feedback {
    Table,
    Id,
    RegistrationId,
    Rating,
    Comment,
    SubmittedAt,
}

fn id_column<T: IntoIden>(iden: T) -> ColumnDef {
    ColumnDef::new(iden)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

mod m20250301_000001_create_colleges {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_colleges"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Colleges::Table)
                        .if_not_exists()
                        .col(id_column(Colleges::Id))
                        .col(ColumnDef::new(Colleges::Name).string().not_null())
                        .col(ColumnDef::new(Colleges::Location).string())
                        .col(ColumnDef::new(Colleges::ContactEmail).string())
                        .col(
                            ColumnDef::new(Colleges::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Colleges::Table).to_owned())
                .await
        }
    }
}

mod m20250301_000002_create_students {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_students"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Students::Table)
                        .if_not_exists()
                        .col(id_column(Students::Id))
                        .col(ColumnDef::new(Students::CollegeId).integer().not_null())
                        .col(ColumnDef::new(Students::StudentCode).string().not_null())
                        .col(ColumnDef::new(Students::Name).string().not_null())
                        .col(ColumnDef::new(Students::Email).string().not_null())
                        .col(ColumnDef::new(Students::Phone).string())
                        .col(
                            ColumnDef::new(Students::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_students_college")
                                .from(Students::Table, Students::CollegeId)
                                .to(Colleges::Table, Colleges::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .check(Expr::col(Students::Email).like("%@%"))
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("uq_students_college_code")
                        .table(Students::Table)
                        .col(Students::CollegeId)
                        .col(Students::StudentCode)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Students::Table).to_owned())
                .await
        }
    }
}

mod m20250301_000003_create_events {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000003_create_events"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Events::Table)
                        .if_not_exists()
                        .col(id_column(Events::Id))
                        .col(ColumnDef::new(Events::CollegeId).integer().not_null())
                        .col(ColumnDef::new(Events::Title).string().not_null())
                        .col(ColumnDef::new(Events::Description).text())
                        .col(ColumnDef::new(Events::EventType).string().not_null())
                        .col(
                            ColumnDef::new(Events::StartTime)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Events::EndTime)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Events::Location).string())
                        .col(ColumnDef::new(Events::MaxCapacity).integer().not_null())
                        .col(
                            ColumnDef::new(Events::CurrentRegistrations)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Events::Status)
                                .string()
                                .not_null()
                                .default("active"),
                        )
                        .col(
                            ColumnDef::new(Events::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_events_college")
                                .from(Events::Table, Events::CollegeId)
                                .to(Colleges::Table, Colleges::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .check(Expr::col(Events::EndTime).gt(Expr::col(Events::StartTime)))
                        .check(Expr::col(Events::MaxCapacity).gt(0))
                        .check(
                            Expr::col(Events::CurrentRegistrations)
                                .gte(0)
                                .and(
                                    Expr::col(Events::CurrentRegistrations)
                                        .lte(Expr::col(Events::MaxCapacity)),
                                ),
                        )
                        .check(Expr::col(Events::Status).is_in(["active", "completed", "cancelled"]))
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_events_college")
                        .table(Events::Table)
                        .col(Events::CollegeId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Events::Table).to_owned())
                .await
        }
    }
}

mod m20250301_000004_create_registrations {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000004_create_registrations"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Registrations::Table)
                        .if_not_exists()
                        .col(id_column(Registrations::Id))
                        .col(ColumnDef::new(Registrations::StudentId).integer().not_null())
                        .col(ColumnDef::new(Registrations::EventId).integer().not_null())
                        .col(
                            ColumnDef::new(Registrations::RegisteredAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Registrations::Status)
                                .string()
                                .not_null()
                                .default("registered"),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_registrations_student")
                                .from(Registrations::Table, Registrations::StudentId)
                                .to(Students::Table, Students::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_registrations_event")
                                .from(Registrations::Table, Registrations::EventId)
                                .to(Events::Table, Events::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .check(Expr::col(Registrations::Status).is_in(["registered", "cancelled"]))
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("uq_registrations_student_event")
                        .table(Registrations::Table)
                        .col(Registrations::StudentId)
                        .col(Registrations::EventId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_registrations_event")
                        .table(Registrations::Table)
                        .col(Registrations::EventId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Registrations::Table).to_owned())
                .await
        }
    }
}

mod m20250301_000005_create_attendance {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000005_create_attendance"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Attendance::Table)
                        .if_not_exists()
                        .col(id_column(Attendance::Id))
                        .col(
                            ColumnDef::new(Attendance::RegistrationId)
                                .integer()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Attendance::CheckInTime).timestamp_with_time_zone())
                        .col(ColumnDef::new(Attendance::CheckOutTime).timestamp_with_time_zone())
                        .col(
                            ColumnDef::new(Attendance::Status)
                                .string()
                                .not_null()
                                .default("absent"),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_attendance_registration")
                                .from(Attendance::Table, Attendance::RegistrationId)
                                .to(Registrations::Table, Registrations::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .check(Expr::col(Attendance::Status).is_in(["absent", "present", "late"]))
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Attendance::Table).to_owned())
                .await
        }
    }
}

mod m20250301_000006_create_feedback {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000006_create_feedback"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Feedback::Table)
                        .if_not_exists()
                        .col(id_column(Feedback::Id))
                        .col(
                            ColumnDef::new(Feedback::RegistrationId)
                                .integer()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Feedback::Rating).integer().not_null())
                        .col(ColumnDef::new(Feedback::Comment).text())
                        .col(
                            ColumnDef::new(Feedback::SubmittedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_feedback_registration")
                                .from(Feedback::Table, Feedback::RegistrationId)
                                .to(Registrations::Table, Registrations::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .check(Expr::col(Feedback::Rating).between(1, 5))
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Feedback::Table).to_owned())
                .await
        }
    }
}
