//! SeaORM entities for database tables
//!
//! Status columns are plain strings; the mapper parses them into the closed
//! contract enums.

/// Colleges table
pub mod college {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "colleges")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
        pub location: Option<String>,
        pub contact_email: Option<String>,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::student::Entity")]
        Students,
        #[sea_orm(has_many = "super::event::Entity")]
        Events,
    }

    impl Related<super::student::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Students.def()
        }
    }

    impl Related<super::event::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Events.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Students table, unique on `(college_id, student_code)`
pub mod student {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "students")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub college_id: i32,
        pub student_code: String,
        pub name: String,
        pub email: String,
        pub phone: Option<String>,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::college::Entity",
            from = "Column::CollegeId",
            to = "super::college::Column::Id",
            on_delete = "Cascade"
        )]
        College,
    }

    impl Related<super::college::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::College.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Events table; `current_registrations` is the capacity counter
pub mod event {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "events")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub college_id: i32,
        pub title: String,
        pub description: Option<String>,
        pub event_type: String,
        pub start_time: DateTimeUtc,
        pub end_time: DateTimeUtc,
        pub location: Option<String>,
        pub max_capacity: i32,
        pub current_registrations: i32,
        /// `active`, `completed` or `cancelled`
        pub status: String,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::college::Entity",
            from = "Column::CollegeId",
            to = "super::college::Column::Id",
            on_delete = "Cascade"
        )]
        College,
        #[sea_orm(has_many = "super::registration::Entity")]
        Registrations,
    }

    impl Related<super::college::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::College.def()
        }
    }

    impl Related<super::registration::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Registrations.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Registrations table, unique on `(student_id, event_id)`
pub mod registration {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "registrations")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub student_id: i32,
        pub event_id: i32,
        pub registered_at: DateTimeUtc,
        /// `registered` or `cancelled`
        pub status: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::student::Entity",
            from = "Column::StudentId",
            to = "super::student::Column::Id",
            on_delete = "Cascade"
        )]
        Student,
        #[sea_orm(
            belongs_to = "super::event::Entity",
            from = "Column::EventId",
            to = "super::event::Column::Id",
            on_delete = "Cascade"
        )]
        Event,
    }

    impl Related<super::student::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Student.def()
        }
    }

    impl Related<super::event::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Event.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Attendance table, at most one row per registration
pub mod attendance {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "attendance")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        #[sea_orm(unique)]
        pub registration_id: i32,
        pub check_in_time: Option<DateTimeUtc>,
        pub check_out_time: Option<DateTimeUtc>,
        /// `absent`, `present` or `late`
        pub status: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::registration::Entity",
            from = "Column::RegistrationId",
            to = "super::registration::Column::Id",
            on_delete = "Cascade"
        )]
        Registration,
    }

    impl Related<super::registration::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Registration.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Feedback table, at most one row per registration
pub mod feedback {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "feedback")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        #[sea_orm(unique)]
        pub registration_id: i32,
        pub rating: i32,
        pub comment: Option<String>,
        pub submitted_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::registration::Entity",
            from = "Column::RegistrationId",
            to = "super::registration::Column::Id",
            on_delete = "Cascade"
        )]
        Registration,
    }

    impl Related<super::registration::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Registration.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}
