//! Common test utilities: a controllable clock and a seeded campus
#![allow(dead_code)]

use campus_events::config::Config;
use campus_events::contract::{College, Event, NewCollege, NewEvent, NewStudent, Student};
use campus_events::domain::{Clock, Repositories, Service};
use campus_events::infra::storage::{
    InMemoryStore, Migrator, SeaOrmAttendanceRepository, SeaOrmDirectoryRepository,
    SeaOrmFeedbackRepository, SeaOrmRegistrationRepository,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;

/// Clock the tests move by hand
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// The day before the seeded event
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
}

pub fn event_start() -> DateTime<Utc> {
    t0() + Duration::days(1)
}

pub fn event_end() -> DateTime<Utc> {
    event_start() + Duration::hours(2)
}

pub struct Campus {
    pub college: College,
    pub students: Vec<Student>,
    pub event: Event,
}

pub fn new_event(college_id: i32, title: &str, event_type: &str, capacity: i32) -> NewEvent {
    NewEvent {
        college_id,
        title: title.to_string(),
        description: None,
        event_type: event_type.to_string(),
        start_time: event_start(),
        end_time: event_end(),
        location: Some("Main Hall".to_string()),
        max_capacity: capacity,
    }
}

pub fn new_student(college_id: i32, n: usize) -> NewStudent {
    NewStudent {
        college_id,
        student_code: format!("S{n:03}"),
        name: format!("Student {n}"),
        email: format!("student{n}@campus.test"),
        phone: None,
    }
}

/// One college, `students` students and one active workshop of `capacity`
pub async fn seed(service: &Service, capacity: i32, students: usize) -> Campus {
    let college = service
        .create_college(NewCollege {
            name: "Northfield Institute".to_string(),
            location: Some("Northfield".to_string()),
            contact_email: Some("events@northfield.test".to_string()),
        })
        .await
        .expect("create college");

    let mut seeded = Vec::with_capacity(students);
    for n in 1..=students {
        seeded.push(
            service
                .create_student(new_student(college.id, n))
                .await
                .expect("create student"),
        );
    }

    let event = service
        .create_event(new_event(college.id, "Rust Workshop", "workshop", capacity))
        .await
        .expect("create event");

    Campus {
        college,
        students: seeded,
        event,
    }
}

pub struct MemoryHarness {
    pub service: Arc<Service>,
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<ManualClock>,
}

pub fn memory_harness(config: &Config) -> MemoryHarness {
    let store = Arc::new(InMemoryStore::new());
    let clock = Arc::new(ManualClock::new(t0()));
    let service = Arc::new(Service::new(
        Repositories::from_store(store.clone()),
        clock.clone(),
        config,
    ));
    MemoryHarness {
        service,
        store,
        clock,
    }
}

pub struct SqliteHarness {
    pub service: Arc<Service>,
    pub db: Arc<DatabaseConnection>,
    pub clock: Arc<ManualClock>,
}

/// Fresh in-memory SQLite database with the schema applied
pub async fn sqlite_harness(config: &Config) -> SqliteHarness {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1)
        .min_connections(1)
        .idle_timeout(std::time::Duration::from_secs(3600))
        .sqlx_logging(false);
    let db = Database::connect(opts).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    sqlite_service(db, config)
}

pub struct SqliteFileHarness {
    pub harness: SqliteHarness,
    // dropped last, removes the database file
    _dir: tempfile::TempDir,
}

/// File-backed SQLite with a pool of several connections, so writers
/// really contend on the database lock
pub async fn sqlite_file_harness(config: &Config, connections: u32) -> SqliteFileHarness {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("campus.db").display());
    let mut opts = ConnectOptions::new(url);
    opts.max_connections(connections)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(opts).await.expect("connect sqlite file");
    Migrator::up(&db, None).await.expect("run migrations");
    SqliteFileHarness {
        harness: sqlite_service(db, config),
        _dir: dir,
    }
}

fn sqlite_service(db: DatabaseConnection, config: &Config) -> SqliteHarness {
    let db = Arc::new(db);
    let clock = Arc::new(ManualClock::new(t0()));
    let repos = Repositories {
        directory: Arc::new(SeaOrmDirectoryRepository::new(db.clone())),
        registrations: Arc::new(SeaOrmRegistrationRepository::new(db.clone())),
        attendance: Arc::new(SeaOrmAttendanceRepository::new(db.clone())),
        feedback: Arc::new(SeaOrmFeedbackRepository::new(db.clone())),
    };
    let service = Arc::new(Service::new(repos, clock.clone(), config));
    SqliteHarness { service, db, clock }
}
