//! Reporting aggregator
//!
//! Statistics are derived on demand from a [`Snapshot`] of lifecycle rows and
//! never stored. All functions over a snapshot are pure.

use super::repository::{
    AttendanceRepository, DirectoryRepository, FeedbackRepository, RegistrationRepository,
};
use super::service::map_store_error;
use crate::contract::{
    Attendance, AttendanceStats, AttendanceStatus, CampusError, College, CollegePerformance, Event,
    EventPopularity, EventReport, EventStatus, EventTypeStats, Feedback, FeedbackStats, Overview,
    Registration, RegistrationStats, ReportFilter, Student, StudentRanking,
};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::instrument;

/// Popular events listed when the caller gives no limit
pub const DEFAULT_POPULAR_EVENTS: usize = 10;

/// Lifecycle rows a report is computed from
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub colleges: Vec<College>,
    pub students: Vec<Student>,
    pub events: Vec<Event>,
    pub registrations: Vec<Registration>,
    pub attendance: Vec<Attendance>,
    pub feedback: Vec<Feedback>,
}

impl Snapshot {
    fn attendance_by_registration(&self) -> HashMap<i32, &Attendance> {
        self.attendance
            .iter()
            .map(|a| (a.registration_id, a))
            .collect()
    }

    fn selected_events<'a>(&'a self, filter: &'a ReportFilter) -> impl Iterator<Item = &'a Event> {
        self.events.iter().filter(move |e| matches_filter(filter, e))
    }
}

pub fn matches_filter(filter: &ReportFilter, event: &Event) -> bool {
    filter.college_id.map_or(true, |id| event.college_id == id)
        && filter.event_id.map_or(true, |id| event.id == id)
        && filter
            .event_type
            .as_deref()
            .map_or(true, |t| event.event_type == t)
        && filter.start_date.map_or(true, |from| event.start_time >= from)
        && filter.end_date.map_or(true, |to| event.start_time <= to)
}

/// `part / whole * 100` rounded to 2 decimals; `0` when `whole` is zero
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round2(part as f64 * 100.0 / whole as f64)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Ordered by event id
pub fn registration_stats(snapshot: &Snapshot, filter: &ReportFilter) -> Vec<RegistrationStats> {
    let mut totals: HashMap<i32, usize> = HashMap::new();
    for r in &snapshot.registrations {
        *totals.entry(r.event_id).or_default() += 1;
    }

    let mut stats: Vec<RegistrationStats> = snapshot
        .selected_events(filter)
        .map(|e| RegistrationStats {
            event_id: e.id,
            event_title: e.title.clone(),
            event_type: e.event_type.clone(),
            start_time: e.start_time,
            max_capacity: e.max_capacity,
            current_registrations: e.current_registrations,
            total_registrations: totals.get(&e.id).copied().unwrap_or(0),
            registration_percentage: percentage(
                usize::try_from(e.current_registrations).unwrap_or(0),
                usize::try_from(e.max_capacity).unwrap_or(0),
            ),
        })
        .collect();
    stats.sort_by_key(|s| s.event_id);
    stats
}

/// Ordered by attendance percentage descending, then event id
pub fn attendance_stats(snapshot: &Snapshot, filter: &ReportFilter) -> Vec<AttendanceStats> {
    let attendance = snapshot.attendance_by_registration();

    let mut stats: Vec<AttendanceStats> = snapshot
        .selected_events(filter)
        .map(|e| {
            let mut active = 0;
            let mut present = 0;
            let mut late = 0;
            for r in snapshot
                .registrations
                .iter()
                .filter(|r| r.event_id == e.id && r.is_active())
            {
                active += 1;
                match attendance.get(&r.id).map(|a| a.status) {
                    Some(AttendanceStatus::Present) => present += 1,
                    Some(AttendanceStatus::Late) => late += 1,
                    Some(AttendanceStatus::Absent) | None => {}
                }
            }
            AttendanceStats {
                event_id: e.id,
                event_title: e.title.clone(),
                event_type: e.event_type.clone(),
                start_time: e.start_time,
                active_registrations: active,
                present_count: present,
                late_count: late,
                absent_count: active - present - late,
                attendance_percentage: percentage(present + late, active),
            }
        })
        .collect();

    stats.sort_by(|a, b| {
        b.attendance_percentage
            .partial_cmp(&a.attendance_percentage)
            .unwrap_or(Ordering::Equal)
            .then(a.event_id.cmp(&b.event_id))
    });
    stats
}

/// Ordered by average rating descending, events without feedback last
pub fn feedback_stats(snapshot: &Snapshot, filter: &ReportFilter) -> Vec<FeedbackStats> {
    let event_of: HashMap<i32, i32> = snapshot
        .registrations
        .iter()
        .map(|r| (r.id, r.event_id))
        .collect();

    let mut ratings: HashMap<i32, Vec<i32>> = HashMap::new();
    for f in &snapshot.feedback {
        if let Some(event_id) = event_of.get(&f.registration_id) {
            ratings.entry(*event_id).or_default().push(f.rating);
        }
    }

    let mut stats: Vec<FeedbackStats> = snapshot
        .selected_events(filter)
        .map(|e| {
            let event_ratings = ratings.get(&e.id).map(Vec::as_slice).unwrap_or_default();
            let mut distribution = [0usize; 5];
            for rating in event_ratings {
                if let Some(slot) = usize::try_from(rating - 1)
                    .ok()
                    .and_then(|i| distribution.get_mut(i))
                {
                    *slot += 1;
                }
            }
            let average_rating = (!event_ratings.is_empty()).then(|| {
                let sum: i64 = event_ratings.iter().map(|r| i64::from(*r)).sum();
                round2(sum as f64 / event_ratings.len() as f64)
            });
            FeedbackStats {
                event_id: e.id,
                event_title: e.title.clone(),
                event_type: e.event_type.clone(),
                start_time: e.start_time,
                feedback_count: event_ratings.len(),
                average_rating,
                rating_distribution: distribution,
            }
        })
        .collect();

    stats.sort_by(|a, b| match (a.average_rating, b.average_rating) {
        (Some(x), Some(y)) => y
            .partial_cmp(&x)
            .unwrap_or(Ordering::Equal)
            .then(a.event_id.cmp(&b.event_id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.event_id.cmp(&b.event_id),
    });
    stats
}

/// Most engaged students.
///
/// Ranked by attended count, then attendance rate, then student id. Cancelled
/// registrations count towards the total; students with none are left out.
pub fn top_students(snapshot: &Snapshot, college_id: Option<i32>, limit: usize) -> Vec<StudentRanking> {
    let attendance = snapshot.attendance_by_registration();

    let mut per_student: HashMap<i32, (usize, usize)> = HashMap::new();
    for r in &snapshot.registrations {
        let entry = per_student.entry(r.student_id).or_default();
        entry.0 += 1;
        if attendance.get(&r.id).is_some_and(|a| a.status.is_attended()) {
            entry.1 += 1;
        }
    }

    let mut ranking: Vec<StudentRanking> = snapshot
        .students
        .iter()
        .filter(|s| college_id.map_or(true, |id| s.college_id == id))
        .filter_map(|s| {
            let (total, attended) = per_student.get(&s.id).copied()?;
            Some(StudentRanking {
                student_id: s.id,
                college_id: s.college_id,
                student_code: s.student_code.clone(),
                name: s.name.clone(),
                total_registrations: total,
                events_attended: attended,
                attendance_rate: percentage(attended, total),
            })
        })
        .collect();

    ranking.sort_by(|a, b| {
        b.events_attended
            .cmp(&a.events_attended)
            .then(
                b.attendance_rate
                    .partial_cmp(&a.attendance_rate)
                    .unwrap_or(Ordering::Equal),
            )
            .then(a.student_id.cmp(&b.student_id))
    });
    ranking.truncate(limit);
    ranking
}

fn capacity_share(event: &Event) -> f64 {
    percentage(
        usize::try_from(event.current_registrations).unwrap_or(0),
        usize::try_from(event.max_capacity).unwrap_or(0),
    )
}

/// Popularity ranking and per-type totals over active events.
///
/// Popularity is ordered by all registration rows, then live registrations,
/// then event id. Types are ordered by live registrations, then name.
pub fn event_report(snapshot: &Snapshot, filter: &ReportFilter, limit: usize) -> EventReport {
    let mut totals: HashMap<i32, usize> = HashMap::new();
    for r in &snapshot.registrations {
        *totals.entry(r.event_id).or_default() += 1;
    }

    let active: Vec<&Event> = snapshot
        .selected_events(filter)
        .filter(|e| e.status == EventStatus::Active)
        .collect();

    let mut popularity: Vec<EventPopularity> = active
        .iter()
        .map(|e| EventPopularity {
            event_id: e.id,
            event_title: e.title.clone(),
            event_type: e.event_type.clone(),
            start_time: e.start_time,
            max_capacity: e.max_capacity,
            current_registrations: e.current_registrations,
            total_registrations: totals.get(&e.id).copied().unwrap_or(0),
            registration_percentage: capacity_share(e),
        })
        .collect();
    popularity.sort_by(|a, b| {
        b.total_registrations
            .cmp(&a.total_registrations)
            .then(b.current_registrations.cmp(&a.current_registrations))
            .then(a.event_id.cmp(&b.event_id))
    });
    popularity.truncate(limit);

    let mut by_type: BTreeMap<&str, Vec<&Event>> = BTreeMap::new();
    for e in &active {
        by_type.entry(e.event_type.as_str()).or_default().push(*e);
    }
    let mut type_breakdown: Vec<EventTypeStats> = by_type
        .into_iter()
        .map(|(event_type, events)| {
            let count = events.len() as f64;
            let registrations: i64 = events
                .iter()
                .map(|e| i64::from(e.current_registrations))
                .sum();
            let share_sum: f64 = events
                .iter()
                .map(|e| f64::from(e.current_registrations) * 100.0 / f64::from(e.max_capacity.max(1)))
                .sum();
            EventTypeStats {
                event_type: event_type.to_string(),
                total_events: events.len(),
                total_registrations: registrations,
                average_registrations: round2(registrations as f64 / count),
                average_registration_percentage: round2(share_sum / count),
            }
        })
        .collect();
    // BTreeMap already yields names in order; the stable sort keeps it for ties
    type_breakdown.sort_by(|a, b| b.total_registrations.cmp(&a.total_registrations));

    EventReport {
        popularity,
        type_breakdown,
    }
}

/// Totals for one college; `None` when the college is not in the snapshot
pub fn college_performance(snapshot: &Snapshot, college_id: i32) -> Option<CollegePerformance> {
    let college = snapshot.colleges.iter().find(|c| c.id == college_id)?;

    let events: HashSet<i32> = snapshot
        .events
        .iter()
        .filter(|e| e.college_id == college_id)
        .map(|e| e.id)
        .collect();
    let registrations: Vec<&Registration> = snapshot
        .registrations
        .iter()
        .filter(|r| events.contains(&r.event_id))
        .collect();
    let active: Vec<&Registration> = registrations.iter().copied().filter(|r| r.is_active()).collect();

    let attendance = snapshot.attendance_by_registration();
    let (mut present, mut late) = (0, 0);
    for r in &active {
        match attendance.get(&r.id).map(|a| a.status) {
            Some(AttendanceStatus::Present) => present += 1,
            Some(AttendanceStatus::Late) => late += 1,
            _ => {}
        }
    }

    let registration_ids: HashSet<i32> = registrations.iter().map(|r| r.id).collect();
    let ratings: Vec<i32> = snapshot
        .feedback
        .iter()
        .filter(|f| registration_ids.contains(&f.registration_id))
        .map(|f| f.rating)
        .collect();
    let average_rating = (!ratings.is_empty()).then(|| {
        let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
        round2(sum as f64 / ratings.len() as f64)
    });

    let average_registrations_per_event = if events.is_empty() {
        0.0
    } else {
        round2(active.len() as f64 / events.len() as f64)
    };

    Some(CollegePerformance {
        college_id,
        college_name: college.name.clone(),
        total_students: snapshot
            .students
            .iter()
            .filter(|s| s.college_id == college_id)
            .count(),
        total_events: events.len(),
        total_registrations: i64::try_from(active.len()).unwrap_or(i64::MAX),
        average_registrations_per_event,
        present_count: present,
        late_count: late,
        attendance_rate: percentage(present + late, active.len()),
        feedback_count: ratings.len(),
        average_rating,
    })
}

pub fn overview(snapshot: &Snapshot) -> Overview {
    let active_registrations = snapshot
        .registrations
        .iter()
        .filter(|r| r.is_active())
        .count();
    let total_events = snapshot.events.len();
    let average = if total_events == 0 {
        0.0
    } else {
        round2(active_registrations as f64 / total_events as f64)
    };

    Overview {
        total_colleges: snapshot.colleges.len(),
        total_students: snapshot.students.len(),
        total_events,
        active_events: snapshot
            .events
            .iter()
            .filter(|e| e.status == EventStatus::Active)
            .count(),
        total_registrations: i64::try_from(active_registrations).unwrap_or(i64::MAX),
        average_registrations_per_event: average,
    }
}

/// Loads snapshots from the repositories and applies the report functions
pub struct Reporter {
    directory: Arc<dyn DirectoryRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    attendance: Arc<dyn AttendanceRepository>,
    feedback: Arc<dyn FeedbackRepository>,
    default_limit: usize,
    max_limit: usize,
}

impl Reporter {
    pub fn new(
        directory: Arc<dyn DirectoryRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        attendance: Arc<dyn AttendanceRepository>,
        feedback: Arc<dyn FeedbackRepository>,
        default_limit: usize,
        max_limit: usize,
    ) -> Self {
        Self {
            directory,
            registrations,
            attendance,
            feedback,
            default_limit,
            max_limit,
        }
    }

    pub async fn snapshot(&self) -> Result<Snapshot, CampusError> {
        let (colleges, students, events, registrations, attendance, feedback) = tokio::try_join!(
            self.directory.list_colleges(),
            self.directory.list_students(),
            self.directory.list_events(),
            self.registrations.list_all(),
            self.attendance.list_all(),
            self.feedback.list_all(),
        )
        .map_err(map_store_error)?;

        Ok(Snapshot {
            colleges,
            students,
            events,
            registrations,
            attendance,
            feedback,
        })
    }

    #[instrument(name = "campus_events.reporting.registrations", skip(self))]
    pub async fn registrations(&self, filter: ReportFilter) -> Result<Vec<RegistrationStats>, CampusError> {
        Ok(registration_stats(&self.snapshot().await?, &filter))
    }

    #[instrument(name = "campus_events.reporting.attendance", skip(self))]
    pub async fn attendance(&self, filter: ReportFilter) -> Result<Vec<AttendanceStats>, CampusError> {
        Ok(attendance_stats(&self.snapshot().await?, &filter))
    }

    #[instrument(name = "campus_events.reporting.feedback", skip(self))]
    pub async fn feedback(&self, filter: ReportFilter) -> Result<Vec<FeedbackStats>, CampusError> {
        Ok(feedback_stats(&self.snapshot().await?, &filter))
    }

    #[instrument(name = "campus_events.reporting.top_students", skip(self))]
    pub async fn top_students(
        &self,
        college_id: Option<i32>,
        limit: Option<usize>,
    ) -> Result<Vec<StudentRanking>, CampusError> {
        let limit = self.effective_limit(limit)?;
        Ok(top_students(&self.snapshot().await?, college_id, limit))
    }

    #[instrument(name = "campus_events.reporting.overview", skip(self))]
    pub async fn overview(&self) -> Result<Overview, CampusError> {
        Ok(overview(&self.snapshot().await?))
    }

    #[instrument(name = "campus_events.reporting.events", skip(self))]
    pub async fn events(
        &self,
        filter: ReportFilter,
        limit: Option<usize>,
    ) -> Result<EventReport, CampusError> {
        let limit = self.bounded_limit(limit, DEFAULT_POPULAR_EVENTS)?;
        Ok(event_report(&self.snapshot().await?, &filter, limit))
    }

    #[instrument(name = "campus_events.reporting.college", skip(self))]
    pub async fn college(&self, college_id: i32) -> Result<CollegePerformance, CampusError> {
        college_performance(&self.snapshot().await?, college_id)
            .ok_or(CampusError::CollegeNotFound { id: college_id })
    }

    fn effective_limit(&self, requested: Option<usize>) -> Result<usize, CampusError> {
        self.bounded_limit(requested, self.default_limit)
    }

    fn bounded_limit(&self, requested: Option<usize>, default: usize) -> Result<usize, CampusError> {
        match requested {
            None => Ok(default.min(self.max_limit)),
            Some(0) => Err(CampusError::validation("limit must be at least 1")),
            Some(n) => Ok(n.min(self.max_limit)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::RegistrationStatus;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    fn event(id: i32, college_id: i32, max_capacity: i32, current: i32) -> Event {
        Event {
            id,
            college_id,
            title: format!("Event {id}"),
            description: None,
            event_type: "workshop".into(),
            start_time: t0() + Duration::days(i64::from(id)),
            end_time: t0() + Duration::days(i64::from(id)) + Duration::hours(2),
            location: None,
            max_capacity,
            current_registrations: current,
            status: EventStatus::Active,
            created_at: t0(),
        }
    }

    fn student(id: i32, college_id: i32) -> Student {
        Student {
            id,
            college_id,
            student_code: format!("S{id:03}"),
            name: format!("Student {id}"),
            email: format!("s{id}@campus.edu"),
            phone: None,
            created_at: t0(),
        }
    }

    fn registration(id: i32, student_id: i32, event_id: i32, active: bool) -> Registration {
        Registration {
            id,
            student_id,
            event_id,
            registered_at: t0(),
            status: if active {
                RegistrationStatus::Registered
            } else {
                RegistrationStatus::Cancelled
            },
        }
    }

    fn attended(registration_id: i32, status: AttendanceStatus) -> Attendance {
        Attendance {
            id: registration_id,
            registration_id,
            check_in_time: Some(t0()),
            check_out_time: None,
            status,
        }
    }

    fn rated(registration_id: i32, rating: i32) -> Feedback {
        Feedback {
            id: registration_id,
            registration_id,
            rating,
            comment: None,
            submitted_at: t0(),
        }
    }

    #[test]
    fn percentage_is_zero_for_empty_denominator() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(2, 3), 66.67);
        assert_eq!(percentage(4, 4), 100.0);
    }

    #[test]
    fn event_without_registrations_reports_zeroes() {
        let snapshot = Snapshot {
            events: vec![event(1, 1, 10, 0)],
            ..Snapshot::default()
        };
        let filter = ReportFilter::default();

        let attendance = attendance_stats(&snapshot, &filter);
        assert_eq!(attendance.len(), 1);
        assert_eq!(attendance[0].attendance_percentage, 0.0);
        assert_eq!(attendance[0].absent_count, 0);

        let feedback = feedback_stats(&snapshot, &filter);
        assert_eq!(feedback[0].average_rating, None);
        assert_eq!(feedback[0].feedback_count, 0);

        let registrations = registration_stats(&snapshot, &filter);
        assert_eq!(registrations[0].registration_percentage, 0.0);
    }

    #[test]
    fn attendance_counts_only_active_registrations() {
        let snapshot = Snapshot {
            events: vec![event(1, 1, 10, 3)],
            registrations: vec![
                registration(1, 1, 1, true),
                registration(2, 2, 1, true),
                registration(3, 3, 1, true),
                registration(4, 4, 1, false),
            ],
            attendance: vec![
                attended(1, AttendanceStatus::Present),
                attended(2, AttendanceStatus::Late),
                attended(4, AttendanceStatus::Present),
            ],
            ..Snapshot::default()
        };

        let stats = attendance_stats(&snapshot, &ReportFilter::default());
        let s = &stats[0];
        assert_eq!(s.active_registrations, 3);
        assert_eq!((s.present_count, s.late_count, s.absent_count), (1, 1, 1));
        assert_eq!(s.attendance_percentage, 66.67);

        let reg = registration_stats(&snapshot, &ReportFilter::default());
        assert_eq!(reg[0].total_registrations, 4);
        assert_eq!(reg[0].registration_percentage, 30.0);
    }

    #[test]
    fn feedback_average_and_distribution() {
        let snapshot = Snapshot {
            events: vec![event(1, 1, 10, 3), event(2, 1, 10, 0)],
            registrations: vec![
                registration(1, 1, 1, true),
                registration(2, 2, 1, true),
                registration(3, 3, 1, true),
            ],
            feedback: vec![rated(1, 5), rated(2, 4), rated(3, 4)],
            ..Snapshot::default()
        };

        let stats = feedback_stats(&snapshot, &ReportFilter::default());
        assert_eq!(stats[0].event_id, 1);
        assert_eq!(stats[0].average_rating, Some(4.33));
        assert_eq!(stats[0].rating_distribution, [0, 0, 0, 2, 1]);
        assert_eq!(stats[1].event_id, 2);
        assert_eq!(stats[1].average_rating, None);
    }

    #[test]
    fn top_students_tie_breaks() {
        let snapshot = Snapshot {
            students: vec![student(1, 1), student(2, 1), student(3, 1), student(4, 2)],
            events: vec![event(1, 1, 10, 3), event(2, 1, 10, 2)],
            registrations: vec![
                // student 1: 2 registrations, 1 attended
                registration(1, 1, 1, true),
                registration(2, 1, 2, true),
                // student 2: 1 registration, 1 attended
                registration(3, 2, 1, true),
                // student 3: 1 registration, 1 attended
                registration(4, 3, 1, true),
            ],
            attendance: vec![
                attended(1, AttendanceStatus::Present),
                attended(3, AttendanceStatus::Late),
                attended(4, AttendanceStatus::Present),
            ],
            ..Snapshot::default()
        };

        let ranking = top_students(&snapshot, None, 10);
        let ids: Vec<i32> = ranking.iter().map(|r| r.student_id).collect();
        // equal attended counts: higher rate first, then lower id
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(ranking[2].attendance_rate, 50.0);

        assert_eq!(top_students(&snapshot, None, 1).len(), 1);
        assert!(top_students(&snapshot, Some(2), 10).is_empty());
    }

    #[test]
    fn filters_select_events() {
        let mut seminar = event(2, 2, 10, 0);
        seminar.event_type = "seminar".into();
        let snapshot = Snapshot {
            events: vec![event(1, 1, 10, 0), seminar, event(3, 1, 10, 0)],
            ..Snapshot::default()
        };

        let by_college = ReportFilter {
            college_id: Some(1),
            ..ReportFilter::default()
        };
        let ids: Vec<i32> = registration_stats(&snapshot, &by_college)
            .iter()
            .map(|s| s.event_id)
            .collect();
        assert_eq!(ids, vec![1, 3]);

        let by_type = ReportFilter {
            event_type: Some("seminar".into()),
            ..ReportFilter::default()
        };
        assert_eq!(registration_stats(&snapshot, &by_type)[0].event_id, 2);

        let by_window = ReportFilter {
            start_date: Some(t0() + Duration::days(2)),
            end_date: Some(t0() + Duration::days(2)),
            ..ReportFilter::default()
        };
        assert_eq!(registration_stats(&snapshot, &by_window).len(), 1);
    }

    #[test]
    fn overview_averages_active_registrations() {
        let mut done = event(2, 1, 10, 0);
        done.status = EventStatus::Completed;
        let snapshot = Snapshot {
            events: vec![event(1, 1, 10, 2), done],
            registrations: vec![
                registration(1, 1, 1, true),
                registration(2, 2, 1, true),
                registration(3, 3, 2, false),
            ],
            ..Snapshot::default()
        };

        let o = overview(&snapshot);
        assert_eq!(o.total_events, 2);
        assert_eq!(o.active_events, 1);
        assert_eq!(o.total_registrations, 2);
        assert_eq!(o.average_registrations_per_event, 1.0);
    }

    #[test]
    fn event_report_ranks_active_events_and_groups_types() {
        let mut seminar = event(3, 1, 10, 1);
        seminar.event_type = "seminar".into();
        let mut done = event(4, 1, 10, 5);
        done.status = EventStatus::Completed;
        let snapshot = Snapshot {
            events: vec![event(1, 1, 10, 2), event(2, 1, 4, 2), seminar, done],
            registrations: vec![
                registration(1, 1, 1, true),
                registration(2, 2, 1, true),
                registration(3, 3, 1, false),
                registration(4, 1, 2, true),
                registration(5, 2, 2, true),
                registration(6, 1, 3, true),
            ],
            ..Snapshot::default()
        };

        let report = event_report(&snapshot, &ReportFilter::default(), 10);
        let ids: Vec<i32> = report.popularity.iter().map(|p| p.event_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(report.popularity[0].total_registrations, 3);
        assert_eq!(report.popularity[1].registration_percentage, 50.0);

        let types: Vec<&str> = report
            .type_breakdown
            .iter()
            .map(|t| t.event_type.as_str())
            .collect();
        assert_eq!(types, vec!["workshop", "seminar"]);
        let workshop = &report.type_breakdown[0];
        assert_eq!(workshop.total_events, 2);
        assert_eq!(workshop.total_registrations, 4);
        assert_eq!(workshop.average_registrations, 2.0);
        assert_eq!(workshop.average_registration_percentage, 35.0);

        let limited = event_report(&snapshot, &ReportFilter::default(), 2);
        assert_eq!(limited.popularity.len(), 2);
        assert_eq!(limited.type_breakdown.len(), 2);
    }

    #[test]
    fn college_performance_counts_own_events_only() {
        let college = |id: i32, name: &str| College {
            id,
            name: name.into(),
            location: None,
            contact_email: None,
            created_at: t0(),
        };
        let snapshot = Snapshot {
            colleges: vec![college(1, "North"), college(2, "South")],
            students: vec![student(1, 1), student(2, 1), student(3, 2)],
            events: vec![event(1, 1, 10, 2), event(2, 2, 10, 1)],
            registrations: vec![
                registration(1, 1, 1, true),
                registration(2, 2, 1, true),
                registration(3, 3, 1, false),
                registration(4, 3, 2, true),
            ],
            attendance: vec![
                attended(1, AttendanceStatus::Present),
                attended(2, AttendanceStatus::Late),
                attended(3, AttendanceStatus::Present),
                attended(4, AttendanceStatus::Present),
            ],
            feedback: vec![rated(1, 5), rated(2, 4), rated(4, 1)],
        };

        let north = college_performance(&snapshot, 1).unwrap();
        assert_eq!(north.college_name, "North");
        assert_eq!(north.total_students, 2);
        assert_eq!(north.total_events, 1);
        assert_eq!(north.total_registrations, 2);
        assert_eq!(north.average_registrations_per_event, 2.0);
        assert_eq!((north.present_count, north.late_count), (1, 1));
        assert_eq!(north.attendance_rate, 100.0);
        assert_eq!(north.feedback_count, 2);
        assert_eq!(north.average_rating, Some(4.5));

        assert!(college_performance(&snapshot, 99).is_none());
    }
}
