//! Reports computed over live lifecycle data

use campus_events::config::Config;
use campus_events::contract::*;
use chrono::Duration;

mod common;
use common::{event_end, event_start, memory_harness, new_event, new_student, seed};

#[tokio::test]
async fn test_reports_on_event_without_activity() {
    let h = memory_harness(&Config::default());
    let campus = seed(&h.service, 40, 0).await;
    let only_this = ReportFilter {
        event_id: Some(campus.event.id),
        ..ReportFilter::default()
    };

    let registrations = h.service.registration_report(only_this.clone()).await.unwrap();
    assert_eq!(registrations.len(), 1);
    assert_eq!(registrations[0].total_registrations, 0);
    assert_eq!(registrations[0].registration_percentage, 0.0);

    let attendance = h.service.attendance_report(only_this.clone()).await.unwrap();
    assert_eq!(attendance[0].active_registrations, 0);
    assert_eq!(attendance[0].attendance_percentage, 0.0);

    let feedback = h.service.feedback_report(only_this).await.unwrap();
    assert_eq!(feedback[0].feedback_count, 0);
    assert_eq!(feedback[0].average_rating, None);
    assert_eq!(feedback[0].rating_distribution, [0; 5]);

    let overview = h.service.overview().await.unwrap();
    assert_eq!(overview.total_events, 1);
    assert_eq!(overview.total_registrations, 0);
    assert_eq!(overview.average_registrations_per_event, 0.0);
}

#[tokio::test]
async fn test_attendance_report_counts_active_registrations_only() {
    let h = memory_harness(&Config::default());
    let campus = seed(&h.service, 10, 4).await;

    let mut regs = Vec::new();
    for s in &campus.students {
        regs.push(h.service.register(s.id, campus.event.id).await.unwrap());
    }
    h.service.cancel_registration(regs[3].id).await.unwrap();

    h.clock.set(event_start());
    h.service.check_in(regs[0].id).await.unwrap();
    h.clock.set(event_start() + Duration::minutes(30));
    h.service.check_in(regs[1].id).await.unwrap();

    let report = h
        .service
        .attendance_report(ReportFilter::default())
        .await
        .unwrap();
    let stats = &report[0];
    assert_eq!(stats.active_registrations, 3);
    assert_eq!(stats.present_count, 1);
    assert_eq!(stats.late_count, 1);
    assert_eq!(stats.absent_count, 1);
    assert_eq!(stats.attendance_percentage, 66.67);

    let registrations = h
        .service
        .registration_report(ReportFilter::default())
        .await
        .unwrap();
    assert_eq!(registrations[0].current_registrations, 3);
    // Cancelled rows still count as historical registrations
    assert_eq!(registrations[0].total_registrations, 4);
    assert_eq!(registrations[0].registration_percentage, 30.0);
}

#[tokio::test]
async fn test_report_filters() {
    let h = memory_harness(&Config::default());
    let campus = seed(&h.service, 10, 0).await;

    let mut seminar = new_event(campus.college.id, "Ethics Seminar", "seminar", 20);
    seminar.start_time = event_start() + Duration::days(7);
    seminar.end_time = seminar.start_time + Duration::hours(1);
    let seminar = h.service.create_event(seminar).await.unwrap();

    let other_college = h
        .service
        .create_college(NewCollege {
            name: "Southbank College".to_string(),
            location: None,
            contact_email: None,
        })
        .await
        .unwrap();
    let elsewhere = h
        .service
        .create_event(new_event(other_college.id, "Hackathon", "hackathon", 50))
        .await
        .unwrap();

    let by_type = h
        .service
        .registration_report(ReportFilter {
            event_type: Some("seminar".to_string()),
            ..ReportFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(by_type.len(), 1);
    assert_eq!(by_type[0].event_id, seminar.id);

    let by_college = h
        .service
        .registration_report(ReportFilter {
            college_id: Some(other_college.id),
            ..ReportFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(by_college.len(), 1);
    assert_eq!(by_college[0].event_id, elsewhere.id);

    let by_dates = h
        .service
        .registration_report(ReportFilter {
            start_date: Some(event_start() + Duration::days(1)),
            end_date: Some(event_start() + Duration::days(30)),
            ..ReportFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(by_dates.len(), 1);
    assert_eq!(by_dates[0].event_id, seminar.id);

    let all = h
        .service
        .registration_report(ReportFilter::default())
        .await
        .unwrap();
    let ids: Vec<i32> = all.iter().map(|s| s.event_id).collect();
    assert_eq!(ids, vec![campus.event.id, seminar.id, elsewhere.id]);
}

#[tokio::test]
async fn test_feedback_report_orders_by_average() {
    let h = memory_harness(&Config::default());
    let campus = seed(&h.service, 10, 2).await;
    let quiet = h
        .service
        .create_event(new_event(campus.college.id, "Quiet Talk", "talk", 10))
        .await
        .unwrap();
    let loved = h
        .service
        .create_event(new_event(campus.college.id, "Game Night", "social", 10))
        .await
        .unwrap();

    let mut ratings = Vec::new();
    for (event_id, rating) in [(campus.event.id, 3), (loved.id, 5)] {
        for s in &campus.students {
            let r = h.service.register(s.id, event_id).await.unwrap();
            ratings.push((r.id, rating));
        }
    }

    h.clock.set(event_start());
    for (reg_id, _) in &ratings {
        h.service.check_in(*reg_id).await.unwrap();
    }
    h.clock.set(event_end());
    for (reg_id, rating) in &ratings {
        h.service.submit_feedback(*reg_id, *rating, None).await.unwrap();
    }

    let report = h
        .service
        .feedback_report(ReportFilter::default())
        .await
        .unwrap();
    let order: Vec<i32> = report.iter().map(|s| s.event_id).collect();
    assert_eq!(order, vec![loved.id, campus.event.id, quiet.id]);
    assert_eq!(report[0].average_rating, Some(5.0));
    assert_eq!(report[0].rating_distribution, [0, 0, 0, 0, 2]);
    assert_eq!(report[2].average_rating, None);
}

#[tokio::test]
async fn test_top_students_ranking() {
    let h = memory_harness(&Config::default());
    let campus = seed(&h.service, 10, 4).await;
    let second = h
        .service
        .create_event(new_event(campus.college.id, "Second Workshop", "workshop", 10))
        .await
        .unwrap();
    let [a, b, c, d] = [
        campus.students[0].id,
        campus.students[1].id,
        campus.students[2].id,
        campus.students[3].id,
    ];

    // a: 2 of 2 attended, b: 1 of 1, c: 1 of 2, d: never registered
    let a1 = h.service.register(a, campus.event.id).await.unwrap();
    let a2 = h.service.register(a, second.id).await.unwrap();
    let b1 = h.service.register(b, campus.event.id).await.unwrap();
    let c1 = h.service.register(c, campus.event.id).await.unwrap();
    h.service.register(c, second.id).await.unwrap();

    h.clock.set(event_start());
    for id in [a1.id, a2.id, b1.id, c1.id] {
        h.service.check_in(id).await.unwrap();
    }

    let ranking = h.service.top_students(None, Some(10)).await.unwrap();
    let order: Vec<i32> = ranking.iter().map(|r| r.student_id).collect();
    assert_eq!(order, vec![a, b, c]);
    assert!(!order.contains(&d));

    assert_eq!(ranking[0].events_attended, 2);
    assert_eq!(ranking[0].attendance_rate, 100.0);
    assert_eq!(ranking[2].total_registrations, 2);
    assert_eq!(ranking[2].attendance_rate, 50.0);

    let default_limit = h.service.top_students(None, None).await.unwrap();
    assert_eq!(default_limit.len(), 3);

    let one = h.service.top_students(None, Some(1)).await.unwrap();
    assert_eq!(one.len(), 1);
    assert_eq!(one[0].student_id, a);

    let err = h.service.top_students(None, Some(0)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_top_students_filters_by_college() {
    let h = memory_harness(&Config::default());
    let campus = seed(&h.service, 10, 1).await;
    let other = h
        .service
        .create_college(NewCollege {
            name: "Southbank College".to_string(),
            location: None,
            contact_email: None,
        })
        .await
        .unwrap();
    let outsider = h.service.create_student(new_student(other.id, 1)).await.unwrap();

    h.service
        .register(campus.students[0].id, campus.event.id)
        .await
        .unwrap();
    h.service.register(outsider.id, campus.event.id).await.unwrap();

    let ranking = h
        .service
        .top_students(Some(other.id), None)
        .await
        .unwrap();
    assert_eq!(ranking.len(), 1);
    assert_eq!(ranking[0].student_id, outsider.id);
    assert_eq!(ranking[0].college_id, other.id);
}

#[tokio::test]
async fn test_overview_counts() {
    let h = memory_harness(&Config::default());
    let campus = seed(&h.service, 10, 3).await;
    let cancelled = h
        .service
        .create_event(new_event(campus.college.id, "Rained Out", "outdoor", 10))
        .await
        .unwrap();
    h.service.cancel_event(cancelled.id).await.unwrap();

    let regs = [
        h.service.register(campus.students[0].id, campus.event.id).await.unwrap(),
        h.service.register(campus.students[1].id, campus.event.id).await.unwrap(),
        h.service.register(campus.students[2].id, campus.event.id).await.unwrap(),
    ];
    h.service.cancel_registration(regs[2].id).await.unwrap();

    let overview = h.service.overview().await.unwrap();
    assert_eq!(overview.total_colleges, 1);
    assert_eq!(overview.total_students, 3);
    assert_eq!(overview.total_events, 2);
    assert_eq!(overview.active_events, 1);
    assert_eq!(overview.total_registrations, 2);
    assert_eq!(overview.average_registrations_per_event, 1.0);
}

#[tokio::test]
async fn test_event_report_popularity_and_types() {
    let h = memory_harness(&Config::default());
    let campus = seed(&h.service, 10, 3).await;
    let talk = h
        .service
        .create_event(new_event(campus.college.id, "Career Talk", "seminar", 4))
        .await
        .unwrap();
    let fair = h
        .service
        .create_event(new_event(campus.college.id, "Rained Out", "outdoor", 10))
        .await
        .unwrap();
    h.service.cancel_event(fair.id).await.unwrap();

    let [s0, s1, s2] = [
        campus.students[0].id,
        campus.students[1].id,
        campus.students[2].id,
    ];
    h.service.register(s0, campus.event.id).await.unwrap();
    h.service.register(s1, campus.event.id).await.unwrap();
    let dropped = h.service.register(s2, campus.event.id).await.unwrap();
    h.service.register(s0, talk.id).await.unwrap();
    h.service.cancel_registration(dropped.id).await.unwrap();

    let report = h
        .service
        .event_report(ReportFilter::default(), None)
        .await
        .unwrap();
    let order: Vec<i32> = report.popularity.iter().map(|p| p.event_id).collect();
    assert_eq!(order, vec![campus.event.id, talk.id]);
    // Cancelled rows still count towards popularity
    assert_eq!(report.popularity[0].total_registrations, 3);
    assert_eq!(report.popularity[0].current_registrations, 2);
    assert_eq!(report.popularity[0].registration_percentage, 20.0);
    assert_eq!(report.popularity[1].registration_percentage, 25.0);

    let types: Vec<&str> = report
        .type_breakdown
        .iter()
        .map(|t| t.event_type.as_str())
        .collect();
    assert_eq!(types, vec!["workshop", "seminar"]);
    assert_eq!(report.type_breakdown[0].total_events, 1);
    assert_eq!(report.type_breakdown[0].total_registrations, 2);

    let top = h
        .service
        .event_report(ReportFilter::default(), Some(1))
        .await
        .unwrap();
    assert_eq!(top.popularity.len(), 1);
    assert_eq!(top.type_breakdown.len(), 2);

    let seminars = h
        .service
        .event_report(
            ReportFilter {
                event_type: Some("seminar".to_string()),
                ..ReportFilter::default()
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(seminars.popularity.len(), 1);
    assert_eq!(seminars.popularity[0].event_id, talk.id);

    let err = h
        .service
        .event_report(ReportFilter::default(), Some(0))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_college_report_totals() {
    let h = memory_harness(&Config::default());
    let campus = seed(&h.service, 10, 3).await;
    let talk = h
        .service
        .create_event(new_event(campus.college.id, "Career Talk", "seminar", 4))
        .await
        .unwrap();

    let r0 = h.service.register(campus.students[0].id, campus.event.id).await.unwrap();
    let r1 = h.service.register(campus.students[1].id, campus.event.id).await.unwrap();
    h.service.register(campus.students[0].id, talk.id).await.unwrap();

    h.clock.set(event_start());
    h.service.check_in(r0.id).await.unwrap();
    h.clock.set(event_start() + Duration::minutes(30));
    h.service.check_in(r1.id).await.unwrap();
    h.clock.set(event_end());
    h.service.submit_feedback(r0.id, 4, None).await.unwrap();
    h.service.submit_feedback(r1.id, 5, None).await.unwrap();

    let performance = h.service.college_report(campus.college.id).await.unwrap();
    assert_eq!(performance.college_name, "Northfield Institute");
    assert_eq!(performance.total_students, 3);
    assert_eq!(performance.total_events, 2);
    assert_eq!(performance.total_registrations, 3);
    assert_eq!(performance.average_registrations_per_event, 1.5);
    assert_eq!((performance.present_count, performance.late_count), (1, 1));
    assert_eq!(performance.attendance_rate, 66.67);
    assert_eq!(performance.feedback_count, 2);
    assert_eq!(performance.average_rating, Some(4.5));

    let err = h.service.college_report(999).await.unwrap_err();
    assert_eq!(err, CampusError::CollegeNotFound { id: 999 });
}
