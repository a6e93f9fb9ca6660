//! Unit tests for epi-schedule.

use epi_core::{AgentId, Day, DiseaseId, EpiError, GeoPoint};

use crate::{EventKind, EventQueue, EventQueues, ImportSchedule, ImportWindow};

// ── EventQueue ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod event_queue {
    use super::*;

    #[test]
    fn add_is_idempotent() {
        let mut q = EventQueue::new();
        assert!(q.add(Day(3), AgentId(1)).unwrap());
        assert!(!q.add(Day(3), AgentId(1)).unwrap());
        assert_eq!(q.len(), 1);
        assert_eq!(q.pending(Day(3)), &[AgentId(1)]);
    }

    #[test]
    fn same_agent_on_different_days() {
        let mut q = EventQueue::new();
        q.add(Day(3), AgentId(1)).unwrap();
        q.add(Day(4), AgentId(1)).unwrap();
        assert_eq!(q.len(), 2);
        assert_eq!(q.day_count(), 2);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut q = EventQueue::new();
        q.add(Day(3), AgentId(1)).unwrap();
        assert!(q.cancel(Day(3), AgentId(1)));
        assert!(!q.cancel(Day(3), AgentId(1)));
        assert!(!q.cancel(Day(9), AgentId(5)));
        assert!(q.is_empty());
        assert_eq!(q.day_count(), 0);
    }

    #[test]
    fn cancel_preserves_order_of_others() {
        let mut q = EventQueue::new();
        for i in 0..4 {
            q.add(Day(2), AgentId(i)).unwrap();
        }
        q.cancel(Day(2), AgentId(1));
        assert_eq!(q.pending(Day(2)), &[AgentId(0), AgentId(2), AgentId(3)]);
    }

    #[test]
    fn drain_returns_in_insertion_order() {
        let mut q = EventQueue::new();
        q.add(Day(5), AgentId(9)).unwrap();
        q.add(Day(5), AgentId(2)).unwrap();
        q.add(Day(6), AgentId(4)).unwrap();
        assert_eq!(q.drain(Day(5)).unwrap(), vec![AgentId(9), AgentId(2)]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.next_day(), Some(Day(6)));
    }

    #[test]
    fn drain_empty_day_is_ok() {
        let mut q = EventQueue::new();
        assert!(q.drain(Day(0)).unwrap().is_empty());
        assert_eq!(q.drained_through(), Some(Day(0)));
    }

    #[test]
    fn draining_a_day_twice_fails() {
        let mut q = EventQueue::new();
        q.drain(Day(4)).unwrap();
        assert!(matches!(q.drain(Day(4)), Err(EpiError::DayAlreadyDrained { day }) if day == Day(4)));
        assert!(q.drain(Day(3)).is_err());
        assert!(q.drain(Day(5)).is_ok());
    }

    #[test]
    fn scheduling_into_drained_day_fails() {
        let mut q = EventQueue::new();
        q.drain(Day(4)).unwrap();
        let err = q.add(Day(4), AgentId(1)).unwrap_err();
        assert!(matches!(err, EpiError::EventInPast { day, drained, .. } if day == Day(4) && drained == Day(4)));
        assert!(q.add(Day(5), AgentId(1)).is_ok());
    }
}

// ── EventQueues ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod event_queues {
    use super::*;

    #[test]
    fn kinds_are_independent() {
        let mut qs = EventQueues::new();
        qs.add(EventKind::InfectiousEnd, Day(4), AgentId(1)).unwrap();
        qs.add(EventKind::SymptomsEnd, Day(6), AgentId(1)).unwrap();
        assert_eq!(qs.len(), 2);

        qs.cancel(EventKind::InfectiousEnd, Day(4), AgentId(1));
        assert!(qs.contains(EventKind::SymptomsEnd, Day(6), AgentId(1)));
        assert_eq!(qs.len(), 1);
    }

    #[test]
    fn draining_one_kind_does_not_guard_others() {
        let mut qs = EventQueues::new();
        qs.drain(EventKind::InfectiousStart, Day(3)).unwrap();
        assert!(qs.add(EventKind::InfectiousStart, Day(3), AgentId(0)).is_err());
        assert!(qs.add(EventKind::SymptomsStart, Day(3), AgentId(0)).is_ok());
    }

    #[test]
    fn pipeline_order() {
        let names: Vec<_> = EventKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            names,
            [
                "infectious_start",
                "infectious_end",
                "symptoms_start",
                "symptoms_end",
                "immunity_start",
                "immunity_end",
            ]
        );
    }
}

// ── ImportSchedule ────────────────────────────────────────────────────────────

#[cfg(test)]
mod import_schedule {
    use super::*;

    #[test]
    fn active_filters_by_day_and_disease() {
        let schedule = ImportSchedule::new(vec![
            ImportWindow::anywhere(DiseaseId(0), Day(0), Day(2), 5),
            ImportWindow::anywhere(DiseaseId(1), Day(0), Day(9), 1),
            ImportWindow::anywhere(DiseaseId(0), Day(5), Day(5), 3),
        ]);
        assert_eq!(schedule.active(Day(1), DiseaseId(0)).count(), 1);
        assert_eq!(schedule.active(Day(5), DiseaseId(0)).next().unwrap().attempts, 3);
        assert_eq!(schedule.active(Day(3), DiseaseId(0)).count(), 0);
        assert_eq!(schedule.for_disease(DiseaseId(1)).len(), 1);
    }

    #[test]
    fn non_positive_radius_means_anywhere() {
        let w = ImportWindow::anywhere(DiseaseId(0), Day(0), Day(0), 1)
            .within(GeoPoint::new(40.0, -80.0), -1.0);
        assert!(w.search_area().is_none());

        let w = w.within(GeoPoint::new(40.0, -80.0), 2.5);
        assert_eq!(w.search_area().map(|(_, r)| r), Some(2.5));
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use super::*;
    use crate::load_import_windows_reader;

    const HEADER: &str = "sim_day_start,sim_day_end,num_seeding_attempts,disease_id,seeding_attempt_prob,min_num_successful,lat,lon,radius\n";

    #[test]
    fn loads_windows_with_defaults() {
        let csv = format!("{HEADER}0,0,10,0,,,,,\n5,9,2,1,0.5,1,40.44,-79.99,5.0\n");
        let schedule = load_import_windows_reader(Cursor::new(csv)).unwrap();
        assert_eq!(schedule.len(), 2);

        let first = &schedule.windows()[0];
        assert_eq!(first.attempts, 10);
        assert_eq!(first.attempt_prob, 1.0);
        assert_eq!(first.min_successful, 0);
        assert!(first.search_area().is_none());

        let second = &schedule.windows()[1];
        assert_eq!(second.disease, DiseaseId(1));
        assert_eq!((second.start, second.end), (Day(5), Day(9)));
        assert_eq!(second.attempt_prob, 0.5);
        assert_eq!(second.min_successful, 1);
        assert_eq!(second.radius_km, Some(5.0));
        assert!(second.center.is_some());
    }

    #[test]
    fn rejects_inverted_window() {
        let csv = format!("{HEADER}9,3,1,0,,,,,\n");
        assert!(load_import_windows_reader(Cursor::new(csv)).is_err());
    }

    #[test]
    fn rejects_probability_out_of_range() {
        let csv = format!("{HEADER}0,3,1,0,1.5,,,,\n");
        assert!(load_import_windows_reader(Cursor::new(csv)).is_err());
    }

    #[test]
    fn rejects_half_a_center() {
        let csv = format!("{HEADER}0,3,1,0,,,40.0,,\n");
        assert!(load_import_windows_reader(Cursor::new(csv)).is_err());
    }

    #[test]
    fn empty_file_is_empty_schedule() {
        let schedule = load_import_windows_reader(Cursor::new(HEADER)).unwrap();
        assert!(schedule.is_empty());
    }
}
