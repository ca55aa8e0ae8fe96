#[cfg(test)]
mod tests {
    use crate::error::TimingError;
    use crate::model::{adjust_phases, get_time_max, Client, Entity, PhaseLabel, Relation, Service, System};

    fn service(name: &str, boot_del: f64, offer_mode: bool) -> Service {
        Service::new(name, boot_del, 50.0, 100.0, 3, 1000.0, 10.0, offer_mode).unwrap()
    }

    fn client(name: &str, boot_del: f64, find_mode: bool) -> Client {
        Client::new(name, boot_del, 20.0, 100.0, 3, find_mode).unwrap()
    }

    #[test]
    fn test_phases_are_contiguous() {
        let e = Entity::new("e", 30.0, 70.0, 25.0, 4).unwrap();
        let phases = e.phases();
        assert_eq!(phases[0].start, 0.0);
        for i in 0..3 {
            assert_eq!(phases[i].end, phases[i + 1].start);
        }
        for phase in phases {
            assert_eq!(phase.end, phase.start + phase.duration);
        }
        let labels: Vec<PhaseLabel> = phases.iter().map(|p| p.label).collect();
        assert_eq!(labels, PhaseLabel::ALL.to_vec());
        assert_eq!(e.t_init(), 100.0);

        let boot = e.phase(PhaseLabel::Boot);
        assert!(boot.contains(0.0));
        assert!(!boot.contains(30.0));
        assert!(e.phase(PhaseLabel::Initial).contains(30.0));
        assert_eq!(boot.to_string(), "<0.00,30.00,Boot>");
    }

    #[test]
    fn test_repetition_duration_is_exponential() {
        let e = Entity::new("e", 0.0, 0.0, 25.0, 4).unwrap();
        // 25 + 50 + 100 + 200
        assert_eq!(e.phase(PhaseLabel::Repetition).duration, 375.0);
        assert_eq!(e.phase(PhaseLabel::Repetition).duration, (2f64.powi(4) - 1.0) * 25.0);
    }

    #[test]
    fn test_rep_times() {
        let e = Entity::new("e", 10.0, 5.0, 100.0, 3).unwrap();
        assert_eq!(e.rep_times(), &[15.0, 115.0, 315.0, 715.0]);
        assert!(e.rep_times().windows(2).all(|w| w[0] < w[1]));
        // The last message goes out exactly when the Repetition Phase ends.
        assert_eq!(*e.rep_times().last().unwrap(), e.phase(PhaseLabel::Repetition).end);
    }

    #[test]
    fn test_zero_repetitions() {
        let e = Entity::new("e", 10.0, 5.0, 100.0, 0).unwrap();
        assert_eq!(e.rep_times(), &[15.0]);
        let rep = e.phase(PhaseLabel::Repetition);
        assert_eq!(rep.duration, 0.0);
        assert_eq!(rep.start, rep.end);
        assert_eq!(e.phase(PhaseLabel::Main).start, 15.0);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            Entity::new("e", -1.0, 0.0, 100.0, 3),
            Err(TimingError::InvalidParameter { .. })
        ));
        assert!(matches!(
            Entity::new("e", 0.0, f64::NAN, 100.0, 3),
            Err(TimingError::InvalidParameter { .. })
        ));
        assert!(matches!(
            Entity::new("e", 0.0, 0.0, f64::INFINITY, 3),
            Err(TimingError::InvalidParameter { .. })
        ));
        assert!(matches!(
            Entity::new("e", 0.0, 0.0, 100.0, 65),
            Err(TimingError::InvalidParameter { .. })
        ));
        assert!(Service::new("s", 0.0, 0.0, 100.0, 3, -5.0, 0.0, true).is_err());
        assert!(Service::new("s", 0.0, 0.0, 100.0, 3, 1000.0, -0.5, true).is_err());

        match Entity::new("node-7", 0.0, -3.0, 100.0, 3) {
            Err(TimingError::InvalidParameter { entity, reason }) => {
                assert_eq!(entity, "node-7");
                assert!(reason.contains("init_del"));
            }
            other => panic!("Expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_adjust_phases_widens_to_common_end() {
        let mut entities = vec![
            Entity::new("fast", 0.0, 0.0, 10.0, 1).unwrap(),
            Entity::new("slow", 500.0, 100.0, 100.0, 3).unwrap(),
        ];
        let slow_end = entities[1].main_phase_end();
        assert_eq!(get_time_max(&entities), Some(slow_end));

        adjust_phases(&mut entities);
        for e in &entities {
            let main = e.phase(PhaseLabel::Main);
            assert_eq!(main.end, slow_end);
            assert_eq!(main.end, main.start + main.duration);
        }

        // Idempotent, and never shrinks.
        adjust_phases(&mut entities);
        assert_eq!(entities[0].main_phase_end(), slow_end);
    }

    #[test]
    fn test_adjust_phases_mixed_roles() {
        let mut clients = vec![client("c0", 0.0, true), client("c1", 900.0, true)];
        adjust_phases(&mut clients);
        assert_eq!(clients[0].entity().main_phase_end(), clients[1].entity().main_phase_end());

        let empty: Vec<Entity> = Vec::new();
        assert_eq!(get_time_max(&empty), None);
    }

    #[test]
    fn test_relation() {
        let rel = Relation::new(client("c", 0.0, true), service("s", 0.0, false), 2.5).unwrap();
        assert_eq!(rel.t_c(), 2.5);
        assert_eq!(rel.to_string(), "<c,s,2.50>");

        assert!(Relation::new(client("c", 0.0, true), service("s", 0.0, true), -1.0).is_err());

        // Passive pairs are representable; analysis rejects them.
        assert!(Relation::new(client("c", 0.0, false), service("s", 0.0, false), 1.0).is_ok());
    }

    #[test]
    fn test_system_collects_relations() {
        let system: System = (0..3)
            .map(|i| Relation::new(client(&format!("c{}", i), 0.0, true), service("s", 0.0, true), i as f64).unwrap())
            .collect();
        assert_eq!(system.len(), 3);
        let delays: Vec<f64> = system.iter().map(|r| r.t_c()).collect();
        assert_eq!(delays, vec![0.0, 1.0, 2.0]);
        assert!(System::default().is_empty());
    }
}
