#[cfg(test)]
mod tests {
    use crate::api::BuildingId;
    use crate::gateway::{Endpoint, ErrorContext, GatewayError};
    use crate::models::{
        BuildingAverageRecord, DetailsUpdate, Metric, MetricValues, SimulationResult,
        SustainabilityBaseline,
    };
    use crate::services::simulation::{
        ActiveView, SimulationOutcome, SimulationPhase, SimulationState,
    };

    fn averages() -> MetricValues {
        MetricValues {
            energy: 450.5,
            occupancy: 150.0,
            carbon: 220.0,
            hvac: 10.0,
            renewable: 30.0,
            water: 900.0,
        }
    }

    fn record() -> BuildingAverageRecord {
        BuildingAverageRecord {
            building_id: BuildingId::new(1).unwrap(),
            name: "Test Tower".to_string(),
            location: "Chicago".to_string(),
            description: "Mixed use".to_string(),
            averages: averages(),
            address: None,
            square_footage: None,
            year_built: None,
            floors: None,
        }
    }

    fn baseline() -> SustainabilityBaseline {
        serde_json::from_str(r#"{"Sustainability Score": 61.25, "Total Costs ($)": 75.5}"#)
            .unwrap()
    }

    fn state() -> SimulationState {
        SimulationState::new(record(), baseline())
    }

    fn result(score: f64, cost: f64) -> SimulationResult {
        SimulationResult {
            sustainability_score: score,
            total_cost: cost,
        }
    }

    fn malformed() -> GatewayError {
        GatewayError::malformed(
            "missing required field \"Total Costs ($)\"",
            ErrorContext::new(Endpoint::Simulate).with_building(BuildingId::new(1)),
        )
    }

    #[test]
    fn test_new_state_is_baseline() {
        let s = state();
        assert_eq!(s.phase(), SimulationPhase::Baseline);
        assert!(!s.simulated());
        assert_eq!(s.overlay().get(Metric::Energy), 450.5);
        assert_eq!(s.result(), result(61.25, 75.5));
        assert_eq!(s.focused(), None);
        assert_eq!(s.active_view(), ActiveView::Metrics);
    }

    #[test]
    fn test_edit_changes_only_one_metric() {
        for metric in Metric::ALL {
            let mut s = state();
            s.edit(metric, 55.0).unwrap();
            assert_eq!(s.phase(), SimulationPhase::Edited);
            for other in Metric::ALL {
                let expected = if other == metric { 55.0 } else { averages().get(other) };
                assert_eq!(s.overlay().get(other), expected);
            }
        }
    }

    #[test]
    fn test_edit_keeps_simulated_flag_and_result() {
        let mut s = state();
        let ticket = s.begin_simulate();
        s.complete_simulate(&ticket, Ok(result(80.0, 10.0)));
        assert!(s.simulated());

        s.edit(Metric::Water, 100.0).unwrap();
        assert!(s.simulated());
        assert_eq!(s.phase(), SimulationPhase::Edited);
        assert_eq!(s.result(), result(80.0, 10.0));
    }

    #[test]
    fn test_edit_out_of_bounds_leaves_state() {
        let mut s = state();
        assert!(s.edit(Metric::Renewable, 101.0).is_err());
        assert_eq!(s.phase(), SimulationPhase::Baseline);
        assert!(s.overlay().matches(&averages()));
    }

    #[test]
    fn test_successful_simulate_displays_server_values() {
        let mut s = state();
        s.edit(Metric::Energy, 300.0).unwrap();
        let ticket = s.begin_simulate();
        assert_eq!(ticket.overlay.energy, 300.0);

        let outcome = s.complete_simulate(&ticket, Ok(result(72.3, 1850.0)));
        assert_eq!(outcome, SimulationOutcome::Applied(result(72.3, 1850.0)));
        assert_eq!(s.phase(), SimulationPhase::Simulated);
        assert!(s.simulated());
        assert_eq!(s.result().sustainability_score, 72.3);
        assert_eq!(s.result().total_cost, 1850.0);
    }

    #[test]
    fn test_failed_simulate_keeps_displayed_values() {
        let mut s = state();
        s.edit(Metric::Carbon, 10.0).unwrap();
        let before_overlay = *s.overlay();
        let ticket = s.begin_simulate();

        let outcome = s.complete_simulate(&ticket, Err(malformed()));
        assert!(matches!(outcome, SimulationOutcome::Failed(_)));
        assert_eq!(*s.overlay(), before_overlay);
        assert_eq!(s.result(), result(61.25, 75.5));
        assert_eq!(s.phase(), SimulationPhase::Edited);
        assert!(!s.simulated());
        let warning = s.warning().unwrap();
        assert!(warning.contains("Failed to simulate changes"), "{}", warning);

        s.dismiss_warning();
        assert!(s.warning().is_none());
    }

    #[test]
    fn test_success_clears_previous_warning() {
        let mut s = state();
        let t1 = s.begin_simulate();
        s.complete_simulate(&t1, Err(malformed()));
        assert!(s.warning().is_some());

        let t2 = s.begin_simulate();
        s.complete_simulate(&t2, Ok(result(50.0, 5.0)));
        assert!(s.warning().is_none());
    }

    #[test]
    fn test_ticket_is_a_snapshot() {
        let mut s = state();
        s.edit(Metric::Hvac, 20.0).unwrap();
        let ticket = s.begin_simulate();
        s.edit(Metric::Hvac, 25.0).unwrap();

        assert_eq!(ticket.overlay.hvac, 20.0);
        s.complete_simulate(&ticket, Ok(result(66.0, 7.0)));
        // Result shown, but it describes the submitted values, not the overlay.
        assert!(s.simulated());
        assert_eq!(s.phase(), SimulationPhase::Edited);
        assert_eq!(s.overlay().get(Metric::Hvac), 25.0);
    }

    #[test]
    fn test_stale_completion_is_dropped() {
        let mut s = state();
        let older = s.begin_simulate();
        let newer = s.begin_simulate();
        s.complete_simulate(&newer, Ok(result(90.0, 1.0)));

        let outcome = s.complete_simulate(&older, Ok(result(10.0, 9.0)));
        assert_eq!(outcome, SimulationOutcome::Stale);
        assert_eq!(s.result(), result(90.0, 1.0));
    }

    #[test]
    fn test_reset_restores_averages_regardless_of_edits() {
        let mut s = state();
        s.edit(Metric::Energy, 1.0).unwrap();
        s.edit(Metric::Renewable, 99.0).unwrap();
        s.edit(Metric::Water, 2000.0).unwrap();
        let t = s.begin_simulate();
        s.complete_simulate(&t, Ok(result(99.0, 0.5)));

        let ticket = s.begin_reset();
        assert!(s.overlay().matches(&averages()));
        assert_eq!(ticket.overlay, averages());
        assert_eq!(s.phase(), SimulationPhase::Baseline);
        assert!(!s.simulated());

        s.complete_simulate(&ticket, Ok(result(61.0, 75.0)));
        assert_eq!(s.phase(), SimulationPhase::Simulated);
        assert_eq!(s.result(), result(61.0, 75.0));
    }

    #[test]
    fn test_reset_then_failed_resimulate_keeps_last_score() {
        let mut s = state();
        s.edit(Metric::Energy, 1.0).unwrap();
        let t = s.begin_simulate();
        s.complete_simulate(&t, Ok(result(99.0, 0.5)));

        let ticket = s.begin_reset();
        s.complete_simulate(&ticket, Err(malformed()));
        assert!(s.overlay().matches(&averages()));
        assert_eq!(s.phase(), SimulationPhase::Baseline);
        assert_eq!(s.result(), result(99.0, 0.5));
        assert!(s.warning().is_some());
    }

    #[test]
    fn test_single_slot_focus() {
        let mut s = state();
        assert_eq!(s.toggle_focus(Metric::Energy), Some(Metric::Energy));
        assert_eq!(s.toggle_focus(Metric::Water), Some(Metric::Water));
        assert_eq!(s.focused(), Some(Metric::Water));
        assert_eq!(s.toggle_focus(Metric::Water), None);
        assert_eq!(s.focused(), None);
    }

    #[test]
    fn test_view_toggle_and_local_details() {
        let mut s = state();
        assert_eq!(s.toggle_view(), ActiveView::Details);
        s.update_details(DetailsUpdate {
            floors: Some(30),
            ..Default::default()
        });
        assert_eq!(s.details().floors, 30);
        assert_eq!(s.details().address, "955 Main Street");
        assert_eq!(s.toggle_view(), ActiveView::Metrics);
    }
}
