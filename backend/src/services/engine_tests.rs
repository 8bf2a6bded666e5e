#[cfg(test)]
mod tests {
    use crate::models::{
        AmenityCounts, AmenityKind, Area, HousingType, PriceTable, Year, YearlyPrices,
    };
    use crate::services::engine::{ChangeSet, DerivedStateEngine, Node};

    fn prices(entries: &[(&str, f64)]) -> YearlyPrices {
        entries.iter().map(|&(y, p)| (Year::from(y), p)).collect()
    }

    fn create_test_area(name: &str, zone: i64, types: &[&str], metro: u32) -> Area {
        let mut actual = PriceTable::new();
        let mut predicted = PriceTable::new();
        for (i, t) in types.iter().enumerate() {
            let base = 50.0 + i as f64 * 10.0;
            actual.insert(
                HousingType::from(*t),
                prices(&[("2020", base), ("2021", base + 5.0)]),
            );
            predicted.insert(HousingType::from(*t), prices(&[("2024", base * 2.0)]));
        }
        Area {
            area_name: name.to_string(),
            zone_index: zone,
            amenity_counts: [(AmenityKind::Metro, metro), (AmenityKind::Park, 1)]
                .into_iter()
                .collect(),
            actual_prices: actual,
            predicted_prices: predicted,
        }
    }

    #[test]
    fn test_topological_order_respects_inputs() {
        for (position, node) in Node::TOPOLOGICAL_ORDER.iter().enumerate() {
            for input in node.inputs() {
                let input_position = Node::TOPOLOGICAL_ORDER
                    .iter()
                    .position(|n| n == input)
                    .unwrap();
                assert!(input_position < position, "{:?} before {:?}", input, node);
            }
        }
    }

    #[test]
    fn test_change_set() {
        let set = ChangeSet::of(&[Node::HousingType, Node::ForecastRequest]);
        assert!(set.contains(Node::HousingType));
        assert!(!set.contains(Node::SelectedArea));
        assert_eq!(set.iter().count(), 2);
        assert!(ChangeSet::default().is_empty());
    }

    #[test]
    fn test_initial_state() {
        let engine = DerivedStateEngine::new();
        assert!(engine.area().is_none());
        assert_eq!(engine.housing_type(), &HousingType::default());
        assert_eq!(engine.active_amenities(), &AmenityCounts::zero());
        assert!(engine.actual_series().is_empty());
        assert!(engine.predicted_series().is_empty());
        assert!(engine.forecast_request().is_none());
        assert!(engine.snapshot().is_none());
        assert_eq!(engine.housing_type_options().len(), 6);
    }

    #[test]
    fn test_select_area_derives_everything() {
        let mut engine = DerivedStateEngine::new();
        let area = create_test_area("Marina", 2, &["1 B/R", "2 B/R"], 3);
        let recomputation = engine.select_area(Some(area));

        assert!(recomputation.requests_forecast());
        assert_eq!(engine.housing_type().as_str(), "1 B/R");
        assert_eq!(engine.active_amenities().get(AmenityKind::Metro), 3);
        assert_eq!(engine.actual_series().len(), 2);
        assert_eq!(engine.actual_series()[0].year.as_str(), "2020");
        assert_eq!(engine.predicted_series().len(), 1);

        let request = engine.forecast_request().unwrap();
        assert_eq!(request.area, "Marina");
        assert_eq!(request.zone_index, 2);
        assert_eq!(request.rooms_en.as_str(), "1 B/R");
    }

    #[test]
    fn test_area_change_coerces_missing_housing_type() {
        let mut engine = DerivedStateEngine::new();
        engine.select_area(Some(create_test_area("A", 1, &["2BR", "3BR"], 0)));
        assert_eq!(engine.housing_type().as_str(), "2BR");

        engine.set_housing_type(HousingType::from("3BR"));
        engine.select_area(Some(create_test_area("B", 1, &["1BR", "2BR"], 0)));
        assert_eq!(engine.housing_type().as_str(), "1BR");
    }

    #[test]
    fn test_area_without_actuals_falls_back() {
        let mut engine = DerivedStateEngine::new();
        engine.select_area(Some(create_test_area("A", 1, &["2BR"], 0)));
        engine.select_area(Some(create_test_area("Empty", 1, &[], 0)));

        assert_eq!(engine.housing_type().as_str(), "Studio");
        assert!(engine.actual_series().is_empty());
        assert!(engine.forecast_request().is_some());
    }

    #[test]
    fn test_area_change_keeps_offered_housing_type() {
        let mut engine = DerivedStateEngine::new();
        engine.select_area(Some(create_test_area("A", 1, &["1BR", "2BR"], 0)));
        engine.set_housing_type(HousingType::from("2BR"));
        engine.select_area(Some(create_test_area("B", 1, &["1BR", "2BR"], 0)));
        assert_eq!(engine.housing_type().as_str(), "2BR");
    }

    #[test]
    fn test_area_change_discards_manual_amenity_edits() {
        let mut engine = DerivedStateEngine::new();
        engine.select_area(Some(create_test_area("A", 1, &["1BR"], 2)));
        engine.increment_amenity(AmenityKind::Hospital);
        engine.increment_amenity(AmenityKind::Metro);
        assert_eq!(engine.active_amenities().get(AmenityKind::Hospital), 1);
        assert_eq!(engine.active_amenities().get(AmenityKind::Metro), 3);

        engine.select_area(Some(create_test_area("B", 1, &["1BR"], 7)));
        assert_eq!(engine.housing_type().as_str(), "1BR");
        assert_eq!(engine.active_amenities().get(AmenityKind::Hospital), 0);
        assert_eq!(engine.active_amenities().get(AmenityKind::Metro), 7);
    }

    #[test]
    fn test_amenity_edit_only_touches_amenities_and_request() {
        let mut engine = DerivedStateEngine::new();
        engine.select_area(Some(create_test_area("A", 1, &["1BR"], 0)));
        let recomputation = engine.increment_amenity(AmenityKind::School);

        let changed: Vec<Node> = recomputation.changed.iter().collect();
        assert_eq!(changed, vec![Node::ActiveAmenities, Node::ForecastRequest]);
        let request = engine.forecast_request().unwrap();
        assert_eq!(request.amenities_counter.get(AmenityKind::School), 1);
    }

    #[test]
    fn test_housing_type_change_skips_amenities() {
        let mut engine = DerivedStateEngine::new();
        engine.select_area(Some(create_test_area("A", 1, &["1BR", "2BR"], 0)));
        engine.increment_amenity(AmenityKind::Bar);
        let recomputation = engine.set_housing_type(HousingType::from("2BR"));

        assert!(!recomputation.changed.contains(Node::ActiveAmenities));
        assert!(recomputation.changed.contains(Node::ActualSeries));
        assert!(recomputation.requests_forecast());
        assert_eq!(engine.active_amenities().get(AmenityKind::Bar), 1);
        assert_eq!(engine.actual_series()[0].price, Some(60.0));
    }

    #[test]
    fn test_same_housing_type_is_a_no_op() {
        let mut engine = DerivedStateEngine::new();
        engine.select_area(Some(create_test_area("A", 1, &["1BR"], 0)));
        let recomputation = engine.set_housing_type(HousingType::from("1BR"));
        assert!(recomputation.changed.is_empty());
    }

    #[test]
    fn test_decrement_never_below_zero() {
        let mut engine = DerivedStateEngine::new();
        engine.select_area(Some(create_test_area("A", 1, &["1BR"], 0)));

        let recomputation = engine.decrement_amenity(AmenityKind::Prison);
        assert!(!recomputation.requests_forecast());
        assert_eq!(engine.active_amenities().get(AmenityKind::Prison), 0);

        engine.increment_amenity(AmenityKind::Prison);
        engine.decrement_amenity(AmenityKind::Prison);
        engine.decrement_amenity(AmenityKind::Prison);
        assert_eq!(engine.active_amenities().get(AmenityKind::Prison), 0);
    }

    #[test]
    fn test_increment_then_decrement_restores_request() {
        let mut engine = DerivedStateEngine::new();
        engine.select_area(Some(create_test_area("A", 1, &["1BR"], 0)));
        let before = engine.forecast_request().cloned();
        engine.increment_amenity(AmenityKind::Cemetery);
        engine.decrement_amenity(AmenityKind::Cemetery);
        assert_eq!(engine.forecast_request().cloned(), before);
    }

    #[test]
    fn test_deselect_zeroes_everything() {
        let mut engine = DerivedStateEngine::new();
        engine.select_area(Some(create_test_area("A", 1, &["2BR"], 4)));
        engine.select_area(None);

        assert_eq!(engine.active_amenities(), &AmenityCounts::zero());
        assert!(engine.actual_series().is_empty());
        assert!(engine.forecast_request().is_none());
        assert!(engine.snapshot().is_none());
        assert_eq!(engine.housing_type().as_str(), "Studio");
    }

    #[test]
    fn test_reset_restores_default_housing_type() {
        let mut engine = DerivedStateEngine::new();
        engine.select_area(Some(create_test_area("A", 1, &["2BR"], 4)));
        engine.reset();
        assert_eq!(engine.housing_type(), &HousingType::default());
        assert!(engine.area().is_none());
    }

    #[test]
    fn test_snapshot_tracks_live_inputs() {
        let mut engine = DerivedStateEngine::new();
        engine.select_area(Some(create_test_area("A", 1, &["1BR"], 0)));
        let first = engine.snapshot().unwrap();
        engine.increment_amenity(AmenityKind::Office);
        let second = engine.snapshot().unwrap();
        assert_ne!(first, second);
        engine.decrement_amenity(AmenityKind::Office);
        assert_eq!(engine.snapshot().unwrap(), first);
    }
}
