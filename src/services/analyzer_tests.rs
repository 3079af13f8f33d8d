#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::analysis::classifier::{Classification, ClassifierConfig};
    use crate::api::{Mmsi, PositionReport, StaticInfo};
    use crate::services::analyzer::{analyze_vessel, group_positions_by_mmsi};

    fn position(mmsi: &str, minute: u32, lat: f64, lon: f64, speed: f64) -> PositionReport {
        PositionReport {
            mmsi: Mmsi::new(mmsi),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, minute, 0).unwrap(),
            latitude: lat,
            longitude: lon,
            speed_knots: speed,
            heading_deg: None,
            name: None,
            declared_type: None,
        }
    }

    #[test]
    fn test_grouping_preserves_first_seen_order() {
        let positions = vec![
            position("222", 0, 70.0, 20.0, 5.0),
            position("111", 1, 70.1, 20.0, 5.0),
            position("222", 2, 70.0, 20.1, 5.0),
            position("333", 3, 70.2, 20.0, 5.0),
            position("111", 4, 70.1, 20.1, 5.0),
        ];

        let groups = group_positions_by_mmsi(positions);
        let identities: Vec<&str> = groups.iter().map(|(m, _)| m.value()).collect();
        assert_eq!(identities, vec!["222", "111", "333"]);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].1.len(), 2);
        assert_eq!(groups[2].1.len(), 1);
    }

    #[test]
    fn test_grouping_empty_input() {
        assert!(group_positions_by_mmsi(vec![]).is_empty());
    }

    #[test]
    fn test_analyze_vessel_assembles_sorted_track() {
        // Out-of-order input; stored positions must come back sorted.
        let positions = vec![
            position("111", 30, 70.2, 20.4, 11.0),
            position("111", 0, 70.0, 20.0, 12.0),
            position("111", 15, 70.1, 20.2, 13.0),
        ];

        let vessel = analyze_vessel(
            Mmsi::new("111"),
            positions,
            None,
            &ClassifierConfig::default(),
        );

        assert_eq!(vessel.metrics.point_count, 3);
        let minutes: Vec<i64> = vessel
            .positions
            .iter()
            .map(|p| p.timestamp.timestamp() / 60 % 60)
            .collect();
        assert_eq!(minutes, vec![0, 15, 30]);
        assert!(vessel.static_info.is_none());
        assert!(!vessel.rationale.is_empty());
    }

    #[test]
    fn test_analyze_vessel_transit_track() {
        // ~20 nm over 30 minutes at 12 kn reported speed.
        let positions = vec![
            position("111", 0, 70.00, 20.0, 12.0),
            position("111", 10, 70.11, 20.0, 12.0),
            position("111", 20, 70.22, 20.0, 12.0),
            position("111", 30, 70.33, 20.0, 12.0),
        ];

        let vessel = analyze_vessel(
            Mmsi::new("111"),
            positions,
            Some(StaticInfo::empty(Mmsi::new("111"))),
            &ClassifierConfig::default(),
        );

        assert_eq!(vessel.classification, Classification::Transit);
        assert!(vessel.static_info.is_some());
    }

    #[test]
    fn test_analyze_vessel_empty_track_is_unknown() {
        let vessel = analyze_vessel(
            Mmsi::new("111"),
            vec![],
            None,
            &ClassifierConfig::default(),
        );
        assert_eq!(vessel.classification, Classification::Unknown);
        assert_eq!(vessel.metrics.point_count, 0);
    }
}
