use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use value_tracker_core::errors::CoreError;
use value_tracker_core::models::chart::ChartOptions;
use value_tracker_core::models::holding::{asset_ids, Holding};
use value_tracker_core::models::prospective::{ProspectiveMode, ProspectiveQuote, ProspectiveReport};
use value_tracker_core::models::settings::Settings;
use value_tracker_core::models::snapshot::{ChangeEvent, ChangeKind, Snapshot};

fn ts(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 14)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

// ═══════════════════════════════════════════════════════════════════
//  Holding
// ═══════════════════════════════════════════════════════════════════

mod holding {
    use super::*;

    #[test]
    fn keeps_asset_id_verbatim() {
        let h = Holding::new("bitcoin", 1.5);
        assert_eq!(h.asset_id, "bitcoin");
        assert_eq!(h.quantity, 1.5);
    }

    #[test]
    fn asset_ids_in_configuration_order() {
        let holdings = vec![
            Holding::new("cardano", 1.0),
            Holding::new("bitcoin", 2.0),
            Holding::new("xrp", 3.0),
        ];
        assert_eq!(asset_ids(&holdings), vec!["cardano", "bitcoin", "xrp"]);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Snapshot / ChangeEvent
// ═══════════════════════════════════════════════════════════════════

mod snapshot {
    use super::*;

    #[test]
    fn formatted_timestamp_has_seconds_precision() {
        let snap = Snapshot {
            timestamp: ts(9, 5, 7),
            total_value: 0.0,
            values: HashMap::new(),
            quantities: HashMap::new(),
        };
        assert_eq!(snap.formatted_timestamp(), "2025-03-14 09:05:07");
    }

    #[test]
    fn classify_added_from_zero() {
        let e = ChangeEvent::classify("solana", 0.0, 200.0);
        assert_eq!(e.kind, ChangeKind::Added);
        assert_eq!(e.previous, 0.0);
        assert_eq!(e.current, 200.0);
    }

    #[test]
    fn classify_changed() {
        assert_eq!(ChangeEvent::classify("solana", 150.0, 200.0).kind, ChangeKind::Changed);
    }

    #[test]
    fn classify_changed_to_zero() {
        assert_eq!(ChangeEvent::classify("solana", 150.0, 0.0).kind, ChangeKind::Changed);
    }

    #[test]
    fn classify_unchanged() {
        assert_eq!(ChangeEvent::classify("bitcoin", 1.0, 1.0).kind, ChangeKind::Unchanged);
    }

    #[test]
    fn classify_zero_to_zero_is_unchanged() {
        assert_eq!(ChangeEvent::classify("bitcoin", 0.0, 0.0).kind, ChangeKind::Unchanged);
    }

    #[test]
    fn change_kind_display() {
        assert_eq!(ChangeKind::Added.to_string(), "Added");
        assert_eq!(ChangeKind::Changed.to_string(), "Changed");
        assert_eq!(ChangeKind::Unchanged.to_string(), "Unchanged");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  ProspectiveMode / ProspectiveReport
// ═══════════════════════════════════════════════════════════════════

mod prospective {
    use super::*;

    #[test]
    fn parse_modes() {
        assert_eq!("value".parse::<ProspectiveMode>().unwrap(), ProspectiveMode::AbsoluteValue);
        assert_eq!("multiplier".parse::<ProspectiveMode>().unwrap(), ProspectiveMode::Multiplier);
    }

    #[test]
    fn parse_is_trimmed_and_case_insensitive() {
        assert_eq!("  VALUE \n".parse::<ProspectiveMode>().unwrap(), ProspectiveMode::AbsoluteValue);
        assert_eq!("Multiplier".parse::<ProspectiveMode>().unwrap(), ProspectiveMode::Multiplier);
    }

    #[test]
    fn parse_unknown_is_input_error() {
        let err = "both".parse::<ProspectiveMode>().unwrap_err();
        assert!(err.is_input_error());
        assert!(err.to_string().contains("both"));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for mode in [ProspectiveMode::AbsoluteValue, ProspectiveMode::Multiplier] {
            assert_eq!(mode.to_string().parse::<ProspectiveMode>().unwrap(), mode);
        }
    }

    #[test]
    fn report_total_and_lookup() {
        let report = ProspectiveReport {
            quotes: vec![
                ProspectiveQuote {
                    asset_id: "bitcoin".into(),
                    quantity: 1.0,
                    price: 100_000.0,
                    value: 100_000.0,
                },
                ProspectiveQuote {
                    asset_id: "solana".into(),
                    quantity: 200.0,
                    price: 300.0,
                    value: 60_000.0,
                },
            ],
            errors: vec![],
        };
        assert_eq!(report.total_value(), 160_000.0);
        assert_eq!(report.quote_for("solana").unwrap().price, 300.0);
        assert!(report.quote_for("xrp").is_none());
    }

    #[test]
    fn empty_report_totals_zero() {
        assert_eq!(ProspectiveReport::default().total_value(), 0.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Settings
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let s = Settings::default();
        assert!(s.validate().is_ok());
        assert_eq!(s.ledger_path, "ValueGraph.csv");
        assert_eq!(
            asset_ids(&s.holdings),
            vec!["cardano", "bitcoin", "solana", "xrp"]
        );
        assert_eq!(s.price_source.timeout_secs, 30);
        assert_eq!(s.price_source.price_selectors.len(), 2);
    }

    #[test]
    fn from_json_with_partial_fields_uses_defaults() {
        let s = Settings::from_json(
            r#"{ "holdings": [ { "asset_id": "bitcoin", "quantity": 1 }, { "asset_id": "solana", "quantity": 200 } ] }"#,
        )
        .unwrap();
        assert_eq!(s.holdings, vec![Holding::new("bitcoin", 1.0), Holding::new("solana", 200.0)]);
        assert_eq!(s.ledger_path, "ValueGraph.csv");
        assert!(s.price_source.base_url.starts_with("https://"));
    }

    #[test]
    fn from_json_rejects_garbage() {
        let err = Settings::from_json("{ nope").unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn rejects_empty_holdings() {
        let err = Settings::from_json(r#"{ "holdings": [] }"#).unwrap_err();
        assert!(err.to_string().contains("at least one holding"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut s = Settings::default();
        s.holdings.push(Holding::new("bitcoin", 2.0));
        let err = s.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate asset_id 'bitcoin'"));
    }

    #[test]
    fn rejects_negative_quantity() {
        let mut s = Settings::default();
        s.holdings[0].quantity = -1.0;
        assert!(matches!(s.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn rejects_nan_quantity() {
        let mut s = Settings::default();
        s.holdings[1].quantity = f64::NAN;
        assert!(s.validate().is_err());
    }

    #[test]
    fn zero_quantity_is_allowed() {
        let mut s = Settings::default();
        s.holdings[0].quantity = 0.0;
        assert!(s.validate().is_ok());
    }

    #[test]
    fn rejects_blank_asset_id() {
        let mut s = Settings::default();
        s.holdings[0].asset_id = "  ".into();
        assert!(s.validate().is_err());
    }

    #[test]
    fn rejects_missing_selectors_and_zero_timeout() {
        let mut s = Settings::default();
        s.price_source.price_selectors.clear();
        assert!(s.validate().is_err());

        let mut s = Settings::default();
        s.price_source.timeout_secs = 0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("value-tracker.json");
        std::fs::write(
            &path,
            r#"{ "ledger_path": "history.csv", "holdings": [ { "asset_id": "xrp", "quantity": 6073.456088 } ] }"#,
        )
        .unwrap();

        let s = Settings::load_from_file(&path).unwrap();
        assert_eq!(s.ledger_path, "history.csv");
        assert_eq!(s.holdings[0].quantity, 6073.456088);
    }

    #[test]
    fn load_from_missing_file_is_config_error() {
        let err = Settings::load_from_file("/no/such/value-tracker.json").unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn serde_roundtrip_json() {
        let s = Settings::default();
        let json = serde_json::to_string(&s).unwrap();
        let back = Settings::from_json(&json).unwrap();
        assert_eq!(back.holdings, s.holdings);
        assert_eq!(back.price_source.price_selectors, s.price_source.price_selectors);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  ChartOptions
// ═══════════════════════════════════════════════════════════════════

mod chart_options {
    use super::*;

    #[test]
    fn default_labels() {
        let o = ChartOptions::default();
        assert_eq!(o.title, "Total Value Over Time");
        assert_eq!(o.x_axis_title, "Date and Time");
        assert_eq!(o.y_axis_title, "Total Value ($)");
    }
}
