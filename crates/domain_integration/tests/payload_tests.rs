//! Property tests for payload cleansing

use proptest::prelude::*;
use serde_json::Value;

use domain_integration::adapters::matrix::payload::{cleansed, strip_sentinels};
use test_utils::generators::{available_schedule_query_strategy, json_payload_strategy};

fn has_sentinel_field(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.values().any(|v| {
            matches!(v, Value::Number(n) if n.as_f64().map(|f| f < 0.0).unwrap_or(false))
                || matches!(v, Value::String(s) if s == "-1")
                || has_sentinel_field(v)
        }),
        Value::Array(items) => items.iter().any(has_sentinel_field),
        _ => false,
    }
}

proptest! {
    #[test]
    fn prop_no_sentinel_survives_cleansing(mut payload in json_payload_strategy()) {
        strip_sentinels(&mut payload);
        prop_assert!(!has_sentinel_field(&payload));
    }

    #[test]
    fn prop_cleansing_is_idempotent(mut payload in json_payload_strategy()) {
        strip_sentinels(&mut payload);
        let once = payload.clone();
        strip_sentinels(&mut payload);
        prop_assert_eq!(once, payload);
    }

    #[test]
    fn prop_schedule_query_keeps_required_fields(query in available_schedule_query_strategy()) {
        let value = cleansed("list_available_schedules", &query).unwrap();

        prop_assert_eq!(value["unidade"].as_i64(), Some(query.unit_code));
        prop_assert_eq!(value["convenio"].as_i64(), Some(query.insurance_code));
        prop_assert!(value.get("dataInicio").is_some());
        prop_assert_eq!(value.get("medico").is_some(), query.doctor_code.map(|c| c >= 0).unwrap_or(false));
        prop_assert!(!has_sentinel_field(&value));
    }
}
