//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating Matrix payload data.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use serde_json::{Map, Value};

use domain_integration::adapters::matrix::AvailableScheduleQuery;

/// Strategy for upstream codes, sometimes the `-1` "any" sentinel
pub fn code_or_sentinel_strategy() -> impl Strategy<Value = i64> {
    prop_oneof![
        3 => 1i64..100_000i64,
        1 => Just(-1i64),
    ]
}

/// Strategy for optional codes, sentinel included
pub fn optional_code_strategy() -> impl Strategy<Value = Option<i64>> {
    proptest::option::of(code_or_sentinel_strategy())
}

/// Strategy for dates within 2024
pub fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..365).prop_map(|offset| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset))
}

/// Strategy for slot searches with a non-empty date window
pub fn available_schedule_query_strategy() -> impl Strategy<Value = AvailableScheduleQuery> {
    (
        1i64..500,
        1i64..500,
        optional_code_strategy(),
        optional_code_strategy(),
        optional_code_strategy(),
        optional_code_strategy(),
        date_strategy(),
        0i64..30,
    )
        .prop_map(
            |(unit, insurance, plan, speciality, procedure, doctor, start, days)| AvailableScheduleQuery {
                unit_code: unit,
                insurance_code: insurance,
                plan_code: plan,
                speciality_code: speciality,
                procedure_code: procedure,
                doctor_code: doctor,
                start_date: start,
                end_date: start + Duration::days(days),
            },
        )
}

/// Strategy for arbitrary nested JSON objects mixing sentinels and plain values
pub fn json_payload_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        (-5i64..1_000).prop_map(Value::from),
        Just(Value::String("-1".to_string())),
        "[a-z]{0,8}".prop_map(Value::String),
        any::<bool>().prop_map(Value::Bool),
        Just(Value::Null),
    ];

    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            proptest::collection::btree_map("[a-z]{1,6}", inner, 0..5)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}
