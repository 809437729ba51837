//! Payload cleansing
//!
//! Callers use negative codes (typically `-1`) to mean "any". The Matrix API
//! rejects them, so such fields are dropped before a payload is audited or
//! sent.

use serde::Serialize;
use serde_json::Value;

use crate::error::IntegrationError;

/// Removes sentinel values from every object in `value`, recursively
///
/// A sentinel is a negative number or the string `"-1"`.
pub fn strip_sentinels(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !is_sentinel(v));
            for v in map.values_mut() {
                strip_sentinels(v);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                strip_sentinels(item);
            }
        }
        _ => {}
    }
}

fn is_sentinel(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64().map(|f| f < 0.0).unwrap_or(false),
        Value::String(s) => s.trim() == "-1",
        _ => false,
    }
}

/// Serializes a request payload and strips its sentinels
pub fn cleansed<T: Serialize>(identifier: &str, payload: &T) -> Result<Value, IntegrationError> {
    let mut value = serde_json::to_value(payload)
        .map_err(|e| IntegrationError::decode(identifier, format!("request payload: {}", e)))?;
    strip_sentinels(&mut value);
    Ok(value)
}

/// Flattens a cleansed filter object into query pairs, skipping nulls
pub fn query_pairs(value: &Value) -> Vec<(String, String)> {
    let Value::Object(map) = value else {
        return Vec::new();
    };

    map.iter()
        .filter_map(|(key, v)| match v {
            Value::Null => None,
            Value::String(s) => Some((key.clone(), s.clone())),
            other => Some((key.clone(), other.to_string())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_strips_negative_numbers_and_string_sentinels() {
        let mut value = json!({
            "unidade": 3,
            "medico": -1,
            "procedimento": "-1",
            "plano": 0,
            "observacao": "retorno"
        });
        strip_sentinels(&mut value);

        assert_eq!(value, json!({"unidade": 3, "plano": 0, "observacao": "retorno"}));
    }

    #[test]
    fn test_strips_nested_objects_and_arrays() {
        let mut value = json!({
            "paciente": {"codigo": 10, "convenio": -5},
            "itens": [{"codigo": -1, "nome": "a"}, {"codigo": 2}]
        });
        strip_sentinels(&mut value);

        assert_eq!(
            value,
            json!({
                "paciente": {"codigo": 10},
                "itens": [{"nome": "a"}, {"codigo": 2}]
            })
        );
    }

    #[test]
    fn test_query_pairs_render_scalars_and_skip_nulls() {
        let pairs = query_pairs(&json!({"unidade": 3, "nome": "Centro", "plano": null}));
        assert!(pairs.contains(&("unidade".to_string(), "3".to_string())));
        assert!(pairs.contains(&("nome".to_string(), "Centro".to_string())));
        assert_eq!(pairs.len(), 2);
        assert!(query_pairs(&json!([1, 2])).is_empty());
    }

    proptest! {
        #[test]
        fn prop_no_negative_numbers_survive(values in proptest::collection::vec(-1000i64..1000, 0..20)) {
            let mut object = serde_json::Map::new();
            for (i, v) in values.iter().enumerate() {
                object.insert(format!("campo{}", i), json!(v));
            }
            let mut value = Value::Object(object);
            strip_sentinels(&mut value);

            let remaining = value.as_object().unwrap();
            prop_assert!(remaining.values().all(|v| v.as_i64().unwrap() >= 0));
            prop_assert_eq!(remaining.len(), values.iter().filter(|v| **v >= 0).count());
        }
    }
}
