//! Per-endpoint handling of known upstream errors
//!
//! After the retrying transport gives up, each endpoint's [`Recovery`]
//! decides whether the failure is one of the benign outcomes the vendor
//! reports as an error. Matching is a plain substring search over the
//! upstream error body.

use serde_json::Value;

/// How an endpoint treats a failed call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Every failure is surfaced
    Propagate,
    /// Failures whose body contains one of the needles yield an empty result
    EmptyWhenBodyContains(&'static [&'static str]),
    /// Same, restricted to one upstream status
    EmptyWhenStatusAndBodyContains {
        status: u16,
        needles: &'static [&'static str],
    },
    /// Failures whose body contains one of the needles count as success
    SucceedWhenBodyContains(&'static [&'static str]),
}

impl Recovery {
    /// Returns true when the failure should not be surfaced
    pub fn applies(&self, status: Option<u16>, body: Option<&Value>) -> bool {
        let Some(body) = body else {
            return false;
        };
        let text = body_text(body);

        match *self {
            Recovery::Propagate => false,
            Recovery::EmptyWhenBodyContains(needles)
            | Recovery::SucceedWhenBodyContains(needles) => contains_any(&text, needles),
            Recovery::EmptyWhenStatusAndBodyContains {
                status: expected,
                needles,
            } => status == Some(expected) && contains_any(&text, needles),
        }
    }
}

/// Flattens an error body to searchable text
pub fn body_text(body: &Value) -> String {
    match body {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::matrix::known_errors::*;
    use serde_json::json;

    #[test]
    fn test_propagate_never_applies() {
        let body = json!({"mensagem": NO_AVAILABLE_SCHEDULES});
        assert!(!Recovery::Propagate.applies(Some(404), Some(&body)));
    }

    #[test]
    fn test_body_match_in_json_object() {
        let recovery = Recovery::EmptyWhenBodyContains(AVAILABLE_SCHEDULES_EMPTY);
        let body = json!({"erro": true, "mensagem": "Não foi possível traduzir o código 123"});
        assert!(recovery.applies(Some(500), Some(&body)));
    }

    #[test]
    fn test_body_match_in_plain_text() {
        let recovery = Recovery::SucceedWhenBodyContains(CANCEL_ALREADY_APPLIED);
        let body = Value::String(format!("Erro: {}", SCHEDULE_NOT_CANCELLABLE));
        assert!(recovery.applies(Some(400), Some(&body)));
    }

    #[test]
    fn test_missing_body_never_applies() {
        let recovery = Recovery::EmptyWhenBodyContains(AVAILABLE_SCHEDULES_EMPTY);
        assert!(!recovery.applies(None, None));
    }

    #[test]
    fn test_status_restricted_match() {
        let recovery = Recovery::EmptyWhenStatusAndBodyContains {
            status: 400,
            needles: PROCEDURES_EMPTY,
        };
        let body = json!({"mensagem": "Lista de procedimentos vazia"});
        assert!(recovery.applies(Some(400), Some(&body)));
        assert!(!recovery.applies(Some(500), Some(&body)));
        assert!(!recovery.applies(None, Some(&body)));
    }

    #[test]
    fn test_cancel_match_requires_exact_literal() {
        let recovery = Recovery::SucceedWhenBodyContains(CANCEL_ALREADY_APPLIED);
        // Missing trailing period
        let body = json!({"mensagem": "Não foi possível desmarcar o agendamento"});
        assert!(!recovery.applies(Some(400), Some(&body)));
    }
}
