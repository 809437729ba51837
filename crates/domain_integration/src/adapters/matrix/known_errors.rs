//! Upstream error literals with a fixed meaning
//!
//! The Matrix API reports some expected outcomes (nothing to list, schedule
//! already released) as errors. These substrings are a contract with the
//! vendor: they must match the upstream text exactly, accents and trailing
//! punctuation included. Every literal is pinned by a test.

/// No free slots in the requested window
pub const NO_AVAILABLE_SCHEDULES: &str = "Não foram encontrados horários disponíveis";

/// The upstream could not assemble the slot list for the request
pub const AVAILABLE_SCHEDULES_NOT_LOADED: &str = "Não foi possível carregar os horários disponíveis";

/// A code in the request has no mapping on the upstream side
pub const CODE_NOT_TRANSLATED: &str = "Não foi possível traduzir o código";

/// Cancelling a schedule that is already cancelled
pub const SCHEDULE_NOT_CANCELLABLE: &str = "Não foi possível desmarcar o agendamento.";

/// Empty procedure list ("lista vazia"), reported with status 400
pub const EMPTY_LIST: &str = "vazia";

/// Errors that mean "no available schedules" for the schedule searches
pub const AVAILABLE_SCHEDULES_EMPTY: &[&str] = &[
    NO_AVAILABLE_SCHEDULES,
    AVAILABLE_SCHEDULES_NOT_LOADED,
    CODE_NOT_TRANSLATED,
];

/// Errors that mean the cancel already took effect
pub const CANCEL_ALREADY_APPLIED: &[&str] = &[SCHEDULE_NOT_CANCELLABLE];

/// Errors that mean "no procedures" (status 400 only)
pub const PROCEDURES_EMPTY: &[&str] = &[EMPTY_LIST];
