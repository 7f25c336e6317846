use serde_json::json;

use crate::ipc::error::HandlerErr;
use crate::ipc::types::{AppState, Request};
use crate::ledger::{LedgerError, User};

/// The signed-in user; every actor-scoped method acts as them.
pub fn session_user(state: &AppState) -> Result<User, HandlerErr> {
    state
        .ledger
        .current_user()?
        .ok_or_else(|| LedgerError::Unauthorized("sign in first").into())
}

/// String param, taken as-is (no trimming).
pub fn required_str(req: &Request, key: &str) -> Result<String, HandlerErr> {
    match req.params.get(key) {
        Some(serde_json::Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(HandlerErr::bad_params(format!("{key} must be a string"))),
        None => Err(HandlerErr::bad_params(format!("missing {key}"))),
    }
}

/// Record id, either a JSON integer or a string holding one.
pub fn required_id(req: &Request, key: &str) -> Result<i64, HandlerErr> {
    let v = req
        .params
        .get(key)
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {key}")))?;
    v.as_i64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        .ok_or_else(|| HandlerErr {
            code: "bad_params",
            message: format!("{key} must be an integer id"),
            details: Some(json!({ key: v })),
        })
}

/// Score param: an integer JSON number, or a string holding an integer.
/// Anything else comes back as `Err` with the raw value as text, so the
/// caller can run the ledger's own checks before rejecting it. Range is
/// checked by the ledger.
pub fn score_param(req: &Request) -> Result<i64, String> {
    let Some(v) = req.params.get("score") else {
        return Err("missing".to_string());
    };
    v.as_i64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        .ok_or_else(|| match v {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
}
