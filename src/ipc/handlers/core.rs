use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_health(state: &mut AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let counts = state.ledger.counts()?;
    let signed_in = state.ledger.current_user()?.is_some();
    Ok(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "counts": counts,
        "signedIn": signed_in,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(respond(&req.id, handle_health(state, req))),
        _ => None,
    }
}
