use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::required_str;
use crate::ipc::types::{AppState, Request};
use crate::ledger::{LedgerError, Role};
use serde_json::json;

fn handle_login(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let email = required_str(req, "email")?;
    let password = required_str(req, "password")?;
    // No user holds an unknown role, so it can only fail to match.
    let role: Role = match required_str(req, "role")?.parse() {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(email = %email, error = %e, "login rejected");
            return Err(LedgerError::InvalidCredentials.into());
        }
    };

    let user = state.ledger.login(&email, &password, role)?;
    Ok(json!({ "user": user, "displayName": user.display_name() }))
}

fn handle_logout(state: &mut AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    state.ledger.logout();
    Ok(json!({}))
}

fn handle_current(state: &mut AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let user = state.ledger.current_user()?;
    let display_name = user.as_ref().map(|u| u.display_name());
    Ok(json!({ "user": user, "displayName": display_name }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "session.login" => handle_login(state, req),
        "session.logout" => handle_logout(state, req),
        "session.current" => handle_current(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
