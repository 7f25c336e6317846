use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{required_str, session_user};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_register_teacher(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let name = required_str(req, "name")?;
    let email = required_str(req, "email")?;
    let password = required_str(req, "password")?;

    let user = state.ledger.register_teacher(&name, &email, &password)?;
    Ok(json!({ "user": user }))
}

fn handle_add_student(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let actor = session_user(state)?;
    let name = required_str(req, "name")?;
    let email = required_str(req, "email")?;

    let user = state.ledger.add_student(&actor, &name, &email)?;
    Ok(json!({ "user": user }))
}

fn handle_roster_list(state: &mut AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let actor = session_user(state)?;
    let users = state.ledger.list_users(&actor)?;
    Ok(json!({ "users": users }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "roster.registerTeacher" => handle_register_teacher(state, req),
        "roster.addStudent" => handle_add_student(state, req),
        "roster.list" => handle_roster_list(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
