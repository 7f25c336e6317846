use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{required_str, session_user};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_materials_post(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let actor = session_user(state)?;
    let title = required_str(req, "title")?;
    let content = required_str(req, "content")?;

    let material = state.ledger.post_material(&actor, &title, &content)?;
    Ok(json!({ "material": material }))
}

fn handle_materials_list(state: &mut AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let actor = session_user(state)?;
    let materials = state.ledger.list_materials(&actor)?;
    Ok(json!({ "materials": materials }))
}

fn handle_assignments_create(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let actor = session_user(state)?;
    let title = required_str(req, "title")?;
    let description = required_str(req, "description")?;
    let due_date = required_str(req, "dueDate")?;

    let assignment = state
        .ledger
        .create_assignment(&actor, &title, &description, &due_date)?;
    Ok(json!({ "assignment": assignment }))
}

fn handle_assignments_list(
    state: &mut AppState,
    _req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let actor = session_user(state)?;
    let assignments = state.ledger.list_assignments(&actor)?;
    Ok(json!({ "assignments": assignments }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "materials.post" => handle_materials_post(state, req),
        "materials.list" => handle_materials_list(state, req),
        "assignments.create" => handle_assignments_create(state, req),
        "assignments.list" => handle_assignments_list(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
