//! Role-scoped snapshot of what the signed-in user's dashboard shows.
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::session_user;
use crate::ipc::types::{AppState, Request};
use crate::ledger::Role;
use serde_json::json;

fn handle_dashboard_get(state: &mut AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let user = session_user(state)?;
    let ledger = &state.ledger;

    let view = match user.role {
        Role::Teacher => {
            let submissions = ledger.submissions_for_grading(&user)?;
            json!({
                "role": user.role,
                "displayName": user.display_name(),
                "submissions": submissions,
            })
        }
        Role::Student => {
            let materials = ledger.list_materials(&user)?;
            let assignments = ledger.list_assignments(&user)?;
            let scores = ledger.scores_for_student(&user)?;
            json!({
                "role": user.role,
                "displayName": user.display_name(),
                "materials": materials,
                "assignments": assignments,
                "scores": scores,
            })
        }
    };
    Ok(view)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "dashboard.get" => Some(respond(&req.id, handle_dashboard_get(state, req))),
        _ => None,
    }
}
