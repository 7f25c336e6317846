use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{required_id, required_str, score_param, session_user};
use crate::ipc::types::{AppState, Request};
use crate::ledger::LedgerError;
use serde_json::json;

fn handle_submit(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let actor = session_user(state)?;
    let assignment_id = required_id(req, "assignmentId")?;
    let content = required_str(req, "content")?;

    let submission = state.ledger.submit(&actor, assignment_id, &content)?;
    Ok(json!({ "submission": submission }))
}

fn handle_grade(
    state: &mut AppState,
    req: &Request,
    regrade: bool,
) -> Result<serde_json::Value, HandlerErr> {
    let actor = session_user(state)?;
    let submission_id = required_id(req, "submissionId")?;
    let score = match score_param(req) {
        Ok(v) => v,
        Err(raw) => {
            // Role and existence failures outrank an unreadable score.
            state.ledger.ensure_gradable(&actor, submission_id)?;
            return Err(LedgerError::InvalidScore(raw).into());
        }
    };

    let submission = if regrade {
        state.ledger.regrade(&actor, submission_id, score)?
    } else {
        state.ledger.grade(&actor, submission_id, score)?
    };
    Ok(json!({ "submission": submission, "state": submission.state() }))
}

fn handle_for_grading(state: &mut AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let actor = session_user(state)?;
    let entries = state.ledger.submissions_for_grading(&actor)?;
    Ok(json!({ "entries": entries }))
}

fn handle_scores_mine(state: &mut AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let actor = session_user(state)?;
    let entries = state.ledger.scores_for_student(&actor)?;
    Ok(json!({ "entries": entries }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "submissions.submit" => handle_submit(state, req),
        "submissions.grade" => handle_grade(state, req, false),
        "submissions.regrade" => handle_grade(state, req, true),
        "submissions.forGrading" => handle_for_grading(state, req),
        "scores.mine" => handle_scores_mine(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
