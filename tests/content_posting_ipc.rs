use chrono::{DateTime, Utc};
use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_classroomd");
    let mut child = Command::new(exe)
        .env_remove("CLASSROOMD_STUDENT_PASSWORD")
        .env_remove("CLASSROOMD_SEED_DEMO")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn classroomd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown error")
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn request_err(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> String {
    let value = request(stdin, reader, id, method, params);
    assert_eq!(
        value.get("ok").and_then(|v| v.as_bool()),
        Some(false),
        "{} unexpectedly succeeded: {}",
        method,
        value
    );
    value
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
        .expect("error code")
        .to_string()
}

#[test]
fn teacher_posts_and_students_see_everything() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "session.login",
        json!({ "email": "teacher@rj.edu", "password": "password", "role": "teacher" }),
    );
    let before = Utc::now();
    let posted = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "materials.post",
        json!({ "title": "Syllabus", "content": "Week 1: kinematics" }),
    );
    let material = posted.get("material").expect("material");
    assert_eq!(material["teacherId"], 1);
    let created_at = material["createdAt"].as_str().expect("createdAt");
    let ts = DateTime::parse_from_rfc3339(created_at).expect("parse createdAt");
    assert!(ts.timestamp_millis() >= before.timestamp_millis());

    // Empty fields are accepted as-is.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "materials.post",
        json!({ "title": "", "content": "" }),
    );
    let created = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "assignments.create",
        json!({ "title": "Essay", "description": "On motion", "dueDate": "sometime soon" }),
    );
    assert_eq!(created["assignment"]["dueDate"], "sometime soon");
    assert_eq!(created["assignment"]["id"], 1);

    let teacher_view = request_ok(&mut stdin, &mut reader, "5", "dashboard.get", json!({}));
    assert_eq!(teacher_view["role"], "teacher");
    assert_eq!(teacher_view["displayName"], "Teacher Demo (teacher)");
    assert_eq!(teacher_view["submissions"].as_array().map(|a| a.len()), Some(0));
    let _ = request_ok(&mut stdin, &mut reader, "6", "session.logout", json!({}));

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "session.login",
        json!({ "email": "student@rj.edu", "password": "password", "role": "student" }),
    );
    let code = request_err(
        &mut stdin,
        &mut reader,
        "8",
        "materials.post",
        json!({ "title": "Notes", "content": "mine" }),
    );
    assert_eq!(code, "unauthorized");
    let code = request_err(
        &mut stdin,
        &mut reader,
        "9",
        "assignments.create",
        json!({ "title": "Fake", "description": "", "dueDate": "" }),
    );
    assert_eq!(code, "unauthorized");

    let materials = request_ok(&mut stdin, &mut reader, "10", "materials.list", json!({}));
    let titles: Vec<_> = materials["materials"]
        .as_array()
        .expect("materials")
        .iter()
        .filter_map(|m| m["title"].as_str())
        .collect();
    assert_eq!(titles, ["Syllabus", ""]);

    let student_view = request_ok(&mut stdin, &mut reader, "11", "dashboard.get", json!({}));
    assert_eq!(student_view["role"], "student");
    assert_eq!(student_view["materials"].as_array().map(|a| a.len()), Some(2));
    assert_eq!(student_view["assignments"][0]["title"], "Essay");
    assert_eq!(student_view["scores"].as_array().map(|a| a.len()), Some(0));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn missing_fields_are_bad_params() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "session.login",
        json!({ "email": "teacher@rj.edu", "password": "password", "role": "teacher" }),
    );
    let code = request_err(
        &mut stdin,
        &mut reader,
        "2",
        "assignments.create",
        json!({ "title": "No due date", "description": "" }),
    );
    assert_eq!(code, "bad_params");
    let code = request_err(
        &mut stdin,
        &mut reader,
        "3",
        "materials.post",
        json!({ "title": 5, "content": "" }),
    );
    assert_eq!(code, "bad_params");

    let health = request_ok(&mut stdin, &mut reader, "4", "health", json!({}));
    assert_eq!(health["counts"]["materials"], 0);
    assert_eq!(health["counts"]["assignments"], 0);

    drop(stdin);
    let _ = child.wait();
}
