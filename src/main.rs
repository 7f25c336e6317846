mod config;
mod db;
mod ipc;
mod ledger;

use std::io::{self, BufRead, Write};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

fn init_tracing(filter: &str) {
    // stdout carries responses; logs go to stderr.
    let (env_filter, bad_filter) = match EnvFilter::try_new(filter) {
        Ok(f) => (f, None),
        Err(e) => (EnvFilter::new("warn"), Some(e)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
    if let Some(e) = bad_filter {
        tracing::warn!(filter, error = %e, "invalid log filter, using \"warn\"");
    }
}

fn main() -> anyhow::Result<()> {
    let cfg = config::Config::from_env().context("invalid configuration")?;
    init_tracing(&cfg.log_filter);
    tracing::info!(seed_demo = cfg.seed_demo, "starting classroomd");

    let mut ledger = ledger::Ledger::open(cfg.student_password.clone())?;
    if cfg.seed_demo {
        ledger.seed_demo().context("failed to seed demo users")?;
    }
    let mut state = ipc::AppState { ledger };

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // No id to answer with.
                let mut resp = ipc::err("", "bad_json", e.to_string(), None);
                if let Some(obj) = resp.as_object_mut() {
                    obj.remove("id");
                }
                let _ = writeln!(stdout, "{}", resp);
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }

    tracing::info!("stdin closed, exiting");
    Ok(())
}
