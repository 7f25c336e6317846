//! Startup configuration, read from the environment.
use anyhow::{anyhow, bail};

pub const STUDENT_PASSWORD_VAR: &str = "CLASSROOMD_STUDENT_PASSWORD";
pub const SEED_DEMO_VAR: &str = "CLASSROOMD_SEED_DEMO";
pub const LOG_VAR: &str = "CLASSROOMD_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Initial password for students a teacher adds. Plain text, shared by
    /// every added student.
    pub student_password: String,
    /// Insert the demo teacher and student at startup.
    pub seed_demo: bool,
    /// `tracing_subscriber::EnvFilter` directives.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            student_password: "password".to_owned(),
            seed_demo: true,
            log_filter: "warn".to_owned(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut c = Self::default();

        if let Some(s) = lookup(STUDENT_PASSWORD_VAR) {
            if s.is_empty() {
                bail!("{STUDENT_PASSWORD_VAR} must not be empty");
            }
            c.student_password = s;
        }
        if let Some(s) = lookup(SEED_DEMO_VAR) {
            c.seed_demo = parse_flag(&s)
                .ok_or_else(|| anyhow!("{SEED_DEMO_VAR}: {s:?} is not a boolean"))?;
        }
        if let Some(s) = lookup(LOG_VAR).or_else(|| lookup("RUST_LOG")) {
            if !s.trim().is_empty() {
                c.log_filter = s;
            }
        }

        Ok(c)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(from_pairs(&[]).expect("config"), Config::default());
    }

    #[test]
    fn overrides_apply() {
        let c = from_pairs(&[
            (STUDENT_PASSWORD_VAR, "welcome1"),
            (SEED_DEMO_VAR, "No"),
            (LOG_VAR, "classroomd=debug"),
            ("RUST_LOG", "trace"),
        ])
        .expect("config");
        assert_eq!(c.student_password, "welcome1");
        assert!(!c.seed_demo);
        assert_eq!(c.log_filter, "classroomd=debug");
    }

    #[test]
    fn rust_log_is_the_fallback_filter() {
        let c = from_pairs(&[("RUST_LOG", "info")]).expect("config");
        assert_eq!(c.log_filter, "info");
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(from_pairs(&[(SEED_DEMO_VAR, "maybe")]).is_err());
        assert!(from_pairs(&[(STUDENT_PASSWORD_VAR, "")]).is_err());
    }
}
