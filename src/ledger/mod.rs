//! The directory and ledger: users, materials, assignments, submissions, and
//! who is currently signed in.
//!
//! Everything goes through [`Ledger`]. Operations that act on someone's
//! behalf take the acting [`User`] explicitly and check it against the roster
//! before touching anything; the session pointer is only a convenience for
//! the front end to remember who that is between requests.

mod content;
mod error;
mod grading;
mod model;
mod roster;
mod session;

pub use error::LedgerError;
pub use model::{
    Assignment, AssignmentId, Counts, GradeState, GradingEntry, Material, Role, ScoreEntry,
    Submission, SubmissionId, User, UserId, MAX_SCORE, MIN_SCORE,
};

use anyhow::Context;
use rusqlite::{Connection, OptionalExtension};

use crate::db;

pub type LedgerResult<T> = Result<T, LedgerError>;

pub struct Ledger {
    conn: Connection,
    session: Option<UserId>,
    student_password: String,
}

impl Ledger {
    /// Opens an empty ledger. Students added by a teacher get
    /// `student_password` as their initial password.
    pub fn open(student_password: impl Into<String>) -> anyhow::Result<Self> {
        let conn = db::open_ledger_db().context("failed to open in-memory ledger database")?;
        Ok(Self {
            conn,
            session: None,
            student_password: student_password.into(),
        })
    }

    /// Inserts the demo teacher and demo student (ids 1 and 2 on a fresh
    /// ledger). Accounts whose email is already present are left alone.
    pub fn seed_demo(&mut self) -> LedgerResult<()> {
        let demo = [
            ("Teacher Demo", "teacher@rj.edu", Role::Teacher),
            ("Student Demo", "student@rj.edu", Role::Student),
        ];
        for (name, email, role) in demo {
            match self.insert_user(name, email, "password", role) {
                Ok(user) => tracing::info!(user_id = user.id, %role, "seeded demo user"),
                Err(LedgerError::EmailTaken(_)) => {
                    tracing::debug!(email, "demo user already present");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    pub fn counts(&self) -> LedgerResult<Counts> {
        Ok(Counts {
            users: db::row_count(&self.conn, "users")?,
            materials: db::row_count(&self.conn, "materials")?,
            assignments: db::row_count(&self.conn, "assignments")?,
            submissions: db::row_count(&self.conn, "submissions")?,
        })
    }

    pub(crate) fn user_by_id(&self, id: UserId) -> LedgerResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, name, email, password, role FROM users WHERE id = ?",
                [id],
                |r| User::from_row_at(r, 0),
            )
            .optional()?;
        Ok(user)
    }

    /// Confirms `actor` is a user of the roster as given, holding `role`.
    fn require_role(&self, actor: &User, role: Role) -> LedgerResult<User> {
        if actor.role != role {
            return Err(LedgerError::Unauthorized(match role {
                Role::Teacher => "teacher role required",
                Role::Student => "student role required",
            }));
        }
        self.require_member(actor)
    }

    /// Confirms `actor` is a user of the roster as given, any role.
    fn require_member(&self, actor: &User) -> LedgerResult<User> {
        match self.user_by_id(actor.id)? {
            Some(u) if u.role == actor.role && u.email == actor.email => Ok(u),
            _ => Err(LedgerError::Unauthorized("unknown user")),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn seed_demo_is_idempotent() {
        let mut ledger = demo_ledger();
        ledger.seed_demo().expect("reseed");
        assert_eq!(ledger.counts().expect("counts").users, 2);
        assert_eq!(demo_teacher(&ledger).role, Role::Teacher);
        assert_eq!(demo_student(&ledger).role, Role::Student);
    }

    #[test]
    fn forged_actor_is_unauthorized() {
        let ledger = demo_ledger();
        let mut forged = demo_student(&ledger);
        forged.role = Role::Teacher;
        let res = ledger.require_role(&forged, Role::Teacher);
        assert!(matches!(res, Err(LedgerError::Unauthorized(_))));

        let ghost = User {
            id: 99,
            name: "Ghost".to_string(),
            email: "ghost@rj.edu".to_string(),
            password: String::new(),
            role: Role::Teacher,
        };
        assert!(matches!(
            ledger.require_member(&ghost),
            Err(LedgerError::Unauthorized(_))
        ));
    }
}
