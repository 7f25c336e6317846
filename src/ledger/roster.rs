use rusqlite::OptionalExtension;

use super::{Ledger, LedgerError, LedgerResult, Role, User};
use crate::db;

impl Ledger {
    /// Self-registration; anyone may register as a teacher.
    pub fn register_teacher(&mut self, name: &str, email: &str, password: &str) -> LedgerResult<User> {
        let user = self.insert_user(name, email, password, Role::Teacher)?;
        tracing::info!(user_id = user.id, "teacher registered");
        Ok(user)
    }

    /// Adds a student on behalf of a teacher. The student's password is the
    /// configured default, which the teacher is expected to pass on.
    pub fn add_student(&mut self, actor: &User, name: &str, email: &str) -> LedgerResult<User> {
        let teacher = self.require_role(actor, Role::Teacher)?;
        let password = self.student_password.clone();
        let user = self.insert_user(name, email, &password, Role::Student)?;
        tracing::info!(user_id = user.id, teacher_id = teacher.id, "student added");
        Ok(user)
    }

    /// Whole roster in registration order.
    pub fn list_users(&self, actor: &User) -> LedgerResult<Vec<User>> {
        self.require_role(actor, Role::Teacher)?;
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, email, password, role FROM users ORDER BY id")?;
        let users = stmt
            .query_map([], |r| User::from_row_at(r, 0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    pub(crate) fn insert_user(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> LedgerResult<User> {
        let taken: Option<i64> = self
            .conn
            .query_row("SELECT 1 FROM users WHERE email = ?", [email], |r| r.get(0))
            .optional()?;
        if taken.is_some() {
            tracing::debug!(email, "email already registered");
            return Err(LedgerError::EmailTaken(email.to_string()));
        }

        let id = db::next_id(&self.conn, "users")?;
        self.conn.execute(
            "INSERT INTO users(id, name, email, password, role) VALUES(?, ?, ?, ?, ?)",
            (id, name, email, password, role),
        )?;

        Ok(User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::ledger::test_support::{demo_ledger, demo_student, demo_teacher};
    use crate::ledger::*;

    #[test]
    fn registered_teacher_can_log_in() {
        let mut ledger = demo_ledger();
        let t = ledger
            .register_teacher("Grace", "grace@rj.edu", "s3cret")
            .expect("register");
        assert_eq!(t.id, 3);
        assert_eq!(t.role, Role::Teacher);
        let back = ledger
            .login("grace@rj.edu", "s3cret", Role::Teacher)
            .expect("login");
        assert_eq!(back, t);
    }

    #[test]
    fn email_is_unique_across_roles() {
        let mut ledger = demo_ledger();
        let teacher = demo_teacher(&ledger);

        let res = ledger.register_teacher("Dup", "student@rj.edu", "x");
        assert!(matches!(res, Err(LedgerError::EmailTaken(ref e)) if e == "student@rj.edu"));

        let res = ledger.add_student(&teacher, "Dup", "teacher@rj.edu");
        assert!(matches!(res, Err(LedgerError::EmailTaken(_))));

        ledger
            .add_student(&teacher, "Lin", "lin@rj.edu")
            .expect("add student");
        let res = ledger.register_teacher("Lin again", "lin@rj.edu", "x");
        assert!(matches!(res, Err(LedgerError::EmailTaken(_))));

        let users = ledger.list_users(&teacher).expect("list");
        assert_eq!(users.len(), 3);
        let mut emails: Vec<_> = users.iter().map(|u| u.email.clone()).collect();
        emails.sort();
        emails.dedup();
        assert_eq!(emails.len(), users.len());
    }

    #[test]
    fn added_student_gets_default_password() {
        let mut ledger = Ledger::open("changeme").expect("open");
        ledger.seed_demo().expect("seed");
        let teacher = demo_teacher(&ledger);
        let s = ledger
            .add_student(&teacher, "Kim", "kim@rj.edu")
            .expect("add student");
        assert_eq!(s.role, Role::Student);
        assert_eq!(s.password, "changeme");
        ledger
            .login("kim@rj.edu", "changeme", Role::Student)
            .expect("student login");
    }

    #[test]
    fn students_cannot_add_students_or_list_roster() {
        let mut ledger = demo_ledger();
        let student = demo_student(&ledger);
        let before = ledger.counts().expect("counts");
        assert!(matches!(
            ledger.add_student(&student, "Eve", "eve@rj.edu"),
            Err(LedgerError::Unauthorized(_))
        ));
        assert!(matches!(
            ledger.list_users(&student),
            Err(LedgerError::Unauthorized(_))
        ));
        assert_eq!(ledger.counts().expect("counts"), before);
    }
}
