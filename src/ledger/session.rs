use rusqlite::OptionalExtension;

use super::{Ledger, LedgerError, LedgerResult, Role, User};

impl Ledger {
    /// Signs in the user matching all three fields exactly. There is no
    /// token: the signed-in user is the session.
    pub fn login(&mut self, email: &str, password: &str, role: Role) -> LedgerResult<User> {
        let user = self
            .conn
            .query_row(
                "SELECT id, name, email, password, role FROM users
                 WHERE email = ? AND password = ? AND role = ?",
                (email, password, role),
                |r| User::from_row_at(r, 0),
            )
            .optional()?;

        let Some(user) = user else {
            tracing::warn!(email, %role, "login rejected");
            return Err(LedgerError::InvalidCredentials);
        };

        self.session = Some(user.id);
        tracing::info!(user_id = user.id, %role, "signed in");
        Ok(user)
    }

    pub fn logout(&mut self) {
        if let Some(id) = self.session.take() {
            tracing::info!(user_id = id, "signed out");
        }
    }

    pub fn current_user(&self) -> LedgerResult<Option<User>> {
        match self.session {
            Some(id) => self.user_by_id(id),
            None => Ok(None),
        }
    }
}
