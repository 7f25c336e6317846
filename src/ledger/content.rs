use super::{Assignment, Ledger, LedgerResult, Material, Role, User};
use crate::db;

impl Ledger {
    /// Title and content are stored as given, empty or not.
    pub fn post_material(&mut self, actor: &User, title: &str, content: &str) -> LedgerResult<Material> {
        let teacher = self.require_role(actor, Role::Teacher)?;
        let id = db::next_id(&self.conn, "materials")?;
        let created_at = db::now_timestamp();
        self.conn.execute(
            "INSERT INTO materials(id, title, content, teacher_id, created_at)
             VALUES(?, ?, ?, ?, ?)",
            (id, title, content, teacher.id, &created_at),
        )?;
        tracing::info!(material_id = id, teacher_id = teacher.id, "material posted");

        Ok(Material {
            id,
            title: title.to_string(),
            content: content.to_string(),
            teacher_id: teacher.id,
            created_at,
        })
    }

    /// `due_date` is kept verbatim; it is never parsed.
    pub fn create_assignment(
        &mut self,
        actor: &User,
        title: &str,
        description: &str,
        due_date: &str,
    ) -> LedgerResult<Assignment> {
        let teacher = self.require_role(actor, Role::Teacher)?;
        let id = db::next_id(&self.conn, "assignments")?;
        let created_at = db::now_timestamp();
        self.conn.execute(
            "INSERT INTO assignments(id, title, description, due_date, teacher_id, created_at)
             VALUES(?, ?, ?, ?, ?, ?)",
            (id, title, description, due_date, teacher.id, &created_at),
        )?;
        tracing::info!(assignment_id = id, teacher_id = teacher.id, "assignment created");

        Ok(Assignment {
            id,
            title: title.to_string(),
            description: description.to_string(),
            due_date: due_date.to_string(),
            teacher_id: teacher.id,
            created_at,
        })
    }

    /// Every material, oldest first. Visible to anyone signed in.
    pub fn list_materials(&self, actor: &User) -> LedgerResult<Vec<Material>> {
        self.require_member(actor)?;
        let mut stmt = self.conn.prepare(
            "SELECT id, title, content, teacher_id, created_at FROM materials ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], |r| Material::from_row_at(r, 0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Every assignment, oldest first. Visible to anyone signed in.
    pub fn list_assignments(&self, actor: &User) -> LedgerResult<Vec<Assignment>> {
        self.require_member(actor)?;
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, due_date, teacher_id, created_at
             FROM assignments ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], |r| Assignment::from_row_at(r, 0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
