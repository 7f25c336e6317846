use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type MaterialId = i64;
pub type AssignmentId = i64;
pub type SubmissionId = i64;

pub const MIN_SCORE: i64 = 0;
pub const MAX_SCORE: i64 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            _ => Err(format!("{:?} is not a valid role", s)),
        }
    }
}

impl ToSql for Role {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Stored and compared as plain text. Never serialized.
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Role,
}

impl User {
    /// Columns: id, name, email, password, role.
    pub(crate) fn from_row_at(row: &Row, base: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(base)?,
            name: row.get(base + 1)?,
            email: row.get(base + 2)?,
            password: row.get(base + 3)?,
            role: row.get(base + 4)?,
        })
    }

    /// "Name (role)", the way the dashboard header shows who is signed in.
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.role)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: MaterialId,
    pub title: String,
    pub content: String,
    pub teacher_id: UserId,
    pub created_at: String,
}

impl Material {
    /// Columns: id, title, content, teacher_id, created_at.
    pub(crate) fn from_row_at(row: &Row, base: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(base)?,
            title: row.get(base + 1)?,
            content: row.get(base + 2)?,
            teacher_id: row.get(base + 3)?,
            created_at: row.get(base + 4)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: AssignmentId,
    pub title: String,
    pub description: String,
    /// Free-form, stored verbatim.
    pub due_date: String,
    pub teacher_id: UserId,
    pub created_at: String,
}

impl Assignment {
    /// Columns: id, title, description, due_date, teacher_id, created_at.
    pub(crate) fn from_row_at(row: &Row, base: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(base)?,
            title: row.get(base + 1)?,
            description: row.get(base + 2)?,
            due_date: row.get(base + 3)?,
            teacher_id: row.get(base + 4)?,
            created_at: row.get(base + 5)?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeState {
    Ungraded,
    Graded,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: SubmissionId,
    pub assignment_id: AssignmentId,
    pub student_id: UserId,
    pub content: String,
    pub created_at: String,
    /// `None` until a teacher grades it.
    pub score: Option<i64>,
}

impl Submission {
    /// Columns: id, assignment_id, student_id, content, created_at, score.
    pub(crate) fn from_row_at(row: &Row, base: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(base)?,
            assignment_id: row.get(base + 1)?,
            student_id: row.get(base + 2)?,
            content: row.get(base + 3)?,
            created_at: row.get(base + 4)?,
            score: row.get(base + 5)?,
        })
    }

    pub fn state(&self) -> GradeState {
        match self.score {
            Some(_) => GradeState::Graded,
            None => GradeState::Ungraded,
        }
    }
}

/// One row of a student's score sheet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScoreEntry {
    pub assignment: Assignment,
    pub submission: Submission,
}

/// One row of the teacher's grading queue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GradingEntry {
    pub assignment: Assignment,
    pub submission: Submission,
    pub student: User,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub users: i64,
    pub materials: i64,
    pub assignments: i64,
    pub submissions: i64,
}
