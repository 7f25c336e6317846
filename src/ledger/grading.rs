use rusqlite::OptionalExtension;

use super::{
    Assignment, AssignmentId, GradeState, GradingEntry, Ledger, LedgerError, LedgerResult, Role,
    ScoreEntry, Submission, SubmissionId, User, UserId, MAX_SCORE, MIN_SCORE,
};
use crate::db;

impl Ledger {
    /// Files a new, ungraded submission. Resubmitting to the same assignment
    /// is allowed; every submission is kept.
    pub fn submit(
        &mut self,
        actor: &User,
        assignment_id: AssignmentId,
        content: &str,
    ) -> LedgerResult<Submission> {
        if actor.role != Role::Student {
            return Err(LedgerError::Unauthorized("student role required"));
        }
        let student = match self.user_by_id(actor.id)? {
            Some(u) if u.role == Role::Student && u.email == actor.email => u,
            _ => return Err(LedgerError::StudentNotFound(actor.id)),
        };

        let exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM assignments WHERE id = ?",
                [assignment_id],
                |r| r.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(LedgerError::AssignmentNotFound(assignment_id));
        }

        let id = db::next_id(&self.conn, "submissions")?;
        let created_at = db::now_timestamp();
        self.conn.execute(
            "INSERT INTO submissions(id, assignment_id, student_id, content, created_at, score)
             VALUES(?, ?, ?, ?, ?, NULL)",
            (id, assignment_id, student.id, content, &created_at),
        )?;
        tracing::info!(
            submission_id = id,
            assignment_id,
            student_id = student.id,
            "submission filed"
        );

        Ok(Submission {
            id,
            assignment_id,
            student_id: student.id,
            content: content.to_string(),
            created_at,
            score: None,
        })
    }

    /// Ungraded -> Graded. A graded submission must go through
    /// [`Ledger::regrade`] instead.
    pub fn grade(
        &mut self,
        actor: &User,
        submission_id: SubmissionId,
        score: i64,
    ) -> LedgerResult<Submission> {
        self.set_score(actor, submission_id, score, GradeState::Ungraded)
    }

    /// Graded -> Graded with a new score.
    pub fn regrade(
        &mut self,
        actor: &User,
        submission_id: SubmissionId,
        score: i64,
    ) -> LedgerResult<Submission> {
        self.set_score(actor, submission_id, score, GradeState::Graded)
    }

    /// The checks that come before any look at the score: `actor` is a
    /// teacher and the submission exists.
    pub fn ensure_gradable(
        &self,
        actor: &User,
        submission_id: SubmissionId,
    ) -> LedgerResult<(User, Submission)> {
        let teacher = self.require_role(actor, Role::Teacher)?;
        let submission = self
            .submission_by_id(submission_id)?
            .ok_or(LedgerError::SubmissionNotFound(submission_id))?;
        Ok((teacher, submission))
    }

    fn set_score(
        &mut self,
        actor: &User,
        submission_id: SubmissionId,
        score: i64,
        expected: GradeState,
    ) -> LedgerResult<Submission> {
        let (teacher, mut submission) = self.ensure_gradable(actor, submission_id)?;
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(LedgerError::InvalidScore(score.to_string()));
        }
        match (expected, submission.state()) {
            (GradeState::Ungraded, GradeState::Graded) => {
                return Err(LedgerError::AlreadyGraded(submission_id));
            }
            (GradeState::Graded, GradeState::Ungraded) => {
                return Err(LedgerError::NotGraded(submission_id));
            }
            _ => {}
        }

        self.conn.execute(
            "UPDATE submissions SET score = ? WHERE id = ?",
            (score, submission_id),
        )?;
        tracing::info!(
            submission_id,
            teacher_id = teacher.id,
            score,
            previous = ?submission.score,
            "submission graded"
        );

        submission.score = Some(score);
        Ok(submission)
    }

    fn submission_by_id(&self, id: SubmissionId) -> LedgerResult<Option<Submission>> {
        let submission = self
            .conn
            .query_row(
                "SELECT id, assignment_id, student_id, content, created_at, score
                 FROM submissions WHERE id = ?",
                [id],
                |r| Submission::from_row_at(r, 0),
            )
            .optional()?;
        Ok(submission)
    }

    /// The acting student's own submissions joined with their assignments,
    /// oldest first.
    pub fn scores_for_student(&self, actor: &User) -> LedgerResult<Vec<ScoreEntry>> {
        let student = self.require_role(actor, Role::Student)?;
        self.score_entries(student.id)
    }

    fn score_entries(&self, student_id: UserId) -> LedgerResult<Vec<ScoreEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT
               a.id, a.title, a.description, a.due_date, a.teacher_id, a.created_at,
               s.id, s.assignment_id, s.student_id, s.content, s.created_at, s.score
             FROM submissions s
             JOIN assignments a ON a.id = s.assignment_id
             WHERE s.student_id = ?
             ORDER BY s.id",
        )?;
        let rows = stmt
            .query_map([student_id], |r| {
                Ok(ScoreEntry {
                    assignment: Assignment::from_row_at(r, 0)?,
                    submission: Submission::from_row_at(r, 6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Every submission from every student, graded or not, oldest first.
    pub fn submissions_for_grading(&self, actor: &User) -> LedgerResult<Vec<GradingEntry>> {
        self.require_role(actor, Role::Teacher)?;
        let mut stmt = self.conn.prepare(
            "SELECT
               a.id, a.title, a.description, a.due_date, a.teacher_id, a.created_at,
               s.id, s.assignment_id, s.student_id, s.content, s.created_at, s.score,
               u.id, u.name, u.email, u.password, u.role
             FROM submissions s
             JOIN assignments a ON a.id = s.assignment_id
             JOIN users u ON u.id = s.student_id
             ORDER BY s.id",
        )?;
        let rows = stmt
            .query_map([], |r| {
                Ok(GradingEntry {
                    assignment: Assignment::from_row_at(r, 0)?,
                    submission: Submission::from_row_at(r, 6)?,
                    student: User::from_row_at(r, 12)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
