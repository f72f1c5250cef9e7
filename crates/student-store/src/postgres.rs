use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};

use crate::{
    CourseId, CourseRecord, DisenrollmentRecord, EnrollmentRecord, Result, StoreError, StudentId,
    StudentRecord,
    store::{CommitSummary, Database, UnitOfWork, validate_student_record},
};

/// PostgreSQL-backed database.
#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
}

impl PostgresDatabase {
    /// Creates a new PostgreSQL database handle.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }
}

#[async_trait]
impl Database for PostgresDatabase {
    type UnitOfWork = PostgresUnitOfWork;

    async fn begin(&self) -> Result<Self::UnitOfWork> {
        Ok(PostgresUnitOfWork {
            tx: self.pool.begin().await?,
            summary: CommitSummary::default(),
        })
    }
}

/// Unit of work backed by a single database transaction.
///
/// Writes are sent to the transaction as they are staged; nothing is
/// visible to other sessions until [`UnitOfWork::commit`]. Dropping the
/// unit of work rolls the transaction back.
pub struct PostgresUnitOfWork {
    tx: Transaction<'static, Postgres>,
    summary: CommitSummary,
}

impl PostgresUnitOfWork {
    fn row_to_course(row: &PgRow) -> Result<CourseRecord> {
        Ok(CourseRecord {
            id: CourseId::new(row.try_get("course_id")?),
            name: row.try_get("course_name")?,
            credits: row.try_get("credits")?,
        })
    }

    fn row_to_enrollment(row: &PgRow) -> Result<EnrollmentRecord> {
        Ok(EnrollmentRecord {
            course: Self::row_to_course(row)?,
            grade: row.try_get("grade")?,
        })
    }

    fn row_to_disenrollment(row: &PgRow) -> Result<DisenrollmentRecord> {
        Ok(DisenrollmentRecord {
            course: Self::row_to_course(row)?,
            comment: row.try_get("comment")?,
            disenrolled_at: row.try_get("disenrolled_at")?,
        })
    }

    fn row_to_student(row: &PgRow) -> Result<StudentRecord> {
        let mut student = StudentRecord::new(
            row.try_get::<String, _>("name")?,
            row.try_get::<String, _>("email")?,
        );
        student.id = Some(StudentId::new(row.try_get("id")?));
        Ok(student)
    }

    /// Loads enrollments and disenrollments for `student_id`, or for every
    /// student when it is `None`, keyed by owner.
    async fn load_owned_rows(
        &mut self,
        student_id: Option<StudentId>,
    ) -> Result<(
        HashMap<i64, Vec<EnrollmentRecord>>,
        HashMap<i64, Vec<DisenrollmentRecord>>,
    )> {
        let owner = student_id.map(|id| id.as_i64());

        let mut enrollments: HashMap<i64, Vec<EnrollmentRecord>> = HashMap::new();
        let rows = sqlx::query(
            r#"
            SELECT e.student_id, c.id AS course_id, c.name AS course_name, c.credits, e.grade
            FROM enrollments e
            JOIN courses c ON c.id = e.course_id
            WHERE $1::BIGINT IS NULL OR e.student_id = $1
            ORDER BY e.student_id ASC, e.position ASC
            "#,
        )
        .bind(owner)
        .fetch_all(&mut *self.tx)
        .await?;
        for row in &rows {
            enrollments
                .entry(row.try_get("student_id")?)
                .or_default()
                .push(Self::row_to_enrollment(row)?);
        }

        let mut disenrollments: HashMap<i64, Vec<DisenrollmentRecord>> = HashMap::new();
        let rows = sqlx::query(
            r#"
            SELECT d.student_id, c.id AS course_id, c.name AS course_name, c.credits,
                   d.comment, d.disenrolled_at
            FROM disenrollments d
            JOIN courses c ON c.id = d.course_id
            WHERE $1::BIGINT IS NULL OR d.student_id = $1
            ORDER BY d.student_id ASC, d.id ASC
            "#,
        )
        .bind(owner)
        .fetch_all(&mut *self.tx)
        .await?;
        for row in &rows {
            disenrollments
                .entry(row.try_get("student_id")?)
                .or_default()
                .push(Self::row_to_disenrollment(row)?);
        }

        Ok((enrollments, disenrollments))
    }

    async fn write_owned_rows(&mut self, id: StudentId, student: &StudentRecord) -> Result<()> {
        sqlx::query("DELETE FROM enrollments WHERE student_id = $1")
            .bind(id.as_i64())
            .execute(&mut *self.tx)
            .await?;

        for (index, enrollment) in student.enrollments.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO enrollments (student_id, course_id, grade, position)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(id.as_i64())
            .bind(enrollment.course.id.as_i64())
            .bind(&enrollment.grade)
            .bind(index as i32 + 1)
            .execute(&mut *self.tx)
            .await?;
        }

        sqlx::query("DELETE FROM disenrollments WHERE student_id = $1")
            .bind(id.as_i64())
            .execute(&mut *self.tx)
            .await?;

        for disenrollment in &student.disenrollments {
            sqlx::query(
                r#"
                INSERT INTO disenrollments (student_id, course_id, comment, disenrolled_at)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(id.as_i64())
            .bind(disenrollment.course.id.as_i64())
            .bind(&disenrollment.comment)
            .bind(disenrollment.disenrolled_at)
            .execute(&mut *self.tx)
            .await?;
        }

        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    async fn student_by_id(&mut self, id: StudentId) -> Result<Option<StudentRecord>> {
        let row = sqlx::query("SELECT id, name, email FROM students WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&mut *self.tx)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };

        let mut student = Self::row_to_student(&row)?;
        let (mut enrollments, mut disenrollments) = self.load_owned_rows(Some(id)).await?;
        student.enrollments = enrollments.remove(&id.as_i64()).unwrap_or_default();
        student.disenrollments = disenrollments.remove(&id.as_i64()).unwrap_or_default();
        Ok(Some(student))
    }

    async fn all_students(&mut self) -> Result<Vec<StudentRecord>> {
        let rows = sqlx::query("SELECT id, name, email FROM students ORDER BY id ASC")
            .fetch_all(&mut *self.tx)
            .await?;
        let (mut enrollments, mut disenrollments) = self.load_owned_rows(None).await?;

        rows.iter()
            .map(|row| -> Result<StudentRecord> {
                let mut student = Self::row_to_student(row)?;
                let key: i64 = row.try_get("id")?;
                student.enrollments = enrollments.remove(&key).unwrap_or_default();
                student.disenrollments = disenrollments.remove(&key).unwrap_or_default();
                Ok(student)
            })
            .collect()
    }

    async fn course_by_name(&mut self, name: &str) -> Result<Option<CourseRecord>> {
        let row = sqlx::query(
            "SELECT id AS course_id, name AS course_name, credits FROM courses WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&mut *self.tx)
        .await?;

        row.as_ref().map(Self::row_to_course).transpose()
    }

    async fn save_student(&mut self, student: StudentRecord) -> Result<()> {
        validate_student_record(&student)?;

        let id = match student.id {
            None => {
                let id: i64 = sqlx::query_scalar(
                    "INSERT INTO students (name, email) VALUES ($1, $2) RETURNING id",
                )
                .bind(&student.name)
                .bind(&student.email)
                .fetch_one(&mut *self.tx)
                .await?;
                StudentId::new(id)
            }
            Some(id) => {
                let updated = sqlx::query("UPDATE students SET name = $2, email = $3 WHERE id = $1")
                    .bind(id.as_i64())
                    .bind(&student.name)
                    .bind(&student.email)
                    .execute(&mut *self.tx)
                    .await?
                    .rows_affected();
                if updated == 0 {
                    return Err(StoreError::StudentNotFound(id));
                }
                id
            }
        };

        self.write_owned_rows(id, &student).await?;
        self.summary.saved.push(id);
        Ok(())
    }

    async fn delete_student(&mut self, id: StudentId) -> Result<()> {
        // Enrollments and disenrollments go with the student (ON DELETE CASCADE).
        let deleted = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id.as_i64())
            .execute(&mut *self.tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(StoreError::StudentNotFound(id));
        }

        self.summary.deleted += 1;
        Ok(())
    }

    async fn commit(self) -> Result<CommitSummary> {
        self.tx.commit().await?;
        tracing::debug!(
            saved = self.summary.saved.len(),
            deleted = self.summary.deleted,
            "postgres unit of work committed"
        );
        Ok(self.summary)
    }
}
