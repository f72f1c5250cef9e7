//! One handler per student command or query.
//!
//! Each command handler opens one unit of work, performs every lookup,
//! applies the change to the aggregate, and commits once. A handler that
//! returns early drops its unit of work, discarding anything staged.

use async_trait::async_trait;
use common::StudentId;
use student_store::{CommitSummary, Database, StoreError, StudentRecord, UnitOfWork};

use crate::error::CommandError;
use crate::message::{CommandResult, Handler, Message};

use super::{
    Course, DisenrollCommand, EditPersonalInfoCommand, EnrollCommand, EnrollmentNumber,
    GetListQuery, Grade, RegisterCommand, Student, StudentSummary, TransferCommand,
    UnregisterCommand,
};

/// Handles [`RegisterCommand`].
pub struct RegisterHandler<D> {
    db: D,
}

impl<D: Database> RegisterHandler<D> {
    pub fn new(db: D) -> Self {
        Self { db }
    }

    async fn register(&self, cmd: RegisterCommand) -> CommandResult {
        let mut student = Student::new(cmd.name, cmd.email)?;
        let mut uow = self.db.begin().await?;

        // Resolve every course and grade before the student is touched.
        let pairs = [
            (cmd.course1, cmd.course1_grade),
            (cmd.course2, cmd.course2_grade),
        ];
        let mut enrollments = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let (Some(course_name), Some(grade_text)) = pair else {
                continue;
            };
            let course = find_course(&mut uow, &course_name).await?;
            let grade: Grade = grade_text.parse()?;
            enrollments.push((course, grade));
        }

        for (course, grade) in enrollments {
            student.enroll(course, grade);
        }

        let summary = save_and_commit(uow, &student).await?;
        metrics::counter!("students_registered_total").increment(1);
        tracing::info!(
            student_id = ?summary.saved.first(),
            enrollments = student.enrollment_count(),
            "student registered"
        );
        Ok(())
    }
}

#[async_trait]
impl<D: Database> Handler<RegisterCommand> for RegisterHandler<D> {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, cmd: RegisterCommand) -> CommandResult {
        let result = self.register(cmd).await;
        record_outcome(RegisterCommand::NAME, &result);
        result
    }
}

/// Handles [`UnregisterCommand`].
pub struct UnregisterHandler<D> {
    db: D,
}

impl<D: Database> UnregisterHandler<D> {
    pub fn new(db: D) -> Self {
        Self { db }
    }

    async fn unregister(&self, cmd: UnregisterCommand) -> CommandResult {
        let mut uow = self.db.begin().await?;

        if uow.student_by_id(cmd.student_id).await?.is_none() {
            return Err(CommandError::student_not_found(cmd.student_id));
        }

        uow.delete_student(cmd.student_id).await?;
        uow.commit().await?;
        tracing::info!(student_id = %cmd.student_id, "student unregistered");
        Ok(())
    }
}

#[async_trait]
impl<D: Database> Handler<UnregisterCommand> for UnregisterHandler<D> {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, cmd: UnregisterCommand) -> CommandResult {
        let result = self.unregister(cmd).await;
        record_outcome(UnregisterCommand::NAME, &result);
        result
    }
}

/// Handles [`EditPersonalInfoCommand`].
pub struct EditPersonalInfoHandler<D> {
    db: D,
}

impl<D: Database> EditPersonalInfoHandler<D> {
    pub fn new(db: D) -> Self {
        Self { db }
    }

    async fn edit(&self, cmd: EditPersonalInfoCommand) -> CommandResult {
        let mut uow = self.db.begin().await?;
        let mut student = load_student(&mut uow, cmd.student_id).await?;

        student.edit_personal_info(cmd.name, cmd.email)?;

        save_and_commit(uow, &student).await?;
        Ok(())
    }
}

#[async_trait]
impl<D: Database> Handler<EditPersonalInfoCommand> for EditPersonalInfoHandler<D> {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, cmd: EditPersonalInfoCommand) -> CommandResult {
        let result = self.edit(cmd).await;
        record_outcome(EditPersonalInfoCommand::NAME, &result);
        result
    }
}

/// Handles [`EnrollCommand`].
pub struct EnrollHandler<D> {
    db: D,
}

impl<D: Database> EnrollHandler<D> {
    pub fn new(db: D) -> Self {
        Self { db }
    }

    async fn enroll(&self, cmd: EnrollCommand) -> CommandResult {
        let mut uow = self.db.begin().await?;
        let mut student = load_student(&mut uow, cmd.student_id).await?;
        let course = find_course(&mut uow, &cmd.course).await?;
        let grade: Grade = cmd.grade.parse()?;

        let number = student.enroll(course, grade);

        save_and_commit(uow, &student).await?;
        tracing::info!(student_id = %cmd.student_id, %number, course = %cmd.course, "student enrolled");
        Ok(())
    }
}

#[async_trait]
impl<D: Database> Handler<EnrollCommand> for EnrollHandler<D> {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, cmd: EnrollCommand) -> CommandResult {
        let result = self.enroll(cmd).await;
        record_outcome(EnrollCommand::NAME, &result);
        result
    }
}

/// Handles [`TransferCommand`].
pub struct TransferHandler<D> {
    db: D,
}

impl<D: Database> TransferHandler<D> {
    pub fn new(db: D) -> Self {
        Self { db }
    }

    async fn transfer(&self, cmd: TransferCommand) -> CommandResult {
        let mut uow = self.db.begin().await?;
        let mut student = load_student(&mut uow, cmd.student_id).await?;
        let course = find_course(&mut uow, &cmd.course).await?;
        let grade: Grade = cmd.grade.parse()?;

        student.transfer_enrollment(EnrollmentNumber::new(cmd.enrollment_number), course, grade)?;

        save_and_commit(uow, &student).await?;
        Ok(())
    }
}

#[async_trait]
impl<D: Database> Handler<TransferCommand> for TransferHandler<D> {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, cmd: TransferCommand) -> CommandResult {
        let result = self.transfer(cmd).await;
        record_outcome(TransferCommand::NAME, &result);
        result
    }
}

/// Handles [`DisenrollCommand`].
pub struct DisenrollHandler<D> {
    db: D,
}

impl<D: Database> DisenrollHandler<D> {
    pub fn new(db: D) -> Self {
        Self { db }
    }

    async fn disenroll(&self, cmd: DisenrollCommand) -> CommandResult {
        let mut uow = self.db.begin().await?;
        let mut student = load_student(&mut uow, cmd.student_id).await?;

        student.remove_enrollment(EnrollmentNumber::new(cmd.enrollment_number), &cmd.comment)?;

        save_and_commit(uow, &student).await?;
        Ok(())
    }
}

#[async_trait]
impl<D: Database> Handler<DisenrollCommand> for DisenrollHandler<D> {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, cmd: DisenrollCommand) -> CommandResult {
        let result = self.disenroll(cmd).await;
        record_outcome(DisenrollCommand::NAME, &result);
        result
    }
}

/// Handles [`GetListQuery`]. Reads only; never commits.
pub struct GetListHandler<D> {
    db: D,
}

impl<D: Database> GetListHandler<D> {
    pub fn new(db: D) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<D: Database> Handler<GetListQuery> for GetListHandler<D> {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, query: GetListQuery) -> Result<Vec<StudentSummary>, StoreError> {
        let mut uow = self.db.begin().await?;
        let students: Vec<StudentSummary> = uow
            .all_students()
            .await?
            .into_iter()
            .filter(|student| query.matches(student))
            .map(StudentSummary::from)
            .collect();

        tracing::debug!(count = students.len(), "student list read");
        Ok(students)
    }
}

async fn load_student<U: UnitOfWork>(uow: &mut U, id: StudentId) -> Result<Student, CommandError> {
    let record = uow
        .student_by_id(id)
        .await?
        .ok_or_else(|| CommandError::student_not_found(id))?;

    Student::try_from(record)
        .map_err(|e| CommandError::Storage(format!("Stored student {id} is unreadable: {e}")))
}

async fn find_course<U: UnitOfWork>(uow: &mut U, name: &str) -> Result<Course, CommandError> {
    uow.course_by_name(name)
        .await?
        .map(Course::from)
        .ok_or_else(|| CommandError::course_not_found(name))
}

async fn save_and_commit<U: UnitOfWork>(
    mut uow: U,
    student: &Student,
) -> Result<CommitSummary, CommandError> {
    uow.save_student(StudentRecord::from(student)).await?;
    Ok(uow.commit().await?)
}

fn record_outcome(command: &'static str, result: &CommandResult) {
    match result {
        Ok(()) => {
            metrics::counter!("commands_succeeded_total", "message" => command).increment(1);
        }
        Err(err @ CommandError::Storage(_)) => {
            metrics::counter!("commands_failed_total", "message" => command, "kind" => err.kind())
                .increment(1);
            tracing::error!(command, error = %err, "command failed in storage");
        }
        Err(err) => {
            metrics::counter!("commands_failed_total", "message" => command, "kind" => err.kind())
                .increment(1);
            tracing::warn!(command, kind = err.kind(), error = %err, "command rejected");
        }
    }
}
