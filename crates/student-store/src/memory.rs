use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    CourseId, CourseRecord, Result, StoreError, StudentId, StudentRecord,
    store::{CommitSummary, Database, UnitOfWork, validate_student_record},
};

#[derive(Debug, Default)]
struct Tables {
    students: BTreeMap<StudentId, StudentRecord>,
    courses: HashMap<String, CourseRecord>,
    last_student_id: i64,
    last_course_id: i64,
    fail_on_commit: bool,
}

/// In-memory database for tests and local runs.
///
/// Provides the same unit-of-work semantics as the PostgreSQL
/// implementation: writes are staged and applied under a single write lock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDatabase {
    /// Creates a new empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a database whose catalog holds the given `(name, credits)` courses.
    pub async fn with_courses<'a>(courses: impl IntoIterator<Item = (&'a str, i32)>) -> Self {
        let db = Self::new();
        for (name, credits) in courses {
            db.add_course(name, credits).await;
        }
        db
    }

    /// Adds a course to the catalog, replacing any course with the same name.
    pub async fn add_course(&self, name: impl Into<String>, credits: i32) -> CourseRecord {
        let mut tables = self.tables.write().await;
        tables.last_course_id += 1;
        let course = CourseRecord {
            id: CourseId::new(tables.last_course_id),
            name: name.into(),
            credits,
        };
        tables.courses.insert(course.name.clone(), course.clone());
        course
    }

    /// Returns the number of committed students.
    pub async fn student_count(&self) -> usize {
        self.tables.read().await.students.len()
    }

    /// Returns a copy of every committed student, ordered by id.
    pub async fn students(&self) -> Vec<StudentRecord> {
        self.tables.read().await.students.values().cloned().collect()
    }

    /// Makes every following commit fail until reset.
    pub async fn set_fail_on_commit(&self, fail: bool) {
        self.tables.write().await.fail_on_commit = fail;
    }

    /// Removes all students and courses.
    pub async fn clear(&self) {
        *self.tables.write().await = Tables::default();
    }
}

#[async_trait]
impl Database for InMemoryDatabase {
    type UnitOfWork = InMemoryUnitOfWork;

    async fn begin(&self) -> Result<Self::UnitOfWork> {
        Ok(InMemoryUnitOfWork {
            tables: Arc::clone(&self.tables),
            staged: Vec::new(),
        })
    }
}

#[derive(Debug)]
enum Staged {
    Save(StudentRecord),
    Delete(StudentId),
}

/// Unit of work over an [`InMemoryDatabase`].
///
/// Reads observe committed state only.
#[derive(Debug)]
pub struct InMemoryUnitOfWork {
    tables: Arc<RwLock<Tables>>,
    staged: Vec<Staged>,
}

impl InMemoryUnitOfWork {
    /// Returns the number of writes waiting for commit.
    pub fn staged_count(&self) -> usize {
        self.staged.len()
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn student_by_id(&mut self, id: StudentId) -> Result<Option<StudentRecord>> {
        Ok(self.tables.read().await.students.get(&id).cloned())
    }

    async fn all_students(&mut self) -> Result<Vec<StudentRecord>> {
        Ok(self.tables.read().await.students.values().cloned().collect())
    }

    async fn course_by_name(&mut self, name: &str) -> Result<Option<CourseRecord>> {
        Ok(self.tables.read().await.courses.get(name).cloned())
    }

    async fn save_student(&mut self, student: StudentRecord) -> Result<()> {
        validate_student_record(&student)?;
        self.staged.push(Staged::Save(student));
        Ok(())
    }

    async fn delete_student(&mut self, id: StudentId) -> Result<()> {
        self.staged.push(Staged::Delete(id));
        Ok(())
    }

    async fn commit(self) -> Result<CommitSummary> {
        let mut tables = self.tables.write().await;

        if tables.fail_on_commit {
            return Err(StoreError::CommitRejected(
                "commits are disabled".to_string(),
            ));
        }

        // Check every staged write before touching the tables so that a
        // failing write leaves nothing applied.
        let mut live: Vec<StudentId> = tables.students.keys().copied().collect();
        for write in &self.staged {
            match write {
                Staged::Save(StudentRecord { id: Some(id), .. }) if !live.contains(id) => {
                    return Err(StoreError::StudentNotFound(*id));
                }
                Staged::Delete(id) => {
                    let Some(pos) = live.iter().position(|existing| existing == id) else {
                        return Err(StoreError::StudentNotFound(*id));
                    };
                    live.remove(pos);
                }
                Staged::Save(_) => {}
            }
        }

        let mut summary = CommitSummary::default();
        for write in self.staged {
            match write {
                Staged::Save(mut student) => {
                    let id = match student.id {
                        Some(id) => id,
                        None => {
                            tables.last_student_id += 1;
                            StudentId::new(tables.last_student_id)
                        }
                    };
                    student.id = Some(id);
                    tables.students.insert(id, student);
                    summary.saved.push(id);
                }
                Staged::Delete(id) => {
                    tables.students.remove(&id);
                    summary.deleted += 1;
                }
            }
        }

        tracing::debug!(
            saved = summary.saved.len(),
            deleted = summary.deleted,
            "in-memory unit of work committed"
        );
        Ok(summary)
    }
}
