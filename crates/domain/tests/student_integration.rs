//! Integration tests for the student handlers.
//!
//! Every test goes through the dispatcher over an in-memory database, so
//! lookups, staging and commit behave the way the HTTP layer sees them.

use common::StudentId;
use domain::{
    CommandError, DisenrollCommand, EditPersonalInfoCommand, EnrollCommand, EnrollmentNumber,
    GetListQuery, Messages, RegisterCommand, TransferCommand, UnregisterCommand,
};
use student_store::InMemoryDatabase;

/// Helper to create a dispatcher over a database with a small catalog
async fn setup() -> (Messages, InMemoryDatabase) {
    let db = InMemoryDatabase::with_courses([
        ("Calculus", 3),
        ("Chemistry", 3),
        ("Literature", 4),
        ("CS101", 5),
    ])
    .await;
    let messages = Messages::for_students(db.clone()).unwrap();
    (messages, db)
}

fn register(name: &str, courses: &[(&str, &str)]) -> RegisterCommand {
    let course = |i: usize| courses.get(i).map(|(c, _)| c.to_string());
    let grade = |i: usize| courses.get(i).map(|(_, g)| g.to_string());
    RegisterCommand::new(
        name,
        format!("{}@example.com", name.to_lowercase()),
        course(0),
        grade(0),
        course(1),
        grade(1),
    )
}

fn first_id() -> StudentId {
    StudentId::new(1)
}

mod register {
    use super::*;

    #[tokio::test]
    async fn registers_student_with_two_courses() {
        let (messages, db) = setup().await;

        messages
            .dispatch(register("Alice", &[("Calculus", "A"), ("Chemistry", "b")]))
            .await
            .unwrap();

        let students = db.students().await;
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].id, Some(first_id()));
        assert_eq!(students[0].enrollments.len(), 2);
        assert_eq!(students[0].enrollments[0].course.name, "Calculus");
        assert_eq!(students[0].enrollments[1].grade, "B");
    }

    #[tokio::test]
    async fn course_without_grade_is_skipped() {
        let (messages, db) = setup().await;

        let cmd = RegisterCommand::new(
            "Alice",
            "alice@example.com",
            Some("Calculus".to_string()),
            None,
            None,
            None,
        );
        messages.dispatch(cmd).await.unwrap();

        assert!(db.students().await[0].enrollments.is_empty());
    }

    #[tokio::test]
    async fn unknown_second_course_persists_nothing() {
        let (messages, db) = setup().await;

        let result = messages
            .dispatch(RegisterCommand::new(
                "Alice",
                "a@x.com",
                Some("CS101".to_string()),
                Some("A".to_string()),
                Some("BAD101".to_string()),
                Some("Z".to_string()),
            ))
            .await;

        assert_eq!(
            result,
            Err(CommandError::NotFound(
                "Course is incorrect: 'BAD101'".to_string()
            ))
        );
        assert_eq!(db.student_count().await, 0);
    }

    #[tokio::test]
    async fn bad_grade_persists_nothing() {
        let (messages, db) = setup().await;

        let err = messages
            .dispatch(register("Alice", &[("Calculus", "Z")]))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "validation");
        assert_eq!(err.message(), "Grade is incorrect: 'Z'");
        assert_eq!(db.student_count().await, 0);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let (messages, db) = setup().await;

        let err = messages
            .dispatch(RegisterCommand::without_courses("  ", "alice@example.com"))
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Name is required");
        assert_eq!(db.student_count().await, 0);
    }

    #[tokio::test]
    async fn commit_failure_is_a_storage_error() {
        let (messages, db) = setup().await;
        db.set_fail_on_commit(true).await;

        let err = messages
            .dispatch(register("Alice", &[("Calculus", "A")]))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "storage");
        assert_eq!(db.student_count().await, 0);

        db.set_fail_on_commit(false).await;
        messages
            .dispatch(register("Alice", &[("Calculus", "A")]))
            .await
            .unwrap();
        assert_eq!(db.student_count().await, 1);
    }
}

mod unregister {
    use super::*;

    #[tokio::test]
    async fn removes_student_and_enrollments() {
        let (messages, db) = setup().await;
        messages
            .dispatch(register("Alice", &[("Calculus", "A")]))
            .await
            .unwrap();
        messages
            .dispatch(register("Bob", &[]))
            .await
            .unwrap();

        messages
            .dispatch(UnregisterCommand::new(first_id()))
            .await
            .unwrap();

        let students = db.students().await;
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].name, "Bob");
    }

    #[tokio::test]
    async fn unknown_student_is_not_found() {
        let (messages, _) = setup().await;

        let result = messages
            .dispatch(UnregisterCommand::new(StudentId::new(42)))
            .await;

        assert_eq!(
            result,
            Err(CommandError::NotFound(
                "No student found for Id 42".to_string()
            ))
        );
    }
}

mod personal_info {
    use super::*;

    #[tokio::test]
    async fn edit_replaces_name_and_email() {
        let (messages, db) = setup().await;
        messages.dispatch(register("Alice", &[])).await.unwrap();

        messages
            .dispatch(EditPersonalInfoCommand::new(
                first_id(),
                "Alice Smith",
                "alice.smith@example.com",
            ))
            .await
            .unwrap();

        let students = db.students().await;
        let student = &students[0];
        assert_eq!(student.name, "Alice Smith");
        assert_eq!(student.email, "alice.smith@example.com");
    }

    #[tokio::test]
    async fn blank_email_leaves_student_unchanged() {
        let (messages, db) = setup().await;
        messages.dispatch(register("Alice", &[])).await.unwrap();

        let err = messages
            .dispatch(EditPersonalInfoCommand::new(first_id(), "Alice", ""))
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Email is required");
        assert_eq!(db.students().await[0].email, "alice@example.com");
    }

    #[tokio::test]
    async fn unknown_student_is_not_found() {
        let (messages, _) = setup().await;

        let err = messages
            .dispatch(EditPersonalInfoCommand::new(
                StudentId::new(7),
                "Alice",
                "alice@example.com",
            ))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "not_found");
    }
}

mod enrollments {
    use super::*;

    async fn enrolled_in_three() -> (Messages, InMemoryDatabase) {
        let (messages, db) = setup().await;
        messages
            .dispatch(register("Alice", &[("Calculus", "A"), ("Chemistry", "B")]))
            .await
            .unwrap();
        messages
            .dispatch(EnrollCommand::new(first_id(), "Literature", "C"))
            .await
            .unwrap();
        (messages, db)
    }

    #[tokio::test]
    async fn enrollments_are_numbered_in_order() {
        let (messages, _) = enrolled_in_three().await;

        let students = messages.dispatch(GetListQuery::all()).await.unwrap();
        let numbered: Vec<(usize, &str)> = students[0]
            .enrollments
            .iter()
            .map(|e| (e.number.get(), e.course.as_str()))
            .collect();

        assert_eq!(
            numbered,
            vec![(1, "Calculus"), (2, "Chemistry"), (3, "Literature")]
        );
    }

    #[tokio::test]
    async fn enroll_rejects_unknown_course() {
        let (messages, _) = setup().await;
        messages.dispatch(register("Alice", &[])).await.unwrap();

        let err = messages
            .dispatch(EnrollCommand::new(first_id(), "Alchemy", "A"))
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Course is incorrect: 'Alchemy'");
    }

    #[tokio::test]
    async fn disenroll_renumbers_remaining() {
        let (messages, db) = enrolled_in_three().await;

        messages
            .dispatch(DisenrollCommand::new(first_id(), 2, "Schedule conflict"))
            .await
            .unwrap();

        let students = messages.dispatch(GetListQuery::all()).await.unwrap();
        let remaining = &students[0].enrollments;
        assert_eq!(remaining.len(), 2);
        assert_eq!(remaining[0].number, EnrollmentNumber::new(1));
        assert_eq!(remaining[0].course, "Calculus");
        assert_eq!(remaining[1].number, EnrollmentNumber::new(2));
        assert_eq!(remaining[1].course, "Literature");

        let students = db.students().await;
        let record = &students[0];
        assert_eq!(record.disenrollments.len(), 1);
        assert_eq!(record.disenrollments[0].course.name, "Chemistry");
        assert_eq!(record.disenrollments[0].comment, "Schedule conflict");
    }

    #[tokio::test]
    async fn disenroll_without_comment_changes_nothing() {
        let (messages, db) = enrolled_in_three().await;

        let err = messages
            .dispatch(DisenrollCommand::new(first_id(), 1, "   "))
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Disenrollment comment is required");
        let students = db.students().await;
        let record = &students[0];
        assert_eq!(record.enrollments.len(), 3);
        assert!(record.disenrollments.is_empty());
    }

    #[tokio::test]
    async fn disenroll_unknown_number_is_not_found() {
        let (messages, _) = enrolled_in_three().await;

        let err = messages
            .dispatch(DisenrollCommand::new(first_id(), 4, "Dropped"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CommandError::NotFound("No enrollment found with number '4'".to_string())
        );
    }

    #[tokio::test]
    async fn transfer_keeps_numbers() {
        let (messages, _) = enrolled_in_three().await;

        messages
            .dispatch(TransferCommand::new(first_id(), 2, "CS101", "a"))
            .await
            .unwrap();

        let students = messages.dispatch(GetListQuery::all()).await.unwrap();
        let enrollments = &students[0].enrollments;
        assert_eq!(enrollments.len(), 3);
        assert_eq!(enrollments[1].number, EnrollmentNumber::new(2));
        assert_eq!(enrollments[1].course, "CS101");
        assert_eq!(enrollments[1].grade, "A");
        assert_eq!(enrollments[1].credits, 5);
        assert_eq!(enrollments[0].course, "Calculus");
        assert_eq!(enrollments[2].course, "Literature");
    }

    #[tokio::test]
    async fn transfer_unknown_number_is_not_found() {
        let (messages, _) = enrolled_in_three().await;

        let err = messages
            .dispatch(TransferCommand::new(first_id(), 0, "CS101", "A"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "not_found");
    }
}

mod get_list {
    use super::*;

    async fn three_students() -> Messages {
        let (messages, _) = setup().await;
        messages
            .dispatch(register("Alice", &[("Calculus", "A")]))
            .await
            .unwrap();
        messages
            .dispatch(register("Bob", &[("Calculus", "B"), ("Chemistry", "C")]))
            .await
            .unwrap();
        messages.dispatch(register("Carol", &[])).await.unwrap();
        messages
    }

    #[tokio::test]
    async fn unfiltered_list_is_stable() {
        let messages = three_students().await;

        let first = messages.dispatch(GetListQuery::all()).await.unwrap();
        let second = messages.dispatch(GetListQuery::all()).await.unwrap();

        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
        let names: Vec<&str> = first.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
    }

    #[tokio::test]
    async fn filters_by_course_and_count() {
        let messages = three_students().await;

        let in_calculus = messages
            .dispatch(GetListQuery::new(Some("Calculus".to_string()), None))
            .await
            .unwrap();
        assert_eq!(in_calculus.len(), 2);

        let with_none = messages
            .dispatch(GetListQuery::new(None, Some(0)))
            .await
            .unwrap();
        assert_eq!(with_none.len(), 1);
        assert_eq!(with_none[0].name, "Carol");

        let both = messages
            .dispatch(GetListQuery::new(Some("Calculus".to_string()), Some(2)))
            .await
            .unwrap();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].name, "Bob");
    }
}
