mod common;

use common::{config, image, ok, Script, ScriptedTransport};
use pixdrop::session::SELECTION_LOCKED;
use pixdrop::{
    BatchError, CandidateFile, JobStatus, Level, NotificationLog, Rejection, SchedulePolicy,
    UploadSession,
};
use std::time::Duration;

const MIB: u64 = 1024 * 1024;

fn session() -> UploadSession<ScriptedTransport> {
    UploadSession::new(config(), ScriptedTransport::default())
}

#[tokio::test]
async fn test_empty_selection_makes_no_request() {
    let session = session();
    let notes = NotificationLog::new();

    session.select(Vec::new(), &notes).unwrap();
    assert!(notes.is_empty());

    let result = session.upload_all(&notes).await;

    assert_eq!(result, Err(BatchError::EmptySelection));
    assert_eq!(notes.messages(), vec!["No valid files selected."]);
    assert_eq!(notes.entries()[0].level, Level::Error);
    assert!(session.transport().events().is_empty());
    assert!(!session.is_running());
}

#[tokio::test]
async fn test_upload_before_any_selection() {
    let session = session();
    let notes = NotificationLog::new();

    assert_eq!(session.upload_all(&notes).await, Err(BatchError::EmptySelection));
    assert_eq!(notes.len(), 1);
}

#[tokio::test]
async fn test_mixed_selection_then_upload() {
    let session = session();
    let notes = NotificationLog::new();
    assert_eq!(session.headline(), "File Uploader");

    let rejects = session.select(
        vec![
            CandidateFile::new("file1.png", MIB, "image/png", ok("u/file1.png", 1)),
            CandidateFile::new("file2.png", 12 * MIB, "image/png", ok("u/file2.png", 1)),
            CandidateFile::new("file3.txt", 2 * MIB, "text/plain", ok("u/file3.txt", 1)),
        ],
        &notes,
    )
    .unwrap();

    assert_eq!(rejects.len(), 2);
    assert!(matches!(rejects[0], Rejection::Oversize { .. }));
    assert!(matches!(rejects[1], Rejection::NotAnImage { .. }));
    assert_eq!(notes.len(), 2);
    assert_eq!(session.selected(), Some(1));
    assert_eq!(session.headline(), "Uploading 0 of 1 Files");

    let report = session.upload_all(&notes).await.unwrap();

    assert_eq!(report.total, 1);
    assert_eq!(report.succeeded, 1);
    assert_eq!(
        report.jobs[0].preview_url.as_deref(),
        Some("https://static.ordbit.io/u/file1.png")
    );
    assert_eq!(session.headline(), "Uploading 1 of 1 Files");
    assert_eq!(notes.len(), 2);
}

#[tokio::test]
async fn test_new_selection_replaces_previous() {
    let session = session();
    let notes = NotificationLog::new();

    session.select(
        vec![image("a.png", ok("a", 1)), image("b.png", ok("b", 1))],
        &notes,
    )
    .unwrap();
    assert_eq!(session.selected_names(), vec!["a.png", "b.png"]);

    session.select(vec![image("c.png", ok("c", 1))], &notes).unwrap();
    assert_eq!(session.selected_names(), vec!["c.png"]);
    assert_eq!(session.tracker().snapshot().total, 1);

    let report = session.upload_all(&notes).await.unwrap();
    assert_eq!(report.total, 1);
    assert_eq!(report.jobs[0].name, "c.png");
}

#[tokio::test]
async fn test_second_batch_refused_while_running() {
    let session = session();
    let notes = NotificationLog::new();
    session.select(vec![image("slow.png", ok("slow", 30))], &notes).unwrap();

    let (first, second) = futures::join!(session.upload_all(&notes), session.upload_all(&notes));

    assert!(first.is_ok());
    assert_eq!(second, Err(BatchError::AlreadyRunning));
    assert!(!session.is_running());
    assert_eq!(session.transport().events().len(), 2);
}

#[tokio::test]
async fn test_batch_resets_counters() {
    let session = session();
    let notes = NotificationLog::new();
    session.select(
        vec![
            image("a.png", ok("a", 1)),
            image("b.png", Script::Status { code: 502, delay_ms: 1 }),
        ],
        &notes,
    )
    .unwrap();

    let first = session.upload_all(&notes).await.unwrap();
    assert_eq!(first.succeeded, 1);

    let second = session.upload_all(&notes).await.unwrap();
    assert_eq!(second.succeeded, 1);
    assert_eq!(session.tracker().snapshot().succeeded, 1);
    assert_eq!(notes.messages(), vec!["Failed to upload b.png", "Failed to upload b.png"]);
}

#[tokio::test]
async fn test_selection_frozen_while_batch_runs() {
    let session = UploadSession::new(
        config().with_policy(SchedulePolicy::Sequential),
        ScriptedTransport::default(),
    );
    let notes = NotificationLog::new();
    session
        .select(
            vec![image("old0.png", ok("old/0.png", 40)), image("old1.png", ok("old/1.png", 40))],
            &notes,
        )
        .unwrap();

    let reselect = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        session.select(
            vec![image("new0.png", ok("new/0.png", 1)), image("new1.png", ok("new/1.png", 1))],
            &notes,
        )
    };
    let (report, refused) = futures::join!(session.upload_all(&notes), reselect);

    assert_eq!(refused, Err(BatchError::AlreadyRunning));
    assert_eq!(notes.messages(), vec![SELECTION_LOCKED]);
    assert_eq!(notes.entries()[0].level, Level::Warning);

    let report = report.unwrap();
    assert_eq!(report.succeeded, 2);

    let snapshot = session.tracker().snapshot();
    let names: Vec<_> = snapshot.jobs.iter().map(|j| j.name.as_str()).collect();
    assert_eq!(names, vec!["old0.png", "old1.png"]);
    assert_eq!(snapshot.succeeded, snapshot.count(JobStatus::Succeeded));
    assert_eq!(
        snapshot.job(1).and_then(|j| j.preview_url.as_deref()),
        Some("https://static.ordbit.io/old/1.png")
    );
    assert_eq!(session.selected_names(), vec!["old0.png", "old1.png"]);

    // Once idle, picking files works again.
    session
        .select(vec![image("new0.png", ok("new/0.png", 1))], &notes)
        .unwrap();
    assert_eq!(session.selected_names(), vec!["new0.png"]);
    assert_eq!(session.tracker().snapshot().count(JobStatus::Pending), 1);
}
