#![cfg(feature = "native")]

use bytes::Bytes;
use mockito::Matcher;
use pixdrop::{
    CandidateFile, HttpTransport, JobStatus, NotificationLog, Transport, UploadConfig, UploadError,
    UploadSession, UploadTracker,
};

fn png(name: &str) -> CandidateFile<Bytes> {
    CandidateFile::from_bytes(name, "image/png", Bytes::from_static(b"not really a png"))
}

fn tracker_started() -> UploadTracker {
    let tracker = UploadTracker::new();
    tracker.reset(["cat.png"]);
    tracker.start(0);
    tracker
}

#[tokio::test]
async fn test_sends_multipart_form_with_api_key() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/upload")
        .match_header("x-api-key", "secret")
        .match_header("content-type", Matcher::Regex("^multipart/form-data; boundary=".into()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file"; filename="cat.png""#.into()),
            Matcher::Regex(r#"name="content_type"\r\n\r\nimage/png"#.into()),
            Matcher::Regex(r#"name="optimise"\r\n\r\nfalse"#.into()),
            Matcher::Regex("not really a png".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"file_path": "abc/def.png"}"#)
        .create_async()
        .await;

    let config = UploadConfig::new(format!("{}/upload", server.url()), "secret");
    let transport = HttpTransport::new(&config);
    let tracker = tracker_started();

    let receipt = transport
        .upload(&png("cat.png"), tracker.progress_handle(0))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(receipt.file_path, "abc/def.png");
    assert_eq!(tracker.snapshot().jobs[0].progress, 100.0);
}

#[tokio::test]
async fn test_non_success_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/upload")
        .with_status(413)
        .with_body("too large")
        .create_async()
        .await;

    let config = UploadConfig::new(format!("{}/upload", server.url()), "secret");
    let transport = HttpTransport::new(&config);
    let tracker = tracker_started();

    let err = transport
        .upload(&png("cat.png"), tracker.progress_handle(0))
        .await
        .unwrap_err();

    assert_eq!(err, UploadError::Status(413));
}

#[tokio::test]
async fn test_success_without_file_path() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/upload")
        .with_status(200)
        .with_body(r#"{"ok": true}"#)
        .create_async()
        .await;

    let config = UploadConfig::new(format!("{}/upload", server.url()), "secret");
    let transport = HttpTransport::new(&config);
    let tracker = tracker_started();

    let err = transport
        .upload(&png("cat.png"), tracker.progress_handle(0))
        .await
        .unwrap_err();

    assert!(matches!(err, UploadError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() {
    let config = UploadConfig::new("http://127.0.0.1:1/upload", "secret");
    let transport = HttpTransport::new(&config);
    let tracker = tracker_started();

    let err = transport
        .upload(&png("cat.png"), tracker.progress_handle(0))
        .await
        .unwrap_err();

    assert!(matches!(err, UploadError::Transport(_)));
    assert_eq!(err.notification_text("cat.png"), "Error uploading cat.png");
}

#[tokio::test]
async fn test_session_over_http() {
    let mut server = mockito::Server::new_async().await;
    let _ok = server
        .mock("POST", "/upload")
        .match_body(Matcher::Regex(r#"filename="good.png""#.into()))
        .with_status(200)
        .with_body(r#"{"file_path": "2024/good.png"}"#)
        .create_async()
        .await;
    let _fail = server
        .mock("POST", "/upload")
        .match_body(Matcher::Regex(r#"filename="bad.png""#.into()))
        .with_status(500)
        .create_async()
        .await;

    let config = UploadConfig::new(format!("{}/upload", server.url()), "secret")
        .with_preview_base_url("https://cdn.example.com/");
    let session = UploadSession::new(config.clone(), HttpTransport::new(&config));
    let notes = NotificationLog::new();

    session.select(vec![png("good.png"), png("bad.png")], &notes).unwrap();
    let report = session.upload_all(&notes).await.unwrap();

    assert_eq!(report.succeeded, 1);
    assert_eq!(
        report.jobs[0].preview_url.as_deref(),
        Some("https://cdn.example.com/2024/good.png")
    );
    assert_eq!(report.jobs[1].status, JobStatus::Failed);
    assert_eq!(notes.messages(), vec!["Failed to upload bad.png"]);
}
