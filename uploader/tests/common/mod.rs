//! In-memory transport whose behaviour is carried by each file's content.

#![allow(dead_code)]

use pixdrop::{
    parse_response, CandidateFile, ProgressHandle, Transport, UploadConfig, UploadError,
    UploadReceipt, UploadResult,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// What the fake endpoint does with one file.
#[derive(Debug, Clone)]
pub enum Script {
    /// Report half, wait, report all, return `file_path`.
    Succeed { file_path: &'static str, delay_ms: u64 },
    /// Wait, then answer with a non-success status.
    Status { code: u16, delay_ms: u64 },
    /// Report `after_percent`, wait, then drop the connection.
    Drop { after_percent: u64, delay_ms: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Started(usize),
    Finished(usize),
}

#[derive(Default)]
pub struct ScriptedTransport {
    events: Mutex<Vec<Event>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedTransport {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl Transport for ScriptedTransport {
    type Content = Script;

    async fn upload(
        &self,
        file: &CandidateFile<Script>,
        progress: ProgressHandle,
    ) -> UploadResult<UploadReceipt> {
        let index = progress.index();
        self.record(Event::Started(index));
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let result = match &file.content {
            Script::Succeed { file_path, delay_ms } => {
                progress.report(file.size / 2, file.size);
                tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                progress.report(file.size, file.size);
                Ok(UploadReceipt {
                    file_path: file_path.to_string(),
                })
            }
            Script::Status { code, delay_ms } => {
                tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                parse_response(*code, "")
            }
            Script::Drop {
                after_percent,
                delay_ms,
            } => {
                progress.report(*after_percent, 100);
                tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                Err(UploadError::Transport("connection reset by peer".into()))
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.record(Event::Finished(index));
        result
    }
}

pub fn image(name: &str, script: Script) -> CandidateFile<Script> {
    CandidateFile::new(name, 1000, "image/png", script)
}

pub fn ok(file_path: &'static str, delay_ms: u64) -> Script {
    Script::Succeed { file_path, delay_ms }
}

pub fn config() -> UploadConfig {
    UploadConfig::new("https://uploads.example.com/api/upload", "test-key")
}
