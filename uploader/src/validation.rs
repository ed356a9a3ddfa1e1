//! Client-side validation of a file selection.
//!
//! A file is accepted when its declared MIME type starts with `image/` and
//! its size does not exceed the configured limit. Everything else is
//! rejected with a [`Rejection`] naming the file and the violated rule.
//! A file is never partially accepted.
//!
//! # Example
//!
//! ```rust
//! use pixdrop::{validate_selection, CandidateFile, MAX_FILE_SIZE};
//!
//! let files = vec![
//!     CandidateFile::from_bytes("cat.png", "image/png", vec![0; 16]),
//!     CandidateFile::from_bytes("notes.txt", "text/plain", vec![0; 16]),
//! ];
//! let selection = validate_selection(files, MAX_FILE_SIZE);
//! assert_eq!(selection.accepted.len(), 1);
//! assert_eq!(selection.rejected.len(), 1);
//! ```

use crate::error::Rejection;
use crate::models::CandidateFile;
use crate::notify::{Notification, Notifier};

/// Result of validating a selection.
#[derive(Debug, Clone)]
pub struct Selection<C> {
    /// Files to upload, in selection order
    pub accepted: Vec<CandidateFile<C>>,
    /// One entry per excluded file, in selection order
    pub rejected: Vec<Rejection>,
}

impl<C> Selection<C> {
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    /// Emit one error notification per rejected file.
    pub fn notify_rejections<N: Notifier + ?Sized>(&self, notifier: &N) {
        for rejection in &self.rejected {
            notifier.notify(Notification::error(rejection.to_string()));
        }
    }
}

/// Check a single file.
///
/// Size is checked before type, so a file breaking both rules is reported
/// as oversize.
pub fn check_file<C>(file: &CandidateFile<C>, max_file_size: u64) -> Result<(), Rejection> {
    if file.size > max_file_size {
        return Err(Rejection::Oversize {
            name: file.name.clone(),
            size: file.size,
            limit: max_file_size,
        });
    }
    if !file.is_image() {
        return Err(Rejection::NotAnImage {
            name: file.name.clone(),
            mime_type: file.mime_type.clone(),
        });
    }
    Ok(())
}

/// Partition a raw selection into accepted files and rejections.
pub fn validate_selection<C>(files: Vec<CandidateFile<C>>, max_file_size: u64) -> Selection<C> {
    let mut accepted = Vec::with_capacity(files.len());
    let mut rejected = Vec::new();

    for file in files {
        match check_file(&file, max_file_size) {
            Ok(()) => accepted.push(file),
            Err(rejection) => {
                log::debug!("rejected {}: {}", rejection.file_name(), rejection);
                rejected.push(rejection);
            }
        }
    }

    Selection { accepted, rejected }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_FILE_SIZE;
    use crate::notify::NotificationLog;

    const MIB: u64 = 1024 * 1024;

    fn file(name: &str, size: u64, mime: &str) -> CandidateFile<()> {
        CandidateFile::new(name, size, mime, ())
    }

    #[test]
    fn test_mixed_batch() {
        let files = vec![
            file("file1.png", MIB, "image/png"),
            file("file2.png", 12 * MIB, "image/png"),
            file("file3.txt", 2 * MIB, "text/plain"),
        ];

        let selection = validate_selection(files, MAX_FILE_SIZE);

        assert_eq!(selection.accepted.len(), 1);
        assert_eq!(selection.accepted[0].name, "file1.png");
        assert_eq!(selection.rejected.len(), 2);
        assert!(matches!(selection.rejected[0], Rejection::Oversize { ref name, .. } if name == "file2.png"));
        assert!(matches!(selection.rejected[1], Rejection::NotAnImage { ref name, .. } if name == "file3.txt"));

        let log = NotificationLog::new();
        selection.notify_rejections(&log);
        assert_eq!(log.len(), 2);
        assert!(log.messages()[0].contains("file2.png"));
        assert!(log.messages()[1].contains("file3.txt"));
    }

    #[test]
    fn test_limit_is_inclusive() {
        let selection = validate_selection(vec![file("edge.jpg", MAX_FILE_SIZE, "image/jpeg")], MAX_FILE_SIZE);
        assert_eq!(selection.accepted.len(), 1);

        let selection = validate_selection(vec![file("over.jpg", MAX_FILE_SIZE + 1, "image/jpeg")], MAX_FILE_SIZE);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_empty_selection_emits_nothing() {
        let selection = validate_selection(Vec::<CandidateFile<()>>::new(), MAX_FILE_SIZE);
        let log = NotificationLog::new();
        selection.notify_rejections(&log);

        assert!(selection.is_empty());
        assert!(log.is_empty());
    }

    #[test]
    fn test_both_rules_broken_reports_once() {
        let selection = validate_selection(vec![file("huge.zip", 20 * MIB, "application/zip")], MAX_FILE_SIZE);
        assert_eq!(selection.rejected.len(), 1);
        assert!(matches!(selection.rejected[0], Rejection::Oversize { .. }));
    }

    #[test]
    fn test_missing_mime_is_rejected() {
        let selection = validate_selection(vec![file("mystery", 10, "")], MAX_FILE_SIZE);
        assert!(matches!(selection.rejected[0], Rejection::NotAnImage { .. }));
    }

    #[test]
    fn test_accepted_order_preserved() {
        let files = vec![
            file("a.png", 1, "image/png"),
            file("skip.txt", 1, "text/plain"),
            file("b.gif", 1, "image/gif"),
            file("c.webp", 1, "image/webp"),
        ];
        let selection = validate_selection(files, MAX_FILE_SIZE);
        let names: Vec<_> = selection.accepted.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.gif", "c.webp"]);
    }
}
