//! The network seam between the scheduler and an upload endpoint.
//!
//! Every transport sends the same multipart form:
//!
//! | Field          | Value                                   |
//! |----------------|-----------------------------------------|
//! | `file`         | binary content, with file name and type |
//! | `content_type` | declared MIME type                      |
//! | `optimise`     | `"false"`                               |
//!
//! with the API key in an `X-API-Key` header. A 2xx answer carrying
//! `{"file_path": "..."}` is a success.
//!
//! # Implementations
//!
//! - [`http::HttpTransport`] - reqwest, native only (`native` feature)
//! - the frontend's `XhrTransport` - `XMLHttpRequest` in the browser

use serde::Deserialize;

use crate::error::{UploadError, UploadResult};
use crate::models::CandidateFile;
use crate::state::ProgressHandle;

#[cfg(feature = "native")]
pub mod http;

/// Form field holding the file bytes.
pub const FIELD_FILE: &str = "file";

/// Form field holding the declared MIME type.
pub const FIELD_CONTENT_TYPE: &str = "content_type";

/// Form field asking the server not to re-encode the image.
pub const FIELD_OPTIMISE: &str = "optimise";

/// Value sent in [`FIELD_OPTIMISE`].
pub const OPTIMISE_VALUE: &str = "false";

/// What the endpoint returns for a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadReceipt {
    /// Server-assigned storage path, relative to the preview host
    pub file_path: String,
}

/// Sends one file and reports its progress.
///
/// Futures returned by `upload` are polled on the scheduler's task and are
/// not required to be `Send`, which keeps browser transports possible.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// File content this transport knows how to send.
    type Content;

    /// Upload a single file. Progress goes through `progress`; the result
    /// says whether the endpoint accepted it.
    async fn upload(
        &self,
        file: &CandidateFile<Self::Content>,
        progress: ProgressHandle,
    ) -> UploadResult<UploadReceipt>;
}

/// True for any 2xx status.
pub fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Turn a raw response into a receipt.
pub fn parse_response(status: u16, body: &str) -> UploadResult<UploadReceipt> {
    if !is_success_status(status) {
        return Err(UploadError::Status(status));
    }
    serde_json::from_str(body).map_err(|e| UploadError::InvalidResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success() {
        let receipt = parse_response(200, r#"{"file_path": "abc/def.png", "size": 12}"#).unwrap();
        assert_eq!(receipt.file_path, "abc/def.png");

        let receipt = parse_response(201, r#"{"file_path": "x.png"}"#).unwrap();
        assert_eq!(receipt.file_path, "x.png");
    }

    #[test]
    fn test_parse_non_success_status() {
        assert_eq!(
            parse_response(413, r#"{"file_path": "x"}"#),
            Err(UploadError::Status(413))
        );
        assert_eq!(parse_response(302, ""), Err(UploadError::Status(302)));
    }

    #[test]
    fn test_parse_bad_body() {
        assert!(matches!(
            parse_response(200, "<html>ok</html>"),
            Err(UploadError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_response(200, r#"{"path": "x"}"#),
            Err(UploadError::InvalidResponse(_))
        ));
    }
}
