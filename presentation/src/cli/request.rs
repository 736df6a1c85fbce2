//! Building a [`ConsensusRequest`] from command-line input
//!
//! Two sources are accepted: a prompt argument with attachment files, or a
//! JSON request body (the same shape the HTTP surface accepts) read from a
//! file or stdin.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use triplet_domain::{Attachment, ConsensusRequest, ConsensusRequestBody, DomainError, Prompt};

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("No prompt given (pass a question or --request)")]
    NoPrompt,

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid request JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// MIME type from a file extension
pub fn guess_mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "txt" | "md" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Read a file and wrap it as a base64 attachment
pub fn load_attachment(path: &Path) -> Result<Attachment, RequestError> {
    let bytes = std::fs::read(path).map_err(|source| RequestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(Attachment::new(
        name,
        guess_mime_type(path),
        STANDARD.encode(bytes),
    ))
}

/// Parse a JSON request body
pub fn parse_request_body(reader: impl Read) -> Result<ConsensusRequestBody, RequestError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Build the request from a prompt argument and attachment paths
pub fn request_from_args(
    question: Option<&str>,
    attach: &[PathBuf],
    skip_verdict: bool,
) -> Result<ConsensusRequest, RequestError> {
    let question = question.ok_or(RequestError::NoPrompt)?;
    let attachments = attach
        .iter()
        .map(|p| load_attachment(p))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ConsensusRequest::new(Prompt::try_new(question)?)
        .with_attachments(attachments)
        .with_skip_verdict(skip_verdict))
}

/// Build the request from a JSON body at `path` (`-` reads stdin)
///
/// `--skip-verdict` on the command line wins over the body.
pub fn request_from_json(
    path: &Path,
    skip_verdict: bool,
) -> Result<ConsensusRequest, RequestError> {
    let body = if path == Path::new("-") {
        parse_request_body(std::io::stdin().lock())?
    } else {
        let file = std::fs::File::open(path).map_err(|source| RequestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse_request_body(std::io::BufReader::new(file))?
    };

    let request = body.into_request()?;
    Ok(if skip_verdict {
        request.without_verdict()
    } else {
        request
    })
}
