//! Server-sent-event framing for streaming runs
//!
//! Each [`ConsensusEvent`] becomes one `data: <json>\n\n` frame. Frames are
//! written in event order and each one parses on its own.

use crate::output::verdict::VerdictRenderer;
use serde_json::{Value, json};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;
use triplet_application::ConsensusStream;
use triplet_domain::{ConsensusEvent, ProviderId};

pub struct StreamMultiplexer;

impl StreamMultiplexer {
    /// JSON payload of one event
    pub fn payload(event: &ConsensusEvent) -> Value {
        match event {
            ConsensusEvent::Provider(result) if result.is_error() => json!({
                "model": result.provider_id().as_str(),
                "response": result.text(),
                "error": true,
            }),
            ConsensusEvent::Provider(result) => json!({
                "model": result.provider_id().as_str(),
                "response": result.text(),
                "elapsed": result.elapsed_seconds(),
            }),
            ConsensusEvent::Verdict(report) => json!({
                "model": ProviderId::VERDICT,
                "response": VerdictRenderer::render(report),
            }),
            ConsensusEvent::Error(message) => json!({ "error": message }),
            ConsensusEvent::Done => json!({ "done": true }),
        }
    }

    /// One complete frame
    pub fn frame(event: &ConsensusEvent) -> String {
        format!("data: {}\n\n", Self::payload(event))
    }

    /// Write every event of `stream` to `writer`, flushing after each frame.
    ///
    /// Stops at the first write error; dropping the stream then cancels
    /// delivery for the rest of the run. Returns the number of frames written.
    pub async fn pump<W>(mut stream: ConsensusStream, mut writer: W) -> std::io::Result<usize>
    where
        W: AsyncWrite + Unpin,
    {
        let mut written = 0;
        while let Some(event) = stream.next().await {
            let frame = Self::frame(&event);
            writer.write_all(frame.as_bytes()).await?;
            writer.flush().await?;
            written += 1;

            if event.is_done() {
                break;
            }
        }
        debug!("Stream finished after {} frames", written);
        Ok(written)
    }
}
