//! Messages exchanged with the browser extension.
//!
//! Framing follows browser native messaging: a 32-bit little-endian length
//! followed by that many bytes of UTF-8 JSON.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::{config::RoutingConfig, destination::Destination, interceptor::NavigationEvent};

/// Largest frame accepted or produced
pub const MAX_MESSAGE_BYTES: usize = 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("message of {0} bytes exceeds the {MAX_MESSAGE_BYTES} byte limit")]
    TooLarge(usize),
    #[error("invalid message: {0}")]
    Json(#[from] serde_json::Error),
}

/// Message from the extension to the host
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InboundMessage {
    /// Settings surface picked another destination
    UpdateDestination { value: String },
    /// Settings surface switched routing on or off
    ToggleRouting { value: bool },
    /// A navigation is about to happen
    Navigate(NavigationEvent),
    GetStats,
    GetConfig,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Typed replies, tagged by `kind`
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Reply {
    Redirect {
        #[serde(rename = "tabId", skip_serializing_if = "Option::is_none")]
        tab_id: Option<i64>,
        destination: Destination,
        url: String,
    },
    Proceed,
    Stats {
        #[serde(rename = "usageCounters")]
        usage_counters: BTreeMap<String, u64>,
    },
    Config(RoutingConfig),
}

/// Message from the host to the extension
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum OutboundMessage {
    /// `{ "status": "success" }` acknowledgement, or an error with a message
    Ack {
        status: Status,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Reply(Reply),
}

impl OutboundMessage {
    #[must_use]
    pub fn success() -> Self {
        Self::Ack {
            status: Status::Success,
            message: None,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Ack {
            status: Status::Error,
            message: Some(message.into()),
        }
    }
}

impl From<Reply> for OutboundMessage {
    fn from(reply: Reply) -> Self {
        Self::Reply(reply)
    }
}

/// Serialize `message` into one length-prefixed frame
///
/// # Errors
///
/// Returns an error if serialization fails or the frame is too large
pub fn encode_frame<T: Serialize>(message: &T) -> Result<Vec<u8>, FrameError> {
    let body = serde_json::to_vec(message)?;
    let len = u32::try_from(body.len())
        .ok()
        .filter(|_| body.len() <= MAX_MESSAGE_BYTES)
        .ok_or(FrameError::TooLarge(body.len()))?;

    let mut frame = Vec::with_capacity(body.len() + 4);
    frame.extend_from_slice(&len.to_le_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

/// Decode a frame body
///
/// # Errors
///
/// Returns [`FrameError::Json`] if the body is not a valid message
pub fn decode_message<T: DeserializeOwned>(body: &[u8]) -> Result<T, FrameError> {
    Ok(serde_json::from_slice(body)?)
}

/// Read one frame body; `None` on a clean end of input
///
/// # Errors
///
/// Returns an error on IO failure, truncated frames or oversized lengths
pub async fn read_frame<R>(reader: &mut R) -> Result<Option<Vec<u8>>, FrameError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; 4];
    let mut filled = 0;
    while filled < header.len() {
        let n = reader.read(&mut header[filled..]).await?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "input ended inside a frame header",
            )
            .into());
        }
        filled += n;
    }
    let len = u32::from_le_bytes(header) as usize;

    if len > MAX_MESSAGE_BYTES {
        return Err(FrameError::TooLarge(len));
    }

    let mut body = vec![0; len];
    reader.read_exact(&mut body).await?;
    Ok(Some(body))
}

/// Write `message` as one frame and flush
///
/// # Errors
///
/// Returns an error if encoding or writing fails
pub async fn write_message<W, T>(writer: &mut W, message: &T) -> Result<(), FrameError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let frame = encode_frame(message)?;
    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}
