//! Length-prefixed framing.
//!
//! Every frame on the wire, in both directions, is a 4-byte big-endian
//! length followed by exactly that many payload bytes:
//!
//! ```text
//! +----------------+---------------------------+
//! | len: u32 (BE)  | payload: [u8; len]        |
//! +----------------+---------------------------+
//! ```
//!
//! A stream that ends cleanly between two frames reads as `Ok(None)`. A
//! stream that ends inside a header or a payload is an error.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::TransportError;

/// Size of the length header in bytes.
pub const HEADER_LEN: usize = 4;

/// Default upper bound for an incoming frame's payload.
pub const DEFAULT_MAX_FRAME_LEN: usize = 1024;

/// Reads one frame from `reader`.
///
/// Returns `Ok(None)` if the stream is at EOF before the first header byte.
///
/// # Errors
/// - [`TransportError::FrameTooLarge`] if the announced length exceeds
///   `max_len`. The payload is not consumed.
/// - [`TransportError::ReceiveFailed`] on I/O errors or truncated frames.
pub async fn read_frame<R>(
    reader: &mut R,
    max_len: usize,
) -> Result<Option<Vec<u8>>, TransportError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; HEADER_LEN];
    let mut filled = 0;
    while filled < HEADER_LEN {
        let n = reader
            .read(&mut header[filled..])
            .await
            .map_err(TransportError::ReceiveFailed)?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(TransportError::ReceiveFailed(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "stream ended inside a frame header",
            )));
        }
        filled += n;
    }

    let len = u32::from_be_bytes(header) as usize;
    if len > max_len {
        return Err(TransportError::FrameTooLarge { len, max: max_len });
    }

    let mut payload = vec![0u8; len];
    reader
        .read_exact(&mut payload)
        .await
        .map_err(TransportError::ReceiveFailed)?;
    Ok(Some(payload))
}

/// Writes `payload` as one frame and flushes the writer.
///
/// # Errors
/// Returns [`TransportError::SendFailed`] on I/O errors, or if the payload
/// does not fit in a `u32` length.
pub async fn write_frame<W>(
    writer: &mut W,
    payload: &[u8],
) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
{
    let len = u32::try_from(payload.len()).map_err(|_| {
        TransportError::SendFailed(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "payload longer than u32::MAX",
        ))
    })?;

    // One buffer so header and payload leave in a single write.
    let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(payload);

    writer
        .write_all(&buf)
        .await
        .map_err(TransportError::SendFailed)?;
    writer.flush().await.map_err(TransportError::SendFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_frame_after_write_frame_returns_payload() {
        let (mut a, mut b) = tokio::io::duplex(256);
        write_frame(&mut a, b"MOVE UP").await.unwrap();
        write_frame(&mut a, b"").await.unwrap();

        let first = read_frame(&mut b, 64).await.unwrap();
        assert_eq!(first.as_deref(), Some(&b"MOVE UP"[..]));
        let second = read_frame(&mut b, 64).await.unwrap();
        assert_eq!(second.as_deref(), Some(&b""[..]));
    }

    #[tokio::test]
    async fn test_write_frame_emits_big_endian_header() {
        let mut out: Vec<u8> = Vec::new();
        write_frame(&mut out, b"ATTACK").await.unwrap();
        assert_eq!(&out[..4], &[0, 0, 0, 6]);
        assert_eq!(&out[4..], b"ATTACK");
    }

    #[tokio::test]
    async fn test_read_frame_clean_eof_returns_none() {
        let (a, mut b) = tokio::io::duplex(64);
        drop(a);
        assert!(read_frame(&mut b, 64).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_frame_eof_inside_header_is_error() {
        let mut data: &[u8] = &[0, 0];
        let result = read_frame(&mut data, 64).await;
        assert!(matches!(result, Err(TransportError::ReceiveFailed(_))));
    }

    #[tokio::test]
    async fn test_read_frame_eof_inside_payload_is_error() {
        let mut data: &[u8] = &[0, 0, 0, 5, b'M', b'S'];
        let result = read_frame(&mut data, 64).await;
        assert!(matches!(result, Err(TransportError::ReceiveFailed(_))));
    }

    #[tokio::test]
    async fn test_read_frame_oversized_is_rejected() {
        let mut data: &[u8] = &[0, 0, 4, 1];
        let result = read_frame(&mut data, 1024).await;
        assert!(matches!(
            result,
            Err(TransportError::FrameTooLarge { len: 1025, max: 1024 })
        ));
    }
}
