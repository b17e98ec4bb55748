//! Async frame I/O.
//!
//! Readers assemble one complete frame from exact-length reads and then hand
//! it to the pure codec, so all validation lives in one place and the stream
//! stays synchronized on the next frame even when a name fails validation.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{LobbyError, ProtocolErrorKind};

use super::codec;

/// Read one request frame and decode it into `(operation name, body)`.
///
/// A clean EOF on the frame boundary maps to `ConnectionClosed`; EOF in the
/// middle of a frame surfaces as an I/O error. A declared body length above
/// `max_body_size` aborts before any body byte is read.
pub async fn read_request<R>(
    reader: &mut R,
    max_body_size: usize,
) -> Result<(String, Vec<u8>), LobbyError>
where
    R: AsyncRead + Unpin,
{
    let mut name_len_buf = [0u8; 1];
    match reader.read_exact(&mut name_len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(LobbyError::Protocol {
                kind: ProtocolErrorKind::ConnectionClosed,
            });
        }
        Err(e) => return Err(LobbyError::Io(e)),
    }

    let name_len = name_len_buf[0] as usize;
    let mut name_buf = vec![0u8; name_len];
    reader.read_exact(&mut name_buf).await?;

    let mut body_len_buf = [0u8; 4];
    reader.read_exact(&mut body_len_buf).await?;
    let body_len = u32::from_be_bytes(body_len_buf) as usize;
    if body_len > max_body_size {
        return Err(LobbyError::Protocol {
            kind: ProtocolErrorKind::BodyTooLarge {
                size: body_len,
                max: max_body_size,
            },
        });
    }

    let mut body = vec![0u8; body_len];
    reader.read_exact(&mut body).await?;

    let mut frame = Vec::with_capacity(1 + name_len + 4 + body_len);
    frame.push(name_len_buf[0]);
    frame.extend_from_slice(&name_buf);
    frame.extend_from_slice(&body_len_buf);
    frame.extend_from_slice(&body);
    Ok(codec::decode_request(&frame)?)
}

/// Encode and write one request frame.
pub async fn write_request<W>(writer: &mut W, name: &str, body: &[u8]) -> Result<(), LobbyError>
where
    W: AsyncWrite + Unpin,
{
    let frame = codec::encode_request(name, body)?;
    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one response frame and decode it into `(status, body)`.
pub async fn read_response<R>(reader: &mut R) -> Result<(u8, Vec<u8>), LobbyError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; codec::MIN_FRAME_LEN];
    match reader.read_exact(&mut header).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(LobbyError::Protocol {
                kind: ProtocolErrorKind::ConnectionClosed,
            });
        }
        Err(e) => return Err(LobbyError::Io(e)),
    }

    let mut body_len_buf = [0u8; 4];
    body_len_buf.copy_from_slice(&header[1..codec::MIN_FRAME_LEN]);
    let body_len = u32::from_be_bytes(body_len_buf) as usize;

    let mut body = vec![0u8; body_len];
    reader.read_exact(&mut body).await?;

    let mut frame = Vec::with_capacity(codec::MIN_FRAME_LEN + body_len);
    frame.extend_from_slice(&header);
    frame.extend_from_slice(&body);
    Ok(codec::decode_response(&frame)?)
}

/// Encode and write one response frame.
pub async fn write_response<W>(writer: &mut W, status: u8, body: &[u8]) -> Result<(), LobbyError>
where
    W: AsyncWrite + Unpin,
{
    let frame = codec::encode_response(status, body)?;
    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}
