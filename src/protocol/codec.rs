//! Pure frame codec.
//!
//! Encodes and decodes the two frame layouts without touching I/O:
//!
//! ```text
//! request:  [len(name): u8][name][len(body): u32 BE][body]
//! response: [status: u8][len(body): u32 BE][body]
//! ```
//!
//! Bodies are opaque payload; there is no escaping, so any byte sequence
//! round-trips unchanged.

use thiserror::Error;

/// Smallest possible frame: a 1-byte prefix plus a 4-byte body length.
pub const MIN_FRAME_LEN: usize = 5;

/// Failures while building a frame.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Operation name too long: {len} bytes exceeds 255")]
    NameTooLong { len: usize },

    #[error("Body too large: {len} bytes does not fit a u32 length prefix")]
    BodyTooLarge { len: usize },
}

/// Failures while parsing a frame.
///
/// Length problems and name problems are separate variants so the server can
/// log what actually went wrong; on the wire they all become status 255.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FrameError {
    #[error("Frame truncated: {len} bytes is shorter than the declared layout")]
    Truncated { len: usize },

    #[error("Operation name is not ASCII")]
    NameNotAscii,

    #[error("Invalid operation name: {name:?}")]
    InvalidName { name: String },
}

/// Whether `name` is a well-formed operation name: a namespace and a verb of
/// lowercase alphanumerics/underscores, separated by a single colon.
pub fn is_valid_operation_name(name: &str) -> bool {
    let mut parts = name.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(namespace), Some(verb), None) => is_token(namespace) && is_token(verb),
        _ => false,
    }
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

/// Encode a request frame.
pub fn encode_request(name: &str, body: &[u8]) -> Result<Vec<u8>, EncodeError> {
    if name.len() > u8::MAX as usize {
        return Err(EncodeError::NameTooLong { len: name.len() });
    }
    if body.len() > u32::MAX as usize {
        return Err(EncodeError::BodyTooLarge { len: body.len() });
    }

    let mut frame = Vec::with_capacity(1 + name.len() + 4 + body.len());
    frame.push(name.len() as u8);
    frame.extend_from_slice(name.as_bytes());
    frame.extend_from_slice(&(body.len() as u32).to_be_bytes());
    frame.extend_from_slice(body);
    Ok(frame)
}

/// Decode a request frame into `(operation name, body)`.
///
/// Bytes past the declared body length are ignored.
pub fn decode_request(data: &[u8]) -> Result<(String, Vec<u8>), FrameError> {
    if data.len() < MIN_FRAME_LEN {
        return Err(FrameError::Truncated { len: data.len() });
    }

    let name_len = data[0] as usize;
    let body_len_end = 1 + name_len + 4;
    if data.len() < body_len_end {
        return Err(FrameError::Truncated { len: data.len() });
    }

    let name_bytes = &data[1..1 + name_len];
    if !name_bytes.is_ascii() {
        return Err(FrameError::NameNotAscii);
    }
    let name = std::str::from_utf8(name_bytes).map_err(|_| FrameError::NameNotAscii)?;
    if !is_valid_operation_name(name) {
        return Err(FrameError::InvalidName {
            name: name.to_string(),
        });
    }

    let body_len = read_u32_be(&data[1 + name_len..body_len_end]) as usize;
    if data.len() < body_len_end + body_len {
        return Err(FrameError::Truncated { len: data.len() });
    }

    let body = data[body_len_end..body_len_end + body_len].to_vec();
    Ok((name.to_string(), body))
}

/// Encode a response frame.
pub fn encode_response(status: u8, body: &[u8]) -> Result<Vec<u8>, EncodeError> {
    if body.len() > u32::MAX as usize {
        return Err(EncodeError::BodyTooLarge { len: body.len() });
    }

    let mut frame = Vec::with_capacity(MIN_FRAME_LEN + body.len());
    frame.push(status);
    frame.extend_from_slice(&(body.len() as u32).to_be_bytes());
    frame.extend_from_slice(body);
    Ok(frame)
}

/// Decode a response frame into `(status, body)`.
pub fn decode_response(data: &[u8]) -> Result<(u8, Vec<u8>), FrameError> {
    if data.len() < MIN_FRAME_LEN {
        return Err(FrameError::Truncated { len: data.len() });
    }

    let status = data[0];
    let body_len = read_u32_be(&data[1..MIN_FRAME_LEN]) as usize;
    if data.len() < MIN_FRAME_LEN + body_len {
        return Err(FrameError::Truncated { len: data.len() });
    }

    let body = data[MIN_FRAME_LEN..MIN_FRAME_LEN + body_len].to_vec();
    Ok((status, body))
}

fn read_u32_be(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_be_bytes(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_round_trip() {
        let frame = encode_request("c:ping", b"Hello!").unwrap();
        let (name, body) = decode_request(&frame).unwrap();
        assert_eq!(name, "c:ping");
        assert_eq!(body, b"Hello!");
    }

    #[test]
    fn test_request_round_trip_empty_body() {
        let frame = encode_request("c:server_port", b"").unwrap();
        let (name, body) = decode_request(&frame).unwrap();
        assert_eq!(name, "c:server_port");
        assert!(body.is_empty());
    }

    #[test]
    fn test_request_round_trip_binary_body() {
        // Bodies are opaque: NULs and high bytes must survive.
        let payload = [0u8, 255, 10, 13, 0, 128];
        let frame = encode_request("game:state", &payload).unwrap();
        let (_, body) = decode_request(&frame).unwrap();
        assert_eq!(body, payload);
    }

    #[test]
    fn test_request_frame_layout() {
        let frame = encode_request("c:ping", b"ab").unwrap();
        assert_eq!(frame[0], 6); // name length
        assert_eq!(&frame[1..7], b"c:ping");
        assert_eq!(&frame[7..11], &[0, 0, 0, 2]); // body length, big-endian
        assert_eq!(&frame[11..], b"ab");
    }

    #[test]
    fn test_encode_request_name_too_long() {
        let name = "a".repeat(256);
        assert_eq!(
            encode_request(&name, b""),
            Err(EncodeError::NameTooLong { len: 256 })
        );
    }

    #[test]
    fn test_decode_request_short_buffers() {
        for len in 0..MIN_FRAME_LEN {
            let data = vec![1u8; len];
            assert_eq!(
                decode_request(&data),
                Err(FrameError::Truncated { len }),
                "buffer of {} bytes must not decode",
                len
            );
        }
    }

    #[test]
    fn test_decode_request_name_length_overruns_buffer() {
        // Declares a 200-byte name but only carries a handful of bytes.
        let mut data = vec![200u8];
        data.extend_from_slice(b"c:ping");
        assert!(matches!(
            decode_request(&data),
            Err(FrameError::Truncated { .. })
        ));
    }

    #[test]
    fn test_decode_request_body_length_overruns_buffer() {
        let mut frame = encode_request("c:ping", b"full body").unwrap();
        frame.truncate(frame.len() - 3);
        assert!(matches!(
            decode_request(&frame),
            Err(FrameError::Truncated { .. })
        ));
    }

    #[test]
    fn test_decode_request_trailing_bytes_ignored() {
        let mut frame = encode_request("c:ping", b"x").unwrap();
        frame.extend_from_slice(b"trailing");
        let (name, body) = decode_request(&frame).unwrap();
        assert_eq!(name, "c:ping");
        assert_eq!(body, b"x");
    }

    #[test]
    fn test_decode_request_non_ascii_name() {
        let mut data = vec![2u8, 0xC3, 0xA9]; // "é"
        data.extend_from_slice(&[0, 0, 0, 0]);
        assert_eq!(decode_request(&data), Err(FrameError::NameNotAscii));
    }

    #[test]
    fn test_decode_request_invalid_names() {
        for name in ["PING", "c:", ":ping", "noseparator", "a:b:c", "c:Player", "c:player ping"] {
            let mut data = vec![name.len() as u8];
            data.extend_from_slice(name.as_bytes());
            data.extend_from_slice(&[0, 0, 0, 0]);
            assert_eq!(
                decode_request(&data),
                Err(FrameError::InvalidName {
                    name: name.to_string()
                }),
                "{:?} must be rejected",
                name
            );
        }
    }

    #[test]
    fn test_valid_operation_names() {
        for name in ["c:ping", "c:player_profiles_list", "game_0:list_9"] {
            assert!(is_valid_operation_name(name), "{:?} must be accepted", name);
        }
    }

    #[test]
    fn test_response_round_trip() {
        let frame = encode_response(0, b"Hello!").unwrap();
        assert_eq!(decode_response(&frame).unwrap(), (0, b"Hello!".to_vec()));

        let frame = encode_response(255, b"Unsupported protocol: c:x").unwrap();
        let (status, body) = decode_response(&frame).unwrap();
        assert_eq!(status, 255);
        assert_eq!(body, b"Unsupported protocol: c:x");
    }

    #[test]
    fn test_response_frame_layout() {
        let frame = encode_response(32, b"").unwrap();
        assert_eq!(frame, vec![32, 0, 0, 0, 0]);
    }

    #[test]
    fn test_decode_response_short_buffers() {
        for len in 0..MIN_FRAME_LEN {
            let data = vec![0u8; len];
            assert_eq!(decode_response(&data), Err(FrameError::Truncated { len }));
        }
    }

    #[test]
    fn test_decode_response_body_length_overruns_buffer() {
        let mut frame = encode_response(0, b"payload").unwrap();
        frame.truncate(frame.len() - 1);
        assert!(matches!(
            decode_response(&frame),
            Err(FrameError::Truncated { .. })
        ));
    }
}
