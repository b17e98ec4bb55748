//! Wire protocol module.
//!
//! Defines the frame codec, async frame I/O, and the operation catalogue.
//!
//! ## Wire format
//!
//! ```text
//! request:  [len(name): u8][name: ASCII][len(body): u32 BE][body]
//! response: [status: u8][len(body): u32 BE][body]
//! ```
//!
//! Operation names follow `namespace:verb` (lowercase alphanumerics and
//! underscores). Lengths are big-endian; bodies are opaque bytes.

mod codec;
pub mod negotiate;
mod wire;

pub use codec::{
    decode_request, decode_response, encode_request, encode_response, is_valid_operation_name,
    EncodeError, FrameError, MIN_FRAME_LEN,
};
pub use wire::{read_request, read_response, write_request, write_response};

/// Status byte of a successful response.
pub const STATUS_OK: u8 = 0;
/// Status byte reporting that the downstream game service is not running.
pub const STATUS_GAME_UNAVAILABLE: u8 = 32;
/// Catch-all status byte for malformed, unsupported, or failed requests.
pub const STATUS_ERROR: u8 = 255;
