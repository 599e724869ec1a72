//! Server-push stream decoding.

mod decoder;
mod payload;

pub use decoder::StreamDecoder;
pub use payload::PayloadShape;
