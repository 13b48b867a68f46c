//! qrcodec - QR code encoder and decoder
//!
//! A pure Rust implementation of the ISO/IEC 18004 Model 2 symbology:
//! versions 1-40, error correction levels L/M/Q/H, and the Numeric,
//! Alphanumeric, Byte (UTF-8) and Kanji (Shift-JIS) data modes.
//!
//! Encoding goes from text (or pre-built [`Segment`]s) to a module matrix;
//! decoding goes from a raw RGBA pixel buffer back to the payload. The two
//! halves share the GF(2^8) arithmetic, the bit-stream utilities and the
//! standard's tables, so every encoded symbol round-trips through the
//! decoder.
//!
//! ```no_run
//! use qrcodec::{decode, encode, ECLevel};
//!
//! let qr = encode("HELLO WORLD", ECLevel::Q).unwrap();
//! let (rgba, width, height) = qr.render_rgba(4, 4);
//! let decoded = decode(&rgba, width, height).unwrap();
//! assert_eq!(decoded.text, "HELLO WORLD");
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Big-endian bit buffers shared by both halves
pub mod bits;
/// Unicode <-> Shift-JIS conversion for Kanji mode
pub mod charset;
mod config;
mod debug;
/// Matrix-space decoding stages
pub mod decoder;
/// Image-space detection stages
pub mod detector;
/// GF(2^8) arithmetic and Reed-Solomon coding
pub mod ecc;
/// Segmentation, module placement and mask selection
pub mod encoder;
/// Shared data structures
pub mod models;
/// End-to-end decode pipeline
pub mod pipeline;
/// ISO 18004 tables and derived capacities
pub mod tables;
/// Image file helpers for the CLI and tests
pub mod tools;
/// Geometry and greyscale helpers
pub mod utils;

pub use encoder::{encode, encode_segments, encode_with_version, EncodeError, EncodedQr, Segment};
pub use models::{BitMatrix, DataChunk, Decoded, ECLevel, Location, MaskPattern, Point};
pub use pipeline::{decode, decode_luma, decode_with_options, DecodeOptions, InversionAttempts};
