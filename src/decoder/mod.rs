//! Matrix-space stages of the decoder: format/version recovery, de-masking,
//! codeword extraction, error correction and segment parsing.

/// Zig-zag codeword extraction
pub mod bitstream;
/// Format information (EC level and mask) recovery
pub mod format;
/// Function-module map per version
pub mod function_mask;
/// Grid-to-payload orchestration with the mirrored retry
pub mod matrix_decode;
/// Typed segment decoders per data mode
pub mod modes;
/// Data mask removal
pub mod unmask;
/// Version information recovery for v7+
pub mod version;
