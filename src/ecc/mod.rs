//! Galois-field arithmetic and Reed-Solomon coding shared by the encoder
//! and decoder.

/// GF(2^8) field operations (primitive 0x11D, generator 2)
pub mod gf256;
/// Polynomials over GF(2^8)
pub mod poly;
/// Generator polynomial and ECC computation (encode side)
pub mod generator;
/// Syndrome/Euclidean/Chien/Forney block decoder
pub mod reed_solomon;
