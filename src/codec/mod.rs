//! Wire encoding for the diamond transport contract.
//!
//! The service speaks GBK, not UTF-8: request bodies are form-encoded
//! over GBK bytes, response bodies are GBK text, and content
//! fingerprints are computed over the GBK encoding of the content.

mod wire;

pub use wire::*;

#[cfg(test)]
mod wire_test;
