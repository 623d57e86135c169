//! # huffcodec
//!
//! Huffman coding over text: builds a prefix-free code from symbol
//! frequencies, encodes the text into a single self-describing payload
//! (`<tree-json>|<bitstream>`), and decodes such payloads back to the
//! original text.
//!
//! ## Usage
//!
//! ```rust
//! use huffcodec::HuffmanCodec;
//!
//! let mut codec = HuffmanCodec::new();
//! let payload = codec.encode("hello world", true)?;
//! assert_eq!(codec.decode()?, "hello world");
//! assert_eq!(HuffmanCodec::decode_payload(&payload)?, "hello world");
//! # Ok::<(), huffcodec::HuffmanError>(())
//! ```

/// Encode/decode front end and the payload format.
pub mod codec;

/// Error types shared across the crate.
pub mod error;

/// Tracing subscriber setup for the binary.
pub mod logger;

/// Tree model, construction, and JSON serialization.
pub mod tree;

pub use codec::{HuffmanCodec, TREE_DELIMITER};
pub use error::{HuffmanError, Result};
pub use tree::Node;
