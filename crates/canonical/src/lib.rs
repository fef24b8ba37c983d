//! foodscan canonical text layer.
//!
//! Turns a free-text ingredient label into the token sequence the matcher
//! works on. This is the only place where label text is reshaped; every
//! later stage compares whole tokens.
//!
//! ## What we do
//!
//! - Optional Unicode NFKC normalization (off by default)
//! - Lowercasing of the whole label
//! - Separator folding: `(`, `)` and `;` behave like `,`
//! - Whitespace collapsing inside each token
//! - Dropping empty pieces, keeping duplicates
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock, no locale. Same label + same config = same tokens.

mod config;
mod error;
mod token;
mod whitespace;

pub use crate::config::{TokenizerConfig, DEFAULT_SEPARATORS};
pub use crate::error::CanonicalError;
pub use crate::token::{tokenize, tokenize_with_config};
pub use crate::whitespace::collapse_whitespace;
