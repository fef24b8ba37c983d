//! Configuration types for the ingredient tokenizer.
//!
//! [`TokenizerConfig`] controls how a raw ingredient label is split and
//! normalized. The default matches what the matcher expects: lowercase
//! tokens, `,` `(` `)` `;` as separators, no Unicode normalization.
//!
//! # Versioning
//!
//! Any change to tokenization output must come with a `version` bump, so
//! persisted scans can be traced back to the rules that produced them.
//!
//! # Examples
//!
//! ```rust
//! use canonical::TokenizerConfig;
//!
//! let config = TokenizerConfig::default();
//! assert_eq!(config.version, 1);
//! assert!(config.lowercase);
//! assert!(!config.normalize_unicode);
//! assert_eq!(config.separators, vec![',', '(', ')', ';']);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CanonicalError;

/// Separators applied when no override is configured.
pub const DEFAULT_SEPARATORS: [char; 4] = [',', '(', ')', ';'];

/// Configuration for [`tokenize_with_config`](crate::tokenize_with_config).
///
/// Cheap to clone and serde-friendly so it can be embedded in a larger
/// YAML configuration:
///
/// ```json
/// {
///   "version": 1,
///   "separators": [",", "(", ")", ";"],
///   "lowercase": true,
///   "normalize_unicode": false
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenizerConfig {
    /// Version of the tokenization rules. Must be >= 1.
    pub version: u32,

    /// Characters that end a token. Every separator behaves exactly like a
    /// comma, so `"soy (lecithin); malt"` yields `soy`, `lecithin`, `malt`.
    pub separators: Vec<char>,

    /// Lowercase the whole input before splitting.
    ///
    /// Downstream matching is case-insensitive either way; lowercasing here
    /// keeps the `matched_text` recorded on a match stable.
    pub lowercase: bool,

    /// Apply Unicode NFKC normalization before anything else.
    ///
    /// Useful for OCR'd labels that contain full-width letters or
    /// ligatures (`"ﬂour"` → `"flour"`). Off by default.
    pub normalize_unicode: bool,
}

impl TokenizerConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), CanonicalError> {
        if self.version == 0 {
            return Err(CanonicalError::InvalidConfig(
                "config version must be >= 1".into(),
            ));
        }
        if self.separators.is_empty() {
            return Err(CanonicalError::InvalidConfig(
                "at least one separator is required".into(),
            ));
        }
        if self.separators.iter().any(|c| c.is_whitespace()) {
            return Err(CanonicalError::InvalidConfig(
                "whitespace cannot be used as a separator".into(),
            ));
        }
        Ok(())
    }

    pub(crate) fn is_separator(&self, ch: char) -> bool {
        self.separators.contains(&ch)
    }
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            separators: DEFAULT_SEPARATORS.to_vec(),
            lowercase: true,
            normalize_unicode: false,
        }
    }
}
