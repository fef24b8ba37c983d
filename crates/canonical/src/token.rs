use std::borrow::Cow;

use unicode_normalization::UnicodeNormalization;

use crate::config::TokenizerConfig;
use crate::error::CanonicalError;
use crate::whitespace::collapse_whitespace;

/// Splits a raw ingredient label into normalized tokens using the default
/// configuration.
///
/// - whitespace-only input yields no tokens
/// - the input is lowercased
/// - `(`, `)` and `;` split exactly like `,`
/// - whitespace runs inside a token collapse to one space, so multi-word
///   entries such as `"yeast extract"` survive as a single token
/// - empty pieces are dropped, duplicates are kept
///
/// ```rust
/// use canonical::tokenize;
///
/// assert_eq!(
///     tokenize("Soy (Lecithin);  Malt   Extract"),
///     vec!["soy", "lecithin", "malt extract"]
/// );
/// assert!(tokenize(" \t ").is_empty());
/// ```
pub fn tokenize(raw: &str) -> Vec<String> {
    split_tokens(raw, &TokenizerConfig::default())
}

/// Same as [`tokenize`] but driven by an explicit [`TokenizerConfig`].
pub fn tokenize_with_config(
    raw: &str,
    cfg: &TokenizerConfig,
) -> Result<Vec<String>, CanonicalError> {
    cfg.validate()?;
    Ok(split_tokens(raw, cfg))
}

fn split_tokens(raw: &str, cfg: &TokenizerConfig) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    // NFKC first: it can turn compatibility characters into separators.
    let normalized: Cow<str> = if cfg.normalize_unicode {
        Cow::Owned(raw.nfkc().collect::<String>())
    } else {
        Cow::Borrowed(raw)
    };

    let folded: Cow<str> = if cfg.lowercase {
        Cow::Owned(normalized.to_lowercase())
    } else {
        normalized
    };

    folded
        .split(|ch: char| cfg.is_separator(ch))
        .map(collapse_whitespace)
        .filter(|token| !token.is_empty())
        .collect()
}
