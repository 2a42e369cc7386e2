//! Reversible encoding between record identifiers and short keys.
//!
//! A [`KeyCodec`] treats its alphabet as the digits of a positional number
//! system: the symbol at index `0` is the zero digit and the alphabet length is
//! the base. Identifiers are written most-significant digit first, so every
//! non-negative identifier has exactly one canonical key.
//!
//! ```rust,ignore
//! let codec = KeyCodec::new("abcdefghijklmnopqrstuvwxyz")?;
//! assert_eq!(codec.encode(0)?, "a");
//! assert_eq!(codec.decode("debian")?, 37_495_029);
//! ```

use std::collections::HashMap;

use regex::Regex;
use thiserror::Error;

/// Alphabet used when `KEY_ALPHABET` is not configured.
pub const DEFAULT_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Errors produced while building a codec or converting keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The alphabet is too short or repeats a symbol.
    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),

    /// Only non-negative identifiers have a key.
    #[error("identifier {0} cannot be encoded: negative values have no key")]
    EncodingRange(i64),

    /// The key contains a symbol outside the alphabet.
    #[error("invalid key: symbol {symbol:?} at position {position} is not in the alphabet")]
    InvalidKey { symbol: char, position: usize },

    #[error("invalid key: key is empty")]
    EmptyKey,

    /// The key denotes a value larger than the identifier type can hold.
    #[error("invalid key: {0:?} exceeds the identifier range")]
    Overflow(String),
}

/// Bijective conversion between non-negative `i64` identifiers and keys.
///
/// Cheap to share behind an `Arc`; all methods take `&self` and the codec
/// holds no mutable state.
#[derive(Debug, Clone)]
pub struct KeyCodec {
    symbols: Vec<char>,
    digits: HashMap<char, i64>,
    pattern: Regex,
}

impl KeyCodec {
    /// Builds a codec over `alphabet`.
    ///
    /// The order of the symbols is significant: the first symbol is the zero
    /// digit. Changing the alphabet of a running deployment changes the key of
    /// every record already issued.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidAlphabet`] if the alphabet has fewer than
    /// two symbols or contains a duplicate.
    pub fn new(alphabet: &str) -> Result<Self, CodecError> {
        let symbols: Vec<char> = alphabet.chars().collect();

        if symbols.len() < 2 {
            return Err(CodecError::InvalidAlphabet(format!(
                "at least 2 symbols are required, got {}",
                symbols.len()
            )));
        }

        let mut digits = HashMap::with_capacity(symbols.len());
        for (index, &symbol) in symbols.iter().enumerate() {
            if digits.insert(symbol, index as i64).is_some() {
                return Err(CodecError::InvalidAlphabet(format!(
                    "symbol {symbol:?} appears more than once"
                )));
            }
        }

        let pattern = Regex::new(&format!("^[{}]+$", regex::escape(alphabet)))
            .map_err(|e| CodecError::InvalidAlphabet(e.to_string()))?;

        Ok(Self {
            symbols,
            digits,
            pattern,
        })
    }

    /// Returns the ordered alphabet.
    pub fn alphabet(&self) -> String {
        self.symbols.iter().collect()
    }

    /// Number of symbols, i.e. the numeric base.
    pub fn base(&self) -> usize {
        self.symbols.len()
    }

    /// The key validation pattern, `^[<alphabet>]+$`.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Encodes an identifier into its canonical key.
    ///
    /// `0` encodes to the single zero symbol; any other value never starts
    /// with the zero symbol.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::EncodingRange`] for negative identifiers.
    pub fn encode(&self, id: i64) -> Result<String, CodecError> {
        if id < 0 {
            return Err(CodecError::EncodingRange(id));
        }
        if id == 0 {
            return Ok(self.symbols[0].to_string());
        }

        let base = self.symbols.len() as i64;
        let mut remaining = id;
        let mut reversed = Vec::new();
        while remaining > 0 {
            reversed.push(self.symbols[(remaining % base) as usize]);
            remaining /= base;
        }

        Ok(reversed.into_iter().rev().collect())
    }

    /// Decodes a key back into its identifier.
    ///
    /// Leading zero symbols are accepted and contribute nothing, so `"aab"`
    /// and `"b"` decode to the same identifier under an `a..z` alphabet.
    ///
    /// # Errors
    ///
    /// - [`CodecError::EmptyKey`] for `""`
    /// - [`CodecError::InvalidKey`] for a symbol outside the alphabet
    /// - [`CodecError::Overflow`] if the value does not fit in `i64`
    pub fn decode(&self, key: &str) -> Result<i64, CodecError> {
        if key.is_empty() {
            return Err(CodecError::EmptyKey);
        }

        let base = self.symbols.len() as i64;
        let mut acc: i64 = 0;
        for (position, symbol) in key.chars().enumerate() {
            let digit = *self
                .digits
                .get(&symbol)
                .ok_or(CodecError::InvalidKey { symbol, position })?;

            acc = acc
                .checked_mul(base)
                .and_then(|v| v.checked_add(digit))
                .ok_or_else(|| CodecError::Overflow(key.to_string()))?;
        }

        Ok(acc)
    }

    /// Returns `true` if `key` is non-empty and uses only alphabet symbols.
    ///
    /// A syntactically valid key can still overflow on [`decode`](Self::decode).
    pub fn is_valid_key(&self, key: &str) -> bool {
        self.pattern.is_match(key)
    }
}
