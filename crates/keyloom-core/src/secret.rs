//! Zeroizing secret value types.
//!
//! Seed phrases and key shares move forward by value through flow states.
//! States are cloned when published on the interpreter's watch channel, so
//! every copy zeroizes on drop and `Debug` never prints the material.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A BIP-39 mnemonic phrase.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct SeedPhrase(String);

impl SeedPhrase {
    /// Wrap an already-validated mnemonic phrase.
    pub fn new(phrase: impl Into<String>) -> Self {
        Self(phrase.into())
    }

    /// Borrow the phrase for use by an effect handler.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Number of words in the phrase.
    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }
}

impl fmt::Debug for SeedPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SeedPhrase(<{} words redacted>)", self.word_count())
    }
}

/// An opaque encoded key share (device or custom half of the threshold key).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct KeyShare(String);

impl KeyShare {
    /// Wrap an encoded share as received from the threshold facade.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Borrow the encoded share for use by an effect handler.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for KeyShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyShare(<redacted>)")
    }
}
