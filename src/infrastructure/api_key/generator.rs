//! Credential value generation
//!
//! Generates the default credential string for keys created without an
//! explicit value: a fixed prefix followed by random lowercase alphanumerics,
//! e.g. `dandi-x7k2m9q0ab`.

use rand::Rng;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generator for credential values
#[derive(Debug, Clone)]
pub struct KeyValueGenerator {
    prefix: String,
    random_chars: usize,
}

impl KeyValueGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            random_chars: 10,
        }
    }

    pub fn with_random_chars(mut self, chars: usize) -> Self {
        self.random_chars = chars;
        self
    }

    /// Generate a fresh credential value
    pub fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..self.random_chars)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();

        format!("{}{}", self.prefix, suffix)
    }
}

impl Default for KeyValueGenerator {
    fn default() -> Self {
        Self::new("dandi-")
    }
}
