//! Fingerprints of assembled content, used as HTTP entity tags.

use std::fmt;

use sha2::{Digest, Sha256};

/// SHA-256 digest of an assembled body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    pub fn compute(data: &[u8]) -> Self {
        ContentHash(Sha256::digest(data).into())
    }

    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(64);
        for byte in self.0 {
            out.push_str(&format!("{byte:02x}"));
        }
        out
    }

    /// Strong entity tag, quoted.
    pub fn etag(&self) -> String {
        format!("\"{}\"", self.to_hex())
    }

    /// Whether an `If-None-Match` value names this content. Weak tags
    /// compare equal to strong ones for `GET`.
    pub fn matches_etag(&self, if_none_match: &str) -> bool {
        let hex = self.to_hex();
        if_none_match.split(',').map(str::trim).any(|tag| {
            tag == "*" || tag.trim_start_matches("W/").trim_matches('"').eq_ignore_ascii_case(&hex)
        })
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
