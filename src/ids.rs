// src/ids.rs
//! Candidate id derivation.
//!
//! New ids are a hex prefix of SHA-256(url). Ids already stored in the backlog are
//! never recomputed, so older suffix-style ids keep resolving.

use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt::Write as _;

/// Prefix lengths tried in order when a shorter one is already taken.
pub const ID_LENGTHS: [usize; 3] = [12, 16, 20];

fn url_digest_hex(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.trim().as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(64);
    for b in digest.iter() {
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Stable id for `url` (shortest prefix length).
pub fn candidate_id(url: &str) -> String {
    let hex = url_digest_hex(url);
    hex[..ID_LENGTHS[0]].to_string()
}

/// First prefix of the url digest not present in `taken`. `None` if every length collides.
pub fn unique_candidate_id(url: &str, taken: &HashSet<String>) -> Option<String> {
    let hex = url_digest_hex(url);
    ID_LENGTHS
        .iter()
        .map(|&n| &hex[..n])
        .find(|id| !taken.contains(*id))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_deterministic_and_selectable() {
        let a = candidate_id("https://example.test/post/1");
        let b = candidate_id("https://example.test/post/1");
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, candidate_id("https://example.test/post/2"));
    }

    #[test]
    fn collision_extends_prefix() {
        let url = "https://example.test/post/1";
        let mut taken = HashSet::new();
        taken.insert(candidate_id(url));
        let longer = unique_candidate_id(url, &taken).unwrap();
        assert_eq!(longer.len(), 16);
        assert!(longer.starts_with(&candidate_id(url)));

        taken.insert(longer);
        let longest = unique_candidate_id(url, &taken).unwrap();
        assert_eq!(longest.len(), 20);
        taken.insert(longest);
        assert!(unique_candidate_id(url, &taken).is_none());
    }
}
