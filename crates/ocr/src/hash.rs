use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 identifying a source poster file, reported alongside
/// its extraction.
pub fn source_digest(data: &[u8]) -> String {
    Sha256::digest(data).iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_matches_known_digest() {
        assert_eq!(
            source_digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn source_digest_is_stable_per_content() {
        assert_eq!(source_digest(b"poster"), source_digest(b"poster"));
        assert_ne!(source_digest(b"poster"), source_digest(b"flyer"));
        assert_eq!(source_digest(b"poster").len(), 64);
    }
}
