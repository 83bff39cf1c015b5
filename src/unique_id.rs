//! Identifier generation for new ONGs.
//!
//! The id doubles as the ONG's bearer credential, so it comes from the OS RNG.
//! Collisions are left to the `ongs` primary key.

use rand::{rngs::OsRng, RngCore};

/// Number of characters in an ONG id.
pub const ID_LEN: usize = 8;

/// Returns a fresh 8 character lowercase hex id (4 random bytes).
#[must_use]
pub fn generate_unique_id() -> String {
    let mut bytes = [0u8; ID_LEN / 2];
    OsRng.fill_bytes(&mut bytes);

    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_eight_characters() {
        let id = generate_unique_id();
        assert_eq!(id.len(), ID_LEN);
    }

    #[test]
    fn generates_lowercase_hex() {
        let id = generate_unique_id();
        assert!(
            id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()),
            "unexpected id: {id}"
        );
    }

    #[test]
    fn every_byte_is_two_hex_digits() {
        for _ in 0..64 {
            let id = generate_unique_id();
            assert_eq!(id.len(), ID_LEN, "unexpected id: {id}");
            assert!(u32::from_str_radix(&id, 16).is_ok(), "unexpected id: {id}");
        }
    }

    #[test]
    fn consecutive_ids_differ() {
        // 2^32 space, a repeat here means a broken RNG.
        assert_ne!(generate_unique_id(), generate_unique_id());
    }
}
