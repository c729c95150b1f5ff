use anyhow::Result;
use bcrypt::{hash, verify};
use rand::{thread_rng, Rng};
use uuid::Uuid;

pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    let hashed = hash(password, cost)?;
    Ok(hashed)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let is_valid = verify(password, hash)?;
    Ok(is_valid)
}

/// Random `[a-zA-Z0-9]` string of the given length.
pub fn random_char(len: usize) -> String {
    let mut rng = thread_rng();
    (0..len)
        .map(|_| {
            let idx = rng.gen_range(0..62u8);
            match idx {
                0..=25 => (b'a' + idx) as char,
                26..=51 => (b'A' + (idx - 26)) as char,
                _ => (b'0' + (idx - 52)) as char,
            }
        })
        .collect()
}

/// Hyphenated v4 UUID, used as the account's connection credential.
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// 32 hex characters, used as the subscription token.
pub fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn test_password_hashing_and_verification() {
        let password = "alice@example.com";

        let hash = hash_password(password, TEST_COST).unwrap();
        assert!(!hash.is_empty());
        assert_ne!(hash, password);

        assert!(verify_password(password, &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_password_hash_uniqueness() {
        let password = "same_password";

        let hash1 = hash_password(password, TEST_COST).unwrap();
        let hash2 = hash_password(password, TEST_COST).unwrap();

        // Salted, so identical input yields different hashes
        assert_ne!(hash1, hash2);
        assert!(verify_password(password, &hash1).unwrap());
        assert!(verify_password(password, &hash2).unwrap());
    }

    #[test]
    fn test_random_char_shape() {
        let a = random_char(6);
        assert_eq!(a.len(), 6);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));

        let long = random_char(64);
        assert_eq!(long.len(), 64);
        assert_ne!(long, random_char(64));

        assert!(random_char(0).is_empty());
    }

    #[test]
    fn test_uuid_and_token_formats() {
        let uuid = generate_uuid();
        assert_eq!(uuid.len(), 36);
        assert_eq!(uuid.matches('-').count(), 4);

        let token = generate_token();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_token());
    }

    #[test]
    fn test_unicode_password_handling() {
        let unicode_password = "密码123🔒";
        let hash = hash_password(unicode_password, TEST_COST).unwrap();
        assert!(verify_password(unicode_password, &hash).unwrap());
    }
}
