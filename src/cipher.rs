//! Reversible cookie cipher.
//!
//! Controllers encrypt secure cookies through the [`Cipher`] trait so the
//! scheme can be swapped. [`SimpleCipher`] is the default: a SHA-256
//! counter-mode keystream authenticated with a truncated HMAC-SHA256 tag,
//! encoded as URL-safe base64. It keeps cookie values opaque and
//! tamper-evident; it is not meant as general purpose encryption.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::digest::Key;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const NONCE_LEN: usize = 16;
const TAG_LEN: usize = 16;

/// Symmetric string cipher keyed by a secret.
pub trait Cipher: Send + Sync {
    fn encrypt(&self, plaintext: &str, secret: &str) -> String;

    /// Returns `None` when the input is malformed, was tampered with, or was
    /// produced with another secret.
    fn decrypt(&self, ciphertext: &str, secret: &str) -> Option<String>;
}

/// Default cookie cipher.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleCipher;

impl SimpleCipher {
    pub fn new() -> Self {
        Self
    }

    fn keystream_xor(secret: &str, nonce: &[u8], data: &mut [u8]) {
        for (counter, chunk) in data.chunks_mut(32).enumerate() {
            let block = Sha256::new()
                .chain_update(secret.as_bytes())
                .chain_update(nonce)
                .chain_update((counter as u32).to_le_bytes())
                .finalize();
            for (byte, k) in chunk.iter_mut().zip(block.iter()) {
                *byte ^= k;
            }
        }
    }

    /// HMAC over `nonce || ciphertext` with a key derived from the secret.
    fn mac(secret: &str, nonce: &[u8], ciphertext: &[u8]) -> HmacSha256 {
        let derived = Sha256::new()
            .chain_update(b"cookie-mac:")
            .chain_update(secret.as_bytes())
            .finalize();
        let mut key = Key::<HmacSha256>::default();
        key[..derived.len()].copy_from_slice(&derived);

        let mut mac = <HmacSha256 as Mac>::new(&key);
        mac.update(nonce);
        mac.update(ciphertext);
        mac
    }
}

impl Cipher for SimpleCipher {
    fn encrypt(&self, plaintext: &str, secret: &str) -> String {
        let nonce = uuid::Uuid::new_v4().into_bytes();

        let mut data = plaintext.as_bytes().to_vec();
        Self::keystream_xor(secret, &nonce, &mut data);
        let tag = Self::mac(secret, &nonce, &data).finalize().into_bytes();

        let mut out = Vec::with_capacity(NONCE_LEN + data.len() + TAG_LEN);
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&data);
        out.extend_from_slice(&tag[..TAG_LEN]);
        URL_SAFE_NO_PAD.encode(out)
    }

    fn decrypt(&self, ciphertext: &str, secret: &str) -> Option<String> {
        let raw = URL_SAFE_NO_PAD.decode(ciphertext.trim()).ok()?;
        if raw.len() < NONCE_LEN + TAG_LEN {
            return None;
        }

        let (nonce, rest) = raw.split_at(NONCE_LEN);
        let (body, tag) = rest.split_at(rest.len() - TAG_LEN);
        Self::mac(secret, nonce, body)
            .verify_truncated_left(tag)
            .ok()?;

        let mut data = body.to_vec();
        Self::keystream_xor(secret, nonce, &mut data);
        String::from_utf8(data).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_is_truncated_hmac() {
        let cipher = SimpleCipher::new();
        let sealed = cipher.encrypt("payload", "k");
        let raw = URL_SAFE_NO_PAD.decode(&sealed).unwrap();
        assert_eq!(raw.len(), NONCE_LEN + "payload".len() + TAG_LEN);

        let (nonce, rest) = raw.split_at(NONCE_LEN);
        let (body, tag) = rest.split_at(rest.len() - TAG_LEN);
        let full = SimpleCipher::mac("k", nonce, body).finalize().into_bytes();
        assert_eq!(&full[..TAG_LEN], tag);
        assert!(SimpleCipher::mac("other", nonce, body)
            .verify_truncated_left(tag)
            .is_err());
    }

    #[test]
    fn test_decrypts_with_same_secret() {
        let cipher = SimpleCipher::new();
        let long = "x".repeat(100);
        for plain in ["", "42", "héllo wörld", long.as_str()] {
            let sealed = cipher.encrypt(plain, "s3cret");
            assert_eq!(cipher.decrypt(&sealed, "s3cret").as_deref(), Some(plain));
        }
    }

    #[test]
    fn test_ciphertext_is_opaque_and_randomized() {
        let cipher = SimpleCipher::new();
        let a = cipher.encrypt("user=1", "k");
        let b = cipher.encrypt("user=1", "k");

        assert_ne!(a, b);
        assert!(!a.contains("user"));
        assert!(a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let cipher = SimpleCipher::new();
        let sealed = cipher.encrypt("payload", "right");
        assert_eq!(cipher.decrypt(&sealed, "wrong"), None);
    }

    #[test]
    fn test_tampering_fails() {
        let cipher = SimpleCipher::new();
        let sealed = cipher.encrypt("payload", "k");

        let mut raw = URL_SAFE_NO_PAD.decode(&sealed).unwrap();
        raw[NONCE_LEN] ^= 0x01;
        let tampered = URL_SAFE_NO_PAD.encode(raw);

        assert_eq!(cipher.decrypt(&tampered, "k"), None);

        let mut raw = URL_SAFE_NO_PAD.decode(&sealed).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x80;
        assert_eq!(cipher.decrypt(&URL_SAFE_NO_PAD.encode(raw), "k"), None);
        assert_eq!(cipher.decrypt("not base64 !!", "k"), None);
        assert_eq!(cipher.decrypt("c2hvcnQ", "k"), None);
    }
}
