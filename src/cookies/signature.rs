//! Signed cookie values.
//!
//! A signed value has the form `s:<value>.<signature>` where the signature
//! is the unpadded base64 HMAC-SHA256 of `<value>` keyed with a secret. The
//! `s:` prefix marks the value as signed and is not part of the MAC input.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Marker prepended to signed cookie values.
pub const SIGNED_PREFIX: &str = "s:";

/// Signature verification primitive used by value comparisons.
pub trait Unsigner: Send + Sync {
    /// Return the original value when `payload` carries a valid signature for
    /// `secret`, `None` otherwise.
    fn unsign(&self, payload: &str, secret: &str) -> Option<String>;
}

/// HMAC-SHA256 signer, compatible with `cookie-signature` style values.
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacSha256Signer;

impl Unsigner for HmacSha256Signer {
    fn unsign(&self, payload: &str, secret: &str) -> Option<String> {
        unsign(payload, secret)
    }
}

/// Sign `value` with `secret`, producing `value.signature`.
///
/// ```
/// use expectcookies::cookies::signature::{sign, unsign};
///
/// let signed = sign("active", "correct");
/// assert_eq!(unsign(&signed, "correct").as_deref(), Some("active"));
/// assert_eq!(unsign(&signed, "wrong"), None);
/// ```
pub fn sign(value: &str, secret: &str) -> String {
    format!("{value}.{}", STANDARD_NO_PAD.encode(mac(value, secret)))
}

/// Verify `input` (`value.signature`, without the `s:` prefix) against
/// `secret` and return the value when the signature matches.
pub fn unsign(input: &str, secret: &str) -> Option<String> {
    let (value, _) = input.rsplit_once('.')?;
    let expected = sign(value, secret);

    if bool::from(expected.as_bytes().ct_eq(input.as_bytes())) {
        Some(value.to_string())
    } else {
        None
    }
}

fn mac(value: &str, secret: &str) -> Vec<u8> {
    // HMAC accepts keys of any length, so this never fails.
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return Vec::new(),
    };
    mac.update(value.as_bytes());
    mac.finalize().into_bytes().to_vec()
}
