//! Random paste addresses.
//!
//! An address is `<token>.<lang>`, where the token is drawn uniformly from the
//! 52 ASCII letters using the operating system's CSPRNG.

use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

/// Symbols a token is built from.
pub const ALPHABET: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Largest multiple of the alphabet size that fits in a byte; bytes at or above
/// it are rejected so every letter is equally likely.
const REJECT_FROM: u8 = (256 / ALPHABET.len() * ALPHABET.len()) as u8;

#[derive(Error, Debug)]
pub enum AddressError {
    #[error("generating an empty address is not allowed")]
    EmptyLength,
    #[error("random source unavailable")]
    Randomness {
        #[from]
        source: rand::Error,
    },
}

/// Generate a random token of `length` letters.
pub fn generate(length: usize) -> Result<String, AddressError> {
    generate_with(&mut OsRng, length)
}

/// Generate a random token of `length` letters from `rng`.
pub fn generate_with<R: RngCore + ?Sized>(
    rng: &mut R,
    length: usize,
) -> Result<String, AddressError> {
    if length == 0 {
        return Err(AddressError::EmptyLength);
    }

    let mut token = String::with_capacity(length);
    let mut buf = [0u8; 64];

    while token.len() < length {
        rng.try_fill_bytes(&mut buf)?;
        for byte in buf.iter().copied().filter(|b| *b < REJECT_FROM) {
            token.push(ALPHABET[usize::from(byte) % ALPHABET.len()] as char);
            if token.len() == length {
                break;
            }
        }
    }

    Ok(token)
}

/// Generate the public address for a paste written in `lang`.
pub fn for_paste(length: usize, lang: &str) -> Result<String, AddressError> {
    Ok(format!("{}.{lang}", generate(length)?))
}
