//! Generated credentials for staff provisioning
//!
//! Admins create staff accounts with an auto-generated temporary password
//! and a human-readable staff identifier. The password is returned to the
//! admin exactly once and only its Argon2 hash is persisted.

use chrono::Utc;
use rand::Rng;
use rand::seq::SliceRandom;

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*";

/// Generated temporary password length.
pub const TEMP_PASSWORD_LENGTH: usize = 12;

/// Generate a temporary password with at least one character from each of
/// the four classes (upper, lower, digit, symbol), shuffled so class
/// positions are not predictable.
pub fn generate_temp_password() -> String {
    let mut rng = rand::thread_rng();
    let all: Vec<u8> = [UPPERCASE, LOWERCASE, DIGITS, SYMBOLS].concat();

    let mut chars: Vec<u8> = vec![
        UPPERCASE[rng.gen_range(0..UPPERCASE.len())],
        LOWERCASE[rng.gen_range(0..LOWERCASE.len())],
        DIGITS[rng.gen_range(0..DIGITS.len())],
        SYMBOLS[rng.gen_range(0..SYMBOLS.len())],
    ];
    while chars.len() < TEMP_PASSWORD_LENGTH {
        chars.push(all[rng.gen_range(0..all.len())]);
    }
    chars.shuffle(&mut rng);

    String::from_utf8(chars).expect("password alphabet is ASCII")
}

/// Generate a human-readable unique staff identifier:
/// `STF-<timestamp base36>-<4 random hex chars>`.
pub fn generate_staff_id() -> String {
    let mut rng = rand::thread_rng();
    let random: u16 = rng.r#gen();
    format!(
        "STF-{}-{:04X}",
        to_base36(Utc::now().timestamp_millis()),
        random
    )
}

fn to_base36(mut n: i64) -> String {
    const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if n <= 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(ALPHABET[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).expect("base36 alphabet is ASCII")
}
