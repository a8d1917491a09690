//! Random passwords for templates.

use rand::Rng;
use rand::rngs::OsRng;

/// Length of every generated password.
pub const PASSWORD_LENGTH: usize = 16;

const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SPECIAL: &[u8] = b"!@#$%&*";
const DIGITS: &[u8] = b"0123456789";

/// Generate a password from the operating system's RNG.
pub fn generate_password() -> String {
    generate_password_with(&mut OsRng)
}

/// Generate a password of [`PASSWORD_LENGTH`] characters drawn from
/// lower/upper case letters, digits and `!@#$%&*`.
///
/// The first character is always a letter: a leading special character would
/// change the meaning of an unquoted YAML scalar.
pub fn generate_password_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let letters = [LOWER, UPPER].concat();
    let all = [LOWER, UPPER, SPECIAL, DIGITS].concat();

    let mut password = String::with_capacity(PASSWORD_LENGTH);
    password.push(letters[rng.gen_range(0..letters.len())] as char);
    for _ in 1..PASSWORD_LENGTH {
        password.push(all[rng.gen_range(0..all.len())] as char);
    }
    password
}
