//! Temporary passwords and strength estimation

use rand::{seq::SliceRandom, Rng};

const LOWER: &[u8] = b"abcdefghijkmnpqrstuvwxyz";
const UPPER: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
const DIGITS: &[u8] = b"23456789";
const SYMBOLS: &[u8] = b"!@#$%*?";

pub const TEMPORARY_PASSWORD_LENGTH: usize = 14;

/// Random password without look-alike characters, containing at least one
/// lowercase letter, uppercase letter, digit and symbol.
pub fn generate_temporary_password() -> String {
    let mut rng = rand::rng();
    let classes = [LOWER, UPPER, DIGITS, SYMBOLS];
    let all: Vec<u8> = classes.concat();

    let mut chars: Vec<u8> = classes
        .iter()
        .map(|class| class[rng.random_range(0..class.len())])
        .collect();
    while chars.len() < TEMPORARY_PASSWORD_LENGTH {
        chars.push(all[rng.random_range(0..all.len())]);
    }
    chars.shuffle(&mut rng);

    chars.into_iter().map(char::from).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordStrength {
    /// zxcvbn score, 0 (weakest) to 4.
    pub score: u8,
}

impl PasswordStrength {
    pub fn is_weak(&self) -> bool {
        self.score < 3
    }
}

/// Estimates strength, penalising passwords built from the given user inputs
/// (email, name).
pub fn password_strength(password: &str, user_inputs: &[&str]) -> PasswordStrength {
    let entropy = zxcvbn::zxcvbn(password, user_inputs);
    PasswordStrength { score: u8::from(entropy.score()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temporary_password_shape() {
        for _ in 0..50 {
            let pw = generate_temporary_password();
            assert_eq!(pw.len(), TEMPORARY_PASSWORD_LENGTH);
            assert!(pw.bytes().any(|b| LOWER.contains(&b)));
            assert!(pw.bytes().any(|b| UPPER.contains(&b)));
            assert!(pw.bytes().any(|b| DIGITS.contains(&b)));
            assert!(pw.bytes().any(|b| SYMBOLS.contains(&b)));
            assert!(!pw.contains('0') && !pw.contains('O') && !pw.contains('l'));
        }
    }

    #[test]
    fn test_weak_password() {
        assert!(password_strength("password", &[]).is_weak());
        assert!(password_strength("ana12345", &["ana@example.com", "ana"]).is_weak());
    }

    #[test]
    fn test_strong_password() {
        assert!(!password_strength("correct-Horse-battery-Staple-91", &[]).is_weak());
    }
}
