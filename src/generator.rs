//! Random password generation
//!
//! A [`Mode`] gives how many characters to draw from each ASCII class
//! (lowercase, uppercase, digits, punctuation). The drawn characters are
//! shuffled before being returned.

use std::fmt;
use std::str::FromStr;

use rand::seq::{IndexedRandom, SliceRandom};
use zeroize::Zeroizing;

use crate::error::{KeychainError, Result};

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const PUNCTUATION: &[u8] = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode {
    pub lowercase: u8,
    pub uppercase: u8,
    pub digit: u8,
    pub punctuation: u8,
}

impl Mode {
    pub fn new(lowercase: u8, uppercase: u8, digit: u8, punctuation: u8) -> Result<Self> {
        let mode = Self {
            lowercase,
            uppercase,
            digit,
            punctuation,
        };
        if mode.len() == 0 {
            return Err(KeychainError::Generator(
                "at least one character class count must be greater than 0".to_string(),
            ));
        }
        Ok(mode)
    }

    /// Packed form: one byte per class, lowercase in the most significant byte.
    pub fn from_packed(packed: u32) -> Result<Self> {
        let [l, u, d, p] = packed.to_be_bytes();
        Self::new(l, u, d, p)
    }

    pub fn preset(name: &str) -> Option<Self> {
        let (l, u, d, p) = match name {
            "classic" | "default" => (8, 4, 4, 0),
            "uniform" => (4, 4, 4, 4),
            "all-lower" => (16, 0, 0, 0),
            "all-upper" => (0, 16, 0, 0),
            "all-digit" => (0, 0, 16, 0),
            "all-punctuation" => (0, 0, 0, 16),
            _ => return None,
        };
        Some(Self {
            lowercase: l,
            uppercase: u,
            digit: d,
            punctuation: p,
        })
    }

    pub fn len(&self) -> usize {
        [self.lowercase, self.uppercase, self.digit, self.punctuation]
            .iter()
            .map(|&n| usize::from(n))
            .sum()
    }

    fn classes(&self) -> [(&'static [u8], u8); 4] {
        [
            (LOWERCASE, self.lowercase),
            (UPPERCASE, self.uppercase),
            (DIGITS, self.digit),
            (PUNCTUATION, self.punctuation),
        ]
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self {
            lowercase: 8,
            uppercase: 4,
            digit: 4,
            punctuation: 0,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.lowercase, self.uppercase, self.digit, self.punctuation
        )
    }
}

impl FromStr for Mode {
    type Err = KeychainError;

    /// Accepts a preset name, a `0x`-prefixed packed value such as
    /// `0x08040400`, or four decimal counts such as `8-4-4-0`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(mode) = Self::preset(s) {
            return Ok(mode);
        }
        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            let packed = u32::from_str_radix(hex, 16)
                .map_err(|e| KeychainError::Generator(format!("{s}: {e}")))?;
            return Self::from_packed(packed);
        }

        let counts: Vec<&str> = s
            .split(|c: char| !c.is_ascii_digit())
            .filter(|part| !part.is_empty())
            .collect();
        let [l, u, d, p] = counts[..] else {
            return Err(KeychainError::Generator(format!(
                "{s}: expected four counts"
            )));
        };
        let parse = |part: &str| {
            part.parse::<u8>()
                .map_err(|e| KeychainError::Generator(format!("{part}: {e}")))
        };
        Self::new(parse(l)?, parse(u)?, parse(d)?, parse(p)?)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PasswordGenerator {
    mode: Mode,
}

impl PasswordGenerator {
    pub const fn new(mode: Mode) -> Self {
        Self { mode }
    }

    pub const fn mode(&self) -> Mode {
        self.mode
    }

    pub const fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Draws a password. With `unique`, no character repeats within a class.
    pub fn generate(&self, unique: bool) -> Result<Zeroizing<String>> {
        let mut rng = rand::rng();
        let mut chars: Vec<u8> = Vec::with_capacity(self.mode.len());

        for (class, count) in self.mode.classes() {
            let count = usize::from(count);
            if unique {
                if count > class.len() {
                    return Err(KeychainError::Generator(format!(
                        "cannot draw {count} unique characters from a class of {}",
                        class.len()
                    )));
                }
                chars.extend(class.choose_multiple(&mut rng, count));
            } else {
                for _ in 0..count {
                    if let Some(&c) = class.choose(&mut rng) {
                        chars.push(c);
                    }
                }
            }
        }
        chars.shuffle(&mut rng);

        // Every class is ASCII.
        Ok(Zeroizing::new(chars.into_iter().map(char::from).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_forms() {
        assert_eq!("uniform".parse::<Mode>().unwrap(), Mode::new(4, 4, 4, 4).unwrap());
        assert_eq!("0x08040400".parse::<Mode>().unwrap(), Mode::default());
        assert_eq!("8-4-4-0".parse::<Mode>().unwrap(), Mode::default());
        assert_eq!("(1, 2, 3, 4)".parse::<Mode>().unwrap(), Mode::new(1, 2, 3, 4).unwrap());
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!("0-0-0-0".parse::<Mode>().is_err());
        assert!("1-2-3".parse::<Mode>().is_err());
        assert!("300-0-0-0".parse::<Mode>().is_err());
        assert!("0xZZ".parse::<Mode>().is_err());
    }

    #[test]
    fn test_generate_respects_counts() {
        let generator = PasswordGenerator::new(Mode::new(3, 2, 5, 1).unwrap());
        let password = generator.generate(false).unwrap();
        assert_eq!(password.len(), 11);
        assert_eq!(password.chars().filter(char::is_ascii_lowercase).count(), 3);
        assert_eq!(password.chars().filter(char::is_ascii_uppercase).count(), 2);
        assert_eq!(password.chars().filter(char::is_ascii_digit).count(), 5);
        assert_eq!(password.chars().filter(char::is_ascii_punctuation).count(), 1);
    }

    #[test]
    fn test_generate_unique() {
        let generator = PasswordGenerator::new(Mode::new(0, 0, 10, 0).unwrap());
        let password = generator.generate(true).unwrap();
        let distinct: HashSet<char> = password.chars().collect();
        assert_eq!(distinct.len(), 10);

        let too_many = PasswordGenerator::new(Mode::new(0, 0, 11, 0).unwrap());
        assert!(too_many.generate(true).is_err());
    }
}
