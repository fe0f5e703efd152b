//! Strength rules for configured secrets.
//!
//! Both servers refuse to start when an API key or gateway secret looks like
//! a placeholder or is too repetitive to be machine-generated.

use std::collections::BTreeMap;

use thiserror::Error;

/// Fragments that only show up in copied example values.
const PLACEHOLDER_FRAGMENTS: &[&str] = &[
    "changeme",
    "your-",
    "your_",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
];

/// Why a secret was refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeakSecret {
    #[error("must be at least {min} characters")]
    TooShort { min: usize },

    #[error("looks like a placeholder (contains '{0}')")]
    Placeholder(&'static str),

    #[error("too predictable ({bits:.2} bits per character, need {min:.1})")]
    LowEntropy { bits: f64, min: f64 },
}

/// Minimum length and character entropy a secret must meet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecretRules {
    pub min_len: usize,
    pub min_bits_per_char: f64,
}

impl SecretRules {
    /// Rules for third-party API keys and secrets, whose length the vendor
    /// decides.
    pub const VENDOR_KEY: Self = Self {
        min_len: 16,
        min_bits_per_char: 3.3,
    };

    /// Check `value` against these rules.
    ///
    /// # Errors
    ///
    /// Returns the first rule the value breaks.
    pub fn check(&self, value: &str) -> Result<(), WeakSecret> {
        if value.chars().count() < self.min_len {
            return Err(WeakSecret::TooShort { min: self.min_len });
        }

        let lower = value.to_ascii_lowercase();
        if let Some(fragment) = PLACEHOLDER_FRAGMENTS
            .iter()
            .find(|fragment| lower.contains(**fragment))
        {
            return Err(WeakSecret::Placeholder(fragment));
        }

        let bits = bits_per_char(value);
        if bits < self.min_bits_per_char {
            return Err(WeakSecret::LowEntropy {
                bits,
                min: self.min_bits_per_char,
            });
        }

        Ok(())
    }
}

/// Shannon entropy of the character distribution of `value`.
#[must_use]
pub fn bits_per_char(value: &str) -> f64 {
    let mut counts: BTreeMap<char, u32> = BTreeMap::new();
    for c in value.chars() {
        *counts.entry(c).or_default() += 1;
    }

    let total: u32 = counts.values().sum();
    if total == 0 {
        return 0.0;
    }

    let total = f64::from(total);
    counts
        .values()
        .map(|&n| {
            let p = f64::from(n) / total;
            -p * p.log2()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy_of_uniform_pairs() {
        assert!(bits_per_char("").abs() < f64::EPSILON);
        assert!(bits_per_char("zzzz").abs() < f64::EPSILON);
        assert!((bits_per_char("abab") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_random_looking_key_passes() {
        let rules = SecretRules::VENDOR_KEY;
        assert_eq!(rules.check("Qm7vT2kLx9RbN4wZp8Hd"), Ok(()));
    }

    #[test]
    fn test_rejections() {
        let rules = SecretRules::VENDOR_KEY;

        assert_eq!(rules.check("k3Y"), Err(WeakSecret::TooShort { min: 16 }));
        assert_eq!(
            rules.check("Your-Razorpay-Key-Here-123"),
            Err(WeakSecret::Placeholder("your-"))
        );
        assert!(matches!(
            rules.check("abababababababababab"),
            Err(WeakSecret::LowEntropy { .. })
        ));
    }
}
