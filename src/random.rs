//! Small randomization helpers shared by the value strategies

use rand::distr::Alphanumeric;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Non-blank alphanumeric string of exactly `len` characters
pub(crate) fn alphanumeric_string(rng: &mut ChaCha8Rng, len: usize) -> String {
    (0..len.max(1))
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}

/// Lowercase alphanumeric string, usable in host names and paths
pub(crate) fn lowercase_token(rng: &mut ChaCha8Rng, len: usize) -> String {
    alphanumeric_string(rng, len).to_ascii_lowercase()
}

/// Decimal digit string with a non-zero leading digit
pub(crate) fn digit_string(rng: &mut ChaCha8Rng, len: usize) -> String {
    let mut digits = String::with_capacity(len.max(1));
    digits.push(char::from(b'1' + rng.random_range(0..9u8)));
    for _ in 1..len.max(1) {
        digits.push(char::from(b'0' + rng.random_range(0..10u8)));
    }
    digits
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn strings_are_never_blank() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for len in [0, 1, 8, 32] {
            let s = alphanumeric_string(&mut rng, len);
            assert!(!s.trim().is_empty());
            assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn digit_strings_have_no_leading_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            let digits = digit_string(&mut rng, 24);
            assert_eq!(digits.len(), 24);
            assert_ne!(digits.as_bytes()[0], b'0');
            assert!(digits.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
