//! Field-level grammar checks shared by several handlers.
//!
//! The original implementation validated these fields with a single regex
//! per request type; the intent of each character class is preserved here
//! (see `SPEC_FULL.md` §9 for the HELLO-FROM name regex anomaly this
//! resolves).

/// `<letter-digit-run>` — HELLO-FROM names.
pub fn is_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric())
}

/// `<letter-run>` — SEND destinations and scalar SET keys.
pub fn is_letters(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphabetic())
}

/// `<letter-hyphen-run>` — GET keys and ranged SET keys.
pub fn is_letters_or_hyphen(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphabetic() || c == '-')
}

/// `<real>` — `([0-9]*\.)?[0-9]+`.
pub fn parse_real(s: &str) -> Option<f64> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let digits_only = s.chars().all(|c| c.is_ascii_digit());
    let one_dot_with_trailing_digits =
        s.matches('.').count() == 1 && s.split('.').nth(1).is_some_and(|d| !d.is_empty());
    if !digits_only && !one_dot_with_trailing_digits {
        return None;
    }
    s.parse::<f64>().ok()
}

/// `<int>` — `[0-9]+`.
pub fn parse_int(s: &str) -> Option<u64> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_accepts_letters_and_digits_only() {
        assert!(is_name("alice"));
        assert!(is_name("alice123"));
        assert!(!is_name("alice-bob"));
        assert!(!is_name(""));
        assert!(!is_name("alice bob"));
    }

    #[test]
    fn real_matches_optional_integer_part() {
        assert_eq!(parse_real("0.5"), Some(0.5));
        assert_eq!(parse_real("5"), Some(5.0));
        assert_eq!(parse_real(".5"), Some(0.5));
        assert!(parse_real("5.").is_none());
        assert!(parse_real("").is_none());
        assert!(parse_real("abc").is_none());
    }

    #[test]
    fn int_rejects_non_digits() {
        assert_eq!(parse_int("42"), Some(42));
        assert!(parse_int("-1").is_none());
        assert!(parse_int("4.2").is_none());
    }

    #[test]
    fn letters_or_hyphen_accepts_dashed_keys() {
        assert!(is_letters_or_hyphen("BURST-LEN"));
        assert!(!is_letters_or_hyphen("BURST_LEN"));
    }
}
