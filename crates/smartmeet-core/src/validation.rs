//! Caller-input validation helpers.
//!
//! Validation failures are rejected before any physical write is attempted,
//! so these run at the route boundary as well as inside the adapter.

use std::sync::OnceLock;

use regex::Regex;

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid regex")
    })
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Optional leading +, 7-15 digits, spaces/dashes tolerated between groups.
    RE.get_or_init(|| Regex::new(r"^\+?[0-9][0-9 \-]{5,18}[0-9]$").expect("valid regex"))
}

/// Whether `s` looks like a deliverable email address.
pub fn validate_email(s: &str) -> bool {
    email_re().is_match(s.trim())
}

/// Whether `s` looks like a messaging-capable phone number.
pub fn validate_phone(s: &str) -> bool {
    let trimmed = s.trim();
    if !phone_re().is_match(trimmed) {
        return false;
    }
    let digits = trimmed.chars().filter(char::is_ascii_digit).count();
    (7..=15).contains(&digits)
}

/// Parse a human-entered duration into minutes.
///
/// Accepts a bare number (`"30"`), `"30 minutes"`, `"1 hour"`, or
/// `"1.5 hours"`. Returns `None` for anything else.
pub fn duration_to_mins(s: &str) -> Option<u32> {
    let trimmed = s.trim().to_ascii_lowercase();
    if trimmed.is_empty() {
        return None;
    }
    let mut parts = trimmed.split_whitespace();
    let amount: f64 = parts.next()?.parse().ok()?;
    if !amount.is_finite() || amount <= 0.0 {
        return None;
    }
    let mins = match parts.next() {
        None => amount,
        Some(unit) if unit.starts_with("min") => amount,
        Some(unit) if unit.starts_with("hour") || unit.starts_with("hr") => amount * 60.0,
        Some(_) => return None,
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(mins.round() as u32)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_emails() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("first.last+tag@sub.domain.co"));
        assert!(validate_email("  padded@example.com  "));
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(!validate_email("not-an-email"));
        assert!(!validate_email("missing@tld"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("spaces in@example.com"));
    }

    #[test]
    fn accepts_phone_numbers() {
        assert!(validate_phone("+14155550100"));
        assert!(validate_phone("415-555-0100"));
        assert!(validate_phone("415 555 0100"));
    }

    #[test]
    fn rejects_malformed_phones() {
        assert!(!validate_phone("12345"));
        assert!(!validate_phone("call-me-maybe"));
        assert!(!validate_phone("+1 (415) 555"));
    }

    #[test]
    fn duration_bare_number() {
        assert_eq!(duration_to_mins("30"), Some(30));
        assert_eq!(duration_to_mins(" 45 "), Some(45));
    }

    #[test]
    fn duration_minutes_and_hours() {
        assert_eq!(duration_to_mins("30 minutes"), Some(30));
        assert_eq!(duration_to_mins("90 mins"), Some(90));
        assert_eq!(duration_to_mins("1 hour"), Some(60));
        assert_eq!(duration_to_mins("1.5 hours"), Some(90));
    }

    #[test]
    fn duration_rejects_garbage() {
        assert_eq!(duration_to_mins(""), None);
        assert_eq!(duration_to_mins("soon"), None);
        assert_eq!(duration_to_mins("-30 minutes"), None);
        assert_eq!(duration_to_mins("30 fortnights"), None);
    }
}
