//! # Email Checks
//!
//! Syntax validation for email addresses and the domain whitelist applied to
//! patient emails.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::FieldErrorKind;

/// Email domains accepted for patient records.
pub const ALLOWED_EMAIL_DOMAINS: &[&str] = &["hdfc.com", "icici.com"];

// local part: RFC 5322 atext with dots; domain: dotted labels, at least two.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$",
    )
    .expect("email regex is valid")
});

/// Check email syntax.
///
/// # Errors
///
/// Returns [`FieldErrorKind::InvalidEmail`] if `value` is not of the form
/// `local@domain.tld`.
pub fn validate_email_syntax(value: &str) -> Result<(), FieldErrorKind> {
    if value.len() > 254 || !EMAIL_RE.is_match(value) {
        return Err(FieldErrorKind::InvalidEmail(value.to_string()));
    }
    Ok(())
}

/// The domain part of an email (everything after the last `@`).
pub fn email_domain(value: &str) -> Option<&str> {
    value.rsplit_once('@').map(|(_, domain)| domain)
}

/// Check that an email's domain is whitelisted, returning the domain.
///
/// The comparison is ASCII case-insensitive; see [`normalize_email`] for
/// the stored form.
///
/// # Errors
///
/// Returns [`FieldErrorKind::InvalidDomain`] when the domain is not in
/// [`ALLOWED_EMAIL_DOMAINS`], and [`FieldErrorKind::InvalidEmail`] when there
/// is no `@` at all.
pub fn validate_email_domain(value: &str) -> Result<&str, FieldErrorKind> {
    let domain =
        email_domain(value).ok_or_else(|| FieldErrorKind::InvalidEmail(value.to_string()))?;
    if ALLOWED_EMAIL_DOMAINS
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(domain))
    {
        Ok(domain)
    } else {
        Err(FieldErrorKind::InvalidDomain {
            domain: domain.to_string(),
            allowed: ALLOWED_EMAIL_DOMAINS,
        })
    }
}

/// Stored form of an email: the domain is lowercased, the local part is
/// kept as supplied.
pub fn normalize_email(value: &str) -> String {
    match value.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_ascii_lowercase()),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_addresses() {
        assert!(validate_email_syntax("john@hdfc.com").is_ok());
        assert!(validate_email_syntax("first.last+tag@icici.com").is_ok());
        assert!(validate_email_syntax("a@sub.example.org").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(validate_email_syntax("").is_err());
        assert!(validate_email_syntax("john").is_err());
        assert!(validate_email_syntax("john@").is_err());
        assert!(validate_email_syntax("@hdfc.com").is_err());
        assert!(validate_email_syntax("john@hdfc").is_err());
        assert!(validate_email_syntax("jo hn@hdfc.com").is_err());
        assert!(validate_email_syntax("john@@hdfc.com").is_err());
        assert!(validate_email_syntax("john..doe@hdfc.com").is_err());
    }

    #[test]
    fn domain_whitelist() {
        assert_eq!(validate_email_domain("john@hdfc.com"), Ok("hdfc.com"));
        assert_eq!(validate_email_domain("john@icici.com"), Ok("icici.com"));
        assert_eq!(validate_email_domain("john@HDFC.com"), Ok("HDFC.com"));
    }

    #[test]
    fn foreign_domain_rejected() {
        match validate_email_domain("john@gmail.com") {
            Err(FieldErrorKind::InvalidDomain { domain, allowed }) => {
                assert_eq!(domain, "gmail.com");
                assert_eq!(allowed, ALLOWED_EMAIL_DOMAINS);
            }
            other => panic!("expected InvalidDomain, got {other:?}"),
        }
    }

    #[test]
    fn normalize_lowercases_domain_only() {
        assert_eq!(normalize_email("John@HDFC.COM"), "John@hdfc.com");
        assert_eq!(normalize_email("john@icici.com"), "john@icici.com");
    }

    #[test]
    fn subdomain_is_not_whitelisted() {
        assert!(matches!(
            validate_email_domain("john@mail.hdfc.com"),
            Err(FieldErrorKind::InvalidDomain { .. })
        ));
    }
}
