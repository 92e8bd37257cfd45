// ABOUTME: Per-state sales tax table used by the quote engine
// ABOUTME: Fifty states plus DC, looked up case-insensitively
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// Sales tax rates keyed by USPS two-letter code
pub const STATE_TAX_RATES: [(&str, f64); 51] = [
    ("AL", 0.04),
    ("AK", 0.00),
    ("AZ", 0.056),
    ("AR", 0.065),
    ("CA", 0.0625),
    ("CO", 0.029),
    ("CT", 0.0635),
    ("DE", 0.00),
    ("DC", 0.06),
    ("FL", 0.06),
    ("GA", 0.04),
    ("HI", 0.04),
    ("ID", 0.06),
    ("IL", 0.0625),
    ("IN", 0.07),
    ("IA", 0.06),
    ("KS", 0.065),
    ("KY", 0.06),
    ("LA", 0.05),
    ("ME", 0.055),
    ("MD", 0.06),
    ("MA", 0.0625),
    ("MI", 0.06),
    ("MN", 0.06875),
    ("MS", 0.07),
    ("MO", 0.04225),
    ("MT", 0.00),
    ("NE", 0.055),
    ("NV", 0.0685),
    ("NH", 0.00),
    ("NJ", 0.06625),
    ("NM", 0.04875),
    ("NY", 0.04),
    ("NC", 0.0475),
    ("ND", 0.05),
    ("OH", 0.0575),
    ("OK", 0.045),
    ("OR", 0.00),
    ("PA", 0.06),
    ("RI", 0.07),
    ("SC", 0.06),
    ("SD", 0.045),
    ("TN", 0.07),
    ("TX", 0.0625),
    ("UT", 0.0485),
    ("VT", 0.06),
    ("VA", 0.043),
    ("WA", 0.065),
    ("WV", 0.06),
    ("WI", 0.05),
    ("WY", 0.04),
];

/// Sales tax rate for a state code, 0.0 when the code is unknown
///
/// The lookup is case-insensitive; any other variation, including
/// surrounding whitespace, is an unknown code.
#[must_use]
pub fn state_tax_rate(state: &str) -> f64 {
    STATE_TAX_RATES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(state))
        .map_or(0.0, |&(_, rate)| rate)
}

/// Whether `state` is one of the 51 known codes
#[must_use]
pub fn is_known_state(state: &str) -> bool {
    STATE_TAX_RATES
        .iter()
        .any(|(known, _)| known.eq_ignore_ascii_case(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_has_unique_codes() {
        let codes: HashSet<&str> = STATE_TAX_RATES.iter().map(|(code, _)| *code).collect();
        assert_eq!(codes.len(), 51);
        assert!(codes.contains("DC"));
    }

    #[test]
    fn test_lookup_ignores_case_only() {
        assert!((state_tax_rate("mn") - 0.06875).abs() < f64::EPSILON);
        assert!((state_tax_rate("Tx") - 0.0625).abs() < f64::EPSILON);
        assert!(is_known_state("wy"));
        assert!(state_tax_rate(" TX").abs() < f64::EPSILON);
        assert!(state_tax_rate("TX ").abs() < f64::EPSILON);
        assert!(!is_known_state(" tx "));
    }

    #[test]
    fn test_unknown_codes_are_untaxed() {
        for code in ["", "XX", "PR", "CAL", "C"] {
            assert!(state_tax_rate(code).abs() < f64::EPSILON, "{code}");
            assert!(!is_known_state(code));
        }
    }
}
