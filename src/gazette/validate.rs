//! Form field predicates shared by the signup, login and birthday pages.

use regex::Regex;

pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn valid_username(username: &str) -> bool {
    Regex::new(r"^[a-zA-Z0-9_-]{3,20}$").is_ok_and(|re| re.is_match(username))
}

pub fn valid_password(password: &str) -> bool {
    Regex::new(r"^.{3,20}$").is_ok_and(|re| re.is_match(password))
}

/// Empty is accepted: the address is optional. Otherwise only a loose
/// `local@domain` shape is required; the domain needs no dot.
pub fn valid_email(email: &str) -> bool {
    email.is_empty() || Regex::new(r"^\S+@\S+.\S+$").is_ok_and(|re| re.is_match(email))
}

/// Messages for every failing signup predicate, in form order.
pub fn signup_errors(
    username: &str,
    password: &str,
    verify: &str,
    email: &str,
) -> Vec<&'static str> {
    let mut errors = Vec::new();

    if !valid_username(username) {
        errors.push("Please enter a valid username.");
    }

    if !valid_password(password) {
        errors.push("Please enter a valid password.");
    }

    if !valid_password(verify) {
        errors.push("Please verify your password.");
    }

    if password != verify {
        errors.push("Passwords do not match.");
    }

    if !valid_email(email) {
        errors.push("Please enter a valid email.");
    }

    errors
}

pub fn login_errors(username: &str, password: &str) -> Vec<&'static str> {
    let mut errors = Vec::new();

    if !valid_username(username) {
        errors.push("Please enter a valid username.");
    }

    if !valid_password(password) {
        errors.push("Please enter a valid password.");
    }

    errors
}

/// Normalize a month name in any case to its capitalized form.
pub fn valid_month(month: &str) -> Option<&'static str> {
    let lowered = month.to_lowercase();
    MONTHS
        .iter()
        .find(|name| name.to_lowercase() == lowered)
        .copied()
}

pub fn valid_day(day: &str) -> Option<u8> {
    parse_digits(day)
        .and_then(|d| u8::try_from(d).ok())
        .filter(|d| (1..=31).contains(d))
}

pub fn valid_year(year: &str) -> Option<u16> {
    parse_digits(year)
        .and_then(|y| u16::try_from(y).ok())
        .filter(|y| (1900..=2020).contains(y))
}

/// Plain ASCII digits only: no sign, no whitespace.
pub fn parse_digits(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_accepts_allowed_shapes() {
        for name in ["abc", "alice", "a_b-c", "ABCdef123", "aaaaaaaaaaaaaaaaaaaa"] {
            assert!(valid_username(name), "{name}");
        }
    }

    #[test]
    fn username_rejects_length_and_charset() {
        for name in [
            "",
            "ab",
            "aaaaaaaaaaaaaaaaaaaaa",
            "al ice",
            "alice!",
            "ali.ce",
            "álice",
            "alice\n",
        ] {
            assert!(!valid_username(name), "{name:?}");
        }
    }

    #[test]
    fn password_is_any_three_to_twenty_chars() {
        assert!(valid_password("abc"));
        assert!(valid_password("p@ss w0rd!"));
        assert!(valid_password("ééé"));
        assert!(!valid_password("ab"));
        assert!(!valid_password(&"x".repeat(21)));
    }

    #[test]
    fn email_is_optional_but_shaped() {
        assert!(valid_email(""));
        assert!(valid_email("alice@example.com"));
        assert!(valid_email("alice@localhost"));
        assert!(valid_email("a@bcd"));
        assert!(!valid_email("alice"));
        assert!(!valid_email("alice@ab"));
        assert!(!valid_email("@example.com"));
        assert!(!valid_email("alice@"));
        assert!(!valid_email("al ice@example.com"));
    }

    #[test]
    fn signup_errors_accumulate() {
        assert!(signup_errors("alice", "secret", "secret", "").is_empty());

        let errors = signup_errors("al", "secret", "mismatch", "nope");
        assert_eq!(
            errors,
            vec![
                "Please enter a valid username.",
                "Passwords do not match.",
                "Please enter a valid email.",
            ]
        );
    }

    #[test]
    fn signup_errors_flag_short_verify() {
        let errors = signup_errors("alice", "secret", "se", "");
        assert!(errors.contains(&"Please verify your password."));
        assert!(errors.contains(&"Passwords do not match."));
    }

    #[test]
    fn login_errors_ignore_email_and_verify() {
        assert!(login_errors("alice", "secret").is_empty());
        assert_eq!(login_errors("a", "s").len(), 2);
    }

    #[test]
    fn month_is_case_insensitive() {
        assert_eq!(valid_month("january"), Some("January"));
        assert_eq!(valid_month("jAnUaRy"), Some("January"));
        assert_eq!(valid_month("DECEMBER"), Some("December"));
        assert_eq!(valid_month("Jan"), None);
        assert_eq!(valid_month(""), None);
    }

    #[test]
    fn day_bounds() {
        assert_eq!(valid_day("1"), Some(1));
        assert_eq!(valid_day("31"), Some(31));
        assert_eq!(valid_day("0"), None);
        assert_eq!(valid_day("32"), None);
        assert_eq!(valid_day("-1"), None);
        assert_eq!(valid_day(" 1"), None);
        assert_eq!(valid_day("one"), None);
        assert_eq!(valid_day("99999999999999999999999"), None);
    }

    #[test]
    fn year_bounds() {
        assert_eq!(valid_year("1900"), Some(1900));
        assert_eq!(valid_year("2020"), Some(2020));
        assert_eq!(valid_year("1899"), None);
        assert_eq!(valid_year("2021"), None);
        assert_eq!(valid_year(""), None);
    }

    #[test]
    fn parse_digits_rejects_signs_and_blanks() {
        assert_eq!(parse_digits("5"), Some(5));
        assert_eq!(parse_digits("007"), Some(7));
        assert_eq!(parse_digits("+5"), None);
        assert_eq!(parse_digits("-5"), None);
        assert_eq!(parse_digits(" 5"), None);
        assert_eq!(parse_digits(""), None);
    }
}
