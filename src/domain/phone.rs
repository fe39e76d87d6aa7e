use std::fmt;

const SUBSCRIBER_DIGITS: usize = 10;

/// A phone number reduced to the 10-digit subscriber form the provider expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Strips everything but ASCII digits, then keeps the trailing ten so
    /// country-code prefixes such as `+91` fall away.
    pub fn normalize(raw: &str) -> Self {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        let start = digits.len().saturating_sub(SUBSCRIBER_DIGITS);
        Self(digits[start..].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
