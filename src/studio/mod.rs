pub mod appointment;
pub mod expense;
pub mod service;

pub use appointment::{Appointment, UNNAMED_CLIENT};
pub use expense::Expense;
pub use service::{find_service, Service};

/// Renders an amount of cents as `units.cents`.
pub fn format_cents(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

/// Parses `12`, `12.5` or `12.50` (comma accepted as separator) into cents.
pub fn parse_cents(input: &str) -> Option<u64> {
    let normalized = input.trim().replace(',', ".");
    let (units, fraction) = match normalized.split_once('.') {
        Some((units, fraction)) => (units, fraction),
        None => (normalized.as_str(), ""),
    };

    if units.is_empty() || fraction.len() > 2 {
        return None;
    }

    let units: u64 = units.parse().ok()?;
    let fraction: u64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<u64>().ok()? * 10,
        _ => fraction.parse().ok()?,
    };

    units.checked_mul(100)?.checked_add(fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_cents_with_two_decimals() {
        assert_eq!(format_cents(4505), "45.05");
        assert_eq!(format_cents(0), "0.00");
    }

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(parse_cents("12"), Some(1200));
        assert_eq!(parse_cents("12.5"), Some(1250));
        assert_eq!(parse_cents("12,05"), Some(1205));
    }

    #[test]
    fn rejects_negative_and_malformed_amounts() {
        assert_eq!(parse_cents("-3"), None);
        assert_eq!(parse_cents("1.234"), None);
        assert_eq!(parse_cents("abc"), None);
        assert_eq!(parse_cents(".5"), None);
    }
}
