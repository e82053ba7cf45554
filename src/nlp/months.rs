//! Spanish month vocabulary for query interpretation

use crate::core::normalize::normalize;

/// Month names in calendar order; the query vocabulary is Spanish.
pub const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Canonical name for a month number (1-12).
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTHS.get(month.checked_sub(1)? as usize).copied()
}

/// Month number (1-12) for a name, compared in normalized space.
pub fn month_number(name: &str) -> Option<u32> {
    let norm = normalize(name);
    MONTHS
        .iter()
        .position(|m| *m == norm)
        .map(|i| (i + 1) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_roundtrip() {
        for (i, name) in MONTHS.iter().enumerate() {
            let n = (i + 1) as u32;
            assert_eq!(month_number(name), Some(n));
            assert_eq!(month_name(n), Some(*name));
        }
    }

    #[test]
    fn test_month_number_accepts_unnormalized() {
        assert_eq!(month_number("Julio"), Some(7));
        assert_eq!(month_number("JULIO"), Some(7));
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
        assert_eq!(month_number("smarch"), None);
    }
}
