//! Display formatting for the tank list

use chrono::Datelike;

use crate::validate::parse_date;

/// Shown in place of the list when there are no records
pub const EMPTY_LIST_MESSAGE: &str = "No fish added yet. Add your first fish above!";

/// Format an ISO date as `M/D/YYYY`; unparseable input is returned as-is
pub fn format_date(iso: &str) -> String {
    match parse_date(iso) {
        Some(date) => format!("{}/{}/{}", date.month(), date.day(), date.year()),
        None => iso.to_string(),
    }
}

pub fn format_liters(amount: impl std::fmt::Display) -> String {
    format!("{} liters", amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-01"), "3/1/2024");
        assert_eq!(format_date("2023-12-25"), "12/25/2023");
        assert_eq!(format_date("soon"), "soon");
    }

    #[test]
    fn test_format_liters() {
        assert_eq!(format_liters(40), "40 liters");
        assert_eq!(format_liters("50kg"), "50kg liters");
    }
}
