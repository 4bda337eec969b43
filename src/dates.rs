use crate::error::{ExtratoError, Result};

/// A statement date normalized from the raw `D/M/Y` string. Extractors
/// sometimes cannot read the year from a statement line; those come in
/// with a literal `xx` year and stay unknown until a caller resolves
/// them against the batch's upload year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementDate {
    pub day: u32,
    pub month: u32,
    pub year: Option<i32>,
}

impl StatementDate {
    /// Parse a raw statement date. Fewer than three `/`-separated parts
    /// or a non-numeric day/month signal `InvalidDateFormat`; callers
    /// skip the affected record rather than failing the batch.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut parts = raw.trim().split('/');
        let (day, month, year) = match (parts.next(), parts.next(), parts.next()) {
            (Some(d), Some(m), Some(y)) => (d, m, y),
            _ => return Err(ExtratoError::InvalidDateFormat(raw.to_string())),
        };

        let day: u32 = day
            .trim()
            .parse()
            .map_err(|_| ExtratoError::InvalidDateFormat(raw.to_string()))?;
        let month: u32 = month
            .trim()
            .parse()
            .map_err(|_| ExtratoError::InvalidDateFormat(raw.to_string()))?;

        let year = year.trim();
        let year = if year == "xx" {
            None
        } else if year.len() == 2 {
            let two: i32 = year
                .parse()
                .map_err(|_| ExtratoError::InvalidDateFormat(raw.to_string()))?;
            Some(2000 + two)
        } else {
            Some(
                year.parse()
                    .map_err(|_| ExtratoError::InvalidDateFormat(raw.to_string()))?,
            )
        };

        Ok(Self { day, month, year })
    }

    /// The year, substituting `fallback` (normally the batch's upload
    /// year) when the statement did not carry one.
    pub fn year_or(&self, fallback: i32) -> i32 {
        self.year.unwrap_or(fallback)
    }

    /// Render as `DD/MM/YYYY`; an unresolved year shows the `20xx`
    /// placeholder.
    pub fn display(&self) -> String {
        match self.year {
            Some(year) => format!("{:02}/{:02}/{year}", self.day, self.month),
            None => format!("{:02}/{:02}/20xx", self.day, self.month),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_digit_year_expands() {
        let d = StatementDate::parse("05/03/24").unwrap();
        assert_eq!(d, StatementDate { day: 5, month: 3, year: Some(2024) });
    }

    #[test]
    fn test_four_digit_year() {
        let d = StatementDate::parse("05/03/2024").unwrap();
        assert_eq!(d, StatementDate { day: 5, month: 3, year: Some(2024) });
    }

    #[test]
    fn test_unknown_year_uses_fallback() {
        let d = StatementDate::parse("05/03/xx").unwrap();
        assert_eq!(d.year, None);
        assert_eq!(d.year_or(2023), 2023);
    }

    #[test]
    fn test_unknown_year_placeholder() {
        let d = StatementDate::parse("5/3/xx").unwrap();
        assert_eq!(d.display(), "05/03/20xx");
    }

    #[test]
    fn test_known_year_display() {
        let d = StatementDate::parse("9/12/25").unwrap();
        assert_eq!(d.display(), "09/12/2025");
    }

    #[test]
    fn test_too_few_parts_rejected() {
        assert!(matches!(
            StatementDate::parse("05/03"),
            Err(ExtratoError::InvalidDateFormat(_))
        ));
        assert!(matches!(
            StatementDate::parse("2024-03-05"),
            Err(ExtratoError::InvalidDateFormat(_))
        ));
    }

    #[test]
    fn test_non_numeric_parts_rejected() {
        assert!(StatementDate::parse("aa/03/24").is_err());
        assert!(StatementDate::parse("05/bb/24").is_err());
        assert!(StatementDate::parse("05/03/abcd").is_err());
    }
}
