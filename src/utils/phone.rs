use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::OnceLock;

static PHONE_RE: OnceLock<Regex> = OnceLock::new();

/// Indonesian mobile numbers: 08..., 628... or +628..., 9 to 13 digits
/// after the prefix.
pub fn validate_indonesian_phone(phone: &str) -> AppResult<()> {
    let re = PHONE_RE.get_or_init(|| Regex::new(r"^(\+62|62|0)8[0-9]{7,11}$").unwrap());

    if re.is_match(phone) {
        Ok(())
    } else {
        Err(AppError::ValidationError(format!(
            "Invalid Indonesian phone number: {phone}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_numbers() {
        assert!(validate_indonesian_phone("081234567890").is_ok());
        assert!(validate_indonesian_phone("+6281234567890").is_ok());
        assert!(validate_indonesian_phone("6281234567890").is_ok());
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(validate_indonesian_phone("12345").is_err());
        assert!(validate_indonesian_phone("0712345678").is_err()); // landline prefix
        assert!(validate_indonesian_phone("+14155550100").is_err());
        assert!(validate_indonesian_phone("08123").is_err()); // too short
    }
}
