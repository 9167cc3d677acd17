use crate::utils::error::{MiscError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(MiscError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(MiscError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("worker.capacity", 5, 1).is_ok());
        assert!(validate_positive_number("worker.capacity", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("timezone.offset_minutes", 60, -1440, 1440).is_ok());
        assert!(validate_range("timezone.offset_minutes", 1500, -1440, 1440).is_err());
        assert!(validate_range("timezone.offset_minutes", -1440, -1440, 1440).is_ok());
    }
}
