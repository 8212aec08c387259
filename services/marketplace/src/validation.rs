//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use crate::models::{CreatePropertyRequest, SignupRequest};

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate a signup payload for either principal kind
pub fn validate_signup(req: &SignupRequest) -> Result<(), String> {
    validate_email(&req.email)?;

    if req.password.is_empty() {
        return Err("Password is required".to_string());
    }

    if req.name.chars().count() > 100 {
        return Err("Name must be at most 100 characters long".to_string());
    }

    Ok(())
}

/// Validate a property listing
pub fn validate_property(req: &CreatePropertyRequest) -> Result<(), String> {
    if req.property_name.trim().is_empty() {
        return Err("Property name is required".to_string());
    }

    if req.property_name.chars().count() > 100 {
        return Err("Property name must be at most 100 characters long".to_string());
    }

    if req.description.chars().count() > 500 {
        return Err("Description must be at most 500 characters long".to_string());
    }

    if req.price < 0 {
        return Err("Price must not be negative".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            name: "Alice".to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("alice@x.com").is_ok());
        assert!(validate_email("first.last+tag@example.co.uk").is_ok());
        assert_eq!(validate_email("").unwrap_err(), "Email is required");
        assert_eq!(validate_email("alice").unwrap_err(), "Invalid email format");
        assert_eq!(validate_email("alice@x").unwrap_err(), "Invalid email format");
    }

    #[test]
    fn test_validate_signup() {
        assert!(validate_signup(&signup("alice@x.com", "pw123")).is_ok());
        assert_eq!(
            validate_signup(&signup("alice@x.com", "")).unwrap_err(),
            "Password is required"
        );

        let mut long_name = signup("alice@x.com", "pw123");
        long_name.name = "a".repeat(101);
        assert!(validate_signup(&long_name).is_err());
    }

    #[test]
    fn test_validate_property() {
        let valid = CreatePropertyRequest {
            property_name: "Lake House".to_string(),
            description: "By the water".to_string(),
            price: 12_000,
        };
        assert!(validate_property(&valid).is_ok());

        let blank = CreatePropertyRequest {
            property_name: "  ".to_string(),
            ..valid.clone()
        };
        assert_eq!(
            validate_property(&blank).unwrap_err(),
            "Property name is required"
        );

        let negative = CreatePropertyRequest {
            price: -1,
            ..valid
        };
        assert_eq!(
            validate_property(&negative).unwrap_err(),
            "Price must not be negative"
        );
    }
}
