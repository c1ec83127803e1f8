use crate::error::{ApiError, FieldError};

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 30;
const PASSWORD_MIN: usize = 6;

/// Validate registration input, collecting every field failure.
pub fn validate_registration(username: &str, email: &str, password: &str) -> Result<(), ApiError> {
    let mut errors = Vec::new();

    if let Err(msg) = validate_username_format(username) {
        errors.push(FieldError::new("username", msg));
    }
    if let Err(msg) = validate_email_format(email) {
        errors.push(FieldError::new("email", msg));
    }
    if let Err(msg) = validate_password_format(password) {
        errors.push(FieldError::new("password", msg));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error("Validation failed", Some(errors)))
    }
}

/// Validate login input. Only presence and email shape are checked here;
/// credential correctness is the service's concern.
pub fn validate_login(email: &str, password: &str) -> Result<(), ApiError> {
    let mut errors = Vec::new();

    if let Err(msg) = validate_email_format(email) {
        errors.push(FieldError::new("email", msg));
    }
    if password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error("Validation failed", Some(errors)))
    }
}

pub fn validate_username_format(username: &str) -> Result<(), String> {
    let username = username.trim();
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    let len = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(format!(
            "Username must be between {} and {} characters",
            USERNAME_MIN, USERNAME_MAX
        ));
    }

    Ok(())
}

pub fn validate_email_format(email: &str) -> Result<(), String> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() || !parts[1].contains('.') {
        return Err("Please provide a valid email".to_string());
    }

    Ok(())
}

pub fn validate_password_format(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }
    if password.chars().count() < PASSWORD_MIN {
        return Err(format!("Password must be at least {} characters", PASSWORD_MIN));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_bounds() {
        assert!(validate_username_format("al").is_err());
        assert!(validate_username_format("ali").is_ok());
        assert!(validate_username_format(&"a".repeat(30)).is_ok());
        assert!(validate_username_format(&"a".repeat(31)).is_err());
        assert!(validate_username_format("  ").is_err());
    }

    #[test]
    fn email_shape() {
        assert!(validate_email_format("alice@example.com").is_ok());
        assert!(validate_email_format("").is_err());
        assert!(validate_email_format("alice").is_err());
        assert!(validate_email_format("alice@").is_err());
        assert!(validate_email_format("@example.com").is_err());
        assert!(validate_email_format("alice@nodot").is_err());
    }

    #[test]
    fn registration_collects_every_field_error() {
        let err = validate_registration("", "bad", "x").unwrap_err();
        match err {
            ApiError::ValidationError { errors: Some(errors), .. } => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["username", "email", "password"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
