use crate::api::errors::ApiError;
use crate::paper::catalog::MARK_VALUES;

pub(crate) const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn validate_username(username: &str) -> Result<(), ApiError> {
    let len = username.chars().count();
    if !(3..=32).contains(&len) {
        return Err(ApiError::BadRequest("Username must be 3-32 characters long".to_string()));
    }
    let valid = username
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-'));
    if !valid {
        return Err(ApiError::BadRequest(
            "Username may only contain letters, digits, '_', '.' and '-'".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    Ok(())
}

pub(crate) fn validate_mark_value(marks: i64) -> Result<(), ApiError> {
    if MARK_VALUES.contains(&marks) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "Marks must be one of {MARK_VALUES:?}, got {marks}"
        )))
    }
}

pub(crate) fn validate_difficulty(difficulty: i64) -> Result<(), ApiError> {
    if (1..=5).contains(&difficulty) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!("Difficulty must be between 1 and 5, got {difficulty}")))
    }
}
