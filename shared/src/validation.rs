//! Input validation functions
//!
//! Field validators return `Result<(), String>`; [`validate_profile`]
//! composes them into a [`ValidationError`] that names the offending field.

use crate::models::UserProfile;
use thiserror::Error;

/// Validate weight value (in kg)
pub fn validate_weight(weight_kg: f64) -> Result<(), String> {
    if weight_kg.is_nan() || weight_kg.is_infinite() {
        return Err("Weight must be a valid number".to_string());
    }
    if weight_kg < 20.0 {
        return Err("Weight must be at least 20 kg".to_string());
    }
    if weight_kg > 500.0 {
        return Err("Weight must be at most 500 kg".to_string());
    }
    Ok(())
}

/// Validate height value (in cm)
/// Valid range: 50-300 cm (covers infants to tallest recorded humans)
pub fn validate_height_cm(height_cm: f64) -> Result<(), String> {
    if height_cm.is_nan() || height_cm.is_infinite() {
        return Err("Height must be a valid number".to_string());
    }
    if height_cm < 50.0 {
        return Err("Height must be at least 50 cm".to_string());
    }
    if height_cm > 300.0 {
        return Err("Height must be at most 300 cm".to_string());
    }
    Ok(())
}

/// Validate age in years
pub fn validate_age(age: u32) -> Result<(), String> {
    if age < 1 {
        return Err("Age must be at least 1 year".to_string());
    }
    if age > 150 {
        return Err("Age cannot exceed 150 years".to_string());
    }
    Ok(())
}

/// Validate free time for a single day (in hours)
pub fn validate_free_time_hours(hours: f64) -> Result<(), String> {
    if hours.is_nan() || hours.is_infinite() {
        return Err("Free time must be a valid number".to_string());
    }
    if hours < 0.0 {
        return Err("Free time cannot be negative".to_string());
    }
    if hours > 24.0 {
        return Err("Free time cannot exceed 24 hours".to_string());
    }
    Ok(())
}

/// Validate a complete profile, reporting the first bad field
pub fn validate_profile(profile: &UserProfile) -> Result<(), ValidationError> {
    validate_weight(profile.weight).map_err(|msg| ValidationError::new("weight", &msg))?;
    validate_height_cm(profile.height).map_err(|msg| ValidationError::new("height", &msg))?;
    validate_age(profile.age).map_err(|msg| ValidationError::new("age", &msg))?;

    for day in profile.availability.iter() {
        validate_free_time_hours(day.free_time).map_err(|msg| {
            ValidationError::new(&format!("availability.{}", day.week_day), &msg)
        })?;
    }

    Ok(())
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "weight" => "Weight",
        "height" => "Height",
        "age" => "Age",
        "gender" => "Gender",
        "activity_level" => "Activity Level",
        f if f.starts_with("availability") => "Free Time",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{display_label}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }
}
