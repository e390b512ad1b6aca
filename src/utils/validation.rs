use crate::models::error::SError;
use crate::models::paths::PackPathRules;

/// Accepts names that are a single, visible path component.
fn check_component(name: &str) -> Result<(), SError> {
    let invalid = name.trim().is_empty()
        || name != name.trim()
        || name.starts_with('.')
        || name.chars().any(|c| matches!(c, '/' | '\\' | ':' | '\0') || c.is_control());

    if invalid {
        return Err(SError::InvalidName(name.to_string()));
    }
    Ok(())
}

pub fn validate_pack_name(name: &str) -> Result<(), SError> {
    check_component(name)
}

/// Mod file names additionally may not collide with the pack's own bookkeeping files.
pub fn validate_file_name(file_name: &str) -> Result<(), SError> {
    check_component(file_name)?;
    if PackPathRules::is_internal(file_name) {
        return Err(SError::InvalidName(file_name.to_string()));
    }
    Ok(())
}
