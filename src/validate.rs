use crate::{HueError, Result};

/// Rejects blank values with `"<what> must not be empty"`.
pub(crate) fn not_blank<'a>(what: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(HueError::validation(format!("{what} must not be empty")))
    } else {
        Ok(trimmed)
    }
}

/// Rejects values that would leave their URL path segment once joined onto a resource path.
pub(crate) fn path_segment<'a>(what: &str, value: &'a str) -> Result<&'a str> {
    if value.contains(['/', '\\', '?', '#', '%']) || value.contains("..") {
        Err(HueError::validation(format!("{what} {value} is not a valid ID")))
    } else {
        Ok(value)
    }
}

pub(crate) fn name(value: &str) -> Result<&str> {
    not_blank("Name", value)
}

pub(crate) fn color_params(x: f64, y: f64, bri: u8, hue: u32, sat: u8) -> Result<()> {
    if !(0.0..=1.0).contains(&x) {
        return Err(HueError::validation(
            "Invalid color value: x must be between 0 and 1",
        ));
    }
    if !(0.0..=1.0).contains(&y) {
        return Err(HueError::validation(
            "Invalid color value: y must be between 0 and 1",
        ));
    }
    if !(1..=254).contains(&bri) {
        return Err(HueError::validation(
            "Invalid brightness value: bri must be between 1 and 254",
        ));
    }
    if hue > 65535 {
        return Err(HueError::validation(
            "Invalid hue value: hue must be between 0 and 65,535",
        ));
    }
    if sat > 254 {
        return Err(HueError::validation(
            "Invalid saturation value: sat must be between 0 and 254",
        ));
    }
    Ok(())
}
