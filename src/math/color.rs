use thiserror::Error;

/// Errors produced when parsing a CSS-style hex color
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("color must start with '#': {0:?}")]
    MissingHash(String),
    #[error("color must have 3 or 6 hex digits: {0:?}")]
    InvalidLength(String),
    #[error("invalid hex digit in color: {0:?}")]
    InvalidDigit(String),
}

/// Parse `#rgb` or `#rrggbb` into sRGB components in [0, 1]
pub fn parse_hex(input: &str) -> Result<[f32; 3], ColorError> {
    let digits = input
        .trim()
        .strip_prefix('#')
        .ok_or_else(|| ColorError::MissingHash(input.to_string()))?;
    if !digits.is_ascii() {
        return Err(ColorError::InvalidDigit(input.to_string()));
    }

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return Err(ColorError::InvalidLength(input.to_string())),
    };

    let mut rgb = [0.0; 3];
    for (channel, value) in rgb.iter_mut().enumerate() {
        let pair = &expanded[channel * 2..channel * 2 + 2];
        let byte = u8::from_str_radix(pair, 16)
            .map_err(|_| ColorError::InvalidDigit(input.to_string()))?;
        *value = byte as f32 / 255.0;
    }

    Ok(rgb)
}

/// Convert one sRGB-encoded channel to linear light
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Parse a hex color straight into linear RGB, ready for the GPU
pub fn hex_to_linear(input: &str) -> Result<[f32; 3], ColorError> {
    parse_hex(input).map(|rgb| rgb.map(srgb_to_linear))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_form() {
        let rgb = parse_hex("#8b5cf6").unwrap();
        assert!((rgb[0] - 139.0 / 255.0).abs() < 1e-6);
        assert!((rgb[1] - 92.0 / 255.0).abs() < 1e-6);
        assert!((rgb[2] - 246.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn parses_short_form() {
        assert_eq!(parse_hex("#fff").unwrap(), [1.0, 1.0, 1.0]);
        assert_eq!(parse_hex("#000").unwrap(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(parse_hex("8b5cf6"), Err(ColorError::MissingHash(_))));
        assert!(matches!(parse_hex("#8b5c"), Err(ColorError::InvalidLength(_))));
        assert!(matches!(parse_hex("#zzzzzz"), Err(ColorError::InvalidDigit(_))));
    }

    #[test]
    fn linear_conversion_keeps_endpoints() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-6);
        // Mid grey is darker in linear space
        assert!(srgb_to_linear(0.5) < 0.5);
    }
}
