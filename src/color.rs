use image::Rgba;

/// Parse a CSS-style hex color (`#rgb`, `#rrggbb`, `#rrggbbaa`) into RGBA.
/// The transparent sentinel never reaches this; callers check
/// `Pixel::is_transparent` first.
pub fn parse_hex(color: &str) -> Result<Rgba<u8>, String> {
    let hex = color
        .strip_prefix('#')
        .ok_or_else(|| format!("not a hex color: {:?}", color))?;
    if !hex.is_ascii() {
        return Err(format!("not a hex color: {:?}", color));
    }

    match hex.len() {
        3 => {
            let r = nibble(hex, 0, color)?;
            let g = nibble(hex, 1, color)?;
            let b = nibble(hex, 2, color)?;
            Ok(Rgba([r * 17, g * 17, b * 17, 255]))
        }
        6 => Ok(Rgba([
            byte(hex, 0, color)?,
            byte(hex, 2, color)?,
            byte(hex, 4, color)?,
            255,
        ])),
        8 => Ok(Rgba([
            byte(hex, 0, color)?,
            byte(hex, 2, color)?,
            byte(hex, 4, color)?,
            byte(hex, 6, color)?,
        ])),
        _ => Err(format!("not a hex color: {:?}", color)),
    }
}

fn nibble(hex: &str, index: usize, original: &str) -> Result<u8, String> {
    u8::from_str_radix(&hex[index..index + 1], 16)
        .map_err(|_| format!("not a hex color: {:?}", original))
}

fn byte(hex: &str, index: usize, original: &str) -> Result<u8, String> {
    u8::from_str_radix(&hex[index..index + 2], 16)
        .map_err(|_| format!("not a hex color: {:?}", original))
}
