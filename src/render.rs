use anyhow::{Context, Result, anyhow, bail};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage, imageops::FilterType};
use qrcode::{Color, EcLevel, QrCode, Version};

const QR_VERSION: i16 = 5;
const MARGIN_MODULES: u32 = 1;

/// Effective rendering parameters for one QR image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub text: String,
    pub width: u32,
    pub height: u32,
    pub color_dark: String,
    pub color_light: String,
    pub bg_color: String,
    pub widget_size: u32,
    pub text_inside: String,
}

/// Turns rendering parameters into an encoded image.
pub trait QrEncoder: Send + Sync {
    fn encode_png(&self, options: &RenderOptions) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PngQrEncoder;

impl QrEncoder for PngQrEncoder {
    fn encode_png(&self, options: &RenderOptions) -> Result<Vec<u8>> {
        let image = render_qr(options)?;
        let mut output = Vec::new();
        DynamicImage::ImageRgba8(image)
            .write_to(&mut std::io::Cursor::new(&mut output), ImageFormat::Png)
            .map_err(|err| anyhow!("encode png failed: {err}"))?;
        Ok(output)
    }
}

/// Rasterizes the symbol at `widget_size` pixels per module, then scales it to
/// exactly `width` x `height`.
pub fn render_qr(options: &RenderOptions) -> Result<RgbaImage> {
    if options.widget_size == 0 || options.width == 0 || options.height == 0 {
        bail!("image dimensions and widget size must be positive");
    }
    let dark = parse_hex_color(&options.color_dark).context("invalid colorDark")?;
    let light = parse_hex_color(&options.color_light).context("invalid colorLight")?;
    let background = parse_hex_color(&options.bg_color).context("invalid bgColor")?;

    let code = QrCode::with_version(
        options.text.as_bytes(),
        Version::Normal(QR_VERSION),
        EcLevel::M,
    )
    .map_err(|err| anyhow!("qr encode failed: {err}"))?;
    let modules = code.width() as u32;
    let colors = code.to_colors();

    let total_modules = modules + 2 * MARGIN_MODULES;
    let side = total_modules
        .checked_mul(options.widget_size)
        .ok_or_else(|| anyhow!("widget size too large"))?;

    let raster = RgbaImage::from_fn(side, side, |x, y| {
        let mx = x / options.widget_size;
        let my = y / options.widget_size;
        let inside = (MARGIN_MODULES..MARGIN_MODULES + modules).contains(&mx)
            && (MARGIN_MODULES..MARGIN_MODULES + modules).contains(&my);
        if !inside {
            return background;
        }
        let index = ((my - MARGIN_MODULES) * modules + (mx - MARGIN_MODULES)) as usize;
        match colors[index] {
            Color::Dark => dark,
            Color::Light => light,
        }
    });

    if raster.dimensions() == (options.width, options.height) {
        return Ok(raster);
    }
    Ok(image::imageops::resize(
        &raster,
        options.width,
        options.height,
        FilterType::Nearest,
    ))
}

/// Parses `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
pub fn parse_hex_color(raw: &str) -> Result<Rgba<u8>> {
    let hex = raw.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("invalid hex color: {raw}");
    }
    let expanded: String = match hex.len() {
        3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => hex.to_string(),
        _ => bail!("invalid hex color: {raw}"),
    };
    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16);
    let alpha = if expanded.len() == 8 { channel(6)? } else { u8::MAX };
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(text: &str) -> RenderOptions {
        RenderOptions {
            text: text.to_string(),
            width: 300,
            height: 300,
            color_dark: "#000000".into(),
            color_light: "#ffffff".into(),
            bg_color: "#ffffff".into(),
            widget_size: 4,
            text_inside: String::new(),
        }
    }

    #[test]
    fn parses_short_and_long_hex_forms() {
        assert_eq!(parse_hex_color("#000").unwrap(), Rgba([0, 0, 0, 255]));
        assert_eq!(parse_hex_color("#ff8000").unwrap(), Rgba([255, 128, 0, 255]));
        assert_eq!(parse_hex_color("#ff800080").unwrap(), Rgba([255, 128, 0, 128]));
        assert_eq!(parse_hex_color("#fa0c").unwrap(), Rgba([255, 170, 0, 204]));
    }

    #[test]
    fn rejects_non_hex_colors() {
        assert!(parse_hex_color("red").is_err());
        assert!(parse_hex_color("#12345").is_err());
        assert!(parse_hex_color("#gggggg").is_err());
    }

    #[test]
    fn output_matches_requested_dimensions() {
        let mut opts = options("hello");
        opts.width = 250;
        opts.height = 120;
        let image = render_qr(&opts).unwrap();
        assert_eq!(image.dimensions(), (250, 120));
    }

    #[test]
    fn unscaled_raster_keeps_margin_in_background_color() {
        // version 5 is 37 modules wide, plus one margin module each side
        let mut opts = options("hello");
        opts.widget_size = 2;
        opts.width = 78;
        opts.height = 78;
        opts.bg_color = "#ff0000".into();
        let image = render_qr(&opts).unwrap();
        assert_eq!(image.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        // top-left finder pattern corner is dark
        assert_eq!(image.get_pixel(2, 2), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn payload_too_long_for_version_fails() {
        let opts = options(&"x".repeat(500));
        assert!(render_qr(&opts).is_err());
    }

    #[test]
    fn encoder_produces_png_bytes() {
        let bytes = PngQrEncoder.encode_png(&options("hello")).unwrap();
        assert!(bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]));
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (300, 300));
    }
}
