use std::io::Cursor;

use {
    base64::{Engine as _, engine::general_purpose::STANDARD as BASE64},
    image::{GrayImage, Luma},
    qrcode::{Color, EcLevel, QrCode},
};

/// Pixels per module in the raster render.
const MODULE_PX: u32 = 10;
/// Quiet-zone width around the raster render, in modules.
const QUIET_ZONE: u32 = 4;
/// Characters for one module in the ASCII render.
const DARK_BLOCK: &str = "██";
const LIGHT_BLOCK: &str = "  ";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The payload does not fit any QR version (raw strings top out around
    /// 2.9 KB in byte mode at the lowest error-correction level).
    #[error("failed to encode QR payload: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("failed to rasterize QR symbol: {0}")]
    Image(#[from] image::ImageError),
}

/// The two derived renderings of a pairing string.
///
/// Disposable by design: callers keep the raw string authoritative and
/// regenerate these on every fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrRender {
    /// Two characters per module, rows newline-terminated.
    pub ascii: String,
    /// `data:image/png;base64,…` of the same symbol.
    pub image_data_uri: String,
}

/// Encode `raw` into a QR symbol and produce both renderings.
///
/// The version is selected automatically to fit the payload (pairing strings
/// run well past the ~25 alphanumeric characters a fixed version 1 symbol
/// holds), at the lowest error-correction level. Deterministic: identical
/// input yields byte-identical output.
pub fn render(raw: &str) -> Result<QrRender, RenderError> {
    let code = QrCode::with_error_correction_level(raw.as_bytes(), EcLevel::L)?;
    let width = code.width();
    let modules = code.to_colors();

    Ok(QrRender {
        ascii: render_ascii(width, &modules),
        image_data_uri: render_png_data_uri(width, &modules)?,
    })
}

fn render_ascii(width: usize, modules: &[Color]) -> String {
    let mut out = String::with_capacity((width * 2 + 1) * width);
    for row in modules.chunks(width) {
        for module in row {
            out.push_str(match module {
                Color::Dark => DARK_BLOCK,
                Color::Light => LIGHT_BLOCK,
            });
        }
        out.push('\n');
    }
    out
}

fn render_png_data_uri(width: usize, modules: &[Color]) -> Result<String, RenderError> {
    let side = (width as u32 + 2 * QUIET_ZONE) * MODULE_PX;
    let mut img = GrayImage::from_pixel(side, side, Luma([255u8]));

    for (i, module) in modules.iter().enumerate() {
        if *module != Color::Dark {
            continue;
        }
        let mx = (i % width) as u32 + QUIET_ZONE;
        let my = (i / width) as u32 + QUIET_ZONE;
        for dy in 0..MODULE_PX {
            for dx in 0..MODULE_PX {
                img.put_pixel(mx * MODULE_PX + dx, my * MODULE_PX + dy, Luma([0u8]));
            }
        }
    }

    let mut bytes: Vec<u8> = Vec::new();
    image::DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;

    Ok(format!("data:image/png;base64,{}", BASE64.encode(bytes)))
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    /// Something the size and shape of a real pairing string.
    const PAIRING: &str = "2@j7dXkMsplBnTxWqArZ9cVe3gLhYfQoKu1iN5wE8mDvS0tUbG4yHaPzRkCl6xIqOnJ,j7dXkMsplBnTxWqArZ9cVe3gLhYfQoKu1iN5wE8mDvS0tUbG4yHaPzRkCl6xIqOnJ,abcDEF+/=,0123456789abcdef";

    /// Re-parse the ASCII render into a module matrix.
    fn parse_ascii(ascii: &str) -> Vec<Vec<bool>> {
        ascii
            .lines()
            .map(|line| {
                line.chars()
                    .collect::<Vec<_>>()
                    .chunks(2)
                    .map(|pair| pair.iter().all(|&c| c == '█'))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn render_is_deterministic() {
        let a = render(PAIRING).unwrap();
        let b = render(PAIRING).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn ascii_preserves_every_module() {
        let code = QrCode::with_error_correction_level(PAIRING.as_bytes(), EcLevel::L).unwrap();
        let width = code.width();
        let modules = code.to_colors();

        let rendered = render(PAIRING).unwrap();
        let parsed = parse_ascii(&rendered.ascii);

        assert_eq!(parsed.len(), width);
        for (y, row) in parsed.iter().enumerate() {
            assert_eq!(row.len(), width);
            for (x, dark) in row.iter().enumerate() {
                assert_eq!(*dark, modules[y * width + x] == Color::Dark, "module ({x},{y})");
            }
        }
    }

    #[test]
    fn realistic_pairing_length_fits() {
        // ~150 characters must encode without truncation; a fixed version 1
        // symbol would have rejected or mangled this.
        assert!(PAIRING.len() >= 150);
        let rendered = render(PAIRING).unwrap();
        assert!(!rendered.ascii.is_empty());
        assert!(rendered.image_data_uri.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn image_decodes_to_expected_geometry() {
        let code = QrCode::with_error_correction_level(PAIRING.as_bytes(), EcLevel::L).unwrap();
        let side = (code.width() as u32 + 2 * QUIET_ZONE) * MODULE_PX;

        let rendered = render(PAIRING).unwrap();
        let b64 = rendered
            .image_data_uri
            .strip_prefix("data:image/png;base64,")
            .unwrap();
        let bytes = BASE64.decode(b64).unwrap();
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!(img.width(), side);
        assert_eq!(img.height(), side);
    }

    #[test]
    fn distinct_inputs_render_distinctly() {
        let a = render("2@first-pairing-string").unwrap();
        let b = render("2@second-pairing-string").unwrap();
        assert_ne!(a.ascii, b.ascii);
        assert_ne!(a.image_data_uri, b.image_data_uri);
    }

    #[test]
    fn rows_are_newline_terminated() {
        let rendered = render("2@tiny").unwrap();
        assert!(rendered.ascii.ends_with('\n'));
        let widths: Vec<usize> = rendered.ascii.lines().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "ragged rows");
    }
}
