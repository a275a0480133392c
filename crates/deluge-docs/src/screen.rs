//! OLED screen mockups.
//!
//! The Deluge OLED is 128×48 pixels, stored as six blocks of eight rows. Each
//! byte holds one column of one block, least significant bit on top, so the
//! pixel at `(x, y)` is bit `y % 8` of byte `(y / 8) * 128 + x`.
//!
//! Directives carry a frame as gzip-compressed bytes in base64. The frame is
//! rasterized into a PNG data URI with square, slightly separated pixels.

use std::io::Read;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use flate2::read::GzDecoder;
use tracing::debug;

use crate::config::ScreenConfig;
use crate::error::{Error, Result};
use crate::render::Element;

/// Screen width in pixels.
pub const SCREEN_WIDTH: usize = 128;

/// Screen height in pixels.
pub const SCREEN_HEIGHT: usize = 48;

/// Rows packed into each byte.
const BLOCK_ROWS: usize = 8;

/// Bytes in one full frame.
pub const FRAME_BYTES: usize = SCREEN_WIDTH * SCREEN_HEIGHT / BLOCK_ROWS;

/// Largest accepted scale.
pub const MAX_SCALE: u32 = 16;

/// Largest accepted pixel density.
pub const MAX_DENSITY: u32 = 4;

/// Largest accepted border, in screen pixels.
pub const MAX_PADDING: u32 = 16;

/// One decoded OLED frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OledFrame {
    bytes: Vec<u8>,
}

impl OledFrame {
    /// Decode a base64 gzip payload. Whitespace in the payload is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScreenPayload`] if the payload is not valid base64 or
    /// gzip, and [`Error::ScreenLength`] if it does not hold exactly one
    /// frame.
    pub fn decode(payload: &str) -> Result<Self> {
        let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        let compressed = STANDARD.decode(compact.as_bytes())?;

        let mut bytes = Vec::with_capacity(FRAME_BYTES);
        GzDecoder::new(compressed.as_slice())
            .read_to_end(&mut bytes)
            .map_err(|e| Error::screen_payload(format!("gzip: {e}")))?;

        Self::from_bytes(bytes)
    }

    /// Wrap raw frame bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScreenLength`] if `bytes` is not exactly one frame.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() != FRAME_BYTES {
            return Err(Error::ScreenLength {
                actual: bytes.len(),
                expected: FRAME_BYTES,
            });
        }
        Ok(Self { bytes })
    }

    /// Whether the pixel at column `x`, row `y` is lit.
    #[must_use]
    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return false;
        }
        let block = y / BLOCK_ROWS;
        let bit = y % BLOCK_ROWS;
        self.bytes[block * SCREEN_WIDTH + x] >> bit & 1 == 1
    }

    /// Coordinates of every lit pixel, block by block.
    pub fn lit_pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.bytes.iter().enumerate().flat_map(|(index, byte)| {
            let x = index % SCREEN_WIDTH;
            let block = index / SCREEN_WIDTH;
            (0..BLOCK_ROWS)
                .filter(move |bit| byte >> bit & 1 == 1)
                .map(move |bit| (x, block * BLOCK_ROWS + bit))
        })
    }
}

/// Fixed rendering parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenStyle {
    /// Extra pixel density on top of the scale.
    pub density: u32,
    /// Border around the screen, in screen pixels.
    pub padding: u32,
    /// Fraction of each pixel left empty.
    pub gap: f32,
    /// Background colour.
    pub background: [u8; 3],
    /// Lit pixel colour.
    pub foreground: [u8; 3],
}

impl ScreenStyle {
    /// Build a style from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured colour is invalid.
    pub fn from_config(config: &ScreenConfig) -> Result<Self> {
        Ok(Self {
            density: config.density,
            padding: config.padding,
            gap: config.gap,
            background: config.background_rgb()?,
            foreground: config.foreground_rgb()?,
        })
    }
}

impl Default for ScreenStyle {
    fn default() -> Self {
        Self {
            density: 2,
            padding: 4,
            gap: 0.1,
            background: [0x00, 0x00, 0x00],
            foreground: [0xff, 0xff, 0xff],
        }
    }
}

/// A rasterized screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenImage {
    /// `data:image/png;base64,...`
    pub data_uri: String,
    /// Logical width for the `<img>` tag, padding included.
    pub width: u32,
    /// Logical height for the `<img>` tag, padding included.
    pub height: u32,
}

impl ScreenImage {
    /// An `<img>` tag showing this screen.
    #[must_use]
    pub fn to_html(&self, alt: &str) -> String {
        let node: crate::render::Node = Element::img()
            .class("oled-screen")
            .attr("src", self.data_uri.as_str())
            .attr("width", self.width.to_string())
            .attr("height", self.height.to_string())
            .attr("alt", alt)
            .into();
        node.to_html()
    }

    /// The PNG bytes behind the data URI.
    ///
    /// # Errors
    ///
    /// Returns an error if the data URI is not base64 PNG data.
    pub fn png_bytes(&self) -> Result<Vec<u8>> {
        let encoded = self
            .data_uri
            .strip_prefix("data:image/png;base64,")
            .ok_or_else(|| Error::screen_payload("not a PNG data URI"))?;
        Ok(STANDARD.decode(encoded)?)
    }
}

/// Rasterize `frame` at `scale`.
///
/// The PNG canvas is `scale * density` device pixels per screen pixel; the
/// reported width and height are in CSS pixels (`scale` per screen pixel).
///
/// # Errors
///
/// Returns [`Error::InvalidScale`] if `scale` is 0 or above [`MAX_SCALE`],
/// [`Error::ConfigValidation`] if the style's density or padding is out of
/// range, or an encoding error.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn rasterize(frame: &OledFrame, scale: u32, style: &ScreenStyle) -> Result<ScreenImage> {
    if scale == 0 || scale > MAX_SCALE {
        return Err(Error::InvalidScale {
            value: scale.to_string(),
        });
    }

    if style.density == 0 || style.density > MAX_DENSITY || style.padding > MAX_PADDING {
        return Err(canvas_error(style));
    }

    let step = scale
        .checked_mul(style.density)
        .ok_or_else(|| canvas_error(style))?;
    let width = canvas_side(SCREEN_WIDTH, style.padding, step).ok_or_else(|| canvas_error(style))?;
    let height =
        canvas_side(SCREEN_HEIGHT, style.padding, step).ok_or_else(|| canvas_error(style))?;
    let canvas_pixels = (width as usize)
        .checked_mul(height as usize)
        .filter(|n| n.checked_mul(3).is_some())
        .ok_or_else(|| canvas_error(style))?;

    let step = step as usize;
    let padding = style.padding as usize;
    let canvas_width = width as usize;
    let side = ((step as f32 * (1.0 - style.gap)).round() as usize).clamp(1, step);

    let mut pixels = style.background.repeat(canvas_pixels);
    let mut lit = 0usize;
    for (x, y) in frame.lit_pixels() {
        lit += 1;
        let left = (padding + x) * step;
        let top = (padding + y) * step;
        for row in top..top + side {
            let start = (row * canvas_width + left) * 3;
            for chunk in pixels[start..start + side * 3].chunks_exact_mut(3) {
                chunk.copy_from_slice(&style.foreground);
            }
        }
    }

    let png = encode_png(&pixels, width, height)?;
    debug!(
        scale,
        lit,
        width,
        height,
        bytes = png.len(),
        "rasterized screen"
    );

    Ok(ScreenImage {
        data_uri: format!("data:image/png;base64,{}", STANDARD.encode(&png)),
        width: canvas_side(SCREEN_WIDTH, style.padding, scale).ok_or_else(|| canvas_error(style))?,
        height: canvas_side(SCREEN_HEIGHT, style.padding, scale)
            .ok_or_else(|| canvas_error(style))?,
    })
}

/// `(pixels + 2 * padding) * step`, or `None` if it does not fit a `u32`.
fn canvas_side(pixels: usize, padding: u32, step: u32) -> Option<u32> {
    u32::try_from(pixels)
        .ok()?
        .checked_add(padding.checked_mul(2)?)?
        .checked_mul(step)
}

fn canvas_error(style: &ScreenStyle) -> Error {
    Error::ConfigValidation {
        message: format!(
            "screen canvas too large (density {}, padding {})",
            style.density, style.padding
        ),
    }
}

fn encode_png(rgb: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut encoder = png::Encoder::new(&mut out, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(rgb)?;
    writer.finish()?;
    Ok(out)
}

/// Parse a `scale` attribute.
///
/// # Errors
///
/// Returns [`Error::InvalidScale`] if `value` is not a positive integer no
/// larger than [`MAX_SCALE`].
pub fn parse_scale(value: &str) -> Result<u32> {
    match value.trim().parse::<u32>() {
        Ok(scale) if (1..=MAX_SCALE).contains(&scale) => Ok(scale),
        _ => Err(Error::InvalidScale {
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;

    use super::*;

    fn payload(bytes: &[u8]) -> String {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes).unwrap();
        STANDARD.encode(encoder.finish().unwrap())
    }

    fn frame_with(pixels: &[(usize, usize)]) -> Vec<u8> {
        let mut bytes = vec![0u8; FRAME_BYTES];
        for &(x, y) in pixels {
            bytes[(y / 8) * SCREEN_WIDTH + x] |= 1 << (y % 8);
        }
        bytes
    }

    fn decode_png(bytes: &[u8]) -> (png::OutputInfo, Vec<u8>) {
        let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        (info, buf)
    }

    #[test]
    fn test_frame_bytes() {
        assert_eq!(FRAME_BYTES, 768);
    }

    #[test]
    fn test_decode_valid_payload() {
        let frame = OledFrame::decode(&payload(&frame_with(&[(0, 0), (127, 47)]))).unwrap();
        assert!(frame.is_lit(0, 0));
        assert!(frame.is_lit(127, 47));
        assert!(!frame.is_lit(1, 0));
        assert_eq!(frame.lit_pixels().count(), 2);
    }

    #[test]
    fn test_decode_ignores_whitespace() {
        let encoded = payload(&frame_with(&[(5, 9)]));
        let (a, b) = encoded.split_at(10);
        let frame = OledFrame::decode(&format!("  {a}\n  {b}\n")).unwrap();
        assert!(frame.is_lit(5, 9));
    }

    #[test]
    fn test_decode_wrong_length() {
        let err = OledFrame::decode(&payload(&[0u8; 100])).unwrap_err();
        match err {
            Error::ScreenLength { actual, expected } => {
                assert_eq!(actual, 100);
                assert_eq!(expected, 768);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decode_bad_base64() {
        assert!(matches!(
            OledFrame::decode("not base64!"),
            Err(Error::ScreenPayload { .. })
        ));
    }

    #[test]
    fn test_decode_not_gzip() {
        let err = OledFrame::decode(&STANDARD.encode([1u8, 2, 3])).unwrap_err();
        assert!(err.to_string().contains("gzip"));
    }

    #[test]
    fn test_bit_layout() {
        // Byte 128 is block 1, column 0; bit 3 is row 8 + 3
        let mut bytes = vec![0u8; FRAME_BYTES];
        bytes[SCREEN_WIDTH] = 0b0000_1000;
        let frame = OledFrame::from_bytes(bytes).unwrap();
        assert_eq!(frame.lit_pixels().collect::<Vec<_>>(), vec![(0, 11)]);
        assert!(frame.is_lit(0, 11));
    }

    #[test]
    fn test_rasterize_dimensions() {
        let frame = OledFrame::from_bytes(vec![0; FRAME_BYTES]).unwrap();
        let image = rasterize(&frame, 2, &ScreenStyle::default()).unwrap();
        assert_eq!(image.width, (128 + 8) * 2);
        assert_eq!(image.height, (48 + 8) * 2);
        assert!(image.data_uri.starts_with("data:image/png;base64,"));

        let (info, _) = decode_png(&image.png_bytes().unwrap());
        assert_eq!(info.width, (128 + 8) * 4);
        assert_eq!(info.height, (48 + 8) * 4);
    }

    #[test]
    fn test_rasterize_pixel_position() {
        let style = ScreenStyle {
            density: 1,
            padding: 1,
            gap: 0.5,
            background: [1, 2, 3],
            foreground: [200, 201, 202],
        };
        let frame = OledFrame::from_bytes(frame_with(&[(2, 3)])).unwrap();
        let image = rasterize(&frame, 4, &style).unwrap();
        let (info, buf) = decode_png(&image.png_bytes().unwrap());
        let width = info.width as usize;
        let at = |x: usize, y: usize| &buf[(y * width + x) * 3..(y * width + x) * 3 + 3];

        // Pixel (2, 3) with 1px padding at step 4 starts at (12, 16), side 2
        assert_eq!(at(12, 16), &[200, 201, 202]);
        assert_eq!(at(13, 17), &[200, 201, 202]);
        assert_eq!(at(14, 16), &[1, 2, 3]);
        assert_eq!(at(12, 18), &[1, 2, 3]);
        assert_eq!(at(0, 0), &[1, 2, 3]);
    }

    #[test]
    fn test_rasterize_rejects_bad_scale() {
        let frame = OledFrame::from_bytes(vec![0; FRAME_BYTES]).unwrap();
        assert!(matches!(
            rasterize(&frame, 0, &ScreenStyle::default()),
            Err(Error::InvalidScale { .. })
        ));
        assert!(rasterize(&frame, MAX_SCALE + 1, &ScreenStyle::default()).is_err());
    }

    #[test]
    fn test_rasterize_rejects_oversized_style() {
        let frame = OledFrame::from_bytes(frame_with(&[(0, 0)])).unwrap();
        for style in [
            ScreenStyle {
                density: u32::MAX / 2,
                ..ScreenStyle::default()
            },
            ScreenStyle {
                density: 0,
                ..ScreenStyle::default()
            },
            ScreenStyle {
                padding: u32::MAX,
                ..ScreenStyle::default()
            },
        ] {
            assert!(matches!(
                rasterize(&frame, 2, &style),
                Err(Error::ConfigValidation { .. })
            ));
        }
    }

    #[test]
    fn test_rasterize_largest_style() {
        let style = ScreenStyle {
            density: MAX_DENSITY,
            padding: MAX_PADDING,
            ..ScreenStyle::default()
        };
        let frame = OledFrame::from_bytes(vec![0; FRAME_BYTES]).unwrap();
        let image = rasterize(&frame, 1, &style).unwrap();
        assert_eq!(image.width, 128 + 2 * MAX_PADDING);
        assert_eq!(image.height, 48 + 2 * MAX_PADDING);
    }

    #[test]
    fn test_parse_scale() {
        assert_eq!(parse_scale("3").unwrap(), 3);
        assert_eq!(parse_scale(" 2 ").unwrap(), 2);
        assert!(parse_scale("0").is_err());
        assert!(parse_scale("big").is_err());
    }

    #[test]
    fn test_style_from_config() {
        let style = ScreenStyle::from_config(&ScreenConfig::default()).unwrap();
        assert_eq!(style, ScreenStyle::default());
    }

    #[test]
    fn test_to_html() {
        let image = ScreenImage {
            data_uri: "data:image/png;base64,AAAA".to_string(),
            width: 10,
            height: 20,
        };
        assert_eq!(
            image.to_html("Menu \"Save\""),
            "<img class=\"oled-screen\" src=\"data:image/png;base64,AAAA\" width=\"10\" height=\"20\" alt=\"Menu &quot;Save&quot;\">"
        );
    }
}
