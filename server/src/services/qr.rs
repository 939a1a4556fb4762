use std::io::Cursor;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{imageops, DynamicImage, ImageBuffer, ImageFormat, Luma};
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode, Version};
use thiserror::Error;

const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

const LIGHT: Luma<u8> = Luma([255]);

/// Symbol and raster parameters shared by every ticket image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrSettings {
    /// QR version (1..=40). Payloads are never moved to a larger version.
    pub version: i16,
    /// Width and height of the PNG, in pixels.
    pub width: u32,
    /// Quiet zone around the symbol, in modules.
    pub margin: u32,
}

impl Default for QrSettings {
    fn default() -> Self {
        Self {
            version: 5,
            width: 200,
            margin: 4,
        }
    }
}

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("payload does not fit in a version {version} symbol")]
    DataTooLong { version: i16 },

    #[error("unsupported QR version {0}")]
    InvalidVersion(i16),

    #[error("failed to render QR image: {0}")]
    Render(String),
}

/// Turns a payload into a renderable image, returned as a data URI.
#[async_trait]
pub trait QrEncoder: Send + Sync {
    async fn encode(&self, payload: &str) -> Result<String, EncodingError>;
}

/// Renders PNG data URIs at a fixed version with error correction level L.
#[derive(Debug, Clone, Default)]
pub struct PngQrEncoder {
    settings: QrSettings,
}

impl PngQrEncoder {
    pub fn new(settings: QrSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> QrSettings {
        self.settings
    }

    /// Synchronous rendering path; [`QrEncoder::encode`] runs it on the blocking pool.
    pub fn render_data_uri(&self, payload: &str) -> Result<String, EncodingError> {
        let QrSettings {
            version,
            width,
            margin,
        } = self.settings;

        if !(1..=40).contains(&version) {
            return Err(EncodingError::InvalidVersion(version));
        }

        let code = QrCode::with_version(payload.as_bytes(), Version::Normal(version), EcLevel::L)
            .map_err(|err| match err {
                QrError::DataTooLong => EncodingError::DataTooLong { version },
                QrError::InvalidVersion => EncodingError::InvalidVersion(version),
                other => EncodingError::Render(other.to_string()),
            })?;

        let symbol = code
            .render::<Luma<u8>>()
            .quiet_zone(false)
            .module_dimensions(1, 1)
            .build();

        let side = symbol.width() + 2 * margin;
        let mut canvas = ImageBuffer::from_pixel(side, side, LIGHT);
        imageops::overlay(&mut canvas, &symbol, i64::from(margin), i64::from(margin));

        let scaled = imageops::resize(&canvas, width, width, imageops::FilterType::Nearest);

        let mut png = Vec::new();
        DynamicImage::ImageLuma8(scaled)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|err| EncodingError::Render(err.to_string()))?;

        Ok(format!("{PNG_DATA_URI_PREFIX}{}", STANDARD.encode(png)))
    }
}

#[async_trait]
impl QrEncoder for PngQrEncoder {
    async fn encode(&self, payload: &str) -> Result<String, EncodingError> {
        let encoder = self.clone();
        let payload = payload.to_owned();

        tokio::task::spawn_blocking(move || encoder.render_data_uri(&payload))
            .await
            .map_err(|err| EncodingError::Render(err.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_png(data_uri: &str) -> DynamicImage {
        let encoded = data_uri
            .strip_prefix(PNG_DATA_URI_PREFIX)
            .expect("data URI should carry the PNG prefix");
        let bytes = STANDARD.decode(encoded).unwrap();
        image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap()
    }

    #[tokio::test]
    async fn test_encode_produces_png_of_configured_width() {
        let encoder = PngQrEncoder::default();
        let payload = r#"{"cpf":"12345678901","ticketId":"67e55044-10b1-426f-9247-bb680e5fe0c8"}"#;

        let uri = encoder.encode(payload).await.unwrap();
        let image = decode_png(&uri);

        assert_eq!(image.width(), 200);
        assert_eq!(image.height(), 200);
    }

    #[tokio::test]
    async fn test_rendered_image_scans_back_to_payload() {
        let encoder = PngQrEncoder::default();
        let payload = r#"{"cpf":"12345678901","ticketId":"67e55044-10b1-426f-9247-bb680e5fe0c8"}"#;

        let image = decode_png(&encoder.encode(payload).await.unwrap()).to_luma8();
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            image.width() as usize,
            image.height() as usize,
            |x, y| image.get_pixel(x as u32, y as u32)[0],
        );

        let grids = prepared.detect_grids();
        assert_eq!(grids.len(), 1);
        let (_, content) = grids[0].decode().unwrap();
        assert_eq!(content, payload);
    }

    #[test]
    fn test_margin_is_left_light() {
        let encoder = PngQrEncoder::new(QrSettings {
            version: 1,
            width: 29,
            margin: 4,
        });

        // Version 1 is 21 modules wide, so one pixel per module at width 29.
        let image = decode_png(&encoder.render_data_uri("ticket").unwrap()).to_luma8();
        for x in 0..4 {
            for y in 0..29 {
                assert_eq!(image.get_pixel(x, y), &LIGHT);
            }
        }
        assert_eq!(image.get_pixel(4, 4), &Luma([0]));
    }

    #[test]
    fn test_payload_larger_than_version_is_rejected() {
        let encoder = PngQrEncoder::new(QrSettings {
            version: 1,
            ..QrSettings::default()
        });
        let payload = "x".repeat(64);

        let err = encoder.render_data_uri(&payload).unwrap_err();
        assert!(matches!(err, EncodingError::DataTooLong { version: 1 }));
    }

    #[test]
    fn test_out_of_range_version_is_rejected() {
        let encoder = PngQrEncoder::new(QrSettings {
            version: 41,
            ..QrSettings::default()
        });

        let err = encoder.render_data_uri("ticket").unwrap_err();
        assert!(matches!(err, EncodingError::InvalidVersion(41)));
    }
}
