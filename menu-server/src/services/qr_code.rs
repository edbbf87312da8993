//! Dining table QR codes

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use shared::models::DiningTable;

use super::AssetStorage;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Directory of generated QR images inside the asset storage
pub const QR_CODE_DIR: &str = "qr_codes";

/// Produces the QR artifact of a dining table and returns its stored path
#[async_trait]
pub trait QrCodeGenerator: Send + Sync {
    async fn generate(&self, table: &DiningTable) -> AppResult<String>;
}

/// Renders PNG QR codes pointing at the table's menu page
pub struct PngQrCodeGenerator {
    storage: Arc<dyn AssetStorage>,
    public_url: String,
}

impl PngQrCodeGenerator {
    pub fn new(storage: Arc<dyn AssetStorage>, public_url: impl Into<String>) -> Self {
        Self {
            storage,
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// URL encoded in the code
    pub fn payload(&self, table: &DiningTable) -> String {
        format!("{}/menu?table={}", self.public_url, table.id)
    }

    fn render(payload: &str) -> AppResult<Vec<u8>> {
        let code = QrCode::new(payload.as_bytes()).map_err(|e| {
            AppError::with_message(ErrorCode::QrCodeFailed, format!("Failed to encode QR code: {e}"))
        })?;
        let pixels = code
            .render::<Luma<u8>>()
            .min_dimensions(300, 300)
            .quiet_zone(true)
            .build();

        let mut png = Vec::new();
        DynamicImage::ImageLuma8(pixels)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| {
                AppError::with_message(ErrorCode::QrCodeFailed, format!("Failed to render QR code: {e}"))
            })?;
        Ok(png)
    }
}

#[async_trait]
impl QrCodeGenerator for PngQrCodeGenerator {
    async fn generate(&self, table: &DiningTable) -> AppResult<String> {
        let payload = self.payload(table);
        let png = Self::render(&payload)?;
        let name = format!("table_{}_floor_{}_num_{}.png", table.id, table.floor, table.num);
        let path = self.storage.put(QR_CODE_DIR, &name, &png).await?;
        tracing::info!(table_id = table.id, path = %path, "QR code generated");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::LocalStorage;
    use tempfile::TempDir;

    fn table() -> DiningTable {
        DiningTable {
            id: 5,
            num: 12,
            size: 4,
            floor: 2,
            status: true,
            qr_code: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[tokio::test]
    async fn test_generate_png() {
        let dir = TempDir::new().unwrap();
        let storage: Arc<dyn AssetStorage> =
            Arc::new(LocalStorage::new(dir.path(), "http://menu.test"));
        let generator = PngQrCodeGenerator::new(storage.clone(), "http://menu.test/");

        assert_eq!(generator.payload(&table()), "http://menu.test/menu?table=5");

        let path = generator.generate(&table()).await.unwrap();
        assert_eq!(path, "qr_codes/table_5_floor_2_num_12.png");

        let bytes = storage.read(&path).await.unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert!(decoded.width() >= 300);
    }
}
