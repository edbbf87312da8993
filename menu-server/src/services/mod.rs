//! Service layer
//!
//! - [`MealService`] - meals, their size/cost variants and images
//! - [`DiningTableService`] - dining tables and their QR codes
//! - [`AssetStorage`] - uploaded and generated files
//! - [`QrCodeGenerator`] - QR artifacts for dining tables

pub mod dining_table;
pub mod meal;
pub mod qr_code;
pub mod storage;

pub use dining_table::{CreatedTable, DiningTableService};
pub use meal::{MealPage, MealService};
pub use qr_code::{PngQrCodeGenerator, QrCodeGenerator};
pub use storage::{AssetStorage, LocalStorage, UploadedFile};
