use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::services::{
    AssetStorage, DiningTableService, LocalStorage, MealService, PngQrCodeGenerator,
    QrCodeGenerator,
};
use crate::utils::AppResult;

/// Server state - shared handles to every service
///
/// Cloning is cheap: the pool and the services are reference counted.
///
/// | Field | Meaning |
/// |-------|---------|
/// | config | immutable configuration |
/// | pool | SQLite connection pool |
/// | storage | asset storage (meal images, QR codes) |
/// | qr_codes | QR code generator for dining tables |
/// | jwt_service | bearer token verification |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub storage: Arc<dyn AssetStorage>,
    pub qr_codes: Arc<dyn QrCodeGenerator>,
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// Assemble state from already constructed parts
    pub fn new(
        config: Config,
        pool: SqlitePool,
        storage: Arc<dyn AssetStorage>,
        qr_codes: Arc<dyn QrCodeGenerator>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            config,
            pool,
            storage,
            qr_codes,
            jwt_service,
        }
    }

    /// Open the database, run migrations and wire up the default services
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db = DbService::new(&config.database_path).await?;

        let storage: Arc<dyn AssetStorage> = Arc::new(LocalStorage::new(
            config.storage_dir(),
            config.public_url.clone(),
        ));
        let qr_codes: Arc<dyn QrCodeGenerator> = Arc::new(PngQrCodeGenerator::new(
            storage.clone(),
            config.public_url.clone(),
        ));
        let jwt_service = Arc::new(JwtService::with_config(&config.jwt));

        Ok(Self::new(
            config.clone(),
            db.pool,
            storage,
            qr_codes,
            jwt_service,
        ))
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn meal_service(&self) -> MealService {
        MealService::new(self.pool.clone(), self.storage.clone())
    }

    pub fn dining_table_service(&self) -> DiningTableService {
        DiningTableService::new(
            self.pool.clone(),
            self.storage.clone(),
            self.qr_codes.clone(),
        )
    }
}
