//! Dining table service

use std::sync::Arc;

use shared::models::{DiningTable, DiningTableCreate, DiningTablePatch};
use sqlx::SqlitePool;

use super::{AssetStorage, QrCodeGenerator};
use crate::db::repository::{RepoError, dining_table};
use crate::utils::validation::{Input, Rule, Validated, Validator};
use crate::utils::{AppError, AppResult, ErrorCode};

const CREATE_INT: &[Rule] = &[Rule::Required, Rule::Integer];
const CREATE_BOOL: &[Rule] = &[Rule::Required, Rule::Boolean];
const UPDATE_INT: &[Rule] = &[Rule::Sometimes, Rule::Integer];
const UPDATE_BOOL: &[Rule] = &[Rule::Sometimes, Rule::Boolean];

/// Newly created table and the public URL of its QR code
#[derive(Debug, Clone)]
pub struct CreatedTable {
    pub table: DiningTable,
    pub qr_code_url: String,
}

pub struct DiningTableService {
    pool: SqlitePool,
    storage: Arc<dyn AssetStorage>,
    qr_codes: Arc<dyn QrCodeGenerator>,
}

fn table_error(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(_) => AppError::new(ErrorCode::TableNotFound),
        RepoError::Duplicate(_) => AppError::new(ErrorCode::TableAlreadyExists),
        other => other.into(),
    }
}

impl DiningTableService {
    pub fn new(
        pool: SqlitePool,
        storage: Arc<dyn AssetStorage>,
        qr_codes: Arc<dyn QrCodeGenerator>,
    ) -> Self {
        Self {
            pool,
            storage,
            qr_codes,
        }
    }

    /// All tables by id; an empty set is reported as not found
    pub async fn list_all(&self) -> AppResult<Vec<DiningTable>> {
        let tables = dining_table::find_all(&self.pool).await?;
        if tables.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::NoResults,
                "No dining tables found",
            ));
        }
        Ok(tables)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<DiningTable> {
        dining_table::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::TableNotFound))
    }

    /// Persist a table, then generate its QR code
    ///
    /// A failed generation leaves the row in place without `qr_code`.
    pub async fn create(&self, input: &Input) -> AppResult<CreatedTable> {
        let data = Validator::new(input)
            .rule("num", CREATE_INT)
            .rule("size", CREATE_INT)
            .rule("floor", CREATE_INT)
            .rule("status", CREATE_BOOL)
            .validate()?;

        let payload = DiningTableCreate {
            num: data.required("num", Validated::int)?,
            size: data.required("size", Validated::int)?,
            floor: data.required("floor", Validated::int)?,
            status: data.required("status", Validated::bool)?,
        };

        if dining_table::find_by_floor_and_num(&self.pool, payload.floor, payload.num)
            .await?
            .is_some()
        {
            return Err(AppError::new(ErrorCode::TableAlreadyExists));
        }

        let mut table = dining_table::create(&self.pool, payload)
            .await
            .map_err(table_error)?;

        let path = match self.qr_codes.generate(&table).await {
            Ok(path) => path,
            Err(e) => {
                tracing::error!(table_id = table.id, error = %e, "QR code generation failed");
                return Err(AppError::new(ErrorCode::QrCodeFailed));
            }
        };
        dining_table::set_qr_code(&self.pool, table.id, &path)
            .await
            .map_err(table_error)?;

        tracing::info!(table_id = table.id, floor = table.floor, num = table.num, "Dining table created");

        let qr_code_url = self.storage.url(&path);
        table.qr_code = Some(path);
        Ok(CreatedTable { table, qr_code_url })
    }

    /// Sparse update; fields are validated before the table is looked up
    pub async fn update(&self, id: i64, input: &Input) -> AppResult<DiningTable> {
        let data = Validator::new(input)
            .rule("floor", UPDATE_INT)
            .rule("size", UPDATE_INT)
            .rule("num", UPDATE_INT)
            .rule("status", UPDATE_BOOL)
            .validate()?;

        self.get_by_id(id).await?;

        let patch = DiningTablePatch {
            floor: data.int("floor"),
            size: data.int("size"),
            num: data.int("num"),
            status: data.bool("status"),
        };
        dining_table::update(&self.pool, id, patch)
            .await
            .map_err(table_error)
    }

    /// Remove the row; the QR image stays in storage
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.get_by_id(id).await?;
        if !dining_table::delete(&self.pool, id).await? {
            return Err(AppError::new(ErrorCode::TableNotFound));
        }
        tracing::info!(table_id = id, "Dining table deleted");
        Ok(())
    }
}
