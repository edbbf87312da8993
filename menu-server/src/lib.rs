//! Menu Server - restaurant menu and seating backend
//!
//! # Overview
//!
//! - **Database** (`db`): SQLite via sqlx, one repository module per table
//! - **Auth** (`auth`): JWT verification, admin guard, caller capability extractor
//! - **Services** (`services`): meal and dining table business rules, asset storage, QR codes
//! - **HTTP API** (`api`): axum routers and handlers
//!
//! # Layout
//!
//! ```text
//! menu-server/src/
//! ├── core/          # config, state, server
//! ├── auth/          # JWT, middleware, extractor
//! ├── services/      # meal / dining table services, storage, QR
//! ├── api/           # HTTP routes and handlers
//! ├── utils/         # logger, validation
//! └── db/            # pool + repositories
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export common types
pub use auth::{Caller, CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - supports tracing format specifiers
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load `.env`, make sure the work directory exists and start logging
pub fn setup_environment() -> anyhow::Result<Config> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;
    std::fs::create_dir_all(config.storage_dir())?;
    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir)?;
    }

    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
    __  ___
   /  |/  /__  ____  __  __
  / /|_/ / _ \/ __ \/ / / /
 / /  / /  __/ / / / /_/ /
/_/  /_/\___/_/ /_/\__,_/
    "#
    );
}
