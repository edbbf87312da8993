use thiserror::Error;

use crate::AppError;

/// Errors that stop the server from starting or serving
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Initialization failed: {0}")]
    Init(#[from] AppError),
}

pub type Result<T> = std::result::Result<T, ServerError>;
