use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Raster dimensions do not match ({}x{}) <-> ({}x{})", .size1.0, .size1.1, .size2.0, .size2.1)]
    SizeMismatch { size1: (usize, usize), size2: (usize, usize) },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Runtime error: {0}")]
    Runtime(String),
    #[error("Transform error: {0}")]
    Transform(String),
    #[error("Unsupported coordinate reference system: {0}")]
    UnsupportedCrs(String),
    #[cfg(feature = "proj4rs")]
    #[error("Proj error: {0}")]
    ProjError(#[from] proj4rs::errors::Error),
}
