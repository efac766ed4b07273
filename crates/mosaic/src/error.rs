use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Geo(#[from] geo::Error),
    #[error("Transform error: {0}")]
    Transform(String),
    #[error("Failed to reproject submosaic from {crs}")]
    Reprojection {
        crs: String,
        #[source]
        source: Box<Error>,
    },
    #[error("Failed to set up the output context for {crs}: {reason}")]
    ContextSetup { crs: String, reason: String },
    #[error("Compositing error: {0}")]
    Compositing(String),
}
