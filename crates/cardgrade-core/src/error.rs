use thiserror::Error;

#[derive(Error, Debug)]
pub enum GradeError {
    #[error("Matrix dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: String, found: String },

    #[error("Linear system is singular: corner correspondences are degenerate")]
    SingularSystem,

    #[error("Invalid crop region: {0}")]
    InvalidRegion(String),

    #[error("Failed to load source image: {0}")]
    SourceLoadFailure(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Project file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Rectify worker is not running")]
    WorkerUnavailable,
}

impl GradeError {
    /// Short message suitable for showing to the person adjusting the corners.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::SingularSystem | Self::InvalidRegion(_) => "Invalid crop region, adjust corners",
            Self::SourceLoadFailure(_) | Self::Image(_) => "Could not read image",
            Self::Json(_) => "Could not read project file",
            Self::DimensionMismatch { .. } | Self::Io(_) | Self::WorkerUnavailable => {
                "Internal error"
            }
        }
    }

    /// Whether the user can fix this by moving the crop corners.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::SingularSystem | Self::InvalidRegion(_))
    }
}

pub type Result<T> = std::result::Result<T, GradeError>;
