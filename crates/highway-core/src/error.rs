/// Errors returned by [`crate::GeoMapper`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    #[error("correspondence needs 4x2 pixel and geo arrays (got pixel={pixel:?}, geo={geo:?})")]
    InvalidCorrespondence {
        pixel: (usize, usize),
        geo: (usize, usize),
    },

    #[error("correspondence is degenerate: {0}")]
    DegenerateCorrespondence(&'static str),

    #[error("point batch must have 2 columns, got {cols}")]
    ShapeMismatch { cols: usize },
}
