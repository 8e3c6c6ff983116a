/// Errors raised by the view layer.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("failed to create window: {0}")]
    WindowCreation(#[from] winit::error::OsError),
}
