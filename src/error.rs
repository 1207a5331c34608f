//! Error types for GPU initialization and rendering
//!
//! Scene logic is infallible; only talking to the GPU can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create window surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable graphics adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported texture formats")]
    NoSurfaceFormat,

    #[error("failed to acquire surface texture: {0}")]
    SurfaceTexture(#[from] wgpu::SurfaceError),

    #[error("shader '{0}' not loaded")]
    ShaderNotFound(String),

    #[error("pipeline '{0}' not registered")]
    PipelineNotFound(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_missing_resource() {
        let err = RenderError::PipelineNotFound("Mesh".to_string());
        assert_eq!(err.to_string(), "pipeline 'Mesh' not registered");

        let err = RenderError::ShaderNotFound("scene".to_string());
        assert_eq!(err.to_string(), "shader 'scene' not loaded");
    }

    #[test]
    fn test_surface_error_converts() {
        let err: RenderError = wgpu::SurfaceError::Timeout.into();
        assert!(matches!(err, RenderError::SurfaceTexture(wgpu::SurfaceError::Timeout)));
    }
}
