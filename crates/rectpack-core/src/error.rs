use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RectPackError {
    #[error("Invalid input: rectangle #{index} (id {id}) has size {width}x{height}")]
    InvalidInput {
        index: usize,
        id: usize,
        width: u32,
        height: u32,
    },
    #[error("Unsupported packing hint bits: {0:#x}")]
    UnsupportedHint(u32),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Out of space: placed {placed} of {total} rectangles within the size limits")]
    OutOfSpace { placed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, RectPackError>;
