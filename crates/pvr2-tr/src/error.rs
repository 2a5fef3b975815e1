//! Conversion errors.
//!
//! A conversion that fails leaves the output context partially written;
//! callers discard it and the next conversion starts from a clean
//! reset. Nothing here is recoverable mid-stream.

use pvr2_regs::DecodeError;

/// Fatal conditions encountered while translating a TA context.
#[derive(Debug, thiserror::Error)]
pub enum TrError {
    /// A fixed-capacity output arena filled up.
    #[error("{what} arena exhausted (capacity {capacity})")]
    CapacityExceeded {
        what: &'static str,
        capacity: usize,
    },

    /// A parameter's declared size runs past the end of the input.
    #[error("parameter at byte offset {offset} extends past end of input")]
    TruncatedParam { offset: usize },

    /// OBJ_LIST_SET parameters are not supported.
    #[error("OBJ_LIST_SET parameter at byte offset {offset}")]
    ObjListSet { offset: usize },

    /// Two-volume polygon types and reserved encodings.
    #[error("unsupported polygon type {0}")]
    UnsupportedPolyType(u32),

    /// Two-volume vertex types and reserved encodings.
    #[error("unsupported vertex type {0}")]
    UnsupportedVertType(u32),

    /// A vertex parameter arrived with no open list or no governing
    /// global parameter.
    #[error("vertex parameter with no open list at byte offset {offset}")]
    NoActiveList { offset: usize },

    /// A sprite's vertex parameter must end its strip.
    #[error("sprite vertex without end-of-strip at byte offset {offset}")]
    SpriteMissingEndOfStrip { offset: usize },

    /// The texture cache has no entry for a referenced texture.
    #[error("no texture cache entry for tsp={tsp:08x} tcw={tcw:08x}")]
    MissingTexture { tsp: u32, tcw: u32 },

    /// The external pixel decoder failed.
    #[error("texture decode failed: {0}")]
    TextureDecode(String),
}

impl From<DecodeError> for TrError {
    fn from(e: DecodeError) -> Self {
        match e {
            DecodeError::UnsupportedPolyType(t) => TrError::UnsupportedPolyType(t),
            DecodeError::UnsupportedVertType(t) => TrError::UnsupportedVertType(t),
        }
    }
}
