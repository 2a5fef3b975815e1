//! Translator from captured PowerVR2 Tile Accelerator display lists to
//! a renderer-ready draw context.
//!
//! A captured [`TaContext`] holds the raw TA parameter stream and the
//! background state of one frame. [`Translator::convert_context`] walks
//! the stream once, producing surfaces, vertices and CCW triangle
//! indices in a reusable [`TrContext`]: parse -> back-to-front sort of
//! the transparent lists -> strip expansion with adjacent-surface
//! merging. [`render_context`] then replays the result against a
//! [`pvr2_hal::RenderBackend`].

pub mod color;
pub mod context;
pub mod convert;
pub mod error;
pub mod format;
pub mod render;
pub mod texture;

mod index;
mod sort;

pub use context::{TaContext, TrContext, TrList, TrParam};
pub use convert::Translator;
pub use error::TrError;
pub use render::{render_context, render_context_until};
