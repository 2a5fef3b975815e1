//! PowerVR2 Tile Accelerator hardware word and parameter definitions.
//!
//! Bit-level views of the four instruction words carried by every TA
//! global parameter (PCW, ISP, TSP, TCW), plus decoding of the tagged
//! variable-length parameter stream into typed records. Nothing here
//! interprets the data for rendering; that is the translator's job.

#![no_std]

pub mod params;
pub mod texture;
pub mod words;

pub use params::{
    decode_poly, decode_vertex, list_type_valid, param_size, poly_type, uv16, vert_type,
    ColorEncoding, DecodeError, ListType, ParaType, PolyBody, PolyParam, PolyVertex, SpriteVertex,
    VertexParam, NUM_LISTS, VERT_TYPE_MODVOL,
};
pub use texture::{
    texture_format, texture_height, texture_mipmaps, texture_stride, texture_width,
};
pub use words::{Isp, Pcw, Tcw, Tsp};

/// Read the little-endian `u32` at 32-bit word index `word`.
///
/// Callers are expected to have validated the buffer length; short
/// buffers panic like any out-of-bounds slice index.
#[inline]
pub fn u32_at(data: &[u8], word: usize) -> u32 {
    let o = word * 4;
    u32::from_le_bytes([data[o], data[o + 1], data[o + 2], data[o + 3]])
}

/// Read the little-endian `f32` at 32-bit word index `word`.
#[inline]
pub fn f32_at(data: &[u8], word: usize) -> f32 {
    f32::from_bits(u32_at(data, word))
}
