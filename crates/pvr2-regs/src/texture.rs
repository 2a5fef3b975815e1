//! Texture geometry and format helpers derived from the TSP/TCW words.

use crate::words::{Tcw, Tsp};

/// Texture width in texels.
#[inline]
pub fn texture_width(tsp: Tsp) -> u32 {
    8 << tsp.texture_u_size()
}

/// Texture height in texels.
#[inline]
pub fn texture_height(tsp: Tsp) -> u32 {
    8 << tsp.texture_v_size()
}

/// Row pitch in texels.
///
/// Strided textures (raster order with `stride_select`) take their
/// pitch from the TEXT_CONTROL register, supplied here as `stride`;
/// everything else is tightly packed at the texture width.
#[inline]
pub fn texture_stride(tsp: Tsp, tcw: Tcw, stride: u32) -> u32 {
    if tcw.stride_select() && tcw.scan_order() {
        stride
    } else {
        texture_width(tsp)
    }
}

/// Whether the texture carries a usable mipmap chain.
///
/// Raster-order textures never do; the TCW bit is only honored for
/// twiddled layouts.
#[inline]
pub fn texture_mipmaps(tcw: Tcw) -> bool {
    tcw.mip_mapped() && !tcw.scan_order()
}

/// Composed format word handed to the external pixel decoder.
///
/// Bits 0-2 carry the TCW pixel format; bit 3 is set for twiddled
/// layouts, bit 4 for VQ compression and bit 5 for mipmapped textures.
#[inline]
pub fn texture_format(tcw: Tcw) -> u32 {
    let mut fmt = tcw.pixel_format();
    if !tcw.scan_order() {
        fmt |= 1 << 3;
    }
    if tcw.vq_compressed() {
        fmt |= 1 << 4;
    }
    if texture_mipmaps(tcw) {
        fmt |= 1 << 5;
    }
    fmt
}
