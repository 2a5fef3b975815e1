//! The four 32-bit instruction words of the TA parameter format.
//!
//! Each word is a `#[repr(transparent)]` newtype over the raw `u32` with
//! shift/mask accessors for the fields the translator consumes. Setters
//! exist for the fields a display list author (or a test) needs to
//! compose; reserved bits are left alone.

macro_rules! word_bool {
    ($(#[$doc:meta])* $get:ident, $set:ident, $bit:expr) => {
        $(#[$doc])*
        #[inline]
        pub fn $get(self) -> bool {
            self.0 >> $bit & 1 != 0
        }

        #[inline]
        pub fn $set(&mut self, val: bool) {
            self.0 = (self.0 & !(1 << $bit)) | ((val as u32) << $bit);
        }
    };
}

macro_rules! word_field {
    ($(#[$doc:meta])* $get:ident, $set:ident, $shift:expr, $mask:expr) => {
        $(#[$doc])*
        #[inline]
        pub fn $get(self) -> u32 {
            self.0 >> $shift & $mask
        }

        #[inline]
        pub fn $set(&mut self, val: u32) {
            self.0 = (self.0 & !($mask << $shift)) | ((val & $mask) << $shift);
        }
    };
}

/// Parameter Control Word: the first word of every TA parameter.
///
/// Bits 0-3 (uv_16bit/gouraud/offset/texture) shadow the same-named ISP
/// bits and take precedence over them; the hardware latches the PCW copy.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Pcw(pub u32);

impl Pcw {
    word_bool!(
        /// 16-bit texture coordinates in the vertex parameters.
        uv_16bit, set_uv_16bit, 0
    );
    word_bool!(
        /// Gouraud (vs flat) shading.
        gouraud, set_gouraud, 1
    );
    word_bool!(
        /// Vertex parameters carry an offset (specular) color.
        offset, set_offset, 2
    );
    word_bool!(
        /// Polygon is textured.
        texture, set_texture, 3
    );
    word_field!(
        /// Vertex color encoding: 0 packed, 1 floating, 2 intensity,
        /// 3 intensity reusing the previous face color.
        col_type, set_col_type, 4, 0x3
    );
    word_bool!(
        /// Two-volume polygon.
        volume, set_volume, 6
    );
    word_field!(
        /// Target display list (see [`super::ListType`]).
        list_type, set_list_type, 24, 0x7
    );
    word_bool!(
        /// Final vertex of the current triangle strip.
        end_of_strip, set_end_of_strip, 28
    );
    word_field!(
        /// Parameter tag (see [`super::ParaType`]).
        para_type, set_para_type, 29, 0x7
    );
}

/// ISP/TSP instruction word: depth, culling and the latched vertex flags.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Isp(pub u32);

impl Isp {
    word_bool!(
        /// 16-bit texture coordinates (background use only; polygon
        /// parameters latch the PCW copy instead).
        uv_16bit, set_uv_16bit, 22
    );
    word_bool!(
        /// Vertices carry an offset color (background use only).
        offset, set_offset, 24
    );
    word_bool!(
        /// Polygon is textured (background use only).
        texture, set_texture, 25
    );
    word_bool!(
        /// Depth writes are disabled for this polygon.
        z_write_disable, set_z_write_disable, 26
    );
    word_field!(
        /// Culling mode: 0/1 no culling, 2 cull if negative, 3 cull if
        /// positive.
        culling_mode, set_culling_mode, 27, 0x3
    );
    word_field!(
        /// Depth compare function, 3-bit hardware encoding.
        depth_compare_mode, set_depth_compare_mode, 29, 0x7
    );
}

/// TSP instruction word: blending, shading and texture sampling state.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Tsp(pub u32);

impl Tsp {
    word_field!(
        /// Texture height exponent: height = 8 << value.
        texture_v_size, set_texture_v_size, 0, 0x7
    );
    word_field!(
        /// Texture width exponent: width = 8 << value.
        texture_u_size, set_texture_u_size, 3, 0x7
    );
    word_field!(
        /// Texture/shading instruction: 0 decal, 1 modulate,
        /// 2 decal alpha, 3 modulate alpha.
        texture_shading_instr, set_texture_shading_instr, 6, 0x3
    );
    word_field!(
        /// Sampling filter: 0 point, otherwise bilinear (the trilinear
        /// encodings collapse to bilinear).
        filter_mode, set_filter_mode, 13, 0x3
    );
    word_bool!(
        /// Clamp V to [0, 1].
        clamp_v, set_clamp_v, 15
    );
    word_bool!(
        /// Clamp U to [0, 1].
        clamp_u, set_clamp_u, 16
    );
    word_bool!(
        /// Mirror V on repeat.
        flip_v, set_flip_v, 17
    );
    word_bool!(
        /// Mirror U on repeat.
        flip_u, set_flip_u, 18
    );
    word_bool!(
        /// Treat texel alpha as 1.0.
        ignore_tex_alpha, set_ignore_tex_alpha, 19
    );
    word_bool!(
        /// Vertex alpha participates in blending.
        use_alpha, set_use_alpha, 20
    );
    word_field!(
        /// Destination blend factor, 3-bit hardware encoding.
        dst_alpha_instr, set_dst_alpha_instr, 26, 0x7
    );
    word_field!(
        /// Source blend factor, 3-bit hardware encoding.
        src_alpha_instr, set_src_alpha_instr, 29, 0x7
    );
}

/// Texture Control Word: texture address, layout and pixel format.
///
/// For the paletted pixel formats, bits 21-26 select the palette bank
/// and the stride/scan-order flags below do not apply.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Tcw(pub u32);

impl Tcw {
    word_field!(
        /// Texture address in 8-byte units.
        texture_addr, set_texture_addr, 0, 0x1f_ffff
    );
    word_field!(
        /// Palette bank for 4bpp/8bpp formats.
        palette_selector, set_palette_selector, 21, 0x3f
    );
    word_bool!(
        /// Row pitch comes from the TEXT_CONTROL stride register.
        stride_select, set_stride_select, 25
    );
    word_bool!(
        /// Raster (non-twiddled) texel order.
        scan_order, set_scan_order, 26
    );
    word_field!(
        /// Pixel format: 0 ARGB1555, 1 RGB565, 2 ARGB4444, 3 YUV422,
        /// 4 bump map, 5 4bpp palette, 6 8bpp palette.
        pixel_format, set_pixel_format, 27, 0x7
    );
    word_bool!(
        /// VQ compressed.
        vq_compressed, set_vq_compressed, 30
    );
    word_bool!(
        /// Texture carries a mipmap chain.
        mip_mapped, set_mip_mapped, 31
    );
}
