//! Abstraction traits for the TA translator's external collaborators,
//! plus the draw-context vocabulary shared with render backends.
//!
//! The translator consumes three collaborators it does not implement:
//! a texture cache, a PVR pixel decoder and a render backend. Trait
//! signatures stick to primitives and the types defined here so that
//! implementations never need the translator crates.

/// Backend texture handle. Zero means "no texture bound".
pub type TextureHandle = u32;

/// Depth comparison function.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DepthFunc {
    #[default]
    Never,
    Greater,
    Equal,
    Gequal,
    Less,
    Nequal,
    Lequal,
    Always,
}

/// Face culling mode.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CullFace {
    #[default]
    None,
    Back,
    Front,
}

/// Blend factor.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendFunc {
    /// Blending disabled on this leg.
    #[default]
    None,
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    DstColor,
    OneMinusDstColor,
}

/// Texture/shading combine mode.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ShadeMode {
    #[default]
    Decal,
    Modulate,
    DecalAlpha,
    ModulateAlpha,
}

/// Texture sampling filter.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FilterMode {
    #[default]
    Nearest,
    Bilinear,
}

/// Texture addressing mode, per axis.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WrapMode {
    #[default]
    Repeat,
    ClampToEdge,
    MirroredRepeat,
}

/// Pixel format of decoded texture data.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    #[default]
    Rgba8888,
    Rgba5551,
    Rgb565,
    Rgba4444,
}

/// Per-surface render state.
///
/// Two surfaces with equal `DrawParams` are batchable into one draw
/// call; the derived `Eq` is the merge key.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DrawParams {
    pub depth_write: bool,
    pub depth_func: DepthFunc,
    pub cull: CullFace,
    pub src_blend: BlendFunc,
    pub dst_blend: BlendFunc,
    pub shade: ShadeMode,
    /// Treat vertex alpha as 1.0.
    pub ignore_alpha: bool,
    /// Treat texel alpha as 1.0.
    pub ignore_texture_alpha: bool,
    /// Vertices carry an offset (specular) color.
    pub offset_color: bool,
    pub alpha_test: bool,
    pub alpha_ref: u8,
    /// Bound texture, zero if untextured.
    pub texture: TextureHandle,
}

/// One translated vertex.
///
/// Colors are packed ARGB words: memory byte order B, G, R, A.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TaVertex {
    pub xyz: [f32; 3],
    pub uv: [f32; 2],
    pub color: u32,
    pub offset_color: u32,
}

/// A drawable batch of vertices sharing render state.
///
/// During translation `first_vert`/`num_verts` address the vertex
/// arena; after index generation they address the index arena and
/// `num_verts` is a multiple of 3.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TaSurface {
    pub params: DrawParams,
    pub first_vert: u32,
    pub num_verts: u32,
    /// Position of this surface's first triangle within its source
    /// strip, for winding parity.
    pub strip_offset: u32,
}

/// Creation-time description of a backend texture.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TextureDesc {
    pub format: PixelFormat,
    pub filter: FilterMode,
    pub wrap_u: WrapMode,
    pub wrap_v: WrapMode,
    pub mipmaps: bool,
    pub width: u32,
    pub height: u32,
}

/// One entry of the external texture cache, keyed by `(tsp, tcw)`.
///
/// The cache owns the raw guest texture and palette bytes; the
/// translator fills in the handle and sampling state when it binds the
/// entry and clears `dirty`.
#[derive(Clone, Debug, Default)]
pub struct TextureEntry {
    /// Backend handle, zero until bound.
    pub handle: TextureHandle,
    /// Guest memory changed since the handle was created.
    pub dirty: bool,
    /// Raw texture bytes (twiddled/compressed/paletted).
    pub texture: Vec<u8>,
    /// Palette RAM backing for the paletted formats, empty otherwise.
    pub palette: Vec<u8>,
    pub filter: FilterMode,
    pub wrap_u: WrapMode,
    pub wrap_v: WrapMode,
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
}

/// Texture cache lookup.
///
/// Entries are keyed purely on the raw `(tsp, tcw)` words. The
/// translator assumes exclusive access for the duration of one
/// conversion and mutates entries in place.
pub trait TextureCache {
    /// Find the cache entry backing `(tsp, tcw)`, if any.
    fn find_texture(&mut self, tsp: u32, tcw: u32) -> Option<&mut TextureEntry>;
}

/// External PVR texture pixel decoder.
pub trait TexDecoder {
    type Error: core::fmt::Debug;

    /// Decode `src` into RGBA8888 pixels in `dst`.
    ///
    /// `texture_fmt` is the composed format word (pixel format,
    /// twiddle, VQ and mipmap bits); `palette`/`palette_fmt` apply to
    /// the paletted formats only. `dst` is at least
    /// `width * height * 4` bytes.
    #[allow(clippy::too_many_arguments)]
    fn decode(
        &mut self,
        src: &[u8],
        width: u32,
        height: u32,
        stride: u32,
        texture_fmt: u32,
        pixel_fmt: PixelFormat,
        palette: &[u8],
        palette_fmt: u32,
        dst: &mut [u8],
    ) -> Result<(), Self::Error>;
}

/// Render backend consuming the translated draw context.
pub trait RenderBackend {
    /// Upload decoded pixels and return a handle for draw-state use.
    fn create_texture(&mut self, desc: &TextureDesc, pixels: &[u8]) -> TextureHandle;

    /// Release a handle previously returned by `create_texture`.
    fn destroy_texture(&mut self, handle: TextureHandle);

    /// Start drawing a translated context; the vertex and index arrays
    /// stay valid until the matching `end_ta_surfaces`.
    fn begin_ta_surfaces(
        &mut self,
        video_width: u32,
        video_height: u32,
        verts: &[TaVertex],
        indices: &[u32],
    );

    /// Draw one surface's index range.
    fn draw_ta_surface(&mut self, surf: &TaSurface);

    /// Finish drawing the context.
    fn end_ta_surfaces(&mut self);
}
