//! Shared test fixtures: recording collaborator mocks and a byte-level
//! TA parameter stream builder.

#![allow(dead_code)]

use std::collections::HashMap;

use pvr2_hal::{
    PixelFormat, RenderBackend, TaSurface, TaVertex, TexDecoder, TextureCache, TextureDesc,
    TextureEntry, TextureHandle,
};
use pvr2_regs::{Isp, ListType, Pcw, Tcw, Tsp};
use pvr2_tr::{TaContext, TrContext, Translator};

/// Render backend that records every call.
#[derive(Default)]
pub struct MockBackend {
    /// (desc, pixel byte count, first pixel byte) per created texture.
    pub created: Vec<(TextureDesc, usize, u8)>,
    pub destroyed: Vec<TextureHandle>,
    /// (video_width, video_height, num_verts, num_indices) per begin.
    pub begins: Vec<(u32, u32, usize, usize)>,
    pub draws: Vec<TaSurface>,
    pub ends: u32,
    next_handle: TextureHandle,
}

impl RenderBackend for MockBackend {
    fn create_texture(&mut self, desc: &TextureDesc, pixels: &[u8]) -> TextureHandle {
        self.next_handle += 1;
        self.created
            .push((*desc, pixels.len(), pixels.first().copied().unwrap_or(0)));
        self.next_handle
    }

    fn destroy_texture(&mut self, handle: TextureHandle) {
        self.destroyed.push(handle);
    }

    fn begin_ta_surfaces(
        &mut self,
        video_width: u32,
        video_height: u32,
        verts: &[TaVertex],
        indices: &[u32],
    ) {
        self.begins
            .push((video_width, video_height, verts.len(), indices.len()));
    }

    fn draw_ta_surface(&mut self, surf: &TaSurface) {
        self.draws.push(*surf);
    }

    fn end_ta_surfaces(&mut self) {
        self.ends += 1;
    }
}

/// Texture cache over a plain map keyed by the raw word pair.
#[derive(Default)]
pub struct MockCache {
    pub entries: HashMap<(u32, u32), TextureEntry>,
}

impl MockCache {
    /// Register an entry with `len` bytes of source data.
    pub fn insert(&mut self, tsp: Tsp, tcw: Tcw, len: usize) {
        self.entries.insert(
            (tsp.0, tcw.0),
            TextureEntry {
                texture: vec![0u8; len],
                ..Default::default()
            },
        );
    }
}

impl TextureCache for MockCache {
    fn find_texture(&mut self, tsp: u32, tcw: u32) -> Option<&mut TextureEntry> {
        self.entries.get_mut(&(tsp, tcw))
    }
}

/// One recorded decoder invocation.
#[derive(Clone, Debug)]
pub struct DecodeCall {
    pub src_len: usize,
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub texture_fmt: u32,
    pub palette_fmt: u32,
}

/// Pixel decoder that records calls and fills the output with a marker.
#[derive(Default)]
pub struct MockDecoder {
    pub calls: Vec<DecodeCall>,
}

pub const DECODED_MARKER: u8 = 0xAB;

impl TexDecoder for MockDecoder {
    type Error = String;

    #[allow(clippy::too_many_arguments)]
    fn decode(
        &mut self,
        src: &[u8],
        width: u32,
        height: u32,
        stride: u32,
        texture_fmt: u32,
        _pixel_fmt: PixelFormat,
        _palette: &[u8],
        palette_fmt: u32,
        dst: &mut [u8],
    ) -> Result<(), String> {
        self.calls.push(DecodeCall {
            src_len: src.len(),
            width,
            height,
            stride,
            texture_fmt,
            palette_fmt,
        });
        let len = (width * height * 4) as usize;
        dst[..len].fill(DECODED_MARKER);
        Ok(())
    }
}

/// Builds raw little-endian TA parameter streams.
#[derive(Default)]
pub struct StreamBuilder {
    bytes: Vec<u8>,
}

fn vertex_pcw(eos: bool) -> Pcw {
    let mut pcw = Pcw(0);
    pcw.set_para_type(7);
    pcw.set_end_of_strip(eos);
    pcw
}

impl StreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }

    fn words(&mut self, words: &[u32]) -> &mut Self {
        for w in words {
            self.bytes.extend_from_slice(&w.to_le_bytes());
        }
        self
    }

    fn floats(&mut self, floats: &[f32]) -> &mut Self {
        for f in floats {
            self.bytes.extend_from_slice(&f.to_bits().to_le_bytes());
        }
        self
    }

    /// End-of-list parameter.
    pub fn end_of_list(&mut self) -> &mut Self {
        self.words(&[0; 8])
    }

    /// User tile clip parameter (ignored by the translator).
    pub fn user_tile_clip(&mut self) -> &mut Self {
        let mut pcw = Pcw(0);
        pcw.set_para_type(1);
        self.words(&[pcw.0, 0, 0, 0, 0, 0, 0, 0])
    }

    /// Object list set parameter (rejected by the translator).
    pub fn obj_list_set(&mut self, list: ListType) -> &mut Self {
        let mut pcw = Pcw(0);
        pcw.set_para_type(2);
        pcw.set_list_type(list as u32);
        self.words(&[pcw.0, 0, 0, 0, 0, 0, 0, 0])
    }

    /// Packed-color polygon global parameter (vertex type 0/3/4).
    pub fn poly_packed(
        &mut self,
        list: ListType,
        isp: Isp,
        tsp: Tsp,
        tcw: Tcw,
        textured: bool,
    ) -> &mut Self {
        let mut pcw = Pcw(0);
        pcw.set_para_type(4);
        pcw.set_list_type(list as u32);
        pcw.set_col_type(0);
        pcw.set_texture(textured);
        self.words(&[pcw.0, isp.0, tsp.0, tcw.0, 0, 0, 0, 0])
    }

    /// Floating-color polygon global parameter with a type-1 face color
    /// (vertex type 1/5/6).
    pub fn poly_float(
        &mut self,
        list: ListType,
        isp: Isp,
        tsp: Tsp,
        tcw: Tcw,
        face: [f32; 4],
    ) -> &mut Self {
        let mut pcw = Pcw(0);
        pcw.set_para_type(4);
        pcw.set_list_type(list as u32);
        pcw.set_col_type(1);
        self.words(&[pcw.0, isp.0, tsp.0, tcw.0]);
        // face color travels alpha-first
        self.floats(&[face[3], face[0], face[1], face[2]])
    }

    /// Intensity polygon global parameter with type-2 face and offset
    /// colors (vertex type 2/7/8); a 64-byte record.
    pub fn poly_intensity(
        &mut self,
        list: ListType,
        isp: Isp,
        tsp: Tsp,
        face: [f32; 4],
        face_offset: [f32; 4],
    ) -> &mut Self {
        let mut pcw = Pcw(0);
        pcw.set_para_type(4);
        pcw.set_list_type(list as u32);
        pcw.set_col_type(2);
        self.words(&[pcw.0, isp.0, tsp.0, Tcw(0).0, 0, 0, 0, 0]);
        self.floats(&[face[3], face[0], face[1], face[2]]);
        self.floats(&[face_offset[3], face_offset[0], face_offset[1], face_offset[2]])
    }

    /// Sprite global parameter with packed base and offset colors.
    pub fn sprite_poly(
        &mut self,
        list: ListType,
        isp: Isp,
        tsp: Tsp,
        base: u32,
        offset: u32,
        textured: bool,
    ) -> &mut Self {
        let mut pcw = Pcw(0);
        pcw.set_para_type(5);
        pcw.set_list_type(list as u32);
        pcw.set_texture(textured);
        self.words(&[pcw.0, isp.0, tsp.0, Tcw(0).0, base, offset, 0, 0])
    }

    /// Type-0 vertex: packed color, untextured.
    pub fn vert_packed(&mut self, xyz: [f32; 3], color: u32, eos: bool) -> &mut Self {
        self.words(&[vertex_pcw(eos).0]);
        self.floats(&xyz);
        self.words(&[0, 0, color, 0])
    }

    /// Type-1 vertex: floating color `[r, g, b, a]`, untextured.
    pub fn vert_float(&mut self, xyz: [f32; 3], rgba: [f32; 4], eos: bool) -> &mut Self {
        self.words(&[vertex_pcw(eos).0]);
        self.floats(&xyz);
        self.floats(&[rgba[3], rgba[0], rgba[1], rgba[2]])
    }

    /// Type-2 vertex: intensity against the latched face color.
    pub fn vert_intensity(&mut self, xyz: [f32; 3], intensity: f32, eos: bool) -> &mut Self {
        self.words(&[vertex_pcw(eos).0]);
        self.floats(&xyz);
        self.words(&[0, 0]);
        self.floats(&[intensity]);
        self.words(&[0])
    }

    /// Type-3 vertex: textured with float UVs and packed colors.
    pub fn vert_tex_packed(
        &mut self,
        xyz: [f32; 3],
        uv: [f32; 2],
        color: u32,
        offset_color: u32,
        eos: bool,
    ) -> &mut Self {
        self.words(&[vertex_pcw(eos).0]);
        self.floats(&xyz);
        self.floats(&uv);
        self.words(&[color, offset_color])
    }

    /// Type-15 sprite vertex: positions only.
    pub fn sprite_vert(
        &mut self,
        a: [f32; 3],
        b: [f32; 3],
        c: [f32; 3],
        d_xy: [f32; 2],
        eos: bool,
    ) -> &mut Self {
        self.words(&[vertex_pcw(eos).0]);
        self.floats(&a);
        self.floats(&b);
        self.floats(&c);
        self.floats(&d_xy);
        self.words(&[0, 0, 0, 0])
    }

    /// Type-16 sprite vertex: positions plus packed 16-bit UVs for the
    /// first three corners.
    #[allow(clippy::too_many_arguments)]
    pub fn sprite_vert_uv(
        &mut self,
        a: [f32; 3],
        b: [f32; 3],
        c: [f32; 3],
        d_xy: [f32; 2],
        uvs: [[f32; 2]; 3],
        eos: bool,
    ) -> &mut Self {
        self.words(&[vertex_pcw(eos).0]);
        self.floats(&a);
        self.floats(&b);
        self.floats(&c);
        self.floats(&d_xy);
        self.words(&[
            0,
            uv16_word(uvs[0][0], uvs[0][1]),
            uv16_word(uvs[1][0], uvs[1][1]),
            uv16_word(uvs[2][0], uvs[2][1]),
        ])
    }
}

/// Pack two floats into the 16-bit UV wire format (U high, V low).
pub fn uv16_word(u: f32, v: f32) -> u32 {
    (u.to_bits() & 0xffff_0000) | (v.to_bits() >> 16)
}

/// An ISP word with the given depth compare, cull mode and depth-write
/// enable.
pub fn isp(depth_compare: u32, culling: u32, z_write: bool) -> Isp {
    let mut isp = Isp(0);
    isp.set_depth_compare_mode(depth_compare);
    isp.set_culling_mode(culling);
    isp.set_z_write_disable(!z_write);
    isp
}

/// A TSP word with the given blend instructions and vertex alpha
/// enabled.
pub fn tsp(src_blend: u32, dst_blend: u32) -> Tsp {
    let mut tsp = Tsp(0);
    tsp.set_src_alpha_instr(src_blend);
    tsp.set_dst_alpha_instr(dst_blend);
    tsp.set_use_alpha(true);
    tsp
}

/// Background vertex data: an untextured full-screen quad's first three
/// corners (xyz + packed color each).
pub fn bg_quad_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    for (x, y) in [(0.0f32, 480.0f32), (0.0, 0.0), (640.0, 480.0)] {
        for f in [x, y, 0.001] {
            bytes.extend_from_slice(&f.to_bits().to_le_bytes());
        }
        bytes.extend_from_slice(&0xff20_2020u32.to_le_bytes());
    }
    bytes
}

/// A context around the given parameter stream, with a plain background
/// and no autosort.
pub fn basic_ctx(params: Vec<u8>) -> TaContext {
    TaContext {
        params,
        bg_vertices: bg_quad_bytes(),
        alpha_ref: 0x40,
        video_width: 640,
        video_height: 480,
        ..Default::default()
    }
}

/// Enable `RUST_LOG`-driven translator output when debugging a failure.
fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Convert a context with fresh mocks, expecting success.
pub fn convert(ctx: &TaContext) -> (TrContext, MockBackend, MockCache, MockDecoder) {
    init_logs();
    let mut backend = MockBackend::default();
    let mut cache = MockCache::default();
    let mut decoder = MockDecoder::default();
    let mut rc = TrContext::new();
    Translator::new()
        .convert_context(&mut backend, &mut cache, &mut decoder, ctx, &mut rc)
        .expect("conversion should succeed");
    (rc, backend, cache, decoder)
}

/// Convert with caller-supplied mocks, returning the result.
pub fn convert_with(
    ctx: &TaContext,
    backend: &mut MockBackend,
    cache: &mut MockCache,
    decoder: &mut MockDecoder,
    rc: &mut TrContext,
) -> Result<(), pvr2_tr::TrError> {
    init_logs();
    Translator::new().convert_context(backend, cache, decoder, ctx, rc)
}
