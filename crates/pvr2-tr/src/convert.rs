//! The TA parameter stream state machine.
//!
//! One [`Translator::convert_context`] call walks the captured stream
//! start to end: global parameters latch render state and reserve a
//! surface, vertex parameters stage vertices onto it, and end-of-strip
//! commits the surface to its display list. Translucent and
//! punch-through strips are split into per-triangle surfaces at commit
//! so the back-to-front sort has a well-defined key.

use glam::{Vec2, Vec3};
use log::{debug, trace};
use pvr2_hal::{BlendFunc, DepthFunc, DrawParams, RenderBackend, TaVertex, TexDecoder, TextureCache};
use pvr2_regs::{
    decode_poly, decode_vertex, f32_at, list_type_valid, param_size, u32_at, uv16, vert_type,
    ColorEncoding, ListType, ParaType, Pcw, PolyBody, SpriteVertex, VertexParam, VERT_TYPE_MODVOL,
};

use crate::color::{intensity_color, pack_argb, pack_floats, quantize, unpack_argb};
use crate::context::{TaContext, TrContext, TrParam};
use crate::error::TrError;
use crate::format::{
    translate_cull, translate_depth_func, translate_dst_blend_func, translate_shade_mode,
    translate_src_blend_func,
};
use crate::texture::{bind_texture, SCRATCH_SIZE};
use crate::{index, sort};

/// Transient per-conversion parser state.
#[derive(Default)]
struct TrState {
    /// Currently open display list.
    list_type: Option<ListType>,
    /// Vertex type latched by the most recent global parameter.
    vert_type: Option<u32>,
    /// PCW of the most recent vertex, for strip-boundary detection.
    last_vertex: Option<Pcw>,
    /// Face colors latched by type 1/2 global parameters, `[r,g,b,a]`.
    face_color: [u8; 4],
    face_offset_color: [u8; 4],
    /// Sprite colors latched by type 5 global parameters.
    sprite_color: [u8; 4],
    sprite_offset_color: [u8; 4],
}

/// Converts captured TA contexts into draw contexts.
///
/// Owns the scratch buffers a conversion needs (texture decode target,
/// sort keys) so repeated conversions do not allocate.
pub struct Translator {
    scratch: Vec<u8>,
    sort_keys: Vec<(f32, u32)>,
    sort_tmp: Vec<(f32, u32)>,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator {
    pub fn new() -> Self {
        Self {
            scratch: vec![0; SCRATCH_SIZE],
            sort_keys: Vec::new(),
            sort_tmp: Vec::new(),
        }
    }

    /// Translate one captured context into `rc`.
    ///
    /// Resets `rc`, synthesizes the background quad, parses the
    /// parameter stream, sorts the transparent lists when requested and
    /// generates merged triangle indices. On error `rc` holds partial
    /// output and should be discarded.
    pub fn convert_context<B, C, D>(
        &mut self,
        backend: &mut B,
        cache: &mut C,
        decoder: &mut D,
        ctx: &TaContext,
        rc: &mut TrContext,
    ) -> Result<(), TrError>
    where
        B: RenderBackend,
        C: TextureCache,
        D: TexDecoder,
    {
        rc.reset(ctx.video_width, ctx.video_height);
        let mut state = TrState::default();

        self.parse_bg(backend, cache, decoder, ctx, rc)?;

        let data = &ctx.params;
        let mut offset = 0;
        while offset < data.len() {
            if data.len() - offset < 4 {
                return Err(TrError::TruncatedParam { offset });
            }
            let pcw = Pcw(u32_at(&data[offset..], 0));

            // Parameters that start list content open the list when
            // none is open; everything else inherits it.
            if list_type_valid(pcw, state.list_type) {
                state.list_type = ListType::from_bits(pcw.list_type());
            }

            let size = param_size(pcw, state.vert_type.unwrap_or(0));
            if offset + size > data.len() {
                return Err(TrError::TruncatedParam { offset });
            }
            let param = &data[offset..offset + size];

            match ParaType::from_bits(pcw.para_type()) {
                Some(ParaType::EndOfList) => {
                    trace!("end of list {:?}", state.list_type);
                    state.last_vertex = None;
                    state.list_type = None;
                    state.vert_type = None;
                }
                Some(ParaType::UserTileClip) => {}
                Some(ParaType::ObjListSet) => return Err(TrError::ObjListSet { offset }),
                Some(ParaType::PolyOrVol) | Some(ParaType::Sprite) => {
                    self.parse_poly_param(backend, cache, decoder, ctx, rc, &mut state, param, offset)?;
                }
                Some(ParaType::Vertex) => {
                    parse_vert_param(rc, &mut state, param, offset)?;
                }
                None => {
                    trace!("ignoring reserved para type {}", pcw.para_type());
                }
            }

            rc.push_param(TrParam {
                offset,
                list_type: state.list_type,
                vert_type: state.vert_type,
                last_surf: (rc.surfs.len() as u32).checked_sub(1),
                last_vert: rc.num_verts.checked_sub(1),
            });

            offset += size;
        }

        sort::sort_render_lists(ctx, rc, &mut self.sort_keys, &mut self.sort_tmp);
        index::generate_indices(rc)?;

        debug!(
            "converted {} param bytes: {} surfs, {} verts, {} indices",
            data.len(),
            rc.num_list_surfs(),
            rc.num_verts,
            rc.indices.len()
        );
        Ok(())
    }

    /// Handle a polygon or sprite global parameter: latch face colors,
    /// reserve a surface and translate its render state.
    #[allow(clippy::too_many_arguments)]
    fn parse_poly_param<B, C, D>(
        &mut self,
        backend: &mut B,
        cache: &mut C,
        decoder: &mut D,
        ctx: &TaContext,
        rc: &mut TrContext,
        state: &mut TrState,
        data: &[u8],
        offset: usize,
    ) -> Result<(), TrError>
    where
        B: RenderBackend,
        C: TextureCache,
        D: TexDecoder,
    {
        let param = decode_poly(data)?;
        state.last_vertex = None;
        state.vert_type = Some(vert_type(param.pcw));

        match param.body {
            PolyBody::Plain => {}
            PolyBody::FaceColor { face } => {
                state.face_color = quantize(face);
            }
            PolyBody::FaceColorOffset { face, offset } => {
                state.face_color = quantize(face);
                state.face_offset_color = quantize(offset);
            }
            PolyBody::SpriteColor { base, offset } => {
                state.sprite_color = unpack_argb(base);
                state.sprite_offset_color = unpack_argb(offset);
            }
            // Modifier volumes are not rendered; no surface to reserve.
            PolyBody::ModifierVolume => return Ok(()),
        }

        // A list-starting parameter always has a decodable list field,
        // so an open list is guaranteed here for well-formed input.
        let list = state.list_type.ok_or(TrError::NoActiveList { offset })?;

        let surf_idx = rc.reserve_surf(false)?;

        // The PCW copies of the uv_16bit/gouraud/offset/texture flags
        // override the ISP ones, so the offset and texture flags below
        // come from the PCW.
        let mut params = DrawParams {
            depth_write: !param.isp.z_write_disable(),
            depth_func: translate_depth_func(param.isp.depth_compare_mode()),
            cull: translate_cull(param.isp.culling_mode()),
            src_blend: translate_src_blend_func(param.tsp.src_alpha_instr()),
            dst_blend: translate_dst_blend_func(param.tsp.dst_alpha_instr()),
            shade: translate_shade_mode(param.tsp.texture_shading_instr()),
            ignore_alpha: !param.tsp.use_alpha(),
            ignore_texture_alpha: param.tsp.ignore_tex_alpha(),
            offset_color: param.pcw.offset(),
            alpha_test: list == ListType::PunchThrough,
            alpha_ref: ctx.alpha_ref,
            texture: 0,
        };

        if !matches!(list, ListType::Translucent | ListType::TranslucentModVol) {
            // Blending only applies to the translucent lists.
            params.src_blend = BlendFunc::None;
            params.dst_blend = BlendFunc::None;
        } else if ctx.autosort {
            // Sorted back to front; draw ties in submission order.
            params.depth_func = DepthFunc::Lequal;
        }
        if list == ListType::PunchThrough {
            params.depth_func = DepthFunc::Gequal;
        }

        if param.pcw.texture() {
            params.texture = bind_texture(
                &mut self.scratch,
                backend,
                cache,
                decoder,
                ctx,
                param.tsp,
                param.tcw,
            )?;
        }

        rc.surfs[surf_idx].params = params;
        Ok(())
    }

    /// Synthesize the framebuffer-clearing background quad as an opaque
    /// surface before the main parse.
    fn parse_bg<B, C, D>(
        &mut self,
        backend: &mut B,
        cache: &mut C,
        decoder: &mut D,
        ctx: &TaContext,
        rc: &mut TrContext,
    ) -> Result<(), TrError>
    where
        B: RenderBackend,
        C: TextureCache,
        D: TexDecoder,
    {
        let surf_idx = rc.reserve_surf(false)?;

        let mut params = DrawParams {
            depth_write: !ctx.bg_isp.z_write_disable(),
            depth_func: translate_depth_func(ctx.bg_isp.depth_compare_mode()),
            cull: translate_cull(ctx.bg_isp.culling_mode()),
            src_blend: BlendFunc::None,
            dst_blend: BlendFunc::None,
            shade: translate_shade_mode(ctx.bg_tsp.texture_shading_instr()),
            ignore_alpha: !ctx.bg_tsp.use_alpha(),
            ignore_texture_alpha: ctx.bg_tsp.ignore_tex_alpha(),
            offset_color: ctx.bg_isp.offset(),
            alpha_test: false,
            alpha_ref: 0,
            texture: 0,
        };
        if ctx.bg_isp.texture() {
            params.texture = bind_texture(
                &mut self.scratch,
                backend,
                cache,
                decoder,
                ctx,
                ctx.bg_tsp,
                ctx.bg_tcw,
            )?;
        }
        rc.surfs[surf_idx].params = params;

        let mut word = 0;
        let va = parse_bg_vert(ctx, &mut word)?;
        let vb = parse_bg_vert(ctx, &mut word)?;
        let vc = parse_bg_vert(ctx, &mut word)?;
        // TODO: when ISP_BACKGND_D is in effect the hardware replaces
        // the captured vertex depths with the register plane; that case
        // renders with the captured depths for now.

        // The fourth corner isn't supplied; extend the parallelogram.
        let xyz = |v: &TaVertex| Vec3::from_array(v.xyz);
        let uv = |v: &TaVertex| Vec2::from_array(v.uv);
        let d_xyz = xyz(&vb) + (xyz(&vb) - xyz(&va)) + (xyz(&vc) - xyz(&va));
        let d_uv = uv(&vb) + (uv(&vb) - uv(&va)) + (uv(&vc) - uv(&va));
        let vd = TaVertex {
            xyz: d_xyz.to_array(),
            uv: d_uv.to_array(),
            color: va.color,
            offset_color: va.offset_color,
        };

        rc.push_vert(va)?;
        rc.push_vert(vb)?;
        rc.push_vert(vc)?;
        rc.push_vert(vd)?;
        commit_surf(rc, ListType::Opaque)
    }
}

/// Parse one vertex from the background vertex data.
fn parse_bg_vert(ctx: &TaContext, word: &mut usize) -> Result<TaVertex, TrError> {
    let data = &ctx.bg_vertices;
    let textured = ctx.bg_isp.texture();
    let mut need = 4;
    if textured {
        need += if ctx.bg_isp.uv_16bit() { 1 } else { 2 };
    }
    if ctx.bg_isp.offset() {
        need += 1;
    }
    if (*word + need) * 4 > data.len() {
        return Err(TrError::TruncatedParam { offset: *word * 4 });
    }

    let mut v = TaVertex {
        xyz: [
            f32_at(data, *word),
            f32_at(data, *word + 1),
            f32_at(data, *word + 2),
        ],
        ..Default::default()
    };
    *word += 3;
    if textured {
        if ctx.bg_isp.uv_16bit() {
            v.uv = uv16(u32_at(data, *word));
            *word += 1;
        } else {
            v.uv = [f32_at(data, *word), f32_at(data, *word + 1)];
            *word += 2;
        }
    }
    v.color = u32_at(data, *word);
    *word += 1;
    if ctx.bg_isp.offset() {
        v.offset_color = u32_at(data, *word);
        *word += 1;
    }
    Ok(v)
}

/// Resolve a vertex color encoding against a latched face color.
fn resolve_color(enc: ColorEncoding, face: [u8; 4]) -> u32 {
    match enc {
        ColorEncoding::Packed(c) => c,
        ColorEncoding::Floats(c) => pack_floats(c),
        ColorEncoding::Intensity(i) => intensity_color(face, i),
    }
}

/// Handle a vertex parameter: stage the vertex (or sprite quad) and
/// commit the surface on end-of-strip.
fn parse_vert_param(
    rc: &mut TrContext,
    state: &mut TrState,
    data: &[u8],
    offset: usize,
) -> Result<(), TrError> {
    let vt = match state.vert_type {
        Some(vt) => vt,
        None => return Err(TrError::NoActiveList { offset }),
    };
    if vt == VERT_TYPE_MODVOL {
        return Ok(());
    }
    let list = state.list_type.ok_or(TrError::NoActiveList { offset })?;
    let pcw = Pcw(u32_at(data, 0));

    // A vertex may immediately follow an end-of-strip vertex without
    // new global parameters; continue with the same render state.
    if state.last_vertex.map_or(false, |p| p.end_of_strip()) {
        rc.reserve_surf(true)?;
    }
    state.last_vertex = Some(pcw);

    match decode_vertex(data, vt)? {
        VertexParam::Poly(v) => {
            let color = resolve_color(v.base, state.face_color);
            let offset_color = v
                .offset
                .map(|enc| resolve_color(enc, state.face_offset_color))
                .unwrap_or(0);
            rc.push_vert(TaVertex {
                xyz: v.xyz,
                uv: v.uv,
                color,
                offset_color,
            })?;
        }
        // Sprites commit (or discard) themselves.
        VertexParam::Sprite(s) => return sprite_vert(rc, state, list, &s, offset),
    }

    if pcw.end_of_strip() {
        commit_surf(rc, list)?;
    }
    Ok(())
}

/// Stage a sprite's four corners, solving the fourth from the plane of
/// the first three, then commit.
///
/// The input visits the corners a, b, c, d clockwise; they are emitted
/// as the strip a, b, d, c (bottom-left, top-left, bottom-right,
/// top-right) to match the polygon pipeline.
fn sprite_vert(
    rc: &mut TrContext,
    state: &TrState,
    list: ListType,
    s: &SpriteVertex,
    offset: usize,
) -> Result<(), TrError> {
    if !s.pcw.end_of_strip() {
        return Err(TrError::SpriteMissingEndOfStrip { offset });
    }

    let a = Vec3::from_array(s.xyz[0]);
    let b = Vec3::from_array(s.xyz[1]);
    let c = Vec3::from_array(s.xyz[2]);

    let n = (a - b).cross(c - b);
    let len = n.length();
    if len == 0.0 {
        trace!("dropping degenerate sprite at byte offset {offset}");
        return Ok(());
    }
    let n = n / len;
    if n.z == 0.0 {
        trace!("dropping edge-on sprite at byte offset {offset}");
        return Ok(());
    }
    let d_plane = n.dot(b);
    let d_z = (d_plane - n.x * s.d_xy[0] - n.y * s.d_xy[1]) / n.z;

    // Parallelogram completion for the fourth corner's UV.
    let d_uv = [
        s.uv[1][0] + (s.uv[0][0] - s.uv[1][0]) + (s.uv[2][0] - s.uv[1][0]),
        s.uv[1][1] + (s.uv[0][1] - s.uv[1][1]) + (s.uv[2][1] - s.uv[1][1]),
    ];

    let color = pack_argb(state.sprite_color);
    let offset_color = pack_argb(state.sprite_offset_color);
    let vert = |xyz: [f32; 3], uv: [f32; 2]| TaVertex {
        xyz,
        uv,
        color,
        offset_color,
    };

    rc.push_vert(vert(s.xyz[0], s.uv[0]))?;
    rc.push_vert(vert(s.xyz[1], s.uv[1]))?;
    rc.push_vert(vert([s.d_xy[0], s.d_xy[1], d_z], d_uv))?;
    rc.push_vert(vert(s.xyz[2], s.uv[2]))?;

    commit_surf(rc, list)
}

/// Commit the surface being built to its display list.
///
/// Opaque lists take the whole strip as one surface. The translucent
/// and punch-through lists are split into one surface per triangle so
/// they can be depth-sorted; the triangles share the staged vertices,
/// so the watermark advances by one per triangle plus the final two
/// strip vertices.
fn commit_surf(rc: &mut TrContext, list: ListType) -> Result<(), TrError> {
    let surf_idx = rc.surfs.len() - 1;
    rc.lists[list.index()].num_orig_surfs += 1;

    let strip_verts = rc.surfs[surf_idx].num_verts;
    if matches!(list, ListType::Translucent | ListType::PunchThrough) {
        let num_tris = strip_verts.saturating_sub(2);
        let mut tri_idx = surf_idx;
        for i in 0..num_tris {
            if i > 0 {
                tri_idx = rc.reserve_surf(true)?;
            }
            let first = rc.num_verts;
            let surf = &mut rc.surfs[tri_idx];
            surf.first_vert = first;
            surf.num_verts = 3;
            surf.strip_offset = i;
            rc.num_verts += 1;
            rc.push_list_surf(list, tri_idx as u32)?;
        }
        rc.num_verts += 2;
    } else {
        rc.push_list_surf(list, surf_idx as u32)?;
        rc.num_verts += strip_verts;
    }
    Ok(())
}
