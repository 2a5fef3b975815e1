//! Fixed tables mapping PVR hardware encodings to backend enums.
//!
//! Table order is part of the hardware contract; entries are indexed
//! directly by the masked instruction-word fields.

use pvr2_hal::{BlendFunc, CullFace, DepthFunc, FilterMode, ShadeMode, WrapMode};

const DEPTH_FUNCS: [DepthFunc; 8] = [
    DepthFunc::Never,
    DepthFunc::Greater,
    DepthFunc::Equal,
    DepthFunc::Gequal,
    DepthFunc::Less,
    DepthFunc::Nequal,
    DepthFunc::Lequal,
    DepthFunc::Always,
];

const CULL_MODES: [CullFace; 4] = [
    CullFace::None,
    CullFace::None,
    CullFace::Back,
    CullFace::Front,
];

const SRC_BLEND_FUNCS: [BlendFunc; 8] = [
    BlendFunc::Zero,
    BlendFunc::One,
    BlendFunc::DstColor,
    BlendFunc::OneMinusDstColor,
    BlendFunc::SrcAlpha,
    BlendFunc::OneMinusSrcAlpha,
    BlendFunc::DstAlpha,
    BlendFunc::OneMinusDstAlpha,
];

const DST_BLEND_FUNCS: [BlendFunc; 8] = [
    BlendFunc::Zero,
    BlendFunc::One,
    BlendFunc::SrcColor,
    BlendFunc::OneMinusSrcColor,
    BlendFunc::SrcAlpha,
    BlendFunc::OneMinusSrcAlpha,
    BlendFunc::DstAlpha,
    BlendFunc::OneMinusDstAlpha,
];

const SHADE_MODES: [ShadeMode; 4] = [
    ShadeMode::Decal,
    ShadeMode::Modulate,
    ShadeMode::DecalAlpha,
    ShadeMode::ModulateAlpha,
];

/// Map the 3-bit ISP depth compare code.
#[inline]
pub fn translate_depth_func(mode: u32) -> DepthFunc {
    DEPTH_FUNCS[mode as usize & 0x7]
}

/// Map the 2-bit ISP culling code.
#[inline]
pub fn translate_cull(mode: u32) -> CullFace {
    CULL_MODES[mode as usize & 0x3]
}

/// Map the 3-bit TSP source blend instruction.
#[inline]
pub fn translate_src_blend_func(instr: u32) -> BlendFunc {
    SRC_BLEND_FUNCS[instr as usize & 0x7]
}

/// Map the 3-bit TSP destination blend instruction.
#[inline]
pub fn translate_dst_blend_func(instr: u32) -> BlendFunc {
    DST_BLEND_FUNCS[instr as usize & 0x7]
}

/// Map the 2-bit TSP texture/shading instruction.
#[inline]
pub fn translate_shade_mode(instr: u32) -> ShadeMode {
    SHADE_MODES[instr as usize & 0x3]
}

/// Map the TSP filter field: point sampling or bilinear.
///
/// The trilinear encodings have no backend counterpart and fall back
/// to bilinear.
#[inline]
pub fn translate_filter(filter_mode: u32) -> FilterMode {
    if filter_mode == 0 {
        FilterMode::Nearest
    } else {
        FilterMode::Bilinear
    }
}

/// Map one axis of texture addressing from the TSP clamp/flip bits.
#[inline]
pub fn translate_wrap(clamp: bool, flip: bool) -> WrapMode {
    if clamp {
        WrapMode::ClampToEdge
    } else if flip {
        WrapMode::MirroredRepeat
    } else {
        WrapMode::Repeat
    }
}
