//! Tagged parameter decoding for the TA command stream.
//!
//! Every command starts with a PCW whose `para_type` tag selects the
//! record layout; polygon and vertex records additionally vary with the
//! derived polygon/vertex type. The decoders here turn the raw
//! little-endian words into discriminated sum types so the translator
//! never reinterprets bytes itself.

use core::fmt;

use crate::words::{Isp, Pcw, Tcw, Tsp};
use crate::{f32_at, u32_at};

/// Parameter tag carried in PCW bits 29-31.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ParaType {
    /// Terminates the currently open display list.
    EndOfList = 0,
    /// User tile clip rectangle (ignored by the translator).
    UserTileClip = 1,
    /// Object list set block (unsupported).
    ObjListSet = 2,
    /// Polygon or modifier-volume global parameter.
    PolyOrVol = 4,
    /// Sprite global parameter.
    Sprite = 5,
    /// Vertex parameter.
    Vertex = 7,
}

impl ParaType {
    /// Decode the 3-bit tag; the two reserved encodings return `None`.
    pub fn from_bits(raw: u32) -> Option<ParaType> {
        match raw {
            0 => Some(ParaType::EndOfList),
            1 => Some(ParaType::UserTileClip),
            2 => Some(ParaType::ObjListSet),
            4 => Some(ParaType::PolyOrVol),
            5 => Some(ParaType::Sprite),
            7 => Some(ParaType::Vertex),
            _ => None,
        }
    }
}

/// The five display lists emitted by the TA.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ListType {
    Opaque = 0,
    OpaqueModVol = 1,
    Translucent = 2,
    TranslucentModVol = 3,
    PunchThrough = 4,
}

/// Number of display lists.
pub const NUM_LISTS: usize = 5;

impl ListType {
    /// Decode the 3-bit list field; the reserved encodings return `None`.
    pub fn from_bits(raw: u32) -> Option<ListType> {
        match raw {
            0 => Some(ListType::Opaque),
            1 => Some(ListType::OpaqueModVol),
            2 => Some(ListType::Translucent),
            3 => Some(ListType::TranslucentModVol),
            4 => Some(ListType::PunchThrough),
            _ => None,
        }
    }

    /// Array index of this list.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// True for the two modifier-volume lists.
    #[inline]
    pub fn is_modvol(self) -> bool {
        matches!(self, ListType::OpaqueModVol | ListType::TranslucentModVol)
    }
}

/// Vertex type number for modifier-volume vertices.
pub const VERT_TYPE_MODVOL: u32 = 17;

/// Whether this PCW may open a display list when none is open.
///
/// Only the parameters that start list content carry a meaningful
/// `list_type` field; vertex parameters inherit the open list.
pub fn list_type_valid(pcw: Pcw, current: Option<ListType>) -> bool {
    current.is_none()
        && matches!(
            ParaType::from_bits(pcw.para_type()),
            Some(ParaType::PolyOrVol | ParaType::Sprite | ParaType::ObjListSet)
        )
}

/// Polygon type (0-6) derived from the PCW.
///
/// Selects the global-parameter record layout: which face colors it
/// carries and whether it spans 32 or 64 bytes.
pub fn poly_type(pcw: Pcw) -> u32 {
    let list = ListType::from_bits(pcw.list_type());
    if list.map_or(false, ListType::is_modvol) {
        return 6;
    }
    if ParaType::from_bits(pcw.para_type()) == Some(ParaType::Sprite) {
        return 5;
    }
    if pcw.volume() {
        return match pcw.col_type() {
            2 => 4,
            _ => 3,
        };
    }
    match pcw.col_type() {
        1 => 1,
        2 => 2,
        _ => 0,
    }
}

/// Vertex type (0-17) derived from the PCW of the governing global
/// parameter.
///
/// Numbering follows the hardware vertex parameter formats; 15/16 are
/// the sprite forms and 17 is the modifier-volume triangle.
pub fn vert_type(pcw: Pcw) -> u32 {
    let list = ListType::from_bits(pcw.list_type());
    if list.map_or(false, ListType::is_modvol) {
        return VERT_TYPE_MODVOL;
    }
    if ParaType::from_bits(pcw.para_type()) == Some(ParaType::Sprite) {
        return if pcw.texture() { 16 } else { 15 };
    }
    if pcw.volume() {
        return if pcw.texture() {
            match pcw.col_type() {
                0 => {
                    if pcw.uv_16bit() {
                        12
                    } else {
                        11
                    }
                }
                _ => {
                    if pcw.uv_16bit() {
                        14
                    } else {
                        13
                    }
                }
            }
        } else {
            match pcw.col_type() {
                0 => 9,
                _ => 10,
            }
        };
    }
    if pcw.texture() {
        match pcw.col_type() {
            0 => {
                if pcw.uv_16bit() {
                    4
                } else {
                    3
                }
            }
            1 => {
                if pcw.uv_16bit() {
                    6
                } else {
                    5
                }
            }
            _ => {
                if pcw.uv_16bit() {
                    8
                } else {
                    7
                }
            }
        }
    } else {
        match pcw.col_type() {
            0 => 0,
            1 => 1,
            _ => 2,
        }
    }
}

/// Byte length of the parameter starting with `pcw`.
///
/// Vertex parameters take their length from the vertex type set by the
/// most recent global parameter; everything else is self-describing.
pub fn param_size(pcw: Pcw, vert_type: u32) -> usize {
    match ParaType::from_bits(pcw.para_type()) {
        Some(ParaType::Vertex) => match vert_type {
            5 | 6 | 11 | 12 | 13 | 14 | 15 | 16 | VERT_TYPE_MODVOL => 64,
            _ => 32,
        },
        Some(ParaType::PolyOrVol | ParaType::Sprite) => match poly_type(pcw) {
            2 | 4 => 64,
            _ => 32,
        },
        _ => 32,
    }
}

/// A parameter whose polygon/vertex type the translator does not handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// Two-volume polygon types (3/4) or a reserved encoding.
    UnsupportedPolyType(u32),
    /// Two-volume vertex types (9-14) or a reserved encoding.
    UnsupportedVertType(u32),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::UnsupportedPolyType(t) => write!(f, "unsupported polygon type {t}"),
            DecodeError::UnsupportedVertType(t) => write!(f, "unsupported vertex type {t}"),
        }
    }
}

/// Polygon/sprite global parameter: the four instruction words plus the
/// type-specific color payload.
#[derive(Copy, Clone, Debug)]
pub struct PolyParam {
    pub pcw: Pcw,
    pub isp: Isp,
    pub tsp: Tsp,
    pub tcw: Tcw,
    pub body: PolyBody,
}

/// Type-specific payload of a polygon global parameter.
#[derive(Copy, Clone, Debug)]
pub enum PolyBody {
    /// Type 0: intensity vertices reuse the previously latched face color.
    Plain,
    /// Type 1: a new face color, floating `[r, g, b, a]`.
    FaceColor { face: [f32; 4] },
    /// Type 2: face and face-offset colors, floating `[r, g, b, a]`.
    FaceColorOffset { face: [f32; 4], offset: [f32; 4] },
    /// Type 5: sprite base and offset colors, packed ARGB.
    SpriteColor { base: u32, offset: u32 },
    /// Type 6: modifier volume; carries no drawable state.
    ModifierVolume,
}

/// Read the floating `a, r, g, b` quad at `word` as `[r, g, b, a]`.
fn argb_floats(data: &[u8], word: usize) -> [f32; 4] {
    [
        f32_at(data, word + 1),
        f32_at(data, word + 2),
        f32_at(data, word + 3),
        f32_at(data, word),
    ]
}

/// Decode a polygon or sprite global parameter.
///
/// `data` must hold the full record (`param_size` bytes).
pub fn decode_poly(data: &[u8]) -> Result<PolyParam, DecodeError> {
    let pcw = Pcw(u32_at(data, 0));
    let body = match poly_type(pcw) {
        0 => PolyBody::Plain,
        1 => PolyBody::FaceColor {
            face: argb_floats(data, 4),
        },
        2 => PolyBody::FaceColorOffset {
            face: argb_floats(data, 8),
            offset: argb_floats(data, 12),
        },
        5 => PolyBody::SpriteColor {
            base: u32_at(data, 4),
            offset: u32_at(data, 5),
        },
        6 => PolyBody::ModifierVolume,
        t => return Err(DecodeError::UnsupportedPolyType(t)),
    };
    Ok(PolyParam {
        pcw,
        isp: Isp(u32_at(data, 1)),
        tsp: Tsp(u32_at(data, 2)),
        tcw: Tcw(u32_at(data, 3)),
        body,
    })
}

/// The color encoding carried by one vertex.
#[derive(Copy, Clone, Debug)]
pub enum ColorEncoding {
    /// Packed ARGB word.
    Packed(u32),
    /// Floating `[r, g, b, a]`.
    Floats([f32; 4]),
    /// Intensity scalar modulating the latched face color.
    Intensity(f32),
}

/// A decoded polygon vertex (types 0-8).
#[derive(Copy, Clone, Debug)]
pub struct PolyVertex {
    pub xyz: [f32; 3],
    /// Zero for the untextured types.
    pub uv: [f32; 2],
    pub base: ColorEncoding,
    /// Present for the textured types that carry an offset color.
    pub offset: Option<ColorEncoding>,
}

/// A decoded sprite vertex parameter (types 15/16).
///
/// Carries the full positions of the first three corners and only the
/// XY of the fourth; the translator solves for its Z.
#[derive(Copy, Clone, Debug)]
pub struct SpriteVertex {
    pub pcw: Pcw,
    /// Corners a, b, c.
    pub xyz: [[f32; 3]; 3],
    /// Corner d, XY only.
    pub d_xy: [f32; 2],
    /// UVs of a, b, c; zero for the untextured form.
    pub uv: [[f32; 2]; 3],
}

/// A decoded vertex parameter.
#[derive(Copy, Clone, Debug)]
pub enum VertexParam {
    Poly(PolyVertex),
    Sprite(SpriteVertex),
}

/// Split a packed 16-bit UV word into `[u, v]`.
///
/// U occupies the high half and V the low half; each becomes the high
/// 16 bits of an `f32` bit pattern. This is a bit reinterpretation, not
/// a numeric conversion.
#[inline]
pub fn uv16(word: u32) -> [f32; 2] {
    [
        f32::from_bits(word & 0xffff_0000),
        f32::from_bits(word << 16),
    ]
}

/// Decode a vertex parameter for the given vertex type.
///
/// `data` must hold the full record. Type 17 (modifier volume) is
/// skipped before decoding and is not accepted here.
pub fn decode_vertex(data: &[u8], vert_type: u32) -> Result<VertexParam, DecodeError> {
    let xyz = [f32_at(data, 1), f32_at(data, 2), f32_at(data, 3)];
    let vp = match vert_type {
        0 => PolyVertex {
            xyz,
            uv: [0.0; 2],
            base: ColorEncoding::Packed(u32_at(data, 6)),
            offset: None,
        },
        1 => PolyVertex {
            xyz,
            uv: [0.0; 2],
            base: ColorEncoding::Floats(argb_floats(data, 4)),
            offset: None,
        },
        2 => PolyVertex {
            xyz,
            uv: [0.0; 2],
            base: ColorEncoding::Intensity(f32_at(data, 6)),
            offset: None,
        },
        3 => PolyVertex {
            xyz,
            uv: [f32_at(data, 4), f32_at(data, 5)],
            base: ColorEncoding::Packed(u32_at(data, 6)),
            offset: Some(ColorEncoding::Packed(u32_at(data, 7))),
        },
        4 => PolyVertex {
            xyz,
            uv: uv16(u32_at(data, 4)),
            base: ColorEncoding::Packed(u32_at(data, 6)),
            offset: Some(ColorEncoding::Packed(u32_at(data, 7))),
        },
        5 => PolyVertex {
            xyz,
            uv: [f32_at(data, 4), f32_at(data, 5)],
            base: ColorEncoding::Floats(argb_floats(data, 8)),
            offset: Some(ColorEncoding::Floats(argb_floats(data, 12))),
        },
        6 => PolyVertex {
            xyz,
            uv: uv16(u32_at(data, 4)),
            base: ColorEncoding::Floats(argb_floats(data, 8)),
            offset: Some(ColorEncoding::Floats(argb_floats(data, 12))),
        },
        7 => PolyVertex {
            xyz,
            uv: [f32_at(data, 4), f32_at(data, 5)],
            base: ColorEncoding::Intensity(f32_at(data, 6)),
            offset: Some(ColorEncoding::Intensity(f32_at(data, 7))),
        },
        8 => PolyVertex {
            xyz,
            uv: uv16(u32_at(data, 4)),
            base: ColorEncoding::Intensity(f32_at(data, 6)),
            offset: Some(ColorEncoding::Intensity(f32_at(data, 7))),
        },
        15 | 16 => {
            let uv = if vert_type == 16 {
                // Word 12 is reserved; the three packed UVs follow it.
                [
                    uv16(u32_at(data, 13)),
                    uv16(u32_at(data, 14)),
                    uv16(u32_at(data, 15)),
                ]
            } else {
                [[0.0; 2]; 3]
            };
            return Ok(VertexParam::Sprite(SpriteVertex {
                pcw: Pcw(u32_at(data, 0)),
                xyz: [
                    xyz,
                    [f32_at(data, 4), f32_at(data, 5), f32_at(data, 6)],
                    [f32_at(data, 7), f32_at(data, 8), f32_at(data, 9)],
                ],
                d_xy: [f32_at(data, 10), f32_at(data, 11)],
                uv,
            }));
        }
        t => return Err(DecodeError::UnsupportedVertType(t)),
    };
    Ok(VertexParam::Poly(vp))
}
