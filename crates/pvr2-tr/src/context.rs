//! Input and output contexts.
//!
//! A [`TaContext`] is an immutable capture of one frame's TA state. A
//! [`TrContext`] owns the translated output in fixed-capacity arenas
//! addressed by `u32` indices; it is reset and refilled by every
//! conversion so a frontend can keep one per swap-chain slot.

use pvr2_hal::{TaSurface, TaVertex};
use pvr2_regs::{Isp, ListType, Tcw, Tsp, NUM_LISTS};

use crate::error::TrError;

/// Maximum surfaces per conversion.
pub const MAX_SURFS: usize = 0x4000;
/// Maximum vertices per conversion.
pub const MAX_VERTS: usize = 0x10000;
/// Maximum triangle indices per conversion.
pub const MAX_INDICES: usize = MAX_VERTS * 3;
/// Maximum trace records kept per conversion.
pub const MAX_PARAMS: usize = 0x10000;

/// A captured TA display-list context.
#[derive(Clone, Debug, Default)]
pub struct TaContext {
    /// Raw TA parameter stream.
    pub params: Vec<u8>,
    /// Background vertex data referenced by ISP_BACKGND_T.
    pub bg_vertices: Vec<u8>,
    pub bg_isp: Isp,
    pub bg_tsp: Tsp,
    pub bg_tcw: Tcw,
    /// ISP_BACKGND_D plane depth. Currently unused; see the background
    /// parser.
    pub bg_depth: f32,
    /// PAL_RAM_CTRL palette pixel format.
    pub palette_fmt: u32,
    /// TEXT_CONTROL stride override, in texels.
    pub stride: u32,
    /// PT_ALPHA_REF punch-through alpha reference.
    pub alpha_ref: u8,
    /// Sort translucent/punch-through triangles back to front.
    pub autosort: bool,
    pub video_width: u32,
    pub video_height: u32,
}

/// One display list of the translated output: surface indices in draw
/// order.
#[derive(Clone, Debug, Default)]
pub struct TrList {
    /// Indices into [`TrContext::surfs`], parse order until sorted.
    pub surfs: Vec<u32>,
    /// Strips committed to this list, before any per-triangle split.
    pub num_orig_surfs: u32,
}

/// Per-command trace record, written in parse order.
///
/// Purely diagnostic; a tracing UI uses these to map draw output back
/// to input bytes.
#[derive(Copy, Clone, Debug)]
pub struct TrParam {
    /// Byte offset of the command in the input stream.
    pub offset: usize,
    /// List open after the command.
    pub list_type: Option<ListType>,
    /// Vertex type in effect after the command.
    pub vert_type: Option<u32>,
    /// Most recently reserved surface.
    pub last_surf: Option<u32>,
    /// Most recently committed vertex.
    pub last_vert: Option<u32>,
}

/// Translated draw context: surfaces, vertices and triangle indices.
#[derive(Clone, Debug)]
pub struct TrContext {
    /// Surface arena. Entries not referenced by any list are orphans
    /// (discarded sprites) and are never drawn.
    pub surfs: Vec<TaSurface>,
    /// Vertex arena, preallocated; `num_verts` is the committed
    /// watermark and the current strip stages vertices beyond it.
    pub verts: Vec<TaVertex>,
    pub num_verts: u32,
    /// Triangle index arena, filled by index generation.
    pub indices: Vec<u32>,
    /// One list per TA list type.
    pub lists: [TrList; NUM_LISTS],
    /// Per-command trace records.
    pub params: Vec<TrParam>,
    pub video_width: u32,
    pub video_height: u32,
}

impl Default for TrContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TrContext {
    /// Allocate a context with all arenas at full capacity.
    pub fn new() -> Self {
        Self {
            surfs: Vec::with_capacity(MAX_SURFS),
            verts: vec![TaVertex::default(); MAX_VERTS],
            num_verts: 0,
            indices: Vec::with_capacity(MAX_INDICES),
            lists: Default::default(),
            params: Vec::with_capacity(MAX_PARAMS),
            video_width: 0,
            video_height: 0,
        }
    }

    /// Committed vertices, for handing to a backend.
    pub fn committed_verts(&self) -> &[TaVertex] {
        &self.verts[..self.num_verts as usize]
    }

    /// Total committed surfaces across all lists.
    pub fn num_list_surfs(&self) -> usize {
        self.lists.iter().map(|l| l.surfs.len()).sum()
    }

    pub(crate) fn reset(&mut self, video_width: u32, video_height: u32) {
        self.surfs.clear();
        self.num_verts = 0;
        self.indices.clear();
        for list in &mut self.lists {
            list.surfs.clear();
            list.num_orig_surfs = 0;
        }
        self.params.clear();
        self.video_width = video_width;
        self.video_height = video_height;
    }

    /// Reserve a fresh surface at the top of the arena.
    ///
    /// With `copy_from_prev` the render state of the previous surface
    /// carries over (strip continuation and per-triangle splitting);
    /// the vertex range always starts at the committed watermark.
    pub(crate) fn reserve_surf(&mut self, copy_from_prev: bool) -> Result<usize, TrError> {
        if self.surfs.len() >= MAX_SURFS {
            return Err(TrError::CapacityExceeded {
                what: "surface",
                capacity: MAX_SURFS,
            });
        }
        let params = match (copy_from_prev, self.surfs.last()) {
            (true, Some(prev)) => prev.params,
            _ => Default::default(),
        };
        self.surfs.push(TaSurface {
            params,
            first_vert: self.num_verts,
            num_verts: 0,
            strip_offset: 0,
        });
        Ok(self.surfs.len() - 1)
    }

    /// Stage one vertex onto the surface currently being built.
    ///
    /// The vertex lands past the committed watermark; it only becomes
    /// visible when the surface commits.
    pub(crate) fn push_vert(&mut self, v: TaVertex) -> Result<(), TrError> {
        let idx = self.surfs.len() - 1;
        let surf = &mut self.surfs[idx];
        let slot = (surf.first_vert + surf.num_verts) as usize;
        if slot >= MAX_VERTS {
            return Err(TrError::CapacityExceeded {
                what: "vertex",
                capacity: MAX_VERTS,
            });
        }
        self.verts[slot] = v;
        surf.num_verts += 1;
        Ok(())
    }

    /// Append a triangle index.
    pub(crate) fn push_index(&mut self, idx: u32) -> Result<(), TrError> {
        if self.indices.len() >= MAX_INDICES {
            return Err(TrError::CapacityExceeded {
                what: "index",
                capacity: MAX_INDICES,
            });
        }
        self.indices.push(idx);
        Ok(())
    }

    /// Append a surface to a list's draw order.
    pub(crate) fn push_list_surf(&mut self, list: ListType, surf: u32) -> Result<(), TrError> {
        let surfs = &mut self.lists[list.index()].surfs;
        if surfs.len() >= MAX_SURFS {
            return Err(TrError::CapacityExceeded {
                what: "list surface",
                capacity: MAX_SURFS,
            });
        }
        surfs.push(surf);
        Ok(())
    }

    /// Record a trace entry; silently dropped once the trace is full.
    pub(crate) fn push_param(&mut self, param: TrParam) {
        if self.params.len() < MAX_PARAMS {
            self.params.push(param);
        }
    }
}
