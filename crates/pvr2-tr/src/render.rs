//! Replays a translated draw context against a render backend.

use log::trace;
use pvr2_hal::RenderBackend;
use pvr2_regs::ListType;

use crate::context::TrContext;

/// Lists in draw order: opaque first, then alpha-tested geometry, then
/// blended geometry.
const DRAW_ORDER: [ListType; 3] = [
    ListType::Opaque,
    ListType::PunchThrough,
    ListType::Translucent,
];

/// Draw every surface of the context.
pub fn render_context<B: RenderBackend>(backend: &mut B, rc: &TrContext) {
    render_context_until(backend, rc, None);
}

/// Draw surfaces in order, stopping after the one whose running draw
/// index equals `end_surf`.
///
/// The early stop exists for step-through debugging: a tracing UI can
/// scrub through a frame one surface at a time.
pub fn render_context_until<B: RenderBackend>(
    backend: &mut B,
    rc: &TrContext,
    end_surf: Option<u32>,
) {
    backend.begin_ta_surfaces(
        rc.video_width,
        rc.video_height,
        rc.committed_verts(),
        &rc.indices,
    );

    let mut drawn = 0u32;
    'lists: for list in DRAW_ORDER {
        trace!(
            "drawing {} surfaces of {:?}",
            rc.lists[list.index()].surfs.len(),
            list
        );
        for &surf_idx in &rc.lists[list.index()].surfs {
            backend.draw_ta_surface(&rc.surfs[surf_idx as usize]);
            if Some(drawn) == end_surf {
                break 'lists;
            }
            drawn += 1;
        }
    }

    backend.end_ta_surfaces();
}
