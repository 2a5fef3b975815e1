//! Triangle-strip expansion and adjacent-surface merging.
//!
//! Walks each list in draw order, expanding every surface's strip into
//! CCW indexed triangles. Adjacent surfaces with identical render state
//! collapse into the first surface of the run, whose vertex range is
//! rebased onto the emitted index range.

use pvr2_hal::TaSurface;

use crate::context::TrContext;
use crate::error::TrError;

/// Generate triangle indices for every list, merging runs of surfaces
/// with equal draw parameters.
pub(crate) fn generate_indices(rc: &mut TrContext) -> Result<(), TrError> {
    for list_idx in 0..rc.lists.len() {
        let num_surfs = rc.lists[list_idx].surfs.len();
        let mut read = 0;
        let mut write = 0;
        while read < num_surfs {
            let root_idx = rc.lists[list_idx].surfs[read];
            let root_params = rc.surfs[root_idx as usize].params;
            let first_index = rc.indices.len() as u32;

            // Emit every surface of the mergeable run.
            let mut next = read;
            while next < num_surfs {
                let surf_idx = rc.lists[list_idx].surfs[next];
                let surf = rc.surfs[surf_idx as usize];
                if surf.params != root_params {
                    break;
                }
                emit_strip(rc, &surf)?;
                next += 1;
            }

            // The run's root now addresses the emitted indices.
            let root = &mut rc.surfs[root_idx as usize];
            root.first_vert = first_index;
            root.num_verts = rc.indices.len() as u32 - first_index;

            rc.lists[list_idx].surfs[write] = root_idx;
            write += 1;
            read = next;
        }
        rc.lists[list_idx].surfs.truncate(write);
    }
    Ok(())
}

/// Expand one strip into indexed triangles.
///
/// The PVR submits strips clockwise; flipping every even-parity
/// triangle (counted from the start of the original strip, so split
/// surfaces keep their parity) yields CCW windings throughout.
fn emit_strip(rc: &mut TrContext, surf: &TaSurface) -> Result<(), TrError> {
    for i in 0..surf.num_verts.saturating_sub(2) {
        let v = surf.first_vert + i;
        if (surf.strip_offset + i) & 1 != 0 {
            rc.push_index(v)?;
            rc.push_index(v + 1)?;
            rc.push_index(v + 2)?;
        } else {
            rc.push_index(v)?;
            rc.push_index(v + 2)?;
            rc.push_index(v + 1)?;
        }
    }
    Ok(())
}
