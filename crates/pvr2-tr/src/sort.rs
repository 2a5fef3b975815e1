//! Back-to-front sorting of the transparent lists.
//!
//! Both sorted lists hold only per-triangle surfaces, so each surface's
//! key is the minimum Z of its three vertices. The sort must be stable:
//! layered decals at equal depth rely on submission order surviving,
//! which is why this is a hand-rolled merge sort rather than a
//! comparison-key shortcut over partial floats.

use pvr2_regs::ListType;

use crate::context::{TaContext, TrContext};

/// Sort the translucent and punch-through lists back to front when the
/// context requests autosorting.
pub(crate) fn sort_render_lists(
    ctx: &TaContext,
    rc: &mut TrContext,
    keys: &mut Vec<(f32, u32)>,
    tmp: &mut Vec<(f32, u32)>,
) {
    if !ctx.autosort {
        return;
    }
    sort_list(rc, ListType::Translucent, keys, tmp);
    sort_list(rc, ListType::PunchThrough, keys, tmp);
}

/// Stable-sort one list's surfaces by ascending minimum Z.
fn sort_list(rc: &mut TrContext, list: ListType, keys: &mut Vec<(f32, u32)>, tmp: &mut Vec<(f32, u32)>) {
    let surfs = &rc.lists[list.index()].surfs;

    keys.clear();
    keys.reserve(surfs.len());
    for &surf_idx in surfs {
        let surf = &rc.surfs[surf_idx as usize];
        let first = surf.first_vert as usize;
        let minz = rc.verts[first..first + surf.num_verts as usize]
            .iter()
            .map(|v| v.xyz[2])
            .fold(f32::INFINITY, f32::min);
        keys.push((minz, surf_idx));
    }

    merge_sort(keys, tmp);

    let surfs = &mut rc.lists[list.index()].surfs;
    for (slot, &(_, surf_idx)) in surfs.iter_mut().zip(tmp.iter()) {
        *slot = surf_idx;
    }
}

/// Bottom-up merge sort of `(key, value)` pairs by ascending key,
/// taking from the left run on ties. The result lands in `tmp`.
fn merge_sort(keys: &mut Vec<(f32, u32)>, tmp: &mut Vec<(f32, u32)>) {
    let n = keys.len();
    tmp.clear();
    tmp.extend_from_slice(keys);

    // Ping-pong between the two buffers, doubling the run length each
    // pass; track which buffer holds the current result so it always
    // ends up in `tmp`.
    let mut result_in_tmp = true;
    let mut width = 1;
    while width < n {
        if result_in_tmp {
            merge_pass(&tmp[..], &mut keys[..], width);
        } else {
            merge_pass(&keys[..], &mut tmp[..], width);
        }
        result_in_tmp = !result_in_tmp;
        width *= 2;
    }
    if !result_in_tmp {
        tmp.clear();
        tmp.extend_from_slice(keys);
    }
}

/// One bottom-up pass: merge adjacent runs of `width` from `src` into
/// `dst`.
fn merge_pass(src: &[(f32, u32)], dst: &mut [(f32, u32)], width: usize) {
    let n = src.len();
    let mut start = 0;
    while start < n {
        let mid = usize::min(start + width, n);
        let end = usize::min(start + 2 * width, n);
        merge(&src[start..mid], &src[mid..end], &mut dst[start..end]);
        start = end;
    }
}

/// Merge two sorted runs; `left` wins ties to keep the sort stable.
fn merge(left: &[(f32, u32)], right: &[(f32, u32)], out: &mut [(f32, u32)]) {
    let (mut i, mut j) = (0, 0);
    for slot in out.iter_mut() {
        let take_left = j >= right.len() || (i < left.len() && left[i].0 <= right[j].0);
        if take_left {
            *slot = left[i];
            i += 1;
        } else {
            *slot = right[j];
            j += 1;
        }
    }
}
