//! On-demand conversion of `(tsp, tcw)` texture references to backend
//! handles.

use log::trace;
use pvr2_hal::{PixelFormat, RenderBackend, TexDecoder, TextureCache, TextureDesc, TextureHandle};
use pvr2_regs::{
    texture_format, texture_height, texture_mipmaps, texture_stride, texture_width, Tcw, Tsp,
};

use crate::context::TaContext;
use crate::error::TrError;
use crate::format::{translate_filter, translate_wrap};

/// Scratch decode buffer size: the largest PVR texture is 1024x1024
/// RGBA8888.
pub(crate) const SCRATCH_SIZE: usize = 1024 * 1024 * 4;

/// Resolve `(tsp, tcw)` to a backend texture handle.
///
/// Entries are cached on the raw word pair alone. A clean entry reuses
/// its handle; a dirty one is destroyed, re-decoded into `scratch` and
/// re-created, with the resulting sampling state written back into the
/// entry.
///
/// TODO: the cache key ignores TEXT_CONTROL and PAL_RAM_CTRL, so two
/// frames that differ only in palette or stride state will incorrectly
/// share an entry.
pub(crate) fn bind_texture<B, C, D>(
    scratch: &mut [u8],
    backend: &mut B,
    cache: &mut C,
    decoder: &mut D,
    ctx: &TaContext,
    tsp: Tsp,
    tcw: Tcw,
) -> Result<TextureHandle, TrError>
where
    B: RenderBackend,
    C: TextureCache,
    D: TexDecoder,
{
    let entry = cache
        .find_texture(tsp.0, tcw.0)
        .ok_or(TrError::MissingTexture { tsp: tsp.0, tcw: tcw.0 })?;

    if entry.handle != 0 && !entry.dirty {
        return Ok(entry.handle);
    }
    if entry.handle != 0 {
        trace!("destroying dirty texture handle {}", entry.handle);
        backend.destroy_texture(entry.handle);
        entry.handle = 0;
    }

    let width = texture_width(tsp);
    let height = texture_height(tsp);
    let stride = texture_stride(tsp, tcw, ctx.stride);

    decoder
        .decode(
            &entry.texture,
            width,
            height,
            stride,
            texture_format(tcw),
            PixelFormat::Rgba8888,
            &entry.palette,
            ctx.palette_fmt,
            scratch,
        )
        .map_err(|e| TrError::TextureDecode(format!("{e:?}")))?;

    let desc = TextureDesc {
        format: PixelFormat::Rgba8888,
        filter: translate_filter(tsp.filter_mode()),
        wrap_u: translate_wrap(tsp.clamp_u(), tsp.flip_u()),
        wrap_v: translate_wrap(tsp.clamp_v(), tsp.flip_v()),
        mipmaps: texture_mipmaps(tcw),
        width,
        height,
    };
    let pixels = &scratch[..(width * height * 4) as usize];
    let handle = backend.create_texture(&desc, pixels);
    trace!(
        "bound texture tsp={:08x} tcw={:08x} as handle {} ({}x{})",
        tsp.0,
        tcw.0,
        handle,
        width,
        height
    );

    entry.handle = handle;
    entry.dirty = false;
    entry.filter = desc.filter;
    entry.wrap_u = desc.wrap_u;
    entry.wrap_v = desc.wrap_v;
    entry.format = desc.format;
    entry.width = width;
    entry.height = height;

    Ok(handle)
}
