//! Unit tests for the color conversions and the hardware encoding
//! tables.

use pvr2_hal::{BlendFunc, CullFace, DepthFunc, FilterMode, ShadeMode, WrapMode};
use pvr2_tr::color::{fmulu8, ftou8, intensity_color, pack_argb, pack_floats, quantize, unpack_argb};
use pvr2_tr::format::{
    translate_cull, translate_depth_func, translate_dst_blend_func, translate_filter,
    translate_shade_mode, translate_src_blend_func, translate_wrap,
};

mod ftou8_conversion {
    use super::*;

    #[test]
    fn zero() {
        assert_eq!(ftou8(0.0), 0);
    }

    #[test]
    fn one_saturates_at_255() {
        assert_eq!(ftou8(1.0), 255);
    }

    #[test]
    fn truncates_toward_zero() {
        // 0.5 * 255 = 127.5
        assert_eq!(ftou8(0.5), 127);
    }

    #[test]
    fn clamps_above_one() {
        assert_eq!(ftou8(4.0), 255);
    }

    #[test]
    fn clamps_negative() {
        assert_eq!(ftou8(-0.5), 0);
    }

    #[test]
    fn nan_does_not_trap() {
        assert_eq!(ftou8(f32::NAN), 0);
    }
}

mod fixed_point_multiply {
    use super::*;

    #[test]
    fn identity_at_full_scale() {
        assert_eq!(fmulu8(255, 255), 255);
        assert_eq!(fmulu8(128, 255), 128);
    }

    #[test]
    fn zero_annihilates() {
        assert_eq!(fmulu8(0, 200), 0);
        assert_eq!(fmulu8(200, 0), 0);
    }

    #[test]
    fn no_overflow_in_intermediate() {
        // 255 * 255 = 65025 needs more than 16 bits
        assert_eq!(fmulu8(255, 128), 128);
    }
}

mod packed_colors {
    use super::*;

    #[test]
    fn unpack_splits_argb() {
        assert_eq!(unpack_argb(0x80ff4020), [0xff, 0x40, 0x20, 0x80]);
    }

    #[test]
    fn pack_unpack_round_trips() {
        let c = 0x12345678;
        assert_eq!(pack_argb(unpack_argb(c)), c);
    }

    #[test]
    fn memory_order_is_bgra() {
        let packed = pack_argb([0x11, 0x22, 0x33, 0x44]);
        assert_eq!(packed.to_le_bytes(), [0x33, 0x22, 0x11, 0x44]);
    }

    #[test]
    fn pack_floats_quantizes() {
        assert_eq!(pack_floats([1.0, 0.0, 0.0, 1.0]), 0xffff0000);
        assert_eq!(quantize([1.0, 0.5, 0.0, 1.0]), [255, 127, 0, 255]);
    }
}

mod intensity {
    use super::*;

    #[test]
    fn modulates_rgb_keeps_alpha() {
        let c = intensity_color([200, 100, 50, 80], 0.5);
        let [r, g, b, a] = unpack_argb(c);
        assert_eq!(r as u32, 200 * 127 / 255);
        assert_eq!(g as u32, 100 * 127 / 255);
        assert_eq!(b as u32, 50 * 127 / 255);
        assert_eq!(a, 80);
    }

    #[test]
    fn full_intensity_is_identity_on_rgb() {
        let c = intensity_color([200, 100, 50, 80], 1.0);
        assert_eq!(unpack_argb(c), [200, 100, 50, 80]);
    }

    #[test]
    fn overrange_intensity_saturates() {
        let c = intensity_color([200, 100, 50, 80], 2.0);
        assert_eq!(unpack_argb(c), [200, 100, 50, 80]);
    }
}

mod encoding_tables {
    use super::*;

    #[test]
    fn depth_funcs_in_hardware_order() {
        let expected = [
            DepthFunc::Never,
            DepthFunc::Greater,
            DepthFunc::Equal,
            DepthFunc::Gequal,
            DepthFunc::Less,
            DepthFunc::Nequal,
            DepthFunc::Lequal,
            DepthFunc::Always,
        ];
        for (code, want) in expected.iter().enumerate() {
            assert_eq!(translate_depth_func(code as u32), *want);
        }
    }

    #[test]
    fn cull_modes() {
        assert_eq!(translate_cull(0), CullFace::None);
        assert_eq!(translate_cull(1), CullFace::None);
        assert_eq!(translate_cull(2), CullFace::Back);
        assert_eq!(translate_cull(3), CullFace::Front);
    }

    #[test]
    fn src_blend_uses_dst_color_for_other() {
        assert_eq!(translate_src_blend_func(0), BlendFunc::Zero);
        assert_eq!(translate_src_blend_func(1), BlendFunc::One);
        assert_eq!(translate_src_blend_func(2), BlendFunc::DstColor);
        assert_eq!(translate_src_blend_func(3), BlendFunc::OneMinusDstColor);
        assert_eq!(translate_src_blend_func(4), BlendFunc::SrcAlpha);
        assert_eq!(translate_src_blend_func(7), BlendFunc::OneMinusDstAlpha);
    }

    #[test]
    fn dst_blend_uses_src_color_for_other() {
        assert_eq!(translate_dst_blend_func(2), BlendFunc::SrcColor);
        assert_eq!(translate_dst_blend_func(3), BlendFunc::OneMinusSrcColor);
        assert_eq!(translate_dst_blend_func(5), BlendFunc::OneMinusSrcAlpha);
    }

    #[test]
    fn shade_modes() {
        assert_eq!(translate_shade_mode(0), ShadeMode::Decal);
        assert_eq!(translate_shade_mode(1), ShadeMode::Modulate);
        assert_eq!(translate_shade_mode(2), ShadeMode::DecalAlpha);
        assert_eq!(translate_shade_mode(3), ShadeMode::ModulateAlpha);
    }

    #[test]
    fn filter_defaults_trilinear_to_bilinear() {
        assert_eq!(translate_filter(0), FilterMode::Nearest);
        assert_eq!(translate_filter(1), FilterMode::Bilinear);
        assert_eq!(translate_filter(2), FilterMode::Bilinear);
        assert_eq!(translate_filter(3), FilterMode::Bilinear);
    }

    #[test]
    fn wrap_priority_is_clamp_then_flip() {
        assert_eq!(translate_wrap(false, false), WrapMode::Repeat);
        assert_eq!(translate_wrap(false, true), WrapMode::MirroredRepeat);
        assert_eq!(translate_wrap(true, false), WrapMode::ClampToEdge);
        assert_eq!(translate_wrap(true, true), WrapMode::ClampToEdge);
    }
}
