//! Affine geometry and inverse warping.
//!
//! Spatial transforms express their geometry as one forward [`Affine2`]
//! matrix. The same matrix drives everything that must stay consistent:
//!
//! - the image warp (inverse mapping: each destination pixel samples the
//!   source at the inverse-transformed location),
//! - the mask warp (same mapping, own filter and fill; nearest by default),
//! - bounding-box corners and keypoints (forward mapping as coordinates).
//!
//! Pixel centers sit at `(i + 0.5, j + 0.5)` in continuous coordinates, so
//! a rotation about the canvas center `(w/2, h/2)` lands exactly on pixel
//! centers for right-angle turns.
//!
//! When the `parallel` feature is enabled the warp processes rows with
//! rayon.

use crate::border::BorderMode;
use crate::error::{ApplyError, ApplyResult};
use crate::interp::Interpolation;
use aug_core::{Image, Mask};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// 2D affine transform as a 2x3 row-major matrix.
///
/// ```text
/// | a  b  tx |   x' = a*x + b*y + tx
/// | c  d  ty |   y' = c*x + d*y + ty
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine2 {
    /// Matrix entries `[a, b, tx, c, d, ty]`.
    pub m: [f64; 6],
}

impl Affine2 {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
    };

    /// Pure translation.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self {
            m: [1.0, 0.0, tx, 0.0, 1.0, ty],
        }
    }

    /// Axis scaling about the origin.
    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self {
            m: [sx, 0.0, 0.0, 0.0, sy, 0.0],
        }
    }

    /// Rotation about the origin by `radians` (counter-clockwise in math
    /// coordinates; visually clockwise with y pointing down).
    pub fn rotation(radians: f64) -> Self {
        let (s, c) = radians.sin_cos();
        Self {
            m: [c, -s, 0.0, s, c, 0.0],
        }
    }

    /// Shear by per-axis angles in radians.
    pub fn shear(x_radians: f64, y_radians: f64) -> Self {
        Self {
            m: [1.0, x_radians.tan(), 0.0, y_radians.tan(), 1.0, 0.0],
        }
    }

    /// Composition: applies `self` first, then `after`.
    pub fn then(&self, after: &Affine2) -> Self {
        let [a1, b1, tx1, c1, d1, ty1] = self.m;
        let [a2, b2, tx2, c2, d2, ty2] = after.m;
        Self {
            m: [
                a2 * a1 + b2 * c1,
                a2 * b1 + b2 * d1,
                a2 * tx1 + b2 * ty1 + tx2,
                c2 * a1 + d2 * c1,
                c2 * b1 + d2 * d1,
                c2 * tx1 + d2 * ty1 + ty2,
            ],
        }
    }

    /// Conjugates a transform so it acts about the canvas center.
    pub fn about_center(inner: &Affine2, width: u32, height: u32) -> Self {
        let cx = width as f64 / 2.0;
        let cy = height as f64 / 2.0;
        Self::translation(-cx, -cy)
            .then(inner)
            .then(&Self::translation(cx, cy))
    }

    /// Maps a point through the transform.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let [a, b, tx, c, d, ty] = self.m;
        (a * x + b * y + tx, c * x + d * y + ty)
    }

    /// Inverse transform.
    ///
    /// # Errors
    ///
    /// Returns [`ApplyError::InvalidGeometry`] when the matrix is singular
    /// (e.g. a zero scale factor).
    pub fn invert(&self) -> ApplyResult<Self> {
        let [a, b, tx, c, d, ty] = self.m;
        let det = a * d - b * c;
        if det.abs() < 1e-12 {
            return Err(ApplyError::InvalidGeometry(
                "singular affine matrix".into(),
            ));
        }
        Ok(Self {
            m: [
                d / det,
                -b / det,
                (b * ty - d * tx) / det,
                -c / det,
                a / det,
                (c * tx - a * ty) / det,
            ],
        })
    }
}

/// Warps an image through a forward affine transform.
///
/// Each destination pixel samples the source at the inverse-mapped
/// location using `interp`; samples outside the canvas follow `border`,
/// with one `fill` value per channel in constant mode.
pub fn warp_affine_image(
    src: &Image<f32>,
    forward: &Affine2,
    out_size: (u32, u32),
    interp: Interpolation,
    border: BorderMode,
    fill: &[f32],
) -> ApplyResult<Image<f32>> {
    debug_assert_eq!(fill.len(), src.channels() as usize);
    let inverse = forward.invert()?;
    let (out_w, out_h) = out_size;
    let ch = src.channels() as usize;
    let src_w = src.width() as usize;
    let src_h = src.height() as usize;
    let src_data = src.data();

    let mut out = Image::<f32>::new(out_w, out_h, src.channels());
    let row_len = out_w as usize * ch;

    let render_row = |y: usize, row: &mut [f32]| {
        let mut acc = vec![0.0f32; ch];
        for x in 0..out_w as usize {
            let (sx, sy) = inverse.apply(x as f64 + 0.5, y as f64 + 0.5);
            sample_filtered(
                src_data,
                src_w,
                src_h,
                ch,
                sx as f32,
                sy as f32,
                interp,
                border,
                fill,
                &mut acc,
            );
            row[x * ch..(x + 1) * ch].copy_from_slice(&acc);
        }
    };

    {
        let data = out.data_mut();
        #[cfg(feature = "parallel")]
        data.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| render_row(y, row));
        #[cfg(not(feature = "parallel"))]
        data.chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| render_row(y, row));
    }

    Ok(out)
}

/// Warps a mask through a forward affine transform.
///
/// The mask filter is configured independently of the image filter and
/// defaults to nearest at the config layer, which keeps label values
/// unblended. Non-nearest filters interpolate the raw label values and
/// round the result. Out-of-canvas samples follow `border` with the
/// mask's own `fill`.
pub fn warp_affine_mask(
    src: &Mask,
    forward: &Affine2,
    out_size: (u32, u32),
    interp: Interpolation,
    border: BorderMode,
    fill: u8,
) -> ApplyResult<Mask> {
    let inverse = forward.invert()?;
    let (out_w, out_h) = out_size;
    let ch = src.channels() as usize;
    let src_w = src.width() as i64;
    let src_h = src.height() as i64;
    let src_data = src.data();

    if interp != Interpolation::Nearest {
        let src_f32: Vec<f32> = src_data.iter().map(|v| *v as f32).collect();
        let fill_f32 = vec![fill as f32; ch];
        let mut acc = vec![0.0f32; ch];
        let mut out = Mask::new(out_w, out_h, src.channels());
        {
            let data = out.data_mut();
            for y in 0..out_h as usize {
                for x in 0..out_w as usize {
                    let (sx, sy) = inverse.apply(x as f64 + 0.5, y as f64 + 0.5);
                    sample_filtered(
                        &src_f32,
                        src_w as usize,
                        src_h as usize,
                        ch,
                        sx as f32,
                        sy as f32,
                        interp,
                        border,
                        &fill_f32,
                        &mut acc,
                    );
                    let idx = (y * out_w as usize + x) * ch;
                    for (c, v) in acc.iter().enumerate() {
                        data[idx + c] = v.round().clamp(0.0, 255.0) as u8;
                    }
                }
            }
        }
        return Ok(out);
    }

    let mut out = Mask::new(out_w, out_h, src.channels());
    {
        let data = out.data_mut();
        for y in 0..out_h as usize {
            for x in 0..out_w as usize {
                let (sx, sy) = inverse.apply(x as f64 + 0.5, y as f64 + 0.5);
                let ix = sx.floor() as i64;
                let iy = sy.floor() as i64;
                let idx = (y * out_w as usize + x) * ch;
                match (border.fold(ix, src_w), border.fold(iy, src_h)) {
                    (Some(fx), Some(fy)) => {
                        let s = (fy as usize * src_w as usize + fx as usize) * ch;
                        data[idx..idx + ch].copy_from_slice(&src_data[s..s + ch]);
                    }
                    _ => {
                        data[idx..idx + ch].fill(fill);
                    }
                }
            }
        }
    }
    Ok(out)
}

/// Samples the source at continuous center-coordinates (sx, sy) into `acc`.
#[allow(clippy::too_many_arguments)]
fn sample_filtered(
    src: &[f32],
    src_w: usize,
    src_h: usize,
    ch: usize,
    sx: f32,
    sy: f32,
    interp: Interpolation,
    border: BorderMode,
    fill: &[f32],
    acc: &mut [f32],
) {
    if interp == Interpolation::Nearest {
        let ix = sx.floor() as i64;
        let iy = sy.floor() as i64;
        match (
            border.fold(ix, src_w as i64),
            border.fold(iy, src_h as i64),
        ) {
            (Some(fx), Some(fy)) => {
                let s = (fy as usize * src_w + fx as usize) * ch;
                acc.copy_from_slice(&src[s..s + ch]);
            }
            _ => acc.copy_from_slice(fill),
        }
        return;
    }

    // Windowed kernel over the filter support, in pixel-index space.
    let support = interp.support();
    let tx = sx - 0.5;
    let ty = sy - 0.5;
    let x0 = (tx - support).ceil() as i64;
    let x1 = (tx + support).floor() as i64;
    let y0 = (ty - support).ceil() as i64;
    let y1 = (ty + support).floor() as i64;

    acc.fill(0.0);
    let mut weight_sum = 0.0f32;
    for iy in y0..=y1 {
        let wy = interp.weight(iy as f32 - ty);
        if wy == 0.0 {
            continue;
        }
        for ix in x0..=x1 {
            let w = interp.weight(ix as f32 - tx) * wy;
            if w == 0.0 {
                continue;
            }
            weight_sum += w;
            match (
                border.fold(ix, src_w as i64),
                border.fold(iy, src_h as i64),
            ) {
                (Some(fx), Some(fy)) => {
                    let s = (fy as usize * src_w + fx as usize) * ch;
                    for c in 0..ch {
                        acc[c] += src[s + c] * w;
                    }
                }
                _ => {
                    for (c, v) in acc.iter_mut().enumerate() {
                        *v += fill[c] * w;
                    }
                }
            }
        }
    }
    if weight_sum > 0.0 {
        for v in acc.iter_mut() {
            *v /= weight_sum;
        }
    } else {
        acc.copy_from_slice(fill);
    }
}
