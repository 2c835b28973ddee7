//! Pure raster transforms for the three scenario variants.
//!
//! Each filter maps the decoded source raster to a new image; none of them
//! can fail on a well-formed raster, and all are deterministic (same input
//! bytes in, same output bytes out, which is what makes job re-delivery
//! harmless).

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};

use crate::models::job::Variant;

/// BT.601 luma coefficient for the red channel.
pub const LUMA_R: f32 = 0.299;
/// BT.601 luma coefficient for the green channel.
pub const LUMA_G: f32 = 0.587;
/// BT.601 luma coefficient for the blue channel.
pub const LUMA_B: f32 = 0.114;

/// Fixed sepia color-mixing matrix. Rows map a (B, G, R) input triple to a
/// (B', G', R') output triple — the OpenCV channel convention this matrix is
/// written in, kept for byte parity of the sepia output.
const SEPIA_KERNEL: [[f32; 3]; 3] = [
    [0.272, 0.534, 0.131],
    [0.349, 0.686, 0.168],
    [0.393, 0.769, 0.189],
];

/// Gaussian kernel width for the sketch blur (21x21, so radius 10).
const SKETCH_KERNEL_SIZE: usize = 21;
const SKETCH_RADIUS: i64 = (SKETCH_KERNEL_SIZE as i64 - 1) / 2;
/// Auto sigma for a 21-tap kernel: 0.3 * ((21 - 1) * 0.5 - 1) + 0.8
const SKETCH_SIGMA: f32 = 3.5;

/// Scale factor of the color-dodge division in the sketch filter.
const DODGE_SCALE: f32 = 256.0;

/// Apply one variant's filter to the source raster.
pub fn apply(variant: Variant, src: &RgbImage) -> DynamicImage {
    match variant {
        Variant::Noir => DynamicImage::ImageLuma8(noir(src)),
        Variant::Sketch => DynamicImage::ImageLuma8(sketch(src)),
        Variant::Sepia => DynamicImage::ImageRgb8(sepia(src)),
    }
}

/// Single-channel luminance conversion (BT.601 weighting).
pub fn noir(src: &RgbImage) -> GrayImage {
    let mut out = GrayImage::new(src.width(), src.height());
    for (x, y, px) in src.enumerate_pixels() {
        out.put_pixel(x, y, Luma([luma_u8(px)]));
    }
    out
}

/// Pencil-sketch effect: color dodge of the luminance against a broadly
/// blurred copy of itself. `result = luma * 256 / (255 - blurred)`, clamped;
/// a fully white blurred sample saturates to 255.
pub fn sketch(src: &RgbImage) -> GrayImage {
    let gray = noir(src);
    let blurred = gaussian_blur(&gray);

    let mut out = GrayImage::new(gray.width(), gray.height());
    for (x, y, px) in gray.enumerate_pixels() {
        let g = px[0] as f32;
        let denom = 255.0 - blurred.get_pixel(x, y)[0] as f32;
        let dodged = if denom <= 0.0 {
            255.0
        } else {
            (g * DODGE_SCALE / denom).min(255.0)
        };
        out.put_pixel(x, y, Luma([dodged.round() as u8]));
    }
    out
}

/// Sepia-tone approximation via a fixed 3x3 channel-mixing matrix, clamped
/// per channel. The mix runs in BGR channel order (see [`SEPIA_KERNEL`]).
pub fn sepia(src: &RgbImage) -> RgbImage {
    let mut out = RgbImage::new(src.width(), src.height());
    for (x, y, px) in src.enumerate_pixels() {
        let bgr = [px[2] as f32, px[1] as f32, px[0] as f32];
        let mut mixed = [0u8; 3]; // B', G', R'
        for (channel, row) in mixed.iter_mut().zip(SEPIA_KERNEL.iter()) {
            let v = row[0] * bgr[0] + row[1] * bgr[1] + row[2] * bgr[2];
            *channel = v.round().clamp(0.0, 255.0) as u8;
        }
        out.put_pixel(x, y, Rgb([mixed[2], mixed[1], mixed[0]]));
    }
    out
}

#[inline]
fn luma_u8(px: &Rgb<u8>) -> u8 {
    let lum = LUMA_R * px[0] as f32 + LUMA_G * px[1] as f32 + LUMA_B * px[2] as f32;
    lum.round().clamp(0.0, 255.0) as u8
}

/// Separable Gaussian blur with the fixed sketch kernel, reflect-101 edge
/// handling (a sample at -1 reads index 1).
fn gaussian_blur(src: &GrayImage) -> GrayImage {
    let (w, h) = src.dimensions();
    let kernel = gaussian_kernel();

    // Horizontal pass into an f32 scratch buffer to avoid double rounding.
    let mut scratch = vec![0.0f32; (w as usize) * (h as usize)];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let sx = reflect_101(x as i64 + k as i64 - SKETCH_RADIUS, w);
                acc += weight * src.get_pixel(sx, y)[0] as f32;
            }
            scratch[(y * w + x) as usize] = acc;
        }
    }

    // Vertical pass back into u8.
    let mut out = GrayImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let sy = reflect_101(y as i64 + k as i64 - SKETCH_RADIUS, h);
                acc += weight * scratch[(sy * w + x) as usize];
            }
            out.put_pixel(x, y, Luma([acc.round().clamp(0.0, 255.0) as u8]));
        }
    }
    out
}

fn gaussian_kernel() -> [f32; SKETCH_KERNEL_SIZE] {
    let mut kernel = [0.0f32; SKETCH_KERNEL_SIZE];
    let two_sigma_sq = 2.0 * SKETCH_SIGMA * SKETCH_SIGMA;
    let mut sum = 0.0;
    for (k, weight) in kernel.iter_mut().enumerate() {
        let d = (k as i64 - SKETCH_RADIUS) as f32;
        *weight = (-d * d / two_sigma_sq).exp();
        sum += *weight;
    }
    for weight in kernel.iter_mut() {
        *weight /= sum;
    }
    kernel
}

/// Mirror an out-of-range index without repeating the border sample.
fn reflect_101(i: i64, len: u32) -> u32 {
    let len = len as i64;
    if len == 1 {
        return 0;
    }
    let period = 2 * (len - 1);
    let mut i = i.rem_euclid(period);
    if i >= len {
        i = period - i;
    }
    i as u32
}
