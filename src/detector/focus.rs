//! Frame sharpness gate.
//!
//! - Convolves a 3×3 Laplacian over the interior of the frame.
//! - The focus measure is the variance of the response; blurred frames score
//!   low because defocus suppresses high-frequency content.
//! - The session machine rejects frames below its configured measure and
//!   retries the capture instead of scanning a blurred tray.

use crate::image::ImageU8;

type Kernel3 = [[f32; 3]; 3];

const LAPLACIAN_KERNEL: Kernel3 = [[0.0, 1.0, 0.0], [1.0, -4.0, 1.0], [0.0, 1.0, 0.0]];

/// Variance of the 3×3 Laplacian response over interior pixels. Border
/// rows/columns are skipped. Frames smaller than 3×3 measure 0.
pub fn focus_measure(image: ImageU8<'_>) -> f64 {
    if image.w < 3 || image.h < 3 {
        return 0.0;
    }
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    let count = ((image.w - 2) * (image.h - 2)) as f64;
    for y in 1..image.h - 1 {
        let rows = [image.row(y - 1), image.row(y), image.row(y + 1)];
        for x in 1..image.w - 1 {
            let mut response = 0.0f32;
            for (ky, row) in rows.iter().enumerate() {
                let taps = &LAPLACIAN_KERNEL[ky];
                response += taps[0] * row[x - 1] as f32
                    + taps[1] * row[x] as f32
                    + taps[2] * row[x + 1] as f32;
            }
            let r = response as f64;
            sum += r;
            sum_sq += r * r;
        }
    }
    let mean = sum / count;
    (sum_sq / count - mean * mean).max(0.0)
}

/// True when the measure clears `threshold`. A non-positive threshold
/// disables the gate.
pub fn is_in_focus(image: ImageU8<'_>, threshold: f64) -> bool {
    threshold <= 0.0 || focus_measure(image) >= threshold
}
