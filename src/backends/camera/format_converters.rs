// SPDX-License-Identifier: GPL-3.0-only
//! Pixel format conversion utilities
//!
//! Camera drivers deliver YUYV or MJPEG; the rest of the app works on RGBA
//! (preview) and 8-bit luminance (QR decoding).

use std::io;

/// Convert YUYV (YUV 4:2:2) to RGBA
///
/// YUYV format: Y0 U0 Y1 V0 - each 4-byte group encodes 2 pixels.
/// Uses BT.601 coefficients for YUV to RGB conversion.
pub fn yuyv_to_rgba(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    let pixel_count = (width * height) as usize;
    let mut rgba = Vec::with_capacity(pixel_count * 4);

    for chunk in data.chunks_exact(4) {
        let y0 = chunk[0] as f32;
        let u = chunk[1] as f32 - 128.0;
        let y1 = chunk[2] as f32;
        let v = chunk[3] as f32 - 128.0;

        for y in [y0, y1] {
            if rgba.len() >= pixel_count * 4 {
                break;
            }

            let r = (y + 1.402 * v).clamp(0.0, 255.0) as u8;
            let g = (y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8;
            let b = (y + 1.772 * u).clamp(0.0, 255.0) as u8;

            rgba.push(r);
            rgba.push(g);
            rgba.push(b);
            rgba.push(255);
        }
    }

    rgba
}

/// Decode one MJPEG frame to RGBA
///
/// Returns `(rgba, width, height)`; the JPEG's own dimensions win over the
/// negotiated ones.
pub fn mjpeg_to_rgba(data: &[u8]) -> io::Result<(Vec<u8>, u32, u32)> {
    let img = image::load_from_memory_with_format(data, image::ImageFormat::Jpeg)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok((rgba.into_raw(), width, height))
}

/// Convert RGBA to 8-bit luminance (BT.601 weights, alpha ignored)
pub fn rgba_to_luma(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(4)
        .map(|px| {
            let y = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
            y.round().clamp(0.0, 255.0) as u8
        })
        .collect()
}

/// Downscale a luminance image using bilinear interpolation
pub fn downscale_luma(
    luma: &[u8],
    src_width: u32,
    src_height: u32,
    dst_width: u32,
    dst_height: u32,
) -> Vec<u8> {
    let src_width = src_width as usize;
    let src_height = src_height as usize;
    let mut result = Vec::with_capacity((dst_width * dst_height) as usize);

    let x_ratio = src_width as f32 / dst_width as f32;
    let y_ratio = src_height as f32 / dst_height as f32;

    let get_pixel =
        |px: usize, py: usize| -> f32 { luma.get(py * src_width + px).copied().unwrap_or(0) as f32 };

    for y in 0..dst_height {
        for x in 0..dst_width {
            let src_x = x as f32 * x_ratio;
            let src_y = y as f32 * y_ratio;

            let x0 = src_x as usize;
            let y0 = src_y as usize;
            let x1 = (x0 + 1).min(src_width - 1);
            let y1 = (y0 + 1).min(src_height - 1);

            let x_frac = src_x - x0 as f32;
            let y_frac = src_y - y0 as f32;

            let p00 = get_pixel(x0, y0);
            let p01 = get_pixel(x1, y0);
            let p10 = get_pixel(x0, y1);
            let p11 = get_pixel(x1, y1);

            let value = p00 * (1.0 - x_frac) * (1.0 - y_frac)
                + p01 * x_frac * (1.0 - y_frac)
                + p10 * (1.0 - x_frac) * y_frac
                + p11 * x_frac * y_frac;

            result.push(value as u8);
        }
    }

    result
}
