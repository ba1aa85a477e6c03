//! Full-frame post-processing passes run after all nodes are drawn

use crate::color::Rgb;
use crate::graphics::Canvas;
use crate::math::smoothstep;

/// A post-processing pass
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    /// Blurs bright regions and adds them back on top
    Bloom {
        intensity: f32,
        /// Luminance where the glow starts
        threshold: f32,
        /// Width of the luminance ramp above the threshold
        smoothing: f32,
    },
    /// Shifts the red and blue channels in opposite directions
    ChromaticAberration {
        /// Shift as a fraction of the canvas size
        offset: [f32; 2],
    },
}

impl Effect {
    pub fn apply(&self, canvas: &mut Canvas) {
        match *self {
            Effect::Bloom {
                intensity,
                threshold,
                smoothing,
            } => bloom(canvas, intensity, threshold, smoothing),
            Effect::ChromaticAberration { offset } => chromatic_aberration(canvas, offset),
        }
    }
}

/// Glow radius in pixels for a canvas of the given height
fn bloom_radius(height: usize) -> usize {
    (height / 24).max(1)
}

/// Adds a blurred copy of the bright regions back onto the canvas
pub fn bloom(canvas: &mut Canvas, intensity: f32, threshold: f32, smoothing: f32) {
    let (width, height) = (canvas.width(), canvas.height());
    if width == 0 || height == 0 || intensity <= 0.0 {
        return;
    }

    // Luminance pass
    let bright: Vec<Rgb> = canvas
        .pixels()
        .iter()
        .map(|&p| p * smoothstep(threshold, threshold + smoothing.max(1e-3), p.luminance()))
        .collect();

    let radius = bloom_radius(height);
    let blurred = box_blur(&box_blur(&bright, width, height, radius, true), width, height, radius, false);

    for (pixel, glow) in canvas.pixels_mut().iter_mut().zip(blurred) {
        *pixel += glow * intensity;
    }
}

/// One-dimensional box blur along rows or columns, with edge clamping
fn box_blur(source: &[Rgb], width: usize, height: usize, radius: usize, horizontal: bool) -> Vec<Rgb> {
    let mut out = vec![Rgb::BLACK; source.len()];
    let (lines, span) = if horizontal { (height, width) } else { (width, height) };
    let index = |line: usize, k: usize| {
        if horizontal {
            line * width + k
        } else {
            k * width + line
        }
    };
    let window = (radius * 2 + 1) as f32;
    for line in 0..lines {
        // Running sum over a window clamped at both ends
        let mut sum = Rgb::BLACK;
        for k in 0..=radius * 2 {
            let k = k.saturating_sub(radius).min(span - 1);
            sum += source[index(line, k)];
        }
        for k in 0..span {
            out[index(line, k)] = sum * (1.0 / window);
            let leaving = k.saturating_sub(radius);
            let entering = (k + radius + 1).min(span - 1);
            sum += source[index(line, entering)];
            sum += source[index(line, leaving)] * -1.0;
        }
    }
    out
}

/// Shifts red by `+offset` and blue by `-offset` (fractions of the canvas size)
pub fn chromatic_aberration(canvas: &mut Canvas, offset: [f32; 2]) {
    let (width, height) = (canvas.width(), canvas.height());
    let dx = (offset[0] * width as f32).round() as isize;
    let dy = (offset[1] * height as f32).round() as isize;
    if dx == 0 && dy == 0 {
        return;
    }
    let source = canvas.pixels().to_vec();
    let sample = |x: isize, y: isize| {
        let x = x.clamp(0, width as isize - 1) as usize;
        let y = y.clamp(0, height as isize - 1) as usize;
        source[y * width + x]
    };
    for y in 0..height as isize {
        for x in 0..width as isize {
            let pixel = &mut canvas.pixels_mut()[y as usize * width + x as usize];
            pixel.r = sample(x - dx, y - dy).r;
            pixel.b = sample(x + dx, y + dy).b;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bloom_spreads_bright_pixels() {
        let mut canvas = Canvas::new(48, 48);
        canvas.pixels_mut()[24 * 48 + 24] = Rgb::WHITE;
        bloom(&mut canvas, 1.0, 0.1, 0.1);
        assert!(canvas.pixel(25, 24).r > 0.0);
        assert!(canvas.pixel(24, 24).r > 1.0);
        assert_eq!(canvas.pixel(0, 0), Rgb::BLACK);
    }

    #[test]
    fn test_bloom_ignores_dim_pixels() {
        let mut canvas = Canvas::new(24, 24);
        canvas.clear(Rgb::new(0.05, 0.05, 0.05));
        bloom(&mut canvas, 1.0, 0.2, 0.1);
        assert!(canvas.pixels().iter().all(|p| (p.r - 0.05).abs() < 1e-6));
    }

    #[test]
    fn test_blur_preserves_flat_field() {
        let source = vec![Rgb::WHITE; 30];
        let out = box_blur(&source, 6, 5, 2, true);
        assert!(out.iter().all(|p| (p.g - 1.0).abs() < 1e-5));
        let out = box_blur(&source, 6, 5, 2, false);
        assert!(out.iter().all(|p| (p.g - 1.0).abs() < 1e-5));
    }

    #[test]
    fn test_chromatic_aberration_splits_channels() {
        let mut canvas = Canvas::new(10, 1);
        canvas.pixels_mut()[5] = Rgb::WHITE;
        chromatic_aberration(&mut canvas, [0.1, 0.0]);
        assert_eq!(canvas.pixel(6, 0).r, 1.0);
        assert_eq!(canvas.pixel(4, 0).b, 1.0);
        assert_eq!(canvas.pixel(5, 0).g, 1.0);
        assert_eq!(canvas.pixel(5, 0).r, 0.0);
    }

    #[test]
    fn test_subpixel_offset_is_noop() {
        let mut canvas = Canvas::new(10, 10);
        canvas.pixels_mut()[55] = Rgb::WHITE;
        chromatic_aberration(&mut canvas, [0.0005, 0.0005]);
        assert_eq!(canvas.pixel(5, 5), Rgb::WHITE);
    }
}
