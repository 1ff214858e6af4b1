//! Channel-mean colors and per-pixel blend arithmetic on straight-alpha RGBA8

use image::Rgba;

/// Mean red, green and blue of a pixel region
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    /// Mean red channel (0-255 scale)
    pub r: f64,
    /// Mean green channel (0-255 scale)
    pub g: f64,
    /// Mean blue channel (0-255 scale)
    pub b: f64,
}

impl Color {
    /// Create a color from channel means
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Color of a single pixel, alpha ignored
    pub fn from_pixel(pixel: Rgba<u8>) -> Self {
        let [r, g, b, _] = pixel.0;
        Self::new(f64::from(r), f64::from(g), f64::from(b))
    }

    /// Sum of absolute per-channel differences
    pub fn l1_distance(&self, other: &Self) -> f64 {
        (self.r - other.r).abs() + (self.g - other.g).abs() + (self.b - other.b).abs()
    }
}

/// Color channel isolated by a chromatic-shift draw
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    /// Keep only red
    Red,
    /// Keep only green
    Green,
    /// Keep only blue
    Blue,
}

impl Channel {
    /// Channels in the order the glitch pass draws them
    pub const ALL: [Self; 3] = [Self::Red, Self::Green, Self::Blue];

    /// Zero every color channel except this one
    pub const fn isolate(self, pixel: Rgba<u8>) -> Rgba<u8> {
        let [r, g, b, a] = pixel.0;
        match self {
            Self::Red => Rgba([r, 0, 0, a]),
            Self::Green => Rgba([0, g, 0, a]),
            Self::Blue => Rgba([0, 0, b, a]),
        }
    }
}

/// Weight `a` by `1 - t` and `b` by `t`, every channel including alpha
pub fn crossfade(a: Rgba<u8>, b: Rgba<u8>, t: f64) -> Rgba<u8> {
    let t = t.clamp(0.0, 1.0);
    let mut out = [0u8; 4];
    for ((o, &ca), &cb) in out.iter_mut().zip(a.0.iter()).zip(b.0.iter()) {
        let mixed = f64::from(ca).mul_add(1.0 - t, f64::from(cb) * t);
        *o = mixed.round().clamp(0.0, 255.0) as u8;
    }
    Rgba(out)
}

/// Source-over composite of `src` at `opacity` onto `dst`
pub fn over(dst: Rgba<u8>, src: Rgba<u8>, opacity: f64) -> Rgba<u8> {
    let opacity = opacity.clamp(0.0, 1.0);
    let sa = f64::from(src.0[3]) / 255.0 * opacity;
    if sa <= 0.0 {
        return dst;
    }

    let da = f64::from(dst.0[3]) / 255.0;
    let out_a = da.mul_add(1.0 - sa, sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let mut out = [0u8; 4];
    for ((o, &sc), &dc) in out.iter_mut().zip(src.0.iter()).zip(dst.0.iter()).take(3) {
        let premul = f64::from(sc).mul_add(sa, f64::from(dc) * da * (1.0 - sa));
        *o = (premul / out_a).round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba(out)
}
