/// 8-bit RGBA color. Alpha only matters when drawing onto a `FrameBuffer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Multiplies each channel by `factor`, saturating at 0 and 255.
    pub fn scaled(self, factor: f32) -> Self {
        let ch = |c: u8| (c as f32 * factor).clamp(0.0, 255.0) as u8;
        Self {
            r: ch(self.r),
            g: ch(self.g),
            b: ch(self.b),
            a: self.a,
        }
    }

    /// 0RGB, the layout softbuffer presents.
    #[inline]
    pub fn pack(self) -> u32 {
        (self.b as u32) | ((self.g as u32) << 8) | ((self.r as u32) << 16)
    }

    #[inline]
    fn unpack(px: u32) -> Self {
        Self::rgb((px >> 16) as u8, (px >> 8) as u8, px as u8)
    }

    // Source-over blend onto an opaque pixel.
    #[inline]
    fn over(self, dst: u32) -> u32 {
        match self.a {
            255 => self.pack(),
            0 => dst,
            a => {
                let d = Self::unpack(dst);
                let a = a as u32;
                let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a)) / 255) as u8;
                Self::rgb(mix(self.r, d.r), mix(self.g, d.g), mix(self.b, d.b)).pack()
            }
        }
    }
}

/// The primitives a renderer may use. Coordinates are pixels relative to the
/// sink's own origin; anything outside the sink is clipped.
pub trait DrawSink {
    fn size(&self) -> (usize, usize);
    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color);
    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    fn circle(&mut self, x: f32, y: f32, r: f32, color: Color);
    fn clear(&mut self);
}

/// CPU pixel buffer in softbuffer's 0RGB layout.
pub struct FrameBuffer {
    pixels: Vec<u32>,
    width: usize,
    height: usize,
    background: Color,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize, background: Color) -> Self {
        Self {
            pixels: vec![background.pack(); width * height],
            width,
            height,
            background,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// A sink over the sub-rectangle at `(x, y)`, clipped to the buffer.
    pub fn region(&mut self, x: usize, y: usize, width: usize, height: usize) -> Region<'_> {
        let x = x.min(self.width);
        let y = y.min(self.height);
        let width = width.min(self.width - x);
        let height = height.min(self.height - y);
        Region {
            fb: self,
            x,
            y,
            width,
            height,
        }
    }

    pub fn full(&mut self) -> Region<'_> {
        let (w, h) = (self.width, self.height);
        self.region(0, 0, w, h)
    }
}

/// A clipped window into a `FrameBuffer`.
pub struct Region<'a> {
    fb: &'a mut FrameBuffer,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

impl Region<'_> {
    #[inline]
    fn plot(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = (self.y + y as usize) * self.fb.width + self.x + x as usize;
        self.fb.pixels[idx] = color.over(self.fb.pixels[idx]);
    }

    // Pixel span [lo, hi) along one axis after rounding and clipping.
    #[inline]
    fn span(start: f32, len: f32, limit: usize) -> (usize, usize) {
        let (a, b) = if len < 0.0 {
            (start + len, start)
        } else {
            (start, start + len)
        };
        let lo = a.round().clamp(0.0, limit as f32) as usize;
        let hi = b.round().clamp(0.0, limit as f32) as usize;
        (lo, hi)
    }
}

impl DrawSink for Region<'_> {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color) {
        if ![x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
            return;
        }
        let dx = x2 - x1;
        let dy = y2 - y1;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0);
        // Never walk further than the region diagonal allows.
        let limit = (self.width + self.height) as f32 * 2.0;
        let steps = steps.min(limit) as i64;
        let (sx, sy) = (dx / steps as f32, dy / steps as f32);
        for i in 0..=steps {
            let x = x1 + sx * i as f32;
            let y = y1 + sy * i as f32;
            self.plot(x.floor() as i64, y.floor() as i64, color);
        }
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        if ![x, y, w, h].iter().all(|v| v.is_finite()) {
            return;
        }
        let (x0, x1) = Self::span(x, w, self.width);
        let (y0, y1) = Self::span(y, h, self.height);
        for py in y0..y1 {
            for px in x0..x1 {
                self.plot(px as i64, py as i64, color);
            }
        }
    }

    fn circle(&mut self, x: f32, y: f32, r: f32, color: Color) {
        if !(x.is_finite() && y.is_finite() && r.is_finite()) || r <= 0.0 {
            return;
        }
        let (x0, x1) = Self::span(x - r, 2.0 * r, self.width);
        let (y0, y1) = Self::span(y - r, 2.0 * r, self.height);
        for py in y0..y1 {
            for px in x0..x1 {
                let cx = px as f32 + 0.5 - x;
                let cy = py as f32 + 0.5 - y;
                if cx * cx + cy * cy <= r * r {
                    self.plot(px as i64, py as i64, color);
                }
            }
        }
    }

    fn clear(&mut self) {
        let bg = self.fb.background.pack();
        for row in self.y..self.y + self.height {
            let start = row * self.fb.width + self.x;
            self.fb.pixels[start..start + self.width].fill(bg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255, 0, 0);

    #[test]
    fn region_offsets_and_clips() {
        let mut fb = FrameBuffer::new(8, 4, Color::BLACK);
        {
            let mut right = fb.region(4, 0, 4, 4);
            assert_eq!(right.size(), (4, 4));
            right.rect(-2.0, 1.0, 10.0, 1.0, RED);
        }
        assert_eq!(fb.pixel(3, 1), Some(0));
        assert_eq!(fb.pixel(4, 1), Some(RED.pack()));
        assert_eq!(fb.pixel(7, 1), Some(RED.pack()));
        assert_eq!(fb.pixel(4, 0), Some(0));
    }

    #[test]
    fn clear_only_touches_its_region() {
        let mut fb = FrameBuffer::new(4, 2, Color::WHITE);
        fb.full().rect(0.0, 0.0, 4.0, 2.0, RED);
        fb.region(0, 0, 2, 2).clear();
        assert_eq!(fb.pixel(1, 1), Some(Color::WHITE.pack()));
        assert_eq!(fb.pixel(2, 1), Some(RED.pack()));
    }

    #[test]
    fn line_covers_endpoints() {
        let mut fb = FrameBuffer::new(10, 10, Color::BLACK);
        fb.full().line(1.0, 1.0, 8.0, 8.0, RED);
        assert_eq!(fb.pixel(1, 1), Some(RED.pack()));
        assert_eq!(fb.pixel(8, 8), Some(RED.pack()));
        assert_eq!(fb.pixel(8, 1), Some(0));
    }

    #[test]
    fn translucent_color_blends() {
        let mut fb = FrameBuffer::new(1, 1, Color::BLACK);
        fb.full().rect(0.0, 0.0, 1.0, 1.0, Color::rgba(255, 255, 0, 51));
        assert_eq!(fb.pixel(0, 0), Some(Color::rgb(51, 51, 0).pack()));
    }

    #[test]
    fn circle_stays_inside_radius() {
        let mut fb = FrameBuffer::new(9, 9, Color::BLACK);
        fb.full().circle(4.5, 4.5, 2.0, RED);
        assert_eq!(fb.pixel(4, 4), Some(RED.pack()));
        assert_eq!(fb.pixel(0, 0), Some(0));
        assert_eq!(fb.pixel(4, 8), Some(0));
    }

    #[test]
    fn scaled_saturates() {
        assert_eq!(
            Color::rgb(200, 100, 10).scaled(2.0),
            Color::rgb(255, 200, 20)
        );
    }
}
