use crate::integrator::{trace, trace_preview};
use crate::math::Vec3;
use crate::scene::Scene;
use crate::stats::{RenderStats, ThreadStats};
use crossterm::style::{self, Stylize};
use std::cell::UnsafeCell;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

/// Tiles are fixed at 64×64 pixels; one OS thread renders exactly one tile,
/// for the lifetime of that tile only — no thread pool, no work-stealing
/// queue, matching the "one pthread per chunk, join them all" model this
/// crate generalizes rather than a `threadpool`/`rayon` worker-reuse model.
pub const TILE_SIZE: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    /// Unicode braille patterns (2x4 dots per cell) with ANSI true-color.
    Braille,
    /// ANSI 24-bit true-color using full-block characters.
    TrueColor,
    /// Half-block rendering with separate fg/bg colors — 2 vertical pixels per cell.
    HalfBlock,
    /// ASCII grayscale density ramp.
    Ascii,
}

/// The CLI-facing render configuration: everything that isn't already part
/// of the scene itself (width/height/max_depth/supersamples live on
/// [`Scene`], since a scene preset bakes those in along with its camera).
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    pub output_mode: OutputMode,
    pub preview: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_mode: OutputMode::HalfBlock,
            preview: false,
        }
    }
}

/// A minimal xorshift32 PRNG, seeded per-tile so a render is fully
/// deterministic given the same scene and tile layout regardless of thread
/// scheduling — each tile's samples depend only on its own (x, y) tile
/// coordinate, never on which thread happened to run it or in what order.
struct Xorshift32(u32);

impl Xorshift32 {
    fn seeded(tile_x: u32, tile_y: u32) -> Self {
        let s = tile_x
            .wrapping_mul(7919)
            .wrapping_add(tile_y.wrapping_mul(104729))
            .wrapping_add(1);
        Self(if s == 0 { 1 } else { s })
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }

    /// Sub-pixel jitter offset in `[0, 1)`: the low 16 bits of the generator
    /// scaled by `1/65536`, matching the original's `xorshift() & 0xFFFF`.
    fn next_f64(&mut self) -> f64 {
        (self.next_u32() & 0xFFFF) as f64 / 65536.0
    }
}

/// Extracts a linear `[0,1]` colour's per-channel 8-bit values, truncating
/// (not rounding) each channel — the same truncating conversion the
/// original renderer used when writing pixels.
fn extract_channels(c: Vec3) -> (u32, u32, u32) {
    let c = c.saturate();
    let r = (c.x * 255.999) as u32;
    let g = (c.y * 255.999) as u32;
    let b = (c.z * 255.999) as u32;
    (r, g, b)
}

fn pack_colour(c: Vec3) -> u32 {
    let (r, g, b) = extract_channels(c);
    (r << 16) | (g << 8) | b
}

/// Packs the per-channel sum of `samples` already-truncated 8-bit channel
/// values: divides each channel sum by the sample count and truncates again,
/// per the supersampling accumulation rule — each sample is extracted to an
/// 8-bit channel *before* summing, so a sample that clips to 255 and one
/// that clips to 0 average to `127`, not to whatever the pre-clip floats
/// would have averaged to.
fn pack_channel_sums(r_sum: u32, g_sum: u32, b_sum: u32, samples: u32) -> u32 {
    let r = r_sum / samples;
    let g = g_sum / samples;
    let b = b_sum / samples;
    (r << 16) | (g << 8) | b
}

fn unpack_colour(packed: u32) -> (u8, u8, u8) {
    (((packed >> 16) & 0xFF) as u8, ((packed >> 8) & 0xFF) as u8, (packed & 0xFF) as u8)
}

/// A row-major `0x00RRGGBB`-packed pixel buffer. Writes go through raw
/// indexing inside an `UnsafeCell` rather than a `Mutex` — tile workers
/// partition the image into disjoint rectangles, so no two threads ever
/// address the same index, and a lock would only add uncontended overhead
/// to every single pixel write.
pub struct FrameBuffer {
    pub width: u32,
    pub height: u32,
    pixels: UnsafeCell<Vec<u32>>,
}

unsafe impl Sync for FrameBuffer {}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: UnsafeCell::new(vec![0u32; (width * height) as usize]),
        }
    }

    /// Writes one pixel. Safety: callers across threads must never target
    /// the same `(x, y)` concurrently — true for disjoint tile ranges, the
    /// only caller of this method.
    #[inline]
    unsafe fn set_raw(&self, x: u32, y: u32, value: u32) {
        let idx = (y * self.width + x) as usize;
        (*self.pixels.get())[idx] = value;
    }

    pub fn get(&self, x: u32, y: u32) -> u32 {
        let idx = (y * self.width + x) as usize;
        unsafe { (*self.pixels.get())[idx] }
    }

    /// Dims every pixel to half brightness: `(pixel >> 1) & 0x00_7F_7F_7F`.
    /// A plain 32-bit right shift bleeds one bit from each byte's LSB into
    /// the next byte's MSB; masking each channel to its low 7 bits after
    /// the shift discards exactly that contamination, leaving the same
    /// result an independent per-channel shift would produce. Called once
    /// before a render begins, matching the unconditional dim-pass of the
    /// renderer this crate's pixel pipeline is modeled on.
    pub fn fade(&mut self) {
        for pixel in self.pixels.get_mut().iter_mut() {
            *pixel = (*pixel >> 1) & 0x00_7F_7F_7F;
        }
    }

    /// Writes the buffer out as a binary PPM (P6) image.
    pub fn write_ppm(&self, path: &str) -> io::Result<()> {
        let mut file = io::BufWriter::new(std::fs::File::create(path)?);
        write!(file, "P6\n{} {}\n255\n", self.width, self.height)?;
        let pixels = unsafe { &*self.pixels.get() };
        for &pixel in pixels {
            let (r, g, b) = unpack_colour(pixel);
            file.write_all(&[r, g, b])?;
        }
        file.flush()?;
        Ok(())
    }
}

/// Renders one 64×64-or-smaller tile: casts (possibly jittered/supersampled)
/// primary rays for every pixel in its range, traces each through the
/// scene, and writes the packed result straight into the shared
/// framebuffer. Returns the tile's own ray/intersection counters so the
/// caller can fold them into the shared [`RenderStats`] once, at join.
#[allow(clippy::too_many_arguments)]
fn render_tile(
    scene: &Scene,
    fb: &FrameBuffer,
    config: &RenderConfig,
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
    progress: &AtomicU64,
) -> ThreadStats {
    let mut rng = Xorshift32::seeded(x0 / TILE_SIZE, y0 / TILE_SIZE);
    let mut stats = ThreadStats::default();

    for y in y0..y1 {
        for x in x0..x1 {
            let packed = if config.preview {
                let ray = scene.camera.get_ray(x, y, 0.5, 0.5);
                pack_colour(trace_preview(scene, &ray, &mut stats))
            } else {
                let samples = scene.supersamples.max(1);
                let mut r_sum = 0u32;
                let mut g_sum = 0u32;
                let mut b_sum = 0u32;
                for _ in 0..samples {
                    let jx = rng.next_f64();
                    let jy = rng.next_f64();
                    let ray = scene.camera.get_ray(x, y, jx, jy);
                    let (r, g, b) = extract_channels(trace(scene, &ray, 0, true, &mut stats));
                    r_sum += r;
                    g_sum += g;
                    b_sum += b;
                }
                pack_channel_sums(r_sum, g_sum, b_sum, samples)
            };

            unsafe {
                fb.set_raw(x, y, packed);
            }
            progress.fetch_add(1, Ordering::Relaxed);
        }
    }

    stats
}

/// Renders the whole scene: one OS thread per 64×64 tile, scoped so each
/// can borrow `scene` and `fb` by reference for the duration of the frame
/// with no `Arc`. A simple percentage progress line is printed to stderr as
/// tiles complete.
pub fn render(scene: &Scene, config: &RenderConfig) -> (FrameBuffer, RenderStats, f64) {
    let mut fb = FrameBuffer::new(scene.width, scene.height);
    fb.fade();

    let totals = RenderStats::default();
    let progress = AtomicU64::new(0);
    let total_pixels = (scene.width as u64) * (scene.height as u64);
    let start = std::time::Instant::now();

    std::thread::scope(|scope| {
        scope.spawn(|| report_progress(&progress, total_pixels));

        let mut y0 = 0;
        while y0 < scene.height {
            let y1 = (y0 + TILE_SIZE).min(scene.height);
            let mut x0 = 0;
            while x0 < scene.width {
                let x1 = (x0 + TILE_SIZE).min(scene.width);
                let fb_ref = &fb;
                let progress_ref = &progress;
                let totals_ref = &totals;
                scope.spawn(move || {
                    let local = render_tile(scene, fb_ref, config, x0, y0, x1, y1, progress_ref);
                    totals_ref.merge(&local);
                });
                x0 = x1;
            }
            y0 = y1;
        }
    });

    let elapsed = start.elapsed().as_secs_f64();
    (fb, totals, elapsed)
}

/// Polls the shared pixel counter and redraws a progress bar on stderr
/// until every pixel has been written. Runs as its own scoped thread
/// alongside the tile workers rather than each worker printing on its own,
/// which would interleave garbled output across threads.
fn report_progress(progress: &AtomicU64, total: u64) {
    let start = std::time::Instant::now();
    let bar_width = 24usize;
    let mut last_pct = u64::MAX;
    loop {
        let done = progress.load(Ordering::Relaxed);
        let pct = if total == 0 { 100 } else { done * 100 / total };
        if pct != last_pct {
            let filled = (pct as usize * bar_width) / 100;
            let bar = format!("{}{}", "█".repeat(filled), "░".repeat(bar_width - filled));
            eprint!("\r  Rendering: │{bar}│ {pct:3}%  {:.1}s   ", start.elapsed().as_secs_f64());
            last_pct = pct;
        }
        if done >= total {
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(50));
    }
    eprintln!();
}

pub fn display_framebuffer(fb: &FrameBuffer, mode: OutputMode) {
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    match mode {
        OutputMode::TrueColor => display_truecolor(&mut out, fb),
        OutputMode::HalfBlock => display_halfblock(&mut out, fb),
        OutputMode::Ascii => display_ascii(&mut out, fb),
        OutputMode::Braille => display_braille(&mut out, fb),
    }
    let _ = out.flush();
}

fn display_truecolor(out: &mut impl Write, fb: &FrameBuffer) {
    for y in 0..fb.height {
        for x in 0..fb.width {
            let (r, g, b) = unpack_colour(fb.get(x, y));
            let _ = write!(out, "{}", "█".with(style::Color::Rgb { r, g, b }));
        }
        let _ = writeln!(out);
    }
}

fn display_halfblock(out: &mut impl Write, fb: &FrameBuffer) {
    let rows = fb.height / 2;
    for row in 0..rows {
        for x in 0..fb.width {
            let (tr, tg, tb) = unpack_colour(fb.get(x, row * 2));
            let (br, bg, bb) = unpack_colour(fb.get(x, row * 2 + 1));
            let _ = write!(
                out,
                "{}",
                "▀"
                    .with(style::Color::Rgb { r: tr, g: tg, b: tb })
                    .on(style::Color::Rgb { r: br, g: bg, b: bb })
            );
        }
        let _ = writeln!(out);
    }
}

fn luminance(r: u8, g: u8, b: u8) -> f64 {
    (0.2126 * r as f64 + 0.7152 * g as f64 + 0.0722 * b as f64) / 255.0
}

fn display_ascii(out: &mut impl Write, fb: &FrameBuffer) {
    const RAMP: &[u8] = b" .:-=+*#%@";
    for y in 0..fb.height {
        for x in 0..fb.width {
            let (r, g, b) = unpack_colour(fb.get(x, y));
            let idx = (luminance(r, g, b).clamp(0.0, 0.999) * RAMP.len() as f64) as usize;
            let _ = write!(out, "{}", RAMP[idx] as char);
        }
        let _ = writeln!(out);
    }
}

/// Braille pattern rendering — each Unicode braille char (U+2800..U+28FF)
/// encodes a 2x4 dot matrix, achieving 2x horizontal and 4x vertical
/// subpixel resolution.
fn display_braille(out: &mut impl Write, fb: &FrameBuffer) {
    let cell_w = 2u32;
    let cell_h = 4u32;
    let cols = fb.width / cell_w;
    let rows = fb.height / cell_h;

    const OFFSETS: [(u32, u32, u8); 8] = [
        (0, 0, 0),
        (0, 1, 1),
        (0, 2, 2),
        (1, 0, 3),
        (1, 1, 4),
        (1, 2, 5),
        (0, 3, 6),
        (1, 3, 7),
    ];

    for row in 0..rows {
        for col in 0..cols {
            let bx = col * cell_w;
            let by = row * cell_h;

            let mut pattern: u8 = 0;
            let mut avg = (0u32, 0u32, 0u32);
            let mut lit = 0u32;

            for &(dx, dy, bit) in &OFFSETS {
                let px = bx + dx;
                let py = by + dy;
                if px < fb.width && py < fb.height {
                    let (r, g, b) = unpack_colour(fb.get(px, py));
                    if luminance(r, g, b) > 0.15 {
                        pattern |= 1 << bit;
                        avg.0 += r as u32;
                        avg.1 += g as u32;
                        avg.2 += b as u32;
                        lit += 1;
                    }
                }
            }

            let (r, g, b) = if lit > 0 {
                ((avg.0 / lit) as u8, (avg.1 / lit) as u8, (avg.2 / lit) as u8)
            } else {
                (0, 0, 0)
            };

            let braille_char = char::from_u32(0x2800 + pattern as u32).unwrap_or(' ');
            let _ = write!(out, "{}", braille_char.to_string().with(style::Color::Rgb { r, g, b }));
        }
        let _ = writeln!(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::math::Point3;
    use crate::primitive::Primitive;

    fn tiny_scene() -> Scene {
        let camera = Camera::new(Point3::new(0.0, 0.0, -5.0), Point3::zero(), Vec3::unit_y(), 16, 16);
        let mut scene = Scene::new(camera, 16, 16, 2, 1);
        scene.primitives.push(Primitive::sphere(Point3::zero(), 1.0, 0));
        scene
    }

    #[test]
    fn pack_unpack_roundtrips_within_one_ulp() {
        let packed = pack_colour(Vec3::new(0.2, 0.6, 1.0));
        let (r, g, b) = unpack_colour(packed);
        assert_eq!(r, (0.2 * 255.999) as u8);
        assert_eq!(g, (0.6 * 255.999) as u8);
        assert_eq!(b, 255);
    }

    #[test]
    fn channel_sums_clip_before_averaging_not_after() {
        // Two samples, one clipping to 255 and one to 0, average to 127 via
        // integer channel-sum division — not ~191, which is what averaging
        // the pre-clip floating colours (1.6 and 0.0) and packing once would
        // give (`((1.6 + 0.0) / 2) * 255.999 = 204`, truncated differently
        // again from a naive float-then-pack path). The point is simply that
        // the two strategies disagree whenever a sample clips.
        let (r0, g0, b0) = extract_channels(Vec3::new(1.6, 1.6, 1.6));
        let (r1, g1, b1) = extract_channels(Vec3::new(0.0, 0.0, 0.0));
        let packed = pack_channel_sums(r0 + r1, g0 + g1, b0 + b1, 2);
        let (r, g, b) = unpack_colour(packed);
        assert_eq!((r, g, b), (127, 127, 127));
    }

    #[test]
    fn fade_halves_every_channel_independently() {
        let mut fb = FrameBuffer::new(1, 1);
        unsafe {
            fb.set_raw(0, 0, 0x00_80_40_20);
        }
        fb.fade();
        let (r, g, b) = unpack_colour(fb.get(0, 0));
        assert_eq!(r, 0x40);
        assert_eq!(g, 0x20);
        assert_eq!(b, 0x10);
    }

    #[test]
    fn xorshift32_seeded_by_tile_is_deterministic() {
        let mut a = Xorshift32::seeded(3, 7);
        let mut b = Xorshift32::seeded(3, 7);
        for _ in 0..5 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn different_tiles_get_different_seeds() {
        let mut a = Xorshift32::seeded(1, 0);
        let mut b = Xorshift32::seeded(0, 1);
        assert_ne!(a.next_u32(), b.next_u32());
    }

    #[test]
    fn render_fills_every_pixel() {
        let scene = tiny_scene();
        let config = RenderConfig::default();
        let (fb, stats, _elapsed) = render(&scene, &config);
        assert_eq!(fb.width, 16);
        assert_eq!(fb.height, 16);
        assert!(stats.primary_rays.load(Ordering::Relaxed) >= (16 * 16) as u64);
    }
}
