use std::sync::atomic::{AtomicU64, Ordering};

/// Per-thread ray/intersection counters, accumulated locally by one tile
/// worker with no synchronization, then folded into a shared [`RenderStats`]
/// exactly once when the tile finishes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadStats {
    pub primary_rays: u64,
    pub shadow_rays: u64,
    pub reflection_rays: u64,
    pub refraction_rays: u64,
    pub intersection_tests: u64,
}

/// Render-wide statistics, shared across tile worker threads via atomics.
/// Each worker merges its own [`ThreadStats`] in with one `fetch_add` per
/// counter at the end of its tile, rather than contending on every ray —
/// the same one-atomic-add-per-counter-at-join discipline the tile
/// scheduler itself uses for pixel writes.
#[derive(Default)]
pub struct RenderStats {
    pub primary_rays: AtomicU64,
    pub shadow_rays: AtomicU64,
    pub reflection_rays: AtomicU64,
    pub refraction_rays: AtomicU64,
    pub intersection_tests: AtomicU64,
}

impl RenderStats {
    pub fn merge(&self, local: &ThreadStats) {
        self.primary_rays.fetch_add(local.primary_rays, Ordering::Relaxed);
        self.shadow_rays.fetch_add(local.shadow_rays, Ordering::Relaxed);
        self.reflection_rays.fetch_add(local.reflection_rays, Ordering::Relaxed);
        self.refraction_rays.fetch_add(local.refraction_rays, Ordering::Relaxed);
        self.intersection_tests.fetch_add(local.intersection_tests, Ordering::Relaxed);
    }

    pub fn total_rays(&self) -> u64 {
        self.primary_rays.load(Ordering::Relaxed)
            + self.shadow_rays.load(Ordering::Relaxed)
            + self.reflection_rays.load(Ordering::Relaxed)
            + self.refraction_rays.load(Ordering::Relaxed)
    }

    pub fn print_summary(&self, elapsed_secs: f64, width: u32, height: u32, supersamples: u32) {
        let total = self.total_rays();
        let bar = "━".repeat(30);
        eprintln!("  {bar}");
        eprintln!("  Time:          {elapsed_secs:.2}s");
        eprintln!("  Primary:       {}", self.primary_rays.load(Ordering::Relaxed));
        eprintln!("  Shadow:        {}", self.shadow_rays.load(Ordering::Relaxed));
        eprintln!("  Reflection:    {}", self.reflection_rays.load(Ordering::Relaxed));
        eprintln!("  Refraction:    {}", self.refraction_rays.load(Ordering::Relaxed));
        eprintln!("  Intersections: {}", self.intersection_tests.load(Ordering::Relaxed));
        eprintln!("  Speed:         {:.2} Mrays/s", total as f64 / elapsed_secs / 1e6);
        eprintln!("  Image:         {width}×{height} @ {supersamples}×ss");
        eprintln!("  {bar}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_accumulates_across_multiple_tiles() {
        let totals = RenderStats::default();
        let tile_a = ThreadStats {
            primary_rays: 10,
            ..Default::default()
        };
        let tile_b = ThreadStats {
            primary_rays: 5,
            shadow_rays: 2,
            ..Default::default()
        };
        totals.merge(&tile_a);
        totals.merge(&tile_b);
        assert_eq!(totals.primary_rays.load(Ordering::Relaxed), 15);
        assert_eq!(totals.shadow_rays.load(Ordering::Relaxed), 2);
        assert_eq!(totals.total_rays(), 17);
    }
}
