//! Tunables for the boolean engine's randomized global classifier.

/// Configuration passed to [`crate::boolean`].
#[derive(Debug, Clone, Copy)]
pub struct BooleanConfig {
    /// Number of random ray-cast attempts the global classifier makes per
    /// unclassified connected component before giving up and leaving it
    /// `Unknown`. Default of 100 matches the reference `kigumi` C++
    /// library this retry loop is modeled on.
    pub max_ray_retries: u32,
    /// Seed for the global classifier's random draws. `None` seeds from
    /// entropy; a fixed seed makes the draws (and therefore the retry
    /// count, never the result) reproducible for testing.
    pub rng_seed: Option<u64>,
}

impl Default for BooleanConfig {
    fn default() -> Self {
        Self {
            max_ray_retries: 100,
            rng_seed: None,
        }
    }
}
