use std::time::Duration;

/// Tuneables for the whole app, gathered in one place instead of scattered
/// magic numbers.
#[derive(Debug, Clone)]
pub struct GalleryConfig {
    /// Query loaded automatically right after the window shows.
    pub default_query: String,
    /// `limit` parameter sent to the search endpoint.
    pub search_limit: u32,
    /// `media` parameter sent to the search endpoint.
    pub media_filter: String,
    /// Number of artwork tiles rendered in the grid. A query must yield at
    /// least one more distinct image than this so rotation has something to
    /// swap in.
    pub visible_slots: usize,
    /// Interval between random visible/hidden swaps while playback is on.
    pub rotation_period: Duration,
    /// Edge length of one artwork tile, in points.
    pub tile_size: f32,
    pub grid_columns: usize,
    pub http_timeout: Duration,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            default_query: "pop".to_string(),
            search_limit: 150,
            media_filter: "music".to_string(),
            visible_slots: 20,
            rotation_period: Duration::from_secs(2),
            tile_size: 100.0,
            grid_columns: 5,
            http_timeout: Duration::from_secs(30),
        }
    }
}
