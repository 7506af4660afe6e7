use std::path::Path;
use std::time::Duration;

/// Interval of the periodic position callback.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Settings shared by the controller and the desktop window.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerConfig {
    /// How often the session reports its position while loaded.
    pub tick_interval: Duration,
    /// Lowercase file extensions accepted by `open`.
    pub allowed_extensions: Vec<String>,
    pub window_title: String,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            allowed_extensions: vec!["mov".to_owned(), "mp4".to_owned()],
            window_title: "Movie Player".to_owned(),
            window_size: [1280.0, 720.0],
            min_window_size: [640.0, 480.0],
        }
    }
}

impl PlayerConfig {
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Check a path's extension against the allow-list, ignoring case.
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.allowed_extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}
