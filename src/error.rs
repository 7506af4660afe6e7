use std::path::PathBuf;

/// Errors surfaced by the playback controller and its backends.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The file extension is not in the allow-list.
    #[error("unsupported file type: {}", .0.display())]
    UnsupportedExtension(PathBuf),

    /// The asset reports itself as not playable. Load is aborted.
    #[error("asset is not playable: {}", .0.display())]
    NotPlayable(PathBuf),

    /// The backend could not build a session at all.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Whether the controller kept its current session when returning this error.
    pub fn keeps_session(&self) -> bool {
        matches!(self, Error::UnsupportedExtension(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_rejected_extensions_keep_the_session() {
        assert!(Error::UnsupportedExtension(PathBuf::from("clip.mkv")).keeps_session());
        assert!(!Error::NotPlayable(PathBuf::from("clip.mp4")).keeps_session());
        assert!(!Error::Backend(anyhow::anyhow!("no playbin")).keeps_session());
    }
}
