use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error type for loading surface descriptions.
#[derive(Debug)]
pub enum SurfaceError {
    /// File I/O error
    Io { path: PathBuf, source: io::Error },
    /// JSON parse error
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Structurally invalid description (bad extension, zero size, ...)
    InvalidSurface(String),
    /// A layer references a tile id beyond its tileset
    InvalidTileGid { layer: String, gid: u32, max_gid: u32 },
    /// A layer names a tileset that was never declared
    UnknownTileset { layer: String, name: String },
    /// A view lock that is unknown or would form a chain
    InvalidViewLock { layer: String, master: String },
    /// A layer's data length does not match the surface size
    LayerSizeMismatch {
        layer: String,
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::Io { path, source } => {
                write!(f, "I/O error reading {}: {}", path.display(), source)
            }
            SurfaceError::Json { path, source } => {
                write!(f, "JSON parse error in {}: {}", path.display(), source)
            }
            SurfaceError::InvalidSurface(msg) => write!(f, "Invalid surface: {}", msg),
            SurfaceError::InvalidTileGid {
                layer,
                gid,
                max_gid,
            } => write!(
                f,
                "Layer '{}' references tile gid {} but its tileset ends at {}",
                layer, gid, max_gid
            ),
            SurfaceError::UnknownTileset { layer, name } => {
                write!(f, "Layer '{}' uses unknown tileset '{}'", layer, name)
            }
            SurfaceError::InvalidViewLock { layer, master } => {
                write!(f, "Layer '{}' cannot lock its view to '{}'", layer, master)
            }
            SurfaceError::LayerSizeMismatch {
                layer,
                expected,
                actual,
            } => write!(
                f,
                "Invalid layer size for layer '{}': expected {} tiles, found {}",
                layer, expected, actual
            ),
        }
    }
}

impl std::error::Error for SurfaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SurfaceError::Io { source, .. } => Some(source),
            SurfaceError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}
