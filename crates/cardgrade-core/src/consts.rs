/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Lower bound on rectified output width, in pixels.
pub const MIN_TARGET_WIDTH: u32 = 1000;

/// Upper bound on rectified output width. Keeps huge photos from exhausting memory.
pub const MAX_TARGET_WIDTH: u32 = 4096;

/// Determinant magnitude below which a 3x3 matrix is treated as singular.
pub const SINGULAR_DET_EPSILON: f64 = 1e-6;

/// Relative tolerance for the collinearity test on correspondence points.
pub const COLLINEAR_EPSILON: f64 = 1e-9;

/// Measured quad edge (in source pixels) below which the region is degenerate.
pub const MIN_EDGE_PX: f64 = 1.0;

/// Longest-to-shortest edge ratio of the measured quad beyond which it is
/// rejected as a sliver. Bounds the rectified height at this multiple of the width.
pub const MAX_QUAD_ASPECT: f64 = 10.0;

/// Homogeneous `w` below which a projected point is at infinity.
pub const PROJECTIVE_W_EPSILON: f64 = 1e-12;

/// Opaque black written where the inverse mapping lands outside the source.
pub const OUTSIDE_SOURCE_RGBA: [u8; 4] = [0, 0, 0, 255];

/// Discrete zoom levels offered by the magnifier.
pub const ZOOM_LEVELS: [f64; 7] = [0.2, 0.5, 1.0, 1.5, 2.0, 3.0, 5.0];

/// Default zoom level.
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Base magnifier canvas edge length, in screen pixels.
pub const MAGNIFIER_BASE_SIZE: f64 = 225.0;

/// Idle time before the magnifier hides itself, in milliseconds.
pub const MAGNIFIER_HIDE_DELAY_MS: u64 = 2000;

/// Sustained touch press required before an inspection drag arms, in milliseconds.
pub const LONG_PRESS_MS: u64 = 500;

/// Movement (screen pixels) that cancels a pending long press.
pub const LONG_PRESS_SLOP_PX: f64 = 10.0;

/// Pointer-down radius around a crop corner handle, in screen pixels.
pub const CORNER_HIT_RADIUS_PX: f64 = 24.0;

/// Pointer-down distance to a measurement line, in screen pixels.
pub const LINE_HIT_TOLERANCE_PX: f64 = 10.0;

/// Overlay stroke width in magnifier canvas pixels.
pub const OVERLAY_LINE_WIDTH: f64 = 2.0;

/// Dash pattern (on, off) for overlay strokes.
pub const OVERLAY_DASH: (f64, f64) = (5.0, 5.0);

/// Radius of crop corner markers in the magnifier.
pub const CORNER_MARKER_RADIUS: f64 = 4.0;

/// Radius of the focus marker at the magnifier center.
pub const CENTER_MARKER_RADIUS: f64 = 3.0;

/// Stroke width of measurement lines on exported images.
pub const EXPORT_LINE_WIDTH: f64 = 3.0;

/// Dash pattern (on, off) for measurement lines on exported images.
pub const EXPORT_DASH: (f64, f64) = (10.0, 10.0);

/// Height of the summary footer band appended to exported images.
pub const EXPORT_FOOTER_HEIGHT: u32 = 120;

/// Version string written into project files.
pub const PROJECT_VERSION: &str = "1.0";
