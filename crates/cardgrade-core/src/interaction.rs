//! Pointer, touch and nudge handling for one card.
//!
//! [`Session`] holds everything the interaction layer owns: the crop quad,
//! the guide lines, the active stage, selection, drag state and the
//! magnifier. Each handler takes the current [`ViewportProvider`] and the
//! event time, so transitions are deterministic and testable without a
//! drawing surface.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::config::GraderConfig;
use crate::consts::{DEFAULT_ZOOM, ZOOM_LEVELS};
use crate::error::Result;
use crate::geometry::Point2;
use crate::magnifier::{render_magnifier, MagnifierMode, MagnifierState, Overlay, Renderer};
use crate::measure::{BorderRatios, MeasureLine, MeasureLines, Orientation};
use crate::project::ProjectRecord;
use crate::quad::{Corner, CropQuad};
use crate::rectify::worker::{JobId, RectifyOutcome, RectifyWorker};
use crate::rectify::{rectify, Rectification};
use crate::viewport::{
    normalized_to_screen, sample, screen_to_normalized, MagnifierWindow, ViewportProvider,
    ViewportRect,
};

/// Which half of the workflow is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Placing the four corners on the source photo.
    Crop,
    /// Placing guide lines on the rectified image.
    Measure,
}

/// Input device that produced a pointer event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerDevice {
    Mouse,
    Touch,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragState {
    Idle,
    DraggingCorner(Corner),
    DraggingLine(MeasureLine),
    /// Touch press on empty image area, waiting out the long-press delay.
    ProbeArming { origin: Point2, since: Instant },
    /// Free inspection drag on the rectified image.
    ProbeDragging,
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(
            self,
            Self::DraggingCorner(_) | Self::DraggingLine(_) | Self::ProbeDragging
        )
    }
}

/// Handle picked for nudging. Independent of the drag state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Corner(Corner),
    Line(MeasureLine),
}

/// What lies under a pointer position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
    Corner(Corner),
    Line(MeasureLine),
    /// Inside the image but not on a handle.
    Image,
    Outside,
}

/// Cancellable delayed hide for the magnifier. At most one is pending.
#[derive(Clone, Copy, Debug, Default)]
struct HideTimer {
    deadline: Option<Instant>,
}

impl HideTimer {
    /// Replace any pending hide with one firing `delay` after `now`.
    fn schedule(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    fn cancel(&mut self) {
        self.deadline = None;
    }

    fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|d| now >= d)
    }
}

/// Source pixels moved per nudge step. Finer steps at higher zoom.
pub fn nudge_step_pixels(zoom: f64) -> f64 {
    if zoom >= 5.0 {
        1.0
    } else if zoom >= 3.0 {
        2.0
    } else if zoom >= 2.0 {
        3.0
    } else {
        5.0
    }
}

pub struct Session {
    config: GraderConfig,
    stage: Stage,
    source: Arc<RgbaImage>,
    rectified: Option<Arc<RgbaImage>>,
    quad: CropQuad,
    lines: MeasureLines,
    drag: DragState,
    selection: Selection,
    zoom: f64,
    magnifier: MagnifierState,
    hide_timer: HideTimer,
    /// Last screen position each line was touched at, for pinning the
    /// magnifier's off-axis coordinate across nudges.
    last_interaction: HashMap<MeasureLine, Point2>,
    pending_job: Option<JobId>,
}

impl Session {
    /// Start a crop session on a decoded photo with the default quad.
    pub fn new(source: Arc<RgbaImage>, config: GraderConfig) -> Self {
        Self {
            config,
            stage: Stage::Crop,
            source,
            rectified: None,
            quad: CropQuad::default(),
            lines: MeasureLines::default(),
            drag: DragState::Idle,
            selection: Selection::None,
            zoom: DEFAULT_ZOOM,
            magnifier: MagnifierState::default(),
            hide_timer: HideTimer::default(),
            last_interaction: HashMap::new(),
            pending_job: None,
        }
    }

    /// Start a crop session using corners and lines from a saved project.
    pub fn from_project(source: Arc<RgbaImage>, record: &ProjectRecord, config: GraderConfig) -> Self {
        let mut session = Self::new(source, config);
        session.quad = record.crop_points;
        session.lines = record.measure_lines.clamped();
        session
    }

    /// Snapshot for persistence.
    pub fn to_project(&self, image_name: &str) -> ProjectRecord {
        ProjectRecord::new(image_name, self.quad, self.lines)
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn quad(&self) -> &CropQuad {
        &self.quad
    }

    pub fn lines(&self) -> &MeasureLines {
        &self.lines
    }

    pub fn ratios(&self) -> BorderRatios {
        BorderRatios::from_lines(&self.lines)
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn magnifier(&self) -> &MagnifierState {
        &self.magnifier
    }

    pub fn hide_pending(&self) -> bool {
        self.hide_timer.deadline.is_some()
    }

    pub fn source(&self) -> &Arc<RgbaImage> {
        &self.source
    }

    pub fn rectified(&self) -> Option<&Arc<RgbaImage>> {
        self.rectified.as_ref()
    }

    /// True while a background rectification is outstanding.
    pub fn is_processing(&self) -> bool {
        self.pending_job.is_some()
    }

    /// The image currently on screen: the photo while cropping, the
    /// rectified card while measuring.
    pub fn active_image(&self) -> &RgbaImage {
        match (self.stage, &self.rectified) {
            (Stage::Measure, Some(img)) => img,
            _ => &self.source,
        }
    }

    // -----------------------------------------------------------------------
    // Hit testing
    // -----------------------------------------------------------------------

    /// Find the handle under `pos` for the current stage.
    pub fn hit_test(&self, pos: Point2, rect: &ViewportRect) -> HitTarget {
        let cfg = &self.config.interaction;
        match self.stage {
            Stage::Crop => {
                let nearest = Corner::ALL
                    .into_iter()
                    .map(|c| (c, normalized_to_screen(self.quad.get(c), rect).distance(&pos)))
                    .filter(|(_, d)| *d <= cfg.corner_hit_radius_px)
                    .min_by(|a, b| a.1.total_cmp(&b.1));
                if let Some((corner, _)) = nearest {
                    return HitTarget::Corner(corner);
                }
            }
            Stage::Measure => {
                let tol = cfg.line_hit_tolerance_px;
                let nearest = MeasureLine::ALL
                    .into_iter()
                    .filter_map(|line| {
                        let frac = self.lines.get(line) / 100.0;
                        let (dist, along, lo, hi) = match line.orientation() {
                            Orientation::Horizontal => (
                                (pos.y - (rect.top + frac * rect.height)).abs(),
                                pos.x,
                                rect.left,
                                rect.right(),
                            ),
                            Orientation::Vertical => (
                                (pos.x - (rect.left + frac * rect.width)).abs(),
                                pos.y,
                                rect.top,
                                rect.bottom(),
                            ),
                        };
                        (dist <= tol && along >= lo - tol && along <= hi + tol).then_some((line, dist))
                    })
                    .min_by(|a, b| a.1.total_cmp(&b.1));
                if let Some((line, _)) = nearest {
                    return HitTarget::Line(line);
                }
            }
        }

        let inside = pos.x >= rect.left
            && pos.x <= rect.right()
            && pos.y >= rect.top
            && pos.y <= rect.bottom();
        if inside {
            HitTarget::Image
        } else {
            HitTarget::Outside
        }
    }

    // -----------------------------------------------------------------------
    // Pointer events
    // -----------------------------------------------------------------------

    pub fn pointer_down(
        &mut self,
        pos: Point2,
        device: PointerDevice,
        now: Instant,
        viewport: &dyn ViewportProvider,
    ) {
        let Some(rect) = sample(viewport) else {
            return;
        };

        match self.hit_test(pos, &rect) {
            HitTarget::Corner(corner) => {
                debug!(%corner, "corner drag start");
                self.drag = DragState::DraggingCorner(corner);
                self.selection = Selection::Corner(corner);
                self.follow_pointer(pos);
            }
            HitTarget::Line(line) => {
                debug!(%line, "line drag start");
                self.drag = DragState::DraggingLine(line);
                self.selection = Selection::Line(line);
                self.last_interaction.insert(line, pos);
                self.follow_pointer(pos);
            }
            HitTarget::Image if self.stage == Stage::Measure => match device {
                PointerDevice::Mouse => {
                    debug!("probe drag start");
                    self.drag = DragState::ProbeDragging;
                    self.follow_pointer(pos);
                }
                PointerDevice::Touch => {
                    self.drag = DragState::ProbeArming {
                        origin: pos,
                        since: now,
                    };
                }
            },
            HitTarget::Image | HitTarget::Outside => {}
        }
    }

    pub fn pointer_move(&mut self, pos: Point2, now: Instant, viewport: &dyn ViewportProvider) {
        if let DragState::ProbeArming { origin, since } = self.drag {
            if origin.distance(&pos) > self.config.interaction.long_press_slop_px {
                debug!("long press cancelled by movement");
                self.drag = DragState::Idle;
                return;
            }
            self.arm_probe_if_due(now, pos, since);
            return;
        }

        if !self.drag.is_dragging() {
            return;
        }
        let Some(rect) = sample(viewport) else {
            return;
        };
        let Some(norm) = screen_to_normalized(pos, &rect) else {
            return;
        };

        match self.drag {
            DragState::DraggingCorner(corner) if self.stage == Stage::Crop => {
                self.quad.set(corner, norm);
                self.invalidate_pending();
            }
            DragState::DraggingLine(line) if self.stage == Stage::Measure => {
                let value = match line.orientation() {
                    Orientation::Horizontal => norm.y() * 100.0,
                    Orientation::Vertical => norm.x() * 100.0,
                };
                self.lines.set(line, value);
                self.last_interaction.insert(line, pos);
            }
            DragState::ProbeDragging => {}
            _ => return,
        }
        self.follow_pointer(pos);
    }

    /// Release ends any drag and hides the magnifier at once.
    pub fn pointer_up(&mut self) {
        let was_dragging = self.drag.is_dragging();
        self.drag = DragState::Idle;
        if was_dragging {
            debug!("drag end");
            self.hide_magnifier();
        }
    }

    pub fn pointer_cancel(&mut self) {
        self.pointer_up();
    }

    /// Advance timers: arms a pending long press and fires the auto-hide.
    pub fn tick(&mut self, now: Instant) {
        if let DragState::ProbeArming { origin, since } = self.drag {
            self.arm_probe_if_due(now, origin, since);
        }
        if self.hide_timer.is_due(now) {
            self.hide_timer.cancel();
            self.magnifier.visible = false;
            self.magnifier.tracking = false;
        }
    }

    /// Arm the probe once the press has been held long enough, with the
    /// magnifier placed at `at`.
    fn arm_probe_if_due(&mut self, now: Instant, at: Point2, since: Instant) {
        if now.duration_since(since) >= self.config.interaction.long_press() {
            debug!("long press armed probe drag");
            self.drag = DragState::ProbeDragging;
            self.follow_pointer(at);
        }
    }

    // -----------------------------------------------------------------------
    // Selection and nudging
    // -----------------------------------------------------------------------

    pub fn select_corner(&mut self, corner: Corner) {
        self.selection = Selection::Corner(corner);
    }

    pub fn select_line(&mut self, line: MeasureLine) {
        self.selection = Selection::Line(line);
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::None;
    }

    /// Move the selected corner by `(dx, dy)` nudge steps.
    pub fn nudge_corner(&mut self, dx: i32, dy: i32, now: Instant, viewport: &dyn ViewportProvider) {
        let Selection::Corner(corner) = self.selection else {
            return;
        };
        if self.stage != Stage::Crop {
            return;
        }
        let (w, h) = self.source.dimensions();
        if w == 0 || h == 0 {
            return;
        }

        let step = nudge_step_pixels(self.zoom);
        let moved = self
            .quad
            .nudge(corner, dx as f64 * step / w as f64, dy as f64 * step / h as f64);
        self.invalidate_pending();
        debug!(%corner, x = moved.x(), y = moved.y(), "corner nudged");

        if let Some(rect) = sample(viewport) {
            self.show_fixed_magnifier(normalized_to_screen(moved, &rect), now);
        }
    }

    /// Move the selected line by `delta` nudge steps (positive is right/down).
    pub fn nudge_line(&mut self, delta: i32, now: Instant, viewport: &dyn ViewportProvider) {
        let Selection::Line(line) = self.selection else {
            return;
        };
        if self.stage != Stage::Measure {
            return;
        }
        let Some(rectified) = &self.rectified else {
            return;
        };

        let horizontal = line.orientation() == Orientation::Horizontal;
        let pixel_size = if horizontal {
            rectified.height()
        } else {
            rectified.width()
        };
        if pixel_size == 0 {
            return;
        }
        let pct_per_px = 100.0 / pixel_size as f64;
        let value = self
            .lines
            .nudge(line, delta as f64 * nudge_step_pixels(self.zoom) * pct_per_px);
        debug!(%line, value, "line nudged");

        let Some(rect) = sample(viewport) else {
            return;
        };
        let last = self.last_interaction.get(&line).copied();
        let target = if horizontal {
            let x = last.map_or(rect.center().x, |p| p.x);
            Point2::new(
                x.clamp(rect.left, rect.right()),
                rect.top + rect.height * value / 100.0,
            )
        } else {
            let y = last.map_or(rect.center().y, |p| p.y);
            Point2::new(
                rect.left + rect.width * value / 100.0,
                y.clamp(rect.top, rect.bottom()),
            )
        };
        self.last_interaction.insert(line, target);
        self.show_fixed_magnifier(target, now);
    }

    // -----------------------------------------------------------------------
    // Zoom and probing
    // -----------------------------------------------------------------------

    /// Change the magnifier zoom and re-probe at the selected line or the
    /// image center.
    pub fn set_zoom(&mut self, zoom: f64, now: Instant, viewport: &dyn ViewportProvider) {
        if !(zoom > 0.0 && zoom.is_finite()) {
            return;
        }
        self.zoom = zoom;
        self.magnifier.zoom = zoom;

        let Some(rect) = sample(viewport) else {
            return;
        };
        let target = match (self.stage, self.selection) {
            (Stage::Measure, Selection::Line(line)) => self.line_screen_anchor(line, &rect),
            _ => rect.center(),
        };
        self.show_fixed_magnifier(target, now);
    }

    /// Step to the next zoom level, wrapping around.
    pub fn cycle_zoom(&mut self, now: Instant, viewport: &dyn ViewportProvider) {
        let next = ZOOM_LEVELS
            .iter()
            .position(|z| (z - self.zoom).abs() < 1e-9)
            .map_or(0, |i| (i + 1) % ZOOM_LEVELS.len());
        self.set_zoom(ZOOM_LEVELS[next], now, viewport);
    }

    /// Show the magnifier at a fixed point; it hides itself after the idle delay.
    pub fn probe(&mut self, pos: Point2, now: Instant, viewport: &dyn ViewportProvider) {
        if sample(viewport).is_some() {
            self.show_fixed_magnifier(pos, now);
        }
    }

    /// Screen point a line is anchored at: where it was last touched, or
    /// the middle of the line.
    fn line_screen_anchor(&self, line: MeasureLine, rect: &ViewportRect) -> Point2 {
        if let Some(p) = self.last_interaction.get(&line) {
            return *p;
        }
        let frac = self.lines.get(line) / 100.0;
        match line.orientation() {
            Orientation::Horizontal => Point2::new(rect.center().x, rect.top + rect.height * frac),
            Orientation::Vertical => Point2::new(rect.left + rect.width * frac, rect.center().y),
        }
    }

    // -----------------------------------------------------------------------
    // Magnifier
    // -----------------------------------------------------------------------

    fn mode(&self) -> MagnifierMode {
        match self.stage {
            Stage::Crop => MagnifierMode::Crop,
            Stage::Measure => MagnifierMode::Measure,
        }
    }

    fn follow_pointer(&mut self, pos: Point2) {
        self.hide_timer.cancel();
        self.magnifier = MagnifierState {
            visible: true,
            focus: pos,
            zoom: self.zoom,
            mode: self.mode(),
            tracking: true,
        };
    }

    fn show_fixed_magnifier(&mut self, pos: Point2, now: Instant) {
        self.magnifier = MagnifierState {
            visible: true,
            focus: pos,
            zoom: self.zoom,
            mode: self.mode(),
            tracking: false,
        };
        self.hide_timer
            .schedule(now, self.config.interaction.hide_delay());
    }

    fn hide_magnifier(&mut self) {
        self.hide_timer.cancel();
        self.magnifier.visible = false;
        self.magnifier.tracking = false;
    }

    /// Draw the magnifier for the current state onto `renderer`.
    pub fn render_magnifier(
        &self,
        renderer: &mut dyn Renderer,
        viewport: &dyn ViewportProvider,
    ) -> Option<MagnifierWindow> {
        let rect = sample(viewport)?;
        let overlay = match self.magnifier.mode {
            MagnifierMode::Crop => Overlay::Crop(&self.quad),
            MagnifierMode::Measure => Overlay::Measure(&self.lines),
        };
        render_magnifier(
            renderer,
            &self.magnifier,
            self.active_image(),
            &rect,
            overlay,
            &self.config.magnifier,
        )
    }

    // -----------------------------------------------------------------------
    // Stage transitions
    // -----------------------------------------------------------------------

    /// Rectify synchronously and enter the measure stage.
    ///
    /// On failure the session stays on the crop stage with its corners intact.
    pub fn proceed(&mut self) -> Result<()> {
        self.invalidate_pending();
        match rectify(&self.source, &self.quad, &self.config.rectify) {
            Ok(rectification) => {
                self.enter_measure(rectification);
                Ok(())
            }
            Err(e) => {
                warn!("Rectification failed: {e}");
                Err(e)
            }
        }
    }

    /// Queue rectification on a background worker. Any earlier pending job
    /// is superseded.
    pub fn begin_rectify(&mut self, worker: &mut RectifyWorker) -> Result<JobId> {
        let job = worker.submit(
            Arc::clone(&self.source),
            self.quad,
            self.config.rectify.clone(),
        )?;
        self.pending_job = Some(job);
        Ok(job)
    }

    /// Apply a worker result. Returns `Ok(false)` if it was superseded and
    /// discarded; errors of the current job leave the crop stage intact.
    pub fn apply_rectified(&mut self, outcome: RectifyOutcome) -> Result<bool> {
        if self.pending_job != Some(outcome.job) {
            warn!(job = ?outcome.job, "discarding superseded rectification result");
            return Ok(false);
        }
        self.pending_job = None;
        let rectification = outcome.result?;
        self.enter_measure(rectification);
        Ok(true)
    }

    fn enter_measure(&mut self, rectification: Rectification) {
        info!(
            "Entering measure stage with {}x{} card",
            rectification.size.width, rectification.size.height
        );
        self.pending_job = None;
        self.rectified = Some(Arc::new(rectification.image));
        self.stage = Stage::Measure;
        self.drag = DragState::Idle;
        if matches!(self.selection, Selection::Line(_)) {
            self.selection = Selection::None;
        }
        self.last_interaction.clear();
        self.hide_magnifier();
    }

    /// Return to corner placement, discarding the rectified image.
    pub fn back_to_crop(&mut self) {
        self.invalidate_pending();
        self.stage = Stage::Crop;
        self.rectified = None;
        self.drag = DragState::Idle;
        if matches!(self.selection, Selection::Line(_)) {
            self.selection = Selection::None;
        }
        self.hide_magnifier();
    }

    /// Restore default corners, lines and zoom on the same photo.
    pub fn reset(&mut self) {
        self.stage = Stage::Crop;
        self.rectified = None;
        self.quad = CropQuad::default();
        self.lines = MeasureLines::default();
        self.drag = DragState::Idle;
        self.selection = Selection::None;
        self.zoom = DEFAULT_ZOOM;
        self.magnifier = MagnifierState::default();
        self.hide_timer.cancel();
        self.last_interaction.clear();
        self.pending_job = None;
    }

    fn invalidate_pending(&mut self) {
        if self.pending_job.take().is_some() {
            debug!("pending rectification superseded");
        }
    }
}
