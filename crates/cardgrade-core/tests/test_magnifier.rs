#[allow(dead_code)]
mod common;

use approx::assert_abs_diff_eq;
use image::Rgba;

use cardgrade_core::config::MagnifierConfig;
use cardgrade_core::geometry::Point2;
use cardgrade_core::magnifier::{
    render_magnifier, MagnifierMode, MagnifierState, Overlay, RasterRenderer, BACKGROUND,
    CENTER_COLOR, CROP_COLOR, INNER_LINE_COLOR, OUTER_LINE_COLOR,
};
use cardgrade_core::measure::MeasureLines;
use cardgrade_core::quad::CropQuad;
use cardgrade_core::viewport::{Region, ViewportRect};

use common::{DrawCall, RecordingRenderer};

fn visible(focus: Point2, zoom: f64, mode: MagnifierMode) -> MagnifierState {
    MagnifierState {
        visible: true,
        focus,
        zoom,
        mode,
        tracking: false,
    }
}

// ---------------------------------------------------------------------------
// Draw order and overlays
// ---------------------------------------------------------------------------

#[test]
fn test_hidden_magnifier_draws_nothing() {
    let img = common::gradient_image(100, 100);
    let rect = ViewportRect::new(0.0, 0.0, 100.0, 100.0);
    let quad = CropQuad::default();
    let mut r = RecordingRenderer::default();

    let state = MagnifierState::default();
    let out = render_magnifier(&mut r, &state, &img, &rect, Overlay::Crop(&quad), &MagnifierConfig::default());
    assert!(out.is_none());
    assert!(r.calls.is_empty());
}

#[test]
fn test_crop_overlay_draw_sequence() {
    let img = common::gradient_image(1000, 1000);
    let rect = ViewportRect::new(0.0, 0.0, 500.0, 500.0);
    let quad = CropQuad::default();
    let mut r = RecordingRenderer::default();
    let state = visible(Point2::new(250.0, 250.0), 1.0, MagnifierMode::Crop);

    let window = render_magnifier(&mut r, &state, &img, &rect, Overlay::Crop(&quad), &MagnifierConfig::default())
        .unwrap();
    assert_abs_diff_eq!(window.canvas_size, 225.0);

    // Background first, covering the whole canvas.
    assert_eq!(
        r.calls[0],
        DrawCall::FillRect(
            Region {
                x: 0.0,
                y: 0.0,
                width: 225.0,
                height: 225.0
            },
            BACKGROUND
        )
    );
    match r.calls[1] {
        DrawCall::Image { source, dest } => {
            assert_abs_diff_eq!(source.x, 387.5);
            assert_abs_diff_eq!(source.width, 225.0);
            assert_abs_diff_eq!(dest.x, 0.0);
            assert_abs_diff_eq!(dest.width, 225.0);
        }
        ref other => panic!("expected image draw, got {other:?}"),
    }

    let lines = r.lines();
    assert_eq!(lines.len(), 4);
    for (_, _, stroke) in &lines {
        assert_eq!(stroke.color, CROP_COLOR);
        assert_eq!(stroke.width, 2.0);
        assert!(stroke.dash.is_some());
    }

    // Four corner markers, then the center marker last.
    let circles = r.circles();
    assert_eq!(circles.len(), 5);
    assert!(circles[..4].iter().all(|(_, radius, c)| *radius == 4.0 && *c == CROP_COLOR));
    assert!(matches!(r.calls.last(), Some(DrawCall::Circle { .. })));
    let (center, radius, color) = circles[4];
    assert_eq!(center, Point2::new(112.5, 112.5));
    assert_eq!(radius, 3.0);
    assert_eq!(color, CENTER_COLOR);
}

#[test]
fn test_marker_sizes_do_not_scale_with_zoom() {
    let img = common::gradient_image(1000, 1000);
    let rect = ViewportRect::new(0.0, 0.0, 500.0, 500.0);
    let quad = CropQuad::default();

    for zoom in [0.5, 2.0, 5.0] {
        let mut r = RecordingRenderer::default();
        let state = visible(Point2::new(75.0, 75.0), zoom, MagnifierMode::Crop);
        render_magnifier(&mut r, &state, &img, &rect, Overlay::Crop(&quad), &MagnifierConfig::default())
            .unwrap();
        assert!(r.lines().iter().all(|(_, _, s)| s.width == 2.0));
        assert_eq!(r.circles().last().map(|c| c.1), Some(3.0));
    }
}

#[test]
fn test_measure_overlay_skips_offscreen_lines() {
    let img = common::gradient_image(1000, 1000);
    let rect = ViewportRect::new(0.0, 0.0, 500.0, 500.0);
    let lines = MeasureLines::default();

    // Image center: every default line is outside the 225 px window.
    let mut r = RecordingRenderer::default();
    let state = visible(Point2::new(250.0, 250.0), 1.0, MagnifierMode::Measure);
    render_magnifier(&mut r, &state, &img, &rect, Overlay::Measure(&lines), &MagnifierConfig::default())
        .unwrap();
    assert!(r.lines().is_empty());

    // Focus on outerLeft (x = 30 px in the image): it and innerLeft show.
    let mut r = RecordingRenderer::default();
    let state = visible(Point2::new(15.0, 250.0), 1.0, MagnifierMode::Measure);
    render_magnifier(&mut r, &state, &img, &rect, Overlay::Measure(&lines), &MagnifierConfig::default())
        .unwrap();
    let drawn = r.lines();
    assert_eq!(drawn.len(), 2);
    assert_eq!(drawn[0].2.color, OUTER_LINE_COLOR);
    assert_eq!(drawn[1].2.color, INNER_LINE_COLOR);
    assert_abs_diff_eq!(drawn[0].0.x, 112.5);
    assert_abs_diff_eq!(drawn[1].0.x, 212.5);
}

#[test]
fn test_zero_viewport_renders_nothing() {
    let img = common::gradient_image(100, 100);
    let rect = ViewportRect::new(0.0, 0.0, 0.0, 50.0);
    let lines = MeasureLines::default();
    let mut r = RecordingRenderer::default();
    let state = visible(Point2::new(10.0, 10.0), 1.0, MagnifierMode::Measure);
    assert!(render_magnifier(&mut r, &state, &img, &rect, Overlay::Measure(&lines), &MagnifierConfig::default())
        .is_none());
    assert!(r.calls.is_empty());
}

// ---------------------------------------------------------------------------
// Canvas size and clipping
// ---------------------------------------------------------------------------

#[test]
fn test_canvas_size_grows_with_zoom() {
    let cfg = MagnifierConfig::default();
    assert_eq!(cfg.canvas_size(1.0), 225.0);
    assert_eq!(cfg.canvas_size(1.5), 225.0);
    assert_eq!(cfg.canvas_size(2.0), 337.5);
    assert_eq!(cfg.canvas_size(3.0), 450.0);
    assert_eq!(cfg.canvas_size(5.0), 450.0);
}

#[test]
fn test_raster_clipped_corner_shows_background() {
    let img = common::solid_image(1000, 1000, [255, 255, 255, 255]);
    let rect = ViewportRect::new(0.0, 0.0, 500.0, 500.0);
    let quad = CropQuad::default();
    let state = visible(Point2::new(0.0, 0.0), 1.0, MagnifierMode::Crop);

    let mut r = RasterRenderer::new(225, 225);
    let window = render_magnifier(&mut r, &state, &img, &rect, Overlay::Crop(&quad), &MagnifierConfig::default())
        .unwrap();
    assert_abs_diff_eq!(window.dest.x, 112.5);
    assert_abs_diff_eq!(window.source.width, 112.5);

    let canvas = r.canvas();
    assert_eq!(*canvas.get_pixel(10, 10), BACKGROUND);
    assert_eq!(*canvas.get_pixel(200, 200), Rgba([255, 255, 255, 255]));
    assert_eq!(*canvas.get_pixel(112, 112), CENTER_COLOR);
}
