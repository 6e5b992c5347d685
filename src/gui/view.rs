use super::theme::{Gradient, ThemeColors};
use super::{ARC_SEGMENTS, KNOB_SHADOW_OFFSET, KNOB_SHADOW_SPREAD, SEGMENT_OVERLAP};
use crate::config::DialConfig;
use crate::dial::{DialGeometry, Point, Value, angle_to_point, fraction_to_angle};
use cairo::{Context, LineCap};
use palette::{Srgba, WithAlpha};
use std::f64::consts::PI;

/// Everything the renderer needs from the config, resolved once per reload.
#[derive(Debug, Clone, PartialEq)]
pub struct DialStyle {
    pub inset: f64,
    pub stroke_width: f64,
    pub knob_radius: f64,
    pub track_opacity: f64,
    pub gradient: Gradient,
    pub knob_color: Srgba<f64>,
}

impl DialStyle {
    pub fn from_config(config: &DialConfig) -> Self {
        Self {
            inset: config.inset,
            stroke_width: config.stroke_width,
            knob_radius: config.knob_radius,
            track_opacity: config.track_opacity,
            gradient: Gradient::new(&config.gradient),
            knob_color: config.knob_color.0.into_format::<f64>().with_alpha(1.0),
        }
    }
}

impl Default for DialStyle {
    fn default() -> Self {
        Self::from_config(&DialConfig::default())
    }
}

pub fn label_text(value: Value) -> String {
    format!("Value: {}", value.get().trunc() as i64)
}

fn set_source(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

struct ArcRenderer<'a> {
    geometry: &'a DialGeometry,
    style: &'a DialStyle,
}

impl<'a> ArcRenderer<'a> {
    fn new(geometry: &'a DialGeometry, style: &'a DialStyle) -> Self {
        Self { geometry, style }
    }

    /// Strokes the ring from the top through `fraction` of a full turn, one
    /// short segment per gradient sample.
    fn draw_sweep(&self, cr: &Context, fraction: f64, alpha: f64) -> Result<(), cairo::Error> {
        let segments = ((fraction * ARC_SEGMENTS as f64).ceil() as usize).max(1);
        let step = fraction / segments as f64;
        let Point { x, y } = self.geometry.center;

        cr.set_line_width(self.style.stroke_width);
        cr.set_line_cap(LineCap::Butt);

        for i in 0..segments {
            let (t0, t1) = (i as f64 * step, (i + 1) as f64 * step);
            let overlap = if i + 1 < segments { SEGMENT_OVERLAP } else { 0.0 };

            set_source(cr, self.style.gradient.sample_srgba((t0 + t1) / 2.0, alpha));
            cr.new_path();
            cr.arc(
                x,
                y,
                self.geometry.radius,
                *fraction_to_angle(t0),
                *fraction_to_angle(t1) + overlap,
            );
            cr.stroke()?;
        }
        Ok(())
    }

    /// Round caps painted separately so each end takes its own gradient color.
    fn draw_caps(&self, cr: &Context, fraction: f64) -> Result<(), cairo::Error> {
        let cap_radius = self.style.stroke_width / 2.0;
        for t in [0.0, fraction] {
            let p = angle_to_point(
                fraction_to_angle(t),
                self.geometry.center,
                self.geometry.radius,
            );
            set_source(cr, self.style.gradient.sample_srgba(t, 1.0));
            cr.new_path();
            cr.arc(p.x, p.y, cap_radius, 0.0, 2.0 * PI);
            cr.fill()?;
        }
        Ok(())
    }

    fn draw_track(&self, cr: &Context) -> Result<(), cairo::Error> {
        if self.style.track_opacity <= 0.0 {
            return Ok(());
        }
        self.draw_sweep(cr, 1.0, self.style.track_opacity)
    }

    fn draw_progress(&self, cr: &Context, value: Value) -> Result<(), cairo::Error> {
        let fraction = value.fraction();
        if fraction <= 0.0 {
            return Ok(());
        }
        self.draw_sweep(cr, fraction, 1.0)?;
        self.draw_caps(cr, fraction)
    }
}

fn draw_knob(
    cr: &Context,
    geometry: &DialGeometry,
    value: Value,
    style: &DialStyle,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let knob = geometry.knob_position(value);

    set_source(cr, colors.shadow);
    cr.new_path();
    cr.arc(
        knob.x,
        knob.y + KNOB_SHADOW_OFFSET,
        style.knob_radius + KNOB_SHADOW_SPREAD,
        0.0,
        2.0 * PI,
    );
    cr.fill()?;

    set_source(cr, style.knob_color);
    cr.new_path();
    cr.arc(knob.x, knob.y, style.knob_radius, 0.0, 2.0 * PI);
    cr.fill()
}

pub fn draw(
    cr: &Context,
    geometry: &DialGeometry,
    value: Value,
    style: &DialStyle,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    cr.save()?;
    let arcs = ArcRenderer::new(geometry, style);
    arcs.draw_track(cr)?;
    arcs.draw_progress(cr, value)?;
    draw_knob(cr, geometry, value, style, colors)?;
    cr.restore()
}
