use crate::config::HexColor;
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::{LinSrgb, Mix, Srgb, Srgba, WithAlpha};

/// Evenly spaced color stops swept around the ring. Interpolation happens in
/// linear RGB so the midpoints don't go muddy.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    stops: Vec<LinSrgb<f64>>,
}

impl Gradient {
    pub fn new(colors: &[HexColor]) -> Self {
        Self {
            stops: colors.iter().map(|c| c.to_linear()).collect(),
        }
    }

    /// Color at `t` in `[0, 1]`, measured clockwise from the top.
    pub fn sample(&self, t: f64) -> LinSrgb<f64> {
        match self.stops.as_slice() {
            [] => LinSrgb::new(1.0, 1.0, 1.0),
            [only] => *only,
            stops => {
                let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
                let pos = t * (stops.len() - 1) as f64;
                let i = (pos.floor() as usize).min(stops.len() - 2);
                stops[i].mix(stops[i + 1], pos - i as f64)
            }
        }
    }

    pub fn sample_srgba(&self, t: f64, alpha: f64) -> Srgba<f64> {
        Srgb::from_linear(self.sample(t)).with_alpha(alpha)
    }
}

pub struct ThemeColors {
    pub shadow: Srgba<f64>,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            shadow: Srgba::new(0.0, 0.0, 0.0, 0.3),
        }
    }
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        let fallback = Self::default();
        Self {
            shadow: Self::lookup_color(context, "shade_color", fallback.shadow, Some(0.3)),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                Srgba::new(
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    alpha_override.unwrap_or(c.alpha() as f64),
                )
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.dial-value {
    font-size: 20pt;
    font-weight: bold;
    padding: 12px;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
