//! Pixel-space heatmap drawn on a canvas stacked over the map.
//!
//! One radial gradient per point, painted in ascending value order so the
//! strongest readings end up on top. The canvas is redrawn from scratch on
//! every `MoveEnd`/`Resize`.

use crate::backend::{HeatCanvas, MapBackend};
use crate::event_bus::{EventBus, Listener, MapEvent, Subscription};
use crate::geo::{LatLng, Pixel};
use dana_meteo::centroid::centroid_of;
use dana_meteo::feature::FeatureCollection;
use dana_meteo::variable::{MapVariable, MeteoField, VariableKind};
use std::fmt;

/// Gradient radius in pixels at the reference zoom.
pub const BASE_RADIUS: f64 = 20.0;
/// Zoom at which the radius equals [`BASE_RADIUS`].
pub const REFERENCE_ZOOM: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPoint {
    pub position: LatLng,
    pub value: f64,
}

impl HeatPoint {
    pub const fn new(lat: f64, lng: f64, value: f64) -> Self {
        Self {
            position: LatLng::new(lat, lng),
            value,
        }
    }

    /// Finite coordinates and a strictly positive value.
    pub fn is_drawable(&self) -> bool {
        self.position.is_finite() && self.value.is_finite() && self.value > 0.0
    }
}

/// One point per feature that has both a centroid and a value for `field`.
pub fn points_from_features(collection: &FeatureCollection, field: MeteoField) -> Vec<HeatPoint> {
    collection
        .features
        .iter()
        .filter_map(|feature| {
            let value = feature.value(field)?;
            let position = centroid_of(feature.geometry.as_ref()?)?;
            Some(HeatPoint { position, value })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapConfig {
    pub max_value: f64,
    pub kind: VariableKind,
}

impl HeatmapConfig {
    pub fn for_variable(variable: &MapVariable) -> Self {
        Self {
            max_value: variable.max_heatmap,
            kind: variable.kind,
        }
    }

    /// `max_value`, or the kind default when it cannot normalize anything.
    pub fn effective_max(&self) -> f64 {
        if self.max_value.is_finite() && self.max_value > 0.0 {
            self.max_value
        } else {
            self.kind.default_max()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Rgba,
}

/// 0..=1 channel ramp, floored like the canvas sees it.
fn channel(fraction: f64) -> u8 {
    (fraction.clamp(0.0, 1.0) * 255.0).floor() as u8
}

/// Color for a normalized intensity (`0..=1`).
pub fn intensity_color(intensity: f64, kind: VariableKind) -> Rgba {
    match kind {
        VariableKind::Precipitation => match intensity {
            i if i < 0.15 => Rgba::new(255, 255, 178, 0.4),
            i if i < 0.3 => Rgba::new(254, 204, 92, 0.4),
            i if i < 0.5 => Rgba::new(253, 141, 60, 0.4),
            i if i < 0.7 => Rgba::new(240, 59, 32, 0.4),
            i if i < 0.85 => Rgba::new(189, 0, 38, 0.4),
            _ => Rgba::new(73, 0, 106, 0.5),
        },
        VariableKind::Temperature => Rgba::new(
            channel(intensity),
            50,
            channel(1.0 - intensity),
            (intensity + 0.2).min(1.0),
        ),
        VariableKind::Wind => Rgba::new(
            channel(intensity),
            channel(1.0 - intensity),
            0,
            (intensity + 0.2).min(1.0),
        ),
    }
}

/// Solid at the centre, half alpha at 40 %, transparent at the edge.
pub fn gradient_stops(color: Rgba) -> [GradientStop; 3] {
    [
        GradientStop {
            offset: 0.0,
            color,
        },
        GradientStop {
            offset: 0.4,
            color: color.with_alpha(color.a / 2.0),
        },
        GradientStop {
            offset: 1.0,
            color: Rgba::TRANSPARENT,
        },
    ]
}

pub fn radius_for_zoom(zoom: f64) -> f64 {
    BASE_RADIUS * 2f64.powf(zoom - REFERENCE_ZOOM)
}

/// A single gradient as it will be painted.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamp {
    pub center: Pixel,
    pub radius: f64,
    pub value: f64,
    pub stops: [GradientStop; 3],
}

pub struct HeatmapLayer<C> {
    points: Vec<HeatPoint>,
    config: HeatmapConfig,
    canvas: Option<C>,
    subscription: Option<Subscription>,
}

impl<C: HeatCanvas> HeatmapLayer<C> {
    /// Keeps only drawable points, sorted ascending by value (stable).
    pub fn new(points: Vec<HeatPoint>, config: HeatmapConfig) -> Self {
        let total = points.len();
        let mut points: Vec<HeatPoint> = points.into_iter().filter(HeatPoint::is_drawable).collect();
        points.sort_by(|a, b| a.value.total_cmp(&b.value));
        log::debug!(
            "[DANA] heatmap: kept {} of {} points (max {})",
            points.len(),
            total,
            config.effective_max()
        );
        Self {
            points,
            config,
            canvas: None,
            subscription: None,
        }
    }

    pub fn points(&self) -> &[HeatPoint] {
        &self.points
    }

    pub fn config(&self) -> &HeatmapConfig {
        &self.config
    }

    pub fn is_attached(&self) -> bool {
        self.canvas.is_some()
    }

    /// Gradients for the backend's current view, in paint order.
    pub fn render_plan<B: MapBackend>(&self, backend: &B) -> Vec<Stamp> {
        let bounds = backend.visible_bounds();
        let radius = radius_for_zoom(backend.zoom());
        let max = self.config.effective_max();

        self.points
            .iter()
            .filter(|p| bounds.contains(p.position))
            .map(|p| {
                let intensity = (p.value / max).min(1.0);
                Stamp {
                    center: backend.project(p.position),
                    radius,
                    value: p.value,
                    stops: gradient_stops(intensity_color(intensity, self.config.kind)),
                }
            })
            .collect()
    }

    /// Create the canvas, start listening for camera changes and draw once.
    /// Attaching twice does nothing.
    pub fn attach<B>(&mut self, backend: &mut B, bus: &mut EventBus) -> anyhow::Result<()>
    where
        B: MapBackend<Canvas = C>,
    {
        if self.is_attached() {
            return Ok(());
        }
        self.canvas = Some(backend.create_canvas()?);
        self.subscription = Some(bus.subscribe(Listener::Heatmap, &[MapEvent::MoveEnd, MapEvent::Resize]));
        self.draw(backend);
        Ok(())
    }

    pub fn detach<B>(&mut self, backend: &mut B, bus: &mut EventBus)
    where
        B: MapBackend<Canvas = C>,
    {
        if let Some(subscription) = self.subscription.take() {
            bus.unsubscribe(subscription);
        }
        if let Some(canvas) = self.canvas.take() {
            backend.remove_canvas(canvas);
        }
    }

    /// Repaint the canvas for the current view. No-op while detached.
    pub fn draw<B: MapBackend>(&mut self, backend: &B) {
        let plan = self.render_plan(backend);
        let Some(canvas) = self.canvas.as_mut() else {
            return;
        };
        canvas.resize(backend.size());
        canvas.clear();
        for stamp in &plan {
            canvas.paint_radial(stamp.center, stamp.radius, &stamp.stops);
        }
    }
}
