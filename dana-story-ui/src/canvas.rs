//! The heatmap's `<canvas>`, drawn with the 2D context.

use crate::js_bridge::js_error;
use anyhow::{anyhow, Context};
use dana_map::geo::{Pixel, Size};
use dana_map::heatmap::GradientStop;
use dana_map::HeatCanvas;
use std::f64::consts::PI;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub struct CanvasSurface {
    element: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(element: HtmlCanvasElement) -> anyhow::Result<Self> {
        let ctx = element
            .get_context("2d")
            .map_err(js_error)?
            .context("canvas has no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| anyhow!("2d context has an unexpected type"))?;
        Ok(Self { element, ctx })
    }

    pub fn element(&self) -> &HtmlCanvasElement {
        &self.element
    }

    fn try_paint(&self, center: Pixel, radius: f64, stops: &[GradientStop]) -> anyhow::Result<()> {
        let gradient = self
            .ctx
            .create_radial_gradient(center.x, center.y, 0.0, center.x, center.y, radius)
            .map_err(js_error)?;
        for stop in stops {
            gradient
                .add_color_stop(stop.offset as f32, &stop.color.to_string())
                .map_err(js_error)?;
        }
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.begin_path();
        self.ctx
            .arc(center.x, center.y, radius, 0.0, 2.0 * PI)
            .map_err(js_error)?;
        self.ctx.fill();
        Ok(())
    }
}

impl HeatCanvas for CanvasSurface {
    fn resize(&mut self, size: Size) {
        if self.element.width() != size.width {
            self.element.set_width(size.width);
        }
        if self.element.height() != size.height {
            self.element.set_height(size.height);
        }
    }

    fn clear(&mut self) {
        let (w, h) = (self.element.width() as f64, self.element.height() as f64);
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }

    fn paint_radial(&mut self, center: Pixel, radius: f64, stops: &[GradientStop]) {
        if let Err(e) = self.try_paint(center, radius, stops) {
            log::warn!("[DANA] canvas: paint failed: {:#}", e);
        }
    }
}
