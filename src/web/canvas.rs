//! Canvas 2D implementations of the render surface and the text rasterizer.

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::particles::mask::ensure_ready;
use crate::particles::{
    Color, FieldConfig, FieldError, HeadlineLayout, HeadlineStyle, MaskBuffer, Surface,
    TextRasterizer,
};

pub(crate) fn platform_error(err: JsValue) -> FieldError {
    FieldError::Platform(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

fn context_2d(
    canvas: &HtmlCanvasElement,
    options: &[(&str, bool)],
) -> Result<CanvasRenderingContext2d, FieldError> {
    let attributes = js_sys::Object::new();
    for (key, value) in options {
        js_sys::Reflect::set(&attributes, &JsValue::from_str(key), &JsValue::from_bool(*value))
            .map_err(platform_error)?;
    }
    canvas
        .get_context_with_context_options("2d", &attributes)
        .map_err(platform_error)?
        .ok_or(FieldError::ContextUnavailable)?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| FieldError::ContextUnavailable)
}

/// The visible hero canvas.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    fill: Option<Color>,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, FieldError> {
        let ctx = context_2d(&canvas, &[("alpha", false)])?;
        Ok(Self {
            canvas,
            ctx,
            fill: None,
        })
    }

    /// Sizes the backing store in device pixels and the element in CSS pixels.
    pub fn fit(
        &mut self,
        config: &FieldConfig,
        css_width: f64,
        css_height: f64,
    ) -> Result<(), FieldError> {
        self.canvas.set_width(config.width);
        self.canvas.set_height(config.height);
        let style = self.canvas.style();
        style
            .set_property("width", &format!("{css_width}px"))
            .map_err(platform_error)?;
        style
            .set_property("height", &format!("{css_height}px"))
            .map_err(platform_error)?;
        // Resizing resets the context state, fill style included.
        self.fill = None;
        Ok(())
    }

    fn set_fill(&mut self, color: Color) {
        if self.fill != Some(color) {
            self.ctx.set_fill_style_str(&color.to_css());
            self.fill = Some(color);
        }
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn fill_background(&mut self, color: Color) {
        self.set_fill(color);
        self.ctx.fill_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }

    fn fill_circle(&mut self, center: [f32; 2], radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        self.set_fill(color);
        self.ctx.begin_path();
        if self
            .ctx
            .arc(center[0] as f64, center[1] as f64, radius as f64, 0.0, TAU)
            .is_ok()
        {
            self.ctx.fill();
        }
    }
}

/// Draws the headline on a detached canvas and reads the pixels back.
pub struct CanvasRasterizer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRasterizer {
    pub fn new(document: &Document) -> Result<Self, FieldError> {
        let canvas = document
            .create_element("canvas")
            .map_err(platform_error)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| FieldError::ContextUnavailable)?;
        let ctx = context_2d(&canvas, &[("willReadFrequently", true)])?;
        Ok(Self { canvas, ctx })
    }
}

impl TextRasterizer for CanvasRasterizer {
    fn rasterize(
        &mut self,
        config: &FieldConfig,
        style: &HeadlineStyle,
    ) -> Result<MaskBuffer, FieldError> {
        ensure_ready(config)?;

        let width = config.width as f64;
        let height = config.height as f64;
        self.canvas.set_width(config.width);
        self.canvas.set_height(config.height);

        self.ctx.set_fill_style_str(&style.background.to_css());
        self.ctx.fill_rect(0.0, 0.0, width, height);

        self.ctx.set_fill_style_str(&style.ink.to_css());
        self.ctx.set_font(&style.css_font(config.font_size));
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");

        let layout = HeadlineLayout::new(config, style.lines.len());
        for (line, center_y) in style.lines.iter().zip(&layout.line_centers) {
            self.ctx
                .fill_text(line, layout.center_x as f64, *center_y as f64)
                .map_err(platform_error)?;
        }

        let image = self
            .ctx
            .get_image_data(0.0, 0.0, width, height)
            .map_err(platform_error)?;
        self.ctx.clear_rect(0.0, 0.0, width, height);

        MaskBuffer::from_rgba_bytes(config.width, config.height, &image.data())
    }
}
