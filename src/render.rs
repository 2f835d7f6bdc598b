use anyhow::anyhow;
use tendril_core::{ColorStop, DrawCommand, DrawSurface, LineCap, LinearGradient};
use wasm_bindgen::JsValue;
use web_sys as web;

fn js_err(context: &'static str) -> impl Fn(JsValue) -> anyhow::Error {
    move |e| anyhow!("{context}: {e:?}")
}

fn add_stops(gradient: &web::CanvasGradient, stops: &[ColorStop]) -> anyhow::Result<()> {
    for stop in stops {
        gradient
            .add_color_stop(stop.offset, &stop.color.to_css())
            .map_err(js_err("add_color_stop"))?;
    }
    Ok(())
}

/// Replays draw commands onto a Canvas 2D context in CSS pixels.
pub struct CanvasSurface {
    ctx: web::CanvasRenderingContext2d,
    // every segment of a frame shares one gradient
    stroke_cache: Option<(LinearGradient, web::CanvasGradient)>,
}

impl CanvasSurface {
    pub fn new(ctx: web::CanvasRenderingContext2d) -> Self {
        Self {
            ctx,
            stroke_cache: None,
        }
    }

    /// Reset the transform so one unit is one CSS pixel.
    pub fn begin_frame(&mut self, dpr: f64) -> anyhow::Result<()> {
        self.stroke_cache = None;
        self.ctx
            .set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)
            .map_err(js_err("set_transform"))
    }

    fn stroke_gradient(&mut self, gradient: &LinearGradient) -> anyhow::Result<web::CanvasGradient> {
        if let Some((cached, canvas_gradient)) = &self.stroke_cache {
            if cached == gradient {
                return Ok(canvas_gradient.clone());
            }
        }
        let g = self.ctx.create_linear_gradient(
            gradient.from.x as f64,
            gradient.from.y as f64,
            gradient.to.x as f64,
            gradient.to.y as f64,
        );
        add_stops(&g, &gradient.stops)?;
        self.stroke_cache = Some((gradient.clone(), g.clone()));
        Ok(g)
    }
}

impl DrawSurface for CanvasSurface {
    type Error = anyhow::Error;

    fn apply(&mut self, command: &DrawCommand) -> anyhow::Result<()> {
        let ctx = &self.ctx;
        match command {
            DrawCommand::FillRect { origin, size, color } => {
                ctx.set_fill_style(&JsValue::from_str(&color.to_css()));
                ctx.fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
            }
            DrawCommand::BeginPath { start } => {
                ctx.begin_path();
                ctx.move_to(start.x as f64, start.y as f64);
            }
            DrawCommand::CurveTo { c1, c2, end } => {
                ctx.bezier_curve_to(
                    c1.x as f64,
                    c1.y as f64,
                    c2.x as f64,
                    c2.y as f64,
                    end.x as f64,
                    end.y as f64,
                );
            }
            DrawCommand::Stroke(style) => {
                let gradient = self.stroke_gradient(&style.gradient)?;
                let ctx = &self.ctx;
                ctx.set_stroke_style(gradient.as_ref());
                ctx.set_line_width(style.width as f64);
                ctx.set_line_cap(match style.cap {
                    LineCap::Butt => "butt",
                    LineCap::Round => "round",
                });
                ctx.stroke();
            }
            DrawCommand::FillCircle(glow) => {
                let (x, y, r) = (glow.center.x as f64, glow.center.y as f64, glow.radius as f64);
                let g = ctx
                    .create_radial_gradient(x, y, 0.0, x, y, r)
                    .map_err(js_err("create_radial_gradient"))?;
                add_stops(&g, &glow.stops)?;
                ctx.set_fill_style(g.as_ref());
                ctx.begin_path();
                ctx.arc(x, y, r, 0.0, std::f64::consts::TAU)
                    .map_err(js_err("arc"))?;
                ctx.fill();
            }
        }
        Ok(())
    }
}
