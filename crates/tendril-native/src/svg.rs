use std::fmt::{self, Write};
use tendril_core::{ColorStop, DrawCommand, DrawSurface, LineCap, LinearGradient, Viewport};

/// Collects draw commands into a standalone SVG document.
pub struct SvgSurface {
    viewport: Viewport,
    defs: String,
    body: String,
    path: String,
    gradients: usize,
    last_stroke: Option<(LinearGradient, String)>,
}

impl SvgSurface {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            defs: String::new(),
            body: String::new(),
            path: String::new(),
            gradients: 0,
            last_stroke: None,
        }
    }

    pub fn finish(self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n<defs>\n{defs}</defs>\n{body}</svg>\n",
            w = self.viewport.width,
            h = self.viewport.height,
            defs = self.defs,
            body = self.body,
        )
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.gradients += 1;
        format!("{prefix}{}", self.gradients)
    }

    /// Id of a gradient matching `gradient`, reusing the previous stroke's when identical.
    fn stroke_gradient(&mut self, gradient: &LinearGradient) -> Result<String, fmt::Error> {
        if let Some((last, id)) = &self.last_stroke {
            if last == gradient {
                return Ok(id.clone());
            }
        }
        let id = self.next_id("stroke");
        writeln!(
            self.defs,
            "<linearGradient id=\"{id}\" gradientUnits=\"userSpaceOnUse\" x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\">",
            gradient.from.x, gradient.from.y, gradient.to.x, gradient.to.y
        )?;
        write_stops(&mut self.defs, &gradient.stops)?;
        self.defs.push_str("</linearGradient>\n");
        self.last_stroke = Some((gradient.clone(), id.clone()));
        Ok(id)
    }
}

fn write_stops(out: &mut String, stops: &[ColorStop]) -> fmt::Result {
    for stop in stops {
        let c = stop.color;
        writeln!(
            out,
            "  <stop offset=\"{}\" stop-color=\"rgb({},{},{})\" stop-opacity=\"{}\"/>",
            stop.offset,
            (c.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (c.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (c.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            c.a
        )?;
    }
    Ok(())
}

impl DrawSurface for SvgSurface {
    type Error = fmt::Error;

    fn apply(&mut self, command: &DrawCommand) -> Result<(), Self::Error> {
        match command {
            DrawCommand::FillRect { origin, size, color } => writeln!(
                self.body,
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
                origin.x,
                origin.y,
                size.x,
                size.y,
                color.to_css()
            ),
            DrawCommand::BeginPath { start } => {
                self.path.clear();
                write!(self.path, "M {:.2} {:.2}", start.x, start.y)
            }
            DrawCommand::CurveTo { c1, c2, end } => write!(
                self.path,
                " C {:.2} {:.2} {:.2} {:.2} {:.2} {:.2}",
                c1.x, c1.y, c2.x, c2.y, end.x, end.y
            ),
            DrawCommand::Stroke(style) => {
                let id = self.stroke_gradient(&style.gradient)?;
                let cap = match style.cap {
                    LineCap::Butt => "butt",
                    LineCap::Round => "round",
                };
                writeln!(
                    self.body,
                    "<path d=\"{}\" fill=\"none\" stroke=\"url(#{id})\" stroke-width=\"{:.3}\" stroke-linecap=\"{cap}\"/>",
                    self.path, style.width
                )
            }
            DrawCommand::FillCircle(glow) => {
                let id = self.next_id("glow");
                writeln!(
                    self.defs,
                    "<radialGradient id=\"{id}\" gradientUnits=\"userSpaceOnUse\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\">",
                    glow.center.x, glow.center.y, glow.radius
                )?;
                write_stops(&mut self.defs, &glow.stops)?;
                self.defs.push_str("</radialGradient>\n");
                writeln!(
                    self.body,
                    "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"url(#{id})\"/>",
                    glow.center.x, glow.center.y, glow.radius
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tendril_core::{Engine, TendrilProfile};

    fn snapshot() -> String {
        let viewport = Viewport::new(800.0, 600.0);
        let engine = Engine::with_viewport(TendrilProfile::vertical(), viewport).unwrap();
        let mut svg = SvgSurface::new(viewport);
        engine.render().replay(&mut svg).unwrap();
        svg.finish()
    }

    #[test]
    fn document_has_one_path_per_segment() {
        let doc = snapshot();
        assert!(doc.starts_with("<svg "));
        assert!(doc.trim_end().ends_with("</svg>"));
        assert_eq!(doc.matches("<path ").count(), 45);
        assert_eq!(doc.matches("<circle ").count(), 2);
        assert_eq!(doc.matches("<rect ").count(), 1);
    }

    #[test]
    fn segments_reuse_a_single_stroke_gradient() {
        let doc = snapshot();
        assert_eq!(doc.matches("<linearGradient ").count(), 1);
        assert_eq!(doc.matches("<radialGradient ").count(), 2);
        assert!(doc.contains("stroke=\"url(#stroke1)\""));
    }

    #[test]
    fn paths_start_with_move_and_curve() {
        let doc = snapshot();
        let first = doc.lines().find(|l| l.starts_with("<path ")).unwrap();
        assert!(first.contains("d=\"M "));
        assert!(first.contains(" C "));
        assert!(first.contains("stroke-linecap=\"round\""));
    }
}
