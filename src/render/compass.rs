//! Gráfico do political compass: grade 20×20 com quatro quadrantes e um ponto.

use crate::quiz::NormalizedResult;

use super::{answered_line, escape, RenderedResult, ResultRenderer, SvgOptions};

/// Extremo de cada eixo no gráfico.
const AXIS_LIMIT: f64 = 10.0;

/// Renderer do political compass.
#[derive(Debug, Clone, Copy)]
pub struct CompassRenderer {
    options: SvgOptions,
}

impl CompassRenderer {
    pub fn new(options: SvgOptions) -> Self {
        Self { options }
    }

    fn report(&self, result: &NormalizedResult) -> String {
        let mut lines = vec![format!("# {} Result", result.variant.title()), String::new()];
        for axis in &result.axes {
            let poles = axis
                .poles
                .as_ref()
                .map(|[low, high]| format!(" ({}/{})", low, high))
                .unwrap_or_default();
            lines.push(format!("{}{}: {:.2}", axis.name, poles, axis.value));
        }
        lines.push(format!("Quadrant: {}", result.label));
        lines.push(answered_line(result));
        lines.join("\n")
    }

    fn svg(&self, result: &NormalizedResult) -> String {
        let size = self.options.size as f64;
        let half = size / 2.0;
        let cell = size / (AXIS_LIMIT * 2.0);

        let economic = result.value("economic").unwrap_or(0.0).clamp(-AXIS_LIMIT, AXIS_LIMIT);
        let social = result.value("social").unwrap_or(0.0).clamp(-AXIS_LIMIT, AXIS_LIMIT);
        let x = (economic + AXIS_LIMIT) * cell;
        let y = (AXIS_LIMIT - social) * cell;

        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{s}" height="{s}" viewBox="0 0 {s} {s}">"#,
            s = size
        );
        let quadrants = [
            (0.0, 0.0, "#ff7575"),
            (half, 0.0, "#42aaff"),
            (0.0, half, "#9aed97"),
            (half, half, "#c09aec"),
        ];
        for (qx, qy, color) in quadrants {
            svg.push_str(&format!(
                r#"<rect x="{}" y="{}" width="{h}" height="{h}" fill="{}"/>"#,
                qx,
                qy,
                color,
                h = half
            ));
        }
        for i in 1..(AXIS_LIMIT as usize * 2) {
            let p = i as f64 * cell;
            svg.push_str(&format!(
                r##"<line x1="{p}" y1="0" x2="{p}" y2="{s}" stroke="#000" stroke-opacity="0.15"/><line x1="0" y1="{p}" x2="{s}" y2="{p}" stroke="#000" stroke-opacity="0.15"/>"##,
                p = p,
                s = size
            ));
        }
        svg.push_str(&format!(
            r##"<line x1="{h}" y1="0" x2="{h}" y2="{s}" stroke="#000" stroke-width="2"/><line x1="0" y1="{h}" x2="{s}" y2="{h}" stroke="#000" stroke-width="2"/>"##,
            h = half,
            s = size
        ));
        svg.push_str(&format!(
            r##"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="#e00" stroke="#fff" stroke-width="2"/>"##,
            x,
            y,
            cell * 0.6
        ));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="16" font-family="sans-serif" font-size="12" text-anchor="middle">{}</text>"#,
            half,
            escape(&result.label)
        ));
        svg.push_str("</svg>");
        svg
    }
}

impl ResultRenderer for CompassRenderer {
    fn render(&self, result: &NormalizedResult) -> RenderedResult {
        RenderedResult {
            report: self.report(result),
            graphic: self.options.enabled.then(|| self.svg(result)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{AxisTally, LinearBounded, ScoreNormalizer};

    fn sample() -> NormalizedResult {
        let mut tally = AxisTally::default();
        tally.add("economic", -47.0);
        tally.add("social", 76.0);
        LinearBounded::political_compass().normalize(&tally, 62, 62)
    }

    #[test]
    fn test_report_lists_axes_and_quadrant() {
        let rendered = CompassRenderer::new(SvgOptions::default()).render(&sample());

        assert!(rendered.report.contains("Economic (Left/Right): -5.00"));
        assert!(rendered.report.contains("Social (Libertarian/Authoritarian): 5.00"));
        assert!(rendered.report.contains("Quadrant: Authoritarian Left"));
        assert!(rendered.report.contains("Questions answered: 62/62"));
    }

    #[test]
    fn test_svg_marker_position() {
        let options = SvgOptions { enabled: true, size: 400 };
        let svg = CompassRenderer::new(options).render(&sample()).graphic.unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        // economic -5 → x = 100, social +5 → y = 100
        assert!(svg.contains(r#"cx="100.0" cy="100.0""#));
    }

    #[test]
    fn test_svg_disabled() {
        let options = SvgOptions { enabled: false, size: 400 };
        assert!(CompassRenderer::new(options).render(&sample()).graphic.is_none());
    }
}
