//! Gráfico do 8values: uma barra dupla por eixo.

use crate::quiz::NormalizedResult;

use super::{answered_line, escape, RenderedResult, ResultRenderer, SvgOptions};

const ROW_HEIGHT: f64 = 56.0;

/// Cores (polo alto, polo baixo) de cada eixo.
const COLORS: [(&str, &str); 4] = [
    ("#f44336", "#00897b"),
    ("#f9a825", "#3949ab"),
    ("#fbc02d", "#1e88e5"),
    ("#8bc34a", "#8e24aa"),
];

/// Renderer do 8values.
#[derive(Debug, Clone, Copy)]
pub struct EightValuesRenderer {
    options: SvgOptions,
}

impl EightValuesRenderer {
    pub fn new(options: SvgOptions) -> Self {
        Self { options }
    }

    fn report(&self, result: &NormalizedResult) -> String {
        let mut lines = vec![format!("# {} Result", result.variant.title()), String::new()];
        for axis in &result.axes {
            match &axis.poles {
                Some([low, high]) => lines.push(format!(
                    "{} axis: {} {:.1}% | {} {:.1}%",
                    axis.name,
                    high,
                    axis.value,
                    low,
                    100.0 - axis.value
                )),
                None => lines.push(format!("{}: {:.1}%", axis.name, axis.value)),
            }
        }
        if let Some(ideology) = &result.ideology {
            lines.push(format!("Closest match: {}", ideology));
        }
        lines.push(format!("Quadrant: {}", result.label));
        lines.push(answered_line(result));
        lines.join("\n")
    }

    fn svg(&self, result: &NormalizedResult) -> String {
        let width = self.options.size as f64;
        let height = ROW_HEIGHT * result.axes.len() as f64 + 40.0;
        let bar = width - 20.0;

        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = width,
            h = height
        );

        for (i, axis) in result.axes.iter().enumerate() {
            let (high_color, low_color) = COLORS[i % COLORS.len()];
            let top = 10.0 + i as f64 * ROW_HEIGHT;
            let split = bar * axis.value.clamp(0.0, 100.0) / 100.0;
            let [low, high] = axis
                .poles
                .clone()
                .unwrap_or_else(|| [String::new(), axis.name.clone()]);

            svg.push_str(&format!(
                r#"<text x="10" y="{:.1}" font-family="sans-serif" font-size="12">{}</text>"#,
                top + 12.0,
                escape(&high)
            ));
            svg.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="12" text-anchor="end">{}</text>"#,
                width - 10.0,
                top + 12.0,
                escape(&low)
            ));
            svg.push_str(&format!(
                r#"<rect x="10" y="{:.1}" width="{:.1}" height="24" fill="{}"/>"#,
                top + 18.0,
                split,
                high_color
            ));
            svg.push_str(&format!(
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="24" fill="{}"/>"#,
                10.0 + split,
                top + 18.0,
                bar - split,
                low_color
            ));
            svg.push_str(&format!(
                r##"<text x="14" y="{:.1}" font-family="sans-serif" font-size="12" fill="#fff">{:.1}%</text>"##,
                top + 35.0,
                axis.value
            ));
            svg.push_str(&format!(
                r##"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="12" fill="#fff" text-anchor="end">{:.1}%</text>"##,
                width - 14.0,
                top + 35.0,
                100.0 - axis.value
            ));
        }

        let caption = match &result.ideology {
            Some(ideology) => format!("{} ({})", ideology, result.label),
            None => result.label.clone(),
        };
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="14" text-anchor="middle">{}</text>"#,
            width / 2.0,
            height - 12.0,
            escape(&caption)
        ));
        svg.push_str("</svg>");
        svg
    }
}

impl ResultRenderer for EightValuesRenderer {
    fn render(&self, result: &NormalizedResult) -> RenderedResult {
        RenderedResult {
            report: self.report(result),
            graphic: self.options.enabled.then(|| self.svg(result)),
        }
    }
}
