//! Gráfico do politiscales: barras esquerda / neutro / direita e badges.

use crate::quiz::{NormalizedResult, PairValue};

use super::{answered_line, escape, RenderedResult, ResultRenderer, SvgOptions};

const ROW_HEIGHT: f64 = 44.0;
const NEUTRAL_COLOR: &str = "#bdbdbd";

const COLORS: [(&str, &str); 8] = [
    ("#8e24aa", "#f06292"),
    ("#26a69a", "#5d4037"),
    ("#ec407a", "#1565c0"),
    ("#42a5f5", "#e53935"),
    ("#c62828", "#fdd835"),
    ("#00695c", "#ff8f00"),
    ("#66bb6a", "#616161"),
    ("#d32f2f", "#7986cb"),
];

/// Renderer do politiscales.
#[derive(Debug, Clone, Copy)]
pub struct PolitiscalesRenderer {
    options: SvgOptions,
}

impl PolitiscalesRenderer {
    pub fn new(options: SvgOptions) -> Self {
        Self { options }
    }

    fn report(&self, result: &NormalizedResult) -> String {
        let mut lines = vec![format!("# {} Result", result.variant.title()), String::new()];
        for pair in &result.pairs {
            lines.push(format!(
                "{} {:.0}% | Neutral {:.0}% | {} {:.0}%",
                pair.left.name, pair.left.value, pair.neutral, pair.right.name, pair.right.value
            ));
        }

        lines.push(String::new());
        if result.badges.is_empty() {
            lines.push("Badges: none".to_string());
        } else {
            let badges: Vec<String> = result
                .badges
                .iter()
                .map(|b| format!("{} ({:.0}%)", b.name, b.score))
                .collect();
            lines.push(format!("Badges: {}", badges.join(", ")));
        }

        lines.push(format!("Slogan: {}", result.label));
        lines.push(answered_line(result));
        lines.join("\n")
    }

    fn svg(&self, result: &NormalizedResult) -> String {
        let width = self.options.size as f64;
        let badge_rows = if result.badges.is_empty() { 0.0 } else { 24.0 };
        let height = ROW_HEIGHT * result.pairs.len() as f64 + 44.0 + badge_rows;
        let bar = width - 20.0;

        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = width,
            h = height
        );

        for (i, pair) in result.pairs.iter().enumerate() {
            let (left_color, right_color) = COLORS[i % COLORS.len()];
            let top = 10.0 + i as f64 * ROW_HEIGHT;
            let (left, neutral, right) = segments(bar, pair);

            svg.push_str(&format!(
                r#"<text x="10" y="{:.1}" font-family="sans-serif" font-size="11">{}</text>"#,
                top + 11.0,
                escape(&pair.left.name)
            ));
            svg.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="11" text-anchor="end">{}</text>"#,
                width - 10.0,
                top + 11.0,
                escape(&pair.right.name)
            ));
            for (x, w, color) in [
                (10.0, left, left_color),
                (10.0 + left, neutral, NEUTRAL_COLOR),
                (10.0 + left + neutral, right, right_color),
            ] {
                svg.push_str(&format!(
                    r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="20" fill="{}"/>"#,
                    x,
                    top + 16.0,
                    w,
                    color
                ));
            }
        }

        let mut y = 10.0 + ROW_HEIGHT * result.pairs.len() as f64 + 14.0;
        if !result.badges.is_empty() {
            let names: Vec<&str> = result.badges.iter().map(|b| b.name.as_str()).collect();
            svg.push_str(&format!(
                r#"<text x="10" y="{:.1}" font-family="sans-serif" font-size="12">Badges: {}</text>"#,
                y,
                escape(&names.join(", "))
            ));
            y += badge_rows;
        }
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="14" text-anchor="middle">{}</text>"#,
            width / 2.0,
            y,
            escape(&result.label)
        ));
        svg.push_str("</svg>");
        svg
    }
}

/// Larguras (esquerda, neutro, direita) de uma barra.
///
/// Cada lado usa o próprio valor; se os dois somam mais de 100% são
/// reduzidos na mesma proporção e o neutro some.
fn segments(bar: f64, pair: &PairValue) -> (f64, f64, f64) {
    let l = pair.left.value.max(0.0);
    let r = pair.right.value.max(0.0);
    let total = l + r;
    if total > 100.0 {
        return (bar * l / total, 0.0, bar * r / total);
    }
    (bar * l / 100.0, bar * pair.neutral / 100.0, bar * r / 100.0)
}

impl ResultRenderer for PolitiscalesRenderer {
    fn render(&self, result: &NormalizedResult) -> RenderedResult {
        RenderedResult {
            report: self.report(result),
            graphic: self.options.enabled.then(|| self.svg(result)),
        }
    }
}
