use crate::features::{AXIS_MAX, FeatureTable, axis_ticks};
use crate::page::escape;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 440.0;
const MARGIN_LEFT: f64 = 130.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 70.0;
const BAR_FILL: f64 = 0.6; // fraction of a row the bar occupies

fn plot_width() -> f64 {
    WIDTH - MARGIN_LEFT - MARGIN_RIGHT
}

fn plot_height() -> f64 {
    HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
}

fn x_for(value: f64) -> f64 {
    MARGIN_LEFT + plot_width() * value / AXIS_MAX
}

/// Horizontal bar chart of the six feature scores on a fixed 0.0–1.0 axis.
pub fn render_chart(song: &str, table: &FeatureTable) -> String {
    let mut svg = format!(
        r#"<svg class="chart" xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" role="img">"#
    );
    svg.push_str(&format!(
        r#"<text class="chart-title" x="{}" y="{}" text-anchor="middle">Spotify Song Feature - {}</text>"#,
        WIDTH / 2.0,
        MARGIN_TOP / 2.0,
        escape(song)
    ));

    let axis_y = MARGIN_TOP + plot_height();
    for tick in axis_ticks() {
        let x = x_for(tick);
        svg.push_str(&format!(
            r##"<line class="grid" x1="{x:.1}" y1="{MARGIN_TOP}" x2="{x:.1}" y2="{axis_y}" stroke="#ddd"/>"##
        ));
        svg.push_str(&format!(
            r#"<text class="tick" x="{x:.1}" y="{:.1}" text-anchor="middle">{tick:.1}</text>"#,
            axis_y + 18.0
        ));
    }

    let rows = table.rows.len().max(1);
    #[allow(clippy::cast_precision_loss)]
    let band = plot_height() / rows as f64;
    let mut y = MARGIN_TOP;
    for row in &table.rows {
        let bar_height = band * BAR_FILL;
        let bar_y = y + (band - bar_height) / 2.0;
        let bar_width = x_for(row.bar_length()) - MARGIN_LEFT;
        svg.push_str(&format!(
            r##"<rect class="bar" data-feature="{}" x="{MARGIN_LEFT}" y="{bar_y:.1}" width="{bar_width:.1}" height="{bar_height:.1}" fill="#1f77b4"><title>{}: {:.3}</title></rect>"##,
            row.feature.as_str(),
            row.feature.label(),
            row.value
        ));
        svg.push_str(&format!(
            r#"<text class="label" x="{:.1}" y="{:.1}" text-anchor="end" dominant-baseline="middle">{}</text>"#,
            MARGIN_LEFT - 8.0,
            y + band / 2.0,
            row.feature.as_str()
        ));
        y += band;
    }

    svg.push_str(&format!(
        r##"<line class="axis" x1="{MARGIN_LEFT}" y1="{axis_y}" x2="{:.1}" y2="{axis_y}" stroke="#333"/>"##,
        x_for(AXIS_MAX)
    ));
    svg.push_str(&format!(
        r#"<text class="axis-label" x="{:.1}" y="{:.1}" text-anchor="middle">Scale</text>"#,
        MARGIN_LEFT + plot_width() / 2.0,
        HEIGHT - 20.0
    ));
    let label_y = MARGIN_TOP + plot_height() / 2.0;
    svg.push_str(&format!(
        r#"<text class="axis-label" x="20" y="{label_y:.1}" text-anchor="middle" transform="rotate(-90 20 {label_y:.1})">Features</text>"#
    ));
    svg.push_str("</svg>");
    svg
}
