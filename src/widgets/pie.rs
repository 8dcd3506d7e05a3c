use std::f64::consts::TAU;

use crate::api::{Widget, WidgetConfig};
use crate::error::{MountError, MountResult};
use crate::host::Container;
use crate::render::{LinePrimitive, RectPrimitive, TextHAlign};

use super::{
    LABEL_FONT_PX, MARGIN_PX, PlotArea, SeriesGroup, base_frame, color_at, ensure_finite, label,
    parse_data, present,
};

const ARC_SEGMENTS_PER_TURN: f64 = 96.0;
const LEGEND_SWATCH_PX: f64 = 8.0;

/// Pie of the first series; slices are outlined with arc segments.
///
/// Legend entries carry each slice's share unless `tooltipVisible` is `false`.
pub fn create_pie(container: &mut dyn Container, config: &WidgetConfig) -> MountResult<Box<dyn Widget>> {
    let groups: Vec<SeriesGroup> = parse_data(config)?;
    let Some(series) = groups.first() else {
        return Err(MountError::InvalidData("pie chart needs one series".to_owned()));
    };
    ensure_finite(series.data.iter().map(|point| point.value), "pie values")?;
    if series.data.iter().any(|point| point.value < 0.0) {
        return Err(MountError::InvalidData("pie values must be >= 0".to_owned()));
    }
    let total: f64 = series.data.iter().map(|point| point.value).sum();
    if total <= 0.0 {
        return Err(MountError::InvalidData("pie values must not sum to zero".to_owned()));
    }

    let show_share = config.option_bool("tooltipVisible").unwrap_or(true);
    let plot = PlotArea::for_size(config.size);
    let legend_height = (LABEL_FONT_PX + 4.0) * series.data.len() as f64;
    let radius = (plot.width.min(plot.height - legend_height) / 2.0).max(4.0);
    let (cx, cy) = (plot.left + plot.width / 2.0, plot.top + radius);

    let mut frame = base_frame(config);
    let mut start = -TAU / 4.0;
    for (index, point) in series.data.iter().enumerate() {
        let sweep = TAU * point.value / total;
        let color = color_at(config, index);
        let segments = ((sweep / TAU) * ARC_SEGMENTS_PER_TURN).ceil().max(1.0) as usize;
        let at = |angle: f64| (cx + radius * angle.cos(), cy + radius * angle.sin());

        let (x0, y0) = at(start);
        frame = frame.with_line(LinePrimitive::new(cx, cy, x0, y0, 1.0, color));
        for segment in 0..segments {
            let a1 = start + sweep * segment as f64 / segments as f64;
            let a2 = start + sweep * (segment + 1) as f64 / segments as f64;
            let ((x1, y1), (x2, y2)) = (at(a1), at(a2));
            frame = frame.with_line(LinePrimitive::new(x1, y1, x2, y2, 2.0, color));
        }

        let legend_y = cy + radius + MARGIN_PX + (LABEL_FONT_PX + 4.0) * index as f64;
        frame = frame.with_rect(RectPrimitive::new(
            plot.left,
            legend_y - LEGEND_SWATCH_PX,
            LEGEND_SWATCH_PX,
            LEGEND_SWATCH_PX,
            color,
        ));
        let entry = if show_share {
            format!("{} {:.0}%", point.label, 100.0 * point.value / total)
        } else {
            point.label.clone()
        };
        if let Some(text) = label(&entry, plot.left + LEGEND_SWATCH_PX + 4.0, legend_y, TextHAlign::Left) {
            frame = frame.with_text(text);
        }
        start += sweep;
    }

    present(container, config, frame)
}
