use indexmap::IndexSet;

use crate::api::{Widget, WidgetConfig};
use crate::error::{MountError, MountResult};
use crate::host::Container;
use crate::render::{LinePrimitive, RectPrimitive, TextHAlign};

use super::{
    LABEL_FONT_PX, PlotArea, SeriesGroup, TEXT_COLOR, base_frame, color_at, ensure_finite, label,
    parse_data, present,
};

const POINT_RADIUS_PX: f64 = 2.5;

/// One polyline per series across the shared label axis.
pub fn create_line(container: &mut dyn Container, config: &WidgetConfig) -> MountResult<Box<dyn Widget>> {
    let groups: Vec<SeriesGroup> = parse_data(config)?;
    let labels: IndexSet<&str> = groups
        .iter()
        .flat_map(|group| group.data.iter().map(|point| point.label.as_str()))
        .collect();
    if labels.is_empty() {
        return Err(MountError::InvalidData("line chart needs at least one value".to_owned()));
    }
    let values = groups.iter().flat_map(|group| group.data.iter().map(|point| point.value));
    ensure_finite(values.clone(), "line values")?;
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), value| {
        (lo.min(value), hi.max(value))
    });
    let min = min.min(0.0);
    let span = (max - min).max(f64::EPSILON);

    let plot = PlotArea::for_size(config.size);
    let step = if labels.len() > 1 {
        plot.width / (labels.len() - 1) as f64
    } else {
        0.0
    };
    let x_at = |index: usize| {
        if labels.len() > 1 {
            plot.left + step * index as f64
        } else {
            plot.left + plot.width / 2.0
        }
    };
    let y_at = |value: f64| plot.bottom() - plot.height * (value - min) / span;

    let mut frame = base_frame(config).with_line(LinePrimitive::new(
        plot.left,
        plot.bottom(),
        plot.left + plot.width,
        plot.bottom(),
        1.0,
        TEXT_COLOR,
    ));
    for (series_index, group) in groups.iter().enumerate() {
        let color = color_at(config, series_index);
        let points: Vec<(f64, f64)> = labels
            .iter()
            .enumerate()
            .filter_map(|(index, name)| {
                group
                    .data
                    .iter()
                    .find(|point| point.label == *name)
                    .map(|point| (x_at(index), y_at(point.value)))
            })
            .collect();
        for pair in points.windows(2) {
            let ((x1, y1), (x2, y2)) = (pair[0], pair[1]);
            frame = frame.with_line(LinePrimitive::new(x1, y1, x2, y2, 2.0, color));
        }
        for (x, y) in points {
            frame = frame.with_rect(RectPrimitive::new(
                x - POINT_RADIUS_PX,
                y - POINT_RADIUS_PX,
                POINT_RADIUS_PX * 2.0,
                POINT_RADIUS_PX * 2.0,
                color,
            ));
        }
    }
    for (index, name) in labels.iter().enumerate() {
        if let Some(text) = label(name, x_at(index), plot.bottom() + LABEL_FONT_PX + 2.0, TextHAlign::Center) {
            frame = frame.with_text(text);
        }
    }

    present(container, config, frame)
}
