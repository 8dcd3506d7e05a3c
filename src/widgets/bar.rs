use indexmap::IndexSet;

use crate::api::{Widget, WidgetConfig};
use crate::error::{MountError, MountResult};
use crate::host::Container;
use crate::render::{LinePrimitive, RectPrimitive, TextHAlign};

use super::{PlotArea, SeriesGroup, TEXT_COLOR, base_frame, color_at, ensure_finite, label, parse_data, present};

/// Grouped vertical bars: one group per label, one bar per series.
pub fn create_bar(container: &mut dyn Container, config: &WidgetConfig) -> MountResult<Box<dyn Widget>> {
    let groups: Vec<SeriesGroup> = parse_data(config)?;
    if groups.iter().all(|group| group.data.is_empty()) {
        return Err(MountError::InvalidData("bar chart needs at least one value".to_owned()));
    }
    let values = groups.iter().flat_map(|group| group.data.iter().map(|point| point.value));
    ensure_finite(values.clone(), "bar values")?;
    if values.clone().any(|value| value < 0.0) {
        return Err(MountError::InvalidData("bar values must be >= 0".to_owned()));
    }
    let max = values.fold(0.0_f64, f64::max).max(f64::EPSILON);

    let labels: IndexSet<&str> = groups
        .iter()
        .flat_map(|group| group.data.iter().map(|point| point.label.as_str()))
        .collect();
    let plot = PlotArea::for_size(config.size);
    let group_width = plot.width / labels.len() as f64;
    let bar_width = group_width * 0.8 / groups.len() as f64;

    let mut frame = base_frame(config).with_line(LinePrimitive::new(
        plot.left,
        plot.bottom(),
        plot.left + plot.width,
        plot.bottom(),
        1.0,
        TEXT_COLOR,
    ));
    for (label_index, name) in labels.iter().enumerate() {
        let group_left = plot.left + group_width * label_index as f64 + group_width * 0.1;
        for (series_index, group) in groups.iter().enumerate() {
            let Some(point) = group.data.iter().find(|point| point.label == *name) else {
                continue;
            };
            let height = plot.height * point.value / max;
            frame = frame.with_rect(RectPrimitive::new(
                group_left + bar_width * series_index as f64,
                plot.bottom() - height,
                bar_width,
                height,
                color_at(config, series_index),
            ));
        }
        if let Some(text) = label(
            name,
            group_left + group_width * 0.4,
            plot.bottom() + super::LABEL_FONT_PX + 2.0,
            TextHAlign::Center,
        ) {
            frame = frame.with_text(text);
        }
    }

    present(container, config, frame)
}
