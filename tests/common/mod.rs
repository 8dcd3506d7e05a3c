#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

use chart_mount::api::{ChartTypeRegistry, ChartVariant, Widget, WidgetConfig, WidgetFactory};
use chart_mount::core::{ChartId, ClampBounds, Color, SizeObservation, SizePolicy};
use chart_mount::host::Container;
use chart_mount::render::{RectPrimitive, RenderFrame};
use chart_mount::{MountError, MountResult};

pub const COUNTED: &str = "counted";
pub const COUNTED_FIXED: &str = "counted-fixed";
pub const COUNTED_TWIN: &str = "counted-twin";

/// Tracks widget construction and how many widgets are alive at once.
#[derive(Debug, Default)]
pub struct Counters {
    pub live: AtomicI64,
    pub max_live: AtomicI64,
    pub created: AtomicUsize,
    pub fail: AtomicBool,
    pub panic: AtomicBool,
    pub last_size: std::sync::Mutex<Option<SizeObservation>>,
}

impl Counters {
    pub fn live(&self) -> i64 {
        self.live.load(Ordering::SeqCst)
    }

    pub fn max_live(&self) -> i64 {
        self.max_live.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn last_size(&self) -> Option<SizeObservation> {
        *self.last_size.lock().expect("size lock")
    }
}

struct CountedWidget {
    chart_id: ChartId,
    size: SizeObservation,
    counters: Arc<Counters>,
}

impl Widget for CountedWidget {
    fn chart_id(&self) -> &ChartId {
        &self.chart_id
    }

    fn size(&self) -> SizeObservation {
        self.size
    }
}

impl Drop for CountedWidget {
    fn drop(&mut self) {
        self.counters.live.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct CountingFactory {
    pub counters: Arc<Counters>,
}

impl WidgetFactory for CountingFactory {
    fn create(
        &self,
        container: &mut dyn Container,
        config: &WidgetConfig,
    ) -> MountResult<Box<dyn Widget>> {
        if self.counters.panic.load(Ordering::SeqCst) {
            panic!("counting factory asked to panic");
        }
        if self.counters.fail.load(Ordering::SeqCst) {
            return Err(MountError::WidgetConstruction {
                chart_id: config.chart_id.to_string(),
                reason: "counting factory asked to fail".to_owned(),
            });
        }
        container.present(RenderFrame::new(config.size).with_rect(RectPrimitive::new(
            0.0,
            0.0,
            f64::from(config.size.width),
            f64::from(config.size.height),
            Color::rgb(0.1, 0.4, 0.8),
        )));
        let live = self.counters.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_live.fetch_max(live, Ordering::SeqCst);
        self.counters.created.fetch_add(1, Ordering::SeqCst);
        *self.counters.last_size.lock().expect("size lock") = Some(config.size);
        Ok(Box::new(CountedWidget {
            chart_id: config.chart_id.clone(),
            size: config.size,
            counters: Arc::clone(&self.counters),
        }))
    }
}

pub fn bar_bounds() -> ClampBounds {
    ClampBounds::new(300, 700, 200, 320).expect("bar bounds")
}

/// Built-in registry plus two responsive counting variants sharing bar bounds
/// and one fixed counting variant.
pub fn counting_registry() -> (Arc<ChartTypeRegistry>, Arc<Counters>) {
    let counters = Arc::new(Counters::default());
    let mut registry = ChartTypeRegistry::with_builtin();
    registry
        .register(ChartVariant::widget(
            ChartId::new(COUNTED),
            SizePolicy::Responsive {
                bounds: bar_bounds(),
                height_from_width: None,
            },
            CountingFactory {
                counters: Arc::clone(&counters),
            },
        ))
        .expect("register counted");
    registry
        .register(ChartVariant::widget(
            ChartId::new(COUNTED_TWIN),
            SizePolicy::Responsive {
                bounds: bar_bounds(),
                height_from_width: None,
            },
            CountingFactory {
                counters: Arc::clone(&counters),
            },
        ))
        .expect("register counted-twin");
    registry
        .register(ChartVariant::widget(
            ChartId::new(COUNTED_FIXED),
            SizePolicy::Fixed {
                width: 400,
                height: 300,
            },
            CountingFactory {
                counters: Arc::clone(&counters),
            },
        ))
        .expect("register counted-fixed");
    (Arc::new(registry), counters)
}
