use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{ChartSpec, SizeObservation};
use crate::error::{MountError, MountResult};
use crate::host::{Catalog, Container, Translator, WindowEvents, interpolate};

use super::{
    ChartTypeRegistry, ChartVariant, FailureGuard, LifecycleConfig, ObservationSource, SizeTracker,
    VariantKind, Widget,
};

/// Coarse manager state. `Unmounted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleState {
    Empty,
    Mounted,
    Unmounted,
}

impl LifecycleState {
    const fn describe(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Mounted => "mounted",
            Self::Unmounted => "unmounted",
        }
    }
}

/// Why no widget is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaceholderReason {
    UnknownChartType,
    ConstructionFailed,
    Preview,
}

/// What the container displays after a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MountOutcome {
    Widget,
    Placeholder(PlaceholderReason),
}

/// Owned slot for the single live widget of a container.
#[derive(Default)]
struct WidgetSlot {
    instance: Option<Box<dyn Widget>>,
}

impl WidgetSlot {
    /// Clears the container, then drops the previous widget.
    fn release<C: Container + ?Sized>(&mut self, container: &mut C) {
        container.clear();
        if let Some(widget) = self.instance.take() {
            trace!(chart_id = %widget.chart_id(), "widget released");
        }
    }

    fn install(&mut self, widget: Box<dyn Widget>) {
        debug_assert!(self.instance.is_none(), "slot must be released first");
        self.instance = Some(widget);
    }

    fn is_occupied(&self) -> bool {
        self.instance.is_some()
    }

    fn get(&self) -> Option<&dyn Widget> {
        self.instance.as_deref()
    }
}

struct Mounted<'a, C: Container> {
    container: &'a mut C,
    window: Option<&'a mut dyn WindowEvents>,
    spec: ChartSpec,
    slot: WidgetSlot,
    tracker: Option<SizeTracker>,
    applied: Option<SizeObservation>,
    outcome: MountOutcome,
}

impl<C: Container> Mounted<'_, C> {
    fn detach_tracker(&mut self) {
        if let Some(mut tracker) = self.tracker.take() {
            tracker.unobserve(&mut *self.container, self.window.as_deref_mut());
        }
    }
}

enum Phase<'a, C: Container> {
    Empty,
    Mounted(Mounted<'a, C>),
    Unmounted,
}

/// Owns the widget rendered into one borrowed container.
///
/// Every size or spec change is applied by full recreation: the container is
/// cleared and the old widget dropped before the factory runs again, so at
/// most one widget is ever live. Size notifications are only consumed through
/// [`pump`](Self::pump), which does nothing once the manager left `Mounted`.
pub struct WidgetLifecycleManager<'a, C: Container> {
    registry: Arc<ChartTypeRegistry>,
    guard: FailureGuard,
    translator: Arc<dyn Translator + Send + Sync>,
    config: LifecycleConfig,
    phase: Phase<'a, C>,
    recreations: u64,
}

impl<'a, C: Container> WidgetLifecycleManager<'a, C> {
    #[must_use]
    pub fn new(registry: Arc<ChartTypeRegistry>, guard: FailureGuard) -> Self {
        Self {
            registry,
            guard,
            translator: Arc::new(Catalog::english()),
            config: LifecycleConfig::default(),
            phase: Phase::Empty,
            recreations: 0,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: LifecycleConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_translator(mut self, translator: Arc<dyn Translator + Send + Sync>) -> Self {
        self.translator = translator;
        self
    }

    #[must_use]
    pub fn state(&self) -> LifecycleState {
        match self.phase {
            Phase::Empty => LifecycleState::Empty,
            Phase::Mounted(_) => LifecycleState::Mounted,
            Phase::Unmounted => LifecycleState::Unmounted,
        }
    }

    #[must_use]
    pub fn config(&self) -> LifecycleConfig {
        self.config
    }

    /// Number of recreations since mount (the initial build is not counted).
    #[must_use]
    pub fn recreations(&self) -> u64 {
        self.recreations
    }

    #[must_use]
    pub fn spec(&self) -> Option<&ChartSpec> {
        match &self.phase {
            Phase::Mounted(mounted) => Some(&mounted.spec),
            _ => None,
        }
    }

    #[must_use]
    pub fn outcome(&self) -> Option<MountOutcome> {
        match &self.phase {
            Phase::Mounted(mounted) => Some(mounted.outcome),
            _ => None,
        }
    }

    /// Size the current widget (or last failed attempt) was built with.
    #[must_use]
    pub fn applied_size(&self) -> Option<SizeObservation> {
        match &self.phase {
            Phase::Mounted(mounted) => mounted.applied,
            _ => None,
        }
    }

    #[must_use]
    pub fn has_widget(&self) -> bool {
        matches!(&self.phase, Phase::Mounted(mounted) if mounted.slot.is_occupied())
    }

    #[must_use]
    pub fn widget(&self) -> Option<&dyn Widget> {
        match &self.phase {
            Phase::Mounted(mounted) => mounted.slot.get(),
            _ => None,
        }
    }

    #[must_use]
    pub fn observation(&self) -> ObservationSource {
        match &self.phase {
            Phase::Mounted(mounted) => mounted
                .tracker
                .as_ref()
                .map_or(ObservationSource::None, SizeTracker::source),
            _ => ObservationSource::None,
        }
    }

    /// Borrowed container while mounted.
    #[must_use]
    pub fn container(&self) -> Option<&C> {
        match &self.phase {
            Phase::Mounted(mounted) => Some(&*mounted.container),
            _ => None,
        }
    }

    pub fn mount(&mut self, container: &'a mut C, spec: ChartSpec) -> MountResult<MountOutcome> {
        self.mount_inner(container, None, spec)
    }

    /// Mounts with a window to fall back on when the container cannot be observed.
    pub fn mount_with_window(
        &mut self,
        container: &'a mut C,
        window: &'a mut dyn WindowEvents,
        spec: ChartSpec,
    ) -> MountResult<MountOutcome> {
        self.mount_inner(container, Some(window), spec)
    }

    fn mount_inner(
        &mut self,
        container: &'a mut C,
        window: Option<&'a mut dyn WindowEvents>,
        spec: ChartSpec,
    ) -> MountResult<MountOutcome> {
        let state = self.state();
        if state != LifecycleState::Empty {
            return Err(MountError::InvalidState {
                operation: "mount",
                state: state.describe(),
            });
        }

        debug!(chart_id = %spec.chart_id, title = %spec.title, "mount chart");
        container.clear();
        let mut mounted = Mounted {
            container,
            window,
            spec,
            slot: WidgetSlot::default(),
            tracker: None,
            applied: None,
            outcome: MountOutcome::Placeholder(PlaceholderReason::UnknownChartType),
        };
        self.attach_variant(&mut mounted);
        let outcome = mounted.outcome;
        self.phase = Phase::Mounted(mounted);
        Ok(outcome)
    }

    /// Applies a new spec. Returns `None` when nothing was re-rendered.
    ///
    /// A different chart id swaps the variant and its size subscription; any
    /// other difference recreates the widget once with the same variant.
    pub fn update(&mut self, spec: ChartSpec) -> Option<MountOutcome> {
        let mut mounted = match std::mem::replace(&mut self.phase, Phase::Empty) {
            Phase::Mounted(mounted) => mounted,
            other => {
                self.phase = other;
                debug!(chart_id = %spec.chart_id, "update ignored; manager not mounted");
                return None;
            }
        };
        if mounted.spec == spec {
            trace!(chart_id = %spec.chart_id, "update ignored; spec unchanged");
            self.phase = Phase::Mounted(mounted);
            return None;
        }

        let type_changed = mounted.spec.chart_id != spec.chart_id;
        let hint_changed = mounted.spec.style.size_hint != spec.style.size_hint;
        debug!(
            from = %mounted.spec.chart_id,
            to = %spec.chart_id,
            type_changed,
            "update chart spec"
        );
        mounted.spec = spec;

        if type_changed {
            mounted.detach_tracker();
            self.attach_variant(&mut mounted);
        } else {
            if hint_changed {
                if let Some(tracker) = mounted.tracker.as_mut() {
                    tracker.set_hint(mounted.spec.style.size_hint);
                }
            }
            self.render(&mut mounted, None);
        }
        self.recreations += 1;
        let outcome = mounted.outcome;
        self.phase = Phase::Mounted(mounted);
        Some(outcome)
    }

    /// Consumes queued size notifications. Returns `true` when the widget was recreated.
    ///
    /// Settled sizes equal to the applied size are dropped; notifications that
    /// arrive after `unmount` are ignored.
    pub fn pump(&mut self, now: Instant) -> bool {
        let Phase::Mounted(mounted) = &mut self.phase else {
            return false;
        };
        let Some(tracker) = mounted.tracker.as_mut() else {
            return false;
        };
        let Some(size) = tracker.poll(&*mounted.container, now) else {
            return false;
        };
        if mounted.applied == Some(size) {
            trace!(
                width = size.width,
                height = size.height,
                "resize suppressed; clamped size unchanged"
            );
            return false;
        }

        debug!(
            chart_id = %mounted.spec.chart_id,
            width = size.width,
            height = size.height,
            "recreate chart for new size"
        );
        let Phase::Mounted(mut mounted) = std::mem::replace(&mut self.phase, Phase::Empty) else {
            return false;
        };
        self.render(&mut mounted, Some(size));
        self.recreations += 1;
        self.phase = Phase::Mounted(mounted);
        true
    }

    /// When the next pending resize burst settles.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match &self.phase {
            Phase::Mounted(mounted) => mounted.tracker.as_ref().and_then(SizeTracker::next_deadline),
            _ => None,
        }
    }

    /// Detaches size tracking, clears the container and drops the widget.
    ///
    /// Idempotent: a second call, or a call before `mount`, does nothing.
    pub fn unmount(&mut self) {
        match std::mem::replace(&mut self.phase, Phase::Unmounted) {
            Phase::Mounted(mut mounted) => {
                debug!(chart_id = %mounted.spec.chart_id, "unmount chart");
                mounted.detach_tracker();
                mounted.slot.release(&mut *mounted.container);
            }
            Phase::Empty => {
                trace!("unmount before mount ignored");
                self.phase = Phase::Empty;
            }
            Phase::Unmounted => trace!("unmount ignored; already unmounted"),
        }
    }

    /// Resolves the chart's variant, subscribes to size changes when the variant
    /// is responsive, and renders.
    fn attach_variant(&self, mounted: &mut Mounted<'a, C>) {
        let Some(variant) = self.registry.resolve(&mounted.spec.chart_id) else {
            warn!(chart_id = %mounted.spec.chart_id, "unknown chart type; showing title only");
            self.render_unknown(mounted);
            return;
        };

        if let VariantKind::Widget(_) = variant.kind {
            if variant.policy.is_responsive() {
                let mut tracker = SizeTracker::new(
                    variant.policy,
                    mounted.spec.style.size_hint,
                    self.config.debounce(),
                );
                tracker.observe(
                    &mut *mounted.container,
                    mounted.window.as_deref_mut(),
                    self.config.observation,
                );
                mounted.tracker = Some(tracker);
            }
        }
        self.render_variant(mounted, variant, None);
    }

    fn render(&self, mounted: &mut Mounted<'a, C>, size: Option<SizeObservation>) {
        match self.registry.resolve(&mounted.spec.chart_id) {
            Some(variant) => self.render_variant(mounted, variant, size),
            None => self.render_unknown(mounted),
        }
    }

    fn render_unknown(&self, mounted: &mut Mounted<'a, C>) {
        mounted.slot.release(&mut *mounted.container);
        mounted.container.show_placeholder(&mounted.spec.title);
        mounted.applied = None;
        mounted.outcome = MountOutcome::Placeholder(PlaceholderReason::UnknownChartType);
    }

    fn render_variant(
        &self,
        mounted: &mut Mounted<'a, C>,
        variant: &ChartVariant,
        size: Option<SizeObservation>,
    ) {
        match &variant.kind {
            VariantKind::Preview { message_key } => {
                mounted.slot.release(&mut *mounted.container);
                let text = interpolate(
                    &self.translator.t(message_key),
                    &[("title", mounted.spec.title.as_str())],
                );
                mounted.container.show_placeholder(&text);
                mounted.applied = None;
                mounted.outcome = MountOutcome::Placeholder(PlaceholderReason::Preview);
            }
            VariantKind::Widget(factory) => {
                let size = size.unwrap_or_else(|| match &mounted.tracker {
                    Some(tracker) => tracker.measure(&*mounted.container),
                    None => variant
                        .policy
                        .resolve(mounted.container.measure(), mounted.spec.style.size_hint),
                });
                let config = variant.build_config(&mounted.spec, size);
                mounted.slot.release(&mut *mounted.container);
                mounted.applied = Some(size);
                match self
                    .guard
                    .safe_create(factory.as_ref(), &mut *mounted.container, &config)
                {
                    Ok(widget) => {
                        mounted.slot.install(widget);
                        mounted.outcome = MountOutcome::Widget;
                    }
                    Err(event) => {
                        debug!(chart_id = %event.chart_id, "widget replaced by placeholder");
                        mounted.outcome =
                            MountOutcome::Placeholder(PlaceholderReason::ConstructionFailed);
                    }
                }
            }
        }
    }
}

impl<C: Container> Drop for WidgetLifecycleManager<'_, C> {
    fn drop(&mut self) {
        self.unmount();
    }
}
