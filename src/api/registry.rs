use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::{ChartId, ChartSpec, Color, MapRegion, SizeObservation, SizePolicy};
use crate::error::{MountError, MountResult};
use crate::host::Container;

use super::RegistryOverrides;

/// Opaque handle to a rendered widget.
///
/// Widgets have no dispose primitive: dropping the handle after the container
/// was cleared releases everything.
pub trait Widget {
    fn chart_id(&self) -> &ChartId;
    fn size(&self) -> SizeObservation;

    /// Rejects handles that came back from a factory in an unusable state.
    fn validate(&self) -> MountResult<()> {
        Ok(())
    }
}

/// Constructor for one chart type, rendering into the given container.
pub trait WidgetFactory: Send + Sync {
    fn create(
        &self,
        container: &mut dyn Container,
        config: &WidgetConfig,
    ) -> MountResult<Box<dyn Widget>>;
}

impl<F> WidgetFactory for F
where
    F: Fn(&mut dyn Container, &WidgetConfig) -> MountResult<Box<dyn Widget>> + Send + Sync,
{
    fn create(
        &self,
        container: &mut dyn Container,
        config: &WidgetConfig,
    ) -> MountResult<Box<dyn Widget>> {
        self(container, config)
    }
}

/// Fully resolved options handed to a factory.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    pub chart_id: ChartId,
    pub title: String,
    pub size: SizeObservation,
    pub data: Value,
    pub colors: SmallVec<[Color; 4]>,
    pub region: Option<MapRegion>,
    pub responsive: bool,
    /// Extra library options such as `tooltipVisible`.
    pub options: Map<String, Value>,
}

impl WidgetConfig {
    #[must_use]
    pub fn option_bool(&self, key: &str) -> Option<bool> {
        self.options.get(key).and_then(Value::as_bool)
    }
}

/// Per-variant defaults a `ChartSpec` is merged onto.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VariantDefaults {
    pub data: Value,
    pub colors: SmallVec<[Color; 4]>,
    pub region: Option<MapRegion>,
    pub options: Map<String, Value>,
}

#[derive(Clone)]
pub enum VariantKind {
    /// Backed by a widget factory.
    Widget(Arc<dyn WidgetFactory>),
    /// Never builds a widget; shows translated text keyed by `message_key`.
    Preview { message_key: String },
}

impl fmt::Debug for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Widget(_) => f.write_str("Widget(..)"),
            Self::Preview { message_key } => f
                .debug_struct("Preview")
                .field("message_key", message_key)
                .finish(),
        }
    }
}

/// Tagged registry entry pairing a chart type with its factory and size policy.
#[derive(Debug, Clone)]
pub struct ChartVariant {
    pub id: ChartId,
    pub kind: VariantKind,
    pub policy: SizePolicy,
    pub defaults: VariantDefaults,
}

impl ChartVariant {
    #[must_use]
    pub fn widget(id: ChartId, policy: SizePolicy, factory: impl WidgetFactory + 'static) -> Self {
        Self {
            id,
            kind: VariantKind::Widget(Arc::new(factory)),
            policy,
            defaults: VariantDefaults::default(),
        }
    }

    #[must_use]
    pub fn preview(id: ChartId, message_key: impl Into<String>) -> Self {
        Self {
            id,
            kind: VariantKind::Preview {
                message_key: message_key.into(),
            },
            policy: SizePolicy::Fixed {
                width: 1,
                height: 1,
            },
            defaults: VariantDefaults::default(),
        }
    }

    #[must_use]
    pub fn with_defaults(mut self, defaults: VariantDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    #[must_use]
    pub fn is_preview(&self) -> bool {
        matches!(self.kind, VariantKind::Preview { .. })
    }

    /// Merges `spec` over the variant defaults for a widget of `size`.
    #[must_use]
    pub fn build_config(&self, spec: &ChartSpec, size: SizeObservation) -> WidgetConfig {
        let colors = if spec.style.colors.is_empty() {
            self.defaults.colors.clone()
        } else {
            spec.style.colors.clone()
        };
        WidgetConfig {
            chart_id: self.id.clone(),
            title: spec.title.clone(),
            size,
            data: spec
                .data
                .clone()
                .unwrap_or_else(|| self.defaults.data.clone()),
            colors,
            region: spec.region.or(self.defaults.region),
            responsive: self.policy.is_responsive(),
            options: self.defaults.options.clone(),
        }
    }
}

/// Lookup table from chart id to variant. Immutable once shared.
#[derive(Debug, Clone, Default)]
pub struct ChartTypeRegistry {
    variants: IndexMap<ChartId, ChartVariant>,
}

impl ChartTypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in demo widget kit.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for variant in crate::widgets::builtin_variants() {
            registry.variants.insert(variant.id.clone(), variant);
        }
        registry
    }

    pub fn register(&mut self, variant: ChartVariant) -> MountResult<()> {
        if variant.id.as_str().is_empty() {
            return Err(MountError::InvalidConfig(
                "chart id must not be empty".to_owned(),
            ));
        }
        if self.variants.contains_key(&variant.id) {
            return Err(MountError::DuplicateChartType(variant.id.to_string()));
        }
        variant.policy.validate()?;
        debug!(chart_id = %variant.id, "register chart variant");
        self.variants.insert(variant.id.clone(), variant);
        Ok(())
    }

    /// Replaces size policies. Every overridden id must already be registered.
    pub fn apply_overrides(&mut self, overrides: &RegistryOverrides) -> MountResult<()> {
        for (chart_id, policy) in &overrides.policies {
            policy.validate()?;
            if !self.variants.contains_key(chart_id) {
                return Err(MountError::InvalidConfig(format!(
                    "override targets unknown chart type `{chart_id}`"
                )));
            }
        }
        for (chart_id, policy) in &overrides.policies {
            if let Some(variant) = self.variants.get_mut(chart_id) {
                variant.policy = *policy;
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn resolve(&self, chart_id: &ChartId) -> Option<&ChartVariant> {
        self.variants.get(chart_id)
    }

    #[must_use]
    pub fn contains(&self, chart_id: &ChartId) -> bool {
        self.variants.contains_key(chart_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ChartId> {
        self.variants.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ClampBounds;

    #[test]
    fn builtin_registry_exposes_page_charts() {
        let registry = ChartTypeRegistry::with_builtin();
        let ids: Vec<&str> = registry.ids().map(ChartId::as_str).collect();
        assert_eq!(ids, ["bar", "line", "pie", "world", "bullet", "get-started"]);
        assert!(registry.resolve(&ChartId::new("unknown-x")).is_none());
        assert!(
            registry
                .resolve(&ChartId::GET_STARTED)
                .is_some_and(ChartVariant::is_preview)
        );
    }

    #[test]
    fn register_rejects_duplicates_and_empty_ids() {
        let mut registry = ChartTypeRegistry::with_builtin();
        let err = registry
            .register(ChartVariant::preview(ChartId::BAR, "x"))
            .expect_err("duplicate");
        assert_eq!(err, MountError::DuplicateChartType("bar".to_owned()));
        assert!(
            registry
                .register(ChartVariant::preview(ChartId::new(""), "x"))
                .is_err()
        );
    }

    #[test]
    fn overrides_must_target_known_ids() {
        let mut registry = ChartTypeRegistry::with_builtin();
        let policy = SizePolicy::Responsive {
            bounds: ClampBounds::new(100, 200, 100, 200).expect("bounds"),
            height_from_width: None,
        };
        let unknown = RegistryOverrides::default().with_policy(ChartId::new("radar"), policy);
        assert!(registry.apply_overrides(&unknown).is_err());

        let known = RegistryOverrides::default().with_policy(ChartId::PIE, policy);
        registry.apply_overrides(&known).expect("override");
        assert_eq!(
            registry.resolve(&ChartId::PIE).map(|variant| variant.policy),
            Some(policy)
        );
    }

    #[test]
    fn build_config_prefers_spec_values() {
        let registry = ChartTypeRegistry::with_builtin();
        let variant = registry.resolve(&ChartId::WORLD).expect("world");
        let spec = ChartSpec::new(ChartId::WORLD, "Map").with_region(MapRegion::Tr);
        let config = variant.build_config(&spec, SizeObservation::new(640, 384));
        assert_eq!(config.region, Some(MapRegion::Tr));
        assert!(config.responsive);

        let spec = ChartSpec::new(ChartId::WORLD, "Map");
        let config = variant.build_config(&spec, SizeObservation::new(640, 384));
        assert_eq!(config.region, Some(MapRegion::Uk));
    }
}
