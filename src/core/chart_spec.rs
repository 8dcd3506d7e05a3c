use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{Color, SizeHint};

/// Identifier selecting a chart variant in the registry.
///
/// Identifiers are open-ended strings so unknown ids from the host can be
/// represented and degrade to a placeholder instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartId(Cow<'static, str>);

impl ChartId {
    pub const BAR: Self = Self(Cow::Borrowed("bar"));
    pub const LINE: Self = Self(Cow::Borrowed("line"));
    pub const PIE: Self = Self(Cow::Borrowed("pie"));
    pub const WORLD: Self = Self(Cow::Borrowed("world"));
    pub const BULLET: Self = Self(Cow::Borrowed("bullet"));
    pub const GET_STARTED: Self = Self(Cow::Borrowed("get-started"));

    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChartId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Map region rendered by map-style charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapRegion {
    Tr,
    Eu,
    #[default]
    Uk,
}

impl MapRegion {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Tr => "tr",
            Self::Eu => "eu",
            Self::Uk => "uk",
        }
    }

    /// Translation key for the region switch label.
    #[must_use]
    pub const fn label_key(self) -> &'static str {
        match self {
            Self::Tr => "getStarted.mapRegions.turkey",
            Self::Eu => "getStarted.mapRegions.europe",
            Self::Uk => "getStarted.mapRegions.uk",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartStyle {
    #[serde(default)]
    pub colors: SmallVec<[Color; 4]>,
    #[serde(flatten)]
    pub size_hint: SizeHint,
}

/// Everything the lifecycle manager needs to render one chart.
///
/// Immutable for a render cycle; hosts hand a new value to
/// `WidgetLifecycleManager::update` to change anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub chart_id: ChartId,
    pub title: String,
    /// Series payload; `None` keeps the variant's default data.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub style: ChartStyle,
    #[serde(default)]
    pub region: Option<MapRegion>,
}

impl ChartSpec {
    #[must_use]
    pub fn new(chart_id: impl Into<ChartId>, title: impl Into<String>) -> Self {
        Self {
            chart_id: chart_id.into(),
            title: title.into(),
            data: None,
            style: ChartStyle::default(),
            region: None,
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    #[must_use]
    pub fn with_colors(mut self, colors: impl IntoIterator<Item = Color>) -> Self {
        self.style.colors = colors.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_size_hint(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        self.style.size_hint = SizeHint { width, height };
        self
    }

    #[must_use]
    pub fn with_region(mut self, region: MapRegion) -> Self {
        self.region = Some(region);
        self
    }
}
