use serde::{Deserialize, Serialize};

use crate::error::{MountError, MountResult};

/// Unclamped container measurement as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawSize {
    pub width: f64,
    pub height: f64,
}

impl RawSize {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Clamped size a widget is (or will be) built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SizeObservation {
    pub width: u32,
    pub height: u32,
}

impl SizeObservation {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Inclusive per-axis range a measurement is clamped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClampBounds {
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
}

impl ClampBounds {
    pub fn new(min_width: u32, max_width: u32, min_height: u32, max_height: u32) -> MountResult<Self> {
        let bounds = Self {
            min_width,
            max_width,
            min_height,
            max_height,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(self) -> MountResult<()> {
        if self.min_width == 0 || self.min_height == 0 {
            return Err(MountError::InvalidConfig(
                "clamp bounds minimums must be > 0".to_owned(),
            ));
        }
        if self.min_width > self.max_width || self.min_height > self.max_height {
            return Err(MountError::InvalidConfig(format!(
                "clamp bounds must satisfy min <= max (width {}..{}, height {}..{})",
                self.min_width, self.max_width, self.min_height, self.max_height
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn contains(self, size: SizeObservation) -> bool {
        (self.min_width..=self.max_width).contains(&size.width)
            && (self.min_height..=self.max_height).contains(&size.height)
    }

    /// Rounds and clamps a raw measurement. Non-finite or negative values count as zero.
    #[must_use]
    pub fn clamp(self, raw: RawSize) -> SizeObservation {
        SizeObservation {
            width: clamp_axis(raw.width, self.min_width, self.max_width),
            height: clamp_axis(raw.height, self.min_height, self.max_height),
        }
    }
}

fn clamp_axis(raw: f64, min: u32, max: u32) -> u32 {
    let rounded = if raw.is_finite() && raw > 0.0 {
        raw.round()
    } else {
        0.0
    };
    // f64 -> u32 casts saturate, so oversized measurements land on `max`.
    (rounded as u32).clamp(min, max)
}

/// How a chart variant derives its widget size from the container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SizePolicy {
    /// Constant size; the variant never subscribes to size changes.
    Fixed { width: u32, height: u32 },
    /// Follows the container, clamped into `bounds`.
    Responsive {
        bounds: ClampBounds,
        /// Substitutes `round(width * ratio)` when the container reports no height.
        #[serde(default)]
        height_from_width: Option<f64>,
    },
}

impl SizePolicy {
    pub fn validate(self) -> MountResult<()> {
        match self {
            Self::Fixed { width, height } => {
                if width == 0 || height == 0 {
                    return Err(MountError::InvalidSize { width, height });
                }
                Ok(())
            }
            Self::Responsive {
                bounds,
                height_from_width,
            } => {
                bounds.validate()?;
                if let Some(ratio) = height_from_width {
                    if !ratio.is_finite() || ratio <= 0.0 {
                        return Err(MountError::InvalidConfig(
                            "height_from_width ratio must be finite and > 0".to_owned(),
                        ));
                    }
                }
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn is_responsive(self) -> bool {
        matches!(self, Self::Responsive { .. })
    }

    /// Resolves the widget size for a raw measurement.
    ///
    /// `hint` replaces a zero (or missing) raw axis before clamping; fixed
    /// policies use the hint directly when present.
    #[must_use]
    pub fn resolve(self, raw: RawSize, hint: SizeHint) -> SizeObservation {
        match self {
            Self::Fixed { width, height } => SizeObservation::new(
                hint.width.filter(|w| *w > 0).unwrap_or(width),
                hint.height.filter(|h| *h > 0).unwrap_or(height),
            ),
            Self::Responsive {
                bounds,
                height_from_width,
            } => {
                let mut effective = raw;
                if !(effective.width > 0.0) {
                    if let Some(width) = hint.width {
                        effective.width = f64::from(width);
                    }
                }
                if !(effective.height > 0.0) {
                    if let Some(height) = hint.height {
                        effective.height = f64::from(height);
                    }
                }
                if !(effective.height > 0.0) {
                    if let Some(ratio) = height_from_width {
                        let width = bounds.clamp(effective).width;
                        effective.height = (f64::from(width) * ratio).round();
                    }
                }
                bounds.clamp(effective)
            }
        }
    }
}

/// Optional width/height hints carried by a chart style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SizeHint {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar_bounds() -> ClampBounds {
        ClampBounds::new(300, 700, 200, 320).expect("bounds")
    }

    #[test]
    fn clamp_rounds_then_bounds() {
        let bounds = bar_bounds();
        assert_eq!(
            bounds.clamp(RawSize::new(500.4, 250.6)),
            SizeObservation::new(500, 251)
        );
        assert_eq!(
            bounds.clamp(RawSize::new(50.0, 10_000.0)),
            SizeObservation::new(300, 320)
        );
        assert_eq!(
            bounds.clamp(RawSize::new(f64::NAN, -4.0)),
            SizeObservation::new(300, 200)
        );
        assert_eq!(
            bounds.clamp(RawSize::new(f64::INFINITY, 1e12)),
            SizeObservation::new(300, 320)
        );
    }

    #[test]
    fn bounds_reject_inverted_ranges() {
        assert!(ClampBounds::new(700, 300, 200, 320).is_err());
        assert!(ClampBounds::new(0, 300, 200, 320).is_err());
    }

    #[test]
    fn height_from_width_applies_only_without_height() {
        let policy = SizePolicy::Responsive {
            bounds: ClampBounds::new(320, 900, 240, 600).expect("bounds"),
            height_from_width: Some(0.6),
        };
        assert_eq!(
            policy.resolve(RawSize::new(800.0, 0.0), SizeHint::default()),
            SizeObservation::new(800, 480)
        );
        assert_eq!(
            policy.resolve(RawSize::new(800.0, 300.0), SizeHint::default()),
            SizeObservation::new(800, 300)
        );
    }

    #[test]
    fn fixed_policy_prefers_hints() {
        let policy = SizePolicy::Fixed {
            width: 720,
            height: 320,
        };
        let hint = SizeHint {
            width: Some(640),
            height: None,
        };
        assert_eq!(
            policy.resolve(RawSize::new(10.0, 10.0), hint),
            SizeObservation::new(640, 320)
        );
    }
}
