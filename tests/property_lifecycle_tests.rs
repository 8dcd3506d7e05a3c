mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use chart_mount::api::{FailureGuard, LifecycleConfig, MemoryFailureSink, WidgetLifecycleManager};
use chart_mount::core::{ChartSpec, RawSize, SizeHint, SizePolicy};
use chart_mount::host::MemoryContainer;
use proptest::prelude::*;

use common::{COUNTED, COUNTED_FIXED, bar_bounds, counting_registry};

#[derive(Debug, Clone)]
enum Step {
    Resize { width: f64, height: f64, after_ms: u64 },
    Pump { after_ms: u64 },
    SwitchType,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => (-100.0f64..2_000.0, -100.0f64..1_000.0, 0u64..80).prop_map(|(width, height, after_ms)| {
            Step::Resize { width, height, after_ms }
        }),
        3 => (0u64..200).prop_map(|after_ms| Step::Pump { after_ms }),
        1 => Just(Step::SwitchType),
    ]
}

proptest! {
    #[test]
    fn clamped_size_always_inside_bounds(
        width in prop::num::f64::ANY,
        height in prop::num::f64::ANY,
    ) {
        let bounds = bar_bounds();
        let size = bounds.clamp(RawSize::new(width, height));
        prop_assert!(bounds.contains(size));

        let policy = SizePolicy::Responsive { bounds, height_from_width: Some(0.6) };
        prop_assert!(bounds.contains(policy.resolve(RawSize::new(width, height), SizeHint::default())));
    }

    #[test]
    fn at_most_one_live_widget_across_any_sequence(
        steps in prop::collection::vec(step_strategy(), 1..40)
    ) {
        let start = Instant::now();
        let (registry, counters) = counting_registry();
        let host = MemoryContainer::new(500.0, 250.0);
        let mut handle = host.clone();
        let sink = MemoryFailureSink::new();
        let mut manager = WidgetLifecycleManager::new(registry, FailureGuard::new(Arc::new(sink.clone())))
            .with_config(LifecycleConfig::default().with_debounce_ms(50));
        manager.mount(&mut handle, ChartSpec::new(COUNTED, "Prop")).expect("mount");

        let mut now = start;
        let mut responsive = true;
        for step in steps {
            match step {
                Step::Resize { width, height, after_ms } => {
                    now += Duration::from_millis(after_ms);
                    host.resize_at(width, height, now);
                }
                Step::Pump { after_ms } => {
                    now += Duration::from_millis(after_ms);
                    manager.pump(now);
                }
                Step::SwitchType => {
                    responsive = !responsive;
                    let id = if responsive { COUNTED } else { COUNTED_FIXED };
                    prop_assert!(manager.update(ChartSpec::new(id, "Prop")).is_some());
                }
            }
            prop_assert!(counters.live() <= 1);
            prop_assert_eq!(host.observer_count(), usize::from(responsive));
        }

        manager.unmount();
        prop_assert_eq!(counters.max_live(), 1);
        prop_assert_eq!(counters.live(), 0);
        prop_assert_eq!(host.overlap_count(), 0);
        prop_assert!(host.is_empty());
        prop_assert_eq!(host.observer_count(), 0);
        prop_assert!(sink.is_empty());
    }

    #[test]
    fn resizes_beyond_bounds_never_recreate(
        sizes in prop::collection::vec((700.5f64..5_000.0, 320.5f64..5_000.0), 1..20)
    ) {
        let start = Instant::now();
        let (registry, counters) = counting_registry();
        let host = MemoryContainer::new(2_000.0, 2_000.0);
        let mut handle = host.clone();
        let sink = MemoryFailureSink::new();
        let mut manager = WidgetLifecycleManager::new(registry, FailureGuard::new(Arc::new(sink.clone())))
            .with_config(LifecycleConfig::default().with_debounce_ms(10));
        manager.mount(&mut handle, ChartSpec::new(COUNTED, "Max")).expect("mount");

        let mut now = start;
        for (width, height) in sizes {
            now += Duration::from_millis(25);
            host.resize_at(width, height, now);
            prop_assert!(!manager.pump(now + Duration::from_millis(10)));
        }
        prop_assert_eq!(manager.recreations(), 0);
        prop_assert_eq!(counters.created(), 1);
    }
}
