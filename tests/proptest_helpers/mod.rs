#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

use yolomark::categories::CategoryNames;
use yolomark::geom::ImageSize;
use yolomark::label_file::YoloRecord;

/// Largest error allowed between a normalized value and its six-decimal
/// truncation.
pub const EPS_TRUNCATE: f64 = 1e-6;

pub const NUM_CATEGORIES: usize = 5;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

pub fn names() -> CategoryNames {
    (0..NUM_CATEGORIES).map(|i| format!("class_{i}")).collect()
}

pub fn arb_image_size() -> impl Strategy<Value = ImageSize> {
    (1u32..=8192, 1u32..=8192).prop_map(|(w, h)| ImageSize::new(w, h))
}

/// A box fully inside the unit square.
pub fn arb_record() -> impl Strategy<Value = YoloRecord> {
    (
        0..NUM_CATEGORIES,
        0.0f64..=1.0,
        0.0f64..=1.0,
        0.0f64..=1.0,
        0.0f64..=1.0,
    )
        .prop_map(|(class_id, x0, y0, x1, y1)| {
            let (left, right) = (x0.min(x1), x0.max(x1));
            let (top, bottom) = (y0.min(y1), y0.max(y1));
            YoloRecord {
                class_id,
                cx: (left + right) / 2.0,
                cy: (top + bottom) / 2.0,
                w: right - left,
                h: bottom - top,
            }
        })
}

pub fn arb_records(max_len: usize) -> impl Strategy<Value = Vec<YoloRecord>> {
    prop::collection::vec(arb_record(), 0..=max_len)
}

/// Label file content with full-precision values, one record per line.
pub fn label_content(records: &[YoloRecord]) -> String {
    records
        .iter()
        .map(|r| format!("{} {} {} {} {}\n", r.class_id, r.cx, r.cy, r.w, r.h))
        .collect()
}
