use rectpack_core::prelude::*;

#[test]
fn test_pack_stats_basic() {
    // four 64x64 squares leave no gaps
    let sizes = [(64, 64); 4];
    let result = pack_sizes(&sizes, &PackerConfig::default()).expect("packing should succeed");
    let stats = result.stats();

    assert_eq!(stats.num_rects, 4);
    assert_eq!(stats.used_area, 4 * 64 * 64);
    assert_eq!(stats.bound_area, 4 * 64 * 64);
    assert_eq!(stats.occupancy, 1.0);
    assert_eq!(stats.wasted_area(), 0);
}

#[test]
fn test_pack_stats_with_padding() {
    let sizes = [(10, 10), (10, 10)];
    let cfg = PackerConfig::builder().padding(4).build();
    let result = pack_sizes(&sizes, &cfg).unwrap();
    let stats = result.stats();

    // padding is not counted as used area
    assert_eq!(stats.used_area, 200);
    assert_eq!(stats.bound_area, result.area());
    assert!(stats.occupancy < 1.0);
    assert!(stats.waste_percentage() > 0.0);
}

#[test]
fn test_pack_stats_summary() {
    let result = pack_sizes(&[(8, 4)], &PackerConfig::default()).unwrap();
    let summary = result.stats().summary();
    assert!(summary.contains("Rects: 1"));
    assert!(summary.contains("Bounds: 8x4"));
    assert!(summary.contains("100.00%"));
}
