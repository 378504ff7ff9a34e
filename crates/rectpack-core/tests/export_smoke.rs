use rectpack_core::prelude::*;
use rectpack_core::{to_json_array, to_json_hash};

#[test]
fn export_json_array_and_hash() {
    let sizes = [(16, 16), (8, 8)];
    let out = pack_sizes(&sizes, &PackerConfig::default()).unwrap();
    let keys = vec!["hero.png", "coin.png"];

    let arr = to_json_array(&out, keys.as_slice());
    assert_eq!(arr["width"], out.width);
    assert_eq!(arr["rects"].as_array().unwrap().len(), 2);
    assert_eq!(arr["rects"][0]["key"], "hero.png");
    assert_eq!(arr["rects"][1]["w"], 8);
    assert_eq!(arr["hint"], "area");

    let hash = to_json_hash(&out, keys.as_slice());
    assert!(hash["frames"].get("coin.png").is_some());
    assert_eq!(hash["size"]["h"], out.height);
}

#[test]
fn missing_keys_fall_back_to_id() {
    let out = pack_sizes(&[(2, 2), (1, 1)], &PackerConfig::default()).unwrap();
    let hash = to_json_hash::<String>(&out, &[]);
    assert!(hash["frames"].get("0").is_some());
    assert!(hash["frames"].get("1").is_some());
}

#[test]
fn result_round_trips_through_serde() {
    let out = pack_sizes(&[(5, 3), (2, 9)], &PackerConfig::default()).unwrap();
    let text = serde_json::to_string(&out).unwrap();
    let back: PackingResult = serde_json::from_str(&text).unwrap();
    assert_eq!(out, back);
}

#[test]
fn repeated_hash_keys_keep_first_frame() {
    // rect 1 has no name and falls back to "1", which rect 0 already uses
    let out = pack_sizes(&[(6, 6), (2, 2)], &PackerConfig::default()).unwrap();
    let hash = to_json_hash(&out, ["1"].as_slice());
    let frames = hash["frames"].as_object().unwrap();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames["1"]["w"], 6);

    // the array export keeps both
    let arr = to_json_array(&out, ["1"].as_slice());
    assert_eq!(arr["rects"].as_array().unwrap().len(), 2);
}
