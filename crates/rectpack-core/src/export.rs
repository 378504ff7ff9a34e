use crate::model::PackingResult;
use serde_json::{Value, json};
use tracing::warn;

fn key_for<K: ToString>(keys: &[K], id: usize) -> String {
    keys.get(id)
        .map(ToString::to_string)
        .unwrap_or_else(|| id.to_string())
}

/// Serialize the result as `{ width, height, hint, rects: [...] }`, rectangles in input order.
/// `keys[id]` names the rectangle with that id; ids without a key use the id itself.
pub fn to_json_array<K: ToString>(result: &PackingResult, keys: &[K]) -> Value {
    let rects: Vec<Value> = result
        .rectangles
        .iter()
        .map(|r| {
            json!({
                "key": key_for(keys, r.id),
                "id": r.id,
                "x": r.x,
                "y": r.y,
                "w": r.width,
                "h": r.height,
            })
        })
        .collect();
    json!({
        "width": result.width,
        "height": result.height,
        "hint": result.hint,
        "rects": rects,
    })
}

/// Frames keyed by name: `{ size: { w, h }, hint, frames: { name: { x, y, w, h } } }`.
/// Shape follows the TexturePacker-like JSON hash many engine pipelines expect.
///
/// Keys must be unique: on a repeated key the first rectangle keeps the frame and the
/// rest are dropped with a warning. A missing key falls back to the id, which can
/// collide with a caller name such as `"1"`.
pub fn to_json_hash<K: ToString>(result: &PackingResult, keys: &[K]) -> Value {
    let mut frames = serde_json::Map::new();
    for r in &result.rectangles {
        let key = key_for(keys, r.id);
        if frames.contains_key(&key) {
            warn!(%key, id = r.id, "duplicate frame key, rectangle left out of the hash");
            continue;
        }
        frames.insert(
            key,
            json!({"x": r.x, "y": r.y, "w": r.width, "h": r.height}),
        );
    }
    json!({
        "size": {"w": result.width, "h": result.height},
        "hint": result.hint,
        "frames": frames,
    })
}
