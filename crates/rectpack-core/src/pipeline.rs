use crate::config::PackerConfig;
use crate::error::{RectPackError, Result};
use crate::hints::{PackingHint, PackingHints};
use crate::model::{PackingRectangle, PackingResult};
use crate::packer::{Grow, Packer, new_packer};
use tracing::{debug, instrument, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Packs `rectangles` trying every heuristic in `hints`, with `padding` pixels kept
/// between rectangles. Other settings use [`PackerConfig::default`].
pub fn pack(
    rectangles: &[PackingRectangle],
    hints: PackingHints,
    padding: u32,
) -> Result<PackingResult> {
    let cfg = PackerConfig {
        hints,
        padding,
        ..Default::default()
    };
    pack_with_config(rectangles, &cfg)
}

/// Packs plain `(width, height)` sizes; ids are the input indices.
pub fn pack_sizes(sizes: &[(u32, u32)], cfg: &PackerConfig) -> Result<PackingResult> {
    let rectangles: Vec<PackingRectangle> = sizes
        .iter()
        .enumerate()
        .map(|(id, &(w, h))| PackingRectangle::new(id, w, h))
        .collect();
    pack_with_config(&rectangles, cfg)
}

#[instrument(skip_all, fields(count = rectangles.len(), hints = %cfg.hints))]
/// Packs `rectangles` into the smallest bounds found by the configured heuristics.
///
/// Notes:
/// - Inputs are validated before any placement; a zero-sized rectangle fails the whole call.
/// - An empty input yields an empty 0x0 result.
/// - Trials are independent; the winner has the smallest area, then perimeter, then
///   the earliest heuristic in canonical order.
/// - Output is deterministic, including with `parallel` enabled.
pub fn pack_with_config(
    rectangles: &[PackingRectangle],
    cfg: &PackerConfig,
) -> Result<PackingResult> {
    cfg.validate()?;
    validate_rectangles(rectangles)?;

    if rectangles.is_empty() {
        return Ok(PackingResult::empty());
    }

    let hints: Vec<PackingHint> = cfg.hints.iter().collect();

    #[cfg(feature = "parallel")]
    {
        if cfg.parallel {
            let trials: Vec<Result<PackingResult>> = hints
                .par_iter()
                .map(|&hint| run_trial(rectangles, hint, cfg))
                .collect();
            return select_best(trials);
        }
    }

    let trials = hints
        .iter()
        .map(|&hint| run_trial(rectangles, hint, cfg))
        .collect();
    select_best(trials)
}

fn validate_rectangles(rectangles: &[PackingRectangle]) -> Result<()> {
    match rectangles
        .iter()
        .enumerate()
        .find(|(_, r)| r.width == 0 || r.height == 0)
    {
        Some((index, r)) => Err(RectPackError::InvalidInput {
            index,
            id: r.id,
            width: r.width,
            height: r.height,
        }),
        None => Ok(()),
    }
}

/// Reduces trials (in canonical order) to the best one. Failed trials are skipped; if
/// all failed, the first error is returned.
fn select_best(trials: Vec<Result<PackingResult>>) -> Result<PackingResult> {
    let mut best: Option<PackingResult> = None;
    let mut first_err: Option<RectPackError> = None;
    for trial in trials {
        match trial {
            Ok(result) => {
                let better = match &best {
                    None => true,
                    Some(b) => {
                        (result.area(), result.perimeter()) < (b.area(), b.perimeter())
                    }
                };
                if better {
                    best = Some(result);
                }
            }
            Err(e) => {
                first_err.get_or_insert(e);
            }
        }
    }
    match (best, first_err) {
        (Some(result), _) => Ok(result),
        (None, Some(e)) => Err(e),
        (None, None) => Err(RectPackError::UnsupportedHint(0)),
    }
}

/// Placement order for `hint`: descending sort key, ties by input index.
fn trial_order(rectangles: &[PackingRectangle], hint: PackingHint) -> Vec<usize> {
    let keys: Vec<u64> = rectangles
        .iter()
        .map(|r| hint.sort_key(r.width, r.height))
        .collect();
    let mut order: Vec<usize> = (0..rectangles.len()).collect();
    order.sort_by(|&a, &b| keys[b].cmp(&keys[a]).then(a.cmp(&b)));
    order
}

/// Packs all rectangles with a single heuristic from a fresh bin.
fn run_trial(
    rectangles: &[PackingRectangle],
    hint: PackingHint,
    cfg: &PackerConfig,
) -> Result<PackingResult> {
    let pad = cfg.padding;
    let cell = |r: &PackingRectangle| (r.width.saturating_add(pad), r.height.saturating_add(pad));
    let total = rectangles.len();

    let init_w = rectangles.iter().map(|r| cell(r).0).max().unwrap_or(0);
    let init_h = rectangles.iter().map(|r| cell(r).1).max().unwrap_or(0);
    if !within_limits(init_w, init_h, cfg) {
        return Err(RectPackError::OutOfSpace { placed: 0, total });
    }

    let mut bin = new_packer(cfg.placement, init_w, init_h);
    let mut placed = rectangles.to_vec();

    for (n, &idx) in trial_order(rectangles, hint).iter().enumerate() {
        let (w, h) = cell(&rectangles[idx]);
        let slot = match bin.insert(w, h) {
            Some(slot) => slot,
            None => {
                let direction = choose_growth(bin.as_ref(), w, h, cfg)
                    .ok_or(RectPackError::OutOfSpace { placed: n, total })?;
                let amount = match direction {
                    Grow::Width => w,
                    Grow::Height => h,
                };
                bin.grow(direction, amount);
                trace!(?direction, amount, size = ?bin.size(), "grew bin");
                bin.insert(w, h)
                    .ok_or(RectPackError::OutOfSpace { placed: n, total })?
            }
        };
        placed[idx].x = slot.x;
        placed[idx].y = slot.y;
    }

    let used_w = placed.iter().map(|r| r.x + r.width).max().unwrap_or(0);
    let used_h = placed.iter().map(|r| r.y + r.height).max().unwrap_or(0);
    let (width, height) = compute_bounds(used_w, used_h, cfg);
    debug!(%hint, width, height, "trial finished");

    Ok(PackingResult {
        rectangles: placed,
        width,
        height,
        hint: Some(hint),
    })
}

/// Picks the growth giving the smaller bin area, then the smaller perimeter, then width.
/// Directions that would overflow or break the size limits are not considered.
fn choose_growth(bin: &dyn Packer, w: u32, h: u32, cfg: &PackerConfig) -> Option<Grow> {
    let (bw, bh) = bin.size();
    let candidates = [
        (Grow::Width, bw.checked_add(w).map(|nw| (nw, bh))),
        (Grow::Height, bh.checked_add(h).map(|nh| (bw, nh))),
    ];
    candidates
        .into_iter()
        .filter_map(|(dir, size)| size.map(|s| (dir, s)))
        .filter(|&(_, (nw, nh))| within_limits(nw, nh, cfg))
        .min_by_key(|&(_, (nw, nh))| {
            let (nw, nh) = (nw as u64, nh as u64);
            (nw * nh, nw + nh)
        })
        .map(|(dir, _)| dir)
}

/// A bin fits the limits when its content, without the trailing padding, does.
fn within_limits(bin_w: u32, bin_h: u32, cfg: &PackerConfig) -> bool {
    let content_w = bin_w.saturating_sub(cfg.padding);
    let content_h = bin_h.saturating_sub(cfg.padding);
    cfg.max_width.is_none_or(|m| content_w <= m) && cfg.max_height.is_none_or(|m| content_h <= m)
}

fn next_pow2(v: u32) -> u32 {
    v.max(1).checked_next_power_of_two().unwrap_or(v)
}

/// Final bounds from the used extents and the rounding options.
fn compute_bounds(used_w: u32, used_h: u32, cfg: &PackerConfig) -> (u32, u32) {
    let mut w = used_w;
    let mut h = used_h;
    if cfg.power_of_two {
        w = next_pow2(w);
        h = next_pow2(h);
    }
    if cfg.square {
        let m = w.max(h);
        w = m;
        h = m;
    }
    (w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_is_descending_and_stable() {
        let rects = vec![
            PackingRectangle::new(0, 2, 2),
            PackingRectangle::new(1, 4, 1),
            PackingRectangle::new(2, 1, 4),
            PackingRectangle::new(3, 3, 3),
        ];
        assert_eq!(trial_order(&rects, PackingHint::Area), vec![3, 0, 1, 2]);
        assert_eq!(trial_order(&rects, PackingHint::Width), vec![1, 3, 0, 2]);
        assert_eq!(trial_order(&rects, PackingHint::BiggerSide), vec![1, 2, 3, 0]);
    }

    #[test]
    fn growth_prefers_smaller_area() {
        let bin = new_packer(crate::config::Placement::Guillotine, 8, 4);
        let cfg = PackerConfig::default();
        // width: 10x4 = 40, height: 8x6 = 48
        assert_eq!(choose_growth(bin.as_ref(), 2, 2, &cfg), Some(Grow::Width));
        let bin = new_packer(crate::config::Placement::Guillotine, 4, 8);
        assert_eq!(choose_growth(bin.as_ref(), 2, 2, &cfg), Some(Grow::Height));
        let bin = new_packer(crate::config::Placement::Guillotine, 4, 4);
        assert_eq!(choose_growth(bin.as_ref(), 2, 2, &cfg), Some(Grow::Width));
    }

    #[test]
    fn growth_respects_limits() {
        let bin = new_packer(crate::config::Placement::Guillotine, 8, 4);
        let cfg = PackerConfig::builder().max_width(Some(9)).build();
        assert_eq!(choose_growth(bin.as_ref(), 2, 2, &cfg), Some(Grow::Height));
        let cfg = PackerConfig::builder().with_max_dimensions(9, 5).build();
        assert_eq!(choose_growth(bin.as_ref(), 2, 2, &cfg), None);
    }

    #[test]
    fn bounds_rounding() {
        let pow2 = PackerConfig::builder().pow2(true).build();
        assert_eq!(compute_bounds(33, 7, &pow2), (64, 8));
        let square = PackerConfig::builder().square(true).build();
        assert_eq!(compute_bounds(33, 7, &square), (33, 33));
        assert_eq!(compute_bounds(33, 7, &PackerConfig::default()), (33, 7));
    }
}
