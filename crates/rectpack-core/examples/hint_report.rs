use rand::{Rng, SeedableRng};
use rectpack_core::prelude::*;
use std::time::Instant;

fn run(label: &str, sizes: &[(u32, u32)]) {
    println!("== {} ({} rects)", label, sizes.len());
    for placement in [Placement::Guillotine, Placement::Skyline] {
        for hint in PackingHint::ALL {
            let cfg = PackerConfig::builder()
                .hints(hint.into())
                .placement(placement)
                .build();
            let t0 = Instant::now();
            let out = pack_sizes(sizes, &cfg).expect("pack");
            let dt = t0.elapsed();
            println!(
                "{:<10?} {:<24} {:>5}x{:<5} occ={:>6.2}% time={:?}",
                placement,
                hint.name(),
                out.width,
                out.height,
                out.stats().occupancy * 100.0,
                dt
            );
        }
    }
}

fn main() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(123);
    let squarish: Vec<(u32, u32)> = (0..300)
        .map(|_| {
            let s = rng.gen_range(8..=48);
            (s, s + rng.gen_range(0..=8))
        })
        .collect();
    let thin: Vec<(u32, u32)> = (0..300)
        .map(|_| {
            if rng.gen_bool(0.5) {
                (rng.gen_range(64..=256), rng.gen_range(1..=6))
            } else {
                (rng.gen_range(1..=6), rng.gen_range(64..=256))
            }
        })
        .collect();
    run("squarish", &squarish);
    run("thin", &thin);
}
