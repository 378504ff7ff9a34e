use image::{Rgba, RgbaImage};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

#[derive(Serialize)]
struct SizeEntry {
    name: String,
    width: u32,
    height: u32,
}

fn ensure_dir(p: &PathBuf) -> anyhow::Result<()> {
    fs::create_dir_all(p)?;
    Ok(())
}

fn basic_sizes(rng: &mut impl Rng) -> Vec<SizeEntry> {
    (0..120)
        .map(|i| SizeEntry {
            name: format!("basic_{:03}", i),
            width: rng.gen_range(8..=96),
            height: rng.gen_range(8..=96),
        })
        .collect()
}

fn thin_bars(rng: &mut impl Rng) -> Vec<SizeEntry> {
    (0..60)
        .map(|i| {
            let long = rng.gen_range(64..=512);
            let short = rng.gen_range(1..=6);
            let (width, height) = if i % 2 == 0 { (long, short) } else { (short, long) };
            SizeEntry {
                name: format!("bar_{:03}", i),
                width,
                height,
            }
        })
        .collect()
}

fn pow2_mixed(rng: &mut impl Rng) -> Vec<SizeEntry> {
    let sizes = [16, 32, 64, 128, 256];
    (0..60)
        .map(|i| SizeEntry {
            name: format!("pow2_{:03}", i),
            width: *sizes.choose(rng).unwrap_or(&64),
            height: *sizes.choose(rng).unwrap_or(&64),
        })
        .collect()
}

/// Writes blank images so the directory input path (header-only size probing) has data.
fn write_images(out: &PathBuf, entries: &[SizeEntry]) -> anyhow::Result<()> {
    ensure_dir(out)?;
    for e in entries {
        let img = RgbaImage::from_pixel(e.width, e.height, Rgba([0, 0, 0, 255]));
        img.save(out.join(format!("{}.png", e.name)))?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Usage: cargo run -p rectpack-cli --example gen_sizes -- [out_root]
    // Default out_root: assets/generated
    let out_root = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets/generated"));
    ensure_dir(&out_root)?;

    let mut rng = rand::rngs::StdRng::seed_from_u64(0xDEADBEEF);
    let basic = basic_sizes(&mut rng);
    let thin = thin_bars(&mut rng);
    let pow2 = pow2_mixed(&mut rng);

    fs::write(out_root.join("basic.json"), serde_json::to_string_pretty(&basic)?)?;
    fs::write(out_root.join("thin.yaml"), serde_yaml::to_string(&thin)?)?;
    fs::write(out_root.join("pow2_mixed.json"), serde_json::to_string_pretty(&pow2)?)?;
    write_images(&out_root.join("pow2_images"), &pow2)?;

    println!("Generated size lists under {}", out_root.display());
    Ok(())
}
