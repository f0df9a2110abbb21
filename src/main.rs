use std::path::PathBuf;

use noisekit::config::Params;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let seed: u32 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(42);
    let width: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(800);
    let height: usize = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(800);
    let out_dir: PathBuf = args
        .get(4)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("artifacts"));

    std::fs::create_dir_all(&out_dir).expect("failed to create output directory");

    let params = Params::default();

    eprintln!(
        "Generating {}x{} layers with seed={}, octaves={}, frequency={}",
        width, height, seed, params.octaves, params.frequency
    );

    let (layers, timings) = noisekit::generate(seed, width, height, &params);

    eprintln!("\nTimings:");
    for t in &timings {
        eprintln!("  {:20} {:8.1} ms", t.name, t.ms);
    }

    for layer in &layers {
        let path = out_dir.join(format!("{}.png", layer.name));
        image::save_buffer(
            &path,
            &layer.rgba,
            width as u32,
            height as u32,
            image::ColorType::Rgba8,
        )
        .expect("failed to save image");
        eprintln!("Saved {}", path.display());
    }

    eprintln!("\nDone.");
}
