use std::net::SocketAddr;

use axum::{Json, Router, routing::post};
use base64::Engine;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;

use noisekit::config::Params;

#[derive(Deserialize)]
struct GenerateRequest {
    seed: Option<u32>,
    width: Option<usize>,
    height: Option<usize>,
    octaves: Option<i32>,
    lacunarity: Option<f32>,
    gain: Option<f32>,
    frequency: Option<f32>,
    gap: Option<i32>,
}

#[derive(Serialize)]
struct GenerateResponse {
    layers: Vec<Layer>,
    timings: Vec<TimingEntry>,
    width: usize,
    height: usize,
}

#[derive(Serialize)]
struct Layer {
    name: String,
    data_url: String,
}

#[derive(Serialize)]
struct TimingEntry {
    name: String,
    ms: f64,
}

fn encode_png(rgba: &[u8], w: usize, h: usize) -> String {
    let mut buf = Vec::new();
    let encoder = PngEncoder::new(&mut buf);
    encoder
        .write_image(rgba, w as u32, h as u32, image::ExtendedColorType::Rgba8)
        .expect("PNG encode failed");
    let b64 = base64::engine::general_purpose::STANDARD.encode(&buf);
    format!("data:image/png;base64,{}", b64)
}

async fn generate_handler(Json(req): Json<GenerateRequest>) -> Json<GenerateResponse> {
    let seed = req.seed.unwrap_or(42);
    let width = req.width.unwrap_or(800);
    let height = req.height.unwrap_or(800);

    let defaults = Params::default();
    let octaves = req.octaves.unwrap_or(defaults.octaves);
    let lacunarity = req.lacunarity.unwrap_or(defaults.lacunarity);
    let gain = req.gain.unwrap_or(defaults.gain);
    let frequency = req.frequency.unwrap_or(defaults.frequency);
    let gap = req.gap.unwrap_or(defaults.gap);

    let response = tokio::task::spawn_blocking(move || {
        let params = Params {
            octaves,
            lacunarity,
            gain,
            frequency,
            gap,
        };
        let (layers, timings) = noisekit::generate(seed, width, height, &params);

        GenerateResponse {
            layers: layers
                .iter()
                .map(|l| Layer {
                    name: l.name.to_string(),
                    data_url: encode_png(&l.rgba, width, height),
                })
                .collect(),
            timings: timings
                .iter()
                .map(|t| TimingEntry {
                    name: t.name.to_string(),
                    ms: t.ms,
                })
                .collect(),
            width,
            height,
        }
    })
    .await
    .unwrap();

    Json(response)
}

#[tokio::main]
async fn main() {
    let frontend = ServeDir::new("frontend");

    let app = Router::new()
        .route("/api/generate", post(generate_handler))
        .fallback_service(frontend);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    eprintln!("noisekit server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
