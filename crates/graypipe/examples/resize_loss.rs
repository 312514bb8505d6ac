//! Example: measure what a shrink/enlarge round trip throws away.
//!
//! Decodes a RAW or BMP file (chosen by extension), shrinks it to
//! `--size x --size` with each kernel, enlarges the shrunk copy back to the
//! original dimensions with the same kernel, and reports mean absolute error
//! and PSNR against the input.
//!
//! Run from the workspace root:
//!   cargo run -p graypipe --example resize_loss -- --input data/baboon.bmp

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use graypipe::{BmpDecoder, GrayImage, Interpolation, RawDecoder, resize};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(about = "Compare nearest and bilinear shrink/enlarge round trips")]
struct Args {
    /// Input image (`.raw` or `.bmp`)
    #[arg(long, default_value = "data/lena.raw")]
    input: PathBuf,

    /// Width used for `.raw` inputs
    #[arg(long, default_value_t = 512)]
    raw_width: usize,

    /// Height used for `.raw` inputs
    #[arg(long, default_value_t = 512)]
    raw_height: usize,

    /// Side length of the intermediate square image
    #[arg(long, default_value_t = 32)]
    size: usize,

    /// Optional JSON report path
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Serialize)]
struct KernelReport {
    kernel: &'static str,
    intermediate: [usize; 2],
    mean_abs_error: f64,
    psnr_db: f64,
    elapsed_ms: f64,
}

fn load(args: &Args) -> Result<GrayImage> {
    let is_raw = args
        .input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("raw"));
    let img = if is_raw {
        RawDecoder::new(args.raw_width, args.raw_height).decode_file(&args.input)
    } else {
        BmpDecoder::default().decode_file(&args.input)
    };
    img.with_context(|| format!("decoding {}", args.input.display()))
}

fn errors(a: &GrayImage, b: &GrayImage) -> (f64, f64) {
    let n = a.data().len() as f64;
    let (abs, sq) = a
        .data()
        .iter()
        .zip(b.data())
        .fold((0.0f64, 0.0f64), |(abs, sq), (&x, &y)| {
            let d = x as f64 - y as f64;
            (abs + d.abs(), sq + d * d)
        });
    let mse = sq / n;
    let psnr = if mse == 0.0 {
        f64::INFINITY
    } else {
        10.0 * (255.0f64 * 255.0 / mse).log10()
    };
    (abs / n, psnr)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let img = load(&args)?;
    let (w, h) = img.dimensions();
    println!("loaded {}: {w}x{h}", args.input.display());

    let mut reports = Vec::new();
    for interp in [Interpolation::Nearest, Interpolation::Bilinear] {
        let t0 = Instant::now();
        let small = resize(&img.as_view(), args.size, args.size, interp)
            .context("shrinking input")?;
        let back = resize(&small.as_view(), w, h, interp).context("enlarging shrunk copy")?;
        let elapsed_ms = t0.elapsed().as_secs_f64() * 1e3;

        let (mae, psnr) = errors(&img, &back);
        println!(
            "  {:>8}: mae {mae:.3}, psnr {psnr:.2} dB ({elapsed_ms:.2} ms)",
            interp.tag()
        );
        reports.push(KernelReport {
            kernel: interp.tag(),
            intermediate: [args.size, args.size],
            mean_abs_error: mae,
            psnr_db: psnr,
            elapsed_ms,
        });
    }

    if let Some(out) = &args.out {
        let file = std::fs::File::create(out)
            .with_context(|| format!("creating {}", out.display()))?;
        serde_json::to_writer_pretty(file, &reports)
            .with_context(|| format!("writing JSON to {}", out.display()))?;
        println!("report written to {}", out.display());
    }

    Ok(())
}
