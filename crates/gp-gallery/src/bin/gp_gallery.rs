use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use graypipe::{
    BmpDecoder, DecodeError, GrayImage, ImageCrateWriter, ImageWriter, Interpolation, OffsetMode,
    OutputFormat, PointOp, Quantize, RawDecoder, apply_point_op, center_patch, resize,
};
use serde::{Deserialize, Serialize};

const DEFAULT_RAW: [&str; 3] = ["data/lena.raw", "data/goldhill.raw", "data/peppers.raw"];
const DEFAULT_BMP: [&str; 3] = ["data/baboon.bmp", "data/boat.bmp", "data/F16.bmp"];

#[derive(Parser, Debug)]
#[command(name = "gp_gallery", version)]
#[command(about = "Decode RAW/BMP samples and write enhanced or resampled copies")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// RAW -> PNG and BMP -> JPEG, printing the centre patch of each image
    #[command(name = "convert")]
    Convert(ConvertArgs),
    /// Log, gamma and negative point transforms
    #[command(name = "enhance")]
    Enhance(EnhanceArgs),
    /// Nearest and bilinear resizes, including chained ones
    #[command(name = "interpolate")]
    Interpolate(InterpolateArgs),
}

#[derive(Args, Debug, Clone)]
struct InputArgs {
    /// Headerless 8-bit inputs
    #[arg(long, num_args = 1..)]
    raw: Vec<PathBuf>,
    /// Bitmap inputs
    #[arg(long, num_args = 1..)]
    bmp: Vec<PathBuf>,
    /// JSON file listing `raw` and `bmp` entries
    #[arg(long)]
    manifest: Option<PathBuf>,
    #[arg(long, default_value_t = 512)]
    raw_width: usize,
    #[arg(long, default_value_t = 512)]
    raw_height: usize,
    /// Where 8-bpp pixel data is looked for
    #[arg(long, value_enum, default_value_t = OffsetArg::Trust)]
    bmp_offset: OffsetArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OffsetArg {
    Trust,
    SkipPalette,
}

impl From<OffsetArg> for OffsetMode {
    fn from(arg: OffsetArg) -> Self {
        match arg {
            OffsetArg::Trust => OffsetMode::TrustOffset,
            OffsetArg::SkipPalette => OffsetMode::SkipPaletteHeuristic,
        }
    }
}

#[derive(Args, Debug, Clone)]
struct ConvertArgs {
    #[command(flatten)]
    inputs: InputArgs,
    #[arg(long, default_value = "output")]
    out: PathBuf,
    /// JPEG quality for bitmap inputs
    #[arg(long, default_value_t = 95)]
    quality: u8,
    /// Side of the printed centre patch
    #[arg(long, default_value_t = 10)]
    patch: usize,
}

#[derive(Args, Debug, Clone)]
struct EnhanceArgs {
    #[command(flatten)]
    inputs: InputArgs,
    #[arg(long, default_value = "output/transform")]
    out: PathBuf,
    #[arg(long, value_delimiter = ',', default_values_t = [0.5f32, 2.0])]
    gamma: Vec<f32>,
    /// Drop fractions instead of rounding
    #[arg(long)]
    truncate: bool,
}

#[derive(Args, Debug, Clone)]
struct InterpolateArgs {
    #[command(flatten)]
    inputs: InputArgs,
    #[arg(long, default_value = "output/interpolation")]
    out: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    #[serde(default)]
    raw: Vec<RawEntry>,
    #[serde(default)]
    bmp: Vec<BmpEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEntry {
    path: PathBuf,
    #[serde(default)]
    width: Option<usize>,
    #[serde(default)]
    height: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BmpEntry {
    path: PathBuf,
    #[serde(default)]
    offset_mode: Option<OffsetMode>,
}

#[derive(Debug, Clone, PartialEq)]
enum Decoder {
    Raw(RawDecoder),
    Bmp(BmpDecoder),
}

#[derive(Debug, Clone, PartialEq)]
struct Source {
    path: PathBuf,
    decoder: Decoder,
}

impl Source {
    fn decode(&self) -> Result<GrayImage, DecodeError> {
        match &self.decoder {
            Decoder::Raw(d) => d.decode_file(&self.path),
            Decoder::Bmp(d) => d.decode_file(&self.path),
        }
    }

    fn kind(&self) -> &'static str {
        match self.decoder {
            Decoder::Raw(_) => "raw",
            Decoder::Bmp(_) => "bmp",
        }
    }

    fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
struct ProcessedDto {
    input: PathBuf,
    kind: &'static str,
    width: usize,
    height: usize,
    outputs: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct SkippedDto {
    input: PathBuf,
    error: String,
}

#[derive(Debug, Clone, Serialize)]
struct RunMeta<P> {
    command: &'static str,
    params: P,
    processed: Vec<ProcessedDto>,
    skipped: Vec<SkippedDto>,
}

#[derive(Debug, Clone, Serialize)]
struct MetaConvert {
    jpeg_quality: u8,
    patch: usize,
}

#[derive(Debug, Clone, Serialize)]
struct MetaEnhance {
    gammas: Vec<f32>,
    quantize: Quantize,
}

#[derive(Debug, Clone, Serialize)]
struct MetaInterpolate {
    kernels: Vec<Interpolation>,
    steps: Vec<&'static str>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    match cli.cmd {
        Command::Convert(args) => run_convert(args),
        Command::Enhance(args) => run_enhance(args),
        Command::Interpolate(args) => run_interpolate(args),
    }
}

fn run_convert(args: ConvertArgs) -> Result<()> {
    let sources = resolve_sources(&args.inputs)?;
    prepare_out_dir(&args.out)?;
    let writer = ImageCrateWriter;

    let (processed, skipped) = process_batch(&sources, |src, img| {
        println!("{} -> {}x{}", src.path.display(), img.width(), img.height());
        print_patch(&src.path, img, args.patch);

        let format = match src.decoder {
            Decoder::Raw(_) => OutputFormat::Png,
            Decoder::Bmp(_) => OutputFormat::Jpeg {
                quality: args.quality,
            },
        };
        let path = args
            .out
            .join(format!("{}.{}", src.stem(), format.extension()));
        save(&writer, &path, img, format)?;
        Ok(vec![path])
    })?;

    write_meta(
        &args.out,
        &RunMeta {
            command: "convert",
            params: MetaConvert {
                jpeg_quality: args.quality,
                patch: args.patch,
            },
            processed,
            skipped,
        },
    )
}

fn run_enhance(args: EnhanceArgs) -> Result<()> {
    for &g in &args.gamma {
        PointOp::Gamma(g)
            .validate()
            .with_context(|| format!("checking --gamma {g}"))?;
    }
    let quantize = if args.truncate {
        Quantize::Truncate
    } else {
        Quantize::Round
    };

    let sources = resolve_sources(&args.inputs)?;
    prepare_out_dir(&args.out)?;
    let writer = ImageCrateWriter;

    let mut ops = vec![("log".to_string(), PointOp::Log)];
    ops.extend(
        args.gamma
            .iter()
            .map(|&g| (format!("gamma{}", gamma_tag(g)), PointOp::Gamma(g))),
    );
    ops.push(("neg".to_string(), PointOp::Negative));

    let (processed, skipped) = process_batch(&sources, |src, img| {
        let mut outputs = Vec::with_capacity(ops.len());
        for (suffix, op) in &ops {
            let out = apply_point_op(&img.as_view(), *op, quantize)
                .with_context(|| format!("applying {op:?}"))?;
            let path = args.out.join(format!("{}_{suffix}.png", src.stem()));
            save(&writer, &path, &out, OutputFormat::Png)?;
            outputs.push(path);
        }
        log::info!("enhanced {} {}", src.kind(), src.path.display());
        Ok(outputs)
    })?;

    write_meta(
        &args.out,
        &RunMeta {
            command: "enhance",
            params: MetaEnhance {
                gammas: args.gamma.clone(),
                quantize,
            },
            processed,
            skipped,
        },
    )
}

/// Suffixes written per kernel by `interpolate`, in order.
const INTERPOLATE_STEPS: [&str; 5] = ["128", "32", "32to512", "1024x512", "256x512"];

fn run_interpolate(args: InterpolateArgs) -> Result<()> {
    let sources = resolve_sources(&args.inputs)?;
    prepare_out_dir(&args.out)?;
    let writer = ImageCrateWriter;
    let kernels = [Interpolation::Nearest, Interpolation::Bilinear];

    let (processed, skipped) = process_batch(&sources, |src, img| {
        let mut outputs = Vec::new();
        for kernel in kernels {
            let view = img.as_view();
            let r128 = resize(&view, 128, 128, kernel)?;
            let r32 = resize(&view, 32, 32, kernel)?;
            // enlarge this kernel's own 32x32 so the loss is attributable to it
            let r32to512 = resize(&r32.as_view(), 512, 512, kernel)?;
            let wide = resize(&view, 1024, 512, kernel)?;
            let tall = resize(&r128.as_view(), 256, 512, kernel)?;

            for (suffix, out) in INTERPOLATE_STEPS
                .iter()
                .zip([&r128, &r32, &r32to512, &wide, &tall])
            {
                let path = args
                    .out
                    .join(format!("{}_{}_{suffix}.png", src.stem(), kernel.tag()));
                save(&writer, &path, out, OutputFormat::Png)?;
                outputs.push(path);
            }
        }
        log::info!("resampled {} {}", src.kind(), src.path.display());
        Ok(outputs)
    })?;

    write_meta(
        &args.out,
        &RunMeta {
            command: "interpolate",
            params: MetaInterpolate {
                kernels: kernels.to_vec(),
                steps: INTERPOLATE_STEPS.to_vec(),
            },
            processed,
            skipped,
        },
    )
}

/// Decodes every source and hands it to `per_image`.
///
/// Decode failures are logged and recorded; the batch continues. Errors from
/// `per_image` (transform or write failures) abort the run.
fn process_batch<F>(
    sources: &[Source],
    mut per_image: F,
) -> Result<(Vec<ProcessedDto>, Vec<SkippedDto>)>
where
    F: FnMut(&Source, &GrayImage) -> Result<Vec<PathBuf>>,
{
    let mut processed = Vec::new();
    let mut skipped = Vec::new();

    for src in sources {
        let img = match src.decode() {
            Ok(img) => img,
            Err(err) => {
                log::warn!("skipping {}: {err}", src.path.display());
                skipped.push(SkippedDto {
                    input: src.path.clone(),
                    error: err.to_string(),
                });
                continue;
            }
        };

        let outputs = per_image(src, &img)
            .with_context(|| format!("processing {}", src.path.display()))?;
        processed.push(ProcessedDto {
            input: src.path.clone(),
            kind: src.kind(),
            width: img.width(),
            height: img.height(),
            outputs,
        });
    }

    Ok((processed, skipped))
}

fn resolve_sources(inputs: &InputArgs) -> Result<Vec<Source>> {
    let raw = RawDecoder::new(inputs.raw_width, inputs.raw_height);
    let bmp = BmpDecoder::new(inputs.bmp_offset.into());

    let mut sources = Vec::new();
    if let Some(manifest_path) = &inputs.manifest {
        let manifest: Manifest = read_json(manifest_path)?;
        let base = manifest_path.parent().unwrap_or(Path::new("."));
        for entry in manifest.raw {
            sources.push(Source {
                path: base.join(entry.path),
                decoder: Decoder::Raw(RawDecoder::new(
                    entry.width.unwrap_or(raw.width),
                    entry.height.unwrap_or(raw.height),
                )),
            });
        }
        for entry in manifest.bmp {
            sources.push(Source {
                path: base.join(entry.path),
                decoder: Decoder::Bmp(entry.offset_mode.map(BmpDecoder::new).unwrap_or(bmp)),
            });
        }
    }

    sources.extend(inputs.raw.iter().map(|p| Source {
        path: p.clone(),
        decoder: Decoder::Raw(raw),
    }));
    sources.extend(inputs.bmp.iter().map(|p| Source {
        path: p.clone(),
        decoder: Decoder::Bmp(bmp),
    }));

    if sources.is_empty() {
        log::info!("no inputs given, using the default sample list");
        sources.extend(DEFAULT_RAW.iter().map(|p| Source {
            path: PathBuf::from(p),
            decoder: Decoder::Raw(raw),
        }));
        sources.extend(DEFAULT_BMP.iter().map(|p| Source {
            path: PathBuf::from(p),
            decoder: Decoder::Bmp(bmp),
        }));
    }

    Ok(sources)
}

/// `0.5 -> "05"`, `2.0 -> "20"`: tenths, zero padded to two digits.
fn gamma_tag(gamma: f32) -> String {
    format!("{:02}", (gamma * 10.0).round() as u32)
}

fn print_patch(path: &Path, img: &GrayImage, size: usize) {
    let patch = center_patch(&img.as_view(), size);
    println!(
        "Center {}x{} pixels of {}:",
        patch.width(),
        patch.height(),
        path.display()
    );
    for row in patch.as_view().rows() {
        let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        println!("{}", line.join(" "));
    }
    println!();
}

fn prepare_out_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))
}

fn save(
    writer: &impl ImageWriter,
    path: &Path,
    img: &GrayImage,
    format: OutputFormat,
) -> Result<()> {
    writer
        .write(path, &img.as_view(), format)
        .with_context(|| format!("saving image {}", path.display()))
}

fn write_meta(dir: &Path, meta: &impl Serialize) -> Result<()> {
    let path = dir.join("meta.json");
    let bytes = serde_json::to_vec_pretty(meta).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    if !path.is_file() {
        bail!("manifest is not a file: {}", path.display());
    }
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing json {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use clap::Parser;
    use graypipe::{BmpDecoder, OffsetMode, RawDecoder};

    use super::{Cli, Command, Decoder, Source, gamma_tag, resolve_sources, run};

    fn write_raw(dir: &Path, name: &str, w: usize, h: usize) -> PathBuf {
        let path = dir.join(name);
        let data: Vec<u8> = (0..w * h).map(|i| (i * 7 % 256) as u8).collect();
        fs::write(&path, data).expect("write raw");
        path
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("gp_gallery").chain(args.iter().copied()))
            .expect("valid command line")
    }

    fn read_meta(dir: &Path) -> serde_json::Value {
        let bytes = fs::read(dir.join("meta.json")).expect("meta.json exists");
        serde_json::from_slice(&bytes).expect("valid json")
    }

    #[test]
    fn gamma_tags_match_file_naming() {
        assert_eq!(gamma_tag(0.5), "05");
        assert_eq!(gamma_tag(2.0), "20");
        assert_eq!(gamma_tag(1.5), "15");
    }

    #[test]
    fn defaults_apply_without_inputs() {
        let Command::Convert(args) = parse(&["convert"]).cmd else {
            panic!("expected convert");
        };
        let sources = resolve_sources(&args.inputs).expect("resolve");
        assert_eq!(sources.len(), 6);
        assert_eq!(sources[0].path, PathBuf::from("data/lena.raw"));
        assert_eq!(sources[0].decoder, Decoder::Raw(RawDecoder::new(512, 512)));
        assert_eq!(sources[5].path, PathBuf::from("data/F16.bmp"));
        assert_eq!(args.quality, 95);
    }

    #[test]
    fn manifest_entries_resolve_relative_to_manifest() {
        let dir = tempfile::tempdir().expect("temp dir");
        let manifest = dir.path().join("inputs.json");
        fs::write(
            &manifest,
            r#"{
                "raw": [{ "path": "a.raw", "width": 64, "height": 32 }],
                "bmp": [{ "path": "b.bmp", "offset_mode": "skip-palette-heuristic" }, { "path": "c.bmp" }]
            }"#,
        )
        .expect("write manifest");

        let manifest_arg = manifest.to_string_lossy().into_owned();
        let Command::Enhance(args) = parse(&["enhance", "--manifest", &manifest_arg]).cmd else {
            panic!("expected enhance");
        };
        let sources = resolve_sources(&args.inputs).expect("resolve");

        assert_eq!(
            sources,
            vec![
                Source {
                    path: dir.path().join("a.raw"),
                    decoder: Decoder::Raw(RawDecoder::new(64, 32)),
                },
                Source {
                    path: dir.path().join("b.bmp"),
                    decoder: Decoder::Bmp(BmpDecoder::new(OffsetMode::SkipPaletteHeuristic)),
                },
                Source {
                    path: dir.path().join("c.bmp"),
                    decoder: Decoder::Bmp(BmpDecoder::new(OffsetMode::TrustOffset)),
                },
            ]
        );
    }

    #[test]
    fn enhance_skips_unreadable_inputs_and_records_them() {
        let dir = tempfile::tempdir().expect("temp dir");
        let good = write_raw(dir.path(), "good.raw", 16, 8);
        let missing = dir.path().join("missing.raw");
        let out = dir.path().join("out");

        let good_arg = good.to_string_lossy().into_owned();
        let missing_arg = missing.to_string_lossy().into_owned();
        let out_arg = out.to_string_lossy().into_owned();
        run(parse(&[
            "enhance",
            "--raw",
            &missing_arg,
            &good_arg,
            "--raw-width",
            "16",
            "--raw-height",
            "8",
            "--out",
            &out_arg,
        ]))
        .expect("batch succeeds despite a missing file");

        for suffix in ["log", "gamma05", "gamma20", "neg"] {
            assert!(out.join(format!("good_{suffix}.png")).is_file(), "{suffix}");
        }

        let meta = read_meta(&out);
        assert_eq!(meta["command"], "enhance");
        assert_eq!(meta["processed"].as_array().map(Vec::len), Some(1));
        assert_eq!(meta["skipped"].as_array().map(Vec::len), Some(1));
        assert_eq!(meta["params"]["quantize"], "round");
    }

    #[test]
    fn enhance_rejects_non_positive_gamma() {
        let dir = tempfile::tempdir().expect("temp dir");
        let out_arg = dir.path().join("out").to_string_lossy().into_owned();
        let err = run(parse(&["enhance", "--gamma", "0.5,0", "--out", &out_arg]))
            .expect_err("gamma 0 is invalid");
        assert!(format!("{err:#}").contains("gamma"));
    }

    #[test]
    fn interpolate_writes_every_step_for_both_kernels() {
        let dir = tempfile::tempdir().expect("temp dir");
        let src = write_raw(dir.path(), "tiny.raw", 40, 30);
        let out = dir.path().join("interp");

        let src_arg = src.to_string_lossy().into_owned();
        let out_arg = out.to_string_lossy().into_owned();
        run(parse(&[
            "interpolate",
            "--raw",
            &src_arg,
            "--raw-width",
            "40",
            "--raw-height",
            "30",
            "--out",
            &out_arg,
        ]))
        .expect("interpolate");

        for kernel in ["nn", "bilinear"] {
            for step in ["128", "32", "32to512", "1024x512", "256x512"] {
                let path = out.join(format!("tiny_{kernel}_{step}.png"));
                assert!(path.is_file(), "{}", path.display());
            }
        }
        let wide = image_dims(&out.join("tiny_nn_1024x512.png"));
        assert_eq!(wide, (1024, 512));
    }

    #[test]
    fn convert_writes_png_for_raw_inputs() {
        let dir = tempfile::tempdir().expect("temp dir");
        let src = write_raw(dir.path(), "plain.raw", 12, 12);
        let out = dir.path().join("conv");

        let src_arg = src.to_string_lossy().into_owned();
        let out_arg = out.to_string_lossy().into_owned();
        run(parse(&[
            "convert",
            "--raw",
            &src_arg,
            "--raw-width",
            "12",
            "--raw-height",
            "12",
            "--out",
            &out_arg,
        ]))
        .expect("convert");

        assert_eq!(image_dims(&out.join("plain.png")), (12, 12));
        assert_eq!(read_meta(&out)["params"]["jpeg_quality"], 95);
    }

    fn image_dims(path: &Path) -> (u32, u32) {
        let bytes = fs::read(path).expect("png exists");
        // IHDR width/height are the first fields after the 8-byte signature + chunk header
        let w = u32::from_be_bytes(bytes[16..20].try_into().expect("4 bytes"));
        let h = u32::from_be_bytes(bytes[20..24].try_into().expect("4 bytes"));
        (w, h)
    }
}
