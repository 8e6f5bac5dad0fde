//! fileshift: detect an image's type and convert it between PNG and JPEG.

use anyhow::Context;
use clap::Parser;
use fileshift_cli::output::{Status, format_duration, format_size};
use fileshift_image::{ConvertOptions, DEFAULT_JPEG_QUALITY, convert_bytes, detect_file_type};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

const USAGE: &str = "usage: fileshift -in input.png -to jpg";

/// Long flags that may also be written with a single dash.
const SINGLE_DASH_FLAGS: &[&str] = &["in", "out", "to", "quality", "json"];

#[derive(Parser)]
#[command(name = "fileshift")]
#[command(about = "Detect an image's type and convert it between PNG and JPEG")]
#[command(version)]
struct Cli {
    /// Path to the input image file
    #[arg(long = "in", value_name = "PATH")]
    input: Option<PathBuf>,

    /// Path to the output image file (defaults to the input with the new extension)
    #[arg(long = "out", value_name = "PATH")]
    output: Option<PathBuf>,

    /// Target image format (png, jpg, jpeg)
    #[arg(long, default_value = "png")]
    to: String,

    /// JPEG quality (1-100)
    #[arg(
        long,
        default_value_t = DEFAULT_JPEG_QUALITY,
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    quality: u8,

    /// Print a JSON report instead of text lines
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    // Diagnostics go to stderr; only enabled via RUST_LOG
    if let Err(e) = fileshift_telemetry::init_with_config(
        fileshift_telemetry::TelemetryConfig::default().with_level("warn"),
    ) {
        Status::warning(&format!("logging disabled: {e:#}"));
    }

    let Some(input) = cli.input.clone() else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };

    match run(&cli, &input) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Status::error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, input: &Path) -> anyhow::Result<()> {
    let data = std::fs::read(input).context("failed to read input file")?;

    let filename = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let detection = detect_file_type(&data, &filename);
    if !cli.json {
        println!("Detected MIME: {} Ext: {}", detection.mime, detection.extension);
    }

    let options = ConvertOptions {
        jpeg_quality: cli.quality,
    };
    let started = Instant::now();
    let conversion = convert_bytes(&data, &cli.to, &options).context("convert error")?;
    let elapsed = started.elapsed();
    if !cli.json {
        println!("Output MIME: {}", conversion.mime);
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(input, &cli.to));
    if output.exists() {
        Status::warning(&format!("Overwriting {}", output.display()));
    }
    write_output(&output, &conversion.bytes).context("write error")?;

    tracing::debug!(
        input = %input.display(),
        output = %output.display(),
        source = ?conversion.source_format,
        "Conversion written"
    );

    if cli.json {
        let report = serde_json::json!({
            "input": input.to_string_lossy(),
            "detected": detection,
            "source_format": conversion.source_format,
            "width": conversion.width,
            "height": conversion.height,
            "output": output.to_string_lossy(),
            "output_mime": conversion.mime,
            "output_bytes": conversion.bytes.len(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Saved: {}", output.display());
        Status::success(&format!(
            "{}x{} in {} ({})",
            conversion.width,
            conversion.height,
            format_duration(elapsed),
            format_size(conversion.bytes.len() as u64)
        ));
    }

    Ok(())
}

/// Input path with its extension replaced by the target token (leading dot dropped).
fn default_output_path(input: &Path, to: &str) -> PathBuf {
    input.with_extension(to.strip_prefix('.').unwrap_or(to))
}

#[cfg(unix)]
fn write_output(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o644)
        .open(path)?;
    file.write_all(bytes)
}

#[cfg(not(unix))]
fn write_output(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, bytes)
}

/// Rewrite `-in x` / `-to=jpg` style flags to their `--` form for clap.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(|arg| {
            if passthrough {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }
            let Some(rest) = text.strip_prefix('-').filter(|r| !r.starts_with('-')) else {
                return arg;
            };
            let name = rest.split('=').next().unwrap_or(rest);
            if SINGLE_DASH_FLAGS.contains(&name) {
                OsString::from(format!("-{text}"))
            } else {
                arg
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_normalize_single_dash_flags() {
        let normalized =
            normalize_args(args(&["fileshift", "-in", "a.png", "-to=jpg", "-out", "b.jpg"]));
        assert_eq!(
            normalized,
            args(&["fileshift", "--in", "a.png", "--to=jpg", "--out", "b.jpg"])
        );
    }

    #[test]
    fn test_normalize_leaves_other_args() {
        let normalized = normalize_args(args(&["fileshift", "--in", "a.png", "-h", "-"]));
        assert_eq!(normalized, args(&["fileshift", "--in", "a.png", "-h", "-"]));
    }

    #[test]
    fn test_normalize_stops_at_double_dash() {
        let normalized = normalize_args(args(&["fileshift", "--", "-in"]));
        assert_eq!(normalized, args(&["fileshift", "--", "-in"]));
    }

    #[test]
    fn test_cli_parses_normalized_args() {
        let argv = args(&["fileshift", "-in", "cat.png", "-to", ".JPG"]);
        let cli = Cli::parse_from(normalize_args(argv));
        assert_eq!(cli.input.as_deref(), Some(Path::new("cat.png")));
        assert_eq!(cli.to, ".JPG");
        assert_eq!(cli.quality, 90);
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("img/cat.png"), "jpg"),
            PathBuf::from("img/cat.jpg")
        );
        assert_eq!(default_output_path(Path::new("cat"), ".png"), PathBuf::from("cat.png"));
        assert_eq!(
            default_output_path(Path::new("archive.tar.gz"), "jpeg"),
            PathBuf::from("archive.tar.jpeg")
        );
    }
}
