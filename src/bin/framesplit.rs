use std::{fs, path::PathBuf};

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use colored::Colorize;
use framesplit::{
    FfmpegDecoder, FfmpegLogLevel, FrameDecoder, FrameSource, GrayscaleFormula, ImageFormat,
    SamplingOptions, SamplingWindow, batch, timecode::parse_timecode,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  framesplit split input.wmv --output frames --format png --step 0.5\n  framesplit split input.avi --output frames --start 0:00:01:00 --end 0:00:02:00 --gray --rotate\n  framesplit grayscale frames frames_gray\n  framesplit probe input.avi --json\n  framesplit completions zsh > _framesplit";

#[derive(Debug, Parser)]
#[command(
    name = "framesplit",
    version,
    about = "Split a video into still images sampled at a fixed time step",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show debug logging output (RUST_LOG overrides).
    #[arg(long, global = true)]
    verbose: bool,

    /// Show a progress bar while splitting.
    #[arg(long, global = true)]
    progress: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum FormulaArg {
    /// 0.3 R + 0.59 B + 0.11 B, matching earlier releases.
    #[default]
    AsObserved,
    /// 0.3 R + 0.59 G + 0.11 B.
    Luma,
}

impl From<FormulaArg> for GrayscaleFormula {
    fn from(value: FormulaArg) -> Self {
        match value {
            FormulaArg::AsObserved => GrayscaleFormula::AsObserved,
            FormulaArg::Luma => GrayscaleFormula::Luma,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sample frames from a video into numbered image files.
    #[command(
        about = "Split a video into images",
        after_help = "Time values: seconds (12.5), mm:ss, hh:mm:ss[.f], d.hh:mm:ss[.f] or d:hh:mm:ss[.f].\nFiles are named 000001.<format>, 000002.<format>, ..."
    )]
    Split {
        /// Input video file.
        input: PathBuf,
        /// Output directory, created if missing.
        #[arg(long)]
        output: PathBuf,
        /// Output image format (bmp, emf, exif, gif, ico, jpg, png, tiff, wmf).
        #[arg(long, default_value = "bmp")]
        format: String,
        /// Rotate each frame by 180° and mirror it horizontally.
        #[arg(long)]
        rotate: bool,
        /// Convert each frame to gray.
        #[arg(long)]
        gray: bool,
        /// Gray weighting used with --gray.
        #[arg(long, value_enum, default_value_t = FormulaArg::AsObserved)]
        formula: FormulaArg,
        /// Video time of the first frame.
        #[arg(long, default_value = "0")]
        start: String,
        /// Video time at which to stop (default: end of the stream).
        #[arg(long)]
        end: Option<String>,
        /// Time between frames.
        #[arg(long, default_value = "0.04")]
        step: String,
    },

    /// Convert every .bmp below a directory to gray.
    #[command(
        about = "Grayscale a directory of bitmaps",
        after_help = "Subdirectories are processed too; their layout is mirrored in the output."
    )]
    Grayscale {
        /// Directory searched recursively for .bmp files.
        input: PathBuf,
        /// Output directory, created if missing.
        output: PathBuf,
        /// Gray weighting.
        #[arg(long, value_enum, default_value_t = FormulaArg::AsObserved)]
        formula: FormulaArg,
    },

    /// Print the selected video stream and the resulting frame count.
    #[command(about = "Print stream metadata", visible_alias = "info")]
    Probe {
        /// Input video file.
        input: PathBuf,
        #[arg(long, default_value = "0")]
        start: String,
        #[arg(long)]
        end: Option<String>,
        #[arg(long, default_value = "0.04")]
        step: String,
        /// Output as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_logging(global: &GlobalOptions) {
    let default_filter = if global.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn apply_global_options(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(level) = &global.log_level {
        let parsed: FfmpegLogLevel = level.parse()?;
        framesplit::set_ffmpeg_log_level(parsed);
    }
    Ok(())
}

/// Parse start/end/step into sampling options.
fn sampling_options(
    start: &str,
    end: Option<&str>,
    step: &str,
) -> Result<SamplingOptions, Box<dyn std::error::Error>> {
    let mut options = SamplingOptions::new()
        .with_start(parse_timecode(start)?)
        .with_step(parse_timecode(step)?);
    if let Some(end) = end {
        options = options.with_end(parse_timecode(end)?);
    }
    if options.step.is_zero() {
        return Err("--step must be greater than 0".into());
    }
    Ok(options)
}

fn frame_file_name(sequence: u64, format: ImageFormat) -> String {
    format!("{sequence:06}.{}", format.extension())
}

fn split(
    global: &GlobalOptions,
    input: PathBuf,
    output_dir: PathBuf,
    options: SamplingOptions,
) -> Result<u64, Box<dyn std::error::Error>> {
    if !input.is_file() {
        return Err(format!("input video file was not found: {}", input.display()).into());
    }
    fs::create_dir_all(&output_dir)?;

    let format = options.format;
    let source = FrameSource::open(&input, options)?;
    let total = source.window().map_or(0, |window| window.frame_count());

    let progress_bar = if global.progress {
        let pb = ProgressBar::new(total);
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
        pb.set_style(style.progress_chars("##-"));
        Some(pb)
    } else {
        None
    };

    log::info!("Processing...");
    let mut written = 0_u64;
    while !source.is_exhausted() {
        let Some(frame) = source.next_frame()? else {
            break;
        };
        written += 1;
        let output_path = output_dir.join(frame_file_name(written, format));
        fs::write(&output_path, &frame.bytes)?;
        log::debug!(
            "saved frame at {:?} -> {}",
            frame.position,
            output_path.display()
        );

        if let Some(pb) = &progress_bar {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress_bar {
        pb.finish_with_message("done");
    }
    Ok(written)
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.global);
    apply_global_options(&cli.global)?;
    log::info!("framesplit {}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Split {
            input,
            output,
            format,
            rotate,
            gray,
            formula,
            start,
            end,
            step,
        } => {
            let format: ImageFormat = format.parse()?;
            let options = sampling_options(&start, end.as_deref(), &step)?
                .with_format(format)
                .with_rotate(rotate)
                .with_grayscale(gray)
                .with_grayscale_formula(formula.into());

            let written = split(&cli.global, input, output.clone(), options)?;
            log::info!("Done.");
            println!(
                "{} {}",
                "success:".green().bold(),
                format!("Wrote {written} frame(s) to {}", output.display()).green()
            );
        }
        Commands::Grayscale {
            input,
            output,
            formula,
        } => {
            log::info!("Processing...");
            let converted = batch::grayscale_directory(&input, &output, formula.into())?;
            log::info!("{converted} files processed.");
            println!(
                "{} {}",
                "success:".green().bold(),
                format!("Converted {converted} file(s) into {}", output.display()).green()
            );
        }
        Commands::Probe {
            input,
            start,
            end,
            step,
            json,
        } => {
            let options = sampling_options(&start, end.as_deref(), &step)?;
            let metadata = FfmpegDecoder::new().probe(&input)?;
            let window = SamplingWindow::new(
                options.start,
                options.end,
                options.step,
                metadata.stream_length,
            )?;
            if json {
                let payload = json!({
                    "stream_index": metadata.stream_index,
                    "width": metadata.width,
                    "height": metadata.height,
                    "codec": metadata.codec,
                    "buffer_size": metadata.buffer_size,
                    "stride": metadata.stride,
                    "stream_length_seconds": metadata.stream_length.as_secs_f64(),
                    "frame_count": window.frame_count(),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!(
                    "Video stream {}: {}x{} [{}]",
                    metadata.stream_index, metadata.width, metadata.height, metadata.codec
                );
                println!("Length: {:?}", metadata.stream_length);
                println!(
                    "Buffer: {} bytes ({} bytes per row)",
                    metadata.buffer_size, metadata.stride
                );
                println!(
                    "Frames: {} (start {:?}, end {:?}, step {:?})",
                    window.frame_count(),
                    window.start(),
                    window.effective_end(),
                    window.step()
                );
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "framesplit", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
