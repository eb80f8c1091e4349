//! CLI binary for GPX Framer
//!
//! Command-line interface over the track-to-frames pipeline library.

use anyhow::{anyhow, Result};
use clap::{Arg, Command};
use glob::glob;
use gpx_framer::pipeline::{self, ExportOptions};
use gpx_framer::types::PipelineConfig;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let matches = Command::new("GPX Framer")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert GPX tracks to CSV and extract geotagged still frames from a companion video.")
        .arg(
            Arg::new("files")
                .help("GPX files to process (.gpx extension, case-insensitive, supports globbing)")
                .required(true)
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("csv")
                .long("csv")
                .help("Export the raw flattened track to a CSV file")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("annotated")
                .long("annotated")
                .help("Export the decimated track with direction annotations to a CSV file")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("frames")
                .long("frames")
                .help("Extract still frames from the companion video at each retained point")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("geotag")
                .long("geotag")
                .help("Embed GPS EXIF metadata into extracted frames (implies --frames)")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("video")
                .long("video")
                .help("Companion video file (single GPX input only; default: <stem>.mp4/.mov/.avi beside the GPX)")
                .value_name("PATH"),
        )
        .arg(
            Arg::new("fps")
                .long("fps")
                .help("Override the frame rate reported by the video stream")
                .value_name("FPS")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory for output files (default: same as input file)")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let debug = matches.get_flag("debug");
    let geotag = matches.get_flag("geotag");
    let options = ExportOptions {
        raw_csv: matches.get_flag("csv"),
        annotated_csv: matches.get_flag("annotated"),
        frames: matches.get_flag("frames") || geotag,
        geotag,
        output_dir: matches.get_one::<String>("output-dir").map(PathBuf::from),
        fps_override: matches.get_one::<f64>("fps").copied(),
        debug,
    };
    let explicit_video = matches.get_one::<String>("video").map(PathBuf::from);
    let file_patterns: Vec<&String> = matches.get_many::<String>("files").unwrap().collect();

    if debug {
        println!("Input patterns: {file_patterns:?}");
    }

    // Collect all valid file paths
    let mut valid_paths = Vec::new();
    for pattern in &file_patterns {
        let paths: Vec<_> = if pattern.contains('*') || pattern.contains('?') {
            match glob(pattern) {
                Ok(glob_iter) => match glob_iter.collect::<Result<Vec<_>, _>>() {
                    Ok(paths) => {
                        if debug {
                            println!("Glob pattern '{pattern}' matched {} files", paths.len());
                        }
                        paths
                    }
                    Err(e) => {
                        eprintln!("Error expanding glob pattern '{pattern}': {e}");
                        continue;
                    }
                },
                Err(e) => {
                    eprintln!("Invalid glob pattern '{pattern}': {e}");
                    continue;
                }
            }
        } else {
            vec![Path::new(pattern).to_path_buf()]
        };

        for path in paths {
            if !path.exists() {
                eprintln!("Warning: File does not exist: {path:?}");
                continue;
            }

            let valid_extension = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("gpx"))
                .unwrap_or(false);

            if !valid_extension {
                let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("none");
                eprintln!("Warning: Skipping file with unsupported extension '{ext}': {path:?}");
                continue;
            }

            valid_paths.push(path);
        }
    }

    if valid_paths.is_empty() {
        eprintln!("Error: No valid files found to process.");
        eprintln!("Supported extension: .gpx (case-insensitive)");
        eprintln!("Input patterns were: {file_patterns:?}");
        std::process::exit(1);
    }

    if explicit_video.is_some() && valid_paths.len() > 1 {
        eprintln!("Error: --video can only be used with a single GPX input.");
        std::process::exit(1);
    }

    let config = PipelineConfig::default();
    let mut processed_files = 0;

    for (index, path) in valid_paths.iter().enumerate() {
        if index > 0 {
            println!();
        }

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");
        println!("Processing: {filename}");

        match process_file(path, explicit_video.as_deref(), &config, &options) {
            Ok(()) => processed_files += 1,
            Err(e) => {
                eprintln!("Error processing {filename}: {e}");
                eprintln!("Continuing with next file...");
            }
        }
    }

    if processed_files == 0 {
        eprintln!(
            "Error: No files were successfully processed out of {} files found.",
            valid_paths.len()
        );
        eprintln!("Use --debug for more detailed information.");
        std::process::exit(1);
    }

    Ok(())
}

fn process_file(
    gpx_path: &Path,
    explicit_video: Option<&Path>,
    config: &PipelineConfig,
    options: &ExportOptions,
) -> Result<()> {
    let (mut annotated, mut report) = pipeline::process_track_file(gpx_path, config, options)?;

    if options.frames {
        let video_path = match explicit_video {
            Some(path) => path.to_path_buf(),
            None => pipeline::find_companion_video(gpx_path).ok_or_else(|| {
                anyhow!(
                    "no companion video found for {:?} (looked for <stem>.mp4/.mov/.avi)",
                    gpx_path
                )
            })?,
        };
        extract_frames(&mut annotated, &video_path, options, &mut report)?;
    }

    Ok(())
}

#[cfg(feature = "ffmpeg")]
fn extract_frames(
    annotated: &mut [gpx_framer::AnnotatedPoint],
    video_path: &Path,
    options: &ExportOptions,
    report: &mut gpx_framer::ExportReport,
) -> Result<()> {
    use gpx_framer::video::ffmpeg::FfmpegFrameSource;

    let source = FfmpegFrameSource::open(video_path)?;
    let tagger = geotagger(options)?;
    pipeline::extract_track_frames(
        annotated,
        source,
        video_path,
        tagger.as_deref(),
        options,
        report,
    )?;
    Ok(())
}

#[cfg(not(feature = "ffmpeg"))]
fn extract_frames(
    _annotated: &mut [gpx_framer::AnnotatedPoint],
    _video_path: &Path,
    _options: &ExportOptions,
    _report: &mut gpx_framer::ExportReport,
) -> Result<()> {
    Err(anyhow!(
        "frame extraction requires building with the 'ffmpeg' feature"
    ))
}

#[cfg(feature = "ffmpeg")]
fn geotagger(options: &ExportOptions) -> Result<Option<Box<dyn gpx_framer::geotag::GeoTagWriter>>> {
    if !options.geotag {
        return Ok(None);
    }
    #[cfg(feature = "exif")]
    {
        Ok(Some(Box::new(gpx_framer::geotag::ExifGeoTagger)))
    }
    #[cfg(not(feature = "exif"))]
    {
        Err(anyhow!("--geotag requires building with the 'exif' feature"))
    }
}
