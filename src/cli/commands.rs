use crate::analyzers::{IndexKind, SeriesStatistics, StormAnalyzer};
use crate::cli::args::{Cli, Commands};
use crate::download;
use crate::error::ProcessingError;
use crate::models::glm::glm_directory_url;
use crate::models::{
    BoundingBox, DstMonth, ExtractorConfig, GeoIndex, KpRequest, SeriesPoint, Settings,
};
use crate::processors::SeriesExtractor;
use crate::readers::{DstReader, GlmReader, KpReader};
use crate::utils::logging::init_logging;
use crate::utils::progress::ProgressReporter;
use crate::utils::{
    generate_default_dst_filename, generate_default_glm_filename, generate_default_index_filename,
    OutputFormat,
};
use crate::writers::{CsvWriter, ParquetWriter};
use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use std::path::Path;
use tracing::{info, warn};

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;

    match cli.command {
        Commands::Dst {
            year,
            month,
            input,
            output_file,
            format,
            save_raw,
            compression,
        } => {
            let today = Utc::now().date_naive();
            let reader = DstReader::with_config(settings.extractor.clone());

            let (month, body) = match input {
                Some(path) => {
                    let month = match (year, month) {
                        (Some(y), Some(m)) => DstMonth::new(y, m)?,
                        _ => reader.month_from_path(&path)?,
                    };
                    let body = std::fs::read(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    (month, body)
                }
                None => {
                    let month = DstMonth::new(
                        year.unwrap_or_else(|| today.year()),
                        month.unwrap_or_else(|| today.month()),
                    )?;
                    month.check_available(today)?;

                    let progress = ProgressReporter::new_spinner("Fetching Dst feed...", false);
                    let body = match save_raw {
                        Some(ref raw_path) => {
                            download::fetch_to_file(&month.url(), raw_path, Some(&progress)).await?
                        }
                        None => download::fetch_bytes(&month.url(), Some(&progress)).await?,
                    };
                    progress.finish_with_message(&format!("Downloaded {}", month.file_name()));
                    (month, body)
                }
            };

            let (timed, report) = reader.parse_feed(&body, month)?;
            println!("Dst {}", month.label());
            println!("{}", report.summary());

            let stats = StormAnalyzer::new(IndexKind::Dst).analyze(timed.series());
            print_statistics(&stats);
            if let Some(at) = stats.peak_slot.and_then(|slot| timed.timestamp_at(slot)) {
                println!("Minimum Dst at {}", at.format("%Y-%m-%d %H:%M UT"));
            }

            let output_file = output_file.unwrap_or_else(|| {
                generate_default_dst_filename(&settings.output_dir, month, format)
            });
            let points: Vec<SeriesPoint> = timed.points().collect();
            write_points(&points, IndexKind::Dst, format, &compression, &output_file)?;
        }

        Commands::Kp {
            start,
            end,
            index,
            status,
            input,
            output_file,
            format,
            compression,
        } => {
            let request = match (start, end) {
                (Some(start), Some(end)) => KpRequest::parse(&start, &end, &index, &status)?,
                (None, None) => {
                    let mut request = KpRequest::last_days(index.parse()?)?;
                    request.status = status.parse()?;
                    request
                }
                (Some(start), None) => {
                    let now = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
                    KpRequest::parse(&start, &now, &index, &status)?
                }
                (None, Some(_)) => {
                    return Err(ProcessingError::MissingData(
                        "--start is required when --end is given".to_string(),
                    )
                    .into())
                }
            };

            let reader = KpReader::new(request.index);
            let kp = match input {
                Some(path) => reader.read_file(&path)?,
                None => {
                    let progress = ProgressReporter::new_spinner("Fetching index data...", false);
                    let body = download::fetch_text(&request.url(), Some(&progress)).await?;
                    progress.finish_with_message("Index data downloaded");
                    reader.parse_json(&body)?
                }
            };

            if kp.is_empty() {
                warn!(index = %request.index, "no data points returned");
                println!("No data retrieved");
                return Ok(());
            }

            let kind = if request.index == GeoIndex::Kp {
                IndexKind::Kp
            } else {
                IndexKind::Other
            };
            println!(
                "{} from {} to {}: {} points ({} definitive)",
                request.index,
                request.start,
                request.end,
                kp.len(),
                kp.definitive_count()
            );
            print_statistics(&StormAnalyzer::new(kind).analyze(&kp.values));

            let output_file = output_file.unwrap_or_else(|| {
                generate_default_index_filename(&settings.output_dir, request.index.as_str(), format)
            });
            let points: Vec<SeriesPoint> = kp.points().collect();
            write_points(&points, kind, format, &compression, &output_file)?;
        }

        Commands::Extract {
            input,
            sentinel,
            threshold,
            leading_trim,
            trailing_trim,
            footer,
            output_file,
            format,
        } => {
            let config = ExtractorConfig::new(sentinel, threshold, leading_trim, trailing_trim, footer);
            validator::Validate::validate(&config)?;

            let body = std::fs::read(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let (series, report) = SeriesExtractor::new(config).extract_with_report(&body)?;

            println!("{}", report.summary());
            print_statistics(&StormAnalyzer::new(IndexKind::Other).analyze(&series));

            match output_file {
                Some(path) => {
                    let points: Vec<SeriesPoint> = series.points().collect();
                    write_points(&points, IndexKind::Other, format, "snappy", &path)?;
                }
                None => {
                    let rendered: Vec<String> = series
                        .iter()
                        .map(|v| v.map_or("NaN".to_string(), |v| v.to_string()))
                        .collect();
                    println!("[{}]", rendered.join(", "));
                }
            }
        }

        Commands::Glm {
            year,
            month,
            listing,
            save,
            grid,
            output_file,
        } => {
            let today = Utc::now().date_naive();
            let directory = glm_directory_url(
                year.unwrap_or_else(|| today.year()),
                month.unwrap_or_else(|| today.month()),
            );
            let reader = GlmReader::new();

            let listing = match listing {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => {
                    let progress = ProgressReporter::new_spinner("Fetching GLM listing...", false);
                    let body = download::fetch_text(&directory, Some(&progress)).await?;
                    progress.finish_with_message("GLM listing downloaded");
                    body
                }
            };

            let Some(latest) = reader.latest_file(&listing, &directory)? else {
                warn!(%directory, "no GLM files listed");
                println!("No GLM files found");
                return Ok(());
            };

            let local = latest.local_time()?;
            println!("Latest GLM file: {}", latest.url);
            println!(
                "Observed {} UTC ({} Peru)",
                latest.observed.format("%Y-%m-%d %H:%M"),
                local.format("%H:%M")
            );

            if let Some(save_path) = save {
                let progress = ProgressReporter::new_spinner("Fetching GLM file...", false);
                let body = download::fetch_to_file(&latest.url, &save_path, Some(&progress)).await?;
                progress.finish_with_message(&format!("Saved {} ({} bytes)", latest.name, body.len()));
            }

            if let Some(grid_path) = grid {
                let grid = reader.read_grid(&grid_path)?;
                let flashes = grid.flashes_within(&BoundingBox::peru())?;
                let longest = flashes.iter().map(|f| f.duration).reduce(f64::max);

                println!("{} flash cells inside the region", flashes.len());
                if let Some(longest) = longest {
                    println!("Longest accumulated duration: {:.2} s", longest);
                }

                let output_file = output_file.unwrap_or_else(|| {
                    generate_default_glm_filename(&settings.output_dir, latest.observed)
                });
                if let Some(parent) = output_file.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                CsvWriter::new().write_flashes(&flashes, &output_file)?;
                println!("Wrote {} flash points to {}", flashes.len(), output_file.display());
            }
        }

        Commands::Info { file, kind } => {
            println!("Analyzing Parquet file: {}", file.display());

            let kind = match kind.to_lowercase().as_str() {
                "dst" => IndexKind::Dst,
                "kp" => IndexKind::Kp,
                _ => IndexKind::Other,
            };

            let writer = ParquetWriter::new();
            let file_info = writer.get_file_info(&file)?;
            let series = writer.read_series(&file)?;

            println!("\n{}", file_info.summary());
            print_statistics(&StormAnalyzer::new(kind).analyze(&series));
        }
    }

    Ok(())
}

fn print_statistics(stats: &SeriesStatistics) {
    println!("\n{}", stats.summary());
    if stats.missing_slots > 0 {
        info!(
            missing = stats.missing_slots,
            percent = stats.missing_percentage(),
            "series has gaps"
        );
    }
}

fn write_points(
    points: &[SeriesPoint],
    kind: IndexKind,
    format: OutputFormat,
    compression: &str,
    output_file: &Path,
) -> Result<()> {
    // Create output directory if it doesn't exist
    if let Some(parent) = output_file.parent() {
        std::fs::create_dir_all(parent)?;
    }

    match format {
        OutputFormat::Parquet => ParquetWriter::new()
            .with_compression(compression)?
            .write_points(points, kind, output_file)?,
        OutputFormat::Csv => CsvWriter::new().write_points(points, kind, output_file)?,
    }

    println!("Wrote {} slots to {}", points.len(), output_file.display());
    Ok(())
}
