use pretty_assertions::assert_eq;
use spaceweather_processor::analyzers::{IndexKind, StormAnalyzer};
use spaceweather_processor::models::{
    BoundingBox, DstMonth, ExtractorConfig, GeoIndex, SeriesPoint,
};
use spaceweather_processor::processors::SeriesExtractor;
use spaceweather_processor::readers::{DstReader, GlmReader, KpReader};
use spaceweather_processor::writers::{CsvWriter, ParquetWriter};
use spaceweather_processor::ProcessingError;
use tempfile::TempDir;

/// One day of the Kyoto request format with 4-character fields
fn kyoto_day(day: u32, hourly: &[i32]) -> String {
    let mean = hourly.iter().sum::<i32>() / hourly.len() as i32;
    let values: String = hourly.iter().map(|v| format!("{:4}", v)).collect();
    format!("DST2405*{:02}RRX020   0{}{:4}", day, values, mean)
}

fn storm_month() -> String {
    let quiet = vec![-8; 24];
    let mut storm = vec![-20; 24];
    for (hour, value) in storm.iter_mut().enumerate().skip(16) {
        *value = -100 - (hour as i32 - 16) * 40;
    }
    let recovery = vec![-150; 24];

    format!(
        "{}\n{}\n{}\nCreated at 2024-05-04T02:15:00Z\n",
        kyoto_day(1, &quiet),
        kyoto_day(2, &storm),
        kyoto_day(3, &recovery)
    )
}

#[test]
fn test_dst_feed_to_parquet() -> Result<(), ProcessingError> {
    let dir = TempDir::new()?;
    let month = DstMonth::new(2024, 5)?;

    let (timed, report) = DstReader::new().parse_feed(storm_month().as_bytes(), month)?;
    assert_eq!(timed.series().len(), 72);
    assert_eq!(report.records, 3);
    assert!(report.footer_dropped);

    let stats = StormAnalyzer::new(IndexKind::Dst).analyze(timed.series());
    // Hour 23 of day 2: -100 - 7 * 40
    assert_eq!(stats.min, Some(-380.0));
    assert_eq!(stats.peak_slot, Some(24 + 23));
    assert_eq!(stats.missing_slots, 0);

    let path = dir.path().join("dst-2405.parquet");
    let points: Vec<SeriesPoint> = timed.points().collect();
    let writer = ParquetWriter::new().with_compression("zstd")?;
    writer.write_points(&points, IndexKind::Dst, &path)?;

    assert_eq!(writer.get_file_info(&path)?.total_rows, 72);
    assert_eq!(&writer.read_series(&path)?, timed.series());
    Ok(())
}

#[test]
fn test_untrimmed_feed_keeps_summary_fields() {
    let body = storm_month();

    let trimmed = SeriesExtractor::new(ExtractorConfig::dst()).extract_str(&body);
    let raw = SeriesExtractor::new(ExtractorConfig::raw()).extract_str(&body);

    // Day, version/century, base value and the daily mean stay in the raw series
    assert_eq!(trimmed.len(), 72);
    assert_eq!(raw.len(), 3 * 28);
}

#[test]
fn test_gaps_keep_positions() {
    let extractor = SeriesExtractor::new(ExtractorConfig::raw());
    let series = extractor.extract_str("1 5 -10 20 9999999999\n2 5 30 -40 -1200\nCreated at now");

    assert_eq!(series.len(), 8);
    assert_eq!(series.get(3), None);
    assert_eq!(series.get(4), Some(5.0));
    assert_eq!(series.get(7), None);
}

#[test]
fn test_kp_response_to_csv() -> Result<(), ProcessingError> {
    let dir = TempDir::new()?;
    let body = r#"{
        "datetime": ["2024-05-10T18:00:00Z", "2024-05-10T21:00:00Z", "2024-05-11T00:00:00Z"],
        "Kp": [8.333, 9.0, 8.667],
        "status": ["now", "now", "now"]
    }"#;

    let kp = KpReader::new(GeoIndex::Kp).parse_json(body)?;
    let stats = StormAnalyzer::new(IndexKind::Kp).analyze(&kp.values);
    assert_eq!(stats.storm_slots, 3);
    assert_eq!(stats.peak_slot, Some(1));

    let path = dir.path().join("kp.csv");
    let points: Vec<SeriesPoint> = kp.points().collect();
    CsvWriter::new().write_points(&points, IndexKind::Kp, &path)?;

    let text = std::fs::read_to_string(&path)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[2], "1,2024-05-10T21:00:00+00:00,9.0,G5 extreme");
    Ok(())
}

#[test]
fn test_binary_body_is_rejected() {
    let month = DstMonth::new(2024, 5).unwrap();
    let result = DstReader::new().parse_feed(&[0x89, b'P', b'N', b'G', 0xff, 0x00], month);

    assert!(matches!(result, Err(ProcessingError::Decode(_))));
}

#[test]
fn test_glm_listing_to_flash_csv() -> Result<(), ProcessingError> {
    let dir = TempDir::new()?;
    let listing = r#"<a href="S11232290_202405100055.nc">a</a>
<a href="S11232290_202405100100.nc">b</a>"#;
    let reader = GlmReader::new();

    let latest = reader
        .latest_file(listing, "http://example.org/2024/05/")?
        .ok_or_else(|| ProcessingError::MissingData("listing".to_string()))?;
    assert_eq!(latest.name, "S11232290_202405100100.nc");
    // 01:00 UTC is 20:00 the previous evening in Peru
    assert_eq!(latest.local_time()?.format("%d %H:%M").to_string(), "09 20:00");

    let grid = reader.parse_grid(
        r#"{"lat": [-30.0, -5.0], "lon": [-75.0],
            "flash": [[[9], [2]], [[0], [1]]],
            "duration_flash": [[[4.0], [0.5]], [[0.0], [0.25]]]}"#,
    )?;
    let flashes = grid.flashes_within(&BoundingBox::peru())?;
    assert_eq!(flashes.len(), 2);
    assert_eq!(flashes[1].time_step, 1);

    let path = dir.path().join("glm.csv");
    CsvWriter::new().write_flashes(&flashes, &path)?;
    let text = std::fs::read_to_string(&path)?;
    assert_eq!(text.lines().count(), 3);
    assert_eq!(text.lines().nth(1), Some("0,-5.0,-75.0,2.0,0.5"));
    Ok(())
}
