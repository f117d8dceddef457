use crate::analyzers::IndexKind;
use crate::error::{ProcessingError, Result};
use crate::models::{Series, SeriesPoint};
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use parquet::file::reader::{FileReader, SerializedFileReader};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    /// Write series points, one row per slot. Missing values become nulls.
    pub fn write_points(&self, points: &[SeriesPoint], kind: IndexKind, path: &Path) -> Result<()> {
        let schema = Self::create_schema();
        let batch = Self::points_to_batch(points, kind, schema.clone())?;

        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        info!(path = %path.display(), rows = points.len(), "wrote parquet series");
        Ok(())
    }

    fn create_schema() -> Arc<Schema> {
        let fields = vec![
            Field::new("slot", DataType::UInt32, false),
            Field::new(
                "timestamp",
                DataType::Timestamp(TimeUnit::Second, Some("UTC".into())),
                true,
            ),
            Field::new("value", DataType::Float64, true),
            Field::new("level", DataType::Utf8, true),
        ];

        Arc::new(Schema::new(fields))
    }

    fn points_to_batch(
        points: &[SeriesPoint],
        kind: IndexKind,
        schema: Arc<Schema>,
    ) -> Result<RecordBatch> {
        let slots = points
            .iter()
            .map(|p| {
                u32::try_from(p.slot).map_err(|_| {
                    ProcessingError::InvalidFormat(format!("Slot {} exceeds the u32 column", p.slot))
                })
            })
            .collect::<Result<Vec<u32>>>()?;
        let timestamps: Vec<Option<i64>> = points
            .iter()
            .map(|p| p.timestamp.map(|t| t.timestamp()))
            .collect();
        let values: Vec<Option<f64>> = points.iter().map(|p| p.value).collect();
        let levels: Vec<Option<&str>> = points
            .iter()
            .map(|p| p.value.map(|v| kind.level_label(v)))
            .collect();

        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(UInt32Array::from(slots)),
                Arc::new(TimestampSecondArray::from(timestamps).with_timezone("UTC")),
                Arc::new(Float64Array::from(values)),
                Arc::new(StringArray::from(levels)),
            ],
        )?;

        Ok(batch)
    }

    /// Read the `value` column back, nulls as missing slots
    pub fn read_series(&self, path: &Path) -> Result<Series> {
        let file = File::open(path)?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

        let mut series = Series::default();
        for batch_result in reader {
            let batch = batch_result?;
            let values = batch
                .column_by_name("value")
                .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
                .ok_or_else(|| {
                    ProcessingError::InvalidFormat("Invalid value column type".to_string())
                })?;
            series.extend(values.iter());
        }

        Ok(series)
    }

    /// Get file statistics. The codec is the one recorded in the file, not
    /// the one this writer is configured with.
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let compression = metadata
            .row_groups()
            .first()
            .and_then(|rg| rg.columns().first())
            .map(|column| column.compression());

        Ok(ParquetFileInfo {
            total_rows: metadata.file_metadata().num_rows(),
            row_groups: metadata.num_row_groups(),
            file_size: std::fs::metadata(path)?.len(),
            compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: usize,
    pub file_size: u64,
    /// `None` when the file has no row groups
    pub compression: Option<Compression>,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} KB\n\
            - Compression: {}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1024.0,
            self.compression
                .map_or_else(|| "n/a".to_string(), |c| format!("{:?}", c))
        )
    }
}
