//! Parquet output backend.
//!
//! Rows are buffered in memory and written as a single row group per file on
//! `finish` — the event stream of one session comfortably fits, and a single
//! row group keeps the files friendly to analytical readers.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use crate::row::{EventRow, TickSummaryRow};
use crate::writer::EventWriter;
use crate::{OutputError, OutputResult};

pub struct ParquetWriter {
    dir: PathBuf,
    events: Vec<EventRow>,
    summaries: Vec<TickSummaryRow>,
    finished: bool,
}

impl ParquetWriter {
    pub fn new(dir: &Path) -> OutputResult<Self> {
        Ok(Self {
            dir: dir.to_path_buf(),
            events: Vec::new(),
            summaries: Vec::new(),
            finished: false,
        })
    }

    fn write_events_file(&self) -> OutputResult<()> {
        let schema = Arc::new(Schema::new(vec![
            Field::new("tick", DataType::UInt64, false),
            Field::new("ts_unix_ms", DataType::Int64, false),
            Field::new("type", DataType::Utf8, false),
            Field::new("level", DataType::Utf8, false),
            Field::new("payload", DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            Arc::clone(&schema),
            vec![
                Arc::new(UInt64Array::from_iter_values(self.events.iter().map(|r| r.tick))),
                Arc::new(Int64Array::from_iter_values(self.events.iter().map(|r| r.ts_unix_ms))),
                Arc::new(StringArray::from_iter_values(self.events.iter().map(|r| r.kind.as_str()))),
                Arc::new(StringArray::from_iter_values(self.events.iter().map(|r| r.level.as_str()))),
                Arc::new(StringArray::from_iter_values(
                    self.events.iter().map(|r| r.payload_json.as_str()),
                )),
            ],
        )
        .map_err(|e| OutputError::Parquet(e.to_string()))?;

        write_batch(&self.dir.join("events.parquet"), schema, batch)
    }

    fn write_summaries_file(&self) -> OutputResult<()> {
        let schema = Arc::new(Schema::new(vec![
            Field::new("tick", DataType::UInt64, false),
            Field::new("ts_unix_ms", DataType::Int64, false),
            Field::new("duration_ms", DataType::Float64, false),
            Field::new("event_count", DataType::UInt64, false),
        ]));
        let batch = RecordBatch::try_new(
            Arc::clone(&schema),
            vec![
                Arc::new(UInt64Array::from_iter_values(self.summaries.iter().map(|r| r.tick))),
                Arc::new(Int64Array::from_iter_values(
                    self.summaries.iter().map(|r| r.ts_unix_ms),
                )),
                Arc::new(Float64Array::from_iter_values(
                    self.summaries.iter().map(|r| r.duration_ms),
                )),
                Arc::new(UInt64Array::from_iter_values(
                    self.summaries.iter().map(|r| r.event_count),
                )),
            ],
        )
        .map_err(|e| OutputError::Parquet(e.to_string()))?;

        write_batch(&self.dir.join("tick_summaries.parquet"), schema, batch)
    }
}

fn write_batch(
    path: &Path,
    schema: Arc<Schema>,
    batch: RecordBatch,
) -> OutputResult<()> {
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)
        .map_err(|e| OutputError::Parquet(e.to_string()))?;
    writer.write(&batch).map_err(|e| OutputError::Parquet(e.to_string()))?;
    writer.close().map_err(|e| OutputError::Parquet(e.to_string()))?;
    Ok(())
}

impl EventWriter for ParquetWriter {
    fn write_event(&mut self, row: &EventRow) -> OutputResult<()> {
        self.events.push(row.clone());
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.push(*row);
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.write_events_file()?;
        self.write_summaries_file()?;
        Ok(())
    }
}
