//! CSV export and import of one mode's dataset
//!
//! Document layout:
//!
//! ```text
//! MODE,DEC
//! name,100m,longJump,...
//! Alice,11,720,...
//! ```
//!
//! The header lists event ids in catalog order; each data row carries a
//! competitor name followed by one raw value per event (empty when not
//! recorded). Rows appear in registration order.

use crate::catalog::{EventDefinition, EventProvider};
use crate::error::{Result, ScoringError};
use crate::scoring::PointsCalculator;
use crate::types::{Competitor, CompetitorId, Dataset, Mode, ScoreEntry};
use crate::utils::{format_raw_value, generate_competitor_id, parse_raw_value};
use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Tag of the first document line
pub const MODE_TAG: &str = "MODE";

/// First column of the header row
pub const NAME_COLUMN: &str = "name";

/// Encoder/decoder between datasets and CSV documents
#[derive(Clone)]
pub struct CsvCodec {
    catalog: Arc<dyn EventProvider>,
    calculator: Arc<dyn PointsCalculator>,
}

impl CsvCodec {
    /// Create a new codec
    pub fn new(catalog: Arc<dyn EventProvider>, calculator: Arc<dyn PointsCalculator>) -> Self {
        Self {
            catalog,
            calculator,
        }
    }

    /// Serialize a dataset into a CSV document
    pub fn encode(&self, dataset: &Dataset) -> Result<String> {
        let events = self.catalog.events_for_mode(dataset.mode);

        let raw_values: HashMap<(CompetitorId, &str), f64> = dataset
            .entries
            .iter()
            .filter(|entry| entry.mode == dataset.mode)
            .map(|entry| ((entry.competitor_id, entry.event_id.as_str()), entry.raw_value))
            .collect();

        let mut writer = WriterBuilder::new()
            .flexible(true)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer
            .write_record([MODE_TAG, dataset.mode.code()])
            .map_err(write_error)?;

        let header = std::iter::once(NAME_COLUMN).chain(events.iter().map(|e| e.id.as_str()));
        writer.write_record(header).map_err(write_error)?;

        for competitor in &dataset.competitors {
            let mut row = Vec::with_capacity(events.len() + 1);
            row.push(competitor.name.clone());
            for event in events {
                let cell = raw_values
                    .get(&(competitor.id, event.id.as_str()))
                    .map(|&raw| format_raw_value(raw))
                    .unwrap_or_default();
                row.push(cell);
            }
            writer.write_record(&row).map_err(write_error)?;
        }

        let bytes = writer.into_inner().map_err(|e| ScoringError::Internal {
            message: format!("Failed to flush CSV writer: {}", e),
        })?;

        String::from_utf8(bytes).map_err(|e| ScoringError::Internal {
            message: format!("CSV output is not valid UTF-8: {}", e),
        })
    }

    /// Parse a CSV document into a dataset with freshly assigned competitor ids
    ///
    /// Nothing is installed; callers hand the result to
    /// [`crate::competition::CompetitorStore::replace_all`].
    pub fn decode(&self, text: &str) -> Result<Dataset> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());
        let mut records = reader.records();

        let mode_record = next_record(&mut records)?.ok_or_else(|| {
            ScoringError::MalformedDocument {
                line: 1,
                reason: "missing MODE line".to_string(),
            }
        })?;
        let mode = parse_mode_record(&mode_record)?;

        let header = next_record(&mut records)?.ok_or_else(|| {
            ScoringError::MalformedDocument {
                line: record_line(&mode_record, 1) + 1,
                reason: "missing header row".to_string(),
            }
        })?;
        let columns = self.parse_header(mode, &header)?;

        let mut dataset = Dataset::empty(mode);
        let mut fallback_line = record_line(&header, 2);

        while let Some(record) = next_record(&mut records)? {
            fallback_line += 1;
            let line = record_line(&record, fallback_line);

            if record.len() != header.len() {
                return Err(ScoringError::MalformedDocument {
                    line,
                    reason: format!(
                        "expected {} fields, found {}",
                        header.len(),
                        record.len()
                    ),
                });
            }

            let competitor = Competitor {
                id: generate_competitor_id(),
                name: record[0].to_string(),
            };

            let mut row_entries = Vec::new();
            for (index, (position, event)) in columns.iter().enumerate() {
                let column = index + 2;
                let cell = &record[index + 1];

                let raw_value = match parse_raw_value(cell) {
                    None => continue,
                    Some(Ok(value)) => value,
                    Some(Err(_)) => {
                        return Err(ScoringError::invalid_cell(
                            format!("'{}' is not a number for event '{}'", cell, event.id),
                            line,
                            column,
                        ))
                    }
                };

                let points = self
                    .calculator
                    .points_for(event, raw_value)
                    .map_err(|e| e.at_cell(line, column))?;

                row_entries.push((
                    *position,
                    ScoreEntry {
                        competitor_id: competitor.id,
                        mode,
                        event_id: event.id.clone(),
                        raw_value,
                        points,
                    },
                ));
            }

            row_entries.sort_by_key(|(position, _)| *position);
            dataset
                .entries
                .extend(row_entries.into_iter().map(|(_, entry)| entry));
            dataset.competitors.push(competitor);
        }

        Ok(dataset)
    }

    /// Map header columns to catalog events, keeping each event's catalog position
    fn parse_header<'a>(
        &'a self,
        mode: Mode,
        header: &StringRecord,
    ) -> Result<Vec<(usize, &'a EventDefinition)>> {
        let line = record_line(header, 2);

        match header.get(0) {
            Some(first) if first.trim().eq_ignore_ascii_case(NAME_COLUMN) => {}
            _ => {
                return Err(ScoringError::MalformedDocument {
                    line,
                    reason: format!("header must start with a '{}' column", NAME_COLUMN),
                })
            }
        }

        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(header.len().saturating_sub(1));
        for id in header.iter().skip(1) {
            let id = id.trim();
            let event = self.catalog.lookup(mode, id)?;
            if !seen.insert(event.id.as_str()) {
                return Err(ScoringError::MalformedDocument {
                    line,
                    reason: format!("duplicate event column '{}'", id),
                });
            }

            let position = self.catalog.position(mode, id).unwrap_or(usize::MAX);
            columns.push((position, event));
        }

        if let Some(missing) = self
            .catalog
            .events_for_mode(mode)
            .iter()
            .find(|event| !seen.contains(event.id.as_str()))
        {
            return Err(ScoringError::UnknownEvent {
                mode: mode.to_string(),
                event_id: missing.id.clone(),
            });
        }

        Ok(columns)
    }
}

impl std::fmt::Debug for CsvCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvCodec").finish_non_exhaustive()
    }
}

fn parse_mode_record(record: &StringRecord) -> Result<Mode> {
    let line = record_line(record, 1);

    if record.len() != 2 || record[0].trim() != MODE_TAG {
        return Err(ScoringError::MalformedDocument {
            line,
            reason: format!("first line must be '{},<mode>'", MODE_TAG),
        });
    }

    record[1]
        .parse::<Mode>()
        .map_err(|_| ScoringError::MalformedDocument {
            line,
            reason: format!("unknown mode '{}'", record[1].trim()),
        })
}

fn next_record(records: &mut csv::StringRecordsIter<'_, &[u8]>) -> Result<Option<StringRecord>> {
    match records.next() {
        None => Ok(None),
        Some(Ok(record)) => Ok(Some(record)),
        Some(Err(e)) => Err(ScoringError::MalformedDocument {
            line: e.position().map(|p| p.line() as usize).unwrap_or(0),
            reason: e.to_string(),
        }),
    }
}

fn record_line(record: &StringRecord, fallback: usize) -> usize {
    record
        .position()
        .map(|p| p.line() as usize)
        .unwrap_or(fallback)
}

fn write_error(e: csv::Error) -> ScoringError {
    ScoringError::Internal {
        message: format!("Failed to write CSV record: {}", e),
    }
}
