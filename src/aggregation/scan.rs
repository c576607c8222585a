use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};

use camino::Utf8Path;
use tracing::debug;

use super::error::AggregationError;
use super::partition::ByteRange;
use super::{Delimiters, Result, StationMap, Stats};

const READ_BUFFER_SIZE: usize = 1 << 20;

/// Streams and aggregates the records of one chunk.
///
/// Opens an independent read-only view of `[range.begin, range.end)` and
/// runs a tight synchronous read/parse/aggregate loop over it. Returns on
/// the first malformed record or I/O failure, so each worker reports exactly
/// once. No state is shared with other invocations.
pub fn scan_chunk(path: &Utf8Path, range: ByteRange, delimiters: Delimiters) -> Result<StationMap> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(range.begin))?;
    let mut reader = BufReader::with_capacity(READ_BUFFER_SIZE, file.take(range.len()));

    let mut readings = StationMap::new();
    let mut record = Vec::new();
    let mut records = 0u64;
    loop {
        record.clear();
        if reader.read_until(delimiters.record, &mut record)? == 0 {
            break;
        }
        // The last record of the file may lack a trailing delimiter; the
        // partitioner guarantees delimiter-aligned boundaries everywhere else.
        if record.last() == Some(&delimiters.record) {
            record.pop();
        }
        let (station, value) = parse_record(&record, delimiters.field)?;
        match readings.get_mut(station) {
            Some(stats) => stats.observe(value),
            None => {
                readings.insert(station.to_owned(), Stats::new(value));
            }
        }
        records += 1;
    }

    debug!(
        "Scanned {} records ({} stations) in range {}",
        records,
        readings.len(),
        range
    );
    Ok(readings)
}

/// Splits a record at the first field delimiter into a borrowed station name
/// and a parsed measurement. The views live only as long as the record
/// buffer; the caller copies the station into an owned key on first insert.
fn parse_record(record: &[u8], field_delimiter: u8) -> Result<(&str, f64)> {
    let delim_pos = record
        .iter()
        .position(|&byte| byte == field_delimiter)
        .ok_or_else(|| AggregationError::parse(record, "no field delimiter"))?;
    let station = std::str::from_utf8(&record[..delim_pos])
        .map_err(|err| AggregationError::parse(record, err))?;
    let value = std::str::from_utf8(&record[delim_pos + 1..])
        .map_err(|err| AggregationError::parse(record, err))?
        .parse::<f64>()
        .map_err(|err| AggregationError::parse(record, err))?;
    Ok((station, value))
}
