use std::fs::File;
use std::os::unix::fs::FileExt;

use super::error::AggregationError;
use super::Result;

/// Byte range `[begin, end)` of the input file assigned to one worker.
///
/// Ranges produced for one file are contiguous, non-overlapping and cover
/// exactly `[0, file_len)`. Every `begin` except the first and every `end`
/// except the last points one byte past a record delimiter, so no record is
/// split across two ranges and none is read twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub begin: u64,
    pub end: u64,
}

impl ByteRange {
    pub fn len(&self) -> u64 {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }
}

impl std::fmt::Display for ByteRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end)
    }
}

/// Splits the file into `workers` delimiter-aligned ranges.
///
/// Each boundary starts at `begin + file_len / workers` and is pulled back
/// byte-by-byte until it sits one past a record delimiter. The backward scan
/// is bounded by the longest record in the file and runs `workers - 1` times.
pub fn partition(file: &File, workers: usize, record_delimiter: u8) -> Result<Vec<ByteRange>> {
    let file_len = file.metadata()?.len();

    if workers == 0 {
        return Err(AggregationError::Configuration(
            "At least one worker is required".to_owned(),
        ));
    }
    if workers == 1 {
        return Ok(vec![ByteRange {
            begin: 0,
            end: file_len,
        }]);
    }

    let approx_size = file_len / workers as u64;
    if approx_size == 0 {
        return Err(AggregationError::Configuration(format!(
            "Num ranges ({}) too large for file length ({})",
            workers, file_len
        )));
    }

    let mut ranges = Vec::with_capacity(workers);
    let mut begin = 0;
    for _ in 0..workers - 1 {
        let end = align_to_record(file, begin + approx_size, file_len, record_delimiter)?;
        if end <= begin {
            return Err(AggregationError::Configuration(format!(
                "Range boundary {} doesn't advance past {}. Too many chunks for file size?",
                end, begin
            )));
        }
        ranges.push(ByteRange { begin, end });
        begin = end;
    }

    // The last range absorbs the approximation error accumulated above.
    ranges.push(ByteRange {
        begin,
        end: file_len,
    });

    Ok(ranges)
}

/// Scans backward from `guess` for the record delimiter and returns the
/// offset one past it.
fn align_to_record(file: &File, guess: u64, file_len: u64, delimiter: u8) -> Result<u64> {
    let mut pos = guess.min(file_len - 1);
    let mut byte = [0u8; 1];
    loop {
        file.read_exact_at(&mut byte, pos)?;
        if byte[0] == delimiter {
            // One past the delimiter, for an exclusive range on the right.
            return Ok(pos + 1);
        }
        if pos == 0 {
            return Err(AggregationError::Configuration(
                "Range boundary underflowed the start of the file. Too many chunks for file size?"
                    .to_owned(),
            ));
        }
        pos -= 1;
    }
}
