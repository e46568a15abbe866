//! Header row extraction from delimited files.
//!
//! - **Delimiter resolution**: `.tsv` → tab, anything else → comma, unless
//!   overridden.
//! - **Encoding**: header bytes are decoded via `encoding_rs`, defaulting to
//!   UTF-8; a leading byte-order mark is dropped.
//! - **stdin**: the `-` path reads from standard input.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

/// Reads the first record of `reader` as header cells. An empty input yields
/// no cells.
pub fn read_header_row<R: Read>(
    reader: R,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<Vec<String>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true)
        .from_reader(reader);
    let mut record = csv::ByteRecord::new();
    if !csv_reader
        .read_byte_record(&mut record)
        .context("Reading header row")?
    {
        return Ok(Vec::new());
    }
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

pub fn read_header_row_from_path(
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<Vec<String>> {
    let reader: Box<dyn Read> = if is_dash(path) {
        Box::new(std::io::stdin().lock())
    } else {
        Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Opening input file {path:?}"))?,
        ))
    };
    read_header_row(reader, delimiter, encoding)
        .with_context(|| format!("Reading header row from {path:?}"))
}
