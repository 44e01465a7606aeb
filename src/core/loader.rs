use crate::domain::model::Address;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use csv::{ReaderBuilder, StringRecord};

/// Cell values treated as missing, matching the usual tabular-reader defaults.
const NULL_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_null_cell(cell: &str) -> bool {
    cell.is_empty() || NULL_MARKERS.contains(&cell)
}

fn normalize_cell(cell: &str) -> &str {
    if is_null_cell(cell) {
        ""
    } else {
        cell
    }
}

/// Parses comma-delimited address rows, replacing null cells with empty strings.
pub fn parse_addresses(data: &[u8]) -> Result<Vec<Address>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(data);
    let headers = reader.headers()?.clone();

    let mut addresses = Vec::new();
    for row in reader.records() {
        let row = row?;
        let normalized: StringRecord = row.iter().map(normalize_cell).collect();
        let address: Address = normalized.deserialize(Some(&headers))?;
        addresses.push(address);
    }

    Ok(addresses)
}

pub fn load_addresses<S: Storage>(storage: &S, path: &str) -> Result<Vec<Address>> {
    tracing::debug!("Reading addresses from: {}", path);
    let data = storage.read_file(path)?;
    let addresses = parse_addresses(&data)?;
    tracing::debug!("Parsed {} address rows ({} bytes)", addresses.len(), data.len());
    Ok(addresses)
}
