use crate::domain::model::{InstallationRecord, INSTALLATION_HEADERS};
use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use csv::WriterBuilder;

/// Renders records as UTF-8 CSV. The header row is always present.
pub fn encode_installations(records: &[InstallationRecord]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(INSTALLATION_HEADERS)?;
    for record in records {
        writer.serialize(record)?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

pub fn save_installations<S: Storage>(
    storage: &S,
    records: &[InstallationRecord],
    path: &str,
) -> Result<()> {
    let data = encode_installations(records)?;
    tracing::debug!(
        "Writing {} installations ({} bytes) to {}",
        records.len(),
        data.len(),
        path
    );
    storage.write_file(path, &data)
}
