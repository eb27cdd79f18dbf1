// CSV export of a filtered slice - same columns and order as the source table

use crate::components::format::fiscal_year_label;
use crate::error::Result;
use crate::query::RecordSet;
use crate::record::COLUMNS;
use std::io::Write;

/// Write `records` as CSV, header first even when the slice is empty.
pub fn write_csv<W: Write>(records: &RecordSet<'_>, writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(COLUMNS)?;
    for record in records.iter() {
        wtr.serialize(record)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn to_csv_bytes(records: &RecordSet<'_>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(records, &mut buf)?;
    Ok(buf)
}

pub fn national_filename() -> String {
    "ssbg_national_data.csv".to_string()
}

/// e.g. `ssbg_New_York_data_FY10-FY22.csv`
///
/// The name ends up in a `Content-Disposition` header, so anything other than
/// ASCII letters, digits and `_` is dropped.
pub fn state_filename(state_name: &str, year_bounds: (u16, u16)) -> String {
    let safe: String = state_name
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    format!(
        "ssbg_{}_data_{}.csv",
        safe,
        fiscal_year_label(None, year_bounds)
    )
}
