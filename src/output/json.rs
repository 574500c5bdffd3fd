//! Project records as a pretty-printed JSON array.
use crate::error::ProjectSheetError;
use crate::output::create_output;
use crate::project::ProjectRecord;
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::Path;

/// Writes records as a JSON array indented by two spaces.
pub fn write_records<P: AsRef<Path>>(path: P, records: &[ProjectRecord]) -> Result<(), ProjectSheetError> {
    write_value(path.as_ref(), records)?;
    info!("Saved {} projects to '{}'", records.len(), path.as_ref().display());
    Ok(())
}

/// Writes any serializable value as pretty JSON.
pub fn write_value<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ProjectSheetError> {
    let mut writer = create_output(path)?;
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Reads records written by `write_records`.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<ProjectRecord>, ProjectSheetError> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ColorStatus;

    #[test]
    fn write_and_read() -> Result<(), ProjectSheetError> {
        let directory = tempfile::tempdir()?;
        let path = directory.path().join("nested/projects_data.json");
        let records = vec![
            ProjectRecord {
                row: 2,
                name: "Dallas, TX Storage Unit".to_owned(),
                total_cogs: Some(125000.0),
                ..Default::default()
            },
            ProjectRecord {
                row: 5,
                name: "#7 Barn".to_owned(),
                color_status: Some(ColorStatus::OngoingProject),
                ..Default::default()
            },
        ];
        write_records(&path, &records)?;

        let text = std::fs::read_to_string(&path)?;
        assert!(text.starts_with("[\n  {\n    \"row\": 2,\n    \"name\": \"Dallas, TX Storage Unit\","));
        assert!(text.contains("\"total_cogs\": 125000,"));
        assert!(text.contains("\"color_status\": \"Brown - Ongoing Project\""));
        assert!(text.contains("\"customer\": null,"));

        assert_eq!(read_records(&path)?, records);
        Ok(())
    }

    #[test]
    fn missing_input() {
        let result = read_records("does/not/exist.json");
        assert!(result.err().map(|error| error.is_file_not_found()).unwrap_or(false));
    }
}
