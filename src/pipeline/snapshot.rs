use crate::error::Result;
use crate::types::MovieRecord;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes a session batch to `<output_dir>/catalog_<timestamp>.json`.
pub fn persist_to_json(records: &[MovieRecord], output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let filepath = output_dir.join(format!("catalog_{timestamp}.json"));

    let json_content = serde_json::to_string_pretty(records)?;
    fs::write(&filepath, json_content)?;

    Ok(filepath)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![MovieRecord::new("Dune", Some(2021)).with_rank(1)];

        let path = persist_to_json(&records, &dir.path().join("out")).unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("catalog_"));

        let loaded: Vec<MovieRecord> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, records);
    }
}
