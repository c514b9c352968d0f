//! Workout history export and import
//!
//! History is written as JSON lines, one [`WorkoutLogEntry`] per line, so a
//! file can be appended to or processed with line-oriented tools.

use std::io::{BufRead, Write};

use tracing::{debug, info};

use crate::error::{ExportError, GymlogError, RepositoryError, Result};
use crate::repository::WorkoutRepository;
use crate::types::WorkoutLogEntry;
use crate::views::current;

/// Write entries as JSON lines; returns the number written
pub fn write_history<W: Write>(entries: &[WorkoutLogEntry], mut output: W) -> Result<usize> {
    for entry in entries {
        let json = serde_json::to_string(entry).map_err(ExportError::Serialize)?;
        writeln!(output, "{}", json).map_err(ExportError::Io)?;
    }
    output.flush().map_err(ExportError::Io)?;
    Ok(entries.len())
}

/// Read JSON lines written by [`write_history`]; blank lines are skipped
///
/// # Errors
///
/// Returns `ExportError::Parse` with the 1-based line number of the first
/// malformed line.
pub fn read_history<R: BufRead>(input: R) -> Result<Vec<WorkoutLogEntry>> {
    let mut entries = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let line = line.map_err(ExportError::Io)?;
        if line.trim().is_empty() {
            continue;
        }
        let entry = serde_json::from_str(&line).map_err(|source| ExportError::Parse {
            line: index + 1,
            source,
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

/// Export every stored log entry
pub async fn export_history<W: Write>(
    repository: &dyn WorkoutRepository,
    output: W,
) -> Result<usize> {
    let entries = current(repository.logs()).await?;
    let written = write_history(&entries, output)?;
    info!("Exported {} workout log entries", written);
    Ok(written)
}

/// Save entries into the repository, skipping ids already present
///
/// Returns the number of entries imported.
pub async fn import_history(
    repository: &dyn WorkoutRepository,
    entries: Vec<WorkoutLogEntry>,
) -> Result<usize> {
    let mut imported = 0;
    for entry in entries {
        let id = entry.id.clone();
        match repository.save_log(entry).await {
            Ok(()) => imported += 1,
            Err(GymlogError::Repository(RepositoryError::DuplicateLogId(_))) => {
                debug!(id = %id, "Skipping already imported entry");
            }
            Err(e) => return Err(e),
        }
    }
    info!("Imported {} workout log entries", imported);
    Ok(imported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{sample_log, Catalog};
    use crate::repository::InMemoryWorkoutRepository;
    use chrono::Utc;
    use std::io::Cursor;

    #[test]
    fn test_one_line_per_entry() {
        let entries = vec![sample_log(Utc::now()), sample_log(Utc::now())];
        let mut buffer = Vec::new();

        assert_eq!(write_history(&entries, &mut buffer).unwrap(), 2);

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().all(|l| l.starts_with('{')));
    }

    #[test]
    fn test_read_reports_bad_line() {
        let mut buffer = Vec::new();
        write_history(&[sample_log(Utc::now())], &mut buffer).unwrap();
        buffer.extend_from_slice(b"\nnot json\n");

        let err = read_history(Cursor::new(buffer)).unwrap_err();
        assert!(matches!(
            err,
            GymlogError::Export(ExportError::Parse { line: 3, .. })
        ));
    }

    #[tokio::test]
    async fn test_export_then_import_into_empty_repository() {
        let source = InMemoryWorkoutRepository::builtin();
        let mut buffer = Vec::new();
        assert_eq!(export_history(&source, &mut buffer).await.unwrap(), 1);

        let target = InMemoryWorkoutRepository::new(Catalog::without_logs());
        let entries = read_history(Cursor::new(buffer)).unwrap();
        assert_eq!(import_history(&target, entries.clone()).await.unwrap(), 1);

        let stored = current(target.logs()).await.unwrap();
        assert_eq!(stored, entries);
    }

    #[tokio::test]
    async fn test_import_skips_existing_ids() {
        let repository = InMemoryWorkoutRepository::builtin();
        let existing = current(repository.logs()).await.unwrap();

        let imported = import_history(&repository, existing).await.unwrap();

        assert_eq!(imported, 0);
        assert_eq!(current(repository.logs()).await.unwrap().len(), 1);
    }
}
