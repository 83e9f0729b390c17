use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Name of the data directory, both local and under the home directory
pub const DATA_DIR_NAME: &str = ".finite";

/// Get the finite directory - checks for local .finite first, then falls back to global ~/.finite
pub fn get_finite_dir() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Could not determine current directory")?;

    if let Some(local_dir) = find_local_finite(&current_dir) {
        return Ok(local_dir);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(DATA_DIR_NAME))
}

/// Find local .finite directory by walking up the directory tree
fn find_local_finite(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;

    loop {
        let finite_dir = current.join(DATA_DIR_NAME);
        if finite_dir.is_dir() {
            return Some(finite_dir);
        }

        current = current.parent()?;
    }
}

/// Ensure the finite directory exists
pub fn ensure_finite_dir() -> Result<PathBuf> {
    let dir = get_finite_dir()?;
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(dir)
}

/// Initialize a local .finite directory in the current directory
pub fn init_local_finite() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Could not determine current directory")?;
    let finite_dir = current_dir.join(DATA_DIR_NAME);

    if finite_dir.exists() {
        anyhow::bail!("Finite directory already exists: {}", finite_dir.display());
    }

    fs::create_dir_all(&finite_dir)
        .with_context(|| format!("Failed to create directory: {}", finite_dir.display()))?;

    Ok(finite_dir)
}

pub fn settings_file(dir: &Path) -> PathBuf {
    dir.join("settings.json")
}

pub fn schedule_file(dir: &Path) -> PathBuf {
    dir.join("schedule.json")
}

pub fn widget_file(dir: &Path) -> PathBuf {
    dir.join("widget.json")
}

/// Default location for a generated report
pub fn report_file(dir: &Path, date: chrono::NaiveDate) -> PathBuf {
    dir.join(format!("report-{}.md", date.format("%Y-%m-%d")))
}

/// Atomically write content to a file using temp file + rename
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = path
        .parent()
        .context("File path has no parent directory")?;

    let mut temp_file = NamedTempFile::new_in(dir)
        .context("Failed to create temporary file")?;

    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write to temporary file")?;

    temp_file
        .as_file()
        .sync_all()
        .context("Failed to sync temporary file")?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist file: {}", path.display()))?;

    Ok(())
}

/// Read file content, return empty string if file doesn't exist
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(String::new());
    }
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Remove a file if present
pub fn remove_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        fs::remove_file(path)
            .with_context(|| format!("Failed to remove file: {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_finite_dir() {
        let dir = get_finite_dir().unwrap();
        assert!(dir.to_string_lossy().contains(DATA_DIR_NAME));
    }

    #[test]
    fn test_find_local_finite_walks_up() {
        let temp_dir = tempfile::tempdir().unwrap();
        let data_dir = temp_dir.path().join(DATA_DIR_NAME);
        let nested = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&data_dir).unwrap();
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_local_finite(&nested), Some(data_dir));
    }

    #[test]
    fn test_atomic_write_and_read() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("test.json");

        atomic_write(&test_file, "{}").unwrap();
        assert_eq!(read_file(&test_file).unwrap(), "{}");

        atomic_write(&test_file, "[]").unwrap();
        assert_eq!(read_file(&test_file).unwrap(), "[]");
    }

    #[test]
    fn test_read_nonexistent_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("nonexistent.json");

        assert_eq!(read_file(&test_file).unwrap(), "");
    }

    #[test]
    fn test_remove_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("widget.json");

        // Removing a missing file is fine
        remove_file(&test_file).unwrap();

        atomic_write(&test_file, "{}").unwrap();
        remove_file(&test_file).unwrap();
        assert!(!test_file.exists());
    }

    #[test]
    fn test_report_file_name() {
        let dir = Path::new("/tmp/data");
        let date = chrono::NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        assert_eq!(report_file(dir, date), dir.join("report-2024-06-10.md"));
    }
}
