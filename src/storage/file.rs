//! File-based storage implementation.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{LocalSearchError, Result};
use crate::storage::traits::{Storage, StorageConfig, StorageError, StorageInput, StorageOutput};

/// A file-based storage implementation rooted at one directory.
#[derive(Debug)]
pub struct FileStorage {
    /// The root directory for storage.
    directory: PathBuf,
    /// Storage configuration.
    config: StorageConfig,
}

impl FileStorage {
    /// Create a new file storage in the given directory.
    pub fn new<P: AsRef<Path>>(directory: P, config: StorageConfig) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();

        if !directory.exists() {
            std::fs::create_dir_all(&directory).map_err(|e| {
                LocalSearchError::storage(format!("Failed to create directory: {e}"))
            })?;
        }

        if !directory.is_dir() {
            return Err(LocalSearchError::storage(format!(
                "Path is not a directory: {}",
                directory.display()
            )));
        }

        Ok(FileStorage { directory, config })
    }

    /// The directory this storage writes into.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.directory.join(name)
    }

    fn open_output(&self, name: &str, append: bool) -> Result<Box<dyn StorageOutput>> {
        let path = self.file_path(name);
        let mut options = OpenOptions::new();
        options.create(true);
        if append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }

        let file = options
            .open(&path)
            .map_err(|e| StorageError::from_io(name, e))?;
        let position = if append {
            file.metadata()
                .map_err(|e| StorageError::from_io(name, e))?
                .len()
        } else {
            0
        };

        Ok(Box::new(FileOutput::new(
            file,
            self.config.buffer_size,
            self.config.sync_writes,
            position,
        )))
    }
}

impl Storage for FileStorage {
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
        let file =
            File::open(self.file_path(name)).map_err(|e| StorageError::from_io(name, e))?;

        Ok(Box::new(FileInput::new(file, self.config.buffer_size)))
    }

    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
        self.open_output(name, false)
    }

    fn create_output_append(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
        self.open_output(name, true)
    }

    fn file_exists(&self, name: &str) -> bool {
        self.file_path(name).exists()
    }

    fn file_size(&self, name: &str) -> Result<u64> {
        let metadata = self
            .file_path(name)
            .metadata()
            .map_err(|e| StorageError::from_io(name, e))?;

        Ok(metadata.len())
    }

    fn truncate_file(&self, name: &str, len: u64) -> Result<()> {
        let path = self.file_path(name);
        if len == 0 && !path.exists() {
            return Ok(());
        }

        let file = OpenOptions::new()
            .write(true)
            .open(&path)
            .map_err(|e| StorageError::from_io(name, e))?;
        file.set_len(len)
            .map_err(|e| StorageError::from_io(name, e))?;
        if self.config.sync_writes {
            file.sync_data()
                .map_err(|e| StorageError::from_io(name, e))?;
        }

        Ok(())
    }

    fn rename_file(&self, old_name: &str, new_name: &str) -> Result<()> {
        std::fs::rename(self.file_path(old_name), self.file_path(new_name))
            .map_err(|e| StorageError::from_io(old_name, e))?;

        Ok(())
    }

    fn sync(&self) -> Result<()> {
        // Renames only become durable once the directory entry is synced.
        #[cfg(unix)]
        File::open(&self.directory)
            .and_then(|dir| dir.sync_all())
            .map_err(|e| StorageError::IoError(format!("Failed to sync directory: {e}")))?;
        Ok(())
    }
}

/// A file input implementation.
#[derive(Debug)]
pub struct FileInput {
    reader: BufReader<File>,
}

impl FileInput {
    fn new(file: File, buffer_size: usize) -> Self {
        FileInput {
            reader: BufReader::with_capacity(buffer_size, file),
        }
    }
}

impl Read for FileInput {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

impl Seek for FileInput {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.reader.seek(pos)
    }
}

impl StorageInput for FileInput {}

/// A file output implementation.
#[derive(Debug)]
pub struct FileOutput {
    writer: BufWriter<File>,
    sync_writes: bool,
    position: u64,
}

impl FileOutput {
    fn new(file: File, buffer_size: usize, sync_writes: bool, position: u64) -> Self {
        FileOutput {
            writer: BufWriter::with_capacity(buffer_size, file),
            sync_writes,
            position,
        }
    }
}

impl Write for FileOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let bytes_written = self.writer.write(buf)?;
        self.position += bytes_written as u64;
        Ok(bytes_written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

impl StorageOutput for FileOutput {
    fn flush_and_sync(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| LocalSearchError::storage(format!("Failed to flush: {e}")))?;

        if self.sync_writes {
            self.writer
                .get_ref()
                .sync_data()
                .map_err(|e| LocalSearchError::storage(format!("Failed to sync: {e}")))?;
        }

        Ok(())
    }

    fn position(&self) -> Result<u64> {
        Ok(self.position)
    }

    fn close(&mut self) -> Result<()> {
        self.flush_and_sync()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, FileStorage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path(), StorageConfig::default()).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("notes").join("db");
        let storage = FileStorage::new(&nested, StorageConfig::default()).unwrap();
        assert!(nested.is_dir());
        assert_eq!(storage.directory(), nested.as_path());
    }

    #[test]
    fn test_create_and_read_file() {
        let (_temp_dir, storage) = create_test_storage();

        let mut output = storage.create_output("snapshot.json").unwrap();
        output.write_all(b"Hello, World!").unwrap();
        output.close().unwrap();

        let mut input = storage.open_input("snapshot.json").unwrap();
        let mut buffer = Vec::new();
        input.read_to_end(&mut buffer).unwrap();

        assert_eq!(buffer, b"Hello, World!");
    }

    #[test]
    fn test_append_keeps_existing_content() {
        let (_temp_dir, storage) = create_test_storage();

        let mut output = storage.create_output_append("wal.log").unwrap();
        output.write_all(b"abc").unwrap();
        output.close().unwrap();

        let mut output = storage.create_output_append("wal.log").unwrap();
        assert_eq!(output.position().unwrap(), 3);
        output.write_all(b"def").unwrap();
        output.flush_and_sync().unwrap();

        assert_eq!(storage.file_size("wal.log").unwrap(), 6);
    }

    #[test]
    fn test_file_operations() {
        let (_temp_dir, storage) = create_test_storage();

        assert!(!storage.file_exists("nonexistent.txt"));

        let mut output = storage.create_output("test.tmp").unwrap();
        output.write_all(b"Test content").unwrap();
        output.close().unwrap();

        assert!(storage.file_exists("test.tmp"));
        assert_eq!(storage.file_size("test.tmp").unwrap(), 12);

        storage.rename_file("test.tmp", "test.json").unwrap();
        storage.sync().unwrap();
        assert!(!storage.file_exists("test.tmp"));
        assert!(storage.file_exists("test.json"));
    }

    #[test]
    fn test_truncate_file() {
        let (_temp_dir, storage) = create_test_storage();

        let mut output = storage.create_output_append("wal.log").unwrap();
        output.write_all(b"abcdef").unwrap();
        output.close().unwrap();

        storage.truncate_file("wal.log", 3).unwrap();
        assert_eq!(storage.file_size("wal.log").unwrap(), 3);

        let mut output = storage.create_output_append("wal.log").unwrap();
        assert_eq!(output.position().unwrap(), 3);
        output.write_all(b"xyz").unwrap();
        output.close().unwrap();

        let mut buffer = Vec::new();
        storage
            .open_input("wal.log")
            .unwrap()
            .read_to_end(&mut buffer)
            .unwrap();
        assert_eq!(buffer, b"abcxyz");

        storage.truncate_file("missing.log", 0).unwrap();
        assert!(storage.truncate_file("missing.log", 4).is_err());
    }

    #[test]
    fn test_file_not_found() {
        let (_temp_dir, storage) = create_test_storage();

        let err = storage.open_input("nonexistent.txt").unwrap_err();
        assert!(err.is_store_io());
        assert!(storage.file_size("nonexistent.txt").is_err());
    }
}
