use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Size at which the log file is rolled over: 10 MiB.
pub const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;

/// Number of rolled-over files kept next to the active one.
pub const LOG_BACKUP_COUNT: usize = 5;

/// A log file that rolls over once it would reach `max_bytes`.
///
/// Backups are named `<file>.1` (newest) through `<file>.<backup_count>`
/// (oldest); anything older is discarded.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    backup_count: usize,
    file: File,
    size: u64,
}

impl RotatingFile {
    /// Open (or create) `path` for appending.
    pub fn open(path: impl AsRef<Path>, max_bytes: u64, backup_count: usize) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let size = file.metadata()?.len();

        Ok(Self {
            path,
            max_bytes,
            backup_count,
            file,
            size,
        })
    }

    /// Path of the `index`-th backup, e.g. `bot.log.1`.
    pub fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    fn should_roll_over(&self, incoming: usize) -> bool {
        // An empty file is never rolled, even for an oversized record. Without
        // backups there is nowhere to roll to, so the file just grows.
        self.max_bytes > 0
            && self.backup_count > 0
            && self.size > 0
            && self.size + incoming as u64 >= self.max_bytes
    }

    fn roll_over(&mut self) -> io::Result<()> {
        self.file.flush()?;

        for index in (1..self.backup_count).rev() {
            let source = self.backup_path(index);
            if source.exists() {
                let target = self.backup_path(index + 1);
                if target.exists() {
                    fs::remove_file(&target)?;
                }
                fs::rename(&source, &target)?;
            }
        }

        let first = self.backup_path(1);
        if first.exists() {
            fs::remove_file(&first)?;
        }
        fs::rename(&self.path, &first)?;

        self.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        self.size = 0;

        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.should_roll_over(buf.len()) {
            self.roll_over()?;
        }

        let written = self.file.write(buf)?;
        self.size += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
