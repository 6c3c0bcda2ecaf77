// src/logging.rs
//
// env_logger setup. Output always goes to stderr and, when a log file is
// configured, is appended there as well.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Writes every buffer to stderr and to a file.
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Initializes the global logger. `RUST_LOG` takes precedence over `level`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(level: Option<&str>, log_file: Option<&Path>) -> io::Result<()> {
    let env = env_logger::Env::default().default_filter_or(level.unwrap_or(DEFAULT_LOG_LEVEL));
    let mut builder = env_logger::Builder::from_env(env);

    if let Some(path) = log_file {
        let file = open_log_file(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(Tee { file })));
    }

    let _ = builder.try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_tee_appends_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        fs::write(&path, "earlier\n").unwrap();

        let mut tee = Tee {
            file: open_log_file(&path).unwrap(),
        };
        writeln!(tee, "grinding").unwrap();
        tee.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "earlier\ngrinding\n");
    }

    #[test]
    fn test_init_with_unwritable_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("log.txt");
        assert!(init(None, Some(&path)).is_err());
    }
}
