//! Single-process exclusive lock on the data directory.
//!
//! A pid lock file beside memory.db prevents two daemons from sharing one
//! store. A lock left by a dead process (unix: no /proc entry) is reclaimed.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use engram_core::errors::{EngramError, EngramResult};

/// Held for the life of the process; the file is removed on drop.
pub struct InstanceLock {
    path: PathBuf,
}

impl InstanceLock {
    /// Acquire the lock file, failing fast when another live daemon holds it.
    pub fn acquire(db_path: &std::path::Path) -> EngramResult<Self> {
        let path = db_path.with_extension("db.lock");

        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(mut file) => {
                let _ = writeln!(file, "{}", std::process::id());
                Ok(Self { path })
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                let holder = fs::read_to_string(&path)
                    .ok()
                    .and_then(|s| s.trim().parse::<u32>().ok());
                if let Some(pid) = holder {
                    if !process_alive(pid) {
                        tracing::warn!(pid, "reclaiming lock from dead process");
                        let _ = fs::remove_file(&path);
                        return Self::acquire(db_path);
                    }
                    return Err(EngramError::StoreUnavailable {
                        message: format!(
                            "data directory locked by running process {pid} ({})",
                            path.display()
                        ),
                    });
                }
                Err(EngramError::StoreUnavailable {
                    message: format!("data directory locked ({})", path.display()),
                })
            }
            Err(e) => Err(EngramError::StoreUnavailable {
                message: format!("create lock {}: {e}", path.display()),
            }),
        }
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    std::path::Path::new(&format!("/proc/{pid}")).exists()
}

#[cfg(not(unix))]
fn process_alive(_pid: u32) -> bool {
    // Without a portable liveness check, assume the holder is alive.
    true
}
