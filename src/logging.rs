// File-based logging — captures all eprintln! output to a timestamped log file.
//
// Each launch writes a fresh file under
//   <data dir>/com.vaultchat.app/logs/vaultchat-2026-03-01_14-30-00.log
// and prunes the directory down to the five most recent files.

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::io::FromRawFd;
use std::path::{Path, PathBuf};
use std::sync::Once;

static INIT: Once = Once::new();

const KEEP_LOGS: usize = 5;

/// Initialize file logging in the default logs directory. Call once at
/// startup, before any eprintln! calls.
///
/// Stderr is redirected through an OS-level pipe; a tee thread copies every
/// line to both the original stderr and the log file, so all existing
/// eprintln! call sites are captured without changes.
pub fn init() {
    match logs_dir() {
        Some(dir) => init_at(&dir),
        None => eprintln!("Warning: Failed to determine logs directory; file logging disabled"),
    }
}

/// Initialize file logging in a specific directory.
pub fn init_at(logs_dir: &Path) {
    INIT.call_once(|| {
        if let Err(e) = tee_stderr_to(logs_dir) {
            eprintln!("Warning: Failed to initialize file logging: {}", e);
        }
    });
}

/// The default logs directory path.
pub fn logs_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("com.vaultchat.app").join("logs"))
}

fn tee_stderr_to(logs_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(logs_dir)?;
    prune_old_logs(logs_dir);

    let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
    let log_path = logs_dir.join(format!("vaultchat-{}.log", timestamp));
    let mut log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    eprintln!("Logging: Writing to {}", log_path.display());

    // Pipe stderr through us: fd 2 becomes the pipe's write end, the tee
    // thread drains the read end into the saved stderr and the log file.
    let mut pipe_fds = [0i32; 2];
    if unsafe { libc::pipe(pipe_fds.as_mut_ptr()) } != 0 {
        return Err("Failed to create pipe".into());
    }
    let (read_fd, write_fd) = (pipe_fds[0], pipe_fds[1]);

    let saved_stderr_fd = unsafe { libc::dup(2) };
    if saved_stderr_fd < 0 {
        return Err("Failed to dup stderr".into());
    }
    if unsafe { libc::dup2(write_fd, 2) } < 0 {
        return Err("Failed to redirect stderr".into());
    }
    unsafe { libc::close(write_fd) };

    let pipe_reader = unsafe { fs::File::from_raw_fd(read_fd) };
    let mut terminal = unsafe { fs::File::from_raw_fd(saved_stderr_fd) };

    std::thread::spawn(move || {
        for line in BufReader::new(pipe_reader).lines() {
            let Ok(line) = line else { break };
            let _ = writeln!(terminal, "{}", line);
            let ts = chrono::Local::now().format("%H:%M:%S%.3f");
            let _ = writeln!(log_file, "[{}] {}", ts, line);
            let _ = log_file.flush();
        }
    });

    Ok(())
}

/// Delete old log files, keeping the most recent KEEP_LOGS.
fn prune_old_logs(logs_dir: &Path) {
    let Ok(entries) = fs::read_dir(logs_dir) else { return };

    let mut logs: Vec<(PathBuf, std::time::SystemTime)> = entries
        .flatten()
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            name.starts_with("vaultchat-") && name.ends_with(".log")
        })
        .filter_map(|entry| {
            let modified = entry.metadata().ok()?.modified().ok()?;
            Some((entry.path(), modified))
        })
        .collect();

    // Newest first; everything beyond KEEP_LOGS goes
    logs.sort_by(|a, b| b.1.cmp(&a.1));
    for (path, _) in logs.iter().skip(KEEP_LOGS) {
        eprintln!("Logging: Removing old log {}", path.display());
        let _ = fs::remove_file(path);
    }
}
