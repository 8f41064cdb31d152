//! Raw lmstat output acquisition.
//!
//! Runs `lmutil lmstat -a [-c <licfile>]` with a timeout and returns its
//! stdout, or reads previously captured output from a file or stdin. A
//! non-zero exit status is an [`AcquisitionError`]; the caller must not try
//! to parse anything in that case.
//!
//! # Example
//!
//! ```no_run
//! use lminfo_lmstat::extractor::LmstatCommand;
//!
//! let command = LmstatCommand::new("lmutil").with_licfile("27000@imdlic01");
//! let raw = command.run().expect("lmstat failed");
//! println!("{} bytes of status output", raw.len());
//! ```

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, info};
use wait_timeout::ChildExt;

use crate::error::AcquisitionError;

/// Default lmutil executable, resolved through `PATH`.
pub const DEFAULT_LMUTIL: &str = "lmutil";

/// Default time allowed for lmstat to answer (milliseconds).
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// An lmstat invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LmstatCommand {
    pub program: String,
    pub licfile: Option<String>,
    pub timeout_ms: u64,
}

impl Default for LmstatCommand {
    fn default() -> Self {
        Self::new(DEFAULT_LMUTIL)
    }
}

impl LmstatCommand {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            licfile: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Sets the license file (or `port@host`) passed with `-c`.
    pub fn with_licfile(mut self, licfile: &str) -> Self {
        self.licfile = Some(licfile.to_string());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Full argv, program first.
    ///
    /// # Examples
    ///
    /// ```
    /// use lminfo_lmstat::extractor::LmstatCommand;
    ///
    /// let argv = LmstatCommand::new("lmutil").with_licfile("lic.dat").argv();
    /// assert_eq!(argv, ["lmutil", "lmstat", "-a", "-c", "lic.dat"]);
    /// ```
    pub fn argv(&self) -> Vec<String> {
        let mut argv = vec![self.program.clone(), "lmstat".to_string(), "-a".to_string()];
        if let Some(licfile) = &self.licfile {
            argv.push("-c".to_string());
            argv.push(licfile.clone());
        }
        argv
    }

    /// Space-joined command line, for logs.
    pub fn display(&self) -> String {
        self.argv().join(" ")
    }

    /// Runs lmstat and returns its stdout.
    pub fn run(&self) -> Result<String, AcquisitionError> {
        let argv = self.argv();
        info!(command = %self.display(), "running lmstat");

        let mut child = Command::new(&argv[0])
            .args(&argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| {
                if source.kind() == std::io::ErrorKind::NotFound {
                    AcquisitionError::NotFound {
                        program: self.program.clone(),
                    }
                } else {
                    AcquisitionError::Spawn {
                        program: self.program.clone(),
                        source,
                    }
                }
            })?;

        // Drain both pipes while waiting; lmstat output can exceed the pipe buffer.
        let stdout_thread = child.stdout.take().map(drain);
        let stderr_thread = child.stderr.take().map(drain);

        let timeout = Duration::from_millis(self.timeout_ms);
        let status = match child.wait_timeout(timeout) {
            Ok(Some(status)) => status,
            outcome => {
                let _ = child.kill();
                let _ = child.wait();
                // The pipes close once the child is reaped; collect the readers.
                let _ = join(stdout_thread);
                let _ = join(stderr_thread);
                return Err(match outcome {
                    Err(err) => AcquisitionError::Io(err),
                    Ok(_) => {
                        debug!(
                            command = %self.display(),
                            timeout_ms = self.timeout_ms,
                            "lmstat timed out, process killed"
                        );
                        AcquisitionError::Timeout {
                            program: self.program.clone(),
                            timeout_ms: self.timeout_ms,
                        }
                    }
                });
            }
        };

        let stdout = join(stdout_thread)?;
        let stderr = join(stderr_thread)?;

        if !status.success() {
            debug!(command = %self.display(), %status, "lmstat failed");
            let stderr = stderr.trim();
            return Err(AcquisitionError::Failed {
                program: self.program.clone(),
                status: status.to_string(),
                stderr: if stderr.is_empty() {
                    stdout.trim().to_string()
                } else {
                    stderr.to_string()
                },
            });
        }

        debug!(bytes = stdout.len(), "captured lmstat output");
        Ok(stdout)
    }
}

type Drained = JoinHandle<std::io::Result<Vec<u8>>>;

fn drain<R: Read + Send + 'static>(mut pipe: R) -> Drained {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn join(handle: Option<Drained>) -> Result<String, AcquisitionError> {
    let Some(handle) = handle else {
        return Ok(String::new());
    };
    let buf = handle
        .join()
        .map_err(|_| std::io::Error::other("output reader thread panicked"))??;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Reads captured lmstat output from `path`, or from stdin when `path` is `-`.
pub fn read_captured_output(path: &Path) -> Result<String, AcquisitionError> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    debug!(path = %path.display(), "reading captured lmstat output");
    Ok(std::fs::read_to_string(path)?)
}
