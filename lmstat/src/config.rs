//! lminfo configuration file.
//!
//! Optional YAML file supplying defaults for the command line. Every field
//! may be omitted.
//!
//! # Example YAML
//!
//! ```yaml
//! lmutil: /opt/flexlm/bin/lmutil
//! licfile: 27000@imdlic01
//! timeout_ms: 30000
//! output: json
//! ```

use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::extractor::{DEFAULT_LMUTIL, DEFAULT_TIMEOUT_MS, LmstatCommand};
use crate::output::OutputFormat;

/// Top-level lminfo configuration.
///
/// # Examples
///
/// ```
/// use lminfo_lmstat::config::LminfoConfig;
///
/// let config: LminfoConfig = serde_yaml::from_str("licfile: 27000@srv\n").unwrap();
/// assert_eq!(config.lmutil, "lmutil");
/// assert_eq!(config.command().argv(), ["lmutil", "lmstat", "-a", "-c", "27000@srv"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LminfoConfig {
    /// lmutil executable.
    pub lmutil: String,
    /// License file or `port@host` passed to lmstat with `-c`.
    pub licfile: Option<String>,
    /// Time allowed for lmstat to answer.
    pub timeout_ms: u64,
    /// Output format used when none is given on the command line.
    pub output: OutputFormat,
}

impl Default for LminfoConfig {
    fn default() -> Self {
        Self {
            lmutil: DEFAULT_LMUTIL.to_string(),
            licfile: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            output: OutputFormat::default(),
        }
    }
}

impl LminfoConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be opened, or
    /// [`ConfigError::Yaml`] if it is not a valid configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Yaml {
            path: path.display().to_string(),
            source,
        })
    }

    /// The lmstat invocation described by this configuration.
    pub fn command(&self) -> LmstatCommand {
        let mut command = LmstatCommand::new(&self.lmutil).with_timeout_ms(self.timeout_ms);
        if let Some(licfile) = &self.licfile {
            command = command.with_licfile(licfile);
        }
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_is_defaults() {
        let config: LminfoConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, LminfoConfig::default());
        assert_eq!(config.command(), LmstatCommand::default());
    }

    #[test]
    fn test_load_full_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "lmutil: /opt/flexlm/bin/lmutil\nlicfile: 27000@imdlic01\ntimeout_ms: 500\noutput: text"
        )
        .unwrap();

        let config = LminfoConfig::load(file.path()).unwrap();
        assert_eq!(config.lmutil, "/opt/flexlm/bin/lmutil");
        assert_eq!(config.output, OutputFormat::Text);
        let command = config.command();
        assert_eq!(command.timeout_ms, 500);
        assert_eq!(command.licfile.as_deref(), Some("27000@imdlic01"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "lmutl: typo").unwrap();
        let err = LminfoConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = LminfoConfig::load("/nonexistent/lminfo.yml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
