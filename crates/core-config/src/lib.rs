//! Configuration loading, session options and validation.
//!
//! Sources in increasing precedence: built-in defaults, `sift.toml`, then whatever the caller
//! layers on top (the binary applies CLI flags). Unknown TOML fields are ignored so the file
//! can grow without breaking older binaries; a malformed file is an error, not a silent reset.
//!
//! ```toml
//! [finder]
//! mode = "fuzzy"
//! height = 40
//! keep_right = false
//! label = "> "
//! min_rows = 6
//!
//! [layout]
//! gutter = 9
//! right_margin = 12
//!
//! [timing]
//! resize_poll_ms = 300
//! resize_burst_poll_ms = 30
//! update_debounce_ms = 100
//! ```

use core_filter::MatchMode;
use serde::Deserialize;
use std::time::Duration;
use std::{fs, io, path::PathBuf};
use tracing::info;

pub const DEFAULT_LABEL: &str = "> ";
pub const DEFAULT_MIN_ROWS: u16 = 6;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("height must be a percentage in 0..=100, got {0}")]
    InvalidHeight(u16),
    #[error("unknown match mode `{0}` (expected `fuzzy` or `normal`)")]
    UnknownMode(String),
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct FinderConfig {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub height: Option<u16>,
    #[serde(default)]
    pub keep_right: Option<bool>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub min_rows: Option<u16>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Columns reserved outside a row's text (selection gutter, markers, slack).
    #[serde(default = "LayoutConfig::default_gutter")]
    pub gutter: u16,
    /// Columns kept visible right of a row's anchor match.
    #[serde(default = "LayoutConfig::default_right_margin")]
    pub right_margin: u16,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            gutter: Self::default_gutter(),
            right_margin: Self::default_right_margin(),
        }
    }
}

impl LayoutConfig {
    const fn default_gutter() -> u16 {
        9
    }
    const fn default_right_margin() -> u16 {
        12
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    #[serde(default = "TimingConfig::default_resize_poll_ms")]
    pub resize_poll_ms: u64,
    #[serde(default = "TimingConfig::default_resize_burst_poll_ms")]
    pub resize_burst_poll_ms: u64,
    #[serde(default = "TimingConfig::default_update_debounce_ms")]
    pub update_debounce_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            resize_poll_ms: Self::default_resize_poll_ms(),
            resize_burst_poll_ms: Self::default_resize_burst_poll_ms(),
            update_debounce_ms: Self::default_update_debounce_ms(),
        }
    }
}

impl TimingConfig {
    const fn default_resize_poll_ms() -> u64 {
        300
    }
    const fn default_resize_burst_poll_ms() -> u64 {
        30
    }
    const fn default_update_debounce_ms() -> u64 {
        100
    }

    pub fn resize_poll(&self) -> Duration {
        Duration::from_millis(self.resize_poll_ms)
    }

    pub fn resize_burst_poll(&self) -> Duration {
        Duration::from_millis(self.resize_burst_poll_ms)
    }

    pub fn update_debounce(&self) -> Duration {
        Duration::from_millis(self.update_debounce_ms)
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub finder: FinderConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub timing: TimingConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub file: ConfigFile,
    /// Path the file was read from; `None` when defaults were used.
    pub source: Option<PathBuf>,
}

/// Best-effort config path: `./sift.toml`, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("sift.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("sift").join("sift.toml");
    }
    PathBuf::from("sift.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(discover);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(target: "config", path = %path.display(), "config_missing_using_defaults");
            return Ok(Config::default());
        }
        Err(source) => return Err(ConfigError::Io { path, source }),
    };
    let file = toml::from_str::<ConfigFile>(&content).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;
    info!(target: "config", path = %path.display(), "config_loaded");
    Ok(Config {
        file,
        source: Some(path),
    })
}

/// Runtime options of one finder session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub mode: MatchMode,
    pub query: String,
    /// Finish automatically when the settled list narrows to exactly one match.
    pub select_one: bool,
    /// Match rows as a percentage of the terminal rows left after the prompt and status lines.
    pub height: Option<u8>,
    pub keep_right: bool,
    /// Prompt text; may span several lines and contain escape sequences.
    pub label: String,
    /// Prompt-only capture: no status line, no rows, never a selection.
    pub no_list: bool,
    pub min_rows: u16,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            mode: MatchMode::Fuzzy,
            query: String::new(),
            select_one: false,
            height: None,
            keep_right: false,
            label: DEFAULT_LABEL.to_string(),
            no_list: false,
            min_rows: DEFAULT_MIN_ROWS,
        }
    }
}

impl SessionOptions {
    /// Defaults overlaid with the `[finder]` table.
    pub fn from_file(file: &ConfigFile) -> Result<Self, ConfigError> {
        let mut opts = Self::default();
        let finder = &file.finder;
        if let Some(mode) = &finder.mode {
            opts.mode = parse_mode(mode)?;
        }
        if let Some(height) = finder.height {
            opts.set_height(height)?;
        }
        if let Some(keep_right) = finder.keep_right {
            opts.keep_right = keep_right;
        }
        if let Some(label) = &finder.label {
            opts.label = label.clone();
        }
        if let Some(min_rows) = finder.min_rows {
            opts.min_rows = min_rows.max(1);
        }
        Ok(opts)
    }

    pub fn set_height(&mut self, percent: u16) -> Result<(), ConfigError> {
        match u8::try_from(percent) {
            Ok(p) if p <= 100 => {
                self.height = Some(p);
                Ok(())
            }
            _ => Err(ConfigError::InvalidHeight(percent)),
        }
    }

    /// Check invariants the type system cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.height {
            Some(h) if h > 100 => Err(ConfigError::InvalidHeight(h.into())),
            _ => Ok(()),
        }
    }
}

pub fn parse_mode(raw: &str) -> Result<MatchMode, ConfigError> {
    raw.parse::<MatchMode>()
        .map_err(|e| ConfigError::UnknownMode(e.0))
}

/// What a session is started from: a bare list (all defaults) or a list with options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinderInit {
    List(Vec<String>),
    Options {
        list: Vec<String>,
        options: SessionOptions,
    },
}

impl FinderInit {
    pub fn with_options(list: Vec<String>, options: SessionOptions) -> Self {
        FinderInit::Options { list, options }
    }

    /// Validated list and options. Fails before any terminal state is touched.
    pub fn into_parts(self) -> Result<(Vec<String>, SessionOptions), ConfigError> {
        match self {
            FinderInit::List(list) => Ok((list, SessionOptions::default())),
            FinderInit::Options { list, options } => {
                options.validate()?;
                Ok((list, options))
            }
        }
    }
}

impl From<Vec<String>> for FinderInit {
    fn from(list: Vec<String>) -> Self {
        FinderInit::List(list)
    }
}

impl From<Vec<&str>> for FinderInit {
    fn from(list: Vec<&str>) -> Self {
        FinderInit::List(list.into_iter().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl Write for LockedWriter<'_> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), body).unwrap();
        tmp
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert_eq!(cfg.file, ConfigFile::default());
        assert!(cfg.source.is_none());
        assert_eq!(cfg.file.layout.gutter, 9);
        assert_eq!(cfg.file.timing.resize_poll(), Duration::from_millis(300));
    }

    #[test]
    fn parses_finder_section() {
        let tmp = write_config(
            "[finder]\nmode = \"normal\"\nheight = 40\nkeep_right = true\nlabel = \"? \"\n",
        );
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.source.as_deref(), Some(tmp.path()));
        let opts = SessionOptions::from_file(&cfg.file).unwrap();
        assert_eq!(opts.mode, MatchMode::Normal);
        assert_eq!(opts.height, Some(40));
        assert!(opts.keep_right);
        assert_eq!(opts.label, "? ");
        assert_eq!(opts.min_rows, DEFAULT_MIN_ROWS);
    }

    #[test]
    fn partial_tables_keep_defaults() {
        let tmp = write_config("[layout]\nright_margin = 20\n[timing]\nupdate_debounce_ms = 50\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.layout.gutter, 9);
        assert_eq!(cfg.file.layout.right_margin, 20);
        assert_eq!(cfg.file.timing.update_debounce(), Duration::from_millis(50));
        assert_eq!(cfg.file.timing.resize_burst_poll_ms, 30);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let tmp = write_config("[finder\nmode = ");
        let err = load_from(Some(tmp.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn unknown_mode_and_bad_height_are_rejected() {
        let tmp = write_config("[finder]\nmode = \"regex\"\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert!(matches!(
            SessionOptions::from_file(&cfg.file),
            Err(ConfigError::UnknownMode(m)) if m == "regex"
        ));

        let tmp = write_config("[finder]\nheight = 250\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert!(matches!(
            SessionOptions::from_file(&cfg.file),
            Err(ConfigError::InvalidHeight(250))
        ));
    }

    #[test]
    fn init_validates_options() {
        let mut options = SessionOptions::default();
        options.height = Some(101);
        let init = FinderInit::with_options(vec!["a".into()], options);
        assert!(matches!(init.into_parts(), Err(ConfigError::InvalidHeight(101))));

        let (list, opts) = FinderInit::from(vec!["a", "b"]).into_parts().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(opts, SessionOptions::default());
    }

    #[test]
    fn load_logging_uses_config_target() {
        let tmp = write_config("[finder]\nmode = \"fuzzy\"\n");
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        with_default(subscriber, || {
            load_from(Some(tmp.path().to_path_buf())).unwrap();
        });

        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("INFO config:"));
        assert!(log_output.contains("config_loaded"));
    }
}
