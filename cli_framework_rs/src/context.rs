//! Per-invocation execution context.
//!
//! A [`CommandContext`] is built fresh for every dispatch from process
//! defaults, caller-supplied [`ContextOverrides`] and the global flags found
//! on the command line. Streams are cheap cloneable handles so the same
//! sink can be shared between the dispatcher, hooks and executors, and
//! replaced by in-memory buffers in tests.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, BufRead, BufReader, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::cli::command::GlobalFlags;

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Shared writable handle (stdout, stderr, or a test buffer).
#[derive(Clone)]
pub struct Stream {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
    terminal: bool,
}

impl Stream {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
            terminal: false,
        }
    }

    pub fn stdout() -> Self {
        Self {
            terminal: io::stdout().is_terminal(),
            ..Self::new(io::stdout())
        }
    }

    pub fn stderr() -> Self {
        Self {
            terminal: io::stderr().is_terminal(),
            ..Self::new(io::stderr())
        }
    }

    /// Discards everything written to it.
    pub fn sink() -> Self {
        Self::new(io::sink())
    }

    /// In-memory stream plus a handle for reading back what was written.
    pub fn capture() -> (Self, Captured) {
        let captured = Captured::default();
        (Self::new(captured.clone()), captured)
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }
}

impl Write for Stream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        lock(&self.inner).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        lock(&self.inner).flush()
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("terminal", &self.terminal)
            .finish_non_exhaustive()
    }
}

/// Buffer behind [`Stream::capture`].
#[derive(Clone, Default)]
pub struct Captured {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl Captured {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&lock(&self.buf)).into_owned()
    }

    pub fn clear(&self) {
        lock(&self.buf).clear();
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        lock(&self.buf).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Shared readable handle (stdin or a fixed string).
#[derive(Clone)]
pub struct Input {
    inner: Arc<Mutex<Box<dyn BufRead + Send>>>,
}

impl Input {
    pub fn new<R: Read + Send + 'static>(reader: R) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(BufReader::new(reader)))),
        }
    }

    pub fn stdin() -> Self {
        Self::new(io::stdin())
    }

    pub fn from_string(text: impl Into<String>) -> Self {
        Self::new(io::Cursor::new(text.into().into_bytes()))
    }

    /// Next line without its terminator, `None` at end of input.
    pub fn read_line(&self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if lock(&self.inner).read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    pub fn read_to_string(&self) -> io::Result<String> {
        let mut text = String::new();
        lock(&self.inner).read_to_string(&mut text)?;
        Ok(text)
    }
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Input").finish_non_exhaustive()
    }
}

/// Caller-supplied replacements for the process defaults.
#[derive(Debug, Clone, Default)]
pub struct ContextOverrides {
    pub cwd: Option<PathBuf>,
    pub env: Option<BTreeMap<String, String>>,
    pub stdin: Option<Input>,
    pub stdout: Option<Stream>,
    pub stderr: Option<Stream>,
    pub debug: Option<bool>,
    pub quiet: Option<bool>,
    pub color: Option<bool>,
}

#[derive(Debug)]
pub struct CommandContext {
    cwd: PathBuf,
    env: BTreeMap<String, String>,
    stdin: Input,
    stdout: Stream,
    stderr: Stream,
    pub debug: bool,
    pub quiet: bool,
    pub color: bool,
}

impl CommandContext {
    /// Context backed by the real process environment.
    pub fn from_process() -> Self {
        Self::with_overrides(&ContextOverrides::default())
    }

    pub fn with_overrides(overrides: &ContextOverrides) -> Self {
        let stdout = overrides.stdout.clone().unwrap_or_else(Stream::stdout);
        let color = overrides.color.unwrap_or_else(|| stdout.is_terminal());
        Self {
            cwd: overrides
                .cwd
                .clone()
                .or_else(|| std::env::current_dir().ok())
                .unwrap_or_else(|| PathBuf::from(".")),
            env: overrides
                .env
                .clone()
                .unwrap_or_else(|| std::env::vars().collect()),
            stdin: overrides.stdin.clone().unwrap_or_else(Input::stdin),
            stderr: overrides.stderr.clone().unwrap_or_else(Stream::stderr),
            stdout,
            debug: overrides.debug.unwrap_or(false),
            quiet: overrides.quiet.unwrap_or(false),
            color,
        }
    }

    /// Global flags only ever switch debug/quiet on and color off.
    pub fn apply_flags(&mut self, flags: &GlobalFlags) {
        self.debug |= flags.debug;
        self.quiet |= flags.quiet;
        if flags.no_color {
            self.color = false;
        }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn var(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    pub fn stdin(&self) -> Input {
        self.stdin.clone()
    }

    pub fn stdout(&self) -> Stream {
        self.stdout.clone()
    }

    pub fn stderr(&self) -> Stream {
        self.stderr.clone()
    }
}
