//! Core scanner state machine
//!
//! A five-mode lexer over the include stack's active byte source. Mode
//! dispatch is an explicit enum; each pull loops until a token is
//! produced, the input is exhausted, or a directive swaps the active
//! source underneath the loop. Longest match wins everywhere; ties break
//! in rule order.

use crate::config::compile_time::scanning::{
    MAX_INCLUDE_PATH_LENGTH, MAX_NAME_LENGTH, MAX_STRING_SIZE,
};
use crate::config::runtime::{FileSourcePreferences, ScannerPreferences};
use crate::file_source::{FileSource, FileSourceError};
use crate::include::{DirectoryIterator, IncludeError, IncludeStack};
use crate::logging::codes;
use crate::tokens::{OwnedToken, Token, TokenClass};
use crate::{log_debug, log_error, log_success};
use std::path::{Path, PathBuf};

use super::numbers::{self, NumericError};

/// Scanner error kinds, surfaced through the error channel
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScanErrorKind {
    #[error(transparent)]
    Numeric(#[from] NumericError),

    #[error(transparent)]
    Include(#[from] IncludeError),

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unterminated block comment")]
    UnterminatedComment,

    #[error("unterminated include path")]
    UnterminatedInclude,

    #[error("string literal exceeds {limit} bytes")]
    StringTooLarge { limit: usize },

    #[error("setting name exceeds {limit} bytes")]
    NameTooLong { limit: usize },
}

impl ScanErrorKind {
    /// Get the diagnostic code for this error
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            ScanErrorKind::Numeric(NumericError::Malformed { .. }) => {
                codes::scanning::MALFORMED_NUMBER
            }
            ScanErrorKind::Numeric(NumericError::OutOfRange { .. }) => {
                codes::scanning::NUMBER_OUT_OF_RANGE
            }
            ScanErrorKind::Include(e) => e.error_code(),
            ScanErrorKind::UnterminatedString => codes::scanning::UNTERMINATED_STRING,
            ScanErrorKind::UnterminatedComment => codes::scanning::UNTERMINATED_COMMENT,
            ScanErrorKind::UnterminatedInclude => codes::scanning::UNTERMINATED_INCLUDE,
            ScanErrorKind::StringTooLarge { .. } => codes::scanning::STRING_TOO_LARGE,
            ScanErrorKind::NameTooLong { .. } => codes::scanning::NAME_TOO_LONG,
        }
    }
}

/// The error-channel record behind an ERROR token
#[derive(Debug, Clone)]
pub struct ScanError {
    pub kind: ScanErrorKind,
    pub file: PathBuf,
    pub line: u32,
}

impl ScanError {
    /// Human-readable failure description
    pub fn error_text(&self) -> String {
        self.kind.to_string()
    }

    pub fn error_code(&self) -> crate::logging::Code {
        self.kind.error_code()
    }
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.file.display(), self.line, self.kind)
    }
}

/// A pulled token stamped with its origin
#[derive(Debug)]
pub struct ScannedToken<'a> {
    pub token: Token<'a>,
    /// 1-based line in the frame that produced the token
    pub line: u32,
    /// Path of the frame that produced the token
    pub path: &'a Path,
}

/// Per-scan metrics, recorded as tokens are pulled
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct ScannerMetrics {
    pub total_tokens: usize,
    pub name_tokens: usize,
    pub scalar_tokens: usize,
    pub string_tokens: usize,
    pub punctuation_tokens: usize,
    pub garbage_tokens: usize,
    pub error_tokens: usize,
    pub includes_pushed: usize,
    pub directories_expanded: usize,
    pub max_include_depth: usize,
    pub max_string_length: usize,
}

impl ScannerMetrics {
    fn record_class(&mut self, class: TokenClass) {
        self.total_tokens += 1;
        match class {
            TokenClass::Name => self.name_tokens += 1,
            TokenClass::Scalar => self.scalar_tokens += 1,
            TokenClass::Text => self.string_tokens += 1,
            TokenClass::Punctuation => self.punctuation_tokens += 1,
            TokenClass::Garbage => self.garbage_tokens += 1,
            TokenClass::Diagnostic => self.error_tokens += 1,
        }
    }
}

/// Exclusive lexer modes; the active mode selects the live pattern set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Initial,
    Comment,
    Str,
    IncludeFile,
    IncludeDir,
}

/// Internal pull outcome: NAME defers to the match buffer so every other
/// payload can stay `'static`
enum RawToken {
    Owned(Token<'static>),
    Name,
}

enum Step {
    Emit(RawToken),
    Continue,
    Finish,
}

/// The scanner context: include stack, mode, accumulator, error channel.
///
/// Strictly single-threaded and reentrant across instances; all state
/// lives here. Dropping the context releases every frame buffer and any
/// directory iterators.
pub struct Scanner {
    stack: IncludeStack,
    mode: Mode,
    accumulator: Vec<u8>,
    name_buf: String,
    last_error: Option<ScanError>,
    metrics: ScannerMetrics,
    preferences: ScannerPreferences,
    file_prefs: FileSourcePreferences,
    finished: bool,
}

impl Scanner {
    /// Construct over an already-open byte source
    pub fn new(source: FileSource) -> Self {
        Self::with_preferences(
            source,
            ScannerPreferences::default(),
            FileSourcePreferences::default(),
        )
    }

    /// Construct with explicit preferences
    pub fn with_preferences(
        source: FileSource,
        preferences: ScannerPreferences,
        file_prefs: FileSourcePreferences,
    ) -> Self {
        log_debug!("Scanner constructed", "root" => source.path().display());
        Self {
            stack: IncludeStack::new(source),
            mode: Mode::Initial,
            accumulator: Vec::new(),
            name_buf: String::new(),
            last_error: None,
            metrics: ScannerMetrics::default(),
            preferences,
            file_prefs,
            finished: false,
        }
    }

    /// Open a root file and construct a scanner over it
    pub fn from_path(path: &Path) -> Result<Self, FileSourceError> {
        let source = FileSource::open(path)?;
        Ok(Self::new(source))
    }

    /// Construct over in-memory bytes; the label stands in for a path in
    /// diagnostics and relative include resolution
    pub fn from_bytes(bytes: impl Into<Vec<u8>>, label: impl Into<PathBuf>) -> Self {
        Self::new(FileSource::from_bytes(bytes, label))
    }

    /// The error record behind the most recent ERROR token
    pub fn last_error(&self) -> Option<&ScanError> {
        self.last_error.as_ref()
    }

    /// Metrics collected so far
    pub fn metrics(&self) -> &ScannerMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &ScannerPreferences {
        &self.preferences
    }

    /// Current include depth (root frame counts as 1)
    pub fn include_depth(&self) -> usize {
        self.stack.depth()
    }

    /// Pull the next token; `None` is end-of-stream.
    ///
    /// The NAME payload borrows the scanner's match buffer and is valid
    /// until the next pull (the borrow checker enforces the contract).
    pub fn next_token(&mut self) -> Option<ScannedToken<'_>> {
        if self.finished {
            return None;
        }
        loop {
            let step = match self.mode {
                Mode::Initial => self.scan_initial(),
                Mode::Comment => self.scan_comment(),
                Mode::Str => self.scan_string(),
                Mode::IncludeFile | Mode::IncludeDir => self.scan_include_path(),
            };
            match step {
                Step::Emit(raw) => {
                    let class = match &raw {
                        RawToken::Owned(token) => token.token_class(),
                        RawToken::Name => TokenClass::Name,
                    };
                    if self.preferences.collect_token_metrics {
                        self.metrics.record_class(class);
                    }
                    let token = match raw {
                        RawToken::Owned(token) => token,
                        RawToken::Name => Token::Name(self.name_buf.as_str()),
                    };
                    return Some(ScannedToken {
                        token,
                        line: self.stack.active_line(),
                        path: self.stack.active_path(),
                    });
                }
                Step::Continue => continue,
                Step::Finish => {
                    self.finished = true;
                    log_success!(codes::success::SCAN_COMPLETE, "Scan finished",
                        "root" => self.stack.active_path().display(),
                        "tokens" => self.metrics.total_tokens,
                        "includes" => self.metrics.includes_pushed,
                        "errors" => self.metrics.error_tokens);
                    return None;
                }
            }
        }
    }

    /// Pull every remaining token, detached from the scanner's buffers
    pub fn drain_owned(&mut self) -> Vec<OwnedToken> {
        let mut tokens = Vec::new();
        while let Some(scanned) = self.next_token() {
            tokens.push(scanned.token.to_owned_token());
        }
        tokens
    }

    // ========================================================================
    // Byte-level helpers
    // ========================================================================

    fn peek(&self, n: usize) -> Option<u8> {
        self.stack.active_source().peek(n)
    }

    fn bump(&mut self) -> Option<u8> {
        self.stack.active_source_mut().bump()
    }

    fn set_error(&mut self, kind: ScanErrorKind) {
        let error = ScanError {
            file: self.stack.active_path().to_path_buf(),
            line: self.stack.active_line(),
            kind,
        };
        log_error!(error.error_code(), "Scan error",
            "detail" => error.kind,
            "file" => error.file.display(),
            "line" => error.line);
        self.last_error = Some(error);
    }

    fn emit(token: Token<'static>) -> Step {
        Step::Emit(RawToken::Owned(token))
    }

    fn single(&mut self, token: Token<'static>) -> Step {
        self.bump();
        Self::emit(token)
    }

    // ========================================================================
    // INITIAL mode
    // ========================================================================

    fn scan_initial(&mut self) -> Step {
        loop {
            let Some(byte) = self.peek(0) else {
                return self.handle_eof();
            };
            match byte {
                b' ' | b'\t' | b'\n' | b'\r' | b'\x0c' => {
                    self.bump();
                }
                b'#' => self.skip_line_comment(),
                b'/' => match self.peek(1) {
                    Some(b'/') => self.skip_line_comment(),
                    Some(b'*') => {
                        self.stack.active_source_mut().consume(2);
                        self.mode = Mode::Comment;
                        return Step::Continue;
                    }
                    _ => {
                        self.bump();
                        return Self::emit(Token::Garbage(b'/'));
                    }
                },
                b'@' => return self.scan_directive_or_garbage(),
                b'"' => {
                    self.bump();
                    self.accumulator.clear();
                    self.mode = Mode::Str;
                    return Step::Continue;
                }
                b'=' | b':' => return self.single(Token::Equals),
                b',' => return self.single(Token::Comma),
                b';' => return self.single(Token::Semicolon),
                b'{' => return self.single(Token::GroupStart),
                b'}' => return self.single(Token::GroupEnd),
                b'[' => return self.single(Token::ArrayStart),
                b']' => return self.single(Token::ArrayEnd),
                b'(' => return self.single(Token::ListStart),
                b')' => return self.single(Token::ListEnd),
                b'+' | b'-' | b'.' | b'0'..=b'9' => return self.scan_number(),
                b if is_name_start(b) => return self.scan_name(),
                other => {
                    self.bump();
                    return Self::emit(Token::Garbage(other));
                }
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(b) = self.peek(0) {
            if b == b'\n' {
                break;
            }
            self.bump();
        }
    }

    fn scan_directive_or_garbage(&mut self) -> Step {
        if self.stack.active_source().at_line_start() {
            let probe = probe_directive(self.stack.active_source().rest());
            if let Some((len, mode)) = probe {
                self.stack.active_source_mut().consume(len);
                self.accumulator.clear();
                self.mode = mode;
                return Step::Continue;
            }
        }
        self.bump();
        Self::emit(Token::Garbage(b'@'))
    }

    fn scan_number(&mut self) -> Step {
        let matched = {
            let rest = self.stack.active_source().rest();
            numbers::match_numeric(rest).map(|m| (m.len, numbers::classify(&rest[..m.len], m.kind)))
        };
        match matched {
            Some((len, outcome)) => {
                self.stack.active_source_mut().consume(len);
                match outcome {
                    Ok(token) => Self::emit(token),
                    Err(e) => {
                        self.set_error(ScanErrorKind::Numeric(e));
                        Self::emit(Token::Error)
                    }
                }
            }
            // a bare sign matches no numeric rule
            None => match self.bump() {
                Some(b) => Self::emit(Token::Garbage(b)),
                None => Step::Continue,
            },
        }
    }

    fn scan_name(&mut self) -> Step {
        self.name_buf.clear();
        while let Some(b) = self.peek(0) {
            let accept = if self.name_buf.is_empty() {
                is_name_start(b)
            } else {
                is_name_continue(b)
            };
            if !accept {
                break;
            }
            self.bump();
            self.name_buf.push(b as char);
        }

        if self.name_buf.len() > MAX_NAME_LENGTH {
            self.set_error(ScanErrorKind::NameTooLong {
                limit: MAX_NAME_LENGTH,
            });
            return Self::emit(Token::Error);
        }

        // booleans win the tie against the name rule at equal length
        if self.name_buf.eq_ignore_ascii_case("true") {
            return Self::emit(Token::Boolean(true));
        }
        if self.name_buf.eq_ignore_ascii_case("false") {
            return Self::emit(Token::Boolean(false));
        }

        Step::Emit(RawToken::Name)
    }

    // ========================================================================
    // COMMENT mode
    // ========================================================================

    fn scan_comment(&mut self) -> Step {
        loop {
            match self.bump() {
                None => {
                    self.mode = Mode::Initial;
                    self.set_error(ScanErrorKind::UnterminatedComment);
                    return Self::emit(Token::Error);
                }
                Some(b'*') if self.peek(0) == Some(b'/') => {
                    self.bump();
                    self.mode = Mode::Initial;
                    return Step::Continue;
                }
                Some(_) => {}
            }
        }
    }

    // ========================================================================
    // STRING mode
    // ========================================================================

    fn scan_string(&mut self) -> Step {
        loop {
            match self.bump() {
                None => {
                    self.accumulator.clear();
                    self.mode = Mode::Initial;
                    self.set_error(ScanErrorKind::UnterminatedString);
                    return Self::emit(Token::Error);
                }
                Some(b'"') => {
                    let bytes = std::mem::take(&mut self.accumulator);
                    self.mode = Mode::Initial;
                    self.metrics.max_string_length = self.metrics.max_string_length.max(bytes.len());
                    if self.preferences.log_string_statistics {
                        log_debug!("String literal decoded", "length" => bytes.len());
                    }
                    return Self::emit(Token::Str(bytes));
                }
                Some(b'\\') => self.decode_string_escape(),
                Some(b) => self.accumulator.push(b),
            }
            if self.accumulator.len() > MAX_STRING_SIZE {
                self.accumulator.clear();
                self.mode = Mode::Initial;
                self.set_error(ScanErrorKind::StringTooLarge {
                    limit: MAX_STRING_SIZE,
                });
                return Self::emit(Token::Error);
            }
        }
    }

    /// Decode one escape after the consumed backslash. Unrecognized
    /// escapes keep the backslash literally and leave the next byte for
    /// the plain-character rule.
    fn decode_string_escape(&mut self) {
        match self.peek(0) {
            Some(b'n') => {
                self.bump();
                self.accumulator.push(b'\n');
            }
            Some(b'r') => {
                self.bump();
                self.accumulator.push(b'\r');
            }
            Some(b't') => {
                self.bump();
                self.accumulator.push(b'\t');
            }
            Some(b'f') => {
                self.bump();
                self.accumulator.push(0x0c);
            }
            Some(b'\\') => {
                self.bump();
                self.accumulator.push(b'\\');
            }
            Some(b'"') => {
                self.bump();
                self.accumulator.push(b'"');
            }
            Some(b'x') => match (self.peek(1), self.peek(2)) {
                (Some(hi), Some(lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
                    self.stack.active_source_mut().consume(3);
                    self.accumulator.push(hex_value(hi) * 16 + hex_value(lo));
                }
                _ => self.accumulator.push(b'\\'),
            },
            _ => self.accumulator.push(b'\\'),
        }
    }

    // ========================================================================
    // INCLUDE modes
    // ========================================================================

    fn scan_include_path(&mut self) -> Step {
        let directive = self.mode;
        loop {
            match self.bump() {
                None => {
                    self.accumulator.clear();
                    self.mode = Mode::Initial;
                    self.set_error(ScanErrorKind::UnterminatedInclude);
                    return Self::emit(Token::Error);
                }
                Some(b'"') => {
                    let raw = std::mem::take(&mut self.accumulator);
                    self.mode = Mode::Initial;
                    return match directive {
                        Mode::IncludeFile => self.process_include_file(raw),
                        _ => self.process_include_dir(raw),
                    };
                }
                Some(b'\\') => self.decode_path_escape(),
                Some(b) => self.accumulator.push(b),
            }
            if self.accumulator.len() > MAX_INCLUDE_PATH_LENGTH {
                self.accumulator.clear();
                self.mode = Mode::Initial;
                self.set_error(ScanErrorKind::Include(IncludeError::InvalidPath {
                    reason: format!("path exceeds {} bytes", MAX_INCLUDE_PATH_LENGTH),
                }));
                return Self::emit(Token::Error);
            }
        }
    }

    /// Include paths admit only the `\\` and `\"` escapes
    fn decode_path_escape(&mut self) {
        match self.peek(0) {
            Some(b'\\') => {
                self.bump();
                self.accumulator.push(b'\\');
            }
            Some(b'"') => {
                self.bump();
                self.accumulator.push(b'"');
            }
            _ => self.accumulator.push(b'\\'),
        }
    }

    fn include_path_utf8(&mut self, raw: Vec<u8>) -> Option<String> {
        match String::from_utf8(raw) {
            Ok(path) => Some(path),
            Err(_) => {
                self.set_error(ScanErrorKind::Include(IncludeError::InvalidPath {
                    reason: "include path is not valid UTF-8".to_string(),
                }));
                None
            }
        }
    }

    fn process_include_file(&mut self, raw: Vec<u8>) -> Step {
        let Some(path) = self.include_path_utf8(raw) else {
            return Self::emit(Token::Error);
        };
        let resolved = self.stack.resolve(Path::new(&path));
        if self.preferences.log_include_transitions {
            log_debug!("Include directive accepted", "path" => resolved.display());
        }
        match self.stack.push_file(&resolved, None, &self.file_prefs) {
            Ok(()) => {
                self.metrics.includes_pushed += 1;
                self.metrics.max_include_depth =
                    self.metrics.max_include_depth.max(self.stack.depth());
                Step::Continue
            }
            Err(e) => {
                self.set_error(ScanErrorKind::Include(e));
                Self::emit(Token::Error)
            }
        }
    }

    fn process_include_dir(&mut self, raw: Vec<u8>) -> Step {
        let Some(path) = self.include_path_utf8(raw) else {
            return Self::emit(Token::Error);
        };
        let resolved = self.stack.resolve(Path::new(&path));
        match DirectoryIterator::open(&resolved) {
            Ok(iter) => {
                self.metrics.directories_expanded += 1;
                self.advance_directory(iter)
            }
            Err(e) => {
                self.set_error(ScanErrorKind::Include(e));
                Self::emit(Token::Error)
            }
        }
    }

    /// Push the directory iterator's next file, attaching the iterator
    /// to the new frame. A failed push abandons the remaining iteration.
    fn advance_directory(&mut self, mut iter: DirectoryIterator) -> Step {
        match iter.next_entry() {
            Some(next) => match self.stack.push_file(&next, Some(iter), &self.file_prefs) {
                Ok(()) => {
                    self.metrics.includes_pushed += 1;
                    self.metrics.max_include_depth =
                        self.metrics.max_include_depth.max(self.stack.depth());
                    Step::Continue
                }
                Err(e) => {
                    self.set_error(ScanErrorKind::Include(e));
                    Self::emit(Token::Error)
                }
            },
            None => Step::Continue,
        }
    }

    // ========================================================================
    // End-of-buffer handling
    // ========================================================================

    fn handle_eof(&mut self) -> Step {
        match self.stack.pop() {
            None => Step::Finish,
            Some(Some(iter)) => self.advance_directory(iter),
            Some(None) => Step::Continue,
        }
    }
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("mode", &self.mode)
            .field("depth", &self.stack.depth())
            .field("path", &self.stack.active_path())
            .field("line", &self.stack.active_line())
            .field("finished", &self.finished)
            .finish()
    }
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'*'
}

fn is_name_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'*')
}

fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        b'A'..=b'F' => b - b'A' + 10,
        _ => 0,
    }
}

/// Probe for `@include[ \t]+"` / `@include_dir[ \t]+"` at the cursor.
/// Returns the byte length through the opening quote and the mode to
/// enter. The longer keyword is tried first.
fn probe_directive(rest: &[u8]) -> Option<(usize, Mode)> {
    for (keyword, mode) in [
        (&b"@include_dir"[..], Mode::IncludeDir),
        (&b"@include"[..], Mode::IncludeFile),
    ] {
        if let Some(len) = probe_keyword(rest, keyword) {
            return Some((len, mode));
        }
    }
    None
}

fn probe_keyword(rest: &[u8], keyword: &[u8]) -> Option<usize> {
    if !rest.starts_with(keyword) {
        return None;
    }
    let mut i = keyword.len();
    let ws_start = i;
    while matches!(rest.get(i), Some(b' ') | Some(b'\t')) {
        i += 1;
    }
    if i > ws_start && rest.get(i) == Some(&b'"') {
        Some(i + 1)
    } else {
        None
    }
}
