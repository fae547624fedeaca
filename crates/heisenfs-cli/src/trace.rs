//! Line-oriented callback traces.
//!
//! One request per line. Lines whose first non-blank character is `#` are
//! comments and blank lines are ignored; a `#` anywhere else is ordinary text:
//!
//! ```text
//! create /a 644          mode is octal
//! stat /a                also: getattr
//! utimens /a [atime mtime]   unix seconds; both or neither, default now
//! open /a
//! write /a 0 hello world     the rest of the line is the data
//! read /a 0 16
//! truncate /a 4
//! release /a
//! list
//! readdir /
//! mkdir /d 755
//! ```

use std::time::{Duration, SystemTime};

use anyhow::{Context, Result, anyhow, bail};
use heisenfs_kernel::{
    DirEntry, FileAttr, FileId, FilesystemEngine, FsError, FsOps, Operation, Timestamps,
};
use serde::Serialize;

/// One parsed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Create { path: String, mode: u32 },
    Stat { path: String },
    SetTimes { path: String, times: Option<Timestamps> },
    Open { path: String },
    Write { path: String, offset: u64, data: Vec<u8> },
    Read { path: String, offset: u64, len: usize },
    Truncate { path: String, size: u64 },
    Release { path: String },
    List,
    Readdir { path: String },
    Mkdir { path: String, mode: u32 },
}

/// A successful reply.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reply {
    Created { id: FileId },
    Attr { attr: FileAttr },
    Names { names: Vec<String> },
    Entries { entries: Vec<DirEntry> },
    Data { len: usize, text: String },
    Written { count: usize },
    Done,
}

/// The outcome of one trace line.
#[derive(Debug, Clone, Serialize)]
pub struct Step {
    pub line: usize,
    pub request: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<Reply>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Split the next whitespace-delimited token off the front of `rest`.
fn next_token<'a>(rest: &mut &'a str) -> Option<&'a str> {
    let s = rest.trim_start();
    if s.is_empty() {
        *rest = s;
        return None;
    }
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    let (tok, tail) = s.split_at(end);
    *rest = tail;
    Some(tok)
}

fn required<'a>(rest: &mut &'a str, what: &str) -> Result<&'a str> {
    next_token(rest).ok_or_else(|| anyhow!("missing {what}"))
}

fn parse_mode(s: &str) -> Result<u32> {
    u32::from_str_radix(s.trim_start_matches("0o"), 8).with_context(|| format!("bad mode {s:?}"))
}

fn parse_secs(s: &str) -> Result<SystemTime> {
    let secs: u64 = s.parse().with_context(|| format!("bad timestamp {s:?}"))?;
    Ok(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
}

/// Parse one line. Blank lines and comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Request>> {
    if line.trim_start().starts_with('#') {
        return Ok(None);
    }
    let mut rest = line;
    let Some(keyword) = next_token(&mut rest) else {
        return Ok(None);
    };

    if keyword.eq_ignore_ascii_case("mkdir") {
        let path = required(&mut rest, "path")?.to_string();
        let mode = parse_mode(next_token(&mut rest).unwrap_or("755"))?;
        return Ok(Some(Request::Mkdir { path, mode }));
    }

    let op = Operation::from_str(keyword).ok_or_else(|| anyhow!("unknown request {keyword:?}"))?;
    let request = match op {
        Operation::List => match next_token(&mut rest) {
            Some(path) => Request::Readdir {
                path: path.to_string(),
            },
            None => Request::List,
        },
        Operation::Create => {
            let path = required(&mut rest, "path")?.to_string();
            let mode = parse_mode(next_token(&mut rest).unwrap_or("644"))?;
            Request::Create { path, mode }
        }
        Operation::StatQuery => Request::Stat {
            path: required(&mut rest, "path")?.to_string(),
        },
        Operation::SetTimes => {
            let path = required(&mut rest, "path")?.to_string();
            let times = match (next_token(&mut rest), next_token(&mut rest)) {
                (None, _) => None,
                (Some(a), Some(m)) => Some(Timestamps {
                    atime: parse_secs(a)?,
                    mtime: parse_secs(m)?,
                }),
                (Some(_), None) => bail!("utimens takes both atime and mtime, or neither"),
            };
            Request::SetTimes { path, times }
        }
        Operation::Open => Request::Open {
            path: required(&mut rest, "path")?.to_string(),
        },
        Operation::Write => {
            let path = required(&mut rest, "path")?.to_string();
            let offset = required(&mut rest, "offset")?.parse().context("bad offset")?;
            // Exactly one separator after the offset; the rest is data.
            let data = rest.strip_prefix(char::is_whitespace).unwrap_or(rest);
            Request::Write {
                path,
                offset,
                data: data.as_bytes().to_vec(),
            }
        }
        Operation::Read => {
            let path = required(&mut rest, "path")?.to_string();
            let offset = required(&mut rest, "offset")?.parse().context("bad offset")?;
            let len = required(&mut rest, "length")?.parse().context("bad length")?;
            Request::Read { path, offset, len }
        }
        Operation::Truncate => {
            let path = required(&mut rest, "path")?.to_string();
            let size = required(&mut rest, "size")?.parse().context("bad size")?;
            Request::Truncate { path, size }
        }
        Operation::Release => Request::Release {
            path: required(&mut rest, "path")?.to_string(),
        },
    };
    Ok(Some(request))
}

/// Parse a whole trace, keeping 1-based line numbers.
pub fn parse_trace(text: &str) -> Result<Vec<(usize, Request)>> {
    let mut requests = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let parsed = parse_line(line).with_context(|| format!("line {}: {}", i + 1, line.trim()))?;
        if let Some(request) = parsed {
            requests.push((i + 1, request));
        }
    }
    Ok(requests)
}

/// Dispatch one request to the engine.
pub fn apply(fs: &dyn FsOps, request: &Request) -> Result<Reply, FsError> {
    Ok(match request {
        Request::Create { path, mode } => Reply::Created {
            id: fs.create(path, *mode)?,
        },
        Request::Stat { path } => Reply::Attr {
            attr: fs.getattr(path)?,
        },
        Request::SetTimes { path, times } => {
            fs.utimens(path, times.unwrap_or_else(Timestamps::now))?;
            Reply::Done
        }
        Request::Open { path } => {
            fs.open(path)?;
            Reply::Done
        }
        Request::Write { path, offset, data } => Reply::Written {
            count: fs.write(path, *offset, data)?,
        },
        Request::Read { path, offset, len } => {
            let data = fs.read(path, *offset, *len)?;
            Reply::Data {
                len: data.len(),
                text: String::from_utf8_lossy(&data).into_owned(),
            }
        }
        Request::Truncate { path, size } => {
            fs.truncate(path, *size)?;
            Reply::Done
        }
        Request::Release { path } => {
            fs.release(path)?;
            Reply::Done
        }
        Request::List => Reply::Names { names: fs.list() },
        Request::Readdir { path } => Reply::Entries {
            entries: fs.readdir(path)?,
        },
        Request::Mkdir { path, mode } => {
            fs.mkdir(path, *mode)?;
            Reply::Done
        }
    })
}

/// Replay a parsed trace. Errors are recorded per step, never fatal.
pub fn replay(fs: &FilesystemEngine, requests: &[(usize, Request)]) -> Vec<Step> {
    requests
        .iter()
        .map(|(line, request)| {
            let described = describe(request);
            match apply(fs, request) {
                Ok(reply) => Step {
                    line: *line,
                    request: described,
                    reply: Some(reply),
                    error: None,
                },
                Err(e) => {
                    tracing::debug!(line, error = %e, "request failed");
                    Step {
                        line: *line,
                        request: described,
                        reply: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        })
        .collect()
}

/// Short human form of a request.
pub fn describe(request: &Request) -> String {
    match request {
        Request::Create { path, mode } => format!("create {path} {mode:o}"),
        Request::Stat { path } => format!("stat {path}"),
        Request::SetTimes { path, .. } => format!("utimens {path}"),
        Request::Open { path } => format!("open {path}"),
        Request::Write { path, offset, data } => {
            format!("write {path} @{offset} ({} bytes)", data.len())
        }
        Request::Read { path, offset, len } => format!("read {path} @{offset} max {len}"),
        Request::Truncate { path, size } => format!("truncate {path} {size}"),
        Request::Release { path } => format!("release {path}"),
        Request::List => "list".to_string(),
        Request::Readdir { path } => format!("readdir {path}"),
        Request::Mkdir { path, mode } => format!("mkdir {path} {mode:o}"),
    }
}
