// author: kodeholic (powered by Gemini)

use std::fmt;
use std::net::SocketAddr;

#[derive(Debug)]
pub enum SpkError {
    BadMagic,
    UnsupportedVersion(u8),
    UnexpectedPacketType(u8),
    BadSize { expected: usize, actual: usize },
    Decode(String),
    InvalidModemMode { version: u8, mode: u8 },
    DuplicateRequest { session_id: u32, addr: SocketAddr },
    ClipNotFound(String),
    Directory(String),
    LookupTimeout(u32),
    Http(reqwest::Error),
    IoError(std::io::Error),
}

impl fmt::Display for SpkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpkError::BadMagic => write!(f, "Packet magic mismatch"),
            SpkError::UnsupportedVersion(v) => write!(f, "Unsupported wire version 0x{:02x}", v),
            SpkError::UnexpectedPacketType(t) => write!(f, "Unexpected packet type 0x{:02x}", t),
            SpkError::BadSize { expected, actual } => {
                write!(f, "Packet size {} does not match expected {}", actual, expected)
            }
            SpkError::Decode(msg) => write!(f, "Binary parse error: {}", msg),
            SpkError::InvalidModemMode { version, mode } => {
                write!(f, "Invalid modem mode 0x{:02x} for wire version {}", mode, version)
            }
            SpkError::DuplicateRequest { session_id, addr } => {
                write!(f, "Request already under processing sid:0x{:08x} from {}", session_id, addr)
            }
            SpkError::ClipNotFound(path) => write!(f, "Voice clip not found: {}", path),
            SpkError::Directory(msg) => write!(f, "Directory error: {}", msg),
            SpkError::LookupTimeout(cid) => write!(f, "Status lookup timed out for cid:{}", cid),
            SpkError::Http(err) => write!(f, "HTTP error: {}", err),
            SpkError::IoError(err) => write!(f, "Network I/O error: {}", err),
        }
    }
}

impl std::error::Error for SpkError {}

impl From<std::io::Error> for SpkError {
    fn from(err: std::io::Error) -> Self {
        SpkError::IoError(err)
    }
}

impl From<reqwest::Error> for SpkError {
    fn from(err: reqwest::Error) -> Self {
        SpkError::Http(err)
    }
}

pub type SpkResult<T> = Result<T, SpkError>;
