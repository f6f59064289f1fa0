//! Error type shared by every fallible operation in the crate.

use std::error::Error as StdError;
use std::fmt;
use std::io::Error as IOError;
use std::path::{Path, PathBuf};

use nix::errno::Errno;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
}

#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The device could not be opened, or is not a character device.
    DeviceOpen { path: PathBuf, source: IOError },
    /// The kernel rejected an ioctl; `errno` is exactly what it returned.
    Ioctl { request: IoctlRequest, errno: Errno },
    /// The kernel reported more attributes than a line info can hold.
    InvalidAttributeCount { num_attrs: u32, max: usize },
    /// A chip descriptor that cannot name any device.
    InvalidDescriptor(String),
    Io(IOError),
}

/// The ioctl requests this crate issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoctlRequest {
    GetChipInfo,
    GetLineInfo,
}

impl fmt::Display for IoctlRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoctlRequest::GetChipInfo => f.write_str("GPIO_GET_CHIPINFO_IOCTL"),
            IoctlRequest::GetLineInfo => f.write_str("GPIO_V2_GET_LINEINFO_IOCTL"),
        }
    }
}

impl Error {
    pub(crate) fn device_open(path: &Path, source: IOError) -> Self {
        ErrorKind::DeviceOpen {
            path: path.to_owned(),
            source,
        }
        .into()
    }

    pub(crate) fn ioctl(request: IoctlRequest, errno: Errno) -> Self {
        ErrorKind::Ioctl { request, errno }.into()
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }

    /// The OS error code behind this error, if there is one.
    pub fn errno(&self) -> Option<Errno> {
        match &self.kind {
            ErrorKind::Ioctl { errno, .. } => Some(*errno),
            ErrorKind::DeviceOpen { source, .. } | ErrorKind::Io(source) => {
                source.raw_os_error().map(Errno::from_raw)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::DeviceOpen { path, source } => {
                write!(f, "Failed to open GPIO device {}: {}", path.display(), source)
            }
            ErrorKind::Ioctl { request, errno } => {
                write!(f, "{} failed: {}", request, errno.desc())
            }
            ErrorKind::InvalidAttributeCount { num_attrs, max } => write!(
                f,
                "Kernel reported {} line attributes but at most {} fit",
                num_attrs, max
            ),
            ErrorKind::InvalidDescriptor(desc) => {
                write!(f, "Invalid GPIO chip descriptor: {:?}", desc)
            }
            ErrorKind::Io(err) => err.fmt(f),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.kind {
            ErrorKind::DeviceOpen { source, .. } => Some(source),
            ErrorKind::Ioctl { errno, .. } => Some(errno),
            ErrorKind::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self { kind }
    }
}

impl From<IOError> for Error {
    fn from(err: IOError) -> Self {
        Self {
            kind: ErrorKind::Io(err),
        }
    }
}
