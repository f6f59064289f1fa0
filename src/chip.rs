use std::{
    borrow::Cow,
    cell::Cell,
    fmt,
    fs::{OpenOptions, ReadDir},
    marker::PhantomData,
    ops::Range,
    os::{
        fd::{AsFd, AsRawFd, BorrowedFd, IntoRawFd, OwnedFd, RawFd},
        unix::{ffi::OsStrExt, fs::FileTypeExt},
    },
    path::{Path, PathBuf},
};

use bstr::ByteSlice;

use crate::{
    errors::{Error, ErrorKind, Result},
    fixed_str::FixedStr,
    line::LineInfo,
    uapi,
};

/// Directory the kernel creates GPIO character devices in.
pub const GPIO_DEV_DIR: &str = "/dev";

/// File name prefix of GPIO character devices.
pub const GPIO_CHIP_PREFIX: &str = "gpiochip";

/// Queries shared by owned and borrowed chip handles.
///
/// Every call is a single blocking ioctl. Nothing is cached; each call asks
/// the kernel again.
pub trait AsGpioChip: AsFd {
    fn chip_info(&self) -> Result<ChipInfo> {
        let mut info = uapi::gpio_chip_info::zeroed();
        uapi::get_chip_info(self.as_fd(), &mut info)?;
        Ok(ChipInfo::from_raw(&info))
    }

    /// Get the information of a line at a given offset.
    ///
    /// An offset past the end of the chip is rejected by the kernel, which
    /// surfaces as [`ErrorKind::Ioctl`] with `EINVAL`.
    fn line_info(&self, offset: u32) -> Result<LineInfo> {
        let mut info = uapi::v2::gpio_line_info::for_offset(offset);
        uapi::v2::get_line_info(self.as_fd(), &mut info)?;
        LineInfo::from_raw(&info)
    }

    /// Iterate over the info of every line on the chip, in offset order.
    fn line_infos(&self) -> Result<LineInfos<'_, Self>> {
        let lines = self.chip_info()?.num_lines();
        Ok(LineInfos {
            chip: self,
            offsets: 0..lines,
        })
    }
}

/// A snapshot of a chip as reported by `GPIO_GET_CHIPINFO_IOCTL`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChipInfo {
    name: FixedStr<{ uapi::v2::GPIO_MAX_NAME_SIZE }>,
    label: FixedStr<{ uapi::v2::GPIO_MAX_NAME_SIZE }>,
    lines: u32,
}

impl ChipInfo {
    pub(crate) fn from_raw(info: &uapi::gpio_chip_info) -> Self {
        Self {
            name: FixedStr::from_byte_array(info.name),
            label: FixedStr::from_byte_array(info.label),
            lines: info.lines,
        }
    }

    /// The name of the device driving this GPIO chip in the kernel
    pub fn name(&self) -> Cow<'_, str> {
        self.name.to_str_lossy()
    }

    /// A functional name for this GPIO chip, such as a product number.  Might
    /// be an empty string.
    ///
    /// As an example, the SoC GPIO chip on a Raspberry Pi is "pinctrl-bcm2835"
    pub fn label(&self) -> Cow<'_, str> {
        self.label.to_str_lossy()
    }

    pub fn raw_name(&self) -> &FixedStr<{ uapi::v2::GPIO_MAX_NAME_SIZE }> {
        &self.name
    }

    pub fn raw_label(&self) -> &FixedStr<{ uapi::v2::GPIO_MAX_NAME_SIZE }> {
        &self.label
    }

    /// The number of lines/pins indexable through this chip
    ///
    /// Not all of these may be usable depending on how the hardware is
    /// configured/muxed.
    pub const fn num_lines(&self) -> u32 {
        self.lines
    }
}

impl fmt::Display for ChipInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] ({} lines)", self.name, self.label, self.lines)
    }
}

/// Iterator returned by [`AsGpioChip::line_infos`].
#[derive(Debug)]
pub struct LineInfos<'a, C: ?Sized> {
    chip: &'a C,
    offsets: Range<u32>,
}

impl<C: AsGpioChip + ?Sized> Iterator for LineInfos<'_, C> {
    type Item = Result<LineInfo>;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.offsets.next()?;
        Some(self.chip.line_info(offset))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.offsets.size_hint()
    }
}

/// A GPIO Chip maps to the actual device driver instance in hardware that
/// one interacts with to interact with individual GPIOs.  Often these chips
/// map to IP chunks on an SoC but could also be enumerated within the kernel
/// via something like a PCI or USB bus.
///
/// It is best not to assume that a device will always be enumerated in the
/// same order (especially if it is connected via a bus).  In order to reliably
/// find the correct chip, there are a few approaches that one could reasonably
/// take:
///
/// 1. Create a udev rule that will match attributes of the device and
///    setup a symlink to the device.
/// 2. Iterate over all available chips using the [`chips()`] call to find the
///    device with matching criteria.
/// 3. For simple cases, just using the enumerated path is fine (demo work).  This
///    is discouraged for production.
///
/// A `Chip` is `Send` but not `Sync`: to query one handle from several
/// threads, put it behind a `Mutex` so that ioctls on the descriptor are
/// serialized. Separate handles, even to the same device, need no
/// coordination.
#[derive(Debug)]
pub struct Chip {
    fd: OwnedFd,
    _not_sync: PhantomData<Cell<()>>,
}

impl Chip {
    /// Open the GPIO Chip at the provided path (e.g. `/dev/gpiochip<N>`)
    ///
    /// No ioctl is issued; a path that opens but is not a character device
    /// is rejected as [`ErrorKind::DeviceOpen`].
    pub fn open(p: impl AsRef<Path>) -> Result<Self> {
        let p = p.as_ref();
        let f = OpenOptions::new()
            .read(true)
            .write(true)
            .open(p)
            .map_err(|e| Error::device_open(p, e))?;

        let file_type = f
            .metadata()
            .map_err(|e| Error::device_open(p, e))?
            .file_type();
        if !file_type.is_char_device() {
            return Err(Error::device_open(
                p,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a character device"),
            ));
        }

        log::debug!("Opened GPIO chip {}", p.display());
        Ok(Self::from(OwnedFd::from(f)))
    }

    #[inline(always)]
    pub fn borrow(&self) -> ChipRef<'_> {
        ChipRef::from_fd(self.fd.as_fd())
    }

    /// Release the descriptor, reporting any error from `close(2)`.
    ///
    /// Dropping a `Chip` also closes it, but silently.
    pub fn close(self) -> Result<()> {
        let fd = self.fd.into_raw_fd();
        nix::unistd::close(fd).map_err(|errno| Error::from(std::io::Error::from(errno)))
    }
}

impl From<OwnedFd> for Chip {
    fn from(fd: OwnedFd) -> Self {
        Self {
            fd,
            _not_sync: PhantomData,
        }
    }
}

impl AsGpioChip for Chip {}

impl AsRawFd for Chip {
    #[inline(always)]
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

impl AsFd for Chip {
    #[inline(always)]
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

/// A borrowed chip handle, for descriptors owned elsewhere.
#[derive(Debug, Clone, Copy)]
pub struct ChipRef<'a> {
    fd: BorrowedFd<'a>,
    _not_sync: PhantomData<Cell<()>>,
}

impl<'a> ChipRef<'a> {
    pub const fn from_fd(fd: BorrowedFd<'a>) -> Self {
        Self {
            fd,
            _not_sync: PhantomData,
        }
    }

    /// Duplicate the descriptor into an independently owned [`Chip`].
    pub fn try_to_owned(&self) -> Result<Chip> {
        Ok(Chip::from(self.fd.try_clone_to_owned()?))
    }
}

impl AsGpioChip for ChipRef<'_> {}

impl AsRawFd for ChipRef<'_> {
    #[inline(always)]
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

impl AsFd for ChipRef<'_> {
    #[inline(always)]
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd
    }
}

/// Paths of the GPIO character devices present on this system, in directory
/// order.
pub fn chip_paths() -> Result<Vec<PathBuf>> {
    chip_paths_in(GPIO_DEV_DIR)
}

/// Like [`chip_paths`], but scanning `dir` instead of `/dev`.
pub fn chip_paths_in(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    ChipPaths::new(dir)?.collect()
}

/// Iterate over all GPIO chips currently present on this system
pub fn chips() -> Result<ChipIterator> {
    Ok(ChipIterator {
        paths: ChipPaths::new(GPIO_DEV_DIR)?,
    })
}

/// Turn a user supplied chip descriptor into a device path.
///
/// * an absolute path is used as is,
/// * a bare number `N` means `/dev/gpiochipN`,
/// * anything else is a name under `/dev`.
pub fn resolve_chip(desc: &str) -> Result<PathBuf> {
    if desc.is_empty() {
        Err(ErrorKind::InvalidDescriptor(desc.to_owned()).into())
    } else if desc.starts_with('/') {
        Ok(PathBuf::from(desc))
    } else if desc.bytes().all(|b| b.is_ascii_digit()) {
        Ok(Path::new(GPIO_DEV_DIR).join(format!("{GPIO_CHIP_PREFIX}{desc}")))
    } else {
        Ok(Path::new(GPIO_DEV_DIR).join(desc))
    }
}

/// Iterator over the GPIO character device paths in a directory.
///
/// Entries named `gpiochip*` that are not character devices are skipped.
#[derive(Debug)]
pub struct ChipPaths {
    readdir: ReadDir,
}

impl ChipPaths {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            readdir: std::fs::read_dir(dir)?,
        })
    }
}

impl Iterator for ChipPaths {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Result<PathBuf>> {
        for entry in &mut self.readdir {
            let e = match entry {
                Ok(e) => e,
                Err(e) => {
                    return Some(Err(e.into()));
                }
            };
            if !e.file_name().as_bytes().starts_with_str(GPIO_CHIP_PREFIX) {
                continue;
            }

            let p = e.path();
            match e.file_type() {
                Ok(ft) if ft.is_char_device() => return Some(Ok(p)),
                Ok(_) => log::warn!("Skipping {}: not a character device", p.display()),
                Err(err) => log::warn!("Skipping {}: {}", p.display(), err),
            }
        }

        None
    }
}

/// Iterator over chips
#[derive(Debug)]
pub struct ChipIterator {
    paths: ChipPaths,
}

impl Iterator for ChipIterator {
    type Item = Result<Chip>;

    fn next(&mut self) -> Option<Result<Chip>> {
        let path = self.paths.next()?;
        Some(path.and_then(Chip::open))
    }
}
