// Copyright (c) 2018 The rust-gpio-cdev Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::os::fd::{AsRawFd, BorrowedFd};

use nix::ioctl_read;

use super::v2::GPIO_MAX_NAME_SIZE;
use super::GPIO_IOCTL_MAGIC;
use crate::errors::{Error, IoctlRequest, Result};

// struct gpiochip_info
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub(crate) struct gpio_chip_info {
    pub(crate) name: [u8; GPIO_MAX_NAME_SIZE],
    pub(crate) label: [u8; GPIO_MAX_NAME_SIZE],
    pub(crate) lines: u32,
}

impl gpio_chip_info {
    pub(crate) const fn zeroed() -> Self {
        Self {
            name: [0; GPIO_MAX_NAME_SIZE],
            label: [0; GPIO_MAX_NAME_SIZE],
            lines: 0,
        }
    }
}

impl Default for gpio_chip_info {
    #[inline(always)]
    fn default() -> Self {
        Self::zeroed()
    }
}

ioctl_read!(gpio_get_chipinfo_ioctl, GPIO_IOCTL_MAGIC, 0x01, gpio_chip_info);

/// Issue `GPIO_GET_CHIPINFO_IOCTL`, filling `info` in place.
pub(crate) fn get_chip_info(fd: BorrowedFd<'_>, info: &mut gpio_chip_info) -> Result<()> {
    log::trace!("GPIO_GET_CHIPINFO_IOCTL fd={}", fd.as_raw_fd());
    // SAFETY: `info` is a live, exclusively borrowed `gpiochip_info` and the
    // kernel writes at most `size_of::<gpio_chip_info>()` bytes into it.
    let _: libc::c_int = unsafe { gpio_get_chipinfo_ioctl(fd.as_raw_fd(), info) }
        .map_err(|errno| Error::ioctl(IoctlRequest::GetChipInfo, errno))?;
    Ok(())
}
