// Copyright (c) 2018 The rust-gpio-cdev Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::os::fd::{AsRawFd, BorrowedFd};

use bitflags::bitflags;
use nix::ioctl_readwrite;

use super::GPIO_IOCTL_MAGIC;
use crate::errors::{Error, IoctlRequest, Result};

/// Capacity of the kernel's fixed name, label and consumer buffers.
pub const GPIO_MAX_NAME_SIZE: usize = 32;

/// Number of attribute slots in a v2 line info.
pub const GPIO_LINE_NUM_ATTRS_MAX: usize = 10;

bitflags! {
    /// Informational Flags
    ///
    /// Maps to kernel [`GPIO_V2_LINE_FLAG_*`] flags.
    ///
    /// [`GPIO_V2_LINE_FLAG_*`]: https://github.com/torvalds/linux/blob/v5.19/include/uapi/linux/gpio.h
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct LineFlags: u64 {
        const USED = (1 << 0);
        const ACTIVE_LOW = (1 << 1);
        const INPUT = (1 << 2);
        const OUTPUT = (1 << 3);
        const EDGE_RISING = (1 << 4);
        const EDGE_FALLING = (1 << 5);
        const OPEN_DRAIN = (1 << 6);
        const OPEN_SOURCE = (1 << 7);
        const BIAS_PULL_UP = (1 << 8);
        const BIAS_PULL_DOWN = (1 << 9);
        const BIAS_DISABLED = (1 << 10);
        const EVENT_CLOCK_REALTIME = (1 << 11);
        const EVENT_CLOCK_HTE = (1 << 12);
    }
}

// GPIO_V2_LINE_ATTR_ID_*
pub(crate) const GPIO_LINE_ATTR_ID_FLAGS: u32 = 1;
pub(crate) const GPIO_LINE_ATTR_ID_OUTPUT_VALUES: u32 = 2;
pub(crate) const GPIO_LINE_ATTR_ID_DEBOUNCE: u32 = 3;

/// a configurable attribute of a line
#[derive(Clone, Copy)]
#[repr(C)]
pub(crate) struct gpio_line_attribute {
    /// attribute identifier, one of `GPIO_LINE_ATTR_ID_*` or something newer
    pub(crate) id: u32,
    /// reserved for future use and must be zero filled
    pub(crate) _padding: u32,
    /// A tagged union when combined with `id`
    pub(crate) attribute: gpio_line_attribute_union,
}

impl gpio_line_attribute {
    pub(crate) const fn zeroed() -> Self {
        Self {
            id: 0,
            _padding: 0,
            attribute: gpio_line_attribute_union { values: 0 },
        }
    }
}

impl core::fmt::Debug for gpio_line_attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // SAFETY: each arm reads only the union field selected by `id`.
        let value = unsafe {
            match self.id {
                GPIO_LINE_ATTR_ID_FLAGS => &self.attribute.flags as &dyn core::fmt::Debug,
                GPIO_LINE_ATTR_ID_OUTPUT_VALUES => &self.attribute.values as &dyn core::fmt::Debug,
                GPIO_LINE_ATTR_ID_DEBOUNCE => {
                    &self.attribute.debounce_period_us as &dyn core::fmt::Debug
                }
                _ => &"unknown line attribute" as &dyn core::fmt::Debug,
            }
        };
        f.debug_struct("gpio_line_attribute")
            .field("id", &self.id)
            .field("attribute", value)
            .finish()
    }
}

#[derive(Clone, Copy)]
#[repr(C)]
pub(crate) union gpio_line_attribute_union {
    /// if `gpio_line_attribute.id` is `GPIO_LINE_ATTR_ID_FLAGS`, the flags
    /// for the GPIO line, with values from [`LineFlags`] or'ed together
    pub(crate) flags: u64,
    /// if `gpio_line_attribute.id` is `GPIO_LINE_ATTR_ID_OUTPUT_VALUES`, a
    /// bitmap containing the values to which the lines will be set
    pub(crate) values: u64,
    /// if `gpio_line_attribute.id` is `GPIO_LINE_ATTR_ID_DEBOUNCE`, the
    /// debounce period, in microseconds
    pub(crate) debounce_period_us: u32,
}

// struct gpio_v2_line_info
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub(crate) struct gpio_line_info {
    pub(crate) name: [u8; GPIO_MAX_NAME_SIZE],
    pub(crate) consumer: [u8; GPIO_MAX_NAME_SIZE],
    pub(crate) offset: u32,
    pub(crate) num_attrs: u32,
    pub(crate) flags: u64,
    pub(crate) attrs: [gpio_line_attribute; GPIO_LINE_NUM_ATTRS_MAX],
    pub(crate) _padding: [u32; 4],
}

impl gpio_line_info {
    pub(crate) const fn zeroed() -> Self {
        Self {
            name: [0; GPIO_MAX_NAME_SIZE],
            consumer: [0; GPIO_MAX_NAME_SIZE],
            offset: 0,
            num_attrs: 0,
            flags: 0,
            attrs: [gpio_line_attribute::zeroed(); GPIO_LINE_NUM_ATTRS_MAX],
            _padding: [0; 4],
        }
    }

    /// A zeroed request with only the input field, `offset`, filled in.
    pub(crate) const fn for_offset(offset: u32) -> Self {
        Self {
            offset,
            ..Self::zeroed()
        }
    }
}

impl Default for gpio_line_info {
    #[inline(always)]
    fn default() -> Self {
        Self::zeroed()
    }
}

ioctl_readwrite!(gpio_get_line_info_ioctl, GPIO_IOCTL_MAGIC, 0x05, gpio_line_info);

/// Issue `GPIO_V2_GET_LINEINFO_IOCTL` for the line whose offset is preset in
/// `info`. The rest of `info` is overwritten by the kernel.
pub(crate) fn get_line_info(fd: BorrowedFd<'_>, info: &mut gpio_line_info) -> Result<()> {
    log::trace!(
        "GPIO_V2_GET_LINEINFO_IOCTL fd={} offset={}",
        fd.as_raw_fd(),
        info.offset
    );
    // SAFETY: `info` is a live, exclusively borrowed `gpio_v2_line_info` of
    // exactly the size encoded in the request code.
    let _: libc::c_int = unsafe { gpio_get_line_info_ioctl(fd.as_raw_fd(), info) }
        .map_err(|errno| Error::ioctl(IoctlRequest::GetLineInfo, errno))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn line_attribute_layout() {
        assert_eq!(size_of::<gpio_line_attribute_union>(), 8);
        assert_eq!(size_of::<gpio_line_attribute>(), 16);
        assert_eq!(offset_of!(gpio_line_attribute, id), 0);
        assert_eq!(offset_of!(gpio_line_attribute, _padding), 4);
        assert_eq!(offset_of!(gpio_line_attribute, attribute), 8);
    }

    #[test]
    fn line_info_layout() {
        assert_eq!(size_of::<gpio_line_info>(), 256);
        assert_eq!(offset_of!(gpio_line_info, name), 0);
        assert_eq!(offset_of!(gpio_line_info, consumer), 32);
        assert_eq!(offset_of!(gpio_line_info, offset), 64);
        assert_eq!(offset_of!(gpio_line_info, num_attrs), 68);
        assert_eq!(offset_of!(gpio_line_info, flags), 72);
        assert_eq!(offset_of!(gpio_line_info, attrs), 80);
        assert_eq!(offset_of!(gpio_line_info, _padding), 240);
    }

    #[test]
    fn line_info_request_code() {
        let code =
            nix::request_code_readwrite!(GPIO_IOCTL_MAGIC, 0x05, size_of::<gpio_line_info>());
        assert_eq!(code as u32, 0xC100_B405);
    }

    #[test]
    fn for_offset_zeroes_everything_else() {
        let info = gpio_line_info::for_offset(17);
        assert_eq!(info.offset, 17);
        assert_eq!(info.num_attrs, 0);
        assert_eq!(info.flags, 0);
        assert!(info.name.iter().all(|b| *b == 0));
        assert!(info.consumer.iter().all(|b| *b == 0));
        assert!(info.attrs.iter().all(|a| a.id == 0));
    }

    #[test]
    fn flag_bits_match_kernel() {
        assert_eq!(LineFlags::USED.bits(), 0x1);
        assert_eq!(LineFlags::OUTPUT.bits(), 0x8);
        assert_eq!(LineFlags::BIAS_DISABLED.bits(), 0x400);
        assert_eq!(LineFlags::EVENT_CLOCK_HTE.bits(), 0x1000);
        assert_eq!(LineFlags::all().bits(), 0x1FFF);
    }

    #[test]
    fn attribute_debug_reads_tagged_field() {
        let attr = gpio_line_attribute {
            id: GPIO_LINE_ATTR_ID_DEBOUNCE,
            _padding: 0,
            attribute: gpio_line_attribute_union {
                debounce_period_us: 250,
            },
        };
        let s = format!("{attr:?}");
        assert!(s.contains("250"), "{s}");

        let attr = gpio_line_attribute {
            id: 42,
            ..gpio_line_attribute::zeroed()
        };
        assert!(format!("{attr:?}").contains("unknown line attribute"));
    }
}
