// Copyright (c) 2018 The rust-gpio-cdev Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Kernel GPIO uAPI layouts and the ioctls issued against them.
//!
//! Everything here mirrors `include/uapi/linux/gpio.h` bit for bit. The raw
//! structs never leave the crate; callers only see the decoded values in
//! [`chip`](crate::chip) and [`line`](crate::line).

mod common;

pub(crate) mod v2;

pub(crate) use common::*;

/// The ioctl type ("magic") shared by every GPIO chardev request.
pub(crate) const GPIO_IOCTL_MAGIC: u8 = 0xB4;
