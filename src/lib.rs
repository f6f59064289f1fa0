// Copyright (c) 2018 The rust-gpio-cdev Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `gpiochip-info` crate reads chip and line information from the Linux
//! [GPIO character device ABI](https://www.kernel.org/doc/Documentation/ABI/testing/gpio-cdev).
//!
//! Two ioctls are wrapped: `GPIO_GET_CHIPINFO_IOCTL` and
//! `GPIO_V2_GET_LINEINFO_IOCTL`. Their fixed-layout kernel structs are decoded
//! into [`ChipInfo`] and [`LineInfo`]; the tagged union holding each line
//! attribute becomes the closed [`LineAttribute`] enum. Requesting lines,
//! reading or driving values and watching edges are out of scope.
//!
//! # Examples
//!
//! List every chip and the flags of each of its lines:
//!
//! ```no_run
//! use gpiochip_info::{chips, AsGpioChip};
//!
//! # fn main() -> Result<(), gpiochip_info::Error> {
//! for chip in chips()? {
//!     let chip = chip?;
//!     println!("{}", chip.chip_info()?);
//!     for info in chip.line_infos()? {
//!         let info = info?;
//!         println!("\t{:>3}: {}", info.offset(), info.flags());
//!     }
//! }
//! # Ok(()) }
//! ```
//!
//! Query a single line:
//!
//! ```no_run
//! use gpiochip_info::{AsGpioChip, Chip};
//!
//! # fn main() -> Result<(), gpiochip_info::Error> {
//! let chip = Chip::open("/dev/gpiochip0")?;
//! let info = chip.line_info(4)?;
//! println!("{}", info);
//! if let Some(period) = info.debounce_period() {
//!     println!("debounced over {:?}", period);
//! }
//! chip.close()?;
//! # Ok(()) }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

mod errors;

pub mod fixed_str;

#[allow(non_camel_case_types)]
pub(crate) mod uapi;

pub mod chip;

pub mod line;

pub use chip::{
    chip_paths, chip_paths_in, chips, resolve_chip, AsGpioChip, Chip, ChipInfo, ChipRef,
    GPIO_CHIP_PREFIX, GPIO_DEV_DIR,
};
pub use errors::{Error, ErrorKind, IoctlRequest, Result};
pub use line::{Direction, LineAttrId, LineAttribute, LineInfo};
pub use uapi::v2::{LineFlags, GPIO_LINE_NUM_ATTRS_MAX, GPIO_MAX_NAME_SIZE};

/// The errno values carried by [`ErrorKind::Ioctl`].
pub use nix::errno::Errno;
