//! Line metadata: flags, attributes and the decoded line info.

use std::{borrow::Cow, fmt, time::Duration};

use itertools::Itertools;

use crate::{
    errors::{ErrorKind, Result},
    fixed_str::FixedStr,
    uapi::{self, v2::LineFlags},
};

mod attr;
mod flags;
mod info;

pub use attr::{LineAttrId, LineAttribute};
pub use info::{LineAttributes, LineInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}
