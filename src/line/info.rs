use super::*;

/// The attributes reported for one line, never more than the kernel's
/// per-line limit.
pub type LineAttributes = heapless::Vec<LineAttribute, { uapi::v2::GPIO_LINE_NUM_ATTRS_MAX }>;

/// A snapshot of one line as reported by `GPIO_V2_GET_LINEINFO_IOCTL`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LineInfo {
    name: FixedStr<{ uapi::v2::GPIO_MAX_NAME_SIZE }>,
    consumer: FixedStr<{ uapi::v2::GPIO_MAX_NAME_SIZE }>,
    offset: u32,
    flags: LineFlags,
    attributes: LineAttributes,
}

impl LineInfo {
    /// Decode a line info filled in by the kernel.
    ///
    /// Attributes with ids this crate does not know are dropped, so the result
    /// may hold fewer attributes than `num_attrs`.
    pub(crate) fn from_raw(info: &uapi::v2::gpio_line_info) -> Result<Self> {
        let num_attrs = info.num_attrs as usize;
        if num_attrs > uapi::v2::GPIO_LINE_NUM_ATTRS_MAX {
            return Err(ErrorKind::InvalidAttributeCount {
                num_attrs: info.num_attrs,
                max: uapi::v2::GPIO_LINE_NUM_ATTRS_MAX,
            }
            .into());
        }

        let attributes = info.attrs[..num_attrs]
            .iter()
            .filter_map(LineAttribute::from_raw)
            .collect();

        Ok(Self {
            name: FixedStr::from_byte_array(info.name),
            consumer: FixedStr::from_byte_array(info.consumer),
            offset: info.offset,
            flags: LineFlags::from_bits_retain(info.flags),
            attributes,
        })
    }

    /// The line name, if the chip driver or device tree gave it one.
    pub fn name(&self) -> Option<Cow<'_, str>> {
        if self.name.is_empty() {
            None
        } else {
            Some(self.name.to_str_lossy())
        }
    }

    /// Who holds the line, if anyone has requested it.
    pub fn consumer(&self) -> Option<Cow<'_, str>> {
        if self.consumer.is_empty() {
            None
        } else {
            Some(self.consumer.to_str_lossy())
        }
    }

    pub fn raw_name(&self) -> &FixedStr<{ uapi::v2::GPIO_MAX_NAME_SIZE }> {
        &self.name
    }

    pub fn raw_consumer(&self) -> &FixedStr<{ uapi::v2::GPIO_MAX_NAME_SIZE }> {
        &self.consumer
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn flags(&self) -> LineFlags {
        self.flags
    }

    /// Attributes in the order the kernel reported them.
    pub fn attributes(&self) -> &[LineAttribute] {
        &self.attributes
    }

    pub fn debounce_period(&self) -> Option<Duration> {
        self.attributes.iter().find_map(|attr| match attr {
            LineAttribute::Debounce(us) => Some(Duration::from_micros(u64::from(*us))),
            _ => None,
        })
    }

    pub fn output_values(&self) -> Option<u64> {
        self.attributes.iter().find_map(|attr| match attr {
            LineAttribute::OutputValues(values) => Some(*values),
            _ => None,
        })
    }

    /// Get the direction of this GPIO if configured
    ///
    /// Lines are considered to be inputs if not explicitly
    /// marked as outputs in the line info flags by the kernel.
    pub fn direction(&self) -> Direction {
        if self.flags.contains(LineFlags::OUTPUT) {
            Direction::Output
        } else {
            Direction::Input
        }
    }

    /// True if the line is in use and not available for requests
    pub fn is_used(&self) -> bool {
        self.flags.contains(LineFlags::USED)
    }

    /// True if this line is marked as active low in the kernel
    pub fn is_active_low(&self) -> bool {
        self.flags.contains(LineFlags::ACTIVE_LOW)
    }

    /// True if this line is marked as open drain in the kernel
    pub fn is_open_drain(&self) -> bool {
        self.flags.contains(LineFlags::OPEN_DRAIN)
    }

    /// True if this line is marked as open source in the kernel
    pub fn is_open_source(&self) -> bool {
        self.flags.contains(LineFlags::OPEN_SOURCE)
    }
}

impl fmt::Display for LineInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "name={:?} consumer={:?} offset={} flags={} attributes=[{}]",
            self.name.to_str_lossy(),
            self.consumer.to_str_lossy(),
            self.offset,
            self.flags,
            self.attributes.iter().format(", ")
        )
    }
}
