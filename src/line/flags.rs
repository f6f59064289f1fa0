use std::fmt;

use itertools::Itertools;

use crate::uapi::v2::LineFlags;

/// Display names of the known flags, in declaration (bit) order.
static FLAG_NAMES: [(LineFlags, &str); 13] = [
    (LineFlags::USED, "Used"),
    (LineFlags::ACTIVE_LOW, "ActiveLow"),
    (LineFlags::INPUT, "Input"),
    (LineFlags::OUTPUT, "Output"),
    (LineFlags::EDGE_RISING, "EdgeRising"),
    (LineFlags::EDGE_FALLING, "EdgeFalling"),
    (LineFlags::OPEN_DRAIN, "OpenDrain"),
    (LineFlags::OPEN_SOURCE, "OpenSource"),
    (LineFlags::BIAS_PULL_UP, "BiasPullUp"),
    (LineFlags::BIAS_PULL_DOWN, "BiasPullDown"),
    (LineFlags::BIAS_DISABLED, "BiasDisabled"),
    (LineFlags::EVENT_CLOCK_REALTIME, "EventClockRealtime"),
    (LineFlags::EVENT_CLOCK_HTE, "EventClockHTE"),
];

impl LineFlags {
    /// Display names of the set flags, in bit order.
    ///
    /// Bits the kernel may define in the future have no name and are skipped.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        FLAG_NAMES
            .iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
    }
}

/// Renders as the set flag names joined with `|`, or `None` when no named
/// flag is set, e.g. `Used|Output|ActiveLow`.
impl fmt::Display for LineFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = self.names().peekable();
        if names.peek().is_none() {
            f.write_str("None")
        } else {
            write!(f, "{}", names.format("|"))
        }
    }
}
