use std::fmt;

use crate::uapi::v2::{
    gpio_line_attribute, LineFlags, GPIO_LINE_ATTR_ID_DEBOUNCE, GPIO_LINE_ATTR_ID_FLAGS,
    GPIO_LINE_ATTR_ID_OUTPUT_VALUES,
};

/// The kind of a [`LineAttribute`], with the kernel's numeric id as the
/// discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum LineAttrId {
    Flags = GPIO_LINE_ATTR_ID_FLAGS,
    OutputValues = GPIO_LINE_ATTR_ID_OUTPUT_VALUES,
    Debounce = GPIO_LINE_ATTR_ID_DEBOUNCE,
}

impl LineAttrId {
    #[inline(always)]
    pub const fn as_u32(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for LineAttrId {
    /// The unrecognised id.
    type Error = u32;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        match id {
            GPIO_LINE_ATTR_ID_FLAGS => Ok(Self::Flags),
            GPIO_LINE_ATTR_ID_OUTPUT_VALUES => Ok(Self::OutputValues),
            GPIO_LINE_ATTR_ID_DEBOUNCE => Ok(Self::Debounce),
            unknown => Err(unknown),
        }
    }
}

impl From<LineAttrId> for u32 {
    #[inline(always)]
    fn from(id: LineAttrId) -> Self {
        id.as_u32()
    }
}

/// An attribute the kernel reports alongside a line's flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineAttribute {
    /// Flags overriding the line's default flags.
    Flags(LineFlags),
    /// Output values, one bit per requested line.
    OutputValues(u64),
    /// The debounce period in microseconds.
    Debounce(u32),
}

impl LineAttribute {
    /// Decode one raw attribute, or `None` if the kernel used an id this
    /// crate does not know.
    pub(crate) fn from_raw(attr: &gpio_line_attribute) -> Option<Self> {
        let id = match LineAttrId::try_from(attr.id) {
            Ok(id) => id,
            Err(unknown) => {
                log::debug!("Skipping unknown gpio line attribute ID: 0x{unknown:X}");
                return None;
            }
        };

        // SAFETY: `id` selects the union field the kernel wrote.
        let res = unsafe {
            match id {
                LineAttrId::Flags => Self::Flags(LineFlags::from_bits_retain(attr.attribute.flags)),
                LineAttrId::OutputValues => Self::OutputValues(attr.attribute.values),
                LineAttrId::Debounce => Self::Debounce(attr.attribute.debounce_period_us),
            }
        };
        Some(res)
    }

    pub const fn id(&self) -> LineAttrId {
        match self {
            LineAttribute::Flags(_) => LineAttrId::Flags,
            LineAttribute::OutputValues(_) => LineAttrId::OutputValues,
            LineAttribute::Debounce(_) => LineAttrId::Debounce,
        }
    }
}

impl fmt::Display for LineAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineAttribute::Flags(flags) => write!(f, "flags=0x{:x}", flags.bits()),
            LineAttribute::OutputValues(values) => write!(f, "values=0x{values:x}"),
            LineAttribute::Debounce(us) => write!(f, "debounce_period_us={us}"),
        }
    }
}

/// Serialized as `{ "id": <kernel id>, "value": <payload> }`.
#[cfg(feature = "serde")]
impl serde::Serialize for LineAttribute {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut s = serializer.serialize_struct("LineAttribute", 2)?;
        s.serialize_field("id", &self.id().as_u32())?;
        match self {
            LineAttribute::Flags(flags) => s.serialize_field("value", &flags.bits())?,
            LineAttribute::OutputValues(values) => s.serialize_field("value", values)?,
            LineAttribute::Debounce(us) => s.serialize_field("value", us)?,
        }
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uapi::v2::gpio_line_attribute_union;

    fn raw(id: u32, payload: u64) -> gpio_line_attribute {
        gpio_line_attribute {
            id,
            _padding: 0,
            attribute: gpio_line_attribute_union { values: payload },
        }
    }

    #[test]
    fn flags_payload_is_unmodified() {
        let attr = LineAttribute::from_raw(&raw(1, 0x0C)).unwrap();
        assert_eq!(attr, LineAttribute::Flags(LineFlags::INPUT | LineFlags::OUTPUT));

        let attr = LineAttribute::from_raw(&raw(1, u64::MAX)).unwrap();
        match attr {
            LineAttribute::Flags(flags) => assert_eq!(flags.bits(), u64::MAX),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn output_values_payload_is_unmodified() {
        let attr = LineAttribute::from_raw(&raw(2, 0xDEAD_BEEF_0BAD_F00D)).unwrap();
        assert_eq!(attr, LineAttribute::OutputValues(0xDEAD_BEEF_0BAD_F00D));
    }

    #[test]
    fn debounce_reads_u32_field() {
        let attr = gpio_line_attribute {
            id: 3,
            _padding: 0,
            attribute: gpio_line_attribute_union {
                debounce_period_us: 5000,
            },
        };
        assert_eq!(LineAttribute::from_raw(&attr), Some(LineAttribute::Debounce(5000)));
    }

    #[cfg(target_endian = "little")]
    #[test]
    fn debounce_is_low_word_of_payload() {
        let attr = LineAttribute::from_raw(&raw(3, 0xFFFF_FFFF_0000_0096)).unwrap();
        assert_eq!(attr, LineAttribute::Debounce(0x96));
    }

    #[test]
    fn unknown_ids_are_skipped() {
        for id in [0, 4, 5, 99, u32::MAX] {
            assert_eq!(LineAttribute::from_raw(&raw(id, 0xFF)), None, "id {id}");
        }
    }

    #[test]
    fn ids_are_stable() {
        assert_eq!(LineAttribute::Flags(LineFlags::empty()).id().as_u32(), 1);
        assert_eq!(LineAttribute::OutputValues(0).id().as_u32(), 2);
        assert_eq!(u32::from(LineAttribute::Debounce(0).id()), 3);
        assert_eq!(LineAttrId::try_from(2), Ok(LineAttrId::OutputValues));
        assert_eq!(LineAttrId::try_from(7), Err(7));
    }

    #[test]
    fn display() {
        assert_eq!(
            LineAttribute::Flags(LineFlags::USED | LineFlags::OUTPUT).to_string(),
            "flags=0x9"
        );
        assert_eq!(LineAttribute::OutputValues(0xff).to_string(), "values=0xff");
        assert_eq!(LineAttribute::Debounce(1500).to_string(), "debounce_period_us=1500");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_with_numeric_id() {
        let json = serde_json::to_string(&LineAttribute::Debounce(20)).unwrap();
        assert_eq!(json, r#"{"id":3,"value":20}"#);
        let json = serde_json::to_string(&LineAttribute::OutputValues(5)).unwrap();
        assert_eq!(json, r#"{"id":2,"value":5}"#);
    }
}
