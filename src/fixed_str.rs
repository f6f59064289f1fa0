//! Fixed-capacity, NUL-padded strings as embedded in kernel uAPI structs.
//!
//! The kernel fills these buffers with a C string that is NUL terminated
//! unless it uses the whole capacity. [`FixedStr`] keeps the raw bytes so the
//! value can be copied straight back into a uAPI struct, and decodes them to
//! text only when asked.

use std::borrow::Cow;

use bstr::{BStr, ByteSlice};

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedStr<const N: usize> {
    s: [u8; N],
}

impl<const N: usize> FixedStr<N> {
    #[inline]
    pub const fn empty() -> Self {
        Self { s: [0; N] }
    }

    /// Copy `s` into a fresh buffer, failing if it does not fit.
    pub fn new(s: &str) -> Result<Self, FixedStrErr> {
        let bytes = s.as_bytes();
        if bytes.len() > N {
            return Err(FixedStrErr::CapacityOverflow {
                capacity: N,
                required: bytes.len(),
            });
        }

        let mut f = Self::empty();
        f.s[..bytes.len()].copy_from_slice(bytes);
        Ok(f)
    }

    /// Adopt a buffer filled in by the kernel.
    ///
    /// Anything after the first NUL is cleared, so two buffers holding the
    /// same string compare equal whatever junk followed the terminator.
    pub fn from_byte_array(mut bytes: [u8; N]) -> Self {
        let nul = find_nul(&bytes);
        bytes[nul..].fill(0);
        FixedStr { s: bytes }
    }

    pub const fn into_byte_array(self) -> [u8; N] {
        self.s
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    #[inline]
    pub fn len(&self) -> usize {
        find_nul(&self.s)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        N == 0 || self.s[0] == 0
    }

    /// The string bytes, up to the first NUL or the full capacity.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.s[..self.len()]
    }

    #[inline]
    pub fn as_bstr(&self) -> &BStr {
        self.as_bytes().as_bstr()
    }

    pub fn to_str(&self) -> Result<&str, FixedStrErr> {
        Ok(self.as_bytes().to_str()?)
    }

    /// Decode as UTF-8, replacing invalid sequences with U+FFFD.
    pub fn to_str_lossy(&self) -> Cow<'_, str> {
        self.as_bytes().to_str_lossy()
    }
}

impl<const N: usize> Default for FixedStr<N> {
    #[inline(always)]
    fn default() -> Self {
        Self::empty()
    }
}

impl<const N: usize> std::fmt::Debug for FixedStr<N> {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FixedStr").field(&self.as_bstr()).finish()
    }
}

impl<const N: usize> std::fmt::Display for FixedStr<N> {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self.as_bstr(), f)
    }
}

impl<const N: usize> AsRef<[u8]> for FixedStr<N> {
    #[inline(always)]
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<const N: usize> PartialEq<str> for FixedStr<N> {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<const N: usize> PartialEq<&str> for FixedStr<N> {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

#[cfg(feature = "serde")]
impl<const N: usize> serde::Serialize for FixedStr<N> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_str_lossy())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FixedStrErr {
    #[error(
        "Exceeded fixed string size: required {required} bytes with only {capacity} available"
    )]
    CapacityOverflow { capacity: usize, required: usize },
    #[error("UTF8 Error")]
    Utf8(#[from] bstr::Utf8Error),
}

#[inline]
fn find_nul(s: &[u8]) -> usize {
    s.find_byte(0).unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_at_first_nul() {
        let s = FixedStr::from_byte_array([0x67, 0x70, 0x69, 0x6F, 0, 0, 0, 0]);
        assert_eq!(s.len(), 4);
        assert_eq!(s.to_str().unwrap(), "gpio");
        assert_eq!(s, "gpio");
    }

    #[test]
    fn unterminated_uses_full_capacity() {
        let s = FixedStr::from_byte_array(*b"gpiochip");
        assert_eq!(s.len(), 8);
        assert_eq!(s.to_str_lossy(), "gpiochip");
        assert_eq!(s.to_string(), "gpiochip");
    }

    #[test]
    fn junk_after_nul_is_cleared() {
        let a = FixedStr::from_byte_array(*b"ab\0cdefg");
        let b = FixedStr::from_byte_array(*b"ab\0\0\0\0\0\0");
        assert_eq!(a, b);
        assert_eq!(a.into_byte_array(), *b"ab\0\0\0\0\0\0");
    }

    #[test]
    fn empty() {
        let s = FixedStr::<4>::from_byte_array([0; 4]);
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
        assert_eq!(s.to_str_lossy(), "");
        assert!(!FixedStr::<4>::new("a").unwrap().is_empty());
    }

    #[test]
    fn invalid_utf8() {
        let s = FixedStr::from_byte_array([b'a', 0xFF, b'b', 0]);
        assert!(matches!(s.to_str(), Err(FixedStrErr::Utf8(_))));
        assert_eq!(s.to_str_lossy(), "a\u{FFFD}b");
    }

    #[test]
    fn new_checks_capacity() {
        let s = FixedStr::<8>::new("consumer").unwrap();
        assert_eq!(s.len(), 8);
        assert_eq!(
            FixedStr::<8>::new("consumers"),
            Err(FixedStrErr::CapacityOverflow {
                capacity: 8,
                required: 9
            })
        );
    }
}
