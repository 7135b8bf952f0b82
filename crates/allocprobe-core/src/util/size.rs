/// Memory size representation.
///
/// Megabytes use the binary multiplier, so `Size::MB(1)` is one mebibyte
/// (1,048,576 bytes).
///
/// # Examples
///
/// ```
/// use allocprobe_core::util::Size;
///
/// assert_eq!(Size::MB(4).checked_bytes(), Some(4 * 1024 * 1024));
/// assert_eq!(Size::MB(usize::MAX).checked_bytes(), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Size {
    /// Size in bytes
    B(usize),
    /// Size in megabytes (1 MB = 1024 * 1024 bytes)
    MB(usize),
}

impl Size {
    /// Converts this size to bytes, returning `None` if the result does not fit into `usize`.
    pub const fn checked_bytes(&self) -> Option<usize> {
        match self {
            Size::B(bytes) => Some(*bytes),
            Size::MB(mb) => mb.checked_mul(1 << 20),
        }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Size::B(bytes) => write!(f, "{} B", bytes),
            Size::MB(mb) => write!(f, "{} MB", mb),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::util::Size;

    #[test]
    fn size_conversions() {
        assert_eq!(Size::B(12).checked_bytes(), Some(12));
        assert_eq!(Size::MB(1).checked_bytes(), Some(1_048_576));
        assert_eq!(Size::MB(12).checked_bytes(), Some(12 * (1 << 20)));
    }

    #[test]
    fn mebibyte_overflow_is_detected() {
        assert_eq!(Size::MB(usize::MAX).checked_bytes(), None);
        assert_eq!(Size::MB(usize::MAX >> 20).checked_bytes(), Some((usize::MAX >> 20) << 20));
        assert_eq!(Size::MB((usize::MAX >> 20) + 1).checked_bytes(), None);
    }

    #[test]
    fn display_keeps_unit() {
        assert_eq!(Size::MB(100).to_string(), "100 MB");
        assert_eq!(Size::B(0).to_string(), "0 B");
    }
}
