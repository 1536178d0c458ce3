//! Layout preference - the persisted split height

/// Default split height in pixels
pub const DEFAULT_SPLIT_HEIGHT: u32 = 350;

/// Storage key holding the split height
pub const SPLITTER_POSITION_KEY: &str = "splitter.position";

/// Height of the editor region in pixels. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutPreference(u32);

impl Default for LayoutPreference {
    fn default() -> Self {
        Self(DEFAULT_SPLIT_HEIGHT)
    }
}

impl LayoutPreference {
    /// Create from a pixel height; zero falls back to the default
    pub fn new(height: u32) -> Self {
        if height == 0 {
            Self::default()
        } else {
            Self(height)
        }
    }

    /// Parse a stored value
    ///
    /// Reads the leading integer, so `"350.7"` is 350 and `"390px"` is 390.
    /// Absent, non-numeric, zero and negative values all yield the default.
    pub fn from_stored(value: Option<&str>) -> Self {
        value
            .and_then(leading_int)
            .map(Self::new)
            .unwrap_or_default()
    }

    /// Decimal string written to storage
    pub fn to_stored(self) -> String {
        self.0.to_string()
    }

    pub fn height(self) -> u32 {
        self.0
    }

    /// Apply a signed pixel delta, never going below one pixel
    pub fn adjust(&mut self, delta: i32) {
        self.0 = self.0.saturating_add_signed(delta).max(1);
    }
}

/// Leading decimal integer of a string, `None` if negative or absent
fn leading_int(value: &str) -> Option<u32> {
    let value = value.trim_start();
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let number = digits[..end].parse::<u32>().ok()?;
    (!negative).then_some(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_stored_valid() {
        assert_eq!(LayoutPreference::from_stored(Some("420")).height(), 420);
        assert_eq!(LayoutPreference::from_stored(Some(" 1 ")).height(), 1);
    }

    #[test]
    fn test_from_stored_reads_leading_integer() {
        assert_eq!(LayoutPreference::from_stored(Some("350.7")).height(), 350);
        assert_eq!(LayoutPreference::from_stored(Some("390px")).height(), 390);
        assert_eq!(LayoutPreference::from_stored(Some("+42")).height(), 42);
        assert_eq!(LayoutPreference::from_stored(Some("12.5")).height(), 12);
    }

    #[test]
    fn test_from_stored_falls_back_to_default() {
        for value in [None, Some(""), Some("0"), Some("abc"), Some("-5"), Some("px390"), Some("99999999999")] {
            assert_eq!(
                LayoutPreference::from_stored(value).height(),
                DEFAULT_SPLIT_HEIGHT,
                "value {:?}",
                value
            );
        }
    }

    #[test]
    fn test_adjust_sums_deltas() {
        let mut pref = LayoutPreference::default();
        for delta in [40, -15, 7] {
            pref.adjust(delta);
        }
        assert_eq!(pref.height(), 350 + 40 - 15 + 7);
        assert_eq!(pref.to_stored(), "382");
    }

    #[test]
    fn test_adjust_stays_positive() {
        let mut pref = LayoutPreference::new(10);
        pref.adjust(-100);
        assert_eq!(pref.height(), 1);
    }
}
