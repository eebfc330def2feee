//! # Page Indexes
//!
//! Pages are addressed by a 1-based number in `[1, MAX_PAGES]`. A [`PageIndex`]
//! can only hold a valid number: every constructor clamps.
//!
//! - Below 1 clamps to 1, above `MAX_PAGES` clamps to `MAX_PAGES`.
//! - Non-numeric input (an empty form field, "abc") becomes page 1.
//! - Navigation past either end stays at the end.

use crate::model::MAX_PAGES;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageIndex(usize);

impl PageIndex {
    pub const FIRST: PageIndex = PageIndex(1);
    pub const LAST: PageIndex = PageIndex(MAX_PAGES);

    pub fn clamp(n: i64) -> Self {
        PageIndex(n.clamp(1, MAX_PAGES as i64) as usize)
    }

    /// Parse user input the way a number field is read: surrounding whitespace
    /// is ignored and decimals are truncated. The whole input must be a number,
    /// so `"5a"` is page 1, while float notation such as `"1e9"` or `"inf"` is
    /// a number and clamps like any other. Anything non-numeric is page 1.
    pub fn parse_lenient(input: &str) -> Self {
        let input = input.trim();
        if let Ok(n) = input.parse::<i64>() {
            return Self::clamp(n);
        }
        match input.parse::<f64>() {
            Ok(f) if f.is_finite() => Self::clamp(f.trunc() as i64),
            // +/- infinity still has a nearest bound
            Ok(f) if f.is_infinite() => {
                if f > 0.0 {
                    Self::LAST
                } else {
                    Self::FIRST
                }
            }
            _ => Self::FIRST,
        }
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Position in a notebook's page vector.
    pub fn zero_based(self) -> usize {
        self.0 - 1
    }

    pub fn next(self) -> Self {
        Self::clamp(self.0 as i64 + 1)
    }

    pub fn prev(self) -> Self {
        Self::clamp(self.0 as i64 - 1)
    }

    /// All page indexes in order.
    pub fn all() -> impl Iterator<Item = PageIndex> {
        (1..=MAX_PAGES).map(PageIndex)
    }
}

impl Default for PageIndex {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for PageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PageIndex {
    fn from(s: &str) -> Self {
        Self::parse_lenient(s)
    }
}
