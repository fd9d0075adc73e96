//! The `io=` load parameter.
//!
//! A comma separated list of up to [`PORTS_MAX`] base addresses, each written
//! the way C's base-0 integer parsing accepts it: `0x` hex, a leading `0` for
//! octal, decimal otherwise.
//!
//! ```rust
//! # use kernel_ht2020::IoParam;
//! let io: IoParam = "io=0x104,0x999".parse().unwrap();
//! assert_eq!(io.as_slice(), &[0x104, 0x999]);
//! ```

use crate::ParamError;
use crate::platform::PORTS_MAX;
use core::fmt;
use core::str::FromStr;

/// Caller-asserted port base addresses, in the order given.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct IoParam {
    values: [u32; PORTS_MAX],
    len: usize,
}

impl IoParam {
    /// No addresses: the driver probes instead.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            values: [0; PORTS_MAX],
            len: 0,
        }
    }

    /// # Errors
    /// [`ParamError::TooMany`] if more than 16 addresses are given.
    pub fn from_slice(values: &[u32]) -> Result<Self, ParamError> {
        let mut param = Self::empty();
        for &value in values {
            param.push(value)?;
        }
        Ok(param)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.values[..self.len]
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn push(&mut self, value: u32) -> Result<(), ParamError> {
        let slot = self.values.get_mut(self.len).ok_or(ParamError::TooMany)?;
        *slot = value;
        self.len += 1;
        Ok(())
    }
}

impl FromStr for IoParam {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let list = s.strip_prefix("io=").unwrap_or(s);

        let mut param = Self::empty();
        if list.is_empty() {
            return Ok(param);
        }

        for (index, item) in list.split(',').enumerate() {
            let item = item.trim();
            if item.is_empty() {
                return Err(ParamError::Empty { index });
            }
            let value = parse_int(item).ok_or(ParamError::Malformed { index })?;
            param.push(value)?;
        }
        Ok(param)
    }
}

impl fmt::Display for IoParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.as_slice().iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{value:#x}")?;
        }
        Ok(())
    }
}

fn parse_int(s: &str) -> Option<u32> {
    let s = s.strip_prefix('+').unwrap_or(s);
    let (digits, radix) = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (hex, 16)
    } else if s.len() > 1 && s.starts_with('0') {
        (&s[1..], 8)
    } else {
        (s, 10)
    };

    // from_str_radix would accept a second sign
    if digits.starts_with(['+', '-']) {
        return None;
    }
    u32::from_str_radix(digits, radix).ok()
}
