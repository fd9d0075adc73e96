//! Channel addressing and per-open session state.
//!
//! A channel index is what the host hands in for every request; it is the
//! device minor number. The two low bits select the register inside a port,
//! the rest select the port:
//!
//! ```text
//!  31                                 2 1   0
//! ┌────────────────────────────────────┬─────┐
//! │                port                │ off │
//! └────────────────────────────────────┴─────┘
//! ```

use crate::ChannelError;
use crate::platform::{DATA_CHANNELS, PORTS_MAX};
use bitfield_struct::bitfield;

/// Linear channel index, `channel = 4 * port + offset`.
#[bitfield(u32)]
#[derive(PartialEq, Eq, Hash)]
pub struct ChannelIndex {
    /// Bits 0–1: register offset inside the port.
    #[bits(2)]
    pub offset: u8,

    /// Bits 2–31: port index into the port table.
    #[bits(30)]
    pub port: u32,
}

impl ChannelIndex {
    /// Index of the data register `offset` on `port`.
    #[inline]
    #[must_use]
    pub const fn of(port: u32, offset: u8) -> Self {
        Self::new().with_port(port).with_offset(offset)
    }

    /// Split into `(port, offset)` if this addresses a data register.
    ///
    /// # Errors
    /// [`ChannelError::InvalidChannel`] if the port is beyond the table or the
    /// offset names the reserved identification register.
    pub fn decode(self) -> Result<(usize, u32), ChannelError> {
        let port = self.port() as usize;
        let offset = u32::from(self.offset());
        if port >= PORTS_MAX || offset >= DATA_CHANNELS {
            return Err(ChannelError::InvalidChannel {
                channel: self.into_bits(),
            });
        }
        Ok((port, offset))
    }
}

/// Result of a channel read.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Transfer {
    /// One byte was delivered.
    Byte(u8),
    /// The session already delivered its byte; nothing transferred.
    EndOfData,
}

impl Transfer {
    #[inline]
    #[must_use]
    pub const fn bytes_transferred(self) -> usize {
        match self {
            Self::Byte(_) => 1,
            Self::EndOfData => 0,
        }
    }

    #[inline]
    #[must_use]
    pub const fn byte(self) -> Option<u8> {
        match self {
            Self::Byte(b) => Some(b),
            Self::EndOfData => None,
        }
    }
}

/// State of one open channel: which channel, and how far into its
/// single-byte data area the session has moved.
///
/// Reads and writes share the cursor, so a session gets exactly one
/// transfer until it is rewound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSession {
    channel: ChannelIndex,
    position: u64,
}

impl ChannelSession {
    #[inline]
    #[must_use]
    pub const fn open(channel: ChannelIndex) -> Self {
        Self {
            channel,
            position: 0,
        }
    }

    #[inline]
    #[must_use]
    pub const fn channel(&self) -> ChannelIndex {
        self.channel
    }

    #[inline]
    #[must_use]
    pub const fn position(&self) -> u64 {
        self.position
    }

    /// Seek back to the start of the data area.
    #[inline]
    pub const fn rewind(&mut self) {
        self.position = 0;
    }

    #[inline]
    pub(crate) const fn is_consumed(&self) -> bool {
        self.position >= 1
    }

    #[inline]
    pub(crate) const fn advance(&mut self) {
        self.position += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_layout_is_four_per_port() {
        let c = ChannelIndex::from_bits(4 * 5 + 2);
        assert_eq!(c.port(), 5);
        assert_eq!(c.offset(), 2);
        assert_eq!(ChannelIndex::of(5, 2), c);
        assert_eq!(ChannelIndex::of(15, 1).into_bits(), 61);
    }

    #[test]
    fn decode_accepts_data_registers_only() {
        assert_eq!(ChannelIndex::from_bits(0).decode(), Ok((0, 0)));
        assert_eq!(ChannelIndex::from_bits(62).decode(), Ok((15, 2)));

        for channel in [3, 7, 63] {
            assert_eq!(
                ChannelIndex::from_bits(channel).decode(),
                Err(ChannelError::InvalidChannel { channel })
            );
        }
        for channel in [64, 65, 1000, u32::MAX] {
            assert_eq!(
                ChannelIndex::from_bits(channel).decode(),
                Err(ChannelError::InvalidChannel { channel })
            );
        }
    }

    #[test]
    fn session_cursor_advances_and_rewinds() {
        let mut s = ChannelSession::open(ChannelIndex::from_bits(1));
        assert!(!s.is_consumed());
        s.advance();
        assert!(s.is_consumed());
        assert_eq!(s.position(), 1);
        s.rewind();
        assert_eq!(s.position(), 0);
    }

    #[test]
    fn transfer_reports_length() {
        assert_eq!(Transfer::Byte(7).bytes_transferred(), 1);
        assert_eq!(Transfer::Byte(7).byte(), Some(7));
        assert_eq!(Transfer::EndOfData.bytes_transferred(), 0);
        assert_eq!(Transfer::EndOfData.byte(), None);
    }
}
