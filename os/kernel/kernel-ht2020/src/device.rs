//! Character-device numbering and node names.
//!
//! Every channel is its own device node. The minor number of a node *is* the
//! channel index, so the host can forward it unchanged.

use crate::platform::{CHANNELS_PER_PORT, PORTS_MAX};
use crate::{ChannelError, ChannelIndex, PortTable};
use core::fmt;

pub const DRIVER_NAME: &str = "ht2020";
pub const DRIVER_VERSION: &str = "v2.0";
pub const DRIVER_DESC: &str = "HT2020 driver for Armadillo-460";

/// Banner logged after a successful initialization.
pub const DRIVER_INFO: &str = "ht2020: HT2020 driver for Armadillo-460, v2.0";

/// Prefix of the conventional device node names.
pub const NODE_PREFIX: &str = "ht2030";

pub const MAJOR: u32 = 222;
pub const MINORS_PER_PORT: u32 = CHANNELS_PER_PORT;
pub const MINOR_COUNT: u32 = 64;

const _: () = assert!(MINOR_COUNT as usize == PORTS_MAX * MINORS_PER_PORT as usize);

/// Major/minor pair of a channel node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DeviceNumber {
    pub major: u32,
    pub minor: u32,
}

impl DeviceNumber {
    #[must_use]
    pub const fn for_channel(channel: ChannelIndex) -> Self {
        Self {
            major: MAJOR,
            minor: channel.into_bits(),
        }
    }

    /// The channel this node addresses, if the number belongs to the driver.
    ///
    /// Minors of the reserved identification registers are part of the
    /// driver's range and map to a channel; the dispatcher rejects them.
    #[must_use]
    pub const fn channel(self) -> Option<ChannelIndex> {
        if self.major != MAJOR || self.minor >= MINOR_COUNT {
            return None;
        }
        Some(ChannelIndex::from_bits(self.minor))
    }
}

impl fmt::Display for DeviceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.major, self.minor)
    }
}

/// Conventional node name of a data channel: the prefix followed by the
/// channel's register address (table base plus offset) in hex, e.g.
/// `ht2030_102` for channel 2 of the port at `0x100`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DeviceNode {
    address: u32,
}

impl DeviceNode {
    /// # Errors
    /// [`ChannelError::InvalidChannel`] if `channel` is not a data channel.
    pub fn for_channel(table: &PortTable, channel: ChannelIndex) -> Result<Self, ChannelError> {
        let (port, offset) = channel.decode()?;
        let base = table
            .base_address(port)
            .map_err(|_| ChannelError::InvalidChannel {
                channel: channel.into_bits(),
            })?;
        Ok(Self {
            address: base + offset,
        })
    }

    #[must_use]
    pub const fn address(&self) -> u32 {
        self.address
    }
}

impl fmt::Display for DeviceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{NODE_PREFIX}_{:x}", self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minor_is_channel_index() {
        let n = DeviceNumber::for_channel(ChannelIndex::of(2, 1));
        assert_eq!(n, DeviceNumber { major: 222, minor: 9 });
        assert_eq!(n.channel(), Some(ChannelIndex::of(2, 1)));
        assert_eq!(n.to_string(), "222:9");
    }

    #[test]
    fn foreign_numbers_have_no_channel() {
        assert_eq!(DeviceNumber { major: 4, minor: 1 }.channel(), None);
        assert_eq!(DeviceNumber { major: MAJOR, minor: 64 }.channel(), None);
        assert!(DeviceNumber { major: MAJOR, minor: 63 }.channel().is_some());
    }

    #[test]
    fn node_names_follow_register_address() {
        let t = PortTable::new();
        let names: Vec<_> = (0..3)
            .map(|offset| DeviceNode::for_channel(&t, ChannelIndex::of(0, offset)).unwrap())
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, ["ht2030_100", "ht2030_101", "ht2030_102"]);

        let last = DeviceNode::for_channel(&t, ChannelIndex::of(15, 2)).unwrap();
        assert_eq!(last.address(), 0x13e);
    }

    #[test]
    fn identification_register_has_no_node() {
        let t = PortTable::new();
        assert_eq!(
            DeviceNode::for_channel(&t, ChannelIndex::of(0, 3)),
            Err(ChannelError::InvalidChannel { channel: 3 })
        );
    }
}
