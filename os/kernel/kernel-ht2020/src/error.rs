use kernel_mmio::BusError;

/// Classic errno values of the character-device interface, so host glue
/// can forward a status code unchanged.
pub mod errno {
    pub const EIO: i32 = 5;
    pub const ENXIO: i32 = 6;
    pub const ENODEV: i32 = 19;
    pub const EINVAL: i32 = 22;
    pub const EOVERFLOW: i32 = 75;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortTableError {
    #[error("port index {port} out of range")]
    OutOfRange { port: usize },
}

/// Terminal failures of driver initialization.
///
/// Whichever variant is returned, no I/O window is left reserved.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InitError {
    #[error("you must supply I/O base address(es) with \"io=0xNNN\" value(s)")]
    NoIoAddressSupplied,
    #[error("I/O base address(es) were not valid")]
    NoValidAddresses,
    #[error("HT2020 was not found at reset state at any I/O address")]
    NotFound,
    #[error("no discovered port could reserve its I/O windows")]
    ReservationExhausted,
}

impl InitError {
    #[must_use]
    pub const fn errno(self) -> i32 {
        match self {
            Self::NoIoAddressSupplied => errno::ENXIO,
            Self::NoValidAddresses | Self::NotFound | Self::ReservationExhausted => errno::EIO,
        }
    }
}

/// Failures of a single channel request. None of them touches driver state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    #[error("channel {channel} does not address a data register")]
    InvalidChannel { channel: u32 },
    #[error("port {port} is not enabled")]
    PortNotPresent { port: usize },
    #[error("write past the single-byte data area")]
    Overflow,
    #[error(transparent)]
    IoFault(#[from] BusError),
}

impl ChannelError {
    #[must_use]
    pub const fn errno(self) -> i32 {
        match self {
            Self::InvalidChannel { .. } | Self::PortNotPresent { .. } => errno::ENODEV,
            Self::Overflow => errno::EOVERFLOW,
            Self::IoFault(_) => errno::EIO,
        }
    }
}

/// Errors parsing the `io=` parameter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    #[error("io: entry {index} is empty")]
    Empty { index: usize },
    #[error("io: entry {index} is not a valid address")]
    Malformed { index: usize },
    #[error("io: more than 16 addresses supplied")]
    TooMany,
}

impl ParamError {
    #[must_use]
    pub const fn errno(self) -> i32 {
        errno::EINVAL
    }
}
