use kernel_ht2020::{
    ChannelError, ChannelIndex, ChannelSession, DriverConfig, Ht2020, IoParam, Platform, Transfer, errno,
};
use kernel_mmio::{Access, BusError, FakeBus, IoAddress, RegionTable};

const PLATFORM: Platform = Platform::ARMADILLO_460;

/// Driver with ports 0 (0x100) and 2 (0x108) enabled.
fn driver() -> Ht2020<FakeBus> {
    let io = IoParam::from_slice(&[0x100, 0x108]).unwrap();
    let mut arbiter = RegionTable::<32>::new();
    Ht2020::init(&DriverConfig::explicit(PLATFORM, io), FakeBus::new(), &mut arbiter).unwrap()
}

fn session(channel: u32) -> ChannelSession {
    ChannelSession::open(ChannelIndex::from_bits(channel))
}

#[test]
fn malformed_channels_are_invalid() {
    let drv = driver();
    for channel in (0..256).chain([u32::MAX]) {
        if channel / 4 < 16 && channel % 4 < 3 {
            continue;
        }
        let expected = ChannelError::InvalidChannel { channel };
        assert_eq!(drv.read_channel(&mut session(channel)), Err(expected));
        assert_eq!(drv.write_channel(&mut session(channel), 0), Err(expected));
        assert_eq!(expected.errno(), errno::ENODEV);
    }
    assert!(drv.bus().accesses().is_empty());
}

#[test]
fn channels_of_absent_ports_are_not_present() {
    let drv = driver();
    for port in (0..16u32).filter(|p| ![0, 2].contains(p)) {
        for offset in 0..3u8 {
            let channel = ChannelIndex::of(port, offset).into_bits();
            let expected = ChannelError::PortNotPresent { port: port as usize };
            assert_eq!(drv.read_channel(&mut session(channel)), Err(expected));
            assert_eq!(drv.write_channel(&mut session(channel), 1), Err(expected));
            assert_eq!(expected.errno(), errno::ENODEV);
        }
    }
    assert!(drv.bus().accesses().is_empty());
}

#[test]
fn read_delivers_one_byte_then_end_of_data() {
    let drv = driver();
    drv.bus().poke(IoAddress::new(0xF200_0109), 0x5A);

    let mut s = session(ChannelIndex::of(2, 1).into_bits());
    let first = drv.read_channel(&mut s).unwrap();
    assert_eq!(first, Transfer::Byte(0x5A));
    assert_eq!(first.bytes_transferred(), 1);

    let second = drv.read_channel(&mut s).unwrap();
    assert_eq!(second, Transfer::EndOfData);
    assert_eq!(second.bytes_transferred(), 0);

    assert_eq!(drv.bus().reads(), 1);
}

#[test]
fn second_write_overflows() {
    let drv = driver();
    let mut s = session(2);

    assert_eq!(drv.write_channel(&mut s, 0x55), Ok(1));
    let err = drv.write_channel(&mut s, 0xAA).unwrap_err();
    assert_eq!(err, ChannelError::Overflow);
    assert_eq!(err.errno(), errno::EOVERFLOW);

    assert_eq!(drv.bus().peek(IoAddress::new(0xF200_0102)), 0x55);
    assert_eq!(drv.bus().writes(), 1);
}

#[test]
fn read_and_write_share_the_cursor() {
    let drv = driver();
    let mut s = session(0);
    drv.read_channel(&mut s).unwrap();
    assert_eq!(drv.write_channel(&mut s, 1), Err(ChannelError::Overflow));

    let mut s = session(0);
    drv.write_channel(&mut s, 1).unwrap();
    assert_eq!(drv.read_channel(&mut s), Ok(Transfer::EndOfData));
}

#[test]
fn rewind_allows_another_transfer() {
    let drv = driver();
    let mut s = session(1);
    drv.write_channel(&mut s, 0x11).unwrap();
    s.rewind();
    assert_eq!(drv.read_channel(&mut s), Ok(Transfer::Byte(0x11)));
}

#[test]
fn addressing_is_checked_before_end_of_data() {
    let drv = driver();
    let mut s = session(ChannelIndex::of(1, 0).into_bits());
    assert!(drv.read_channel(&mut s).is_err());
    assert!(drv.read_channel(&mut s).is_err());
    assert_eq!(s.position(), 0);
}

#[test]
fn bus_fault_fails_the_request_only() {
    let drv = driver();
    let reg = IoAddress::new(0xF200_0100);
    drv.bus().poke(reg, 0x42);
    drv.bus().inject_fault(reg);
    let before = drv.table().clone();

    let mut s = session(0);
    let err = drv.read_channel(&mut s).unwrap_err();
    assert_eq!(err, ChannelError::IoFault(BusError::Fault { address: reg }));
    assert_eq!(err.errno(), errno::EIO);
    assert_eq!(s.position(), 0);
    assert_eq!(drv.write_channel(&mut s, 1).map_err(|e| e.errno()), Err(errno::EIO));
    assert_eq!(drv.table(), &before);

    drv.bus().clear_fault(reg);
    assert_eq!(drv.read_channel(&mut s), Ok(Transfer::Byte(0x42)));
}

#[test]
fn requests_never_change_the_port_table() {
    let drv = driver();
    let before = drv.table().clone();
    for channel in 0..80 {
        let _ = drv.read_channel(&mut session(channel));
        let _ = drv.write_channel(&mut session(channel), 0);
    }
    assert_eq!(drv.table(), &before);
}

#[test]
fn accesses_land_in_the_io8_window() {
    let drv = driver();
    drv.bus().load(IoAddress::new(0xF200_0100), &[0x10, 0x20]);

    let mut read0 = session(0);
    let mut read1 = session(1);
    let mut write2 = session(2);
    assert_eq!(drv.read_channel(&mut read0), Ok(Transfer::Byte(0x10)));
    assert_eq!(drv.read_channel(&mut read1), Ok(Transfer::Byte(0x20)));
    assert_eq!(drv.write_channel(&mut write2, 0x55), Ok(1));

    assert_eq!(
        drv.bus().accesses(),
        [
            Access::Read(IoAddress::new(0xF200_0100), 0x10),
            Access::Read(IoAddress::new(0xF200_0101), 0x20),
            Access::Write(IoAddress::new(0xF200_0102), 0x55),
        ]
    );
}

#[test]
fn register_address_resolves_enabled_channels() {
    let drv = driver();
    assert_eq!(
        drv.register_address(ChannelIndex::of(2, 2)),
        Ok(IoAddress::new(0xF200_010A))
    );
    assert_eq!(
        drv.register_address(ChannelIndex::of(2, 3)),
        Err(ChannelError::InvalidChannel { channel: 11 })
    );
}
