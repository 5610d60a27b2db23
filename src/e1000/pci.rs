//! PCI configuration-space access, narrowed to what E1000 discovery needs.
//!
//! PCI uses two I/O ports for configuration space access:
//! - CONFIG_ADDRESS (0xCF8): write the address of the register to read/write
//! - CONFIG_DATA (0xCFC): read/write the configuration data
//!
//! ```text
//! Bit 31    : Enable bit (must be 1)
//! Bits 23-16: Bus number
//! Bits 15-11: Device number
//! Bits 10-8 : Function number
//! Bits 7-2  : Register offset (32-bit aligned)
//! ```

use x86_64::instructions::port::Port;

use crate::error::{NetError, NetResult};

const CONFIG_ADDRESS: u16 = 0xCF8;
const CONFIG_DATA: u16 = 0xCFC;

/// Devices 0..BUS0_SCAN_LIMIT on bus 0 are scanned; this driver has no need
/// to walk the rest of the host bus.
const BUS0_SCAN_LIMIT: u8 = 3;

pub const INTEL_VENDOR_ID: u16 = 0x8086;
pub const E1000_DEVICE_ID: u16 = 0x100E;

/// A decoded base address register.
#[derive(Debug, Clone, Copy)]
pub struct Bar {
    pub address: u64,
    pub is_io: bool,
}

/// The E1000 function found on the host bus.
#[derive(Debug, Clone, Copy)]
pub struct Device {
    pub bus: u8,
    pub device: u8,
    pub function: u8,
    pub vendor_id: u16,
    pub device_id: u16,
    pub interrupt_line: u8,
    pub bar0: Bar,
}

impl Device {
    /// Set the bus-master bit (bit 2) in the command register so the
    /// device's DMA is allowed.
    pub fn enable_bus_master(&self) {
        let command = read_config_word(self.bus, self.device, self.function, 0x04);
        write_config_word(self.bus, self.device, self.function, 0x04, command | 0x04);
    }
}

fn read_config_dword(bus: u8, device: u8, function: u8, offset: u8) -> u32 {
    let address: u32 = 0x8000_0000
        | ((bus as u32) << 16)
        | ((device as u32) << 11)
        | ((function as u32) << 8)
        | ((offset & 0xFC) as u32);
    unsafe {
        let mut addr_port = Port::<u32>::new(CONFIG_ADDRESS);
        let mut data_port = Port::<u32>::new(CONFIG_DATA);
        addr_port.write(address);
        data_port.read()
    }
}

fn write_config_dword(bus: u8, device: u8, function: u8, offset: u8, value: u32) {
    let address: u32 = 0x8000_0000
        | ((bus as u32) << 16)
        | ((device as u32) << 11)
        | ((function as u32) << 8)
        | ((offset & 0xFC) as u32);
    unsafe {
        let mut addr_port = Port::<u32>::new(CONFIG_ADDRESS);
        let mut data_port = Port::<u32>::new(CONFIG_DATA);
        addr_port.write(address);
        data_port.write(value);
    }
}

fn read_config_word(bus: u8, device: u8, function: u8, offset: u8) -> u16 {
    let dword = read_config_dword(bus, device, function, offset & 0xFC);
    let shift = ((offset & 2) * 8) as u32;
    ((dword >> shift) & 0xFFFF) as u16
}

fn write_config_word(bus: u8, device: u8, function: u8, offset: u8, value: u16) {
    let dword_offset = offset & 0xFC;
    let mut dword = read_config_dword(bus, device, function, dword_offset);
    let shift = ((offset & 2) * 8) as u32;
    dword = (dword & !(0xFFFF << shift)) | ((value as u32) << shift);
    write_config_dword(bus, device, function, dword_offset, dword);
}

/// Decode BAR0, probing its size by writing all-ones and reading back.
fn decode_bar0(bus: u8, device: u8, function: u8) -> Bar {
    let bar_low = read_config_dword(bus, device, function, 0x10);
    if bar_low & 0x01 != 0 {
        Bar {
            address: (bar_low & 0xFFFF_FFFC) as u64,
            is_io: true,
        }
    } else {
        Bar {
            address: (bar_low & 0xFFFF_FFF0) as u64,
            is_io: false,
        }
    }
}

fn probe(bus: u8, device: u8, function: u8) -> Option<Device> {
    let vendor_device = read_config_dword(bus, device, function, 0x00);
    if vendor_device == 0xFFFF_FFFF {
        return None;
    }
    let vendor_id = vendor_device as u16;
    let device_id = (vendor_device >> 16) as u16;
    let int_reg = read_config_dword(bus, device, function, 0x3C);
    let interrupt_line = int_reg as u8;
    let bar0 = decode_bar0(bus, device, function);

    Some(Device {
        bus,
        device,
        function,
        vendor_id,
        device_id,
        interrupt_line,
        bar0,
    })
}

/// Scan devices 0..3 on bus 0 of the host bus for the first Intel 82540EM
/// (vendor `0x8086`, device `0x100E`). Only function 0 of each device is
/// probed — multifunction devices are outside this driver's scope.
pub fn find_e1000() -> NetResult<Device> {
    for device in 0..BUS0_SCAN_LIMIT {
        if let Some(dev) = probe(0, device, 0) {
            if dev.vendor_id == INTEL_VENDOR_ID && dev.device_id == E1000_DEVICE_ID {
                return Ok(dev);
            }
        }
    }
    Err(NetError::NoDevice)
}
