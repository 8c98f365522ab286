/// Commands understood by the SHTC3.
///
/// Every command goes over the wire as its 16-bit opcode, most significant byte first.
/// The measurement commands select "relative humidity first" readout with clock stretching
/// disabled, so the sensor NACKs reads until the conversion has finished.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u16)]
pub enum Command {
    /// Leave sleep mode. The sensor needs 240us before it accepts the next command.
    Wakeup = 0x3517,
    /// Software reset.
    Reset = 0x805D,
    /// Enter sleep mode.
    Sleep = 0xB098,
    /// Read the 16-bit ID register.
    ReadId = 0xEFC8,
    /// Start a measurement in normal mode.
    MeasureNormal = 0x58E0,
    /// Start a measurement in low power mode.
    MeasureLowPower = 0x401A,
}

impl Command {
    /// Returns the 16-bit opcode.
    pub const fn opcode(self) -> u16 {
        self as u16
    }

    /// Returns the 2-byte frame written to the bus.
    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.opcode().to_be_bytes()
    }
}
