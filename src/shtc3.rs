use embedded_hal::{delay::DelayNs, i2c::I2c};

use crate::{
    bus::{self, Bus, BusLock, NoLock, Ownership},
    checksum,
    command::Command,
    error::Error,
    measurement::RawMeasurement,
};

/// 7-bit I2C address of the SHTC3.
pub const DEFAULT_ADDRESS: u8 = 0x70;

/// Number of times a finished measurement is polled for before giving up.
pub const DEFAULT_POLL_ATTEMPTS: u8 = 20;

/// Time the sensor needs after wakeup or reset before it accepts a command.
const WAKEUP_DELAY_US: u32 = 240;

/// Typical conversion time in normal mode. Low power conversions finish within one poll.
const CONVERSION_TIME_MS: u32 = 10;

/// Pause between two read attempts while the sensor is still measuring.
const POLL_INTERVAL_MS: u32 = 1;

/// Bit 11 of the ID word is always set on an SHTC3.
const ID_MARKER: u8 = 0b0000_1000;
const PRODUCT_CODE_MASK: u8 = 0b0011_1111;
const PRODUCT_CODE: u8 = 0b0000_0111;

/// Measurement mode.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PowerMode {
    /// Full repeatability, about 12ms per conversion.
    #[default]
    Normal,
    /// Reduced repeatability, under 1ms per conversion.
    LowPower,
}

impl PowerMode {
    fn command(self) -> Command {
        match self {
            PowerMode::Normal => Command::MeasureNormal,
            PowerMode::LowPower => Command::MeasureLowPower,
        }
    }
}

/// Driver for the SHTC3 temperature and humidity sensor.
pub struct Shtc3<'a, I2C, D, L = NoLock> {
    bus: Bus<'a, I2C>,
    delay: D,
    lock: L,
    address: u8,
    poll_attempts: u8,
}

impl<'a, I2C, D> Shtc3<'a, I2C, D, NoLock> {
    /// Creates a new instance of the SHTC3 driver that owns its bus.
    ///
    /// # Arguments
    ///
    /// * `i2c` - The I2C bus the SHTC3 is connected to.
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::with_bus(Bus::Owned(i2c), delay)
    }

    /// Creates a new instance of the SHTC3 driver on a bus owned by the caller.
    ///
    /// The bus stays usable for other devices once the driver is dropped.
    pub fn new_borrowed(i2c: &'a mut I2C, delay: D) -> Self {
        Self::with_bus(Bus::Borrowed(i2c), delay)
    }

    fn with_bus(bus: Bus<'a, I2C>, delay: D) -> Self {
        Shtc3 {
            bus,
            delay,
            lock: NoLock,
            address: DEFAULT_ADDRESS,
            poll_attempts: DEFAULT_POLL_ATTEMPTS,
        }
    }
}

impl<'a, I2C, D, L> Shtc3<'a, I2C, D, L> {
    /// Brackets every transfer with `lock`, for a bus shared between threads.
    pub fn with_lock<L2: BusLock>(self, lock: L2) -> Shtc3<'a, I2C, D, L2> {
        Shtc3 {
            bus: self.bus,
            delay: self.delay,
            lock,
            address: self.address,
            poll_attempts: self.poll_attempts,
        }
    }

    /// Sets how many times a pending measurement is polled before [`Error::Timeout`].
    ///
    /// Each failed attempt costs 1ms. With zero attempts every read times out.
    pub fn with_poll_attempts(mut self, attempts: u8) -> Self {
        self.poll_attempts = attempts;
        self
    }

    /// Returns the 7-bit address the driver talks to.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Talks to the sensor at a non-default 7-bit address.
    pub fn set_address(&mut self, address: u8) {
        self.address = address;
    }

    /// Reports whether the driver owns its bus.
    pub fn ownership(&self) -> Ownership {
        self.bus.ownership()
    }

    /// Destroys the driver, returning the delay provider and the bus if it was owned.
    pub fn release(self) -> (Option<I2C>, D) {
        (self.bus.into_owned(), self.delay)
    }
}

impl<I2C, D, L, E> Shtc3<'_, I2C, D, L>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
    L: BusLock,
{
    /// Checks that an SHTC3 answers on the bus and leaves it asleep.
    ///
    /// Wakes the sensor, reads its ID word, validates the checksum and the ID bit fields,
    /// then sends it back to sleep. A failure at any step aborts without sending sleep.
    ///
    /// # Returns
    ///
    /// * `Ok(u16)` with the ID word if the device is an SHTC3.
    /// * `Err(Error)` if a transfer fails, the checksum is wrong or the ID does not match.
    pub fn init(&mut self) -> Result<u16, Error<E>> {
        debug!("Init");

        self.wake_up()?;
        self.send_command(Command::ReadId)?;

        let data = match self.read_response::<3>() {
            Ok(data) => data,
            Err(e) => {
                error!("Read failed");
                return Err(Error::Bus(e));
            }
        };

        if !checksum::verify(&data) {
            return Err(Error::ChecksumMismatch);
        }

        if (data[0] & ID_MARKER) != ID_MARKER || (data[1] & PRODUCT_CODE_MASK) != PRODUCT_CODE {
            error!("ID doesn't match");
            return Err(Error::IdMismatch);
        }

        let id = u16::from_be_bytes([data[0], data[1]]);
        info!("SHTC3 ID: {:#x}", id);

        self.send_command(Command::Sleep)?;
        Ok(id)
    }

    /// Reads a temperature and humidity measurement from the SHTC3.
    ///
    /// This method performs the complete measurement cycle: wakeup, measurement
    /// request, polling until the result is ready, checksum validation and sleep.
    /// Once the sensor is awake, the sleep command is sent whatever the outcome.
    ///
    /// # Returns
    ///
    /// * `Ok(RawMeasurement)` if the read is successful and both checksums are valid.
    /// * `Err(Error)` if a communication, timeout or checksum error occurs.
    pub fn read(&mut self, mode: PowerMode) -> Result<RawMeasurement, Error<E>> {
        // A sensor that did not acknowledge the wakeup is not sent to sleep either.
        self.wake_up()?;

        let result = self.measure_awake(mode);
        self.sleep_best_effort();
        result
    }

    /// Reads a measurement in [`PowerMode::Normal`].
    pub fn measure(&mut self) -> Result<RawMeasurement, Error<E>> {
        self.read(PowerMode::Normal)
    }

    /// Triggers a software reset. No response is expected.
    ///
    /// The 240us recovery time is waited even when the command is not acknowledged.
    pub fn reset(&mut self) -> Result<(), Error<E>> {
        let sent = self.send_command(Command::Reset);
        self.delay.delay_us(WAKEUP_DELAY_US);
        sent.map_err(Error::Bus)
    }

    fn wake_up(&mut self) -> Result<(), Error<E>> {
        self.send_command(Command::Wakeup)?;
        self.delay.delay_us(WAKEUP_DELAY_US);
        Ok(())
    }

    /// Runs the part of the cycle between wakeup and sleep.
    fn measure_awake(&mut self, mode: PowerMode) -> Result<RawMeasurement, Error<E>> {
        self.send_command(mode.command())?;

        if mode == PowerMode::Normal {
            self.delay.delay_ms(CONVERSION_TIME_MS);
        }

        let frame = self.poll_response()?;

        // humidity group first, temperature group second
        if !checksum::verify(&frame) {
            return Err(Error::ChecksumMismatch);
        }

        Ok(RawMeasurement {
            humidity: u16::from_be_bytes([frame[0], frame[1]]),
            temperature: u16::from_be_bytes([frame[3], frame[4]]),
        })
    }

    /// Reads the 6-byte result, retrying while the sensor NACKs.
    fn poll_response(&mut self) -> Result<[u8; 6], Error<E>> {
        for attempt in 0..self.poll_attempts {
            match self.read_response::<6>() {
                Ok(frame) => {
                    debug!("Measuring took {} extra polls", attempt);
                    return Ok(frame);
                }
                Err(_) => self.delay.delay_ms(POLL_INTERVAL_MS),
            }
        }

        error!("Timeout after {} polls", self.poll_attempts);
        Err(Error::Timeout)
    }

    fn sleep_best_effort(&mut self) {
        if self.send_command(Command::Sleep).is_err() {
            error!("Sleep failed, sensor stays awake");
        }
    }

    /// Writes `command` as a 2-byte big-endian frame in one locked transfer.
    fn send_command(&mut self, command: Command) -> Result<(), E> {
        debug!("Sending CMD: {:#x}", command.opcode());

        let frame = command.to_be_bytes();
        let address = self.address;
        let bus = &mut self.bus;
        let result = bus::locked(&self.lock, || bus.get_mut().write(address, &frame));

        if result.is_err() {
            error!("Write failed");
        }
        result
    }

    /// Reads `N` bytes in one locked transfer.
    fn read_response<const N: usize>(&mut self) -> Result<[u8; N], E> {
        let mut buffer = [0; N];
        let address = self.address;
        let bus = &mut self.bus;
        bus::locked(&self.lock, || bus.get_mut().read(address, &mut buffer))?;
        Ok(buffer)
    }
}
