/// Possible errors from the SHTC3 driver.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// The sensor did not acknowledge a write or read, or the bus failed otherwise.
    Bus(E),
    /// Checksum did not match the received data.
    ChecksumMismatch,
    /// The measurement was not ready within the configured number of poll attempts.
    Timeout,
    /// The ID word does not identify an SHTC3.
    IdMismatch,
}

impl<E> From<E> for Error<E> {
    fn from(value: E) -> Self {
        Self::Bus(value)
    }
}
