//! Error handling primitives for the LIS3DH driver.

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Any error reported by the underlying bus transport.
    Interface(E),
    /// The provided configuration parameters are invalid.
    InvalidConfig,
    /// A register address had its read/write marker bit (bit 7) set.
    InvalidAddress(u8),
    /// `WHO_AM_I` returned something other than the LIS3DH identity byte.
    IdentityMismatch(u8),
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Interface(err)
    }
}
