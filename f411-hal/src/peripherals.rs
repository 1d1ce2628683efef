use core::cell::Cell;

use critical_section::Mutex;

use crate::gpio::Gpio;
use crate::power::Gates;
use crate::reg::{Mmio, RegisterAccess};
use crate::spi::Spi;

static TAKEN: Mutex<Cell<bool>> = Mutex::new(Cell::new(false));

/// Every peripheral this crate drives, each behind its own driver.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Peripherals<R> {
    pub gpio: Gpio<R>,
    pub spi: Spi<R>,
    pub gates: Gates<R>,
}

impl Peripherals<Mmio> {
    /// Take the real peripherals.
    ///
    /// Returns [None] on every call after the first.
    pub fn take() -> Option<Self> {
        critical_section::with(|cs| {
            let taken = TAKEN.borrow(cs);
            if taken.get() {
                return None;
            }
            taken.set(true);
            // safety: guarded by TAKEN, this is the only handle
            Some(unsafe { Self::steal() })
        })
    }

    /// Take the real peripherals, unconditionally.
    ///
    /// # Safety
    /// Any other driver for the same peripherals, from [take()] or
    /// elsewhere, will be fighting this one.
    ///
    /// [take()]: Self::take()
    pub unsafe fn steal() -> Self {
        Self::new(Mmio::steal())
    }
}

impl<R> Peripherals<R>
where
    R: RegisterAccess + Clone,
{
    /// Build the drivers over any register accessor.
    pub fn new(io: R) -> Self {
        Self {
            gpio: Gpio::new(io.clone()),
            spi: Spi::new(io.clone()),
            gates: Gates::new(io),
        }
    }
}
