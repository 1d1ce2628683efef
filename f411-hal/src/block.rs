//! Non-blocking results, and bounded ways to block on them.
//!
//! Status checks in this crate return [Result], with
//! [Error::WouldBlock] meaning "not yet". [poll()] turns one of those
//! into a blocking call that gives up after a [Timeout].

pub use nb::{block, Error, Result};

/// How long a busy-wait may spin before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Timeout {
    /// Spin until the condition holds, however long that takes.
    ///
    /// An unresponsive peripheral hangs the caller.
    Forever,
    /// Re-check the condition at most this many more times after the
    /// first check.
    Polls(u32),
}

/// Polls used by [Timeout::default()].
pub const DEFAULT_POLLS: u32 = 100_000;

impl Default for Timeout {
    #[inline(always)]
    fn default() -> Self {
        Self::Polls(DEFAULT_POLLS)
    }
}

/// Why [poll()] stopped without a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Expired<E> {
    /// The timeout ran out.
    TimedOut,
    /// The operation itself failed.
    Other(E),
}

/// Call `f` until it stops returning [Error::WouldBlock], or the
/// timeout runs out.
#[inline]
pub fn poll<T, E>(
    timeout: Timeout,
    mut f: impl FnMut() -> Result<T, E>,
) -> core::result::Result<T, Expired<E>> {
    let mut remaining = match timeout {
        Timeout::Forever => None,
        Timeout::Polls(n) => Some(n),
    };

    loop {
        match f() {
            Ok(v) => return Ok(v),
            Err(Error::Other(e)) => return Err(Expired::Other(e)),
            Err(Error::WouldBlock) => {}
        }

        if let Some(n) = remaining.as_mut() {
            if *n == 0 {
                return Err(Expired::TimedOut);
            }
            *n -= 1;
        }

        relax();
    }
}

#[inline(always)]
fn relax() {
    #[cfg(all(target_arch = "arm", target_os = "none"))]
    cortex_m::asm::nop();

    #[cfg(not(all(target_arch = "arm", target_os = "none")))]
    core::hint::spin_loop();
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ready_immediately() {
        let r: core::result::Result<u8, Expired<()>> = poll(Timeout::Polls(0), || Ok(7));
        assert_eq!(r, Ok(7));
    }

    #[test]
    fn gives_up_after_budget() {
        let mut calls = 0u32;
        let r: core::result::Result<(), Expired<()>> = poll(Timeout::Polls(5), || {
            calls += 1;
            Err(Error::WouldBlock)
        });
        assert_eq!(r, Err(Expired::TimedOut));
        // one initial check plus five retries
        assert_eq!(calls, 6);
    }

    #[test]
    fn forever_waits_for_success() {
        let mut calls = 0u32;
        let r: core::result::Result<u32, Expired<()>> = poll(Timeout::Forever, || {
            calls += 1;
            if calls < 1000 {
                Err(Error::WouldBlock)
            } else {
                Ok(calls)
            }
        });
        assert_eq!(r, Ok(1000));
    }

    #[test]
    fn other_errors_pass_through() {
        let r: core::result::Result<(), Expired<u8>> =
            poll(Timeout::Forever, || Err(Error::Other(3)));
        assert_eq!(r, Err(Expired::Other(3)));
    }
}
