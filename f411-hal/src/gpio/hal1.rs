use core::convert::Infallible;
use embedded_hal_1::digital as hal1;

use crate::reg::RegisterAccess;

use super::{Input, Output, PinState};

impl From<hal1::PinState> for PinState {
    #[inline(always)]
    fn from(value: hal1::PinState) -> Self {
        match value {
            hal1::PinState::Low => Self::Low,
            hal1::PinState::High => Self::High,
        }
    }
}

impl From<PinState> for hal1::PinState {
    #[inline(always)]
    fn from(value: PinState) -> Self {
        match value {
            PinState::Low => Self::Low,
            PinState::High => Self::High,
        }
    }
}

impl<R> hal1::ErrorType for Output<R>
where
    R: RegisterAccess,
{
    type Error = Infallible;
}

impl<R> hal1::ErrorType for Input<R>
where
    R: RegisterAccess,
{
    type Error = Infallible;
}

impl<R> hal1::InputPin for Input<R>
where
    R: RegisterAccess,
{
    #[inline(always)]
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(Input::is_high(self))
    }

    #[inline(always)]
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(Input::is_low(self))
    }
}

impl<R> hal1::OutputPin for Output<R>
where
    R: RegisterAccess,
{
    #[inline(always)]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Output::set_low(self);
        Ok(())
    }

    #[inline(always)]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        Output::set_high(self);
        Ok(())
    }

    #[inline(always)]
    fn set_state(&mut self, state: hal1::PinState) -> Result<(), Self::Error> {
        Output::set_state(self, state.into());
        Ok(())
    }
}

impl<R> hal1::StatefulOutputPin for Output<R>
where
    R: RegisterAccess,
{
    #[inline(always)]
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(Output::is_set_high(self))
    }

    #[inline(always)]
    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(Output::is_set_low(self))
    }

    #[inline(always)]
    fn toggle(&mut self) -> Result<(), Self::Error> {
        Output::toggle(self);
        Ok(())
    }
}
