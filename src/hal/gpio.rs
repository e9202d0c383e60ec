//! GPIO HAL for the four push-buttons.
//!
//! Buttons short the line to ground; the internal pull-up holds it high
//! otherwise. `debounce::PinInputs` reads a low level as pressed.
//!
//! | Line  | Bit | GPIO |
//! |-------|-----|------|
//! | RIGHT | 0   | 4    |
//! | DOWN  | 1   | 5    |
//! | LEFT  | 2   | 6    |
//! | UP    | 3   | 7    |

#[cfg(target_os = "espidf")]
pub use esp::*;

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_svc::hal::gpio::{AnyIOPin, Input, PinDriver, Pull};
    use esp_idf_svc::sys::EspError;

    use crate::config::NUM_BUTTONS;

    /// Input driver for one button line.
    pub type ButtonDriver = PinDriver<'static, AnyIOPin, Input>;

    /// Configure the button pins as pulled-up inputs.
    ///
    /// `pins` must be in payload bit order (RIGHT, DOWN, LEFT, UP).
    pub fn init_button_pins(
        pins: [AnyIOPin; NUM_BUTTONS],
    ) -> Result<[ButtonDriver; NUM_BUTTONS], EspError> {
        let [right, down, left, up] = pins;
        Ok([
            pulled_up(right)?,
            pulled_up(down)?,
            pulled_up(left)?,
            pulled_up(up)?,
        ])
    }

    fn pulled_up(pin: AnyIOPin) -> Result<ButtonDriver, EspError> {
        let mut driver = PinDriver::input(pin)?;
        driver.set_pull(Pull::Up)?;
        Ok(driver)
    }
}
