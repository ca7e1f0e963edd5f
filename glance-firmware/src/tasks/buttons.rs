//! Button input task

use defmt::*;
use embassy_futures::select::{select4, Either4};
use embassy_rp::gpio::Input;
use embassy_time::Timer;

use crate::board::DEBOUNCE_MS;
use crate::channels::BUTTON_CHANNEL;
use crate::ui::Button;

/// Button task
///
/// Buttons are active low with pull-ups. A press is reported once the pin
/// is still low after the debounce interval, then the task waits for the
/// release.
#[embassy_executor::task]
pub async fn buttons_task(
    mut back: Input<'static>,
    mut up: Input<'static>,
    mut select: Input<'static>,
    mut down: Input<'static>,
) {
    info!("Buttons task started");

    loop {
        let pressed = select4(
            back.wait_for_falling_edge(),
            up.wait_for_falling_edge(),
            select.wait_for_falling_edge(),
            down.wait_for_falling_edge(),
        )
        .await;

        let (button, pin) = match pressed {
            Either4::First(()) => (Button::Back, &mut back),
            Either4::Second(()) => (Button::Up, &mut up),
            Either4::Third(()) => (Button::Select, &mut select),
            Either4::Fourth(()) => (Button::Down, &mut down),
        };

        Timer::after_millis(DEBOUNCE_MS).await;
        if pin.is_high() {
            continue;
        }

        if BUTTON_CHANNEL.try_send(button).is_err() {
            warn!("Button {} dropped, channel full", button);
        }
        pin.wait_for_high().await;
    }
}
