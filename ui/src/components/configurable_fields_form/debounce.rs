//! Trailing-edge debounce for the "field touched" notification

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

/// Wrap `callback` so a burst of calls fires it once, `window_ms` after the
/// last call.
///
/// The pending timeout lives in local storage; replacing it drops the
/// previous `Timeout`, which cancels it.
pub fn use_debounced(window_ms: u32, callback: Callback<()>) -> Callback<()> {
    let pending = StoredValue::new_local(None::<Timeout>);

    on_cleanup(move || {
        pending.try_update_value(|timeout| {
            if let Some(timeout) = timeout.take() {
                timeout.cancel();
            }
        });
    });

    Callback::new(move |_| {
        let timeout = Timeout::new(window_ms, move || callback.run(()));
        pending.try_update_value(|slot| *slot = Some(timeout));
    })
}
