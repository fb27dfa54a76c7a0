use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::window;

thread_local! {
    static PENDING: RefCell<Vec<i32>> = const { RefCell::new(Vec::new()) };
}

/// Run `f` once after `delay_ms`. The handle is tracked until it fires or is cancelled.
pub fn schedule(delay_ms: u32, f: impl FnOnce() + 'static) -> Result<i32, JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let handle = Rc::new(Cell::new(-1));
    let fired = handle.clone();
    let callback = Closure::once_into_js(move || {
        forget(fired.get());
        f();
    });
    let id = win.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        delay_ms.min(i32::MAX as u32) as i32,
    )?;
    handle.set(id);
    PENDING.with(|p| p.borrow_mut().push(id));
    Ok(id)
}

fn forget(id: i32) {
    PENDING.with(|p| p.borrow_mut().retain(|h| *h != id));
}

/// Clear every outstanding timeout.
pub fn cancel_all() {
    let ids: Vec<i32> = PENDING.with(|p| p.borrow_mut().drain(..).collect());
    if ids.is_empty() {
        return;
    }
    if let Some(win) = window() {
        for id in ids {
            win.clear_timeout_with_handle(id);
        }
    }
}

pub fn pending_count() -> usize {
    PENDING.with(|p| p.borrow().len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_all_without_timers() {
        cancel_all();
        assert_eq!(pending_count(), 0);
    }

    #[test]
    fn test_forget_unknown_handle() {
        forget(42);
        assert_eq!(pending_count(), 0);
    }
}
