use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;

use crate::{
    config::{TerminalConfig, VERSION},
    hack::HackProgress,
    interpreter::UrlOpener,
    shell::{Branch, Shell, ShellEvent},
    telemetry, timers,
};

/// Opens links with `window.open(url, "_blank")`.
pub struct BrowserOpener;

impl UrlOpener for BrowserOpener {
    fn open_in_new_tab(&mut self, url: &str) {
        match web_sys::window().map(|w| w.open_with_url_and_target(url, "_blank")) {
            Some(Ok(Some(_))) => {}
            Some(Ok(None)) => warn!(url, "popup blocked"),
            Some(Err(e)) => warn!(url, error = ?e, "window.open failed"),
            None => warn!(url, "no window to open link in"),
        }
    }
}

type UpdateCallback = Rc<RefCell<Option<js_sys::Function>>>;

#[wasm_bindgen]
pub struct PortfolioTerminal {
    shell: Rc<RefCell<Shell>>,
    on_update: UpdateCallback,
}

#[wasm_bindgen]
impl PortfolioTerminal {
    /// `config_json` is an optional partial `TerminalConfig` object.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<PortfolioTerminal, JsValue> {
        let config = match config_json.as_deref().map(str::trim) {
            Some(json) if !json.is_empty() => TerminalConfig::from_json(json).map_err(to_js)?,
            _ => TerminalConfig::default(),
        };
        telemetry::init(&config.log_filter).map_err(to_js)?;
        info!(version = VERSION, "portfolio terminal ready");
        Ok(PortfolioTerminal {
            shell: Rc::new(RefCell::new(Shell::new(config))),
            on_update: Rc::new(RefCell::new(None)),
        })
    }

    /// Called whenever a timer changes the scrollback. Not called for direct method calls.
    #[wasm_bindgen]
    pub fn set_update_callback(&mut self, callback: js_sys::Function) {
        *self.on_update.borrow_mut() = Some(callback);
    }

    #[wasm_bindgen]
    pub fn prompt(&self) -> String {
        self.shell.borrow().prompt()
    }

    /// Queue a line; its output lands after the loading delay. False while input is disabled.
    #[wasm_bindgen]
    pub fn submit(&mut self, line: &str) -> bool {
        let delay = match self.shell.borrow_mut().submit(line) {
            Ok(delay) => delay,
            Err(e) => {
                debug!(error = %e, "submission ignored");
                return false;
            }
        };
        let shell = self.shell.clone();
        let on_update = self.on_update.clone();
        let scheduled = timers::schedule(delay, move || {
            finish(&shell);
            notify(&on_update);
        });
        if let Err(e) = scheduled {
            warn!(error = ?e, "could not schedule command, running it now");
            finish(&self.shell);
        }
        true
    }

    /// Run a line synchronously and return the snapshot JSON.
    #[wasm_bindgen]
    pub fn exec(&mut self, line: &str) -> Result<String, JsValue> {
        let event = self
            .shell
            .borrow_mut()
            .run(line, &mut BrowserOpener)
            .map_err(to_js)?;
        if event == ShellEvent::Cleared {
            timers::cancel_all();
        }
        Ok(self.snapshot())
    }

    /// Resolve the choice offered by `continue-game`. Returns `"hack"` or `"game-over"`.
    #[wasm_bindgen]
    pub fn choose_branch(&mut self, choice: &str) -> Result<String, JsValue> {
        let branch: Branch = choice.parse().map_err(to_js)?;
        let event = self.shell.borrow_mut().choose_branch(branch).map_err(to_js)?;
        match event {
            ShellEvent::HackStarted(plan) => {
                let generation = plan.generation;
                let scheduled: Result<Vec<i32>, JsValue> = plan
                    .schedule
                    .into_iter()
                    .map(|at| {
                        let shell = self.shell.clone();
                        let on_update = self.on_update.clone();
                        timers::schedule(at, move || {
                            let progress = shell.borrow_mut().advance_hack(generation);
                            if progress != HackProgress::Stale {
                                notify(&on_update);
                            }
                        })
                    })
                    .collect();
                if let Err(e) = scheduled {
                    warn!(error = ?e, "could not schedule hack sequence");
                    timers::cancel_all();
                    self.shell.borrow_mut().abort_hack();
                    return Err(e);
                }
                Ok("hack".into())
            }
            ShellEvent::GameOver => Ok("game-over".into()),
            other => Err(to_js(format!("unexpected event {:?}", other))),
        }
    }

    /// Reset the terminal and drop every pending timer.
    #[wasm_bindgen]
    pub fn clear(&mut self) {
        timers::cancel_all();
        self.shell.borrow_mut().clear();
    }

    /// Profile and project tables as JSON.
    #[wasm_bindgen]
    pub fn portfolio(&self) -> Result<String, JsValue> {
        let shell = self.shell.borrow();
        serde_json::to_string(&shell.session().interpreter().catalog().view()).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn snapshot(&self) -> String {
        serde_json::to_string(&self.shell.borrow().snapshot()).unwrap_or_else(|_| "{}".to_string())
    }

    #[wasm_bindgen]
    pub fn is_busy(&self) -> bool {
        self.shell.borrow().is_busy()
    }

    #[wasm_bindgen]
    pub fn complete(&self, partial: &str) -> Vec<JsValue> {
        self.shell
            .borrow()
            .complete(partial)
            .iter()
            .map(|c| JsValue::from_str(c))
            .collect()
    }

    #[wasm_bindgen]
    pub fn recall_previous(&mut self) -> Option<String> {
        self.shell.borrow_mut().recall_previous().map(str::to_string)
    }

    #[wasm_bindgen]
    pub fn recall_next(&mut self) -> Option<String> {
        self.shell.borrow_mut().recall_next().map(str::to_string)
    }
}

fn finish(shell: &Rc<RefCell<Shell>>) {
    let event = shell.borrow_mut().finish_pending(&mut BrowserOpener);
    match event {
        Ok(ShellEvent::Cleared) => timers::cancel_all(),
        Ok(_) => {}
        Err(e) => debug!(error = %e, "nothing to finish"),
    }
}

fn notify(on_update: &UpdateCallback) {
    if let Some(callback) = on_update.borrow().as_ref() {
        if let Err(e) = callback.call0(&JsValue::NULL) {
            warn!(error = ?e, "update callback failed");
        }
    }
}

fn to_js(e: impl Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}
