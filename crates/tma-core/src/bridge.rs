//! Host bridge facade.
//!
//! Lifecycle: `Uninitialized` until the page signals it is mounted, then
//! `Ready` for the rest of the page session. The host shell reloads the page
//! to reset it, so there is no teardown.

use std::{
    cell::{OnceCell, RefCell},
    rc::Rc,
};

use serde::Serialize;
use serde_json::Value;

use crate::{
    domain::{ChatId, ChatInfo, ChatScope, ChatType, Platform, TelegramUser},
    errors::Error,
    host::{ButtonKind, Capability, HostCapabilities, HostPort, HostResult},
    launch::{self, host_view_has_data, LaunchContext},
    Result,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Ready,
}

/// Where the launch context came from. One source wins wholesale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextSource {
    /// The host object's own `initDataUnsafe` view.
    Host,
    /// Reconstructed from the page URL fragment (older hosts).
    Url,
}

/// Everything the bridge learned on entering `Ready`. Read-only afterwards.
#[derive(Clone, Debug)]
pub struct BridgeState {
    pub source: ContextSource,
    pub context: LaunchContext,
    /// Raw `initData` string, for server-side verification.
    pub init_data: Option<String>,
    pub init_data_unsafe: Option<Value>,
    pub platform: Platform,
    pub version: Option<String>,
    pub theme_params: Option<Value>,
    pub capabilities: HostCapabilities,
}

impl BridgeState {
    pub fn effective_chat_id(&self) -> Option<ChatId> {
        self.context.effective_chat_id()
    }
}

pub type StateListener = Box<dyn FnOnce(&BridgeState) + 'static>;

/// Stable interface over the (optional) host-injected object.
pub struct Bridge {
    host: RefCell<Option<Rc<dyn HostPort>>>,
    page_url: String,
    state: OnceCell<BridgeState>,
    listeners: RefCell<Vec<StateListener>>,
}

impl Bridge {
    /// `page_url` is the current location, used when the host has no launch data.
    pub fn new(host: Option<Rc<dyn HostPort>>, page_url: impl Into<String>) -> Self {
        Self {
            host: RefCell::new(host),
            page_url: page_url.into(),
            state: OnceCell::new(),
            listeners: RefCell::new(Vec::new()),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.state.get().is_some() {
            Phase::Ready
        } else {
            Phase::Uninitialized
        }
    }

    pub fn is_ready(&self) -> bool {
        self.phase() == Phase::Ready
    }

    pub fn state(&self) -> Option<&BridgeState> {
        self.state.get()
    }

    pub fn has_host(&self) -> bool {
        self.host.borrow().is_some()
    }

    /// Attach a host object injected after the bridge was created.
    ///
    /// Only takes effect while `Uninitialized`; returns whether it did.
    pub fn attach_host(&self, host: Rc<dyn HostPort>) -> bool {
        if self.is_ready() {
            return false;
        }
        *self.host.borrow_mut() = Some(host);
        true
    }

    /// Transition to `Ready`. Call once the page is mounted.
    ///
    /// Without a host object the bridge stays `Uninitialized`. Calling again
    /// after `Ready` returns the existing state.
    pub fn initialize(&self) -> Result<&BridgeState> {
        if let Some(state) = self.state.get() {
            return Ok(state);
        }

        let Some(host) = self.host.borrow().clone() else {
            tracing::warn!("Telegram WebApp object not found; bridge stays uninitialized");
            return Err(Error::HostAbsent);
        };

        let capabilities = HostCapabilities::probe(host.as_ref());
        lifecycle_call(&capabilities, Capability::Ready, || host.ready());
        lifecycle_call(&capabilities, Capability::Expand, || host.expand());

        let from_url = launch::parse(&self.page_url);
        let platform = host
            .platform()
            .map(Platform::new)
            .filter(|p| !p.is_unknown())
            .or(from_url.platform)
            .unwrap_or_default();

        let (source, context, init_data, init_data_unsafe) =
            match host.init_data_unsafe().filter(host_view_has_data) {
                Some(view) => (
                    ContextSource::Host,
                    LaunchContext::from_host_view(&view),
                    host.init_data().filter(|s| !s.is_empty()),
                    Some(view),
                ),
                None => (
                    ContextSource::Url,
                    from_url.context,
                    from_url.raw_init_data,
                    None,
                ),
            };

        let state = BridgeState {
            source,
            context,
            init_data,
            init_data_unsafe,
            platform,
            version: host.version().or(from_url.version),
            theme_params: host.theme_params(),
            capabilities,
        };

        tracing::info!(
            source = ?state.source,
            platform = %state.platform,
            version = state.version.as_deref().unwrap_or("unknown"),
            user = ?state.context.user.as_ref().map(|u| u.id.0),
            chat_type = %state.context.chat_type,
            inline_query = state.capabilities.has(Capability::SwitchInlineQuery),
            "Telegram WebApp bridge ready"
        );

        let _ = self.state.set(state);
        let state = self.state.get().ok_or(Error::NotReady)?;

        // Listeners may subscribe again from inside the callback.
        let listeners = std::mem::take(&mut *self.listeners.borrow_mut());
        for listener in listeners {
            listener(state);
        }

        Ok(state)
    }

    /// Run `listener` once the bridge is ready (immediately if it already is).
    pub fn subscribe(&self, listener: impl FnOnce(&BridgeState) + 'static) {
        match self.state.get() {
            Some(state) => listener(state),
            None => self.listeners.borrow_mut().push(Box::new(listener)),
        }
    }

    // ============== Capability probe ==============

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.state
            .get()
            .is_some_and(|s| s.capabilities.has(capability))
    }

    /// Probe by host member name (e.g. `"switchInlineQuery"`).
    ///
    /// Known capabilities answer from the snapshot taken at `Ready`; any other
    /// member (e.g. `"shareToStory"`) is looked up on the host object.
    pub fn has_member(&self, name: &str) -> bool {
        let Some(state) = self.state.get() else {
            return false;
        };
        if Capability::from_member(name).is_some() {
            return state.capabilities.has_member(name);
        }
        self.host
            .borrow()
            .as_ref()
            .is_some_and(|host| host.has_member(name))
    }

    // ============== Read accessors ==============

    pub fn context(&self) -> Option<&LaunchContext> {
        self.state.get().map(|s| &s.context)
    }

    pub fn user(&self) -> Option<&TelegramUser> {
        self.context()?.user.as_ref()
    }

    pub fn chat(&self) -> Option<&ChatInfo> {
        self.context()?.chat.as_ref()
    }

    pub fn chat_type(&self) -> ChatType {
        self.context().map(|c| c.chat_type).unwrap_or_default()
    }

    pub fn chat_instance(&self) -> Option<&str> {
        self.context()?.chat_instance.as_deref()
    }

    pub fn start_param(&self) -> Option<&str> {
        self.context()?.start_param.as_deref()
    }

    pub fn init_data(&self) -> Option<&str> {
        self.state.get()?.init_data.as_deref()
    }

    pub fn init_data_unsafe(&self) -> Option<&Value> {
        self.state.get()?.init_data_unsafe.as_ref()
    }

    pub fn theme_params(&self) -> Option<&Value> {
        self.state.get()?.theme_params.as_ref()
    }

    pub fn platform(&self) -> Option<&Platform> {
        self.state.get().map(|s| &s.platform)
    }

    pub fn version(&self) -> Option<&str> {
        self.state.get()?.version.as_deref()
    }

    /// Chat to address messages to: the chat id, or the user id in private launches.
    pub fn effective_chat_id(&self) -> Option<ChatId> {
        self.state.get()?.effective_chat_id()
    }

    // ============== Host operations ==============

    pub fn show_main_button(&self, text: &str, on_click: impl FnMut() + 'static) -> Result<()> {
        self.forward(Capability::MainButton, |host| {
            host.set_button_text(ButtonKind::Main, text)?;
            host.show_button(ButtonKind::Main)?;
            host.on_button_click(ButtonKind::Main, Box::new(on_click))
        })
    }

    pub fn hide_main_button(&self) -> Result<()> {
        self.forward(Capability::MainButton, |host| {
            host.hide_button(ButtonKind::Main)
        })
    }

    pub fn show_back_button(&self, on_click: impl FnMut() + 'static) -> Result<()> {
        self.forward(Capability::BackButton, |host| {
            host.show_button(ButtonKind::Back)?;
            host.on_button_click(ButtonKind::Back, Box::new(on_click))
        })
    }

    pub fn hide_back_button(&self) -> Result<()> {
        self.forward(Capability::BackButton, |host| {
            host.hide_button(ButtonKind::Back)
        })
    }

    pub fn show_alert(&self, message: &str) -> Result<()> {
        self.forward(Capability::ShowAlert, |host| host.show_alert(message))
    }

    pub fn show_confirm(
        &self,
        message: &str,
        on_answer: impl FnOnce(bool) + 'static,
    ) -> Result<()> {
        self.forward(Capability::ShowConfirm, |host| {
            host.show_confirm(message, Box::new(on_answer))
        })
    }

    pub fn close(&self) -> Result<()> {
        self.forward(Capability::Close, |host| host.close())
    }

    /// Send `data` to the bot as JSON text (the host transport is text-only).
    pub fn send_data<T: Serialize + ?Sized>(&self, data: &T) -> Result<()> {
        let text = serde_json::to_string(data).map_err(|e| {
            tracing::warn!("sendData payload is not serializable: {e}");
            Error::Json(e)
        })?;
        self.forward(Capability::SendData, |host| host.send_data(&text))
    }

    pub fn open_link(&self, url: &str) -> Result<()> {
        self.forward(Capability::OpenLink, |host| host.open_link(url))
    }

    pub fn open_telegram_link(&self, url: &str) -> Result<()> {
        self.forward(Capability::OpenTelegramLink, |host| {
            host.open_telegram_link(url)
        })
    }

    pub fn switch_inline_query(&self, query: &str, scopes: &[ChatScope]) -> Result<()> {
        self.forward(Capability::SwitchInlineQuery, |host| {
            host.switch_inline_query(query, scopes)
        })
    }

    /// Guarded forward: ready, host present, member probed. Failures are logged and returned.
    fn forward(
        &self,
        capability: Capability,
        op: impl FnOnce(&dyn HostPort) -> HostResult,
    ) -> Result<()> {
        let result = self.host_for(capability).and_then(|host| {
            op(host.as_ref()).map_err(|e| Error::HostCall {
                method: capability.member(),
                message: e.message,
            })
        });
        if let Err(e) = &result {
            tracing::warn!("{} skipped: {e}", capability.member());
        }
        result
    }

    fn host_for(&self, capability: Capability) -> Result<Rc<dyn HostPort>> {
        let Some(host) = self.host.borrow().clone() else {
            return Err(Error::HostAbsent);
        };
        let Some(state) = self.state.get() else {
            return Err(Error::NotReady);
        };
        if !state.capabilities.has(capability) {
            return Err(Error::CapabilityAbsent(capability));
        }
        Ok(host)
    }
}

/// Best-effort lifecycle call during initialization; never fatal.
fn lifecycle_call(
    capabilities: &HostCapabilities,
    capability: Capability,
    call: impl FnOnce() -> HostResult,
) {
    if !capabilities.has(capability) {
        tracing::debug!("host has no `{capability}`; skipping");
        return;
    }
    if let Err(e) = call() {
        tracing::warn!("host `{capability}` failed during init: {e}");
    }
}
