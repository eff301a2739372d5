//! Overlay service
//!
//! Entry point a host window installs in its key dispatch chain. The service
//! checks once whether the modal engine is present, registers itself, and
//! from then on routes every key event: overlay input to the open session,
//! everything else through the trigger interceptor.

use std::cell::OnceCell;
use std::rc::Rc;

use crate::config::OverlaySettings;
use crate::event_loop::EventLoop;
use crate::host::{Host, WindowId};
use crate::interceptor::KeyInterceptor;
use crate::key::KeyEvent;
use crate::manager::OverlaySessionManager;
use crate::suppression::SuppressionHandle;

/// ## service/ Invariants
///
/// - Engine availability is probed once per service.
/// - An unregistered service passes every event through.
/// - At most one registration per service.

pub struct OverlayService {
    host: Rc<dyn Host>,
    window: WindowId,
    available: OnceCell<bool>,
    registered: bool,
    manager: OverlaySessionManager,
    interceptor: KeyInterceptor,
}

impl OverlayService {
    /// Service for `window`, configured from the host's globals
    #[must_use]
    pub fn new(host: Rc<dyn Host>, window: WindowId, events: EventLoop) -> Self {
        let settings = OverlaySettings::load(&*host);
        Self::with_settings(host, window, events, settings)
    }

    #[must_use]
    pub fn with_settings(
        host: Rc<dyn Host>,
        window: WindowId,
        events: EventLoop,
        settings: OverlaySettings,
    ) -> Self {
        let suppression = SuppressionHandle::new();
        Self {
            manager: OverlaySessionManager::new(
                Rc::clone(&host),
                window,
                events,
                settings,
                suppression.clone(),
            ),
            interceptor: KeyInterceptor::new(suppression),
            host,
            window,
            available: OnceCell::new(),
            registered: false,
        }
    }

    /// Whether the modal engine is present; probed on first call
    #[must_use]
    pub fn is_available(&self) -> bool {
        *self.available.get_or_init(|| {
            let available = self.host.is_available();
            if !available {
                tracing::warn!("modal editing engine unavailable, overlay disabled");
            }
            available
        })
    }

    /// Start intercepting keys. Returns `false` when the engine is missing
    /// or the service is already registered.
    pub fn initialize(&mut self) -> bool {
        if self.registered {
            tracing::debug!(window = ?self.window, "overlay service already registered");
            return false;
        }
        if !self.is_available() {
            return false;
        }
        self.registered = true;
        tracing::info!(window = ?self.window, "overlay service registered");
        true
    }

    /// Stop intercepting keys and cancel any open overlay
    pub fn dispose(&mut self) {
        if !self.registered {
            return;
        }
        self.registered = false;
        self.manager.cancel();
        tracing::info!(window = ?self.window, "overlay service removed");
    }

    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    #[must_use]
    pub fn manager(&self) -> &OverlaySessionManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut OverlaySessionManager {
        &mut self.manager
    }

    /// Route one key event. Returns `true` when the overlay consumed it.
    pub fn dispatch_key_event(&mut self, event: &mut KeyEvent) -> bool {
        if !self.registered {
            return false;
        }
        if self.interceptor.dispatch(event, &mut self.manager) {
            return true;
        }
        let from_overlay = event
            .source
            .is_some_and(|c| self.manager.is_overlay_component(c));
        if from_overlay {
            return self.manager.handle_overlay_key(event);
        }
        false
    }

    /// The window's focus moved away from the overlay input
    pub fn focus_lost(&mut self) {
        self.manager.focus_lost();
    }
}

impl Drop for OverlayService {
    fn drop(&mut self) {
        self.dispose();
    }
}
