//! Help and support screen

use std::collections::BTreeSet;
use std::sync::Arc;

use libgymlog::catalog;
use libgymlog::Faq;
use tokio::sync::watch;
use tracing::info;

use crate::context::ScreenContext;
use crate::error::{Result, ScreenError};
use crate::screen::{Screen, TaskSlot};

#[derive(Debug, Clone, PartialEq)]
pub struct HelpUiState {
    pub faqs: Vec<Faq>,
    pub expanded_faq_ids: BTreeSet<u32>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub support_message_sent: bool,
}

pub struct HelpScreen {
    context: ScreenContext,
    state: Arc<watch::Sender<HelpUiState>>,
    confirmation: TaskSlot,
}

impl HelpScreen {
    pub fn new(context: ScreenContext) -> Self {
        let state = Arc::new(watch::Sender::new(HelpUiState {
            faqs: catalog::faqs(),
            expanded_faq_ids: BTreeSet::new(),
            is_loading: false,
            error_message: None,
            support_message_sent: false,
        }));

        Self {
            context,
            state,
            confirmation: TaskSlot::new(),
        }
    }

    /// Expand a collapsed FAQ or collapse an expanded one
    pub fn toggle_faq_expansion(&self, id: u32) {
        self.state.send_modify(|s| {
            if !s.expanded_faq_ids.remove(&id) {
                s.expanded_faq_ids.insert(id);
            }
        });
    }

    /// Accept a support message; the confirmation flag clears after a delay
    ///
    /// Another send before the flag clears restarts the delay.
    ///
    /// # Errors
    ///
    /// Returns `ScreenError::InvalidInput` if any field is blank.
    pub fn send_support_message(&self, name: &str, email: &str, message: &str) -> Result<()> {
        for (field, value) in [("name", name), ("email", email), ("message", message)] {
            if value.trim().is_empty() {
                return Err(ScreenError::InvalidInput(format!("{} is required", field)));
            }
        }

        info!(email = %email.trim(), chars = message.len(), "Support message sent");
        self.state.send_modify(|s| s.support_message_sent = true);

        let publisher = Arc::clone(&self.state);
        let display = self.context.timings.support_message_display;
        self.confirmation.replace(async move {
            tokio::time::sleep(display).await;
            publisher.send_modify(|s| s.support_message_sent = false);
        });
        Ok(())
    }
}

impl Screen for HelpScreen {
    type State = HelpUiState;

    fn subscribe(&self) -> watch::Receiver<HelpUiState> {
        self.state.subscribe()
    }
}
