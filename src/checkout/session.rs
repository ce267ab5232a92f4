use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::order::{CheckoutOrder, CustomerInfo};
use super::outcome::{FailureReason, PaymentCallbacks, PaymentFailure, PaymentOutcome};
use super::script::{ScriptHost, ScriptLoader};
use super::widget::{
    CheckoutOptions, CheckoutSettings, PaymentWidget, PaymentWidgetFactory, WidgetEvent,
    WidgetEvents,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Loading,
    Configuring,
    Open,
    Succeeded,
    Failed(FailureReason),
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Succeeded | SessionState::Failed(_))
    }

    pub fn can_transition_to(&self, next: &SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Idle, Loading)
                | (Idle, Failed(FailureReason::MissingGatewayOrder))
                | (Loading, Configuring)
                | (Loading, Failed(FailureReason::ScriptLoadFailed))
                | (Configuring, Open)
                | (Configuring, Failed(FailureReason::ConstructionError))
                | (Open, Succeeded)
                | (Open, Failed(FailureReason::UserCancelled))
        )
    }
}

/// Closes the modal if the session goes away while it is still showing.
struct OpenWidget {
    widget: Box<dyn PaymentWidget>,
    settled: bool,
}

impl Drop for OpenWidget {
    fn drop(&mut self) {
        if !self.settled {
            tracing::debug!("closing payment widget on teardown");
            self.widget.close();
        }
    }
}

/// Turns one order into one widget session and one terminal outcome.
pub struct CheckoutSession {
    order: CheckoutOrder,
    customer: CustomerInfo,
    settings: CheckoutSettings,
    host: Arc<dyn ScriptHost>,
    factory: Arc<dyn PaymentWidgetFactory>,
    state: watch::Sender<SessionState>,
}

impl CheckoutSession {
    pub fn new(
        order: CheckoutOrder,
        customer: CustomerInfo,
        settings: CheckoutSettings,
        host: Arc<dyn ScriptHost>,
        factory: Arc<dyn PaymentWidgetFactory>,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::Idle);
        Self {
            order,
            customer,
            settings,
            host,
            factory,
            state,
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Run the session to completion and report the outcome to `callbacks`
    /// exactly once. The script is removed before this returns.
    pub async fn run<C: PaymentCallbacks + ?Sized>(self, callbacks: &C) -> PaymentOutcome {
        let mut loader = ScriptLoader::new(Arc::clone(&self.host), self.settings.script_url.clone());
        let outcome = self.drive(&mut loader).await;
        outcome.dispatch(callbacks);
        outcome
    }

    /// Start the session on the runtime. The returned handle owns the
    /// injected script until it is unmounted.
    pub fn mount<C>(self, callbacks: C) -> MountedCheckout
    where
        C: PaymentCallbacks + 'static,
    {
        let state = self.state.subscribe();
        let order_id = self.order.id;
        let task = tokio::spawn(async move {
            let mut loader =
                ScriptLoader::new(Arc::clone(&self.host), self.settings.script_url.clone());
            let outcome = self.drive(&mut loader).await;
            outcome.dispatch(&callbacks);
            Completed { outcome, loader }
        });
        tracing::debug!(order_id = %order_id, "checkout mounted");

        MountedCheckout {
            order_id,
            task: Some(task),
            completed: None,
            state,
        }
    }

    fn advance(&self, next: SessionState) {
        let current = self.state();
        debug_assert!(
            current.can_transition_to(&next),
            "invalid checkout transition {current:?} -> {next:?}"
        );
        tracing::debug!(order_id = %self.order.id, from = ?current, to = ?next, "checkout transition");
        self.state.send_replace(next);
    }

    fn fail(&self, failure: PaymentFailure) -> PaymentOutcome {
        self.advance(SessionState::Failed(failure.reason()));
        tracing::info!(
            order_id = %self.order.id,
            reason = failure.reason().as_str(),
            detail = failure.detail().unwrap_or("-"),
            "checkout failed"
        );
        PaymentOutcome::Failed(failure)
    }

    async fn drive(&self, loader: &mut ScriptLoader) -> PaymentOutcome {
        if self.order.gateway_order().is_none() {
            return self.fail(PaymentFailure::MissingGatewayOrder);
        }

        self.advance(SessionState::Loading);
        if let Err(err) = loader.ensure_loaded().await {
            return self.fail(PaymentFailure::ScriptLoadFailed(err.to_string()));
        }

        self.advance(SessionState::Configuring);
        let options = match CheckoutOptions::build(&self.order, &self.customer, &self.settings) {
            Ok(options) => options,
            Err(failure) => return self.fail(failure),
        };

        let (events, outcome_rx) = WidgetEvents::channel();
        let widget = match self.factory.construct(&options, events) {
            Ok(widget) => widget,
            Err(err) => return self.fail(PaymentFailure::WidgetConstruction(err.to_string())),
        };
        let mut widget = OpenWidget {
            widget,
            settled: false,
        };
        if let Err(err) = widget.widget.open() {
            widget.settled = true;
            return self.fail(PaymentFailure::WidgetConstruction(err.to_string()));
        }
        self.advance(SessionState::Open);

        let event = outcome_rx.await;
        widget.settled = true;

        match event {
            Ok(WidgetEvent::Paid(response)) => {
                self.advance(SessionState::Succeeded);
                tracing::info!(
                    order_id = %self.order.id,
                    payment_id = %response.razorpay_payment_id,
                    "checkout payment reported"
                );
                PaymentOutcome::Succeeded(response.into())
            }
            Ok(WidgetEvent::Dismissed) => self.fail(PaymentFailure::UserCancelled),
            Err(_) => {
                tracing::warn!(order_id = %self.order.id, "payment widget closed without reporting");
                self.fail(PaymentFailure::UserCancelled)
            }
        }
    }
}

struct Completed {
    outcome: PaymentOutcome,
    loader: ScriptLoader,
}

/// A running checkout bound to the lifetime of its surface.
///
/// Unmounting or dropping it stops the session and suppresses any callback
/// that has not fired yet. `unmount().await` has removed the injected script
/// by the time it returns. A plain drop removes it at once only if the
/// outcome was already collected; otherwise the script goes when the runtime
/// next polls the aborted task.
pub struct MountedCheckout {
    order_id: uuid::Uuid,
    task: Option<JoinHandle<Completed>>,
    completed: Option<Completed>,
    state: watch::Receiver<SessionState>,
}

impl MountedCheckout {
    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Wait until the session reaches a state matching `predicate`. Returns
    /// the state, or `None` if the session stopped first.
    pub async fn wait_for_state<F>(&mut self, mut predicate: F) -> Option<SessionState>
    where
        F: FnMut(&SessionState) -> bool,
    {
        match self.state.wait_for(|state| predicate(state)).await {
            Ok(state) => Some(*state),
            Err(_) => None,
        }
    }

    /// Wait for the terminal outcome. `None` if the session task was lost.
    pub async fn outcome(&mut self) -> Option<&PaymentOutcome> {
        if let Some(task) = self.task.take() {
            match task.await {
                Ok(completed) => self.completed = Some(completed),
                Err(err) => {
                    tracing::warn!(order_id = %self.order_id, error = %err, "checkout task ended abnormally");
                }
            }
        }
        self.completed.as_ref().map(|completed| &completed.outcome)
    }

    pub async fn unmount(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            // Either the task finished first and hands back its loader, or
            // the abort dropped loader and widget inside it.
            if let Ok(mut completed) = task.await {
                completed.loader.release();
            }
        }
        if let Some(mut completed) = self.completed.take() {
            completed.loader.release();
        }
        tracing::debug!(order_id = %self.order_id, "checkout unmounted");
    }
}

impl Drop for MountedCheckout {
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
        if let Some(completed) = self.completed.as_mut() {
            completed.loader.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_do_not_transition() {
        let all = [
            SessionState::Idle,
            SessionState::Loading,
            SessionState::Configuring,
            SessionState::Open,
            SessionState::Succeeded,
            SessionState::Failed(FailureReason::UserCancelled),
            SessionState::Failed(FailureReason::ScriptLoadFailed),
        ];
        for from in all.iter().filter(|s| s.is_terminal()) {
            for to in &all {
                assert!(!from.can_transition_to(to), "{from:?} -> {to:?}");
            }
        }
    }

    #[test]
    fn missing_order_fails_from_idle_only() {
        let missing = SessionState::Failed(FailureReason::MissingGatewayOrder);
        assert!(SessionState::Idle.can_transition_to(&missing));
        assert!(!SessionState::Loading.can_transition_to(&missing));
        assert!(!SessionState::Idle.can_transition_to(&SessionState::Configuring));
    }

    #[test]
    fn widget_can_only_be_opened_after_loading() {
        assert!(!SessionState::Idle.can_transition_to(&SessionState::Open));
        assert!(!SessionState::Loading.can_transition_to(&SessionState::Open));
        assert!(SessionState::Configuring.can_transition_to(&SessionState::Open));
    }
}
