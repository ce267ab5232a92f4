#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use spice_storefront::checkout::{
    CheckoutOptions, LoadNotifier, PaymentCallbacks, PaymentFailure, PaymentWidget,
    PaymentWidgetFactory, ScriptHost, ScriptId, ScriptLoadError, WidgetError, WidgetEvents,
    WidgetResponse,
};
use spice_storefront::gateway::{GatewayError, GatewayOrder, GatewayOrderRequest, GatewayOrders};

/// How the fake document settles injected scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadBehavior {
    Load,
    Fail(&'static str),
    Hold,
    RejectInjection,
}

#[derive(Default)]
struct DocumentState {
    next_id: u64,
    sources: Vec<String>,
    live: Vec<ScriptId>,
    held: HashMap<ScriptId, LoadNotifier>,
}

pub struct FakeDocument {
    behavior: LoadBehavior,
    state: Mutex<DocumentState>,
}

impl FakeDocument {
    pub fn new(behavior: LoadBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            state: Mutex::new(DocumentState::default()),
        })
    }

    pub fn injections(&self) -> usize {
        self.state.lock().unwrap().sources.len()
    }

    pub fn sources(&self) -> Vec<String> {
        self.state.lock().unwrap().sources.clone()
    }

    pub fn live_scripts(&self) -> Vec<ScriptId> {
        self.state.lock().unwrap().live.clone()
    }

    /// Fire the `onload` of a held script. Returns false if nothing was held.
    pub fn finish_load(&self, id: ScriptId) -> bool {
        let notifier = self.state.lock().unwrap().held.remove(&id);
        match notifier {
            Some(notifier) => {
                notifier.loaded();
                true
            }
            None => false,
        }
    }
}

impl ScriptHost for FakeDocument {
    fn inject(&self, src: &str, notifier: LoadNotifier) -> Result<ScriptId, ScriptLoadError> {
        if self.behavior == LoadBehavior::RejectInjection {
            return Err(ScriptLoadError::Injection("document has no body".into()));
        }

        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = ScriptId(state.next_id);
        state.sources.push(src.to_string());
        state.live.push(id);

        match self.behavior {
            LoadBehavior::Load => notifier.loaded(),
            LoadBehavior::Fail(reason) => notifier.failed(reason),
            LoadBehavior::Hold => {
                state.held.insert(id, notifier);
            }
            LoadBehavior::RejectInjection => unreachable!(),
        }
        Ok(id)
    }

    fn remove(&self, id: ScriptId) {
        self.state.lock().unwrap().live.retain(|live| *live != id);
    }
}

/// What the fake widget does once opened.
#[derive(Debug, Clone)]
pub enum WidgetBehavior {
    Pay(WidgetResponse),
    Dismiss,
    FailConstruct(&'static str),
    FailOpen(&'static str),
    Hold,
    DropEvents,
}

#[derive(Default)]
pub struct WidgetLog {
    pub constructed: usize,
    pub opened: usize,
    pub closed: usize,
    pub options: Vec<CheckoutOptions>,
    held: Option<WidgetEvents>,
}

pub struct FakeWidgetFactory {
    behavior: WidgetBehavior,
    log: Arc<Mutex<WidgetLog>>,
}

impl FakeWidgetFactory {
    pub fn new(behavior: WidgetBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            log: Arc::new(Mutex::new(WidgetLog::default())),
        })
    }

    pub fn constructed(&self) -> usize {
        self.log.lock().unwrap().constructed
    }

    pub fn opened(&self) -> usize {
        self.log.lock().unwrap().opened
    }

    pub fn closed(&self) -> usize {
        self.log.lock().unwrap().closed
    }

    pub fn options(&self) -> Vec<CheckoutOptions> {
        self.log.lock().unwrap().options.clone()
    }

    /// Callbacks of a widget opened with [`WidgetBehavior::Hold`].
    pub fn take_held(&self) -> Option<WidgetEvents> {
        self.log.lock().unwrap().held.take()
    }
}

impl PaymentWidgetFactory for FakeWidgetFactory {
    fn construct(
        &self,
        options: &CheckoutOptions,
        events: WidgetEvents,
    ) -> Result<Box<dyn PaymentWidget>, WidgetError> {
        let mut log = self.log.lock().unwrap();
        log.options.push(options.clone());
        if let WidgetBehavior::FailConstruct(reason) = &self.behavior {
            return Err(WidgetError::Rejected(reason.to_string()));
        }
        log.constructed += 1;

        Ok(Box::new(FakeWidget {
            behavior: self.behavior.clone(),
            events: Some(events),
            log: Arc::clone(&self.log),
        }))
    }
}

struct FakeWidget {
    behavior: WidgetBehavior,
    events: Option<WidgetEvents>,
    log: Arc<Mutex<WidgetLog>>,
}

impl PaymentWidget for FakeWidget {
    fn open(&mut self) -> Result<(), WidgetError> {
        self.log.lock().unwrap().opened += 1;
        match &self.behavior {
            WidgetBehavior::Pay(response) => {
                if let Some(events) = self.events.take() {
                    events.handler(response.clone());
                }
            }
            WidgetBehavior::Dismiss => {
                if let Some(events) = self.events.take() {
                    events.dismiss();
                }
            }
            WidgetBehavior::FailOpen(reason) => {
                return Err(WidgetError::Rejected(reason.to_string()));
            }
            WidgetBehavior::Hold => {
                self.log.lock().unwrap().held = self.events.take();
            }
            WidgetBehavior::DropEvents => {
                self.events = None;
            }
            WidgetBehavior::FailConstruct(_) => unreachable!(),
        }
        Ok(())
    }

    fn close(&mut self) {
        self.log.lock().unwrap().closed += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Success(String, String, String),
    Failure(PaymentFailure),
}

/// Caller handlers that remember every invocation.
#[derive(Clone, Default)]
pub struct RecordingCallbacks {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl RecordingCallbacks {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl PaymentCallbacks for RecordingCallbacks {
    fn on_success(&self, payment_id: &str, order_id: &str, signature: &str) {
        self.calls.lock().unwrap().push(Call::Success(
            payment_id.to_string(),
            order_id.to_string(),
            signature.to_string(),
        ));
    }

    fn on_failure(&self, error: &PaymentFailure) {
        self.calls.lock().unwrap().push(Call::Failure(error.clone()));
    }
}

/// Gateway that issues random order ids without any network.
#[derive(Default)]
pub struct FakeGateway {
    requests: Mutex<Vec<GatewayOrderRequest>>,
    amount_override: Option<i64>,
}

impl FakeGateway {
    /// A provider that creates every order for `amount` regardless of the request.
    pub fn with_amount(amount: i64) -> Self {
        Self {
            amount_override: Some(amount),
            ..Default::default()
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl GatewayOrders for FakeGateway {
    async fn create_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrder, GatewayError> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request.clone());
        Ok(GatewayOrder {
            id: format!("order_{}", uuid::Uuid::new_v4().simple()),
            amount: self.amount_override.unwrap_or(request.amount),
            currency: request.currency,
            status: "created".into(),
        })
    }

    fn name(&self) -> &str {
        "fake"
    }
}

pub fn widget_response(payment_id: &str, order_id: &str, signature: &str) -> WidgetResponse {
    WidgetResponse {
        razorpay_payment_id: payment_id.into(),
        razorpay_order_id: order_id.into(),
        razorpay_signature: signature.into(),
    }
}

/// Yield to the runtime until `cond` holds.
pub async fn until(mut cond: impl FnMut() -> bool) {
    for _ in 0..200 {
        if cond() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}
