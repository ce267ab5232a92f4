//! Payment initiation: load the provider's checkout script, open its widget
//! for one order, and reduce the widget's callbacks to a single outcome.
//!
//! The browser document and the widget constructor are injected as
//! [`ScriptHost`] and [`PaymentWidgetFactory`].

pub mod order;
pub mod outcome;
pub mod script;
pub mod session;
pub mod widget;

pub use order::{CheckoutOrder, Currency, CustomerInfo};
pub use outcome::{
    FailureReason, Notice, NoticeSeverity, PaymentCallbacks, PaymentFailure, PaymentOutcome,
    PaymentSuccess,
};
pub use script::{
    CHECKOUT_SCRIPT_URL, LoadNotifier, ScriptHost, ScriptId, ScriptLoadError, ScriptLoader,
};
pub use session::{CheckoutSession, MountedCheckout, SessionState};
pub use widget::{
    CheckoutOptions, CheckoutSettings, PaymentWidget, PaymentWidgetFactory, Prefill, Theme,
    WidgetError, WidgetEvent, WidgetEvents, WidgetResponse,
};
