//! Notification action dispatch.
//!
//! An action bundles up to three effects against distinct systems:
//! a domain mutation through a gateway, cascade notification creation
//! through the store, and a read transition on the originating record.
//! There is no cross-system transaction; the dispatcher sequences the
//! effects and reports exactly how far it got.

mod dispatcher;
mod fanout;
mod gateway;
mod navigator;
mod outcome;

pub use dispatcher::ActionDispatcher;
pub use fanout::budget_decision_drafts;
pub use gateway::{BudgetGateway, DecreeGateway};
pub use navigator::{Navigator, NoopNavigator};
pub use outcome::{ActionError, ActionReceipt, ActionResult, ActionStep, ActionTrace};
