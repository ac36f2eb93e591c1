//! Email-gated editing of the call-success dataset.

pub mod actions;
mod machine;
mod modal;

pub use machine::{
    FlowError, FlowMachine, FlowStage, ResolveRequest, SaveKind, SaveOutcome, SaveRequest, Ticket,
};
pub use modal::DatasetFlowModal;
