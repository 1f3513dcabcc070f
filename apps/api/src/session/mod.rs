// Session core: request lifecycle, current result, persisted history.
// The controller is the only writer of the store; handlers go through it.

pub mod controller;
pub mod handlers;
pub mod storage;
pub mod store;

pub use controller::AnalysisController;
pub use store::SessionStore;
