pub mod record;
pub mod signing;

pub use record::{SignatureEntry, TxRecord, TxStage};
pub use signing::SigningMethod;
