//! Source-chain scanner: polls a watched address for unspent outputs, classifies staking
//! outputs and turns them into deposit candidates for the relay.

pub mod errors;
pub mod explorer;
pub mod scanner;

pub use errors::ScanError;
pub use explorer::{HttpExplorerClient, UtxoEntry, UtxoSource};
pub use scanner::SourceScanner;
