pub mod midtrans;
pub mod storage;

pub use midtrans::{MidtransNotification, MidtransService, map_transaction_status};
pub use storage::StorageService;
