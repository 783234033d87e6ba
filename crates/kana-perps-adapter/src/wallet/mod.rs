/*
[INPUT]:  Transaction payloads and connected wallet state
[OUTPUT]: Signed/submitted transactions, confirmations and wallet errors
[POS]:    Wallet layer - external signing and chain confirmation collaborators
[UPDATE]: When wallet integration or confirmation flow changes
*/

pub mod mock;
pub mod signer;

pub use mock::MockWallet;
pub use signer::{NetworkInfo, PendingTransaction, TransactionConfirmer, WalletError, WalletSigner};
