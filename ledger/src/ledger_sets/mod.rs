mod any;
mod confirmed;

pub use any::{AnyReceivableIterator, AnySet, BorrowingAnySet, OwningAnySet};
pub use confirmed::{BorrowingConfirmedSet, ConfirmedSet, OwningConfirmedSet};

use opal_types::{Account, AccountInfo, Amount, BlockHash};

/// Lookup surface shared by the "any" and "confirmed" views
pub trait LedgerSet {
    fn block_exists(&self, hash: &BlockHash) -> bool;
    fn account_receivable(&self, account: &Account) -> Amount;
    fn account_balance(&self, account: &Account) -> Amount;
    fn get_account(&self, account: &Account) -> Option<AccountInfo>;
}
