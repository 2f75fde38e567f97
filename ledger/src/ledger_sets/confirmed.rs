use opal_nullable_kv::{ReadTransaction, Transaction};
use opal_store::Store;
use opal_types::{
    Account, AccountInfo, Amount, BlockHash, ConfirmationHeightInfo, PendingInfo, PendingKey,
    SavedBlock,
};

use super::{AnyReceivableIterator, LedgerSet};

pub trait ConfirmedSet: LedgerSet {
    fn get_block(&self, hash: &BlockHash) -> Option<SavedBlock>;
    fn block_exists_or_pruned(&self, hash: &BlockHash) -> bool;
    fn block_height(&self, hash: &BlockHash) -> Option<u64> {
        self.get_block(hash).map(|b| b.height())
    }
    fn get_conf_info(&self, account: &Account) -> Option<ConfirmationHeightInfo>;
    fn account_head(&self, account: &Account) -> Option<BlockHash> {
        self.get_conf_info(account).map(|info| info.frontier)
    }
}

/// Only blocks that are confirmed.
/// It owns the DB transaction.
pub struct OwningConfirmedSet<'a> {
    store: &'a Store,
    tx: ReadTransaction,
}

impl<'a> OwningConfirmedSet<'a> {
    pub fn new(store: &'a Store, tx: ReadTransaction) -> Self {
        Self { store, tx }
    }

    fn borrowing_set(&'a self) -> BorrowingConfirmedSet<'a> {
        BorrowingConfirmedSet {
            store: self.store,
            tx: &self.tx,
        }
    }

    fn first_receivable_lower_bound(
        &self,
        account: Account,
        send_hash: BlockHash,
    ) -> Option<(PendingKey, PendingInfo)> {
        let mut it = self
            .store
            .pending
            .iter_range(&self.tx, PendingKey::new(account, send_hash)..);

        let (mut key, mut info) = it.next()?;

        while !self.block_exists(&key.send_block_hash) {
            (key, info) = it.next()?;
        }

        Some((key, info))
    }

    /// Returns the next receivable entry for an account greater than or
    /// equal to 'account'
    pub fn receivable_lower_bound<'txn>(
        &'a self,
        account: Account,
    ) -> ConfirmedReceivableIterator<'txn>
    where
        'a: 'txn,
    {
        ConfirmedReceivableIterator::<'txn> {
            set: self,
            requested_account: account,
            actual_account: None,
            next_hash: Some(BlockHash::ZERO),
        }
    }

    pub fn frontiers(&self) -> impl Iterator<Item = (Account, BlockHash)> {
        self.store
            .confirmation_height
            .iter(&self.tx)
            .map(|(account, conf_info)| (account, conf_info.frontier))
    }
}

impl LedgerSet for OwningConfirmedSet<'_> {
    fn block_exists(&self, hash: &BlockHash) -> bool {
        self.borrowing_set().block_exists(hash)
    }

    fn account_receivable(&self, account: &Account) -> Amount {
        self.borrowing_set().account_receivable(account)
    }

    fn account_balance(&self, account: &Account) -> Amount {
        self.borrowing_set().account_balance(account)
    }

    fn get_account(&self, account: &Account) -> Option<AccountInfo> {
        self.borrowing_set().get_account(account)
    }
}

impl ConfirmedSet for OwningConfirmedSet<'_> {
    fn get_block(&self, hash: &BlockHash) -> Option<SavedBlock> {
        self.borrowing_set().get_block(hash)
    }

    fn block_exists_or_pruned(&self, hash: &BlockHash) -> bool {
        self.borrowing_set().block_exists_or_pruned(hash)
    }

    fn get_conf_info(&self, account: &Account) -> Option<ConfirmationHeightInfo> {
        self.borrowing_set().get_conf_info(account)
    }
}

/// Only blocks that are confirmed.
/// It borrows the DB transaction.
pub struct BorrowingConfirmedSet<'a> {
    store: &'a Store,
    tx: &'a dyn Transaction,
}

impl<'a> BorrowingConfirmedSet<'a> {
    pub fn new(store: &'a Store, tx: &'a dyn Transaction) -> Self {
        Self { store, tx }
    }

    /// Returns the next receivable entry for the account 'account' with
    /// hash greater than 'hash'
    fn account_receivable_upper_bound<'txn>(
        &self,
        account: Account,
        hash: BlockHash,
    ) -> AnyReceivableIterator<'txn>
    where
        'a: 'txn,
    {
        AnyReceivableIterator::<'txn>::new(
            self.tx,
            &self.store.pending,
            account,
            Some(account),
            hash.inc(),
        )
    }
}

impl LedgerSet for BorrowingConfirmedSet<'_> {
    fn block_exists(&self, hash: &BlockHash) -> bool {
        self.get_block(hash).is_some()
    }

    fn account_receivable(&self, account: &Account) -> Amount {
        let mut result = Amount::ZERO;

        for (key, info) in self.account_receivable_upper_bound(*account, BlockHash::ZERO) {
            if self.block_exists_or_pruned(&key.send_block_hash) {
                result += info.amount;
            }
        }

        result
    }

    fn account_balance(&self, account: &Account) -> Amount {
        let Some(head) = self.account_head(account) else {
            return Amount::ZERO;
        };

        self.get_block(&head)
            .map(|b| b.balance())
            .unwrap_or_default()
    }

    /// Account information as of the cemented frontier
    fn get_account(&self, account: &Account) -> Option<AccountInfo> {
        let conf_info = self.get_conf_info(account)?;
        let frontier = self.store.block.get(self.tx, &conf_info.frontier)?;

        let rep_block_hash = crate::RepresentativeBlockFinder::new(self.tx, self.store)
            .find_rep_block(conf_info.frontier);
        let representative = self
            .store
            .block
            .get(self.tx, &rep_block_hash)
            .and_then(|b| b.representative_field())
            .unwrap_or_default();

        // The open block is at height one, which is confirmed whenever a
        // confirmation height entry exists at all
        let open_block = self
            .store
            .account
            .get(self.tx, account)
            .map(|info| info.open_block)
            .unwrap_or_default();

        Some(AccountInfo {
            head: conf_info.frontier,
            representative,
            open_block,
            balance: frontier.balance(),
            modified: frontier.timestamp(),
            block_count: conf_info.height,
            epoch: frontier.epoch(),
        })
    }
}

impl ConfirmedSet for BorrowingConfirmedSet<'_> {
    fn get_block(&self, hash: &BlockHash) -> Option<SavedBlock> {
        if hash.is_zero() {
            return None;
        }
        let block = self.store.block.get(self.tx, hash)?;

        let conf_info = self
            .store
            .confirmation_height
            .get(self.tx, &block.account())?;

        if block.height() <= conf_info.height {
            Some(block)
        } else {
            None
        }
    }

    fn block_exists_or_pruned(&self, hash: &BlockHash) -> bool {
        if hash.is_zero() {
            return false;
        }
        // Only cemented block bodies are pruned
        if self.store.pruned.exists(self.tx, hash) {
            return true;
        }
        self.block_exists(hash)
    }

    fn get_conf_info(&self, account: &Account) -> Option<ConfirmationHeightInfo> {
        self.store.confirmation_height.get(self.tx, account)
    }
}

pub struct ConfirmedReceivableIterator<'a> {
    pub set: &'a OwningConfirmedSet<'a>,
    pub requested_account: Account,
    pub actual_account: Option<Account>,
    pub next_hash: Option<BlockHash>,
}

impl Iterator for ConfirmedReceivableIterator<'_> {
    type Item = (PendingKey, PendingInfo);

    fn next(&mut self) -> Option<Self::Item> {
        let hash = self.next_hash?;
        let account = self.actual_account.unwrap_or(self.requested_account);
        let (key, info) = self.set.first_receivable_lower_bound(account, hash)?;
        match self.actual_account {
            Some(account) => {
                if key.receiving_account == account {
                    self.next_hash = key.send_block_hash.inc();
                    Some((key, info))
                } else {
                    None
                }
            }
            None => {
                self.actual_account = Some(key.receiving_account);
                self.next_hash = key.send_block_hash.inc();
                Some((key, info))
            }
        }
    }
}
