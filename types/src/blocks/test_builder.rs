use super::{
    Block, BlockDetails, BlockSideband, ChangeBlockArgs, OpenBlockArgs, ReceiveBlockArgs,
    SavedBlock, SendBlockArgs, StateBlockArgs,
};
use crate::{
    Account, Amount, BlockHash, Epoch, Link, PrivateKey, PublicKey, UnixTimestamp, WorkNonce,
    private_key::TEST_KEY,
};

/// Creates blocks for tests. The defaults form valid, signed blocks with
/// distinct dummy fields.
pub struct TestBlockBuilder {}

impl TestBlockBuilder {
    pub fn state() -> TestStateBlockBuilder {
        TestStateBlockBuilder {
            key: TEST_KEY.clone(),
            previous: BlockHash::from(1),
            representative: PublicKey::from(2),
            balance: Amount::raw(420),
            link: Link::from(111),
            work: WorkNonce::new(0x10f2c),
            is_send: false,
            is_receive: false,
            is_epoch: false,
        }
    }

    pub fn legacy_send() -> TestLegacySendBlockBuilder {
        TestLegacySendBlockBuilder {
            key: TEST_KEY.clone(),
            previous: BlockHash::from(1),
            destination: Account::from(2),
            balance: Amount::raw(420),
            work: WorkNonce::new(0x10f2c),
        }
    }

    pub fn legacy_receive() -> TestLegacyReceiveBlockBuilder {
        TestLegacyReceiveBlockBuilder {
            key: TEST_KEY.clone(),
            previous: BlockHash::from(1),
            source: BlockHash::from(2),
            work: WorkNonce::new(0x10f2c),
        }
    }

    pub fn legacy_open() -> TestLegacyOpenBlockBuilder {
        TestLegacyOpenBlockBuilder {
            key: TEST_KEY.clone(),
            source: BlockHash::from(1),
            representative: None,
            work: WorkNonce::new(0x10f2c),
        }
    }

    pub fn legacy_change() -> TestLegacyChangeBlockBuilder {
        TestLegacyChangeBlockBuilder {
            key: TEST_KEY.clone(),
            previous: BlockHash::from(1),
            representative: PublicKey::from(2),
            work: WorkNonce::new(0x10f2c),
        }
    }
}

pub struct TestStateBlockBuilder {
    key: PrivateKey,
    previous: BlockHash,
    representative: PublicKey,
    balance: Amount,
    link: Link,
    work: WorkNonce,
    is_send: bool,
    is_receive: bool,
    is_epoch: bool,
}

impl TestStateBlockBuilder {
    pub fn key(mut self, key: &PrivateKey) -> Self {
        self.key = key.clone();
        self
    }

    pub fn previous(mut self, previous: impl Into<BlockHash>) -> Self {
        self.previous = previous.into();
        self
    }

    pub fn representative(mut self, representative: impl Into<PublicKey>) -> Self {
        self.representative = representative.into();
        self
    }

    pub fn balance(mut self, balance: impl Into<Amount>) -> Self {
        self.balance = balance.into();
        self
    }

    pub fn link(mut self, link: impl Into<Link>) -> Self {
        self.link = link.into();
        self
    }

    pub fn work(mut self, work: impl Into<WorkNonce>) -> Self {
        self.work = work.into();
        self
    }

    pub fn is_send(mut self) -> Self {
        self.is_send = true;
        self.is_receive = false;
        self
    }

    pub fn is_receive(mut self) -> Self {
        self.is_receive = true;
        self.is_send = false;
        self
    }

    pub fn is_epoch(mut self) -> Self {
        self.is_epoch = true;
        self
    }

    pub fn build(self) -> Block {
        StateBlockArgs {
            key: &self.key,
            previous: self.previous,
            representative: self.representative,
            balance: self.balance,
            link: self.link,
            work: self.work,
        }
        .into()
    }

    pub fn build_saved(self) -> SavedBlock {
        let account = self.key.account();
        let balance = self.balance;
        let details = BlockDetails::new(Epoch::Epoch0, self.is_send, self.is_receive, self.is_epoch);
        let height = if self.previous.is_zero() { 1 } else { 2 };
        let block = self.build();
        SavedBlock::new(
            block,
            BlockSideband {
                successor: BlockHash::ZERO,
                account,
                balance,
                height,
                timestamp: UnixTimestamp::new_test_instance(),
                details,
                source_epoch: Epoch::Epoch0,
            },
        )
    }
}

pub struct TestLegacySendBlockBuilder {
    key: PrivateKey,
    previous: BlockHash,
    destination: Account,
    balance: Amount,
    work: WorkNonce,
}

impl TestLegacySendBlockBuilder {
    pub fn key(mut self, key: &PrivateKey) -> Self {
        self.key = key.clone();
        self
    }

    pub fn previous(mut self, previous: impl Into<BlockHash>) -> Self {
        self.previous = previous.into();
        self
    }

    pub fn destination(mut self, destination: impl Into<Account>) -> Self {
        self.destination = destination.into();
        self
    }

    pub fn balance(mut self, balance: impl Into<Amount>) -> Self {
        self.balance = balance.into();
        self
    }

    pub fn work(mut self, work: impl Into<WorkNonce>) -> Self {
        self.work = work.into();
        self
    }

    pub fn build(self) -> Block {
        SendBlockArgs {
            key: &self.key,
            previous: self.previous,
            destination: self.destination,
            balance: self.balance,
            work: self.work,
        }
        .into()
    }

    pub fn build_saved(self) -> SavedBlock {
        let account = self.key.account();
        let balance = self.balance;
        let block = self.build();
        SavedBlock::new(
            block,
            BlockSideband {
                successor: BlockHash::ZERO,
                account,
                balance,
                height: 2,
                timestamp: UnixTimestamp::new_test_instance(),
                details: BlockDetails::default(),
                source_epoch: Epoch::Epoch0,
            },
        )
    }
}

pub struct TestLegacyReceiveBlockBuilder {
    key: PrivateKey,
    previous: BlockHash,
    source: BlockHash,
    work: WorkNonce,
}

impl TestLegacyReceiveBlockBuilder {
    pub fn key(mut self, key: &PrivateKey) -> Self {
        self.key = key.clone();
        self
    }

    pub fn previous(mut self, previous: impl Into<BlockHash>) -> Self {
        self.previous = previous.into();
        self
    }

    pub fn source(mut self, source: impl Into<BlockHash>) -> Self {
        self.source = source.into();
        self
    }

    pub fn work(mut self, work: impl Into<WorkNonce>) -> Self {
        self.work = work.into();
        self
    }

    pub fn build(self) -> Block {
        ReceiveBlockArgs {
            key: &self.key,
            previous: self.previous,
            source: self.source,
            work: self.work,
        }
        .into()
    }

    pub fn build_saved(self) -> SavedBlock {
        let account = self.key.account();
        let block = self.build();
        SavedBlock::new(
            block,
            BlockSideband {
                successor: BlockHash::ZERO,
                account,
                balance: Amount::raw(420),
                height: 2,
                timestamp: UnixTimestamp::new_test_instance(),
                details: BlockDetails::default(),
                source_epoch: Epoch::Epoch0,
            },
        )
    }
}

pub struct TestLegacyOpenBlockBuilder {
    key: PrivateKey,
    source: BlockHash,
    representative: Option<PublicKey>,
    work: WorkNonce,
}

impl TestLegacyOpenBlockBuilder {
    pub fn key(mut self, key: &PrivateKey) -> Self {
        self.key = key.clone();
        self
    }

    pub fn source(mut self, source: impl Into<BlockHash>) -> Self {
        self.source = source.into();
        self
    }

    pub fn representative(mut self, representative: impl Into<PublicKey>) -> Self {
        self.representative = Some(representative.into());
        self
    }

    pub fn work(mut self, work: impl Into<WorkNonce>) -> Self {
        self.work = work.into();
        self
    }

    pub fn build(self) -> Block {
        let representative = self.representative.unwrap_or_else(|| self.key.public_key());
        OpenBlockArgs {
            key: &self.key,
            source: self.source,
            representative,
            work: self.work,
        }
        .into()
    }

    pub fn build_saved(self) -> SavedBlock {
        let account = self.key.account();
        let block = self.build();
        SavedBlock::new(
            block,
            BlockSideband {
                successor: BlockHash::ZERO,
                account,
                balance: Amount::raw(420),
                height: 1,
                timestamp: UnixTimestamp::new_test_instance(),
                details: BlockDetails::default(),
                source_epoch: Epoch::Epoch0,
            },
        )
    }
}

pub struct TestLegacyChangeBlockBuilder {
    key: PrivateKey,
    previous: BlockHash,
    representative: PublicKey,
    work: WorkNonce,
}

impl TestLegacyChangeBlockBuilder {
    pub fn key(mut self, key: &PrivateKey) -> Self {
        self.key = key.clone();
        self
    }

    pub fn previous(mut self, previous: impl Into<BlockHash>) -> Self {
        self.previous = previous.into();
        self
    }

    pub fn representative(mut self, representative: impl Into<PublicKey>) -> Self {
        self.representative = representative.into();
        self
    }

    pub fn work(mut self, work: impl Into<WorkNonce>) -> Self {
        self.work = work.into();
        self
    }

    pub fn build(self) -> Block {
        ChangeBlockArgs {
            key: &self.key,
            previous: self.previous,
            representative: self.representative,
            work: self.work,
        }
        .into()
    }

    pub fn build_saved(self) -> SavedBlock {
        let account = self.key.account();
        let block = self.build();
        SavedBlock::new(
            block,
            BlockSideband {
                successor: BlockHash::ZERO,
                account,
                balance: Amount::raw(420),
                height: 2,
                timestamp: UnixTimestamp::new_test_instance(),
                details: BlockDetails::default(),
                source_epoch: Epoch::Epoch0,
            },
        )
    }
}
