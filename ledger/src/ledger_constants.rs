use std::sync::LazyLock;

use opal_types::{
    Account, Amount, Block, BlockDetails, BlockHash, BlockSideband, DEV_GENESIS_KEY, Epoch,
    Epochs, JsonOpenBlock, OpenBlock, OpenBlockArgs, PublicKey, SavedBlock, UnixTimestamp,
    WorkThresholds,
};

/// Network wide constants the ledger engine consumes: the genesis block,
/// the epoch upgrade registry and the work verification thresholds.
pub struct LedgerConstants {
    pub work: WorkThresholds,
    pub epochs: Epochs,
    pub genesis_block: SavedBlock,
    pub genesis_account: Account,
    pub genesis_amount: Amount,
    pub burn_account: Account,
}

impl LedgerConstants {
    pub fn new(work: WorkThresholds, genesis: Block, epoch_v2_signer: PublicKey) -> Self {
        let genesis_account = genesis
            .account_field()
            .expect("genesis block must carry its account");

        let mut epochs = Epochs::new();
        epochs.add(
            Epoch::Epoch1,
            genesis_account.into(),
            epoch_link("epoch v1 block"),
        );
        epochs.add(Epoch::Epoch2, epoch_v2_signer, epoch_link("epoch v2 block"));

        let genesis_block = SavedBlock::new(
            genesis,
            BlockSideband {
                successor: BlockHash::ZERO,
                account: genesis_account,
                balance: Amount::MAX,
                height: 1,
                timestamp: UnixTimestamp::ZERO,
                details: BlockDetails::default(),
                source_epoch: Epoch::Epoch0,
            },
        );

        Self {
            work,
            epochs,
            genesis_account,
            genesis_block,
            genesis_amount: Amount::MAX,
            burn_account: Account::ZERO,
        }
    }

    pub fn live() -> Self {
        let genesis: OpenBlock = serde_json::from_str::<JsonOpenBlock>(LIVE_GENESIS_DATA)
            .expect("live genesis data is invalid")
            .into();
        let genesis_account = genesis.account();
        Self::new(
            WorkThresholds::publish_full(),
            Block::LegacyOpen(genesis),
            genesis_account.into(),
        )
    }

    pub fn dev() -> Self {
        let genesis_account = DEV_GENESIS_KEY.account();
        Self::new(
            WorkThresholds::publish_dev(),
            dev_genesis_open(),
            genesis_account.into(),
        )
    }

    /// Development constants with work verification disabled
    pub fn unit_test() -> Self {
        let genesis_account = DEV_GENESIS_KEY.account();
        Self::new(
            WorkThresholds::disabled(),
            dev_genesis_open(),
            genesis_account.into(),
        )
    }
}

fn epoch_link(text: &str) -> opal_types::Link {
    let mut bytes = [0u8; 32];
    bytes[..text.len()].copy_from_slice(text.as_bytes());
    opal_types::Link::from_bytes(bytes)
}

fn dev_genesis_open() -> Block {
    OpenBlockArgs {
        key: &DEV_GENESIS_KEY,
        source: DEV_GENESIS_KEY.account().into(),
        representative: DEV_GENESIS_KEY.public_key(),
        work: 0x7b42a00ee91d5810.into(),
    }
    .into()
}

const LIVE_GENESIS_DATA: &str = r#"{
    "source": "E89208DD038FBB269987689621D52292AE9C35941A7484756ECCED92A65093BA",
    "representative": "nano_3t6k35gi95xu6tergt6p69ck76ogmitsa8mnijtpxm9fkcm736xtoncuohr3",
    "account": "nano_3t6k35gi95xu6tergt6p69ck76ogmitsa8mnijtpxm9fkcm736xtoncuohr3",
    "signature": "9F0C933C8ADE004D808EA1985FA746A7E95BA2A38F867640F53EC8F180BDFE9E2C1268DEAD7C2664F356E37ABA362BC58E46DBA03E523A7B5A19E4B6EB12BB02",
    "work": "62F05417DD3FB691"
}"#;

pub static LEDGER_CONSTANTS_STUB: LazyLock<LedgerConstants> =
    LazyLock::new(LedgerConstants::unit_test);

pub static DEV_GENESIS_BLOCK: LazyLock<SavedBlock> =
    LazyLock::new(|| LEDGER_CONSTANTS_STUB.genesis_block.clone());

pub static DEV_GENESIS_ACCOUNT: LazyLock<Account> =
    LazyLock::new(|| DEV_GENESIS_BLOCK.account());

pub static DEV_GENESIS_PUB_KEY: LazyLock<PublicKey> =
    LazyLock::new(|| (*DEV_GENESIS_ACCOUNT).into());

pub static DEV_GENESIS_HASH: LazyLock<BlockHash> = LazyLock::new(|| DEV_GENESIS_BLOCK.hash());
