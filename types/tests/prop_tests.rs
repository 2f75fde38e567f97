use proptest::prelude::*;

use opal_types::{
    Account, Amount, BlockHash, ConfirmationHeightInfo, PendingInfo, PendingKey, SavedBlock,
    TestBlockBuilder,
};

proptest! {
    /// Account string codec: decode(encode(k)) == k for all keys.
    #[test]
    fn account_string_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let account = Account::from_bytes(bytes);
        let encoded = account.encode_account();
        prop_assert_eq!(encoded.len(), 65);
        prop_assert_eq!(Account::decode_account(&encoded), Some(account));
    }

    /// A flipped digit in the checksum region is always caught.
    #[test]
    fn account_string_rejects_digit_flips(
        bytes in prop::array::uniform32(0u8..),
        position in 57usize..65,
    ) {
        let account = Account::from_bytes(bytes);
        let encoded = account.encode_account();
        let original = encoded.as_bytes()[position];
        let replacement = if original == b'1' { b'3' } else { b'1' };
        let mut corrupted = encoded.into_bytes();
        corrupted[position] = replacement;
        let corrupted = String::from_utf8(corrupted).unwrap();

        if replacement != original {
            prop_assert_eq!(Account::decode_account(&corrupted), None);
        }
    }

    /// Amount serialization is big-endian and lossless.
    #[test]
    fn amount_roundtrip(raw in any::<u128>()) {
        let amount = Amount::raw(raw);
        let bytes = amount.to_be_bytes();
        prop_assert_eq!(Amount::from_be_bytes(bytes), amount);
        // byte-lexicographic order equals numeric order
        let smaller = Amount::raw(raw.saturating_sub(1));
        prop_assert!(smaller.to_be_bytes() <= bytes);
    }

    /// Pending key ordering equals the ordering of its serialized bytes.
    #[test]
    fn pending_key_order_matches_byte_order(
        a1 in any::<u64>(), h1 in any::<u64>(),
        a2 in any::<u64>(), h2 in any::<u64>(),
    ) {
        let key1 = PendingKey::new(Account::from(a1), BlockHash::from(h1));
        let key2 = PendingKey::new(Account::from(a2), BlockHash::from(h2));
        prop_assert_eq!(key1.cmp(&key2), key1.to_bytes().cmp(&key2.to_bytes()));
    }

    /// Pending info codec is lossless.
    #[test]
    fn pending_info_roundtrip(source in any::<u64>(), amount in any::<u128>()) {
        let info = PendingInfo::new(
            Account::from(source),
            Amount::raw(amount),
            opal_types::Epoch::Epoch1,
        );
        let bytes = info.to_bytes();
        prop_assert_eq!(PendingInfo::deserialize(&mut bytes.as_slice()).unwrap(), info);
    }

    /// Confirmation height codec is lossless.
    #[test]
    fn confirmation_height_roundtrip(height in any::<u64>(), frontier in any::<u64>()) {
        let info = ConfirmationHeightInfo::new(height, BlockHash::from(frontier));
        let bytes = info.to_bytes();
        prop_assert_eq!(
            ConfirmationHeightInfo::deserialize(&mut bytes.as_slice()).unwrap(),
            info
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// The block hash covers everything except signature and work.
    #[test]
    fn state_block_hash_ignores_work(work1 in any::<u64>(), work2 in any::<u64>()) {
        let a = TestBlockBuilder::state().work(work1).build();
        let b = TestBlockBuilder::state().work(work2).build();
        prop_assert_eq!(a.hash(), b.hash());
    }

    /// Block + sideband records survive a serialization roundtrip.
    #[test]
    fn saved_block_roundtrip(balance in any::<u128>(), link in any::<u64>()) {
        let block = TestBlockBuilder::state()
            .balance(balance)
            .link(link)
            .build_saved();
        let bytes = block.serialize_with_sideband();
        prop_assert_eq!(SavedBlock::deserialize(&bytes).unwrap(), block);
    }
}
