use crate as pallet_commodity_token;
use frame_support::{
    derive_impl, parameter_types,
    traits::{ConstU32, ConstU64},
};
use sp_core::H256;
use sp_runtime::{
    traits::{BlakeTwo256, IdentityLookup},
    BuildStorage,
};

type Block = frame_system::mocking::MockBlock<Test>;

// Configure a mock runtime to test the pallet.
frame_support::construct_runtime!(
    pub enum Test {
        System: frame_system,
        CommodityToken: pallet_commodity_token,
    }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
    type BaseCallFilter = frame_support::traits::Everything;
    type BlockWeights = ();
    type BlockLength = ();
    type DbWeight = ();
    type RuntimeOrigin = RuntimeOrigin;
    type RuntimeCall = RuntimeCall;
    type Nonce = u64;
    type Hash = H256;
    type Hashing = BlakeTwo256;
    type AccountId = u64;
    type Lookup = IdentityLookup<Self::AccountId>;
    type Block = Block;
    type RuntimeEvent = RuntimeEvent;
    type BlockHashCount = ConstU64<250>;
    type Version = ();
    type PalletInfo = PalletInfo;
    type AccountData = ();
    type OnNewAccount = ();
    type OnKilledAccount = ();
    type SystemWeightInfo = ();
    type SS58Prefix = ();
    type OnSetCode = ();
    type MaxConsumers = ConstU32<16>;
}

parameter_types! {
    pub const AdminAccount: u64 = 1;
    pub const FeeAccount: u64 = 9;
}

/// 0.0002 with 18 fee decimals
pub const DEFAULT_FEE: u128 = 200_000_000_000_000;
pub const FEE_DECIMALS: u8 = 18;

impl pallet_commodity_token::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type MaxSerialLength = ConstU32<32>;
    type MaxLots = ConstU32<256>;
    type WeightInfo = ();
}

fn genesis(lot_tracking: bool) -> pallet_commodity_token::GenesisConfig<Test> {
    pallet_commodity_token::GenesisConfig::<Test> {
        admin: Some(AdminAccount::get()),
        token_name: b"Gold Gram Coin".to_vec(),
        token_symbol: b"GGC".to_vec(),
        decimals: 18,
        fee: 0,
        fee_decimals: FEE_DECIMALS,
        fee_receiver: Some(FeeAccount::get()),
        lot_tracking,
        initial_balances: if lot_tracking {
            vec![]
        } else {
            vec![(2, 1_000_000), (3, 500_000)]
        },
        initial_lots: vec![],
    }
}

fn build(config: pallet_commodity_token::GenesisConfig<Test>) -> sp_io::TestExternalities {
    let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();
    config.assimilate_storage(&mut t).unwrap();

    let mut ext = sp_io::TestExternalities::new(t);
    ext.execute_with(|| System::set_block_number(1));
    ext
}

// Flat ledger: accounts 2 and 3 start funded, no fee charged.
pub fn new_test_ext() -> sp_io::TestExternalities {
    build(genesis(false))
}

// Lot-tracked ledger with an empty registry.
pub fn new_lot_test_ext() -> sp_io::TestExternalities {
    build(genesis(true))
}

pub fn new_test_ext_with(
    configure: impl FnOnce(&mut pallet_commodity_token::GenesisConfig<Test>),
) -> sp_io::TestExternalities {
    let mut config = genesis(false);
    configure(&mut config);
    build(config)
}
