//! Weight functions for pallet-commodity-token.
//!
//! Both implementations carry placeholder weights until the benchmarks in
//! `benchmarking.rs` are run against a reference machine. The
//! `SubstrateWeight` figures are estimates: a hand-picked execution time plus
//! the storage accesses each call makes, priced at the runtime's
//! `DbWeight`.

#![allow(unused_parens)]
#![allow(unused_imports)]

use core::marker::PhantomData;
use frame_support::{traits::Get, weights::Weight};

pub trait WeightInfo {
    fn mint() -> Weight;
    fn mint_lot() -> Weight;
    fn burn() -> Weight;
    fn burn_lot(h: u32) -> Weight;
    fn transfer() -> Weight;
    fn transfer_from() -> Weight;
    fn approve() -> Weight;
    fn add_minter() -> Weight;
    fn renounce_minter() -> Weight;
    fn add_pauser() -> Weight;
    fn renounce_pauser() -> Weight;
    fn pause() -> Weight;
    fn unpause() -> Weight;
    fn set_fee() -> Weight;
    fn set_fee_receiver() -> Weight;
    fn exempt() -> Weight;
    fn un_exempt() -> Weight;
    fn transfer_admin() -> Weight;
}

/// Placeholder weights priced against the runtime's database weights.
pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
    fn mint() -> Weight {
        Weight::from_parts(12_000_000, 0).saturating_add(T::DbWeight::get().reads_writes(3, 2))
    }
    fn mint_lot() -> Weight {
        Weight::from_parts(25_000_000, 0).saturating_add(T::DbWeight::get().reads_writes(5, 4))
    }
    fn burn() -> Weight {
        Weight::from_parts(11_000_000, 0).saturating_add(T::DbWeight::get().reads_writes(3, 2))
    }
    /// The range of component `h` is `[1, 64]`.
    fn burn_lot(h: u32) -> Weight {
        Weight::from_parts(25_000_000, 0)
            .saturating_add(Weight::from_parts(9_000_000, 0).saturating_mul(h.into()))
            .saturating_add(T::DbWeight::get().reads_writes(5, 5))
            .saturating_add(T::DbWeight::get().reads((1_u64).saturating_mul(h.into())))
            .saturating_add(T::DbWeight::get().writes((3_u64).saturating_mul(h.into())))
    }
    fn transfer() -> Weight {
        Weight::from_parts(30_000_000, 0).saturating_add(T::DbWeight::get().reads_writes(9, 6))
    }
    fn transfer_from() -> Weight {
        Weight::from_parts(32_000_000, 0).saturating_add(T::DbWeight::get().reads_writes(10, 7))
    }
    fn approve() -> Weight {
        Weight::from_parts(8_000_000, 0).saturating_add(T::DbWeight::get().writes(1))
    }
    fn add_minter() -> Weight {
        Weight::from_parts(8_000_000, 0).saturating_add(T::DbWeight::get().reads_writes(2, 1))
    }
    fn renounce_minter() -> Weight {
        Weight::from_parts(7_000_000, 0).saturating_add(T::DbWeight::get().reads_writes(1, 1))
    }
    fn add_pauser() -> Weight {
        Weight::from_parts(8_000_000, 0).saturating_add(T::DbWeight::get().reads_writes(2, 1))
    }
    fn renounce_pauser() -> Weight {
        Weight::from_parts(7_000_000, 0).saturating_add(T::DbWeight::get().reads_writes(1, 1))
    }
    fn pause() -> Weight {
        Weight::from_parts(7_000_000, 0).saturating_add(T::DbWeight::get().reads_writes(2, 1))
    }
    fn unpause() -> Weight {
        Weight::from_parts(7_000_000, 0).saturating_add(T::DbWeight::get().reads_writes(2, 1))
    }
    fn set_fee() -> Weight {
        Weight::from_parts(8_000_000, 0).saturating_add(T::DbWeight::get().reads_writes(3, 1))
    }
    fn set_fee_receiver() -> Weight {
        Weight::from_parts(7_000_000, 0).saturating_add(T::DbWeight::get().reads_writes(1, 1))
    }
    fn exempt() -> Weight {
        Weight::from_parts(8_000_000, 0).saturating_add(T::DbWeight::get().reads_writes(3, 1))
    }
    fn un_exempt() -> Weight {
        Weight::from_parts(7_000_000, 0).saturating_add(T::DbWeight::get().reads_writes(1, 1))
    }
    fn transfer_admin() -> Weight {
        Weight::from_parts(7_000_000, 0).saturating_add(T::DbWeight::get().reads_writes(1, 1))
    }
}

impl WeightInfo for () {
    fn mint() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn mint_lot() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn burn() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn burn_lot(h: u32) -> Weight {
        Weight::from_parts(10_000, 0)
            .saturating_add(Weight::from_parts(1_000, 0).saturating_mul(h.into()))
    }
    fn transfer() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn transfer_from() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn approve() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn add_minter() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn renounce_minter() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn add_pauser() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn renounce_pauser() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn pause() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn unpause() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn set_fee() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn set_fee_receiver() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn exempt() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn un_exempt() -> Weight {
        Weight::from_parts(10_000, 0)
    }
    fn transfer_admin() -> Weight {
        Weight::from_parts(10_000, 0)
    }
}
