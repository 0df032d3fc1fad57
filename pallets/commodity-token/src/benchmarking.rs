//! Benchmarking setup for pallet-commodity-token

use super::*;

#[allow(unused)]
use crate::Pallet as CommodityToken;
use frame_benchmarking::v2::*;
use frame_system::RawOrigin;

/// Serial for the `index`-th benchmark lot, padded to the maximum length.
fn serial<T: Config>(index: u32) -> SerialOf<T> {
    let max = T::MaxSerialLength::get() as usize;
    let mut raw = index.to_be_bytes().to_vec();
    assert!(max >= raw.len(), "MaxSerialLength must fit a u32 index");
    raw.resize(max, b'0');
    raw.try_into().expect("resized to the bound")
}

/// Register a live lot without handing it to anyone.
fn issue<T: Config>(index: u32, amount: u128) -> SerialOf<T> {
    LotTracking::<T>::put(true);
    let serial = serial::<T>(index);
    Lots::<T>::mutate(|lots| lots.append(serial.clone(), amount)).expect("within MaxLots");
    TotalSupply::<T>::mutate(|supply| *supply += amount);
    serial
}

/// Hand `amount` units of a live lot to `who`.
fn give<T: Config>(who: &T::AccountId, serial: &SerialOf<T>, amount: u128) {
    Holdings::<T>::mutate(who, |holdings| holdings.deposit(serial.clone(), amount))
        .expect("within MaxLots");
    LotHolders::<T>::insert(serial, who, ());
    Balances::<T>::mutate(who, |balance| *balance += amount);
}

/// Issue `count` lots of 1_000 units to `owner`, with every account in
/// `sharers` also holding one unit of each, so their holdings are as long as
/// the registry.
fn fill<T: Config>(owner: &T::AccountId, sharers: &[T::AccountId], count: u32) {
    for i in 0..count {
        let serial = issue::<T>(i, 1_000 + sharers.len() as u128);
        give::<T>(owner, &serial, 1_000);
        for sharer in sharers {
            give::<T>(sharer, &serial, 1);
        }
    }
}

/// Make `who` the admin and return the configured fee receiver.
fn make_admin<T: Config>(who: &T::AccountId) -> T::AccountId {
    let receiver: T::AccountId = account("fees", 0, 0);
    Admin::<T>::put(who);
    FeeReceiver::<T>::put(&receiver);
    receiver
}

#[benchmarks]
mod benchmarks {
    use super::*;

    #[benchmark]
    fn mint() {
        let caller: T::AccountId = whitelisted_caller();
        let recipient: T::AccountId = account("recipient", 0, 0);
        let amount: u128 = 1_000_000;
        Minters::<T>::insert(&caller, true);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), recipient.clone(), amount, None);

        assert_eq!(Balances::<T>::get(&recipient), amount);
    }

    #[benchmark]
    fn mint_lot() {
        let caller: T::AccountId = whitelisted_caller();
        let recipient: T::AccountId = account("recipient", 0, 0);
        Minters::<T>::insert(&caller, true);

        // Duplicate check scans a nearly full registry and the deposit scans
        // recipient holdings of the same length
        let last = T::MaxLots::get().saturating_sub(1);
        fill::<T>(&account("holder", 0, 0), &[recipient.clone()], last);
        let new_serial = serial::<T>(last);

        #[extrinsic_call]
        mint(RawOrigin::Signed(caller), recipient.clone(), 1_000_000, Some(new_serial));

        assert_eq!(Lots::<T>::get().count(), last + 1);
        assert_eq!(Balances::<T>::get(&recipient), last as u128 + 1_000_000);
    }

    #[benchmark]
    fn burn() {
        let caller: T::AccountId = whitelisted_caller();
        Balances::<T>::insert(&caller, 10_000_000);
        TotalSupply::<T>::put(10_000_000);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), 1_000_000);

        assert_eq!(Balances::<T>::get(&caller), 9_000_000);
    }

    /// Redeem a lot split across `h` other holders, each of whom is paid
    /// back from a different lot of the caller.
    #[benchmark]
    fn burn_lot(h: Linear<1, 64>) {
        let caller: T::AccountId = whitelisted_caller();
        assert!(T::MaxLots::get() > h, "MaxLots must exceed the holder range");

        let target = issue::<T>(0, h as u128);
        for i in 0..h {
            give::<T>(&account("holder", i, 0), &target, 1);
        }
        for i in 1..=h {
            let cover = issue::<T>(i, 1);
            give::<T>(&caller, &cover, 1);
        }

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), target, h);

        assert_eq!(Lots::<T>::get().count(), h);
        assert_eq!(Balances::<T>::get(&caller), 0);
    }

    /// Lot-tracked transfer with a fee, drawing from every lot. Recipient and
    /// fee receiver already hold a portion of each lot, so every deposit
    /// scans a full inventory.
    #[benchmark]
    fn transfer() {
        let caller: T::AccountId = whitelisted_caller();
        let recipient: T::AccountId = account("recipient", 0, 0);
        let receiver = make_admin::<T>(&caller);
        let lots = T::MaxLots::get();
        fill::<T>(&caller, &[recipient.clone(), receiver], lots);
        Fee::<T>::put(1);
        FeeDecimals::<T>::put(2);
        let amount = 1_000 * lots as u128;

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), recipient.clone(), amount);

        assert_eq!(Balances::<T>::get(&caller), 0);
        assert_eq!(Balances::<T>::get(&recipient), lots as u128 + amount - amount / 100);
    }

    #[benchmark]
    fn transfer_from() {
        let owner: T::AccountId = account("owner", 0, 0);
        let spender: T::AccountId = whitelisted_caller();
        let recipient: T::AccountId = account("recipient", 0, 0);
        let receiver = make_admin::<T>(&owner);
        let lots = T::MaxLots::get();
        fill::<T>(&owner, &[recipient.clone(), receiver], lots);
        Fee::<T>::put(1);
        FeeDecimals::<T>::put(2);
        let amount = 1_000 * lots as u128;
        Allowances::<T>::insert(&owner, &spender, amount);

        #[extrinsic_call]
        _(RawOrigin::Signed(spender.clone()), owner.clone(), recipient.clone(), amount);

        assert_eq!(Allowances::<T>::get(&owner, &spender), 0);
        assert_eq!(Balances::<T>::get(&recipient), lots as u128 + amount - amount / 100);
    }

    #[benchmark]
    fn approve() {
        let caller: T::AccountId = whitelisted_caller();
        let spender: T::AccountId = account("spender", 0, 0);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), spender.clone(), 1_000);

        assert_eq!(Allowances::<T>::get(&caller, &spender), 1_000);
    }

    #[benchmark]
    fn add_minter() {
        let caller: T::AccountId = whitelisted_caller();
        let account: T::AccountId = account("minter", 0, 0);
        Minters::<T>::insert(&caller, true);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), account.clone());

        assert_eq!(Minters::<T>::get(&account), true);
    }

    #[benchmark]
    fn renounce_minter() {
        let caller: T::AccountId = whitelisted_caller();
        Minters::<T>::insert(&caller, true);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()));

        assert_eq!(Minters::<T>::get(&caller), false);
    }

    #[benchmark]
    fn add_pauser() {
        let caller: T::AccountId = whitelisted_caller();
        let account: T::AccountId = account("pauser", 0, 0);
        Pausers::<T>::insert(&caller, true);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), account.clone());

        assert_eq!(Pausers::<T>::get(&account), true);
    }

    #[benchmark]
    fn renounce_pauser() {
        let caller: T::AccountId = whitelisted_caller();
        Pausers::<T>::insert(&caller, true);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()));

        assert_eq!(Pausers::<T>::get(&caller), false);
    }

    #[benchmark]
    fn pause() {
        let caller: T::AccountId = whitelisted_caller();
        Pausers::<T>::insert(&caller, true);
        Paused::<T>::put(false);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller));

        assert_eq!(Paused::<T>::get(), true);
    }

    #[benchmark]
    fn unpause() {
        let caller: T::AccountId = whitelisted_caller();
        Pausers::<T>::insert(&caller, true);
        Paused::<T>::put(true);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller));

        assert_eq!(Paused::<T>::get(), false);
    }

    #[benchmark]
    fn set_fee() {
        let caller: T::AccountId = whitelisted_caller();
        make_admin::<T>(&caller);
        FeeDecimals::<T>::put(18);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), 200_000_000_000_000);

        assert_eq!(Fee::<T>::get(), 200_000_000_000_000);
    }

    #[benchmark]
    fn set_fee_receiver() {
        let caller: T::AccountId = whitelisted_caller();
        let receiver: T::AccountId = account("receiver", 0, 0);
        make_admin::<T>(&caller);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), receiver.clone());

        assert_eq!(FeeReceiver::<T>::get(), Some(receiver));
    }

    #[benchmark]
    fn exempt() {
        let caller: T::AccountId = whitelisted_caller();
        let account: T::AccountId = account("exchange", 0, 0);
        make_admin::<T>(&caller);
        FeeDecimals::<T>::put(18);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), account.clone(), 100_000_000_000_000);

        assert_eq!(Exemptions::<T>::get(&account), Some(100_000_000_000_000));
    }

    #[benchmark]
    fn un_exempt() {
        let caller: T::AccountId = whitelisted_caller();
        let account: T::AccountId = account("exchange", 0, 0);
        make_admin::<T>(&caller);
        Exemptions::<T>::insert(&account, 0);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), account.clone());

        assert_eq!(Exemptions::<T>::get(&account), None);
    }

    #[benchmark]
    fn transfer_admin() {
        let caller: T::AccountId = whitelisted_caller();
        let successor: T::AccountId = account("successor", 0, 0);
        make_admin::<T>(&caller);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), successor.clone());

        assert_eq!(Admin::<T>::get(), Some(successor));
    }

    impl_benchmark_test_suite!(CommodityToken, crate::mock::new_test_ext(), crate::mock::Test);
}
