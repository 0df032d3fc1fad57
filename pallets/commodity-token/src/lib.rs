//! # Commodity Token Pallet
//!
//! Ledger for a commodity-backed token. Units are issued by Minters and may
//! be tied to serial-tagged lots describing their physical backing. Transfers
//! pay a proportional fee (with per-account overrides) to a configured
//! receiver, and a Pauser can halt all transfers.
//!
//! Two tracking modes are chosen at genesis:
//! - **flat**: balances only; `mint` takes no serial and `burn` takes an amount.
//! - **lot-tracked**: every mint creates a lot, balances are mirrored by
//!   per-holder FIFO holdings, transfers move lot portions oldest-first, and
//!   redemption happens one whole lot at a time through `burn_lot`.

#![cfg_attr(not(feature = "std"), no_std)]
// Storage getters are kept for the read API until it moves to view functions
#![allow(deprecated)]
#![allow(clippy::let_unit_value)]

use frame_support::{dispatch::DispatchResult, ensure, pallet_prelude::*};
use frame_system::{ensure_signed, pallet_prelude::*};
use sp_std::prelude::*;

pub use pallet::*;

pub mod fee;
pub mod lot;
pub mod weights;

pub use lot::{Inventory, InventoryError, Lot, SerialOf};
pub use weights::WeightInfo;

#[cfg(test)]
mod mock;


#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

/// The current storage version.
const STORAGE_VERSION: StorageVersion = StorageVersion::new(1);

const LOG_TARGET: &str = "runtime::commodity-token";

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// Maximum length of a lot serial in bytes.
        #[pallet::constant]
        type MaxSerialLength: Get<u32>;

        /// Maximum number of live lots, which also bounds each holder's holdings.
        #[pallet::constant]
        type MaxLots: Get<u32>;

        type WeightInfo: WeightInfo;
    }

    #[pallet::pallet]
    #[pallet::storage_version(STORAGE_VERSION)]
    pub struct Pallet<T>(_);

    /// Token name (e.g., "Gold Gram Coin")
    #[pallet::storage]
    #[pallet::getter(fn token_name)]
    pub type TokenName<T> = StorageValue<_, BoundedVec<u8, ConstU32<64>>, ValueQuery>;

    /// Token symbol (e.g., "GGC")
    #[pallet::storage]
    #[pallet::getter(fn token_symbol)]
    pub type TokenSymbol<T> = StorageValue<_, BoundedVec<u8, ConstU32<16>>, ValueQuery>;

    #[pallet::storage]
    #[pallet::getter(fn decimals)]
    pub type Decimals<T> = StorageValue<_, u8, ValueQuery>;

    /// Total token supply
    #[pallet::storage]
    #[pallet::getter(fn total_supply)]
    pub type TotalSupply<T> = StorageValue<_, u128, ValueQuery>;

    /// Account balances
    #[pallet::storage]
    #[pallet::getter(fn balance_of)]
    pub type Balances<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, u128, ValueQuery>;

    /// Spending approvals: owner -> spender -> remaining amount
    #[pallet::storage]
    #[pallet::getter(fn allowance)]
    pub type Allowances<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        T::AccountId,
        Blake2_128Concat,
        T::AccountId,
        u128,
        ValueQuery,
    >;

    /// Holder of configuration authority (fees, exemptions, admin hand-off)
    #[pallet::storage]
    #[pallet::getter(fn admin)]
    pub type Admin<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

    #[pallet::storage]
    #[pallet::getter(fn is_minter)]
    pub type Minters<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, bool, ValueQuery>;

    #[pallet::storage]
    #[pallet::getter(fn is_pauser)]
    pub type Pausers<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, bool, ValueQuery>;

    /// Pause gate; while set, transfers are rejected
    #[pallet::storage]
    #[pallet::getter(fn is_paused)]
    pub type Paused<T> = StorageValue<_, bool, ValueQuery>;

    /// Global fee rate numerator, scaled by `10^FeeDecimals`
    #[pallet::storage]
    #[pallet::getter(fn fee)]
    pub type Fee<T> = StorageValue<_, u128, ValueQuery>;

    #[pallet::storage]
    #[pallet::getter(fn fee_decimals)]
    pub type FeeDecimals<T> = StorageValue<_, u8, ValueQuery>;

    #[pallet::storage]
    #[pallet::getter(fn fee_receiver)]
    pub type FeeReceiver<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

    /// Per-account fee rate overriding the global one (zero means fully exempt)
    #[pallet::storage]
    #[pallet::getter(fn exemption)]
    pub type Exemptions<T: Config> =
        StorageMap<_, Blake2_128Concat, T::AccountId, u128, OptionQuery>;

    /// Whether issuance is tied to serial-tagged lots
    #[pallet::storage]
    #[pallet::getter(fn lot_tracking)]
    pub type LotTracking<T> = StorageValue<_, bool, ValueQuery>;

    /// Every live lot in issuance order, at its full minted amount
    #[pallet::storage]
    #[pallet::getter(fn lots)]
    pub type Lots<T: Config> = StorageValue<_, Inventory<T>, ValueQuery>;

    /// Lot portions owned by each account, oldest first
    #[pallet::storage]
    #[pallet::getter(fn holdings)]
    pub type Holdings<T: Config> =
        StorageMap<_, Blake2_128Concat, T::AccountId, Inventory<T>, ValueQuery>;

    /// Accounts holding part of each live lot
    #[pallet::storage]
    pub type LotHolders<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        SerialOf<T>,
        Blake2_128Concat,
        T::AccountId,
        (),
        OptionQuery,
    >;

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        /// New tokens minted, optionally as a new lot
        Minted { to: T::AccountId, amount: u128, serial: Option<SerialOf<T>> },
        /// Tokens redeemed, either a flat amount or a whole lot
        Burned { from: T::AccountId, amount: u128, serial: Option<SerialOf<T>> },
        /// `amount` left `from`; `to` received `amount - fee`
        Transferred { from: T::AccountId, to: T::AccountId, amount: u128, fee: u128 },
        Approved { owner: T::AccountId, spender: T::AccountId, amount: u128 },
        MinterAdded { account: T::AccountId },
        MinterRemoved { account: T::AccountId },
        PauserAdded { account: T::AccountId },
        PauserRemoved { account: T::AccountId },
        /// Transfers halted
        Paused { account: T::AccountId },
        /// Transfers resumed
        Unpaused { account: T::AccountId },
        FeeSet { rate: u128 },
        FeeReceiverSet { account: T::AccountId },
        Exempted { account: T::AccountId, rate: u128 },
        Unexempted { account: T::AccountId },
        AdminTransferred { previous: Option<T::AccountId>, new: T::AccountId },
    }

    #[pallet::error]
    pub enum Error<T> {
        /// Caller lacks the role or admin authority the call requires
        Unauthorized,
        TransfersPaused,
        InsufficientBalance,
        /// Lot holdings cannot cover the request
        InsufficientInventory,
        InsufficientAllowance,
        DuplicateSerial,
        UnknownSerial,
        IndexOutOfRange,
        AlreadyPaused,
        NotPaused,
        Overflow,
        /// Fee rate exceeds 100% at the configured fee decimals
        InvalidFeeRate,
        /// A nonzero fee needs somewhere to go
        FeeReceiverNotSet,
        TooManyLots,
        ZeroAmount,
        /// Lot tracking is on; the operation needs a serial
        SerialRequired,
        LotTrackingDisabled,
        /// More accounts hold part of the lot than the call allowed for
        BadWitness,
    }

    #[pallet::hooks]
    impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
        #[cfg(feature = "try-runtime")]
        fn try_state(_n: BlockNumberFor<T>) -> Result<(), sp_runtime::TryRuntimeError> {
            Self::do_try_state()
        }
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// Issue `amount` units to `to`. In lot-tracked mode a fresh `serial`
        /// is required and becomes the newest lot.
        #[pallet::call_index(0)]
        #[pallet::weight(match serial {
            Some(_) => T::WeightInfo::mint_lot(),
            None => T::WeightInfo::mint(),
        })]
        pub fn mint(
            origin: OriginFor<T>,
            to: T::AccountId,
            amount: u128,
            serial: Option<SerialOf<T>>,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            ensure!(Minters::<T>::get(&who), Error::<T>::Unauthorized);
            Self::do_mint(&to, amount, serial)
        }

        /// Redeem `amount` units from the caller (flat mode only).
        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::burn())]
        pub fn burn(origin: OriginFor<T>, amount: u128) -> DispatchResult {
            let who = ensure_signed(origin)?;
            ensure!(!LotTracking::<T>::get(), Error::<T>::SerialRequired);

            let balance = Balances::<T>::get(&who);
            ensure!(balance >= amount, Error::<T>::InsufficientBalance);

            Balances::<T>::insert(&who, balance - amount);
            TotalSupply::<T>::mutate(|supply| *supply = supply.saturating_sub(amount));

            log::debug!(target: LOG_TARGET, "burned {} from {:?}", amount, who);
            Self::deposit_event(Event::Burned { from: who, amount, serial: None });
            Ok(())
        }

        /// Redeem a whole lot out of the caller's balance.
        ///
        /// The caller gives up its own portion of the lot first. Portions held
        /// by other accounts are swapped for an equal number of the caller's
        /// other units, oldest first, so their balances are unchanged.
        ///
        /// `holders` is an upper bound on the number of accounts holding part
        /// of the lot (see [`Pallet::lot_holder_count`]).
        #[pallet::call_index(2)]
        #[pallet::weight(T::WeightInfo::burn_lot(*holders))]
        pub fn burn_lot(
            origin: OriginFor<T>,
            serial: SerialOf<T>,
            holders: u32,
        ) -> DispatchResultWithPostInfo {
            let who = ensure_signed(origin)?;
            ensure!(LotTracking::<T>::get(), Error::<T>::LotTrackingDisabled);

            let mut lots = Lots::<T>::get();
            let amount = lots.amount_of(&serial).ok_or(Error::<T>::UnknownSerial)?;

            let balance = Balances::<T>::get(&who);
            ensure!(balance >= amount, Error::<T>::InsufficientBalance);

            let holder_list: Vec<T::AccountId> = LotHolders::<T>::iter_key_prefix(&serial)
                .take(holders.saturating_add(1) as usize)
                .collect();
            let actual = holder_list.len() as u32;
            ensure!(actual <= holders, Error::<T>::BadWitness);

            let mut own = Holdings::<T>::get(&who);
            let kept = own.remove(&serial).map(|lot| lot.amount).unwrap_or(0);
            let mut cover = own.consume(amount.saturating_sub(kept)).map_err(Error::<T>::from)?;
            Self::unindex_drained(&who, &own, &cover);
            LotHolders::<T>::remove(&serial, &who);
            Self::store_holdings(&who, own);

            for holder in holder_list.into_iter().filter(|holder| holder != &who) {
                let mut holdings = Holdings::<T>::get(&holder);
                let portion = holdings.remove(&serial).map_err(Error::<T>::from)?.amount;
                let (swapped, rest) = lot::split(cover, portion);
                cover = rest;
                LotHolders::<T>::remove(&serial, &holder);
                Self::store_holdings(&holder, holdings);
                log::debug!(
                    target: LOG_TARGET,
                    "swapped {} units of lot {:?} held by {:?}",
                    portion,
                    serial,
                    holder
                );
                Self::deposit_holdings(&holder, swapped)?;
            }

            lots.remove(&serial).map_err(Error::<T>::from)?;
            Lots::<T>::put(lots);

            Balances::<T>::insert(&who, balance - amount);
            TotalSupply::<T>::mutate(|supply| *supply = supply.saturating_sub(amount));

            log::debug!(
                target: LOG_TARGET,
                "burned lot {:?} ({} units) from {:?}",
                serial,
                amount,
                who
            );
            Self::deposit_event(Event::Burned { from: who, amount, serial: Some(serial) });
            Ok(Some(T::WeightInfo::burn_lot(actual)).into())
        }

        #[pallet::call_index(3)]
        #[pallet::weight(T::WeightInfo::transfer())]
        pub fn transfer(origin: OriginFor<T>, to: T::AccountId, amount: u128) -> DispatchResult {
            let sender = ensure_signed(origin)?;
            Self::ensure_unpaused()?;
            Self::do_transfer(&sender, &to, amount)
        }

        /// Move `amount` out of `from` using the caller's allowance. The
        /// allowance is charged the full `amount`, fee included.
        #[pallet::call_index(4)]
        #[pallet::weight(T::WeightInfo::transfer_from())]
        pub fn transfer_from(
            origin: OriginFor<T>,
            from: T::AccountId,
            to: T::AccountId,
            amount: u128,
        ) -> DispatchResult {
            let spender = ensure_signed(origin)?;
            Self::ensure_unpaused()?;

            let allowance = Allowances::<T>::get(&from, &spender);
            ensure!(allowance >= amount, Error::<T>::InsufficientAllowance);

            Self::do_transfer(&from, &to, amount)?;
            Allowances::<T>::insert(&from, &spender, allowance - amount);
            Ok(())
        }

        /// Set (not add to) the amount `spender` may move out of the caller's balance.
        #[pallet::call_index(5)]
        #[pallet::weight(T::WeightInfo::approve())]
        pub fn approve(
            origin: OriginFor<T>,
            spender: T::AccountId,
            amount: u128,
        ) -> DispatchResult {
            let owner = ensure_signed(origin)?;
            Allowances::<T>::insert(&owner, &spender, amount);
            Self::deposit_event(Event::Approved { owner, spender, amount });
            Ok(())
        }

        #[pallet::call_index(6)]
        #[pallet::weight(T::WeightInfo::add_minter())]
        pub fn add_minter(origin: OriginFor<T>, account: T::AccountId) -> DispatchResult {
            let who = ensure_signed(origin)?;
            ensure!(Minters::<T>::get(&who), Error::<T>::Unauthorized);
            if !Minters::<T>::get(&account) {
                Minters::<T>::insert(&account, true);
                log::info!(target: LOG_TARGET, "{:?} granted minter role to {:?}", who, account);
                Self::deposit_event(Event::MinterAdded { account });
            }
            Ok(())
        }

        #[pallet::call_index(7)]
        #[pallet::weight(T::WeightInfo::renounce_minter())]
        pub fn renounce_minter(origin: OriginFor<T>) -> DispatchResult {
            let who = ensure_signed(origin)?;
            if Minters::<T>::take(&who) {
                Self::deposit_event(Event::MinterRemoved { account: who });
            }
            Ok(())
        }

        #[pallet::call_index(8)]
        #[pallet::weight(T::WeightInfo::add_pauser())]
        pub fn add_pauser(origin: OriginFor<T>, account: T::AccountId) -> DispatchResult {
            let who = ensure_signed(origin)?;
            ensure!(Pausers::<T>::get(&who), Error::<T>::Unauthorized);
            if !Pausers::<T>::get(&account) {
                Pausers::<T>::insert(&account, true);
                log::info!(target: LOG_TARGET, "{:?} granted pauser role to {:?}", who, account);
                Self::deposit_event(Event::PauserAdded { account });
            }
            Ok(())
        }

        #[pallet::call_index(9)]
        #[pallet::weight(T::WeightInfo::renounce_pauser())]
        pub fn renounce_pauser(origin: OriginFor<T>) -> DispatchResult {
            let who = ensure_signed(origin)?;
            if Pausers::<T>::take(&who) {
                Self::deposit_event(Event::PauserRemoved { account: who });
            }
            Ok(())
        }

        #[pallet::call_index(10)]
        #[pallet::weight(T::WeightInfo::pause())]
        pub fn pause(origin: OriginFor<T>) -> DispatchResult {
            let who = ensure_signed(origin)?;
            ensure!(Pausers::<T>::get(&who), Error::<T>::Unauthorized);
            ensure!(!Paused::<T>::get(), Error::<T>::AlreadyPaused);
            Paused::<T>::put(true);
            log::info!(target: LOG_TARGET, "transfers paused by {:?}", who);
            Self::deposit_event(Event::Paused { account: who });
            Ok(())
        }

        #[pallet::call_index(11)]
        #[pallet::weight(T::WeightInfo::unpause())]
        pub fn unpause(origin: OriginFor<T>) -> DispatchResult {
            let who = ensure_signed(origin)?;
            ensure!(Pausers::<T>::get(&who), Error::<T>::Unauthorized);
            ensure!(Paused::<T>::get(), Error::<T>::NotPaused);
            Paused::<T>::put(false);
            log::info!(target: LOG_TARGET, "transfers resumed by {:?}", who);
            Self::deposit_event(Event::Unpaused { account: who });
            Ok(())
        }

        /// Set the global fee rate, as a numerator over `10^fee_decimals`.
        #[pallet::call_index(12)]
        #[pallet::weight(T::WeightInfo::set_fee())]
        pub fn set_fee(origin: OriginFor<T>, rate: u128) -> DispatchResult {
            Self::ensure_admin(origin)?;
            Self::ensure_valid_rate(rate)?;
            Fee::<T>::put(rate);
            log::info!(target: LOG_TARGET, "global fee rate set to {}", rate);
            Self::deposit_event(Event::FeeSet { rate });
            Ok(())
        }

        #[pallet::call_index(13)]
        #[pallet::weight(T::WeightInfo::set_fee_receiver())]
        pub fn set_fee_receiver(origin: OriginFor<T>, account: T::AccountId) -> DispatchResult {
            Self::ensure_admin(origin)?;
            FeeReceiver::<T>::put(&account);
            Self::deposit_event(Event::FeeReceiverSet { account });
            Ok(())
        }

        /// Give `account` its own fee rate. A rate of zero waives fees entirely.
        #[pallet::call_index(14)]
        #[pallet::weight(T::WeightInfo::exempt())]
        pub fn exempt(origin: OriginFor<T>, account: T::AccountId, rate: u128) -> DispatchResult {
            Self::ensure_admin(origin)?;
            Self::ensure_valid_rate(rate)?;
            Exemptions::<T>::insert(&account, rate);
            Self::deposit_event(Event::Exempted { account, rate });
            Ok(())
        }

        /// Return `account` to the global fee rate.
        #[pallet::call_index(15)]
        #[pallet::weight(T::WeightInfo::un_exempt())]
        pub fn un_exempt(origin: OriginFor<T>, account: T::AccountId) -> DispatchResult {
            Self::ensure_admin(origin)?;
            Exemptions::<T>::remove(&account);
            Self::deposit_event(Event::Unexempted { account });
            Ok(())
        }

        /// Hand configuration authority to `new_admin`. Roles are unaffected.
        #[pallet::call_index(16)]
        #[pallet::weight(T::WeightInfo::transfer_admin())]
        pub fn transfer_admin(origin: OriginFor<T>, new_admin: T::AccountId) -> DispatchResult {
            let who = Self::ensure_admin(origin)?;
            Admin::<T>::put(&new_admin);
            log::info!(target: LOG_TARGET, "admin handed from {:?} to {:?}", who, new_admin);
            Self::deposit_event(Event::AdminTransferred { previous: Some(who), new: new_admin });
            Ok(())
        }
    }

    #[pallet::genesis_config]
    #[derive(frame_support::DefaultNoBound)]
    pub struct GenesisConfig<T: Config> {
        /// Initial admin account (also granted the minter and pauser roles)
        pub admin: Option<T::AccountId>,
        /// Token name
        pub token_name: Vec<u8>,
        /// Token symbol
        pub token_symbol: Vec<u8>,
        /// Token decimals
        pub decimals: u8,
        /// Global fee rate numerator
        pub fee: u128,
        /// Fee rate denominator exponent (18 makes `fee` a wei-style fraction)
        pub fee_decimals: u8,
        pub fee_receiver: Option<T::AccountId>,
        /// Tie issuance to serial-tagged lots
        pub lot_tracking: bool,
        /// Initial flat balances (account, amount); flat mode only
        pub initial_balances: Vec<(T::AccountId, u128)>,
        /// Initial lots (holder, serial, amount); lot-tracked mode only
        pub initial_lots: Vec<(T::AccountId, Vec<u8>, u128)>,
    }

    #[pallet::genesis_build]
    impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
        fn build(&self) {
            // Set token metadata
            let name: BoundedVec<u8, ConstU32<64>> =
                self.token_name.clone().try_into().expect("Token name too long (max 64 bytes)");
            TokenName::<T>::put(name);

            let symbol: BoundedVec<u8, ConstU32<16>> =
                self.token_symbol.clone().try_into().expect("Token symbol too long (max 16 bytes)");
            TokenSymbol::<T>::put(symbol);

            Decimals::<T>::put(self.decimals);

            // Admin holds configuration authority and both roles
            if let Some(ref admin) = self.admin {
                Admin::<T>::put(admin);
                Minters::<T>::insert(admin, true);
                Pausers::<T>::insert(admin, true);
            }

            assert!(fee::is_valid_rate(self.fee, self.fee_decimals), "Fee rate exceeds 100%");
            assert!(
                self.fee == 0 || self.fee_receiver.is_some(),
                "A nonzero fee requires a fee receiver"
            );
            Fee::<T>::put(self.fee);
            FeeDecimals::<T>::put(self.fee_decimals);
            if let Some(ref receiver) = self.fee_receiver {
                FeeReceiver::<T>::put(receiver);
            }

            LotTracking::<T>::put(self.lot_tracking);
            if self.lot_tracking {
                assert!(
                    self.initial_balances.is_empty(),
                    "Lot-tracked genesis mints via initial_lots"
                );
            } else {
                assert!(self.initial_lots.is_empty(), "initial_lots requires lot_tracking");
            }

            for (account, amount) in &self.initial_balances {
                Pallet::<T>::do_mint(account, *amount, None).expect("Genesis supply overflow");
            }
            for (account, serial, amount) in &self.initial_lots {
                let serial: SerialOf<T> =
                    serial.clone().try_into().expect("Genesis lot serial too long");
                Pallet::<T>::do_mint(account, *amount, Some(serial)).expect("Invalid genesis lot");
            }
        }
    }
}

impl<T: Config> Pallet<T> {
    /// Fee owed by `sender` on a transfer of `amount`, as `(net, fee)`.
    ///
    /// The sender's exemption rate, if any, replaces the global rate.
    pub fn compute_fee(
        sender: &T::AccountId,
        amount: u128,
    ) -> Result<(u128, u128), DispatchError> {
        let rate = Exemptions::<T>::get(sender).unwrap_or_else(Fee::<T>::get);
        fee::split(amount, rate, FeeDecimals::<T>::get())
            .ok_or_else(|| Error::<T>::InvalidFeeRate.into())
    }

    /// Number of live lots.
    pub fn lot_count() -> u32 {
        Lots::<T>::get().count()
    }

    /// Serial of the lot at `index` in issuance order.
    pub fn serial_at(index: u32) -> Result<SerialOf<T>, DispatchError> {
        Lots::<T>::get().serial_at(index).cloned().map_err(|err| Error::<T>::from(err).into())
    }

    /// Full minted amount of a live lot.
    pub fn lot_amount(serial: &[u8]) -> Option<u128> {
        Lots::<T>::get().amount_of(serial)
    }

    /// Number of accounts holding part of lot `serial`; the witness `burn_lot` expects.
    pub fn lot_holder_count(serial: &SerialOf<T>) -> u32 {
        LotHolders::<T>::iter_key_prefix(serial).count() as u32
    }

    pub fn holding_count(who: &T::AccountId) -> u32 {
        Holdings::<T>::get(who).count()
    }

    pub fn holding_serial_at(
        who: &T::AccountId,
        index: u32,
    ) -> Result<SerialOf<T>, DispatchError> {
        Holdings::<T>::get(who)
            .serial_at(index)
            .cloned()
            .map_err(|err| Error::<T>::from(err).into())
    }

    /// Units of lot `serial` currently held by `who`.
    pub fn holding_of(who: &T::AccountId, serial: &[u8]) -> u128 {
        Holdings::<T>::get(who).amount_of(serial).unwrap_or(0)
    }

    fn ensure_admin(origin: OriginFor<T>) -> Result<T::AccountId, DispatchError> {
        let who = ensure_signed(origin)?;
        ensure!(Admin::<T>::get().as_ref() == Some(&who), Error::<T>::Unauthorized);
        Ok(who)
    }

    fn ensure_unpaused() -> DispatchResult {
        ensure!(!Paused::<T>::get(), Error::<T>::TransfersPaused);
        Ok(())
    }

    /// Rates must fit the fee decimals, and a nonzero rate needs a receiver.
    fn ensure_valid_rate(rate: u128) -> DispatchResult {
        ensure!(fee::is_valid_rate(rate, FeeDecimals::<T>::get()), Error::<T>::InvalidFeeRate);
        ensure!(rate == 0 || FeeReceiver::<T>::exists(), Error::<T>::FeeReceiverNotSet);
        Ok(())
    }

    pub(crate) fn do_mint(
        to: &T::AccountId,
        amount: u128,
        serial: Option<SerialOf<T>>,
    ) -> DispatchResult {
        match (&serial, LotTracking::<T>::get()) {
            (None, true) => return Err(Error::<T>::SerialRequired.into()),
            (Some(_), false) => return Err(Error::<T>::LotTrackingDisabled.into()),
            _ => {},
        }

        let new_supply = TotalSupply::<T>::get().checked_add(amount).ok_or(Error::<T>::Overflow)?;
        let new_balance = Balances::<T>::get(to).checked_add(amount).ok_or(Error::<T>::Overflow)?;

        if let Some(ref serial) = serial {
            ensure!(amount > 0, Error::<T>::ZeroAmount);
            Lots::<T>::try_mutate(|lots| lots.append(serial.clone(), amount))
                .map_err(Error::<T>::from)?;
            Holdings::<T>::try_mutate(to, |holdings| holdings.deposit(serial.clone(), amount))
                .map_err(Error::<T>::from)?;
            LotHolders::<T>::insert(serial, to, ());
        }

        TotalSupply::<T>::put(new_supply);
        Balances::<T>::insert(to, new_balance);

        log::debug!(target: LOG_TARGET, "minted {} to {:?} (lot {:?})", amount, to, serial);
        Self::deposit_event(Event::Minted { to: to.clone(), amount, serial });
        Ok(())
    }

    /// Debit `amount` from `from`, credit the net to `to` and the fee to the
    /// fee receiver. Callers check the pause gate first.
    fn do_transfer(from: &T::AccountId, to: &T::AccountId, amount: u128) -> DispatchResult {
        let (net, fee) = Self::compute_fee(from, amount)?;

        let from_balance = Balances::<T>::get(from);
        ensure!(from_balance >= amount, Error::<T>::InsufficientBalance);

        let fee_receiver = match fee {
            0 => None,
            _ => Some(FeeReceiver::<T>::get().ok_or(Error::<T>::FeeReceiverNotSet)?),
        };

        if LotTracking::<T>::get() {
            Self::move_holdings(from, to, amount, net, fee_receiver.as_ref())?;
        }

        Balances::<T>::insert(from, from_balance - amount);
        Self::credit(to, net)?;
        if let Some(ref receiver) = fee_receiver {
            Self::credit(receiver, fee)?;
            log::debug!(target: LOG_TARGET, "routed fee {} from {:?} to {:?}", fee, from, receiver);
        }

        Self::deposit_event(Event::Transferred {
            from: from.clone(),
            to: to.clone(),
            amount,
            fee,
        });
        Ok(())
    }

    /// Draw `amount` of lot portions from the sender oldest-first and hand the
    /// first `net` units to `to`, the remainder to `fee_receiver`.
    fn move_holdings(
        from: &T::AccountId,
        to: &T::AccountId,
        amount: u128,
        net: u128,
        fee_receiver: Option<&T::AccountId>,
    ) -> DispatchResult {
        let mut source = Holdings::<T>::get(from);
        let drawn = source.consume(amount).map_err(Error::<T>::from)?;
        log::debug!(
            target: LOG_TARGET,
            "{:?} drew {} units across {} lot portion(s)",
            from,
            amount,
            drawn.len()
        );
        Self::unindex_drained(from, &source, &drawn);
        Self::store_holdings(from, source);

        let (to_receiver, to_fee) = lot::split(drawn, net);
        Self::deposit_holdings(to, to_receiver)?;
        if let Some(receiver) = fee_receiver {
            Self::deposit_holdings(receiver, to_fee)?;
        }
        Ok(())
    }

    fn deposit_holdings(who: &T::AccountId, portions: Vec<Lot<T>>) -> DispatchResult {
        if portions.is_empty() {
            return Ok(());
        }
        Holdings::<T>::try_mutate(who, |holdings| {
            portions.into_iter().try_for_each(|portion| {
                LotHolders::<T>::insert(&portion.serial, who, ());
                holdings.deposit(portion.serial, portion.amount)
            })
        })
        .map_err(|err| Error::<T>::from(err).into())
    }

    /// Drop `who` from the holder index of every drawn lot it no longer holds.
    fn unindex_drained(who: &T::AccountId, remaining: &Inventory<T>, drawn: &[Lot<T>]) {
        for portion in drawn {
            if remaining.position(&portion.serial).is_none() {
                LotHolders::<T>::remove(&portion.serial, who);
            }
        }
    }

    fn store_holdings(who: &T::AccountId, holdings: Inventory<T>) {
        if holdings.is_empty() {
            Holdings::<T>::remove(who);
        } else {
            Holdings::<T>::insert(who, holdings);
        }
    }

    fn credit(who: &T::AccountId, amount: u128) -> DispatchResult {
        Balances::<T>::try_mutate(who, |balance| -> DispatchResult {
            *balance = balance.checked_add(amount).ok_or(Error::<T>::Overflow)?;
            Ok(())
        })
    }

    /// Check the conservation invariants: supply equals the sum of balances,
    /// and in lot-tracked mode supply equals the sum of live lots, each
    /// holder's holdings equal its balance, and the portions of every lot
    /// across holders add up to the lot's amount.
    #[cfg(any(feature = "try-runtime", test))]
    pub fn do_try_state() -> Result<(), DispatchError> {
        use sp_std::collections::btree_map::BTreeMap;

        let supply = TotalSupply::<T>::get();
        let balances = Balances::<T>::iter_values()
            .try_fold(0u128, |acc, balance| acc.checked_add(balance))
            .ok_or("sum of balances overflows")?;
        ensure!(balances == supply, "total supply does not match the sum of balances");

        if !LotTracking::<T>::get() {
            ensure!(Lots::<T>::get().is_empty(), "lots exist in flat mode");
            ensure!(Holdings::<T>::iter().next().is_none(), "holdings exist in flat mode");
            ensure!(LotHolders::<T>::iter().next().is_none(), "lot holders exist in flat mode");
            return Ok(());
        }

        let lots = Lots::<T>::get();
        ensure!(lots.total() == supply, "total supply does not match the sum of lots");

        let mut held: BTreeMap<Vec<u8>, u128> = BTreeMap::new();
        for (who, holdings) in Holdings::<T>::iter() {
            ensure!(!holdings.is_empty(), "empty holdings left in storage");
            ensure!(holdings.total() == Balances::<T>::get(&who), "holdings do not match balance");
            for portion in holdings.iter() {
                ensure!(portion.amount > 0, "zero-amount holding");
                let entry = held.entry(portion.serial.to_vec()).or_default();
                *entry = entry.saturating_add(portion.amount);
            }
        }
        for (who, balance) in Balances::<T>::iter() {
            ensure!(
                balance == 0 || Holdings::<T>::contains_key(&who),
                "balance without holdings"
            );
        }

        let mut indexed = 0usize;
        for (serial, who) in LotHolders::<T>::iter_keys() {
            ensure!(
                Holdings::<T>::get(&who).position(&serial).is_some(),
                "holder index names an account without that lot"
            );
            indexed += 1;
        }
        let entries: usize = Holdings::<T>::iter_values().map(|h| h.count() as usize).sum();
        ensure!(indexed == entries, "holder index is out of step with holdings");

        ensure!(held.len() == lots.count() as usize, "held serials differ from live lots");
        for lot in lots.iter() {
            ensure!(
                held.get(&lot.serial[..]) == Some(&lot.amount),
                "lot portions do not add up to the lot amount"
            );
        }
        Ok(())
    }
}
