//! Serial-tagged issuance lots and the FIFO inventory that holds them.
//!
//! The same [`Inventory`] type backs both the global lot registry (every live
//! lot in issuance order, at its full minted amount) and each holder's
//! holdings (the portions of lots that account currently owns). Lookup,
//! removal and front consumption are linear in the number of entries, which
//! is bounded by `T::MaxLots`.

use crate::{Config, Error};
use codec::{Decode, Encode, MaxEncodedLen};
use frame_support::{
    ensure, BoundedVec, CloneNoBound, DefaultNoBound, EqNoBound, PartialEqNoBound,
    RuntimeDebugNoBound,
};
use scale_info::TypeInfo;
use sp_std::prelude::*;

/// Opaque serial identifying a batch of physical backing.
pub type SerialOf<T> = BoundedVec<u8, <T as Config>::MaxSerialLength>;

/// A serial together with an amount of units tagged with it.
#[derive(
    CloneNoBound,
    PartialEqNoBound,
    EqNoBound,
    RuntimeDebugNoBound,
    Encode,
    Decode,
    TypeInfo,
    MaxEncodedLen,
)]
#[scale_info(skip_type_params(T))]
#[codec(mel_bound())]
pub struct Lot<T: Config> {
    pub serial: SerialOf<T>,
    pub amount: u128,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InventoryError {
    DuplicateSerial,
    UnknownSerial,
    IndexOutOfRange,
    InsufficientInventory,
    Full,
    Overflow,
}

impl<T: Config> From<InventoryError> for Error<T> {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::DuplicateSerial => Error::DuplicateSerial,
            InventoryError::UnknownSerial => Error::UnknownSerial,
            InventoryError::IndexOutOfRange => Error::IndexOutOfRange,
            InventoryError::InsufficientInventory => Error::InsufficientInventory,
            InventoryError::Full => Error::TooManyLots,
            InventoryError::Overflow => Error::Overflow,
        }
    }
}

/// Ordered, gap-free sequence of lots. Position `i` is the `i`-th entry in
/// FIFO order; removing an entry shifts everything behind it forward by one.
#[derive(
    CloneNoBound,
    PartialEqNoBound,
    EqNoBound,
    RuntimeDebugNoBound,
    DefaultNoBound,
    Encode,
    Decode,
    TypeInfo,
    MaxEncodedLen,
)]
#[scale_info(skip_type_params(T))]
#[codec(mel_bound())]
pub struct Inventory<T: Config> {
    lots: BoundedVec<Lot<T>, T::MaxLots>,
}

impl<T: Config> Inventory<T> {
    pub fn count(&self) -> u32 {
        self.lots.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lot<T>> {
        self.lots.iter()
    }

    /// Sum of all entry amounts.
    pub fn total(&self) -> u128 {
        self.lots.iter().fold(0u128, |acc, lot| acc.saturating_add(lot.amount))
    }

    pub fn position(&self, serial: &[u8]) -> Option<usize> {
        self.lots.iter().position(|lot| &lot.serial[..] == serial)
    }

    pub fn amount_of(&self, serial: &[u8]) -> Option<u128> {
        self.position(serial).map(|index| self.lots[index].amount)
    }

    pub fn serial_at(&self, index: u32) -> Result<&SerialOf<T>, InventoryError> {
        self.lots
            .get(index as usize)
            .map(|lot| &lot.serial)
            .ok_or(InventoryError::IndexOutOfRange)
    }

    /// Append a new lot at the back and return its position.
    pub fn append(&mut self, serial: SerialOf<T>, amount: u128) -> Result<u32, InventoryError> {
        ensure!(self.position(&serial).is_none(), InventoryError::DuplicateSerial);
        let position = self.count();
        self.lots.try_push(Lot { serial, amount }).map_err(|_| InventoryError::Full)?;
        Ok(position)
    }

    /// Remove a lot by serial, closing the gap it leaves.
    pub fn remove(&mut self, serial: &[u8]) -> Result<Lot<T>, InventoryError> {
        let index = self.position(serial).ok_or(InventoryError::UnknownSerial)?;
        Ok(self.lots.remove(index))
    }

    /// Add units of `serial`, merging into an existing entry if there is one.
    pub fn deposit(&mut self, serial: SerialOf<T>, amount: u128) -> Result<(), InventoryError> {
        if amount == 0 {
            return Ok(());
        }
        match self.lots.iter_mut().find(|lot| lot.serial == serial) {
            Some(lot) => {
                lot.amount = lot.amount.checked_add(amount).ok_or(InventoryError::Overflow)?;
                Ok(())
            },
            None => self.lots.try_push(Lot { serial, amount }).map_err(|_| InventoryError::Full),
        }
    }

    /// Draw `amount` units from the front, spanning as many lots as needed.
    ///
    /// Fully drained entries are removed; the last touched entry may be left
    /// partially depleted. Returns the drawn portions in FIFO order. If the
    /// inventory holds less than `amount` nothing is modified.
    pub fn consume(&mut self, amount: u128) -> Result<Vec<Lot<T>>, InventoryError> {
        ensure!(self.total() >= amount, InventoryError::InsufficientInventory);

        let mut remaining = amount;
        let mut drawn = Vec::new();
        while remaining > 0 {
            let front = self.lots.get_mut(0).ok_or(InventoryError::InsufficientInventory)?;
            if front.amount <= remaining {
                remaining -= front.amount;
                drawn.push(self.lots.remove(0));
            } else {
                front.amount -= remaining;
                drawn.push(Lot { serial: front.serial.clone(), amount: remaining });
                remaining = 0;
            }
        }
        Ok(drawn)
    }
}

/// Divide drawn portions so that the first `first` units go to the left side
/// and the rest to the right, keeping FIFO order on both sides.
pub fn split<T: Config>(portions: Vec<Lot<T>>, first: u128) -> (Vec<Lot<T>>, Vec<Lot<T>>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut wanted = first;
    for lot in portions {
        if wanted == 0 {
            right.push(lot);
        } else if lot.amount <= wanted {
            wanted -= lot.amount;
            left.push(lot);
        } else {
            left.push(Lot { serial: lot.serial.clone(), amount: wanted });
            right.push(Lot { serial: lot.serial, amount: lot.amount - wanted });
            wanted = 0;
        }
    }
    (left, right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::Test;
    use frame_support::traits::Get;

    fn serial(tag: &str) -> SerialOf<Test> {
        tag.as_bytes().to_vec().try_into().unwrap()
    }

    fn inventory(lots: &[(&str, u128)]) -> Inventory<Test> {
        let mut inv = Inventory::<Test>::default();
        for (tag, amount) in lots {
            inv.append(serial(tag), *amount).unwrap();
        }
        inv
    }

    fn snapshot(inv: &Inventory<Test>) -> Vec<(Vec<u8>, u128)> {
        inv.iter().map(|lot| (lot.serial.to_vec(), lot.amount)).collect()
    }

    #[test]
    fn append_returns_positions_in_order() {
        let mut inv = Inventory::<Test>::default();
        assert_eq!(inv.append(serial("A"), 100), Ok(0));
        assert_eq!(inv.append(serial("B"), 200), Ok(1));
        assert_eq!(inv.count(), 2);
        assert_eq!(inv.serial_at(1), Ok(&serial("B")));
    }

    #[test]
    fn duplicate_serial_is_rejected() {
        let mut inv = inventory(&[("A", 100)]);
        assert_eq!(inv.append(serial("A"), 5), Err(InventoryError::DuplicateSerial));
        assert_eq!(inv.total(), 100);
    }

    #[test]
    fn remove_closes_the_gap() {
        let mut inv = inventory(&[("A", 100), ("B", 200), ("C", 300)]);
        let removed = inv.remove(b"B").unwrap();
        assert_eq!(removed.amount, 200);
        assert_eq!(inv.count(), 2);
        assert_eq!(inv.serial_at(0), Ok(&serial("A")));
        assert_eq!(inv.serial_at(1), Ok(&serial("C")));
        assert_eq!(inv.serial_at(2), Err(InventoryError::IndexOutOfRange));
    }

    #[test]
    fn remove_unknown_serial_fails() {
        let mut inv = inventory(&[("A", 100)]);
        assert_eq!(inv.remove(b"Z").map(|_| ()), Err(InventoryError::UnknownSerial));
    }

    #[test]
    fn consume_spans_lots_fifo() {
        let mut inv = inventory(&[("A", 10), ("B", 10)]);
        let drawn = inv.consume(15).unwrap();

        assert_eq!(
            drawn.iter().map(|l| (l.serial.to_vec(), l.amount)).collect::<Vec<_>>(),
            vec![(b"A".to_vec(), 10), (b"B".to_vec(), 5)]
        );
        assert_eq!(snapshot(&inv), vec![(b"B".to_vec(), 5)]);
        assert_eq!(inv.count(), 1);
    }

    #[test]
    fn consume_removes_lots_depleted_to_zero() {
        let mut inv = inventory(&[("A", 10), ("B", 10), ("C", 10)]);
        inv.consume(20).unwrap();
        assert_eq!(snapshot(&inv), vec![(b"C".to_vec(), 10)]);
    }

    #[test]
    fn failed_consume_leaves_inventory_untouched() {
        let mut inv = inventory(&[("A", 10), ("B", 10)]);
        let before = inv.clone();
        assert_eq!(inv.consume(21).map(|_| ()), Err(InventoryError::InsufficientInventory));
        assert_eq!(inv, before);
    }

    #[test]
    fn consume_zero_is_a_noop() {
        let mut inv = inventory(&[("A", 10)]);
        assert!(inv.consume(0).unwrap().is_empty());
        assert_eq!(inv.total(), 10);
    }

    #[test]
    fn deposit_merges_existing_serial() {
        let mut inv = inventory(&[("A", 10), ("B", 10)]);
        inv.deposit(serial("A"), 5).unwrap();
        inv.deposit(serial("C"), 1).unwrap();
        assert_eq!(
            snapshot(&inv),
            vec![(b"A".to_vec(), 15), (b"B".to_vec(), 10), (b"C".to_vec(), 1)]
        );
    }

    #[test]
    fn inventory_is_bounded() {
        let mut inv = Inventory::<Test>::default();
        let max = <Test as Config>::MaxLots::get();
        for i in 0..max {
            inv.append(serial(&format!("S{i}")), 1).unwrap();
        }
        assert_eq!(inv.append(serial("overflow"), 1), Err(InventoryError::Full));
        assert_eq!(inv.deposit(serial("overflow"), 1), Err(InventoryError::Full));
        // merging into an existing entry still works when full
        assert_eq!(inv.deposit(serial("S0"), 1), Ok(()));
    }

    #[test]
    fn split_divides_portions_at_boundary() {
        let portions = vec![
            Lot::<Test> { serial: serial("A"), amount: 10 },
            Lot::<Test> { serial: serial("B"), amount: 5 },
        ];
        let (net, fee) = split(portions, 12);
        assert_eq!(
            net.iter().map(|l| (l.serial.to_vec(), l.amount)).collect::<Vec<_>>(),
            vec![(b"A".to_vec(), 10), (b"B".to_vec(), 2)]
        );
        assert_eq!(
            fee.iter().map(|l| (l.serial.to_vec(), l.amount)).collect::<Vec<_>>(),
            vec![(b"B".to_vec(), 3)]
        );
    }
}
