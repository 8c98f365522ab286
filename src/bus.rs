//! Bus ownership and the lock bracket around each transfer.

/// How the driver holds its I2C bus. Fixed for the lifetime of the driver.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ownership {
    /// The driver owns the bus and drops it together with itself.
    Owned,
    /// The bus belongs to the caller, who outlives the driver.
    Borrowed,
}

/// I2C bus held by the driver, either owned or borrowed from the caller.
pub enum Bus<'a, I2C> {
    /// Bus moved into the driver.
    Owned(I2C),
    /// Bus lent by the caller.
    Borrowed(&'a mut I2C),
}

impl<I2C> Bus<'_, I2C> {
    /// Reports whether the bus is owned or borrowed.
    pub fn ownership(&self) -> Ownership {
        match self {
            Bus::Owned(_) => Ownership::Owned,
            Bus::Borrowed(_) => Ownership::Borrowed,
        }
    }

    pub(crate) fn get_mut(&mut self) -> &mut I2C {
        match self {
            Bus::Owned(i2c) => i2c,
            Bus::Borrowed(i2c) => &mut **i2c,
        }
    }

    /// Gives back the owned bus. Returns `None` for a borrowed bus.
    pub fn into_owned(self) -> Option<I2C> {
        match self {
            Bus::Owned(i2c) => Some(i2c),
            Bus::Borrowed(_) => None,
        }
    }
}

/// Mutual exclusion around a single bus transfer.
///
/// Implement this for the platform's mutex when several threads or tasks share the
/// physical bus. Every transfer the driver makes is bracketed by exactly one `lock` and
/// one `unlock`, and `unlock` runs even when the transfer fails.
pub trait BusLock {
    /// Acquires the bus. Blocks until it is available.
    fn lock(&self);
    /// Releases the bus.
    fn unlock(&self);
}

impl<L: BusLock + ?Sized> BusLock for &L {
    fn lock(&self) {
        (**self).lock()
    }

    fn unlock(&self) {
        (**self).unlock()
    }
}

/// Lock for a bus the driver has exclusive access to. Does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLock;

impl BusLock for NoLock {
    fn lock(&self) {}

    fn unlock(&self) {}
}

/// Holds the lock until dropped.
struct LockGuard<'l, L: BusLock>(&'l L);

impl<'l, L: BusLock> LockGuard<'l, L> {
    fn acquire(lock: &'l L) -> Self {
        lock.lock();
        LockGuard(lock)
    }
}

impl<L: BusLock> Drop for LockGuard<'_, L> {
    fn drop(&mut self) {
        self.0.unlock();
    }
}

/// Runs one transfer with the bus locked.
pub(crate) fn locked<L, T, F>(lock: &L, transfer: F) -> T
where
    L: BusLock,
    F: FnOnce() -> T,
{
    let _guard = LockGuard::acquire(lock);
    transfer()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use core::cell::RefCell;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub(crate) enum LockEvent {
        Lock,
        Unlock,
    }

    /// Records lock and unlock calls, and panics on unbalanced use.
    #[derive(Default)]
    pub(crate) struct RecordingLock {
        pub(crate) events: RefCell<Vec<LockEvent>>,
    }

    impl BusLock for RecordingLock {
        fn lock(&self) {
            let mut events = self.events.borrow_mut();
            assert_ne!(events.last(), Some(&LockEvent::Lock), "lock taken twice");
            events.push(LockEvent::Lock);
        }

        fn unlock(&self) {
            let mut events = self.events.borrow_mut();
            assert_eq!(events.last(), Some(&LockEvent::Lock), "unlock without lock");
            events.push(LockEvent::Unlock);
        }
    }

    #[test]
    fn test_ownership() {
        let mut external = 7u8;
        let owned: Bus<'_, u8> = Bus::Owned(3);
        let borrowed = Bus::Borrowed(&mut external);

        assert_eq!(owned.ownership(), Ownership::Owned);
        assert_eq!(borrowed.ownership(), Ownership::Borrowed);
        assert_eq!(owned.into_owned(), Some(3));
        assert_eq!(borrowed.into_owned(), None);
    }

    #[test]
    fn test_borrowed_bus_writes_through() {
        let mut external = 7u8;
        {
            let mut bus = Bus::Borrowed(&mut external);
            *bus.get_mut() = 9;
        }
        assert_eq!(external, 9);
    }

    #[test]
    fn test_locked_brackets_transfer() {
        let lock = RecordingLock::default();

        let value = locked(&lock, || {
            assert_eq!(*lock.events.borrow(), [LockEvent::Lock]);
            42
        });

        assert_eq!(value, 42);
        assert_eq!(*lock.events.borrow(), [LockEvent::Lock, LockEvent::Unlock]);
    }

    #[test]
    fn test_locked_unlocks_on_error() {
        let lock = RecordingLock::default();

        let result: Result<(), ()> = locked(&lock, || Err(()));

        assert!(result.is_err());
        assert_eq!(*lock.events.borrow(), [LockEvent::Lock, LockEvent::Unlock]);
    }
}
