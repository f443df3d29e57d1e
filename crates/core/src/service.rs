//! Create, read, update and delete operations over the medicines document.
//!
//! Every mutation is a whole-document read → modify → write against [`MedicineStore`]. Within
//! one process the writer lock keeps two mutations from interleaving; separate processes sharing
//! the same file are last-writer-wins.

use crate::aggregate::{self, PriceAggregate};
use crate::error::{MedicineError, MedicineResult};
use crate::store::{MedicineStore, StoredMedicine};
use crate::CoreConfig;
use med_types::{MedicineName, Price};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Requested changes to an existing medicine. At least one field must be set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MedicineUpdate {
    pub price: Option<f64>,
    pub new_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MedicineService {
    store: MedicineStore,
    write_lock: Arc<Mutex<()>>,
}

impl MedicineService {
    pub fn new(cfg: &CoreConfig) -> Self {
        Self::with_store(MedicineStore::new(cfg))
    }

    pub fn with_store(store: MedicineStore) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn store(&self) -> &MedicineStore {
        &self.store
    }

    /// Returns every stored record in stored order.
    pub fn list(&self) -> MedicineResult<Vec<StoredMedicine>> {
        Ok(self.store.read()?.medicines)
    }

    /// Looks up one record by case-insensitive name.
    pub fn get(&self, name: &str) -> MedicineResult<StoredMedicine> {
        let key = MedicineName::new(name)?.key();
        self.store
            .read()?
            .medicines
            .into_iter()
            .find(|m| m.key() == key)
            .ok_or(MedicineError::NotFound)
    }

    pub fn average_price(&self) -> MedicineResult<PriceAggregate> {
        Ok(aggregate::average(&self.store.read()?))
    }

    /// Adds a new medicine.
    ///
    /// # Errors
    /// Returns:
    /// - `EmptyName` if `name` trims to nothing,
    /// - `InvalidPrice` if `price` is not finite and greater than zero,
    /// - `DuplicateName` if a record with the same case-insensitive name exists,
    /// - `Storage` if the document cannot be read or written.
    pub fn create(&self, name: &str, price: f64) -> MedicineResult<StoredMedicine> {
        let name = MedicineName::new(name)?;
        let price = Price::new(price)?;

        let _guard = self.lock();
        let mut document = self.store.read()?;

        let key = name.key();
        if document.medicines.iter().any(|m| m.key() == key) {
            return Err(MedicineError::DuplicateName);
        }

        let record = StoredMedicine::new(&name, price);
        document.medicines.push(record.clone());
        self.store.write(&document)?;

        tracing::info!("created medicine {}", name);
        Ok(record)
    }

    /// Changes the price and/or the name of an existing medicine.
    ///
    /// Renaming a record to its own name with different casing or padding is allowed.
    ///
    /// # Errors
    /// Returns:
    /// - `EmptyName` if `name` trims to nothing,
    /// - `InvalidPrice` if a price is given that is not finite and greater than zero,
    /// - `EmptyNewName` if a new name is given that trims to nothing,
    /// - `NothingToUpdate` if neither a price nor a new name is given,
    /// - `DuplicateName` if the new name belongs to a different record,
    /// - `NotFound` if no record matches `name`,
    /// - `Storage` if the document cannot be read or written.
    pub fn update(&self, name: &str, changes: MedicineUpdate) -> MedicineResult<StoredMedicine> {
        let name = MedicineName::new(name)?;
        let price = changes.price.map(Price::new).transpose()?;
        let new_name = changes
            .new_name
            .map(|n| MedicineName::new(n).map_err(|_| MedicineError::EmptyNewName))
            .transpose()?;
        if price.is_none() && new_name.is_none() {
            return Err(MedicineError::NothingToUpdate);
        }

        let _guard = self.lock();
        let mut document = self.store.read()?;

        let key = name.key();
        if let Some(new_name) = &new_name {
            let new_key = new_name.key();
            let collides = document
                .medicines
                .iter()
                .any(|m| m.key() == new_key && m.key() != key);
            if collides {
                return Err(MedicineError::DuplicateName);
            }
        }

        let record = document
            .medicines
            .iter_mut()
            .find(|m| m.key() == key)
            .ok_or(MedicineError::NotFound)?;
        if let Some(new_name) = &new_name {
            record.set_name(new_name);
        }
        if let Some(price) = price {
            record.set_price(price);
        }
        let updated = record.clone();

        self.store.write(&document)?;

        tracing::info!(
            "updated medicine {}{}",
            name,
            new_name
                .as_ref()
                .map(|n| format!(" (now {n})"))
                .unwrap_or_default()
        );
        Ok(updated)
    }

    /// Removes the medicine with the given case-insensitive name.
    ///
    /// Returns the trimmed name that was matched.
    ///
    /// # Errors
    /// Returns `EmptyName`, `NotFound`, or `Storage`. On `NotFound` the document is not
    /// rewritten.
    pub fn delete(&self, name: &str) -> MedicineResult<MedicineName> {
        let name = MedicineName::new(name)?;

        let _guard = self.lock();
        let mut document = self.store.read()?;

        let key = name.key();
        let before = document.medicines.len();
        document.medicines.retain(|m| m.key() != key);
        if document.medicines.len() == before {
            return Err(MedicineError::NotFound);
        }

        self.store.write(&document)?;

        tracing::info!("deleted medicine {}", name);
        Ok(name)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
