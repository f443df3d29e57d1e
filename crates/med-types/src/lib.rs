//! Validated value types shared by the medstock crates.
//!
//! A medicine is identified by its name, so the name type also owns the notion of the
//! normalised key used for every case-insensitive comparison.

/// Errors that can occur when creating validated medicine values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypesError {
    /// The input name was empty or contained only whitespace
    #[error("Medicine name cannot be empty.")]
    EmptyName,
    /// The price was not a finite number greater than zero
    #[error("Price must be a positive number greater than 0.")]
    InvalidPrice,
}

/// A medicine name that is guaranteed to be trimmed and non-empty.
///
/// Two names refer to the same medicine when their [`MedicineName::key`] values are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicineName(String);

impl MedicineName {
    /// Creates a new `MedicineName` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Errors
    ///
    /// Returns `TypesError::EmptyName` if the input is empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TypesError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypesError::EmptyName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the normalised key for this name.
    pub fn key(&self) -> String {
        name_key(&self.0)
    }
}

/// Normalises an arbitrary (possibly untrimmed) name into its comparison key.
///
/// Empty or whitespace-only input produces the empty key, which never equals the key of a
/// valid [`MedicineName`].
pub fn name_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl std::fmt::Display for MedicineName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for MedicineName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A price that is guaranteed to be finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Price(f64);

impl Price {
    /// Creates a new `Price`.
    ///
    /// # Errors
    ///
    /// Returns `TypesError::InvalidPrice` for NaN, infinities, zero and negative values.
    pub fn new(value: f64) -> Result<Self, TypesError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(TypesError::InvalidPrice);
        }
        Ok(Self(value))
    }

    /// Parses a price from its textual form, as submitted in a form field.
    ///
    /// Surrounding whitespace is ignored. Text that is not a number is rejected with the same
    /// error as an out-of-range number.
    pub fn parse(input: &str) -> Result<Self, TypesError> {
        let value = input
            .trim()
            .parse::<f64>()
            .map_err(|_| TypesError::InvalidPrice)?;
        Self::new(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
