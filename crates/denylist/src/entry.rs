//! Single denylist entries and their text form

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Separator between vendor and product id in the flat text form
pub const DELIMITER: char = ':';

/// Why a `vendor:product` token pair was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("missing ':' delimiter")]
    MissingDelimiter,

    #[error("empty vendor id")]
    EmptyVendorId,

    #[error("empty product id")]
    EmptyProductId,

    #[error("more than one ':' delimiter")]
    ExtraDelimiter,
}

/// A vendor id / product id pair
///
/// Both ids are opaque, case-sensitive tokens. In practice they are
/// hexadecimal USB ids, but only non-emptiness and the absence of
/// [`DELIMITER`] are enforced.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DenylistEntry {
    vendor_id: String,
    product_id: String,
}

impl DenylistEntry {
    pub fn new(
        vendor_id: impl Into<String>,
        product_id: impl Into<String>,
    ) -> Result<Self, EntryError> {
        let vendor_id = vendor_id.into();
        let product_id = product_id.into();

        if vendor_id.is_empty() {
            return Err(EntryError::EmptyVendorId);
        }
        if product_id.is_empty() {
            return Err(EntryError::EmptyProductId);
        }
        if vendor_id.contains(DELIMITER) || product_id.contains(DELIMITER) {
            return Err(EntryError::ExtraDelimiter);
        }

        Ok(Self {
            vendor_id,
            product_id,
        })
    }

    /// Parse one line of flat text
    ///
    /// The line is split on the first delimiter; anything that is not exactly
    /// two non-empty tokens is rejected. Tokens are taken verbatim, without
    /// trimming.
    pub fn parse(line: &str) -> Result<Self, EntryError> {
        let (vendor_id, product_id) = line
            .split_once(DELIMITER)
            .ok_or(EntryError::MissingDelimiter)?;
        Self::new(vendor_id, product_id)
    }

    pub fn vendor_id(&self) -> &str {
        &self.vendor_id
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }
}

impl FromStr for DenylistEntry {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DenylistEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.vendor_id, DELIMITER, self.product_id)
    }
}
