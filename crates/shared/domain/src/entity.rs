use crate::constants::{CUSTOMERS, DATA_FILE_EXTENSION, INVOICES, PLANS, SUBSCRIPTIONS};
use strum::{Display, EnumCount};

/// The four record collections served by the API.
///
/// The discriminant doubles as the collection slot index inside the record store,
/// and the declaration order is the startup load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumCount)]
#[strum(serialize_all = "lowercase")]
pub enum Entity {
    Customers,
    Subscriptions,
    Invoices,
    Plans,
}

impl Entity {
    /// All entities in load order.
    pub const ALL: [Self; Self::COUNT] =
        [Self::Customers, Self::Subscriptions, Self::Invoices, Self::Plans];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Customers => CUSTOMERS,
            Self::Subscriptions => SUBSCRIPTIONS,
            Self::Invoices => INVOICES,
            Self::Plans => PLANS,
        }
    }

    /// Data file backing the collection, e.g. `customers.jsonl`.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}.{DATA_FILE_EXTENSION}", self.name())
    }

    /// Stable slot index in `0..Entity::COUNT`.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}
