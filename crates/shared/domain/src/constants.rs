//! Wire-level names shared by the loader, the router and the documentation.

pub const CUSTOMERS: &str = "customers";
pub const SUBSCRIPTIONS: &str = "subscriptions";
pub const INVOICES: &str = "invoices";
pub const PLANS: &str = "plans";

/// Reserved query parameter selecting the page (1-based).
pub const PAGE_PARAM: &str = "page";
/// Reserved query parameter selecting the page size.
pub const LIMIT_PARAM: &str = "limit";

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 50;

/// Extension of the line-delimited JSON data files.
pub const DATA_FILE_EXTENSION: &str = "jsonl";

pub const SYSTEM_TAG: &str = "System";
pub const BILLING_TAG: &str = "Billing";

pub const BANNER: &str = "Subscription Mock API running. Visit /api-docs for the API reference.";
