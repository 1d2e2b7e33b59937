//! # Connected Accounts
//!
//! Account listings are relayed to the browser verbatim; only the fields
//! this server reads are typed, everything else rides along in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default page size for account listings
pub const ACCOUNT_LIST_LIMIT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectedAccount {
    /// Account id (`acct_...`)
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountList {
    pub data: Vec<ConnectedAccount>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Whether `id` can be placed in a request path or `Stripe-Account` header.
///
/// Account ids are `acct_` followed by alphanumerics; anything outside
/// `[A-Za-z0-9_]` is refused.
pub fn is_valid_account_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

impl AccountList {
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.data.iter().map(|a| a.id.as_str())
    }
}
