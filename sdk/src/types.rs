use fireblocks_core::{Error, Result};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Operation performed by a transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Move funds between two peers.
    #[default]
    Transfer,
    /// Mint new tokens.
    Mint,
    /// Burn tokens.
    Burn,
}

impl TransactionType {
    /// Every transaction type, in wire order.
    pub const ALL: [TransactionType; 3] = [Self::Transfer, Self::Mint, Self::Burn];

    /// Wire name of this transaction type.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Transfer => "TRANSFER",
            TransactionType::Mint => "MINT",
            TransactionType::Burn => "BURN",
        }
    }
}

/// Status of a transaction as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum TransactionStatus {
    Submitted,
    Queued,
    PendingSignature,
    PendingAuthorization,
    #[serde(rename = "PENDING_3RD_PARTY_MANUAL_APPROVAL")]
    Pending3rdPartyManualApproval,
    #[serde(rename = "PENDING_3RD_PARTY")]
    Pending3rdParty,
    Broadcasting,
    Confirming,
    Completed,
    PendingAmlCheckup,
    PartiallyCompleted,
    Cancelling,
    Cancelled,
    Rejected,
    Failed,
    Timeout,
    Blocked,
}

impl TransactionStatus {
    /// Every transaction status, in wire order.
    pub const ALL: [TransactionStatus; 17] = [
        Self::Submitted,
        Self::Queued,
        Self::PendingSignature,
        Self::PendingAuthorization,
        Self::Pending3rdPartyManualApproval,
        Self::Pending3rdParty,
        Self::Broadcasting,
        Self::Confirming,
        Self::Completed,
        Self::PendingAmlCheckup,
        Self::PartiallyCompleted,
        Self::Cancelling,
        Self::Cancelled,
        Self::Rejected,
        Self::Failed,
        Self::Timeout,
        Self::Blocked,
    ];

    /// Wire name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Submitted => "SUBMITTED",
            TransactionStatus::Queued => "QUEUED",
            TransactionStatus::PendingSignature => "PENDING_SIGNATURE",
            TransactionStatus::PendingAuthorization => "PENDING_AUTHORIZATION",
            TransactionStatus::Pending3rdPartyManualApproval => "PENDING_3RD_PARTY_MANUAL_APPROVAL",
            TransactionStatus::Pending3rdParty => "PENDING_3RD_PARTY",
            TransactionStatus::Broadcasting => "BROADCASTING",
            TransactionStatus::Confirming => "CONFIRMING",
            TransactionStatus::Completed => "COMPLETED",
            TransactionStatus::PendingAmlCheckup => "PENDING_AML_CHECKUP",
            TransactionStatus::PartiallyCompleted => "PARTIALLY_COMPLETED",
            TransactionStatus::Cancelling => "CANCELLING",
            TransactionStatus::Cancelled => "CANCELLED",
            TransactionStatus::Rejected => "REJECTED",
            TransactionStatus::Failed => "FAILED",
            TransactionStatus::Timeout => "TIMEOUT",
            TransactionStatus::Blocked => "BLOCKED",
        }
    }
}

/// Sort key for transaction listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderBy {
    /// Order by creation time.
    CreatedAt,
    /// Order by last update time.
    LastUpdated,
}

impl OrderBy {
    /// Every sort key.
    pub const ALL: [OrderBy; 2] = [Self::CreatedAt, Self::LastUpdated];

    /// Wire name of this sort key.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderBy::CreatedAt => "createdAt",
            OrderBy::LastUpdated => "lastUpdated",
        }
    }
}

macro_rules! impl_wire_enum {
    ($ty:ident, $what:literal) => {
        impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::ALL
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| Error::request_invalid(format!("invalid {}: {s:?}", $what)))
            }
        }
    };
}

impl_wire_enum!(TransactionType, "transaction type");
impl_wire_enum!(TransactionStatus, "transaction status");
impl_wire_enum!(OrderBy, "order by");

/// Identifier of an account or wallet taking part in a transfer.
///
/// Always non-blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PeerId(String);

impl PeerId {
    /// Create a peer id, rejecting blank values.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Error::request_invalid("transfer peer id must not be empty"));
        }
        Ok(Self(id))
    }

    /// The id as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Destination address not registered as a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OneTimeAddress {
    address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<String>,
}

impl OneTimeAddress {
    /// Create a one-time address, rejecting a blank address.
    ///
    /// A blank tag is treated as no tag.
    pub fn new(address: impl Into<String>, tag: Option<String>) -> Result<Self> {
        let address = address.into();
        if address.trim().is_empty() {
            return Err(Error::request_invalid("one-time address must not be empty"));
        }
        let tag = tag.filter(|v| !v.trim().is_empty());
        Ok(Self { address, tag })
    }

    /// The address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Memo or destination tag, for chains that need one.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

/// Source or destination of a transaction.
///
/// Serialized as `{"type": "VAULT_ACCOUNT", "id": "0"}`, or for one-time
/// addresses as `{"type": "ONE_TIME_ADDRESS", "oneTimeAddress": {"address": ..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransferPeerPath {
    /// A vault account.
    VaultAccount(PeerId),
    /// A connected exchange account.
    ExchangeAccount(PeerId),
    /// A network connection.
    NetworkConnection(PeerId),
    /// A whitelisted internal wallet.
    InternalWallet(PeerId),
    /// A whitelisted external wallet.
    ExternalWallet(PeerId),
    /// An arbitrary address. Only valid as a destination.
    OneTimeAddress(OneTimeAddress),
}

impl TransferPeerPath {
    /// Reference a vault account.
    pub fn vault_account(id: impl Into<String>) -> Result<Self> {
        Ok(Self::VaultAccount(PeerId::new(id)?))
    }

    /// Reference an exchange account.
    pub fn exchange_account(id: impl Into<String>) -> Result<Self> {
        Ok(Self::ExchangeAccount(PeerId::new(id)?))
    }

    /// Reference a network connection.
    pub fn network_connection(id: impl Into<String>) -> Result<Self> {
        Ok(Self::NetworkConnection(PeerId::new(id)?))
    }

    /// Reference an internal wallet.
    pub fn internal_wallet(id: impl Into<String>) -> Result<Self> {
        Ok(Self::InternalWallet(PeerId::new(id)?))
    }

    /// Reference an external wallet.
    pub fn external_wallet(id: impl Into<String>) -> Result<Self> {
        Ok(Self::ExternalWallet(PeerId::new(id)?))
    }

    /// Send to an address directly.
    pub fn one_time_address(address: impl Into<String>, tag: Option<String>) -> Result<Self> {
        Ok(Self::OneTimeAddress(OneTimeAddress::new(address, tag)?))
    }

    /// Wire name of the peer type.
    pub fn peer_type(&self) -> &'static str {
        match self {
            TransferPeerPath::VaultAccount(_) => "VAULT_ACCOUNT",
            TransferPeerPath::ExchangeAccount(_) => "EXCHANGE_ACCOUNT",
            TransferPeerPath::NetworkConnection(_) => "NETWORK_CONNECTION",
            TransferPeerPath::InternalWallet(_) => "INTERNAL_WALLET",
            TransferPeerPath::ExternalWallet(_) => "EXTERNAL_WALLET",
            TransferPeerPath::OneTimeAddress(_) => "ONE_TIME_ADDRESS",
        }
    }

    fn id(&self) -> Option<&PeerId> {
        match self {
            TransferPeerPath::VaultAccount(id)
            | TransferPeerPath::ExchangeAccount(id)
            | TransferPeerPath::NetworkConnection(id)
            | TransferPeerPath::InternalWallet(id)
            | TransferPeerPath::ExternalWallet(id) => Some(id),
            TransferPeerPath::OneTimeAddress(_) => None,
        }
    }
}

impl Serialize for TransferPeerPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", self.peer_type())?;
        match (self, self.id()) {
            (TransferPeerPath::OneTimeAddress(addr), _) => {
                map.serialize_entry("oneTimeAddress", addr)?
            }
            (_, Some(id)) => map.serialize_entry("id", id)?,
            (_, None) => {}
        }
        map.end()
    }
}

/// Filter for [`ApiClient::get_transactions`](crate::ApiClient::get_transactions).
///
/// Unset fields are left out of the query string. Zero timestamps and a
/// zero limit count as unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Only transactions created before this time, in milliseconds since the Unix epoch.
    pub before: Option<u64>,
    /// Only transactions created after this time, in milliseconds since the Unix epoch.
    pub after: Option<u64>,
    /// Only transactions in this status.
    pub status: Option<TransactionStatus>,
    /// Sort key.
    pub order_by: Option<OrderBy>,
    /// Maximum number of transactions returned.
    pub limit: Option<u32>,
}

impl TransactionFilter {
    /// Create an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `before`.
    pub fn with_before(mut self, before: u64) -> Self {
        self.before = Some(before);
        self
    }

    /// Set `after`.
    pub fn with_after(mut self, after: u64) -> Self {
        self.after = Some(after);
        self
    }

    /// Set `status`.
    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set `order_by`.
    pub fn with_order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    /// Set `limit`.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Encode the set fields as a query string, in the order `before`,
    /// `after`, `status`, `orderBy`, `limit`.
    ///
    /// Returns `None` when nothing is set.
    pub fn to_query(&self) -> Option<String> {
        let mut query = form_urlencoded::Serializer::new(String::new());
        let mut empty = true;

        if let Some(v) = self.before.filter(|v| *v != 0) {
            query.append_pair("before", &v.to_string());
            empty = false;
        }
        if let Some(v) = self.after.filter(|v| *v != 0) {
            query.append_pair("after", &v.to_string());
            empty = false;
        }
        if let Some(v) = self.status {
            query.append_pair("status", v.as_str());
            empty = false;
        }
        if let Some(v) = self.order_by {
            query.append_pair("orderBy", v.as_str());
            empty = false;
        }
        if let Some(v) = self.limit.filter(|v| *v != 0) {
            query.append_pair("limit", &v.to_string());
            empty = false;
        }

        (!empty).then(|| query.finish())
    }
}

/// Parameters of [`ApiClient::create_transaction`](crate::ApiClient::create_transaction).
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRequest {
    /// Asset symbol, for example `BTC`.
    pub asset_id: String,
    /// Amount to move. Must be finite and positive.
    pub amount: f64,
    /// Where the funds come from.
    pub source: TransferPeerPath,
    /// Where the funds go, if the operation has a destination.
    pub destination: Option<TransferPeerPath>,
    /// Fee in the asset's smallest unit per byte.
    pub fee: Option<f64>,
    /// Gas price for ETH and ERC-20 transfers.
    pub gas_price: Option<f64>,
    /// Ask the server to wait for the transaction status before responding.
    pub wait_for_status: bool,
    /// Operation, `TRANSFER` unless set.
    pub operation: TransactionType,
}

impl TransactionRequest {
    /// Create a transfer of `amount` of `asset_id` out of `source`.
    pub fn new(asset_id: impl Into<String>, amount: f64, source: TransferPeerPath) -> Self {
        Self {
            asset_id: asset_id.into(),
            amount,
            source,
            destination: None,
            fee: None,
            gas_price: None,
            wait_for_status: false,
            operation: TransactionType::default(),
        }
    }

    /// Set the destination.
    pub fn with_destination(mut self, destination: TransferPeerPath) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Set the fee.
    pub fn with_fee(mut self, fee: f64) -> Self {
        self.fee = Some(fee);
        self
    }

    /// Set the gas price.
    pub fn with_gas_price(mut self, gas_price: f64) -> Self {
        self.gas_price = Some(gas_price);
        self
    }

    /// Set `wait_for_status`.
    pub fn with_wait_for_status(mut self, wait: bool) -> Self {
        self.wait_for_status = wait;
        self
    }

    /// Set the operation.
    pub fn with_operation(mut self, operation: TransactionType) -> Self {
        self.operation = operation;
        self
    }

    /// Check the request and build the JSON body sent to the server.
    pub(crate) fn to_body(&self) -> Result<TransactionBody<'_>> {
        if self.asset_id.trim().is_empty() {
            return Err(Error::request_invalid("asset id must not be empty"));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::request_invalid(format!(
                "amount must be a positive number, got {}",
                self.amount
            )));
        }
        for (name, value) in [("fee", self.fee), ("gas price", self.gas_price)] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(Error::request_invalid(format!(
                        "{name} must be a non-negative number, got {v}"
                    )));
                }
            }
        }
        if matches!(self.source, TransferPeerPath::OneTimeAddress(_)) {
            return Err(Error::request_invalid(
                "a one-time address can't be a transaction source",
            ));
        }

        Ok(TransactionBody {
            asset_id: &self.asset_id,
            amount: self.amount,
            source: &self.source,
            wait_for_status: self.wait_for_status,
            operation: self.operation,
            fee: self.fee.filter(|v| *v != 0.0),
            gas_price: self.gas_price.filter(|v| *v != 0.0),
            destination: self.destination.as_ref(),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TransactionBody<'a> {
    asset_id: &'a str,
    amount: f64,
    source: &'a TransferPeerPath,
    wait_for_status: bool,
    operation: TransactionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gas_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    destination: Option<&'a TransferPeerPath>,
}
