//! Inputs and reports of the seeding routines.
//!
//! Every remote step reports per item instead of failing the batch, so the
//! reports carry both the successes and the reasons for each failure.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use paqueteria_models::{
    Account, AccountDescriptor, AccountId, Order, OrderStatus, Receiver, Sender,
};
use paqueteria_store::DocumentRef;

use super::fixtures;

/// Result of provisioning one account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccountOutcome {
    Created(AccountId),
    AlreadyExists(AccountId),
    Failed(String),
}

impl AccountOutcome {
    /// The account id, unless provisioning failed.
    pub fn account_id(&self) -> Option<&AccountId> {
        match self {
            AccountOutcome::Created(id) | AccountOutcome::AlreadyExists(id) => Some(id),
            AccountOutcome::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, AccountOutcome::Failed(_))
    }
}

#[derive(Clone, Debug)]
pub struct ProvisionedAccount {
    pub descriptor: AccountDescriptor,
    pub outcome: AccountOutcome,
    /// The provider's view of the account, when one was returned.
    pub account: Option<Account>,
}

#[derive(Clone, Debug, Default)]
pub struct ProvisionReport {
    pub accounts: Vec<ProvisionedAccount>,
}

impl ProvisionReport {
    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, AccountOutcome::Created(_)))
    }

    pub fn already_existing(&self) -> usize {
        self.count(|o| matches!(o, AccountOutcome::AlreadyExists(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(AccountOutcome::is_failed)
    }

    /// Accounts that have an id, paired with the descriptor used for them.
    pub fn successful(&self) -> impl Iterator<Item = (&AccountId, &AccountDescriptor)> {
        self.accounts
            .iter()
            .filter_map(|p| p.outcome.account_id().map(|id| (id, &p.descriptor)))
    }

    fn count(&self, predicate: impl Fn(&AccountOutcome) -> bool) -> usize {
        self.accounts.iter().filter(|p| predicate(&p.outcome)).count()
    }
}

/// A record that could not be written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedRecord {
    pub label: String,
    pub reason: String,
}

#[derive(Clone, Debug, Default)]
pub struct ProfileReport {
    /// Keys of the profile documents written.
    pub written: Vec<String>,
    pub failed: Vec<FailedRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionReset {
    pub collection: String,
    pub deleted: usize,
    /// Documents whose delete failed.
    pub failed: usize,
    /// Set when the collection could not be listed at all.
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ResetReport {
    pub collections: Vec<CollectionReset>,
}

impl ResetReport {
    pub fn total_deleted(&self) -> usize {
        self.collections.iter().map(|c| c.deleted).sum()
    }
}

/// A record inserted under a store-generated id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsertedRecord {
    /// Position of the record in its batch.
    pub index: usize,
    pub reference: DocumentRef,
}

#[derive(Clone, Debug)]
pub struct InsertReport {
    pub collection: String,
    pub inserted: Vec<InsertedRecord>,
    pub failed: Vec<FailedRecord>,
}

impl InsertReport {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            inserted: Vec::new(),
            failed: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SampleReport {
    pub senders: InsertReport,
    pub receivers: InsertReport,
    pub orders: InsertReport,
    /// Inserted orders per current status.
    pub order_status_counts: BTreeMap<OrderStatus, usize>,
}

/// The fixed sample records.
#[derive(Clone, Debug, Default)]
pub struct SampleBatch {
    pub senders: Vec<Sender>,
    pub receivers: Vec<Receiver>,
    pub orders: Vec<Order>,
}

/// Everything a full seeding run writes.
#[derive(Clone, Debug, Default)]
pub struct SeedPlan {
    pub accounts: Vec<AccountDescriptor>,
    pub samples: SampleBatch,
}

impl SeedPlan {
    /// The standard fixtures, with order dates relative to `now`.
    pub fn fixtures(now: DateTime<Utc>) -> Self {
        Self {
            accounts: fixtures::default_accounts(),
            samples: fixtures::sample_batch(now),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SeedSummary {
    pub accounts: ProvisionReport,
    pub profiles: ProfileReport,
    /// `None` when the reset step was skipped.
    pub reset: Option<ResetReport>,
    pub samples: SampleReport,
}
