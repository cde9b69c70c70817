mod common;

use std::collections::BTreeSet;

use common::{admin_descriptor, generate_unique_email, setup, test_plan};
use paqueteria::paqueteria_models::{AccountDescriptor, Role};
use paqueteria::paqueteria_store::AccountProvider;
use paqueteria::seeder::{AccountOutcome, provision_account, provision_accounts};
use paqueteria_store::InMemoryAccounts;

#[tokio::test]
async fn test_admin_created_then_already_exists() {
    let (accounts, _) = setup();

    let first = provision_account(&accounts, &admin_descriptor()).await;
    let second = provision_account(&accounts, &admin_descriptor()).await;

    let AccountOutcome::Created(created_id) = first.outcome else {
        panic!("first run should create the account");
    };
    let AccountOutcome::AlreadyExists(existing_id) = second.outcome else {
        panic!("second run should find the existing account");
    };
    assert_eq!(created_id, existing_id);

    let stored = accounts
        .find_account_by_email("admin@paqueteria.com")
        .await
        .unwrap();
    assert_eq!(stored.id, created_id);
    assert_eq!(stored.display_name.as_deref(), Some("Administrador Principal"));
}

#[tokio::test]
async fn test_provisioning_twice_keeps_same_emails() {
    let (accounts, _) = setup();
    let plan = test_plan();

    let first = provision_accounts(&accounts, &plan.accounts).await;
    let second = provision_accounts(&accounts, &plan.accounts).await;

    assert_eq!(first.created(), plan.accounts.len());
    assert_eq!(second.created(), 0);
    assert_eq!(second.already_existing(), plan.accounts.len());
    assert_eq!(accounts.len().await, plan.accounts.len());

    let emails: BTreeSet<String> = first
        .accounts
        .iter()
        .chain(second.accounts.iter())
        .map(|p| p.descriptor.email.clone())
        .collect();
    assert_eq!(emails.len(), plan.accounts.len());
}

#[tokio::test]
async fn test_every_descriptor_classified_once() {
    let email = generate_unique_email();
    let accounts = InMemoryAccounts::new().failing_creation_for(&email);
    let descriptors = vec![
        admin_descriptor(),
        AccountDescriptor::new(email.clone(), "Rep123!", "Temporal", Role::Repartidor),
        AccountDescriptor::new(generate_unique_email(), "Rep123!", "Otro", Role::Repartidor),
    ];

    let report = provision_accounts(&accounts, &descriptors).await;

    assert_eq!(report.accounts.len(), descriptors.len());
    assert_eq!(report.created() + report.already_existing() + report.failed(), 3);
    assert_eq!(report.failed(), 1);
    assert!(report.accounts[1].outcome.is_failed());
    assert!(accounts.get(&email).await.is_none());
}
