//! Integration tests for wealthwatch-core

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::str::FromStr;
use uuid::Uuid;
use wealthwatch_core::{
    utils::MemoryStore, BudgetStore, BudgetTracker, CategoryKind, ExpenseFilter, MonthlyImporter,
    NettingEngine, Participant, SharedExpense, SharedLedgerStore, Split, TaxonomyImporter,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const TAXONOMY_SHEET: &str = "\
READ THIS FIRST: template instructions,,
Income Categories,,
Paycheck,,
Side Hustle,,
Expense Categories (edit as needed),,
Housing,,
,,ADU
,,Rent
Food,,Groceries
Savings Categories,,
Emergency Fund,,
Yearly Saving Goal,,
Stray row after the sheet ends,,
";

const MONTHLY_SHEET: &str = "\
FinancialDocs-2024 - Jan,,,
Monthly Budget,,,
Date,Cost,Category,Notes
Jan 5,\"$1,200.50\",Rent,rent payment
Jan 7,$42.10,Takeout,dinner out
Jan 8,-5,Rent,refund row
Jan 9,abc,Rent,typo row
Bad 1,$10,Rent,unparseable date
Jan 31,$20,Rent,
Summary,,,
Feb 2,$99,Rent,after terminator
";

#[tokio::test]
async fn taxonomy_import_reconciles_and_is_idempotent() {
    init_logging();
    let store = MemoryStore::new();
    let family = Uuid::new_v4();
    let mut importer = TaxonomyImporter::new(store.clone());

    let summary = importer.import(family, TAXONOMY_SHEET).await.unwrap();
    // Paycheck, Side Hustle, Housing, Food, Emergency Fund
    assert_eq!(summary.created_categories, 5);
    // ADU, Rent, Groceries
    assert_eq!(summary.created_sub_categories, 3);
    // Only the stray row outside every section counts as skipped.
    assert_eq!(summary.skipped, 1);

    // Income and savings sections collapse onto the savings kind.
    let savings = store
        .list_categories(family, Some(CategoryKind::Savings))
        .await
        .unwrap();
    let names: Vec<&str> = savings.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Emergency Fund", "Paycheck", "Side Hustle"]);

    let expense = store
        .list_categories(family, Some(CategoryKind::Expense))
        .await
        .unwrap();
    let names: Vec<&str> = expense.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Food", "Housing"]);

    // Sub-categories hang off the expense category in effect when their row
    // was seen.
    let housing = expense.iter().find(|c| c.name == "Housing").unwrap();
    let subs = store
        .list_sub_categories(family, Some(housing.id))
        .await
        .unwrap();
    let names: Vec<&str> = subs.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["ADU", "Rent"]);

    // Re-importing the identical sheet creates nothing new.
    let second = importer.import(family, TAXONOMY_SHEET).await.unwrap();
    assert_eq!(second.created_categories, 0);
    assert_eq!(second.created_sub_categories, 0);
    assert_eq!(second.skipped, 1);
}

#[tokio::test]
async fn clean_taxonomy_reimport_reports_all_zeros() {
    let store = MemoryStore::new();
    let family = Uuid::new_v4();
    let mut importer = TaxonomyImporter::new(store);

    let sheet = "Expense Categories,,\nHousing,,ADU\n";
    let first = importer.import(family, sheet).await.unwrap();
    assert_eq!(first.created_categories, 1);
    assert_eq!(first.created_sub_categories, 1);
    assert_eq!(first.skipped, 0);

    let second = importer.import(family, sheet).await.unwrap();
    assert_eq!(second.created_categories, 0);
    assert_eq!(second.created_sub_categories, 0);
    assert_eq!(second.skipped, 0);
}

#[tokio::test]
async fn taxonomy_import_tolerates_byte_order_mark() {
    let store = MemoryStore::new();
    let family = Uuid::new_v4();
    let mut importer = TaxonomyImporter::new(store);

    let sheet = "\u{feff}Expense Categories,,\nHousing,,\n";
    let summary = importer.import(family, sheet).await.unwrap();
    assert_eq!(summary.created_categories, 1);
}

#[tokio::test]
async fn monthly_import_resolves_categories_and_counts_skips() {
    init_logging();
    let store = MemoryStore::new();
    let family = Uuid::new_v4();
    let user = Uuid::new_v4();

    // Existing taxonomy: Housing with a Rent sub-category.
    let mut tracker = BudgetTracker::new(store.clone());
    let housing = tracker
        .create_category(family, CategoryKind::Expense, "Housing")
        .await
        .unwrap();
    let rent = tracker
        .create_sub_category(family, housing.id, "Rent")
        .await
        .unwrap();

    let mut importer = MonthlyImporter::new(store.clone());
    let summary = importer
        .import(family, user, &[MONTHLY_SHEET])
        .await
        .unwrap();

    assert_eq!(summary.created_budget_expenses, 3);
    // Negative cost, unparseable cost, unparseable date.
    assert_eq!(summary.skipped, 3);
    // "Takeout" had no matching sub-category and landed under Imported.
    assert_eq!(summary.created_categories, 1);
    assert_eq!(summary.created_sub_categories, 1);

    let expenses = store
        .list_budget_expenses(family, &ExpenseFilter::default())
        .await
        .unwrap();
    assert_eq!(expenses.len(), 3);

    // Row: Jan 5, $1,200.50, Rent, rent payment — with detected year 2024.
    let big = expenses
        .iter()
        .find(|e| e.amount == BigDecimal::from_str("1200.50").unwrap())
        .unwrap();
    assert_eq!(big.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    assert_eq!(big.merchant, "rent payment");
    assert_eq!(big.title, "Rent");
    assert_eq!(big.currency, "USD");
    // "Rent" matched the existing sub-category, so its parent was reused.
    assert_eq!(big.category_id, housing.id);
    assert_eq!(big.sub_category_id, rent.id);

    // The unknown category text went under the Imported fallback.
    let takeout = expenses.iter().find(|e| e.title == "Takeout").unwrap();
    assert_ne!(takeout.category_id, housing.id);
    let imported = store
        .list_categories(family, Some(CategoryKind::Expense))
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == "Imported")
        .unwrap();
    assert_eq!(takeout.category_id, imported.id);

    // Nothing after the Summary terminator was imported.
    assert!(expenses
        .iter()
        .all(|e| e.date < NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
}

#[tokio::test]
async fn monthly_import_without_header_yields_zero_rows() {
    let store = MemoryStore::new();
    let mut importer = MonthlyImporter::new(store);

    let sheet = "FinancialDocs-2024 - Jan,,,\nJan 5,$10,Rent,\n";
    let summary = importer
        .import(Uuid::new_v4(), Uuid::new_v4(), &[sheet])
        .await
        .unwrap();

    assert_eq!(summary.created_budget_expenses, 0);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.created_categories, 0);
    assert_eq!(summary.created_sub_categories, 0);
}

#[tokio::test]
async fn monthly_import_aggregates_across_files() {
    let store = MemoryStore::new();
    let family = Uuid::new_v4();
    let user = Uuid::new_v4();
    let mut importer = MonthlyImporter::new(store.clone());

    let january = "2024,,,\nDate,Cost,Category,Notes\nJan 2,$10,Coffee,\n";
    let february = "2024,,,\nDate,Cost,Category,Notes\nFeb 3,$15,Coffee,\nFeb 4,zzz,Coffee,\n";

    let summary = importer
        .import(family, user, &[january, february])
        .await
        .unwrap();

    assert_eq!(summary.created_budget_expenses, 2);
    assert_eq!(summary.skipped, 1);
    // The Imported category is created once and reused by the second file.
    assert_eq!(summary.created_categories, 1);
    assert_eq!(summary.created_sub_categories, 1);
}

#[tokio::test]
async fn import_feeds_monthly_summary() {
    let store = MemoryStore::new();
    let family = Uuid::new_v4();
    let user = Uuid::new_v4();

    let mut taxonomy = TaxonomyImporter::new(store.clone());
    taxonomy
        .import(family, "Expense Categories,,\nHousing,,Rent\nFood,,Groceries\n")
        .await
        .unwrap();

    let mut monthly = MonthlyImporter::new(store.clone());
    let sheet = "\
2024,,,
Date,Cost,Category,Notes
Jan 5,\"$1,200\",Rent,
Jan 9,$300,Groceries,
Jan 12,$80,Groceries,
";
    monthly.import(family, user, &[sheet]).await.unwrap();

    let tracker = BudgetTracker::new(store);
    let summary = tracker.monthly_summary(family, 2024, 1).await.unwrap();

    assert_eq!(summary.total_spent, BigDecimal::from(1580));
    assert_eq!(summary.by_category.len(), 2);
    assert_eq!(summary.by_category[0].category_name, "Housing");
    assert_eq!(summary.by_category[0].total_amount, BigDecimal::from(1200));
    assert_eq!(summary.by_category[1].category_name, "Food");
    assert_eq!(summary.by_category[1].total_amount, BigDecimal::from(380));
    assert_eq!(summary.by_sub_category.len(), 2);
    assert_eq!(summary.by_sub_category[0].sub_category_name, "Rent");

    // No month outside 1..=12.
    assert!(tracker.monthly_summary(family, 2024, 13).await.is_err());
}

fn seed_participant(store: &MemoryStore, name: &str) -> Uuid {
    store.insert_participant(Participant {
        id: Uuid::new_v4(),
        display_name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
    })
}

fn seed_expense(store: &MemoryStore, payer: Uuid, amount: i64, splits: Vec<(Uuid, i64)>) {
    store.insert_shared_expense(SharedExpense {
        id: Uuid::new_v4(),
        title: "Shared".to_string(),
        amount: BigDecimal::from(amount),
        currency: "USD".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        payer_id: payer,
        group_id: None,
        splits: splits
            .into_iter()
            .map(|(participant_id, owed)| Split {
                participant_id,
                amount: BigDecimal::from(owed),
                percentage: None,
            })
            .collect(),
        created_at: chrono::Utc::now().naive_utc(),
    });
}

#[tokio::test]
async fn netting_workflow_over_a_shared_ledger() {
    let store = MemoryStore::new();
    let alice = seed_participant(&store, "Alice");
    let bob = seed_participant(&store, "Bob");
    let carol = seed_participant(&store, "Carol");

    // Alice pays a 90 dinner split three ways; Bob pays a 40 cab split with
    // Alice; Carol pays a 30 lunch where Alice owes 10.
    seed_expense(&store, alice, 90, vec![(alice, 30), (bob, 30), (carol, 30)]);
    seed_expense(&store, bob, 40, vec![(alice, 20), (bob, 20)]);
    seed_expense(&store, carol, 30, vec![(alice, 10), (carol, 20)]);

    let engine = NettingEngine::new(store.clone());

    let balances = engine.balances_for(alice).await.unwrap();
    assert_eq!(balances.len(), 2);
    assert_eq!(balances[0].display_name, "Bob");
    assert_eq!(balances[0].balance, BigDecimal::from(10));
    assert_eq!(balances[1].display_name, "Carol");
    assert_eq!(balances[1].balance, BigDecimal::from(20));

    // Aggregate equals the pairwise nets, and pairwise is antisymmetric.
    for entry in &balances {
        let pairwise = engine
            .balance_between(alice, entry.participant_id)
            .await
            .unwrap();
        assert_eq!(pairwise.net_balance, entry.balance);
        assert_eq!(
            pairwise.net_balance,
            pairwise.they_owe_you.clone() - pairwise.you_owe_them.clone()
        );

        let reverse = engine
            .balance_between(entry.participant_id, alice)
            .await
            .unwrap();
        assert_eq!(reverse.net_balance, -entry.balance.clone());
    }

    // The netting engine performed no writes.
    assert_eq!(store.expenses_involving(alice).await.unwrap().len(), 3);
}

#[tokio::test]
async fn counterparties_missing_from_the_participant_table_are_dropped() {
    let store = MemoryStore::new();
    let alice = seed_participant(&store, "Alice");
    let ghost = Uuid::new_v4();

    seed_expense(&store, alice, 50, vec![(ghost, 25), (alice, 25)]);

    let engine = NettingEngine::new(store);
    let balances = engine.balances_for(alice).await.unwrap();
    assert!(balances.is_empty());
}

#[tokio::test]
async fn import_summaries_serialize_with_wire_field_names() {
    let store = MemoryStore::new();
    let family = Uuid::new_v4();

    let mut taxonomy = TaxonomyImporter::new(store.clone());
    let tax_summary = taxonomy
        .import(family, "Expense Categories,,\nHousing,,\n")
        .await
        .unwrap();
    let value = serde_json::to_value(tax_summary).unwrap();
    assert_eq!(value["created_categories"], 1);
    assert_eq!(value["created_sub_categories"], 0);
    assert_eq!(value["skipped"], 0);

    let mut monthly = MonthlyImporter::new(store);
    let month_summary = monthlies(&mut monthly, family).await;
    let value = serde_json::to_value(month_summary).unwrap();
    assert_eq!(value["created_budget_expenses"], 1);
    assert_eq!(value["skipped"], 0);
    assert_eq!(value["created_categories"], 1);
    assert_eq!(value["created_sub_categories"], 1);
}

async fn monthlies(
    importer: &mut MonthlyImporter<MemoryStore>,
    family: Uuid,
) -> wealthwatch_core::MonthlyImportSummary {
    importer
        .import(
            family,
            Uuid::new_v4(),
            &["2024,,,\nDate,Cost,Category,Notes\nJan 2,$5,Snacks,\n"],
        )
        .await
        .unwrap()
}
