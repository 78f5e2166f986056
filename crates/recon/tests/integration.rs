use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use ledgerflow_core::{Transaction, INTERNAL_TRANSFER};
use ledgerflow_recon::{
    Consolidator, MemoryStore, NeutralizeConfig, Rule, RuleSet, TransactionStore,
};

fn tx(source: &str, account: &str, date: &str, amount: Decimal, desc: &str) -> Transaction {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    Transaction::new(source, account, date, amount, "ARS", desc)
}

fn transfer(source: &str, date: &str, amount: Decimal, desc: &str) -> Transaction {
    let mut t = tx(source, "acct", date, amount, desc);
    t.is_transfer = true;
    t
}

/// One month across three institutions, in ingestion order.
fn month() -> Vec<Transaction> {
    vec![
        // brubank
        transfer("brubank", "2024-03-10", dec!(-1000.00), "Transferencia enviada a cuenta tuya"),
        tx("brubank", "caja_ahorro_pesos", "2024-03-11", dec!(-3500.00), "NETFLIX.COM"),
        transfer("brubank", "2024-03-20", dec!(-500.00), "Transferencia enviada Juan"),
        // mercadopago: the other leg of the first transfer, one day later and
        // with a 0.3% fee difference
        transfer("mercadopago", "2024-03-11", dec!(997.00), "Transferencia recibida de una cuenta tuya"),
        tx("mercadopago", "cuenta_digital", "2024-03-12", dec!(-8000.00), "Pago Uber Trip"),
        // santander: a credit outside the window of the 500 debit
        transfer("santander", "2024-03-25", dec!(500.00), "Transferencia recibida"),
        // brubank statement uploaded twice
        transfer("brubank", "2024-03-10", dec!(-1000.00), "Transferencia enviada a cuenta tuya"),
    ]
}

fn consolidator() -> Consolidator {
    Consolidator::new(NeutralizeConfig::default()).with_rules(RuleSet {
        merchants: vec![Rule::new("uber", "transporte", "taxi")],
        description_keywords: vec![Rule::new("netflix", "suscripciones", "streaming")],
    })
}

#[test]
fn full_month_consolidation() {
    let out = consolidator().consolidate(month());

    assert_eq!(out.stats.input, 7);
    assert_eq!(out.stats.duplicates, 1);
    assert_eq!(out.stats.neutralize.pairs, 1);
    assert_eq!(out.transactions.len(), 6);

    let by_desc = |d: &str| out.transactions.iter().find(|t| t.description == d).unwrap();

    let sent = by_desc("Transferencia enviada a cuenta tuya");
    let received = by_desc("Transferencia recibida de una cuenta tuya");
    assert!(sent.neutralized && received.neutralized);
    assert_eq!(sent.category.as_deref(), Some(INTERNAL_TRANSFER));
    assert_eq!(received.category.as_deref(), Some(INTERNAL_TRANSFER));

    // 5 days apart: both legs stay ordinary transfers
    assert!(!by_desc("Transferencia enviada Juan").neutralized);
    assert!(!by_desc("Transferencia recibida").neutralized);

    assert_eq!(by_desc("Pago Uber Trip").category.as_deref(), Some("transporte"));
    assert_eq!(by_desc("NETFLIX.COM").subcategory.as_deref(), Some("streaming"));

    let dates: Vec<String> = out.transactions.iter().map(|t| t.date.to_string()).collect();
    let mut sorted = dates.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted);
}

#[test]
fn pipeline_is_idempotent_on_its_own_output() {
    let c = consolidator();
    let once = c.consolidate(month()).transactions;
    let twice = c.consolidate(once.clone());
    assert_eq!(twice.transactions, once);
    assert_eq!(twice.stats.neutralize.pairs, 0);
    assert_eq!(twice.stats.recategorized, 0);
}

#[test]
fn ingestion_order_decides_between_equally_eligible_credits() {
    let debit = transfer("brubank", "2024-03-10", dec!(-1000.00), "d");
    let a = transfer("mercadopago", "2024-03-10", dec!(1000.00), "a");
    let b = transfer("santander", "2024-03-10", dec!(1000.00), "b");

    let c = Consolidator::default();
    let ab = c.consolidate(vec![debit.clone(), a.clone(), b.clone()]).transactions;
    let ba = c.consolidate(vec![debit, b, a]).transactions;

    let neutral = |txs: &[Transaction]| {
        txs.iter()
            .filter(|t| t.neutralized && t.amount > Decimal::ZERO)
            .map(|t| t.description.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(neutral(&ab), vec!["a"]);
    assert_eq!(neutral(&ba), vec!["b"]);
}

#[test]
fn uploads_consolidate_incrementally_through_the_store() {
    let store = MemoryStore::new();
    let user = Uuid::new_v4();
    let c = consolidator();

    let owned = |txs: Vec<Transaction>| {
        txs.into_iter()
            .map(|mut t| {
                t.user_id = user;
                t
            })
            .collect::<Vec<_>>()
    };

    let all = owned(month());
    let (brubank, rest): (Vec<_>, Vec<_>) = all.into_iter().partition(|t| t.source == "brubank");

    c.save_and_consolidate(&store, user, brubank.clone()).unwrap();
    c.save_and_consolidate(&store, user, rest).unwrap();
    // re-upload of the first statement
    let last = c.save_and_consolidate(&store, user, brubank).unwrap();

    assert_eq!(last.transactions.len(), 6);
    assert_eq!(last.stats.neutralize.pairs, 0);
    let stored = store.read(user).unwrap();
    assert_eq!(stored.len(), 6);
    assert_eq!(stored.iter().filter(|t| t.neutralized).count(), 2);
    assert!(store.read(Uuid::new_v4()).unwrap().is_empty());
}
