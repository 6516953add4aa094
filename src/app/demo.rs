use crate::domain::method::{ClassDef, ClassProvider};
use crate::domain::model::{Arg, Call};
use crate::domain::registry::Registry;
use crate::utils::error::{DecorError, Result};
use serde_json::{json, Map, Value};

fn amount(call: &Call<'_>) -> Result<f64> {
    call.positional(0)
        .and_then(Arg::as_f64)
        .ok_or_else(|| DecorError::argument("amount must be a number"))
}

fn balance_of(call: &mut Call<'_>) -> Result<f64> {
    let fields = call
        .fields()
        .ok_or_else(|| DecorError::argument("method needs an instance"))?;
    Ok(fields.get("balance").and_then(Value::as_f64).unwrap_or(0.0))
}

fn set_balance(call: &mut Call<'_>, balance: f64) -> Result<Value> {
    let fields = call
        .fields()
        .ok_or_else(|| DecorError::argument("method needs an instance"))?;
    fields.insert("balance".to_string(), json!(balance));
    Ok(json!(balance))
}

pub struct Account;

impl ClassProvider for Account {
    fn class_def() -> ClassDef {
        ClassDef::builder("Account", "bank")
            .method("deposit", &["amount"], |call| {
                let next = balance_of(call)? + amount(call)?;
                set_balance(call, next)
            })
            .method("withdraw", &["amount"], |call| {
                let requested = amount(call)?;
                let current = balance_of(call)?;
                if requested > current {
                    return Err(DecorError::invocation("withdraw", "insufficient funds"));
                }
                set_balance(call, current - requested)
            })
            .method("balance", &[], |call| Ok(json!(balance_of(call)?)))
            .method("apply_all", &["entries"], |call| {
                let entries: Vec<f64> = match call.positional_mut(0).and_then(Arg::as_stream_mut) {
                    Some(stream) => stream.filter_map(|v| v.as_f64()).collect(),
                    None => return Err(DecorError::argument("entries must be a stream")),
                };
                let next = balance_of(call)? + entries.iter().sum::<f64>();
                set_balance(call, next)
            })
            .build()
    }
}

pub struct Ledger;

impl ClassProvider for Ledger {
    fn class_def() -> ClassDef {
        ClassDef::builder("Ledger", "reports")
            .method("summarize", &["entries", "label"], |call| {
                let entries = call
                    .positional(0)
                    .and_then(Arg::as_value)
                    .and_then(Value::as_array)
                    .ok_or_else(|| DecorError::argument("entries must be a list"))?;
                let total: f64 = entries.iter().filter_map(Value::as_f64).sum();
                let label = call.positional(1).and_then(Arg::as_str).unwrap_or("total");
                Ok(json!({ "label": label, "count": entries.len(), "total": total }))
            })
            .build()
    }
}

/// Two modules: `bank` declares `Account`; `reports` declares `Ledger`
/// and imports `Account`.
pub fn demo_registry() -> Result<Registry> {
    let mut registry = Registry::new();
    registry.define_type::<Account>().define_type::<Ledger>();
    registry.import("reports", "Account", "bank", "Account")?;
    Ok(registry)
}

/// Exercises each demo class once and returns the method results.
pub fn run_demo(registry: &Registry) -> Result<Vec<Value>> {
    let mut results = Vec::new();

    let mut fields = Map::new();
    fields.insert("owner".to_string(), json!("demo"));
    let mut account = registry.instantiate("bank", "Account", fields)?;
    results.push(account.call("deposit", vec![json!(100.0).into()])?);
    results.push(account.call("withdraw", vec![json!(30.0).into()])?);
    results.push(account.call(
        "apply_all",
        vec![Arg::stream(
            vec![5.0, 10.0, 15.0, 20.0, 25.0].into_iter().map(|v| json!(v)),
        )],
    )?);
    results.push(account.call("balance", vec![])?);

    let mut ledger = registry.instantiate("reports", "Ledger", Map::new())?;
    results.push(ledger.call(
        "summarize",
        vec![
            json!([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]).into(),
            json!("weekly").into(),
        ],
    )?);

    Ok(results)
}
