use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use clap::Args;
use phonenorm_core::PhoneRecord;
use phonenorm_store::seed::FIXTURE_VALUES;

#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Raw values to insert; falls back to `[seed] values`, then the fixtures
    pub values: Vec<String>,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    pub value: String,
}

pub fn reset(ctx: &Context<'_>) -> Result<()> {
    ctx.store.reset().with_context(|| "reset database")?;
    if ctx.json {
        print_json(&serde_json::json!({ "reset": true }))?;
    } else {
        println!("database reset");
    }
    Ok(())
}

pub fn seed(ctx: &Context<'_>, args: SeedArgs) -> Result<()> {
    let records = seed_values(ctx, args.values)?;
    if ctx.json {
        return print_json(&records);
    }
    println!("seeded {} phone numbers", records.len());
    Ok(())
}

pub(crate) fn seed_values(ctx: &Context<'_>, values: Vec<String>) -> Result<Vec<PhoneRecord>> {
    let records = if !values.is_empty() {
        ctx.store.seed(values.as_slice())
    } else if let Some(values) = ctx.config.seed.values.as_deref() {
        ctx.store.seed(values)
    } else {
        ctx.store.seed(FIXTURE_VALUES)
    };
    records.with_context(|| "seed phone numbers")
}

pub fn add(ctx: &Context<'_>, args: AddArgs) -> Result<()> {
    let record = ctx
        .store
        .phones()
        .insert(&args.value)
        .with_context(|| format!("add phone number {:?}", args.value))?;
    if ctx.json {
        return print_json(&record);
    }
    println!("{}", record.id);
    Ok(())
}

pub fn list(ctx: &Context<'_>) -> Result<()> {
    let records = ctx.store.phones().list_all()?;
    print_records(ctx, &records)
}

pub(crate) fn print_records(ctx: &Context<'_>, records: &[PhoneRecord]) -> Result<()> {
    if ctx.json {
        return print_json(&records);
    }

    if records.is_empty() {
        println!("no phone numbers");
        return Ok(());
    }

    for record in records {
        println!("{}  {}", record.id, record.value);
    }
    Ok(())
}
