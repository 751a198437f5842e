use crate::commands::normalize::{print_report, run_pass};
use crate::commands::phones::{print_records, seed_values};
use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use phonenorm_core::ReconcileOptions;
use serde_json::json;

pub fn demo(ctx: &Context<'_>) -> Result<()> {
    ctx.store.reset().with_context(|| "reset database")?;
    let seeded = seed_values(ctx, Vec::new())?;

    let options = ReconcileOptions {
        lookup: ctx.config.normalize.lookup,
        dry_run: false,
    };
    let report = run_pass(ctx, options, false)?.report;
    let phones = ctx.store.phones().list_all()?;

    if ctx.json {
        return print_json(&json!({
            "seeded": seeded.len(),
            "report": report,
            "phones": phones,
        }));
    }

    println!("seeded {} phone numbers", seeded.len());
    print_report(&report);
    print_records(ctx, &phones)
}
