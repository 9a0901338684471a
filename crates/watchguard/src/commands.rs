//! Denylist subcommands
//!
//! Each function is a thin layer over [`DenylistStore`]. Single-pair changes
//! are saved right away because every invocation is its own process.

use anyhow::{Context, Result};
use denylist::{DenylistEntry, DenylistStore, ImportReport, render_text, split_text};
use rand::Rng;
use std::io::Write;
use tracing::info;

/// Print every pair, one per line
pub fn list<W: Write>(store: &DenylistStore, out: &mut W) -> Result<()> {
    let lines = store.flatten();
    if lines.is_empty() {
        writeln!(out, "Denylist is empty")?;
    } else {
        for line in lines {
            writeln!(out, "{}", line)?;
        }
    }
    Ok(())
}

/// Report whether a pair is denylisted; returns `true` if it is
pub fn check<W: Write>(
    store: &DenylistStore,
    vendor_id: &str,
    product_id: &str,
    out: &mut W,
) -> Result<bool> {
    let denylisted = store.is_denylisted(vendor_id, product_id);
    let verdict = if denylisted { "denylisted" } else { "allowed" };
    writeln!(out, "{}:{} {}", vendor_id, product_id, verdict)?;
    Ok(denylisted)
}

pub fn add(store: &mut DenylistStore, vendor_id: &str, product_id: &str) -> Result<()> {
    let entry = parse_entry(vendor_id, product_id)?;
    store.add(entry.vendor_id(), entry.product_id());
    store.save().context("Failed to save denylist")?;
    info!("Added {}", entry);
    Ok(())
}

pub fn remove(store: &mut DenylistStore, vendor_id: &str, product_id: &str) -> Result<()> {
    let entry = parse_entry(vendor_id, product_id)?;
    if !store.is_denylisted(entry.vendor_id(), entry.product_id()) {
        info!("{} is not denylisted", entry);
        return Ok(());
    }
    store.remove(entry.vendor_id(), entry.product_id());
    store.save().context("Failed to save denylist")?;
    info!("Removed {}", entry);
    Ok(())
}

pub fn clear(store: &mut DenylistStore) -> Result<()> {
    store.clear().context("Failed to clear denylist")
}

/// Replace the denylist with the entries in `text`
pub fn import<W: Write>(store: &mut DenylistStore, text: &str, out: &mut W) -> Result<ImportReport> {
    let report = store
        .unflatten(split_text(text))
        .context("Failed to save imported denylist")?;

    writeln!(
        out,
        "Imported {} entries ({} lines rejected)",
        report.pairs,
        report.rejected.len()
    )?;
    Ok(report)
}

/// The denylist as editable text
pub fn export(store: &DenylistStore) -> String {
    render_text(&store.flatten())
}

/// Add `count` random lowercase pairs and save
///
/// Development aid for filling a fresh install with plausible-looking data.
pub fn populate<R: Rng>(store: &mut DenylistStore, count: usize, rng: &mut R) -> Result<usize> {
    let before = store.denylist().len();
    for _ in 0..count {
        let vendor_id = random_token(rng);
        let product_id = random_token(rng);
        store.add(&vendor_id, &product_id);
    }
    store.save().context("Failed to save denylist")?;

    let added = store.denylist().len() - before;
    info!("Populated denylist with {} random entries", added);
    Ok(added)
}

/// Default number of pairs for `populate` when none is given
pub fn random_count<R: Rng>(rng: &mut R) -> usize {
    rng.random_range(5..=15)
}

fn random_token<R: Rng>(rng: &mut R) -> String {
    let len = rng.random_range(3..=10);
    (0..len)
        .map(|_| char::from(b'a' + rng.random_range(0..26u8)))
        .collect()
}

fn parse_entry(vendor_id: &str, product_id: &str) -> Result<DenylistEntry> {
    DenylistEntry::new(vendor_id, product_id)
        .with_context(|| format!("Invalid entry `{}:{}`", vendor_id, product_id))
}
