use clap::Parser;
use sha2::{Digest, Sha256};
use tracing_subscriber::{fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

use mssmt::hash_utils::to_array;
use mssmt::node::key_from_slice;
use mssmt::{DefaultStore, FullTree};

/// A thin demonstration CLI exercising insert / get / merkle_proof / verify /
/// delete against a `DefaultStore`-backed tree.
///
/// The tree itself has no command-line surface of its own; this binary
/// exists so the library can be exercised end to end from a terminal.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Scenario to run.
    #[arg(short, long, value_name = "SCENARIO", default_value = "demo")]
    demo: String,

    /// Look up an additional key (hex-encoded) against the demo tree, after
    /// the built-in entries are inserted. This is the crate's one external
    /// boundary where a caller-supplied byte string needs a key-length
    /// precondition check before it can be used as a tree key.
    #[arg(long, value_name = "HEX")]
    lookup_key: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let Cli { demo, lookup_key } = Cli::parse();

    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    tracing::info!(scenario = %demo, "starting mssmt demo");

    let mut tree = FullTree::new(DefaultStore::new());

    let entries = [
        (to_array(&Sha256::digest(b"key1")), b"value1".to_vec(), 10u64),
        (to_array(&Sha256::digest(b"key2")), b"value2".to_vec(), 20u64),
        (to_array(&Sha256::digest(b"key3")), b"value3".to_vec(), 30u64),
    ];

    for (key, value, sum) in &entries {
        tree.insert(*key, value.clone(), *sum)?;
        tracing::info!(sum, "inserted entry");
    }

    tracing::info!(total_sum = tree.total_sum(), "all entries inserted");

    for (key, value, sum) in &entries {
        let (got_value, got_sum) = tree.get(key)?;
        tracing::info!(
            matches_value = (&got_value == value),
            got_sum,
            sum,
            "fetched entry"
        );
    }

    let (target_key, target_value, target_sum) = &entries[0];
    let proof = tree.merkle_proof(target_key)?;
    let root_hash = tree.root_hash();
    let is_valid = proof.verify(target_key, target_value, *target_sum, root_hash);
    tracing::info!(is_valid, proof_len = proof.len(), "verified proof for key1");

    let (delete_key, _, delete_sum) = &entries[1];
    tree.delete(delete_key)?;
    tracing::info!(sum = delete_sum, "deleted entry");

    match tree.get(delete_key) {
        Ok(_) => tracing::error!("deleted key unexpectedly still present"),
        Err(err) => tracing::info!(%err, "deleted key no longer resolves, as expected"),
    }

    let proof_after = tree.merkle_proof(target_key)?;
    let root_hash_after = tree.root_hash();
    let is_valid_after = proof_after.verify(target_key, target_value, *target_sum, root_hash_after);
    tracing::info!(
        is_valid_after,
        total_sum = tree.total_sum(),
        "verified proof for key1 after deletion"
    );

    if let Some(hex_str) = lookup_key {
        let bytes = hex::decode(&hex_str)?;
        match key_from_slice(&bytes) {
            Ok(key) => match tree.get(&key) {
                Ok((value, sum)) => {
                    tracing::info!(sum, value = %String::from_utf8_lossy(&value), "lookup-key found")
                }
                Err(err) => tracing::info!(%err, "lookup-key not found"),
            },
            Err(err) => tracing::error!(%err, "lookup-key rejected"),
        }
    }

    Ok(())
}
