use std::path::PathBuf;

use anyhow::Result;
use tracing::info;
use wardseed::store::{DiskStore, DocumentStore};
use wardseed::Pipeline;

use super::{emit_report, inputs, load_config};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::SeedArgs) -> Result<()> {
    let mut config = load_config(&args.source)?;
    if let Some(limit) = args.batch_limit {
        config.batch_limit = limit;
    }
    let pipeline = Pipeline::new(config)?;
    let inputs = inputs(&args.source);

    let store = open_store(args)?;
    info!(
        constituencies = %inputs.constituencies.display(),
        wards = %inputs.wards.display(),
        batch_limit = pipeline.config().batch_limit,
        "seeding"
    );
    let report = pipeline.run(&inputs, store)?;

    emit_report(&report, args.source.report.as_deref())
}

fn open_store(args: &crate::cli::SeedArgs) -> Result<Box<dyn DocumentStore>> {
    if let Some(project) = &args.firestore {
        return firestore_store(project, args);
    }
    let store = DiskStore::new(args.out.clone().unwrap_or_else(|| PathBuf::from("./seed-out")));
    info!(out = %store.root().display(), "writing documents to directory");
    Ok(Box::new(store))
}

#[cfg(feature = "firestore")]
fn firestore_store(project: &str, args: &crate::cli::SeedArgs) -> Result<Box<dyn DocumentStore>> {
    use wardseed::store::FirestoreStore;

    let store = match &args.emulator {
        Some(host) => {
            info!(project, host = %host, token = args.token.is_some(), "writing to Firestore emulator");
            FirestoreStore::emulator(project, host, args.token.clone())?
        }
        None => {
            info!(project, "writing to Firestore");
            FirestoreStore::new(project, args.token.clone())?
        }
    };
    Ok(Box::new(store))
}

#[cfg(not(feature = "firestore"))]
fn firestore_store(_project: &str, _args: &crate::cli::SeedArgs) -> Result<Box<dyn DocumentStore>> {
    anyhow::bail!("[seed] built without the `firestore` feature")
}
