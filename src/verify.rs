use anyhow::{Context, Result};
use log::{debug, info};

use crate::{
    cli::ValidateArgs,
    config::Settings,
    error::SchemeResult,
    io_utils,
    resolver,
    store::SchemeStore,
    validator::{ValidationPolicy, ValidationResponse, VerificationReport},
};

pub fn execute(args: &ValidateArgs, settings: &Settings) -> Result<()> {
    let headers = collect_headers(args)?;
    debug!("Header cells: {:?}", headers);
    let store = SchemeStore::new(&settings.schemes_dir);
    let outcome = verify_headers(&store, &headers, settings.policy);
    if let Ok(report) = &outcome {
        info!(
            "✓ header matches scheme '{}' ({} column(s))",
            report.scheme_name(),
            report.columns.len()
        );
    }

    let response = ValidationResponse::from(outcome.clone());
    let rendered =
        serde_json::to_string_pretty(&response).context("Serializing validation response")?;
    println!("{rendered}");
    outcome.map(|_| ()).map_err(Into::into)
}

pub fn verify_headers(
    store: &SchemeStore,
    headers: &[String],
    policy: ValidationPolicy,
) -> SchemeResult<VerificationReport> {
    let catalogue = store.catalogue()?;
    resolver::verify(&catalogue, headers, policy)
}

fn collect_headers(args: &ValidateArgs) -> Result<Vec<String>> {
    match &args.input {
        Some(path) => {
            let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
            let delimiter = io_utils::resolve_input_delimiter(path, args.delimiter);
            io_utils::read_header_row_from_path(path, delimiter, encoding)
        }
        None => Ok(args.headers.clone()),
    }
}
