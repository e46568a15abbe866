//! Scheme inspection and editing commands.
//!
//! Every edit finds the scheme in the store by name, applies the change to
//! the in-memory [`Workbook`], and writes it back to the file it came from.
//! A typo in the scheme name never creates a new file.

use anyhow::{Context, Result, ensure};
use log::info;

use crate::{
    catalogue::CompiledScheme,
    cli::{AttributeCommand, ColumnCommand, ImportArgs},
    scheme::{Attribute, AttributePatch, ColumnDefinition, ColumnPatch, Workbook},
    store::{self, SchemeStore},
    table,
};

pub fn list(store: &SchemeStore) -> Result<()> {
    let schemes = store.load_all()?;
    if schemes.is_empty() {
        info!("No schemes found in {:?}", store.root());
        return Ok(());
    }
    let rows = schemes
        .iter()
        .map(|scheme| {
            vec![
                scheme.name.clone(),
                scheme.columns().len().to_string(),
                scheme.required_count().to_string(),
                scheme.attributes().len().to_string(),
            ]
        })
        .collect::<Vec<_>>();
    table::print_table(&["name", "columns", "required", "attributes"], &rows);
    info!("Listed {} scheme(s) from {:?}", schemes.len(), store.root());
    Ok(())
}

pub fn show(store: &SchemeStore, name: &str) -> Result<()> {
    let scheme = store.load(name)?;
    let rendered = serde_json::to_string_pretty(&scheme).context("Serializing scheme")?;
    println!("{rendered}");
    Ok(())
}

pub fn import(store: &SchemeStore, args: &ImportArgs) -> Result<()> {
    let scheme = store::load_file(&args.file)?;
    scheme
        .ensure_unique_column_names()
        .and_then(|()| CompiledScheme::compile(scheme.clone()))
        .with_context(|| format!("Checking scheme '{}' from {:?}", scheme.name, args.file))?;
    let target = store.path_for(&scheme.name)?;
    ensure!(
        args.force || !target.exists(),
        "Scheme '{}' already exists at {:?}; pass --force to replace it",
        scheme.name,
        target
    );
    store.write(&scheme, false)?;
    Ok(())
}

pub fn column(store: &SchemeStore, command: &ColumnCommand) -> Result<()> {
    match command {
        ColumnCommand::Add(args) => edit(store, &args.scheme, |scheme| {
            scheme.add_column(ColumnDefinition::new(
                args.name.clone(),
                args.pattern.clone(),
                args.optional,
            ))?;
            Ok(format!("added column '{}'", args.name))
        }),
        ColumnCommand::Update(args) => edit(store, &args.scheme, |scheme| {
            scheme.update_column(ColumnPatch {
                name: args.name.clone(),
                pattern: args.pattern.clone(),
                optional: args.optional,
                mapping: args.mapping.clone(),
                ..ColumnPatch::default()
            })?;
            Ok(format!("updated column '{}'", args.name))
        }),
        ColumnCommand::Delete(args) => edit(store, &args.scheme, |scheme| {
            scheme.delete_column(&args.name)?;
            Ok(format!("deleted column '{}'", args.name))
        }),
    }
}

pub fn attribute(store: &SchemeStore, command: &AttributeCommand) -> Result<()> {
    match command {
        AttributeCommand::Add(args) => edit(store, &args.scheme, |scheme| {
            scheme.add_attribute(Attribute {
                name: args.name.clone(),
                index: args.index,
                optional: args.optional,
            })?;
            Ok(format!("added attribute '{}'", args.name))
        }),
        AttributeCommand::Update(args) => edit(store, &args.scheme, |scheme| {
            scheme.update_attribute(AttributePatch {
                name: args.name.clone(),
                index: args.index,
                optional: args.optional,
            })?;
            Ok(format!("updated attribute '{}'", args.name))
        }),
        AttributeCommand::Delete(args) => edit(store, &args.scheme, |scheme| {
            match scheme.delete_attribute(&args.name)? {
                Some(_) => Ok(format!("deleted attribute '{}'", args.name)),
                None => Ok("scheme has no attributes, nothing deleted".to_string()),
            }
        }),
    }
}

fn edit<F>(store: &SchemeStore, name: &str, change: F) -> Result<()>
where
    F: FnOnce(&mut Workbook) -> Result<String>,
{
    let (path, mut scheme) = store.locate(name)?;
    let summary = change(&mut scheme).with_context(|| format!("Editing scheme '{name}'"))?;
    store.write_file(&path, &scheme)?;
    info!("Scheme '{name}': {summary} ({})", path.display());
    Ok(())
}
