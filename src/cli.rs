use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::validator::ValidationPolicy;

#[derive(Debug, Parser)]
#[command(author, version, about = "Match document headers against workbook schemes", long_about = None)]
pub struct Cli {
    /// Directory holding one JSON document per scheme
    #[arg(long = "schemes-dir", env = "SCHEMES_PATH", global = true)]
    pub schemes_dir: Option<PathBuf>,
    /// Optional YAML settings file
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the schemes available in the store
    List,
    /// Print one scheme as JSON
    Show(ShowArgs),
    /// Resolve a header row against the scheme catalogue
    Validate(ValidateArgs),
    /// Import a scheme document into the store
    Import(ImportArgs),
    /// Add, update or delete a column of a scheme
    #[command(subcommand)]
    Column(ColumnCommand),
    /// Add, update or delete a header attribute of a scheme
    #[command(subcommand)]
    Attribute(AttributeCommand),
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Scheme name
    pub name: String,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Header cell value; repeat in header order
    #[arg(short = 'H', long = "header", action = clap::ArgAction::Append, conflicts_with = "input")]
    pub headers: Vec<String>,
    /// Read the header row from the first line of a CSV/TSV file ('-' for stdin)
    #[arg(short = 'i', long = "input", required_unless_present = "headers")]
    pub input: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Whether missing required columns fail validation
    #[arg(long, value_enum)]
    pub policy: Option<ValidationPolicy>,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Scheme JSON document (legacy shapes are migrated)
    pub file: PathBuf,
    /// Replace an existing scheme with the same name
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Subcommand)]
pub enum ColumnCommand {
    /// Append a column to a scheme
    Add(ColumnAddArgs),
    /// Change fields of an existing column
    Update(ColumnUpdateArgs),
    /// Remove a column from a scheme
    Delete(ElementDeleteArgs),
}

#[derive(Debug, Args)]
pub struct ColumnAddArgs {
    /// Scheme to modify
    pub scheme: String,
    /// Column name, unique within the scheme
    #[arg(long)]
    pub name: String,
    /// Regular expression matched against the start of a header cell
    #[arg(long)]
    pub pattern: String,
    /// Mark the column as optional
    #[arg(long)]
    pub optional: bool,
}

#[derive(Debug, Args)]
pub struct ColumnUpdateArgs {
    /// Scheme to modify
    pub scheme: String,
    /// Column to update
    #[arg(long)]
    pub name: String,
    /// New pattern
    #[arg(long)]
    pub pattern: Option<String>,
    /// New optionality
    #[arg(long)]
    pub optional: Option<bool>,
    /// Downstream mapping hint
    #[arg(long)]
    pub mapping: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum AttributeCommand {
    /// Append an attribute to a scheme header
    Add(AttributeAddArgs),
    /// Change fields of an existing attribute
    Update(AttributeUpdateArgs),
    /// Remove an attribute from a scheme header
    Delete(ElementDeleteArgs),
}

#[derive(Debug, Args)]
pub struct AttributeAddArgs {
    /// Scheme to modify
    pub scheme: String,
    /// Attribute name
    #[arg(long)]
    pub name: String,
    /// Row index of the attribute cell
    #[arg(long)]
    pub index: usize,
    /// Mark the attribute as optional
    #[arg(long)]
    pub optional: bool,
}

#[derive(Debug, Args)]
pub struct AttributeUpdateArgs {
    /// Scheme to modify
    pub scheme: String,
    /// Attribute to update
    #[arg(long)]
    pub name: String,
    /// New row index
    #[arg(long)]
    pub index: Option<usize>,
    /// New optionality
    #[arg(long)]
    pub optional: Option<bool>,
}

#[derive(Debug, Args)]
pub struct ElementDeleteArgs {
    /// Scheme to modify
    pub scheme: String,
    /// Name of the element to remove
    #[arg(long)]
    pub name: String,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
