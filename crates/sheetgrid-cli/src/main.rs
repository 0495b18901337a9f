//! sheetgrid CLI - inspect the grids decoded from an XLSX workbook

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sheetgrid_core::{coord, SheetContent};
use sheetgrid_xlsx::{ReadOptions, RowLimit, SheetReader};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sheetgrid")]
#[command(author, version, about = "Decode XLSX worksheets into grids")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the decoded sheets with their sizes
    Sheets {
        /// Input XLSX file
        input: PathBuf,
    },

    /// Print the cells of one or all sheets
    Dump {
        /// Input XLSX file
        input: PathBuf,

        /// Only print the sheet with this name
        #[arg(short, long)]
        sheet: Option<String>,

        /// Keep at most this many rows per sheet
        #[arg(short, long)]
        max_rows: Option<usize>,

        /// Decode workers (default: available parallelism)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Emit the decoded grids as JSON
        #[arg(long)]
        json: bool,
    },

    /// List in-workbook hyperlinks and list validations
    #[command(alias = "refs")]
    Links {
        /// Input XLSX file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sheets { input } => list_sheets(&input),
        Commands::Dump {
            input,
            sheet,
            max_rows,
            workers,
            json,
        } => {
            let options = ReadOptions {
                row_limit: RowLimit::from(max_rows),
                workers,
            };
            dump(&input, options, sheet.as_deref(), json)
        }
        Commands::Links { input } => list_links(&input),
    }
}

fn read(input: &Path, options: ReadOptions) -> Result<Vec<SheetContent>> {
    log::debug!("reading '{}' with {:?}", input.display(), options);
    SheetReader::open(input)
        .and_then(|reader| reader.with_options(options).read())
        .with_context(|| format!("Failed to read '{}'", input.display()))
}

fn list_sheets(input: &Path) -> Result<()> {
    let sheets = read(input, ReadOptions::default())?;

    for (i, sheet) in sheets.iter().enumerate() {
        println!(
            "{}\t{}\t{} rows x {} columns\t{} blank rows",
            i,
            sheet.name,
            sheet.rows,
            sheet.cols,
            sheet.blank_rows.len()
        );
    }

    Ok(())
}

fn dump(input: &Path, options: ReadOptions, only: Option<&str>, json: bool) -> Result<()> {
    let mut sheets = read(input, options)?;
    if let Some(name) = only {
        sheets.retain(|s| s.name == name);
        if sheets.is_empty() {
            bail!("Sheet '{}' not found in '{}'", name, input.display());
        }
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if json {
        serde_json::to_writer_pretty(&mut out, &sheets).context("Failed to write JSON")?;
        writeln!(out)?;
        return Ok(());
    }

    for sheet in &sheets {
        writeln!(out, "== {} ==", sheet.name)?;
        for (row, col, cell) in sheet.cells() {
            if cell.value.is_empty() && cell.formula.is_none() && !cell.is_merge_anchor() {
                continue;
            }
            write!(
                out,
                "{}{}\t{:?}\t{}",
                coord::column_to_letters(col),
                row + 1,
                cell.cell_type,
                cell.value
            )?;
            if let Some(formula) = &cell.formula {
                write!(out, "\t={}", formula)?;
            }
            if cell.is_merge_anchor() {
                write!(out, "\tmerge +{}x+{}", cell.v_merge, cell.h_merge)?;
            }
            writeln!(out)?;
        }
    }

    Ok(())
}

fn list_links(input: &Path) -> Result<()> {
    let sheets = read(input, ReadOptions::default())?;

    for sheet in &sheets {
        for link in sheet.hyperlinks() {
            let at = format!("{}{}", coord::column_to_letters(link.col), link.row + 1);
            match &link.target {
                Some(target) => println!(
                    "{}!{}\tlink\t{} -> {}!{}",
                    sheet.name,
                    at,
                    target.display,
                    target.sheet_name,
                    target.range.to_a1_string()
                ),
                None => println!("{}!{}\tlink\tinvalid: {}", sheet.name, at, link.formula),
            }
        }
        for dv in sheet.data_validations.iter().filter(|dv| dv.is_list()) {
            match dv.bounds.range() {
                Some(range) => println!(
                    "{}!{}\tlist\t{}{}",
                    sheet.name,
                    dv.sqref,
                    dv.sheet_name
                        .as_deref()
                        .map(|s| format!("{}!", s))
                        .unwrap_or_default(),
                    range.to_a1_string()
                ),
                None => println!("{}!{}\tlist\t{}", sheet.name, dv.sqref, dv.formula1),
            }
        }
    }

    Ok(())
}
