//! Persistence of the pass-one tables.
//!
//! Each table goes to its own JSON file in one directory so that pass two can load them back.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::info;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::MacroError;
use crate::tables::MacroTables;

pub const MNTAB_FILE: &str = "mntab.json";
pub const KPDTAB_FILE: &str = "kpdtab.json";
pub const PNTAB_FILE: &str = "pntab.json";
pub const MDTAB_FILE: &str = "mdtab.json";

/// Write all four tables into `dir`, which must exist
pub fn save_tables(tables: &MacroTables, dir: &Path) -> Result<(), MacroError> {
    save_table(tables.names(), &dir.join(MNTAB_FILE))?;
    save_table(tables.keyword_defaults(), &dir.join(KPDTAB_FILE))?;
    save_table(tables.parameters(), &dir.join(PNTAB_FILE))?;
    save_table(tables.body(), &dir.join(MDTAB_FILE))?;
    info!("tables saved to {}", dir.display());
    Ok(())
}

/// Read back tables written by [`save_tables`]
pub fn load_tables(dir: &Path) -> Result<MacroTables, MacroError> {
    Ok(MacroTables::from_parts(
        load_table(&dir.join(MNTAB_FILE))?,
        load_table(&dir.join(KPDTAB_FILE))?,
        load_table(&dir.join(PNTAB_FILE))?,
        load_table(&dir.join(MDTAB_FILE))?,
    ))
}

fn save_table<T: Serialize + ?Sized>(table: &T, path: &Path) -> Result<(), MacroError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, table)?;
    writer.flush()?;
    Ok(())
}

fn load_table<T: DeserializeOwned>(path: &Path) -> Result<T, MacroError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
