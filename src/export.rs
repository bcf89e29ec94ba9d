use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};
use tracing::info;

use crate::model::Event;

pub const EVENT_COLUMNS: [&str; 5] = ["minute", "type", "location", "player", "team"];
const MAX_SHEET_NAME: usize = 31;

pub struct PlayerSheet<'a> {
    pub player: &'a str,
    pub events: Vec<&'a Event>,
}

pub struct ExportReport {
    pub path: PathBuf,
    pub sheets: usize,
    pub rows: usize,
}

fn event_row(event: &Event) -> [String; 5] {
    [
        event.minute.to_string(),
        event.kind.label().to_string(),
        event.location.map(|loc| loc.to_string()).unwrap_or_default(),
        event.player.clone().unwrap_or_default(),
        event.team.clone(),
    ]
}

pub fn write_player_events_csv<W: Write>(writer: W, events: &[&Event]) -> Result<usize> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(EVENT_COLUMNS).context("write csv header")?;
    for event in events {
        out.write_record(event_row(event)).context("write csv row")?;
    }
    out.flush().context("flush csv")?;
    Ok(events.len())
}

pub fn export_player_events_csv(dir: &Path, player: &str, events: &[&Event]) -> Result<ExportReport> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed creating {}", dir.display()))?;
    let path = dir.join(export_file_name(player, "csv"));
    let file = File::create(&path).with_context(|| format!("failed creating {}", path.display()))?;
    let rows = write_player_events_csv(file, events)?;
    info!(path = %path.display(), rows, "exported player events csv");
    Ok(ExportReport {
        path,
        sheets: 1,
        rows,
    })
}

pub fn export_player_events_xlsx(path: &Path, sheets: &[PlayerSheet<'_>]) -> Result<ExportReport> {
    let mut workbook = Workbook::new();
    let mut rows = 0usize;
    for sheet in sheets {
        let ws = workbook.add_worksheet();
        ws.set_name(sheet_name(sheet.player))?;
        write_sheet(ws, &sheet.events)?;
        rows += sheet.events.len();
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    info!(path = %path.display(), rows, "exported player events workbook");
    Ok(ExportReport {
        path: path.to_path_buf(),
        sheets: sheets.len(),
        rows,
    })
}

fn write_sheet(sheet: &mut Worksheet, events: &[&Event]) -> Result<()> {
    for (c, name) in EVENT_COLUMNS.iter().enumerate() {
        sheet.write_string(0, c as u16, *name)?;
    }
    for (i, event) in events.iter().enumerate() {
        let r = i as u32 + 1;
        // The minute column stays numeric so spreadsheets can sort it.
        sheet.write_number(r, 0, f64::from(event.minute))?;
        for (c, value) in event_row(event).iter().enumerate().skip(1) {
            sheet.write_string(r, c as u16, value)?;
        }
    }
    Ok(())
}

pub fn export_file_name(player: &str, ext: &str) -> String {
    format!("{}_events.{ext}", sanitize(player, '_'))
}

fn sanitize(name: &str, replacement: char) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '[' | ']' => replacement,
            c if c.is_control() => replacement,
            c => c,
        })
        .collect();
    if cleaned.is_empty() {
        "player".to_string()
    } else {
        cleaned
    }
}

fn sheet_name(player: &str) -> String {
    sanitize(player, ' ').chars().take(MAX_SHEET_NAME).collect()
}
