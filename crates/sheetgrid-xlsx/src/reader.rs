//! Sheet reader: archive in, one [`SheetContent`] per declared sheet out

use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use std::sync::Mutex;

use sheetgrid_core::SheetContent;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::archive::ArchiveParts;
use crate::content::GridBuilder;
use crate::error::{XlsxError, XlsxResult};
use crate::pipeline::{self, SheetJob};
use crate::shared_strings::SharedStrings;
use crate::styles::StyleCatalog;
use crate::truncate::{worksheet_document, RowLimit, NO_ROW_LIMIT};
use crate::workbook::{RelationshipResolver, Relationships, WorkbookInfo};
use crate::worksheet::RawWorksheet;

/// Options for one read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Row ceiling applied to every worksheet
    pub row_limit: RowLimit,
    /// Decode workers; `None` uses the available parallelism
    pub workers: Option<usize>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            row_limit: NO_ROW_LIMIT,
            workers: None,
        }
    }
}

/// Reads the worksheets of an XLSX archive into grids.
///
/// ```no_run
/// use sheetgrid_xlsx::{RowLimit, SheetReader};
///
/// let file = std::fs::File::open("book.xlsx")?;
/// let sheets = SheetReader::new(file)?
///     .with_row_limit(RowLimit::Rows(100))
///     .with_workers(2)
///     .read()?;
/// for sheet in &sheets {
///     println!("{}: {} rows", sheet.name, sheet.rows);
/// }
/// # Ok::<(), sheetgrid_xlsx::XlsxError>(())
/// ```
pub struct SheetReader<R> {
    archive: Mutex<ZipArchive<R>>,
    options: ReadOptions,
}

impl SheetReader<File> {
    /// Open an archive on disk
    pub fn open<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        Self::new(File::open(path)?)
    }
}

impl<R: Read + Seek + Send> SheetReader<R> {
    /// Wrap a seekable archive stream
    pub fn new(reader: R) -> XlsxResult<Self> {
        Ok(Self {
            archive: Mutex::new(ZipArchive::new(reader)?),
            options: ReadOptions::default(),
        })
    }

    pub fn with_row_limit(mut self, row_limit: RowLimit) -> Self {
        self.options.row_limit = row_limit;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.options.workers = Some(workers);
        self
    }

    pub fn with_options(mut self, options: ReadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> ReadOptions {
        self.options
    }

    /// Decode every declared sheet that resolves to a worksheet part, in
    /// workbook order.
    ///
    /// Fails when the relationship map or the workbook definition is
    /// missing, when the archive holds no worksheet, or on the first sheet
    /// that fails to decode.
    pub fn read(&self) -> XlsxResult<Vec<SheetContent>> {
        let parts = {
            let archive = self.lock();
            ArchiveParts::triage(archive.file_names())
        };
        let rels_path = parts.require_rels()?;
        parts.require_worksheets()?;
        let workbook_path = parts.require_workbook()?;

        let rels = self.read_part(rels_path, |r| Relationships::read(r))?;
        let workbook = self.read_part(workbook_path, |r| WorkbookInfo::read(r))?;
        let shared_strings = match parts.shared_strings.as_deref() {
            Some(path) => self.read_part(path, |r| SharedStrings::read(r))?,
            None => SharedStrings::default(),
        };
        let styles = match parts.styles.as_deref() {
            Some(path) => self.read_part(path, |r| StyleCatalog::read(r))?,
            None => StyleCatalog::default(),
        };

        let jobs = resolve_jobs(&workbook, &rels, &parts);
        let workers = self.options.workers.unwrap_or_else(pipeline::default_workers);
        log::debug!(
            "decoding {} of {} declared sheets on {} worker(s)",
            jobs.len(),
            workbook.sheets.len(),
            workers.clamp(1, jobs.len().max(1))
        );

        let builder =
            GridBuilder::new(&shared_strings, &styles).with_date1904(workbook.date1904);
        pipeline::run(&jobs, workers, |job| {
            let raw = self.load_worksheet(&job.path)?;
            builder.build(&job.name, raw)
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ZipArchive<R>> {
        // a panicking sheet decode leaves the archive itself usable
        self.archive
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read_part<T, F>(&self, path: &str, parse: F) -> XlsxResult<T>
    where
        F: FnOnce(&mut dyn Read) -> XlsxResult<T>,
    {
        let mut archive = self.lock();
        let mut file = archive.by_name(path).map_err(|e| match e {
            ZipError::FileNotFound => XlsxError::MissingPart(path.to_string()),
            other => XlsxError::Zip(other),
        })?;
        parse(&mut file)
    }

    /// Inflate (and cut) a worksheet under the archive lock, parse outside it
    fn load_worksheet(&self, path: &str) -> XlsxResult<RawWorksheet> {
        let limit = self.options.row_limit;
        let document = self.read_part(path, |file| worksheet_document(file, limit))?;
        RawWorksheet::parse(document.as_slice())
    }
}

/// Declared sheets whose relationship points at a worksheet in the archive
fn resolve_jobs(
    workbook: &WorkbookInfo,
    rels: &dyn RelationshipResolver,
    parts: &ArchiveParts,
) -> Vec<SheetJob> {
    workbook
        .sheets
        .iter()
        .filter_map(|sheet| {
            let path = rels
                .worksheet_path_for(&sheet.rel_id)
                .and_then(|target| parts.worksheet(target));
            if path.is_none() {
                log::debug!(
                    "sheet '{}' ({}) has no worksheet part, skipping",
                    sheet.name,
                    sheet.rel_id
                );
            }
            path.map(|path| SheetJob {
                name: sheet.name.clone(),
                path: path.to_string(),
            })
        })
        .collect()
}

/// Decode every sheet of an in-memory archive
pub fn read_sheet_contents(bytes: &[u8]) -> XlsxResult<Vec<SheetContent>> {
    read_sheet_contents_with_limit(bytes, NO_ROW_LIMIT)
}

/// Decode every sheet of an in-memory archive, keeping at most `row_limit`
/// rows per sheet
pub fn read_sheet_contents_with_limit(
    bytes: &[u8],
    row_limit: RowLimit,
) -> XlsxResult<Vec<SheetContent>> {
    SheetReader::new(Cursor::new(bytes))?
        .with_row_limit(row_limit)
        .read()
}

/// Decode every sheet of an archive on disk
pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Vec<SheetContent>> {
    SheetReader::open(path)?.read()
}
