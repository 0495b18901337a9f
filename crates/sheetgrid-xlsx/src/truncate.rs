//! Row ceiling: cut a worksheet document after its N-th row

use std::io::{self, BufReader, Chain, Cursor, Read};

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::XlsxResult;

/// Maximum number of rows decoded per worksheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RowLimit {
    #[default]
    Unlimited,
    /// Decode at most this many `<row>` elements
    Rows(usize),
}

/// Decode every row
pub const NO_ROW_LIMIT: RowLimit = RowLimit::Unlimited;

impl From<Option<usize>> for RowLimit {
    fn from(limit: Option<usize>) -> Self {
        limit.map_or(RowLimit::Unlimited, RowLimit::Rows)
    }
}

/// Read a whole worksheet part, cut to `limit` rows
pub fn worksheet_document<R: Read>(mut reader: R, limit: RowLimit) -> XlsxResult<Vec<u8>> {
    match limit {
        RowLimit::Unlimited => {
            let mut document = Vec::new();
            reader.read_to_end(&mut document)?;
            Ok(document)
        }
        RowLimit::Rows(max_rows) => truncate_rows(reader, max_rows),
    }
}

/// Tees every byte read from the inner stream
struct Recorder<R> {
    inner: R,
    recorded: Vec<u8>,
}

impl<R: Read> Read for Recorder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.recorded.extend_from_slice(&buf[..n]);
        Ok(n)
    }
}

/// Copy a worksheet document up to the end of its `max_rows`-th row.
///
/// The cut document is closed with end tags for every element still open at
/// the cut point, so it stays well-formed. With `max_rows == 0` the cut falls
/// right after the `<sheetData>` start tag. A document with no more than
/// `max_rows` rows comes back unchanged.
pub fn truncate_rows<R: Read>(reader: R, max_rows: usize) -> XlsxResult<Vec<u8>> {
    // The XML reader never sees the BOM; its positions start after it
    let (bom, reader) = split_bom(reader)?;
    let recorder = Recorder {
        inner: reader,
        recorded: bom.to_vec(),
    };
    let offset = bom.len();
    let mut xml_reader = Reader::from_reader(BufReader::new(recorder));

    let mut buf = Vec::new();
    // Qualified names of the open elements
    let mut open: Vec<Vec<u8>> = Vec::new();
    let mut seen_rows = 0usize;
    let mut cut = None;

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let name = e.name().as_ref().to_vec();
                let is_sheet_data = e.local_name().as_ref() == b"sheetData";
                open.push(name);
                if is_sheet_data && max_rows == 0 {
                    cut = Some(xml_reader.buffer_position());
                    break;
                }
            }
            Event::Empty(e) => {
                if e.local_name().as_ref() == b"row" && in_sheet_data(&open) {
                    seen_rows += 1;
                    if seen_rows >= max_rows {
                        cut = Some(xml_reader.buffer_position());
                        break;
                    }
                }
            }
            Event::End(e) => {
                open.pop();
                match e.local_name().as_ref() {
                    b"row" if in_sheet_data(&open) => {
                        seen_rows += 1;
                        if seen_rows >= max_rows {
                            cut = Some(xml_reader.buffer_position());
                            break;
                        }
                    }
                    // fewer rows than the ceiling
                    b"sheetData" => break,
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    let mut rest = xml_reader.into_inner();
    let Some(position) = cut else {
        io::copy(&mut rest, &mut io::sink())?;
        return Ok(rest.into_inner().recorded);
    };

    let mut document = rest.into_inner().recorded;
    document.truncate(offset + position);
    for name in open.iter().rev() {
        document.extend_from_slice(b"</");
        document.extend_from_slice(name);
        document.push(b'>');
    }
    log::debug!(
        "worksheet cut after {} row(s) at byte {}",
        seen_rows,
        position
    );
    Ok(document)
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Take a leading UTF-8 BOM off the stream
fn split_bom<R: Read>(mut reader: R) -> io::Result<(&'static [u8], Chain<Cursor<Vec<u8>>, R>)> {
    let mut head = Vec::with_capacity(UTF8_BOM.len());
    (&mut reader)
        .take(UTF8_BOM.len() as u64)
        .read_to_end(&mut head)?;
    if head == UTF8_BOM {
        head.clear();
        return Ok((UTF8_BOM, Cursor::new(head).chain(reader)));
    }
    Ok((&[], Cursor::new(head).chain(reader)))
}

fn in_sheet_data(open: &[Vec<u8>]) -> bool {
    open.last().map_or(false, |name| {
        let local = match name.iter().position(|&b| b == b':') {
            Some(idx) => &name[idx + 1..],
            None => &name[..],
        };
        local == b"sheetData"
    })
}
