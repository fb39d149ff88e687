use crate::error::Error;
use std::io::{BufRead, Split};

/// One line of `/proc/<pid>/maps`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Region {
    pub(crate) start: u64,
    pub(crate) end: u64,
    pub(crate) readable: bool,
}

impl Region {
    /// Parses the `start-end perms` prefix of a maps line. Offset, device, inode and path are
    /// ignored, and the path need not be UTF-8.
    pub(crate) fn parse(line: &[u8]) -> Option<Region> {
        let space = line.iter().position(|&b| b == b' ')?;
        let (range, rest) = (&line[..space], &line[space + 1..]);
        let dash = range.iter().position(|&b| b == b'-')?;
        let start = parse_address(&range[..dash])?;
        let end = parse_address(&range[dash + 1..])?;
        let readable = match rest.first()? {
            b'r' => true,
            b'-' => false,
            _ => return None,
        };
        (start <= end).then_some(Region {
            start,
            end,
            readable,
        })
    }

    pub(crate) fn len(&self) -> u64 {
        self.end - self.start
    }
}

// `from_str_radix` alone would also take a leading `+`.
fn parse_address(s: &[u8]) -> Option<u64> {
    if s.is_empty() || !s.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    u64::from_str_radix(std::str::from_utf8(s).ok()?, 16).ok()
}

/// Lazily parses regions out of a maps listing, in listing order.
///
/// The first line that does not parse is returned as [`Error::MalformedLine`]; callers stop
/// there.
#[derive(Debug)]
pub(crate) struct Regions<R> {
    lines: Split<R>,
    line_no: usize,
}

impl<R: BufRead> Regions<R> {
    pub(crate) fn new(reader: R) -> Regions<R> {
        Regions {
            lines: reader.split(b'\n'),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for Regions<R> {
    type Item = Result<Region, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = match self.lines.next()? {
            Ok(line) => line,
            Err(err) => return Some(Err(Error::Descriptor(err))),
        };
        self.line_no += 1;
        Some(Region::parse(&line).ok_or_else(|| Error::MalformedLine {
            line_no: self.line_no,
            line: String::from_utf8_lossy(&line).into_owned(),
        }))
    }
}
