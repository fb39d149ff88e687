use crate::error::Error;
use crate::maps::{Region, Regions};
use read_process_memory::CopyAddress;
use regex::bytes::Regex;
use std::io::{self, BufRead, Write};

/// Canonical 8-4-4-4-12 UUID text. ASCII-only case folding, since matching runs on raw bytes.
const UUID_PATTERN: &str =
    r"(?i-u)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}";
const UUID_LEN: usize = 36;

/// Largest slice of a region held in memory at once.
const WINDOW: usize = 1 << 20;

#[derive(Debug)]
pub(crate) struct Scanner {
    regex: Regex,
    window: usize,
}

impl Scanner {
    pub(crate) fn new() -> Scanner {
        Scanner::with_window(WINDOW)
    }

    fn with_window(window: usize) -> Scanner {
        assert!(window >= UUID_LEN);
        Scanner {
            regex: Regex::new(UUID_PATTERN).expect("UUID pattern compiles"),
            window,
        }
    }

    /// Reads all of `region` and returns every non-overlapping UUID in it, in memory order.
    ///
    /// The region is read a window at a time. Each window after the first starts where the
    /// previous one stopped being able to hold a whole match (or at the end of its last match,
    /// if that is later), so a UUID split across two windows is still found exactly once.
    /// Nothing is returned unless every window was read.
    pub(crate) fn scan_region<M: CopyAddress>(
        &self,
        memory: &M,
        region: &Region,
    ) -> io::Result<Vec<String>> {
        let too_large = |_| io::Error::new(io::ErrorKind::InvalidInput, "region out of range");
        let base = usize::try_from(region.start).map_err(too_large)?;
        usize::try_from(region.end).map_err(too_large)?;
        let len = usize::try_from(region.len()).map_err(too_large)?;

        let mut found = Vec::new();
        let mut buf = vec![0; len.min(self.window)];
        let mut pos = 0;
        while pos < len {
            let end = len.min(pos + self.window);
            let window = &mut buf[..end - pos];
            memory.copy_address(base + pos, window)?;

            let mut resume = end.saturating_sub(UUID_LEN - 1);
            for m in self.regex.find_iter(window) {
                log::trace!("match at {:#x}", base + pos + m.start());
                found.push(String::from_utf8_lossy(m.as_bytes()).into_owned());
                resume = resume.max(pos + m.end());
            }
            if end == len {
                break;
            }
            pos = resume;
        }
        Ok(found)
    }
}

/// Writes scan results: matches to `out`, skipped regions to `diag`.
#[derive(Debug)]
pub(crate) struct Report<O, D> {
    out: O,
    diag: D,
}

impl<O: Write, D: Write> Report<O, D> {
    pub(crate) fn new(out: O, diag: D) -> Report<O, D> {
        Report { out, diag }
    }

    fn matches(&mut self, region: &Region, found: &[String]) -> io::Result<()> {
        if found.is_empty() {
            return Ok(());
        }
        writeln!(
            self.out,
            "UUID found at memory range {:#x}:{:#x}:",
            region.start, region.end
        )?;
        for uuid in found {
            writeln!(self.out, "\t{}", uuid)?;
        }
        self.out.flush()
    }

    fn skipped(&mut self, region: &Region) -> io::Result<()> {
        writeln!(
            self.diag,
            "{:#x} - {:#x} [error,skipped]",
            region.start, region.end
        )
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> (O, D) {
        (self.out, self.diag)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) regions: usize,
    pub(crate) scanned: usize,
    pub(crate) skipped: usize,
    pub(crate) unreadable: usize,
    pub(crate) matches: usize,
}

/// Scans every region in order, reporting as it goes.
///
/// A region that cannot be read is reported and skipped. A malformed map line or a failure to
/// write the report ends the scan; whatever was reported before that stays reported.
pub(crate) fn run<R, M, O, D>(
    regions: Regions<R>,
    memory: &M,
    report: &mut Report<O, D>,
) -> Result<Summary, Error>
where
    R: BufRead,
    M: CopyAddress,
    O: Write,
    D: Write,
{
    let scanner = Scanner::new();
    let mut summary = Summary::default();
    for region in regions {
        let region = region?;
        summary.regions += 1;
        if !region.readable {
            log::debug!("{:#x}-{:#x}: not readable", region.start, region.end);
            summary.unreadable += 1;
            continue;
        }
        match scanner.scan_region(memory, &region) {
            Ok(found) => {
                log::debug!(
                    "{:#x}-{:#x}: {} bytes, {} matches",
                    region.start,
                    region.end,
                    region.len(),
                    found.len()
                );
                summary.scanned += 1;
                summary.matches += found.len();
                report.matches(&region, &found).map_err(Error::Output)?;
            }
            Err(err) => {
                log::debug!("{:#x}-{:#x}: {}", region.start, region.end, err);
                summary.skipped += 1;
                report.skipped(&region).map_err(Error::Output)?;
            }
        }
    }
    log::info!(
        "scanned {} of {} regions ({} skipped, {} not readable), {} matches",
        summary.scanned,
        summary.regions,
        summary.skipped,
        summary.unreadable,
        summary.matches
    );
    Ok(summary)
}
