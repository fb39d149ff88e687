#[cfg(not(target_os = "linux"))]
compile_error!("unsupported target os");

use crate::error::Error;
use crate::maps::Regions;
use read_process_memory::{CopyAddress, Pid};
use std::fs::File;
use std::io::{self, BufReader};
use std::os::unix::fs::FileExt;
use std::path::Path;

/// A process opened for scanning: its memory map listing and its memory.
#[derive(Debug)]
pub(crate) struct Target {
    pub(crate) regions: Regions<BufReader<File>>,
    pub(crate) memory: Memory,
}

impl Target {
    /// Opens `/proc/<pid>/maps` and `/proc/<pid>/mem`.
    ///
    /// Either file missing or refusing to open is reported as [`Error::ProcessNotFound`]. Opening
    /// `mem` only checks ptrace access mode; reads from it can still fail per region, which is
    /// the scanner's problem. A pid outside the platform's pid range names no process either.
    pub(crate) fn attach(pid: i64) -> Result<Target, Error> {
        let Ok(os_pid) = Pid::try_from(pid) else {
            log::debug!("pid {} out of range", pid);
            return Err(Error::ProcessNotFound(pid));
        };
        Target::attach_at(Path::new("/proc").join(os_pid.to_string()), os_pid)
    }

    fn attach_at(dir: impl AsRef<Path>, pid: Pid) -> Result<Target, Error> {
        let dir = dir.as_ref();
        let open = |name: &str| {
            File::open(dir.join(name)).map_err(|err| {
                log::debug!("failed to open {}: {}", dir.join(name).display(), err);
                Error::ProcessNotFound(pid.into())
            })
        };
        let maps = open("maps")?;
        let mem = open("mem")?;
        log::debug!("attached to pid {}", pid);
        Ok(Target {
            regions: Regions::new(BufReader::new(maps)),
            memory: Memory(mem),
        })
    }
}

/// `/proc/<pid>/mem`, read with positioned reads.
#[derive(Debug)]
pub(crate) struct Memory(File);

impl CopyAddress for Memory {
    /// Fills all of `buf` from `addr`. A short read is an error.
    fn copy_address(&self, addr: usize, buf: &mut [u8]) -> io::Result<()> {
        self.0.read_exact_at(buf, addr as u64)
    }
}
