use std::io::{self, Stdout, Write};

pub const FILESYSTEM_NOT_FOUND: &str = "Filesystem not Found!";
pub const NO_SNAPSHOT_FOUND: &str = "No SNAPSHOT found!";
pub const SNAPSHOT_DELETED: &str = "Snapshot deleted!";
pub const CREATING_SNAPSHOT: &str = "Creating Snapshot ....";

/// Reporter writes the user-facing result lines of an action.
///
/// Diagnostics go through `tracing`; only what the caller of the tool
/// parses ends up here.
pub struct Reporter<W: Write> {
    out: W,
}

impl Reporter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Print the action verdict as `True` or `False`.
    pub fn verdict(&mut self, ok: bool) -> io::Result<()> {
        writeln!(self.out, "{}", if ok { "True" } else { "False" })
    }

    pub fn line(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}", message)
    }

    /// Print the snapshot listing banner followed by `body`.
    pub fn listing(&mut self, body: &str) -> io::Result<()> {
        let rule = "~".repeat(10);
        write!(self.out, "\n\n")?;
        writeln!(self.out, "{rule}List of Snapshots{rule}\n\t")?;
        writeln!(self.out, "{}", body)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
