//! Deterministic tar.gz writer
//!
//! Every header field that could vary between machines or runs is pinned,
//! so identical member content always yields identical archive bytes.

use std::io::Write;

use flate2::write::GzEncoder;
use flate2::{Compression, GzBuilder};
use tar::{Builder, Header};

use crate::error::{self, Result};

pub(crate) fn create_deterministic_tar<W: Write>(
    writer: W,
    comment: Option<&str>,
) -> Builder<GzEncoder<W>> {
    let mut gzip = GzBuilder::new().mtime(0).operating_system(255);
    if let Some(comment) = comment {
        gzip = gzip.comment(comment);
    }
    let encoder = gzip.write(writer, Compression::best());

    let mut tar = Builder::new(encoder);
    tar.mode(tar::HeaderMode::Deterministic);
    tar
}

pub(crate) fn write_entry<W: Write>(
    tar: &mut Builder<W>,
    path: &str,
    data: &[u8],
    executable: bool,
) -> Result<()> {
    let mut header = Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(if executable { 0o755 } else { 0o644 });
    header.set_uid(0);
    header.set_gid(0);
    header.set_mtime(0);
    header.set_entry_type(tar::EntryType::Regular);

    // append_data writes long-name extensions and the checksum
    tar.append_data(&mut header, path, data)
        .map_err(|e| error::package::failed(format!("cannot add {path}: {e}")))
}

pub(crate) fn finish<W: Write>(tar: Builder<GzEncoder<W>>) -> Result<W> {
    let encoder = tar
        .into_inner()
        .map_err(|e| error::package::failed(format!("cannot finish archive: {e}")))?;
    encoder
        .finish()
        .map_err(|e| error::package::failed(format!("cannot finish compression: {e}")))
}
