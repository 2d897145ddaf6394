use crate::mediasort_core::error::Result;
use base64::{Engine, engine::general_purpose};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Content hash used for collision comparison: SHA-256 over the whole file,
/// base64-encoded. Computed only when a collision forces the comparison.
fn content_hash(path: &Path) -> io::Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(general_purpose::STANDARD.encode(hasher.finalize()))
}

/// Outcome of collision resolution for one candidate destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// The source already sits at its destination; nothing to do.
    AlreadyPlaced,
    /// No collision; place the file at the candidate path.
    Direct(PathBuf),
    /// The candidate is taken; place under a `_DUP_<n>` name instead.
    /// `identical` reports whether the occupant has the same content, and
    /// `hash` carries the source hash computed for that comparison.
    Duplicate {
        path: PathBuf,
        identical: bool,
        hash: String,
    },
}

impl Placement {
    pub fn target(&self) -> Option<&Path> {
        match self {
            Placement::AlreadyPlaced => None,
            Placement::Direct(path) => Some(path),
            Placement::Duplicate { path, .. } => Some(path),
        }
    }
}

/// Decide where `source` may land given its candidate destination.
///
/// Stats the destination at call time rather than trusting any earlier
/// directory listing. Name collisions never overwrite: both an identical and
/// a differing occupant push the incoming file to the smallest free
/// `_DUP_<n>` name in the same folder. A candidate that turns out to be the
/// source itself terminates with zero work, so re-running over an already
/// sorted tree never grows new `_DUP` generations.
pub fn resolve_collision(source: &Path, candidate: &Path) -> Result<Placement> {
    if !candidate.exists() {
        return Ok(Placement::Direct(candidate.to_path_buf()));
    }

    if same_file(source, candidate)? {
        return Ok(Placement::AlreadyPlaced);
    }

    let source_hash = content_hash(source)?;
    let identical = source_hash == content_hash(candidate)?;

    let dir = candidate.parent().unwrap_or(Path::new(""));
    let stem = candidate
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("file");
    let ext = candidate.extension().and_then(|s| s.to_str()).unwrap_or("");

    let mut n = 1u32;
    loop {
        let name = if ext.is_empty() {
            format!("{}_DUP_{}", stem, n)
        } else {
            format!("{}_DUP_{}.{}", stem, n, ext)
        };
        let probe = dir.join(name);
        if !probe.exists() {
            return Ok(Placement::Duplicate {
                path: probe,
                identical,
                hash: source_hash,
            });
        }
        if same_file(source, &probe)? {
            return Ok(Placement::AlreadyPlaced);
        }
        n += 1;
    }
}

fn same_file(a: &Path, b: &Path) -> io::Result<bool> {
    Ok(fs::canonicalize(a)? == fs::canonicalize(b)?)
}
