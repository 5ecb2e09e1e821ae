use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use super::error::ExtractError;
use super::naming::{try_unique_path, unique_path};
use super::parser::LbxArchive;
use super::structures::{ArchiveHeader, ExtractedEntry, NamePolicy};

/// Extraction settings, normally filled from the command line.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Directory under which per-archive folders are created.
    /// Defaults to the directory holding each archive.
    pub output_root: Option<PathBuf>,
    pub name_policy: NamePolicy,
    /// Decode and report without writing anything
    pub list_only: bool,
}

/// One entry as written (or, in list mode, as it would be written).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    pub index: usize,
    pub path: PathBuf,
    pub description: String,
    pub len: u64,
}

/// Outcome of extracting a single archive.
#[derive(Debug, Clone)]
pub struct ArchiveReport {
    pub archive: PathBuf,
    pub output_dir: PathBuf,
    pub header: ArchiveHeader,
    pub files: Vec<ExtractedFile>,
}

/// Outcome of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub archives: Vec<(PathBuf, Result<ArchiveReport, ExtractError>)>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.archives.iter().filter(|(_, r)| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.archives.len() - self.succeeded()
    }
}

/// LBX archive extractor
pub struct LbxExtractor {
    options: ExtractOptions,
}

impl LbxExtractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// Directory the entries of `archive` are written to.
    pub fn output_dir_for(&self, archive: &Path) -> PathBuf {
        let root = match &self.options.output_root {
            Some(root) => root.clone(),
            None => archive.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        let stem = archive.file_stem().unwrap_or(archive.as_os_str());
        root.join(stem)
    }

    /// Extract every archive in `paths`, one after another.
    ///
    /// A failing archive is recorded and the batch moves on.
    pub async fn extract_all(&self, paths: &[PathBuf]) -> BatchReport {
        let mut report = BatchReport::default();
        for path in paths {
            let result = self.extract_archive(path).await;
            if let Err(e) = &result {
                warn!("{}", e);
            }
            report.archives.push((path.clone(), result));
        }
        report
    }

    /// Decode the archive at `path` and write out its entries.
    pub async fn extract_archive(&self, path: &Path) -> Result<ArchiveReport, ExtractError> {
        let data = read_archive(path).await?;
        let archive = LbxArchive::parse(&data).map_err(|source| ExtractError::Decode {
            archive: path.to_path_buf(),
            source,
        })?;
        info!(
            archive = %path.display(),
            records = archive.header().entry_count,
            "valid LBX archive"
        );

        let output_dir = self.output_dir_for(path);
        let files = if self.options.list_only {
            plan_entries(&archive, &output_dir, self.options.name_policy)
        } else {
            self.write_entries(path, &archive, &output_dir).await?
        };

        Ok(ArchiveReport {
            archive: path.to_path_buf(),
            output_dir,
            header: *archive.header(),
            files,
        })
    }

    /// Write every entry into `dir`.
    ///
    /// A failure after the directory exists is reported as
    /// [`ExtractError::Incomplete`] with the files already written.
    async fn write_entries(
        &self,
        path: &Path,
        archive: &LbxArchive<'_>,
        dir: &Path,
    ) -> Result<Vec<ExtractedFile>, ExtractError> {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| ExtractError::io(dir, e))?;

        // Names are claimed in order; the existence check below is the only
        // thing keeping entries apart.
        let mut files = Vec::with_capacity(archive.entry_count());
        for entry in archive.entries(self.options.name_policy) {
            match write_next(dir, &entry).await {
                Ok(file) => files.push(file),
                Err(source) => {
                    return Err(ExtractError::Incomplete {
                        archive: path.to_path_buf(),
                        written: files.into_iter().map(|f| f.path).collect(),
                        source: Box::new(source),
                    });
                }
            }
        }
        Ok(files)
    }
}

/// Claim a free path for `entry` in `dir` and write it there.
async fn write_next(
    dir: &Path,
    entry: &ExtractedEntry<'_>,
) -> Result<ExtractedFile, ExtractError> {
    let path = try_unique_path(dir, &entry.name, |p| {
        p.try_exists().map_err(|e| ExtractError::io(p, e))
    })?;
    write_entry(&path, entry).await?;
    debug!(index = entry.index, path = %path.display(), len = entry.len(), "extracted");
    Ok(ExtractedFile {
        index: entry.index,
        path,
        description: entry.description.clone(),
        len: entry.len(),
    })
}

async fn read_archive(path: &Path) -> Result<Vec<u8>, ExtractError> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Err(ExtractError::NotFound(path.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ExtractError::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(ExtractError::io(path, e)),
    }
    fs::read(path).await.map_err(|e| ExtractError::io(path, e))
}

async fn write_entry(path: &Path, entry: &ExtractedEntry<'_>) -> Result<(), ExtractError> {
    let mut file = fs::File::create(path)
        .await
        .map_err(|e| ExtractError::io(path, e))?;
    file.write_all(entry.data)
        .await
        .map_err(|e| ExtractError::io(path, e))?;
    file.flush().await.map_err(|e| ExtractError::io(path, e))
}

/// Output paths for list mode, de-duplicated among themselves only.
fn plan_entries(archive: &LbxArchive<'_>, dir: &Path, policy: NamePolicy) -> Vec<ExtractedFile> {
    let mut claimed: HashSet<PathBuf> = HashSet::new();
    archive
        .entries(policy)
        .map(|entry| {
            let path = unique_path(dir, &entry.name, |p| claimed.contains(p));
            claimed.insert(path.clone());
            ExtractedFile {
                index: entry.index,
                path,
                description: entry.description,
                len: entry.data.len() as u64,
            }
        })
        .collect()
}
