use std::io::{Cursor, Read};
use std::sync::Arc;

use futures_util::future::join_all;
use tracing::debug;
use zip::ZipArchive;

use crate::error::ArchiveError;
use crate::intake::asset::SupportingAsset;
use crate::intake::format;

type SharedArchive = ZipArchive<Cursor<Arc<[u8]>>>;

/// Members pulled out of one archive, in central-directory order.
#[derive(Debug, Default)]
pub struct ArchiveExtraction {
    pub assets: Vec<SupportingAsset>,
    pub skipped: Vec<String>,
}

/// Opens `content` as a zip archive and decodes every member whose extension
/// is on the asset allow-list.
///
/// Members are decoded in parallel on the blocking pool, each from its own
/// archive handle, and collected back in index order. Directory entries are
/// ignored; other disallowed members are reported in `skipped`. Any failure
/// fails the whole archive.
pub async fn extract_archive(
    archive_name: &str,
    content: Vec<u8>,
) -> Result<ArchiveExtraction, ArchiveError> {
    let bytes: Arc<[u8]> = Arc::from(content);

    let name = archive_name.to_string();
    let (archive, entries) = tokio::task::spawn_blocking(move || scan_entries(&name, bytes))
        .await
        .map_err(|e| ArchiveError::TaskFailed {
            name: archive_name.to_string(),
            reason: e.to_string(),
        })??;

    let mut skipped = Vec::new();
    let mut wanted = Vec::new();
    for entry in entries {
        if entry.is_dir {
            continue;
        }
        if format::is_supported_asset(&entry.name) {
            wanted.push(entry);
        } else {
            debug!(archive = %archive_name, member = %entry.name, "Skipping unsupported member");
            skipped.push(entry.name);
        }
    }

    let decodes = wanted.into_iter().map(|entry| {
        let mut handle = archive.clone();
        let archive_name = archive_name.to_string();
        tokio::task::spawn_blocking(move || {
            let content = read_member(&mut handle, entry.index).map_err(|reason| {
                ArchiveError::Extract {
                    archive: archive_name,
                    member: entry.name.clone(),
                    reason,
                }
            })?;
            Ok::<_, ArchiveError>((entry.name, content))
        })
    });

    let mut assets = Vec::new();
    for joined in join_all(decodes).await {
        let (member, content) = joined.map_err(|e| ArchiveError::TaskFailed {
            name: archive_name.to_string(),
            reason: e.to_string(),
        })??;

        // Filtered by the allow-list above, so classification cannot fail here.
        if let Some(asset) = SupportingAsset::classify(member, content) {
            assets.push(asset);
        }
    }

    debug!(
        archive = %archive_name,
        accepted = assets.len(),
        skipped = skipped.len(),
        "Archive extracted"
    );

    Ok(ArchiveExtraction { assets, skipped })
}

struct MemberEntry {
    index: usize,
    name: String,
    is_dir: bool,
}

fn scan_entries(
    archive_name: &str,
    bytes: Arc<[u8]>,
) -> Result<(SharedArchive, Vec<MemberEntry>), ArchiveError> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| ArchiveError::Open {
            name: archive_name.to_string(),
            source: e,
        })?;

    let mut entries = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let member = archive
            .by_index_raw(index)
            .map_err(|e| ArchiveError::Extract {
                archive: archive_name.to_string(),
                member: format!("#{}", index),
                reason: e.to_string(),
            })?;
        entries.push(MemberEntry {
            index,
            name: member.name().to_string(),
            is_dir: member.is_dir(),
        });
    }

    Ok((archive, entries))
}

fn read_member(archive: &mut SharedArchive, index: usize) -> Result<Vec<u8>, String> {
    let mut member = archive.by_index(index).map_err(|e| e.to_string())?;
    let mut content = Vec::with_capacity(member.size().min(64 * 1024 * 1024) as usize);
    member
        .read_to_end(&mut content)
        .map_err(|e| e.to_string())?;
    Ok(content)
}
