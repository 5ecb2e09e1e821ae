use lbxtract::lbx::{ArchiveHeader, decode, decode_with};
use lbxtract::{ExtractOptions, LbxExtractor, NamePolicy, collect_archives};
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::tempdir;

/// Lay out an archive the way the game files are: header, offset table with a
/// trailing end slot, name records for the first `names.len()` entries, then
/// the payloads.
fn build_archive(names: &[(&str, &str)], payloads: &[&[u8]]) -> Vec<u8> {
    let data_start = 512 + names.len() * 32;
    let mut out = vec![0u8; data_start];
    out[0..2].copy_from_slice(&(payloads.len() as u16 + 1).to_le_bytes());
    out[2..6].copy_from_slice(&ArchiveHeader::MAGIC);

    let mut offset = data_start as u32;
    for i in 0..=payloads.len() {
        out[8 + i * 4..12 + i * 4].copy_from_slice(&offset.to_le_bytes());
        if let Some(p) = payloads.get(i) {
            offset += p.len() as u32;
        }
    }
    for (i, (name, desc)) in names.iter().enumerate() {
        let base = 512 + i * 32;
        out[base..base + name.len()].copy_from_slice(name.as_bytes());
        out[base + 9..base + 9 + desc.len()].copy_from_slice(desc.as_bytes());
    }
    for p in payloads {
        out.extend_from_slice(p);
    }
    out
}

fn write(path: &Path, data: &[u8]) {
    std::fs::write(path, data).unwrap();
}

fn font_archive() -> Vec<u8> {
    build_archive(
        &[("FONTS   ", "main font"), ("FONTS   ", "small font")],
        &[b"aaaa", b"bb", b"c"],
    )
}

#[test]
fn test_decode_partial_names() {
    let data = font_archive();

    // NUL padding is part of the description, so it cannot be shown
    let entries: Vec<_> = decode(&data).unwrap().collect();
    let summary: Vec<_> = entries
        .iter()
        .map(|e| (e.name.as_str(), e.raw_name.as_str(), e.description.as_str(), e.data))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("0", "FONTS   ", "Unknown", &b"aaaa"[..]),
            ("1", "FONTS   ", "Unknown", &b"bb"[..]),
            ("2", "Unnamed ", "", &b"c"[..]),
        ]
    );
    assert_eq!(entries[0].raw_description, format!("main font{}", "\0".repeat(13)));
}

#[test]
fn test_decode_partial_names_kept() {
    let data = font_archive();

    let entries: Vec<_> = decode_with(&data, NamePolicy::Preserve).unwrap().collect();
    let summary: Vec<_> = entries
        .iter()
        .map(|e| (e.name.as_str(), e.raw_name.as_str(), e.description.as_str(), e.data))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("FONTS", "FONTS   ", "main font", &b"aaaa"[..]),
            ("FONTS", "FONTS   ", "small font", &b"bb"[..]),
            ("2", "Unnamed ", "", &b"c"[..]),
        ]
    );
    assert_eq!(entries[1].raw_description, format!("small font{}", "\0".repeat(12)));
}

#[tokio::test]
async fn test_extract_directory() {
    let game = tempdir().unwrap();
    let out = tempdir().unwrap();

    write(
        &game.path().join("SHIPS.LBX"),
        &build_archive(&[("SHIP", "hulls"), ("SHIP", "hulls 2")], &[b"one", b"two", b"three"]),
    );
    write(&game.path().join("BROKEN.LBX"), &[1, 0, 0, 0, 0, 0, 0, 0]);
    write(&game.path().join("readme.txt"), b"not scanned");

    let (archives, errors) = collect_archives(&[game.path().to_path_buf()]).await;
    assert!(errors.is_empty());
    assert_eq!(archives.len(), 2);

    let extractor = LbxExtractor::new(ExtractOptions {
        output_root: Some(out.path().to_path_buf()),
        name_policy: NamePolicy::Preserve,
        list_only: false,
    });
    let batch = extractor.extract_all(&archives).await;
    assert_eq!(batch.succeeded(), 1);
    assert_eq!(batch.failed(), 1);

    let ships = out.path().join("SHIPS");
    assert_eq!(std::fs::read(ships.join("SHIP")).unwrap(), b"one");
    assert_eq!(std::fs::read(ships.join("SHIP-1")).unwrap(), b"two");
    assert_eq!(std::fs::read(ships.join("2")).unwrap(), b"three");
    assert!(!out.path().join("BROKEN").exists());
}

#[tokio::test]
async fn test_missing_file_is_reported() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("NOPE.LBX");

    let extractor = LbxExtractor::new(ExtractOptions::default());
    let err = extractor.extract_archive(&missing).await.unwrap_err();
    assert_eq!(err.to_string(), format!("cannot find file {}", missing.display()));
}
