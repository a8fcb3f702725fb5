use anyhow::{anyhow, Context};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const MANIFEST_ENTRY: &str = "manifest.json";
const DATA_DIR: &str = "data";
pub const BUNDLE_FORMAT_V1: &str = "gradebook-workspace-v1";
pub const BARE_TABLE_FORMAT: &str = "bare-csv";

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub bundle_format: String,
    pub entry_count: usize,
    pub sha256: String,
}

#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub bundle_format_detected: String,
}

fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Writes the workspace table file into a zip bundle with a checksummed
/// manifest.
pub fn export_workspace_bundle(
    workspace_path: &Path,
    data_file: &str,
    record_count: usize,
    out_path: &Path,
) -> anyhow::Result<ExportSummary> {
    let table_path = workspace_path.join(data_file);
    if !table_path.is_file() {
        return Err(anyhow!(
            "workspace table not found: {}",
            table_path.to_string_lossy()
        ));
    }
    let table_bytes = std::fs::read(&table_path)
        .with_context(|| format!("failed to read table {}", table_path.to_string_lossy()))?;
    let sha256 = sha256_hex(&table_bytes);

    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.to_string_lossy()))?;
    }

    let out_file = File::create(out_path).with_context(|| {
        format!(
            "failed to create output file {}",
            out_path.to_string_lossy()
        )
    })?;
    let mut zip = ZipWriter::new(out_file);
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let manifest = json!({
        "format": BUNDLE_FORMAT_V1,
        "version": 1,
        "appVersion": env!("CARGO_PKG_VERSION"),
        "exportedAt": chrono::Utc::now().to_rfc3339(),
        "dataFile": data_file,
        "recordCount": record_count,
        "sha256": sha256,
    });
    zip.start_file(MANIFEST_ENTRY, opts)
        .context("failed to start manifest entry")?;
    zip.write_all(
        serde_json::to_string_pretty(&manifest)
            .context("failed to serialize manifest")?
            .as_bytes(),
    )
    .context("failed to write manifest entry")?;

    zip.start_file(format!("{}/{}", DATA_DIR, data_file), opts)
        .context("failed to start table entry")?;
    zip.write_all(&table_bytes)
        .context("failed to write table entry")?;

    zip.finish().context("failed to finalize zip bundle")?;

    Ok(ExportSummary {
        bundle_format: BUNDLE_FORMAT_V1.to_string(),
        entry_count: 2,
        sha256,
    })
}

/// Replaces the workspace table file with the one in `in_path`.
///
/// A file that is not a zip archive is taken as a bare table file and
/// copied as-is.
pub fn import_workspace_bundle(
    in_path: &Path,
    workspace_path: &Path,
    data_file: &str,
) -> anyhow::Result<ImportSummary> {
    std::fs::create_dir_all(workspace_path).with_context(|| {
        format!(
            "failed to create workspace {}",
            workspace_path.to_string_lossy()
        )
    })?;
    let dst = workspace_path.join(data_file);

    let (table_bytes, detected) = if is_zip_file(in_path)? {
        (read_bundle_table(in_path)?, BUNDLE_FORMAT_V1)
    } else {
        let bytes = std::fs::read(in_path)
            .with_context(|| format!("failed to read {}", in_path.to_string_lossy()))?;
        (bytes, BARE_TABLE_FORMAT)
    };

    replace_file(&dst, &table_bytes)?;
    Ok(ImportSummary {
        bundle_format_detected: detected.to_string(),
    })
}

fn read_bundle_table(in_path: &Path) -> anyhow::Result<Vec<u8>> {
    let in_file = File::open(in_path)
        .with_context(|| format!("failed to open bundle {}", in_path.to_string_lossy()))?;
    let mut archive = ZipArchive::new(in_file).context("invalid zip archive")?;

    let mut manifest_text = String::new();
    archive
        .by_name(MANIFEST_ENTRY)
        .context("bundle missing manifest.json")?
        .read_to_string(&mut manifest_text)
        .context("failed to read manifest.json")?;
    let manifest: serde_json::Value =
        serde_json::from_str(&manifest_text).context("manifest.json is invalid JSON")?;
    let format = manifest
        .get("format")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    if format != BUNDLE_FORMAT_V1 {
        return Err(anyhow!("unsupported bundle format: {}", format));
    }
    let Some(bundled_name) = manifest.get("dataFile").and_then(|v| v.as_str()) else {
        return Err(anyhow!("manifest.json missing dataFile"));
    };

    let entry_name = format!("{}/{}", DATA_DIR, bundled_name);
    let mut table_bytes = Vec::new();
    archive
        .by_name(&entry_name)
        .with_context(|| format!("bundle missing {}", entry_name))?
        .read_to_end(&mut table_bytes)
        .context("failed to extract table entry")?;

    if let Some(expected) = manifest.get("sha256").and_then(|v| v.as_str()) {
        let actual = sha256_hex(&table_bytes);
        if !actual.eq_ignore_ascii_case(expected) {
            return Err(anyhow!(
                "checksum mismatch for {}: expected {}, got {}",
                entry_name,
                expected,
                actual
            ));
        }
    }
    Ok(table_bytes)
}

fn replace_file(dst: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let mut tmp_name = dst.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(".importing");
    let tmp_dst = dst.with_file_name(tmp_name);
    if tmp_dst.exists() {
        let _ = std::fs::remove_file(&tmp_dst);
    }

    let mut out = File::create(&tmp_dst).with_context(|| {
        format!(
            "failed to create temp table {}",
            tmp_dst.to_string_lossy()
        )
    })?;
    out.write_all(bytes)
        .context("failed to write extracted table")?;
    out.flush().context("failed to flush extracted table")?;
    drop(out);

    std::fs::rename(&tmp_dst, dst).with_context(|| {
        format!(
            "failed to move extracted table to {}",
            dst.to_string_lossy()
        )
    })?;
    Ok(())
}

fn is_zip_file(path: &Path) -> anyhow::Result<bool> {
    let mut f = File::open(path)
        .with_context(|| format!("failed to open input file {}", path.to_string_lossy()))?;
    let mut sig = [0u8; 4];
    let read = f.read(&mut sig).context("failed to read file signature")?;
    if read < 4 {
        return Ok(false);
    }
    Ok(sig == [0x50, 0x4B, 0x03, 0x04])
}
