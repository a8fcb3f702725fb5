mod test_support;

use serde_json::json;
use test_support::{request_ok, spawn_sidecar, temp_dir};

#[test]
fn imported_table_is_regraded_on_disk() {
    let workspace = temp_dir("gradebook-import-regrade");
    let incoming = temp_dir("gradebook-import-src");
    let bare = incoming.path().join("export.csv");
    std::fs::write(
        &bare,
        "Student_Name,Class,Subject,Assessment_1,Assessment_2,Exam_1,Exam_2,Final_Grade\n\
         Ada,SS 1,Math,50.0,50.0,50.0,50.0,99.0\n",
    )
    .expect("write bare table");

    let (_child, mut stdin, mut reader) = spawn_sidecar();
    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.path().to_string_lossy() }),
    );
    let imported = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "backup.importWorkspaceBundle",
        json!({ "inPath": bare.to_string_lossy() }),
    );
    assert_eq!(
        imported.get("bundleFormatDetected").and_then(|v| v.as_str()),
        Some("bare-csv")
    );
    assert_eq!(imported.get("recordCount").and_then(|v| v.as_u64()), Some(1));

    let listed = request_ok(&mut stdin, &mut reader, "3", "records.list", json!({}));
    assert_eq!(
        listed
            .pointer("/records/0/finalGrade")
            .and_then(|v| v.as_f64()),
        Some(50.0)
    );

    let on_disk =
        std::fs::read_to_string(workspace.path().join("student_data.csv")).expect("read table");
    assert_eq!(
        on_disk,
        "Student_Name,Class,Subject,Assessment_1,Assessment_2,Exam_1,Exam_2,Final_Grade\n\
         Ada,SS 1,Math,50.0,50.0,50.0,50.0,50.0\n"
    );
}

#[test]
fn exported_manifest_counts_records() {
    let workspace = temp_dir("gradebook-export-count");
    let bundle = workspace.path().join("out").join("bundle.zip");

    let (_child, mut stdin, mut reader) = spawn_sidecar();
    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.path().to_string_lossy() }),
    );
    for (i, name) in ["Ada", "Bola"].iter().enumerate() {
        request_ok(
            &mut stdin,
            &mut reader,
            &format!("a{}", i),
            "records.append",
            test_support::score_params(name, "SS 1", "Math", [10.0, 20.0, 30.0, 40.0]),
        );
    }
    let exported = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "backup.exportWorkspaceBundle",
        json!({ "outPath": bundle.to_string_lossy() }),
    );
    assert_eq!(exported.get("recordCount").and_then(|v| v.as_u64()), Some(2));

    let f = std::fs::File::open(&bundle).expect("open bundle");
    let mut archive = zip::ZipArchive::new(f).expect("zip archive");
    let mut manifest = String::new();
    std::io::Read::read_to_string(
        &mut archive.by_name("manifest.json").expect("manifest entry"),
        &mut manifest,
    )
    .expect("read manifest");
    let manifest: serde_json::Value = serde_json::from_str(&manifest).expect("manifest json");
    assert_eq!(manifest.get("recordCount").and_then(|v| v.as_u64()), Some(2));
}
