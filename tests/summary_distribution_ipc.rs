mod test_support;

use serde_json::json;
use test_support::{request_err, request_ok, score_params, spawn_sidecar, temp_dir};

fn band_count(subject: &serde_json::Value, label: &str) -> u64 {
    subject
        .get("bands")
        .and_then(|v| v.as_array())
        .expect("bands")
        .iter()
        .find(|b| b.get("label").and_then(|v| v.as_str()) == Some(label))
        .and_then(|b| b.get("count"))
        .and_then(|v| v.as_u64())
        .unwrap_or_else(|| panic!("label {} missing", label))
}

#[test]
fn class_summary_and_distributions() {
    let workspace = temp_dir("gradebook-summary");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.path().to_string_lossy() }),
    );

    let empty = request_ok(&mut stdin, &mut reader, "2", "summary.bySubject", json!({}));
    assert_eq!(empty.get("empty").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(empty.get("subjects"), Some(&json!([])));

    let rows = [
        ("Ada", "Math", [80.0, 90.0, 70.0, 60.0]),
        ("Ada", "Math", [50.0, 50.0, 50.0, 50.0]),
        ("Bola", "English", [40.0, 40.0, 40.0, 40.0]),
    ];
    for (i, (name, subject, scores)) in rows.into_iter().enumerate() {
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            &format!("add-{}", i),
            "records.append",
            score_params(name, "SS 2", subject, scores),
        );
    }

    let summary = request_ok(&mut stdin, &mut reader, "3", "summary.bySubject", json!({}));
    let subjects = summary.get("subjects").and_then(|v| v.as_array()).expect("subjects");
    assert_eq!(subjects.len(), 2);
    let math = &subjects[0];
    assert_eq!(math.get("subject").and_then(|v| v.as_str()), Some("Math"));
    assert_eq!(math.get("averageFinalGrade").and_then(|v| v.as_f64()), Some(61.5));
    assert_eq!(math.get("averageAssessment1").and_then(|v| v.as_f64()), Some(65.0));
    assert_eq!(math.get("numberOfStudents").and_then(|v| v.as_u64()), Some(1));
    assert_eq!(math.get("recordCount").and_then(|v| v.as_u64()), Some(2));

    let letter = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "summary.distribution",
        json!({ "scheme": "letter" }),
    );
    assert_eq!(letter.get("labels"), Some(&json!(["F", "D", "C", "B", "A", "A+"])));
    let dist = letter.get("subjects").and_then(|v| v.as_array()).expect("subjects");
    assert_eq!(band_count(&dist[0], "B"), 1);
    assert_eq!(band_count(&dist[0], "D"), 1);
    assert_eq!(band_count(&dist[0], "A+"), 0);
    assert_eq!(band_count(&dist[1], "F"), 1);
    assert_eq!(dist[1].get("bands").and_then(|v| v.as_array()).map(|v| v.len()), Some(6));

    // Workspace default is the WAEC scheme.
    let waec = request_ok(&mut stdin, &mut reader, "5", "summary.distribution", json!({}));
    assert_eq!(
        waec.get("scheme").and_then(|s| s.get("name")).and_then(|v| v.as_str()),
        Some("waec")
    );
    let dist = waec.get("subjects").and_then(|v| v.as_array()).expect("subjects");
    assert_eq!(band_count(&dist[0], "A"), 1);
    assert_eq!(band_count(&dist[0], "C"), 1);
    assert_eq!(band_count(&dist[1], "E8"), 1);

    let custom = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "summary.distribution",
        json!({ "bins": [0, 50, 73], "labels": ["Low", "Mid"] }),
    );
    let dist = custom.get("subjects").and_then(|v| v.as_array()).expect("subjects");
    assert_eq!(band_count(&dist[0], "Mid"), 1);
    assert_eq!(dist[0].get("unbanded").and_then(|v| v.as_u64()), Some(1));
}

#[test]
fn malformed_bands_are_rejected() {
    let workspace = temp_dir("gradebook-bands");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.path().to_string_lossy() }),
    );

    let cases = vec![
        (json!({ "bins": [0, 50, 100], "labels": ["F"] }), "bad_config"),
        (json!({ "bins": [0, 60, 50], "labels": ["F", "P"] }), "bad_config"),
        (json!({ "bins": [0, 50, 100] }), "bad_params"),
        (json!({ "bins": ["0", 50], "labels": ["F"] }), "bad_params"),
        (json!({ "scheme": "gpa" }), "bad_params"),
        (json!({ "scheme": "letter", "bins": [0, 1], "labels": ["x"] }), "bad_params"),
    ];
    for (i, (params, expected)) in cases.into_iter().enumerate() {
        let code = request_err(
            &mut stdin,
            &mut reader,
            &format!("bad-{}", i),
            "summary.distribution",
            params,
        );
        assert_eq!(code, expected, "case {}", i);
    }
}

#[test]
fn presets_and_curriculum_are_listed() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let schemes = request_ok(&mut stdin, &mut reader, "1", "grading.schemes", json!({}));
    let names: Vec<_> = schemes
        .get("schemes")
        .and_then(|v| v.as_array())
        .expect("schemes")
        .iter()
        .filter_map(|s| s.get("name").and_then(|v| v.as_str()))
        .collect();
    assert_eq!(names, vec!["letter", "waec"]);

    let curriculum = request_ok(&mut stdin, &mut reader, "2", "curriculum.options", json!({}));
    let categories = curriculum.get("categories").and_then(|v| v.as_array()).expect("categories");
    assert_eq!(categories[0].get("name").and_then(|v| v.as_str()), Some("Junior"));
    assert_eq!(categories[1].get("classes"), Some(&json!(["SS 1", "SS 2", "SS 3"])));
}
