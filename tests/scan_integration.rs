use codeleaks::{
    CancellationToken, IntegrationResult, Integrator, IssueType, PatternLibrary, PriorityStrategy,
    ScanConfig, ScanResult, Scanner, Severity,
};
use std::fs;
use std::sync::Arc;

fn scanner_with_source(source: &str) -> Scanner {
    let _ = env_logger::builder().is_test(true).try_init();

    let config = ScanConfig {
        source: source.to_string(),
        ..ScanConfig::default()
    };
    Scanner::new(config, Arc::new(PatternLibrary::new()))
}

/// Uzun bir Python fonksiyonu üretir
fn uzun_fonksiyon(lines: usize) -> String {
    let mut body = String::from("def islem_zinciri(veri):\n");
    for i in 0..lines {
        body.push_str(&format!("    adim_{} = veri + {}\n", i, i));
    }
    body.push_str("    return veri\n");
    body
}

#[test]
fn karisik_dizin_taramasi() {
    let dir = tempfile::tempdir().unwrap();

    // Gizli anahtar içeren dosya
    fs::write(
        dir.path().join("a.py"),
        "password = \"hunter2\"\nprint(\"merhaba\")\n",
    )
    .unwrap();

    // Aşırı uzun fonksiyon içeren dosya
    fs::write(dir.path().join("b.py"), uzun_fonksiyon(80)).unwrap();

    // Geçersiz UTF-8 içeren dosya: okuma hatası taramayı durdurmamalı
    fs::write(dir.path().join("c.py"), [0x66u8, 0x6f, 0xff, 0xfe, 0x6f]).unwrap();

    let result = scanner_with_source("ci")
        .scan(dir.path(), &CancellationToken::new())
        .unwrap();

    assert_eq!(result.total_files, 3);
    assert!(!result.cancelled);

    let a_guvenlik = result.issues.iter().any(|i| {
        i.file_path.ends_with("a.py")
            && i.issue_type == IssueType::SecurityVulnerability
            && i.severity >= Severity::High
    });
    assert!(a_guvenlik, "a.py için güvenlik bulgusu bekleniyordu");

    let b_bakim = result.issues.iter().any(|i| {
        i.file_path.ends_with("b.py") && i.issue_type == IssueType::MaintainabilityIssue
    });
    assert!(b_bakim, "b.py için uzun fonksiyon bulgusu bekleniyordu");

    let c_hata = result
        .issues
        .iter()
        .any(|i| i.file_path.ends_with("c.py") && i.issue_type == IssueType::LinterError);
    assert!(c_hata, "c.py için okuma hatası bulgusu bekleniyordu");
}

#[test]
fn iptal_edilen_tarama_kismi_ve_isaretli() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..5 {
        fs::write(
            dir.path().join(format!("d{}.py", i)),
            "password = \"hunter2\"\n",
        )
        .unwrap();
    }

    let token = CancellationToken::new();
    token.cancel();

    let result = scanner_with_source("iptal")
        .scan(dir.path(), &token)
        .unwrap();

    // Dağıtımdan önce iptal: hiçbir birim işlenmez ama keşif tamamlanmıştır
    assert!(result.cancelled);
    assert_eq!(result.total_files, 5);
    assert!(result.issues.is_empty());
}

#[test]
fn iki_taramanin_entegrasyonu_kopyalari_eler() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("app.py"),
        "password = \"hunter2\"\neval(kullanici_girdisi)\n",
    )
    .unwrap();

    let birinci = scanner_with_source("gece-taramasi")
        .scan(dir.path(), &CancellationToken::new())
        .unwrap();
    let ikinci = scanner_with_source("pr-taramasi")
        .scan(dir.path(), &CancellationToken::new())
        .unwrap();

    assert!(!birinci.issues.is_empty());
    let toplam = birinci.issues.len() + ikinci.issues.len();

    let entegre = Integrator::default()
        .integrate(&[birinci, ikinci], true, PriorityStrategy::SeverityFirst)
        .unwrap();

    // Aynı kod tabanının iki taraması tamamen örtüşür
    assert_eq!(entegre.duplicates_removed, toplam / 2);
    assert_eq!(entegre.source_count, 2);

    let mut parmak_izleri = std::collections::HashSet::new();
    for issue in &entegre.issues {
        assert!(parmak_izleri.insert(issue.fingerprint()));
    }

    // Önem sıralaması monoton
    for pair in entegre.issues.windows(2) {
        assert!(pair[0].severity >= pair[1].severity);
    }
}

#[test]
fn sonuclar_json_ile_tasinabilir() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("app.py"), "password = \"hunter2\"\n").unwrap();

    let result = scanner_with_source("json")
        .scan(dir.path(), &CancellationToken::new())
        .unwrap();

    let encoded = serde_json::to_string(&result).unwrap();
    let decoded: ScanResult = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded.issues.len(), result.issues.len());
    assert_eq!(decoded.source, "json");

    let entegre = Integrator::default()
        .integrate(&[decoded], true, PriorityStrategy::Balanced)
        .unwrap();
    let encoded = serde_json::to_string(&entegre).unwrap();
    let decoded: IntegrationResult = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded.issues.len(), entegre.issues.len());
}

#[test]
fn tarama_deterministik() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.py"), "eval(girdi)\n").unwrap();
    fs::write(dir.path().join("b.js"), "element.innerHTML = veri;\n").unwrap();
    fs::write(dir.path().join("c.py"), "password = \"hunter2\"\n").unwrap();

    let birinci = scanner_with_source("d")
        .scan(dir.path(), &CancellationToken::new())
        .unwrap();
    let ikinci = scanner_with_source("d")
        .scan(dir.path(), &CancellationToken::new())
        .unwrap();

    assert_eq!(birinci.issues.len(), ikinci.issues.len());
    for (x, y) in birinci.issues.iter().zip(ikinci.issues.iter()) {
        assert_eq!(x.fingerprint(), y.fingerprint());
        assert_eq!(x.file_path, y.file_path);
        assert_eq!(x.line, y.line);
    }
}
