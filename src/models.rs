use crate::language::Language;
use crate::utils;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

/// Kod parçası (snippet) için üst karakter sınırı
pub const MAX_SNIPPET_CHARS: usize = 500;

/// Parmak izi hesaplamasında kullanılan satır penceresi
///
/// Aynı bulgunun birkaç satır kayması parmak izini değiştirmemelidir.
pub const FINGERPRINT_LINE_WINDOW: usize = 5;

/// Analiz sonucunda tespit edilen sorun
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Sorunun tipi
    pub issue_type: IssueType,

    /// Önem seviyesi
    pub severity: Severity,

    /// Etkilenen dosya
    pub file_path: PathBuf,

    /// Satır numarası (1 tabanlı)
    pub line: usize,

    /// Sütun numarası
    pub column: Option<usize>,

    /// Dosyanın dili
    pub language: Language,

    /// Sorun açıklaması
    pub description: String,

    /// Bulunan kod parçası (en fazla `MAX_SNIPPET_CHARS` karakter)
    pub code_snippet: String,

    /// Sorun için önerilen çözüm
    pub suggestion: Option<String>,

    /// Eşleşen dedektörün uyumluluk etiketleri (örn. injection sınıfı)
    pub compliance_tags: BTreeSet<String>,

    /// Ek bağlam bilgileri (hiçbir zaman null olmaz, varsayılan boş)
    #[serde(default)]
    pub context: BTreeMap<String, String>,
}

impl Issue {
    /// Yeni bir Issue oluşturur; kod parçası sınır aşıyorsa kısaltılır
    pub fn new(
        issue_type: IssueType,
        severity: Severity,
        file_path: PathBuf,
        line: usize,
        language: Language,
        description: String,
        code_snippet: String,
    ) -> Self {
        Self {
            issue_type,
            severity,
            file_path,
            line,
            column: None,
            language,
            description,
            code_snippet: utils::truncate_chars(&code_snippet, MAX_SNIPPET_CHARS),
            suggestion: None,
            compliance_tags: BTreeSet::new(),
            context: BTreeMap::new(),
        }
    }

    /// Sütun numarası ekler
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    /// Çözüm önerisi ekler
    pub fn with_suggestion<S: Into<String>>(mut self, suggestion: S) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Uyumluluk etiketleri ekler
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.compliance_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Bağlam bilgisi ekler
    pub fn with_context<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Bulgunun deterministik parmak izini hesaplar
    ///
    /// Aynı bulgu bağımsız taramalarda aynı parmak izini üretir: normalize
    /// edilmiş dosya yolu, satır penceresi, sorun tipi ve normalize edilmiş
    /// açıklama üzerinden hesaplanır. Tarama sırasından bağımsızdır.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        utils::normalize_path(&self.file_path).hash(&mut hasher);
        (self.line / FINGERPRINT_LINE_WINDOW).hash(&mut hasher);
        self.issue_type.as_str().hash(&mut hasher);
        utils::normalize_text(&self.description).hash(&mut hasher);
        hasher.finish()
    }
}

/// Sorun tipleri
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IssueType {
    /// Güvenlik açığı
    SecurityVulnerability,

    /// Performans sorunu
    PerformanceIssue,

    /// Kod kokusu
    CodeSmell,

    /// Bakım zorluğu
    MaintainabilityIssue,

    /// Dokümantasyon eksikliği
    DocumentationIssue,

    /// En iyi uygulama ihlali
    BestPracticeViolation,

    /// Harici linter veya analiz hatası
    LinterError,

    /// Genel kod kalitesi sorunu
    CodeQuality,
}

impl IssueType {
    /// Normalize edilmiş tip adı
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::SecurityVulnerability => "security_vulnerability",
            IssueType::PerformanceIssue => "performance_issue",
            IssueType::CodeSmell => "code_smell",
            IssueType::MaintainabilityIssue => "maintainability_issue",
            IssueType::DocumentationIssue => "documentation_issue",
            IssueType::BestPracticeViolation => "best_practice_violation",
            IssueType::LinterError => "linter_error",
            IssueType::CodeQuality => "code_quality",
        }
    }
}

/// Önem seviyeleri
///
/// Bildirim sırası toplam sıralamayı belirler: Critical > High > Medium > Low.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Düşük önem
    Low,

    /// Orta önem
    Medium,

    /// Yüksek önem
    High,

    /// Kritik önem
    Critical,
}

/// Önem seviyelerine göre sorun sayıları
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    /// Sorun listesi üzerinden sayımları hesaplar
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut counts = Self::default();
        for issue in issues {
            match issue.severity {
                Severity::Critical => counts.critical += 1,
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
        }
        counts
    }
}

/// Tarama özeti istatistikleri
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Toplam sorun sayısı
    pub total_issues: usize,

    /// Önem seviyelerine göre dağılım
    pub by_severity: SeverityCounts,

    /// Sorun tiplerine göre dağılım
    pub by_type: BTreeMap<String, usize>,

    /// Kritik sorun sayısı
    pub critical_count: usize,
}

impl ScanSummary {
    /// Birleştirilmiş sorun listesi üzerinden özeti bir kez hesaplar
    pub fn from_issues(issues: &[Issue]) -> Self {
        let by_severity = SeverityCounts::from_issues(issues);
        let mut by_type = BTreeMap::new();
        for issue in issues {
            *by_type.entry(issue.issue_type.as_str().to_string()).or_insert(0) += 1;
        }

        Self {
            total_issues: issues.len(),
            critical_count: by_severity.critical,
            by_severity,
            by_type,
        }
    }
}

/// Tek bir tarama çağrısının sonucu
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// Tespit edilen sorunlar (dosya yolu, satır sırasına göre)
    pub issues: Vec<Issue>,

    /// Tarama kaynağı tanımlayıcısı
    pub source: String,

    /// Tarama zamanı
    pub scanned_at: String,

    /// Dile göre taranan dosya sayıları
    pub files_by_language: BTreeMap<String, usize>,

    /// Taranan toplam dosya sayısı
    pub total_files: usize,

    /// Tarama süresi (saniye)
    pub duration_seconds: f64,

    /// Tarama iptal nedeniyle kısmi mi kaldı
    pub cancelled: bool,

    /// Özet istatistikler
    pub summary: ScanSummary,
}

impl ScanResult {
    /// Var olan bir sorun listesinden ScanResult oluşturur
    ///
    /// Entegrasyon çıktısını yeniden girdi olarak kullanmak isteyen çağıranlar
    /// içindir; özet yeniden hesaplanır.
    pub fn from_issues(issues: Vec<Issue>, source: &str) -> Self {
        let summary = ScanSummary::from_issues(&issues);
        Self {
            issues,
            source: source.to_string(),
            scanned_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            files_by_language: BTreeMap::new(),
            total_files: 0,
            duration_seconds: 0.0,
            cancelled: false,
            summary,
        }
    }

    /// Kritik seviyedeki sorunların alt kümesini döndürür
    pub fn critical_issues(&self) -> Vec<&Issue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Critical)
            .collect()
    }
}

/// Birden çok tarama sonucunun birleştirilmiş çıktısı
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationResult {
    /// Birleştirilmiş ve sıralanmış sorunlar
    pub issues: Vec<Issue>,

    /// Tekilleştirme sırasında elenen sorun sayısı
    pub duplicates_removed: usize,

    /// Önem seviyelerine göre dağılım
    pub severity_distribution: SeverityCounts,

    /// Sorun tiplerine göre dağılım
    pub issue_type_distribution: BTreeMap<String, usize>,

    /// Girdi olarak kabul edilen kaynak sayısı
    pub source_count: usize,

    /// Geçersiz olduğu için elenen kaynaklar
    pub dropped_sources: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ornek_issue(line: usize, description: &str) -> Issue {
        Issue::new(
            IssueType::SecurityVulnerability,
            Severity::Critical,
            PathBuf::from("src/app.py"),
            line,
            Language::Python,
            description.to_string(),
            "password = \"hunter2\"".to_string(),
        )
    }

    #[test]
    fn onem_siralamasi_toplam() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn parmak_izi_deterministik() {
        let a = ornek_issue(12, "Sabit kodlu parola tespit edildi");
        let b = ornek_issue(12, "Sabit kodlu parola tespit edildi");
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn parmak_izi_pencere_icinde_sabit() {
        // 10 ve 12 aynı pencereye düşer, 10 ve 17 düşmez
        let a = ornek_issue(10, "Sabit kodlu parola tespit edildi");
        let b = ornek_issue(12, "Sabit kodlu parola tespit edildi");
        let c = ornek_issue(17, "Sabit kodlu parola tespit edildi");
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn parmak_izi_aciklama_normalize() {
        let a = ornek_issue(12, "Sabit  Kodlu Parola tespit edildi");
        let b = ornek_issue(12, "sabit kodlu parola tespit edildi");
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn snippet_kisaltilir() {
        let uzun = "x".repeat(MAX_SNIPPET_CHARS * 2);
        let issue = Issue::new(
            IssueType::CodeSmell,
            Severity::Low,
            PathBuf::from("a.js"),
            1,
            Language::JavaScript,
            "uzun satır".to_string(),
            uzun,
        );
        assert_eq!(issue.code_snippet.chars().count(), MAX_SNIPPET_CHARS);
    }

    #[test]
    fn ozet_istatistikleri() {
        let issues = vec![
            ornek_issue(1, "a"),
            Issue::new(
                IssueType::CodeSmell,
                Severity::Low,
                PathBuf::from("b.py"),
                2,
                Language::Python,
                "b".to_string(),
                String::new(),
            ),
        ];
        let summary = ScanSummary::from_issues(&issues);
        assert_eq!(summary.total_issues, 2);
        assert_eq!(summary.by_severity.critical, 1);
        assert_eq!(summary.by_severity.low, 1);
        assert_eq!(summary.critical_count, 1);
        assert_eq!(summary.by_type.get("code_smell"), Some(&1));
    }

    #[test]
    fn json_serilestirme_gidis_donus() {
        let result = ScanResult::from_issues(vec![ornek_issue(3, "bulgu")], "tarama-1");
        let json = serde_json::to_string(&result).unwrap();
        let geri: ScanResult = serde_json::from_str(&json).unwrap();
        assert_eq!(geri.issues.len(), 1);
        assert_eq!(geri.source, "tarama-1");
        assert_eq!(geri.issues[0].fingerprint(), result.issues[0].fingerprint());
    }
}
