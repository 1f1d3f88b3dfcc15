use crate::analyzer::{AnalyzerConfig, FileAnalyzer};
use crate::errors::ScanError;
use crate::language::Language;
use crate::linter::LinterRegistry;
use crate::models::{Issue, IssueType, ScanResult, ScanSummary, Severity};
use crate::rules::{Category, PatternLibrary};
use chrono::Local;
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Varsayılan dosya boyutu sınırı (1 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// İşçi havuzu için kesin üst sınır
pub const MAX_WORKER_CEILING: usize = 16;

/// Küçük proje eşiği ve işçi tavanı
const SMALL_PROJECT_FILES: usize = 10;
const SMALL_PROJECT_WORKERS: usize = 4;

/// Orta proje eşiği ve işçi tavanı
const MEDIUM_PROJECT_FILES: usize = 50;
const MEDIUM_PROJECT_WORKERS: usize = 6;

/// Proje boyutuna göre işçi sayısını belirler
///
/// Saf bir fonksiyondur; gerçek iş parçacıkları olmadan tek başına test
/// edilebilir. Sonuç hiçbir zaman CPU sayısını veya kesin tavanı aşmaz ve
/// hiçbir zaman sıfır olmaz.
pub fn worker_count(file_count: usize, cpu_count: usize) -> usize {
    let tier_cap = if file_count <= SMALL_PROJECT_FILES {
        SMALL_PROJECT_WORKERS
    } else if file_count <= MEDIUM_PROJECT_FILES {
        MEDIUM_PROJECT_WORKERS
    } else {
        MAX_WORKER_CEILING
    };

    tier_cap.min(cpu_count.max(1)).min(file_count.max(1))
}

/// İş birliğine dayalı iptal jetonu
///
/// Jeton dosya dağıtım sınırlarında yoklanır; uçuştaki birimler her zaman
/// tamamlanır, yenileri dağıtılmaz.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Yeni bir jeton oluşturur
    pub fn new() -> Self {
        Self::default()
    }

    /// İptal sinyali verir
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// İptal edilip edilmediğini döndürür
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Tarama yapılandırması
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Tarama kaynağı tanımlayıcısı (entegrasyonda kullanılır)
    pub source: String,

    /// Gitignore sözdizimiyle dışlama kalıpları
    pub ignore_rules: Vec<String>,

    /// Bu boyutu aşan dosyalar atlanır (bayt)
    pub max_file_size: u64,

    /// Etkin dedektör kategorileri
    pub enabled_categories: BTreeSet<Category>,

    /// Depodaki .gitignore dosyalarına saygı gösterilsin mi
    pub respect_gitignore: bool,

    /// Dosya başına yumuşak zaman aşımı
    pub file_timeout: Option<Duration>,

    /// Analizör eşikleri
    pub analyzer: AnalyzerConfig,

    /// Harici linter kayıtları
    pub linters: LinterRegistry,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            source: "scan".to_string(),
            ignore_rules: Vec::new(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            enabled_categories: Category::default_set(),
            respect_gitignore: true,
            file_timeout: None,
            analyzer: AnalyzerConfig::default(),
            linters: LinterRegistry::new(),
        }
    }
}

/// Keşif aşamasında bulunan bir dosya
#[derive(Debug, Clone)]
struct DiscoveredFile {
    path: PathBuf,
    language: Language,
}

/// Eşzamanlı kod tabanı tarayıcısı
///
/// Kalıp kütüphanesi bağımlılık enjeksiyonuyla verilir; tarayıcı süreç
/// genelinde hiçbir gizli durum tutmaz.
pub struct Scanner {
    config: ScanConfig,
    analyzer: FileAnalyzer,
}

impl Scanner {
    /// Yeni bir Scanner örneği oluşturur
    pub fn new(config: ScanConfig, library: Arc<PatternLibrary>) -> Self {
        let analyzer = FileAnalyzer::new(library, config.analyzer.clone());
        Self { config, analyzer }
    }

    /// Kök yol altındaki kod tabanını tarar
    ///
    /// Dosya başına hatalar LinterError bulgularına çevrilir ve tarama devam
    /// eder; yalnızca kök yol ve işçi havuzu hataları ölümcüldür.
    pub fn scan<P: AsRef<Path>>(
        &self,
        root: P,
        token: &CancellationToken,
    ) -> Result<ScanResult, ScanError> {
        let root = root.as_ref();
        let start = Instant::now();
        let scanned_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        if !root.exists() {
            return Err(ScanError::InvalidRoot(root.to_path_buf()));
        }

        info!("Tarama başlatılıyor: {:?}", root);

        let files = self.discover_files(root)?;
        let total_files = files.len();

        let mut files_by_language: BTreeMap<String, usize> = BTreeMap::new();
        for file in &files {
            *files_by_language
                .entry(file.language.as_str().to_string())
                .or_insert(0) += 1;
        }

        info!("{} dosya keşfedildi", total_files);

        let workers = worker_count(total_files, num_cpus::get());
        debug!("İşçi havuzu boyutu: {}", workers);

        // Havuz kurulamazsa tarama ölümcül şekilde başarısız olur
        let pool = rayon::ThreadPoolBuilder::new().num_threads(workers).build()?;

        // Her işçi kendi sonuç listesini döndürür; paylaşılan değişken durum
        // yoktur, birleştirme tek noktada yapılır
        let per_file: Vec<Option<Vec<Issue>>> = pool.install(|| {
            files
                .par_iter()
                .map(|file| {
                    // Dağıtım sınırında iptal yoklaması
                    if token.is_cancelled() {
                        return None;
                    }
                    Some(self.scan_file(file))
                })
                .collect()
        });

        let mut issues: Vec<Issue> = per_file.into_iter().flatten().flatten().collect();

        // Deterministik nihai sıra: dosya yolu, sonra satır; kararlı sıralama
        // dosya içi tespit sırasını korur
        issues.sort_by(|a, b| a.file_path.cmp(&b.file_path).then(a.line.cmp(&b.line)));

        let summary = ScanSummary::from_issues(&issues);
        let cancelled = token.is_cancelled();

        if cancelled {
            warn!("Tarama iptal edildi, kısmi sonuç döndürülüyor");
        }

        info!(
            "Tarama tamamlandı: {} dosyada {} sorun",
            total_files,
            issues.len()
        );

        Ok(ScanResult {
            issues,
            source: self.config.source.clone(),
            scanned_at,
            files_by_language,
            total_files,
            duration_seconds: start.elapsed().as_secs_f64(),
            cancelled,
            summary,
        })
    }

    /// Kök altındaki analiz edilebilir dosyaları keşfeder
    ///
    /// İçerik bu aşamada okunmaz; yükleme işçilere bırakılır (tembel yükleme).
    fn discover_files(&self, root: &Path) -> Result<Vec<DiscoveredFile>, ScanError> {
        let mut files = Vec::new();
        let mut first_error: Option<ignore::Error> = None;

        let mut builder = WalkBuilder::new(root);
        builder
            .hidden(true)
            .parents(self.config.respect_gitignore)
            .git_ignore(self.config.respect_gitignore)
            .git_exclude(self.config.respect_gitignore)
            .git_global(false);

        let mut overrides = OverrideBuilder::new(root);
        for rule in &self.config.ignore_rules {
            // Override sözdiziminde dışlama '!' önekiyle ifade edilir
            if let Err(err) = overrides.add(&format!("!{}", rule)) {
                warn!("Geçersiz dışlama kalıbı atlanıyor: {} - {}", rule, err);
            }
        }
        match overrides.build() {
            Ok(built) => {
                builder.overrides(built);
            }
            Err(err) => warn!("Dışlama kalıpları derlenemedi: {}", err),
        }

        for entry in builder.build() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Dizin girdisi okunamadı: {}", err);
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let language = match Language::from_path(path) {
                Some(language) => language,
                None => {
                    debug!("Tanınmayan dosya tipi atlanıyor: {:?}", path);
                    continue;
                }
            };

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            if size > self.config.max_file_size {
                info!(
                    "Boyut sınırı aşıldığı için atlanıyor: {:?} ({} bayt)",
                    path, size
                );
                continue;
            }

            files.push(DiscoveredFile {
                path: path.to_path_buf(),
                language,
            });
        }

        // Hiçbir dosya keşfedilemediyse ve dolaşım hatası varsa, kök
        // numaralandırılamamış demektir
        if files.is_empty() {
            if let Some(err) = first_error {
                return Err(err.into());
            }
        }

        // Dolaşım sırası platforma bağlıdır; deterministik çıktı için sırala
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    /// Tek bir dosyayı analiz eder
    ///
    /// İçerik tembel olarak burada, işçi içinde yüklenir. Okuma/çözümleme
    /// hatası taramayı durdurmaz; LinterError bulgusuna çevrilir.
    fn scan_file(&self, file: &DiscoveredFile) -> Vec<Issue> {
        let content = match fs::read_to_string(&file.path) {
            Ok(content) => content,
            Err(err) => {
                debug!("Dosya okunamadı: {:?} - {}", file.path, err);
                return vec![Issue::new(
                    IssueType::LinterError,
                    Severity::Medium,
                    file.path.clone(),
                    1,
                    file.language,
                    format!("Dosya okunamadı veya çözümlenemedi: {}", err),
                    String::new(),
                )];
            }
        };

        let deadline = self.config.file_timeout.map(|timeout| Instant::now() + timeout);

        let mut issues = self.analyzer.analyze(
            &file.path,
            &content,
            file.language,
            &self.config.enabled_categories,
            deadline,
        );

        // Yapılandırılmışsa harici linter çıktısı aynı Issue biçiminde eklenir
        if !self.config.linters.is_empty() {
            match self
                .config
                .linters
                .lint_file(&file.path, file.language, &content)
            {
                Ok(mut external) => issues.append(&mut external),
                Err(err) => {
                    warn!("Harici linter başarısız: {:?} - {}", file.path, err);
                    issues.push(Issue::new(
                        IssueType::LinterError,
                        Severity::Medium,
                        file.path.clone(),
                        1,
                        file.language,
                        format!("Harici linter çalıştırılamadı: {}", err),
                        String::new(),
                    ));
                }
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn test_scanner(config: ScanConfig) -> Scanner {
        Scanner::new(config, Arc::new(PatternLibrary::new()))
    }

    #[test]
    fn isci_sayisi_katmanlari() {
        // Küçük proje: en fazla 4
        assert_eq!(worker_count(3, 8), 3);
        assert_eq!(worker_count(10, 8), 4);
        // Orta proje: en fazla 6
        assert_eq!(worker_count(30, 8), 6);
        // Büyük proje: kesin tavan 16
        assert_eq!(worker_count(500, 32), 16);
        // CPU sayısı aşılmaz
        assert_eq!(worker_count(500, 2), 2);
        // Hiçbir zaman sıfır olmaz
        assert_eq!(worker_count(0, 0), 1);
    }

    #[test]
    fn gecersiz_kok_hata_doner() {
        let scanner = test_scanner(ScanConfig::default());
        let result = scanner.scan("/olmayan/bir/dizin", &CancellationToken::new());
        assert!(matches!(result, Err(ScanError::InvalidRoot(_))));
    }

    #[test]
    fn dislama_kurallari_uygulanir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("app.py"), "password = \"hunter2\"\n").unwrap();
        fs::create_dir(dir.path().join("vendor")).unwrap();
        fs::write(
            dir.path().join("vendor").join("lib.py"),
            "password = \"hunter2\"\n",
        )
        .unwrap();

        let config = ScanConfig {
            ignore_rules: vec!["vendor/**".to_string()],
            ..ScanConfig::default()
        };
        let result = test_scanner(config)
            .scan(dir.path(), &CancellationToken::new())
            .unwrap();

        assert_eq!(result.total_files, 1);
        assert!(result
            .issues
            .iter()
            .all(|i| !i.file_path.to_string_lossy().contains("vendor")));
    }

    #[test]
    fn boyut_siniri_asan_dosya_atlanir() {
        let dir = tempfile::tempdir().unwrap();
        let mut buyuk = fs::File::create(dir.path().join("buyuk.py")).unwrap();
        write!(buyuk, "{}", "x = 1\n".repeat(1000)).unwrap();
        fs::write(dir.path().join("kucuk.py"), "x = 1\n").unwrap();

        let config = ScanConfig {
            max_file_size: 100,
            ..ScanConfig::default()
        };
        let result = test_scanner(config)
            .scan(dir.path(), &CancellationToken::new())
            .unwrap();

        assert_eq!(result.total_files, 1);
        assert_eq!(result.files_by_language.get("python"), Some(&1));
    }

    #[test]
    fn onceden_iptal_edilen_tarama_bos_ve_isaretli() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("app.py"), "password = \"hunter2\"\n").unwrap();

        let token = CancellationToken::new();
        token.cancel();

        let result = test_scanner(ScanConfig::default())
            .scan(dir.path(), &token)
            .unwrap();

        assert!(result.cancelled);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn sonuclar_dosya_ve_satir_sirali() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("b.py"),
            "eval(girdi)\npassword = \"hunter2\"\n",
        )
        .unwrap();
        fs::write(dir.path().join("a.py"), "eval(girdi)\n").unwrap();

        let result = test_scanner(ScanConfig::default())
            .scan(dir.path(), &CancellationToken::new())
            .unwrap();

        for pair in result.issues.windows(2) {
            let order = pair[0]
                .file_path
                .cmp(&pair[1].file_path)
                .then(pair[0].line.cmp(&pair[1].line));
            assert_ne!(order, std::cmp::Ordering::Greater);
        }
    }

    #[test]
    fn okunamayan_dosya_linter_hatasina_cevrilir() {
        let file = DiscoveredFile {
            path: PathBuf::from("/olmayan/dosya.py"),
            language: Language::Python,
        };
        let issues = test_scanner(ScanConfig::default()).scan_file(&file);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::LinterError);
        assert_eq!(issues[0].line, 1);
    }
}
