use crate::language::Language;
use crate::models::{IssueType, Severity};
use crate::utils;
use lazy_static::lazy_static;
use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Dedektör kategorileri
///
/// Analizör, kategori bazında dedektörleri açıp kapatabilir.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Güvenlik dedektörleri
    Security,

    /// Performans dedektörleri
    Performance,

    /// Kod kokusu dedektörleri
    Smell,

    /// Bakım kolaylığı dedektörleri
    Maintainability,
}

impl Category {
    /// Tüm kategoriler
    pub const ALL: &'static [Category] = &[
        Category::Security,
        Category::Performance,
        Category::Smell,
        Category::Maintainability,
    ];

    /// Varsayılan etkin kategori kümesi (tümü)
    pub fn default_set() -> BTreeSet<Category> {
        Self::ALL.iter().copied().collect()
    }
}

/// Statik dedektör tanımı
///
/// Kalıplar derlenmeden önce tablo halinde tutulur; `PatternLibrary` bunları
/// bir kez derler.
pub struct DetectorDef {
    /// Dedektör tanımlayıcısı
    pub id: &'static str,

    /// Büyük/küçük harf duyarsız derlenecek satır kalıbı
    pub pattern: &'static str,

    /// Dedektör kategorisi
    pub category: Category,

    /// Üretilen sorunun tipi
    pub issue_type: IssueType,

    /// Üretilen sorunun önem seviyesi
    pub severity: Severity,

    /// Uyumluluk etiketleri
    pub tags: &'static [&'static str],

    /// Mesaj şablonu; `{}` eşleşen metinle değiştirilir
    pub message: &'static str,

    /// Çözüm önerisi
    pub suggestion: &'static str,
}

/// Derlenmiş dedektör
pub struct Detector {
    pub id: &'static str,
    pub regex: Regex,
    pub category: Category,
    pub issue_type: IssueType,
    pub severity: Severity,
    pub tags: &'static [&'static str],
    message: &'static str,
    pub suggestion: &'static str,
}

/// Mesaj şablonuna eklenen eşleşme metninin üst sınırı
const MAX_MATCH_CHARS: usize = 80;

impl Detector {
    /// Mesaj şablonunu eşleşen metinle doldurur
    pub fn render_message(&self, matched: &str) -> String {
        let matched = utils::truncate_chars(utils::strip_quotes(matched), MAX_MATCH_CHARS);
        self.message.replace("{}", matched.trim())
    }
}

/// Tüm dillere uygulanan genel dedektörler
lazy_static! {
    static ref GENERIC_DETECTORS: Vec<DetectorDef> = vec![
        DetectorDef {
            id: "generic-hardcoded-password",
            pattern: r#"(?i)(?:password|passwd|pwd)\s*[:=]\s*["'][^"']{4,}["']"#,
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::Critical,
            tags: &["sensitive-data", "cwe-798"],
            message: "Sabit kodlu parola tespit edildi: {}",
            suggestion: "Parolaları asla kod içine yazmayın. Ortam değişkenleri veya güvenli bir vault kullanın.",
        },
        DetectorDef {
            id: "generic-hardcoded-api-key",
            pattern: r#"(?i)(?:api[-_]?key|apikey|api[-_]?token|access[-_]?token|secret[-_]?key)\s*[:=]\s*["'][^"']{8,}["']"#,
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::Critical,
            tags: &["sensitive-data", "cwe-798"],
            message: "Sabit kodlu API anahtarı/token tespit edildi: {}",
            suggestion: "API anahtarlarını asla kod içine yazmayın. Ortam değişkenleri veya güvenli bir vault kullanın.",
        },
        DetectorDef {
            id: "generic-private-key-block",
            pattern: r"-----BEGIN (?:RSA |EC |DSA |OPENSSH )?PRIVATE KEY-----",
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::Critical,
            tags: &["sensitive-data", "cwe-321"],
            message: "Kod içine gömülü private key tespit edildi",
            suggestion: "Private key'leri kod deposunda tutmayın; güvenli dosya izinleri olan ayrı dosyalarda saklayın.",
        },
        DetectorDef {
            id: "generic-credentials-in-url",
            pattern: r"https?://[^:@/\s]+:[^:@/\s]+@",
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::High,
            tags: &["sensitive-data"],
            message: "URL içinde kimlik bilgileri (kullanıcı adı:parola) tespit edildi",
            suggestion: "URL'lerde kimlik bilgilerini asla sabit kodlu kullanmayın.",
        },
        DetectorDef {
            id: "generic-insecure-tls",
            pattern: r"(?i)(?:verify\s*=\s*false|--insecure|--no-check-certificate|rejectUnauthorized\s*:\s*false|InsecureSkipVerify\s*:\s*true)",
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::High,
            tags: &["insecure-transport", "cwe-295"],
            message: "TLS sertifika doğrulaması devre dışı bırakılıyor: {}",
            suggestion: "Sertifika doğrulamasını devre dışı bırakmayın; bu MITM saldırılarına açık hale getirir.",
        },
        DetectorDef {
            id: "generic-todo-debt",
            pattern: r"(?i)\b(?:TODO|FIXME|HACK|XXX)\b[:\s]",
            category: Category::Maintainability,
            issue_type: IssueType::MaintainabilityIssue,
            severity: Severity::Low,
            tags: &["tech-debt"],
            message: "Teknik borç işareti tespit edildi: {}",
            suggestion: "Teknik borç notlarını iş takip sistemine taşıyın ve koddan temizleyin.",
        },
    ];
}

/// Python dedektörleri
lazy_static! {
    static ref PYTHON_DETECTORS: Vec<DetectorDef> = vec![
        DetectorDef {
            id: "python-eval",
            pattern: r"\beval\s*\(",
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::High,
            tags: &["injection", "cwe-95"],
            message: "eval() kullanımı kod enjeksiyonuna açıktır",
            suggestion: "eval() yerine ast.literal_eval() veya açık ayrıştırma kullanın.",
        },
        DetectorDef {
            id: "python-subprocess-shell",
            pattern: r"(?i)subprocess\.\w+\(.*shell\s*=\s*True",
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::High,
            tags: &["injection", "cwe-78"],
            message: "shell=True ile subprocess çağrısı komut enjeksiyonu riski taşır",
            suggestion: "shell=True kullanmayın; argümanları liste olarak geçirin.",
        },
        DetectorDef {
            id: "python-pickle-load",
            pattern: r"\bpickle\.loads?\s*\(",
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::High,
            tags: &["deserialization", "cwe-502"],
            message: "Güvenilmeyen veride pickle deserializasyonu tehlikelidir",
            suggestion: "Güvenilmeyen girdi için json gibi güvenli bir format kullanın.",
        },
        DetectorDef {
            id: "python-bare-except",
            pattern: r"except\s*:\s*$",
            category: Category::Smell,
            issue_type: IssueType::BestPracticeViolation,
            severity: Severity::Medium,
            tags: &["error-handling"],
            message: "Çıplak except bloğu tüm hataları sessizce yutar",
            suggestion: "Beklenen istisna tiplerini açıkça yakalayın.",
        },
        DetectorDef {
            id: "python-range-len",
            pattern: r"range\s*\(\s*len\s*\(",
            category: Category::Performance,
            issue_type: IssueType::PerformanceIssue,
            severity: Severity::Low,
            tags: &[],
            message: "range(len(...)) yerine enumerate kullanılabilir",
            suggestion: "Dizin ve değer birlikte gerekiyorsa enumerate() kullanın.",
        },
        DetectorDef {
            id: "python-wildcard-import",
            pattern: r"from\s+\S+\s+import\s+\*",
            category: Category::Smell,
            issue_type: IssueType::BestPracticeViolation,
            severity: Severity::Low,
            tags: &[],
            message: "Joker import ad alanını kirletir: {}",
            suggestion: "Kullanılan adları açıkça import edin.",
        },
    ];
}

/// JavaScript/TypeScript dedektörleri
lazy_static! {
    static ref JAVASCRIPT_DETECTORS: Vec<DetectorDef> = vec![
        DetectorDef {
            id: "js-eval",
            pattern: r"\beval\s*\(",
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::High,
            tags: &["injection", "cwe-95"],
            message: "eval() kullanımı kod enjeksiyonuna açıktır",
            suggestion: "eval() yerine JSON.parse() veya açık fonksiyon çağrıları kullanın.",
        },
        DetectorDef {
            id: "js-inner-html",
            pattern: r"\.innerHTML\s*=",
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::Medium,
            tags: &["xss", "cwe-79"],
            message: "innerHTML ataması XSS riskine açıktır",
            suggestion: "textContent kullanın veya içeriği uygun şekilde temizleyin.",
        },
        DetectorDef {
            id: "js-document-write",
            pattern: r"document\.write\s*\(",
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::High,
            tags: &["xss", "cwe-79"],
            message: "document.write() XSS riskine açıktır",
            suggestion: "DOM API'leri ile güvenli içerik ekleme yöntemlerini tercih edin.",
        },
        DetectorDef {
            id: "js-var-declaration",
            pattern: r"(?:^|[;{]\s*)var\s+\w",
            category: Category::Smell,
            issue_type: IssueType::BestPracticeViolation,
            severity: Severity::Low,
            tags: &[],
            message: "var yerine let/const kullanılmalıdır",
            suggestion: "Blok kapsamlı let veya const bildirimlerini tercih edin.",
        },
        DetectorDef {
            id: "js-loose-equality",
            pattern: r"[^=!<>]==[^=]",
            category: Category::Smell,
            issue_type: IssueType::BestPracticeViolation,
            severity: Severity::Low,
            tags: &[],
            message: "Gevşek eşitlik (==) beklenmedik tip dönüşümlerine yol açar",
            suggestion: "Katı eşitlik (===) kullanın.",
        },
        DetectorDef {
            id: "js-console-log",
            pattern: r"console\.log\s*\(",
            category: Category::Smell,
            issue_type: IssueType::CodeSmell,
            severity: Severity::Low,
            tags: &[],
            message: "Üretim kodunda console.log bırakılmış",
            suggestion: "Yapılandırılabilir bir loglama katmanı kullanın.",
        },
    ];
}

/// SQL dedektörleri
lazy_static! {
    static ref SQL_DETECTORS: Vec<DetectorDef> = vec![
        DetectorDef {
            id: "sql-select-star",
            pattern: r"(?i)select\s+\*\s+from",
            category: Category::Performance,
            issue_type: IssueType::PerformanceIssue,
            severity: Severity::Low,
            tags: &[],
            message: "SELECT * gereksiz sütun taşır",
            suggestion: "Yalnızca ihtiyaç duyulan sütunları seçin.",
        },
        DetectorDef {
            id: "sql-grant-all",
            pattern: r"(?i)grant\s+all\s+privileges",
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::High,
            tags: &["least-privilege"],
            message: "GRANT ALL en az ayrıcalık prensibini ihlal eder",
            suggestion: "Yalnızca gerekli yetkileri verin.",
        },
    ];
}

/// Bash dedektörleri
lazy_static! {
    static ref BASH_DETECTORS: Vec<DetectorDef> = vec![
        DetectorDef {
            id: "bash-eval-variable",
            pattern: r#"eval\s+[\$"].*\$\{?[a-zA-Z0-9_]+\}?"#,
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::Critical,
            tags: &["injection", "cwe-78"],
            message: "Kullanıcı girdisi eval komutu içinde kullanılıyor",
            suggestion: "Kullanıcı girdisini asla doğrudan eval içinde kullanmayın.",
        },
        DetectorDef {
            id: "bash-rm-root",
            pattern: r"rm\s+-[rf]{1,2}\s+(?:/|\$HOME|\$\{HOME\}|~)(?:\s|$)",
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::Critical,
            tags: &["destructive-op"],
            message: "Tehlikeli rm komutu kök veya ev dizinini hedef alıyor",
            suggestion: "rm -rf komutunu kök dizin veya ev dizininde kullanmaktan kaçının.",
        },
        DetectorDef {
            id: "bash-chmod-777",
            pattern: r"chmod\s+(?:-R\s+)?777\b",
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::High,
            tags: &["file-permissions", "cwe-732"],
            message: "chmod 777 tüm kullanıcılara tam erişim veriyor",
            suggestion: "Daha kısıtlayıcı izinler kullanın ve en az ayrıcalık prensibini uygulayın.",
        },
        DetectorDef {
            id: "bash-curl-pipe-shell",
            pattern: r"(?:curl|wget)\s+[^|]*\|\s*(?:bash|sh)\b",
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::High,
            tags: &["supply-chain"],
            message: "İndirilen içerik doğrulanmadan shell'e aktarılıyor",
            suggestion: "İndirilen scriptleri çalıştırmadan önce içeriğini ve sağlama toplamını doğrulayın.",
        },
    ];
}

/// C/C++ dedektörleri
lazy_static! {
    static ref C_DETECTORS: Vec<DetectorDef> = vec![
        DetectorDef {
            id: "c-gets",
            pattern: r"\bgets\s*\(",
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::Critical,
            tags: &["buffer-overflow", "cwe-242"],
            message: "gets() tampon taşmasına karşı korumasızdır",
            suggestion: "fgets() gibi sınır denetimli alternatifler kullanın.",
        },
        DetectorDef {
            id: "c-unsafe-string",
            pattern: r"\b(?:strcpy|strcat|sprintf)\s*\(",
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::High,
            tags: &["buffer-overflow", "cwe-120"],
            message: "Sınır denetimsiz string fonksiyonu kullanılıyor: {}",
            suggestion: "strncpy, strncat veya snprintf gibi sınırlı sürümleri kullanın.",
        },
        DetectorDef {
            id: "c-system",
            pattern: r"\bsystem\s*\(",
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::High,
            tags: &["injection", "cwe-78"],
            message: "system() çağrısı komut enjeksiyonu riski taşır",
            suggestion: "exec ailesi fonksiyonları sabit argüman listeleriyle kullanın.",
        },
    ];
}

/// Java dedektörleri
lazy_static! {
    static ref JAVA_DETECTORS: Vec<DetectorDef> = vec![
        DetectorDef {
            id: "java-runtime-exec",
            pattern: r"Runtime\.getRuntime\(\)\.exec",
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::High,
            tags: &["injection", "cwe-78"],
            message: "Runtime.exec() komut enjeksiyonu riski taşır",
            suggestion: "ProcessBuilder'ı sabit argüman listesiyle kullanın ve girdiyi doğrulayın.",
        },
        DetectorDef {
            id: "java-weak-hash",
            pattern: r#"MessageDigest\.getInstance\s*\(\s*"(?:MD5|SHA-?1)""#,
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::Medium,
            tags: &["weak-crypto", "cwe-328"],
            message: "Zayıf özet algoritması kullanılıyor: {}",
            suggestion: "SHA-256 veya daha güçlü bir algoritma kullanın.",
        },
        DetectorDef {
            id: "java-print-stacktrace",
            pattern: r"\.printStackTrace\s*\(\s*\)",
            category: Category::Smell,
            issue_type: IssueType::BestPracticeViolation,
            severity: Severity::Low,
            tags: &["error-handling"],
            message: "printStackTrace yerine loglama kullanılmalıdır",
            suggestion: "İstisnaları yapılandırılmış bir loglama çerçevesiyle kaydedin.",
        },
    ];
}

/// PHP dedektörleri
lazy_static! {
    static ref PHP_DETECTORS: Vec<DetectorDef> = vec![
        DetectorDef {
            id: "php-eval",
            pattern: r"\beval\s*\(",
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::High,
            tags: &["injection", "cwe-95"],
            message: "eval() kullanımı kod enjeksiyonuna açıktır",
            suggestion: "eval() kullanımından kaçının; veriyi kod olarak çalıştırmayın.",
        },
        DetectorDef {
            id: "php-sql-interpolation",
            pattern: r#"(?i)(?:mysqli?_query|->query)\s*\(.*\$(?:_GET|_POST|_REQUEST)"#,
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::Critical,
            tags: &["injection", "cwe-89"],
            message: "Kullanıcı girdisi doğrudan SQL sorgusunda kullanılıyor",
            suggestion: "Hazırlanmış ifadeler (prepared statements) kullanın.",
        },
        DetectorDef {
            id: "php-echo-request",
            pattern: r"echo\s+\$(?:_GET|_POST|_REQUEST)",
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::High,
            tags: &["xss", "cwe-79"],
            message: "Kullanıcı girdisi temizlenmeden çıktıya yazılıyor",
            suggestion: "htmlspecialchars() ile çıktıyı temizleyin.",
        },
    ];
}

/// Go dedektörleri
lazy_static! {
    static ref GO_DETECTORS: Vec<DetectorDef> = vec![
        DetectorDef {
            id: "go-insecure-tls",
            pattern: r"InsecureSkipVerify\s*:\s*true",
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::High,
            tags: &["insecure-transport", "cwe-295"],
            message: "TLS sertifika doğrulaması devre dışı bırakılıyor",
            suggestion: "Sertifika doğrulamasını devre dışı bırakmayın.",
        },
        DetectorDef {
            id: "go-unhandled-error",
            pattern: r"^\s*_\s*=\s*\w+\.\w+\(",
            category: Category::Smell,
            issue_type: IssueType::BestPracticeViolation,
            severity: Severity::Low,
            tags: &["error-handling"],
            message: "Hata değeri açıkça yok sayılıyor",
            suggestion: "Hataları işleyin veya yok sayma gerekçesini belgeleyin.",
        },
    ];
}

/// Ruby dedektörleri
lazy_static! {
    static ref RUBY_DETECTORS: Vec<DetectorDef> = vec![
        DetectorDef {
            id: "ruby-eval",
            pattern: r"\beval\s*\(",
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::High,
            tags: &["injection", "cwe-95"],
            message: "eval kullanımı kod enjeksiyonuna açıktır",
            suggestion: "eval yerine güvenli alternatifler kullanın.",
        },
        DetectorDef {
            id: "ruby-marshal-load",
            pattern: r"\bMarshal\.load\s*\(",
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::High,
            tags: &["deserialization", "cwe-502"],
            message: "Güvenilmeyen veride Marshal.load tehlikelidir",
            suggestion: "Güvenilmeyen girdi için JSON gibi güvenli bir format kullanın.",
        },
    ];
}

/// Dockerfile dedektörleri
lazy_static! {
    static ref DOCKERFILE_DETECTORS: Vec<DetectorDef> = vec![
        DetectorDef {
            id: "dockerfile-latest-tag",
            pattern: r"(?i)^FROM\s+\S+:latest\b",
            category: Category::Maintainability,
            issue_type: IssueType::BestPracticeViolation,
            severity: Severity::Medium,
            tags: &["reproducibility"],
            message: "latest etiketi tekrarlanabilir imaj üretimini bozar",
            suggestion: "Sürüm sabitlenmiş bir temel imaj etiketi kullanın.",
        },
        DetectorDef {
            id: "dockerfile-root-user",
            pattern: r"(?i)^USER\s+root\b",
            category: Category::Security,
            issue_type: IssueType::SecurityVulnerability,
            severity: Severity::Medium,
            tags: &["least-privilege"],
            message: "Konteyner root kullanıcısıyla çalışıyor",
            suggestion: "Ayrıcalıksız bir kullanıcı tanımlayın.",
        },
    ];
}

/// Bir dil için statik dedektör tanımlarını döndürür
///
/// Sıra: önce genel tablo, ardından dile özgü tablo. Bu sıra dedektör
/// tespit sırası olarak analiz çıktısına yansır.
fn detector_defs(language: Language) -> Vec<&'static DetectorDef> {
    let mut defs: Vec<&'static DetectorDef> = GENERIC_DETECTORS.iter().collect();

    let specific: &[DetectorDef] = match language {
        Language::Python => &PYTHON_DETECTORS,
        Language::JavaScript | Language::TypeScript => &JAVASCRIPT_DETECTORS,
        Language::Sql => &SQL_DETECTORS,
        Language::Bash => &BASH_DETECTORS,
        Language::C | Language::Cpp => &C_DETECTORS,
        Language::Java => &JAVA_DETECTORS,
        Language::Php => &PHP_DETECTORS,
        Language::Go => &GO_DETECTORS,
        Language::Ruby => &RUBY_DETECTORS,
        Language::Dockerfile => &DOCKERFILE_DETECTORS,
        _ => &[],
    };

    defs.extend(specific.iter());
    defs
}

/// Derlenmiş, değişmez kalıp kütüphanesi
///
/// Süreç genelinde paylaşılan gizli bir önbellek yerine, açıkça oluşturulup
/// Scanner/Analyzer'a enjekte edilen bir değerdir. Derleme maliyeti dil başına
/// bir kez, kütüphane oluşturulurken ödenir.
pub struct PatternLibrary {
    detectors: HashMap<Language, Vec<Arc<Detector>>>,
}

impl PatternLibrary {
    /// Tüm dillerin dedektörlerini derleyerek kütüphaneyi oluşturur
    ///
    /// Derlenemeyen bir kalıp loglanır ve atlanır; tek bir bozuk kalıp
    /// kütüphanenin tamamını geçersiz kılmaz.
    pub fn new() -> Self {
        // Aynı tanım birden çok dilde paylaşılır; bir kez derlenir
        let mut compiled: HashMap<&'static str, Arc<Detector>> = HashMap::new();
        let mut detectors = HashMap::new();

        for &language in Language::ALL {
            let mut for_language = Vec::new();

            for def in detector_defs(language) {
                if let Some(detector) = compiled.get(def.id) {
                    for_language.push(Arc::clone(detector));
                    continue;
                }

                match Regex::new(def.pattern) {
                    Ok(regex) => {
                        let detector = Arc::new(Detector {
                            id: def.id,
                            regex,
                            category: def.category,
                            issue_type: def.issue_type,
                            severity: def.severity,
                            tags: def.tags,
                            message: def.message,
                            suggestion: def.suggestion,
                        });
                        compiled.insert(def.id, Arc::clone(&detector));
                        for_language.push(detector);
                    }
                    Err(err) => {
                        warn!("Dedektör kalıbı derlenemedi, atlanıyor: {} - {}", def.id, err);
                    }
                }
            }

            detectors.insert(language, for_language);
        }

        Self { detectors }
    }

    /// Bir dil için derlenmiş dedektör listesini döndürür
    pub fn detectors_for(&self, language: Language) -> &[Arc<Detector>] {
        self.detectors
            .get(&language)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Bir dil için, etkin kategorilerle filtrelenmiş dedektörleri döndürür
    pub fn detectors_for_categories<'a>(
        &'a self,
        language: Language,
        enabled: &BTreeSet<Category>,
    ) -> Vec<&'a Arc<Detector>> {
        self.detectors_for(language)
            .iter()
            .filter(|d| enabled.contains(&d.category))
            .collect()
    }
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kutuphane_derlenir() {
        let library = PatternLibrary::new();
        for &language in Language::ALL {
            // Genel dedektörler her dilde bulunur
            assert!(
                library.detectors_for(language).len() >= GENERIC_DETECTORS.len(),
                "{} için dedektör eksik",
                language
            );
        }
    }

    #[test]
    fn dile_ozgu_dedektorler_eklenir() {
        let library = PatternLibrary::new();
        let python = library.detectors_for(Language::Python);
        assert!(python.iter().any(|d| d.id == "python-eval"));

        let yaml = library.detectors_for(Language::Yaml);
        assert!(yaml.iter().all(|d| !d.id.starts_with("python-")));
    }

    #[test]
    fn kategori_filtreleme() {
        let library = PatternLibrary::new();
        let mut sadece_guvenlik = BTreeSet::new();
        sadece_guvenlik.insert(Category::Security);

        let detectors = library.detectors_for_categories(Language::Python, &sadece_guvenlik);
        assert!(!detectors.is_empty());
        assert!(detectors.iter().all(|d| d.category == Category::Security));
    }

    #[test]
    fn mesaj_sablonu_doldurulur() {
        let library = PatternLibrary::new();
        let detector = library
            .detectors_for(Language::Python)
            .iter()
            .find(|d| d.id == "generic-hardcoded-password")
            .unwrap()
            .clone();

        let mesaj = detector.render_message("password = \"hunter2\"");
        assert!(mesaj.contains("hunter2"));
        assert!(!mesaj.contains("{}"));
    }

    #[test]
    fn parola_kalibi_eslesir() {
        let library = PatternLibrary::new();
        let detector = library
            .detectors_for(Language::Python)
            .iter()
            .find(|d| d.id == "generic-hardcoded-password")
            .unwrap()
            .clone();

        assert!(detector.regex.is_match("password = \"hunter2\""));
        assert!(detector.regex.is_match("PASSWD: 'gizli123'"));
        assert!(!detector.regex.is_match("password_field_label"));
    }
}
