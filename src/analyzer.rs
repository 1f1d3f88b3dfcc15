use crate::language::Language;
use crate::models::{Issue, IssueType, Severity};
use crate::parser::StructuralParser;
use crate::rules::{Category, PatternLibrary};
use crate::utils;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Snippet penceresi: eşleşen satırın öncesi ve sonrası
const SNIPPET_CONTEXT_LINES: usize = 2;

/// Analizör eşikleri
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Bir fonksiyon için izin verilen en fazla satır sayısı
    pub max_function_lines: usize,

    /// İzin verilen en yüksek yaklaşık döngüsel karmaşıklık
    pub max_complexity: usize,

    /// Bu değerin üzerindeki sayı sabitleri sihirli sayı kabul edilir
    pub magic_number_threshold: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_function_lines: 60,
            max_complexity: 10,
            magic_number_threshold: 100,
        }
    }
}

lazy_static! {
    static ref NUMERIC_LITERAL: Regex = Regex::new(r"\b(\d+)\b").unwrap();
    // Büyük/küçük harf duyarsızlık yalnızca anahtar kelimelere uygulanır;
    // BÜYÜK_HARF sabit adı kalıbı harf duyarlı kalmalıdır
    static ref CONST_DECL_LINE: Regex =
        Regex::new(r"^\s*(?:(?i:const|static|final|#define)\b|[A-Z][A-Z0-9_]{2,}\s*[:=])").unwrap();
}

/// Sihirli sayı taramasının anlamsız olduğu veri/işaretleme dilleri
fn magic_numbers_apply(language: Language) -> bool {
    !matches!(
        language,
        Language::Json
            | Language::Yaml
            | Language::Toml
            | Language::Markdown
            | Language::Html
            | Language::Css
    )
}

/// Dosya başına analizör
///
/// Kalıp kütüphanesi dışarıdan enjekte edilir; analizör çağrılar arasında
/// durum tutmaz ve aynı girdi için bayt bayt aynı çıktıyı üretir.
pub struct FileAnalyzer {
    library: Arc<PatternLibrary>,
    config: AnalyzerConfig,
}

impl FileAnalyzer {
    /// Yeni bir FileAnalyzer örneği oluşturur
    pub fn new(library: Arc<PatternLibrary>, config: AnalyzerConfig) -> Self {
        Self { library, config }
    }

    /// Tek bir dosyanın içeriğini analiz eder
    ///
    /// Çıktı dosya yerel sıradadır: önce satır numarası, sonra tespit sırası.
    /// `deadline` aşılırsa kalan aşamalar atlanır ve zaman aşımı bir
    /// LinterError bulgusu olarak kaydedilir.
    pub fn analyze(
        &self,
        file_path: &Path,
        content: &str,
        language: Language,
        enabled_categories: &BTreeSet<Category>,
        deadline: Option<Instant>,
    ) -> Vec<Issue> {
        let mut issues = Vec::new();

        debug!("Dosya analiz ediliyor: {:?} ({})", file_path, language);

        // 1. Yapısal özet (parser'ı olan diller)
        if enabled_categories.contains(&Category::Maintainability) {
            self.analyze_structure(file_path, content, language, &mut issues);
        }

        if self.deadline_expired(deadline, file_path, language, &mut issues) {
            issues.sort_by_key(|i| i.line);
            return issues;
        }

        // 2. Kalıp kütüphanesi taraması
        self.sweep_detectors(file_path, content, language, enabled_categories, &mut issues);

        if self.deadline_expired(deadline, file_path, language, &mut issues) {
            issues.sort_by_key(|i| i.line);
            return issues;
        }

        // 3. Sihirli sayı sezgiseli
        if enabled_categories.contains(&Category::Smell) && magic_numbers_apply(language) {
            self.analyze_magic_numbers(file_path, content, language, &mut issues);
        }

        // Kararlı sıralama tespit sırasını korur
        issues.sort_by_key(|i| i.line);
        issues
    }

    /// Yapısal özet üzerinden bakım ve dokümantasyon bulguları üretir
    ///
    /// Parser hatası ölümcül değildir; satır 1'e bağlı bir LinterError
    /// bulgusuna dönüştürülür ve kalıp taramasına devam edilir.
    fn analyze_structure(
        &self,
        file_path: &Path,
        content: &str,
        language: Language,
        issues: &mut Vec<Issue>,
    ) {
        let parser = match StructuralParser::new(language) {
            Some(parser) => parser,
            None => return,
        };

        let summary = match parser.summarize(content) {
            Ok(summary) => summary,
            Err(err) => {
                debug!("Yapısal analiz başarısız: {:?} - {}", file_path, err);
                issues.push(Issue::new(
                    IssueType::LinterError,
                    Severity::Medium,
                    file_path.to_path_buf(),
                    1,
                    language,
                    format!("Yapısal analiz başarısız oldu: {}", err),
                    String::new(),
                ));
                return;
            }
        };

        for function in &summary.functions {
            if function.line_count() > self.config.max_function_lines {
                issues.push(
                    Issue::new(
                        IssueType::MaintainabilityIssue,
                        Severity::Medium,
                        file_path.to_path_buf(),
                        function.start_line,
                        language,
                        format!(
                            "Fonksiyon '{}' {} satır ile {} satır sınırını aşıyor",
                            function.name,
                            function.line_count(),
                            self.config.max_function_lines
                        ),
                        utils::get_code_snippet(content, function.start_line, SNIPPET_CONTEXT_LINES),
                    )
                    .with_suggestion("Fonksiyonu daha küçük, tek sorumluluklu parçalara bölün.")
                    .with_context("function_name", function.name.clone()),
                );
            }

            if function.complexity > self.config.max_complexity {
                issues.push(
                    Issue::new(
                        IssueType::MaintainabilityIssue,
                        Severity::High,
                        file_path.to_path_buf(),
                        function.start_line,
                        language,
                        format!(
                            "Fonksiyon '{}' yaklaşık karmaşıklığı {} ile {} eşiğini aşıyor",
                            function.name, function.complexity, self.config.max_complexity
                        ),
                        utils::get_code_snippet(content, function.start_line, SNIPPET_CONTEXT_LINES),
                    )
                    .with_suggestion("Dallanmaları ayrı fonksiyonlara çıkararak karmaşıklığı azaltın.")
                    .with_context("function_name", function.name.clone()),
                );
            }

            if function.is_public && !function.has_doc_comment {
                issues.push(
                    Issue::new(
                        IssueType::DocumentationIssue,
                        Severity::Low,
                        file_path.to_path_buf(),
                        function.start_line,
                        language,
                        format!(
                            "Dışa açık fonksiyon '{}' için doküman yorumu eksik",
                            function.name
                        ),
                        utils::get_code_snippet(content, function.start_line, SNIPPET_CONTEXT_LINES),
                    )
                    .with_suggestion("Dışa açık bildirimlere amaçlarını anlatan bir doküman yorumu ekleyin.")
                    .with_context("function_name", function.name.clone()),
                );
            }
        }

        for declared in &summary.declared_names {
            if count_word_occurrences(content, &declared.name) <= 1 {
                issues.push(
                    Issue::new(
                        IssueType::MaintainabilityIssue,
                        Severity::Low,
                        file_path.to_path_buf(),
                        declared.line,
                        language,
                        format!("Bildirilen ad '{}' hiçbir yerde kullanılmıyor", declared.name),
                        utils::get_code_snippet(content, declared.line, SNIPPET_CONTEXT_LINES),
                    )
                    .with_suggestion("Kullanılmayan bildirimi kaldırın."),
                );
            }
        }
    }

    /// Kalıp kütüphanesindeki tüm etkin dedektörleri içerik üzerinde tarar
    fn sweep_detectors(
        &self,
        file_path: &Path,
        content: &str,
        language: Language,
        enabled_categories: &BTreeSet<Category>,
        issues: &mut Vec<Issue>,
    ) {
        let detectors = self
            .library
            .detectors_for_categories(language, enabled_categories);

        for (idx, line) in content.lines().enumerate() {
            let line_number = idx + 1;

            for detector in &detectors {
                if let Some(matched) = detector.regex.find(line) {
                    issues.push(
                        Issue::new(
                            detector.issue_type,
                            detector.severity,
                            file_path.to_path_buf(),
                            line_number,
                            language,
                            detector.render_message(matched.as_str()),
                            utils::get_code_snippet(content, line_number, SNIPPET_CONTEXT_LINES),
                        )
                        .with_column(matched.start() + 1)
                        .with_suggestion(detector.suggestion)
                        .with_tags(detector.tags.iter().copied())
                        .with_context("detector_id", detector.id),
                    );
                }
            }
        }
    }

    /// Sihirli sayı sezgiseli
    ///
    /// Eşiği aşan veya birden çok kez geçen sayı sabitleri, bariz sabit
    /// bildirimi bağlamı dışında CodeSmell olarak işaretlenir.
    fn analyze_magic_numbers(
        &self,
        file_path: &Path,
        content: &str,
        language: Language,
        issues: &mut Vec<Issue>,
    ) {
        // (değer -> ilk satır, sayım); yalnızca sabit bildirimi olmayan satırlar
        let mut occurrences: HashMap<u64, (usize, usize)> = HashMap::new();

        for (idx, line) in content.lines().enumerate() {
            if CONST_DECL_LINE.is_match(line) {
                continue;
            }

            let comment_prefix = language.line_comment_prefix();
            if line.trim_start().starts_with(comment_prefix) {
                continue;
            }

            for caps in NUMERIC_LITERAL.captures_iter(line) {
                let value: u64 = match caps[1].parse() {
                    Ok(v) => v,
                    Err(_) => continue,
                };

                // 0, 1, 2 gibi yaygın değerler sayılmaz
                if value <= 2 {
                    continue;
                }

                let entry = occurrences.entry(value).or_insert((idx + 1, 0));
                entry.1 += 1;

                if value > self.config.magic_number_threshold {
                    issues.push(
                        Issue::new(
                            IssueType::CodeSmell,
                            Severity::Low,
                            file_path.to_path_buf(),
                            idx + 1,
                            language,
                            format!("Sihirli sayı tespit edildi: {}", value),
                            utils::get_code_snippet(content, idx + 1, SNIPPET_CONTEXT_LINES),
                        )
                        .with_suggestion("Sayıyı adlandırılmış bir sabite çıkarın."),
                    );
                }
            }
        }

        // Eşiğin altında kalıp birden çok kez geçen değerler ilk satırda raporlanır
        let mut repeated: Vec<(u64, usize)> = occurrences
            .into_iter()
            .filter(|(value, (_, count))| *count > 1 && *value <= self.config.magic_number_threshold)
            .map(|(value, (first_line, _))| (value, first_line))
            .collect();
        repeated.sort();

        for (value, first_line) in repeated {
            issues.push(
                Issue::new(
                    IssueType::CodeSmell,
                    Severity::Low,
                    file_path.to_path_buf(),
                    first_line,
                    language,
                    format!("Sihirli sayı {} birden çok kez kullanılıyor", value),
                    utils::get_code_snippet(content, first_line, SNIPPET_CONTEXT_LINES),
                )
                .with_suggestion("Tekrarlanan sayıyı adlandırılmış bir sabite çıkarın."),
            );
        }
    }

    /// Zaman aşımını denetler; aşıldıysa LinterError bulgusu ekler
    fn deadline_expired(
        &self,
        deadline: Option<Instant>,
        file_path: &Path,
        language: Language,
        issues: &mut Vec<Issue>,
    ) -> bool {
        match deadline {
            Some(deadline) if Instant::now() >= deadline => {
                issues.push(Issue::new(
                    IssueType::LinterError,
                    Severity::Medium,
                    file_path.to_path_buf(),
                    1,
                    language,
                    "Dosya analizi zaman aşımına uğradı, kalan aşamalar atlandı".to_string(),
                    String::new(),
                ));
                true
            }
            _ => false,
        }
    }
}

/// Bir adın içerikte kaç kez tam sözcük olarak geçtiğini sayar
fn count_word_occurrences(content: &str, name: &str) -> usize {
    content
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|token| *token == name)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn analyzer() -> FileAnalyzer {
        FileAnalyzer::new(Arc::new(PatternLibrary::new()), AnalyzerConfig::default())
    }

    fn analyze(content: &str, language: Language) -> Vec<Issue> {
        analyzer().analyze(
            &PathBuf::from("test_dosyasi"),
            content,
            language,
            &Category::default_set(),
            None,
        )
    }

    #[test]
    fn sabit_kodlu_parola_bulunur() {
        let issues = analyze("password = \"hunter2\"\n", Language::Python);
        let secret: Vec<_> = issues
            .iter()
            .filter(|i| i.issue_type == IssueType::SecurityVulnerability)
            .collect();

        assert_eq!(secret.len(), 1);
        assert_eq!(secret[0].severity, Severity::Critical);
        assert_eq!(secret[0].line, 1);
        assert!(secret[0].compliance_tags.contains("sensitive-data"));
    }

    #[test]
    fn uzun_fonksiyon_bakim_sorunu() {
        let mut content = String::from("def cok_uzun():\n    \"\"\"doc\"\"\"\n");
        for i in 0..80 {
            content.push_str(&format!("    x{} = {}\n", i, i % 2));
        }

        let issues = analyze(&content, Language::Python);
        assert!(issues.iter().any(|i| {
            i.issue_type == IssueType::MaintainabilityIssue
                && i.description.contains("satır sınırını aşıyor")
        }));
    }

    #[test]
    fn dokuman_eksikligi_bulunur() {
        let content = "pub fn belgesiz() {\n    let _x = 1;\n}\n";
        let issues = analyze(content, Language::Rust);
        assert!(issues
            .iter()
            .any(|i| i.issue_type == IssueType::DocumentationIssue));
    }

    #[test]
    fn kullanilmayan_ad_bulunur() {
        let content = "kullanilmayan = 42\n";
        let issues = analyze(content, Language::Python);
        assert!(issues
            .iter()
            .any(|i| i.description.contains("kullanilmayan") && i.description.contains("kullanılmıyor")));
    }

    #[test]
    fn sihirli_sayi_esik_ustu() {
        let issues = analyze("timeout = 86400\n", Language::Python);
        assert!(issues.iter().any(|i| {
            i.issue_type == IssueType::CodeSmell && i.description.contains("86400")
        }));
    }

    #[test]
    fn sabit_bildirimi_sihirli_sayi_degil() {
        let issues = analyze("MAX_TIMEOUT = 86400\n", Language::Python);
        assert!(!issues
            .iter()
            .any(|i| i.issue_type == IssueType::CodeSmell && i.description.contains("86400")));
    }

    #[test]
    fn kucuk_harf_atama_sabit_bildirimi_sayilmaz() {
        // Anahtar kelimesiz, küçük harfli bir atama sabit bildirimi değildir;
        // const anahtar kelimesi ise büyük/küçük harften bağımsız tanınır
        assert!(!CONST_DECL_LINE.is_match("timeout = 86400"));
        assert!(!CONST_DECL_LINE.is_match("retry_delay = 9999"));
        assert!(CONST_DECL_LINE.is_match("const timeout = 86400;"));
        assert!(CONST_DECL_LINE.is_match("CONST timeout = 86400;"));
        assert!(CONST_DECL_LINE.is_match("MAX_TIMEOUT = 86400"));
        assert!(!CONST_DECL_LINE.is_match("max_timeout = 86400"));

        let issues = analyze("retry_delay = 9999\n", Language::Python);
        assert!(issues.iter().any(|i| {
            i.issue_type == IssueType::CodeSmell && i.description.contains("9999")
        }));
    }

    #[test]
    fn tekrarlanan_sayi_bir_kez_raporlanir() {
        let content = "a = kare(37)\nb = kare(37)\nc = kare(37)\n";
        let issues = analyze(content, Language::Python);
        let tekrar: Vec<_> = issues
            .iter()
            .filter(|i| i.description.contains("birden çok kez"))
            .collect();
        assert_eq!(tekrar.len(), 1);
        assert_eq!(tekrar[0].line, 1);
    }

    #[test]
    fn cikti_deterministik() {
        let content = "password = \"hunter2\"\neval(girdi)\nx = 9999\n";
        let once = analyze(content, Language::Python);
        let sonra = analyze(content, Language::Python);

        assert_eq!(once.len(), sonra.len());
        for (a, b) in once.iter().zip(sonra.iter()) {
            assert_eq!(a.fingerprint(), b.fingerprint());
            assert_eq!(a.line, b.line);
            assert_eq!(a.description, b.description);
        }
    }

    #[test]
    fn cikti_satir_sirali() {
        let content = "eval(girdi)\n\npassword = \"hunter2\"\n";
        let issues = analyze(content, Language::Python);
        for pair in issues.windows(2) {
            assert!(pair[0].line <= pair[1].line);
        }
    }

    #[test]
    fn kategori_kapatma_taramayi_daraltir() {
        let mut sadece_bakim = BTreeSet::new();
        sadece_bakim.insert(Category::Maintainability);

        let issues = analyzer().analyze(
            &PathBuf::from("t.py"),
            "password = \"hunter2\"\n",
            Language::Python,
            &sadece_bakim,
            None,
        );

        assert!(!issues
            .iter()
            .any(|i| i.issue_type == IssueType::SecurityVulnerability));
    }

    #[test]
    fn zaman_asimi_linter_hatasi_uretir() {
        let issues = analyzer().analyze(
            &PathBuf::from("t.py"),
            "password = \"hunter2\"\n",
            Language::Python,
            &Category::default_set(),
            Some(Instant::now() - std::time::Duration::from_secs(1)),
        );

        assert!(issues
            .iter()
            .any(|i| i.issue_type == IssueType::LinterError && i.description.contains("zaman aşımı")));
    }
}
