use crate::language::Language;
use crate::models::{Issue, IssueType, Severity};
use crate::utils;
use anyhow::{bail, Context, Result};
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::process::{Command, Stdio};

/// Harici bir linter aracının çağrı tanımı
#[derive(Debug, Clone)]
pub struct LinterCommand {
    /// Çalıştırılacak program
    pub program: String,

    /// Dosya yolundan önce geçirilecek argümanlar
    pub args: Vec<String>,
}

/// Harici linter'dan normalize edilmemiş ham bulgu
#[derive(Debug, Clone)]
pub struct RawLintFinding {
    pub line: usize,
    pub column: Option<usize>,
    pub severity: Severity,
    pub message: String,
}

lazy_static! {
    /// `dosya:satır:sütun: mesaj` veya `satır: mesaj` biçimlerini yakalar
    static ref LINT_OUTPUT_LINE: Regex =
        Regex::new(r"^(?:.*?:)?(\d+)(?::(\d+))?:\s*(.+)$").unwrap();
}

/// Dil başına harici linter kayıtları
///
/// Çekirdek hiçbir aracı zorunlu kılmaz; kayıtlı araç yoksa adaptör hiç
/// devreye girmez.
#[derive(Debug, Clone, Default)]
pub struct LinterRegistry {
    commands: HashMap<Language, LinterCommand>,
}

impl LinterRegistry {
    /// Boş bir kayıt defteri oluşturur
    pub fn new() -> Self {
        Self::default()
    }

    /// Bir dil için linter komutu kaydeder
    pub fn register(&mut self, language: Language, command: LinterCommand) {
        self.commands.insert(language, command);
    }

    /// Dil için kayıtlı komutu döndürür
    pub fn command_for(&self, language: Language) -> Option<&LinterCommand> {
        self.commands.get(&language)
    }

    /// Hiç kayıt olup olmadığını döndürür
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Harici linter'ı çalıştırır ve çıktısını Issue listesine normalize eder
    ///
    /// Araç çökerse veya başlatılamazsa hata döner; çağıran bunu dosyaya
    /// bağlı bir LinterError bulgusuna çevirir, tarama devam eder.
    pub fn lint_file(
        &self,
        file_path: &Path,
        language: Language,
        content: &str,
    ) -> Result<Vec<Issue>> {
        let command = match self.command_for(language) {
            Some(command) => command,
            None => return Ok(Vec::new()),
        };

        debug!("Harici linter çalıştırılıyor: {} {:?}", command.program, file_path);

        let output = Command::new(&command.program)
            .args(&command.args)
            .arg(file_path)
            .stdin(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("Harici linter başlatılamadı: {}", command.program))?;

        // Çoğu linter bulgu varken sıfır olmayan kodla çıkar; yalnızca
        // sinyalle sonlanma gerçek bir çökmedir
        if output.status.code().is_none() {
            bail!("Harici linter sinyalle sonlandı: {}", command.program);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let raw_findings = parse_linter_output(&stdout);

        Ok(raw_findings
            .into_iter()
            .map(|raw| normalize_finding(raw, file_path, language, content))
            .collect())
    }
}

/// Linter stdout'unu ham bulgulara ayrıştırır
fn parse_linter_output(stdout: &str) -> Vec<RawLintFinding> {
    let mut findings = Vec::new();

    for line in stdout.lines() {
        let caps = match LINT_OUTPUT_LINE.captures(line) {
            Some(caps) => caps,
            None => {
                if !line.trim().is_empty() {
                    debug!("Linter çıktı satırı ayrıştırılamadı: {}", line);
                }
                continue;
            }
        };

        let line_number: usize = match caps[1].parse() {
            Ok(n) if n > 0 => n,
            _ => continue,
        };
        let column = caps.get(2).and_then(|m| m.as_str().parse().ok());
        let message = caps[3].trim().to_string();

        findings.push(RawLintFinding {
            line: line_number,
            column,
            severity: infer_severity(&message),
            message,
        });
    }

    findings
}

/// Mesajdaki anahtar kelimelerden önem seviyesi çıkarır
fn infer_severity(message: &str) -> Severity {
    let lower = message.to_lowercase();
    if lower.contains("error") || lower.contains("fatal") || lower.contains("critical") {
        Severity::High
    } else if lower.contains("warn") {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Mesajdaki anahtar kelimelerden sorun tipi çıkarır
fn infer_issue_type(message: &str) -> IssueType {
    let lower = message.to_lowercase();
    if lower.contains("security")
        || lower.contains("injection")
        || lower.contains("secret")
        || lower.contains("vulnerab")
    {
        IssueType::SecurityVulnerability
    } else if lower.contains("performance") || lower.contains("slow") || lower.contains("inefficient")
    {
        IssueType::PerformanceIssue
    } else if lower.contains("doc") {
        IssueType::DocumentationIssue
    } else if lower.contains("deprecat") || lower.contains("convention") || lower.contains("style") {
        IssueType::BestPracticeViolation
    } else {
        IssueType::CodeQuality
    }
}

/// Ham bulguyu Analyzer'ın ürettiğiyle aynı Issue biçimine dönüştürür
fn normalize_finding(
    raw: RawLintFinding,
    file_path: &Path,
    language: Language,
    content: &str,
) -> Issue {
    let total_lines = utils::count_lines(content).max(1);
    let line = raw.line.min(total_lines);

    if raw.line > total_lines {
        warn!(
            "Linter satır numarası dosya dışında: {} > {} ({:?})",
            raw.line, total_lines, file_path
        );
    }

    let mut issue = Issue::new(
        infer_issue_type(&raw.message),
        raw.severity,
        file_path.to_path_buf(),
        line,
        language,
        raw.message,
        utils::get_code_snippet(content, line, 2),
    )
    .with_context("origin", "external_linter");

    if let Some(column) = raw.column {
        issue = issue.with_column(column);
    }

    issue
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn cikti_ayristirma_bicimleri() {
        let stdout = "\
src/app.py:12:5: warning: unused variable
3: style issue found
bozuk satır
";
        let findings = parse_linter_output(stdout);

        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].line, 12);
        assert_eq!(findings[0].column, Some(5));
        assert_eq!(findings[0].severity, Severity::Medium);
        assert_eq!(findings[1].line, 3);
        assert_eq!(findings[1].column, None);
        assert_eq!(findings[1].severity, Severity::Low);
    }

    #[test]
    fn onem_seviyesi_cikarimi() {
        assert_eq!(infer_severity("fatal error: something"), Severity::High);
        assert_eq!(infer_severity("warning: be careful"), Severity::Medium);
        assert_eq!(infer_severity("note: consider this"), Severity::Low);
    }

    #[test]
    fn sorun_tipi_cikarimi() {
        assert_eq!(
            infer_issue_type("possible sql injection detected"),
            IssueType::SecurityVulnerability
        );
        assert_eq!(
            infer_issue_type("inefficient loop detected"),
            IssueType::PerformanceIssue
        );
        assert_eq!(infer_issue_type("missing docstring"), IssueType::DocumentationIssue);
        assert_eq!(infer_issue_type("line too long"), IssueType::CodeQuality);
    }

    #[test]
    fn normalize_snippet_ve_baglam() {
        let raw = RawLintFinding {
            line: 2,
            column: Some(1),
            severity: Severity::Medium,
            message: "warning: unused variable".to_string(),
        };
        let content = "a = 1\nb = 2\nc = 3\n";
        let issue = normalize_finding(raw, &PathBuf::from("t.py"), Language::Python, content);

        assert_eq!(issue.line, 2);
        assert_eq!(issue.column, Some(1));
        assert!(issue.code_snippet.contains("b = 2"));
        assert_eq!(issue.context.get("origin").map(String::as_str), Some("external_linter"));
    }

    #[test]
    fn kayitsiz_dil_bos_doner() {
        let registry = LinterRegistry::new();
        let issues = registry
            .lint_file(&PathBuf::from("t.py"), Language::Python, "x = 1\n")
            .unwrap();
        assert!(issues.is_empty());
    }
}
