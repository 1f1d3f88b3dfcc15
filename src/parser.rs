use crate::language::Language;
use anyhow::{bail, Result};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

/// Yapısal özetteki bir fonksiyon kaydı
#[derive(Debug, Clone)]
pub struct FunctionInfo {
    /// Fonksiyon adı
    pub name: String,

    /// Başlangıç satırı (1 tabanlı)
    pub start_line: usize,

    /// Bitiş satırı (1 tabanlı, dahil)
    pub end_line: usize,

    /// Dallanma anahtar kelimesi sayımıyla yaklaşık döngüsel karmaşıklık
    pub complexity: usize,

    /// Dışa açık (public) bildirim mi
    pub is_public: bool,

    /// Başında doküman yorumu var mı
    pub has_doc_comment: bool,
}

impl FunctionInfo {
    /// Fonksiyonun satır sayısı
    pub fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }
}

/// Bildirilen bir ad kaydı
#[derive(Debug, Clone)]
pub struct DeclaredName {
    pub name: String,
    pub line: usize,
}

/// Bir dosyanın sığ yapısal özeti
///
/// Tam bir semantik model değildir; fonksiyon sınırları, yaklaşık karmaşıklık
/// ve bildirilen adlardan ibarettir.
#[derive(Debug, Default)]
pub struct StructuralSummary {
    pub functions: Vec<FunctionInfo>,
    pub declared_names: Vec<DeclaredName>,
}

lazy_static! {
    static ref PYTHON_DEF: Regex = Regex::new(r"^(\s*)def\s+(\w+)\s*\(").unwrap();
    static ref PYTHON_ASSIGN: Regex = Regex::new(r"^\s*([a-zA-Z]\w*)\s*=[^=]").unwrap();
    static ref JS_FUNCTION: Regex =
        Regex::new(r"^\s*(export\s+)?(?:async\s+)?function\s+(\w+)\s*\(").unwrap();
    static ref JS_DECL: Regex = Regex::new(r"\b(?:let|const|var)\s+([a-zA-Z]\w*)").unwrap();
    static ref RUST_FN: Regex = Regex::new(r"^\s*(pub(?:\([^)]*\))?\s+)?(?:async\s+)?fn\s+(\w+)").unwrap();
    static ref RUST_LET: Regex = Regex::new(r"\blet\s+(?:mut\s+)?([a-zA-Z]\w*)").unwrap();
    static ref GO_FUNC: Regex = Regex::new(r"^func\s+(?:\([^)]*\)\s*)?(\w+)\s*\(").unwrap();
    static ref GO_DECL: Regex = Regex::new(r"^\s*([a-zA-Z]\w*)\s*:=").unwrap();
    static ref JAVA_METHOD: Regex = Regex::new(
        r"^\s*(public\s+|protected\s+|private\s+)?(?:static\s+)?[\w<>\[\],\s]+\s+(\w+)\s*\([^)]*\)\s*\{?\s*$"
    )
    .unwrap();
    static ref BRANCH_KEYWORD: Regex =
        Regex::new(r"\b(?:if|elif|for|while|case|when|catch|except)\b").unwrap();
    static ref BOOL_OPERATOR: Regex = Regex::new(r"&&|\|\|").unwrap();
}

/// Sığ yapısal parser
///
/// Yalnızca `Language::has_structural_parser` ile işaretli diller için
/// kullanılabilir; diğer diller kalıp tabanlı taramayla sınırlıdır.
pub struct StructuralParser {
    language: Language,
}

impl StructuralParser {
    /// Dil için bir parser oluşturur; parser yoksa None döner
    pub fn new(language: Language) -> Option<Self> {
        if language.has_structural_parser() {
            Some(Self { language })
        } else {
            None
        }
    }

    /// Dosya içeriğinden yapısal özet çıkarır
    ///
    /// İkili içerik parse edilemez; hata, çağıranda satır 1'e bağlı bir
    /// LinterError bulgusuna dönüştürülür.
    pub fn summarize(&self, content: &str) -> Result<StructuralSummary> {
        if content.contains('\0') {
            bail!("içerik ikili veri barındırıyor, yapısal analiz yapılamadı");
        }

        debug!("Yapısal özet çıkarılıyor: {}", self.language);

        let lines: Vec<&str> = content.lines().collect();
        let mut summary = StructuralSummary::default();

        match self.language {
            Language::Python => self.summarize_python(&lines, &mut summary),
            Language::Rust => self.summarize_braced(&lines, &RUST_FN, Some(&RUST_LET), &mut summary),
            Language::Go => self.summarize_braced(&lines, &GO_FUNC, Some(&GO_DECL), &mut summary),
            Language::JavaScript | Language::TypeScript => {
                self.summarize_braced(&lines, &JS_FUNCTION, Some(&JS_DECL), &mut summary)
            }
            Language::Java => self.summarize_braced(&lines, &JAVA_METHOD, None, &mut summary),
            _ => {}
        }

        Ok(summary)
    }

    /// Girintiye dayalı Python özeti
    fn summarize_python(&self, lines: &[&str], summary: &mut StructuralSummary) {
        for (idx, line) in lines.iter().enumerate() {
            if let Some(caps) = PYTHON_DEF.captures(line) {
                let indent = caps.get(1).map(|m| m.as_str().len()).unwrap_or(0);
                let name = caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default();

                // Fonksiyon gövdesi, girintisi tanım satırına eşit veya daha az
                // olan ilk boş olmayan satırda biter
                let mut end = lines.len();
                for (j, candidate) in lines.iter().enumerate().skip(idx + 1) {
                    let trimmed = candidate.trim_start();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let candidate_indent = candidate.len() - trimmed.len();
                    if candidate_indent <= indent {
                        end = j;
                        break;
                    }
                }

                let body = &lines[idx..end];
                let is_public = !name.starts_with('_');

                // Python'da doküman, tanımdan sonraki ilk boş olmayan satırdaki
                // docstring'dir
                let has_doc_comment = lines
                    .iter()
                    .skip(idx + 1)
                    .map(|l| l.trim_start())
                    .find(|l| !l.is_empty())
                    .map(|l| l.starts_with("\"\"\"") || l.starts_with("'''"))
                    .unwrap_or(false);

                summary.functions.push(FunctionInfo {
                    name,
                    start_line: idx + 1,
                    end_line: end,
                    complexity: Self::estimate_complexity(body),
                    is_public,
                    has_doc_comment,
                });
            } else if let Some(caps) = PYTHON_ASSIGN.captures(line) {
                let name = caps[1].to_string();
                if !name.starts_with('_') {
                    summary.declared_names.push(DeclaredName { name, line: idx + 1 });
                }
            }
        }
    }

    /// Süslü parantezli diller için ortak özet
    fn summarize_braced(
        &self,
        lines: &[&str],
        function_re: &Regex,
        decl_re: Option<&Regex>,
        summary: &mut StructuralSummary,
    ) {
        for (idx, line) in lines.iter().enumerate() {
            if let Some(caps) = function_re.captures(line) {
                let visibility = caps.get(1).map(|m| m.as_str().trim().to_string());
                let name = caps
                    .get(2)
                    .or_else(|| caps.get(1))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();
                if name.is_empty() {
                    continue;
                }

                let end = Self::find_block_end(lines, idx);
                let body = &lines[idx..end];

                let is_public = match self.language {
                    Language::Go => name.chars().next().map(|c| c.is_uppercase()).unwrap_or(false),
                    Language::Rust => visibility.map(|v| v.starts_with("pub")).unwrap_or(false),
                    Language::Java => visibility.map(|v| v.starts_with("public")).unwrap_or(false),
                    // JS/TS: export edilen fonksiyonlar dışa açıktır
                    _ => line.trim_start().starts_with("export"),
                };

                let has_doc_comment = idx > 0 && {
                    let prev = lines[idx - 1].trim_start();
                    prev.starts_with("///")
                        || prev.starts_with("//")
                        || prev.starts_with("*")
                        || prev.starts_with("/*")
                };

                summary.functions.push(FunctionInfo {
                    name,
                    start_line: idx + 1,
                    end_line: end,
                    complexity: Self::estimate_complexity(body),
                    is_public,
                    has_doc_comment,
                });
            }

            if let Some(decl_re) = decl_re {
                if let Some(caps) = decl_re.captures(line) {
                    let name = caps[1].to_string();
                    if !name.starts_with('_') {
                        summary.declared_names.push(DeclaredName { name, line: idx + 1 });
                    }
                }
            }
        }
    }

    /// Süslü parantez dengesiyle blok sonunu bulur (1 tabanlı, dahil)
    fn find_block_end(lines: &[&str], start: usize) -> usize {
        let mut depth: i64 = 0;
        let mut opened = false;

        for (j, line) in lines.iter().enumerate().skip(start) {
            for c in line.chars() {
                match c {
                    '{' => {
                        depth += 1;
                        opened = true;
                    }
                    '}' => depth -= 1,
                    _ => {}
                }
            }

            if opened && depth <= 0 {
                return j + 1;
            }
        }

        lines.len()
    }

    /// Dallanma anahtar kelimelerini sayarak karmaşıklığı tahmin eder
    fn estimate_complexity(body: &[&str]) -> usize {
        let mut complexity = 1;
        for line in body {
            complexity += BRANCH_KEYWORD.find_iter(line).count();
            complexity += BOOL_OPERATOR.find_iter(line).count();
        }
        complexity
    }
}
